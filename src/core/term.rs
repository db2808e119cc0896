use iref::Iri;
use std::fmt;

use crate::{syntax::Keyword, Id};

/// Result of IRI expansion: identifier, keyword or `null`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
	Null,
	Id(Id),
	Keyword(Keyword),
}

impl Term {
	pub fn is_null(&self) -> bool {
		matches!(self, Term::Null)
	}

	pub fn is_keyword(&self) -> bool {
		matches!(self, Term::Keyword(_))
	}

	pub fn as_keyword(&self) -> Option<Keyword> {
		match self {
			Term::Keyword(k) => Some(*k),
			_ => None,
		}
	}

	pub fn as_id(&self) -> Option<&Id> {
		match self {
			Term::Id(id) => Some(id),
			_ => None,
		}
	}

	pub fn as_iri(&self) -> Option<&Iri> {
		match self {
			Term::Id(p) => p.as_iri(),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Term::Id(p) => p.as_str(),
			Term::Keyword(k) => k.into_str(),
			Term::Null => "",
		}
	}
}

impl From<Id> for Term {
	fn from(id: Id) -> Term {
		Term::Id(id)
	}
}

impl From<Keyword> for Term {
	fn from(k: Keyword) -> Term {
		Term::Keyword(k)
	}
}

impl fmt::Display for Term {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
