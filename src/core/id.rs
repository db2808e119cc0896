use iref::{Iri, IriBuf};
use std::fmt;

use crate::{BlankIdBuf, Term};

/// Node identifier.
///
/// Either an IRI, a blank node identifier, or an invalid reference (a string
/// that is neither). Invalid references are kept in expanded documents, with
/// a warning, and ignored when producing RDF.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Id {
	Iri(IriBuf),
	Blank(BlankIdBuf),
	Invalid(String),
}

impl Id {
	/// Classifies the given string.
	pub fn from_string(s: String) -> Self {
		if s.starts_with("_:") {
			return match BlankIdBuf::new(s) {
				Ok(b) => Self::Blank(b),
				Err(e) => Self::Invalid(e.0),
			};
		}

		match IriBuf::new(s) {
			Ok(iri) => Self::Iri(iri),
			Err(e) => Self::Invalid(e.0),
		}
	}

	pub fn iri(iri: IriBuf) -> Self {
		Self::Iri(iri)
	}

	pub fn blank(b: BlankIdBuf) -> Self {
		Self::Blank(b)
	}

	/// Checks if this is an IRI or a blank node identifier.
	#[inline(always)]
	pub fn is_valid(&self) -> bool {
		!matches!(self, Self::Invalid(_))
	}

	#[inline(always)]
	pub fn as_str(&self) -> &str {
		match self {
			Id::Iri(iri) => iri.as_str(),
			Id::Blank(b) => b.as_str(),
			Id::Invalid(s) => s.as_str(),
		}
	}

	#[inline(always)]
	pub fn is_blank(&self) -> bool {
		matches!(self, Id::Blank(_))
	}

	#[inline(always)]
	pub fn as_blank(&self) -> Option<&BlankIdBuf> {
		match self {
			Id::Blank(b) => Some(b),
			_ => None,
		}
	}

	#[inline(always)]
	pub fn is_iri(&self) -> bool {
		matches!(self, Id::Iri(_))
	}

	#[inline(always)]
	pub fn as_iri(&self) -> Option<&Iri> {
		match self {
			Id::Iri(iri) => Some(iri),
			_ => None,
		}
	}

	#[inline(always)]
	pub fn into_term(self) -> Term {
		Term::Id(self)
	}

	pub fn into_string(self) -> String {
		match self {
			Id::Iri(iri) => iri.into_string(),
			Id::Blank(b) => b.into_string(),
			Id::Invalid(s) => s,
		}
	}
}

impl From<IriBuf> for Id {
	fn from(iri: IriBuf) -> Self {
		Self::Iri(iri)
	}
}

impl From<BlankIdBuf> for Id {
	fn from(b: BlankIdBuf) -> Self {
		Self::Blank(b)
	}
}

impl fmt::Display for Id {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
