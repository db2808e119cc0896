use std::fmt;

use iref::{Iri, IriBuf};

use crate::{syntax::Keyword, Id, Term};

/// Type mapping of a term definition.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Type {
	/// `@id`: string values are IRIs, resolved against the base IRI.
	Id,

	/// `@json`: values are JSON literals.
	Json,

	/// `@none`
	None,

	/// `@vocab`: string values are vocabulary-relative IRIs.
	Vocab,

	/// Datatype IRI.
	Iri(IriBuf),
}

impl Type {
	pub fn as_iri(&self) -> Option<&Iri> {
		match self {
			Type::Iri(id) => Some(id),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Type::Id => "@id",
			Type::Json => "@json",
			Type::None => "@none",
			Type::Vocab => "@vocab",
			Type::Iri(id) => id.as_str(),
		}
	}
}

impl From<Type> for Term {
	fn from(t: Type) -> Term {
		match t {
			Type::Id => Term::Keyword(Keyword::Id),
			Type::Json => Term::Keyword(Keyword::Json),
			Type::None => Term::Keyword(Keyword::None),
			Type::Vocab => Term::Keyword(Keyword::Vocab),
			Type::Iri(id) => Term::Id(Id::Iri(id)),
		}
	}
}

impl TryFrom<Term> for Type {
	type Error = Term;

	fn try_from(term: Term) -> Result<Type, Term> {
		match term {
			Term::Keyword(Keyword::Id) => Ok(Type::Id),
			Term::Keyword(Keyword::Json) => Ok(Type::Json),
			Term::Keyword(Keyword::None) => Ok(Type::None),
			Term::Keyword(Keyword::Vocab) => Ok(Type::Vocab),
			Term::Id(Id::Iri(id)) => Ok(Type::Iri(id)),
			term => Err(term),
		}
	}
}

impl fmt::Display for Type {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
