use std::fmt;

use super::{vocab, Literal, Value};
use crate::Id;

/// RDF triple: subject, predicate and object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple(pub Id, pub Id, pub Value);

impl Triple {
	pub fn subject(&self) -> &Id {
		&self.0
	}

	pub fn predicate(&self) -> &Id {
		&self.1
	}

	pub fn object(&self) -> &Value {
		&self.2
	}
}

/// RDF quad: a triple with an optional graph name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad(pub Id, pub Id, pub Value, pub Option<Id>);

/// Borrowed quad.
#[derive(Debug, Clone, Copy)]
pub struct QuadRef<'a>(pub &'a Triple, pub Option<&'a Id>);

impl<'a> QuadRef<'a> {
	pub fn triple(&self) -> &'a Triple {
		self.0
	}

	pub fn graph(&self) -> Option<&'a Id> {
		self.1
	}

	pub fn into_owned(self) -> Quad {
		let Triple(s, p, o) = self.0.clone();
		Quad(s, p, o, self.1.cloned())
	}
}

/// Writes a string literal between double quotes, escaped.
pub(crate) fn write_string(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
	f.write_char('"')?;

	for c in s.chars() {
		match c {
			'"' => f.write_str("\\\"")?,
			'\\' => f.write_str("\\\\")?,
			'\n' => f.write_str("\\n")?,
			'\r' => f.write_str("\\r")?,
			c => f.write_char(c)?,
		}
	}

	f.write_char('"')
}

/// Formats an identifier in N-Quads syntax.
pub(crate) struct NQuadsId<'a>(pub &'a Id);

impl<'a> fmt::Display for NQuadsId<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.0 {
			Id::Blank(b) => b.fmt(f),
			id => write!(f, "<{}>", id.as_str()),
		}
	}
}

impl fmt::Display for Literal {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write_string(f, &self.value)?;

		match &self.language {
			Some(language) => write!(f, "@{language}"),
			None if self.datatype.as_str() == vocab::XSD_STRING.as_str() => Ok(()),
			None => write!(f, "^^<{}>", self.datatype),
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Id(id) => NQuadsId(id).fmt(f),
			Self::Literal(l) => l.fmt(f),
		}
	}
}

impl fmt::Display for Triple {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} {} {} .", NQuadsId(&self.0), NQuadsId(&self.1), self.2)
	}
}

impl<'a> fmt::Display for QuadRef<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let Triple(s, p, o) = self.0;
		write!(f, "{} {} {}", NQuadsId(s), NQuadsId(p), o)?;

		if let Some(g) = self.1 {
			write!(f, " {}", NQuadsId(g))?;
		}

		f.write_str(" .")
	}
}

impl fmt::Display for Quad {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let triple = Triple(self.0.clone(), self.1.clone(), self.2.clone());
		QuadRef(&triple, self.3.as_ref()).fmt(f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use static_iref::iri;

	#[test]
	fn literal_display() {
		assert_eq!(Literal::string("a \"b\" \\c").to_string(), r#""a \"b\" \\c""#);
		assert_eq!(
			Literal::new("1".to_owned(), vocab::XSD_INTEGER.to_owned()).to_string(),
			"\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"
		);
		assert_eq!(
			Literal::lang_string("chat".to_owned(), crate::LenientLangTagBuf::new("fr".to_owned()))
				.to_string(),
			"\"chat\"@fr"
		)
	}

	#[test]
	fn quad_display() {
		let quad = Quad(
			Id::from_string("_:b0".to_owned()),
			Id::Iri(iri!("http://x/p").to_owned()),
			Value::iri(iri!("http://x/o")),
			Some(Id::Iri(iri!("http://x/g").to_owned())),
		);

		assert_eq!(quad.to_string(), "_:b0 <http://x/p> <http://x/o> <http://x/g> .")
	}
}
