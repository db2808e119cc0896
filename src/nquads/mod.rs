//! N-Quads parser and serializer.
//!
//! One statement per line: subject, predicate, object and optional graph
//! label, terminated by `.`.
use std::io;

use crate::rdf::Dataset;

mod parser;

pub use parser::*;

/// Writes the dataset, one quad per line, default graph first.
pub fn serialize(dataset: &Dataset, mut out: impl io::Write) -> io::Result<()> {
	for quad in dataset.quads() {
		writeln!(out, "{quad}")?;
	}

	Ok(())
}

pub fn to_string(dataset: &Dataset) -> String {
	dataset.quads().map(|quad| format!("{quad}\n")).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		rdf::{vocab, Literal, Value},
		Id,
	};

	const INPUT: &str = r#"
# comment
<http://x/s> <http://x/p> "a \"quoted\"\nline"@en .
_:b0 <http://x/p> "1"^^<http://www.w3.org/2001/XMLSchema#integer> <http://x/g> .
<http://x/s> <http://x/q> _:b0.
_:b0 <http://x/r> "caf\u00E9" _:g . # trailing comment
"#;

	#[test]
	fn parse_statements() {
		let dataset = parse(INPUT).unwrap();
		assert_eq!(dataset.len(), 4);
		assert_eq!(dataset.default_graph().len(), 2);

		let s = dataset.default_graph().triples();
		assert_eq!(
			s[0].object().as_literal().map(|l| l.value.as_str()),
			Some("a \"quoted\"\nline")
		);
		assert_eq!(s[1].object(), &Value::Id(Id::from_string("_:b0".to_owned())));

		let g = Id::from_string("http://x/g".to_owned());
		let typed = &dataset.graph(Some(&g)).unwrap().triples()[0];
		assert_eq!(
			typed.object(),
			&Value::Literal(Literal::new("1".to_owned(), vocab::XSD_INTEGER.to_owned()))
		);

		let g = Id::from_string("_:g".to_owned());
		let last = &dataset.graph(Some(&g)).unwrap().triples()[0];
		assert_eq!(last.object(), &Value::Literal(Literal::string("café")))
	}

	#[test]
	fn errors_carry_line_numbers() {
		let err = parse("<http://x/s> <http://x/p> <http://x/o> .\n<http://x/s> <http://x/p> .\n")
			.unwrap_err();
		assert_eq!(err.line, 2);
		assert!(matches!(err.kind, ErrorKind::InvalidStatement(2)));

		let err = parse("\"s\" <http://x/p> <http://x/o> .").unwrap_err();
		assert!(matches!(err.kind, ErrorKind::MisplacedLiteral));

		let err = parse("<http://x/s> <http://x/p> \"open").unwrap_err();
		assert!(matches!(err.kind, ErrorKind::UnexpectedEnd))
	}

	#[test]
	fn serialize_round_trip() {
		let dataset = parse(INPUT).unwrap();
		let output = to_string(&dataset);

		assert!(output.contains(
			"<http://x/s> <http://x/p> \"a \\\"quoted\\\"\\nline\"@en .\n"
		));
		assert!(output.contains("_:b0 <http://x/r> \"café\" _:g .\n"));
		assert_eq!(parse(&output).unwrap(), dataset)
	}
}
