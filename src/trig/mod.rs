//! TriG and Turtle.
//!
//! [`parse`] reads TriG (a superset of Turtle) into JSON-LD, keeping the
//! prefix declarations as the document context. [`serialize`] writes
//! JSON-LD back as TriG using the document context to pick prefixed names.
pub mod parser;
pub mod serializer;

pub use parser::{parse, Error, NotationError, Parser};
pub use serializer::{
	serialize, serialize_turtle, serialize_with, Error as SerializeError, KeyAliases, Options,
	Settings,
};

#[cfg(test)]
mod tests {
	use super::*;

	const INPUT: &str = r#"
prefix : <http://x/>
prefix xsd: <http://www.w3.org/2001/XMLSchema#>

:s a :T ;
	:name "A"@en, """multi
line""" ;
	:n 2.0 ;
	:list ( 1 :a "b" ) ;
	:knows [ :name "B" ] .

:g {
	:s :p :o {| :by :w |} .
}
"#;

	#[test]
	fn round_trip() {
		let parsed = parse(INPUT).unwrap();
		let output = serializer::to_string(&parsed).unwrap();
		assert_eq!(parse(&output).unwrap(), parsed)
	}
}
