//! JSON-LD syntax primitives: keywords, error codes, container mappings,
//! directions, language tags and IRI helpers.
pub mod container;
mod direction;
mod error;
pub mod iri;
mod keyword;
mod lang;
mod nullable;

pub use container::{Container, ContainerItem};
pub use direction::*;
pub use error::*;
pub use iri::CompactIri;
pub use keyword::*;
pub use lang::*;
pub use nullable::*;

/// JSON value type used for every JSON document.
pub use serde_json::{Map as Object, Value};

/// Name of the JSON kind of `value`, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
