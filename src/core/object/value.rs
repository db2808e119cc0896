use iref::{Iri, IriBuf};
use serde_json::{Map, Number, Value};

use super::IntoJson;
use crate::syntax::{Direction, Keyword, LenientLangTagBuf};

/// Literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
	/// The `null` value.
	Null,

	/// Boolean value.
	Boolean(bool),

	/// Number.
	Number(Number),

	/// String.
	String(String),
}

impl LiteralValue {
	/// Converts a JSON scalar into a literal value.
	///
	/// Returns the input back if it is an array or an object.
	pub fn from_json(value: Value) -> Result<Self, Value> {
		match value {
			Value::Null => Ok(Self::Null),
			Value::Bool(b) => Ok(Self::Boolean(b)),
			Value::Number(n) => Ok(Self::Number(n)),
			Value::String(s) => Ok(Self::String(s)),
			other => Err(other),
		}
	}

	/// Returns this value as a string if it is one.
	#[inline(always)]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			LiteralValue::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns this value as a boolean if it is one.
	#[inline(always)]
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			LiteralValue::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns this value as a number if it is one.
	#[inline(always)]
	pub fn as_number(&self) -> Option<&Number> {
		match self {
			LiteralValue::Number(n) => Some(n),
			_ => None,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	pub fn into_json(self) -> Value {
		match self {
			Self::Null => Value::Null,
			Self::Boolean(b) => Value::Bool(b),
			Self::Number(n) => Value::Number(n),
			Self::String(s) => Value::String(s),
		}
	}
}

/// Language tagged string.
///
/// Holds a language, a base direction or both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LangString {
	data: String,
	language: Option<LenientLangTagBuf>,
	direction: Option<Direction>,
}

impl LangString {
	/// Creates a new language string.
	///
	/// Fails and gives back the string if both `language` and `direction`
	/// are `None`.
	pub fn new(
		data: String,
		language: Option<LenientLangTagBuf>,
		direction: Option<Direction>,
	) -> Result<Self, String> {
		if language.is_none() && direction.is_none() {
			Err(data)
		} else {
			Ok(Self {
				data,
				language,
				direction,
			})
		}
	}

	pub fn as_str(&self) -> &str {
		&self.data
	}

	pub fn language(&self) -> Option<&LenientLangTagBuf> {
		self.language.as_ref()
	}

	pub fn direction(&self) -> Option<Direction> {
		self.direction
	}

	pub fn into_parts(self) -> (String, Option<LenientLangTagBuf>, Option<Direction>) {
		(self.data, self.language, self.direction)
	}
}

/// Value object.
///
/// Either a typed literal value, or an internationalized language string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueObject {
	/// Typed literal value.
	Literal(LiteralValue, Option<IriBuf>),

	/// Language tagged string.
	LangString(LangString),

	/// JSON literal value.
	Json(Value),
}

impl ValueObject {
	/// Creates a `null` value object.
	#[inline(always)]
	pub fn null() -> Self {
		Self::Literal(LiteralValue::Null, None)
	}

	/// Creates an untyped string value.
	pub fn string(s: impl Into<String>) -> Self {
		Self::Literal(LiteralValue::String(s.into()), None)
	}

	#[inline(always)]
	pub fn as_str(&self) -> Option<&str> {
		match self {
			ValueObject::Literal(lit, _) => lit.as_str(),
			ValueObject::LangString(str) => Some(str.as_str()),
			ValueObject::Json(_) => None,
		}
	}

	#[inline(always)]
	pub fn as_literal(&self) -> Option<(&LiteralValue, Option<&Iri>)> {
		match self {
			Self::Literal(lit, ty) => Some((lit, ty.as_deref())),
			_ => None,
		}
	}

	pub fn literal_type(&self) -> Option<&Iri> {
		match self {
			Self::Literal(_, ty) => ty.as_deref(),
			_ => None,
		}
	}

	/// Value of the `@type` entry, if any.
	///
	/// This is `@json` for JSON literals.
	pub fn type_str(&self) -> Option<&str> {
		match self {
			Self::Literal(_, ty) => ty.as_deref().map(Iri::as_str),
			Self::LangString(_) => None,
			Self::Json(_) => Some(Keyword::Json.into_str()),
		}
	}

	pub fn language(&self) -> Option<&LenientLangTagBuf> {
		match self {
			Self::LangString(s) => s.language(),
			_ => None,
		}
	}

	pub fn direction(&self) -> Option<Direction> {
		match self {
			Self::LangString(s) => s.direction(),
			_ => None,
		}
	}

	/// Value of the `@value` entry.
	pub fn value_json(&self) -> Value {
		match self {
			Self::Literal(lit, _) => lit.clone().into_json(),
			Self::LangString(s) => Value::String(s.as_str().to_owned()),
			Self::Json(json) => json.clone(),
		}
	}
}

impl IntoJson for ValueObject {
	fn into_json(self) -> Value {
		let mut map = Map::new();

		match self {
			Self::Literal(lit, ty) => {
				map.insert(Keyword::Value.into_str().to_owned(), lit.into_json());
				if let Some(ty) = ty {
					map.insert(
						Keyword::Type.into_str().to_owned(),
						Value::String(ty.into_string()),
					);
				}
			}
			Self::LangString(s) => {
				let (data, language, direction) = s.into_parts();
				map.insert(Keyword::Value.into_str().to_owned(), Value::String(data));
				if let Some(language) = language {
					map.insert(
						Keyword::Language.into_str().to_owned(),
						Value::String(language.into_string()),
					);
				}
				if let Some(direction) = direction {
					map.insert(
						Keyword::Direction.into_str().to_owned(),
						Value::String(direction.as_str().to_owned()),
					);
				}
			}
			Self::Json(json) => {
				map.insert(Keyword::Value.into_str().to_owned(), json);
				map.insert(
					Keyword::Type.into_str().to_owned(),
					Value::String(Keyword::Json.into_str().to_owned()),
				);
			}
		}

		Value::Object(map)
	}
}
