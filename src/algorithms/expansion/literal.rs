use serde_json::Value;

use super::{expand_iri, node_id_of_term, ActiveProperty};
use crate::{
	algorithms::ProcessingEnvironment,
	object::{LangString, LiteralValue},
	Context, IndexedObject, Node, Object, Type, ValueObject,
};

/// Scalar to expand.
pub(crate) enum Literal<'a> {
	/// Scalar found in the input document.
	Given(&'a Value),

	/// String produced by the algorithm, such as a property-valued index.
	Inferred(&'a str),
}

impl<'a> Literal<'a> {
	pub fn as_str(&self) -> Option<&'a str> {
		match *self {
			Self::Given(Value::String(s)) => Some(s.as_str()),
			Self::Given(_) => None,
			Self::Inferred(s) => Some(s),
		}
	}

	fn into_literal_value(self) -> LiteralValue {
		match self {
			Self::Given(Value::Bool(b)) => LiteralValue::Boolean(*b),
			Self::Given(Value::Number(n)) => LiteralValue::Number(n.clone()),
			Self::Given(Value::String(s)) => LiteralValue::String(s.clone()),
			Self::Given(_) => LiteralValue::Null,
			Self::Inferred(s) => LiteralValue::String(s.to_owned()),
		}
	}
}

/// Expand a literal value.
///
/// See <https://www.w3.org/TR/json-ld11-api/#value-expansion>.
pub(crate) fn expand_literal(
	env: &mut impl ProcessingEnvironment,
	active_context: &Context,
	active_property: ActiveProperty<'_>,
	value: Literal,
) -> IndexedObject {
	let active_property_definition = active_property.get_from(active_context);
	let active_property_type = active_property_definition.and_then(|d| d.typ.as_ref());

	match (active_property_type, value.as_str()) {
		// If the `active_property` has a type mapping in `active_context` that
		// is `@id`, and the `value` is a string, return a node reference.
		(Some(Type::Id), Some(s)) => {
			let mut node = Node::new();
			node.id = node_id_of_term(expand_iri(env, active_context, s, true, false));
			Object::from(node).into()
		}

		// Same for `@vocab`, but the value is expanded vocabulary-relative.
		(Some(Type::Vocab), Some(s)) => {
			let mut node = Node::new();
			node.id = node_id_of_term(expand_iri(env, active_context, s, true, true));
			Object::from(node).into()
		}

		(Some(Type::Iri(ty)), _) => {
			Object::Value(ValueObject::Literal(value.into_literal_value(), Some(ty.clone()))).into()
		}

		(Some(Type::Json), _) => {
			let json = match value {
				Literal::Given(v) => v.clone(),
				Literal::Inferred(s) => Value::String(s.to_owned()),
			};
			Object::Value(ValueObject::Json(json)).into()
		}

		(_, Some(s)) => {
			// Initialize `language` to the language mapping for
			// `active_property` in `active_context`, if any, otherwise to the
			// default language of `active_context`.
			let language = match active_property_definition.and_then(|d| d.language.as_ref()) {
				Some(language) => language.clone().option(),
				None => active_context.default_language().cloned(),
			};

			let direction = match active_property_definition.and_then(|d| d.direction) {
				Some(direction) => direction.option(),
				None => active_context.default_base_direction(),
			};

			match LangString::new(s.to_owned(), language, direction) {
				Ok(lang_str) => Object::Value(ValueObject::LangString(lang_str)).into(),
				Err(s) => Object::Value(ValueObject::string(s)).into(),
			}
		}

		_ => Object::Value(ValueObject::Literal(value.into_literal_value(), None)).into(),
	}
}
