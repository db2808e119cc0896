use serde_json::Value;

use super::{expand_iri, Error, ExpandedEntry, ExpansionOptions};
use crate::{
	algorithms::{ProcessingEnvironment, Warning},
	object::{LangString, LiteralValue},
	syntax::{Direction, Keyword, LenientLangTagBuf},
	Context, Id, Indexed, IndexedObject, Object, ProcessingMode, Term, ValueObject,
};

/// Expand a value object.
pub(crate) fn expand_value(
	env: &mut impl ProcessingEnvironment,
	input_type: Option<Term>,
	type_scoped_context: &Context,
	expanded_entries: Vec<ExpandedEntry>,
	value_entry: &Value,
	options: ExpansionOptions,
) -> Result<Option<IndexedObject>, Error> {
	let mut is_json = input_type == Some(Term::Keyword(Keyword::Json));
	let mut ty = None;
	let mut index = None;
	let mut language = None;
	let mut direction = None;

	for ExpandedEntry(_, expanded_key, value) in expanded_entries {
		match expanded_key {
			// If value is not a string, an invalid language-tagged string
			// error has been detected.
			Term::Keyword(Keyword::Language) => match value.as_str() {
				Some(value) => {
					if value != "@none" {
						let tag = LenientLangTagBuf::new(value.to_owned());
						if !tag.is_well_formed() {
							env.warn(Warning::MalformedLanguageTag(value.to_owned()))
						}

						language = Some(tag);
					}
				}
				None => return Err(Error::InvalidLanguageTaggedString),
			},
			Term::Keyword(Keyword::Direction) => {
				if options.processing_mode == ProcessingMode::JsonLd1_0 {
					continue;
				}

				match value.as_str().map(str::parse::<Direction>) {
					Some(Ok(value)) => direction = Some(value),
					_ => return Err(Error::InvalidBaseDirection),
				}
			}
			Term::Keyword(Keyword::Index) => match value.as_str() {
				Some(value) => index = Some(value.to_owned()),
				None => return Err(Error::InvalidIndexValue),
			},
			Term::Keyword(Keyword::Type) => {
				let Some(ty_value) = value.as_str() else {
					return Err(Error::InvalidTypedValue);
				};

				match expand_iri(env, type_scoped_context, ty_value, true, true) {
					Term::Keyword(Keyword::Json)
						if options.processing_mode != ProcessingMode::JsonLd1_0 =>
					{
						is_json = true;
					}
					Term::Id(Id::Iri(expanded_ty)) => {
						is_json = false;
						ty = Some(expanded_ty)
					}
					_ => return Err(Error::InvalidTypedValue),
				}
			}
			Term::Keyword(Keyword::Value) => (),
			_ => return Err(Error::InvalidValueObject),
		}
	}

	// If input type is @json, the value is a JSON literal.
	if is_json {
		if language.is_some() || direction.is_some() {
			return Err(Error::InvalidValueObject);
		}

		return Ok(Some(Indexed::new(
			Object::Value(ValueObject::Json(value_entry.clone())),
			index,
		)));
	}

	// Otherwise, if value is not a scalar or null, an invalid value object
	// value error has been detected.
	let result = LiteralValue::from_json(value_entry.clone())
		.map_err(|_| Error::InvalidValueObjectValue)?;

	if result.is_null() {
		return Ok(None);
	}

	if language.is_some() || direction.is_some() {
		if ty.is_some() {
			return Err(Error::InvalidValueObject);
		}

		// Only strings can be language-tagged.
		return match result {
			LiteralValue::String(s) => match LangString::new(s, language, direction) {
				Ok(result) => Ok(Some(Indexed::new(
					Object::Value(ValueObject::LangString(result)),
					index,
				))),
				Err(_) => Err(Error::InvalidLanguageTaggedValue),
			},
			_ => Err(Error::InvalidLanguageTaggedValue),
		};
	}

	Ok(Some(Indexed::new(
		Object::Value(ValueObject::Literal(result, ty)),
		index,
	)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn entries<'a>(value: &'a Value, keys: &[(&'a str, Keyword)]) -> Vec<ExpandedEntry<'a>> {
		keys.iter()
			.map(|&(key, kw)| ExpandedEntry(key, Term::Keyword(kw), &value[key]))
			.collect()
	}

	#[test]
	fn language_tagged_number() {
		let value = json!({ "@value": 1, "@language": "en" });
		let result = expand_value(
			&mut crate::NoLoader,
			None,
			&Context::default(),
			entries(&value, &[("@value", Keyword::Value), ("@language", Keyword::Language)]),
			&value["@value"],
			ExpansionOptions::default(),
		);

		assert!(matches!(result, Err(Error::InvalidLanguageTaggedValue)))
	}

	#[test]
	fn null_value_is_dropped() {
		let value = json!({ "@value": null, "@index": "i" });
		let result = expand_value(
			&mut crate::NoLoader,
			None,
			&Context::default(),
			entries(&value, &[("@value", Keyword::Value), ("@index", Keyword::Index)]),
			&value["@value"],
			ExpansionOptions::default(),
		)
		.unwrap();

		assert!(result.is_none())
	}
}
