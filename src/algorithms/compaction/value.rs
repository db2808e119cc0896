use mown::Mown;
use serde_json::{Map, Value};

use crate::{
	algorithms::{
		compaction::Compactor,
		context_processing::ContextProcessingOptions,
		ProcessingEnvironment,
	},
	object::LiteralValue,
	syntax::{Container, ContainerItem, Keyword},
	Id, Term, Type, ValueObject,
};

use super::Error;

impl Compactor<'_> {
	/// Compacts the given indexed value object.
	pub async fn compact_indexed_value_with(
		&self,
		env: &mut impl ProcessingEnvironment,
		value: &ValueObject,
		index: Option<&str>,
	) -> Result<Value, Error> {
		// Property-scoped context.
		let mut active_context = Mown::Borrowed(self.active_context);
		if let Some(active_property) = self.active_property {
			let scoped = self
				.active_context
				.process_scoped(
					env,
					self.active_context,
					active_property,
					ContextProcessingOptions::from(self.options).with_override(),
				)
				.await?;
			if let Some(scoped) = scoped {
				active_context = Mown::Owned(scoped)
			}
		}

		let compactor = self.with_active_context(&active_context);
		let definition = compactor.active_property_definition();

		let language = match definition.and_then(|def| def.language.as_ref()) {
			Some(language) => language.as_ref().option(),
			None => active_context.default_language(),
		};

		let direction = match definition.and_then(|def| def.direction) {
			Some(direction) => direction.option(),
			None => active_context.default_base_direction(),
		};

		let type_mapping = definition.and_then(|def| def.typ.as_ref());
		let container = definition.map_or(Container::None, |def| def.container);

		let remove_index = index.is_none() || container.contains(ContainerItem::Index);

		let mut result = Map::new();
		match value {
			ValueObject::Literal(lit, ty) => {
				let typed_as_mapping = match (ty, type_mapping) {
					(Some(ty), Some(Type::Iri(mapping))) => ty == mapping,
					_ => false,
				};

				let keep_object = type_mapping == Some(&Type::None) || ty.is_some();
				let scalar = remove_index
					&& (typed_as_mapping
						|| (!keep_object
							&& (!matches!(lit, LiteralValue::String(_))
								|| (language.is_none() && direction.is_none()))));

				if scalar {
					return Ok(lit.clone().into_json());
				}

				result.insert(
					compactor.compact_keyword(Keyword::Value)?,
					lit.clone().into_json(),
				);

				if let Some(ty) = ty {
					let compacted_ty = compactor
						.with_active_context(self.type_scoped_context)
						.compact_iri(&Term::Id(Id::Iri(ty.clone())), true, false)?;
					result.insert(
						compactor.compact_keyword(Keyword::Type)?,
						compacted_ty.map(Value::String).unwrap_or(Value::Null),
					);
				}
			}
			ValueObject::LangString(ls) => {
				if remove_index
					&& type_mapping != Some(&Type::None)
					&& language == ls.language()
					&& direction == ls.direction()
				{
					return Ok(Value::String(ls.as_str().to_owned()));
				}

				result.insert(
					compactor.compact_keyword(Keyword::Value)?,
					Value::String(ls.as_str().to_owned()),
				);

				if let Some(language) = ls.language() {
					result.insert(
						compactor.compact_keyword(Keyword::Language)?,
						Value::String(language.as_str().to_owned()),
					);
				}

				if let Some(direction) = ls.direction() {
					result.insert(
						compactor.compact_keyword(Keyword::Direction)?,
						Value::String(direction.as_str().to_owned()),
					);
				}
			}
			ValueObject::Json(json) => {
				if type_mapping == Some(&Type::Json) && remove_index {
					return Ok(json.clone());
				}

				result.insert(compactor.compact_keyword(Keyword::Value)?, json.clone());
				let compacted_ty = compactor
					.with_active_context(self.type_scoped_context)
					.compact_iri(&Term::Keyword(Keyword::Json), true, false)?;
				result.insert(
					compactor.compact_keyword(Keyword::Type)?,
					compacted_ty.map(Value::String).unwrap_or(Value::Null),
				);
			}
		}

		if !remove_index {
			if let Some(index) = index {
				result.insert(
					compactor.compact_keyword(Keyword::Index)?,
					Value::String(index.to_owned()),
				);
			}
		}

		Ok(Value::Object(result))
	}
}

/// The `@value` entry of a value object.
pub(crate) fn value_value(value: &ValueObject) -> Value {
	match value {
		ValueObject::Literal(lit, _) => lit.clone().into_json(),
		ValueObject::LangString(s) => Value::String(s.as_str().to_owned()),
		ValueObject::Json(json) => json.clone(),
	}
}
