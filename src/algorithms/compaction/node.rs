use mown::Mown;
use serde_json::{Map, Value};

use crate::{
	algorithms::{
		compaction::{add_value, Compactor},
		context_processing::ContextProcessingOptions,
		ProcessingEnvironment,
	},
	syntax::{Container, ContainerItem, Keyword},
	Id, Node, ProcessingMode, Term, Type,
};

use super::Error;

fn optional_string(s: Option<String>) -> Value {
	s.map(Value::String).unwrap_or(Value::Null)
}

impl Compactor<'_> {
	/// Compacts the given indexed node.
	pub async fn compact_indexed_node_with(
		&self,
		env: &mut impl ProcessingEnvironment,
		node: &Node,
		index: Option<&str>,
	) -> Result<Value, Error> {
		// Term-scoped contexts do not apply to new node objects, unless the
		// node is a mere reference.
		let mut active_context = Mown::Borrowed(self.active_context);
		if !node.is_reference() {
			if let Some(previous_context) = self.active_context.previous_context() {
				active_context = Mown::Borrowed(previous_context);
			}
		}

		// Property-scoped context.
		if let Some(active_property) = self.active_property {
			let scoped = active_context
				.process_scoped(
					env,
					self.type_scoped_context,
					active_property,
					ContextProcessingOptions::from(self.options).with_override(),
				)
				.await?;
			if let Some(scoped) = scoped {
				active_context = Mown::Owned(scoped)
			}
		}

		let mut result = Map::new();

		// Type-scoped contexts, in the lexicographic order of compacted types.
		if !node.types().is_empty() {
			let mut compacted_types = Vec::new();
			for ty in node.types() {
				let compacted_ty = self
					.with_active_context(self.type_scoped_context)
					.compact_iri(&ty.clone().into_term(), true, false)?;
				compacted_types.extend(compacted_ty)
			}

			compacted_types.sort();

			for term in &compacted_types {
				let scoped = active_context
					.process_scoped(
						env,
						self.type_scoped_context,
						term,
						ContextProcessingOptions::from(self.options).without_propagation(),
					)
					.await?;
				if let Some(scoped) = scoped {
					active_context = Mown::Owned(scoped)
				}
			}
		}

		let compactor = self.with_active_context(&active_context);

		if let Some(id) = &node.id {
			let id = id.clone().into_term();

			// Node reference coerced by the type mapping of the active property.
			if node.is_empty() {
				match compactor.active_property_definition().and_then(|def| def.typ.as_ref()) {
					Some(Type::Id) => {
						return Ok(optional_string(compactor.compact_iri(&id, false, false)?))
					}
					Some(Type::Vocab) => {
						return Ok(optional_string(compactor.compact_iri(&id, true, false)?))
					}
					_ => (),
				}
			}

			let compacted_value = compactor.compact_iri(&id, false, false)?;
			result.insert(
				compactor.compact_keyword(Keyword::Id)?,
				optional_string(compacted_value),
			);
		}

		compactor.compact_types(&mut result, node.types.as_deref())?;

		if let Some(reverse_properties) = &node.reverse_properties {
			if !reverse_properties.is_empty() {
				let mut active_context = Mown::Borrowed(&*active_context);
				let scoped = active_context
					.process_scoped(
						env,
						&active_context,
						Keyword::Reverse.into_str(),
						ContextProcessingOptions::from(self.options).with_override(),
					)
					.await?;
				if let Some(scoped) = scoped {
					active_context = Mown::Owned(scoped)
				}

				let compactor = compactor.with_active_context(&active_context);

				let mut reverse_result = Map::new();
				for (expanded_property, expanded_value) in reverse_properties {
					compactor
						.compact_property(
							env,
							&mut reverse_result,
							expanded_property.clone().into_term(),
							expanded_value.iter(),
							true,
						)
						.await?;
				}

				// Reverse properties defined as such in the context move up.
				let mut reverse_map = Map::new();
				for (property, value) in reverse_result {
					if let Some(definition) = active_context.get(&property) {
						if definition.reverse_property {
							let as_array = definition.container.contains(ContainerItem::Set)
								|| !self.options.compact_arrays;

							add_value(&mut result, &property, value, as_array);
							continue;
						}
					}

					reverse_map.insert(property, value);
				}

				if !reverse_map.is_empty() {
					result.insert(
						compactor.compact_keyword(Keyword::Reverse)?,
						Value::Object(reverse_map),
					);
				}
			}
		}

		if let Some(index) = index {
			let index_container = compactor
				.active_property_definition()
				.map_or(false, |def| def.container.contains(ContainerItem::Index));

			// Inside an index container, the index is the map key.
			if !index_container {
				result.insert(
					compactor.compact_keyword(Keyword::Index)?,
					Value::String(index.to_owned()),
				);
			}
		}

		if let Some(graph) = &node.graph {
			compactor
				.compact_property(
					env,
					&mut result,
					Term::Keyword(Keyword::Graph),
					graph.iter(),
					false,
				)
				.await?
		}

		let mut expanded_entries: Vec<_> = node.properties.iter().collect();
		if self.options.ordered {
			expanded_entries.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()))
		}

		for (expanded_property, expanded_value) in expanded_entries {
			compactor
				.compact_property(
					env,
					&mut result,
					expanded_property.clone().into_term(),
					expanded_value.iter(),
					false,
				)
				.await?
		}

		if let Some(included) = &node.included {
			compactor
				.compact_property(
					env,
					&mut result,
					Term::Keyword(Keyword::Included),
					included.iter(),
					false,
				)
				.await?
		}

		Ok(Value::Object(result))
	}

	/// Compacts the given list of types into `result`.
	fn compact_types(&self, result: &mut Map<String, Value>, types: Option<&[Id]>) -> Result<(), Error> {
		let Some(types) = types else {
			return Ok(());
		};

		if types.is_empty() {
			return Ok(());
		}

		// Types are compacted with the type-scoped context.
		let type_compactor = self.with_active_context(self.type_scoped_context);
		let compacted_value = if types.len() == 1 {
			optional_string(type_compactor.compact_iri(&types[0].clone().into_term(), true, false)?)
		} else {
			let mut compacted_value = Vec::with_capacity(types.len());
			for ty in types {
				let compacted_ty = type_compactor.compact_iri(&ty.clone().into_term(), true, false)?;
				compacted_value.push(optional_string(compacted_ty))
			}

			Value::Array(compacted_value)
		};

		let alias = self.compact_keyword(Keyword::Type)?;

		let container = self
			.active_context
			.get(&alias)
			.map_or(Container::None, |def| def.container);
		let as_array = (self.options.processing_mode == ProcessingMode::JsonLd1_1
			&& container.contains(ContainerItem::Set))
			|| !self.options.compact_arrays;

		add_value(result, &alias, compacted_value, as_array);
		Ok(())
	}
}
