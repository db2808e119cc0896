use mown::Mown;
use serde_json::{Map, Value};

use crate::{
	algorithms::{
		compaction::Compactor,
		context_processing::ContextProcessingOptions,
		ProcessingEnvironment,
	},
	object::{AnyObject, Ref},
	syntax::{ContainerItem, Keyword},
	Term,
};

use super::Error;

impl Compactor<'_> {
	pub async fn compact_any_indexed_object(
		&self,
		env: &mut impl ProcessingEnvironment,
		object: &impl AnyObject,
		index: Option<&str>,
	) -> Result<Value, Error> {
		match object.as_object_ref() {
			Ref::Value(value) => self.compact_indexed_value_with(env, value, index).await,
			Ref::Node(node) => self.compact_indexed_node_with(env, node, index).await,
			Ref::List(list) => {
				// Term-scoped contexts do not apply to list items.
				let active_context = self
					.active_context
					.previous_context()
					.unwrap_or(self.active_context);

				let mut active_context = Mown::Borrowed(active_context);
				let mut list_container = false;
				if let Some(active_property) = self.active_property {
					if let Some(definition) = self.type_scoped_context.get(active_property) {
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

						list_container = definition.container.contains(ContainerItem::List);
					}
				}

				let compactor = self.with_active_context(&active_context);
				if list_container {
					compactor
						.with_type_scoped_context(&active_context)
						.compact_collection_with(env, list.iter())
						.await
				} else {
					let mut result = Map::new();
					compactor
						.compact_property(
							env,
							&mut result,
							Term::Keyword(Keyword::List),
							list.iter(),
							false,
						)
						.await?;

					if let Some(index) = index {
						let index_container = compactor
							.active_property_definition()
							.map_or(false, |def| def.container.contains(ContainerItem::Index));

						if !index_container {
							result.insert(
								compactor.compact_keyword(Keyword::Index)?,
								Value::String(index.to_owned()),
							);
						}
					}

					Ok(Value::Object(result))
				}
			}
		}
	}
}
