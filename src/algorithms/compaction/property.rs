use serde_json::{Map, Value};

use crate::{
	algorithms::{
		compaction::{add_value, value::value_value, CompactFragment, CompactIndexedFragment, Compactor},
		ProcessingEnvironment,
	},
	object::{AnyObject, List, Ref},
	syntax::{Container, ContainerItem, Keyword},
	Id, Indexed, Node, Object, Term,
};

use super::Error;

/// Returns the `key` entry of `map` as an object, creating it if necessary.
fn object_entry<'m>(map: &'m mut Map<String, Value>, key: &str) -> &'m mut Map<String, Value> {
	let entry = map
		.entry(key.to_owned())
		.or_insert_with(|| Value::Object(Map::new()));

	if !entry.is_object() {
		*entry = Value::Object(Map::new())
	}

	match entry {
		Value::Object(map) => map,
		_ => unreachable!(),
	}
}

/// Removes the `key` entry of `item` and returns its first string value.
///
/// The other values are put back.
fn take_first_value(item: &mut Value, key: &str, as_array: bool) -> Option<String> {
	let map = item.as_object_mut()?;
	let values = match map.remove(key)? {
		Value::Array(values) => values,
		value => vec![value],
	};

	let mut values = values.into_iter();
	let first = match values.next() {
		Some(Value::String(s)) => s,
		Some(other) => {
			add_value(map, key, other, false);
			for value in values {
				add_value(map, key, value, false)
			}

			return None;
		}
		None => return None,
	};

	let remaining: Vec<_> = values.collect();
	match remaining.len() {
		0 => (),
		1 if !as_array => {
			map.insert(key.to_owned(), remaining.into_iter().next().unwrap_or(Value::Null));
		}
		_ => {
			map.insert(key.to_owned(), Value::Array(remaining));
		}
	}

	Some(first)
}

impl Compactor<'_> {
	#[allow(clippy::too_many_arguments)]
	async fn compact_property_list(
		&self,
		env: &mut impl ProcessingEnvironment,
		list: &List,
		expanded_index: Option<&str>,
		nest_result: &mut Map<String, Value>,
		container: Container,
		as_array: bool,
		item_active_property: &str,
	) -> Result<(), Error> {
		let mut compacted_item = Box::pin(
			self.with_type_scoped_context(self.active_context)
				.with_active_property(Some(item_active_property))
				.compact_collection_with(env, list.iter()),
		)
		.await?;

		if !compacted_item.is_array() {
			compacted_item = Value::Array(vec![compacted_item])
		}

		if container.contains(ContainerItem::List) {
			nest_result.insert(item_active_property.to_owned(), compacted_item);
		} else {
			// List object.
			let mut list_object = Map::new();
			list_object.insert(self.compact_keyword(Keyword::List)?, compacted_item);

			if let Some(index) = expanded_index {
				list_object.insert(
					self.compact_keyword(Keyword::Index)?,
					Value::String(index.to_owned()),
				);
			}

			add_value(
				nest_result,
				item_active_property,
				Value::Object(list_object),
				as_array,
			)
		}

		Ok(())
	}

	#[allow(clippy::too_many_arguments)]
	async fn compact_property_graph(
		&self,
		env: &mut impl ProcessingEnvironment,
		node: &Node,
		expanded_index: Option<&str>,
		nest_result: &mut Map<String, Value>,
		container: Container,
		as_array: bool,
		item_active_property: &str,
	) -> Result<(), Error> {
		let graph = node.graph.as_deref().unwrap_or_default();
		let compacted_item = Box::pin(
			self.with_type_scoped_context(self.active_context)
				.with_active_property(Some(item_active_property))
				.compact_collection_with(env, graph.iter()),
		)
		.await?;

		if container.contains(ContainerItem::Graph) && container.contains(ContainerItem::Id) {
			// Graph map keyed by graph name.
			let map_key = match &node.id {
				Some(id) => self.compact_iri(&id.clone().into_term(), false, false)?,
				None => Some(self.compact_keyword(Keyword::None)?),
			}
			.unwrap_or_else(|| Keyword::None.into_str().to_owned());

			let map_object = object_entry(nest_result, item_active_property);
			add_value(map_object, &map_key, compacted_item, as_array)
		} else if container.contains(ContainerItem::Graph)
			&& container.contains(ContainerItem::Index)
			&& node.is_simple_graph()
		{
			// Graph map keyed by index.
			let map_key = match expanded_index {
				Some(index) => index.to_owned(),
				None => self.compact_keyword(Keyword::None)?,
			};

			let map_object = object_entry(nest_result, item_active_property);
			add_value(map_object, &map_key, compacted_item, as_array)
		} else if container.contains(ContainerItem::Graph) && node.is_simple_graph() {
			// Several objects would be read as several graphs.
			let compacted_item = match compacted_item {
				Value::Array(items) if items.len() > 1 => {
					let mut map = Map::new();
					map.insert(self.compact_keyword(Keyword::Included)?, Value::Array(items));
					Value::Object(map)
				}
				item => item,
			};

			add_value(nest_result, item_active_property, compacted_item, as_array)
		} else {
			// Explicit graph object.
			let mut map = Map::new();
			map.insert(self.compact_keyword(Keyword::Graph)?, compacted_item);

			if let Some(id) = &node.id {
				let value = self.compact_iri(&id.clone().into_term(), false, false)?;
				map.insert(
					self.compact_keyword(Keyword::Id)?,
					value.map(Value::String).unwrap_or(Value::Null),
				);
			}

			if let Some(index) = expanded_index {
				map.insert(
					self.compact_keyword(Keyword::Index)?,
					Value::String(index.to_owned()),
				);
			}

			add_value(nest_result, item_active_property, Value::Object(map), as_array)
		}

		Ok(())
	}

	/// Selects the object receiving the compacted values of
	/// `item_active_property`, following its nest value.
	fn select_nest_result<'m>(
		&self,
		result: &'m mut Map<String, Value>,
		item_active_property: &str,
	) -> Result<(&'m mut Map<String, Value>, Container, bool), Error> {
		let definition = self.active_context.get(item_active_property);
		let container = definition.map_or(Container::None, |def| def.container);

		let nest_result = match definition.and_then(|def| def.nest.as_deref()) {
			Some(nest_term) => {
				// The nest term must be `@nest` or expand to it.
				if nest_term != Keyword::Nest.into_str() {
					match self.active_context.get(nest_term) {
						Some(def) if def.value == Some(Term::Keyword(Keyword::Nest)) => (),
						_ => return Err(Error::InvalidNestValue(nest_term.to_owned())),
					}
				}

				object_entry(result, nest_term)
			}
			None => result,
		};

		let as_array = container.contains(ContainerItem::Set)
			|| item_active_property == Keyword::Graph.into_str()
			|| item_active_property == Keyword::List.into_str()
			|| !self.options.compact_arrays;

		Ok((nest_result, container, as_array))
	}

	/// Compacts the given property into the `result` compacted object.
	pub async fn compact_property<'a, O, T>(
		&self,
		env: &mut impl ProcessingEnvironment,
		result: &mut Map<String, Value>,
		expanded_property: Term,
		expanded_value: O,
		inside_reverse: bool,
	) -> Result<(), Error>
	where
		O: IntoIterator<Item = &'a Indexed<T>>,
		T: 'a + AnyObject,
	{
		let mut is_empty = true;

		for expanded_item in expanded_value {
			is_empty = false;

			let Some(item_active_property) = self.compact_iri_with(
				&expanded_property,
				true,
				inside_reverse,
				Some(expanded_item),
			)?
			else {
				continue;
			};

			let (nest_result, container, as_array) =
				self.select_nest_result(result, &item_active_property)?;

			match expanded_item.as_object_ref() {
				Ref::List(list) => {
					self.compact_property_list(
						env,
						list,
						expanded_item.index(),
						nest_result,
						container,
						as_array,
						&item_active_property,
					)
					.await?
				}
				Ref::Node(node) if node.is_graph() => {
					self.compact_property_graph(
						env,
						node,
						expanded_item.index(),
						nest_result,
						container,
						as_array,
						&item_active_property,
					)
					.await?
				}
				object => {
					let type_scoped = self.with_type_scoped_context(self.active_context);
					let item_compactor =
						type_scoped.with_active_property(Some(&item_active_property));
					let mut compacted_item =
						Box::pin(expanded_item.compact_fragment(env, &item_compactor)).await?;

					let map_container = if container.contains(ContainerItem::Graph) {
						None
					} else if container.contains(ContainerItem::Language) {
						Some(ContainerItem::Language)
					} else if container.contains(ContainerItem::Index) {
						Some(ContainerItem::Index)
					} else if container.contains(ContainerItem::Id) {
						Some(ContainerItem::Id)
					} else if container.contains(ContainerItem::Type) {
						Some(ContainerItem::Type)
					} else {
						None
					};

					let Some(container_type) = map_container else {
						add_value(nest_result, &item_active_property, compacted_item, as_array);
						continue;
					};

					let container_key = self.compact_keyword(container_type.into_keyword())?;

					let map_key = match container_type {
						ContainerItem::Language => match object {
							Ref::Value(value) => {
								compacted_item = value_value(value);
								value.language().map(|lang| lang.as_str().to_owned())
							}
							_ => None,
						},
						ContainerItem::Index => {
							let index_key = self
								.active_context
								.get(&item_active_property)
								.and_then(|def| def.index.as_deref())
								.filter(|key| *key != Keyword::Index.into_str());

							match index_key {
								Some(index_key) => {
									// Property-valued index.
									let container_key = self
										.compact_iri(
											&Term::Id(Id::from_string(index_key.to_owned())),
											true,
											false,
										)?
										.unwrap_or_else(|| index_key.to_owned());

									take_first_value(&mut compacted_item, &container_key, as_array)
								}
								None => expanded_item.index().map(ToOwned::to_owned),
							}
						}
						ContainerItem::Id => compacted_item
							.as_object_mut()
							.and_then(|map| map.remove(&container_key))
							.and_then(|value| match value {
								Value::String(s) => Some(s),
								_ => None,
							}),
						_ => {
							let map_key =
								take_first_value(&mut compacted_item, &container_key, as_array);

							// A single remaining `@id` entry is compacted as a node
							// reference.
							let id_alias = self.compact_keyword(Keyword::Id)?;
							let is_reference = compacted_item
								.as_object()
								.map_or(false, |map| map.len() == 1 && map.contains_key(&id_alias));

							if is_reference {
								if let Some(id) = object.id() {
									let reference = Object::reference(id.clone());
									compacted_item = Box::pin(reference.compact_indexed_fragment(
										env,
										&item_compactor,
										None,
									))
									.await?
								}
							}

							map_key
						}
					};

					let map_key = match map_key {
						Some(key) => key,
						None => self.compact_keyword(Keyword::None)?,
					};

					let map_object = object_entry(nest_result, &item_active_property);
					add_value(map_object, &map_key, compacted_item, as_array)
				}
			}
		}

		if is_empty {
			let empty_node = Indexed::unindexed(Node::new());
			if let Some(item_active_property) = self.compact_iri_with(
				&expanded_property,
				true,
				inside_reverse,
				Some(&empty_node),
			)? {
				let (nest_result, _, _) = self.select_nest_result(result, &item_active_property)?;
				add_value(nest_result, &item_active_property, Value::Array(Vec::new()), true)
			}
		}

		Ok(())
	}
}
