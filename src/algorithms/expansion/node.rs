use iref::Iri;
use mown::Mown;
use serde_json::Value;

use super::{
	document::filter_top_level_item, entries_of, expand_element, expand_iri, expand_literal,
	force_as_array, node_id_of_term, Action, ActiveProperty, Error, Expanded, ExpandedEntry,
	ExpansionOptions, Literal,
};
use crate::{
	algorithms::{ContextProcessingOptions, ProcessingEnvironment, Warning},
	object::{LangString, List},
	syntax::{ContainerItem, Keyword, LenientLangTagBuf},
	Context, Indexed, IndexedNode, IndexedObject, Node, Object, ProcessingMode, Term, Type,
	ValueObject,
};

/// Expand a node object.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn expand_node(
	env: &mut impl ProcessingEnvironment,
	active_context: &Context,
	type_scoped_context: &Context,
	active_property: ActiveProperty<'_>,
	expanded_entries: Vec<ExpandedEntry<'_>>,
	base_url: Option<&Iri>,
	options: ExpansionOptions,
) -> Result<Option<IndexedNode>, Error> {
	let (result, has_value_object_entries) = expand_node_entries(
		env,
		Indexed::new(Node::new(), None),
		false,
		active_context,
		type_scoped_context,
		active_property,
		expanded_entries,
		base_url,
		options,
	)
	.await?;

	// A map with only `@language` (or `@direction`) entries expands to null.
	if has_value_object_entries && result.is_empty() && result.id.is_none() {
		return Ok(None);
	}

	// If active property is null or @graph, drop free-floating
	// values as follows:
	if active_property.is_top_level() {
		// If `result` is a map which is empty, or whose only entry is `@id`
		// outside of a frame, set `result` to null.
		if result.is_empty()
			&& result.index().is_none()
			&& (result.id.is_none() || !options.frame_expansion)
		{
			return Ok(None);
		}
	}

	Ok(Some(result))
}

/// Framing keyword giving the default value of a frame entry.
const FRAME_DEFAULT: &str = "@default";

/// Identifier given by an `@id` value.
///
/// Frames may use `{}` or `[]` to match any node, or a single-item array.
fn frame_id(value: &Value, frame_expansion: bool) -> Result<Option<&str>, Error> {
	match value {
		Value::String(id) => Ok(Some(id.as_str())),
		Value::Object(map) if frame_expansion && map.is_empty() => Ok(None),
		Value::Array(items) if frame_expansion => match items.as_slice() {
			[] => Ok(None),
			[Value::String(id)] => Ok(Some(id.as_str())),
			_ => Err(Error::InvalidIdValue),
		},
		_ => Err(Error::InvalidIdValue),
	}
}

/// Type given by an item of a `@type` value.
///
/// Frames may use `{}` to match any type, or `{"@default": type}`.
fn frame_type(value: &Value, frame_expansion: bool) -> Result<Option<&str>, Error> {
	match value {
		Value::String(ty) => Ok(Some(ty.as_str())),
		Value::Object(map) if frame_expansion => {
			if map.is_empty() {
				return Ok(None);
			}

			match map.get(FRAME_DEFAULT) {
				Some(Value::String(ty)) if map.len() == 1 => Ok(Some(ty.as_str())),
				_ => Err(Error::InvalidTypeValue),
			}
		}
		_ => Err(Error::InvalidTypeValue),
	}
}

/// Checks if the node being expanded already has an entry for the given
/// keyword.
fn has_keyword_entry(node: &IndexedNode, keyword: Keyword) -> bool {
	match keyword {
		Keyword::Id => node.id.is_some(),
		Keyword::Type => node.types.is_some(),
		Keyword::Graph => node.graph.is_some(),
		Keyword::Included => node.included.is_some(),
		Keyword::Index => node.index().is_some(),
		Keyword::Reverse => node.reverse_properties.is_some(),
		_ => false,
	}
}

/// Expanded node, along with a flag set to `true` if the node contains
/// value object entries (in practice, a `@language` or `@direction`
/// entry).
type ExpandedNode = (IndexedNode, bool);

#[allow(clippy::too_many_arguments)]
async fn expand_node_entries(
	env: &mut impl ProcessingEnvironment,
	mut result: IndexedNode,
	mut has_value_object_entries: bool,
	active_context: &Context,
	type_scoped_context: &Context,
	active_property: ActiveProperty<'_>,
	expanded_entries: Vec<ExpandedEntry<'_>>,
	base_url: Option<&Iri>,
	options: ExpansionOptions,
) -> Result<ExpandedNode, Error> {
	for ExpandedEntry(key, expanded_key, value) in expanded_entries {
		match expanded_key {
			Term::Null | Term::Keyword(Keyword::Context) => (),

			Term::Keyword(expanded_property) => {
				if active_property == Keyword::Reverse {
					return Err(Error::InvalidReversePropertyMap);
				}

				// If `result` already has an `expanded_property` entry, other
				// than `@included` or `@type` (unless processing mode is
				// json-ld-1.0), a colliding keywords error has been detected.
				if (options.processing_mode == ProcessingMode::JsonLd1_0
					|| (expanded_property != Keyword::Included
						&& expanded_property != Keyword::Type))
					&& has_keyword_entry(&result, expanded_property)
				{
					return Err(Error::CollidingKeywords(expanded_property.to_string()));
				}

				match expanded_property {
					Keyword::Id => {
						if let Some(str_value) = frame_id(value, options.frame_expansion)? {
							result.id = node_id_of_term(expand_iri(
								env,
								active_context,
								str_value,
								true,
								false,
							));
						}
					}
					Keyword::Type => {
						// Values are expanded with `type_scoped_context`.
						let mut types = Vec::new();
						for ty in force_as_array(value) {
							let Some(str_ty) = frame_type(ty, options.frame_expansion)? else {
								continue;
							};

							match expand_iri(env, type_scoped_context, str_ty, true, true) {
								Term::Null => (),
								Term::Id(ty) => {
									if !ty.is_valid() {
										match options.policy.invalid {
											Action::Keep => (),
											Action::Drop => continue,
											Action::Reject => return Err(Error::InvalidTypeValue),
										}
									}

									types.push(ty)
								}
								Term::Keyword(_) => return Err(Error::InvalidTypeValue),
							}
						}

						// A `{}` wildcard places no constraint.
						if !types.is_empty() || !value.is_object() {
							result.types.get_or_insert_with(Vec::new).extend(types)
						}
					}
					Keyword::Graph => {
						let expanded_value = Box::pin(expand_element(
							env,
							active_context,
							ActiveProperty::Some(Keyword::Graph.into_str()),
							value,
							base_url,
							options,
							false,
						))
						.await?;

						result.graph = Some(
							expanded_value
								.into_iter()
								.filter(filter_top_level_item)
								.collect(),
						);
					}
					Keyword::Included => {
						if options.processing_mode == ProcessingMode::JsonLd1_0 {
							continue;
						}

						let expanded_value = Box::pin(expand_element(
							env,
							active_context,
							ActiveProperty::None,
							value,
							base_url,
							options,
							false,
						))
						.await?;

						for obj in expanded_value {
							match obj.into_indexed_node() {
								Ok(node) => result.insert_included(node),
								Err(_) => return Err(Error::InvalidIncludedValue),
							}
						}
					}
					Keyword::Language => {
						if !value.is_string() {
							return Err(Error::InvalidLanguageTaggedString);
						}

						has_value_object_entries = true
					}
					Keyword::Direction => {
						if options.processing_mode == ProcessingMode::JsonLd1_0 {
							continue;
						}

						if !matches!(value.as_str(), Some("ltr" | "rtl")) {
							return Err(Error::InvalidBaseDirection);
						}

						has_value_object_entries = true
					}
					Keyword::Index => match value.as_str() {
						Some(index) => result.set_index(Some(index.to_owned())),
						None => return Err(Error::InvalidIndexValue),
					},
					Keyword::Reverse => {
						let Value::Object(_) = value else {
							return Err(Error::InvalidReverseValue);
						};

						let expanded_value = Box::pin(expand_element(
							env,
							active_context,
							ActiveProperty::Some(Keyword::Reverse.into_str()),
							value,
							base_url,
							options,
							false,
						))
						.await?;

						for obj in expanded_value {
							let Ok(reverse_map) = obj.into_indexed_node() else {
								continue;
							};
							let reverse_map = reverse_map.into_inner();

							// Reverse properties of the reverse map are forward
							// properties of the result.
							if let Some(reverse_properties) = reverse_map.reverse_properties {
								for (prop, nodes) in reverse_properties {
									result.insert_all(prop, nodes.into_iter().map(IndexedObject::from))
								}
							}

							for (prop, items) in reverse_map.properties {
								for item in items {
									match item.into_indexed_node() {
										Ok(node) => result.insert_reverse(prop.clone(), node),
										Err(_) => return Err(Error::InvalidReversePropertyValue),
									}
								}
							}
						}
					}
					Keyword::Nest => {
						let nesting_key = key;
						for nested_value in force_as_array(value) {
							let Value::Object(nested_value) = nested_value else {
								return Err(Error::InvalidNestValue);
							};

							// Property-scoped context of the nesting key.
							let processing_options = ContextProcessingOptions::from(options).with_override();
							let active_context = match active_context
								.process_scoped(env, active_context, nesting_key, processing_options)
								.await?
							{
								Some(scoped) => Mown::Owned(scoped),
								None => Mown::Borrowed(active_context),
							};

							let mut nested_entries = Vec::with_capacity(nested_value.len());
							for (key, value) in entries_of(nested_value, options.ordered) {
								let expanded_key = expand_iri(env, &active_context, key, false, true);
								if !expanded_key.is_null() {
									nested_entries.push(ExpandedEntry(key, expanded_key, value))
								}
							}

							let (new_result, new_has_value_object_entries) =
								Box::pin(expand_node_entries(
									env,
									result,
									has_value_object_entries,
									&active_context,
									type_scoped_context,
									active_property,
									nested_entries,
									base_url,
									options,
								))
								.await?;

							result = new_result;
							has_value_object_entries = new_has_value_object_entries;
						}
					}
					Keyword::Value => return Err(Error::InvalidNestValue),
					_ => (),
				}
			}

			Term::Id(prop) if prop.as_str().contains(':') => {
				if !prop.is_valid() {
					match options.policy.invalid {
						Action::Keep => (),
						Action::Drop => continue,
						Action::Reject => return Err(Error::KeyExpansionFailed(key.to_owned())),
					}
				}

				let key_definition = active_context.get(key);
				let container_mapping = key_definition.map(|d| d.container).unwrap_or_default();
				let is_reverse_property = key_definition.map(|d| d.reverse_property).unwrap_or(false);
				let is_json = key_definition.and_then(|d| d.typ.as_ref()) == Some(&Type::Json);

				let mut expanded_value = if is_json {
					Expanded::Object(Object::Value(ValueObject::Json(value.clone())).into())
				} else {
					match value {
						Value::Object(map) if container_mapping.contains(ContainerItem::Language) => {
							expand_language_map(env, active_context, key, map, options)?
						}
						Value::Object(map)
							if container_mapping.contains(ContainerItem::Index)
								|| container_mapping.contains(ContainerItem::Type)
								|| container_mapping.contains(ContainerItem::Id) =>
						{
							expand_index_map(env, active_context, key, map, base_url, options)
								.await?
						}
						_ => {
							Box::pin(expand_element(
								env,
								active_context,
								ActiveProperty::Some(key),
								value,
								base_url,
								options,
								false,
							))
							.await?
						}
					}
				};

				// If container mapping includes @list and expanded value is
				// not already a list object, convert expanded value to a list
				// object.
				if container_mapping.contains(ContainerItem::List) && !expanded_value.is_list() {
					expanded_value = Expanded::Object(
						Object::List(List::new(expanded_value.into_iter().collect())).into(),
					);
				}

				// If container mapping includes @graph, and includes neither
				// @id nor @index, convert each value into a graph object.
				if container_mapping.contains(ContainerItem::Graph)
					&& !container_mapping.contains(ContainerItem::Id)
					&& !container_mapping.contains(ContainerItem::Index)
				{
					expanded_value = Expanded::Array(
						expanded_value
							.into_iter()
							.map(|ev| Object::from(Node::new_graph(None, vec![ev])).into())
							.collect(),
					);
				}

				if !expanded_value.is_null() {
					if is_reverse_property {
						for object in expanded_value {
							match object.into_indexed_node() {
								Ok(node) => result.insert_reverse(prop.clone(), node),
								Err(_) => return Err(Error::InvalidReversePropertyValue),
							}
						}
					} else {
						result.insert_all(prop, expanded_value);
					}
				}
			}

			Term::Id(prop) => {
				// Non-keyword properties that do not include a ':' are
				// dropped, unless undefined keys are forbidden.
				if !options.policy.allow_undefined {
					return Err(Error::KeyExpansionFailed(prop.into_string()));
				}
			}
		}
	}

	Ok((result, has_value_object_entries))
}

/// Expands the value of a property whose container includes `@language`.
fn expand_language_map(
	env: &mut impl ProcessingEnvironment,
	active_context: &Context,
	key: &str,
	value: &serde_json::Map<String, Value>,
	options: ExpansionOptions,
) -> Result<Expanded, Error> {
	let mut expanded_value = Vec::new();

	// Initialize direction to the default base direction from active
	// context, overridden by the direction mapping of the key.
	let mut direction = active_context.default_base_direction();
	if let Some(key_direction) = active_context.get(key).and_then(|d| d.direction) {
		direction = key_direction.option()
	}

	for (language, language_value) in entries_of(value, options.ordered) {
		for item in force_as_array(language_value) {
			match item {
				Value::Null => (),
				Value::String(item) => {
					// If language is @none, or expands to @none, there is no
					// `@language`.
					let language = if expand_iri(env, active_context, language, false, true)
						== Term::Keyword(Keyword::None)
					{
						None
					} else {
						let tag = LenientLangTagBuf::new(language.to_owned());
						if !tag.is_well_formed() {
							env.warn(Warning::MalformedLanguageTag(language.to_owned()))
						}

						Some(tag)
					};

					let v = match LangString::new(item.clone(), language, direction) {
						Ok(v) => ValueObject::LangString(v),
						Err(item) => ValueObject::string(item),
					};

					expanded_value.push(Object::Value(v).into())
				}
				_ => return Err(Error::InvalidLanguageMapValue),
			}
		}
	}

	Ok(Expanded::Array(expanded_value))
}

/// Expands the value of a property whose container includes `@index`,
/// `@type` or `@id`.
async fn expand_index_map(
	env: &mut impl ProcessingEnvironment,
	active_context: &Context,
	key: &str,
	value: &serde_json::Map<String, Value>,
	base_url: Option<&Iri>,
	options: ExpansionOptions,
) -> Result<Expanded, Error> {
	let key_definition = active_context.get(key);
	let container_mapping = key_definition.map(|d| d.container).unwrap_or_default();
	let mut expanded_value: Vec<IndexedObject> = Vec::new();

	// Initialize `index_key` to the key's index mapping in `active_context`,
	// or @index, if it does not exist.
	let index_key = key_definition
		.and_then(|d| d.index.as_deref())
		.unwrap_or(Keyword::Index.into_str());

	for (index, index_value) in entries_of(value, options.ordered) {
		// If container mapping includes @id or @type, initialize
		// `map_context` to the `previous_context` from `active_context` if it
		// exists.
		let mut map_context = Mown::Borrowed(active_context);
		if container_mapping.contains(ContainerItem::Type)
			|| container_mapping.contains(ContainerItem::Id)
		{
			if let Some(previous_context) = active_context.previous_context() {
				map_context = Mown::Borrowed(previous_context)
			}
		}

		// If container mapping includes @type and index's term definition in
		// map context has a local context, update map context.
		if container_mapping.contains(ContainerItem::Type) {
			let scoped = map_context
				.process_scoped(env, &map_context, index, options.into())
				.await?;
			if let Some(scoped) = scoped {
				map_context = Mown::Owned(scoped)
			}
		}

		// Initialize `expanded_index` to the result of IRI expanding index.
		let expanded_index = match expand_iri(env, active_context, index, false, true) {
			Term::Null | Term::Keyword(Keyword::None) => None,
			key => Some(key),
		};

		let expanded_index_value = Box::pin(expand_element(
			env,
			&map_context,
			ActiveProperty::Some(key),
			index_value,
			base_url,
			options,
			true,
		))
		.await?;

		for mut item in expanded_index_value {
			// If container mapping includes @graph, and item is not a graph
			// object, wrap item into a graph object.
			if container_mapping.contains(ContainerItem::Graph) && !item.is_graph() {
				item = Object::from(Node::new_graph(None, vec![item])).into();
			}

			if let Some(expanded_index) = &expanded_index {
				if container_mapping.contains(ContainerItem::Index)
					&& index_key != Keyword::Index.into_str()
				{
					// Property-valued index.
					let re_expanded_index = expand_literal(
						env,
						active_context,
						ActiveProperty::Some(index_key),
						Literal::Inferred(index),
					);

					let Term::Id(expanded_index_key) =
						expand_iri(env, active_context, index_key, false, true)
					else {
						continue;
					};

					match item.inner_mut() {
						Object::Node(node) => {
							let mut values = vec![re_expanded_index];
							values.extend(node.properties.shift_remove(&expanded_index_key).unwrap_or_default());
							node.properties.insert(expanded_index_key, values);
						}
						// A value object MUST NOT contain any extra properties.
						_ => return Err(Error::InvalidValueObject),
					}
				} else if container_mapping.contains(ContainerItem::Index) && item.index().is_none() {
					item.set_index(Some(index.to_owned()))
				} else if container_mapping.contains(ContainerItem::Id) && item.id().is_none() {
					if let Object::Node(node) = item.inner_mut() {
						node.id = node_id_of_term(expand_iri(env, active_context, index, true, false));
					}
				} else if container_mapping.contains(ContainerItem::Type) {
					match expanded_index.clone() {
						Term::Id(ty) => {
							if let Object::Node(node) = item.inner_mut() {
								node.types.get_or_insert_with(Vec::new).insert(0, ty);
							}
						}
						_ => return Err(Error::InvalidTypeValue),
					}
				}
			}

			expanded_value.push(item)
		}
	}

	Ok(Expanded::Array(expanded_value))
}
