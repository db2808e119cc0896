use iref::Iri;
use mown::Mown;
use serde_json::{Map, Value};

use super::{
	expand_array, expand_iri, expand_literal, expand_node, expand_value, force_as_array, Error,
	Expanded, ExpansionOptions, Literal,
};
use crate::{
	algorithms::{ContextProcessingOptions, ProcessingEnvironment, Warning},
	object::List,
	syntax::Keyword,
	Context, Id, Indexed, Object, Term, TermDefinition,
};

/// Map entry with its expanded key.
pub(crate) struct ExpandedEntry<'a>(pub &'a str, pub Term, pub &'a Value);

/// Property under which an element is expanded.
#[derive(Clone, Copy)]
pub(crate) enum ActiveProperty<'a> {
	Some(&'a str),
	None,
}

impl<'a> ActiveProperty<'a> {
	pub fn is_some(&self) -> bool {
		matches!(self, Self::Some(_))
	}

	pub fn is_none(&self) -> bool {
		matches!(self, Self::None)
	}

	/// Checks if the active property is `null` or `@graph`, where free
	/// floating values are dropped.
	pub fn is_top_level(&self) -> bool {
		self.is_none() || *self == Keyword::Graph
	}

	pub fn as_term(&self) -> Option<&'a str> {
		match self {
			Self::Some(s) => Some(s),
			Self::None => None,
		}
	}

	pub fn get_from<'c>(&self, context: &'c Context) -> Option<&'c TermDefinition> {
		match self {
			Self::Some(s) => context.get(s),
			Self::None => None,
		}
	}
}

impl<'a> PartialEq<Keyword> for ActiveProperty<'a> {
	fn eq(&self, other: &Keyword) -> bool {
		match self {
			Self::Some(s) => *s == other.into_str(),
			_ => false,
		}
	}
}

/// Sorts the entries of a map if `ordered` is set.
pub(crate) fn entries_of(map: &Map<String, Value>, ordered: bool) -> Vec<(&str, &Value)> {
	let mut entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
	if ordered {
		entries.sort_unstable_by_key(|(k, _)| *k);
	}

	entries
}

/// Expand an element.
///
/// See <https://www.w3.org/TR/json-ld11-api/#expansion-algorithm>.
/// The default specified value for `ordered` and `from_map` is `false`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn expand_element(
	env: &mut impl ProcessingEnvironment,
	active_context: &Context,
	active_property: ActiveProperty<'_>,
	element: &Value,
	base_url: Option<&Iri>,
	options: ExpansionOptions,
	from_map: bool,
) -> Result<Expanded, Error> {
	let active_property_definition = active_property.get_from(active_context);

	// If `active_property` has a term definition in `active_context` with a
	// local context, initialize property-scoped context to that local
	// context.
	let property_scoped_term = active_property
		.as_term()
		.filter(|_| active_property_definition.is_some_and(|d| d.context.is_some()));
	let definer = active_context;

	match element {
		Value::Null => Ok(Expanded::Null),
		Value::Array(element) => {
			expand_array(
				env,
				active_context,
				active_property,
				active_property_definition,
				element,
				base_url,
				options,
				from_map,
			)
			.await
		}
		Value::Object(element) => {
			// Preliminary key expansions.
			let mut has_value_entry = false;
			let mut has_id_entry = false;
			for key in element.keys() {
				match active_context.expand_iri(key, false, true) {
					Term::Keyword(Keyword::Value) => has_value_entry = true,
					Term::Keyword(Keyword::Id) => has_id_entry = true,
					_ => (),
				}
			}

			// If `active_context` has a `previous_context`, the active context
			// is not propagated: term-scoped contexts do not apply to new node
			// objects.
			let mut active_context = Mown::Borrowed(active_context);
			if let Some(previous_context) = active_context.previous_context() {
				if !from_map && !has_value_entry && !(element.len() == 1 && has_id_entry) {
					active_context = Mown::Owned(previous_context.clone())
				}
			}

			if let Some(term) = property_scoped_term {
				let processing_options = ContextProcessingOptions::from(options).with_override();
				let scoped = active_context
					.process_scoped(env, definer, term, processing_options)
					.await?;
				if let Some(scoped) = scoped {
					active_context = Mown::Owned(scoped)
				}
			}

			if let Some(local_context) = element.get(Keyword::Context.into_str()) {
				active_context = Mown::Owned(
					active_context
						.process_in(env, local_context, base_url, options.into())
						.await?,
				);
			}

			let entries = entries_of(element, options.ordered);

			let mut type_entries: Vec<(&str, &Value)> = entries
				.iter()
				.filter(|(key, _)| {
					active_context.expand_iri(key, false, true) == Term::Keyword(Keyword::Type)
				})
				.copied()
				.collect();
			type_entries.sort_unstable_by_key(|(key, _)| *key);

			// Initialize `type_scoped_context` to `active_context`.
			// This is used for expanding values that may be relevant to any
			// previous type-scoped context.
			let type_scoped_context = active_context.as_ref();
			let mut active_context = Mown::Borrowed(active_context.as_ref());

			for (_, value) in &type_entries {
				let mut sorted_value: Vec<&str> = force_as_array(value)
					.iter()
					.filter_map(Value::as_str)
					.collect();
				sorted_value.sort_unstable();

				for term in sorted_value {
					let processing_options = ContextProcessingOptions::from(options).without_propagation();
					let scoped = active_context
						.process_scoped(env, type_scoped_context, term, processing_options)
						.await?;
					if let Some(scoped) = scoped {
						active_context = Mown::Owned(scoped)
					}
				}
			}

			// Initialize `input_type` to expansion of the last value of the
			// first entry in `element` expanding to `@type`.
			let input_type = type_entries
				.first()
				.and_then(|(_, value)| force_as_array(value).last())
				.and_then(Value::as_str)
				.map(|ty| expand_iri(env, &active_context, ty, false, true));

			let mut expanded_entries: Vec<ExpandedEntry> = Vec::with_capacity(element.len());
			let mut list_entry = None;
			let mut set_entry = None;
			let mut value_entry = None;
			for (key, value) in entries {
				if key.is_empty() {
					env.warn(Warning::EmptyTerm);
				}

				let expanded_key = expand_iri(env, &active_context, key, false, true);
				match &expanded_key {
					Term::Null => continue,
					Term::Keyword(Keyword::Value) => value_entry = Some(value),
					Term::Keyword(Keyword::List) => {
						if active_property.is_some() && active_property != Keyword::Graph {
							list_entry = Some(value)
						}
					}
					Term::Keyword(Keyword::Set) => set_entry = Some(value),
					Term::Id(Id::Blank(id)) => {
						env.warn(Warning::BlankNodeIdProperty(id.to_string()));
					}
					_ => (),
				}

				// If active property equals `@reverse`, no entry may expand to
				// a keyword.
				if active_property == Keyword::Reverse && expanded_key.is_keyword() {
					return Err(Error::InvalidReversePropertyMap);
				}

				expanded_entries.push(ExpandedEntry(key, expanded_key, value))
			}

			if let Some(list_entry) = list_entry {
				// List objects.
				let mut index = None;
				for ExpandedEntry(_, expanded_key, value) in expanded_entries {
					match expanded_key {
						Term::Keyword(Keyword::Index) => match value.as_str() {
							Some(value) => index = Some(value.to_owned()),
							None => return Err(Error::InvalidIndexValue),
						},
						Term::Keyword(Keyword::List) => (),
						_ => return Err(Error::InvalidSetOrListObject),
					}
				}

				let mut result = Vec::new();
				for item in force_as_array(list_entry) {
					let e = Box::pin(expand_element(
						env,
						&active_context,
						active_property,
						item,
						base_url,
						options,
						false,
					))
					.await?;
					result.extend(e)
				}

				Ok(Expanded::Object(Indexed::new(
					Object::List(List::new(result)),
					index,
				)))
			} else if let Some(set_entry) = set_entry {
				// Set objects.
				for ExpandedEntry(_, expanded_key, _) in expanded_entries {
					match expanded_key {
						Term::Keyword(Keyword::Index) | Term::Keyword(Keyword::Set) => (),
						_ => return Err(Error::InvalidSetOrListObject),
					}
				}

				Box::pin(expand_element(
					env,
					&active_context,
					active_property,
					set_entry,
					base_url,
					options,
					false,
				))
				.await
			} else if let Some(value_entry) = value_entry {
				// Value objects.
				let expanded_value = expand_value(
					env,
					input_type,
					type_scoped_context,
					expanded_entries,
					value_entry,
					options,
				)?;

				match expanded_value {
					// Free floating values are dropped.
					Some(value) if !active_property.is_top_level() => Ok(Expanded::Object(value)),
					_ => Ok(Expanded::Null),
				}
			} else {
				// Node objects.
				let e = expand_node(
					env,
					&active_context,
					type_scoped_context,
					active_property,
					expanded_entries,
					base_url,
					options,
				)
				.await?;

				match e {
					Some(result) => Ok(Expanded::Object(result.cast::<Object>())),
					None => Ok(Expanded::Null),
				}
			}
		}
		scalar => {
			// If `active_property` is `null` or `@graph`, drop the free-floating
			// scalar by returning null.
			if active_property.is_top_level() {
				return Ok(Expanded::Null);
			}

			let scoped = match property_scoped_term {
				Some(term) => {
					active_context
						.process_scoped(env, definer, term, options.into())
						.await?
				}
				None => None,
			};

			let active_context = match scoped {
				Some(scoped) => Mown::Owned(scoped),
				None => Mown::Borrowed(active_context),
			};

			Ok(Expanded::Object(expand_literal(
				env,
				&active_context,
				active_property,
				Literal::Given(scalar),
			)))
		}
	}
}
