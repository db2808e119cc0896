//! Compaction algorithm.
//!
//! See: <https://www.w3.org/TR/json-ld11-api/#compaction-algorithms>
use serde_json::{Map, Value};

use crate::{
	algorithms::ProcessingEnvironment,
	context::inverse::{LangSelection, TypeSelection},
	object::AnyObject,
	Context, Indexed, TermDefinition,
};

mod collection;
mod document;
mod error;
mod iri;
mod node;
mod object;
mod options;
mod property;
mod value;

pub use document::*;
pub use error::*;
pub use iri::IriCompaction;
pub use options::*;

/// Compactor.
///
/// Compaction state: active context, type-scoped context and active
/// property.
#[derive(Clone, Copy)]
pub(crate) struct Compactor<'a> {
	pub options: CompactionOptions,
	pub active_context: &'a Context,
	pub type_scoped_context: &'a Context,
	pub active_property: Option<&'a str>,
}

impl<'a> Compactor<'a> {
	pub fn new(active_context: &'a Context, options: CompactionOptions) -> Self {
		Self {
			options,
			active_context,
			type_scoped_context: active_context,
			active_property: None,
		}
	}

	pub fn with_active_context<'b>(&'b self, active_context: &'b Context) -> Compactor<'b> {
		Compactor {
			options: self.options,
			active_context,
			type_scoped_context: self.type_scoped_context,
			active_property: self.active_property,
		}
	}

	pub fn with_type_scoped_context<'b>(
		&'b self,
		type_scoped_context: &'b Context,
	) -> Compactor<'b> {
		Compactor {
			options: self.options,
			active_context: self.active_context,
			type_scoped_context,
			active_property: self.active_property,
		}
	}

	pub fn with_active_property<'b>(&'b self, active_property: Option<&'b str>) -> Compactor<'b> {
		Compactor {
			options: self.options,
			active_context: self.active_context,
			type_scoped_context: self.type_scoped_context,
			active_property,
		}
	}

	/// Definition of the active property in the active context.
	pub fn active_property_definition(&self) -> Option<&'a TermDefinition> {
		self.active_property
			.and_then(|property| self.active_context.get(property))
	}
}

trait CompactFragment {
	#[allow(async_fn_in_trait)]
	async fn compact_fragment(
		&self,
		env: &mut impl ProcessingEnvironment,
		compactor: &Compactor<'_>,
	) -> Result<Value, Error>;
}

enum TypeLangValue {
	Type(TypeSelection),
	Lang(LangSelection),
}

/// Type that can be compacted with an index.
trait CompactIndexedFragment {
	#[allow(async_fn_in_trait)]
	async fn compact_indexed_fragment(
		&self,
		env: &mut impl ProcessingEnvironment,
		compactor: &Compactor<'_>,
		index: Option<&str>,
	) -> Result<Value, Error>;
}

impl<T: CompactIndexedFragment> CompactFragment for Indexed<T> {
	async fn compact_fragment(
		&self,
		env: &mut impl ProcessingEnvironment,
		compactor: &Compactor<'_>,
	) -> Result<Value, Error> {
		self.inner()
			.compact_indexed_fragment(env, compactor, self.index())
			.await
	}
}

impl<T: AnyObject> CompactIndexedFragment for T {
	async fn compact_indexed_fragment(
		&self,
		env: &mut impl ProcessingEnvironment,
		compactor: &Compactor<'_>,
		index: Option<&str>,
	) -> Result<Value, Error> {
		compactor.compact_any_indexed_object(env, self, index).await
	}
}

/// Adds `value` to the `key` entry of `map`.
///
/// Arrays are merged into the entry. If `as_array` is set, the entry is
/// always an array.
pub(crate) fn add_value(map: &mut Map<String, Value>, key: &str, value: Value, as_array: bool) {
	match map.get_mut(key) {
		Some(entry) if !entry.is_array() => {
			let single = entry.take();
			*entry = Value::Array(vec![single])
		}
		None if as_array => {
			map.insert(key.to_owned(), Value::Array(Vec::new()));
		}
		_ => (),
	}

	match value {
		Value::Array(values) => {
			for value in values {
				add_value(map, key, value, false)
			}
		}
		value => match map.get_mut(key) {
			Some(Value::Array(array)) => array.push(value),
			_ => {
				map.insert(key.to_owned(), value);
			}
		},
	}
}

#[cfg(test)]
mod tests;
