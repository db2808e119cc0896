use serde_json::Value;

use super::{IndexedObject, IntoJson};
use crate::syntax::Keyword;

/// List object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct List {
	entry: Vec<IndexedObject>,
}

impl List {
	/// Creates a new list object.
	pub fn new(objects: Vec<IndexedObject>) -> Self {
		Self { entry: objects }
	}

	pub fn len(&self) -> usize {
		self.entry.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entry.is_empty()
	}

	/// Returns a reference to the "@list" entry of the list object.
	pub fn entry(&self) -> &[IndexedObject] {
		&self.entry
	}

	pub fn entry_mut(&mut self) -> &mut Vec<IndexedObject> {
		&mut self.entry
	}

	pub fn into_entry(self) -> Vec<IndexedObject> {
		self.entry
	}

	pub fn push(&mut self, object: IndexedObject) {
		self.entry.push(object)
	}

	pub fn iter(&self) -> std::slice::Iter<IndexedObject> {
		self.entry.iter()
	}
}

impl<'a> IntoIterator for &'a List {
	type Item = &'a IndexedObject;
	type IntoIter = std::slice::Iter<'a, IndexedObject>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl IntoIterator for List {
	type Item = IndexedObject;
	type IntoIter = std::vec::IntoIter<IndexedObject>;

	fn into_iter(self) -> Self::IntoIter {
		self.entry.into_iter()
	}
}

impl IntoJson for List {
	fn into_json(self) -> Value {
		let mut map = serde_json::Map::new();
		map.insert(
			Keyword::List.into_str().to_owned(),
			Value::Array(self.entry.into_iter().map(IntoJson::into_json).collect()),
		);
		Value::Object(map)
	}
}
