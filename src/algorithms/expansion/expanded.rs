use crate::IndexedObject;

/// Result of the expansion of a single element.
pub enum Expanded {
	Null,
	Object(IndexedObject),
	Array(Vec<IndexedObject>),
}

impl Expanded {
	pub fn len(&self) -> usize {
		match self {
			Expanded::Null => 0,
			Expanded::Object(_) => 1,
			Expanded::Array(ary) => ary.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Expanded::Null)
	}

	pub fn is_list(&self) -> bool {
		match self {
			Expanded::Object(o) => o.is_list(),
			_ => false,
		}
	}

	pub fn iter(&self) -> std::slice::Iter<IndexedObject> {
		match self {
			Expanded::Null => [].iter(),
			Expanded::Object(o) => std::slice::from_ref(o).iter(),
			Expanded::Array(ary) => ary.iter(),
		}
	}
}

impl IntoIterator for Expanded {
	type Item = IndexedObject;
	type IntoIter = std::vec::IntoIter<IndexedObject>;

	fn into_iter(self) -> Self::IntoIter {
		match self {
			Expanded::Null => Vec::new().into_iter(),
			Expanded::Object(o) => vec![o].into_iter(),
			Expanded::Array(ary) => ary.into_iter(),
		}
	}
}

impl<'a> IntoIterator for &'a Expanded {
	type Item = &'a IndexedObject;
	type IntoIter = std::slice::Iter<'a, IndexedObject>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl From<IndexedObject> for Expanded {
	fn from(obj: IndexedObject) -> Expanded {
		Expanded::Object(obj)
	}
}

impl From<Vec<IndexedObject>> for Expanded {
	fn from(list: Vec<IndexedObject>) -> Expanded {
		Expanded::Array(list)
	}
}
