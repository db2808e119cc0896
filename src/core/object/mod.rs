//! Expanded JSON-LD objects.
//!
//! Expansion produces a list of indexed objects. Each object is either a
//! value object, a node object (possibly a graph object), or a list object.
use iref::Iri;
use serde_json::Value;

use crate::{syntax::Keyword, Id, Indexed};

mod list;
pub mod node;
mod value;

pub use list::List;
pub use node::{IndexedNode, Node};
pub use value::{LangString, LiteralValue, ValueObject};

pub type IndexedObject = Indexed<Object>;

/// Result of the expansion algorithm.
pub type ExpandedDocument = Vec<IndexedObject>;

/// Object.
///
/// JSON-LD connects together multiple kinds of data objects.
/// Objects may be nodes, values or lists of other objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
	/// Value object.
	Value(ValueObject),

	/// Node object.
	Node(Box<Node>),

	/// List object.
	List(List),
}

impl Object {
	/// Creates a node object referencing the given identifier.
	pub fn reference(id: Id) -> Self {
		Self::Node(Box::new(Node::with_id(id)))
	}

	/// Creates a `null` value object.
	pub fn null() -> Self {
		Self::Value(ValueObject::null())
	}

	/// Identifier of the object, if it is a node object with an `@id`.
	pub fn id(&self) -> Option<&Id> {
		match self {
			Object::Node(n) => n.id.as_ref(),
			_ => None,
		}
	}

	#[inline(always)]
	pub fn is_value(&self) -> bool {
		matches!(self, Object::Value(_))
	}

	#[inline(always)]
	pub fn is_node(&self) -> bool {
		matches!(self, Object::Node(_))
	}

	#[inline(always)]
	pub fn is_list(&self) -> bool {
		matches!(self, Object::List(_))
	}

	/// Checks if the object is a graph object.
	pub fn is_graph(&self) -> bool {
		match self {
			Object::Node(n) => n.is_graph(),
			_ => false,
		}
	}

	pub fn as_value(&self) -> Option<&ValueObject> {
		match self {
			Object::Value(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_node(&self) -> Option<&Node> {
		match self {
			Object::Node(n) => Some(n),
			_ => None,
		}
	}

	pub fn as_node_mut(&mut self) -> Option<&mut Node> {
		match self {
			Object::Node(n) => Some(n),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&List> {
		match self {
			Object::List(l) => Some(l),
			_ => None,
		}
	}

	pub fn into_node(self) -> Option<Node> {
		match self {
			Object::Node(n) => Some(*n),
			_ => None,
		}
	}

	/// Datatype IRI of the object, if it is a typed value object.
	pub fn literal_type(&self) -> Option<&Iri> {
		self.as_value().and_then(ValueObject::literal_type)
	}
}

/// Borrowed object.
///
/// Common view over [`Object`] and [`Node`], the latter appearing alone in
/// reverse properties and included nodes.
#[derive(Debug, Clone, Copy)]
pub enum Ref<'a> {
	Value(&'a ValueObject),
	Node(&'a Node),
	List(&'a List),
}

impl<'a> Ref<'a> {
	pub fn id(&self) -> Option<&'a Id> {
		match self {
			Self::Node(n) => n.id.as_ref(),
			_ => None,
		}
	}

	pub fn is_value(&self) -> bool {
		matches!(self, Self::Value(_))
	}

	pub fn is_graph(&self) -> bool {
		match self {
			Self::Node(n) => n.is_graph(),
			_ => false,
		}
	}
}

/// Object or node.
pub trait AnyObject {
	fn as_object_ref(&self) -> Ref<'_>;
}

impl AnyObject for Object {
	fn as_object_ref(&self) -> Ref<'_> {
		match self {
			Self::Value(v) => Ref::Value(v),
			Self::Node(n) => Ref::Node(n),
			Self::List(l) => Ref::List(l),
		}
	}
}

impl AnyObject for Node {
	fn as_object_ref(&self) -> Ref<'_> {
		Ref::Node(self)
	}
}

impl From<ValueObject> for Object {
	fn from(value: ValueObject) -> Self {
		Self::Value(value)
	}
}

impl From<List> for Object {
	fn from(list: List) -> Self {
		Self::List(list)
	}
}

impl Indexed<Object> {
	/// Converts this object into an indexed node, or gives it back if it is
	/// not a node object.
	pub fn into_indexed_node(self) -> Result<IndexedNode, Self> {
		let (object, index) = self.into_parts();
		match object {
			Object::Node(node) => Ok(Indexed::new(*node, index)),
			other => Err(Indexed::new(other, index)),
		}
	}
}

impl From<IndexedNode> for IndexedObject {
	fn from(node: IndexedNode) -> Self {
		node.map_inner(Object::from)
	}
}

/// Conversion into the expanded JSON-LD representation.
pub trait IntoJson {
	fn into_json(self) -> Value;
}

impl IntoJson for Object {
	fn into_json(self) -> Value {
		match self {
			Object::Value(v) => v.into_json(),
			Object::Node(n) => n.into_json(),
			Object::List(l) => l.into_json(),
		}
	}
}

impl<T: IntoJson> IntoJson for Indexed<T> {
	fn into_json(self) -> Value {
		let (value, index) = self.into_parts();
		let mut json = value.into_json();

		if let (Some(index), Value::Object(map)) = (index, &mut json) {
			map.insert(Keyword::Index.into_str().to_owned(), Value::String(index));
		}

		json
	}
}

impl<T: IntoJson> IntoJson for Vec<T> {
	fn into_json(self) -> Value {
		Value::Array(self.into_iter().map(IntoJson::into_json).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use static_iref::iri;

	#[test]
	fn node_into_json() {
		let mut node = Node::with_id(Id::Iri(iri!("http://x/s").to_owned()));
		node.add_type(Id::Iri(iri!("http://x/T").to_owned()));
		node.insert(
			Id::Iri(iri!("http://x/p").to_owned()),
			Indexed::new(ValueObject::string("v").into(), Some("i".to_owned())),
		);
		node.insert(
			Id::Iri(iri!("http://x/q").to_owned()),
			Indexed::unindexed(Object::List(List::new(vec![Object::reference(Id::Iri(
				iri!("http://x/o").to_owned(),
			))
			.into()]))),
		);

		assert_eq!(
			Indexed::unindexed(Object::from(node)).into_json(),
			json!({
				"@id": "http://x/s",
				"@type": ["http://x/T"],
				"http://x/p": [{"@value": "v", "@index": "i"}],
				"http://x/q": [{"@list": [{"@id": "http://x/o"}]}]
			})
		)
	}

	#[test]
	fn graph_objects() {
		let graph = Node::new_graph(None, vec![Object::null().into()]);
		assert!(graph.is_simple_graph());

		let mut node = Node::with_id(Id::Iri(iri!("http://x/g").to_owned()));
		assert!(node.is_reference());
		node.insert_graph(Object::null().into());
		assert!(node.is_graph() && !node.is_simple_graph());
	}
}
