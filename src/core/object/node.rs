use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{IndexedObject, IntoJson, Object};
use crate::{syntax::Keyword, Id, Indexed};

/// Properties of a node object, from property to values.
pub type Properties = IndexMap<Id, Vec<IndexedObject>>;

/// Reverse properties of a node object.
pub type ReverseProperties = IndexMap<Id, Vec<IndexedNode>>;

pub type Graph = Vec<IndexedObject>;

pub type Included = Vec<IndexedNode>;

pub type IndexedNode = Indexed<Node>;

/// Node object.
///
/// A node object represents zero or more properties of a node in the graph
/// serialized by a JSON-LD document. A node is defined by its identifier
/// (`@id` field), types, properties and reverse properties. In addition, a
/// node may represent a graph (`@graph` field) and include nodes
/// (`@included` field).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
	/// Identifier.
	///
	/// This is the `@id` field.
	pub id: Option<Id>,

	/// Types.
	///
	/// This is the `@type` field.
	pub types: Option<Vec<Id>>,

	/// Associated graph.
	///
	/// This is the `@graph` field.
	pub graph: Option<Graph>,

	/// Included nodes.
	///
	/// This is the `@included` field.
	pub included: Option<Included>,

	/// Properties.
	///
	/// Any non-keyword field.
	pub properties: Properties,

	/// Reverse properties.
	///
	/// This is the `@reverse` field.
	pub reverse_properties: Option<ReverseProperties>,
}

impl Node {
	/// Creates a new empty node.
	#[inline(always)]
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a new empty node with the given id.
	#[inline(always)]
	pub fn with_id(id: Id) -> Self {
		Self {
			id: Some(id),
			..Self::default()
		}
	}

	/// Creates a new graph node.
	pub fn new_graph(id: Option<Id>, graph: Graph) -> Self {
		Self {
			id,
			graph: Some(graph),
			..Self::default()
		}
	}

	pub fn types(&self) -> &[Id] {
		self.types.as_deref().unwrap_or_default()
	}

	/// Adds a type, unless already present.
	pub fn add_type(&mut self, ty: Id) {
		let types = self.types.get_or_insert_with(Vec::new);
		if !types.contains(&ty) {
			types.push(ty)
		}
	}

	/// Checks if the node has the given type.
	pub fn has_type(&self, ty: &Id) -> bool {
		self.types().contains(ty)
	}

	/// Checks if the node object has no other entry than `@id`.
	///
	/// Such a node is a reference to another node, or to itself when
	/// flattening.
	pub fn is_empty(&self) -> bool {
		self.types.is_none()
			&& self.graph.is_none()
			&& self.included.is_none()
			&& self.properties.is_empty()
			&& self.reverse_properties.is_none()
	}

	/// Checks if this node is a node reference, a node object with only an
	/// `@id` entry.
	pub fn is_reference(&self) -> bool {
		self.id.is_some() && self.is_empty()
	}

	/// Checks if this node is a graph object.
	///
	/// A graph object has a `@graph` entry, and may have an `@id` and
	/// `@index` entry, but nothing else.
	pub fn is_graph(&self) -> bool {
		self.graph.is_some()
			&& self.types.is_none()
			&& self.included.is_none()
			&& self.properties.is_empty()
			&& self.reverse_properties.is_none()
	}

	/// Checks if this node is a simple graph object, a graph object without
	/// `@id`.
	pub fn is_simple_graph(&self) -> bool {
		self.id.is_none() && self.is_graph()
	}

	/// Returns the values of the given property.
	pub fn get(&self, prop: &Id) -> &[IndexedObject] {
		self.properties.get(prop).map(Vec::as_slice).unwrap_or_default()
	}

	/// Adds a value to the given property.
	pub fn insert(&mut self, prop: Id, value: IndexedObject) {
		self.properties.entry(prop).or_default().push(value)
	}

	/// Adds a value to the given property, unless an equal value is
	/// already present.
	pub fn insert_unique(&mut self, prop: Id, value: IndexedObject) {
		let values = self.properties.entry(prop).or_default();
		if !values.contains(&value) {
			values.push(value)
		}
	}

	/// Adds the given values to the given property.
	pub fn insert_all(&mut self, prop: Id, values: impl IntoIterator<Item = IndexedObject>) {
		self.properties.entry(prop).or_default().extend(values)
	}

	/// Adds a value to the given reverse property.
	pub fn insert_reverse(&mut self, prop: Id, node: IndexedNode) {
		self.reverse_properties
			.get_or_insert_with(ReverseProperties::new)
			.entry(prop)
			.or_default()
			.push(node)
	}

	/// Adds a node to the included nodes.
	pub fn insert_included(&mut self, node: IndexedNode) {
		self.included.get_or_insert_with(Vec::new).push(node)
	}

	/// Adds an object to the graph of this node.
	pub fn insert_graph(&mut self, object: IndexedObject) {
		self.graph.get_or_insert_with(Vec::new).push(object)
	}
}

impl From<Node> for Object {
	fn from(node: Node) -> Self {
		Object::Node(Box::new(node))
	}
}

impl IntoJson for Node {
	fn into_json(self) -> Value {
		let mut map = Map::new();

		if let Some(id) = self.id {
			map.insert(
				Keyword::Id.into_str().to_owned(),
				Value::String(id.into_string()),
			);
		}

		if let Some(types) = self.types {
			map.insert(
				Keyword::Type.into_str().to_owned(),
				Value::Array(
					types
						.into_iter()
						.map(|t| Value::String(t.into_string()))
						.collect(),
				),
			);
		}

		if let Some(graph) = self.graph {
			map.insert(Keyword::Graph.into_str().to_owned(), graph.into_json());
		}

		if let Some(included) = self.included {
			map.insert(Keyword::Included.into_str().to_owned(), included.into_json());
		}

		if let Some(reverse) = self.reverse_properties {
			let mut reverse_map = Map::new();
			for (prop, nodes) in reverse {
				reverse_map.insert(prop.into_string(), nodes.into_json());
			}

			map.insert(
				Keyword::Reverse.into_str().to_owned(),
				Value::Object(reverse_map),
			);
		}

		for (prop, values) in self.properties {
			map.insert(prop.into_string(), values.into_json());
		}

		Value::Object(map)
	}
}
