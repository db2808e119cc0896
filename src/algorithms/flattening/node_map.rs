use indexmap::IndexMap;

use super::{ConflictingIndexes, FlattenedDocument};
use crate::{Id, Indexed, IndexedNode, Node, Object};

/// Node map.
///
/// Every node of a document, identified and grouped by graph. Values of
/// node properties are either value objects, list objects or references to
/// other nodes of the map.
#[derive(Debug, Default, Clone)]
pub struct NodeMap {
	graphs: IndexMap<Id, NodeMapGraph>,
	default_graph: NodeMapGraph,
}

impl NodeMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn default_graph(&self) -> &NodeMapGraph {
		&self.default_graph
	}

	/// Returns the given graph, `None` designating the default graph.
	pub fn graph(&self, id: Option<&Id>) -> Option<&NodeMapGraph> {
		match id {
			Some(id) => self.graphs.get(id),
			None => Some(&self.default_graph),
		}
	}

	pub fn graph_mut(&mut self, id: Option<&Id>) -> Option<&mut NodeMapGraph> {
		match id {
			Some(id) => self.graphs.get_mut(id),
			None => Some(&mut self.default_graph),
		}
	}

	/// Returns the given graph, declaring it if necessary.
	pub fn declare_graph(&mut self, id: Option<&Id>) -> &mut NodeMapGraph {
		match id {
			Some(id) => self.graphs.entry(id.clone()).or_default(),
			None => &mut self.default_graph,
		}
	}

	/// Named graphs, in declaration order.
	pub fn named_graphs(&self) -> impl Iterator<Item = (&Id, &NodeMapGraph)> {
		self.graphs.iter()
	}

	/// Iterates over all the graphs, starting with the default graph.
	pub fn iter(&self) -> impl Iterator<Item = (Option<&Id>, &NodeMapGraph)> {
		std::iter::once((None, &self.default_graph))
			.chain(self.graphs.iter().map(|(id, g)| (Some(id), g)))
	}

	/// Turns the node map into a flattened document.
	///
	/// Each named graph becomes the `@graph` entry of the default graph
	/// node with the same identifier. Nodes with no other entry than `@id`
	/// are omitted. If `ordered` is set, graphs and nodes are sorted by
	/// identifier.
	pub fn flatten(self, ordered: bool) -> FlattenedDocument {
		let mut default_graph = self.default_graph;
		let mut graphs: Vec<_> = self.graphs.into_iter().collect();
		if ordered {
			graphs.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()))
		}

		for (id, graph) in graphs {
			let nodes = graph
				.into_flattened_nodes(ordered)
				.into_iter()
				.map(Indexed::cast::<Object>)
				.collect();
			default_graph.node_entry(id).graph = Some(nodes)
		}

		default_graph.into_flattened_nodes(ordered)
	}
}

/// Nodes of a single graph of a node map.
#[derive(Debug, Default, Clone)]
pub struct NodeMapGraph {
	nodes: IndexMap<Id, IndexedNode>,
}

impl NodeMapGraph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn contains(&self, id: &Id) -> bool {
		self.nodes.contains_key(id)
	}

	pub fn get(&self, id: &Id) -> Option<&IndexedNode> {
		self.nodes.get(id)
	}

	pub fn get_mut(&mut self, id: &Id) -> Option<&mut IndexedNode> {
		self.nodes.get_mut(id)
	}

	/// Returns the node with the given identifier, creating it if
	/// necessary.
	pub fn node_entry(&mut self, id: Id) -> &mut IndexedNode {
		self.nodes
			.entry(id)
			.or_insert_with_key(|id| Indexed::unindexed(Node::with_id(id.clone())))
	}

	/// Declares a node, with the given index.
	///
	/// Fails if the node is already declared with a different index.
	pub fn declare_node(
		&mut self,
		id: Id,
		index: Option<&str>,
	) -> Result<&mut IndexedNode, ConflictingIndexes> {
		let node_id = id.clone();
		let node = self.node_entry(id);

		if let Some(index) = index {
			match node.index() {
				Some(current) if current != index => {
					return Err(ConflictingIndexes {
						node_id,
						defined_index: current.to_owned(),
						conflicting_index: index.to_owned(),
					})
				}
				Some(_) => (),
				None => node.set_index(Some(index.to_owned())),
			}
		}

		Ok(node)
	}

	pub fn nodes(&self) -> impl Iterator<Item = (&Id, &IndexedNode)> {
		self.nodes.iter()
	}

	pub fn into_nodes(self) -> impl Iterator<Item = IndexedNode> {
		self.nodes.into_values()
	}

	/// Nodes of the graph, without the ones carrying only an identifier.
	fn into_flattened_nodes(self, ordered: bool) -> Vec<IndexedNode> {
		let mut nodes: Vec<_> = self
			.nodes
			.into_iter()
			.filter(|(_, node)| !node.is_empty() || node.index().is_some())
			.collect();

		if ordered {
			nodes.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()))
		}

		nodes.into_iter().map(|(_, node)| node).collect()
	}
}

impl<'a> IntoIterator for &'a NodeMap {
	type Item = (Option<&'a Id>, &'a NodeMapGraph);
	type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

	fn into_iter(self) -> Self::IntoIter {
		Box::new(self.iter())
	}
}
