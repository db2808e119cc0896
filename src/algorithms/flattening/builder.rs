use super::{ConflictingIndexes, NodeMap};
use crate::{object::List, BlankIdGenerator, Id, Indexed, IndexedObject, Node, Object};

/// Node map generation.
///
/// Blank node identifiers are relabeled while traversing the document.
pub(crate) struct NodeMapBuilder<'g> {
	generator: &'g mut BlankIdGenerator,
	node_map: NodeMap,
}

impl<'g> NodeMapBuilder<'g> {
	pub fn new(generator: &'g mut BlankIdGenerator) -> Self {
		Self {
			generator,
			node_map: NodeMap::new(),
		}
	}

	pub fn end(self) -> NodeMap {
		self.node_map
	}

	fn assign(&mut self, id: &Id) -> Id {
		match id {
			Id::Blank(b) => Id::Blank(self.generator.relabel(b.as_str())),
			id => id.clone(),
		}
	}

	/// Adds the nodes of `object` to `graph`.
	///
	/// Returns the flattened version of `object`, where nodes are replaced
	/// by references.
	pub fn extend_node_map(
		&mut self,
		object: &IndexedObject,
		graph: Option<&Id>,
	) -> Result<IndexedObject, ConflictingIndexes> {
		match object.inner() {
			Object::Value(_) => Ok(object.clone()),
			Object::List(list) => {
				let mut items = Vec::with_capacity(list.len());
				for item in list {
					items.push(self.extend_node_map(item, graph)?)
				}

				Ok(Indexed::new(
					Object::List(List::new(items)),
					object.index().map(ToOwned::to_owned),
				))
			}
			Object::Node(node) => {
				let id = self.extend_node_map_from_node(node, object.index(), graph)?;
				Ok(Indexed::unindexed(Object::reference(id)))
			}
		}
	}

	/// Adds `node` and its descendants to `graph`, returning the node
	/// identifier.
	pub fn extend_node_map_from_node(
		&mut self,
		node: &Node,
		index: Option<&str>,
		graph: Option<&Id>,
	) -> Result<Id, ConflictingIndexes> {
		let id = match &node.id {
			Some(id) => self.assign(id),
			None => Id::Blank(self.generator.next_blank_id()),
		};

		let types: Vec<_> = node.types().iter().map(|ty| self.assign(ty)).collect();

		let flat_node = self
			.node_map
			.declare_graph(graph)
			.declare_node(id.clone(), index)?;
		for ty in types {
			flat_node.add_type(ty)
		}

		if let Some(reverse_properties) = &node.reverse_properties {
			for (prop, subjects) in reverse_properties {
				let prop = self.assign(prop);
				for subject in subjects {
					let subject_id =
						self.extend_node_map_from_node(subject, subject.index(), graph)?;
					self.node_map
						.declare_graph(graph)
						.node_entry(subject_id)
						.insert_unique(prop.clone(), Indexed::unindexed(Object::reference(id.clone())))
				}
			}
		}

		if let Some(graph_entry) = &node.graph {
			self.node_map.declare_graph(Some(&id));
			for object in graph_entry {
				self.extend_node_map(object, Some(&id))?;
			}
		}

		if let Some(included) = &node.included {
			for included_node in included {
				self.extend_node_map_from_node(included_node, included_node.index(), graph)?;
			}
		}

		for (prop, values) in &node.properties {
			let prop = self.assign(prop);

			self.node_map
				.declare_graph(graph)
				.node_entry(id.clone())
				.properties
				.entry(prop.clone())
				.or_default();

			for value in values {
				let flat_value = self.extend_node_map(value, graph)?;
				let flat_node = self.node_map.declare_graph(graph).node_entry(id.clone());
				if flat_value.is_list() {
					flat_node.insert(prop.clone(), flat_value)
				} else {
					flat_node.insert_unique(prop.clone(), flat_value)
				}
			}
		}

		Ok(id)
	}
}
