//! Flattening algorithm and node map generation.
//!
//! See: <https://www.w3.org/TR/json-ld11-api/#flattening-algorithms>
use crate::{syntax::ErrorCode, BlankIdGenerator, ExpandedDocument, Id, IndexedNode};

mod builder;
mod embed;
mod node_map;

pub use embed::embed_blanks;
pub use node_map::*;

use builder::NodeMapBuilder;

/// Conflicting indexes error.
///
/// Raised when a single node is declared with two different indexes.
#[derive(Clone, Debug, thiserror::Error)]
#[error("index `{defined_index}` of node `{node_id}` conflicts with index `{conflicting_index}`")]
pub struct ConflictingIndexes {
	pub node_id: Id,
	pub defined_index: String,
	pub conflicting_index: String,
}

impl ConflictingIndexes {
	pub fn code(&self) -> ErrorCode {
		ErrorCode::ConflictingIndexes
	}
}

/// Flattened document: top-level node objects, named graphs being nodes
/// with a `@graph` entry.
pub type FlattenedDocument = Vec<IndexedNode>;

/// Document flattening.
pub trait Flatten {
	/// Generates the node map of the document.
	///
	/// Blank node identifiers are relabeled with `generator`, and nodes
	/// without identifier are assigned a fresh one.
	fn generate_node_map_with(
		&self,
		generator: &mut BlankIdGenerator,
	) -> Result<NodeMap, ConflictingIndexes>;

	fn flatten_with(
		&self,
		generator: &mut BlankIdGenerator,
		ordered: bool,
	) -> Result<FlattenedDocument, ConflictingIndexes> {
		Ok(self.generate_node_map_with(generator)?.flatten(ordered))
	}

	/// Flattens the document with a fresh `_:b0`, `_:b1`, ... generator.
	fn flatten(&self, ordered: bool) -> Result<FlattenedDocument, ConflictingIndexes> {
		self.flatten_with(&mut BlankIdGenerator::new(), ordered)
	}
}

impl Flatten for ExpandedDocument {
	fn generate_node_map_with(
		&self,
		generator: &mut BlankIdGenerator,
	) -> Result<NodeMap, ConflictingIndexes> {
		let mut builder = NodeMapBuilder::new(generator);

		for object in self {
			builder.extend_node_map(object, None)?;
		}

		Ok(builder.end())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{IntoJson, Node, Object};
	use serde_json::json;
	use static_iref::iri;

	fn id(s: &str) -> Id {
		Id::from_string(s.to_owned())
	}

	fn node(id_str: &str, property: Option<(&str, Node)>) -> crate::IndexedObject {
		let mut node = Node::with_id(id(id_str));
		if let Some((p, value)) = property {
			node.insert(id(p), Object::from(value).into());
		}

		Object::from(node).into()
	}

	#[test]
	fn nested_nodes_are_lifted() {
		let p = "http://x/p";
		let c = Node::with_id(id("http://x/c"));
		let mut b = Node::with_id(id("http://x/b"));
		b.insert(id(p), Object::from(c).into());
		let document: ExpandedDocument = vec![node("http://x/a", Some((p, b)))];

		let flattened = document.flatten(true).unwrap();
		let ids: Vec<_> = flattened.iter().filter_map(|n| n.id.as_ref()).map(Id::as_str).collect();
		assert_eq!(ids, ["http://x/a", "http://x/b"]);

		assert_eq!(
			flattened.into_json(),
			json!([
				{ "@id": "http://x/a", "http://x/p": [{ "@id": "http://x/b" }] },
				{ "@id": "http://x/b", "http://x/p": [{ "@id": "http://x/c" }] }
			])
		)
	}

	#[test]
	fn blank_nodes_are_relabeled() {
		let mut anonymous = Node::new();
		anonymous.insert(
			id("http://x/q"),
			Object::from(crate::ValueObject::string("v")).into(),
		);
		let document: ExpandedDocument = vec![
			node("_:x", Some(("http://x/p", anonymous))),
			node("_:x", None),
		];

		let flattened = document.flatten(false).unwrap();
		assert_eq!(
			flattened.into_json(),
			json!([
				{ "@id": "_:b0", "http://x/p": [{ "@id": "_:b1" }] },
				{ "@id": "_:b1", "http://x/q": [{ "@value": "v" }] }
			])
		)
	}

	#[test]
	fn conflicting_indexes() {
		let a = Node::with_id(Id::Iri(iri!("http://x/a").to_owned()));
		let document: ExpandedDocument = vec![
			crate::Indexed::new(Object::from(a.clone()), Some("1".to_owned())),
			crate::Indexed::new(Object::from(a), Some("2".to_owned())),
		];

		let error = document.flatten(false).unwrap_err();
		assert_eq!(error.code(), ErrorCode::ConflictingIndexes)
	}

	#[test]
	fn named_graphs() {
		let mut inner = Node::with_id(id("http://x/s"));
		inner.insert(id("http://x/p"), Object::from(crate::ValueObject::string("o")).into());
		let graph = Node::new_graph(Some(id("http://x/g")), vec![Object::from(inner).into()]);
		let document: ExpandedDocument = vec![Object::from(graph).into()];

		let flattened = document.flatten(true).unwrap();
		assert_eq!(
			flattened.into_json(),
			json!([{
				"@id": "http://x/g",
				"@graph": [{ "@id": "http://x/s", "http://x/p": [{ "@value": "o" }] }]
			}])
		)
	}
}
