//! Re-embedding of blank nodes in flattened JSON-LD.
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::syntax::Keyword;

const ANNOTATION: &str = "@annotation";

/// Embeds every blank node referenced exactly once into its referrer.
///
/// `document` is flattened JSON-LD, either an array of nodes, a single
/// node, or an object with a `@graph` entry (possibly compacted, but
/// without `@id`/`@graph` aliases). The embedded copy loses its `@id`, and
/// blank nodes referenced zero or several times stay top-level. Named
/// graphs come first and are left untouched.
pub fn embed_blanks(document: Value) -> Value {
	let graph = Keyword::Graph.into_str();
	match document {
		Value::Array(items) => Value::Array(embed_items(items)),
		Value::Object(mut map) => match map.remove(graph) {
			Some(items) => {
				let items = match items {
					Value::Array(items) => items,
					other => vec![other],
				};

				map.insert(graph.to_owned(), Value::Array(embed_items(items)));
				Value::Object(map)
			}
			None => {
				let mut items = embed_items(vec![Value::Object(map)]);
				match items.len() {
					1 => items.remove(0),
					_ => Value::Array(items),
				}
			}
		},
		other => other,
	}
}

fn embed_items(items: Vec<Value>) -> Vec<Value> {
	let graph = Keyword::Graph.into_str();
	let (graphs, nodes): (Vec<_>, Vec<_>) = items
		.into_iter()
		.partition(|item| item.get(graph).is_some());

	let mut index = Index::default();
	for node in &nodes {
		index.visit(node, true)
	}

	let embeddable: HashSet<String> = index
		.refs
		.iter()
		.filter(|(id, count)| **count == 1 && id.starts_with("_:") && index.nodes.contains_key(*id))
		.map(|(id, _)| id.clone())
		.collect();

	let mut placed = HashSet::new();
	let mut result = graphs;
	for (id, node) in &index.nodes {
		if !embeddable.contains(id) {
			placed.insert(id.clone());
			result.push(index.embed(node, &embeddable, &mut placed))
		}
	}

	// Blank nodes only referenced from within their own cycle.
	for (id, node) in &index.nodes {
		if !placed.contains(id) {
			placed.insert(id.clone());
			result.push(index.embed(node, &embeddable, &mut placed))
		}
	}

	for node in nodes.iter().filter(|node| node_id(node).is_none()) {
		result.push(index.embed(node, &embeddable, &mut placed))
	}

	result
}

fn node_id(value: &Value) -> Option<&str> {
	value.get(Keyword::Id.into_str()).and_then(Value::as_str)
}

/// Checks if the object only references a node.
fn is_reference(map: &Map<String, Value>) -> bool {
	let expected = if map.contains_key(ANNOTATION) { 2 } else { 1 };
	map.len() == expected && map.contains_key(Keyword::Id.into_str())
}

#[derive(Default)]
struct Index {
	/// Top-level nodes with an identifier, in document order.
	nodes: IndexMap<String, Value>,

	/// Number of references to each identifier.
	refs: HashMap<String, usize>,
}

impl Index {
	fn visit(&mut self, value: &Value, top_level: bool) {
		match value {
			Value::Array(items) => {
				for item in items {
					self.visit(item, false)
				}
			}
			Value::Object(map) => {
				if let Some(id) = node_id(value) {
					if top_level {
						self.nodes.insert(id.to_owned(), value.clone());
					} else if is_reference(map) {
						*self.refs.entry(id.to_owned()).or_default() += 1
					}
				}

				for v in map.values() {
					self.visit(v, false)
				}
			}
			_ => (),
		}
	}

	/// Copies `value`, replacing references to embeddable nodes by the
	/// nodes themselves.
	///
	/// Each node is placed once: a node already emitted or embedded stays a
	/// reference.
	fn embed(
		&self,
		value: &Value,
		embeddable: &HashSet<String>,
		placed: &mut HashSet<String>,
	) -> Value {
		let id_key = Keyword::Id.into_str();
		match value {
			Value::Array(items) => Value::Array(
				items
					.iter()
					.map(|item| self.embed(item, embeddable, placed))
					.collect(),
			),
			Value::Object(map) => {
				let target = node_id(value)
					.filter(|id| is_reference(map) && embeddable.contains(*id) && !placed.contains(*id))
					.and_then(|id| Some((id, self.nodes.get(id)?.as_object()?)));

				match target {
					Some((id, node)) => {
						placed.insert(id.to_owned());
						let mut result: Map<String, Value> = map
							.iter()
							.filter(|(key, _)| *key != id_key)
							.map(|(key, v)| (key.clone(), v.clone()))
							.collect();
						for (key, v) in node.iter().filter(|(key, _)| *key != id_key) {
							result.insert(key.clone(), self.embed(v, embeddable, placed));
						}
						Value::Object(result)
					}
					None => Value::Object(
						map.iter()
							.map(|(key, v)| (key.clone(), self.embed(v, embeddable, placed)))
							.collect(),
					),
				}
			}
			other => other.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn single_references_are_embedded() {
		let flattened = json!({
			"@context": { "@vocab": "http://x/" },
			"@graph": [
				{ "@id": "_:b0", "name": "B", "knows": { "@id": "_:b1" } },
				{ "@id": "_:b1", "name": "C" },
				{ "@id": "_:shared", "name": "S" },
				{ "@id": "http://x/a", "knows": [{ "@id": "_:b0" }, { "@id": "_:shared" }] },
				{ "@id": "http://x/d", "knows": { "@id": "_:shared" } }
			]
		});

		assert_eq!(
			embed_blanks(flattened),
			json!({
				"@context": { "@vocab": "http://x/" },
				"@graph": [
					{ "@id": "_:shared", "name": "S" },
					{
						"@id": "http://x/a",
						"knows": [
							{ "name": "B", "knows": { "name": "C" } },
							{ "@id": "_:shared" }
						]
					},
					{ "@id": "http://x/d", "knows": { "@id": "_:shared" } }
				]
			})
		)
	}

	#[test]
	fn cycles_and_graphs_are_kept() {
		let flattened = json!([
			{ "@id": "http://x/g", "@graph": [{ "@id": "_:x", "p": "v" }] },
			{ "@id": "_:a", "next": { "@id": "_:b" } },
			{ "@id": "_:b", "next": { "@id": "_:a" } }
		]);

		let embedded = embed_blanks(flattened);
		let items = embedded.as_array().unwrap();
		assert_eq!(items[0]["@id"], "http://x/g");
		assert_eq!(items.len(), 2);
		assert_eq!(items[1], json!({ "@id": "_:a", "next": { "next": { "@id": "_:a" } } }))
	}

	#[test]
	fn annotations_stay_on_the_reference() {
		let flattened = json!([
			{ "@id": "_:b", "name": "B" },
			{ "@id": "http://x/a", "knows": { "@id": "_:b", "@annotation": { "by": "me" } } }
		]);

		assert_eq!(
			embed_blanks(flattened),
			json!([{
				"@id": "http://x/a",
				"knows": { "@annotation": { "by": "me" }, "name": "B" }
			}])
		)
	}
}
