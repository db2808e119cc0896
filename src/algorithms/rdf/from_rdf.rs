use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde_json::Number;

use super::{Error, FromRdfOptions};
use crate::{
	object::{LangString, List, LiteralValue, ValueObject},
	rdf::{vocab, Dataset, Literal, RdfDirection, Value},
	Direction, ExpandedDocument, Id, Indexed, IndexedObject, LenientLangTagBuf, Node, Object,
};

/// Nodes of a graph, by identifier.
type NodeGraph = IndexMap<Id, Node>;

/// Position of a value in the graph map.
#[derive(Clone)]
struct Usage {
	graph: Option<Id>,
	subject: Id,
	property: Id,
	index: usize,
}

/// List chain found while walking back from `rdf:nil`.
struct Chain {
	head: Usage,

	/// List nodes, from the last one to the first one.
	nodes: Vec<Id>,
}

fn is(id: &Id, iri: &iref::Iri) -> bool {
	id.as_str() == iri.as_str()
}

/// Converts an RDF dataset into an expanded JSON-LD document.
///
/// Well-formed `rdf:first`/`rdf:rest` chains whose nodes are referenced
/// only once become list objects.
pub fn from_rdf(dataset: &Dataset, options: FromRdfOptions) -> Result<ExpandedDocument, Error> {
	let mut graph_map: IndexMap<Option<Id>, NodeGraph> = IndexMap::new();
	graph_map.insert(None, NodeGraph::new());

	let mut referenced_once: HashMap<Id, Option<Usage>> = HashMap::new();
	let mut nil_usages: Vec<Usage> = Vec::new();
	let mut compound_literal_subjects: IndexMap<Option<Id>, IndexSet<Id>> = IndexMap::new();

	for (name, graph) in dataset.graphs() {
		let name = name.cloned();

		if let Some(name) = &name {
			if let Some(default_graph) = graph_map.get_mut(&None::<Id>) {
				default_graph
					.entry(name.clone())
					.or_insert_with(|| Node::with_id(name.clone()));
			}
		}

		let node_map = graph_map.entry(name.clone()).or_default();
		let compounds = compound_literal_subjects.entry(name.clone()).or_default();

		for triple in graph {
			let subject = triple.subject();
			let property = triple.predicate();

			if !node_map.contains_key(subject) {
				node_map.insert(subject.clone(), Node::with_id(subject.clone()));
			}

			if options.rdf_direction == Some(RdfDirection::CompoundLiteral)
				&& is(property, vocab::RDF_DIRECTION)
			{
				compounds.insert(subject.clone());
			}

			if let Value::Id(object) = triple.object() {
				if !node_map.contains_key(object) {
					node_map.insert(object.clone(), Node::with_id(object.clone()));
				}

				if !options.use_rdf_type && is(property, vocab::RDF_TYPE) {
					if let Some(node) = node_map.get_mut(subject) {
						node.add_type(object.clone())
					}

					continue;
				}
			}

			let value = rdf_to_object(triple.object(), options)?;

			let Some(node) = node_map.get_mut(subject) else {
				continue;
			};

			let values = node.properties.entry(property.clone()).or_default();
			if values.contains(&value) {
				continue;
			}

			values.push(value);
			let usage = Usage {
				graph: name.clone(),
				subject: subject.clone(),
				property: property.clone(),
				index: values.len() - 1,
			};

			if let Value::Id(object) = triple.object() {
				if is(object, vocab::RDF_NIL) {
					nil_usages.push(usage)
				} else if let Some(entry) = referenced_once.get_mut(object) {
					*entry = None
				} else if object.is_blank() {
					referenced_once.insert(object.clone(), Some(usage));
				}
			}
		}
	}

	for (name, compounds) in compound_literal_subjects {
		for cl in compounds {
			if let Some(Some(usage)) = referenced_once.get(&cl) {
				rewrite_compound_literal(&mut graph_map, &name, &cl, usage)?
			}
		}
	}

	let chains: Vec<Chain> = nil_usages
		.into_iter()
		.map(|usage| walk_list(&graph_map, &referenced_once, usage))
		.collect();

	let mut done = vec![false; chains.len()];
	for i in 0..chains.len() {
		build_list(&mut graph_map, &chains, &mut done, i)
	}

	for chain in &chains {
		if let Some(graph) = graph_map.get_mut(&chain.head.graph) {
			for id in &chain.nodes {
				graph.shift_remove(id);
			}
		}
	}

	let mut default_graph = graph_map.shift_remove(&None::<Id>).unwrap_or_default();
	if options.ordered {
		default_graph.sort_by(|a, _, b, _| a.as_str().cmp(b.as_str()))
	}

	let mut result = Vec::new();
	for (subject, mut node) in default_graph {
		if let Some(graph) = graph_map.shift_remove(&Some(subject)) {
			node.graph = Some(into_objects(graph, options.ordered))
		}

		if !node.is_empty() {
			result.push(Indexed::unindexed(Object::from(node)))
		}
	}

	Ok(result)
}

fn into_objects(mut graph: NodeGraph, ordered: bool) -> Vec<IndexedObject> {
	if ordered {
		graph.sort_by(|a, _, b, _| a.as_str().cmp(b.as_str()))
	}

	graph
		.into_values()
		.filter(|node| !node.is_empty())
		.map(|node| Indexed::unindexed(Object::from(node)))
		.collect()
}

fn value_at<'a>(
	graph_map: &'a mut IndexMap<Option<Id>, NodeGraph>,
	usage: &Usage,
) -> Option<&'a mut IndexedObject> {
	graph_map
		.get_mut(&usage.graph)?
		.get_mut(&usage.subject)?
		.properties
		.get_mut(&usage.property)?
		.get_mut(usage.index)
}

/// Replaces the references to a compound literal node with the value object
/// it describes, and removes the node.
fn rewrite_compound_literal(
	graph_map: &mut IndexMap<Option<Id>, NodeGraph>,
	name: &Option<Id>,
	cl: &Id,
	usage: &Usage,
) -> Result<(), Error> {
	let Some(cl_node) = graph_map.get_mut(name).and_then(|g| g.shift_remove(cl)) else {
		return Ok(());
	};

	let first_string = |property: &iref::Iri| {
		cl_node
			.properties
			.iter()
			.find(|(p, _)| is(p, property))
			.and_then(|(_, values)| values.first())
			.and_then(|v| v.as_value())
			.and_then(ValueObject::as_str)
			.map(str::to_owned)
	};

	let value = first_string(vocab::RDF_VALUE).unwrap_or_default();

	let language = match first_string(vocab::RDF_LANGUAGE) {
		Some(language) => {
			let language = LenientLangTagBuf::new(language);
			if !language.is_well_formed() {
				return Err(Error::InvalidLanguageTaggedString(language.into_string()));
			}
			Some(language)
		}
		None => None,
	};

	let direction = match first_string(vocab::RDF_DIRECTION) {
		Some(direction) => Some(
			direction
				.parse::<Direction>()
				.map_err(|e| Error::InvalidBaseDirection(e.0))?,
		),
		None => None,
	};

	let object = match LangString::new(value, language, direction) {
		Ok(s) => ValueObject::LangString(s),
		Err(s) => ValueObject::Literal(LiteralValue::String(s), None),
	};

	if let Some(values) = graph_map
		.get_mut(&usage.graph)
		.and_then(|g| g.get_mut(&usage.subject))
		.and_then(|n| n.properties.get_mut(&usage.property))
	{
		for v in values {
			if v.id() == Some(cl) {
				*v = Indexed::unindexed(Object::Value(object.clone()))
			}
		}
	}

	Ok(())
}

/// A blank node with exactly one `rdf:first` and one `rdf:rest` value, and
/// nothing else but an optional `rdf:List` type.
fn is_well_formed_list_node(node: &Node) -> bool {
	let has_one = |property: &iref::Iri| {
		node.properties
			.iter()
			.any(|(p, values)| is(p, property) && values.len() == 1)
	};

	node.id.as_ref().is_some_and(Id::is_blank)
		&& node.properties.len() == 2
		&& has_one(vocab::RDF_FIRST)
		&& has_one(vocab::RDF_REST)
		&& match node.types() {
			[] => true,
			[ty] => is(ty, vocab::RDF_LIST),
			_ => false,
		}
		&& node.graph.is_none()
		&& node.included.is_none()
		&& node.reverse_properties.is_none()
}

/// Walks back from a use of `rdf:nil` to the head of the list.
fn walk_list(
	graph_map: &IndexMap<Option<Id>, NodeGraph>,
	referenced_once: &HashMap<Id, Option<Usage>>,
	mut usage: Usage,
) -> Chain {
	let mut nodes = Vec::new();

	while is(&usage.property, vocab::RDF_REST) {
		let well_formed = graph_map
			.get(&usage.graph)
			.and_then(|g| g.get(&usage.subject))
			.is_some_and(is_well_formed_list_node);

		if !well_formed {
			break;
		}

		let Some(Some(next)) = referenced_once.get(&usage.subject) else {
			break;
		};

		nodes.push(usage.subject.clone());
		usage = next.clone();

		if usage.subject.is_iri() {
			break;
		}
	}

	Chain { head: usage, nodes }
}

/// Replaces the head of the `i`-th chain with a list object.
///
/// Lists nested in the nodes of the chain are built first.
fn build_list(
	graph_map: &mut IndexMap<Option<Id>, NodeGraph>,
	chains: &[Chain],
	done: &mut [bool],
	i: usize,
) {
	if done[i] {
		return;
	}

	done[i] = true;

	for j in 0..chains.len() {
		if !done[j] && chains[i].nodes.contains(&chains[j].head.subject) {
			build_list(graph_map, chains, done, j)
		}
	}

	let chain = &chains[i];
	let items: Vec<IndexedObject> = chain
		.nodes
		.iter()
		.rev()
		.filter_map(|id| {
			let node = graph_map.get(&chain.head.graph)?.get(id)?;
			node.properties
				.iter()
				.find(|(p, _)| is(p, vocab::RDF_FIRST))
				.and_then(|(_, values)| values.first())
				.cloned()
		})
		.collect();

	if let Some(head) = value_at(graph_map, &chain.head) {
		*head = Indexed::new(Object::List(List::new(items)), head.index().map(str::to_owned))
	}
}

/// Converts an RDF object into a JSON-LD object.
fn rdf_to_object(value: &Value, options: FromRdfOptions) -> Result<IndexedObject, Error> {
	match value {
		Value::Id(id) => Ok(Indexed::unindexed(Object::reference(id.clone()))),
		Value::Literal(literal) => Ok(Indexed::unindexed(Object::Value(literal_to_value(
			literal, options,
		)?))),
	}
}

fn literal_to_value(literal: &Literal, options: FromRdfOptions) -> Result<ValueObject, Error> {
	let datatype = literal.datatype.as_str();
	let string = || LiteralValue::String(literal.value.clone());
	let typed = || ValueObject::Literal(string(), Some(literal.datatype.clone()));

	if options.use_native_types {
		if datatype == vocab::XSD_STRING.as_str() {
			return Ok(ValueObject::Literal(string(), None));
		}

		if datatype == vocab::XSD_BOOLEAN.as_str() {
			return Ok(match literal.value.as_str() {
				"true" => ValueObject::Literal(LiteralValue::Boolean(true), None),
				"false" => ValueObject::Literal(LiteralValue::Boolean(false), None),
				_ => typed(),
			});
		}

		if datatype == vocab::XSD_INTEGER.as_str() {
			return Ok(match literal.value.parse::<i64>() {
				Ok(i) => ValueObject::Literal(LiteralValue::Number(i.into()), None),
				Err(_) => typed(),
			});
		}

		if datatype == vocab::XSD_DOUBLE.as_str() {
			return Ok(
				match literal.value.parse::<f64>().ok().and_then(Number::from_f64) {
					Some(n) => ValueObject::Literal(LiteralValue::Number(n), None),
					None => typed(),
				},
			);
		}
	}

	if datatype == vocab::RDF_JSON.as_str() {
		return serde_json::from_str(&literal.value)
			.map(ValueObject::Json)
			.map_err(|_| Error::InvalidJsonLiteral(literal.value.clone()));
	}

	if options.rdf_direction == Some(RdfDirection::I18nDatatype) {
		if let Some(fragment) = datatype.strip_prefix(vocab::I18N) {
			let (language, direction) = fragment.split_once('_').unwrap_or((fragment, ""));

			let language = (!language.is_empty()).then(|| LenientLangTagBuf::new(language.to_owned()));
			let direction = direction.parse::<Direction>().ok();

			return Ok(
				match LangString::new(literal.value.clone(), language, direction) {
					Ok(s) => ValueObject::LangString(s),
					Err(s) => ValueObject::Literal(LiteralValue::String(s), None),
				},
			);
		}
	}

	if let Some(language) = &literal.language {
		if let Ok(s) = LangString::new(literal.value.clone(), Some(language.clone()), None) {
			return Ok(ValueObject::LangString(s));
		}
	}

	if datatype == vocab::XSD_STRING.as_str() {
		Ok(ValueObject::Literal(string(), None))
	} else {
		Ok(typed())
	}
}
