use iref::{Iri, IriBuf};
use serde_json::Number;

use super::ToRdfOptions;
use crate::{
	algorithms::flattening::{ConflictingIndexes, Flatten, NodeMap},
	object::{List, LiteralValue, ValueObject},
	rdf::{vocab, Dataset, Literal, RdfDirection, Triple, Value},
	BlankIdGenerator, ExpandedDocument, Id, Object,
};

/// Numbers at or above this magnitude are written as `xsd:double`.
const MAX_INTEGER: f64 = 1e21;

/// JSON-LD to RDF conversion.
pub trait ToRdf {
	/// Converts the document into an RDF dataset.
	///
	/// Blank nodes are labeled with `generator`, which is also used to
	/// create list nodes and compound literals.
	fn to_rdf_with(
		&self,
		generator: &mut BlankIdGenerator,
		options: ToRdfOptions,
	) -> Result<Dataset, ConflictingIndexes>;

	fn to_rdf(&self, options: ToRdfOptions) -> Result<Dataset, ConflictingIndexes> {
		self.to_rdf_with(&mut BlankIdGenerator::new(), options)
	}
}

impl ToRdf for ExpandedDocument {
	fn to_rdf_with(
		&self,
		generator: &mut BlankIdGenerator,
		options: ToRdfOptions,
	) -> Result<Dataset, ConflictingIndexes> {
		let node_map = self.generate_node_map_with(generator)?;
		Ok(node_map_to_rdf(&node_map, generator, options))
	}
}

/// Produces the triples of every graph of the node map.
///
/// Graphs, subjects and properties are visited in identifier order.
pub fn node_map_to_rdf(
	node_map: &NodeMap,
	generator: &mut BlankIdGenerator,
	options: ToRdfOptions,
) -> Dataset {
	let mut dataset = Dataset::new();

	let mut named_graphs: Vec<_> = node_map
		.named_graphs()
		.filter(|(name, _)| name.is_valid())
		.collect();
	named_graphs.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));

	let graphs = std::iter::once((None, node_map.default_graph()))
		.chain(named_graphs.into_iter().map(|(name, g)| (Some(name), g)));

	for (name, graph) in graphs {
		let triples = dataset.graph_mut(name);

		let mut nodes: Vec<_> = graph.nodes().filter(|(id, _)| id.is_valid()).collect();
		nodes.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));

		for (subject, node) in nodes {
			for ty in node.types() {
				if ty.is_valid() {
					triples.insert(Triple(
						subject.clone(),
						Id::Iri(vocab::RDF_TYPE.to_owned()),
						ty.clone().into(),
					))
				}
			}

			let mut properties: Vec<_> = node.properties.iter().collect();
			properties.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));

			for (property, values) in properties {
				let keep = match property {
					Id::Iri(_) => true,
					Id::Blank(_) => options.produce_generalized_rdf,
					Id::Invalid(_) => false,
				};

				if !keep {
					continue;
				}

				for value in values {
					let mut list_triples = Vec::new();
					if let Some(object) =
						object_to_rdf(value, &mut list_triples, generator, options.rdf_direction)
					{
						list_triples.push(Triple(subject.clone(), property.clone(), object))
					}

					triples.extend(list_triples)
				}
			}
		}
	}

	dataset
}

fn iri_id(iri: &Iri) -> Id {
	Id::Iri(iri.to_owned())
}

fn blank_id(generator: &mut BlankIdGenerator) -> Id {
	Id::Blank(generator.next_blank_id())
}

/// Converts a node map value into an RDF object.
///
/// Triples describing the object (list nodes, compound literals) are pushed
/// onto `triples`. Returns `None` if the object cannot be represented.
fn object_to_rdf(
	object: &Object,
	triples: &mut Vec<Triple>,
	generator: &mut BlankIdGenerator,
	rdf_direction: Option<RdfDirection>,
) -> Option<Value> {
	match object {
		Object::Node(node) => node.id.as_ref().filter(|id| id.is_valid()).cloned().map(Value::Id),
		Object::List(list) => Some(list_to_rdf(list, triples, generator, rdf_direction)),
		Object::Value(value) => value_to_rdf(value, triples, generator, rdf_direction),
	}
}

fn value_to_rdf(
	value: &ValueObject,
	triples: &mut Vec<Triple>,
	generator: &mut BlankIdGenerator,
	rdf_direction: Option<RdfDirection>,
) -> Option<Value> {
	match value {
		ValueObject::Json(json) => Some(
			Literal::new(canonical_json(json), vocab::RDF_JSON.to_owned()).into(),
		),
		ValueObject::LangString(s) => {
			if let Some(language) = s.language() {
				if !language.is_well_formed() {
					return None;
				}
			}

			match (s.direction(), rdf_direction) {
				(Some(direction), Some(RdfDirection::I18nDatatype)) => {
					let language = s
						.language()
						.map(|l| l.to_lowercase().into_string())
						.unwrap_or_default();
					let datatype = IriBuf::new(format!("{}{language}_{direction}", vocab::I18N))
						.ok()?;
					Some(Literal::new(s.as_str().to_owned(), datatype).into())
				}
				(Some(direction), Some(RdfDirection::CompoundLiteral)) => {
					let node = blank_id(generator);

					triples.push(Triple(
						node.clone(),
						iri_id(vocab::RDF_VALUE),
						Literal::string(s.as_str()).into(),
					));

					if let Some(language) = s.language() {
						triples.push(Triple(
							node.clone(),
							iri_id(vocab::RDF_LANGUAGE),
							Literal::string(language.as_str()).into(),
						))
					}

					triples.push(Triple(
						node.clone(),
						iri_id(vocab::RDF_DIRECTION),
						Literal::string(direction.as_str()).into(),
					));

					Some(node.into())
				}
				_ => match s.language() {
					Some(language) => {
						Some(Literal::lang_string(s.as_str().to_owned(), language.clone()).into())
					}
					None => Some(Literal::string(s.as_str()).into()),
				},
			}
		}
		ValueObject::Literal(literal, ty) => {
			let ty = ty.as_deref();
			let (lexical, default_type) = match literal {
				LiteralValue::Null => return None,
				LiteralValue::Boolean(b) => (b.to_string(), vocab::XSD_BOOLEAN),
				LiteralValue::Number(n) => {
					let is_double = ty.is_some_and(|ty| ty.as_str() == vocab::XSD_DOUBLE.as_str())
						|| n.as_f64()
							.is_some_and(|f| f.fract() != 0.0 || f.abs() >= MAX_INTEGER);

					if is_double {
						(canonical_double(n), vocab::XSD_DOUBLE)
					} else {
						(canonical_integer(n), vocab::XSD_INTEGER)
					}
				}
				LiteralValue::String(s) => (s.clone(), vocab::XSD_STRING),
			};

			let datatype = ty.unwrap_or(default_type).to_owned();
			Some(Literal::new(lexical, datatype).into())
		}
	}
}

/// Converts a list into an `rdf:first`/`rdf:rest` chain, returning its head.
fn list_to_rdf(
	list: &List,
	triples: &mut Vec<Triple>,
	generator: &mut BlankIdGenerator,
	rdf_direction: Option<RdfDirection>,
) -> Value {
	if list.is_empty() {
		return Value::iri(vocab::RDF_NIL);
	}

	let head = blank_id(generator);
	let mut subject = head.clone();
	let mut items = list.iter().peekable();

	while let Some(item) = items.next() {
		let mut embedded_triples = Vec::new();

		if let Some(object) = object_to_rdf(item, &mut embedded_triples, generator, rdf_direction)
		{
			triples.push(Triple(subject.clone(), iri_id(vocab::RDF_FIRST), object))
		}

		let next = if items.peek().is_some() {
			blank_id(generator)
		} else {
			iri_id(vocab::RDF_NIL)
		};

		triples.push(Triple(subject, iri_id(vocab::RDF_REST), next.clone().into()));
		triples.extend(embedded_triples);
		subject = next
	}

	head.into()
}

/// Canonical `xsd:integer` lexical form.
fn canonical_integer(n: &Number) -> String {
	match (n.as_i64(), n.as_u64()) {
		(Some(i), _) => i.to_string(),
		(None, Some(u)) => u.to_string(),
		_ => format!("{:.0}", n.as_f64().unwrap_or_default()),
	}
}

/// Canonical `xsd:double` lexical form (`1.5E2`).
fn canonical_double(n: &Number) -> String {
	let s = format!("{:E}", n.as_f64().unwrap_or_default());
	match s.split_once('E') {
		Some((mantissa, exponent)) if !mantissa.contains('.') => {
			format!("{mantissa}.0E{exponent}")
		}
		_ => s,
	}
}

/// JSON Canonicalization Scheme (RFC 8785) form: object entries sorted by
/// UTF-16 key, no whitespace, numbers written as ECMAScript does.
pub fn canonical_json(value: &serde_json::Value) -> String {
	let mut out = String::new();
	write_canonical_json(&mut out, value);
	out
}

fn write_canonical_json(out: &mut String, value: &serde_json::Value) {
	use serde_json::Value as Json;

	match value {
		Json::Array(items) => {
			out.push('[');
			for (i, item) in items.iter().enumerate() {
				if i > 0 {
					out.push(',')
				}
				write_canonical_json(out, item)
			}
			out.push(']')
		}
		Json::Object(map) => {
			let mut entries: Vec<_> = map.iter().collect();
			entries.sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));

			out.push('{');
			for (i, (key, item)) in entries.into_iter().enumerate() {
				if i > 0 {
					out.push(',')
				}
				out.push_str(&Json::String(key.clone()).to_string());
				out.push(':');
				write_canonical_json(out, item)
			}
			out.push('}')
		}
		Json::Number(n) => match n.as_f64() {
			Some(f) if f == 0.0 => out.push('0'),
			Some(f) => out.push_str(ryu_js::Buffer::new().format(f)),
			None => out.push_str(&n.to_string()),
		},
		other => out.push_str(&other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn canonical_numbers() {
		assert_eq!(canonical_double(&Number::from_f64(1.1).unwrap()), "1.1E0");
		assert_eq!(canonical_double(&Number::from(12)), "1.2E1");
		assert_eq!(canonical_double(&Number::from_f64(0.05).unwrap()), "5.0E-2");
		assert_eq!(canonical_integer(&Number::from(-3)), "-3");
		assert_eq!(canonical_integer(&Number::from_f64(2.0).unwrap()), "2")
	}

	#[test]
	fn canonical_json_sorts_keys() {
		assert_eq!(
			canonical_json(&json!({ "z": [true, null], "a": { "c": 1.0, "b": "\"" } })),
			r#"{"a":{"b":"\"","c":1},"z":[true,null]}"#
		)
	}

	#[test]
	fn canonical_json_numbers() {
		assert_eq!(canonical_json(&json!({ "a": 0.000001 })), r#"{"a":0.000001}"#);
		assert_eq!(canonical_json(&json!({ "a": -0.0 })), r#"{"a":0}"#);
		assert_eq!(
			canonical_json(&json!({ "a": 123456789012345680000.0 })),
			r#"{"a":123456789012345680000}"#
		);
		assert_eq!(canonical_json(&json!([1e21, 1.5, -7])), "[1e+21,1.5,-7]")
	}
}
