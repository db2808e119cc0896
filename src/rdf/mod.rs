//! RDF dataset model.
//!
//! Datasets are what the N-Quads codec reads and writes, and what the
//! JSON-LD to/from RDF algorithms of [`crate::algorithms::rdf`] produce and
//! consume.
use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use iref::{Iri, IriBuf};

use crate::{Id, LenientLangTagBuf};

mod quad;

pub use quad::*;

/// Members of the RDF and XSD vocabularies used by the algorithms.
pub mod vocab {
	use iref::Iri;
	use static_iref::iri;

	pub const RDF_TYPE: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
	pub const RDF_VALUE: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#value");
	pub const RDF_LIST: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#List");
	pub const RDF_FIRST: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#first");
	pub const RDF_REST: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#rest");
	pub const RDF_NIL: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#nil");
	pub const RDF_DIRECTION: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#direction");
	pub const RDF_LANGUAGE: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#language");
	pub const RDF_JSON: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON");
	pub const RDF_LANG_STRING: &Iri =
		iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#langString");

	pub const XSD_BOOLEAN: &Iri = iri!("http://www.w3.org/2001/XMLSchema#boolean");
	pub const XSD_DECIMAL: &Iri = iri!("http://www.w3.org/2001/XMLSchema#decimal");
	pub const XSD_DOUBLE: &Iri = iri!("http://www.w3.org/2001/XMLSchema#double");
	pub const XSD_INTEGER: &Iri = iri!("http://www.w3.org/2001/XMLSchema#integer");
	pub const XSD_STRING: &Iri = iri!("http://www.w3.org/2001/XMLSchema#string");

	/// Prefix of the `i18n` datatypes encoding a language and direction.
	pub const I18N: &str = "https://www.w3.org/ns/i18n#";
}

/// How base directions are represented in RDF.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RdfDirection {
	/// `https://www.w3.org/ns/i18n#{language}_{direction}` datatypes.
	I18nDatatype,

	/// Blank node with `rdf:value`, `rdf:language` and `rdf:direction`.
	CompoundLiteral,
}

impl RdfDirection {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::I18nDatatype => "i18n-datatype",
			Self::CompoundLiteral => "compound-literal",
		}
	}
}

#[derive(Debug, thiserror::Error)]
#[error("invalid RDF direction `{0}`")]
pub struct InvalidRdfDirection(pub String);

impl FromStr for RdfDirection {
	type Err = InvalidRdfDirection;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"i18n-datatype" => Ok(Self::I18nDatatype),
			"compound-literal" => Ok(Self::CompoundLiteral),
			_ => Err(InvalidRdfDirection(s.to_owned())),
		}
	}
}

impl fmt::Display for RdfDirection {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// RDF literal.
///
/// Language-tagged strings have the `rdf:langString` datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
	pub value: String,
	pub datatype: IriBuf,
	pub language: Option<LenientLangTagBuf>,
}

impl Literal {
	pub fn new(value: String, datatype: IriBuf) -> Self {
		Self {
			value,
			datatype,
			language: None,
		}
	}

	/// Plain `xsd:string` literal.
	pub fn string(value: impl Into<String>) -> Self {
		Self::new(value.into(), vocab::XSD_STRING.to_owned())
	}

	pub fn lang_string(value: String, language: LenientLangTagBuf) -> Self {
		Self {
			value,
			datatype: vocab::RDF_LANG_STRING.to_owned(),
			language: Some(language),
		}
	}

	pub fn datatype(&self) -> &Iri {
		&self.datatype
	}

	pub fn is_string(&self) -> bool {
		self.language.is_none() && self.datatype.as_str() == vocab::XSD_STRING.as_str()
	}
}

/// Object of an RDF triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
	Id(Id),
	Literal(Literal),
}

impl Value {
	pub fn iri(iri: &Iri) -> Self {
		Self::Id(Id::Iri(iri.to_owned()))
	}

	pub fn as_id(&self) -> Option<&Id> {
		match self {
			Self::Id(id) => Some(id),
			Self::Literal(_) => None,
		}
	}

	pub fn as_literal(&self) -> Option<&Literal> {
		match self {
			Self::Literal(l) => Some(l),
			Self::Id(_) => None,
		}
	}
}

impl From<Id> for Value {
	fn from(id: Id) -> Self {
		Self::Id(id)
	}
}

impl From<Literal> for Value {
	fn from(l: Literal) -> Self {
		Self::Literal(l)
	}
}

/// RDF graph: an ordered collection of triples.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Graph {
	triples: Vec<Triple>,
}

impl Graph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.triples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.triples.is_empty()
	}

	pub fn insert(&mut self, triple: Triple) {
		self.triples.push(triple)
	}

	pub fn contains(&self, triple: &Triple) -> bool {
		self.triples.contains(triple)
	}

	pub fn triples(&self) -> &[Triple] {
		&self.triples
	}

	pub fn iter(&self) -> std::slice::Iter<Triple> {
		self.triples.iter()
	}
}

impl Extend<Triple> for Graph {
	fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
		self.triples.extend(iter)
	}
}

impl<'a> IntoIterator for &'a Graph {
	type Item = &'a Triple;
	type IntoIter = std::slice::Iter<'a, Triple>;

	fn into_iter(self) -> Self::IntoIter {
		self.triples.iter()
	}
}

/// RDF dataset: a default graph and named graphs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Dataset {
	default_graph: Graph,
	named_graphs: IndexMap<Id, Graph>,
}

impl Dataset {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn default_graph(&self) -> &Graph {
		&self.default_graph
	}

	pub fn default_graph_mut(&mut self) -> &mut Graph {
		&mut self.default_graph
	}

	/// Returns the given graph, `None` designating the default graph.
	pub fn graph(&self, name: Option<&Id>) -> Option<&Graph> {
		match name {
			Some(name) => self.named_graphs.get(name),
			None => Some(&self.default_graph),
		}
	}

	/// Returns the given graph, creating it if necessary.
	pub fn graph_mut(&mut self, name: Option<&Id>) -> &mut Graph {
		match name {
			Some(name) => self.named_graphs.entry(name.clone()).or_default(),
			None => &mut self.default_graph,
		}
	}

	/// Named graphs, in insertion order.
	pub fn named_graphs(&self) -> impl Iterator<Item = (&Id, &Graph)> {
		self.named_graphs.iter()
	}

	/// Iterates over all the graphs, starting with the default graph.
	pub fn graphs(&self) -> impl Iterator<Item = (Option<&Id>, &Graph)> {
		std::iter::once((None, &self.default_graph))
			.chain(self.named_graphs.iter().map(|(name, g)| (Some(name), g)))
	}

	pub fn insert(&mut self, quad: Quad) {
		let Quad(s, p, o, g) = quad;
		self.graph_mut(g.as_ref()).insert(Triple(s, p, o))
	}

	/// Iterates over the quads of the dataset, default graph first.
	pub fn quads(&self) -> impl Iterator<Item = QuadRef> {
		self.graphs()
			.flat_map(|(name, graph)| graph.iter().map(move |t| QuadRef(t, name)))
	}

	/// Number of quads.
	pub fn len(&self) -> usize {
		self.graphs().map(|(_, g)| g.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Extend<Quad> for Dataset {
	fn extend<T: IntoIterator<Item = Quad>>(&mut self, iter: T) {
		for quad in iter {
			self.insert(quad)
		}
	}
}

impl FromIterator<Quad> for Dataset {
	fn from_iter<T: IntoIterator<Item = Quad>>(iter: T) -> Self {
		let mut dataset = Self::new();
		dataset.extend(iter);
		dataset
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use static_iref::iri;

	fn iri_id(iri: &Iri) -> Id {
		Id::Iri(iri.to_owned())
	}

	#[test]
	fn quads_are_grouped_by_graph() {
		let s = iri_id(iri!("http://x/s"));
		let p = iri_id(iri!("http://x/p"));
		let g = iri_id(iri!("http://x/g"));

		let dataset: Dataset = [
			Quad(s.clone(), p.clone(), Literal::string("a").into(), None),
			Quad(s.clone(), p.clone(), Literal::string("b").into(), Some(g.clone())),
			Quad(s.clone(), p.clone(), Literal::string("c").into(), None),
		]
		.into_iter()
		.collect();

		assert_eq!(dataset.len(), 3);
		assert_eq!(dataset.default_graph().len(), 2);
		assert_eq!(dataset.graph(Some(&g)).map(Graph::len), Some(1));
		assert_eq!(
			dataset.quads().last().and_then(|q| q.graph()).map(Id::as_str),
			Some("http://x/g")
		)
	}

	#[test]
	fn rdf_direction_names() {
		assert_eq!(
			"compound-literal".parse::<RdfDirection>().ok(),
			Some(RdfDirection::CompoundLiteral)
		);
		assert_eq!(RdfDirection::I18nDatatype.to_string(), "i18n-datatype");
		assert!("ltr".parse::<RdfDirection>().is_err())
	}
}
