//! Conversion between JSON-LD documents and RDF datasets.
//!
//! See: <https://www.w3.org/TR/json-ld11-api/#rdf-serialization-deserialization-algorithms>
use crate::{rdf::RdfDirection, syntax::ErrorCode};

mod from_rdf;
mod to_rdf;

pub use from_rdf::*;
pub use to_rdf::*;

/// Options of the JSON-LD to RDF conversion.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToRdfOptions {
	/// Representation of base directions.
	///
	/// If `None`, directions are dropped.
	pub rdf_direction: Option<RdfDirection>,

	/// Keep triples whose predicate is a blank node.
	pub produce_generalized_rdf: bool,
}

impl ToRdfOptions {
	pub fn with_rdf_direction(self, rdf_direction: Option<RdfDirection>) -> Self {
		Self {
			rdf_direction,
			..self
		}
	}

	pub fn generalized(self) -> Self {
		Self {
			produce_generalized_rdf: true,
			..self
		}
	}
}

/// Options of the RDF to JSON-LD conversion.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FromRdfOptions {
	/// Sort subjects and graphs by identifier.
	pub ordered: bool,

	/// Representation of base directions to recognize.
	pub rdf_direction: Option<RdfDirection>,

	/// Turn `xsd:string`, `xsd:boolean`, `xsd:integer` and `xsd:double`
	/// literals into native JSON values.
	pub use_native_types: bool,

	/// Keep `rdf:type` as a regular property instead of `@type`.
	pub use_rdf_type: bool,
}

impl FromRdfOptions {
	pub fn with_ordered(self, ordered: bool) -> Self {
		Self { ordered, ..self }
	}

	pub fn with_rdf_direction(self, rdf_direction: Option<RdfDirection>) -> Self {
		Self {
			rdf_direction,
			..self
		}
	}

	pub fn with_native_types(self) -> Self {
		Self {
			use_native_types: true,
			..self
		}
	}
}

/// RDF to JSON-LD conversion error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid JSON literal `{0}`")]
	InvalidJsonLiteral(String),

	#[error("invalid language-tagged string `{0}`")]
	InvalidLanguageTaggedString(String),

	#[error("invalid base direction `{0}`")]
	InvalidBaseDirection(String),
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::InvalidJsonLiteral(_) => ErrorCode::InvalidJsonLiteral,
			Self::InvalidLanguageTaggedString(_) => ErrorCode::InvalidLanguageTaggedString,
			Self::InvalidBaseDirection(_) => ErrorCode::InvalidBaseDirection,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		algorithms::expansion::Expand,
		rdf::{vocab, Dataset, Literal, Quad, Triple, Value},
		Id, IntoJson, NoLoader, RemoteDocument,
	};
	use serde_json::json;
	use static_iref::iri;

	async fn expand(input: serde_json::Value) -> crate::ExpandedDocument {
		RemoteDocument::new(Some(iri!("http://x/").to_owned()), None, input)
			.expand(NoLoader)
			.await
			.unwrap()
	}

	fn id(s: &str) -> Id {
		Id::from_string(s.to_owned())
	}

	fn typed(value: &str, datatype: &iref::Iri) -> Value {
		Literal::new(value.to_owned(), datatype.to_owned()).into()
	}

	#[tokio::test]
	async fn list_to_rdf_and_back() {
		let input = json!([{
			"@id": "http://x/s",
			"http://x/p": [{ "@list": [{ "@value": 1 }, { "@value": 2 }] }]
		}]);

		let dataset = expand(input.clone()).await.to_rdf(ToRdfOptions::default()).unwrap();
		let triples = dataset.default_graph().triples();

		assert_eq!(triples.len(), 5);
		for triple in [
			Triple(id("_:b0"), id(vocab::RDF_FIRST.as_str()), typed("1", vocab::XSD_INTEGER)),
			Triple(id("_:b0"), id(vocab::RDF_REST.as_str()), id("_:b1").into()),
			Triple(id("_:b1"), id(vocab::RDF_FIRST.as_str()), typed("2", vocab::XSD_INTEGER)),
			Triple(id("_:b1"), id(vocab::RDF_REST.as_str()), Value::iri(vocab::RDF_NIL)),
			Triple(id("http://x/s"), id("http://x/p"), id("_:b0").into()),
		] {
			assert!(dataset.default_graph().contains(&triple), "missing {triple}")
		}

		let back = from_rdf(&dataset, FromRdfOptions::default().with_native_types()).unwrap();
		assert_eq!(back.into_json(), input)
	}

	#[tokio::test]
	async fn canonical_literals() {
		let input = json!({
			"http://x/p": [true, 5, 5.5, 1e21, "s", { "@value": 3, "@type": "http://www.w3.org/2001/XMLSchema#double" }],
			"http://x/j": { "@value": { "b": 1, "a": [1.0, "x"] }, "@type": "@json" },
			"http://x/l": { "@value": "chat", "@language": "fr" }
		});

		let dataset = expand(input).await.to_rdf(ToRdfOptions::default()).unwrap();
		let objects: Vec<String> = dataset
			.default_graph()
			.iter()
			.map(|t| t.object().to_string())
			.collect();

		for expected in [
			"\"true\"^^<http://www.w3.org/2001/XMLSchema#boolean>",
			"\"5\"^^<http://www.w3.org/2001/XMLSchema#integer>",
			"\"5.5E0\"^^<http://www.w3.org/2001/XMLSchema#double>",
			"\"1.0E21\"^^<http://www.w3.org/2001/XMLSchema#double>",
			"\"3.0E0\"^^<http://www.w3.org/2001/XMLSchema#double>",
			"\"s\"",
			"\"{\\\"a\\\":[1,\\\"x\\\"],\\\"b\\\":1}\"^^<http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON>",
			"\"chat\"@fr",
		] {
			assert!(objects.iter().any(|o| o == expected), "missing {expected} in {objects:?}")
		}
	}

	#[tokio::test]
	async fn directions() {
		let input = json!({
			"@id": "http://x/s",
			"http://x/p": { "@value": "abc", "@language": "en-US", "@direction": "rtl" }
		});
		let expanded = expand(input).await;

		let dataset = expanded
			.to_rdf(ToRdfOptions::default().with_rdf_direction(Some(RdfDirection::I18nDatatype)))
			.unwrap();
		assert_eq!(
			dataset.default_graph().triples()[0].object(),
			&typed("abc", iri!("https://www.w3.org/ns/i18n#en-us_rtl"))
		);

		let options = ToRdfOptions::default().with_rdf_direction(Some(RdfDirection::CompoundLiteral));
		let dataset = expanded.to_rdf(options).unwrap();
		assert_eq!(dataset.default_graph().len(), 4);

		let back = from_rdf(
			&dataset,
			FromRdfOptions::default().with_rdf_direction(Some(RdfDirection::CompoundLiteral)),
		)
		.unwrap();
		assert_eq!(
			back.into_json(),
			json!([{
				"@id": "http://x/s",
				"http://x/p": [{ "@value": "abc", "@language": "en-US", "@direction": "rtl" }]
			}])
		)
	}

	#[tokio::test]
	async fn named_graphs_and_types() {
		let input = json!({
			"@id": "http://x/g",
			"@graph": { "@id": "http://x/s", "@type": "http://x/T" }
		});

		let dataset = expand(input.clone()).await.to_rdf(ToRdfOptions::default()).unwrap();
		let g = id("http://x/g");
		assert!(dataset.default_graph().is_empty());
		assert_eq!(
			dataset.graph(Some(&g)).map(|g| g.triples().to_vec()),
			Some(vec![Triple(
				id("http://x/s"),
				id(vocab::RDF_TYPE.as_str()),
				id("http://x/T").into()
			)])
		);

		let back = from_rdf(&dataset, FromRdfOptions::default()).unwrap();
		assert_eq!(
			back.into_json(),
			json!([{
				"@id": "http://x/g",
				"@graph": [{ "@id": "http://x/s", "@type": ["http://x/T"] }]
			}])
		);

		let back = from_rdf(
			&dataset,
			FromRdfOptions {
				use_rdf_type: true,
				..Default::default()
			},
		)
		.unwrap();
		assert_eq!(
			back.into_json(),
			json!([{
				"@id": "http://x/g",
				"@graph": [{
					"@id": "http://x/s",
					"http://www.w3.org/1999/02/22-rdf-syntax-ns#type": [{ "@id": "http://x/T" }]
				}]
			}])
		)
	}

	#[test]
	fn shared_list_nodes_are_kept() {
		let nil = Value::iri(vocab::RDF_NIL);
		let dataset: Dataset = [
			Quad(id("http://x/a"), id("http://x/p"), id("_:l").into(), None),
			Quad(id("http://x/b"), id("http://x/p"), id("_:l").into(), None),
			Quad(id("_:l"), id(vocab::RDF_FIRST.as_str()), Literal::string("x").into(), None),
			Quad(id("_:l"), id(vocab::RDF_REST.as_str()), nil, None),
		]
		.into_iter()
		.collect();

		let back = from_rdf(&dataset, FromRdfOptions::default().with_ordered(true)).unwrap();
		let json = back.into_json();
		assert_eq!(json.as_array().map(Vec::len), Some(3));
		assert_eq!(json[0]["@id"], json!("_:l"))
	}

	#[test]
	fn invalid_json_literal() {
		let dataset: Dataset = [Quad(
			id("http://x/s"),
			id("http://x/p"),
			typed("{", vocab::RDF_JSON),
			None,
		)]
		.into_iter()
		.collect();

		let err = from_rdf(&dataset, FromRdfOptions::default()).unwrap_err();
		assert_eq!(err.code(), ErrorCode::InvalidJsonLiteral)
	}
}
