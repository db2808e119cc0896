//! High-level JSON-LD operations.
//!
//! The functions of this module follow the `JsonLdProcessor` interface of
//! the JSON-LD 1.1 API: every operation takes its input document along with
//! a set of [`Options`] carrying the document loader and the processing
//! parameters, and returns plain JSON (or an RDF dataset).
//!
//! ```
//! use serde_json::json;
//! use json_ld_trig::{processor, NoLoader, RemoteDocument};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let input = RemoteDocument::from(json!([{
//! 	"@id": "http://x/a",
//! 	"http://schema.org/name": [{ "@value": "A" }]
//! }]));
//!
//! let context = json!({ "@context": { "@vocab": "http://schema.org/", "@base": "http://x/" } });
//! let options = processor::Options::new(NoLoader);
//! let compacted = processor::compact(&input, &context, &options).await.unwrap();
//! assert_eq!(compacted["@id"], "a");
//! assert_eq!(compacted["name"], "A");
//! # }
//! ```
use iref::{Iri, IriBuf};
use serde_json::{Map, Value};

use crate::{
	algorithms::{
		compaction::{self, Compact, Compactor, EmbedContext},
		context_processing,
		expansion::{self, Expand},
		flattening::{ConflictingIndexes, Flatten},
		rdf::{self as rdf_conversion, ToRdf},
		CompactionOptions, ContextProcessingOptions, Environment, ExpansionOptions,
		ExpansionPolicy, FromRdfOptions, ProcessingEnvironment, ToRdfOptions,
	},
	rdf::{Dataset, RdfDirection},
	syntax::{ErrorCode, Keyword},
	BlankIdGenerator, Context, ExpandedDocument, IntoJson, Loader, NoLoader, ProcessingMode,
	RemoteDocument,
};

/// Processing options.
///
/// Mirrors the `JsonLdOptions` dictionary of the JSON-LD 1.1 API. The
/// document loader is part of the options.
#[derive(Clone)]
pub struct Options<L = NoLoader> {
	/// Loader used to retrieve remote contexts.
	pub loader: L,

	/// The base IRI to use when expanding or compacting the document.
	///
	/// If set, this overrides the input document's IRI.
	pub base: Option<IriBuf>,

	/// If set to `true`, the JSON-LD processor replaces arrays with just one
	/// element with that element during compaction.
	///
	/// If set to false, all arrays will remain arrays even if they have just
	/// one element.
	///
	/// Defaults to `true`.
	pub compact_arrays: bool,

	/// Determines if IRIs are compacted relative to the base option or
	/// document location when compacting.
	///
	/// Defaults to `true`.
	pub compact_to_relative: bool,

	/// A context that is used to initialize the active context when
	/// expanding a document.
	///
	/// Either a local context, a context IRI, or an object with a
	/// `@context` entry.
	pub expand_context: Option<Value>,

	/// If set to `true`, certain algorithm processing steps where indicated
	/// are ordered lexicographically.
	///
	/// If `false`, order is not considered in processing.
	pub ordered: bool,

	/// Sets the processing mode.
	///
	/// Defaults to `ProcessingMode::JsonLd1_1`.
	pub processing_mode: ProcessingMode,

	/// Determines how value objects containing a base direction are
	/// transformed to and from RDF.
	pub rdf_direction: Option<RdfDirection>,

	/// If set to `true`, the JSON-LD processor may emit blank nodes for
	/// triple predicates, otherwise they will be omitted.
	pub produce_generalized_rdf: bool,

	/// Converts `xsd:boolean`, `xsd:integer` and `xsd:double` literals to
	/// native JSON values when deserializing RDF.
	pub use_native_types: bool,

	/// Keeps `rdf:type` as a regular property when deserializing RDF.
	pub use_rdf_type: bool,

	/// Term expansion policy, passed to the expansion algorithm.
	///
	/// Decides what happens to keys that do not expand to an absolute IRI
	/// and to `@type` values that are not valid IRIs.
	pub expansion_policy: ExpansionPolicy,

	/// Expands the input as a frame.
	///
	/// Defaults to `false`.
	pub frame_expansion: bool,
}

impl<L> Options<L> {
	pub fn new(loader: L) -> Self {
		Self {
			loader,
			base: None,
			compact_arrays: true,
			compact_to_relative: true,
			expand_context: None,
			ordered: false,
			processing_mode: ProcessingMode::default(),
			rdf_direction: None,
			produce_generalized_rdf: false,
			use_native_types: false,
			use_rdf_type: false,
			expansion_policy: ExpansionPolicy::default(),
			frame_expansion: false,
		}
	}

	/// Returns these options with the `ordered` flag set to `false`.
	pub fn unordered(self) -> Self {
		Self {
			ordered: false,
			..self
		}
	}

	pub fn with_ordered(self, ordered: bool) -> Self {
		Self { ordered, ..self }
	}

	pub fn with_base(self, base: Option<IriBuf>) -> Self {
		Self { base, ..self }
	}

	/// Returns these options with the given expansion context.
	pub fn with_expand_context(self, context: Value) -> Self {
		Self {
			expand_context: Some(context),
			..self
		}
	}

	/// Builds options for the context processing algorithm from these
	/// options.
	pub fn context_processing_options(&self) -> ContextProcessingOptions {
		ContextProcessingOptions::new(self.processing_mode)
	}

	/// Builds options for the expansion algorithm from these options.
	pub fn expansion_options(&self) -> ExpansionOptions {
		ExpansionOptions {
			processing_mode: self.processing_mode,
			ordered: self.ordered,
			policy: self.expansion_policy,
			frame_expansion: self.frame_expansion,
		}
	}

	/// Builds options for the compaction algorithm from these options.
	pub fn compaction_options(&self) -> CompactionOptions {
		CompactionOptions {
			processing_mode: self.processing_mode,
			compact_to_relative: self.compact_to_relative,
			compact_arrays: self.compact_arrays,
			ordered: self.ordered,
		}
	}

	pub fn to_rdf_options(&self) -> ToRdfOptions {
		ToRdfOptions {
			rdf_direction: self.rdf_direction,
			produce_generalized_rdf: self.produce_generalized_rdf,
		}
	}

	pub fn from_rdf_options(&self) -> FromRdfOptions {
		FromRdfOptions {
			ordered: self.ordered,
			rdf_direction: self.rdf_direction,
			use_native_types: self.use_native_types,
			use_rdf_type: self.use_rdf_type,
		}
	}
}

impl Default for Options {
	fn default() -> Self {
		Self::new(NoLoader)
	}
}

/// Error that can be raised by the [`expand`] function.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
	/// Document expansion failed.
	#[error("expansion failed: {0}")]
	Expansion(#[from] expansion::Error),

	/// Processing of the expansion context failed.
	#[error("context processing failed: {0}")]
	ContextProcessing(#[from] context_processing::Error),
}

impl ExpandError {
	/// Returns the code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::Expansion(e) => e.code(),
			Self::ContextProcessing(e) => e.code(),
		}
	}
}

/// Error that can be raised by the [`compact`] function.
#[derive(Debug, thiserror::Error)]
pub enum CompactError {
	/// Document expansion failed.
	#[error("expansion failed: {0}")]
	Expand(#[from] ExpandError),

	/// Context processing failed.
	#[error("context processing failed: {0}")]
	ContextProcessing(#[from] context_processing::Error),

	/// Document compaction failed.
	#[error("compaction failed: {0}")]
	Compaction(#[from] compaction::Error),
}

impl CompactError {
	/// Returns the code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::Expand(e) => e.code(),
			Self::ContextProcessing(e) => e.code(),
			Self::Compaction(e) => e.code(),
		}
	}
}

/// Error that can be raised by the [`flatten`] function.
#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
	#[error("expansion failed: {0}")]
	Expand(#[from] ExpandError),

	#[error("flattening failed: {0}")]
	ConflictingIndexes(#[from] ConflictingIndexes),

	#[error("context processing failed: {0}")]
	ContextProcessing(#[from] context_processing::Error),

	#[error("compaction failed: {0}")]
	Compaction(#[from] compaction::Error),
}

impl FlattenError {
	/// Returns the code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::Expand(e) => e.code(),
			Self::ConflictingIndexes(e) => e.code(),
			Self::ContextProcessing(e) => e.code(),
			Self::Compaction(e) => e.code(),
		}
	}
}

/// Error that can be raised by the [`to_rdf`] function.
#[derive(Debug, thiserror::Error)]
pub enum ToRdfError {
	/// Document expansion failed.
	#[error("expansion failed: {0}")]
	Expand(#[from] ExpandError),

	/// Node map generation failed.
	#[error("node map generation failed: {0}")]
	ConflictingIndexes(#[from] ConflictingIndexes),
}

impl ToRdfError {
	/// Returns the code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::Expand(e) => e.code(),
			Self::ConflictingIndexes(e) => e.code(),
		}
	}
}

/// Base URL of the input: the `base` option, or the document URL.
fn base_url<'a, L>(input: &'a RemoteDocument, options: &'a Options<L>) -> Option<&'a Iri> {
	options.base.as_deref().or(input.url())
}

/// Unwraps the `@context` entry of a context document.
fn local_context(context: &Value) -> &Value {
	match context {
		Value::Object(map) => map.get("@context").unwrap_or(context),
		_ => context,
	}
}

/// Expands the input document, returning the typed expanded document.
///
/// The active context is initialized with the `expand_context` option, then
/// with the context referenced by the document `Link` header, if any.
pub async fn expand_document<L: Loader>(
	input: &RemoteDocument,
	options: &Options<L>,
) -> Result<ExpandedDocument, ExpandError> {
	let mut env = Environment::new(&options.loader);
	expand_in(&mut env, input, options).await
}

async fn expand_in<L>(
	env: &mut impl ProcessingEnvironment,
	input: &RemoteDocument,
	options: &Options<L>,
) -> Result<ExpandedDocument, ExpandError> {
	let base_url = base_url(input, options);
	let mut active_context = Context::new(base_url.map(Iri::to_owned));

	if let Some(expand_context) = &options.expand_context {
		log::debug!("processing expansion context");
		active_context = active_context
			.process_in(
				env,
				local_context(expand_context),
				base_url,
				options.context_processing_options(),
			)
			.await?;
	}

	if let Some(context_url) = input.context_url() {
		log::debug!("processing linked context <{context_url}>");
		active_context = active_context
			.process_in(
				env,
				&Value::String(context_url.to_string()),
				Some(context_url),
				options.context_processing_options(),
			)
			.await?;
	}

	Ok(input
		.expand_full(env, active_context, base_url, options.expansion_options())
		.await?)
}

/// Expands the input document.
///
/// See: <https://www.w3.org/TR/json-ld11-api/#dom-jsonldprocessor-expand>
pub async fn expand<L: Loader>(
	input: &RemoteDocument,
	options: &Options<L>,
) -> Result<Value, ExpandError> {
	Ok(expand_document(input, options).await?.into_json())
}

/// Processes the compaction context, relative to the input base URL.
async fn process_compaction_context<L>(
	env: &mut impl ProcessingEnvironment,
	input: &RemoteDocument,
	context: &Value,
	options: &Options<L>,
) -> Result<Context, context_processing::Error> {
	let base_url = base_url(input, options);
	Context::new(base_url.map(Iri::to_owned))
		.process_in(
			env,
			local_context(context),
			base_url,
			options.context_processing_options(),
		)
		.await
}

/// Expands then compacts the input document using the given context.
///
/// The local context is embedded in the output.
///
/// See: <https://www.w3.org/TR/json-ld11-api/#dom-jsonldprocessor-compact>
pub async fn compact<L: Loader>(
	input: &RemoteDocument,
	context: &Value,
	options: &Options<L>,
) -> Result<Value, CompactError> {
	let mut env = Environment::new(&options.loader);
	let expanded = expand_in(&mut env, input, options).await?;
	let active_context = process_compaction_context(&mut env, input, context, options).await?;

	let mut compacted = expanded
		.compact_full(&mut env, &active_context, options.compaction_options())
		.await?;
	compacted.embed_context(local_context(context));
	Ok(compacted)
}

/// Flattens the input document, then compacts it if a context is given.
///
/// See: <https://www.w3.org/TR/json-ld11-api/#dom-jsonldprocessor-flatten>
pub async fn flatten<L: Loader>(
	input: &RemoteDocument,
	context: Option<&Value>,
	options: &Options<L>,
) -> Result<Value, FlattenError> {
	let mut env = Environment::new(&options.loader);
	let expanded = expand_in(&mut env, input, options).await?;
	let flattened = expanded.flatten_with(&mut BlankIdGenerator::new(), options.ordered)?;

	let Some(context) = context else {
		return Ok(flattened.into_json());
	};

	let active_context = process_compaction_context(&mut env, input, context, options).await?;
	let compaction_options = options.compaction_options();
	let compacted = flattened
		.compact_full(&mut env, &active_context, compaction_options)
		.await?;

	// The flattened output always has a top-level graph.
	let graph_key = Compactor::new(&active_context, compaction_options)
		.compact_keyword(Keyword::Graph)?;
	let mut compacted = match compacted {
		Value::Object(map) if map.is_empty() || map.contains_key(&graph_key) => Value::Object(map),
		node => {
			let mut map = Map::new();
			map.insert(graph_key, Value::Array(vec![node]));
			Value::Object(map)
		}
	};

	compacted.embed_context(local_context(context));
	Ok(compacted)
}

/// Expands the input document and converts it into an RDF dataset.
///
/// See: <https://www.w3.org/TR/json-ld11-api/#dom-jsonldprocessor-tordf>
pub async fn to_rdf<L: Loader>(
	input: &RemoteDocument,
	options: &Options<L>,
) -> Result<Dataset, ToRdfError> {
	let expanded = expand_document(input, options).await?;
	Ok(expanded.to_rdf(options.to_rdf_options())?)
}

/// Converts an RDF dataset into an expanded JSON-LD document.
///
/// See: <https://www.w3.org/TR/json-ld11-api/#dom-jsonldprocessor-fromrdf>
pub fn from_rdf<L>(dataset: &Dataset, options: &Options<L>) -> Result<Value, rdf_conversion::Error> {
	Ok(rdf_conversion::from_rdf(dataset, options.from_rdf_options())?.into_json())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use static_iref::iri;
	use std::collections::HashMap;

	#[tokio::test]
	async fn expand_with_expand_context() {
		let input = RemoteDocument::from(json!({ "name": "A" }));
		let options = Options::new(NoLoader)
			.with_expand_context(json!({ "@context": { "name": "http://schema.org/name" } }));

		assert_eq!(
			expand(&input, &options).await.unwrap(),
			json!([{ "http://schema.org/name": [{ "@value": "A" }] }])
		)
	}

	#[tokio::test]
	async fn expand_with_linked_context() {
		let mut loader = HashMap::new();
		loader.insert(
			iri!("http://x/context.jsonld").to_owned(),
			RemoteDocument::from(json!({ "@context": { "name": "http://schema.org/name" } })),
		);

		let input = RemoteDocument::new(Some(iri!("http://x/doc").to_owned()), None, json!({ "name": "A" }))
			.with_context_url(Some(iri!("http://x/context.jsonld").to_owned()));

		assert_eq!(
			expand(&input, &Options::new(loader)).await.unwrap(),
			json!([{ "http://schema.org/name": [{ "@value": "A" }] }])
		)
	}

	#[tokio::test]
	async fn base_option_overrides_document_url() {
		let input = RemoteDocument::new(
			Some(iri!("http://x/doc").to_owned()),
			None,
			json!({ "@id": "a", "http://x/p": "v" }),
		);
		let options = Options::new(NoLoader).with_base(Some(iri!("http://y/").to_owned()));

		assert_eq!(
			expand(&input, &options).await.unwrap(),
			json!([{ "@id": "http://y/a", "http://x/p": [{ "@value": "v" }] }])
		)
	}

	#[tokio::test]
	async fn missing_remote_context() {
		let input = RemoteDocument::from(json!({ "@context": "http://x/missing", "a": 1 }));
		let err = expand(&input, &Options::default()).await.unwrap_err();
		assert_eq!(err.code(), ErrorCode::LoadingRemoteContextFailed)
	}

	#[tokio::test]
	async fn flatten_with_context() {
		let input = RemoteDocument::from(json!([{
			"@id": "http://x/a",
			"http://x/p": [{ "@id": "http://x/b", "http://x/p": [{ "@value": "v" }] }]
		}]));
		let context = json!({ "@vocab": "http://x/" });

		let flattened = flatten(&input, Some(&context), &Options::default().with_ordered(true))
			.await
			.unwrap();

		assert_eq!(
			flattened,
			json!({
				"@context": { "@vocab": "http://x/" },
				"@graph": [
					{ "@id": "http://x/a", "p": { "@id": "http://x/b" } },
					{ "@id": "http://x/b", "p": "v" }
				]
			})
		)
	}

	#[tokio::test]
	async fn flatten_single_node_keeps_graph() {
		let input = RemoteDocument::from(json!([{ "@id": "http://x/a", "http://x/p": [{ "@value": 1 }] }]));
		let context = json!({ "p": "http://x/p" });

		let flattened = flatten(&input, Some(&context), &Options::default()).await.unwrap();
		assert_eq!(flattened["@graph"], json!([{ "@id": "http://x/a", "p": 1 }]))
	}

	#[tokio::test]
	async fn conflicting_indexes() {
		let input = RemoteDocument::from(json!([
			{ "@id": "http://x/a", "@index": "1" },
			{ "@id": "http://x/a", "@index": "2" }
		]));

		let err = flatten(&input, None, &Options::default()).await.unwrap_err();
		assert_eq!(err.code(), ErrorCode::ConflictingIndexes)
	}

	#[tokio::test]
	async fn rdf_round_trip() {
		let input = RemoteDocument::from(json!([{
			"@id": "http://x/s",
			"http://x/p": [{ "@value": "v", "@language": "en" }]
		}]));

		let options = Options::default();
		let dataset = to_rdf(&input, &options).await.unwrap();
		assert_eq!(dataset.len(), 1);
		assert_eq!(from_rdf(&dataset, &options).unwrap(), input.document)
	}
}
