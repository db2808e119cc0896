//! JSON-LD context processing types and algorithms.
//!
//! See: <https://www.w3.org/TR/json-ld11-api/#context-processing-algorithms>
use std::borrow::Cow;

use iref::{Iri, IriBuf};
use serde_json::{Map, Value};

mod define;
mod error;
mod iri;
mod options;
mod stack;

use define::*;
pub use error::Error;
pub use options::ContextProcessingOptions;
pub use stack::MAX_REMOTE_CONTEXTS;
use stack::ProcessingStack;

use crate::{
	algorithms::{ProcessingEnvironment, Warning},
	loader::LoadOptions,
	syntax::{iri::resolve_iri, Direction, Keyword, LenientLangTagBuf},
	Context, Loader, ProcessingMode, Term,
};

/// Remote context, as loaded from its URL.
#[derive(Debug, Clone)]
pub struct RemoteContext {
	/// Final URL of the context document, used as base URL.
	pub url: IriBuf,

	/// Value of the `@context` entry of the document.
	pub context: Value,
}

/// Identifies the processing of a scoped context.
///
/// A scoped context is the local context of the term definition of `term`
/// in the context identified by `definer`. Processed on top of the active
/// context identified by `active_context`, with the same options, it always
/// yields the same context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopedContextKey {
	pub active_context: u64,
	pub definer: u64,
	pub term: String,
	pub options: ContextProcessingOptions,
}

/// Loads the remote context at `url`, or returns it from the environment
/// cache.
async fn load_remote_context(
	env: &mut impl ProcessingEnvironment,
	url: &Iri,
) -> Result<RemoteContext, Error> {
	if let Some(context) = env.cached_context(url) {
		return Ok(context.clone());
	}

	log::debug!("loading remote context `{url}`");
	let document = env
		.loader()
		.load_with(url, &LoadOptions::context())
		.await
		.map_err(Error::LoadingRemoteContextFailed)?;

	let document_url = document.url.clone().unwrap_or_else(|| url.to_owned());
	let context = match document.into_document() {
		Value::Object(mut map) => map
			.remove(Keyword::Context.into_str())
			.ok_or(Error::InvalidRemoteContext)?,
		_ => return Err(Error::InvalidRemoteContext),
	};

	let remote = RemoteContext {
		url: document_url,
		context,
	};

	env.cache_context(url.to_owned(), remote.clone());
	Ok(remote)
}

/// Context being built, with the terms being defined.
struct TargetContext<'a> {
	pub value: &'a mut Context,
	pub defined: DefinedTerms,
}

struct ContextProcessor<'a> {
	pub remote_contexts: ProcessingStack,
	pub active_context: &'a Context,
	pub base_url: Option<&'a Iri>,
	pub options: ContextProcessingOptions,
	pub validate_scoped_context: bool,
}

impl<'a> ContextProcessor<'a> {
	fn for_recursive_definition<'b>(&'b self) -> ContextProcessor<'b> {
		ContextProcessor {
			remote_contexts: self.remote_contexts.clone(),
			active_context: self.active_context,
			base_url: None,
			options: self.options.with_no_override(),
			validate_scoped_context: self.validate_scoped_context,
		}
	}

	fn for_sub_context<'b>(
		&'b self,
		active_context: &'b Context,
		base_url: Option<&'b Iri>,
		options: ContextProcessingOptions,
		validate_scoped_context: bool,
	) -> ContextProcessor<'b> {
		ContextProcessor {
			remote_contexts: self.remote_contexts.clone(),
			active_context,
			base_url,
			options,
			validate_scoped_context,
		}
	}
}

impl Context {
	/// Process the given local context with the default options.
	///
	/// Returns the new active context; `self` is left untouched.
	///
	/// See: <https://www.w3.org/TR/json-ld11-api/#context-processing-algorithm>
	pub async fn process(
		&self,
		mut env: impl ProcessingEnvironment,
		local_context: &Value,
		base_url: Option<&Iri>,
	) -> Result<Context, Error> {
		self.process_in(
			&mut env,
			local_context,
			base_url,
			ContextProcessingOptions::default(),
		)
		.await
	}

	/// Process the given local context with the given options.
	pub async fn process_with(
		&self,
		mut env: impl ProcessingEnvironment,
		local_context: &Value,
		base_url: Option<&Iri>,
		options: ContextProcessingOptions,
	) -> Result<Context, Error> {
		self.process_in(&mut env, local_context, base_url, options)
			.await
	}

	/// Processes the scoped context of `term`, as defined in `definer`, on
	/// top of this context.
	///
	/// Returns `None` if the term has no scoped context. Results are
	/// memoized by the environment.
	pub(crate) async fn process_scoped(
		&self,
		env: &mut impl ProcessingEnvironment,
		definer: &Context,
		term: &str,
		options: ContextProcessingOptions,
	) -> Result<Option<Context>, Error> {
		let Some(definition) = definer.get(term) else {
			return Ok(None);
		};

		let Some(local_context) = definition.context.as_deref() else {
			return Ok(None);
		};

		let key = ScopedContextKey {
			active_context: self.id(),
			definer: definer.id(),
			term: term.to_owned(),
			options,
		};

		if let Some(context) = env.cached_scoped_context(&key) {
			return Ok(Some(context.clone()));
		}

		log::trace!("processing the scoped context of `{term}`");
		let context = self
			.process_in(env, local_context, definition.base_url.as_deref(), options)
			.await?;
		env.cache_scoped_context(key, context.clone());
		Ok(Some(context))
	}

	/// Process the given local context within the given environment.
	pub(crate) async fn process_in(
		&self,
		env: &mut impl ProcessingEnvironment,
		local_context: &Value,
		base_url: Option<&Iri>,
		options: ContextProcessingOptions,
	) -> Result<Context, Error> {
		ContextProcessor {
			remote_contexts: ProcessingStack::new(),
			active_context: self,
			base_url,
			options,
			validate_scoped_context: true,
		}
		.process(env, local_context)
		.await
	}
}

impl<'a> ContextProcessor<'a> {
	async fn process(
		mut self,
		env: &mut impl ProcessingEnvironment,
		local_context: &Value,
	) -> Result<Context, Error> {
		// 1) Initialize result to the result of cloning active context.
		let mut result = self.active_context.clone();

		// 2) If `local_context` is an object containing the member @propagate,
		// its value MUST be boolean true or false, set `propagate` to that value.
		if let Value::Object(def) = local_context {
			if let Some(propagate) = def.get(Keyword::Propagate.into_str()) {
				if self.options.processing_mode == ProcessingMode::JsonLd1_0 {
					return Err(Error::InvalidContextEntry);
				}

				match propagate {
					Value::Bool(b) => self.options.propagate = *b,
					_ => return Err(Error::InvalidPropagateValue),
				}
			}
		}

		// 3) If propagate is false, and result does not have a previous context,
		// set previous context in result to active context.
		if !self.options.propagate && result.previous_context().is_none() {
			result.set_previous_context(self.active_context.clone());
		}

		// 4) If local context is not an array, set it to an array containing only local context.
		let items = match local_context {
			Value::Array(items) => items.as_slice(),
			other => std::slice::from_ref(other),
		};

		// 5) For each item context in local context:
		for context in items {
			match context {
				// 5.1) If context is null:
				Value::Null => {
					// If `override_protected` is false and `active_context` contains any protected term
					// definitions, an invalid context nullification has been detected and processing
					// is aborted.
					if !self.options.override_protected && result.has_protected_items() {
						return Err(Error::InvalidContextNullification);
					}

					// Otherwise, initialize result as a newly-initialized active context, setting
					// previous_context in result to the previous value of result if propagate is
					// false.
					let previous_result = result;
					result = Context::new(
						self.active_context
							.original_base_url()
							.map(ToOwned::to_owned),
					);

					if !self.options.propagate {
						result.set_previous_context(previous_result);
					}
				}

				// 5.2) If context is a string,
				Value::String(iri_ref) => {
					// Initialize `context` to the result of resolving context against base URL.
					let context_iri = resolve_iri(iri_ref, self.base_url)
						.ok_or_else(|| Error::InvalidContextIri(iri_ref.clone()))?;

					// If validate scoped context is false, and remote contexts already
					// includes context do not process context further.
					if !self.validate_scoped_context && self.remote_contexts.cycle(&context_iri) {
						continue;
					}

					// If the number of entries in the `remote_contexts` array exceeds a processor
					// defined limit, a context overflow error has been detected.
					let mut remote_contexts = self.remote_contexts.clone();
					if !remote_contexts.push(context_iri.clone()) {
						return Err(Error::ContextOverflow);
					}

					let remote = load_remote_context(env, &context_iri).await?;

					// Set result to the result of recursively calling this algorithm, passing result
					// for active context, loaded context for local context, the documentUrl of context
					// document for base URL, and a copy of remote contexts.
					let options = ContextProcessingOptions {
						processing_mode: self.options.processing_mode,
						override_protected: false,
						propagate: true,
					};

					let mut processor = self.for_sub_context(
						&result,
						Some(&remote.url),
						options,
						self.validate_scoped_context,
					);
					processor.remote_contexts = remote_contexts;
					result = Box::pin(processor.process(env, &remote.context)).await?;
				}

				// 5.4) Context definition.
				Value::Object(context) => {
					self.process_definition(env, &mut result, context).await?
				}

				// 5.3) Otherwise, an invalid local context error has been detected.
				_ => return Err(Error::InvalidLocalContext),
			}
		}

		Ok(result)
	}

	async fn process_definition(
		&self,
		env: &mut impl ProcessingEnvironment,
		result: &mut Context,
		context: &Map<String, Value>,
	) -> Result<(), Error> {
		// 5.5) If context has a @version entry:
		if let Some(version) = context.get(Keyword::Version.into_str()) {
			// 5.5.1) If the associated value is not 1.1, an invalid @version
			// value has been detected.
			if version.as_f64() != Some(1.1) {
				return Err(Error::InvalidVersionValue);
			}

			// 5.5.2) If processing mode is set to json-ld-1.0, a processing mode
			// conflict error has been detected.
			if self.options.processing_mode == ProcessingMode::JsonLd1_0 {
				return Err(Error::ProcessingModeConflict);
			}
		}

		// 5.6) If context has an @import entry:
		let context = match context.get(Keyword::Import.into_str()) {
			Some(import_value) => {
				// 5.6.1) If processing mode is json-ld-1.0, an invalid context entry error
				// has been detected.
				if self.options.processing_mode == ProcessingMode::JsonLd1_0 {
					return Err(Error::InvalidContextEntry);
				}

				// 5.6.3) Initialize import to the result of resolving the value of
				// @import.
				let import = import_value
					.as_str()
					.and_then(|i| resolve_iri(i, self.base_url))
					.ok_or(Error::InvalidImportValue)?;

				// 5.6.4) Dereference import.
				let import_context = match load_remote_context(env, &import).await?.context {
					Value::Object(import_context) => import_context,
					_ => return Err(Error::InvalidRemoteContext),
				};

				// If `import_context` has a @import entry, an invalid context entry
				// error has been detected.
				if import_context.contains_key(Keyword::Import.into_str()) {
					return Err(Error::InvalidContextEntry);
				}

				// Set `context` to the result of merging context into
				// `import_context`, replacing common entries with those from
				// `context`.
				let mut merged = import_context;
				for (key, value) in context {
					if key != Keyword::Import.into_str() {
						merged.insert(key.clone(), value.clone());
					}
				}

				Cow::Owned(merged)
			}
			None => Cow::Borrowed(context),
		};

		// 5.7) If context has a @base entry and remote contexts is empty, i.e.,
		// the currently being processed context is not a remote context:
		if self.remote_contexts.is_empty() {
			match context.get(Keyword::Base.into_str()) {
				Some(Value::Null) => result.set_base_iri(None),
				Some(Value::String(value)) => match Iri::new(value.as_str()) {
					Ok(iri) => result.set_base_iri(Some(iri.to_owned())),
					Err(_) => {
						let resolved =
							resolve_iri(value, result.base_iri()).ok_or(Error::InvalidBaseIri)?;
						result.set_base_iri(Some(resolved))
					}
				},
				Some(_) => return Err(Error::InvalidBaseIri),
				None => (),
			}
		}

		// 5.8) If context has a @vocab entry:
		match context.get(Keyword::Vocab.into_str()) {
			Some(Value::Null) => result.set_vocabulary(None),
			Some(Value::String(value)) => {
				// The vocabulary mapping of result is set to the result of IRI
				// expanding value using true for document relative. If it is not
				// an IRI, or a blank node identifier, an invalid vocab mapping
				// error has been detected.
				match result.expand_iri_with(value, true, true, |w| env.warn(w)) {
					Term::Id(vocab) if vocab.is_valid() => {
						if vocab.is_blank() {
							env.warn(Warning::BlankNodeVocabulary(vocab.to_string()))
						}

						result.set_vocabulary(Some(Term::Id(vocab)))
					}
					_ => return Err(Error::InvalidVocabMapping),
				}
			}
			Some(_) => return Err(Error::InvalidVocabMapping),
			None => (),
		}

		// 5.9) If context has a @language entry:
		match context.get(Keyword::Language.into_str()) {
			Some(Value::Null) => result.set_default_language(None),
			Some(Value::String(tag)) => {
				let tag = LenientLangTagBuf::new(tag.to_ascii_lowercase());
				if !tag.is_well_formed() {
					env.warn(Warning::MalformedLanguageTag(tag.to_string()))
				}

				result.set_default_language(Some(tag))
			}
			Some(_) => return Err(Error::InvalidDefaultLanguage),
			None => (),
		}

		// 5.10) If context has a @direction entry:
		if let Some(value) = context.get(Keyword::Direction.into_str()) {
			// 5.10.1) If processing mode is json-ld-1.0, an invalid context entry error
			// has been detected.
			if self.options.processing_mode == ProcessingMode::JsonLd1_0 {
				return Err(Error::InvalidContextEntry);
			}

			match value {
				Value::Null => result.set_default_base_direction(None),
				Value::String(dir) => {
					let dir: Direction = dir.parse().map_err(|_| Error::InvalidBaseDirection)?;
					result.set_default_base_direction(Some(dir))
				}
				_ => return Err(Error::InvalidBaseDirection),
			}
		}

		// 5.11) If context has a @propagate entry:
		if let Some(value) = context.get(Keyword::Propagate.into_str()) {
			if self.options.processing_mode == ProcessingMode::JsonLd1_0 {
				return Err(Error::InvalidContextEntry);
			}

			if !value.is_boolean() {
				return Err(Error::InvalidPropagateValue);
			}
		}

		let protected = match context.get(Keyword::Protected.into_str()) {
			Some(Value::Bool(b)) => *b,
			Some(_) => return Err(Error::InvalidProtectedValue),
			None => false,
		};

		// 5.12) Create a map `defined` to keep track of whether or not a term
		// has already been defined or is currently being defined during recursion.
		let mut target = TargetContext {
			value: result,
			defined: DefinedTerms::new(),
		};

		// 5.13) For each key-value pair in context where key is not
		// @base, @direction, @import, @language, @propagate, @protected, @version,
		// or @vocab, invoke the Create Term Definition algorithm.
		for key in context.keys() {
			if Keyword::try_from(key.as_str()).is_ok_and(|k| k.is_context_entry()) {
				continue;
			}

			self.define(env, &mut target, &context, key, protected)
				.await?
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{loader::NoLoader, syntax::ErrorCode, Id, RemoteDocument};
	use iref::IriBuf;
	use serde_json::json;
	use static_iref::iri;
	use std::collections::HashMap;

	async fn process(local: Value) -> Result<Context, Error> {
		Context::new(Some(iri!("http://example.org/").to_owned()))
			.process(NoLoader, &local, Some(iri!("http://example.org/")))
			.await
	}

	#[tokio::test]
	async fn simple_terms() {
		let context = process(json!({
			"@vocab": "http://schema.org/",
			"@language": "EN",
			"ex": "http://example.org/ns#",
			"knows": {"@id": "ex:knows", "@type": "@id"},
			"name": null
		}))
		.await
		.unwrap();

		assert_eq!(context.vocabulary().unwrap().as_str(), "http://schema.org/");
		assert_eq!(context.default_language().unwrap().as_str(), "en");
		assert!(context.get("ex").unwrap().prefix);
		assert_eq!(
			context.get("knows").unwrap().value,
			Some(Term::Id(Id::Iri(
				iri!("http://example.org/ns#knows").to_owned()
			)))
		);
		assert_eq!(context.get("knows").unwrap().typ, Some(crate::Type::Id));
		assert_eq!(context.get("name").unwrap().value, None);
	}

	#[tokio::test]
	async fn keyword_redefinition() {
		let err = process(json!({"@id": "http://x/"})).await.unwrap_err();
		assert_eq!(err.code(), ErrorCode::KeywordRedefinition);
	}

	#[tokio::test]
	async fn cyclic_mapping() {
		let err = process(json!({"a": "b:x", "b": "a:y"})).await.unwrap_err();
		assert_eq!(err.code(), ErrorCode::CyclicIriMapping);
	}

	#[tokio::test]
	async fn protected_terms() {
		let context = process(json!({
			"@protected": true,
			"name": "http://schema.org/name"
		}))
		.await
		.unwrap();

		let err = context
			.process(NoLoader, &json!({"name": "http://other.org/name"}), None)
			.await
			.unwrap_err();
		assert_eq!(err.code(), ErrorCode::ProtectedTermRedefinition);

		// Same definition is accepted.
		assert!(context
			.process(NoLoader, &json!({"name": "http://schema.org/name"}), None)
			.await
			.is_ok());

		// Override.
		let overridden = context
			.process_with(
				NoLoader,
				&json!({"name": "http://other.org/name"}),
				None,
				ContextProcessingOptions::default().with_override(),
			)
			.await
			.unwrap();
		assert_eq!(
			overridden.get("name").unwrap().iri(),
			Some("http://other.org/name")
		);

		let err = context
			.process(NoLoader, &Value::Null, None)
			.await
			.unwrap_err();
		assert_eq!(err.code(), ErrorCode::InvalidContextNullification);
	}

	#[tokio::test]
	async fn remote_contexts() {
		let mut loader: HashMap<IriBuf, RemoteDocument> = HashMap::new();
		loader.insert(
			iri!("http://example.org/ctx.jsonld").to_owned(),
			RemoteDocument::new(
				Some(iri!("http://example.org/ctx.jsonld").to_owned()),
				None,
				json!({"@context": {"name": "http://schema.org/name"}}),
			),
		);
		loader.insert(
			iri!("http://example.org/loop.jsonld").to_owned(),
			RemoteDocument::new(
				Some(iri!("http://example.org/loop.jsonld").to_owned()),
				None,
				json!({"@context": "loop.jsonld"}),
			),
		);

		let context = Context::default()
			.process(&loader, &json!("ctx.jsonld"), Some(iri!("http://example.org/")))
			.await
			.unwrap();
		assert_eq!(context.get("name").unwrap().iri(), Some("http://schema.org/name"));

		let err = Context::default()
			.process(&loader, &json!("loop.jsonld"), Some(iri!("http://example.org/")))
			.await
			.unwrap_err();
		assert_eq!(err.code(), ErrorCode::ContextOverflow);

		let err = Context::default()
			.process(&loader, &json!("missing.jsonld"), Some(iri!("http://example.org/")))
			.await
			.unwrap_err();
		assert_eq!(err.code(), ErrorCode::LoadingRemoteContextFailed);
	}

	#[tokio::test]
	async fn invalid_entries() {
		assert_eq!(
			process(json!({"@version": 1.0})).await.unwrap_err().code(),
			ErrorCode::InvalidVersionValue
		);
		assert_eq!(
			process(json!({"@direction": "up"})).await.unwrap_err().code(),
			ErrorCode::InvalidBaseDirection
		);
		assert_eq!(
			process(json!(42)).await.unwrap_err().code(),
			ErrorCode::InvalidLocalContext
		);
		assert_eq!(
			process(json!({"t": {"@id": "http://x/t", "@container": "@foo"}}))
				.await
				.unwrap_err()
				.code(),
			ErrorCode::InvalidContainerMapping
		);
	}
}
