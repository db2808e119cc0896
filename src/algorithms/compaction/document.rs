use serde_json::{Map, Value};

use crate::{
	algorithms::{
		compaction::CompactIndexedFragment, flattening::FlattenedDocument, ProcessingEnvironment,
	},
	syntax::Keyword,
	Context, ExpandedDocument, Indexed,
};

use super::{CompactFragment, CompactionOptions, Compactor, Error};

/// Document that can be compacted.
///
/// Implemented by expanded documents (`Vec<IndexedObject>`) and flattened
/// documents (`Vec<IndexedNode>`).
pub trait Compact {
	/// Compacts the document with the given active context and options.
	///
	/// The result is a JSON object, without `@context` entry: a top-level
	/// array is put under the (aliased) `@graph` entry. Use
	/// [`EmbedContext::embed_context`] to add the context.
	#[allow(async_fn_in_trait)]
	async fn compact_full(
		&self,
		env: &mut impl ProcessingEnvironment,
		context: &Context,
		options: CompactionOptions,
	) -> Result<Value, Error>;

	/// Compacts the document with the default options.
	#[allow(async_fn_in_trait)]
	async fn compact(
		&self,
		mut env: impl ProcessingEnvironment,
		context: &Context,
	) -> Result<Value, Error> {
		self.compact_full(&mut env, context, CompactionOptions::default())
			.await
	}
}

#[allow(clippy::ptr_arg)]
async fn compact_document<T: CompactIndexedFragment>(
	document: &Vec<Indexed<T>>,
	env: &mut impl ProcessingEnvironment,
	context: &Context,
	options: CompactionOptions,
) -> Result<Value, Error> {
	let compactor = Compactor::new(context, options);
	let compacted = document.compact_fragment(env, &compactor).await?;

	match compacted {
		Value::Array(items) => {
			let mut result = Map::new();
			if !items.is_empty() {
				result.insert(compactor.compact_keyword(Keyword::Graph)?, Value::Array(items));
			}

			Ok(Value::Object(result))
		}
		Value::Null => Ok(Value::Object(Map::new())),
		compacted => Ok(compacted),
	}
}

impl Compact for ExpandedDocument {
	async fn compact_full(
		&self,
		env: &mut impl ProcessingEnvironment,
		context: &Context,
		options: CompactionOptions,
	) -> Result<Value, Error> {
		compact_document(self, env, context, options).await
	}
}

impl Compact for FlattenedDocument {
	async fn compact_full(
		&self,
		env: &mut impl ProcessingEnvironment,
		context: &Context,
		options: CompactionOptions,
	) -> Result<Value, Error> {
		compact_document(self, env, context, options).await
	}
}

/// Context embedding.
///
/// Used at the end of compaction to include the context used to compact
/// the document into the compacted output.
pub trait EmbedContext {
	/// Embeds the given local context, as the first entry of the document.
	///
	/// Nothing is embedded if the document or the context is empty.
	fn embed_context(&mut self, local_context: &Value);
}

impl EmbedContext for Value {
	fn embed_context(&mut self, local_context: &Value) {
		let context_is_empty = match local_context {
			Value::Null => true,
			Value::Array(items) => items.is_empty(),
			Value::Object(map) => map.is_empty(),
			_ => false,
		};

		if let Value::Object(map) = self {
			if !map.is_empty() && !context_is_empty {
				let mut result = Map::with_capacity(map.len() + 1);
				result.insert(Keyword::Context.into_str().to_owned(), local_context.clone());
				result.extend(std::mem::take(map));
				*map = result
			}
		}
	}
}
