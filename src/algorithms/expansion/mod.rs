//! Expansion algorithm.
//!
//! See: <https://www.w3.org/TR/json-ld11-api/#expansion-algorithms>
use iref::Iri;
use serde_json::Value;

mod array;
mod document;
mod element;
mod error;
mod expanded;
mod literal;
mod node;
mod options;
mod value;

pub use error::*;
pub use expanded::*;
pub use options::*;

pub(crate) use array::*;
pub(crate) use element::*;
pub(crate) use literal::*;
pub(crate) use node::*;
pub(crate) use value::*;

use crate::{
	algorithms::ProcessingEnvironment, Context, ExpandedDocument, Id, RemoteDocument, Term,
};

/// Result of the document expansion.
pub type ExpansionResult = Result<ExpandedDocument, Error>;

/// Document expansion.
///
/// Implemented by JSON values and remote documents.
pub trait Expand {
	/// Base URL used to initialize the default empty context when calling
	/// [`Expand::expand`].
	fn default_base_url(&self) -> Option<&Iri>;

	/// Expand the document with full options.
	///
	/// The `context` is used as initial context, `base_url` is the base URL
	/// used to resolve relative IRI references found in local contexts.
	#[allow(async_fn_in_trait)]
	async fn expand_full(
		&self,
		env: &mut impl ProcessingEnvironment,
		context: Context,
		base_url: Option<&Iri>,
		options: ExpansionOptions,
	) -> ExpansionResult;

	/// Expand the document with an empty initial context.
	#[allow(async_fn_in_trait)]
	async fn expand(&self, mut env: impl ProcessingEnvironment) -> ExpansionResult {
		let base_url = self.default_base_url();
		self.expand_full(
			&mut env,
			Context::new(base_url.map(Iri::to_owned)),
			base_url,
			ExpansionOptions::default(),
		)
		.await
	}
}

/// Value expansion without base URL.
impl Expand for Value {
	fn default_base_url(&self) -> Option<&Iri> {
		None
	}

	async fn expand_full(
		&self,
		env: &mut impl ProcessingEnvironment,
		context: Context,
		base_url: Option<&Iri>,
		options: ExpansionOptions,
	) -> ExpansionResult {
		document::expand(env, self, context, base_url, options).await
	}
}

/// Remote document expansion.
///
/// The default base URL is the URL of the remote document.
impl Expand for RemoteDocument {
	fn default_base_url(&self) -> Option<&Iri> {
		self.url()
	}

	async fn expand_full(
		&self,
		env: &mut impl ProcessingEnvironment,
		context: Context,
		base_url: Option<&Iri>,
		options: ExpansionOptions,
	) -> ExpansionResult {
		self.document()
			.expand_full(env, context, base_url, options)
			.await
	}
}

/// IRI expansion forwarding warnings to the environment.
pub(crate) fn expand_iri(
	env: &mut impl ProcessingEnvironment,
	active_context: &Context,
	value: &str,
	document_relative: bool,
	vocab: bool,
) -> Term {
	active_context.expand_iri_with(value, document_relative, vocab, |w| env.warn(w))
}

/// Node identifier of an expanded `@id` or `@type` value.
pub(crate) fn node_id_of_term(term: Term) -> Option<Id> {
	match term {
		Term::Null => None,
		Term::Id(id) => Some(id),
		Term::Keyword(kw) => Some(Id::Invalid(kw.into_str().to_owned())),
	}
}

/// Views a JSON value as an array, wrapping non-array values.
pub(crate) fn force_as_array(value: &Value) -> &[Value] {
	match value {
		Value::Array(items) => items,
		other => std::slice::from_ref(other),
	}
}

#[cfg(test)]
mod tests;
