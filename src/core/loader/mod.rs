use iref::{Iri, IriBuf};

pub mod fs;
pub mod map;
pub mod none;

#[cfg(feature = "reqwest")]
pub mod reqwest;

pub use fs::FsLoader;
pub use none::NoLoader;

#[cfg(feature = "reqwest")]
pub use self::reqwest::ReqwestLoader;

use crate::RemoteDocument;

/// Profile of JSON-LD context documents.
pub const CONTEXT_PROFILE: &str = "http://www.w3.org/ns/json-ld#context";

/// Loading error.
#[derive(Debug, thiserror::Error)]
#[error("loading document `{target}` failed: {cause}")]
pub struct LoadError {
	pub target: IriBuf,
	pub cause: anyhow::Error,
}

impl LoadError {
	pub fn new(target: IriBuf, cause: impl Into<anyhow::Error>) -> Self {
		Self {
			target,
			cause: cause.into(),
		}
	}
}

/// Options of a single load request.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
	/// Expected profile of the loaded document.
	pub profile: Option<String>,

	/// Profiles requested from the server, in order of preference.
	pub request_profile: Vec<String>,
}

impl LoadOptions {
	/// Options used when loading remote contexts.
	pub fn context() -> Self {
		Self {
			profile: Some(CONTEXT_PROFILE.to_owned()),
			request_profile: vec![CONTEXT_PROFILE.to_owned()],
		}
	}
}

/// Document loader.
///
/// A document loader is required by every processing function to fetch
/// remote documents identified by an IRI, in particular the remote contexts
/// referenced by `@context` and `@import` entries.
///
/// This library provides a few implementations:
///   - [`NoLoader`] always fails. Use it when no loading is expected.
///   - [`HashMap`](std::collections::HashMap) and
///     [`BTreeMap`](std::collections::BTreeMap) mapping IRIs to preloaded
///     documents.
///   - [`FsLoader`] maps IRI prefixes to local directories, and loads
///     `file:` IRIs.
///   - `ReqwestLoader` downloads documents over HTTP using
///     [`reqwest`](https://crates.io/crates/reqwest).
///     This requires the `reqwest` feature.
pub trait Loader {
	/// Loads the document behind the given IRI.
	#[allow(async_fn_in_trait)]
	async fn load_with(&self, url: &Iri, options: &LoadOptions) -> Result<RemoteDocument, LoadError>;

	/// Loads the document behind the given IRI with the default options.
	#[allow(async_fn_in_trait)]
	async fn load(&self, url: &Iri) -> Result<RemoteDocument, LoadError> {
		self.load_with(url, &LoadOptions::default()).await
	}
}

impl<'l, L: Loader> Loader for &'l L {
	async fn load_with(&self, url: &Iri, options: &LoadOptions) -> Result<RemoteDocument, LoadError> {
		L::load_with(self, url, options).await
	}
}

impl<'l, L: Loader> Loader for &'l mut L {
	async fn load_with(&self, url: &Iri, options: &LoadOptions) -> Result<RemoteDocument, LoadError> {
		L::load_with(self, url, options).await
	}
}

/// Parses the content of a loaded document as JSON.
pub(crate) fn parse_json(url: &Iri, content: &str) -> Result<serde_json::Value, LoadError> {
	serde_json::from_str(content).map_err(|e| LoadError::new(url.to_owned(), e))
}
