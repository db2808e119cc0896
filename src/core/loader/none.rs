use iref::Iri;

use super::{LoadError, LoadOptions, Loader};
use crate::RemoteDocument;

/// Dummy loader.
///
/// Fails with a `loading document failed` error at every attempt.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLoader;

#[derive(Debug, thiserror::Error)]
#[error("no loader")]
pub struct CannotLoad;

impl Loader for NoLoader {
	#[inline(always)]
	async fn load_with(&self, url: &Iri, _: &LoadOptions) -> Result<RemoteDocument, LoadError> {
		Err(LoadError::new(url.to_owned(), CannotLoad))
	}
}
