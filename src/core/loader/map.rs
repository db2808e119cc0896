use iref::{Iri, IriBuf};
use std::collections::{BTreeMap, HashMap};

use super::{LoadError, LoadOptions, Loader};
use crate::RemoteDocument;

/// Error returned by [`HashMap`] or [`BTreeMap`] loaders when the requested
/// document is not in the map.
#[derive(Debug, thiserror::Error)]
#[error("document not found")]
pub struct EntryNotFound;

impl Loader for HashMap<IriBuf, RemoteDocument> {
	async fn load_with(&self, url: &Iri, _: &LoadOptions) -> Result<RemoteDocument, LoadError> {
		match self.get(url) {
			Some(document) => Ok(document.clone()),
			None => Err(LoadError::new(url.to_owned(), EntryNotFound)),
		}
	}
}

impl Loader for BTreeMap<IriBuf, RemoteDocument> {
	async fn load_with(&self, url: &Iri, _: &LoadOptions) -> Result<RemoteDocument, LoadError> {
		match self.get(url) {
			Some(document) => Ok(document.clone()),
			None => Err(LoadError::new(url.to_owned(), EntryNotFound)),
		}
	}
}
