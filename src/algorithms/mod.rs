//! JSON-LD algorithms: context processing, expansion, compaction,
//! flattening and RDF conversion.
use std::collections::HashMap;

use iref::{Iri, IriBuf};

pub mod compaction;
pub mod context_processing;
pub mod expansion;
pub mod flattening;
pub mod rdf;
mod warning;

pub use compaction::{CompactionOptions, IriCompaction};
pub use context_processing::{ContextProcessingOptions, RemoteContext, ScopedContextKey};
pub use expansion::{ExpansionOptions, ExpansionPolicy};
pub use flattening::NodeMap;
pub use rdf::{FromRdfOptions, ToRdfOptions};
pub use warning::*;

use crate::{Context, Loader};

/// Processing environment.
///
/// Gives the algorithms access to the document loader, and receives the
/// warnings emitted during processing.
pub trait ProcessingEnvironment {
	type Loader: Loader;

	fn loader(&self) -> &Self::Loader;

	fn warn(&mut self, w: Warning);

	/// Returns the remote context previously loaded from `url`, if any.
	fn cached_context(&self, _url: &Iri) -> Option<&RemoteContext> {
		None
	}

	/// Stores a loaded remote context.
	fn cache_context(&mut self, _url: IriBuf, _context: RemoteContext) {}

	/// Returns a previously processed scoped context, if any.
	fn cached_scoped_context(&self, _key: &ScopedContextKey) -> Option<&Context> {
		None
	}

	/// Stores a processed scoped context.
	fn cache_scoped_context(&mut self, _key: ScopedContextKey, _context: Context) {}
}

/// Any loader is a processing environment forwarding warnings to the
/// logger.
impl<L: Loader> ProcessingEnvironment for L {
	type Loader = Self;

	fn loader(&self) -> &Self::Loader {
		self
	}

	fn warn(&mut self, w: Warning) {
		log::warn!("{w}")
	}
}

pub struct ProcessingEnvironmentRefMut<'a, T>(pub &'a mut T);

impl<'a, T: ProcessingEnvironment> ProcessingEnvironment for ProcessingEnvironmentRefMut<'a, T> {
	type Loader = T::Loader;

	fn loader(&self) -> &Self::Loader {
		self.0.loader()
	}

	fn warn(&mut self, w: Warning) {
		self.0.warn(w);
	}

	fn cached_context(&self, url: &Iri) -> Option<&RemoteContext> {
		self.0.cached_context(url)
	}

	fn cache_context(&mut self, url: IriBuf, context: RemoteContext) {
		self.0.cache_context(url, context)
	}

	fn cached_scoped_context(&self, key: &ScopedContextKey) -> Option<&Context> {
		self.0.cached_scoped_context(key)
	}

	fn cache_scoped_context(&mut self, key: ScopedContextKey, context: Context) {
		self.0.cache_scoped_context(key, context)
	}
}

/// Processing environment of a single processing invocation.
///
/// Remote contexts and scoped contexts are processed at most once. Warnings
/// are logged and collected.
pub struct Environment<L> {
	loader: L,
	warnings: Vec<Warning>,
	contexts: HashMap<IriBuf, RemoteContext>,
	scoped_contexts: HashMap<ScopedContextKey, Context>,
}

impl<L> Environment<L> {
	pub fn new(loader: L) -> Self {
		Self {
			loader,
			warnings: Vec::new(),
			contexts: HashMap::new(),
			scoped_contexts: HashMap::new(),
		}
	}

	/// Warnings emitted so far.
	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}

	pub fn into_warnings(self) -> Vec<Warning> {
		self.warnings
	}
}

impl<L: Loader> ProcessingEnvironment for Environment<L> {
	type Loader = L;

	fn loader(&self) -> &L {
		&self.loader
	}

	fn warn(&mut self, w: Warning) {
		log::warn!("{w}");
		self.warnings.push(w)
	}

	fn cached_context(&self, url: &Iri) -> Option<&RemoteContext> {
		self.contexts.get(url)
	}

	fn cache_context(&mut self, url: IriBuf, context: RemoteContext) {
		self.contexts.insert(url, context);
	}

	fn cached_scoped_context(&self, key: &ScopedContextKey) -> Option<&Context> {
		self.scoped_contexts.get(key)
	}

	fn cache_scoped_context(&mut self, key: ScopedContextKey, context: Context) {
		self.scoped_contexts.insert(key, context);
	}
}
