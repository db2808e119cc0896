//! Processed (active) contexts.
use std::{
	cell::OnceCell,
	sync::atomic::{AtomicU64, Ordering},
};

use iref::{Iri, IriBuf};

use crate::syntax::{Direction, LenientLangTagBuf};
use crate::Term;

mod definition;
pub mod inverse;

pub use definition::*;
pub use inverse::InverseContext;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn next_id() -> u64 {
	NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Active context.
///
/// Result of the context processing algorithm. A context is never mutated
/// once it is shared: processing a local context clones the active context
/// and modifies the copy. The inverse context is computed on first use and
/// dropped by every mutating method.
#[derive(Clone, Debug)]
pub struct Context {
	id: u64,
	original_base_url: Option<IriBuf>,
	base_iri: Option<IriBuf>,
	vocabulary: Option<Term>,
	default_language: Option<LenientLangTagBuf>,
	default_base_direction: Option<Direction>,
	previous_context: Option<Box<Self>>,
	definitions: Definitions,
	inverse: OnceCell<InverseContext>,
}

impl Context {
	/// Creates a new empty context with the given base IRI.
	pub fn new(base_iri: Option<IriBuf>) -> Self {
		Self {
			id: next_id(),
			original_base_url: base_iri.clone(),
			base_iri,
			vocabulary: None,
			default_language: None,
			default_base_direction: None,
			previous_context: None,
			definitions: Definitions::default(),
			inverse: OnceCell::new(),
		}
	}

	/// Identity of the content of this context.
	///
	/// Clones share it, and every mutating method assigns a new one.
	pub fn id(&self) -> u64 {
		self.id
	}

	fn touch(&mut self) {
		self.id = next_id();
		self.inverse = OnceCell::new();
	}

	/// Returns the definition of the given term, if any.
	pub fn get(&self, term: &str) -> Option<&TermDefinition> {
		self.definitions.get(term)
	}

	pub fn contains_term(&self, term: &str) -> bool {
		self.definitions.contains_key(term)
	}

	pub fn original_base_url(&self) -> Option<&Iri> {
		self.original_base_url.as_deref()
	}

	pub fn base_iri(&self) -> Option<&Iri> {
		self.base_iri.as_deref()
	}

	pub fn vocabulary(&self) -> Option<&Term> {
		self.vocabulary.as_ref()
	}

	pub fn default_language(&self) -> Option<&LenientLangTagBuf> {
		self.default_language.as_ref()
	}

	pub fn default_base_direction(&self) -> Option<Direction> {
		self.default_base_direction
	}

	pub fn previous_context(&self) -> Option<&Self> {
		self.previous_context.as_deref()
	}

	pub fn definitions(&self) -> &Definitions {
		&self.definitions
	}

	pub fn has_protected_items(&self) -> bool {
		self.definitions.has_protected_items()
	}

	/// Returns the inverse of this context, computing it if necessary.
	pub fn inverse(&self) -> &InverseContext {
		self.inverse.get_or_init(|| InverseContext::from(self))
	}

	/// Sets the definition of `term`, returning the previous one.
	pub fn set(&mut self, term: String, definition: Option<TermDefinition>) -> Option<TermDefinition> {
		self.touch();
		match definition {
			Some(definition) => self.definitions.insert(term, definition),
			None => self.definitions.remove(&term),
		}
	}

	pub fn set_base_iri(&mut self, iri: Option<IriBuf>) {
		self.touch();
		self.base_iri = iri
	}

	pub fn set_vocabulary(&mut self, vocab: Option<Term>) {
		self.touch();
		self.vocabulary = vocab
	}

	pub fn set_default_language(&mut self, lang: Option<LenientLangTagBuf>) {
		self.touch();
		self.default_language = lang
	}

	pub fn set_default_base_direction(&mut self, dir: Option<Direction>) {
		self.touch();
		self.default_base_direction = dir
	}

	pub fn set_previous_context(&mut self, previous: Self) {
		self.touch();
		self.previous_context = Some(Box::new(previous))
	}
}

impl Default for Context {
	fn default() -> Self {
		Self::new(None)
	}
}
