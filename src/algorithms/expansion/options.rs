use crate::{algorithms::ContextProcessingOptions, ProcessingMode};

/// Expansion options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpansionOptions {
	/// Sets the processing mode.
	pub processing_mode: ProcessingMode,

	/// Term expansion policy.
	///
	/// Default is `ExpansionPolicy::default()`.
	pub policy: ExpansionPolicy,

	/// If set to true, input document entries are processed lexicographically.
	/// If false, order is not considered in processing.
	pub ordered: bool,

	/// Expands a frame rather than a document.
	///
	/// Top-level nodes with only an `@id` are kept, and `@id`/`@type` accept
	/// the wildcard `{}`.
	pub frame_expansion: bool,
}

impl ExpansionOptions {
	pub fn unordered(self) -> Self {
		Self {
			ordered: false,
			..self
		}
	}

	pub fn with_ordered(self, ordered: bool) -> Self {
		Self { ordered, ..self }
	}

	pub fn for_frame(self) -> Self {
		Self {
			frame_expansion: true,
			..self
		}
	}
}

impl From<ExpansionOptions> for ContextProcessingOptions {
	fn from(options: ExpansionOptions) -> ContextProcessingOptions {
		ContextProcessingOptions::new(options.processing_mode)
	}
}

/// What to do with a key that does not expand as expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	/// Keep the key.
	Keep,

	/// Silently drop the key.
	Drop,

	/// Fail with an error.
	Reject,
}

/// Key expansion policy.
///
/// The default behavior of the expansion algorithm is to drop keys that are
/// not defined in the context unless:
///   - there is a vocabulary mapping (`@vocab`) defined in the context; or
///   - the term contains a `:` character.
///
/// In other words, a key that cannot be expanded into an IRI or a blank node
/// identifier is dropped unless it contains a `:` character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionPolicy {
	/// How to expand keys containing a `:` that are not valid IRIs.
	pub invalid: Action,

	/// Whether keys that expand to nothing are dropped (`true`) or rejected.
	pub allow_undefined: bool,
}

impl ExpansionPolicy {
	/// Keeps every key that looks like an IRI.
	pub const RELAXED: Self = Self {
		invalid: Action::Keep,
		allow_undefined: true,
	};

	/// Drops invalid keys.
	pub const STANDARD: Self = Self {
		invalid: Action::Drop,
		allow_undefined: true,
	};

	/// Rejects any key that does not expand to a valid IRI.
	pub const STRICT: Self = Self {
		invalid: Action::Reject,
		allow_undefined: false,
	};

	pub fn is_strict(&self) -> bool {
		!self.allow_undefined
	}
}

impl Default for ExpansionPolicy {
	fn default() -> Self {
		Self::RELAXED
	}
}
