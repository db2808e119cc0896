use crate::ProcessingMode;

/// Context processing options.
///
/// Expansion and compaction derive these from their own options, then
/// adjust them per context: property-scoped contexts may override protected
/// terms, type-scoped contexts do not propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextProcessingOptions {
	pub processing_mode: ProcessingMode,

	/// Allows redefining protected terms.
	pub override_protected: bool,

	/// Whether the resulting context applies to nested node objects.
	///
	/// A context that does not propagate keeps the active context it was
	/// processed on as previous context.
	pub propagate: bool,
}

impl ContextProcessingOptions {
	/// Default options in the given processing mode.
	pub fn new(processing_mode: ProcessingMode) -> Self {
		Self {
			processing_mode,
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_override(self) -> Self {
		Self {
			override_protected: true,
			..self
		}
	}

	#[must_use]
	pub fn with_no_override(self) -> Self {
		Self {
			override_protected: false,
			..self
		}
	}

	#[must_use]
	pub fn without_propagation(self) -> Self {
		Self {
			propagate: false,
			..self
		}
	}
}

impl Default for ContextProcessingOptions {
	fn default() -> Self {
		Self {
			processing_mode: ProcessingMode::default(),
			override_protected: false,
			propagate: true,
		}
	}
}

impl From<ProcessingMode> for ContextProcessingOptions {
	fn from(processing_mode: ProcessingMode) -> Self {
		Self::new(processing_mode)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn adjustments() {
		let options = ContextProcessingOptions::from(ProcessingMode::JsonLd1_0);
		assert_eq!(options.processing_mode, ProcessingMode::JsonLd1_0);
		assert!(options.propagate);

		let scoped = options.with_override().without_propagation();
		assert!(scoped.override_protected && !scoped.propagate);
		assert!(!scoped.with_no_override().override_protected);
		assert_eq!(scoped.processing_mode, ProcessingMode::JsonLd1_0)
	}
}
