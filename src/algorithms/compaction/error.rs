use crate::{algorithms::context_processing, syntax::ErrorCode};

/// Compaction error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	ContextProcessing(#[from] context_processing::Error),

	#[error("IRI `{0}` confused with prefix")]
	IriConfusedWithPrefix(String),

	#[error("invalid `@nest` value `{0}`")]
	InvalidNestValue(String),
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::ContextProcessing(e) => e.code(),
			Self::IriConfusedWithPrefix(_) => ErrorCode::IriConfusedWithPrefix,
			Self::InvalidNestValue(_) => ErrorCode::InvalidNestValue,
		}
	}
}
