use crate::{algorithms::context_processing, syntax::ErrorCode};

/// Expansion error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("context processing failed: {0}")]
	ContextProcessing(#[from] context_processing::Error),

	#[error("invalid `@index` value")]
	InvalidIndexValue,

	#[error("invalid set or list object")]
	InvalidSetOrListObject,

	#[error("invalid `@reverse` property map")]
	InvalidReversePropertyMap,

	#[error("invalid `@type` value")]
	InvalidTypeValue,

	#[error("key `{0}` expansion failed")]
	KeyExpansionFailed(String),

	#[error("invalid `@reverse` property value")]
	InvalidReversePropertyValue,

	#[error("invalid `@language` map value")]
	InvalidLanguageMapValue,

	#[error("colliding keywords: `{0}`")]
	CollidingKeywords(String),

	#[error("invalid `@id` value")]
	InvalidIdValue,

	#[error("invalid `@included` value")]
	InvalidIncludedValue,

	#[error("invalid `@reverse` value")]
	InvalidReverseValue,

	#[error("invalid `@nest` value")]
	InvalidNestValue,

	#[error("invalid language tagged string")]
	InvalidLanguageTaggedString,

	#[error("invalid base `@direction`")]
	InvalidBaseDirection,

	#[error("invalid typed value")]
	InvalidTypedValue,

	#[error("invalid value object")]
	InvalidValueObject,

	#[error("invalid value object value")]
	InvalidValueObjectValue,

	#[error("invalid language tagged value")]
	InvalidLanguageTaggedValue,
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::ContextProcessing(e) => e.code(),
			Self::InvalidIndexValue => ErrorCode::InvalidIndexValue,
			Self::InvalidSetOrListObject => ErrorCode::InvalidSetOrListObject,
			Self::InvalidReversePropertyMap => ErrorCode::InvalidReversePropertyMap,
			Self::InvalidTypeValue => ErrorCode::InvalidTypeValue,
			Self::KeyExpansionFailed(_) => ErrorCode::InvalidIriMapping,
			Self::InvalidReversePropertyValue => ErrorCode::InvalidReversePropertyValue,
			Self::InvalidLanguageMapValue => ErrorCode::InvalidLanguageMapValue,
			Self::CollidingKeywords(_) => ErrorCode::CollidingKeywords,
			Self::InvalidIdValue => ErrorCode::InvalidIdValue,
			Self::InvalidIncludedValue => ErrorCode::InvalidIncludedValue,
			Self::InvalidReverseValue => ErrorCode::InvalidReverseValue,
			Self::InvalidNestValue => ErrorCode::InvalidNestValue,
			Self::InvalidLanguageTaggedString => ErrorCode::InvalidLanguageTaggedString,
			Self::InvalidBaseDirection => ErrorCode::InvalidBaseDirection,
			Self::InvalidTypedValue => ErrorCode::InvalidTypedValue,
			Self::InvalidValueObject => ErrorCode::InvalidValueObject,
			Self::InvalidValueObjectValue => ErrorCode::InvalidValueObjectValue,
			Self::InvalidLanguageTaggedValue => ErrorCode::InvalidLanguageTaggedValue,
		}
	}
}
