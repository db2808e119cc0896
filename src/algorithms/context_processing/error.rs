use crate::{syntax::ErrorCode, LoadError};

/// Context processing error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid context nullification")]
	InvalidContextNullification,

	#[error("remote document loading failed: {0}")]
	LoadingRemoteContextFailed(LoadError),

	#[error("invalid remote context IRI `{0}`")]
	InvalidContextIri(String),

	#[error("processing mode conflict")]
	ProcessingModeConflict,

	#[error("invalid `@version` value")]
	InvalidVersionValue,

	#[error("invalid `@context` entry")]
	InvalidContextEntry,

	#[error("invalid local context")]
	InvalidLocalContext,

	#[error("invalid `@import` value")]
	InvalidImportValue,

	#[error("invalid remote context")]
	InvalidRemoteContext,

	#[error("invalid base IRI")]
	InvalidBaseIri,

	#[error("invalid vocabulary mapping")]
	InvalidVocabMapping,

	#[error("invalid default language")]
	InvalidDefaultLanguage,

	#[error("invalid base direction")]
	InvalidBaseDirection,

	#[error("invalid `@propagate` value")]
	InvalidPropagateValue,

	#[error("invalid `@protected` value")]
	InvalidProtectedValue,

	#[error("context overflow")]
	ContextOverflow,

	#[error("cyclic IRI mapping for term `{0}`")]
	CyclicIriMapping(String),

	#[error("invalid term definition")]
	InvalidTermDefinition,

	#[error("keyword `{0}` redefinition")]
	KeywordRedefinition(String),

	#[error("invalid scoped context")]
	InvalidScopedContext,

	#[error("invalid type mapping")]
	InvalidTypeMapping,

	#[error("invalid reverse property")]
	InvalidReverseProperty,

	#[error("invalid IRI mapping")]
	InvalidIriMapping,

	#[error("invalid keyword alias")]
	InvalidKeywordAlias,

	#[error("invalid container mapping")]
	InvalidContainerMapping,

	#[error("invalid language mapping")]
	InvalidLanguageMapping,

	#[error("invalid `@nest` value")]
	InvalidNestValue,

	#[error("invalid `@prefix` value")]
	InvalidPrefixValue,

	#[error("protected term `{0}` redefinition")]
	ProtectedTermRedefinition(String),
}

impl Error {
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::InvalidContextNullification => ErrorCode::InvalidContextNullification,
			Self::LoadingRemoteContextFailed(_) => ErrorCode::LoadingRemoteContextFailed,
			Self::InvalidContextIri(_) => ErrorCode::LoadingDocumentFailed,
			Self::ProcessingModeConflict => ErrorCode::ProcessingModeConflict,
			Self::InvalidVersionValue => ErrorCode::InvalidVersionValue,
			Self::InvalidContextEntry => ErrorCode::InvalidContextEntry,
			Self::InvalidLocalContext => ErrorCode::InvalidLocalContext,
			Self::InvalidImportValue => ErrorCode::InvalidImportValue,
			Self::InvalidRemoteContext => ErrorCode::InvalidRemoteContext,
			Self::InvalidBaseIri => ErrorCode::InvalidBaseIri,
			Self::InvalidVocabMapping => ErrorCode::InvalidVocabMapping,
			Self::InvalidDefaultLanguage => ErrorCode::InvalidDefaultLanguage,
			Self::InvalidBaseDirection => ErrorCode::InvalidBaseDirection,
			Self::InvalidPropagateValue => ErrorCode::InvalidPropagateValue,
			Self::InvalidProtectedValue => ErrorCode::InvalidProtectedValue,
			Self::ContextOverflow => ErrorCode::ContextOverflow,
			Self::CyclicIriMapping(_) => ErrorCode::CyclicIriMapping,
			Self::InvalidTermDefinition => ErrorCode::InvalidTermDefinition,
			Self::KeywordRedefinition(_) => ErrorCode::KeywordRedefinition,
			Self::InvalidScopedContext => ErrorCode::InvalidScopedContext,
			Self::InvalidTypeMapping => ErrorCode::InvalidTypeMapping,
			Self::InvalidReverseProperty => ErrorCode::InvalidReverseProperty,
			Self::InvalidIriMapping => ErrorCode::InvalidIriMapping,
			Self::InvalidKeywordAlias => ErrorCode::InvalidKeywordAlias,
			Self::InvalidContainerMapping => ErrorCode::InvalidContainerMapping,
			Self::InvalidLanguageMapping => ErrorCode::InvalidLanguageMapping,
			Self::InvalidNestValue => ErrorCode::InvalidNestValue,
			Self::InvalidPrefixValue => ErrorCode::InvalidPrefixValue,
			Self::ProtectedTermRedefinition(_) => ErrorCode::ProtectedTermRedefinition,
		}
	}
}
