/// Non fatal issue found while processing a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
	#[error("keyword-like term `{0}`")]
	KeywordLikeTerm(String),

	#[error("keyword-like value `{0}`")]
	KeywordLikeValue(String),

	#[error("malformed IRI `{0}`")]
	MalformedIri(String),

	#[error("empty term")]
	EmptyTerm,

	#[error("blank node identifier `{0}` used as property")]
	BlankNodeIdProperty(String),

	#[error("blank node identifier `{0}` used as vocabulary mapping")]
	BlankNodeVocabulary(String),

	#[error("malformed language tag `{0}`")]
	MalformedLanguageTag(String),
}
