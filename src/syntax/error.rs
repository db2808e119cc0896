use std::fmt;

macro_rules! error_codes {
	{
		$(
			$(#[$meta:meta])*
			$ident:ident : $lit:literal
		),*
	} => {
		/// Error code.
		///
		/// Every processing error maps to one of the error codes defined by
		/// the JSON-LD 1.1 API.
		#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
		pub enum ErrorCode {
			$(
				$(#[$meta])*
				$ident
			),*
		}

		impl ErrorCode {
			/// Normative spelling of the error code.
			pub fn as_str(&self) -> &'static str {
				match self {
					$(
						Self::$ident => $lit
					),*
				}
			}
		}

		impl<'a> TryFrom<&'a str> for ErrorCode {
			type Error = &'a str;

			fn try_from(name: &'a str) -> Result<ErrorCode, &'a str> {
				match name {
					$(
						$lit => Ok(Self::$ident),
					)*
					_ => Err(name)
				}
			}
		}
	};
}

error_codes! {
	/// Two properties which expand to the same keyword have been detected.
	CollidingKeywords : "colliding keywords",

	/// Multiple conflicting indexes have been found for the same node.
	ConflictingIndexes : "conflicting indexes",

	/// Maximum number of `@context` URLs exceeded.
	ContextOverflow : "context overflow",

	/// A cycle in IRI mappings has been detected.
	CyclicIriMapping : "cyclic IRI mapping",

	/// An `@id` entry was encountered whose value was not a string.
	InvalidIdValue : "invalid @id value",

	/// An invalid value for `@import` has been found.
	InvalidImportValue : "invalid @import value",

	/// An included block contains an invalid value.
	InvalidIncludedValue : "invalid @included value",

	/// An `@index` entry was encountered whose value was not a string.
	InvalidIndexValue : "invalid @index value",

	/// An invalid value for `@nest` has been found.
	InvalidNestValue : "invalid @nest value",

	/// An invalid value for `@prefix` has been found.
	InvalidPrefixValue : "invalid @prefix value",

	/// An invalid value for `@propagate` has been found.
	InvalidPropagateValue : "invalid @propagate value",

	/// An invalid value for `@protected` has been found.
	InvalidProtectedValue : "invalid @protected value",

	/// An invalid value for an `@reverse` entry has been detected.
	InvalidReverseValue : "invalid @reverse value",

	/// The `@version` entry was used in a context with an out of range value.
	InvalidVersionValue : "invalid @version value",

	/// The value of `@direction` is not `"ltr"`, `"rtl"`, or null.
	InvalidBaseDirection : "invalid base direction",

	/// An invalid base IRI has been detected.
	InvalidBaseIri : "invalid base IRI",

	/// An `@container` entry was encountered whose value was not valid.
	InvalidContainerMapping : "invalid container mapping",

	/// An entry in a context is invalid due to processing mode incompatibility.
	InvalidContextEntry : "invalid context entry",

	/// An attempt was made to nullify a context containing protected term
	/// definitions.
	InvalidContextNullification : "invalid context nullification",

	/// The value of the default language is not a string or null.
	InvalidDefaultLanguage : "invalid default language",

	/// A local context contains a term that has an invalid or missing IRI
	/// mapping.
	InvalidIriMapping : "invalid IRI mapping",

	/// An invalid JSON literal was detected.
	InvalidJsonLiteral : "invalid JSON literal",

	/// An invalid keyword alias definition has been encountered.
	InvalidKeywordAlias : "invalid keyword alias",

	/// An invalid value in a language map has been detected.
	InvalidLanguageMapValue : "invalid language map value",

	/// An `@language` entry in a term definition was encountered whose value
	/// was neither a string nor null.
	InvalidLanguageMapping : "invalid language mapping",

	/// A language-tagged string with an invalid language value was detected.
	InvalidLanguageTaggedString : "invalid language-tagged string",

	/// A number, `true`, or `false` with an associated language tag was
	/// detected.
	InvalidLanguageTaggedValue : "invalid language-tagged value",

	/// An invalid local context was detected.
	InvalidLocalContext : "invalid local context",

	/// No valid context document has been found for a referenced remote
	/// context.
	InvalidRemoteContext : "invalid remote context",

	/// An invalid reverse property definition has been detected.
	InvalidReverseProperty : "invalid reverse property",

	/// An invalid reverse property map has been detected.
	InvalidReversePropertyMap : "invalid reverse property map",

	/// An invalid value for a reverse property has been detected.
	InvalidReversePropertyValue : "invalid reverse property value",

	/// The local context defined within a term definition is invalid.
	InvalidScopedContext : "invalid scoped context",

	/// A set object or list object with disallowed entries has been detected.
	InvalidSetOrListObject : "invalid set or list object",

	/// An invalid term definition has been detected.
	InvalidTermDefinition : "invalid term definition",

	/// An `@type` entry in a term definition was encountered whose value
	/// could not be expanded to an IRI.
	InvalidTypeMapping : "invalid type mapping",

	/// An invalid value for an `@type` entry has been detected.
	InvalidTypeValue : "invalid type value",

	/// A typed value with an invalid type was detected.
	InvalidTypedValue : "invalid typed value",

	/// A value object with disallowed entries has been detected.
	InvalidValueObject : "invalid value object",

	/// An invalid value for the `@value` entry of a value object has been
	/// detected.
	InvalidValueObjectValue : "invalid value object value",

	/// An invalid vocabulary mapping has been detected.
	InvalidVocabMapping : "invalid vocab mapping",

	/// When compacting an IRI would result in an IRI which could be confused
	/// with a compact IRI.
	IriConfusedWithPrefix : "IRI confused with prefix",

	/// A keyword redefinition has been detected.
	KeywordRedefinition : "keyword redefinition",

	/// The document could not be loaded or parsed as JSON.
	LoadingDocumentFailed : "loading document failed",

	/// There was a problem encountered loading a remote context.
	LoadingRemoteContextFailed : "loading remote context failed",

	/// An attempt was made to change the processing mode which is
	/// incompatible with the previous specified version.
	ProcessingModeConflict : "processing mode conflict",

	/// An attempt was made to redefine a protected term.
	ProtectedTermRedefinition : "protected term redefinition"
}

impl fmt::Display for ErrorCode {
	#[inline(always)]
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}
