use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not a JSON-LD keyword.
#[derive(Clone, Debug, thiserror::Error)]
#[error("`{0}` is not a keyword")]
pub struct NotAKeyword(pub String);

macro_rules! keyword {
	{
		$(
			$(#[$meta:meta])*
			$ident:ident : $lit:literal
		),*
	} => {
		/// JSON-LD keywords.
		#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
		#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
		pub enum Keyword {
			$(
				$(#[$meta])*
				#[cfg_attr(feature = "serde", serde(rename = $lit))]
				$ident
			),*
		}

		impl Keyword {
			pub fn into_str(self) -> &'static str {
				match self {
					$(
						Self::$ident => $lit
					),*
				}
			}

			/// Every keyword, in declaration order.
			pub const ALL: &'static [Keyword] = &[$(Self::$ident),*];
		}

		impl<'a> TryFrom<&'a str> for Keyword {
			type Error = &'a str;

			fn try_from(input: &'a str) -> Result<Keyword, &'a str> {
				match input {
					$(
						$lit => Ok(Self::$ident),
					)*
					_ => Err(input)
				}
			}
		}
	};
}

keyword! {
	/// `@base`.
	/// Base IRI against which relative IRI references are resolved.
	Base : "@base",

	/// `@container`.
	Container : "@container",

	/// `@context`.
	Context : "@context",

	/// `@direction`.
	/// Base direction of a string value.
	Direction : "@direction",

	/// `@graph`.
	Graph : "@graph",

	/// `@id`.
	/// Identifier (IRI or blank node identifier) of a node object.
	Id : "@id",

	/// `@import`.
	/// Remote context merged into the enclosing context definition.
	Import : "@import",

	/// `@included`.
	Included : "@included",

	/// `@index`.
	Index : "@index",

	/// `@json`.
	/// Type of a JSON literal.
	Json : "@json",

	/// `@language`.
	Language : "@language",

	/// `@list`.
	/// Ordered collection of values.
	List : "@list",

	/// `@nest`.
	/// Groups properties of a node object without introducing an edge.
	Nest : "@nest",

	/// `@none`.
	/// Index used for values that lack the indexed feature.
	None : "@none",

	/// `@prefix`.
	/// Allows a term to be used as a compact IRI prefix.
	Prefix : "@prefix",

	/// `@propagate`.
	/// When `false`, term definitions do not cross node object boundaries.
	Propagate : "@propagate",

	/// `@protected`.
	/// Prevents term definitions from being overridden.
	Protected : "@protected",

	/// `@reverse`.
	Reverse : "@reverse",

	/// `@set`.
	Set : "@set",

	/// `@type`.
	Type : "@type",

	/// `@value`.
	Value : "@value",

	/// `@version`.
	/// Sets the processing mode.
	Version : "@version",

	/// `@vocab`.
	/// Prefix used to expand vocabulary-relative terms.
	Vocab : "@vocab"
}

impl Keyword {
	pub fn as_str(&self) -> &'static str {
		self.into_str()
	}

	/// Checks if this keyword may appear as a context definition entry.
	pub fn is_context_entry(&self) -> bool {
		matches!(
			self,
			Self::Version
				| Self::Import
				| Self::Base
				| Self::Vocab
				| Self::Language
				| Self::Direction
				| Self::Propagate
				| Self::Protected
		)
	}

	/// Checks if this keyword may appear in a value object.
	pub fn is_value_entry(&self) -> bool {
		matches!(
			self,
			Self::Direction | Self::Index | Self::Language | Self::Type | Self::Value
		)
	}
}

impl FromStr for Keyword {
	type Err = NotAKeyword;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::try_from(s).map_err(|s| NotAKeyword(s.to_owned()))
	}
}

impl From<Keyword> for &'static str {
	fn from(k: Keyword) -> &'static str {
		k.into_str()
	}
}

impl fmt::Display for Keyword {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.into_str().fmt(f)
	}
}

impl PartialEq<str> for Keyword {
	fn eq(&self, other: &str) -> bool {
		self.as_str() == other
	}
}

impl PartialEq<&str> for Keyword {
	fn eq(&self, other: &&str) -> bool {
		self.as_str() == *other
	}
}

pub fn is_keyword(s: &str) -> bool {
	Keyword::try_from(s).is_ok()
}

/// Checks if the given string has the form of a keyword (`@` followed by
/// ASCII letters only).
///
/// Such strings are reserved for future use and ignored by the processor.
pub fn is_keyword_like(s: &str) -> bool {
	s.len() > 1
		&& s.starts_with('@')
		&& s[1..].chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keyword_like() {
		assert!(is_keyword_like("@foo"));
		assert!(is_keyword_like("@type"));
		assert!(!is_keyword_like("@"));
		assert!(!is_keyword_like("@foo.bar"));
		assert!(!is_keyword_like("foo"));
	}

	#[test]
	fn parse_keyword() {
		assert_eq!("@nest".parse::<Keyword>().ok(), Some(Keyword::Nest));
		assert!("@annotation".parse::<Keyword>().is_err());
		assert!(Keyword::Propagate.is_context_entry());
		assert!(!Keyword::Id.is_value_entry());
	}
}
