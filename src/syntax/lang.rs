pub use langtag::LangTag;
use std::{fmt, hash::Hash};

/// Owned language tag that may not be well-formed.
///
/// JSON-LD processors must keep malformed language tags (and warn about
/// them) instead of failing. Comparison, ordering and hashing ignore ASCII
/// case, as BCP47 tags are case insensitive.
#[derive(Clone, Debug)]
pub struct LenientLangTagBuf(String);

impl LenientLangTagBuf {
	pub fn new(s: String) -> Self {
		Self(s)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_string(self) -> String {
		self.0
	}

	pub fn is_well_formed(&self) -> bool {
		LangTag::new(self.as_str()).is_ok()
	}

	/// Lowercase version of this tag, as stored in processed contexts.
	pub fn to_lowercase(&self) -> Self {
		Self(self.0.to_ascii_lowercase())
	}
}

impl PartialEq for LenientLangTagBuf {
	fn eq(&self, other: &Self) -> bool {
		self.0.eq_ignore_ascii_case(&other.0)
	}
}

impl Eq for LenientLangTagBuf {}

impl PartialOrd for LenientLangTagBuf {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for LenientLangTagBuf {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		let a = self.0.bytes().map(|b| b.to_ascii_lowercase());
		let b = other.0.bytes().map(|b| b.to_ascii_lowercase());
		a.cmp(b)
	}
}

impl Hash for LenientLangTagBuf {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		for b in self.0.bytes() {
			b.to_ascii_lowercase().hash(state)
		}
	}
}

impl AsRef<str> for LenientLangTagBuf {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}

impl fmt::Display for LenientLangTagBuf {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.0.fmt(f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lenient_tags() {
		let tag = LenientLangTagBuf::new("en-US".to_owned());
		assert!(tag.is_well_formed());
		assert_eq!(tag, LenientLangTagBuf::new("EN-us".to_owned()));

		let tag = LenientLangTagBuf::new("not a tag".to_owned());
		assert!(!tag.is_well_formed());
		assert_eq!(tag.as_str(), "not a tag");
	}
}
