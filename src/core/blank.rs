use std::collections::HashMap;
use std::fmt;

/// Invalid blank node identifier.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid blank node identifier `{0}`")]
pub struct InvalidBlankId(pub String);

/// Blank node identifier, including its `_:` prefix.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BlankIdBuf(String);

impl BlankIdBuf {
	pub fn new(s: String) -> Result<Self, InvalidBlankId> {
		if s.len() > 2 && s.starts_with("_:") {
			Ok(Self(s))
		} else {
			Err(InvalidBlankId(s))
		}
	}

	/// Creates a blank node identifier from its label (the part after `_:`).
	pub fn from_suffix(suffix: &str) -> Self {
		Self(format!("_:{suffix}"))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Label of the blank node, without the `_:` prefix.
	pub fn suffix(&self) -> &str {
		&self.0[2..]
	}

	pub fn into_string(self) -> String {
		self.0
	}
}

impl fmt::Display for BlankIdBuf {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// Blank node identifier generator.
///
/// Produces `_:b0`, `_:b1`, ... and remembers which identifier was issued
/// for each relabeled input identifier, so that the same input label
/// always maps to the same output label within a processing invocation.
#[derive(Debug, Clone)]
pub struct BlankIdGenerator {
	prefix: String,
	count: usize,
	map: HashMap<String, BlankIdBuf>,
}

impl BlankIdGenerator {
	pub fn new() -> Self {
		Self::with_prefix("b")
	}

	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			count: 0,
			map: HashMap::new(),
		}
	}

	/// Generates a fresh identifier.
	pub fn next_blank_id(&mut self) -> BlankIdBuf {
		let id = BlankIdBuf(format!("_:{}{}", self.prefix, self.count));
		self.count += 1;
		id
	}

	/// Returns the identifier associated to `id`, issuing one if necessary.
	pub fn relabel(&mut self, id: &str) -> BlankIdBuf {
		if let Some(b) = self.map.get(id) {
			return b.clone();
		}

		let b = self.next_blank_id();
		self.map.insert(id.to_owned(), b.clone());
		b
	}

	/// Number of identifiers issued so far.
	pub fn count(&self) -> usize {
		self.count
	}
}

impl Default for BlankIdGenerator {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stable_relabeling() {
		let mut generator = BlankIdGenerator::new();
		let a = generator.relabel("_:x");
		let fresh = generator.next_blank_id();
		assert_eq!(a.as_str(), "_:b0");
		assert_eq!(fresh.as_str(), "_:b1");
		assert_eq!(generator.relabel("_:x"), a);
		assert_eq!(generator.relabel("_:y").as_str(), "_:b2");
	}

	#[test]
	fn parse_blank_id() {
		assert_eq!(BlankIdBuf::new("_:a".to_owned()).unwrap().suffix(), "a");
		assert!(BlankIdBuf::new("_:".to_owned()).is_err());
		assert!(BlankIdBuf::new("a".to_owned()).is_err());
	}
}
