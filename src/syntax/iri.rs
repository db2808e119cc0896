use iref::{Iri, IriBuf, IriRef};

/// RFC 3986 generic delimiters.
///
/// A simple term whose IRI mapping ends with one of these characters can be
/// used as a compact IRI prefix.
pub const GEN_DELIMS: [char; 7] = [':', '/', '?', '#', '[', ']', '@'];

/// Resolve `value` against the given base IRI.
///
/// Without base IRI, `value` is returned only if it is already absolute.
pub fn resolve_iri(value: &str, base_iri: Option<&Iri>) -> Option<IriBuf> {
	let iri_ref = IriRef::new(value).ok()?;
	match base_iri {
		Some(base_iri) => Some(iri_ref.resolved(base_iri)),
		None => iri_ref.as_iri().map(ToOwned::to_owned),
	}
}

pub fn is_absolute_iri(value: &str) -> bool {
	Iri::new(value).is_ok()
}

pub fn is_blank_id(value: &str) -> bool {
	value.starts_with("_:")
}

pub fn ends_with_gen_delim(value: &str) -> bool {
	value.ends_with(GEN_DELIMS)
}

/// Compact IRI `prefix:suffix`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompactIri<'a> {
	pub prefix: &'a str,
	pub suffix: &'a str,
}

impl<'a> CompactIri<'a> {
	/// Splits `value` at its first colon.
	///
	/// Returns `None` if there is no colon, if the colon is the first
	/// character, or if the suffix starts with `//` (hierarchical IRI).
	pub fn new(value: &'a str) -> Option<Self> {
		let i = value.find(':')?;
		if i == 0 {
			return None;
		}

		let (prefix, suffix) = (&value[..i], &value[i + 1..]);
		if suffix.starts_with("//") {
			return None;
		}

		Some(Self { prefix, suffix })
	}
}

/// Makes `iri` relative to `base`, if possible.
///
/// The returned reference resolves back to `iri` against `base`.
pub fn relativize(iri: &str, base: &Iri) -> String {
	let base = base.as_str();

	if let Some(rest) = iri.strip_prefix(base) {
		if rest.starts_with('#') || rest.starts_with('?') {
			return rest.to_owned();
		}
	}

	let base = match base.find(['?', '#']) {
		Some(i) => &base[..i],
		None => base,
	};

	let authority_end = match base.find("://") {
		Some(i) => match base[i + 3..].find('/') {
			Some(j) => i + 3 + j,
			None => return iri.to_owned(),
		},
		None => return iri.to_owned(),
	};

	if !iri.starts_with(&base[..authority_end]) {
		return iri.to_owned();
	}

	let base_dir = match base.rfind('/') {
		Some(i) => &base[..=i],
		None => return iri.to_owned(),
	};

	if let Some(rest) = iri.strip_prefix(base_dir) {
		if rest.is_empty() {
			return "./".to_owned();
		}

		if rest.starts_with("//") || CompactIri::new(rest).is_some() {
			return format!("./{rest}");
		}

		return rest.to_owned();
	}

	let mut parent = &base_dir[..base_dir.len() - 1];
	let mut up = String::new();
	while parent.len() > authority_end {
		let i = match parent.rfind('/') {
			Some(i) => i,
			None => break,
		};
		parent = &parent[..i];
		up.push_str("../");

		if let Some(rest) = iri.strip_prefix(parent) {
			if let Some(rest) = rest.strip_prefix('/') {
				return format!("{up}{rest}");
			}
		}
	}

	iri.to_owned()
}

#[cfg(test)]
mod tests {
	use super::*;
	use static_iref::iri;

	#[test]
	fn compact_iri_split() {
		let c = CompactIri::new("ex:foo").unwrap();
		assert_eq!((c.prefix, c.suffix), ("ex", "foo"));
		assert!(CompactIri::new("http://example.org/").is_none());
		assert!(CompactIri::new(":foo").is_none());
	}

	#[test]
	fn relative_iris() {
		let base = iri!("http://example.org/a/b");
		assert_eq!(relativize("http://example.org/a/c", base), "c");
		assert_eq!(relativize("http://example.org/a/b#frag", base), "#frag");
		assert_eq!(relativize("http://example.org/x", base), "../x");
		assert_eq!(relativize("http://other.org/x", base), "http://other.org/x");
		assert_eq!(relativize("http://example.org/a/", base), "./");
	}
}
