//! Media types of the supported formats.
use mime::Mime;

pub const JSONLD: &str = "application/ld+json";
pub const JSON: &str = "application/json";
pub const NDJSON: &str = "application/x-ndjson";
pub const TRIG: &str = "application/trig";
pub const TURTLE: &str = "text/turtle";
pub const NQUADS: &str = "application/n-quads";
pub const NTRIPLES: &str = "application/n-triples";
pub const RDF_XML: &str = "application/rdf+xml";
pub const HTML: &str = "text/html";

/// File suffix to media type map.
pub const SUFFIX_MIME_TYPES: &[(&str, &str)] = &[
	("trig", TRIG),
	("ttl", TURTLE),
	("jsonld", JSONLD),
	("json", JSON),
	("ndjson", NDJSON),
	("jsonl", NDJSON),
	("nq", NQUADS),
	("nt", NTRIPLES),
	("rdf", RDF_XML),
	("xml", RDF_XML),
	("owl", RDF_XML),
	("rdfs", RDF_XML),
	("html", HTML),
];

/// Media type associated to the given file suffix.
pub fn for_suffix(suffix: &str) -> Option<&'static str> {
	SUFFIX_MIME_TYPES
		.iter()
		.find(|(s, _)| s.eq_ignore_ascii_case(suffix))
		.map(|(_, m)| *m)
}

/// Guesses the media type of a path or IRI from its suffix.
pub fn guess(path: &str) -> Option<&'static str> {
	let name = path.rsplit('/').next().unwrap_or(path);
	let i = name.rfind('.')?;
	for_suffix(&name[i + 1..])
}

/// Checks if the media type denotes a JSON document (`application/json`
/// or any `+json` type).
pub fn is_json(mime: &Mime) -> bool {
	mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn guess_from_path() {
		assert_eq!(guess("path/to/some.dir/file.jsonld"), Some(JSONLD));
		assert_eq!(guess("data.TTL"), Some(TURTLE));
		assert_eq!(guess("some.dir/file"), None);
		assert_eq!(for_suffix("owl"), Some(RDF_XML));
	}

	#[test]
	fn json_types() {
		assert!(is_json(&JSONLD.parse().unwrap()));
		assert!(is_json(&JSON.parse().unwrap()));
		assert!(!is_json(&TURTLE.parse().unwrap()));
	}
}
