//! Format dispatch.
//!
//! Reads any of the supported RDF syntaxes into JSON-LD, and writes JSON-LD
//! out in any of them.
use std::{
	fmt,
	io::{self, BufRead},
	str::FromStr,
};

use serde_json::Value;

use crate::{algorithms::rdf as rdf_conversion, mime, nquads, processor, trig, Loader, NoLoader, RemoteDocument};

/// Input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
	TriG,
	Turtle,
	NQuads,
	NTriples,
	JsonLd,

	/// One JSON-LD document per line.
	JsonLines,
}

impl Format {
	/// Format of the given media type.
	pub fn from_media_type(media_type: &str) -> Option<Self> {
		match media_type {
			mime::TRIG => Some(Self::TriG),
			mime::TURTLE => Some(Self::Turtle),
			mime::NQUADS => Some(Self::NQuads),
			mime::NTRIPLES => Some(Self::NTriples),
			mime::JSONLD | mime::JSON => Some(Self::JsonLd),
			mime::NDJSON => Some(Self::JsonLines),
			_ => None,
		}
	}

	/// Format of the given file suffix, without the leading dot.
	pub fn from_suffix(suffix: &str) -> Option<Self> {
		mime::for_suffix(suffix).and_then(Self::from_media_type)
	}

	/// Guesses the format of a path from its suffix.
	pub fn guess(path: &str) -> Option<Self> {
		mime::guess(path).and_then(Self::from_media_type)
	}

	pub fn media_type(&self) -> &'static str {
		match self {
			Self::TriG => mime::TRIG,
			Self::Turtle => mime::TURTLE,
			Self::NQuads => mime::NQUADS,
			Self::NTriples => mime::NTRIPLES,
			Self::JsonLd => mime::JSONLD,
			Self::JsonLines => mime::NDJSON,
		}
	}
}

#[derive(Debug, thiserror::Error)]
#[error("unknown format `{0}`")]
pub struct UnknownFormat(pub String);

/// Parses a format name, file suffix or media type.
impl FromStr for Format {
	type Err = UnknownFormat;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"trig" => Ok(Self::TriG),
			"ttl" | "turtle" => Ok(Self::Turtle),
			"nq" | "nquads" | "n-quads" => Ok(Self::NQuads),
			"nt" | "ntriples" | "n-triples" => Ok(Self::NTriples),
			"jsonld" | "json-ld" | "json" => Ok(Self::JsonLd),
			"ndjson" | "jsonl" => Ok(Self::JsonLines),
			other => Self::from_suffix(other)
				.or_else(|| Self::from_media_type(other))
				.ok_or_else(|| UnknownFormat(s.to_owned())),
		}
	}
}

impl fmt::Display for Format {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::TriG => write!(f, "trig"),
			Self::Turtle => write!(f, "turtle"),
			Self::NQuads => write!(f, "nquads"),
			Self::NTriples => write!(f, "ntriples"),
			Self::JsonLd => write!(f, "jsonld"),
			Self::JsonLines => write!(f, "ndjson"),
		}
	}
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
	#[default]
	TriG,

	/// Turtle, default graph only.
	Turtle,

	/// Turtle, every graph merged into the default graph.
	TurtleUnion,

	NQuads,

	/// Pretty-printed JSON.
	JsonLd,
}

impl FromStr for OutputFormat {
	type Err = UnknownFormat;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"trig" => Ok(Self::TriG),
			"ttl" | "turtle" => Ok(Self::Turtle),
			"turtle-union" => Ok(Self::TurtleUnion),
			"nq" => Ok(Self::NQuads),
			"jsonld" => Ok(Self::JsonLd),
			_ => Err(UnknownFormat(s.to_owned())),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	TriG(#[from] trig::Error),

	#[error(transparent)]
	NQuads(#[from] nquads::Error),

	#[error("invalid JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("RDF deserialization failed: {0}")]
	FromRdf(#[from] rdf_conversion::Error),

	#[error("RDF serialization failed: {0}")]
	ToRdf(#[from] processor::ToRdfError),

	#[error(transparent)]
	Serialize(#[from] trig::SerializeError),

	#[error(transparent)]
	Io(#[from] io::Error),
}

/// Parses `text` in the given format into JSON-LD.
///
/// TriG and Turtle keep their prefixes as the document context. N-Quads
/// and N-Triples produce an expanded document. JSON Lines produce an array
/// of the documents.
pub fn parse_rdf(text: &str, format: Format) -> Result<Value, Error> {
	match format {
		Format::TriG | Format::Turtle => Ok(trig::parse(text)?),
		Format::NQuads | Format::NTriples => {
			let dataset = nquads::parse(text)?;
			Ok(processor::from_rdf(&dataset, &processor::Options::default())?)
		}
		Format::JsonLd => Ok(serde_json::from_str(text)?),
		Format::JsonLines => Ok(Value::Array(
			json_lines(text.as_bytes()).collect::<Result<_, _>>()?,
		)),
	}
}

/// Reads one JSON document per line, skipping blank lines.
pub fn json_lines(input: impl BufRead) -> impl Iterator<Item = Result<Value, Error>> {
	input.lines().filter_map(|line| match line {
		Ok(line) if line.trim().is_empty() => None,
		Ok(line) => Some(serde_json::from_str(&line).map_err(Error::from)),
		Err(e) => Some(Err(Error::from(e))),
	})
}

/// Writes JSON-LD data in the given format.
///
/// Remote contexts are not loaded; use [`serialize_rdf_with`] to provide a
/// loader.
pub async fn serialize_rdf(data: &Value, format: OutputFormat, out: impl io::Write) -> Result<(), Error> {
	serialize_rdf_with(data, format, out, &processor::Options::new(NoLoader)).await
}

/// Writes JSON-LD data in the given format, with the given processing
/// options.
///
/// N-Quads output requires the data to be expanded first, which is where
/// the options apply.
pub async fn serialize_rdf_with<L: Loader>(
	data: &Value,
	format: OutputFormat,
	mut out: impl io::Write,
	options: &processor::Options<L>,
) -> Result<(), Error> {
	match format {
		OutputFormat::TriG => trig::serialize(data, out)?,
		OutputFormat::Turtle => trig::serialize_turtle(data, out, false)?,
		OutputFormat::TurtleUnion => trig::serialize_turtle(data, out, true)?,
		OutputFormat::NQuads => {
			let input = RemoteDocument::from(data.clone());
			let dataset = processor::to_rdf(&input, options).await?;
			nquads::serialize(&dataset, out)?
		}
		OutputFormat::JsonLd => {
			serde_json::to_writer_pretty(&mut out, data)?;
			writeln!(out)?
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn format_names() {
		assert_eq!("ttl".parse::<Format>().unwrap(), Format::Turtle);
		assert_eq!("application/n-quads".parse::<Format>().unwrap(), Format::NQuads);
		assert_eq!(Format::guess("data/file.jsonld"), Some(Format::JsonLd));
		assert_eq!(Format::guess("data/file.rdf"), None);
		assert!("xml".parse::<Format>().is_err());
		assert_eq!("turtle-union".parse::<OutputFormat>().unwrap(), OutputFormat::TurtleUnion)
	}

	#[test]
	fn parse_json_lines() {
		assert_eq!("jsonl".parse::<Format>().unwrap(), Format::JsonLines);
		assert_eq!(Format::guess("dump.ndjson"), Some(Format::JsonLines));

		let data = parse_rdf("{\"@id\": \"http://x/a\"}\n\n[1, 2]\n", Format::JsonLines).unwrap();
		assert_eq!(data, json!([{ "@id": "http://x/a" }, [1, 2]]));

		let mut lines = json_lines("{}\nnot json\n".as_bytes());
		assert_eq!(lines.next().unwrap().unwrap(), json!({}));
		assert!(matches!(lines.next(), Some(Err(Error::Json(_)))));
		assert!(lines.next().is_none())
	}

	#[test]
	fn parse_nquads() {
		let data = parse_rdf("<http://x/s> <http://x/p> \"v\" .\n", Format::NQuads).unwrap();
		assert_eq!(
			data,
			json!([{ "@id": "http://x/s", "http://x/p": [{ "@value": "v" }] }])
		)
	}

	#[test]
	fn parse_turtle() {
		let data = parse_rdf("@prefix : <http://x/> . :s :p ( :a :b ) .", Format::Turtle).unwrap();
		assert_eq!(data["@context"], json!({ "@vocab": "http://x/" }));
		assert_eq!(data["@graph"][0]["@id"], "http://x/s")
	}

	#[tokio::test]
	async fn turtle_output() {
		let data = parse_rdf(
			"prefix : <http://x/>\n:s :p :o .\n:g { :s :q :o . }\n",
			Format::TriG,
		)
		.unwrap();

		let mut default_only = Vec::new();
		serialize_rdf(&data, OutputFormat::Turtle, &mut default_only).await.unwrap();
		let default_only = String::from_utf8(default_only).unwrap();
		assert!(default_only.contains(":p :o"));
		assert!(!default_only.contains(":q"));

		let mut union = Vec::new();
		serialize_rdf(&data, OutputFormat::TurtleUnion, &mut union).await.unwrap();
		let union = String::from_utf8(union).unwrap();
		assert!(union.contains(":q :o"));
		assert!(!union.contains(":g"))
	}

	#[tokio::test]
	async fn nquads_output() {
		let data = json!({
			"@context": { "@vocab": "http://x/" },
			"@id": "http://x/s",
			"p": "v"
		});

		let mut out = Vec::new();
		serialize_rdf(&data, OutputFormat::NQuads, &mut out).await.unwrap();
		assert_eq!(String::from_utf8(out).unwrap(), "<http://x/s> <http://x/p> \"v\" .\n")
	}
}
