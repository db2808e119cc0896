use std::{
	io::{self, Read},
	path::Path,
};

use anyhow::{anyhow, Context as _};
use clap::Parser;
use iref::{Iri, IriBuf};
use json_ld_trig::{
	algorithms::flattening::embed_blanks,
	api::{self, Format, OutputFormat},
	loader::ReqwestLoader,
	processor, FsLoader, LoadError, LoadOptions, Loader, RemoteDocument,
};
use serde_json::Value;

#[derive(Parser)]
#[clap(name = "trld", author, version, about, long_about = None)]
struct Args {
	/// Source files, `-` for the standard input.
	///
	/// If none, the standard input is used.
	#[clap(value_name = "SOURCE")]
	sources: Vec<String>,

	/// Compact the result with the given context.
	///
	/// Without value, the context of the source document is used.
	#[clap(short, long, value_name = "CONTEXT")]
	context: Option<Option<String>>,

	/// Expand the source, optionally using the given context to turn plain
	/// JSON into JSON-LD.
	#[clap(short, long = "expand-context", value_name = "CONTEXT")]
	expand: Option<Option<String>>,

	/// Sets the base IRI (default is the source location).
	#[clap(short, long)]
	base: Option<String>,

	/// Flatten the result.
	#[clap(short, long)]
	flatten: bool,

	/// Embed blank nodes referenced only once into their referrer.
	#[clap(short = 'B', long)]
	embed_blanks: bool,

	/// Input format (default is guessed from the source suffix).
	///
	/// With `ndjson` or `jsonl`, each line of the standard input is
	/// processed as a separate JSON-LD document.
	#[clap(short, long)]
	input_format: Option<Format>,

	/// Output format: `trig`, `ttl`, `turtle`, `turtle-union`, `nq` or
	/// `jsonld`.
	#[clap(short, long, default_value = "jsonld")]
	output_format: OutputFormat,

	/// Sets the level of verbosity.
	#[clap(short, long = "verbose", action = clap::ArgAction::Count)]
	verbosity: u8,

	/// Silences every log message.
	#[clap(short, long)]
	quiet: bool,
}

/// Loads `file:` IRIs from the file system, anything else over HTTP.
#[derive(Default)]
struct AnyLoader {
	fs: FsLoader,
	http: ReqwestLoader,
}

impl Loader for AnyLoader {
	async fn load_with(&self, url: &Iri, options: &LoadOptions) -> Result<RemoteDocument, LoadError> {
		if url.scheme().as_str() == "file" {
			self.fs.load_with(url, options).await
		} else {
			self.http.load_with(url, options).await
		}
	}
}

#[tokio::main]
async fn main() {
	let args = Args::parse();

	if let Err(e) = stderrlog::new()
		.verbosity(args.verbosity as usize + 1)
		.quiet(args.quiet)
		.init()
	{
		eprintln!("unable to initialize the logger: {e}")
	}

	let mut failed = false;
	if args.input_format == Some(Format::JsonLines) {
		for (i, data) in api::json_lines(io::stdin().lock()).enumerate() {
			let result = match data {
				Ok(data) => match base_iri("-", &args) {
					Ok(base) => process_data(data, base, &args).await,
					Err(e) => Err(e),
				},
				Err(e) => Err(e.into()),
			};

			if let Err(e) = result {
				log::error!("error in line {}: {e:#}", i + 1);
				failed = true
			}
		}

		if failed {
			std::process::exit(1)
		}

		return;
	}

	let sources = if args.sources.is_empty() {
		vec!["-".to_owned()]
	} else {
		args.sources.clone()
	};

	for source in &sources {
		if sources.len() > 1 {
			log::info!("parsing file: `{source}`");
		}

		if let Err(e) = process_source(source, &args).await {
			log::error!("error in file `{source}`: {e:#}");
			failed = true
		}
	}

	if failed {
		std::process::exit(1)
	}
}

async fn process_source(source: &str, args: &Args) -> anyhow::Result<()> {
	let base = base_iri(source, args)?;

	let (text, format) = if source == "-" {
		let mut text = String::new();
		io::stdin().read_to_string(&mut text)?;
		(text, args.input_format.unwrap_or(Format::JsonLd))
	} else {
		let text =
			std::fs::read_to_string(source).with_context(|| format!("unable to read `{source}`"))?;
		let format = args
			.input_format
			.or_else(|| Format::guess(source))
			.unwrap_or(Format::JsonLd);
		(text, format)
	};

	log::debug!("reading `{source}` as {format}");
	let data = api::parse_rdf(&text, format)?;
	process_data(data, base, args).await
}

async fn process_data(data: Value, base: IriBuf, args: &Args) -> anyhow::Result<()> {
	let mut options = processor::Options::new(AnyLoader::default())
		.with_base(Some(base))
		.with_ordered(true);

	let result = transform(data, &mut options, args).await?;

	let stdout = io::stdout();
	api::serialize_rdf_with(&result, args.output_format, stdout.lock(), &options).await?;
	Ok(())
}

/// Expands, flattens, compacts and embeds blank nodes of a parsed
/// document, as requested by the arguments.
async fn transform<L: Loader>(
	data: Value,
	options: &mut processor::Options<L>,
	args: &Args,
) -> anyhow::Result<Value> {
	let base = options.base.clone();
	let mut result = data.clone();
	if let Some(expand_context) = &args.expand {
		if let Some(reference) = expand_context {
			options.expand_context = Some(context_reference(reference)?);
		}

		let input = RemoteDocument::new(base.clone(), None, result);
		result = processor::expand(&input, options).await?;
	}

	if args.flatten || args.output_format == OutputFormat::NQuads {
		let input = RemoteDocument::new(base.clone(), None, result);
		result = processor::flatten(&input, None, options).await?;
	}

	if let Some(context) = &args.context {
		let context = match context {
			Some(reference) => context_reference(reference)?,
			None => data,
		};

		let input = RemoteDocument::new(base, None, result);
		result = processor::compact(&input, &context, options).await?;
	}

	if args.embed_blanks {
		result = embed_blanks(result);
	}

	Ok(result)
}

/// Base IRI of a source: the `--base` argument, or the source IRI.
fn base_iri(source: &str, args: &Args) -> anyhow::Result<IriBuf> {
	match &args.base {
		Some(base) => IriBuf::new(base.clone()).map_err(|e| anyhow!("invalid base IRI `{}`", e.0)),
		None => source_iri(source),
	}
}

/// IRI of a source: the file IRI of its absolute path, or the current
/// directory for the standard input.
fn source_iri(source: &str) -> anyhow::Result<IriBuf> {
	if source.contains("://") {
		return IriBuf::new(source.to_owned()).map_err(|e| anyhow!("invalid IRI `{}`", e.0));
	}

	let iri = if source == "-" {
		format!("file://{}/", std::env::current_dir()?.display())
	} else {
		format!("file://{}", std::fs::canonicalize(source)?.display())
	};

	IriBuf::new(iri).map_err(|e| anyhow!("invalid source IRI `{}`", e.0))
}

/// Context reference given on the command line.
///
/// Local files are referenced through their `file:` IRI, so that the
/// contexts they import are resolved relative to them.
fn context_reference(reference: &str) -> anyhow::Result<Value> {
	if !reference.contains("://") && Path::new(reference).exists() {
		Ok(Value::String(source_iri(reference)?.as_str().to_owned()))
	} else {
		Ok(Value::String(reference.to_owned()))
	}
}

#[cfg(test)]
mod tests {
	use json_ld_trig::NoLoader;

	use super::*;

	#[test]
	fn embed_blanks_and_json_lines_arguments() {
		let args = Args::try_parse_from(["trld", "-B", "-f", "-i", "ndjson", "-o", "trig"]).unwrap();
		assert!(args.embed_blanks && args.flatten);
		assert_eq!(args.input_format, Some(Format::JsonLines));
		assert_eq!(args.output_format, OutputFormat::TriG);

		let args = Args::try_parse_from(["trld", "--embed-blanks", "-i", "jsonl", "-c"]).unwrap();
		assert!(args.embed_blanks);
		assert_eq!(args.input_format, Some(Format::JsonLines));
		assert_eq!(args.context, Some(None))
	}

	#[tokio::test]
	async fn flattened_blank_nodes_are_embedded() {
		let data = serde_json::json!({
			"@context": { "@vocab": "http://x/" },
			"@id": "http://x/a",
			"knows": { "name": "B" }
		});

		let mut options = processor::Options::new(NoLoader).with_ordered(true);
		let args = Args::try_parse_from(["trld", "-f", "-c"]).unwrap();
		let flattened = transform(data.clone(), &mut options, &args).await.unwrap();
		assert_eq!(flattened["@graph"].as_array().unwrap().len(), 2);

		let args = Args::try_parse_from(["trld", "-f", "-c", "-B"]).unwrap();
		let embedded = transform(data, &mut options, &args).await.unwrap();
		assert_eq!(
			embedded["@graph"],
			serde_json::json!([{ "@id": "http://x/a", "knows": { "name": "B" } }])
		)
	}
}
