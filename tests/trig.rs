use json_ld_trig::{
	api::{self, Format, OutputFormat},
	nquads, processor, NoLoader, RemoteDocument,
};
use serde_json::{json, Value};

/// N-Quads lines of the data, blank node labels erased.
async fn statements(data: &Value) -> Vec<String> {
	let options = processor::Options::new(NoLoader);
	let dataset = processor::to_rdf(&RemoteDocument::from(data.clone()), &options)
		.await
		.unwrap();

	let mut lines: Vec<_> = nquads::to_string(&dataset)
		.lines()
		.map(|line| {
			line.split(' ')
				.map(|term| if term.starts_with("_:") { "_:" } else { term })
				.collect::<Vec<_>>()
				.join(" ")
		})
		.collect();
	lines.sort();
	lines
}

async fn write(data: &Value, format: OutputFormat) -> String {
	let mut out = Vec::new();
	api::serialize_rdf(data, format, &mut out).await.unwrap();
	String::from_utf8(out).unwrap()
}

#[test]
fn parse_collection() {
	let data = api::parse_rdf("@prefix : <http://x/> . :s :p ( :a :b ) .", Format::Turtle).unwrap();
	assert_eq!(
		data["@graph"],
		json!([{
			"@id": "http://x/s",
			"p": { "@list": [{ "@id": "http://x/a" }, { "@id": "http://x/b" }] }
		}])
	)
}

#[tokio::test]
async fn list_container_round_trip() {
	let data = json!({
		"@context": {
			"@vocab": "http://example.org/ns#",
			"termComponentList": { "@container": "@list" }
		},
		"@graph": [{
			"@id": "http://example.org/text/1",
			"@type": "Text",
			"subject": [
				{ "@id": "https://example.org/Other" },
				{
					"@type": "ComplexSubject",
					"termComponentList": [
						{ "@type": "Topic", "prefLabel": "Education" },
						{ "@type": "TopicSubdivision", "prefLabel": "Research" }
					]
				}
			]
		}]
	});

	let turtle = write(&data, OutputFormat::Turtle).await;
	assert!(turtle.contains(":termComponentList ( [ a :Topic ;"));

	let parsed = api::parse_rdf(&turtle, Format::Turtle).unwrap();
	assert_eq!(statements(&parsed).await, statements(&data).await)
}

#[tokio::test]
async fn trig_round_trip() {
	let input = r#"
prefix : <http://x/>
prefix xsd: <http://www.w3.org/2001/XMLSchema#>

:s a :T ;
	:name "A"@en , "B" ;
	:count 3 ;
	:ratio 0.5 ;
	:flag true ;
	:date "2020-01-01"^^xsd:date ;
	:knows [ :name "anonymous" ] .

:g {
	:s :p :o .
	:o :q ( 1 2 ) .
}
"#;

	let data = api::parse_rdf(input, Format::TriG).unwrap();
	let output = write(&data, OutputFormat::TriG).await;
	let reparsed = api::parse_rdf(&output, Format::TriG).unwrap();

	assert_eq!(reparsed, data);
	assert_eq!(statements(&reparsed).await, statements(&data).await)
}

#[tokio::test]
async fn trig_to_nquads() {
	let data = api::parse_rdf(
		"prefix : <http://x/>\n:s :p \"v\" .\n:g { :s :q :o . }\n",
		Format::TriG,
	)
	.unwrap();

	let nq = write(&data, OutputFormat::NQuads).await;
	let mut lines: Vec<_> = nq.lines().collect();
	lines.sort();
	assert_eq!(
		lines,
		[
			"<http://x/s> <http://x/p> \"v\" .",
			"<http://x/s> <http://x/q> <http://x/o> <http://x/g> ."
		]
	);

	let back = api::parse_rdf(&nq, Format::NQuads).unwrap();
	assert_eq!(statements(&back).await, statements(&data).await)
}

#[tokio::test]
async fn jsonld_output() {
	let data = json!({ "@id": "http://x/s" });
	assert_eq!(write(&data, OutputFormat::JsonLd).await, "{\n  \"@id\": \"http://x/s\"\n}\n")
}

#[test]
fn notation_error_position() {
	let err = api::parse_rdf("prefix : <http://x/>\n:s :p", Format::Turtle).unwrap_err();
	assert!(err.to_string().starts_with("Notation error at line 2"))
}

#[tokio::test]
async fn dotted_numbers_are_decimals() {
	let data = api::parse_rdf(
		"@prefix : <http://x/> . :s :p 1.5 ; :q 1.50 ; :r 0.5 ; :e 1.5e0 .",
		Format::Turtle,
	)
	.unwrap();

	let nq = write(&data, OutputFormat::NQuads).await;
	let mut lines: Vec<_> = nq.lines().collect();
	lines.sort();
	assert_eq!(
		lines,
		[
			"<http://x/s> <http://x/e> \"1.5e0\"^^<http://www.w3.org/2001/XMLSchema#double> .",
			"<http://x/s> <http://x/p> \"1.5\"^^<http://www.w3.org/2001/XMLSchema#decimal> .",
			"<http://x/s> <http://x/q> \"1.50\"^^<http://www.w3.org/2001/XMLSchema#decimal> .",
			"<http://x/s> <http://x/r> \"0.5\"^^<http://www.w3.org/2001/XMLSchema#decimal> ."
		]
	)
}
