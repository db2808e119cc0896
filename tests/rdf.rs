use std::collections::BTreeSet;

use json_ld_trig::{nquads, processor, NoLoader, RemoteDocument};
use serde_json::json;

const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

fn lines(text: &str) -> BTreeSet<String> {
	text.lines().map(str::to_owned).collect()
}

#[tokio::test]
async fn list_round_trip() {
	let document = json!([{
		"@id": "http://x/s",
		"http://x/p": [{ "@list": [{ "@value": 1 }, { "@value": 2 }] }]
	}]);

	let mut options = processor::Options::new(NoLoader);
	let dataset = processor::to_rdf(&RemoteDocument::from(document.clone()), &options)
		.await
		.unwrap();

	let expected = [
		"<http://x/s> <http://x/p> _:b0 .".to_owned(),
		format!("_:b0 <{RDF}first> \"1\"^^<{XSD_INTEGER}> ."),
		format!("_:b0 <{RDF}rest> _:b1 ."),
		format!("_:b1 <{RDF}first> \"2\"^^<{XSD_INTEGER}> ."),
		format!("_:b1 <{RDF}rest> <{RDF}nil> ."),
	];
	assert_eq!(
		lines(&nquads::to_string(&dataset)),
		expected.into_iter().collect()
	);

	options.use_native_types = true;
	assert_eq!(processor::from_rdf(&dataset, &options).unwrap(), document)
}

#[tokio::test]
async fn nquads_round_trip() {
	let input = "\
<http://x/s> <http://x/p> \"a\"@en <http://x/g> .
<http://x/s> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://x/T> .
_:b0 <http://x/q> \"t\\\"q\\\"\" .
<http://x/s> <http://x/r> _:b0 .
";

	let dataset = nquads::parse(input).unwrap();
	let options = processor::Options::new(NoLoader).with_ordered(true);
	let document = processor::from_rdf(&dataset, &options).unwrap();

	let back = processor::to_rdf(&RemoteDocument::from(document), &options)
		.await
		.unwrap();
	assert_eq!(lines(&nquads::to_string(&back)), lines(input))
}

#[tokio::test]
async fn rdf_type_option() {
	let dataset =
		nquads::parse("<http://x/s> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://x/T> .\n")
			.unwrap();

	let mut options = processor::Options::new(NoLoader);
	assert_eq!(
		processor::from_rdf(&dataset, &options).unwrap(),
		json!([{ "@id": "http://x/s", "@type": ["http://x/T"] }])
	);

	options.use_rdf_type = true;
	assert_eq!(
		processor::from_rdf(&dataset, &options).unwrap(),
		json!([{
			"@id": "http://x/s",
			(format!("{RDF}type")): [{ "@id": "http://x/T" }]
		}])
	)
}

#[tokio::test]
async fn generalized_rdf() {
	let input = RemoteDocument::from(json!({
		"@id": "http://x/s",
		"_:p": "v"
	}));

	let mut options = processor::Options::new(NoLoader);
	assert!(processor::to_rdf(&input, &options).await.unwrap().is_empty());

	options.produce_generalized_rdf = true;
	assert_eq!(processor::to_rdf(&input, &options).await.unwrap().len(), 1)
}
