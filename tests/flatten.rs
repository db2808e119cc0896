use json_ld_trig::{
	algorithms::{expansion::Expand, flattening::Flatten},
	processor,
	syntax::ErrorCode,
	IntoJson, NoLoader, RemoteDocument,
};
use serde_json::{json, Value};
use static_iref::iri;

fn ids(flattened: &Value) -> Vec<&str> {
	flattened
		.as_array()
		.unwrap()
		.iter()
		.map(|node| node["@id"].as_str().unwrap())
		.collect()
}

#[tokio::test]
async fn nested_nodes_are_lifted() {
	let input = RemoteDocument::new(
		Some(iri!("http://x/").to_owned()),
		None,
		json!({
			"@context": { "@vocab": "http://x/", "p": { "@type": "@id" } },
			"@id": "a",
			"p": { "@id": "b", "p": { "@id": "c", "name": "C" } }
		}),
	);

	let options = processor::Options::new(NoLoader).with_ordered(true);
	let flattened = processor::flatten(&input, None, &options).await.unwrap();

	assert_eq!(ids(&flattened), ["http://x/a", "http://x/b", "http://x/c"]);
	assert_eq!(flattened[0]["http://x/p"], json!([{ "@id": "http://x/b" }]));
	assert_eq!(flattened[1]["http://x/p"], json!([{ "@id": "http://x/c" }]))
}

#[tokio::test]
async fn reference_only_nodes_are_not_lifted() {
	let input = RemoteDocument::new(
		Some(iri!("http://x/").to_owned()),
		None,
		json!({
			"@context": { "@vocab": "http://x/" },
			"@id": "a",
			"p": { "@id": "b", "p": { "@id": "c" } }
		}),
	);

	let options = processor::Options::new(NoLoader).with_ordered(true);
	let flattened = processor::flatten(&input, None, &options).await.unwrap();
	assert_eq!(ids(&flattened), ["http://x/a", "http://x/b"])
}

#[tokio::test]
async fn flattening_is_idempotent() {
	let input = json!({
		"@context": { "@vocab": "http://x/" },
		"@id": "http://x/a",
		"p": [{ "q": 1 }, { "@id": "_:z", "q": 2 }],
		"@included": [{ "@id": "http://x/i", "q": 3 }]
	});

	let expanded = input.expand(NoLoader).await.unwrap();
	let flattened = expanded.flatten(true).unwrap().into_json();

	let again = flattened.expand(NoLoader).await.unwrap();
	assert_eq!(again.flatten(true).unwrap().into_json(), flattened)
}

#[tokio::test]
async fn named_graphs() {
	let input = RemoteDocument::from(json!({
		"@context": { "@vocab": "http://x/" },
		"@id": "http://x/g",
		"@graph": [{ "@id": "http://x/s", "p": "o" }]
	}));

	let flattened = processor::flatten(&input, None, &processor::Options::default())
		.await
		.unwrap();
	assert_eq!(
		flattened,
		json!([{
			"@id": "http://x/g",
			"@graph": [{ "@id": "http://x/s", "http://x/p": [{ "@value": "o" }] }]
		}])
	)
}

#[tokio::test]
async fn conflicting_indexes() {
	let input = RemoteDocument::from(json!([
		{ "@id": "http://x/a", "@index": "i", "http://x/p": "1" },
		{ "@id": "http://x/a", "@index": "j", "http://x/p": "2" }
	]));

	let err = processor::flatten(&input, None, &processor::Options::default())
		.await
		.unwrap_err();
	assert_eq!(err.code(), ErrorCode::ConflictingIndexes)
}
