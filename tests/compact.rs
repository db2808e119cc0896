use json_ld_trig::{processor, syntax::ErrorCode, NoLoader, RemoteDocument};
use serde_json::json;

fn options() -> processor::Options {
	processor::Options::new(NoLoader)
}

#[tokio::test]
async fn compact_with_vocab_and_base() {
	let input = RemoteDocument::from(json!([{
		"@id": "http://x/a",
		"http://schema.org/name": [{ "@value": "A" }]
	}]));
	let context = json!({ "@context": { "@vocab": "http://schema.org/", "@base": "http://x/" } });

	let compacted = processor::compact(&input, &context, &options()).await.unwrap();
	assert_eq!(
		compacted,
		json!({
			"@context": { "@vocab": "http://schema.org/", "@base": "http://x/" },
			"@id": "a",
			"name": "A"
		})
	)
}

#[tokio::test]
async fn compact_arrays_option() {
	let input = RemoteDocument::from(json!([{
		"@id": "http://x/a",
		"http://x/p": [{ "@value": "v" }]
	}]));
	let context = json!({ "p": "http://x/p" });

	let mut options = options();
	options.compact_arrays = false;

	let compacted = processor::compact(&input, &context, &options).await.unwrap();
	assert_eq!(
		compacted,
		json!({
			"@context": { "p": "http://x/p" },
			"@graph": [{ "@id": "http://x/a", "p": ["v"] }]
		})
	)
}

#[tokio::test]
async fn list_container() {
	let input = RemoteDocument::from(json!([{
		"@id": "http://x/s",
		"http://x/items": [{ "@list": [{ "@value": 1 }, { "@value": 2 }] }]
	}]));
	let context = json!({ "items": { "@id": "http://x/items", "@container": "@list" } });

	let compacted = processor::compact(&input, &context, &options()).await.unwrap();
	assert_eq!(compacted["items"], json!([1, 2]))
}

#[tokio::test]
async fn compaction_round_trip() {
	let document = json!({
		"@context": {
			"@vocab": "http://x/",
			"knows": { "@type": "@id" },
			"tags": { "@container": "@set" }
		},
		"@id": "http://x/a",
		"knows": "http://x/b",
		"tags": ["t"]
	});
	let context = document["@context"].clone();

	let expanded = processor::expand(&RemoteDocument::from(document.clone()), &options())
		.await
		.unwrap();
	let compacted = processor::compact(&RemoteDocument::from(expanded), &context, &options())
		.await
		.unwrap();
	assert_eq!(compacted, document)
}

#[tokio::test]
async fn iri_confused_with_prefix() {
	let input = RemoteDocument::from(json!([{
		"@id": "http://x/a",
		"ex:b": [{ "@value": "v" }]
	}]));
	let context = json!({ "ex": "http://example.org/" });

	let err = processor::compact(&input, &context, &options()).await.unwrap_err();
	assert_eq!(err.code(), ErrorCode::IriConfusedWithPrefix)
}
