use serde_json::{json, Value};
use static_iref::iri;

use super::*;
use crate::{algorithms::expansion::Expand, NoLoader, RemoteDocument};

async fn compact_with(input: Value, local_context: Value, options: CompactionOptions) -> Value {
	let base = iri!("http://x/");
	let expanded = RemoteDocument::new(Some(base.to_owned()), None, input)
		.expand(NoLoader)
		.await
		.unwrap();

	let active_context = Context::new(Some(base.to_owned()))
		.process(NoLoader, &local_context, Some(base))
		.await
		.unwrap();

	let mut compacted = expanded
		.compact_full(&mut NoLoader, &active_context, options)
		.await
		.unwrap();
	compacted.embed_context(&local_context);
	compacted
}

async fn compact(input: Value, local_context: Value) -> Value {
	compact_with(input, local_context, CompactionOptions::default()).await
}

#[tokio::test]
async fn vocab_and_base() {
	let context = json!({ "@vocab": "http://schema.org/", "@base": "http://x/" });
	let compacted = compact(
		json!([{ "@id": "http://x/a", "http://schema.org/name": [{ "@value": "A" }] }]),
		context.clone(),
	)
	.await;

	assert_eq!(
		compacted,
		json!({ "@context": context, "@id": "a", "name": "A" })
	)
}

#[tokio::test]
async fn arrays_are_kept() {
	let context = json!({ "@vocab": "http://schema.org/" });
	let compacted = compact_with(
		json!([{ "@id": "http://x/a", "http://schema.org/name": [{ "@value": "A" }] }]),
		context.clone(),
		CompactionOptions::default().with_compact_arrays(false),
	)
	.await;

	assert_eq!(
		compacted,
		json!({
			"@context": context,
			"@graph": [{ "@id": "a", "name": ["A"] }]
		})
	)
}

#[tokio::test]
async fn types() {
	let context = json!({ "@vocab": "http://schema.org/" });
	let compacted = compact(
		json!([{ "@id": "http://x/a", "@type": ["http://schema.org/Person"] }]),
		context.clone(),
	)
	.await;

	assert_eq!(
		compacted,
		json!({ "@context": context, "@id": "a", "@type": "Person" })
	)
}

#[tokio::test]
async fn language_map() {
	let context = json!({
		"label": { "@id": "http://x/label", "@container": "@language" }
	});
	let compacted = compact(
		json!([{
			"http://x/label": [
				{ "@value": "Hello", "@language": "en" },
				{ "@value": "Bonjour", "@language": "fr" }
			]
		}]),
		context.clone(),
	)
	.await;

	assert_eq!(
		compacted,
		json!({ "@context": context, "label": { "en": "Hello", "fr": "Bonjour" } })
	)
}

#[tokio::test]
async fn list_container() {
	let context = json!({
		"@vocab": "http://x/",
		"items": { "@container": "@list" }
	});
	let compacted = compact(
		json!([{
			"@id": "http://x/s",
			"http://x/items": [{ "@list": [{ "@value": "a" }, { "@value": "b" }] }]
		}]),
		context.clone(),
	)
	.await;

	assert_eq!(
		compacted,
		json!({ "@context": context, "@id": "s", "items": ["a", "b"] })
	)
}

#[tokio::test]
async fn id_coercion() {
	let context = json!({
		"knows": { "@id": "http://x/knows", "@type": "@id" }
	});
	let compacted = compact(
		json!([{ "http://x/knows": [{ "@id": "http://x/b" }] }]),
		context.clone(),
	)
	.await;

	assert_eq!(compacted, json!({ "@context": context, "knows": "b" }))
}

#[tokio::test]
async fn empty_document() {
	let compacted = compact(json!([]), json!({ "@vocab": "http://x/" })).await;
	assert_eq!(compacted, json!({}))
}
