use json_ld_trig::{
	algorithms::{expansion::Expand, ContextProcessingOptions},
	processor,
	syntax::ErrorCode,
	Context, FsLoader, IntoJson, NoLoader, RemoteDocument,
};
use serde_json::json;
use static_iref::iri;

fn loader() -> FsLoader {
	let mut loader = FsLoader::new();
	loader.mount(iri!("http://example.org/").to_owned(), "tests/fixtures");
	loader
}

#[tokio::test]
async fn expand_with_base() {
	let input = RemoteDocument::new(
		Some(iri!("http://x/").to_owned()),
		None,
		json!({ "@context": { "name": "http://schema.org/name" }, "name": "A" }),
	);

	let expanded = processor::expand(&input, &processor::Options::new(NoLoader))
		.await
		.unwrap();
	assert_eq!(expanded, json!([{ "http://schema.org/name": [{ "@value": "A" }] }]))
}

#[tokio::test]
async fn remote_context() {
	let input = RemoteDocument::new(
		Some(iri!("http://x/doc").to_owned()),
		None,
		json!({
			"@context": "http://example.org/schema.jsonld",
			"@id": "a",
			"name": "A",
			"knows": "b"
		}),
	);

	let expanded = processor::expand(&input, &processor::Options::new(loader()))
		.await
		.unwrap();
	assert_eq!(
		expanded,
		json!([{
			"@id": "http://x/a",
			"http://schema.org/name": [{ "@value": "A" }],
			"http://schema.org/knows": [{ "@id": "http://x/b" }]
		}])
	)
}

#[tokio::test]
async fn expand_trait_on_plain_json() {
	let input = json!({
		"@context": { "@vocab": "http://x/", "@language": "en" },
		"label": ["a", { "@value": "b", "@language": "fr" }]
	});

	let expanded = input.expand(NoLoader).await.unwrap();
	assert_eq!(
		expanded.into_json(),
		json!([{
			"http://x/label": [
				{ "@value": "a", "@language": "en" },
				{ "@value": "b", "@language": "fr" }
			]
		}])
	)
}

#[tokio::test]
async fn ordered_expansion() {
	let input = RemoteDocument::from(json!({
		"@context": { "@vocab": "http://x/" },
		"z": 1,
		"a": 2
	}));

	let options = processor::Options::new(NoLoader).with_ordered(true);
	let expanded = processor::expand(&input, &options).await.unwrap();
	let keys: Vec<_> = expanded[0].as_object().unwrap().keys().cloned().collect();
	assert_eq!(keys, ["http://x/a", "http://x/z"])
}

#[tokio::test]
async fn protected_terms() {
	let mut env = loader();
	let protected = Context::new(None)
		.process(&mut env, &json!("http://example.org/protected.jsonld"), None)
		.await
		.unwrap();

	let redefinition = json!({ "name": "http://other.org/name" });
	let err = protected
		.process(&mut env, &redefinition, None)
		.await
		.unwrap_err();
	assert_eq!(err.code(), ErrorCode::ProtectedTermRedefinition);

	let overridden = protected
		.process_with(
			&mut env,
			&redefinition,
			None,
			ContextProcessingOptions::default().with_override(),
		)
		.await
		.unwrap();
	assert!(overridden.get("name").is_some())
}

#[tokio::test]
async fn invalid_keyword_alias() {
	let input = RemoteDocument::from(json!({
		"@context": { "id": "@context" },
		"id": {}
	}));

	let err = processor::expand(&input, &processor::Options::default())
		.await
		.unwrap_err();
	assert_eq!(err.code(), ErrorCode::InvalidKeywordAlias)
}
