use std::{cell::Cell, collections::HashMap};

use iref::Iri;
use serde_json::{json, Value};
use static_iref::iri;

use super::*;
use crate::{
	algorithms::{ScopedContextKey, Warning},
	syntax::ErrorCode,
	IntoJson, LoadError, LoadOptions, Loader, NoLoader,
};

async fn expand_json(input: Value) -> Result<Value, Error> {
	let document = RemoteDocument::new(Some(iri!("http://x/").to_owned()), None, input);
	let expanded = document.expand(NoLoader).await?;
	Ok(expanded.into_json())
}

#[tokio::test]
async fn simple_term() {
	let expanded = expand_json(json!({
		"@context": { "name": "http://schema.org/name" },
		"name": "A"
	}))
	.await
	.unwrap();

	assert_eq!(
		expanded,
		json!([{ "http://schema.org/name": [{ "@value": "A" }] }])
	)
}

#[tokio::test]
async fn list_container() {
	let expanded = expand_json(json!({
		"@context": {
			"@vocab": "http://x/",
			"items": { "@container": "@list" }
		},
		"@id": "s",
		"items": ["a", "b"]
	}))
	.await
	.unwrap();

	assert_eq!(
		expanded,
		json!([{
			"@id": "http://x/s",
			"http://x/items": [{ "@list": [{ "@value": "a" }, { "@value": "b" }] }]
		}])
	)
}

#[tokio::test]
async fn language_map() {
	let expanded = expand_json(json!({
		"@context": {
			"label": { "@id": "http://x/label", "@container": "@language" }
		},
		"label": { "en": "Hello", "fr": ["Bonjour"], "@none": "Hi" }
	}))
	.await
	.unwrap();

	assert_eq!(
		expanded,
		json!([{
			"http://x/label": [
				{ "@value": "Hello", "@language": "en" },
				{ "@value": "Bonjour", "@language": "fr" },
				{ "@value": "Hi" }
			]
		}])
	)
}

#[tokio::test]
async fn reverse_property() {
	let expanded = expand_json(json!({
		"@context": {
			"children": { "@reverse": "http://x/parent" }
		},
		"@id": "http://x/p",
		"children": [{ "@id": "http://x/c" }]
	}))
	.await
	.unwrap();

	assert_eq!(
		expanded,
		json!([{
			"@id": "http://x/p",
			"@reverse": { "http://x/parent": [{ "@id": "http://x/c" }] }
		}])
	)
}

#[tokio::test]
async fn type_coercion_and_default_language() {
	let expanded = expand_json(json!({
		"@context": {
			"@language": "en",
			"knows": { "@id": "http://x/knows", "@type": "@id" },
			"age": { "@id": "http://x/age", "@type": "http://www.w3.org/2001/XMLSchema#integer" },
			"name": "http://x/name"
		},
		"knows": "bob",
		"age": "42",
		"name": "Alice"
	}))
	.await
	.unwrap();

	assert_eq!(
		expanded,
		json!([{
			"http://x/knows": [{ "@id": "http://x/bob" }],
			"http://x/age": [{
				"@value": "42",
				"@type": "http://www.w3.org/2001/XMLSchema#integer"
			}],
			"http://x/name": [{ "@value": "Alice", "@language": "en" }]
		}])
	)
}

#[tokio::test]
async fn type_scoped_context() {
	let expanded = expand_json(json!({
		"@context": {
			"@vocab": "http://x/",
			"Person": {
				"@context": { "name": "http://schema.org/name" }
			}
		},
		"@type": "Person",
		"name": "A",
		"friend": { "name": "B" }
	}))
	.await
	.unwrap();

	// The type-scoped context does not propagate to the friend node.
	assert_eq!(
		expanded,
		json!([{
			"@type": ["http://x/Person"],
			"http://schema.org/name": [{ "@value": "A" }],
			"http://x/friend": [{ "http://x/name": [{ "@value": "B" }] }]
		}])
	)
}

#[tokio::test]
async fn index_and_id_maps() {
	let expanded = expand_json(json!({
		"@context": {
			"@vocab": "http://x/",
			"byIndex": { "@container": "@index" },
			"byId": { "@container": "@id" }
		},
		"byIndex": { "first": { "@id": "a" } },
		"byId": { "b": { "name": "B" } }
	}))
	.await
	.unwrap();

	assert_eq!(
		expanded,
		json!([{
			"http://x/byIndex": [{ "@id": "http://x/a", "@index": "first" }],
			"http://x/byId": [{
				"@id": "http://x/b",
				"http://x/name": [{ "@value": "B" }]
			}]
		}])
	)
}

#[tokio::test]
async fn nested_properties() {
	let expanded = expand_json(json!({
		"@context": {
			"@vocab": "http://x/",
			"details": "@nest"
		},
		"@id": "s",
		"details": { "color": "red" }
	}))
	.await
	.unwrap();

	assert_eq!(
		expanded,
		json!([{
			"@id": "http://x/s",
			"http://x/color": [{ "@value": "red" }]
		}])
	)
}

#[tokio::test]
async fn top_level_graph_is_unwrapped() {
	let expanded = expand_json(json!({
		"@graph": [
			{ "@id": "http://x/a", "http://x/p": "v" },
			{ "@id": "http://x/only-id" },
			"free floating"
		]
	}))
	.await
	.unwrap();

	assert_eq!(
		expanded,
		json!([{ "@id": "http://x/a", "http://x/p": [{ "@value": "v" }] }])
	)
}

#[tokio::test]
async fn colliding_keywords() {
	let error = expand_json(json!({
		"@context": { "id": "@id" },
		"@id": "http://x/a",
		"id": "http://x/b"
	}))
	.await
	.unwrap_err();

	assert_eq!(error.code(), ErrorCode::CollidingKeywords)
}

#[tokio::test]
async fn invalid_set_object() {
	let error = expand_json(json!({
		"http://x/p": { "@set": ["a"], "@id": "http://x/b" }
	}))
	.await
	.unwrap_err();

	assert_eq!(error.code(), ErrorCode::InvalidSetOrListObject)
}

#[tokio::test]
async fn strict_policy_rejects_undefined_terms() {
	let document = json!({ "undefined": "value" });
	let mut env = NoLoader;
	let options = ExpansionOptions {
		policy: ExpansionPolicy::STRICT,
		..Default::default()
	};

	let error = document
		.expand_full(&mut env, Context::default(), None, options)
		.await
		.unwrap_err();

	assert!(matches!(error, Error::KeyExpansionFailed(_)))
}

/// Serves the same context for every URL and counts the loads.
#[derive(Default)]
struct CountingLoader {
	loads: Cell<usize>,
}

impl Loader for CountingLoader {
	async fn load_with(&self, url: &Iri, _options: &LoadOptions) -> Result<RemoteDocument, LoadError> {
		self.loads.set(self.loads.get() + 1);
		Ok(RemoteDocument::new(
			Some(url.to_owned()),
			None,
			json!({ "@context": { "name": "http://schema.org/name" } }),
		))
	}
}

/// Memoizes scoped contexts, but loads remote contexts every time.
struct ScopedCacheOnly<'a> {
	loader: &'a CountingLoader,
	scoped: HashMap<ScopedContextKey, Context>,
}

impl<'a> ProcessingEnvironment for ScopedCacheOnly<'a> {
	type Loader = &'a CountingLoader;

	fn loader(&self) -> &Self::Loader {
		&self.loader
	}

	fn warn(&mut self, _w: Warning) {}

	fn cached_scoped_context(&self, key: &ScopedContextKey) -> Option<&Context> {
		self.scoped.get(key)
	}

	fn cache_scoped_context(&mut self, key: ScopedContextKey, context: Context) {
		self.scoped.insert(key, context);
	}
}

#[tokio::test]
async fn scoped_contexts_are_processed_once() {
	let document = json!({
		"@context": {
			"@vocab": "http://x/",
			"T": { "@context": "http://x/scoped" }
		},
		"@graph": [
			{ "@type": "T", "name": "a" },
			{ "@type": "T", "name": "b" },
			{ "@type": "T", "name": "c" }
		]
	});

	// Every processing of the scoped context loads it.
	let plain = CountingLoader::default();
	let expected = document
		.expand_full(&mut &plain, Context::default(), None, ExpansionOptions::default())
		.await
		.unwrap();

	let memoized = CountingLoader::default();
	let mut env = ScopedCacheOnly {
		loader: &memoized,
		scoped: HashMap::new(),
	};
	let expanded = document
		.expand_full(&mut env, Context::default(), None, ExpansionOptions::default())
		.await
		.unwrap();

	assert_eq!(expanded.into_json(), expected.into_json());
	assert_eq!(env.scoped.len(), 1);
	assert_eq!(plain.loads.get(), memoized.loads.get() + 2)
}

#[tokio::test]
async fn frame_expansion_keeps_references_and_wildcards() {
	let frame = json!({
		"@context": { "@vocab": "http://x/" },
		"@graph": [
			{ "@id": "http://x/a" },
			{ "@type": {} },
			{ "@id": [], "@type": { "@default": "Thing" }, "name": "b" },
			{ "@type": {}, "name": "c" }
		]
	});

	let mut env = NoLoader;
	let document = frame
		.expand_full(&mut env, Context::default(), None, ExpansionOptions::default().for_frame())
		.await
		.unwrap();

	assert_eq!(
		document.into_json(),
		json!([
			{ "@id": "http://x/a" },
			{ "@type": ["http://x/Thing"], "http://x/name": [{ "@value": "b" }] },
			{ "http://x/name": [{ "@value": "c" }] }
		])
	);

	// Outside of a frame, the reference is dropped and wildcards are errors.
	let document = json!({ "@graph": [{ "@id": "http://x/a" }] })
		.expand_full(&mut env, Context::default(), None, ExpansionOptions::default())
		.await
		.unwrap();
	assert_eq!(document.into_json(), json!([]));

	let error = frame
		.expand_full(&mut env, Context::default(), None, ExpansionOptions::default())
		.await
		.unwrap_err();
	assert_eq!(error.code(), ErrorCode::InvalidTypeValue);

	let error = json!({ "@id": {}, "http://x/p": "v" })
		.expand_full(&mut env, Context::default(), None, ExpansionOptions::default())
		.await
		.unwrap_err();
	assert_eq!(error.code(), ErrorCode::InvalidIdValue)
}
