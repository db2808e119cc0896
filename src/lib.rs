//! JSON-LD 1.1 processor with TriG, Turtle and N-Quads codecs.
//!
//! The crate transforms between the surface forms of the same RDF data:
//! compacted, expanded and flattened JSON-LD, and RDF datasets written in
//! TriG, Turtle or N-Quads.
//!
//! - [`algorithms`] implements the JSON-LD 1.1 processing algorithms
//!   (context processing, expansion, compaction, flattening and RDF
//!   conversion) over the typed expanded model of [`core`].
//! - [`trig`] parses TriG/Turtle into JSON-LD and pretty-prints JSON-LD as
//!   TriG/Turtle, [`nquads`] does the same for N-Quads through the [`rdf`]
//!   dataset model.
//! - [`processor`] and [`api`] expose the high-level operations, in the
//!   manner of the JSON-LD 1.1 `JsonLdProcessor` interface.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use static_iref::iri;
//! use json_ld_trig::{processor, NoLoader, RemoteDocument};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let input = RemoteDocument::new(
//! 	Some(iri!("http://x/").to_owned()),
//! 	None,
//! 	json!({
//! 		"@context": { "name": "http://schema.org/name" },
//! 		"name": "A"
//! 	}),
//! );
//!
//! let options = processor::Options::new(NoLoader);
//! let expanded = processor::expand(&input, &options).await.unwrap();
//! assert_eq!(expanded, json!([{ "http://schema.org/name": [{ "@value": "A" }] }]));
//! # }
//! ```
pub mod algorithms;
pub mod api;
pub mod core;
pub mod nquads;
pub mod processor;
pub mod rdf;
pub mod syntax;
pub mod trig;

pub use self::core::*;
pub use syntax::{Direction, LenientLangTagBuf, Nullable};
