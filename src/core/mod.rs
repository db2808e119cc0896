//! JSON-LD core types.
mod blank;
pub mod context;
mod document;
mod id;
mod indexed;
pub mod loader;
pub mod mime;
pub mod object;
mod processing_mode;
mod term;
mod ty;

pub use blank::*;
pub use context::{Context, TermDefinition};
pub use document::*;
pub use id::*;
pub use indexed::*;
pub use loader::{FsLoader, LoadError, LoadOptions, Loader, NoLoader};
pub use object::{ExpandedDocument, IndexedNode, IndexedObject, IntoJson, Node, Object, ValueObject};
pub use processing_mode::*;
pub use term::*;
pub use ty::*;
