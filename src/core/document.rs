use iref::{Iri, IriBuf};
use mime::Mime;
use serde_json::Value;

/// Remote document.
///
/// Content of a loaded document along with the metadata gathered while
/// loading it.
#[derive(Debug, Clone)]
pub struct RemoteDocument<T = Value> {
	/// Final URL of the loaded document, after eventual redirection.
	pub url: Option<IriBuf>,

	/// `Content-Type` of the loaded document, without parameters.
	pub content_type: Option<Mime>,

	/// Value of the HTTP `Link` header using the
	/// `http://www.w3.org/ns/json-ld#context` relation, if any.
	pub context_url: Option<IriBuf>,

	/// `profile` parameter of the content type, if any.
	pub profile: Option<String>,

	/// The retrieved document.
	pub document: T,
}

impl<T> RemoteDocument<T> {
	pub fn new(url: Option<IriBuf>, content_type: Option<Mime>, document: T) -> Self {
		Self {
			url,
			content_type,
			context_url: None,
			profile: None,
			document,
		}
	}

	pub fn with_context_url(mut self, context_url: Option<IriBuf>) -> Self {
		self.context_url = context_url;
		self
	}

	pub fn with_profile(mut self, profile: Option<String>) -> Self {
		self.profile = profile;
		self
	}

	pub fn url(&self) -> Option<&Iri> {
		self.url.as_deref()
	}

	pub fn content_type(&self) -> Option<&Mime> {
		self.content_type.as_ref()
	}

	pub fn context_url(&self) -> Option<&Iri> {
		self.context_url.as_deref()
	}

	pub fn document(&self) -> &T {
		&self.document
	}

	pub fn into_document(self) -> T {
		self.document
	}

	/// Maps the content of the remote document.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteDocument<U> {
		RemoteDocument {
			url: self.url,
			content_type: self.content_type,
			context_url: self.context_url,
			profile: self.profile,
			document: f(self.document),
		}
	}
}

impl From<Value> for RemoteDocument {
	fn from(document: Value) -> Self {
		Self::new(None, None, document)
	}
}
