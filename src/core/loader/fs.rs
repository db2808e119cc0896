use iref::{Iri, IriBuf};
use mime::Mime;
use std::path::{Path, PathBuf};

use super::{parse_json, LoadError, LoadOptions, Loader};
use crate::{mime as media, RemoteDocument};

/// Loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// No mount point found for the given IRI.
	#[error("no mount point")]
	NoMountPoint,

	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
}

/// File-system loader.
///
/// Loads documents from the file system, either through `file:` IRIs or by
/// attaching local directories to IRI prefixes.
///
/// The media type of a loaded file is guessed from its suffix. JSON files
/// are parsed, other files are returned as a JSON string holding their
/// content.
///
/// Loaded documents are not cached.
#[derive(Debug, Default, Clone)]
pub struct FsLoader {
	mount_points: Vec<(PathBuf, IriBuf)>,
}

impl FsLoader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds the given IRI prefix to the given path.
	///
	/// Any document with an IRI starting with `url` is loaded from the
	/// referenced local directory.
	pub fn mount<P: AsRef<Path>>(&mut self, url: IriBuf, path: P) {
		self.mount_points.push((path.as_ref().into(), url));
	}

	/// Returns the local file path associated to the given `url` if any.
	pub fn filepath(&self, url: &Iri) -> Option<PathBuf> {
		let url = url.as_str();
		let url = match url.find(['?', '#']) {
			Some(i) => &url[..i],
			None => url,
		};

		for (path, target_url) in &self.mount_points {
			if let Some(suffix) = url.strip_prefix(target_url.as_str()) {
				let mut filepath = path.clone();
				for seg in suffix.split('/').filter(|s| !s.is_empty()) {
					filepath.push(seg)
				}

				return Some(filepath);
			}
		}

		url.strip_prefix("file://").map(PathBuf::from)
	}
}

impl Loader for FsLoader {
	async fn load_with(&self, url: &Iri, _: &LoadOptions) -> Result<RemoteDocument, LoadError> {
		let filepath = self
			.filepath(url)
			.ok_or_else(|| LoadError::new(url.to_owned(), Error::NoMountPoint))?;

		log::debug!("loading `{url}` from `{}`", filepath.display());
		let contents = std::fs::read_to_string(&filepath)
			.map_err(|e| LoadError::new(url.to_owned(), Error::IO(e)))?;

		let content_type: Option<Mime> = filepath
			.to_str()
			.and_then(media::guess)
			.and_then(|m| m.parse().ok());

		let document = match &content_type {
			Some(m) if !media::is_json(m) => serde_json::Value::String(contents),
			_ => parse_json(url, &contents)?,
		};

		Ok(RemoteDocument::new(
			Some(url.to_owned()),
			content_type,
			document,
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use static_iref::iri;

	#[test]
	fn mounted_paths() {
		let mut loader = FsLoader::new();
		loader.mount(iri!("https://example.org/contexts/").to_owned(), "/tmp/ctx");

		assert_eq!(
			loader.filepath(iri!("https://example.org/contexts/a/b.jsonld")),
			Some(PathBuf::from("/tmp/ctx/a/b.jsonld"))
		);
		assert_eq!(
			loader.filepath(iri!("file:///tmp/data.ttl")),
			Some(PathBuf::from("/tmp/data.ttl"))
		);
		assert_eq!(loader.filepath(iri!("https://other.org/x")), None);
	}
}
