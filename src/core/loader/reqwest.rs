//! Simple document and context loader based on [`reqwest`](https://crates.io/crates/reqwest)
use iref::{Iri, IriBuf, IriRef};
use mime::Mime;
use reqwest::{
	header::{HeaderValue, ACCEPT, CONTENT_TYPE, LINK},
	StatusCode,
};

use super::{parse_json, LoadError, LoadOptions, Loader, CONTEXT_PROFILE};
use crate::{mime as media, RemoteDocument};

/// Loader options.
#[derive(Debug, Clone)]
pub struct Options {
	/// Maximum number of allowed `Link` header redirections before the loader
	/// fails.
	///
	/// Defaults to 8.
	///
	/// Note: this only controls how many times the loader will use a `Link`
	/// HTTP header to find the target JSON-LD document. The number of allowed
	/// regular HTTP redirections is controlled by the HTTP
	/// [`client`](Self::client).
	pub max_redirections: usize,

	/// Accept non JSON documents (Turtle, TriG, N-Quads), returned as a JSON
	/// string holding the document body.
	pub accept_any: bool,

	/// HTTP client.
	pub client: reqwest::Client,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			max_redirections: 8,
			accept_any: false,
			client: reqwest::Client::default(),
		}
	}
}

/// Loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("internal error: {0}")]
	Reqwest(#[from] reqwest::Error),

	#[error("query failed: status code {0}")]
	QueryFailed(StatusCode),

	#[error("invalid content type")]
	InvalidContentType,

	#[error("multiple context link headers")]
	MultipleContextLinkHeaders,

	#[error("too many redirections")]
	TooManyRedirections,
}

/// `reqwest`-based loader.
///
/// Only works with the [`tokio`](https://tokio.rs/) runtime.
///
/// The loader will follow indirections and `Link` headers.
///
/// Loaded documents are not cached: a new network query is made each time
/// an URL is loaded even if it has already been queried before.
#[derive(Debug, Default, Clone)]
pub struct ReqwestLoader {
	options: Options,
}

impl ReqwestLoader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a new loader with the given options.
	pub fn new_using(options: Options) -> Self {
		Self { options }
	}

	fn accept_header(&self, options: &LoadOptions) -> String {
		let mut json_ld_params = String::new();

		if !options.request_profile.is_empty() {
			json_ld_params.push_str("; profile=");

			if options.request_profile.len() > 1 {
				json_ld_params.push('"');
			}

			json_ld_params.push_str(&options.request_profile.join(" "));

			if options.request_profile.len() > 1 {
				json_ld_params.push('"');
			}
		}

		let mut header = format!("{}{json_ld_params}, {};q=0.9", media::JSONLD, media::JSON);
		if self.options.accept_any {
			header.push_str(&format!(
				", {};q=0.8, {};q=0.8, {};q=0.7",
				media::TRIG,
				media::TURTLE,
				media::NQUADS
			));
		}

		header
	}
}

impl Loader for ReqwestLoader {
	async fn load_with(&self, url: &Iri, options: &LoadOptions) -> Result<RemoteDocument, LoadError> {
		let accept = self.accept_header(options);
		let mut url = url.to_owned();
		let mut redirection_number = 0;

		loop {
			if redirection_number > self.options.max_redirections {
				return Err(LoadError::new(url, Error::TooManyRedirections));
			}

			log::debug!("downloading: {url}");
			let response = self
				.options
				.client
				.get(url.as_str())
				.header(ACCEPT, &accept)
				.send()
				.await
				.map_err(|e| LoadError::new(url.clone(), Error::Reqwest(e)))?;

			if response.status() != StatusCode::OK {
				return Err(LoadError::new(url, Error::QueryFailed(response.status())));
			}

			let content_type = response
				.headers()
				.get(CONTENT_TYPE)
				.and_then(|v| v.to_str().ok())
				.and_then(|v| v.parse::<Mime>().ok());

			match content_type {
				Some(content_type) if media::is_json(&content_type) => {
					let mut context_url = None;
					if content_type.essence_str() != media::JSONLD {
						for link in response.headers().get_all(LINK) {
							for link in links(link) {
								if link.rel.as_deref() == Some(CONTEXT_PROFILE) {
									if context_url.is_some() {
										return Err(LoadError::new(
											url,
											Error::MultipleContextLinkHeaders,
										));
									}

									context_url = resolve_link(&link.href, &url);
								}
							}
						}
					}

					let profile = content_type
						.get_param("profile")
						.map(|p| p.as_str().to_owned());

					let final_url = IriBuf::new(response.url().to_string()).unwrap_or(url);
					let body = response
						.text()
						.await
						.map_err(|e| LoadError::new(final_url.clone(), Error::Reqwest(e)))?;
					let document = parse_json(&final_url, &body)?;

					let content_type = content_type
						.essence_str()
						.parse()
						.unwrap_or(content_type);

					break Ok(RemoteDocument::new(Some(final_url), Some(content_type), document)
						.with_context_url(context_url)
						.with_profile(profile));
				}
				Some(content_type) if self.options.accept_any => {
					let final_url = IriBuf::new(response.url().to_string()).unwrap_or(url);
					let body = response
						.text()
						.await
						.map_err(|e| LoadError::new(final_url.clone(), Error::Reqwest(e)))?;

					break Ok(RemoteDocument::new(
						Some(final_url),
						Some(content_type),
						serde_json::Value::String(body),
					));
				}
				_ => {
					log::debug!("no valid media type found");
					let alternate = response.headers().get_all(LINK).into_iter().find_map(|h| {
						links(h).into_iter().find(|link| {
							link.rel.as_deref() == Some("alternate")
								&& link.typ.as_deref() == Some(media::JSONLD)
						})
					});

					match alternate.and_then(|link| resolve_link(&link.href, &url)) {
						Some(target) => {
							log::debug!("link found");
							url = target;
							redirection_number += 1;
						}
						None => break Err(LoadError::new(url, Error::InvalidContentType)),
					}
				}
			}
		}
	}
}

fn resolve_link(href: &str, base: &Iri) -> Option<IriBuf> {
	IriRef::new(href).ok().map(|r| r.resolved(base))
}

/// Parsed `Link` header entry.
#[derive(Debug, PartialEq, Eq)]
struct Link {
	href: String,
	rel: Option<String>,
	typ: Option<String>,
}

/// Parses the entries of a `Link` header value.
fn links(value: &HeaderValue) -> Vec<Link> {
	let Ok(value) = value.to_str() else {
		return Vec::new();
	};

	value
		.split(',')
		.filter_map(|entry| {
			let mut parts = entry.split(';');
			let href = parts
				.next()?
				.trim()
				.strip_prefix('<')?
				.strip_suffix('>')?
				.to_owned();

			let mut link = Link {
				href,
				rel: None,
				typ: None,
			};

			for param in parts {
				let Some((key, value)) = param.split_once('=') else {
					continue;
				};

				let value = value.trim().trim_matches('"').to_owned();
				match key.trim() {
					"rel" => link.rel = Some(value),
					"type" => link.typ = Some(value),
					_ => (),
				}
			}

			Some(link)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn link_header() {
		let value = HeaderValue::from_static(
			"<ctx.jsonld>; rel=\"http://www.w3.org/ns/json-ld#context\"; type=\"application/ld+json\", <alt>; rel=alternate",
		);

		assert_eq!(
			links(&value),
			vec![
				Link {
					href: "ctx.jsonld".to_owned(),
					rel: Some(CONTEXT_PROFILE.to_owned()),
					typ: Some(media::JSONLD.to_owned())
				},
				Link {
					href: "alt".to_owned(),
					rel: Some("alternate".to_owned()),
					typ: None
				}
			]
		)
	}

	#[test]
	fn accept_header_with_profile() {
		let loader = ReqwestLoader::new();
		assert_eq!(
			loader.accept_header(&LoadOptions::context()),
			"application/ld+json; profile=http://www.w3.org/ns/json-ld#context, application/json;q=0.9"
		)
	}
}
