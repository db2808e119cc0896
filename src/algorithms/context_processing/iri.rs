use iref::Iri;
use serde_json::{Map, Value};

use super::{ContextProcessor, Error, TargetContext};
use crate::{
	algorithms::{ProcessingEnvironment, Warning},
	syntax::{is_keyword_like, iri::resolve_iri, CompactIri, Keyword},
	Context, Id, Term,
};

impl<'a> ContextProcessor<'a> {
	/// IRI expansion during context processing.
	///
	/// Terms of the local context the value depends on are defined first.
	pub async fn expand_iri_recursive(
		&self,
		env: &mut impl ProcessingEnvironment,
		result: &mut TargetContext<'_>,
		local_context: &Map<String, Value>,
		value: &str,
		document_relative: bool,
		vocab: bool,
	) -> Result<Term, Error> {
		if let Ok(keyword) = Keyword::try_from(value) {
			return Ok(Term::Keyword(keyword));
		}

		if is_keyword_like(value) {
			env.warn(Warning::KeywordLikeValue(value.to_owned()));
			return Ok(Term::Null);
		}

		// If `local_context` contains an entry with a key that equals value,
		// and the value of the entry for value in defined is not true, create
		// its term definition first.
		if local_context.contains_key(value) {
			Box::pin(self.for_recursive_definition().define(
				env,
				result,
				local_context,
				value,
				false,
			))
			.await?;
		}

		if let Some(term_definition) = result.value.get(value) {
			// If active context has a term definition for value, and the
			// associated IRI mapping is a keyword, return that keyword.
			if let Some(mapping @ Term::Keyword(_)) = &term_definition.value {
				return Ok(mapping.clone());
			}

			// If vocab is true and the active context has a term definition for
			// value, return the associated IRI mapping.
			if vocab {
				return Ok(term_definition.value.clone().unwrap_or(Term::Null));
			}
		}

		if let Some(compact_iri) = CompactIri::new(value) {
			// If prefix is underscore or suffix begins with double-forward-slash
			// return value as it is already an IRI or a blank node identifier.
			if compact_iri.prefix == "_" {
				return Ok(Term::Id(Id::from_string(value.to_owned())));
			}

			// If local context contains a `prefix` entry, and the value of the
			// prefix entry in defined is not true, define the prefix first.
			if local_context.contains_key(compact_iri.prefix) {
				Box::pin(self.for_recursive_definition().define(
					env,
					result,
					local_context,
					compact_iri.prefix,
					false,
				))
				.await?;
			}

			if let Some(expanded) = expand_prefixed(&*result.value, compact_iri) {
				return Ok(expanded);
			}
		} else if is_hierarchical(value) {
			return Ok(Term::Id(Id::from_string(value.to_owned())));
		}

		Ok(result
			.value
			.expand_iri_fallback(value, document_relative, vocab, |w| env.warn(w)))
	}
}

/// Checks if the value is of the form `scheme://...`, that is never
/// expanded further.
fn is_hierarchical(value: &str) -> bool {
	matches!(value.find(':'), Some(i) if i > 0 && value[i + 1..].starts_with("//"))
}

/// Expands a compact IRI whose prefix is a prefix term.
fn expand_prefixed(context: &Context, compact_iri: CompactIri) -> Option<Term> {
	let definition = context.get(compact_iri.prefix)?;
	if !definition.prefix {
		return None;
	}

	let mapping = definition.value.as_ref()?.as_id()?;
	let mut result = mapping.as_str().to_owned();
	result.push_str(compact_iri.suffix);
	Some(Term::Id(Id::from_string(result)))
}

impl Context {
	/// IRI expansion.
	///
	/// See: <https://www.w3.org/TR/json-ld11-api/#iri-expansion>
	pub fn expand_iri(&self, value: &str, document_relative: bool, vocab: bool) -> Term {
		self.expand_iri_with(value, document_relative, vocab, |_| ())
	}

	/// IRI expansion, reporting warnings to `on_warning`.
	pub fn expand_iri_with(
		&self,
		value: &str,
		document_relative: bool,
		vocab: bool,
		mut on_warning: impl FnMut(Warning),
	) -> Term {
		if let Ok(keyword) = Keyword::try_from(value) {
			return Term::Keyword(keyword);
		}

		if is_keyword_like(value) {
			on_warning(Warning::KeywordLikeValue(value.to_owned()));
			return Term::Null;
		}

		if let Some(term_definition) = self.get(value) {
			// If active context has a term definition for value, and the
			// associated IRI mapping is a keyword, return that keyword.
			if let Some(mapping @ Term::Keyword(_)) = &term_definition.value {
				return mapping.clone();
			}

			// If vocab is true and the active context has a term definition for
			// value, return the associated IRI mapping.
			if vocab {
				return term_definition.value.clone().unwrap_or(Term::Null);
			}
		}

		if let Some(compact_iri) = CompactIri::new(value) {
			if compact_iri.prefix == "_" {
				return Term::Id(Id::from_string(value.to_owned()));
			}

			if let Some(expanded) = expand_prefixed(self, compact_iri) {
				return expanded;
			}
		} else if is_hierarchical(value) {
			return Term::Id(Id::from_string(value.to_owned()));
		}

		self.expand_iri_fallback(value, document_relative, vocab, on_warning)
	}

	/// Last steps of IRI expansion, once terms and prefixes have been tried.
	fn expand_iri_fallback(
		&self,
		value: &str,
		document_relative: bool,
		vocab: bool,
		mut on_warning: impl FnMut(Warning),
	) -> Term {
		// If value has the form of an absolute IRI, return value.
		if value.contains(':') {
			if let Ok(iri) = Iri::new(value) {
				return Term::Id(Id::Iri(iri.to_owned()));
			}
		}

		// If vocab is true, and active context has a vocabulary mapping, return
		// the result of concatenating the vocabulary mapping with value.
		if vocab {
			if let Some(Term::Id(mapping)) = self.vocabulary() {
				let mut result = mapping.as_str().to_owned();
				result.push_str(value);
				return Term::Id(Id::from_string(result));
			}
		}

		// Otherwise, if document relative is true set value to the result of
		// resolving value against the base IRI from active context.
		if document_relative {
			if let Some(iri) = resolve_iri(value, self.base_iri()) {
				return Term::Id(Id::Iri(iri));
			}
		}

		// Return value as is.
		if !value.contains(':') || value.starts_with(':') {
			on_warning(Warning::MalformedIri(value.to_owned()));
		}

		Term::Id(Id::from_string(value.to_owned()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::TermDefinition;
	use static_iref::iri;

	fn context() -> Context {
		let mut context = Context::new(Some(iri!("http://example.org/base/doc").to_owned()));
		context.set(
			"schema".to_owned(),
			Some(TermDefinition {
				value: Some(Term::Id(Id::Iri(iri!("http://schema.org/").to_owned()))),
				prefix: true,
				..Default::default()
			}),
		);
		context.set(
			"id".to_owned(),
			Some(TermDefinition {
				value: Some(Term::Keyword(Keyword::Id)),
				..Default::default()
			}),
		);
		context.set_vocabulary(Some(Term::Id(Id::Iri(iri!("http://vocab.org/").to_owned()))));
		context
	}

	#[test]
	fn expand_terms_and_prefixes() {
		let context = context();
		assert_eq!(context.expand_iri("id", false, true), Term::Keyword(Keyword::Id));
		assert_eq!(
			context.expand_iri("schema:name", false, true).as_str(),
			"http://schema.org/name"
		);
		assert_eq!(
			context.expand_iri("name", false, true).as_str(),
			"http://vocab.org/name"
		);
		assert_eq!(
			context.expand_iri("other", true, false).as_str(),
			"http://example.org/base/other"
		);
		assert_eq!(context.expand_iri("_:b0", true, false).as_str(), "_:b0");
		assert_eq!(context.expand_iri("@ignored", true, true), Term::Null);
	}
}
