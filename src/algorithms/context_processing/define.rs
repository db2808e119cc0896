use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{ContextProcessingOptions, ContextProcessor, Error, TargetContext};
use crate::{
	algorithms::{ProcessingEnvironment, Warning},
	syntax::{
		is_keyword, is_keyword_like, iri::ends_with_gen_delim, CompactIri, Container,
		ContainerItem, Direction, Keyword, LenientLangTagBuf, Nullable,
	},
	Id, ProcessingMode, Term, TermDefinition, Type,
};

/// Entries allowed in an expanded term definition.
const TERM_DEFINITION_ENTRIES: [Keyword; 11] = [
	Keyword::Id,
	Keyword::Reverse,
	Keyword::Container,
	Keyword::Context,
	Keyword::Direction,
	Keyword::Index,
	Keyword::Language,
	Keyword::Nest,
	Keyword::Prefix,
	Keyword::Protected,
	Keyword::Type,
];

// Checks if the input term is an IRI ending with a gen-delim character, or a blank node identifier.
fn is_gen_delim_or_blank(t: &Term) -> bool {
	match t {
		Term::Id(Id::Blank(_)) => true,
		Term::Id(Id::Iri(iri)) => ends_with_gen_delim(iri.as_str()),
		_ => false,
	}
}

/// Checks if the the given character is included in the given string anywhere but at the first or last position.
fn contains_between_boundaries(id: &str, c: char) -> bool {
	match (id.find(c), id.rfind(c)) {
		(Some(i), Some(j)) => i > 0 && j < id.len() - 1,
		_ => false,
	}
}

/// Terms of the local context that have been defined, or are being defined.
#[derive(Default)]
pub struct DefinedTerms(HashMap<String, bool>);

impl DefinedTerms {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts the definition of `term`.
	///
	/// Returns `false` if the term is already defined, and fails if the
	/// term is currently being defined.
	pub fn begin(&mut self, term: &str) -> Result<bool, Error> {
		match self.0.get(term) {
			Some(true) => Ok(false),
			Some(false) => Err(Error::CyclicIriMapping(term.to_owned())),
			None => {
				self.0.insert(term.to_owned(), false);
				Ok(true)
			}
		}
	}

	pub fn end(&mut self, term: &str) {
		self.0.insert(term.to_owned(), true);
	}
}

impl<'a> ContextProcessor<'a> {
	fn mode_1_0(&self) -> bool {
		self.options.processing_mode == ProcessingMode::JsonLd1_0
	}

	/// Follows the `https://www.w3.org/TR/json-ld11-api/#create-term-definition` algorithm.
	pub async fn define(
		&self,
		env: &mut impl ProcessingEnvironment,
		result: &mut TargetContext<'_>,
		local_context: &Map<String, Value>,
		term: &str,
		protected: bool,
	) -> Result<(), Error> {
		// 1) If defined contains the entry term and the associated value is true
		// return. Otherwise, if the value is false, a cyclic IRI mapping error
		// has been detected.
		if !result.defined.begin(term)? {
			return Ok(());
		}

		// 2) If term is the empty string, an invalid term definition has been
		// detected.
		if term.is_empty() {
			return Err(Error::InvalidTermDefinition);
		}

		let Some(value) = local_context.get(term) else {
			result.defined.end(term);
			return Ok(());
		};

		// 4) If term is @type, ...
		if term == Keyword::Type.into_str() {
			return self.define_type(result, value, protected);
		}

		// Since keywords cannot be overridden, term MUST NOT be a keyword.
		if is_keyword(term) {
			return Err(Error::KeywordRedefinition(term.to_owned()));
		}

		// If term has the form of a keyword, return; processors SHOULD generate
		// a warning.
		if is_keyword_like(term) {
			env.warn(Warning::KeywordLikeTerm(term.to_owned()));
			result.defined.end(term);
			return Ok(());
		}

		// 5) Initialize `previous_definition` to any existing term definition
		// for `term` in `active_context`, removing that term definition from
		// active context.
		let previous_definition = result.value.set(term.to_owned(), None);

		// 7-9) Normalize value into an expanded term definition.
		let (value, simple_term) = match value {
			Value::Null => {
				let mut map = Map::new();
				map.insert(Keyword::Id.into_str().to_owned(), Value::Null);
				(map, false)
			}
			Value::String(s) => {
				let mut map = Map::new();
				map.insert(Keyword::Id.into_str().to_owned(), Value::String(s.clone()));
				(map, true)
			}
			Value::Object(map) => (map.clone(), false),
			_ => return Err(Error::InvalidTermDefinition),
		};

		// 10) Create a new term definition, `definition`, initializing `prefix`
		// flag to `false`, `protected` to `protected`, and `reverse_property`
		// to `false`.
		let mut definition = TermDefinition {
			protected,
			..Default::default()
		};

		// 11) If the @protected entry in value is true set the protected flag in
		// definition to true.
		if let Some(protected) = value.get(Keyword::Protected.into_str()) {
			if self.mode_1_0() {
				return Err(Error::InvalidTermDefinition);
			}

			definition.protected = protected.as_bool().ok_or(Error::InvalidProtectedValue)?;
		}

		// 12) If value contains the entry @type:
		if let Some(type_value) = value.get(Keyword::Type.into_str()) {
			let type_value = type_value.as_str().ok_or(Error::InvalidTypeMapping)?;
			let typ = self
				.expand_iri_recursive(env, result, local_context, type_value, false, true)
				.await?;

			// If the expanded type is @json or @none, and processing mode is
			// json-ld-1.0, an invalid type mapping error has been detected.
			if self.mode_1_0()
				&& matches!(typ, Term::Keyword(Keyword::Json) | Term::Keyword(Keyword::None))
			{
				return Err(Error::InvalidTypeMapping);
			}

			definition.typ = Some(Type::try_from(typ).map_err(|_| Error::InvalidTypeMapping)?);
		}

		// 13) If `value` contains the entry `@reverse`:
		if let Some(reverse_value) = value.get(Keyword::Reverse.into_str()) {
			// If `value` contains `@id` or `@nest`, entries, an invalid reverse
			// property error has been detected.
			if value.contains_key(Keyword::Id.into_str())
				|| value.contains_key(Keyword::Nest.into_str())
			{
				return Err(Error::InvalidReverseProperty);
			}

			let reverse_value = reverse_value.as_str().ok_or(Error::InvalidIriMapping)?;

			// If the value associated with the @reverse entry is a string having
			// the form of a keyword, return; processors SHOULD generate a warning.
			if is_keyword_like(reverse_value) {
				env.warn(Warning::KeywordLikeValue(reverse_value.to_owned()));
				result.defined.end(term);
				return Ok(());
			}

			// Otherwise, set the IRI mapping of definition to the result of IRI
			// expanding the value associated with the @reverse entry.
			match self
				.expand_iri_recursive(env, result, local_context, reverse_value, false, true)
				.await?
			{
				Term::Id(mapping) if mapping.is_valid() => {
					definition.value = Some(Term::Id(mapping))
				}
				_ => return Err(Error::InvalidIriMapping),
			}

			// If `value` contains an `@container` entry, its value must be
			// `@set`, `@index` or null.
			if let Some(container_value) = value.get(Keyword::Container.into_str()) {
				match container_value {
					Value::Null => (),
					other => match Container::from_json(other) {
						Ok(c @ (Container::Set | Container::Index)) => definition.container = c,
						_ => return Err(Error::InvalidReverseProperty),
					},
				}
			}

			// Set the `reverse_property` flag of `definition` to `true`.
			definition.reverse_property = true;

			result.value.set(term.to_owned(), Some(definition));
			result.defined.end(term);
			return Ok(());
		}

		match value.get(Keyword::Id.into_str()) {
			// 14) If `value` contains the entry `@id` and its value does not equal `term`:
			Some(id_value) if id_value.as_str() != Some(term) => match id_value {
				// If the `@id` entry of value is `null`, the term is not used for IRI
				// expansion, but is retained to be able to detect future redefinitions
				// of this term.
				Value::Null => (),
				Value::String(id_value) => {
					// If the value associated with the `@id` entry is not a
					// keyword, but has the form of a keyword, return;
					// processors SHOULD generate a warning.
					if is_keyword_like(id_value) && !is_keyword(id_value) {
						env.warn(Warning::KeywordLikeValue(id_value.clone()));
						result.defined.end(term);
						return Ok(());
					}

					// Otherwise, set the IRI mapping of `definition` to the result
					// of IRI expanding the value associated with the `@id` entry.
					definition.value = match self
						.expand_iri_recursive(env, result, local_context, id_value, false, true)
						.await?
					{
						// If it equals `@context`, an invalid keyword alias error has
						// been detected.
						Term::Keyword(Keyword::Context) => return Err(Error::InvalidKeywordAlias),
						Term::Keyword(k) => Some(Term::Keyword(k)),
						Term::Id(id) if id.is_valid() => Some(Term::Id(id)),
						// If the resulting IRI mapping is neither a keyword, nor an
						// IRI, nor a blank node identifier, an invalid IRI mapping
						// error has been detected.
						_ => return Err(Error::InvalidIriMapping),
					};

					// If `term` contains a colon (:) anywhere but as the first or
					// last character of `term`, or if it contains a slash (/)
					// anywhere:
					if contains_between_boundaries(term, ':') || term.contains('/') {
						// Set the value associated with `defined`'s `term` entry
						// to `true`.
						result.defined.end(term);

						// If the result of IRI expanding `term` using
						// `local_context`, and `defined`, is not the same as the
						// IRI mapping of definition, an invalid IRI mapping error
						// has been detected.
						let expanded_term = self
							.expand_iri_recursive(env, result, local_context, term, false, true)
							.await?;
						if definition.value.as_ref() != Some(&expanded_term) {
							return Err(Error::InvalidIriMapping);
						}
					}

					// If `term` contains neither a colon (:) nor a slash (/),
					// simple term is true, and if the IRI mapping of definition
					// is either an IRI ending with a gen-delim character,
					// or a blank node identifier, set the `prefix` flag in
					// `definition` to true.
					if !term.contains(':')
						&& !term.contains('/') && simple_term
						&& definition.value.as_ref().is_some_and(is_gen_delim_or_blank)
					{
						definition.prefix = true;
					}
				}
				_ => return Err(Error::InvalidIriMapping),
			},
			_ => {
				if term.chars().skip(1).any(|c| c == ':') {
					// 15) Otherwise if the `term` contains a colon (:) anywhere
					// after the first character.
					if let Some(compact_iri) = CompactIri::new(term) {
						// If `term` is a compact IRI with a prefix that is an entry in local
						// context a dependency has been found.
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

						// If `term`'s prefix has a term definition in `active_context`, set the
						// IRI mapping of `definition` to the result of concatenating the value
						// associated with the prefix's IRI mapping and the term's suffix.
						if let Some(prefix_id) = result
							.value
							.get(compact_iri.prefix)
							.and_then(|d| d.value.as_ref())
							.and_then(Term::as_id)
						{
							let mut iri = prefix_id.as_str().to_owned();
							iri.push_str(compact_iri.suffix);
							definition.value = Some(Term::Id(Id::from_string(iri)))
						}
					}

					// Otherwise, `term` is an IRI or blank node identifier.
					if definition.value.is_none() {
						definition.value = Some(Term::Id(Id::from_string(term.to_owned())))
					}
				} else if term.contains('/') {
					// 16) Term is a relative IRI reference.
					// Set the IRI mapping of definition to the result of IRI
					// expanding term. If the resulting IRI mapping is not an IRI,
					// an invalid IRI mapping error has been detected.
					match result.value.expand_iri_with(term, false, true, |w| env.warn(w)) {
						Term::Id(Id::Iri(iri)) => definition.value = Some(Term::Id(Id::Iri(iri))),
						_ => return Err(Error::InvalidIriMapping),
					}
				} else {
					// 18) Otherwise, if `active_context` has a vocabulary mapping,
					// the IRI mapping of `definition` is set to the result of
					// concatenating the value associated with the vocabulary
					// mapping and `term`. If it does not have a vocabulary
					// mapping, an invalid IRI mapping error been detected.
					match result.value.vocabulary() {
						Some(Term::Id(vocab)) => {
							let mut iri = vocab.as_str().to_owned();
							iri.push_str(term);
							definition.value = Some(Term::Id(Id::from_string(iri)))
						}
						_ => return Err(Error::InvalidIriMapping),
					}
				}
			}
		}

		// 19) If value contains the entry @container:
		if let Some(container_value) = value
			.get(Keyword::Container.into_str())
			.filter(|v| !v.is_null())
		{
			// If the container value is @graph, @id, or @type, or is otherwise not a
			// string, generate an invalid container mapping error if processing
			// mode is json-ld-1.0.
			let container =
				Container::from_json(container_value).map_err(|_| Error::InvalidContainerMapping)?;

			if self.mode_1_0()
				&& (!container_value.is_string()
					|| !matches!(
						container,
						Container::Index | Container::Language | Container::List | Container::Set
					)) {
				return Err(Error::InvalidContainerMapping);
			}

			definition.container = container;

			// If the `container` mapping of definition includes `@type`:
			if definition.container.contains(ContainerItem::Type) {
				match &definition.typ {
					// If type mapping in definition is undefined, set it to @id.
					None => definition.typ = Some(Type::Id),
					// If type mapping in definition is neither `@id` nor `@vocab`,
					// an invalid type mapping error has been detected.
					Some(Type::Id | Type::Vocab) => (),
					Some(_) => return Err(Error::InvalidTypeMapping),
				}
			}
		}

		// 20) If value contains the entry @index:
		if let Some(index_value) = value.get(Keyword::Index.into_str()) {
			// If processing mode is json-ld-1.0 or container mapping does not include
			// `@index`, an invalid term definition has been detected.
			if !definition.container.contains(ContainerItem::Index) || self.mode_1_0() {
				return Err(Error::InvalidTermDefinition);
			}

			// Initialize `index` to the value associated with the `@index` entry,
			// which MUST be a string expanding to an IRI.
			let index_value = index_value.as_str().ok_or(Error::InvalidTermDefinition)?;
			match result.value.expand_iri_with(index_value, false, true, |w| env.warn(w)) {
				Term::Id(Id::Iri(_)) => (),
				_ => return Err(Error::InvalidTermDefinition),
			}

			definition.index = Some(index_value.to_owned())
		}

		// 21) If `value` contains the entry `@context`:
		if let Some(context) = value.get(Keyword::Context.into_str()) {
			// If processing mode is json-ld-1.0, an invalid term definition has been
			// detected.
			if self.mode_1_0() {
				return Err(Error::InvalidTermDefinition);
			}

			// Invoke the Context Processing algorithm using the `active_context`,
			// `context` as local context, `base_url`, and `true` for override
			// protected. If any error is detected, an invalid scoped context error
			// has been detected.
			let options = ContextProcessingOptions {
				override_protected: true,
				..self.options
			};

			Box::pin(
				self.for_sub_context(&*result.value, self.base_url, options, false)
					.process(env, context),
			)
			.await
			.map_err(|e| match e {
				e @ Error::LoadingRemoteContextFailed(_) => e,
				_ => Error::InvalidScopedContext,
			})?;

			// Set the local context of definition to context, and base URL to base URL.
			definition.context = Some(Box::new(context.clone()));
			definition.base_url = self.base_url.map(ToOwned::to_owned);
		}

		// 22) If `value` contains the entry `@language` and does not contain the
		// entry `@type`:
		if !value.contains_key(Keyword::Type.into_str()) {
			if let Some(language_value) = value.get(Keyword::Language.into_str()) {
				// Initialize `language` to the value associated with the `@language`
				// entry, which MUST be either null or a string.
				definition.language = Some(match language_value {
					Value::Null => Nullable::Null,
					Value::String(tag) => {
						let tag = LenientLangTagBuf::new(tag.to_ascii_lowercase());
						if !tag.is_well_formed() {
							env.warn(Warning::MalformedLanguageTag(tag.to_string()))
						}

						Nullable::Some(tag)
					}
					_ => return Err(Error::InvalidLanguageMapping),
				});
			}

			// 23) If `value` contains the entry `@direction` and does not contain the
			// entry `@type`:
			if let Some(direction_value) = value.get(Keyword::Direction.into_str()) {
				// Initialize `direction` to the value associated with the `@direction`
				// entry, which MUST be either null, "ltr", or "rtl".
				definition.direction = Some(match direction_value {
					Value::Null => Nullable::Null,
					Value::String(dir) => Nullable::Some(
						dir.parse::<Direction>()
							.map_err(|_| Error::InvalidBaseDirection)?,
					),
					_ => return Err(Error::InvalidBaseDirection),
				});
			}
		}

		// 24) If value contains the entry @nest:
		if let Some(nest_value) = value.get(Keyword::Nest.into_str()) {
			// If processing mode is json-ld-1.0, an invalid term definition has been
			// detected.
			if self.mode_1_0() {
				return Err(Error::InvalidTermDefinition);
			}

			// Its value must be a string and must not be a keyword other than
			// @nest.
			match nest_value.as_str() {
				Some(nest) if !is_keyword(nest) || nest == Keyword::Nest.into_str() => {
					definition.nest = Some(nest.to_owned())
				}
				_ => return Err(Error::InvalidNestValue),
			}
		}

		// 25) If value contains the entry @prefix:
		if let Some(prefix_value) = value.get(Keyword::Prefix.into_str()) {
			// If processing mode is json-ld-1.0, or if `term` contains a colon (:) or
			// slash (/), an invalid term definition has been detected.
			if term.contains(':') || term.contains('/') || self.mode_1_0() {
				return Err(Error::InvalidTermDefinition);
			}

			// Set the `prefix` flag to the value associated with the @prefix entry,
			// which MUST be a boolean.
			definition.prefix = prefix_value.as_bool().ok_or(Error::InvalidPrefixValue)?;

			// If the `prefix` flag of `definition` is set to `true`, and its IRI
			// mapping is a keyword, an invalid term definition has been detected.
			if definition.prefix && definition.value.as_ref().is_some_and(Term::is_keyword) {
				return Err(Error::InvalidTermDefinition);
			}
		}

		// 26) If value contains any entry other than @id, @reverse, @container, @context,
		// @direction, @index, @language, @nest, @prefix, @protected, or @type, an
		// invalid term definition error has been detected.
		if value
			.keys()
			.any(|k| !TERM_DEFINITION_ENTRIES.iter().any(|e| e.into_str() == k))
		{
			return Err(Error::InvalidTermDefinition);
		}

		// 27) If override protected is false and previous_definition exists and is protected;
		if !self.options.override_protected {
			if let Some(previous_definition) = previous_definition {
				if previous_definition.protected {
					// If `definition` is not the same as `previous_definition`
					// (other than the value of protected), a protected term
					// redefinition error has been detected.
					if !definition.eq_modulo_protected(&previous_definition) {
						return Err(Error::ProtectedTermRedefinition(term.to_owned()));
					}

					// Set `definition` to `previous definition` to retain the value of
					// protected.
					definition = previous_definition;
				}
			}
		}

		// 28) Set the term definition of `term` in `active_context` to `definition` and
		// set the value associated with `defined`'s entry term to true.
		result.value.set(term.to_owned(), Some(definition));
		result.defined.end(term);

		Ok(())
	}

	/// Defines the `@type` keyword alias.
	///
	/// It may only be given a `@set` container, and be protected.
	fn define_type(
		&self,
		result: &mut TargetContext<'_>,
		value: &Value,
		protected: bool,
	) -> Result<(), Error> {
		let redefinition = || Error::KeywordRedefinition(Keyword::Type.into_str().to_owned());

		// If processing mode is json-ld-1.0, a keyword redefinition error has
		// been detected.
		if self.mode_1_0() {
			return Err(redefinition());
		}

		// At this point, `value` MUST be a map with only either or both of the
		// following entries:
		// An entry for @container with value @set.
		// An entry for @protected.
		let Value::Object(value) = value else {
			return Err(redefinition());
		};

		if value.is_empty() {
			return Err(redefinition());
		}

		let mut definition = TermDefinition {
			value: Some(Term::Keyword(Keyword::Type)),
			protected,
			..Default::default()
		};

		for (key, entry) in value {
			match Keyword::try_from(key.as_str()) {
				Ok(Keyword::Container) => {
					if !matches!(Container::from_json(entry), Ok(Container::Set)) {
						return Err(redefinition());
					}

					definition.container = Container::Set
				}
				Ok(Keyword::Protected) => {
					definition.protected = entry.as_bool().ok_or(Error::InvalidProtectedValue)?
				}
				_ => return Err(redefinition()),
			}
		}

		let term = Keyword::Type.into_str();
		let previous_definition = result.value.set(term.to_owned(), None);

		if !self.options.override_protected {
			if let Some(previous_definition) = previous_definition {
				if previous_definition.protected {
					if !definition.eq_modulo_protected(&previous_definition) {
						return Err(Error::ProtectedTermRedefinition(term.to_owned()));
					}

					definition = previous_definition;
				}
			}
		}

		result.value.set(term.to_owned(), Some(definition));
		result.defined.end(term);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn boundaries() {
		assert!(contains_between_boundaries("a:b", ':'));
		assert!(!contains_between_boundaries(":ab", ':'));
		assert!(!contains_between_boundaries("ab:", ':'));
	}

	#[test]
	fn defined_terms() {
		let mut defined = DefinedTerms::new();
		assert!(defined.begin("a").unwrap());
		assert!(defined.begin("a").is_err());
		defined.end("a");
		assert!(!defined.begin("a").unwrap());
	}
}
