use std::cmp::Ordering;
use std::collections::HashMap;

use super::Context;
use crate::syntax::{Container, Direction, LenientLangTagBuf, Nullable};
use crate::Type;

/// Type (or `@reverse`) value of the inverse context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSelection {
	Reverse,
	Any,
	Type(Type),
}

/// Language and direction pair.
///
/// `Null` stands for `@null`, `Some((None, None))` for `@none`.
pub type LangDir = Nullable<(Option<LenientLangTagBuf>, Option<Direction>)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LangSelection {
	Any,
	Lang(LangDir),
}

#[derive(Debug, Clone, Default)]
struct InverseType {
	reverse: Option<String>,
	any: Option<String>,
	map: HashMap<Type, String>,
}

impl InverseType {
	fn select(&self, selection: &TypeSelection) -> Option<&String> {
		match selection {
			TypeSelection::Reverse => self.reverse.as_ref(),
			TypeSelection::Any => self.any.as_ref(),
			TypeSelection::Type(ty) => self.map.get(ty),
		}
	}

	fn set_any(&mut self, term: &str) {
		self.any.get_or_insert_with(|| term.to_owned());
	}

	fn set(&mut self, ty: &Type, term: &str) {
		self.map
			.entry(ty.clone())
			.or_insert_with(|| term.to_owned());
	}
}

#[derive(Debug, Clone, Default)]
struct InverseLang {
	any: Option<String>,
	map: HashMap<LangDir, String>,
}

impl InverseLang {
	fn select(&self, selection: &LangSelection) -> Option<&String> {
		match selection {
			LangSelection::Any => self.any.as_ref(),
			LangSelection::Lang(lang_dir) => self.map.get(lang_dir),
		}
	}

	fn set_any(&mut self, term: &str) {
		self.any.get_or_insert_with(|| term.to_owned());
	}

	fn set(&mut self, lang_dir: LangDir, term: &str) {
		self.map.entry(lang_dir).or_insert_with(|| term.to_owned());
	}
}

#[derive(Debug, Clone)]
struct InverseContainer {
	language: InverseLang,
	typ: InverseType,
	/// Term stored under `@any`/`@none`.
	any: String,
}

impl InverseContainer {
	fn new(term: &str) -> Self {
		Self {
			language: InverseLang::default(),
			typ: InverseType::default(),
			any: term.to_owned(),
		}
	}
}

/// Container map of a single IRI.
#[derive(Debug, Clone, Default)]
pub struct InverseDefinition {
	map: HashMap<Container, InverseContainer>,
}

impl InverseDefinition {
	fn entry(&mut self, container: Container, term: &str) -> &mut InverseContainer {
		self.map
			.entry(container)
			.or_insert_with(|| InverseContainer::new(term))
	}

	/// Term selection: the first container, then the first preferred value,
	/// with a match wins.
	pub fn select(&self, containers: &[Container], selection: &Selection) -> Option<&str> {
		for container in containers {
			if let Some(type_lang_map) = self.map.get(container) {
				match selection {
					Selection::Any => return Some(&type_lang_map.any),
					Selection::Type(preferred_values) => {
						for item in preferred_values {
							if let Some(term) = type_lang_map.typ.select(item) {
								return Some(term);
							}
						}
					}
					Selection::Lang(preferred_values) => {
						for item in preferred_values {
							if let Some(term) = type_lang_map.language.select(item) {
								return Some(term);
							}
						}
					}
				}
			}
		}

		None
	}
}

/// Preferred values given to the term selection.
#[derive(Debug, Clone)]
pub enum Selection {
	/// Any term (`@any` type/language).
	Any,
	Type(Vec<TypeSelection>),
	Lang(Vec<LangSelection>),
}

/// Inverse context.
///
/// Maps every IRI of the context to the terms that may be used to compact
/// it, indexed by container and type or language.
#[derive(Debug, Clone, Default)]
pub struct InverseContext {
	map: HashMap<String, InverseDefinition>,
}

impl InverseContext {
	pub fn contains(&self, iri: &str) -> bool {
		self.map.contains_key(iri)
	}

	pub fn get(&self, iri: &str) -> Option<&InverseDefinition> {
		self.map.get(iri)
	}

	pub fn select(&self, iri: &str, containers: &[Container], selection: &Selection) -> Option<&str> {
		self.get(iri)
			.and_then(|definition| definition.select(containers, selection))
	}
}

impl<'a> From<&'a Context> for InverseContext {
	fn from(context: &'a Context) -> Self {
		let mut result = InverseContext::default();

		let mut definitions: Vec<_> = context.definitions().iter().collect();
		definitions.sort_by(|(a, _), (b, _)| match a.len().cmp(&b.len()) {
			Ordering::Equal => a.cmp(b),
			ord => ord,
		});

		for (term, term_definition) in definitions {
			let Some(var) = term_definition.iri() else {
				continue;
			};

			let container_map = result.map.entry(var.to_owned()).or_default();
			let type_lang_map = container_map.entry(term_definition.container, term);
			let type_map = &mut type_lang_map.typ;
			let lang_map = &mut type_lang_map.language;

			if term_definition.reverse_property {
				type_map.reverse.get_or_insert_with(|| term.clone());
				continue;
			}

			match &term_definition.typ {
				Some(Type::None) => {
					type_map.set_any(term);
					lang_map.set_any(term);
				}
				Some(typ) => type_map.set(typ, term),
				None => match (&term_definition.language, &term_definition.direction) {
					(Some(language), Some(direction)) => {
						let lang_dir = match (language, direction) {
							(Nullable::Null, Nullable::Null) => Nullable::Null,
							(language, direction) => Nullable::Some((
								language.as_ref().option().map(LenientLangTagBuf::to_lowercase),
								direction.option(),
							)),
						};
						lang_map.set(lang_dir, term)
					}
					(Some(language), None) => {
						let lang_dir = match language {
							Nullable::Some(language) => {
								Nullable::Some((Some(language.to_lowercase()), None))
							}
							Nullable::Null => Nullable::Null,
						};
						lang_map.set(lang_dir, term)
					}
					(None, Some(direction)) => {
						lang_map.set(Nullable::Some((None, direction.option())), term)
					}
					(None, None) => {
						lang_map.set(
							Nullable::Some((
								context.default_language().map(LenientLangTagBuf::to_lowercase),
								context.default_base_direction(),
							)),
							term,
						);
						lang_map.set(Nullable::Some((None, None)), term);
						type_map.set(&Type::None, term);
					}
				},
			}
		}

		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::context::TermDefinition;
	use crate::{Id, Term};
	use static_iref::iri;

	fn define(context: &mut Context, term: &str, iri: &str, container: Container) {
		context.set(
			term.to_owned(),
			Some(TermDefinition {
				value: Some(Term::Id(Id::from_string(iri.to_owned()))),
				container,
				..Default::default()
			}),
		);
	}

	#[test]
	fn shortest_term_wins() {
		let mut context = Context::new(Some(iri!("http://example.org/").to_owned()));
		define(&mut context, "name", "http://schema.org/name", Container::None);
		define(&mut context, "n", "http://schema.org/name", Container::None);
		define(&mut context, "names", "http://schema.org/name", Container::Set);

		let inverse = context.inverse();
		let selection = Selection::Lang(vec![
			LangSelection::Lang(Nullable::Null),
			LangSelection::Lang(Nullable::Some((None, None))),
		]);
		assert_eq!(
			inverse.select("http://schema.org/name", &[Container::None], &selection),
			Some("n")
		);
		assert_eq!(
			inverse.select("http://schema.org/name", &[Container::Set], &selection),
			Some("names")
		);
		assert!(!inverse.contains("http://schema.org/other"));
	}
}
