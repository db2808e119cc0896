use crate::{
	context::inverse::{LangDir, LangSelection, Selection, TypeSelection},
	syntax::{iri::relativize, Container, Keyword, Nullable},
	object::{AnyObject, Ref},
	Context, Id, Indexed, LenientLangTagBuf, Object, ProcessingMode, Term, Type, ValueObject,
};

use super::{CompactionOptions, Compactor, Error, TypeLangValue};

/// IRI compaction against an active context.
pub trait IriCompaction {
	/// Compacts `iri` into a term, a compact IRI or a relative IRI.
	///
	/// If `vocab` is true, the IRI is compacted as a vocabulary item
	/// (property or type), otherwise as a document-relative reference.
	fn compact_iri(&self, iri: &str, vocab: bool) -> Result<String, Error>;
}

impl IriCompaction for Context {
	fn compact_iri(&self, iri: &str, vocab: bool) -> Result<String, Error> {
		let var = match Keyword::try_from(iri) {
			Ok(keyword) => Term::Keyword(keyword),
			Err(_) => Term::Id(Id::from_string(iri.to_owned())),
		};

		let compacted = Compactor::new(self, CompactionOptions::default())
			.compact_iri(&var, vocab, false)?;
		Ok(compacted.unwrap_or_else(|| iri.to_owned()))
	}
}

/// Type of a value object, as stored in the inverse context.
fn value_type(value: &ValueObject) -> Option<Type> {
	match value {
		ValueObject::Literal(_, Some(ty)) => Some(Type::Iri(ty.clone())),
		ValueObject::Json(_) => Some(Type::Json),
		_ => None,
	}
}

fn lang_dir_of(value: &ValueObject) -> LangDir {
	Nullable::Some((
		value.language().map(LenientLangTagBuf::to_lowercase),
		value.direction(),
	))
}

impl Compactor<'_> {
	/// Compacts the given term without considering any value.
	pub fn compact_iri(
		&self,
		var: &Term,
		vocab: bool,
		reverse: bool,
	) -> Result<Option<String>, Error> {
		self.compact_iri_with::<Object>(var, vocab, reverse, None)
	}

	/// Compacts a keyword, returning its alias if any.
	pub fn compact_keyword(&self, keyword: Keyword) -> Result<String, Error> {
		Ok(self
			.compact_iri(&Term::Keyword(keyword), true, false)?
			.unwrap_or_else(|| keyword.into_str().to_owned()))
	}

	/// Compacts the given term, selecting the best term for `value`.
	pub fn compact_iri_with<T: AnyObject>(
		&self,
		var: &Term,
		vocab: bool,
		reverse: bool,
		value: Option<&Indexed<T>>,
	) -> Result<Option<String>, Error> {
		if var.is_null() {
			return Ok(None);
		}

		let active_context = self.active_context;
		let var_str = var.as_str();

		if vocab {
			if let Some(term) = self.select_term(var_str, reverse, value)? {
				return Ok(Some(term));
			}

			// No simple term: try the vocabulary mapping.
			if let Some(vocab_mapping) = active_context.vocabulary() {
				if let Some(suffix) = var_str.strip_prefix(vocab_mapping.as_str()) {
					if !suffix.is_empty() && active_context.get(suffix).is_none() {
						return Ok(Some(suffix.to_owned()));
					}
				}
			}
		}

		// Compact IRI, the shortest then lexicographically least candidate.
		let mut compact_iri: Option<String> = None;
		for (key, definition) in active_context.definitions() {
			if !definition.prefix {
				continue;
			}

			let Some(iri_mapping) = definition.iri() else {
				continue;
			};

			if iri_mapping == var_str {
				continue;
			}

			let Some(suffix) = var_str.strip_prefix(iri_mapping) else {
				continue;
			};

			let candidate = format!("{key}:{suffix}");
			let is_better = match &compact_iri {
				None => true,
				Some(current) => {
					candidate.len() < current.len()
						|| (candidate.len() == current.len() && candidate < *current)
				}
			};

			if is_better {
				let usable = match active_context.get(&candidate) {
					None => true,
					Some(def) => def.iri() == Some(var_str) && value.is_none(),
				};

				if usable {
					compact_iri = Some(candidate)
				}
			}
		}

		if compact_iri.is_some() {
			return Ok(compact_iri);
		}

		if let Term::Id(Id::Iri(iri)) = var {
			if let Some((scheme, rest)) = iri.as_str().split_once(':') {
				if !rest.starts_with("//") {
					if let Some(def) = active_context.get(scheme) {
						if def.prefix {
							return Err(Error::IriConfusedWithPrefix(iri.to_string()));
						}
					}
				}
			}

			if !vocab && self.options.compact_to_relative {
				if let Some(base_iri) = active_context.base_iri() {
					return Ok(Some(relativize(iri.as_str(), base_iri)));
				}
			}
		}

		Ok(Some(var_str.to_owned()))
	}

	/// Term selection through the inverse context.
	fn select_term<T: AnyObject>(
		&self,
		var: &str,
		reverse: bool,
		value: Option<&Indexed<T>>,
	) -> Result<Option<String>, Error> {
		let active_context = self.active_context;
		let inverse = active_context.inverse();
		let Some(entry) = inverse.get(var) else {
			return Ok(None);
		};

		// Preferred container mappings, compatible with `value`, in order.
		let mut containers = Vec::new();
		let mut type_lang_value = None;

		let has_index = value.map_or(false, |v| v.index().is_some());
		let value = value.map(|v| v.as_object_ref());
		if let Some(value) = value {
			if has_index && !value.is_graph() {
				containers.push(Container::Index);
				containers.push(Container::IndexSet);
			}
		}

		// Value object with no type, no index, no language and no direction.
		let mut is_simple_value = false;

		if reverse {
			type_lang_value = Some(TypeLangValue::Type(TypeSelection::Reverse));
			containers.push(Container::Set);
		} else {
			match value {
				Some(Ref::List(list)) => {
					if !has_index {
						containers.push(Container::List);
					}

					let mut common_type: Option<Option<Type>> = None;
					let mut common_lang_dir: Option<LangDir> = None;

					if list.is_empty() {
						common_lang_dir = Some(Nullable::Some((
							active_context.default_language().cloned(),
							active_context.default_base_direction(),
						)))
					} else {
						for item in list {
							let mut item_type = None;
							let mut item_lang_dir = None;
							let mut is_value = false;

							match item.inner() {
								Object::Value(value) => {
									is_value = true;
									match value {
										ValueObject::LangString(_) => {
											item_lang_dir = Some(lang_dir_of(value))
										}
										ValueObject::Literal(_, None) => {
											item_lang_dir = Some(Nullable::Null)
										}
										_ => item_type = value_type(value),
									}
								}
								_ => item_type = Some(Type::Id),
							}

							match &common_lang_dir {
								None => common_lang_dir = item_lang_dir,
								Some(common) => {
									if is_value && Some(common) != item_lang_dir.as_ref() {
										common_lang_dir = Some(Nullable::Some((None, None)))
									}
								}
							}

							match &common_type {
								None => common_type = Some(item_type),
								Some(common) => {
									if *common != item_type {
										common_type = Some(None)
									}
								}
							}

							if common_lang_dir == Some(Nullable::Some((None, None)))
								&& common_type == Some(None)
							{
								break;
							}
						}
					}

					let common_lang_dir =
						common_lang_dir.unwrap_or(Nullable::Some((None, None)));

					type_lang_value = Some(match common_type.flatten() {
						Some(common_type) => {
							TypeLangValue::Type(TypeSelection::Type(common_type))
						}
						None => TypeLangValue::Lang(LangSelection::Lang(common_lang_dir)),
					})
				}
				Some(Ref::Node(node)) if node.is_graph() => {
					if has_index {
						containers.push(Container::GraphIndex);
						containers.push(Container::GraphIndexSet);
					}

					if node.id.is_some() {
						containers.push(Container::GraphId);
						containers.push(Container::GraphIdSet);
					}

					containers.push(Container::Graph);
					containers.push(Container::GraphSet);
					containers.push(Container::Set);

					if !has_index {
						containers.push(Container::GraphIndex);
						containers.push(Container::GraphIndexSet);
					}

					if node.id.is_none() {
						containers.push(Container::GraphId);
						containers.push(Container::GraphIdSet);
					}

					containers.push(Container::Index);
					containers.push(Container::IndexSet);

					type_lang_value = Some(TypeLangValue::Type(TypeSelection::Type(Type::Id)))
				}
				Some(Ref::Value(v)) => {
					if (v.direction().is_some() || v.language().is_some()) && !has_index {
						type_lang_value =
							Some(TypeLangValue::Lang(LangSelection::Lang(lang_dir_of(v))));
						containers.push(Container::Language);
						containers.push(Container::LanguageSet)
					} else if let Some(ty) = value_type(v) {
						type_lang_value = Some(TypeLangValue::Type(TypeSelection::Type(ty)))
					} else {
						is_simple_value =
							v.direction().is_none() && v.language().is_none() && !has_index
					}

					containers.push(Container::Set)
				}
				_ => {
					type_lang_value = Some(TypeLangValue::Type(TypeSelection::Type(Type::Id)));
					containers.push(Container::Id);
					containers.push(Container::IdSet);
					containers.push(Container::Type);
					containers.push(Container::SetType);
					containers.push(Container::Set)
				}
			}
		}

		containers.push(Container::None);

		if self.options.processing_mode != ProcessingMode::JsonLd1_0 && !has_index {
			containers.push(Container::Index);
			containers.push(Container::IndexSet)
		}

		if self.options.processing_mode != ProcessingMode::JsonLd1_0 && is_simple_value {
			containers.push(Container::Language);
			containers.push(Container::LanguageSet)
		}

		let is_empty_list = matches!(value, Some(Ref::List(list)) if list.is_empty());

		let selection = if is_empty_list {
			Selection::Any
		} else {
			match type_lang_value {
				Some(TypeLangValue::Type(type_value)) => {
					let mut selection = Vec::new();

					if type_value == TypeSelection::Reverse {
						selection.push(TypeSelection::Reverse);
					}

					let mut has_id_type = false;
					if let Some(id) = value.and_then(|v| v.id()) {
						if type_value == TypeSelection::Type(Type::Id)
							|| type_value == TypeSelection::Reverse
						{
							has_id_type = true;

							let compacted_id =
								self.compact_iri(&id.clone().into_term(), true, false)?;
							let vocab = match compacted_id
								.as_deref()
								.and_then(|c| active_context.get(c))
							{
								Some(def) => def.iri() == Some(id.as_str()),
								None => false,
							};

							if vocab {
								selection.push(TypeSelection::Type(Type::Vocab));
								selection.push(TypeSelection::Type(Type::Id));
							} else {
								selection.push(TypeSelection::Type(Type::Id));
								selection.push(TypeSelection::Type(Type::Vocab));
							}

							selection.push(TypeSelection::Type(Type::None));
						}
					}

					if !has_id_type {
						selection.push(type_value);
						selection.push(TypeSelection::Type(Type::None));
					}

					selection.push(TypeSelection::Any);
					Selection::Type(selection)
				}
				Some(TypeLangValue::Lang(lang_value)) => {
					let direction_only = match &lang_value {
						LangSelection::Lang(Nullable::Some((Some(_), Some(dir)))) => {
							Some(LangSelection::Lang(Nullable::Some((None, Some(*dir)))))
						}
						_ => None,
					};

					let mut selection = vec![
						lang_value,
						LangSelection::Lang(Nullable::Some((None, None))),
						LangSelection::Any,
					];
					selection.extend(direction_only);
					Selection::Lang(selection)
				}
				None => Selection::Lang(vec![
					LangSelection::Lang(Nullable::Null),
					LangSelection::Lang(Nullable::Some((None, None))),
					LangSelection::Any,
				]),
			}
		};

		Ok(entry
			.select(&containers, &selection)
			.map(ToOwned::to_owned))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::TermDefinition;
	use static_iref::iri;

	fn context() -> Context {
		let mut context = Context::new(Some(iri!("http://x/doc").to_owned()));
		context.set(
			"ex".to_owned(),
			Some(TermDefinition {
				value: Some(Term::Id(Id::from_string("http://example.org/".to_owned()))),
				prefix: true,
				..Default::default()
			}),
		);
		context.set(
			"name".to_owned(),
			Some(TermDefinition {
				value: Some(Term::Id(Id::from_string("http://schema.org/name".to_owned()))),
				..Default::default()
			}),
		);
		context
	}

	#[test]
	fn term_then_prefix_then_relative() {
		let context = context();
		assert_eq!(context.compact_iri("http://schema.org/name", true).unwrap(), "name");
		assert_eq!(context.compact_iri("http://example.org/a", true).unwrap(), "ex:a");
		assert_eq!(context.compact_iri("http://x/b", false).unwrap(), "b");
		assert_eq!(context.compact_iri("http://other/c", true).unwrap(), "http://other/c");
	}

	#[test]
	fn iri_confused_with_prefix() {
		let context = context();
		let error = context.compact_iri("ex:foo", true).unwrap_err();
		assert_eq!(error.code(), crate::syntax::ErrorCode::IriConfusedWithPrefix)
	}
}
