use iref::IriBuf;
use indexmap::IndexMap;
use serde_json::Value;

use crate::syntax::{Container, Direction, LenientLangTagBuf, Nullable};
use crate::{Term, Type};

/// Term definition.
///
/// Built by the create term definition algorithm from a context entry.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TermDefinition {
	/// IRI mapping. `None` when the term is explicitly mapped to `null`.
	pub value: Option<Term>,

	/// Whether the term can be used as a compact IRI prefix.
	pub prefix: bool,

	pub protected: bool,

	/// Whether the term is a reverse property.
	pub reverse_property: bool,

	/// Base URL of the scoped context.
	pub base_url: Option<IriBuf>,

	/// Scoped context, as written in the local context.
	pub context: Option<Box<Value>>,

	pub container: Container,

	pub direction: Option<Nullable<Direction>>,

	/// Index key used by `@index` containers (property-valued index).
	pub index: Option<String>,

	pub language: Option<Nullable<LenientLangTagBuf>>,

	pub nest: Option<String>,

	/// Type mapping.
	pub typ: Option<Type>,
}

impl TermDefinition {
	/// Compares two definitions, ignoring the `protected` flag and the base
	/// URL of the scoped context.
	///
	/// A protected term can only be redefined with an equivalent definition.
	pub fn eq_modulo_protected(&self, other: &Self) -> bool {
		self.value == other.value
			&& self.prefix == other.prefix
			&& self.reverse_property == other.reverse_property
			&& self.context == other.context
			&& self.container == other.container
			&& self.direction == other.direction
			&& self.index == other.index
			&& self.language == other.language
			&& self.nest == other.nest
			&& self.typ == other.typ
	}

	/// IRI mapping of the definition, as a string.
	pub fn iri(&self) -> Option<&str> {
		self.value.as_ref().map(Term::as_str)
	}
}

/// Term definitions of a context, in definition order.
#[derive(Clone, Debug, Default)]
pub struct Definitions(IndexMap<String, TermDefinition>);

impl Definitions {
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn get(&self, term: &str) -> Option<&TermDefinition> {
		self.0.get(term)
	}

	pub fn contains_key(&self, term: &str) -> bool {
		self.0.contains_key(term)
	}

	pub fn insert(&mut self, term: String, definition: TermDefinition) -> Option<TermDefinition> {
		self.0.insert(term, definition)
	}

	pub fn remove(&mut self, term: &str) -> Option<TermDefinition> {
		self.0.shift_remove(term)
	}

	pub fn iter(&self) -> indexmap::map::Iter<String, TermDefinition> {
		self.0.iter()
	}

	/// Checks if any definition is protected.
	pub fn has_protected_items(&self) -> bool {
		self.0.values().any(|d| d.protected)
	}
}

impl<'a> IntoIterator for &'a Definitions {
	type Item = (&'a String, &'a TermDefinition);
	type IntoIter = indexmap::map::Iter<'a, String, TermDefinition>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
