use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::Keyword;

/// Single `@container` entry item.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContainerItem {
	#[cfg_attr(feature = "serde", serde(rename = "@graph"))]
	Graph,

	#[cfg_attr(feature = "serde", serde(rename = "@id"))]
	Id,

	#[cfg_attr(feature = "serde", serde(rename = "@index"))]
	Index,

	#[cfg_attr(feature = "serde", serde(rename = "@language"))]
	Language,

	#[cfg_attr(feature = "serde", serde(rename = "@list"))]
	List,

	#[cfg_attr(feature = "serde", serde(rename = "@set"))]
	Set,

	#[cfg_attr(feature = "serde", serde(rename = "@type"))]
	Type,
}

impl ContainerItem {
	pub fn into_keyword(self) -> Keyword {
		self.into()
	}

	pub fn as_str(&self) -> &'static str {
		self.into_keyword().into_str()
	}
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid `@container` item `{0}`")]
pub struct InvalidContainerItem(pub String);

impl FromStr for ContainerItem {
	type Err = InvalidContainerItem;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match Keyword::try_from(s) {
			Ok(k) => k
				.try_into()
				.map_err(|_| InvalidContainerItem(s.to_owned())),
			Err(_) => Err(InvalidContainerItem(s.to_owned())),
		}
	}
}

impl TryFrom<Keyword> for ContainerItem {
	type Error = Keyword;

	fn try_from(k: Keyword) -> Result<ContainerItem, Keyword> {
		use ContainerItem::*;
		match k {
			Keyword::Graph => Ok(Graph),
			Keyword::Id => Ok(Id),
			Keyword::Index => Ok(Index),
			Keyword::Language => Ok(Language),
			Keyword::List => Ok(List),
			Keyword::Set => Ok(Set),
			Keyword::Type => Ok(Type),
			k => Err(k),
		}
	}
}

impl From<ContainerItem> for Keyword {
	fn from(c: ContainerItem) -> Keyword {
		use ContainerItem::*;
		match c {
			Graph => Keyword::Graph,
			Id => Keyword::Id,
			Index => Keyword::Index,
			Language => Keyword::Language,
			List => Keyword::List,
			Set => Keyword::Set,
			Type => Keyword::Type,
		}
	}
}

/// Invalid `@container` value.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid `@container` value")]
pub struct InvalidContainer;

/// Container mapping of a term definition.
///
/// Only the combinations allowed by JSON-LD 1.1 can be represented, so an
/// existing `Container` is always valid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Container {
	/// No container.
	#[default]
	None,

	Graph,
	Id,
	Index,
	Language,
	List,
	Set,
	Type,

	GraphSet,
	GraphId,
	GraphIndex,
	IdSet,
	IndexSet,
	LanguageSet,
	SetType,

	GraphIdSet,
	GraphIndexSet,
}

impl Container {
	pub fn new() -> Container {
		Container::None
	}

	/// Parses a `@container` entry value (a string or an array of strings).
	pub fn from_json(value: &Value) -> Result<Self, InvalidContainer> {
		let mut container = Container::new();

		match value {
			Value::String(s) => {
				let item: ContainerItem = s.parse().map_err(|_| InvalidContainer)?;
				container.add(item);
			}
			Value::Array(items) => {
				for item in items {
					let item: ContainerItem = item
						.as_str()
						.ok_or(InvalidContainer)?
						.parse()
						.map_err(|_| InvalidContainer)?;

					if !container.add(item) {
						return Err(InvalidContainer);
					}
				}
			}
			_ => return Err(InvalidContainer),
		}

		Ok(container)
	}

	/// Container items, sorted in lexicographic order of their keyword.
	pub fn as_slice(&self) -> &'static [ContainerItem] {
		use Container::*;
		match self {
			None => &[],
			Graph => &[ContainerItem::Graph],
			Id => &[ContainerItem::Id],
			Index => &[ContainerItem::Index],
			Language => &[ContainerItem::Language],
			List => &[ContainerItem::List],
			Set => &[ContainerItem::Set],
			Type => &[ContainerItem::Type],
			GraphSet => &[ContainerItem::Graph, ContainerItem::Set],
			GraphId => &[ContainerItem::Graph, ContainerItem::Id],
			GraphIndex => &[ContainerItem::Graph, ContainerItem::Index],
			IdSet => &[ContainerItem::Id, ContainerItem::Set],
			IndexSet => &[ContainerItem::Index, ContainerItem::Set],
			LanguageSet => &[ContainerItem::Language, ContainerItem::Set],
			SetType => &[ContainerItem::Set, ContainerItem::Type],
			GraphIdSet => &[ContainerItem::Graph, ContainerItem::Id, ContainerItem::Set],
			GraphIndexSet => &[
				ContainerItem::Graph,
				ContainerItem::Index,
				ContainerItem::Set,
			],
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = ContainerItem> {
		self.as_slice().iter().copied()
	}

	pub fn len(&self) -> usize {
		self.as_slice().len()
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Container::None)
	}

	pub fn contains(&self, c: ContainerItem) -> bool {
		self.as_slice().contains(&c)
	}

	/// Concatenation of the container keywords, used as inverse context key.
	///
	/// The empty container is written `@none`.
	pub fn signature(&self) -> String {
		if self.is_empty() {
			Keyword::None.as_str().to_owned()
		} else {
			self.iter().map(|c| c.as_str()).collect()
		}
	}

	pub fn with(&self, c: ContainerItem) -> Option<Container> {
		let new_container = match (self, c) {
			(Container::None, c) => c.into(),
			(Container::Graph, ContainerItem::Graph) => *self,
			(Container::Graph, ContainerItem::Set) => Container::GraphSet,
			(Container::Graph, ContainerItem::Id) => Container::GraphId,
			(Container::Graph, ContainerItem::Index) => Container::GraphIndex,
			(Container::Id, ContainerItem::Id) => *self,
			(Container::Id, ContainerItem::Graph) => Container::GraphId,
			(Container::Id, ContainerItem::Set) => Container::IdSet,
			(Container::Index, ContainerItem::Index) => *self,
			(Container::Index, ContainerItem::Graph) => Container::GraphIndex,
			(Container::Index, ContainerItem::Set) => Container::IndexSet,
			(Container::Language, ContainerItem::Language) => *self,
			(Container::Language, ContainerItem::Set) => Container::LanguageSet,
			(Container::List, ContainerItem::List) => *self,
			(Container::Set, ContainerItem::Set) => *self,
			(Container::Set, ContainerItem::Graph) => Container::GraphSet,
			(Container::Set, ContainerItem::Id) => Container::IdSet,
			(Container::Set, ContainerItem::Index) => Container::IndexSet,
			(Container::Set, ContainerItem::Language) => Container::LanguageSet,
			(Container::Set, ContainerItem::Type) => Container::SetType,
			(Container::Type, ContainerItem::Type) => *self,
			(Container::Type, ContainerItem::Set) => Container::SetType,
			(Container::GraphSet, ContainerItem::Graph | ContainerItem::Set) => *self,
			(Container::GraphSet, ContainerItem::Id) => Container::GraphIdSet,
			(Container::GraphSet, ContainerItem::Index) => Container::GraphIndexSet,
			(Container::GraphId, ContainerItem::Graph | ContainerItem::Id) => *self,
			(Container::GraphId, ContainerItem::Set) => Container::GraphIdSet,
			(Container::GraphIndex, ContainerItem::Graph | ContainerItem::Index) => *self,
			(Container::GraphIndex, ContainerItem::Set) => Container::GraphIndexSet,
			(Container::IdSet, ContainerItem::Id | ContainerItem::Set) => *self,
			(Container::IdSet, ContainerItem::Graph) => Container::GraphIdSet,
			(Container::IndexSet, ContainerItem::Index | ContainerItem::Set) => *self,
			(Container::IndexSet, ContainerItem::Graph) => Container::GraphIndexSet,
			(Container::LanguageSet, ContainerItem::Language | ContainerItem::Set) => *self,
			(Container::SetType, ContainerItem::Set | ContainerItem::Type) => *self,
			(
				Container::GraphIdSet,
				ContainerItem::Graph | ContainerItem::Id | ContainerItem::Set,
			) => *self,
			(
				Container::GraphIndexSet,
				ContainerItem::Graph | ContainerItem::Index | ContainerItem::Set,
			) => *self,
			_ => return None,
		};

		Some(new_container)
	}

	pub fn add(&mut self, c: ContainerItem) -> bool {
		match self.with(c) {
			Some(container) => {
				*self = container;
				true
			}
			None => false,
		}
	}

	/// JSON representation: a single string or an array of strings.
	pub fn into_json(self) -> Value {
		match self.as_slice() {
			[] => Value::Null,
			[item] => Value::String(item.as_str().to_owned()),
			items => Value::Array(
				items
					.iter()
					.map(|i| Value::String(i.as_str().to_owned()))
					.collect(),
			),
		}
	}
}

impl From<ContainerItem> for Container {
	fn from(c: ContainerItem) -> Self {
		match c {
			ContainerItem::Graph => Self::Graph,
			ContainerItem::Id => Self::Id,
			ContainerItem::Index => Self::Index,
			ContainerItem::Language => Self::Language,
			ContainerItem::List => Self::List,
			ContainerItem::Set => Self::Set,
			ContainerItem::Type => Self::Type,
		}
	}
}

impl fmt::Display for Container {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.signature())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parse_combinations() {
		assert_eq!(
			Container::from_json(&json!(["@set", "@graph", "@index"])).unwrap(),
			Container::GraphIndexSet
		);
		assert_eq!(
			Container::from_json(&json!("@list")).unwrap(),
			Container::List
		);
		assert!(Container::from_json(&json!(["@list", "@set"])).is_err());
		assert!(Container::from_json(&json!("@foo")).is_err());
	}

	#[test]
	fn signature_is_sorted() {
		assert_eq!(Container::SetType.signature(), "@set@type");
		assert_eq!(Container::GraphIdSet.signature(), "@graph@id@set");
		assert_eq!(Container::None.signature(), "@none");
	}
}
