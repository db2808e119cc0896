use serde_json::Value;

use crate::{
	algorithms::{compaction::Compactor, ProcessingEnvironment},
	syntax::{ContainerItem, Keyword},
};

use super::{CompactFragment, Error};

impl Compactor<'_> {
	/// Compacts each item, then unwraps a single item unless the active
	/// property requires an array.
	pub async fn compact_collection_with<'a, O, T>(
		&self,
		env: &mut impl ProcessingEnvironment,
		items: O,
	) -> Result<Value, Error>
	where
		T: 'a + CompactFragment,
		O: 'a + Iterator<Item = &'a T>,
	{
		let mut result = Vec::new();

		for item in items {
			let compacted_item = Box::pin(item.compact_fragment(env, self)).await?;

			if !compacted_item.is_null() {
				result.push(compacted_item)
			}
		}

		let list_or_set = self.active_property_definition().map_or(false, |def| {
			def.container.contains(ContainerItem::List)
				|| def.container.contains(ContainerItem::Set)
		});

		if result.len() != 1
			|| !self.options.compact_arrays
			|| self.active_property == Some(Keyword::Graph.into_str())
			|| self.active_property == Some(Keyword::Set.into_str())
			|| list_or_set
		{
			return Ok(Value::Array(result));
		}

		Ok(result.pop().unwrap_or(Value::Null))
	}
}

impl<T: CompactFragment> CompactFragment for Vec<T> {
	async fn compact_fragment(
		&self,
		env: &mut impl ProcessingEnvironment,
		compactor: &Compactor<'_>,
	) -> Result<Value, Error> {
		compactor.compact_collection_with(env, self.iter()).await
	}
}
