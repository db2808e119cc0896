use iref::Iri;
use serde_json::Value;

use super::{expand_element, ActiveProperty, Error, ExpansionOptions};
use crate::{algorithms::ProcessingEnvironment, Context, ExpandedDocument, IndexedObject, Object};

/// Expand the given JSON-LD document.
///
/// A top-level graph object without `@id` is replaced by its content, and
/// free-floating values are dropped.
pub(crate) async fn expand(
	env: &mut impl ProcessingEnvironment,
	document: &Value,
	active_context: Context,
	base_url: Option<&Iri>,
	options: ExpansionOptions,
) -> Result<ExpandedDocument, Error> {
	let expanded = expand_element(
		env,
		&active_context,
		ActiveProperty::None,
		document,
		base_url,
		options,
		false,
	)
	.await?;

	let mut items: Vec<IndexedObject> = expanded.into_iter().collect();
	if items.len() == 1 && is_unnamed_graph(&items[0]) {
		if let Some(graph) = items.pop().and_then(|item| item.into_inner().into_node()) {
			return Ok(graph
				.graph
				.unwrap_or_default()
				.into_iter()
				.filter(filter_top_level_item)
				.collect());
		}
	}

	Ok(items.into_iter().filter(filter_top_level_item).collect())
}

fn is_unnamed_graph(item: &IndexedObject) -> bool {
	item.index().is_none()
		&& matches!(item.inner(), Object::Node(node) if node.is_simple_graph())
}

pub(crate) fn filter_top_level_item(item: &IndexedObject) -> bool {
	// Remove dangling values.
	!matches!(item.inner(), Object::Value(_))
}
