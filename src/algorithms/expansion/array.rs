use iref::Iri;
use serde_json::Value;

use super::{expand_element, ActiveProperty, Error, Expanded, ExpansionOptions};
use crate::{
	algorithms::ProcessingEnvironment, object::List, syntax::ContainerItem, Context, Object,
	TermDefinition,
};

#[allow(clippy::too_many_arguments)]
pub(crate) async fn expand_array(
	env: &mut impl ProcessingEnvironment,
	active_context: &Context,
	active_property: ActiveProperty<'_>,
	active_property_definition: Option<&TermDefinition>,
	element: &[Value],
	base_url: Option<&Iri>,
	options: ExpansionOptions,
	from_map: bool,
) -> Result<Expanded, Error> {
	// If the container mapping of `active_property` includes `@list`, the
	// result is wrapped into a list object.
	let is_list = active_property_definition
		.map(|definition| definition.container.contains(ContainerItem::List))
		.unwrap_or(false);

	let mut result = Vec::new();
	for item in element {
		let e = Box::pin(expand_element(
			env,
			active_context,
			active_property,
			item,
			base_url,
			options,
			from_map,
		))
		.await?;

		result.extend(e);
	}

	if is_list {
		return Ok(Expanded::Object(Object::List(List::new(result)).into()));
	}

	Ok(Expanded::Array(result))
}
