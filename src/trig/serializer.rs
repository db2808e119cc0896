//! TriG/Turtle serializer.
//!
//! Pretty-prints JSON-LD driven by its context: context prefixes become
//! prefix declarations, terms become prefixed names, and list containers
//! become collections.
use std::{borrow::Cow, io};

use indexmap::IndexMap;
use serde_json::{Map, Value};

const ID: &str = "@id";
const TYPE: &str = "@type";
const VALUE: &str = "@value";
const LANGUAGE: &str = "@language";
const LIST: &str = "@list";
const GRAPH: &str = "@graph";
const VOCAB: &str = "@vocab";
const BASE: &str = "@base";
const PREFIX: &str = "@prefix";
const CONTEXT: &str = "@context";
const CONTAINER: &str = "@container";
const REVERSE: &str = "@reverse";
const ANNOTATION: &str = "@annotation";

/// Serialization error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("nested contexts are not supported")]
	NestedContext,

	#[error("invalid node reference `{0}`")]
	InvalidReference(String),

	#[error("invalid type `{0}`")]
	InvalidType(String),

	#[error("invalid quoted triple: {0}")]
	InvalidQuotedTriple(&'static str),

	#[error(transparent)]
	Io(#[from] io::Error),
}

/// Layout settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
	pub indent_chars: String,

	/// Writes `PREFIX`, `BASE` and `GRAPH` instead of their lowercase forms.
	pub upcase_keywords: bool,

	/// Writes the `graph` keyword before named graphs.
	pub use_graph_keyword: bool,
	pub space_before_semicolon: bool,

	/// Puts each repeated object of a predicate on its own line.
	pub predicate_repeat_new_line: bool,
	pub bracket_start_new_line: bool,
	pub bracket_end_new_line: bool,
	pub list_item_new_line: bool,

	/// Number of line ends after the prefix declarations.
	pub prologue_end_line: usize,

	/// Number of blank lines before each subject.
	pub separator_lines: usize,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			indent_chars: "  ".to_owned(),
			upcase_keywords: false,
			use_graph_keyword: true,
			space_before_semicolon: true,
			predicate_repeat_new_line: true,
			bracket_start_new_line: false,
			bracket_end_new_line: false,
			list_item_new_line: false,
			prologue_end_line: 1,
			separator_lines: 1,
		}
	}
}

/// Keys used in the input for each keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAliases {
	pub id: String,
	pub value: String,
	pub ty: String,
	pub language: String,
	pub graph: String,
	pub list: String,
	pub reverse: String,
	pub index: String,
	pub annotation: String,
}

impl Default for KeyAliases {
	fn default() -> Self {
		Self {
			id: ID.to_owned(),
			value: VALUE.to_owned(),
			ty: TYPE.to_owned(),
			language: LANGUAGE.to_owned(),
			graph: GRAPH.to_owned(),
			list: LIST.to_owned(),
			reverse: REVERSE.to_owned(),
			index: "@index".to_owned(),
			annotation: ANNOTATION.to_owned(),
		}
	}
}

impl KeyAliases {
	/// Collects the keyword aliases defined by a context.
	pub fn from_context(context: &Map<String, Value>) -> Self {
		let mut aliases = Self::default();

		for (term, definition) in context {
			let keyword = match definition {
				Value::String(keyword) => keyword.as_str(),
				Value::Object(definition) => match definition.get(ID) {
					Some(Value::String(keyword)) => keyword.as_str(),
					_ => continue,
				},
				_ => continue,
			};

			let alias = match keyword {
				ID => &mut aliases.id,
				VALUE => &mut aliases.value,
				TYPE => &mut aliases.ty,
				LANGUAGE => &mut aliases.language,
				GRAPH => &mut aliases.graph,
				LIST => &mut aliases.list,
				REVERSE => &mut aliases.reverse,
				"@index" => &mut aliases.index,
				ANNOTATION => &mut aliases.annotation,
				_ => continue,
			};

			*alias = term.clone()
		}

		aliases
	}

	fn alias<'a>(&'a self, keyword: &'a str) -> &'a str {
		match keyword {
			ID => &self.id,
			VALUE => &self.value,
			TYPE => &self.ty,
			LANGUAGE => &self.language,
			GRAPH => &self.graph,
			LIST => &self.list,
			REVERSE => &self.reverse,
			"@index" => &self.index,
			ANNOTATION => &self.annotation,
			other => other,
		}
	}
}

/// Serializer options.
#[derive(Debug, Clone, Default)]
pub struct Options {
	/// Context used when the data has none.
	pub context: Option<Value>,

	/// Written as a base declaration after the prefixes.
	pub base_iri: Option<String>,

	/// When set, blank nodes are replaced by IRIs starting with this base.
	pub skolem_base: Option<String>,
	pub settings: Settings,
}

/// Writes JSON-LD data as TriG.
pub fn serialize(data: &Value, out: impl io::Write) -> Result<(), Error> {
	serialize_with(data, out, &Options::default())
}

pub fn serialize_with(data: &Value, mut out: impl io::Write, options: &Options) -> Result<(), Error> {
	let mut state = SerializerState::new(options);
	state.serialize(data)?;
	out.write_all(state.out.as_bytes())?;
	Ok(())
}

/// Writes JSON-LD data as Turtle.
///
/// Named graphs are dropped, unless `union` is set in which case their
/// nodes are merged into the default graph.
pub fn serialize_turtle(data: &Value, out: impl io::Write, union: bool) -> Result<(), Error> {
	serialize(&default_graph(data, union), out)
}

pub fn to_string(data: &Value) -> Result<String, Error> {
	let options = Options::default();
	let mut state = SerializerState::new(&options);
	state.serialize(data)?;
	Ok(state.out)
}

fn default_graph(data: &Value, union: bool) -> Value {
	let nodes = match data {
		Value::Object(map) => map.get(GRAPH).unwrap_or(data),
		_ => data,
	};

	let mut default_nodes = Vec::new();
	for node in as_list(nodes) {
		let Some((graph, rest)) = split_graph(node) else {
			default_nodes.push(node.clone());
			continue;
		};

		let named = rest.contains_key(ID);
		if union || !named {
			default_nodes.extend(as_list(graph).iter().cloned());
		}

		if named && rest.len() > 1 {
			default_nodes.push(Value::Object(rest))
		}
	}

	let mut result = Map::new();
	if let Some(context) = data.get(CONTEXT) {
		result.insert(CONTEXT.to_owned(), context.clone());
	}
	result.insert(GRAPH.to_owned(), Value::Array(default_nodes));
	Value::Object(result)
}

/// Separates the `@graph` entry of a node from its other entries.
fn split_graph(node: &Value) -> Option<(&Value, Map<String, Value>)> {
	let map = node.as_object()?;
	let graph = map.get(GRAPH)?;
	let rest = map
		.iter()
		.filter(|(key, _)| key.as_str() != GRAPH && key.as_str() != CONTEXT)
		.map(|(key, value)| (key.clone(), value.clone()))
		.collect();
	Some((graph, rest))
}

fn as_list(value: &Value) -> &[Value] {
	match value {
		Value::Array(items) => items,
		other => std::slice::from_ref(other),
	}
}

/// Collects the prefix declarations of a context.
///
/// A prefix is a term mapped to an IRI ending with `#`, `/` or `:`, or a
/// term defined with `@prefix: true`. The vocabulary becomes the empty
/// prefix.
pub fn collect_prefixes(context: &Map<String, Value>) -> IndexMap<String, String> {
	let mut prefixes = IndexMap::new();

	for (key, value) in context {
		match value {
			Value::String(iri) if iri.ends_with(|c| matches!(c, '#' | '/' | ':')) => {
				let key = if key == VOCAB { "" } else { key.as_str() };
				prefixes.insert(key.to_owned(), iri.clone());
			}
			Value::Object(definition) if definition.get(PREFIX) == Some(&Value::Bool(true)) => {
				if let Some(iri) = definition.get(ID).and_then(Value::as_str) {
					prefixes.insert(key.clone(), iri.to_owned());
				}
			}
			_ => (),
		}
	}

	prefixes
}

/// Escapes the reserved characters of a local name, and the dots or dashes
/// it starts or ends with.
fn escape_pname_local(local: &str) -> String {
	let last = local.chars().count().saturating_sub(1);
	let mut escaped = String::with_capacity(local.len());

	for (i, c) in local.chars().enumerate() {
		let reserved = "~!$&'()*+,;=/?#@%".contains(c);
		let edge = (i == 0 || i == last) && matches!(c, '.' | '-');
		if reserved || edge {
			escaped.push('\\')
		}
		escaped.push(c)
	}

	escaped
}

struct SerializerState<'a> {
	out: String,
	settings: &'a Settings,
	context: Map<String, Value>,
	prefixes: IndexMap<String, String>,
	aliases: KeyAliases,
	base_iri: Option<&'a str>,
	skolem_base: Option<&'a str>,
	bnode_counter: usize,
	prefix_keyword: String,
	base_keyword: String,
	graph_keyword: Option<String>,
}

impl<'a> SerializerState<'a> {
	fn new(options: &'a Options) -> Self {
		let settings = &options.settings;
		let keyword = |s: &str| {
			if settings.upcase_keywords {
				s.to_uppercase()
			} else {
				s.to_owned()
			}
		};

		let mut state = Self {
			out: String::new(),
			settings,
			context: Map::new(),
			prefixes: IndexMap::new(),
			aliases: KeyAliases::default(),
			base_iri: options.base_iri.as_deref(),
			skolem_base: options.skolem_base.as_deref(),
			bnode_counter: 0,
			prefix_keyword: keyword("prefix"),
			base_keyword: keyword("base"),
			graph_keyword: settings.use_graph_keyword.then(|| keyword("graph")),
		};

		if let Some(context) = &options.context {
			state.init_context(context)
		}

		state
	}

	fn init_context(&mut self, context: &Value) {
		let mut merged = Map::new();
		for item in as_list(context) {
			if let Value::Object(definitions) = item {
				merged.extend(definitions.iter().map(|(k, v)| (k.clone(), v.clone())))
			}
		}

		self.prefixes = collect_prefixes(&merged);
		self.aliases = KeyAliases::from_context(&merged);
		self.context = merged;
	}

	fn write(&mut self, s: &str) {
		self.out.push_str(s)
	}

	fn writeln(&mut self, s: &str) {
		self.out.push_str(s);
		self.out.push('\n')
	}

	fn indent(&self, depth: usize) -> String {
		self.settings.indent_chars.repeat(depth + 1)
	}

	fn separator(&mut self) {
		for _ in 0..self.settings.separator_lines {
			self.out.push('\n')
		}
	}

	fn get<'m>(&self, map: &'m Map<String, Value>, keyword: &str) -> Option<&'m Value> {
		map.get(self.aliases.alias(keyword)).or_else(|| map.get(keyword))
	}

	/// Keyword denoted by `key`, directly or through a context alias.
	fn keyword<'s>(&'s self, key: &'s str) -> Option<&'s str> {
		if key.starts_with('@') {
			return Some(key);
		}

		match self.context.get(key) {
			Some(Value::String(keyword)) if keyword.starts_with('@') => Some(keyword),
			Some(Value::Object(definition)) => definition
				.get(ID)
				.and_then(Value::as_str)
				.filter(|keyword| keyword.starts_with('@')),
			_ => None,
		}
	}

	fn is_container(&self, term: &str, container: &str) -> bool {
		match self.context.get(term) {
			Some(Value::Object(definition)) => match definition.get(CONTAINER) {
				Some(Value::String(c)) => c == container,
				Some(Value::Array(cs)) => cs.iter().any(|c| c.as_str() == Some(container)),
				_ => false,
			},
			_ => false,
		}
	}

	fn serialize(&mut self, data: &Value) -> Result<(), Error> {
		if let Some(context) = data.get(CONTEXT) {
			self.init_context(context)
		}

		let prefixes = self.prefixes.clone();
		self.prelude(&prefixes);

		let graph = match data {
			Value::Array(_) => Some(data),
			_ => data.get(self.aliases.graph.as_str()),
		};

		match graph {
			Some(graph) => {
				for node in as_list(graph) {
					self.write_node(node, 0, None)?;
				}
			}
			None => {
				self.write_node(data, 0, None)?;
			}
		}

		Ok(())
	}

	fn prelude(&mut self, prefixes: &IndexMap<String, String>) {
		for (prefix, iri) in prefixes {
			if prefix == BASE {
				self.write_base(iri)
			} else {
				let line = format!("{} {prefix}: <{iri}>", self.prefix_keyword);
				self.writeln(&line)
			}
		}

		if let Some(base) = self.base_iri {
			self.write_base(base)
		}

		for _ in 1..self.settings.prologue_end_line {
			self.writeln("")
		}
	}

	fn write_base(&mut self, iri: &str) {
		let line = format!("{} <{iri}>", self.base_keyword);
		self.writeln(&line)
	}

	fn write_graph(&mut self, id: Option<&Value>, graph: &Value) -> Result<(), Error> {
		self.writeln("");

		match id {
			None => self.writeln("{"),
			Some(id) => {
				let name = self.ref_repr_value(id)?;
				let line = match &self.graph_keyword {
					Some(keyword) => format!("{keyword} {name} {{"),
					None => format!("{name} {{"),
				};
				self.writeln(&line)
			}
		}

		let via_key = self.aliases.graph.clone();
		for node in as_list(graph) {
			self.write_node(node, 0, Some(&via_key))?;
		}

		self.writeln("");
		self.writeln("}");
		Ok(())
	}

	/// Writes a node description.
	///
	/// At depth 0 the node is written as a subject followed by its
	/// predicates. Deeper nodes are written inline. Returns the nodes that
	/// were only referenced and must be described at the top level.
	fn write_node(
		&mut self,
		obj: &Value,
		mut depth: usize,
		via_key: Option<&str>,
	) -> Result<Vec<Value>, Error> {
		if depth > 0 && obj.get(CONTEXT).is_some() {
			return Err(Error::NestedContext);
		}

		if let (Some(key), Value::Object(map)) = (via_key, obj) {
			if self.is_container(key, LANGUAGE) {
				let literals: Vec<_> = map
					.iter()
					.map(|(language, value)| self.literal_values(value, None, Some(language)))
					.collect();
				self.write(&literals.join(" , "));
				return Ok(Vec::new());
			}
		}

		let map = match obj {
			Value::Object(map) if self.get(map, VALUE).is_none() => map,
			_ => {
				let literal = self.literal(obj, via_key);
				self.write(&literal);
				return Ok(Vec::new());
			}
		};

		let subject = self.get(map, ID);

		if let Some((graph, rest)) = self.get(map, GRAPH).map(|graph| {
			let rest: Map<String, Value> = map
				.iter()
				.filter(|(key, _)| self.keyword(key) != Some(GRAPH) && key.as_str() != CONTEXT)
				.map(|(k, v)| (k.clone(), v.clone()))
				.collect();
			(graph, rest)
		}) {
			if let Some(Value::Object(context)) = map.get(CONTEXT) {
				let prefixes = collect_prefixes(context);
				self.prelude(&prefixes)
			}

			self.write_graph(subject, graph)?;

			if self.has_keys(&rest, 2) {
				self.write_node(&Value::Object(rest), depth, via_key)?;
			}

			return Ok(Vec::new());
		}

		let bracketed = via_key == Some(self.aliases.annotation.as_str());
		let in_graph = usize::from(via_key == Some(self.aliases.graph.as_str()));

		match subject {
			Some(subject) if self.has_keys(map, 2) => {
				if depth == 0 {
					self.separator()
				}
				if in_graph > 0 {
					let indent = self.indent(0);
					self.write(&indent)
				}
				let subject = self.ref_repr_value(subject)?;
				self.write(&subject)
			}
			_ if depth > 0 => {
				if !bracketed {
					depth += 1;
					self.write("[")
				}
			}
			None if self.has_keys(map, 1) => {
				self.separator();
				if in_graph > 0 {
					let indent = self.indent(0);
					self.write(&indent)
				}
				self.write("[]")
			}
			_ => return Ok(Vec::new()),
		}

		let indent = self.indent(depth + in_graph);
		let nested_depth = depth + 1 + in_graph;
		let mut top_objects = Vec::new();
		let mut first = true;

		for (key, value) in map {
			let keyword = self.keyword(key);
			let is_type = keyword == Some(TYPE);
			let is_reverse = keyword == Some(REVERSE);
			if keyword.is_some() && !is_type && !is_reverse {
				continue;
			}

			if is_reverse {
				if let Value::Object(reverse) = value {
					for (property, nodes) in reverse {
						self.reverse_objects(subject, property, nodes, &mut top_objects)
					}
				}
				continue;
			}

			if !is_type {
				if let Some(property) = self.reverse_term(key) {
					self.reverse_objects(subject, &property, value, &mut top_objects);
					continue;
				}
			}

			let term = if is_type {
				"a".to_owned()
			} else {
				match self.term_for(key) {
					Some(term) => self.to_valid_term(&term),
					None => continue,
				}
			};

			let values: Vec<&Value> = as_list(value).iter().filter(|v| !v.is_null()).collect();
			let in_list = self.is_container(key, LIST);
			if values.is_empty() && !in_list {
				continue;
			}

			if first {
				first = false;
				if self.settings.bracket_start_new_line && depth > 0 && !bracketed {
					self.writeln("");
					self.write(&indent)
				} else {
					self.write(" ")
				}
			} else {
				self.writeln(if self.settings.space_before_semicolon { " ;" } else { ";" });
				self.write(&indent)
			}

			self.write(&term);
			self.write(" ");

			if in_list {
				self.write_list(&values, nested_depth, key, &mut top_objects)?;
				continue;
			}

			for (i, v) in values.into_iter().enumerate() {
				if i > 0 {
					if self.settings.predicate_repeat_new_line {
						self.writeln(" ,");
						let indent = self.indent(nested_depth);
						self.write(&indent)
					} else {
						self.write(" , ")
					}
				}

				let v = self.skolemize(v);
				if is_type {
					let ty = self.repr_type(&v)?;
					self.write(&ty)
				} else {
					self.write_value(&v, nested_depth, key, &mut top_objects)?
				}

				self.write_annotation(&v, depth, &mut top_objects)?
			}
		}

		if depth == 0 {
			if !first {
				self.writeln(" .")
			}

			for node in top_objects {
				self.write_node(&node, depth, via_key)?;
			}

			Ok(Vec::new())
		} else {
			if self.settings.bracket_end_new_line {
				self.writeln("");
				let indent = self.indent(depth);
				self.write(&indent)
			} else {
				self.write(" ")
			}

			if !bracketed {
				self.write("]")
			}

			Ok(top_objects)
		}
	}

	/// Writes an object of a predicate.
	fn write_value(
		&mut self,
		value: &Value,
		depth: usize,
		key: &str,
		top_objects: &mut Vec<Value>,
	) -> Result<(), Error> {
		if let Value::Object(map) = value {
			if let Some(id) = self.get(map, ID) {
				let reference = self.ref_repr_value(id)?;
				top_objects.push(value.clone());
				self.write(&reference);
				return Ok(());
			}

			if let Some(items) = self.get(map, LIST) {
				let items: Vec<&Value> = as_list(items).iter().filter(|v| !v.is_null()).collect();
				return self.write_list(&items, depth, key, top_objects);
			}
		}

		let nested = self.write_node(value, depth, Some(key))?;
		top_objects.extend(nested);
		Ok(())
	}

	fn write_list(
		&mut self,
		items: &[&Value],
		depth: usize,
		key: &str,
		top_objects: &mut Vec<Value>,
	) -> Result<(), Error> {
		self.write("(");

		for (i, item) in items.iter().enumerate() {
			if i > 0 && self.settings.list_item_new_line {
				self.writeln("");
				let indent = self.indent(depth);
				self.write(&indent)
			} else {
				self.write(" ")
			}

			let item = self.skolemize(item);
			self.write_value(&item, depth, key, top_objects)?
		}

		self.write(if items.is_empty() { ")" } else { " )" });
		Ok(())
	}

	fn write_annotation(
		&mut self,
		value: &Value,
		depth: usize,
		top_objects: &mut Vec<Value>,
	) -> Result<(), Error> {
		let Some(annotation) = value.as_object().and_then(|map| self.get(map, ANNOTATION)) else {
			return Ok(());
		};

		let via_key = self.aliases.annotation.clone();
		self.write(" {|");
		let nested = self.write_node(annotation, depth + 2, Some(&via_key))?;
		self.write("|}");
		top_objects.extend(nested);
		Ok(())
	}

	/// Turns a reverse property into forward statements on the objects.
	fn reverse_objects(
		&mut self,
		subject: Option<&Value>,
		property: &str,
		nodes: &Value,
		top_objects: &mut Vec<Value>,
	) {
		let Some(subject) = subject else {
			log::warn!("reverse property `{property}` of an anonymous node is ignored");
			return;
		};

		for node in as_list(nodes) {
			let Value::Object(node) = node else { continue };

			let mut node = node.clone();
			if self.get(&node, ID).is_none() {
				let id = format!("_:bnode-{}", self.next_bnode());
				node.insert(self.aliases.id.clone(), Value::String(id));
			}

			let mut reference = Map::new();
			reference.insert(self.aliases.id.clone(), subject.clone());
			node.insert(property.to_owned(), Value::Object(reference));
			top_objects.push(Value::Object(node))
		}
	}

	fn next_bnode(&mut self) -> usize {
		let n = self.bnode_counter;
		self.bnode_counter += 1;
		n
	}

	/// Gives an identifier to anonymous nodes when skolemizing.
	fn skolemize<'v>(&mut self, value: &'v Value) -> Cow<'v, Value> {
		match (self.skolem_base, value) {
			(Some(base), Value::Object(map))
				if self.get(map, ID).is_none()
					&& self.get(map, VALUE).is_none()
					&& self.get(map, LIST).is_none() =>
			{
				let mut map = map.clone();
				let id = format!("{base}bnode-{}", self.next_bnode());
				map.insert(self.aliases.id.clone(), Value::String(id));
				Cow::Owned(Value::Object(map))
			}
			_ => Cow::Borrowed(value),
		}
	}

	fn has_keys(&self, map: &Map<String, Value>, at_least: usize) -> bool {
		map.keys()
			.filter(|key| self.keyword(key) != Some(ANNOTATION))
			.take(at_least)
			.count() == at_least
	}

	/// Predicate or datatype name for a key.
	fn term_for(&self, key: &str) -> Option<String> {
		if key.starts_with('@') || key.contains(|c| matches!(c, ':' | '/' | '#')) {
			return Some(key.to_owned());
		}

		let term = match self.context.get(key) {
			None => key.to_owned(),
			Some(Value::String(term)) => term.clone(),
			Some(Value::Object(definition)) => match definition.get(ID) {
				None => key.to_owned(),
				Some(Value::String(term)) => term.clone(),
				Some(_) => return None,
			},
			Some(_) => return None,
		};

		if term.starts_with('@') || term.contains(':') {
			Some(term)
		} else {
			Some(format!(":{term}"))
		}
	}

	fn reverse_term(&self, key: &str) -> Option<String> {
		self.context
			.get(key)?
			.get(REVERSE)?
			.as_str()
			.map(str::to_owned)
	}

	fn to_valid_term(&self, term: &str) -> String {
		let prefix = term.find(':').map(|i| &term[..i]);
		let declared = prefix.is_some_and(|p| self.context.contains_key(p));

		let not_a_pname = term.contains(|c| c == '/' || c == '#')
			|| prefix.is_some_and(|p| term.rfind(':').is_some_and(|i| i > p.len()));

		if !declared && not_a_pname {
			return format!("<{term}>");
		}

		match prefix {
			Some(p) => format!("{p}:{}", escape_pname_local(&term[p.len() + 1..])),
			None => escape_pname_local(term),
		}
	}

	fn repr_type(&self, ty: &Value) -> Result<String, Error> {
		match ty {
			Value::String(ty) => {
				let term = self.term_for(ty).unwrap_or_else(|| ty.clone());
				Ok(self.to_valid_term(&term))
			}
			Value::Object(map) => match self.get(map, ID) {
				Some(id) => self.ref_repr_value(id),
				None => Err(Error::InvalidType(ty.to_string())),
			},
			other => Err(Error::InvalidType(other.to_string())),
		}
	}

	fn ref_repr_value(&self, reference: &Value) -> Result<String, Error> {
		match reference {
			Value::Null => Ok("[]".to_owned()),
			Value::String(iri) => Ok(self.ref_repr(iri, false)),
			Value::Object(triple) if self.get(triple, ID).is_some() => self.repr_triple(triple),
			other => Err(Error::InvalidReference(other.to_string())),
		}
	}

	/// Writes a node identifier, as a prefixed name when possible.
	fn ref_repr(&self, reference: &str, use_vocab: bool) -> String {
		let mut reference = Cow::Borrowed(reference);

		match reference.find(':') {
			Some(i) => {
				let prefix = &reference[..i];
				if prefix == "_" {
					match self.skolem_base {
						Some(base) => reference = Cow::Owned(format!("{base}{}", &reference[2..])),
						None => return self.to_valid_term(&reference),
					}
				} else if self.context.contains_key(prefix) {
					return format!("{prefix}:{}", escape_pname_local(&reference[i + 1..]));
				}
			}
			None if use_vocab && !reference.contains('/') => return format!(":{reference}"),
			None => (),
		}

		if let Some(Value::String(vocab)) = self.context.get(VOCAB) {
			if let Some(local) = reference.strip_prefix(vocab.as_str()) {
				if !local.contains(|c| matches!(c, '/' | '#' | ':')) {
					return format!(":{}", escape_pname_local(local));
				}
			}
		}

		format!("<{reference}>")
	}

	/// Writes an embedded node as an RDF-star quoted triple.
	fn repr_triple(&self, triple: &Map<String, Value>) -> Result<String, Error> {
		let subject = self.get(triple, ID).unwrap_or(&Value::Null);
		let subject = self.ref_repr_value(subject)?;

		let mut statements = triple.iter().filter(|(key, _)| self.keyword(key) != Some(ID));
		let (key, object) = statements
			.next()
			.ok_or(Error::InvalidQuotedTriple("missing statement"))?;
		if statements.next().is_some() {
			return Err(Error::InvalidQuotedTriple(
				"quoted triples cannot contain multiple statements",
			));
		}

		if self.keyword(key) == Some(TYPE) {
			return Ok(format!("<< {subject} a {} >>", self.repr_type(object)?));
		}

		let predicate = self
			.term_for(key)
			.map(|term| self.to_valid_term(&term))
			.ok_or(Error::InvalidQuotedTriple("undefined predicate"))?;

		let object = match object {
			Value::Array(_) => {
				return Err(Error::InvalidQuotedTriple(
					"quoted triples must have one single object",
				))
			}
			Value::Object(_) if self.is_container(key, LANGUAGE) => {
				return Err(Error::InvalidQuotedTriple(
					"language containers are not supported in quoted triples",
				));
			}
			Value::Object(map) if self.get(map, LIST).is_some() => {
				return Err(Error::InvalidQuotedTriple("quoted triples cannot contain lists"))
			}
			Value::Object(map) if self.get(map, VALUE).is_none() => {
				let id = self
					.get(map, ID)
					.ok_or(Error::InvalidQuotedTriple("object must be a reference"))?;
				self.ref_repr_value(id)?
			}
			literal => self.literal(literal, Some(key)),
		};

		Ok(format!("<< {subject} {predicate} {object} >>"))
	}

	/// Writes a value object, or a plain value interpreted through the
	/// definition of `via_key`.
	fn literal(&self, obj: &Value, via_key: Option<&str>) -> String {
		let mut language = self.context.get(LANGUAGE).and_then(Value::as_str);
		let mut datatype = None;

		let value = match obj {
			Value::Object(map) => {
				datatype = self.get(map, TYPE).and_then(Value::as_str);
				language = self.get(map, LANGUAGE).and_then(Value::as_str);
				self.get(map, VALUE).unwrap_or(&Value::Null)
			}
			_ => {
				let definition = via_key
					.and_then(|key| self.context.get(key))
					.and_then(Value::as_object);

				match definition.and_then(|d| d.get(TYPE)).and_then(Value::as_str) {
					Some(coercion @ ("@vocab" | ID)) => {
						let use_vocab = coercion == "@vocab";
						let references: Vec<_> = as_list(obj)
							.iter()
							.map(|v| match v {
								Value::String(reference) => self.ref_repr(reference, use_vocab),
								other => other.to_string(),
							})
							.collect();
						return references.join(" , ");
					}
					Some(coercion) => datatype = Some(coercion),
					None => {
						if let Some(l) = definition.and_then(|d| d.get(LANGUAGE)) {
							language = l.as_str()
						}
					}
				}

				obj
			}
		};

		self.literal_values(value, datatype, language)
	}

	fn literal_values(&self, value: &Value, datatype: Option<&str>, language: Option<&str>) -> String {
		let literals: Vec<_> = as_list(value)
			.iter()
			.filter(|v| !v.is_null())
			.map(|v| match v {
				Value::String(s) => self.string_literal(s, datatype, language),
				other => other.to_string(),
			})
			.collect();

		literals.join(" , ")
	}

	fn string_literal(&self, s: &str, datatype: Option<&str>, language: Option<&str>) -> String {
		let escaped = s.replace('\\', "\\\\");

		let mut literal = if escaped.contains('\n') {
			let mut escaped = escaped.replace("\"\"\"", "\\\"\\\"\\\"");
			if escaped.ends_with('"') {
				escaped.pop();
				escaped.push_str("\\\"")
			}
			format!("\"\"\"{escaped}\"\"\"")
		} else {
			format!("\"{}\"", escaped.replace('"', "\\\"").replace('\r', "\\r"))
		};

		match (datatype, language) {
			(Some(datatype), _) => {
				let term = self
					.term_for(datatype)
					.unwrap_or_else(|| datatype.to_owned());
				literal.push_str("^^");
				literal.push_str(&self.to_valid_term(&term))
			}
			(None, Some(language)) => {
				literal.push('@');
				literal.push_str(language)
			}
			(None, None) => (),
		}

		literal
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn turtle(data: &Value) -> String {
		let mut out = Vec::new();
		serialize_turtle(data, &mut out, false).unwrap();
		String::from_utf8(out).unwrap()
	}

	#[test]
	fn list_container() {
		let data = json!({
			"@context": {
				"@vocab": "http://example.org/ns#",
				"termComponentList": { "@container": "@list" }
			},
			"@graph": [{
				"@id": "http://example.org/text/1",
				"@type": "Text",
				"subject": [
					{ "@id": "https://example.org/Other" },
					{
						"@type": "ComplexSubject",
						"termComponentList": [
							{ "@id": "https://example.org/Something" },
							{ "@id": "https://example.org/aspect" }
						]
					},
					{
						"@type": "ComplexSubject",
						"termComponentList": [
							{ "@type": "Topic", "prefLabel": "Education" },
							{ "@type": "TopicSubdivision", "prefLabel": "Research" }
						]
					},
					{
						"@type": "ComplexSubject",
						"termComponentList": [{
							"@type": "ComplexSubject",
							"termComponentList": [
								{ "@type": "Topic", "prefLabel": "Extra" },
								{ "@type": "Topic", "prefLabel": "Extra" }
							]
						}]
					}
				]
			}]
		});

		let expected = r#"prefix : <http://example.org/ns#>

<http://example.org/text/1> a :Text ;
  :subject <https://example.org/Other> ,
    [ a :ComplexSubject ;
      :termComponentList ( <https://example.org/Something> <https://example.org/aspect> ) ] ,
    [ a :ComplexSubject ;
      :termComponentList ( [ a :Topic ;
          :prefLabel "Education" ] [ a :TopicSubdivision ;
          :prefLabel "Research" ] ) ] ,
    [ a :ComplexSubject ;
      :termComponentList ( [ a :ComplexSubject ;
          :termComponentList ( [ a :Topic ;
              :prefLabel "Extra" ] [ a :Topic ;
              :prefLabel "Extra" ] ) ] ) ] .
"#;

		assert_eq!(turtle(&data), expected)
	}

	#[test]
	fn literals_and_references() {
		let data = json!({
			"@context": {
				"@vocab": "http://x/",
				"xsd": "http://www.w3.org/2001/XMLSchema#",
				"tag": { "@type": "@vocab" },
				"date": { "@type": "xsd:date" }
			},
			"@graph": [
				{
					"@id": "_:a",
					"name": [{ "@value": "A", "@language": "en" }, "two\nlines", "say \"hi\""],
					"date": "2020-01-01",
					"tag": "red",
					"knows": { "@id": "http://x/b", "name": "B" }
				}
			]
		});

		assert_eq!(
			turtle(&data),
			"prefix : <http://x/>\n\
			prefix xsd: <http://www.w3.org/2001/XMLSchema#>\n\
			\n\
			_:a :name \"A\"@en ,\n    \"\"\"two\nlines\"\"\" ,\n    \"say \\\"hi\\\"\" ;\n  \
			:date \"2020-01-01\"^^xsd:date ;\n  \
			:tag :red ;\n  \
			:knows :b .\n\
			\n\
			:b :name \"B\" .\n"
		)
	}

	#[test]
	fn named_graphs_and_annotations() {
		let data = json!({
			"@context": { "@vocab": "http://x/" },
			"@graph": [
				{ "@id": "http://x/s", "p": 1 },
				{
					"@id": "http://x/g",
					"@graph": [{
						"@id": "http://x/s",
						"p": { "@id": "http://x/o", "@annotation": { "by": { "@id": "http://x/w" } } }
					}]
				}
			]
		});

		assert_eq!(
			to_string(&data).unwrap(),
			"prefix : <http://x/>\n\
			\n\
			:s :p 1 .\n\
			\n\
			graph :g {\n\
			\n  :s :p :o {| :by :w |} .\n\
			\n\
			}\n"
		);

		assert_eq!(turtle(&data), "prefix : <http://x/>\n\n:s :p 1 .\n");

		let mut union = Vec::new();
		serialize_turtle(&data, &mut union, true).unwrap();
		assert_eq!(
			String::from_utf8(union).unwrap(),
			"prefix : <http://x/>\n\n:s :p 1 .\n\n:s :p :o {| :by :w |} .\n"
		)
	}

	#[test]
	fn skolemization() {
		let data = json!({
			"@context": { "@vocab": "http://x/" },
			"@id": "_:a",
			"p": { "q": 1 }
		});

		let options = Options {
			skolem_base: Some("http://x/.well-known/genid/".to_owned()),
			..Options::default()
		};

		let mut out = Vec::new();
		serialize_with(&data, &mut out, &options).unwrap();
		assert_eq!(
			String::from_utf8(out).unwrap(),
			"prefix : <http://x/>\n\
			\n\
			<http://x/.well-known/genid/a> :p <http://x/.well-known/genid/bnode-0> .\n\
			\n\
			<http://x/.well-known/genid/bnode-0> :q 1 .\n"
		)
	}

	#[test]
	fn pname_escapes() {
		assert_eq!(escape_pname_local("a.b"), "a.b");
		assert_eq!(escape_pname_local(".a-"), "\\.a\\-");
		assert_eq!(escape_pname_local("a/b#c"), "a\\/b\\#c")
	}
}
