//! TriG/Turtle parser.
//!
//! A character-level state machine. Each state consumes one character at a
//! time and either stays, hands over to a child state, or returns a parsed
//! value to its parent. The result is a JSON-LD document whose `@context`
//! holds the prefix, vocabulary and base declarations of the input.
use std::fmt;

use serde_json::{json, Map, Value};

use crate::rdf::vocab;

/// Characters ending a namespace IRI usable as a plain prefix.
const PREFIX_DELIMS: &[char] = &[':', '/', '?', '#', '[', ']', '@'];

/// Characters that can be escaped in a local name.
const RESERVED_CHARS: &str = "~.-!$&'()*+,;=/?#@%_";

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
const ANNOTATION: &str = "@annotation";

/// Notation error, without position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct NotationError(String);

impl NotationError {
	fn new(message: impl Into<String>) -> Self {
		Self(message.into())
	}

	pub fn message(&self) -> &str {
		&self.0
	}
}

/// Parse error: a notation error, where it occurred and what the parser
/// was reading at that point.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Notation error at line {line}, column {column} ({state}): {error}")]
pub struct Error {
	pub error: NotationError,
	pub line: usize,
	pub column: usize,
	pub state: &'static str,
}

/// Parses a TriG (or Turtle) document into JSON-LD.
///
/// The result is an object with a `@context` and a `@graph` entry.
pub fn parse(input: &str) -> Result<Value, Error> {
	let mut parser = Parser::new();

	for c in input.chars() {
		parser.push(c)?;
	}

	parser.end()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
	Prefix { at: bool },
	Base { at: bool },
	Graph,
}

/// Value returned by a state to its parent.
#[derive(Debug)]
enum Parsed {
	Directive(Directive),

	/// The `a` keyword.
	A,
	Boolean(bool),

	/// Prefixed name, without the leading `:` of the empty prefix.
	Symbol(String),
	Iri(String),
	Number(Value),
	Literal(Map<String, Value>),
	Language(String),
	List(Vec<Value>),
	BlankNode(Map<String, Value>),
	Annotation(Map<String, Value>),
	Graph(Vec<Value>),
	Document(Value),
}

impl fmt::Display for Parsed {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Directive(d) => write!(f, "{d:?}"),
			Self::A => f.write_str("a"),
			Self::Boolean(b) => write!(f, "{b}"),
			Self::Symbol(s) => write!(f, "{s:?}"),
			Self::Iri(iri) => write!(f, "<{iri}>"),
			Self::Number(n) | Self::Document(n) => write!(f, "{n}"),
			Self::Literal(map) | Self::BlankNode(map) | Self::Annotation(map) => {
				write!(f, "{}", Value::Object(map.clone()))
			}
			Self::Language(l) => write!(f, "@{l}"),
			Self::List(items) | Self::Graph(items) => write!(f, "{}", Value::Array(items.clone())),
		}
	}
}

fn unexpected(value: Parsed) -> NotationError {
	NotationError::new(format!("Unexpected: {value}"))
}

/// Checks that the prefix of a prefixed name is declared.
///
/// Names with an empty prefix reach here without their colon and need a
/// vocabulary.
fn check_prefix(context: &Map<String, Value>, sym: &str) -> Result<(), NotationError> {
	match sym.split_once(':') {
		Some(("_", _)) => Ok(()),
		Some((prefix, _)) if context.contains_key(prefix) => Ok(()),
		None if context.contains_key(VOCAB) => Ok(()),
		Some(_) => Err(NotationError::new(format!("Undeclared prefix in {sym:?}"))),
		None => Err(NotationError::new(format!("Undeclared prefix in \":{sym}\""))),
	}
}

/// Resolves a symbol used as a predicate, type or datatype.
///
/// Symbols colliding with a context key are expanded against the
/// vocabulary.
fn symbol(context: &Map<String, Value>, value: Parsed) -> Result<String, NotationError> {
	match value {
		Parsed::Symbol(sym) => {
			check_prefix(context, &sym)?;
			match context.get(VOCAB) {
				Some(Value::String(vocab)) if context.contains_key(&sym) => Ok(format!("{vocab}{sym}")),
				_ => Ok(sym),
			}
		}
		Parsed::Iri(iri) => Ok(iri),
		other => Err(unexpected(other)),
	}
}

fn node_with_id(
	context: &Map<String, Value>,
	value: Parsed,
) -> Result<Map<String, Value>, NotationError> {
	let id = match value {
		Parsed::Symbol(sym) => {
			check_prefix(context, &sym)?;
			match context.get(VOCAB) {
				Some(Value::String(vocab)) if !sym.contains(':') => format!("{vocab}{sym}"),
				_ => sym,
			}
		}
		Parsed::Iri(iri) => iri,
		Parsed::BlankNode(node) => return Ok(node),
		other => return Err(NotationError::new(format!("Unexpected subject: {other}"))),
	};

	let mut node = Map::new();
	node.insert(ID.to_owned(), Value::String(id));
	Ok(node)
}

fn compact_value(context: &Map<String, Value>, value: Parsed) -> Result<Value, NotationError> {
	match value {
		Parsed::Literal(mut literal) => match literal.len() {
			1 => Ok(literal.remove(VALUE).unwrap_or_default()),
			_ => Ok(Value::Object(literal)),
		},
		Parsed::Number(n) => Ok(n),
		Parsed::Boolean(b) => Ok(Value::Bool(b)),
		Parsed::List(items) => Ok(json!({ LIST: items })),
		value @ (Parsed::Symbol(_) | Parsed::Iri(_) | Parsed::BlankNode(_)) => {
			Ok(Value::Object(node_with_id(context, value)?))
		}
		other => Err(unexpected(other)),
	}
}

/// Transition of the state machine.
enum Step {
	/// The character is consumed, the state stays current.
	Stay,

	/// The character is consumed, a child state becomes current.
	Push(State),

	/// A child state becomes current and consumes the character.
	Feed(State),

	/// The current state is replaced.
	Replace(State),

	/// The current state is replaced, and the new one consumes the
	/// character.
	ReplaceFeed(State),

	/// The character is consumed, the parent receives the value with the
	/// next character.
	Return(Option<Parsed>),

	/// The parent consumes the character along with the value.
	ReturnFeed(Option<Parsed>),

	/// The value ended with a `.` that belongs to the parent: the parent
	/// consumes the value with a `.`, then the character.
	Backtrack(Parsed),
}

enum State {
	Comment,
	Iri(Collector),
	Symbol(ReadSymbol),
	Number(ReadNumber),
	Literal(ReadLiteral),
	Language(Collector),
	Declaration(ReadDeclaration),
	BlankNode(ReadNode),
	Annotation(ReadAnnotation),
	Collection(Vec<Value>),
	Nodes(ReadNodes),
}

impl State {
	fn name(&self) -> &'static str {
		match self {
			Self::Comment => "comment",
			Self::Iri(_) => "IRI",
			Self::Symbol(_) => "symbol",
			Self::Number(_) => "number",
			Self::Literal(_) => "literal",
			Self::Language(_) => "language",
			Self::Declaration(_) => "declaration",
			Self::BlankNode(_) => "blank node",
			Self::Annotation(_) => "annotation",
			Self::Collection(_) => "collection",
			Self::Nodes(n) if n.in_graph => "graph",
			Self::Nodes(_) => "nodes",
		}
	}

	fn consume(
		&mut self,
		c: Option<char>,
		prev: Option<Parsed>,
		context: &mut Map<String, Value>,
	) -> Result<Step, NotationError> {
		match self {
			Self::Comment => Ok(match c {
				Some('\n') => Step::Return(None),
				Some(_) => Step::Stay,
				None => Step::ReturnFeed(None),
			}),
			Self::Iri(collector) => read_iri(collector, c),
			Self::Symbol(s) => s.consume(c),
			Self::Number(n) => n.consume(c),
			Self::Literal(l) => l.consume(c, prev, context),
			Self::Language(collector) => Ok(match c {
				Some(c) if c.is_ascii_alphanumeric() || c == '-' => {
					collector.collect(c);
					Step::Stay
				}
				_ => Step::ReturnFeed(Some(Parsed::Language(collector.pop()))),
			}),
			Self::Declaration(d) => d.consume(c, prev, context),
			Self::BlankNode(node) => {
				if let Some(prev) = prev {
					node.receive(context, prev)?
				}

				match c {
					None => Err(NotationError::new("Unexpected end of input in blank node")),
					Some(']') => Ok(Step::Return(Some(Parsed::BlankNode(
						node.node.take().unwrap_or_default(),
					)))),
					Some(c) => Ok(node.consume_node_char(c)),
				}
			}
			Self::Annotation(a) => a.consume(c, prev, context),
			Self::Collection(items) => {
				if let Some(prev) = prev {
					items.push(compact_value(context, prev)?)
				}

				match c {
					None => Err(NotationError::new("Unexpected end of input in collection")),
					Some(c) if c.is_whitespace() => Ok(Step::Stay),
					Some('#') => Ok(Step::Push(State::Comment)),
					Some('[') => Ok(Step::Push(State::BlankNode(ReadNode::blank()))),
					Some('(') => Ok(Step::Push(State::Collection(Vec::new()))),
					Some(')') => Ok(Step::Return(Some(Parsed::List(std::mem::take(items))))),
					Some(q @ ('"' | '\'')) => Ok(Step::Push(State::Literal(ReadLiteral::new(q)))),
					Some(_) => Ok(Step::Feed(State::Symbol(ReadSymbol::default()))),
				}
			}
			Self::Nodes(nodes) => nodes.consume(c, prev, context),
		}
	}
}

/// Collects the characters of a term, decoding escape sequences.
#[derive(Default)]
struct Collector {
	collected: String,
	escape_next: bool,
	unicode: String,
	unicode_left: usize,
}

impl Collector {
	fn collect(&mut self, c: char) {
		self.collected.push(c)
	}

	fn pop(&mut self) -> String {
		std::mem::take(&mut self.collected)
	}

	fn is_empty(&self) -> bool {
		self.collected.is_empty()
	}

	/// Handles `c` if it is part of an escape sequence.
	///
	/// `escape` maps the character following a backslash to the escaped
	/// character, `\u` and `\U` sequences being always allowed.
	fn handle_escape(
		&mut self,
		mut c: char,
		escape: fn(char) -> Option<char>,
	) -> Result<bool, NotationError> {
		if self.unicode_left > 0 {
			self.unicode.push(c);

			if self.unicode_left > 1 {
				self.unicode_left -= 1;
				return Ok(true);
			}

			c = u32::from_str_radix(&self.unicode, 16)
				.ok()
				.and_then(char::from_u32)
				.ok_or_else(|| {
					NotationError::new(format!("Invalid unicode escape: {}", self.unicode))
				})?;
			self.unicode.clear();
			self.unicode_left = 0;
		} else if self.escape_next {
			match c {
				'u' => {
					self.unicode_left = 4;
					return Ok(true);
				}
				'U' => {
					self.unicode_left = 8;
					return Ok(true);
				}
				_ => {
					c = escape(c).ok_or_else(|| {
						NotationError::new(format!("Invalid escape char: {c:?}"))
					})?
				}
			}
		}

		if self.escape_next {
			self.escape_next = false;
			self.collect(c);
			return Ok(true);
		}

		if c == '\\' {
			self.escape_next = true;
			return Ok(true);
		}

		Ok(false)
	}
}

fn no_escape(_: char) -> Option<char> {
	None
}

fn reserved_escape(c: char) -> Option<char> {
	RESERVED_CHARS.contains(c).then_some(c)
}

fn string_escape(c: char) -> Option<char> {
	match c {
		't' => Some('\t'),
		'b' => Some('\u{8}'),
		'n' => Some('\n'),
		'r' => Some('\r'),
		'f' => Some('\u{c}'),
		'"' | '\'' | '\\' => Some(c),
		_ => None,
	}
}

fn read_iri(collector: &mut Collector, c: Option<char>) -> Result<Step, NotationError> {
	match c {
		Some('>') => Ok(Step::Return(Some(Parsed::Iri(collector.pop())))),
		Some(c) if collector.handle_escape(c, no_escape)? => Ok(Step::Stay),
		Some(c) if !c.is_whitespace() => {
			collector.collect(c);
			Ok(Step::Stay)
		}
		Some(c) => Err(NotationError::new(format!("Invalid URI character: {c:?}"))),
		None => Err(NotationError::new("Unexpected end of input in IRI")),
	}
}

fn is_number_lead(c: char) -> bool {
	matches!(c, '+' | '-' | '.' | '0'..='9')
}

#[derive(Default)]
struct ReadSymbol {
	collector: Collector,
	just_escaped: bool,
}

impl ReadSymbol {
	fn accept(&self, c: char) -> bool {
		if c.is_whitespace() || "][{}^<>\"~!$&'()*,;=/?#|".contains(c) {
			return false;
		}

		!(c == ':' && self.collector.collected.starts_with("_:"))
	}

	fn consume(&mut self, c: Option<char>) -> Result<Step, NotationError> {
		if let Some(c) = c {
			if self.collector.is_empty() && !self.collector.escape_next {
				if c == '<' {
					return Ok(Step::Replace(State::Iri(Collector::default())));
				}

				if is_number_lead(c) {
					return Ok(Step::ReplaceFeed(State::Number(ReadNumber::default())));
				}
			}

			if self.collector.handle_escape(c, reserved_escape)? {
				self.just_escaped = true;
				return Ok(Step::Stay);
			}

			let just_escaped = std::mem::take(&mut self.just_escaped);
			if self.accept(c) {
				self.collector.collect(c);
				return Ok(Step::Stay);
			}

			self.just_escaped = just_escaped;
		}

		let mut value = self.collector.pop();
		let last_dot = !self.just_escaped && value.ends_with('.');
		if last_dot {
			value.pop();
		}

		let parsed = match value.as_str() {
			"true" => Parsed::Boolean(true),
			"false" => Parsed::Boolean(false),
			"a" => Parsed::A,
			"@prefix" => Parsed::Directive(Directive::Prefix { at: true }),
			"@base" => Parsed::Directive(Directive::Base { at: true }),
			_ => match value.to_lowercase().as_str() {
				"prefix" => Parsed::Directive(Directive::Prefix { at: false }),
				"base" => Parsed::Directive(Directive::Base { at: false }),
				"graph" => Parsed::Directive(Directive::Graph),
				_ if value.is_empty() => Parsed::Symbol(value),
				_ if !value.contains(':') => {
					return Err(NotationError::new(format!("Expected PNname, got {value:?}")))
				}
				_ => match value.strip_prefix(':') {
					Some(local) => Parsed::Symbol(local.to_owned()),
					None => Parsed::Symbol(value),
				},
			},
		};

		if last_dot {
			Ok(Step::Backtrack(parsed))
		} else {
			Ok(Step::ReturnFeed(Some(parsed)))
		}
	}
}

#[derive(Default)]
struct ReadNumber {
	collector: Collector,

	/// Integer part, once a dot or exponent has been read.
	whole: Option<String>,
	dot: bool,
	exp: bool,
}

impl ReadNumber {
	fn consume(&mut self, c: Option<char>) -> Result<Step, NotationError> {
		let is_exp = matches!(c, Some('e' | 'E'));
		if is_exp {
			self.exp = true
		}

		if let Some(c) = c {
			if self.whole.is_none() && c == '.' {
				self.whole = Some(self.collector.pop());
				self.dot = true;
				return Ok(Step::Stay);
			}

			if self.whole.is_none() && is_exp {
				self.whole = Some(self.collector.pop());
				self.collector.collect(c);
				return Ok(Step::Stay);
			}

			let after_exp = self.collector.collected.ends_with(|c| c == 'e' || c == 'E');
			if c.is_ascii_digit()
				|| (self.whole.is_none() && self.collector.is_empty() && is_number_lead(c))
				|| (self.whole.is_some() && is_exp)
				|| (after_exp && is_number_lead(c))
			{
				self.collector.collect(c);
				return Ok(Step::Stay);
			}
		}

		if let Some(whole) = &self.whole {
			if self.collector.is_empty() {
				if whole.is_empty() {
					return Ok(Step::ReturnFeed(None));
				}

				// The dot ends the statement.
				let n: i64 = whole
					.parse()
					.map_err(|_| NotationError::new(format!("Invalid number: {whole:?}")))?;
				return Ok(Step::Backtrack(Parsed::Number(n.into())));
			}
		}

		Ok(Step::ReturnFeed(Some(Parsed::Number(self.to_number()?))))
	}

	fn to_number(&mut self) -> Result<Value, NotationError> {
		let value = self.collector.pop();
		let invalid = |lexical: &str| NotationError::new(format!("Invalid number: {lexical:?}"));

		match self.whole.take() {
			Some(whole) => {
				let lexical = format!("{whole}{}{value}", if self.dot { "." } else { "" });
				lexical.parse::<f64>().map_err(|_| invalid(&lexical))?;

				let datatype = if self.exp {
					vocab::XSD_DOUBLE
				} else {
					vocab::XSD_DECIMAL
				};
				Ok(json!({ VALUE: lexical, TYPE: datatype.as_str() }))
			}
			None => {
				if value.len() > 1 && value.starts_with(|c| c == '+' || c == '0') {
					return Ok(json!({ VALUE: value, TYPE: vocab::XSD_INTEGER.as_str() }));
				}

				let digits = value.strip_prefix('-').unwrap_or(&value);
				match value.parse::<i64>() {
					Ok(n) => Ok(n.into()),
					Err(_) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
						Ok(json!({ VALUE: value, TYPE: vocab::XSD_INTEGER.as_str() }))
					}
					Err(_) => Err(invalid(&value)),
				}
			}
		}
	}
}

struct ReadLiteral {
	quote: char,
	collector: Collector,
	value: Option<String>,

	/// Number of consecutive quotes read in a long string.
	multiline: u8,

	/// Number of `^` read after the closing quote.
	datatype_start: u8,
}

impl ReadLiteral {
	fn new(quote: char) -> Self {
		Self {
			quote,
			collector: Collector::default(),
			value: None,
			multiline: 0,
			datatype_start: 0,
		}
	}

	fn no_after_literal(kind: &str, prev: &Option<Parsed>) -> Result<(), NotationError> {
		match prev {
			Some(prev) => Err(NotationError::new(format!("{kind} not allowed after {prev}"))),
			None => Ok(()),
		}
	}

	fn consume(
		&mut self,
		c: Option<char>,
		prev: Option<Parsed>,
		context: &Map<String, Value>,
	) -> Result<Step, NotationError> {
		if self.value.as_deref() == Some("") && c == Some(self.quote) {
			self.multiline = 1;
			self.value = None;
			return Ok(Step::Stay);
		}

		if let Some(value) = &self.value {
			if self.datatype_start > 0 {
				Self::no_after_literal("Datatype", &prev)?;
				return match (self.datatype_start, c) {
					(1, Some('^')) => {
						self.datatype_start = 2;
						Ok(Step::Stay)
					}
					(2, _) => {
						self.datatype_start = 0;
						Ok(Step::Feed(State::Symbol(ReadSymbol::default())))
					}
					_ => Err(NotationError::new("Expected `^^` before datatype")),
				};
			}

			match c {
				Some('^') => {
					Self::no_after_literal("Datatype", &prev)?;
					self.datatype_start = 1;
					return Ok(Step::Stay);
				}
				Some('@') => {
					Self::no_after_literal("Language", &prev)?;
					return Ok(Step::Push(State::Language(Collector::default())));
				}
				_ => (),
			}

			let mut literal = Map::new();
			literal.insert(VALUE.to_owned(), Value::String(value.clone()));

			match prev {
				Some(Parsed::Language(language)) => {
					literal.insert(LANGUAGE.to_owned(), Value::String(language));
				}
				Some(datatype) => {
					literal.insert(TYPE.to_owned(), Value::String(symbol(context, datatype)?));
				}
				None => (),
			}

			return Ok(Step::ReturnFeed(Some(Parsed::Literal(literal))));
		}

		let Some(c) = c else {
			return Err(NotationError::new("Unexpected end of input in literal"));
		};

		if self.collector.handle_escape(c, string_escape)? {
			return Ok(Step::Stay);
		}

		if c == self.quote {
			if self.multiline == 0 || self.multiline == 3 {
				self.multiline = 0;
				self.value = Some(self.collector.pop());
			} else {
				self.multiline += 1;
			}

			return Ok(Step::Stay);
		}

		if self.multiline == 0 && c == '\n' {
			return Err(NotationError::new("Unexpected line break in literal"));
		}

		if self.multiline > 1 {
			for _ in 1..self.multiline {
				self.collector.collect(self.quote)
			}

			self.multiline = 1;
		}

		self.collector.collect(c);
		Ok(Step::Stay)
	}
}

/// `@prefix`, `@base`, `PREFIX` or `BASE` declaration.
struct ReadDeclaration {
	base: bool,

	/// The `@` forms end with a dot.
	final_dot: bool,
	completed: bool,
	prefix: Option<String>,
	iri: Option<String>,
}

impl ReadDeclaration {
	fn new(base: bool, final_dot: bool) -> Self {
		Self {
			base,
			final_dot,
			completed: false,
			prefix: None,
			iri: None,
		}
	}

	/// Receives a part of the declaration, returns `true` if more parts are
	/// expected.
	fn more_parts(&mut self, value: Parsed) -> Result<bool, NotationError> {
		if !self.base && self.prefix.is_none() {
			let prefix = match value {
				Parsed::Symbol(prefix) => prefix,
				other => return Err(NotationError::new(format!("Invalid prefix {other}"))),
			};

			let prefix = match prefix.as_str() {
				"" => prefix,
				p => p
					.strip_suffix(':')
					.map(str::to_owned)
					.ok_or_else(|| NotationError::new(format!("Invalid prefix {p:?}")))?,
			};

			self.prefix = Some(prefix);
			return Ok(true);
		}

		if self.iri.is_none() {
			match value {
				Parsed::Iri(iri) => self.iri = Some(iri),
				other => return Err(unexpected(other)),
			}
		}

		Ok(false)
	}

	fn declare(&mut self, context: &mut Map<String, Value>) -> Result<(), NotationError> {
		let iri = self
			.iri
			.take()
			.ok_or_else(|| NotationError::new("Incomplete declaration"))?;

		if self.base {
			log::trace!("base <{iri}>");
			context.insert(BASE.to_owned(), Value::String(iri));
			return Ok(());
		}

		let prefix = self.prefix.take().unwrap_or_default();
		log::trace!("prefix {prefix:?} <{iri}>");

		let value = if !prefix.is_empty() && !iri.is_empty() && !iri.ends_with(PREFIX_DELIMS) {
			json!({ ID: iri, PREFIX: true })
		} else {
			Value::String(iri)
		};

		let key = if prefix.is_empty() {
			VOCAB.to_owned()
		} else {
			prefix
		};

		context.insert(key, value);
		Ok(())
	}

	fn consume(
		&mut self,
		c: Option<char>,
		prev: Option<Parsed>,
		context: &mut Map<String, Value>,
	) -> Result<Step, NotationError> {
		if let Some(prev) = prev {
			if !self.more_parts(prev)? {
				self.completed = true;
				if !self.final_dot {
					self.declare(context)?;
					return Ok(Step::ReturnFeed(None));
				}
			}
		}

		match c {
			None => Err(NotationError::new("Unexpected end of input in declaration")),
			Some(c) if c.is_whitespace() => Ok(Step::Stay),
			Some('#') => Ok(Step::Push(State::Comment)),
			Some('.') => {
				self.declare(context)?;
				Ok(Step::Return(None))
			}
			Some(_) if self.completed && self.final_dot => {
				Err(NotationError::new("Expected a final dot"))
			}
			Some(_) => Ok(Step::Feed(State::Symbol(ReadSymbol::default()))),
		}
	}
}

/// Node being described: subject, current predicate and values.
struct ReadNode {
	node: Option<Map<String, Value>>,
	predicate: Option<String>,
	accept_value: bool,
}

impl ReadNode {
	fn new() -> Self {
		Self {
			node: None,
			predicate: None,
			accept_value: true,
		}
	}

	fn blank() -> Self {
		Self {
			node: Some(Map::new()),
			..Self::new()
		}
	}

	fn reset(&mut self) {
		*self = Self::new()
	}

	/// Checks if a `{|` annotation may follow.
	fn awaits_annotation(&self) -> bool {
		self.predicate.is_some() && !self.accept_value
	}

	fn receive(&mut self, context: &Map<String, Value>, value: Parsed) -> Result<(), NotationError> {
		match value {
			Parsed::Annotation(annotation) => self.annotate(annotation),
			value => self.fill_node(context, value),
		}
	}

	fn fill_node(&mut self, context: &Map<String, Value>, value: Parsed) -> Result<(), NotationError> {
		let Some(predicate) = &self.predicate else {
			self.predicate = Some(match value {
				Parsed::A => TYPE.to_owned(),
				value @ (Parsed::Symbol(_) | Parsed::Iri(_)) => symbol(context, value)?,
				other => return Err(NotationError::new(format!("Unexpected predicate: {other}"))),
			});
			return Ok(());
		};

		if !self.accept_value {
			return Err(unexpected(value));
		}

		let value = if predicate.as_str() == TYPE {
			Value::String(symbol(context, value)?)
		} else {
			compact_value(context, value)?
		};

		let node = self.node.get_or_insert_with(Map::new);
		match node.get_mut(predicate) {
			Some(Value::Array(values)) => values.push(value),
			Some(given) => *given = Value::Array(vec![given.take(), value]),
			None => {
				node.insert(predicate.clone(), value);
			}
		}

		self.accept_value = false;
		Ok(())
	}

	/// Attaches an annotation to the last value read.
	fn annotate(&mut self, annotation: Map<String, Value>) -> Result<(), NotationError> {
		let last = match (&mut self.node, &self.predicate) {
			(Some(node), Some(predicate)) if predicate.as_str() != TYPE => match node.get_mut(predicate) {
				Some(Value::Array(values)) => values.last_mut(),
				value => value,
			},
			_ => None,
		};

		let last = last.ok_or_else(|| NotationError::new("Unexpected annotation"))?;
		if !last.is_object() {
			*last = json!({ VALUE: last.take() });
		}

		if let Value::Object(map) = last {
			map.insert(ANNOTATION.to_owned(), Value::Object(annotation));
		}

		Ok(())
	}

	fn consume_node_char(&mut self, c: char) -> Step {
		match c {
			c if c.is_whitespace() => Step::Stay,
			'#' => Step::Push(State::Comment),
			'[' => Step::Push(State::BlankNode(ReadNode::blank())),
			'(' => Step::Push(State::Collection(Vec::new())),
			';' => {
				self.predicate = None;
				self.accept_value = true;
				Step::Stay
			}
			',' => {
				self.accept_value = true;
				Step::Stay
			}
			'"' | '\'' => Step::Push(State::Literal(ReadLiteral::new(c))),
			'{' if self.awaits_annotation() => Step::Push(State::Annotation(ReadAnnotation {
				node: ReadNode::blank(),
				opened: false,
				closing: false,
			})),
			_ => Step::Feed(State::Symbol(ReadSymbol::default())),
		}
	}
}

/// RDF-star annotation block `{| ... |}`.
struct ReadAnnotation {
	node: ReadNode,
	opened: bool,
	closing: bool,
}

impl ReadAnnotation {
	fn consume(
		&mut self,
		c: Option<char>,
		prev: Option<Parsed>,
		context: &Map<String, Value>,
	) -> Result<Step, NotationError> {
		if !self.opened {
			return match c {
				Some('|') => {
					self.opened = true;
					Ok(Step::Stay)
				}
				_ => Err(NotationError::new("Expected `|` to open annotation")),
			};
		}

		if let Some(prev) = prev {
			self.node.receive(context, prev)?
		}

		match c {
			None => Err(NotationError::new("Unexpected end of input in annotation")),
			Some('}') if self.closing => Ok(Step::Return(Some(Parsed::Annotation(
				self.node.node.take().unwrap_or_default(),
			)))),
			Some(_) if self.closing => Err(NotationError::new("Expected `}` to close annotation")),
			Some('|') => {
				self.closing = true;
				Ok(Step::Stay)
			}
			Some(c) => Ok(self.node.consume_node_char(c)),
		}
	}
}

/// Sequence of node descriptions, at the top level or in a graph block.
struct ReadNodes {
	current: ReadNode,
	nodes: Vec<Value>,
	expect_graph: bool,
	in_graph: bool,
}

impl ReadNodes {
	fn new(in_graph: bool) -> Self {
		Self {
			current: ReadNode::new(),
			nodes: Vec::new(),
			expect_graph: false,
			in_graph,
		}
	}

	fn next_node(&mut self) -> Result<(), NotationError> {
		let node = match self.current.node.take() {
			Some(node)
				if self.current.predicate.is_none()
					&& !node.contains_key(GRAPH)
					&& node.len() == 1 && node.contains_key(ID) =>
			{
				return Err(NotationError::new(format!(
					"Incomplete triple for node: {}",
					Value::Object(node)
				)))
			}
			Some(node) => node,
			None => return Err(NotationError::new("Incomplete triple")),
		};

		self.nodes.push(Value::Object(node));
		self.current.reset();
		self.expect_graph = false;
		Ok(())
	}

	fn consume(
		&mut self,
		c: Option<char>,
		prev: Option<Parsed>,
		context: &mut Map<String, Value>,
	) -> Result<Step, NotationError> {
		if self.in_graph {
			if let Some(Parsed::Directive(d)) = &prev {
				return Err(NotationError::new(format!("Directive not allowed in graph: {d:?}")));
			}

			if self.expect_graph {
				return Err(NotationError::new("Nested graphs are not allowed in TriG"));
			}

			if c == Some('}') {
				if self.current.node.is_some() {
					if let Some(prev) = prev {
						self.current.receive(context, prev)?
					}

					self.next_node()?
				}

				return Ok(Step::Return(Some(Parsed::Graph(std::mem::take(&mut self.nodes)))));
			}
		}

		if let Some(prev) = prev {
			match prev {
				Parsed::Directive(Directive::Prefix { at }) => {
					return Ok(Step::Feed(State::Declaration(ReadDeclaration::new(false, at))))
				}
				Parsed::Directive(Directive::Base { at }) => {
					return Ok(Step::Feed(State::Declaration(ReadDeclaration::new(true, at))))
				}
				Parsed::Directive(Directive::Graph) => self.expect_graph = true,
				Parsed::Graph(nodes) => {
					self.expect_graph = false;
					match self.current.node.as_mut() {
						None => self.nodes.extend(nodes),
						Some(node) => {
							node.insert(GRAPH.to_owned(), Value::Array(nodes));
							self.next_node()?
						}
					}
				}
				prev if self.current.node.is_none() => {
					self.current.node = Some(node_with_id(context, prev)?)
				}
				prev => {
					if self.current.predicate.is_none() && self.expect_graph {
						return Err(NotationError::new(format!(
							"Expected graph notation to follow, got {prev}"
						)));
					}

					self.current.receive(context, prev)?
				}
			}
		}

		match c {
			None if self.in_graph => Err(NotationError::new("Unexpected end of input in graph")),
			None => match &self.current.node {
				Some(node) => Err(NotationError::new(format!(
					"Incomplete triple for node: {}",
					Value::Object(node.clone())
				))),
				None => Ok(Step::Return(Some(Parsed::Document(json!({
					CONTEXT: context.clone(),
					GRAPH: std::mem::take(&mut self.nodes)
				}))))),
			},
			Some('.') if self.current.predicate.is_none() || !self.current.accept_value => {
				self.next_node()?;
				Ok(Step::Stay)
			}
			Some('{') if !self.current.awaits_annotation() => {
				if self.in_graph {
					return Err(NotationError::new("Nested graphs are not allowed in TriG"));
				}

				self.expect_graph = false;
				Ok(Step::Push(State::Nodes(ReadNodes::new(true))))
			}
			Some(c) => Ok(self.current.consume_node_char(c)),
		}
	}
}

/// Incremental TriG parser.
pub struct Parser {
	stack: Vec<State>,
	context: Map<String, Value>,
	value: Option<Parsed>,
	result: Option<Value>,
	line: usize,
	column: usize,
}

impl Default for Parser {
	fn default() -> Self {
		Self::new()
	}
}

impl Parser {
	pub fn new() -> Self {
		Self {
			stack: vec![State::Nodes(ReadNodes::new(false))],
			context: Map::new(),
			value: None,
			result: None,
			line: 1,
			column: 1,
		}
	}

	/// Consumes the next character of the input.
	pub fn push(&mut self, c: char) -> Result<(), Error> {
		if c == '\n' {
			self.line += 1;
			self.column = 0;
		}

		let value = self.value.take();
		self.feed(Some(c), value).map_err(|error| self.error(error))?;
		self.column += 1;
		Ok(())
	}

	/// Ends the input, returning the parsed document.
	pub fn end(mut self) -> Result<Value, Error> {
		let value = self.value.take();
		self.feed(None, value).map_err(|error| self.error(error))?;

		self.result
			.take()
			.ok_or_else(|| self.error(NotationError::new("Unexpected end of input")))
	}

	fn error(&self, error: NotationError) -> Error {
		Error {
			error,
			line: self.line,
			column: self.column,
			state: self.stack.last().map_or("document", State::name),
		}
	}

	fn feed(&mut self, c: Option<char>, value: Option<Parsed>) -> Result<(), NotationError> {
		let state = self
			.stack
			.last_mut()
			.ok_or_else(|| NotationError::new("Unexpected data after the end of the document"))?;

		match state.consume(c, value, &mut self.context)? {
			Step::Stay => Ok(()),
			Step::Push(child) => {
				log::trace!("enter {}", child.name());
				self.stack.push(child);
				Ok(())
			}
			Step::Feed(child) => {
				log::trace!("enter {}", child.name());
				self.stack.push(child);
				self.feed(c, None)
			}
			Step::Replace(next) => {
				*state = next;
				Ok(())
			}
			Step::ReplaceFeed(next) => {
				*state = next;
				self.feed(c, None)
			}
			Step::Return(value) => {
				self.pop(value);
				Ok(())
			}
			Step::ReturnFeed(value) => {
				if self.pop(value) {
					let value = self.value.take();
					self.feed(c, value)
				} else {
					Ok(())
				}
			}
			Step::Backtrack(value) => {
				if self.pop(Some(value)) {
					let value = self.value.take();
					self.feed(Some('.'), value)?;
					let value = self.value.take();
					self.feed(c, value)
				} else {
					Ok(())
				}
			}
		}
	}

	/// Leaves the current state, holding `value` for its parent.
	///
	/// Returns `false` if the document state itself was left.
	fn pop(&mut self, value: Option<Parsed>) -> bool {
		if let Some(state) = self.stack.pop() {
			log::trace!("leave {}", state.name());
		}

		if self.stack.is_empty() {
			if let Some(Parsed::Document(document)) = value {
				self.result = Some(document)
			}

			false
		} else {
			self.value = value;
			true
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn graph(input: &str) -> Value {
		parse(input).unwrap()[GRAPH].clone()
	}

	#[test]
	fn collection() {
		let document = parse("@prefix : <http://x/> . :s :p ( :a :b ) .").unwrap();
		assert_eq!(
			document,
			json!({
				"@context": { "@vocab": "http://x/" },
				"@graph": [{
					"@id": "http://x/s",
					"p": { "@list": [{ "@id": "http://x/a" }, { "@id": "http://x/b" }] }
				}]
			})
		)
	}

	#[test]
	fn directives() {
		let document = parse(
			"@base <http://example.org/> .\n\
			PREFIX ex: <http://example.org/ns#>\n\
			prefix dc: <http://purl.org/dc/terms/>\n\
			@prefix x: <http://x.org/item> .\n\
			<a> a ex:Thing .",
		)
		.unwrap();

		assert_eq!(
			document[CONTEXT],
			json!({
				"@base": "http://example.org/",
				"ex": "http://example.org/ns#",
				"dc": "http://purl.org/dc/terms/",
				"x": { "@id": "http://x.org/item", "@prefix": true }
			})
		);
		assert_eq!(document[GRAPH], json!([{ "@id": "a", "@type": "ex:Thing" }]))
	}

	#[test]
	fn literals() {
		let nodes = graph(
			r#"prefix : <http://x/>
			prefix xsd: <http://www.w3.org/2001/XMLSchema#>
			:s :name "A", "B"@en-GB, 'c\'d' ;
				:date "2020-01-01"^^xsd:date ;
				:iri "x"^^<http://x/dt> ;
				:text """line 1
"quoted" line 2""" ;
				:unicode "café" ;
				:flag true .
			"#,
		);

		assert_eq!(
			nodes,
			json!([{
				"@id": "http://x/s",
				"name": ["A", { "@value": "B", "@language": "en-GB" }, "c'd"],
				"date": { "@value": "2020-01-01", "@type": "xsd:date" },
				"iri": { "@value": "x", "@type": "http://x/dt" },
				"text": "line 1\n\"quoted\" line 2",
				"unicode": "café",
				"flag": true
			}])
		)
	}

	#[test]
	fn numbers() {
		let nodes = graph("prefix : <http://x/> :s :p 1, -2, 1.5, 2.0, 1e3, 007, +3 ; :q 4.");

		assert_eq!(
			nodes,
			json!([{
				"@id": "http://x/s",
				"p": [
					1,
					-2,
					{ "@value": "1.5", "@type": "http://www.w3.org/2001/XMLSchema#decimal" },
					{ "@value": "2.0", "@type": "http://www.w3.org/2001/XMLSchema#decimal" },
					{ "@value": "1e3", "@type": "http://www.w3.org/2001/XMLSchema#double" },
					{ "@value": "007", "@type": "http://www.w3.org/2001/XMLSchema#integer" },
					{ "@value": "+3", "@type": "http://www.w3.org/2001/XMLSchema#integer" }
				],
				"q": 4
			}])
		)
	}

	#[test]
	fn blank_nodes_and_comments() {
		let nodes = graph(
			"prefix : <http://x/> # prefixes\n\
			:s :knows [ :name \"B\" ; :age 3 ] , _:c . # trailing\n\
			[ :p :o ] .\n\
			_:c :name \"C\" .",
		);

		assert_eq!(
			nodes,
			json!([
				{ "@id": "http://x/s", "knows": [{ "name": "B", "age": 3 }, { "@id": "_:c" }] },
				{ "p": { "@id": "http://x/o" } },
				{ "@id": "_:c", "name": "C" }
			])
		)
	}

	#[test]
	fn graphs() {
		let nodes = graph(
			"prefix : <http://x/>\n\
			:g { :s :p :o }\n\
			GRAPH :h { :s :p :o . :t :p :o . }\n\
			{ :d :p :o }",
		);

		assert_eq!(
			nodes,
			json!([
				{ "@id": "http://x/g", "@graph": [{ "@id": "http://x/s", "p": { "@id": "http://x/o" } }] },
				{
					"@id": "http://x/h",
					"@graph": [
						{ "@id": "http://x/s", "p": { "@id": "http://x/o" } },
						{ "@id": "http://x/t", "p": { "@id": "http://x/o" } }
					]
				},
				{ "@id": "http://x/d", "p": { "@id": "http://x/o" } }
			])
		)
	}

	#[test]
	fn annotations() {
		let nodes = graph("prefix : <http://x/> :s :p :o {| :source :w |} ; :q \"v\" {| :by :x |} .");

		assert_eq!(
			nodes,
			json!([{
				"@id": "http://x/s",
				"p": { "@id": "http://x/o", "@annotation": { "source": { "@id": "http://x/w" } } },
				"q": { "@value": "v", "@annotation": { "by": { "@id": "http://x/x" } } }
			}])
		)
	}

	#[test]
	fn notation_errors() {
		let err = parse("prefix : <http://x/>\n:s :p :o .\n:s :p \"a\"@en^^:t .").unwrap_err();
		assert_eq!(err.line, 3);
		assert!(err.to_string().starts_with("Notation error at line 3, column"));

		let err = parse("prefix : <http://x/>\n:g { :h { :s :p :o } }").unwrap_err();
		assert_eq!(err.error.message(), "Nested graphs are not allowed in TriG");

		let err = parse("prefix : <http://x/> :s :p oops .").unwrap_err();
		assert_eq!(err.error.message(), "Expected PNname, got \"oops\"");

		let err = parse("<http://x/s> <http://x/p> \"open").unwrap_err();
		assert_eq!(err.error.message(), "Unexpected end of input in literal");
		assert_eq!(err.state, "literal");
		assert!(err.to_string().contains("(literal)"));

		let err = parse("prefix : <http://x/>\n:s ex:p :o .").unwrap_err();
		assert_eq!(err.error.message(), "Undeclared prefix in \"ex:p\"");
		assert_eq!(err.line, 2);

		let err = parse("<http://x/s> <http://x/p> :o .").unwrap_err();
		assert_eq!(err.error.message(), "Undeclared prefix in \":o\"");

		let err = parse("<http://x/s> <http://x/p> \"v\"^^xsd:string .").unwrap_err();
		assert_eq!(err.error.message(), "Undeclared prefix in \"xsd:string\"")
	}
}
