use std::{iter::Peekable, str::Chars};

use iref::IriBuf;

use crate::{
	rdf::{Dataset, Literal, Quad, Value},
	BlankIdBuf, Id, LenientLangTagBuf,
};

/// N-Quads syntax error.
#[derive(Debug, thiserror::Error)]
#[error("N-Quads syntax error at line {line}: {kind}")]
pub struct Error {
	pub line: usize,
	pub kind: ErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
	#[error("unexpected character `{0}`")]
	Unexpected(char),

	#[error("unexpected end of line")]
	UnexpectedEnd,

	#[error("invalid IRI `{0}`")]
	InvalidIri(String),

	#[error("invalid blank node identifier `{0}`")]
	InvalidBlankId(String),

	#[error("invalid escape sequence")]
	InvalidEscape,

	#[error("a statement has 3 or 4 terms, found {0}")]
	InvalidStatement(usize),

	#[error("literal used as subject, predicate or graph name")]
	MisplacedLiteral,
}

/// Parses an N-Quads document.
pub fn parse(input: &str) -> Result<Dataset, Error> {
	let mut dataset = Dataset::new();
	parse_into(&mut dataset, input)?;
	Ok(dataset)
}

/// Parses an N-Quads document, adding its quads to `dataset`.
pub fn parse_into(dataset: &mut Dataset, input: &str) -> Result<(), Error> {
	for (i, line) in input.lines().enumerate() {
		let mut parser = LineParser {
			chars: line.chars().peekable(),
		};

		if let Some(quad) = parser.statement().map_err(|kind| Error { line: i + 1, kind })? {
			dataset.insert(quad)
		}
	}

	Ok(())
}

struct LineParser<'a> {
	chars: Peekable<Chars<'a>>,
}

impl<'a> LineParser<'a> {
	fn skip_whitespace(&mut self) {
		while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
	}

	fn next(&mut self) -> Result<char, ErrorKind> {
		self.chars.next().ok_or(ErrorKind::UnexpectedEnd)
	}

	/// Parses a statement, `None` if the line is blank or a comment.
	fn statement(&mut self) -> Result<Option<Quad>, ErrorKind> {
		let mut terms = Vec::with_capacity(4);

		loop {
			self.skip_whitespace();

			match self.chars.peek() {
				None | Some('#') if terms.is_empty() => return Ok(None),
				None => return Err(ErrorKind::UnexpectedEnd),
				Some('.') => {
					self.chars.next();
					break;
				}
				Some('<') => {
					self.chars.next();
					terms.push(Value::Id(Id::Iri(self.iri()?)))
				}
				Some('_') => terms.push(Value::Id(Id::Blank(self.blank_id()?))),
				Some('"') => {
					self.chars.next();
					terms.push(Value::Literal(self.literal()?))
				}
				Some(&c) => return Err(ErrorKind::Unexpected(c)),
			}
		}

		self.skip_whitespace();
		match self.chars.next() {
			None | Some('#') => (),
			Some(c) => return Err(ErrorKind::Unexpected(c)),
		}

		let n = terms.len();
		let mut terms = terms.into_iter();
		let (Some(s), Some(p), Some(o), g, None) =
			(terms.next(), terms.next(), terms.next(), terms.next(), terms.next())
		else {
			return Err(ErrorKind::InvalidStatement(n));
		};

		let (Value::Id(s), Value::Id(p)) = (s, p) else {
			return Err(ErrorKind::MisplacedLiteral);
		};

		let g = match g {
			Some(Value::Id(g)) => Some(g),
			Some(Value::Literal(_)) => return Err(ErrorKind::MisplacedLiteral),
			None => None,
		};

		Ok(Some(Quad(s, p, o, g)))
	}

	/// Reads an IRI after its opening `<`.
	fn iri(&mut self) -> Result<IriBuf, ErrorKind> {
		let mut buffer = String::new();

		loop {
			match self.next()? {
				'>' => break,
				'\\' => buffer.push(self.unicode_escape()?),
				c => buffer.push(c),
			}
		}

		IriBuf::new(buffer).map_err(|e| ErrorKind::InvalidIri(e.0))
	}

	fn blank_id(&mut self) -> Result<BlankIdBuf, ErrorKind> {
		let mut buffer = String::new();

		while let Some(&c) = self.chars.peek() {
			if c.is_whitespace() || (c == '.' && self.dot_ends_statement()) {
				break;
			}

			buffer.push(c);
			self.chars.next();
		}

		BlankIdBuf::new(buffer).map_err(|e| ErrorKind::InvalidBlankId(e.0))
	}

	/// Checks if the upcoming `.` is followed by the end of the statement.
	fn dot_ends_statement(&self) -> bool {
		let mut lookahead = self.chars.clone();
		lookahead.next();
		matches!(lookahead.find(|c| !c.is_whitespace()), None | Some('#'))
	}

	/// Reads a literal after its opening `"`.
	fn literal(&mut self) -> Result<Literal, ErrorKind> {
		let mut value = String::new();

		loop {
			match self.next()? {
				'"' => break,
				'\\' => value.push(self.escape()?),
				c => value.push(c),
			}
		}

		match self.chars.peek() {
			Some('@') => {
				self.chars.next();
				let mut tag = String::new();
				while let Some(c) = self.chars.next_if(|c| c.is_ascii_alphanumeric() || *c == '-') {
					tag.push(c)
				}

				Ok(Literal::lang_string(value, LenientLangTagBuf::new(tag)))
			}
			Some('^') => {
				self.chars.next();
				match (self.next()?, self.next()?) {
					('^', '<') => Ok(Literal::new(value, self.iri()?)),
					(_, c) => Err(ErrorKind::Unexpected(c)),
				}
			}
			_ => Ok(Literal::string(value)),
		}
	}

	fn escape(&mut self) -> Result<char, ErrorKind> {
		match self.chars.peek() {
			Some('u' | 'U') => self.unicode_escape(),
			_ => match self.next()? {
				't' => Ok('\t'),
				'b' => Ok('\u{8}'),
				'n' => Ok('\n'),
				'r' => Ok('\r'),
				'f' => Ok('\u{c}'),
				c @ ('"' | '\'' | '\\') => Ok(c),
				_ => Err(ErrorKind::InvalidEscape),
			},
		}
	}

	/// Reads `uXXXX` or `UXXXXXXXX` after a backslash.
	fn unicode_escape(&mut self) -> Result<char, ErrorKind> {
		let len = match self.next()? {
			'u' => 4,
			'U' => 8,
			_ => return Err(ErrorKind::InvalidEscape),
		};

		let mut code = 0;
		for _ in 0..len {
			let digit = self.next()?.to_digit(16).ok_or(ErrorKind::InvalidEscape)?;
			code = code * 16 + digit
		}

		char::from_u32(code).ok_or(ErrorKind::InvalidEscape)
	}
}
