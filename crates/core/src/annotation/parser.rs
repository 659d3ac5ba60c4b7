use super::registry::AnnotationRegistry;
use crate::model::{Annotation, Arguments, Value};
use std::fmt;

/// Syntax error inside a recognized annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocParseError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for DocParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for DocParseError {}

type ParseResult<T> = std::result::Result<T, DocParseError>;

/// Strips the comment delimiters and the leading `*` of every line.
pub fn clean_docblock(raw: &str) -> String {
    let body = raw.trim();
    let body = body
        .strip_prefix("/**")
        .or_else(|| body.strip_prefix("/*"))
        .unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    body.lines()
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix('*').unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses every recognized annotation in a docblock, in order.
///
/// Names the registry does not know (`@param`, `@return`, ...) are skipped
/// together with whatever follows them; a recognized annotation with
/// broken argument syntax fails the whole docblock.
pub fn parse_docblock(raw: &str, registry: &AnnotationRegistry) -> ParseResult<Vec<Annotation>> {
    let text = clean_docblock(raw);
    let mut parser = DocParser::new(&text);
    let mut annotations = Vec::new();

    while let Some(written) = parser.next_annotation_name() {
        let Some((name, kind)) = registry.resolve(&written) else {
            continue;
        };
        let args = if parser.peek_past_whitespace() == Some('(') {
            parser.skip_whitespace();
            parser.arguments()?
        } else {
            Arguments::default()
        };
        annotations.push(Annotation::new(name, kind, args));
    }

    Ok(annotations)
}

struct DocParser {
    chars: Vec<char>,
    pos: usize,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '\\'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '\\'
}

impl DocParser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek_past_whitespace(&self) -> Option<char> {
        self.chars[self.pos..]
            .iter()
            .copied()
            .find(|c| !c.is_whitespace())
    }

    fn line(&self) -> usize {
        self.chars[..self.pos.min(self.chars.len())]
            .iter()
            .filter(|c| **c == '\n')
            .count()
            + 1
    }

    fn error<T>(&self, message: impl Into<String>) -> ParseResult<T> {
        Err(DocParseError {
            line: self.line(),
            message: message.into(),
        })
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => self.error(format!("expected '{}', found '{}'", expected, c)),
            None => self.error(format!("expected '{}', found end of docblock", expected)),
        }
    }

    /// Advances to the next `@name` that starts a line or follows
    /// whitespace and returns the name as written.
    fn next_annotation_name(&mut self) -> Option<String> {
        while let Some(c) = self.bump() {
            if c != '@' {
                continue;
            }
            let at = self.pos - 1;
            let standalone = at == 0 || self.chars[at - 1].is_whitespace();
            if standalone && self.peek().is_some_and(is_ident_start) {
                return Some(self.identifier());
            }
        }
        None
    }

    /// Reads a name; `\` separates namespace segments and `::` introduces a
    /// class constant.
    fn identifier(&mut self) -> String {
        let mut ident = String::new();
        loop {
            match self.peek() {
                Some(c) if is_ident_char(c) => {
                    ident.push(c);
                    self.pos += 1;
                }
                Some(':') if self.peek_at(1) == Some(':') => {
                    ident.push_str("::");
                    self.pos += 2;
                }
                _ => break,
            }
        }
        ident
    }

    fn arguments(&mut self) -> ParseResult<Arguments> {
        self.expect('(')?;
        let mut args = Arguments::default();

        loop {
            self.skip_whitespace();
            if self.peek() == Some(')') {
                self.pos += 1;
                return Ok(args);
            }

            match self.named_key() {
                Some(key) => {
                    let value = self.value()?;
                    if args.named.insert(key.clone(), value).is_some() {
                        return self.error(format!("duplicate argument '{}'", key));
                    }
                }
                None => {
                    let value = self.value()?;
                    args.positional.push(value);
                }
            }

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(')') => {}
                Some(c) => return self.error(format!("expected ',' or ')', found '{}'", c)),
                None => return self.error("unterminated argument list"),
            }
        }
    }

    /// Consumes `name =` when present, leaving the cursor on the value.
    fn named_key(&mut self) -> Option<String> {
        let start = self.pos;
        if !self.peek().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') {
            return None;
        }
        let key = self.identifier();
        self.skip_whitespace();
        if self.peek() == Some('=') {
            self.pos += 1;
            Some(key)
        } else {
            self.pos = start;
            None
        }
    }

    fn value(&mut self) -> ParseResult<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some('"') => self.string().map(Value::String),
            Some('{') => self.array(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some('@') => self.error("nested annotations are not supported"),
            Some(c) if is_ident_start(c) => {
                let ident = self.identifier();
                match ident.to_ascii_lowercase().as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    _ if ident.contains("::") => Ok(Value::Constant(ident)),
                    _ => self.error(format!("unexpected identifier '{}'", ident)),
                }
            }
            Some(c) => self.error(format!("unexpected character '{}'", c)),
            None => self.error("expected a value, found end of docblock"),
        }
    }

    /// Double-quoted string; `""` stands for a literal quote.
    fn string(&mut self) -> ParseResult<String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') if self.peek() == Some('"') => {
                    self.pos += 1;
                    out.push('"');
                }
                Some('"') => return Ok(out),
                Some(c) => out.push(c),
                None => return self.error("unterminated string"),
            }
        }
    }

    fn number(&mut self) -> ParseResult<Value> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut float = false;
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            float = true;
            self.pos += 1;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }

        let literal: String = self.chars[start..self.pos].iter().collect();
        let parsed = if float {
            literal.parse::<f64>().map(Value::Float).ok()
        } else {
            literal.parse::<i64>().map(Value::Integer).ok()
        };
        match parsed {
            Some(value) => Ok(value),
            None => self.error(format!("invalid number '{}'", literal)),
        }
    }

    fn array(&mut self) -> ParseResult<Value> {
        self.expect('{')?;
        let mut entries = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Value::Array(entries));
            }

            let key = self.array_key()?;
            let value = self.value()?;
            entries.push((key, value));

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                Some(c) => return self.error(format!("expected ',' or '}}', found '{}'", c)),
                None => return self.error("unterminated array"),
            }
        }
    }

    /// Consumes `key =` or `key:` when present. Keys may be strings, bare
    /// names or integers.
    fn array_key(&mut self) -> ParseResult<Option<String>> {
        let start = self.pos;
        let key = match self.peek() {
            Some('"') => self.string()?,
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
            Some(c) if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(d) = self.peek().filter(|d| d.is_ascii_digit()) {
                    digits.push(d);
                    self.pos += 1;
                }
                digits
            }
            _ => return Ok(None),
        };

        self.skip_whitespace();
        match self.peek() {
            Some('=') | Some(':') => {
                self.pos += 1;
                Ok(Some(key))
            }
            _ => {
                self.pos = start;
                Ok(None)
            }
        }
    }
}
