//! Tokenizer for SQL-like statement text.
//!
//! The lexer knows just enough SQL to tell literals apart from everything
//! else: quoted strings, numbers, quoted identifiers, comments and named
//! parameter spans. It never rejects input except for a delimiter that is
//! opened and never closed, which it reports as [`Unterminated`].

use std::fmt;

/// Classification of a lexed span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// A string or numeric literal.
    Literal,
    /// A keyword, a bare or quoted identifier, or a word that starts with a digit.
    Identifier,
    /// A `{name: Type}` named parameter or a `$1` positional parameter.
    ParameterSpan,
    /// Any other single character, `?` included.
    Punctuation,
    Whitespace,
    Comment,
}

/// A span of the input and its classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind,
    pub(crate) text: &'a str,
}

impl Token<'_> {
    /// `true` for an identifier written inside `"..."` or `` `...` ``.
    pub(crate) fn is_quoted(&self) -> bool {
        self.kind == TokenKind::Identifier && self.text.starts_with(['"', '`'])
    }
}

/// An opening delimiter without its closing counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Unterminated {
    /// Byte offset of the opening delimiter.
    pub(crate) start: usize,
    /// What was left open.
    pub(crate) what: &'static str,
}

impl fmt::Display for Unterminated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unterminated {} at byte {}", self.what, self.start)
    }
}

/// Iterator over the tokens of a statement.
///
/// Yields `Err` at most once; iteration stops after it.
#[derive(Clone, Debug)]
pub(crate) struct Lexer<'a> {
    text: &'a str,
    pos: usize,
    cut: bool,
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// A lexer over `text`; `cut` marks text that was cut short by a size limit.
    ///
    /// A string literal running into the end of cut text is still a literal,
    /// since its closing quote was removed along with the tail.
    pub(crate) fn new(text: &'a str, cut: bool) -> Self {
        Self {
            text,
            pos: 0,
            cut,
            failed: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn emit(&mut self, kind: TokenKind, len: usize) -> Token<'a> {
        let text: &'a str = self.text;
        let start = self.pos;
        self.pos += len;
        Token {
            kind,
            text: &text[start..self.pos],
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token<'a> {
        let len = self.rest().chars().next().map_or(0, char::len_utf8);
        self.emit(kind, len)
    }

    fn take_while(&mut self, kind: TokenKind, pred: fn(char) -> bool) -> Token<'a> {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.emit(kind, len)
    }

    fn string_literal(&mut self) -> Result<Token<'a>, Unterminated> {
        let rest = self.rest();
        match closing_quote(rest, b'\'') {
            Some(len) => Ok(self.emit(TokenKind::Literal, len)),
            None if self.cut => Ok(self.emit(TokenKind::Literal, rest.len())),
            None => Err(Unterminated {
                start: self.pos,
                what: "string literal",
            }),
        }
    }

    fn quoted_identifier(&mut self, quote: u8) -> Result<Token<'a>, Unterminated> {
        match closing_quote(self.rest(), quote) {
            Some(len) => Ok(self.emit(TokenKind::Identifier, len)),
            None => Err(Unterminated {
                start: self.pos,
                what: "quoted identifier",
            }),
        }
    }

    fn line_comment(&mut self) -> Token<'a> {
        let rest = self.rest();
        let len = rest.find('\n').unwrap_or(rest.len());
        self.emit(TokenKind::Comment, len)
    }

    fn block_comment(&mut self) -> Result<Token<'a>, Unterminated> {
        match self.rest()[2..].find("*/") {
            Some(i) => Ok(self.emit(TokenKind::Comment, i + 4)),
            None => Err(Unterminated {
                start: self.pos,
                what: "block comment",
            }),
        }
    }

    fn parameter_span(&mut self) -> Option<Token<'a>> {
        let len = parameter_span_len(self.rest())?;
        Some(self.emit(TokenKind::ParameterSpan, len))
    }

    /// `$1`, `$23`: the `$` and the word that follows it.
    fn positional_parameter(&mut self) -> Token<'a> {
        let tail = &self.rest()[1..];
        let len = 1 + tail.find(|c: char| !is_ident_char(c)).unwrap_or(tail.len());
        self.emit(TokenKind::ParameterSpan, len)
    }

    fn number(&mut self) -> Token<'a> {
        let rest = self.rest();
        let bytes = rest.as_bytes();

        let hex = (rest.starts_with("0x") || rest.starts_with("0X"))
            && bytes.get(2).is_some_and(u8::is_ascii_hexdigit);
        let mut end = if hex {
            2 + bytes[2..].iter().take_while(|b| b.is_ascii_hexdigit()).count()
        } else {
            digits(bytes, 0)
        };

        if !hex {
            if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
                end += 1 + digits(bytes, end + 1);
            }
            if matches!(bytes.get(end), Some(b'e' | b'E')) {
                let mut exp = end + 1;
                if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                    exp += 1;
                }
                if bytes.get(exp).is_some_and(u8::is_ascii_digit) {
                    end = exp + digits(bytes, exp);
                }
            }
        }

        // Digits glued to identifier characters form a word, not a literal.
        if rest[end..].starts_with(is_ident_char) {
            let tail = &rest[end..];
            let word = end + tail.find(|c: char| !is_ident_char(c)).unwrap_or(tail.len());
            return self.emit(TokenKind::Identifier, word);
        }
        self.emit(TokenKind::Literal, end)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, Unterminated>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let rest = self.rest();
        let first = rest.chars().next()?;

        let result = match first {
            c if c.is_whitespace() => Ok(self.take_while(TokenKind::Whitespace, char::is_whitespace)),
            '\'' => self.string_literal(),
            '"' => self.quoted_identifier(b'"'),
            '`' => self.quoted_identifier(b'`'),
            '-' if rest.starts_with("--") => Ok(self.line_comment()),
            '/' if rest.starts_with("/*") => self.block_comment(),
            '{' => Ok(match self.parameter_span() {
                Some(token) => token,
                None => self.single(TokenKind::Punctuation),
            }),
            '$' if rest[1..].starts_with(|c: char| c.is_ascii_digit()) => {
                Ok(self.positional_parameter())
            }
            c if c.is_ascii_digit() => Ok(self.number()),
            c if is_ident_start(c) => Ok(self.take_while(TokenKind::Identifier, is_ident_char)),
            _ => Ok(self.single(TokenKind::Punctuation)),
        };

        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn digits(bytes: &[u8], from: usize) -> usize {
    bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Length of a quoted run starting at `text[0] == quote`, closing quote
/// included. A doubled quote inside the run is an escaped quote; inside a
/// string literal, so is any byte after a backslash.
fn closing_quote(text: &str, quote: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let backslash_escapes = quote == b'\'';
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if backslash_escapes => i += 2,
            b if b == quote && bytes.get(i + 1) == Some(&quote) => i += 2,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Length of a `{name: Type}` span at the start of `text`, if there is one.
fn parameter_span_len(text: &str) -> Option<usize> {
    let name = text.strip_prefix('{')?.trim_start();
    if !name.starts_with(is_ident_start) {
        return None;
    }
    let name_len = name.find(|c: char| !is_ident_char(c)).unwrap_or(name.len());
    let type_part = name[name_len..].trim_start().strip_prefix(':')?;

    if !type_part.trim_start().starts_with(is_ident_start) {
        return None;
    }
    let close = type_part.find(|c: char| matches!(c, '}' | '{' | '\'' | '"' | '\n' | ';'))?;
    if !type_part[close..].starts_with('}') {
        return None;
    }

    // Every slice above is a suffix of `text`, so offsets line up.
    Some(text.len() - type_part.len() + close + 1)
}
