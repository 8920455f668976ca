//! On-demand token classifier for code segments.
//!
//! The lexer never measures numbers, strings or identifiers: it only reports
//! that one starts at the current position. The consumer scans the full extent
//! with [`digits_end`], [`identifier_end`] or [`string_literal_end`] and then
//! repositions the lexer with [`Lexer::seek`].

/// Classified token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `<`
    SectionOpen,
    /// `>`
    SectionClose,
    /// `[`
    ListOpen,
    /// `]`
    ListClose,
    /// `{`
    BodyOpen,
    /// `}`
    BodyClose,
    /// A decimal digit.
    Number,
    /// A double quote.
    String,
    /// A letter or underscore.
    Variable,
    /// `,`
    Comma,
    /// `-`
    Range,
    /// A backtick.
    SegmentEnd,
    Eof,
    Unknown,
}

impl Token {
    /// Number of bytes consumed by [`Lexer::advance`].
    ///
    /// Literal and identifier starts are zero-width since the consumer scans
    /// their extent itself.
    pub fn width(self) -> usize {
        match self {
            Token::Number | Token::String | Token::Variable | Token::Eof | Token::Unknown => 0,
            _ => 1,
        }
    }

    /// Human readable name used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            Token::SectionOpen => "'<'",
            Token::SectionClose => "'>'",
            Token::ListOpen => "'['",
            Token::ListClose => "']'",
            Token::BodyOpen => "'{'",
            Token::BodyClose => "'}'",
            Token::Number => "number",
            Token::String => "string",
            Token::Variable => "variable",
            Token::Comma => "','",
            Token::Range => "'-'",
            Token::SegmentEnd => "'`'",
            Token::Eof => "end of input",
            Token::Unknown => "unknown character",
        }
    }

    /// True for tokens that start an atomic item.
    pub fn is_atomic(self) -> bool {
        matches!(self, Token::Number | Token::String | Token::Variable)
    }
}

/// Cursor over a template source.
///
/// The lexer is `Copy`: nested evaluations take their own cursor instead of
/// sharing one, so the outer scan position is never disturbed.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'src> {
    source: &'src str,
    position: usize,
    current: Token,
}

impl<'src> Lexer<'src> {
    /// Bind a cursor at `position` and peek the first token.
    pub fn new(source: &'src str, position: usize) -> Self {
        let mut lexer = Self {
            source,
            position,
            current: Token::Eof,
        };
        lexer.peek();
        lexer
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Byte offset of the current token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The most recently peeked token.
    pub fn token(&self) -> Token {
        self.current
    }

    /// Skip whitespace and classify the token at the cursor without consuming it.
    pub fn peek(&mut self) -> Token {
        let bytes = self.source.as_bytes();
        while let Some(b' ' | b'\t' | b'\n' | b'\r' | b'\x0b') = bytes.get(self.position) {
            self.position += 1;
        }
        self.current = match bytes.get(self.position) {
            None => Token::Eof,
            Some(b'`') => Token::SegmentEnd,
            Some(b'[') => Token::ListOpen,
            Some(b']') => Token::ListClose,
            Some(b'{') => Token::BodyOpen,
            Some(b'}') => Token::BodyClose,
            Some(b'<') => Token::SectionOpen,
            Some(b'>') => Token::SectionClose,
            Some(b'-') => Token::Range,
            Some(b',') => Token::Comma,
            Some(b'"') => Token::String,
            Some(b) if b.is_ascii_digit() => Token::Number,
            Some(&b) if is_identifier_start(b) => Token::Variable,
            Some(_) => Token::Unknown,
        };
        self.current
    }

    /// Commit the current token and peek the next one.
    pub fn advance(&mut self) -> Token {
        self.position += self.current.width();
        self.peek()
    }

    /// Move the cursor to `position` and peek the token there.
    pub fn seek(&mut self, position: usize) -> Token {
        self.position = position;
        self.peek()
    }
}

pub fn is_identifier_start(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphabetic()
}

pub fn is_identifier_continue(b: u8) -> bool {
    is_identifier_start(b) || b.is_ascii_digit()
}

/// End offset of the identifier starting at `start`.
pub fn identifier_end(source: &str, start: usize) -> usize {
    let bytes = source.as_bytes();
    let mut end = start + 1;
    while end < bytes.len() && is_identifier_continue(bytes[end]) {
        end += 1;
    }
    end
}

/// End offset of the digit run starting at `start`.
pub fn digits_end(source: &str, start: usize) -> usize {
    let bytes = source.as_bytes();
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

/// Escapes recognized inside string literals: `\\` and `\"`.
pub fn is_string_escape(b: u8) -> bool {
    matches!(b, b'\\' | b'"')
}

/// Escapes recognized inside body blocks: `\$` and `\t`. Both emit the
/// character after the backslash.
pub fn is_body_escape(b: u8) -> bool {
    matches!(b, b'$' | b't')
}

/// Offset of the closing quote of the string literal opened at `start`, or
/// `None` when the literal runs to the end of the source.
pub fn string_literal_end(source: &str, start: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1).copied().is_some_and(is_string_escape) => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// 1-based line and column of `offset`, found by rescanning from the start.
///
/// Columns count characters, not bytes.
pub fn location(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let mut line = 1;
    let mut column = 1;
    for c in source[..floor_char_boundary(source, offset)].chars() {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

fn floor_char_boundary(source: &str, mut offset: usize) -> usize {
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
#[path = "lexer_test.rs"]
mod lexer_test;
