//! Skipping disabled sections without evaluating them.
//!
//! The skipper only tracks lexical structure: string literals, identifiers,
//! numbers and body blocks are stepped over as units, so a `>` inside any of
//! them is never taken for the end of the section. Nothing is looked up and
//! no value is allocated.

use crate::evaluator::{EvalError, EvalErrorKind};
use crate::lexer::{self, Lexer, Token};

pub struct SectionSkipper<'src> {
    source: &'src str,
    depth: usize,
    max_depth: usize,
}

impl<'src> SectionSkipper<'src> {
    pub fn new(source: &'src str, max_depth: usize) -> Self {
        Self {
            source,
            depth: 0,
            max_depth,
        }
    }

    /// Skip a section body starting at `position`, just after its `<"key">`
    /// header.
    ///
    /// Returns the offset to resume at: just past the closing `>`, or at the
    /// segment end or next section header, which close the section without
    /// being consumed.
    pub fn skip_section(&mut self, position: usize) -> Result<usize, EvalError> {
        let mut lexer = Lexer::new(self.source, position);
        loop {
            match lexer.token() {
                Token::SectionClose => return Ok(lexer.position() + 1),
                Token::SegmentEnd | Token::SectionOpen => return Ok(lexer.position()),
                Token::Eof => {
                    return Err(EvalError::new(EvalErrorKind::UnclosedSection, position));
                }
                _ => self.skip_token(&mut lexer)?,
            }
        }
    }

    /// Skip a body block whose text starts at `start`, just after its `{`.
    ///
    /// Returns the offset just past the closing `}`.
    pub fn skip_body(&mut self, start: usize) -> Result<usize, EvalError> {
        self.enter(start)?;
        let bytes = self.source.as_bytes();
        let mut i = start;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if bytes.get(i + 1).copied().is_some_and(lexer::is_body_escape) => i += 2,
                b'`' => i = self.skip_segment(i)? + 1,
                b'}' => {
                    self.depth -= 1;
                    return Ok(i + 1);
                }
                _ => i += 1,
            }
        }
        Err(EvalError::new(
            EvalErrorKind::UnterminatedBody,
            start.saturating_sub(1),
        ))
    }

    /// Skip a code segment opened by the backtick at `open`.
    ///
    /// Returns the offset of the closing backtick.
    pub fn skip_segment(&mut self, open: usize) -> Result<usize, EvalError> {
        self.enter(open)?;
        let mut lexer = Lexer::new(self.source, open + 1);
        loop {
            match lexer.token() {
                Token::SegmentEnd => {
                    self.depth -= 1;
                    return Ok(lexer.position());
                }
                Token::Eof => {
                    return Err(EvalError::new(EvalErrorKind::UnterminatedSegment, open));
                }
                _ => self.skip_token(&mut lexer)?,
            }
        }
    }

    fn skip_token(&mut self, lexer: &mut Lexer<'src>) -> Result<(), EvalError> {
        let position = lexer.position();
        match lexer.token() {
            Token::String => {
                let end = lexer::string_literal_end(self.source, position)
                    .ok_or_else(|| EvalError::new(EvalErrorKind::UnterminatedString, position))?;
                lexer.seek(end + 1);
            }
            Token::Variable => {
                lexer.seek(lexer::identifier_end(self.source, position));
            }
            Token::Number => {
                lexer.seek(lexer::digits_end(self.source, position));
            }
            Token::BodyOpen => {
                let end = self.skip_body(position + 1)?;
                lexer.seek(end);
            }
            Token::Unknown => {
                return Err(EvalError::new(
                    EvalErrorKind::UnexpectedToken {
                        found: Token::Unknown.describe(),
                        expected: "a template token",
                    },
                    position,
                ));
            }
            _ => {
                lexer.advance();
            }
        }
        Ok(())
    }

    fn enter(&mut self, offset: usize) -> Result<(), EvalError> {
        if self.depth >= self.max_depth {
            return Err(EvalError::new(
                EvalErrorKind::DepthExceeded(self.max_depth),
                offset,
            ));
        }
        self.depth += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "skipper_test.rs"]
mod skipper_test;
