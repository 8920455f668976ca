//! Recursive-descent evaluator for code segments.
//!
//! There is no syntax tree: each segment is interpreted straight from the
//! source as it is scanned. Every segment evaluation works on its own
//! [`Lexer`] cursor, so a segment nested in a body block never disturbs the
//! position of the segment that contains it.
//!
//! Transient values (literals, copies of variables, range elements) are
//! allocated in the engine's [`ValueArena`] and released once the statement
//! that produced them has been rendered. Output fragments and body texts live
//! in a scratch [`Bump`] that the engine resets before every cook.

mod error;

pub use error::{ErrorCategory, EvalError, EvalErrorKind};

use crate::lexer::{self, Lexer, Token};
use crate::skipper::SectionSkipper;
use crate::store::{Scope, VariableStore};
use crate::values::{Value, ValueArena, ValueId};
use crate::{String, ToOwned, ToString, Vec};

use bumpalo::Bump;
use bumpalo::collections::{String as BumpString, Vec as BumpVec};

pub struct Evaluator<'e> {
    source: &'e str,
    store: &'e VariableStore,
    arena: &'e mut ValueArena,
    scratch: &'e Bump,
    /// Values allocated for the statements being evaluated, innermost last.
    transient: Vec<ValueId>,
    depth: usize,
    max_depth: usize,
    max_range_len: usize,
}

impl<'e> Evaluator<'e> {
    pub fn new(
        source: &'e str,
        store: &'e VariableStore,
        arena: &'e mut ValueArena,
        scratch: &'e Bump,
        max_depth: usize,
        max_range_len: usize,
    ) -> Self {
        Self {
            source,
            store,
            arena,
            scratch,
            transient: Vec::new(),
            depth: 0,
            max_depth,
            max_range_len,
        }
    }

    /// Substitute every code segment of the source and append the result to
    /// `output`.
    ///
    /// On failure every transient value is released and `output` holds a
    /// partial result that the caller should discard.
    pub fn cook(&mut self, output: &mut String) -> Result<(), EvalError> {
        let result = self.cook_text(output);
        if result.is_err() {
            self.release_transients(0);
        }
        result
    }

    fn cook_text(&mut self, output: &mut String) -> Result<(), EvalError> {
        let source = self.source;
        let bytes = source.as_bytes();
        output.reserve(source.len());

        let mut i = 0;
        let mut run = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if bytes.get(i + 1) == Some(&b'`') => {
                    output.push_str(&source[run..i]);
                    output.push('`');
                    i += 2;
                    run = i;
                }
                b'`' => {
                    output.push_str(&source[run..i]);
                    let (text, close) = self.eval_segment(i)?;
                    output.push_str(text);
                    i = close + 1;
                    run = i;
                }
                _ => i += 1,
            }
        }
        output.push_str(&source[run..]);
        Ok(())
    }

    /// Evaluate the segment opened by the backtick at `open`.
    ///
    /// Returns the rendered text and the offset of the closing backtick.
    fn eval_segment(&mut self, open: usize) -> Result<(&'e str, usize), EvalError> {
        self.enter(open)?;
        tracing::trace!(offset = open, depth = self.depth, "Evaluating segment");

        let mut lexer = Lexer::new(self.source, open + 1);
        let mut fragments = BumpVec::new_in(self.scratch);
        loop {
            self.eval_statements(&mut lexer, &mut fragments)?;
            match lexer.token() {
                Token::SegmentEnd => break,
                Token::Number
                | Token::String
                | Token::Variable
                | Token::ListOpen
                | Token::SectionOpen => continue,
                Token::Eof => {
                    return Err(EvalError::new(EvalErrorKind::UnterminatedSegment, open));
                }
                Token::SectionClose => {
                    return Err(EvalError::new(
                        EvalErrorKind::StraySectionClose,
                        lexer.position(),
                    ));
                }
                found => return Err(unexpected(&lexer, found, "a statement or '`'")),
            }
        }

        self.depth -= 1;
        Ok((self.concat(&fragments), lexer.position()))
    }

    /// Evaluate an optional section header and the statements that follow it,
    /// up to the section close or the first token that cannot start a
    /// statement.
    fn eval_statements(
        &mut self,
        lexer: &mut Lexer<'e>,
        fragments: &mut BumpVec<'e, &'e str>,
    ) -> Result<(), EvalError> {
        let mut section = None;
        if lexer.token() == Token::SectionOpen {
            let key = self.parse_section_header(lexer)?;
            if !self.store.is_section_enabled(&key) {
                tracing::debug!(section = %key, "Skipping disabled section");
                let resume = SectionSkipper::new(self.source, self.max_depth)
                    .skip_section(lexer.position())?;
                lexer.seek(resume);
                return Ok(());
            }
            section = Some(key);
        }

        loop {
            let fragment = match lexer.token() {
                Token::Number | Token::String | Token::Variable => {
                    self.eval_atomic_statement(lexer, section.as_deref())?
                }
                Token::ListOpen => self.eval_list_statement(lexer, section.as_deref())?,
                Token::SectionClose if section.is_some() => {
                    lexer.advance();
                    return Ok(());
                }
                _ => return Ok(()),
            };
            fragments.push(fragment);
        }
    }

    fn parse_section_header(&mut self, lexer: &mut Lexer<'e>) -> Result<String, EvalError> {
        lexer.advance();
        if lexer.token() != Token::String {
            return Err(unexpected(lexer, lexer.token(), "a quoted section key"));
        }
        let key = self.parse_string(lexer)?;
        if lexer.token() != Token::SectionClose {
            return Err(unexpected(lexer, lexer.token(), "'>' after the section key"));
        }
        lexer.advance();
        Ok(key)
    }

    fn eval_atomic_statement(
        &mut self,
        lexer: &mut Lexer<'e>,
        section: Option<&str>,
    ) -> Result<&'e str, EvalError> {
        let mark = self.transient.len();
        let id = self.parse_atomic(lexer, section)?;
        let value = self.value(id, lexer.position())?.clone();

        let fragment = if lexer.token() == Token::BodyOpen {
            let (text, end) = self.eval_body(&value, lexer.position() + 1)?;
            lexer.seek(end);
            text
        } else {
            self.render(&value)
        };

        self.release_transients(mark);
        Ok(fragment)
    }

    fn eval_list_statement(
        &mut self,
        lexer: &mut Lexer<'e>,
        section: Option<&str>,
    ) -> Result<&'e str, EvalError> {
        let mark = self.transient.len();
        let elements = self.parse_list(lexer, section)?;

        let fragment = if lexer.token() == Token::BodyOpen {
            let open = lexer.position();
            let mut end = None;
            let mut outputs = BumpVec::new_in(self.scratch);
            self.eval_list_body(&elements, open + 1, &mut end, &mut outputs)?;
            // Only lists of empty lists leave the body unevaluated.
            let end = match end {
                Some(end) => end,
                None => SectionSkipper::new(self.source, self.max_depth).skip_body(open + 1)?,
            };
            lexer.seek(end);
            self.concat(&outputs)
        } else {
            let mut text = BumpString::new_in(self.scratch);
            for &id in &elements {
                self.value(id, lexer.position())?.render(&*self.arena, &mut text);
            }
            text.into_bump_str()
        };

        self.release_transients(mark);
        Ok(fragment)
    }

    /// Evaluate the body at `start` once per element, appending one output
    /// per element. A nested list contributes the concatenation of its own
    /// per-element outputs as a single entry.
    ///
    /// `end` receives the offset just past the body. Every evaluation of the
    /// same body must stop at the same place.
    fn eval_list_body(
        &mut self,
        elements: &[ValueId],
        start: usize,
        end: &mut Option<usize>,
        outputs: &mut BumpVec<'e, &'e str>,
    ) -> Result<(), EvalError> {
        for &id in elements {
            match self.value(id, start)?.clone() {
                Value::List(inner) => {
                    self.enter(start)?;
                    let mut nested = BumpVec::new_in(self.scratch);
                    self.eval_list_body(&inner, start, end, &mut nested)?;
                    self.depth -= 1;
                    outputs.push(self.concat(&nested));
                }
                value => {
                    let (text, body_end) = self.eval_body(&value, start)?;
                    match *end {
                        None => *end = Some(body_end),
                        Some(previous) if previous != body_end => {
                            return Err(EvalError::new(
                                EvalErrorKind::Internal(
                                    "body evaluations stopped at different offsets",
                                ),
                                start,
                            ));
                        }
                        Some(_) => {}
                    }
                    outputs.push(text);
                }
            }
        }
        Ok(())
    }

    /// Copy the body text starting at `start` (just after `{`), substituting
    /// `$` with `dollar` and evaluating nested segments.
    ///
    /// Returns the text and the offset just past the closing `}`.
    fn eval_body(&mut self, dollar: &Value, start: usize) -> Result<(&'e str, usize), EvalError> {
        let source = self.source;
        let bytes = source.as_bytes();
        let mut text = BumpString::new_in(self.scratch);

        let mut i = start;
        let mut run = start;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    if bytes.get(i + 1).copied().is_some_and(lexer::is_body_escape) {
                        // Drop the backslash, keep the escaped character.
                        text.push_str(&source[run..i]);
                        run = i + 1;
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                b'$' => {
                    text.push_str(&source[run..i]);
                    dollar.render(&*self.arena, &mut text);
                    i += 1;
                    run = i;
                }
                b'`' => {
                    text.push_str(&source[run..i]);
                    let (nested, close) = self.eval_segment(i)?;
                    text.push_str(nested);
                    i = close + 1;
                    run = i;
                }
                b'}' => {
                    text.push_str(&source[run..i]);
                    return Ok((text.into_bump_str(), i + 1));
                }
                _ => i += 1,
            }
        }

        Err(EvalError::new(
            EvalErrorKind::UnterminatedBody,
            start.saturating_sub(1),
        ))
    }

    /// Parse `[ element, ... ]` into transient values. Ranges are expanded in
    /// place; nested lists become a single list value.
    fn parse_list(
        &mut self,
        lexer: &mut Lexer<'e>,
        section: Option<&str>,
    ) -> Result<Vec<ValueId>, EvalError> {
        let open = lexer.position();
        self.enter(open)?;
        lexer.advance();
        if lexer.token() == Token::ListClose {
            return Err(EvalError::new(EvalErrorKind::EmptyList, open));
        }

        let mut elements = Vec::new();
        loop {
            match lexer.token() {
                Token::ListOpen => {
                    let inner = self.parse_list(lexer, section)?;
                    elements.push(self.temp(Value::List(inner)));
                }
                Token::Number | Token::String | Token::Variable => {
                    let from_offset = lexer.position();
                    let from = self.parse_atomic(lexer, section)?;
                    if lexer.token() == Token::Range {
                        let lo = self.range_operand(from, from_offset)?;
                        lexer.advance();
                        let to_offset = lexer.position();
                        if !lexer.token().is_atomic() {
                            return Err(unexpected(lexer, lexer.token(), "a range operand"));
                        }
                        let to = self.parse_atomic(lexer, section)?;
                        let hi = self.range_operand(to, to_offset)?;
                        if lo >= hi {
                            return Err(EvalError::new(
                                EvalErrorKind::InvalidRange { from: lo, to: hi },
                                from_offset,
                            ));
                        }
                        let len = hi.abs_diff(lo);
                        if len > self.max_range_len as u64 {
                            return Err(EvalError::new(
                                EvalErrorKind::RangeTooLong {
                                    len,
                                    max: self.max_range_len,
                                },
                                from_offset,
                            ));
                        }
                        elements.extend((lo..hi).map(|n| self.temp(Value::Number(n))));
                    } else {
                        elements.push(from);
                    }
                }
                found => return Err(unexpected(lexer, found, "a list element")),
            }

            match lexer.token() {
                Token::Comma => {
                    lexer.advance();
                }
                Token::ListClose => {
                    lexer.advance();
                    break;
                }
                found => return Err(unexpected(lexer, found, "',' or ']'")),
            }
        }

        self.depth -= 1;
        Ok(elements)
    }

    fn range_operand(&self, id: ValueId, offset: usize) -> Result<i64, EvalError> {
        let value = self.value(id, offset)?;
        value.as_number().ok_or_else(|| {
            EvalError::new(
                EvalErrorKind::RangeOperandNotNumber {
                    found: value.kind(),
                },
                offset,
            )
        })
    }

    /// Parse a number, string or variable reference into a transient value.
    fn parse_atomic(
        &mut self,
        lexer: &mut Lexer<'e>,
        section: Option<&str>,
    ) -> Result<ValueId, EvalError> {
        let start = lexer.position();
        let value = match lexer.token() {
            Token::Number => {
                let end = lexer::digits_end(self.source, start);
                let digits = &self.source[start..end];
                let number = digits.parse::<i64>().map_err(|_| {
                    EvalError::new(EvalErrorKind::NumberOutOfRange(digits.to_owned()), start)
                })?;
                lexer.seek(end);
                Value::Number(number)
            }
            Token::String => Value::String(self.parse_string(lexer)?),
            Token::Variable => {
                let end = lexer::identifier_end(self.source, start);
                let name = &self.source[start..end];
                let id = self
                    .store
                    .lookup_with_fallback(section, name)
                    .ok_or_else(|| {
                        EvalError::new(
                            EvalErrorKind::UnknownVariable {
                                name: name.to_string(),
                                scope: Scope::from_section(section).display_name().to_string(),
                            },
                            start,
                        )
                    })?;
                let value = self.value(id, start)?.clone();
                lexer.seek(end);
                value
            }
            found => return Err(unexpected(lexer, found, "a number, string or variable")),
        };
        Ok(self.temp(value))
    }

    /// Parse the string literal at the cursor, resolving `\\` and `\"`.
    fn parse_string(&mut self, lexer: &mut Lexer<'e>) -> Result<String, EvalError> {
        let start = lexer.position();
        let end = lexer::string_literal_end(self.source, start)
            .ok_or_else(|| EvalError::new(EvalErrorKind::UnterminatedString, start))?;

        let body = &self.source[start + 1..end];
        let bytes = body.as_bytes();
        let mut out = String::with_capacity(body.len());
        let mut i = 0;
        let mut run = 0;
        while i < bytes.len() {
            if bytes[i] == b'\\' && bytes.get(i + 1).copied().is_some_and(lexer::is_string_escape) {
                out.push_str(&body[run..i]);
                run = i + 1;
                i += 2;
            } else {
                i += 1;
            }
        }
        out.push_str(&body[run..]);

        lexer.seek(end + 1);
        Ok(out)
    }

    fn value(&self, id: ValueId, offset: usize) -> Result<&Value, EvalError> {
        self.arena.get(id).ok_or_else(|| {
            EvalError::new(
                EvalErrorKind::Internal("value handle no longer resolves"),
                offset,
            )
        })
    }

    fn temp(&mut self, value: Value) -> ValueId {
        let id = self.arena.acquire(value);
        self.transient.push(id);
        id
    }

    fn release_transients(&mut self, mark: usize) {
        for id in self.transient.drain(mark..) {
            self.arena.release(id);
        }
    }

    fn render(&self, value: &Value) -> &'e str {
        let mut text = BumpString::new_in(self.scratch);
        value.render(&*self.arena, &mut text);
        text.into_bump_str()
    }

    /// Join fragments with a single allocation.
    fn concat(&self, fragments: &[&'e str]) -> &'e str {
        let len = fragments.iter().map(|f| f.len()).sum();
        let mut text = BumpString::with_capacity_in(len, self.scratch);
        for fragment in fragments {
            text.push_str(fragment);
        }
        text.into_bump_str()
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

fn unexpected(lexer: &Lexer<'_>, found: Token, expected: &'static str) -> EvalError {
    EvalError::new(
        EvalErrorKind::UnexpectedToken {
            found: found.describe(),
            expected,
        },
        lexer.position(),
    )
}
