//! The segmentation state machine.
//!
//! Tokens are classified one at a time as prose (block comments) or code
//! (everything else, line comments included). A run ends when the
//! classification changes; the buffered run is then finalized into a
//! [`Segment`] and handed to a [`SegmentSink`].

use crate::error::{LiterateError, LiterateResult};
use crate::literal::{LiteralSpan, consume_template};
use crate::models::diagnostic::Diagnostic;
use crate::models::options::UnterminatedPolicy;
use crate::models::segment::{Segment, SegmentKind};
use crate::normalize::normalize_block_comment;
use crate::scanner::{Scanner, Token, TokenKind, line_column};
use std::ops::Range;

/// Receives finalized segments in source order.
pub trait SegmentSink<'a> {
    fn accept(&mut self, segment: Segment<'a>) -> LiterateResult<()>;
}

impl<'a> SegmentSink<'a> for Vec<Segment<'a>> {
    fn accept(&mut self, segment: Segment<'a>) -> LiterateResult<()> {
        self.push(segment);
        Ok(())
    }
}

/// Classification of the run currently being buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationState {
    #[default]
    Unset,
    InComment,
    InCode,
}

impl ClassificationState {
    fn segment_kind(self) -> Option<SegmentKind> {
        match self {
            ClassificationState::Unset => None,
            ClassificationState::InComment => Some(SegmentKind::Comment),
            ClassificationState::InCode => Some(SegmentKind::Code),
        }
    }
}

/// Whether the segmenter wants more tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

pub struct Segmenter<'a, S> {
    sink: S,
    state: ClassificationState,
    buffer: Vec<&'a str>,
    /// Source range of the buffered tokens
    span: Option<Range<usize>>,
    next_index: usize,
    policy: UnterminatedPolicy,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, S: SegmentSink<'a>> Segmenter<'a, S> {
    pub fn new(sink: S, policy: UnterminatedPolicy) -> Self {
        Self {
            sink,
            state: ClassificationState::Unset,
            buffer: Vec::new(),
            span: None,
            next_index: 0,
            policy,
            diagnostics: Vec::new(),
        }
    }

    pub fn state(&self) -> ClassificationState {
        self.state
    }

    /// Warnings recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Feed every token of `scanner` until end of input.
    pub fn run(&mut self, scanner: &mut Scanner<'a>) -> LiterateResult<()> {
        loop {
            let token = scanner.next_token();
            if self.feed(token, scanner)? == Flow::Halt {
                return Ok(());
            }
        }
    }

    /// Classify one token. `scanner` must be the scanner that produced it; a
    /// template start consumes the rest of its literal from it.
    pub fn feed(&mut self, token: Token<'a>, scanner: &mut Scanner<'a>) -> LiterateResult<Flow> {
        match token.kind {
            TokenKind::EndOfInput => {
                self.flush()?;
                return Ok(Flow::Halt);
            }
            TokenKind::BlockComment => {
                self.enter(ClassificationState::InComment)?;
                self.buffer.extend(normalize_block_comment(token.text));
                self.cover(token.start..token.end);
            }
            TokenKind::TemplateLiteralStart => {
                self.enter(ClassificationState::InCode)?;
                let literal = consume_template(scanner, &token);
                if !literal.terminated {
                    self.unterminated(scanner.source(), &literal)?;
                }
                self.buffer.push(literal.text(scanner.source()));
                self.cover(literal.range());
            }
            _ => {
                self.enter(ClassificationState::InCode)?;
                self.buffer.push(token.text);
                self.cover(token.start..token.end);
            }
        }
        Ok(Flow::Continue)
    }

    /// Finalize the buffered run, if any, and pass it to the sink.
    pub fn flush(&mut self) -> LiterateResult<()> {
        let Some(kind) = self.state.segment_kind() else {
            return Ok(());
        };
        if self.buffer.is_empty() {
            return Ok(());
        }

        let segment = Segment {
            kind,
            fragments: std::mem::take(&mut self.buffer),
            span: self.span.take().unwrap_or_default(),
            index: self.next_index,
        };
        self.next_index += 1;
        self.sink.accept(segment)
    }

    /// Give back the sink and the recorded warnings.
    pub fn into_parts(self) -> (S, Vec<Diagnostic>) {
        (self.sink, self.diagnostics)
    }

    fn enter(&mut self, state: ClassificationState) -> LiterateResult<()> {
        if self.state != state {
            self.flush()?;
            self.state = state;
        }
        Ok(())
    }

    fn cover(&mut self, range: Range<usize>) {
        self.span = Some(match self.span.take() {
            Some(span) => span.start..range.end,
            None => range,
        });
    }

    fn unterminated(&mut self, source: &str, literal: &LiteralSpan) -> LiterateResult<()> {
        let (line, column) = line_column(source, literal.start);
        match self.policy {
            UnterminatedPolicy::Error => Err(LiterateError::UnterminatedTemplate {
                offset: literal.start,
                line,
                column,
            }),
            UnterminatedPolicy::Truncate => {
                self.diagnostics.push(Diagnostic {
                    offset: literal.start,
                    line,
                    column,
                    message: "unterminated template literal, the rest of the input is kept as code"
                        .to_string(),
                });
                Ok(())
            }
        }
    }
}
