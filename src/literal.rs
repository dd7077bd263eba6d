//! Consumption of template literals with substitutions.
//!
//! A template's substitutions can hold arbitrary expressions: object literals
//! with their own braces and further templates nested to any depth. The
//! consumer keeps one brace counter per open substitution. A `}` that brings the
//! innermost counter to zero may be the end of that substitution, so the scanner
//! is asked to rescan it as template text; the answer is either another
//! substitution of the same template or that template's closing backtick.

use crate::scanner::{Scanner, Token, TokenKind};
use std::ops::Range;

/// Source range of a consumed template literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralSpan {
    pub start: usize,
    pub end: usize,
    /// False when input ran out before the outermost closing backtick
    pub terminated: bool,
    /// Deepest number of simultaneously open substitutions
    pub max_depth: usize,
}

impl LiteralSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The literal exactly as written in `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }
}

/// Consume the template literal opened by `head`, pulling tokens straight from
/// `scanner` until its closing backtick.
///
/// `head` must be the [`TokenKind::TemplateLiteralStart`] the scanner just
/// produced; its `${` counts as the first open substitution. On return the
/// scanner is positioned right after the literal.
pub fn consume_template(scanner: &mut Scanner<'_>, head: &Token<'_>) -> LiteralSpan {
    let mut depths: Vec<usize> = vec![1];
    let mut max_depth = 1;
    let mut end = head.end;

    let terminated = loop {
        let token = scanner.next_token();
        match token.kind {
            TokenKind::EndOfInput => break false,
            TokenKind::TemplateLiteralStart => {
                depths.push(1);
                max_depth = max_depth.max(depths.len());
                end = token.end;
            }
            TokenKind::OpenBrace => {
                if let Some(depth) = depths.last_mut() {
                    *depth += 1;
                }
                end = token.end;
            }
            TokenKind::CloseBrace => {
                end = token.end;
                // The loop ends as soon as the outermost literal closes, so
                // there is always an open substitution here.
                debug_assert!(!depths.is_empty());
                let Some(depth) = depths.last_mut() else {
                    break true;
                };
                *depth -= 1;
                if *depth > 0 {
                    continue;
                }

                let rescanned = scanner.rescan_template_continuation();
                end = rescanned.end;
                match rescanned.kind {
                    TokenKind::TemplateLiteralContinuation => *depth = 1,
                    _ if rescanned.unterminated => break false,
                    _ => {
                        depths.pop();
                        if depths.is_empty() {
                            break true;
                        }
                    }
                }
            }
            _ => end = token.end,
        }
    };

    LiteralSpan {
        start: head.start,
        end,
        terminated,
        max_depth,
    }
}
