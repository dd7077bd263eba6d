//! Lexical scanner for TypeScript and JavaScript source text.
//!
//! The scanner is lossless: whitespace, line breaks and comments are returned as
//! tokens instead of being skipped, so the concatenated token texts always equal
//! the input. Template literals are split the way TypeScript's own scanner splits
//! them: a backtick scans up to the first `${` and the caller asks for a rescan
//! when it reaches the `}` that closes a substitution.

mod token;

pub use token::{Token, TokenKind};

use unicode_xid::UnicodeXID;

/// Punctuators longer than one character, longest first.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==", "!=",
    "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=",
    "^=", "**", "<<", ">>",
];

/// Keywords after which a `/` starts a regular expression rather than a division.
const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "instanceof",
    "in",
    "of",
    "new",
    "delete",
    "void",
    "throw",
    "case",
    "do",
    "else",
    "yield",
    "await",
];

/// Scans a fixed source text into tokens, one at a time.
pub struct Scanner<'a> {
    source: &'a str,
    /// Cursor; also the end of the current token
    pos: usize,
    token_start: usize,
    token: TokenKind,
    unterminated: bool,
    /// Whether a `/` at the cursor would start a regular expression
    regex_allowed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            token_start: 0,
            token: TokenKind::Unknown,
            unterminated: false,
            regex_allowed: true,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    /// Text of the most recently scanned token.
    pub fn token_text(&self) -> &'a str {
        &self.source[self.token_start..self.pos]
    }

    fn current(&self) -> Token<'a> {
        Token {
            kind: self.token,
            start: self.token_start,
            end: self.pos,
            text: self.token_text(),
            unterminated: self.unterminated,
        }
    }

    /// Scan the next token. Once the input is exhausted every call returns
    /// an empty `EndOfInput` token positioned at the end of the source.
    pub fn next_token(&mut self) -> Token<'a> {
        self.token_start = self.pos;
        self.unterminated = false;

        let Some(ch) = self.peek() else {
            self.token = TokenKind::EndOfInput;
            return self.current();
        };

        self.token = match ch {
            '\r' => {
                self.pos += 1;
                if self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
                TokenKind::NewLine
            }
            c if is_line_break(c) => {
                self.bump(c);
                TokenKind::NewLine
            }
            '#' if self.pos == 0 && self.byte_at(1) == Some(b'!') => {
                self.skip_to_line_end();
                TokenKind::Shebang
            }
            '/' => match self.byte_at(1) {
                Some(b'/') => {
                    self.skip_to_line_end();
                    TokenKind::LineComment
                }
                Some(b'*') => self.scan_block_comment(),
                _ => self.scan_slash(),
            },
            '`' => self.scan_template_text(true),
            '\'' | '"' => self.scan_string(ch),
            '{' => {
                self.pos += 1;
                TokenKind::OpenBrace
            }
            '}' => {
                self.pos += 1;
                TokenKind::CloseBrace
            }
            c if c.is_ascii_digit() => self.scan_number(),
            '.' if self.byte_at(1).is_some_and(|b| b.is_ascii_digit()) => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            c if is_white_space_single_line(c) => self.scan_whitespace(),
            c if c.is_ascii_punctuation() => self.scan_punctuation(),
            c => {
                self.bump(c);
                TokenKind::Unknown
            }
        };

        self.update_regex_context();
        self.current()
    }

    /// Reinterpret the current `}` as the continuation of a template literal.
    ///
    /// Scanning restarts at the brace and runs as template text up to the next
    /// `${` ([`TokenKind::TemplateLiteralContinuation`]) or closing backtick
    /// ([`TokenKind::TemplateLiteralEnd`]). Running out of input yields an
    /// unterminated `TemplateLiteralEnd`. When the current token is not a `}`
    /// nothing is rescanned and the current token is returned unchanged.
    pub fn rescan_template_continuation(&mut self) -> Token<'a> {
        if self.token != TokenKind::CloseBrace {
            return self.current();
        }
        self.pos = self.token_start;
        self.unterminated = false;
        self.token = self.scan_template_text(false);
        self.update_regex_context();
        self.current()
    }

    // ========================================================================
    // Character access
    // ========================================================================

    #[inline]
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    #[inline]
    fn bump(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    fn skip_to_line_end(&mut self) {
        self.pos = match self.source[self.pos..].find(is_line_break) {
            Some(offset) => self.pos + offset,
            None => self.source.len(),
        };
    }

    // ========================================================================
    // Token-specific scanning
    // ========================================================================

    fn scan_block_comment(&mut self) -> TokenKind {
        match self.source[self.pos + 2..].find("*/") {
            Some(offset) => self.pos += 2 + offset + 2,
            None => {
                self.pos = self.source.len();
                self.unterminated = true;
            }
        }
        TokenKind::BlockComment
    }

    fn scan_whitespace(&mut self) -> TokenKind {
        while let Some(c) = self.peek() {
            if !is_white_space_single_line(c) {
                break;
            }
            self.bump(c);
        }
        TokenKind::Whitespace
    }

    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.bump(quote);
        loop {
            let Some(c) = self.peek() else {
                self.unterminated = true;
                break;
            };
            if c == quote {
                self.bump(c);
                break;
            }
            if is_line_break(c) {
                self.unterminated = true;
                break;
            }
            self.bump(c);
            if c == '\\' {
                self.skip_escaped_char();
            }
        }
        TokenKind::StringLiteral
    }

    /// Skip the character after a backslash; `\r\n` counts as one.
    fn skip_escaped_char(&mut self) {
        match self.peek() {
            Some('\r') => {
                self.pos += 1;
                if self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            Some(c) => self.bump(c),
            None => {}
        }
    }

    /// Scan template text starting at a backtick (`from_backtick`) or at the
    /// `}` closing a substitution.
    fn scan_template_text(&mut self, from_backtick: bool) -> TokenKind {
        // Opening backtick or closing brace; both are one byte.
        self.pos += 1;
        loop {
            let Some(c) = self.peek() else {
                self.unterminated = true;
                break;
            };
            match c {
                '`' => {
                    self.pos += 1;
                    break;
                }
                '$' if self.byte_at(1) == Some(b'{') => {
                    self.pos += 2;
                    return if from_backtick {
                        TokenKind::TemplateLiteralStart
                    } else {
                        TokenKind::TemplateLiteralContinuation
                    };
                }
                '\\' => {
                    self.pos += 1;
                    self.skip_escaped_char();
                }
                _ => self.bump(c),
            }
        }
        if from_backtick {
            TokenKind::NoSubstitutionTemplate
        } else {
            TokenKind::TemplateLiteralEnd
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        let prefixed = self.byte_at(0) == Some(b'0')
            && matches!(
                self.byte_at(1),
                Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O')
            );
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-')
                && !prefixed
                && matches!(self.source.as_bytes()[self.pos - 1], b'e' | b'E');
            if c == '.' {
                if seen_dot || prefixed {
                    break;
                }
                seen_dot = true;
            } else if !(c.is_ascii_alphanumeric() || c == '_' || exponent_sign) {
                break;
            }
            self.bump(c);
        }
        TokenKind::NumericLiteral
    }

    fn scan_identifier(&mut self) -> TokenKind {
        while let Some(c) = self.peek() {
            if !is_identifier_part(c) {
                break;
            }
            self.bump(c);
        }
        TokenKind::Identifier
    }

    fn scan_slash(&mut self) -> TokenKind {
        if self.regex_allowed && self.scan_regex() {
            return TokenKind::RegexLiteral;
        }
        self.scan_punctuation()
    }

    /// Try to scan a regular expression literal at the cursor. Leaves the
    /// cursor untouched and returns `false` when no closing `/` precedes the
    /// end of the line.
    fn scan_regex(&mut self) -> bool {
        let body_start = self.pos + 1;
        let mut chars = self.source[body_start..].char_indices();
        let mut in_class = false;
        while let Some((offset, c)) = chars.next() {
            match c {
                c if is_line_break(c) => return false,
                '\\' => match chars.next() {
                    Some((_, escaped)) if is_line_break(escaped) => return false,
                    Some(_) => {}
                    None => return false,
                },
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    self.pos = body_start + offset + 1;
                    // Flags
                    while let Some(flag) = self.peek() {
                        if !is_identifier_part(flag) {
                            break;
                        }
                        self.bump(flag);
                    }
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    fn scan_punctuation(&mut self) -> TokenKind {
        let rest = &self.source[self.pos..];
        let matched = PUNCTUATORS.iter().find(|p| {
            rest.starts_with(**p)
                // `a?.5:b` is a conditional, not optional chaining
                && !(**p == "?." && rest.as_bytes().get(2).is_some_and(|b| b.is_ascii_digit()))
        });
        self.pos += matched.map_or(1, |p| p.len());
        TokenKind::Punctuation
    }

    /// Track whether the next `/` can begin a regular expression, based on the
    /// last significant token.
    fn update_regex_context(&mut self) {
        let text = self.token_text();
        self.regex_allowed = match self.token {
            kind if kind.is_trivia() => return,
            TokenKind::EndOfInput => return,
            TokenKind::Punctuation => !matches!(text, ")" | "]" | "++" | "--"),
            TokenKind::OpenBrace
            | TokenKind::CloseBrace
            | TokenKind::TemplateLiteralStart
            | TokenKind::TemplateLiteralContinuation
            | TokenKind::Unknown => true,
            TokenKind::Identifier => REGEX_PRECEDING_KEYWORDS.contains(&text),
            _ => false,
        };
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (token.kind != TokenKind::EndOfInput).then_some(token)
    }
}

/// 1-based line and column (in characters) of a byte offset.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let prefix = &source[..offset.min(source.len())];
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
    let column = prefix[line_start..].chars().count() + 1;
    (line, column)
}

fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_white_space_single_line(ch: char) -> bool {
    ch == '\u{FEFF}' || (ch.is_whitespace() && !is_line_break(ch))
}

/// Check if a character can start an identifier.
fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_ascii_alphabetic() || (!ch.is_ascii() && ch.is_xid_start())
}

/// Check if a character can be part of an identifier.
fn is_identifier_part(ch: char) -> bool {
    ch == '_'
        || ch == '$'
        || ch.is_ascii_alphanumeric()
        || (!ch.is_ascii() && (ch.is_xid_continue() || ch == '\u{200C}' || ch == '\u{200D}'))
}
