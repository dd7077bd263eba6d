/// Lexical categories produced by the scanner.
///
/// Trivia (whitespace, line breaks, comments) is reported as tokens so that every
/// byte of the source reaches the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `/* ... */`, including JSDoc-style `/** ... */`
    BlockComment,
    /// `// ...` up to (not including) the line break
    LineComment,
    /// A run of horizontal whitespace
    Whitespace,
    /// A single line break (`\r\n` counts as one)
    NewLine,
    /// `#!...` on the very first line
    Shebang,
    /// `` `text${ `` opening a template with substitutions
    TemplateLiteralStart,
    /// `}text${` between two substitutions, only produced by a rescan
    TemplateLiteralContinuation,
    /// `` }text` `` closing a template, only produced by a rescan
    TemplateLiteralEnd,
    /// `` `text` `` without substitutions
    NoSubstitutionTemplate,
    StringLiteral,
    NumericLiteral,
    RegexLiteral,
    Identifier,
    OpenBrace,
    CloseBrace,
    Punctuation,
    Unknown,
    EndOfInput,
}

impl TokenKind {
    /// Whether this kind is whitespace or a comment.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::BlockComment
                | TokenKind::LineComment
                | TokenKind::Whitespace
                | TokenKind::NewLine
                | TokenKind::Shebang
        )
    }
}

/// A scanned token borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// `source[start..end]`
    pub text: &'a str,
    /// Set when input ended before the token's closing delimiter
    pub unterminated: bool,
}
