use std::fmt;

/// A non-fatal problem noticed while converting a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Byte offset the message refers to
    pub offset: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based column, in characters
    pub column: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}
