use serde::Deserialize;

/// What to do when input ends inside a template literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnterminatedPolicy {
    /// Fail the conversion
    #[default]
    Error,
    /// Keep everything consumed so far as the literal and record a warning
    Truncate,
}

/// Options for converting a single source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Info string written after the opening code fence
    pub fence_lang: String,
    /// Handling of unterminated template literals
    pub unterminated: UnterminatedPolicy,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            fence_lang: "typescript".to_string(),
            unterminated: UnterminatedPolicy::Error,
        }
    }
}
