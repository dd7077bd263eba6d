// Literate - turns TypeScript and JavaScript sources into literate Markdown
// Re-export public modules and types

pub mod cli;
pub mod config;
pub mod error;
pub mod literal;
pub mod models;
pub mod normalize;
pub mod output;
pub mod processor;
pub mod scanner;
pub mod segmenter;
pub mod utils;

// Re-export main types for convenience
pub use error::{LiterateError, LiterateResult};
pub use models::diagnostic::Diagnostic;
pub use models::options::{ConvertOptions, UnterminatedPolicy};
pub use models::segment::{Segment, SegmentKind};
pub use processor::{Conversion, Processor, convert, convert_to_writer};
pub use scanner::{Scanner, Token, TokenKind};
pub use segmenter::{ClassificationState, SegmentSink, Segmenter};
