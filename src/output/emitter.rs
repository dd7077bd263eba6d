use crate::error::LiterateResult;
use crate::models::segment::{Segment, SegmentKind};
use crate::segmenter::SegmentSink;
use std::io::{self, Write};

/// Writes segments as a literate Markdown document.
///
/// Comment segments become paragraphs, code segments become fenced blocks.
/// Blocks are separated by one blank line; a segment whose body renders empty
/// (whitespace between two comments, an empty `/**/`) is skipped entirely.
pub struct Emitter<W: Write> {
    writer: W,
    fence_lang: String,
    blocks_written: usize,
}

impl<W: Write> Emitter<W> {
    pub fn new(writer: W, fence_lang: impl Into<String>) -> Self {
        Self {
            writer,
            fence_lang: fence_lang.into(),
            blocks_written: 0,
        }
    }

    pub fn emit(&mut self, segment: &Segment<'_>) -> io::Result<()> {
        let body = segment.render_body();
        if body.is_empty() {
            return Ok(());
        }

        if self.blocks_written > 0 {
            writeln!(self.writer)?;
        }

        match segment.kind {
            SegmentKind::Comment => writeln!(self.writer, "{body}")?,
            SegmentKind::Code => {
                let fence = fence_for(&body);
                writeln!(self.writer, "{fence}{}", self.fence_lang)?;
                writeln!(self.writer, "{body}")?;
                writeln!(self.writer, "{fence}")?;
            }
        }

        self.blocks_written += 1;
        Ok(())
    }

    /// Number of blocks written so far.
    pub fn blocks_written(&self) -> usize {
        self.blocks_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<'a, W: Write> SegmentSink<'a> for Emitter<W> {
    fn accept(&mut self, segment: Segment<'a>) -> LiterateResult<()> {
        self.emit(&segment)?;
        Ok(())
    }
}

/// A backtick fence longer than any backtick run inside `body`, at least three.
fn fence_for(body: &str) -> String {
    let longest_run = body
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}
