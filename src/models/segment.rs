use std::ops::Range;

/// What a segment is rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Prose taken from block comments
    Comment,
    /// Source code, rendered as a fenced block
    Code,
}

/// A maximal run of tokens that share one classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    /// Comment lines (markers stripped) or verbatim code pieces, in order
    pub fragments: Vec<&'a str>,
    /// Source range covered by the segment's tokens
    pub span: Range<usize>,
    /// Position among all segments of the same input, starting at 0
    pub index: usize,
}

impl<'a> Segment<'a> {
    pub fn is_comment(&self) -> bool {
        self.kind == SegmentKind::Comment
    }

    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }

    /// Body as it appears in the document, before any fencing.
    ///
    /// Comment lines are joined with newlines and trimmed; code is concatenated
    /// with leading line breaks removed and trailing whitespace trimmed.
    pub fn render_body(&self) -> String {
        match self.kind {
            SegmentKind::Comment => self.fragments.join("\n").trim().to_string(),
            SegmentKind::Code => self
                .fragments
                .concat()
                .trim_start_matches(['\r', '\n'])
                .trim_end()
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(kind: SegmentKind, fragments: Vec<&str>) -> Segment<'_> {
        Segment {
            kind,
            fragments,
            span: 0..0,
            index: 0,
        }
    }

    #[test]
    fn test_comment_body_is_joined_and_trimmed() {
        let segment = segment(SegmentKind::Comment, vec!["", "Title", "", "  Body  ", ""]);
        assert_eq!(segment.render_body(), "Title\n\n  Body");
    }

    #[test]
    fn test_code_body_strips_leading_newlines_only() {
        let segment = segment(SegmentKind::Code, vec!["\r\n", "\n", "  let", " x;", "  \n"]);
        assert_eq!(segment.render_body(), "  let x;");
    }
}
