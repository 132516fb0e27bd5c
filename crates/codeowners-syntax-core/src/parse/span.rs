//! Span tracking for source location information.
//!
//! Every token and every syntax node carries a [`Span`] so that hosts can map
//! tree nodes back to byte offsets and line/column positions.

use serde::Serialize;
use std::ops::Range;

/// Represents a location span in the source file.
///
/// Lines and columns are 1-based for human-readable output. Columns count
/// characters, offsets and lengths count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Byte offset from the start of the input (0-based).
    pub offset: usize,
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based).
    pub column: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Span {
    /// Creates a new span with the given position and length.
    pub fn new(offset: usize, line: usize, column: usize, length: usize) -> Self {
        Self {
            offset,
            line,
            column,
            length,
        }
    }

    /// Creates a zero-length span at the given position.
    pub fn point(offset: usize, line: usize, column: usize) -> Self {
        Self::new(offset, line, column, 0)
    }

    /// Returns the end offset of this span.
    pub fn end_offset(&self) -> usize {
        self.offset + self.length
    }

    /// Returns the byte range covered by this span.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end_offset()
    }

    /// Returns true if the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Extends this span to include another span.
    pub fn extend(&self, other: &Span) -> Span {
        let end = other.offset + other.length;
        Span {
            offset: self.offset,
            line: self.line,
            column: self.column,
            length: end.saturating_sub(self.offset),
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::new(0, 1, 1, 0)
    }
}

/// Tracks position while iterating through input.
///
/// Wraps the remaining input and keeps the byte offset, line and column of
/// its first character in sync as the tokenizer consumes it.
#[derive(Debug, Clone, Copy)]
pub struct SpanTracker<'a> {
    /// The remaining input to scan.
    input: &'a str,
    /// Current byte offset from the original input start.
    offset: usize,
    /// Current line number (1-based).
    line: usize,
    /// Current column number (1-based).
    column: usize,
}

impl<'a> SpanTracker<'a> {
    /// Creates a new span tracker for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Creates a tracker for input that continues at `start`.
    pub fn resume(input: &'a str, start: Span) -> Self {
        Self {
            input,
            offset: start.offset,
            line: start.line,
            column: start.column,
        }
    }

    /// Returns the remaining input.
    pub fn as_str(&self) -> &'a str {
        self.input
    }

    /// Returns true if there's no more input.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Returns the current position as a span with zero length.
    pub fn current_span(&self) -> Span {
        Span::point(self.offset, self.line, self.column)
    }

    /// Creates a span from the current position with the given length.
    pub fn span_of(&self, length: usize) -> Span {
        Span::new(self.offset, self.line, self.column, length)
    }

    /// Advances the tracker by the given number of bytes.
    ///
    /// `bytes` must fall on a character boundary. `\n`, `\r\n` and a lone
    /// `\r` each start a new line.
    pub fn advance(&mut self, bytes: usize) -> &'a str {
        let consumed = &self.input[..bytes];

        let mut chars = consumed.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\n' => {
                    self.line += 1;
                    self.column = 1;
                }
                '\r' if chars.peek() != Some(&'\n') => {
                    self.line += 1;
                    self.column = 1;
                }
                '\r' => {}
                _ => self.column += 1,
            }
        }

        self.offset += bytes;
        self.input = &self.input[bytes..];
        consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_new_and_accessors() {
        let span = Span::new(10, 2, 5, 15);
        assert_eq!(span.offset, 10);
        assert_eq!(span.line, 2);
        assert_eq!(span.column, 5);
        assert_eq!(span.length, 15);
        assert_eq!(span.end_offset(), 25);
        assert_eq!(span.range(), 10..25);
    }

    #[test]
    fn span_point_has_zero_length() {
        let span = Span::point(5, 1, 6);
        assert!(span.is_empty());
        assert_eq!(span.end_offset(), 5);
    }

    #[test]
    fn span_extend_combines_spans() {
        let span1 = Span::new(0, 1, 1, 5);
        let span2 = Span::new(10, 1, 11, 3);
        let extended = span1.extend(&span2);

        assert_eq!(extended.offset, 0);
        assert_eq!(extended.line, 1);
        assert_eq!(extended.column, 1);
        assert_eq!(extended.length, 13);
    }

    #[test]
    fn tracker_initial_position() {
        let tracker = SpanTracker::new("hello\nworld");
        assert_eq!(tracker.current_span(), Span::point(0, 1, 1));
        assert_eq!(tracker.as_str(), "hello\nworld");
    }

    #[test]
    fn tracker_advance_updates_position() {
        let mut tracker = SpanTracker::new("hello\nworld");

        assert_eq!(tracker.advance(5), "hello");
        assert_eq!(tracker.current_span(), Span::point(5, 1, 6));
        assert_eq!(tracker.as_str(), "\nworld");
    }

    #[test]
    fn tracker_advance_handles_newlines() {
        let mut tracker = SpanTracker::new("hello\nworld");

        tracker.advance(6);
        assert_eq!(tracker.current_span(), Span::point(6, 2, 1));
        assert_eq!(tracker.as_str(), "world");
    }

    #[test]
    fn tracker_crlf_counts_as_one_line_break() {
        let mut tracker = SpanTracker::new("a\r\nb\rc");

        tracker.advance(3);
        assert_eq!(tracker.current_span(), Span::point(3, 2, 1));

        tracker.advance(2);
        assert_eq!(tracker.current_span(), Span::point(5, 3, 1));
    }

    #[test]
    fn tracker_columns_count_characters() {
        let mut tracker = SpanTracker::new("é@x");
        tracker.advance("é".len());
        assert_eq!(tracker.current_span(), Span::point(2, 1, 2));
    }

    #[test]
    fn tracker_span_of_creates_correct_span() {
        let mut tracker = SpanTracker::new("hello\nworld");
        tracker.advance(6);

        let span = tracker.span_of(5);
        assert_eq!(span, Span::new(6, 2, 1, 5));
    }

    #[test]
    fn tracker_resumes_at_position() {
        let mut tracker = SpanTracker::resume("ab\ncd", Span::point(10, 3, 4));
        assert_eq!(tracker.span_of(2), Span::new(10, 3, 4, 2));
        tracker.advance(3);
        assert_eq!(tracker.current_span(), Span::point(13, 4, 1));
    }

    #[test]
    fn tracker_is_empty() {
        let mut tracker = SpanTracker::new("hi");
        assert!(!tracker.is_empty());

        tracker.advance(2);
        assert!(tracker.is_empty());
    }
}
