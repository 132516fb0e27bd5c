//! Line and file-level parser for CODEOWNERS files.
//!
//! The parser consumes the token stream one line at a time and never fails.
//! A blank line produces no node, a line starting with a comment produces a
//! [`NodeKind::Comment`], and anything else becomes an [`NodeKind::Entry`]:
//! the first whitespace-delimited run is the pattern, every further run is
//! an owner, and a trailing comment is attached to the entry.

use log::{debug, trace};

use super::ast::{NodeId, NodeKind, SourceFile, TreeBuilder};
use super::lexer::{Token, TokenKind, tokenize};
use super::span::{Span, SpanTracker};

/// What a single line turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineOutcome {
    Blank,
    Comment,
    Entry,
}

/// Returns the span from the first to the last token of a non-empty run.
fn run_span(run: &[Token<'_>]) -> Span {
    match (run.first(), run.last()) {
        (Some(first), Some(last)) => first.span.extend(&last.span),
        _ => Span::default(),
    }
}

/// Builds the pattern node and its segments from the first run of a line.
///
/// A leading `/` anchors the pattern and is not a segment of its own, unless
/// it is the whole pattern. Every other `/` is a directory separator.
/// Adjacent text and `@` tokens merge into one literal.
fn build_pattern(builder: &mut TreeBuilder, entry: NodeId, run: &[Token<'_>], at: Span) {
    let anchored = run.len() > 1 && run[0].kind == TokenKind::Separator;
    let segments = if anchored { &run[1..] } else { run };
    let span = if run.is_empty() { at } else { run_span(run) };
    let pattern = builder.push(entry, NodeKind::Pattern { anchored }, span);

    let mut literal: Option<Span> = None;
    for token in segments {
        let segment = match token.kind {
            TokenKind::Separator => Some(NodeKind::DirectorySeparator),
            TokenKind::Wildcard => token.wildcard_kind().map(NodeKind::Wildcard),
            _ => None,
        };
        match segment {
            Some(kind) => {
                if let Some(span) = literal.take() {
                    builder.push(pattern, NodeKind::Literal, span);
                }
                builder.push(pattern, kind, token.span);
            }
            None => {
                literal = Some(match literal {
                    Some(span) => span.extend(&token.span),
                    None => token.span,
                });
            }
        }
    }
    if let Some(span) = literal {
        builder.push(pattern, NodeKind::Literal, span);
    }
}

/// Parses the tokens of one line (without its terminator).
fn parse_line(builder: &mut TreeBuilder, tokens: &[Token<'_>]) -> LineOutcome {
    let Some(start) = tokens.iter().position(|t| !t.is_trivia()) else {
        return LineOutcome::Blank;
    };
    let end = tokens
        .iter()
        .rposition(|t| !t.is_trivia())
        .map_or(tokens.len(), |i| i + 1);
    let content = &tokens[start..end];
    let first = content[0];

    if first.kind == TokenKind::Comment {
        builder.push(NodeId::ROOT, NodeKind::Comment, first.span);
        return LineOutcome::Comment;
    }

    let (body, comment) = match content.split_last() {
        Some((last, rest)) if last.kind == TokenKind::Comment => (rest, Some(*last)),
        _ => (content, None),
    };

    let entry = builder.push(NodeId::ROOT, NodeKind::Entry, run_span(content));
    let mut runs = body
        .split(|t| t.kind == TokenKind::Whitespace)
        .filter(|run| !run.is_empty());

    let pattern_run = runs.next().unwrap_or(&[]);
    let at = Span::point(first.span.offset, first.span.line, first.span.column);
    build_pattern(builder, entry, pattern_run, at);

    for run in runs {
        builder.push(entry, NodeKind::Owner, run_span(run));
    }

    if let Some(comment) = comment {
        builder.push(entry, NodeKind::Comment, comment.span);
    }

    LineOutcome::Entry
}

/// Builds a syntax tree from a token stream.
///
/// The file's source text is the concatenation of the token texts. Token
/// spans are recomputed from that text, so a stream whose spans disagree
/// with its texts still yields a consistent tree.
pub fn parse_tokens<'a, I>(tokens: I) -> SourceFile
where
    I: IntoIterator<Item = Token<'a>>,
{
    let mut builder = TreeBuilder::new();
    let mut source = String::new();
    let mut line: Vec<Token<'a>> = Vec::new();
    let (mut entries, mut comments, mut blanks) = (0usize, 0usize, 0usize);

    let mut finish_line = |builder: &mut TreeBuilder, line: &mut Vec<Token<'a>>| {
        let outcome = parse_line(builder, line);
        if let Some(first) = line.first() {
            trace!("Line {}: {:?}", first.span.line, outcome);
        }
        match outcome {
            LineOutcome::Blank => blanks += 1,
            LineOutcome::Comment => comments += 1,
            LineOutcome::Entry => entries += 1,
        }
        line.clear();
    };

    let mut next = Span::point(0, 1, 1);
    for mut token in tokens {
        let mut tracker = SpanTracker::resume(token.text, next);
        let span = tracker.span_of(token.text.len());
        if token.span != span {
            trace!("Realigning token {:?} from {:?} to {:?}", token.kind, token.span, span);
            token.span = span;
        }
        tracker.advance(token.text.len());
        next = tracker.current_span();

        source.push_str(token.text);
        if token.kind == TokenKind::Eol {
            finish_line(&mut builder, &mut line);
        } else {
            line.push(token);
        }
    }
    if !line.is_empty() {
        finish_line(&mut builder, &mut line);
    }

    debug!(
        "Parsing complete: {} entries, {} comments, {} blank lines",
        entries, comments, blanks
    );
    builder.finish(source)
}

/// Parses CODEOWNERS text into a syntax tree.
///
/// Parsing is total: every input produces a tree.
///
/// # Example
///
/// ```rust
/// use codeowners_syntax_core::parse::parse;
///
/// let file = parse("*.js @alice @bob\n");
/// let entry = file.entries().next().unwrap();
/// assert_eq!(entry.pattern().text(), "*.js");
/// let owners: Vec<_> = entry.owners().map(|o| o.text()).collect();
/// assert_eq!(owners, ["@alice", "@bob"]);
/// ```
pub fn parse(input: &str) -> SourceFile {
    debug!("Parsing CODEOWNERS file ({} bytes)", input.len());
    parse_tokens(tokenize(input))
}

/// Parses raw bytes, replacing invalid UTF-8 sequences with U+FFFD.
///
/// Spans refer to the decoded text, available as [`SourceFile::source`].
pub fn parse_bytes(input: &[u8]) -> SourceFile {
    parse(&String::from_utf8_lossy(input))
}
