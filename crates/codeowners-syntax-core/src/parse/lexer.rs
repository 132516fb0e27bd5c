//! Tokenizer for CODEOWNERS files.
//!
//! The tokenizer is purely lexical: it splits text into comments, line
//! breaks, whitespace, path separators, wildcards, owner marks and text runs
//! without knowing whether a run is a pattern or an owner. That decision is
//! positional and belongs to the parser.
//!
//! Tokenizing is total. Every character of the input ends up in exactly one
//! token, so concatenating token texts reproduces the input.

use std::iter::FusedIterator;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{char, satisfy},
    combinator::{recognize, value},
    multi::many1_count,
};
use serde::Serialize;

use super::ast::WildcardKind;
use super::span::{Span, SpanTracker};

/// The lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// `#` up to (not including) the end of the line.
    Comment,
    /// A line terminator: `\n`, `\r\n` or a lone `\r`.
    Eol,
    /// A run of non-breaking whitespace.
    Whitespace,
    /// A path separator (`/`).
    Separator,
    /// `*`, `**` or `?`.
    Wildcard,
    /// A run of literal characters, including escapes such as `\ ` and `\#`.
    Text,
    /// `@`, marking a user/team handle or the middle of an email.
    OwnerMark,
}

/// A single token with its source text and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub text: &'a str,
    /// Location of the token in the source.
    pub span: Span,
}

impl Token<'_> {
    /// Returns true for whitespace and line terminators.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Eol)
    }

    /// Returns the wildcard flavour if this is a wildcard token.
    pub fn wildcard_kind(&self) -> Option<WildcardKind> {
        match (self.kind, self.text) {
            (TokenKind::Wildcard, "**") => Some(WildcardKind::Recursive),
            (TokenKind::Wildcard, "*") => Some(WildcardKind::Any),
            (TokenKind::Wildcard, "?") => Some(WildcardKind::Single),
            _ => None,
        }
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn is_inline_space(c: char) -> bool {
    c.is_whitespace() && !is_line_break(c)
}

/// Characters that can appear unescaped inside a text run.
fn is_text_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '#' | '/' | '*' | '?' | '@' | '\\')
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize((char('#'), take_till(is_line_break))).parse(input)
}

fn eol(input: &str) -> IResult<&str, &str> {
    alt((tag("\r\n"), tag("\n"), tag("\r"))).parse(input)
}

fn whitespace(input: &str) -> IResult<&str, &str> {
    take_while1(is_inline_space).parse(input)
}

fn wildcard(input: &str) -> IResult<&str, &str> {
    alt((tag("**"), tag("*"), tag("?"))).parse(input)
}

/// A backslash followed by any character other than a line break.
fn escape(input: &str) -> IResult<&str, &str> {
    recognize((char('\\'), satisfy(|c| !is_line_break(c)))).parse(input)
}

/// A literal run. A trailing lone backslash is folded into the run.
fn text(input: &str) -> IResult<&str, &str> {
    recognize(many1_count(alt((
        take_while1(is_text_char),
        escape,
        tag("\\"),
    ))))
    .parse(input)
}

/// Scans one token from the start of `input`.
fn scan_token(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::Eol, eol),
        value(TokenKind::Whitespace, whitespace),
        value(TokenKind::Comment, comment),
        value(TokenKind::Separator, tag("/")),
        value(TokenKind::Wildcard, wildcard),
        value(TokenKind::OwnerMark, tag("@")),
        value(TokenKind::Text, text),
    ))
    .parse(input)
}

/// A lazy token stream over a CODEOWNERS source.
///
/// Created by [`tokenize`]. Cloning the stream restarts nothing; call
/// [`tokenize`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    tracker: SpanTracker<'a>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.tracker.is_empty() {
            return None;
        }

        let input = self.tracker.as_str();
        let (kind, length) = match scan_token(input) {
            Ok((rest, kind)) => (kind, input.len() - rest.len()),
            // Every character is covered by some scanner; fold anything else
            // into a one-character text token.
            Err(_) => (
                TokenKind::Text,
                input.chars().next().map_or(input.len(), char::len_utf8),
            ),
        };

        let span = self.tracker.span_of(length);
        let text = self.tracker.advance(length);
        Some(Token { kind, text, span })
    }
}

impl FusedIterator for Tokens<'_> {}

/// Splits CODEOWNERS text into tokens.
///
/// # Example
///
/// ```rust
/// use codeowners_syntax_core::parse::{tokenize, TokenKind};
///
/// let kinds: Vec<TokenKind> = tokenize("*.rs @dev\n").map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Wildcard,
///         TokenKind::Text,
///         TokenKind::Whitespace,
///         TokenKind::OwnerMark,
///         TokenKind::Text,
///         TokenKind::Eol,
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> Tokens<'_> {
    Tokens {
        tracker: SpanTracker::new(input),
    }
}

/// Classifies an owner string into its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerKind<'a> {
    /// A GitHub user (@username).
    User(&'a str),
    /// A GitHub team (@org/team).
    Team { org: &'a str, team: &'a str },
    /// An email address.
    Email(&'a str),
    /// Unknown/invalid format.
    Unknown(&'a str),
}

/// Classifies an owner text string by its lexical shape.
pub fn classify_owner(text: &str) -> OwnerKind<'_> {
    if let Some(stripped) = text.strip_prefix('@') {
        if let Some(slash_pos) = stripped.find('/') {
            let org = &stripped[..slash_pos];
            let team = &stripped[slash_pos + 1..];
            if !org.is_empty() && !team.is_empty() {
                return OwnerKind::Team { org, team };
            }
            // Empty org or team means invalid format
            return OwnerKind::Unknown(text);
        }
        if !stripped.is_empty() {
            return OwnerKind::User(stripped);
        }
        // Just "@" with nothing after
        return OwnerKind::Unknown(text);
    } else if text.contains('@') {
        return OwnerKind::Email(text);
    }

    OwnerKind::Unknown(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        tokenize(input).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn tokenize_empty_input() {
        assert_eq!(tokenize("").count(), 0);
    }

    #[test]
    fn tokenize_simple_rule() {
        assert_eq!(
            kinds("*.js @alice\n"),
            vec![
                (TokenKind::Wildcard, "*"),
                (TokenKind::Text, ".js"),
                (TokenKind::Whitespace, " "),
                (TokenKind::OwnerMark, "@"),
                (TokenKind::Text, "alice"),
                (TokenKind::Eol, "\n"),
            ]
        );
    }

    #[test]
    fn tokenize_comment_runs_to_end_of_line() {
        assert_eq!(
            kinds("# owners # here\r\nx"),
            vec![
                (TokenKind::Comment, "# owners # here"),
                (TokenKind::Eol, "\r\n"),
                (TokenKind::Text, "x"),
            ]
        );
    }

    #[test]
    fn tokenize_separators_and_wildcards() {
        assert_eq!(
            kinds("/src/**/a?.rs"),
            vec![
                (TokenKind::Separator, "/"),
                (TokenKind::Text, "src"),
                (TokenKind::Separator, "/"),
                (TokenKind::Wildcard, "**"),
                (TokenKind::Separator, "/"),
                (TokenKind::Text, "a"),
                (TokenKind::Wildcard, "?"),
                (TokenKind::Text, ".rs"),
            ]
        );
    }

    #[test]
    fn tokenize_triple_star_splits_greedily() {
        assert_eq!(
            kinds("***"),
            vec![(TokenKind::Wildcard, "**"), (TokenKind::Wildcard, "*")]
        );
    }

    #[test]
    fn tokenize_escapes_stay_in_text() {
        assert_eq!(
            kinds(r"my\ file\#1 @o"),
            vec![
                (TokenKind::Text, r"my\ file\#1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::OwnerMark, "@"),
                (TokenKind::Text, "o"),
            ]
        );
    }

    #[test]
    fn tokenize_escaped_wildcard_is_text() {
        assert_eq!(kinds(r"a\*b"), vec![(TokenKind::Text, r"a\*b")]);
    }

    #[test]
    fn tokenize_trailing_backslash_is_text() {
        assert_eq!(
            kinds("a\\\nb"),
            vec![
                (TokenKind::Text, "a\\"),
                (TokenKind::Eol, "\n"),
                (TokenKind::Text, "b"),
            ]
        );
        assert_eq!(kinds("\\"), vec![(TokenKind::Text, "\\")]);
    }

    #[test]
    fn tokenize_email_contains_owner_mark() {
        assert_eq!(
            kinds("dev@example.com"),
            vec![
                (TokenKind::Text, "dev"),
                (TokenKind::OwnerMark, "@"),
                (TokenKind::Text, "example.com"),
            ]
        );
    }

    #[test]
    fn tokenize_lone_carriage_return_is_eol() {
        assert_eq!(
            kinds("a\rb"),
            vec![
                (TokenKind::Text, "a"),
                (TokenKind::Eol, "\r"),
                (TokenKind::Text, "b"),
            ]
        );
    }

    #[test]
    fn tokenize_unicode_whitespace_is_whitespace() {
        assert_eq!(
            kinds("a\u{a0}\tb"),
            vec![
                (TokenKind::Text, "a"),
                (TokenKind::Whitespace, "\u{a0}\t"),
                (TokenKind::Text, "b"),
            ]
        );
    }

    #[test]
    fn token_spans_track_lines_and_columns() {
        let tokens: Vec<_> = tokenize("*.rs @a\n  /x @b").collect();
        let slash = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Separator)
            .unwrap();
        assert_eq!(slash.span, Span::new(10, 2, 3, 1));
    }

    #[test]
    fn tokens_cover_input_exactly() {
        let input = "# c\n*.rs  @a/b x@y.z # t\n\n\\\r\n ü/**/? ";
        let rebuilt: String = tokenize(input).map(|t| t.text).collect();
        assert_eq!(rebuilt, input);

        let mut expected_offset = 0;
        for token in tokenize(input) {
            assert_eq!(token.span.offset, expected_offset);
            assert_eq!(token.span.length, token.text.len());
            expected_offset = token.span.end_offset();
        }
    }

    #[test]
    fn tokenize_is_restartable() {
        let input = "*.md @docs\n";
        let first: Vec<_> = tokenize(input).collect();
        let second: Vec<_> = tokenize(input).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn wildcard_kind_of_tokens() {
        let tokens: Vec<_> = tokenize("** * ? x").collect();
        assert_eq!(tokens[0].wildcard_kind(), Some(WildcardKind::Recursive));
        assert_eq!(tokens[2].wildcard_kind(), Some(WildcardKind::Any));
        assert_eq!(tokens[4].wildcard_kind(), Some(WildcardKind::Single));
        assert_eq!(tokens[6].wildcard_kind(), None);
        assert!(tokens[1].is_trivia());
    }

    #[test]
    fn classify_owner_user() {
        assert_eq!(classify_owner("@octocat"), OwnerKind::User("octocat"));
        assert_eq!(classify_owner("@user-name"), OwnerKind::User("user-name"));
    }

    #[test]
    fn classify_owner_team() {
        assert_eq!(
            classify_owner("@github/core"),
            OwnerKind::Team {
                org: "github",
                team: "core"
            }
        );
    }

    #[test]
    fn classify_owner_email() {
        assert_eq!(
            classify_owner("user.name@company.co.uk"),
            OwnerKind::Email("user.name@company.co.uk")
        );
    }

    #[test]
    fn classify_owner_unknown() {
        assert_eq!(classify_owner("noatsign"), OwnerKind::Unknown("noatsign"));
        assert_eq!(classify_owner("@"), OwnerKind::Unknown("@"));
        assert_eq!(classify_owner("@/team"), OwnerKind::Unknown("@/team"));
        assert_eq!(classify_owner("@org/"), OwnerKind::Unknown("@org/"));
    }
}
