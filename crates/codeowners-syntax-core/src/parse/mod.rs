//! Tokenizer, parser and syntax tree for CODEOWNERS files.
//!
//! Parsing happens in two stages. [`tokenize`] splits the input into a lazy
//! stream of [`Token`]s, each with a [`Span`]. [`parse_tokens`] groups the
//! tokens into lines and builds a [`SourceFile`], an arena-backed tree whose
//! nodes are visited through the [`Node`] handle and its typed views
//! [`Entry`], [`Pattern`] and [`Owner`].
//!
//! # Example
//!
//! ```rust
//! use codeowners_syntax_core::parse::{parse, NodeKind};
//!
//! let input = r#"
//! ## CODEOWNERS file
//! *.rs @rustacean
//! /docs/ @docs-team
//! "#;
//!
//! let file = parse(input);
//! for node in file.children() {
//!     match node.kind() {
//!         NodeKind::Comment => println!("comment: {}", node.text()),
//!         NodeKind::Entry => println!("entry: {}", node.text()),
//!         _ => unreachable!(),
//!     }
//! }
//! assert_eq!(file.comments().count(), 1);
//! assert_eq!(file.to_string(), input);
//! ```

mod ast;
mod lexer;
mod parser;
pub mod span;

pub use ast::{
    Children, Descendants, Entry, Node, NodeId, NodeKind, Owner, Pattern, SourceFile, WildcardKind,
};
pub use lexer::{OwnerKind, Token, TokenKind, Tokens, classify_owner, tokenize};
pub use parser::{parse, parse_bytes, parse_tokens};
pub use span::{Span, SpanTracker};
