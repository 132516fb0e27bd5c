//! CODEOWNERS Syntax Core
//!
//! A library for tokenizing and parsing GitHub CODEOWNERS files into a typed
//! syntax tree, and for interpreting that tree through visitors.
//!
//! # Features
//!
//! - **Tokenizer**: A lazy token stream with exact spans for every byte of input
//! - **Parser**: Total, never fails; malformed rules are represented structurally
//! - **Syntax tree**: Immutable, `Send + Sync`, with parent links and typed views
//! - **Visitors**: Per-variant dispatch plus pre-order walkers
//! - **Inspections**: Advisory findings such as duplicate patterns or unknown owners
//! - **Matching**: Resolve the owners of a path with GitHub's last-match-wins rule
//!
//! # Quick Start
//!
//! ```rust
//! use codeowners_syntax_core::inspect::{InspectionConfig, InspectionRunner};
//! use codeowners_syntax_core::matching::OwnershipMatcher;
//! use codeowners_syntax_core::parse::parse;
//!
//! let input = r#"
//! ## CODEOWNERS file
//! *.rs @rustacean
//! /docs/ @github/docs-team
//! "#;
//!
//! let file = parse(input);
//! for entry in file.entries() {
//!     let owners: Vec<_> = entry.owners().map(|o| o.text()).collect();
//!     println!("Pattern: {} -> {:?}", entry.pattern(), owners);
//! }
//!
//! assert_eq!(file.comments().count(), 1);
//!
//! let report = InspectionRunner::with_all_inspections().run(&file, &InspectionConfig::new());
//! assert!(report.is_ok());
//!
//! let matcher = OwnershipMatcher::new(&file);
//! let rule = matcher.owners_for("docs/index.md").unwrap();
//! assert_eq!(rule.owners(), ["@github/docs-team"]);
//! ```
//!
//! # Modules
//!
//! - [`parse`]: Tokenizer, parser and syntax tree
//! - [`visit`]: Visitor dispatch and tree walkers
//! - [`inspect`]: Advisory inspections over a parsed file
//! - [`matching`]: Owner resolution for repository paths
//! - [`edit`]: Appending rules and creating CODEOWNERS files

use std::path::{Path, PathBuf};

pub mod edit;
#[cfg(feature = "generate")]
pub mod generate;
pub mod inspect;
pub mod matching;
pub mod parse;
pub mod visit;

// Re-export commonly used types at the crate root
pub use inspect::{Finding, InspectionConfig, InspectionReport, InspectionRunner, Severity};
pub use parse::{Entry, Node, NodeKind, Owner, Pattern, SourceFile, Span, parse, tokenize};
pub use visit::{Visitor, WalkControl, walk, walk_nodes};

/// Finds the CODEOWNERS file in a repository.
///
/// Searches in the following locations (in order):
/// 1. `.github/CODEOWNERS`
/// 2. `CODEOWNERS`
/// 3. `docs/CODEOWNERS`
///
/// Returns `Some(path)` if found, `None` otherwise.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use codeowners_syntax_core::find_codeowners_file;
///
/// let repo_path = Path::new("/path/to/repo");
/// if let Some(codeowners_path) = find_codeowners_file(repo_path) {
///     println!("Found CODEOWNERS at: {}", codeowners_path.display());
/// } else {
///     eprintln!("CODEOWNERS file not found");
/// }
/// ```
pub fn find_codeowners_file(repo_path: &Path) -> Option<PathBuf> {
    let locations = [
        repo_path.join(".github").join(edit::CODEOWNERS_FILE_NAME),
        repo_path.join(edit::CODEOWNERS_FILE_NAME),
        repo_path.join("docs").join(edit::CODEOWNERS_FILE_NAME),
    ];
    locations.into_iter().find(|p| p.is_file())
}
