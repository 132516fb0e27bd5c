//! Findings reported by inspections.

use crate::parse::Span;
use serde::Serialize;
use thiserror::Error;

use super::InspectionKind;

/// The severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The file works, but probably not as intended.
    Warning,
    /// The rule is broken and GitHub will not apply it as written.
    Error,
}

/// An advisory issue found in a parsed CODEOWNERS file.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Finding {
    /// An entry lists no owners.
    #[error("line {line}: pattern '{pattern}' has no owners")]
    UnownedEntry {
        /// The line number (1-based).
        line: usize,
        /// The pattern of the entry.
        pattern: String,
        /// Location of the entry.
        span: Span,
    },

    /// The same owner appears more than once in one entry.
    #[error("line {line}: owner '{owner}' is listed more than once (first at column {first_column})")]
    DuplicateOwner {
        /// The line number (1-based).
        line: usize,
        /// The repeated owner.
        owner: String,
        /// Column of the first occurrence.
        first_column: usize,
        /// Location of the repeated owner.
        span: Span,
    },

    /// The same pattern text appears in more than one entry.
    #[error("line {line}: duplicate pattern '{pattern}' (first defined on line {first_line})")]
    DuplicatePattern {
        /// The line number where the duplicate was found (1-based).
        line: usize,
        /// The duplicate pattern text.
        pattern: String,
        /// The line where the pattern was first defined.
        first_line: usize,
        /// Location of the duplicate pattern.
        span: Span,
    },

    /// An owner that is neither `@user`, `@org/team` nor an email.
    #[error("line {line}: unknown owner '{owner}' (expected @user, @org/team or an email)")]
    UnknownOwner {
        /// The line number (1-based).
        line: usize,
        /// The owner text.
        owner: String,
        /// Location of the owner.
        span: Span,
    },

    /// Pattern uses gitignore syntax that CODEOWNERS does not support.
    #[error("line {line}: pattern '{pattern}' uses unsupported syntax - {reason}")]
    UnsupportedPattern {
        /// The line number (1-based).
        line: usize,
        /// The pattern with unsupported syntax.
        pattern: String,
        /// What syntax is not supported.
        reason: String,
        /// Location of the pattern.
        span: Span,
    },

    /// A pattern made only of separators.
    #[error("line {line}: pattern '{pattern}' does not name any path")]
    EmptyPattern {
        /// The line number (1-based).
        line: usize,
        /// The pattern text.
        pattern: String,
        /// Location of the pattern.
        span: Span,
    },
}

impl Finding {
    /// Creates an unowned entry finding.
    pub fn unowned_entry(pattern: impl Into<String>, span: Span) -> Self {
        Self::UnownedEntry {
            line: span.line,
            pattern: pattern.into(),
            span,
        }
    }

    /// Creates a duplicate owner finding.
    pub fn duplicate_owner(owner: impl Into<String>, span: Span, first_column: usize) -> Self {
        Self::DuplicateOwner {
            line: span.line,
            owner: owner.into(),
            first_column,
            span,
        }
    }

    /// Creates a duplicate pattern finding.
    pub fn duplicate_pattern(pattern: impl Into<String>, span: Span, first_line: usize) -> Self {
        Self::DuplicatePattern {
            line: span.line,
            pattern: pattern.into(),
            first_line,
            span,
        }
    }

    /// Creates an unknown owner finding.
    pub fn unknown_owner(owner: impl Into<String>, span: Span) -> Self {
        Self::UnknownOwner {
            line: span.line,
            owner: owner.into(),
            span,
        }
    }

    /// Creates an unsupported pattern finding.
    pub fn unsupported_pattern(
        pattern: impl Into<String>,
        reason: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::UnsupportedPattern {
            line: span.line,
            pattern: pattern.into(),
            reason: reason.into(),
            span,
        }
    }

    /// Creates an empty pattern finding.
    pub fn empty_pattern(pattern: impl Into<String>, span: Span) -> Self {
        Self::EmptyPattern {
            line: span.line,
            pattern: pattern.into(),
            span,
        }
    }

    /// Returns the location the finding refers to.
    pub fn span(&self) -> Span {
        match self {
            Finding::UnownedEntry { span, .. }
            | Finding::DuplicateOwner { span, .. }
            | Finding::DuplicatePattern { span, .. }
            | Finding::UnknownOwner { span, .. }
            | Finding::UnsupportedPattern { span, .. }
            | Finding::EmptyPattern { span, .. } => *span,
        }
    }

    /// Returns the line number the finding refers to.
    pub fn line(&self) -> usize {
        self.span().line
    }

    /// Returns the inspection that produces this kind of finding.
    pub fn kind(&self) -> InspectionKind {
        match self {
            Finding::UnownedEntry { .. } => InspectionKind::UnownedEntry,
            Finding::DuplicateOwner { .. } => InspectionKind::DuplicateOwner,
            Finding::DuplicatePattern { .. } => InspectionKind::DuplicatePattern,
            Finding::UnknownOwner { .. } => InspectionKind::UnknownOwner,
            Finding::UnsupportedPattern { .. } => InspectionKind::UnsupportedPattern,
            Finding::EmptyPattern { .. } => InspectionKind::EmptyPattern,
        }
    }

    /// Returns the severity of this finding.
    pub fn severity(&self) -> Severity {
        match self {
            Finding::UnownedEntry { .. } => Severity::Warning,
            Finding::DuplicateOwner { .. } => Severity::Warning,
            Finding::DuplicatePattern { .. } => Severity::Warning,
            Finding::UnknownOwner { .. } => Severity::Error,
            Finding::UnsupportedPattern { .. } => Severity::Warning,
            Finding::EmptyPattern { .. } => Severity::Error,
        }
    }
}

/// The findings of one or more inspections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InspectionReport {
    /// All findings, in the order they were added.
    pub findings: Vec<Finding>,
}

impl InspectionReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a report with the given findings.
    pub fn with_findings(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// Returns true if there are no findings at all.
    pub fn is_ok(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns true if any finding is an error.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Returns true if any finding is a warning.
    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// Returns only errors.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Error)
    }

    /// Returns only warnings.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == Severity::Warning)
    }

    /// Adds a finding.
    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Merges another report into this one.
    pub fn merge(&mut self, other: InspectionReport) {
        self.findings.extend(other.findings);
    }

    /// Orders findings by source position. Findings at the same position
    /// keep their relative order.
    pub fn sort_by_position(&mut self) {
        self.findings.sort_by_key(|f| f.span().offset);
    }

    /// Returns the number of findings.
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Returns true if there are no findings.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}
