//! Advisory inspections over a parsed CODEOWNERS file.
//!
//! Parsing never fails, so malformed rules show up structurally in the tree.
//! Inspections walk the tree with a [`Visitor`](crate::visit::Visitor) and
//! report what they find as [`Finding`]s.
//!
//! # Example
//!
//! ```rust
//! use codeowners_syntax_core::inspect::{InspectionConfig, InspectionRunner};
//! use codeowners_syntax_core::parse::parse;
//!
//! let file = parse("*.rs @rust\n*.rs @other\n*.md\n");
//! let report = InspectionRunner::with_all_inspections().run(&file, &InspectionConfig::new());
//!
//! assert!(report.has_warnings());
//! for finding in &report.findings {
//!     println!("{}", finding);
//! }
//! ```

mod dupowners;
mod duppatterns;
mod emptypattern;
mod finding;
mod unknownowners;
mod unowned;
mod unsupported;

pub use dupowners::DuplicateOwnerInspection;
pub use duppatterns::DuplicatePatternInspection;
pub use emptypattern::EmptyPatternInspection;
pub use finding::{Finding, InspectionReport, Severity};
pub use unknownowners::UnknownOwnerInspection;
pub use unowned::UnownedEntryInspection;
pub use unsupported::UnsupportedPatternInspection;

use crate::parse::SourceFile;
use log::{debug, info};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Configuration options for inspections.
#[derive(Debug, Clone, Default)]
pub struct InspectionConfig {
    /// Owners that should be skipped by the owner inspections.
    pub ignored_owners: HashSet<String>,
    /// If true, entries without owners are not reported.
    pub allow_unowned_entries: bool,
}

impl InspectionConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ignored owners.
    pub fn with_ignored_owners(mut self, owners: HashSet<String>) -> Self {
        self.ignored_owners = owners;
        self
    }

    /// Sets whether entries without owners are allowed.
    pub fn with_allow_unowned_entries(mut self, value: bool) -> Self {
        self.allow_unowned_entries = value;
        self
    }

    /// Returns true if `owner` should not be inspected.
    pub fn is_ignored(&self, owner: &str) -> bool {
        self.ignored_owners.contains(owner)
    }
}

/// Context provided to every inspection.
#[derive(Debug, Clone, Copy)]
pub struct InspectionContext<'a> {
    /// The parsed CODEOWNERS file.
    pub file: &'a SourceFile,
    /// Configuration options.
    pub config: &'a InspectionConfig,
}

impl<'a> InspectionContext<'a> {
    /// Creates a new inspection context.
    pub fn new(file: &'a SourceFile, config: &'a InspectionConfig) -> Self {
        Self { file, config }
    }
}

/// An advisory check over a parsed file.
pub trait Inspection: Send + Sync {
    /// Returns which inspection this is.
    fn kind(&self) -> InspectionKind;

    /// Runs the inspection and returns its findings.
    fn run(&self, ctx: &InspectionContext<'_>) -> InspectionReport;
}

/// The built-in inspections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InspectionKind {
    /// Entries with no owners.
    UnownedEntry,
    /// Owners repeated within one entry.
    DuplicateOwner,
    /// Patterns repeated across entries.
    DuplicatePattern,
    /// Owners of unrecognized shape.
    UnknownOwner,
    /// Negation and character classes.
    UnsupportedPattern,
    /// Patterns that name no path.
    EmptyPattern,
}

impl InspectionKind {
    /// Every built-in inspection, in run order.
    pub const ALL: [InspectionKind; 6] = [
        InspectionKind::EmptyPattern,
        InspectionKind::UnsupportedPattern,
        InspectionKind::DuplicatePattern,
        InspectionKind::UnownedEntry,
        InspectionKind::DuplicateOwner,
        InspectionKind::UnknownOwner,
    ];

    /// Returns the stable, kebab-case name of this inspection.
    pub fn name(&self) -> &'static str {
        match self {
            InspectionKind::UnownedEntry => "unowned-entry",
            InspectionKind::DuplicateOwner => "duplicate-owner",
            InspectionKind::DuplicatePattern => "duplicate-pattern",
            InspectionKind::UnknownOwner => "unknown-owner",
            InspectionKind::UnsupportedPattern => "unsupported-pattern",
            InspectionKind::EmptyPattern => "empty-pattern",
        }
    }

    /// Creates the inspection implementing this kind.
    pub fn create(self) -> Box<dyn Inspection> {
        match self {
            InspectionKind::UnownedEntry => Box::new(UnownedEntryInspection::new()),
            InspectionKind::DuplicateOwner => Box::new(DuplicateOwnerInspection::new()),
            InspectionKind::DuplicatePattern => Box::new(DuplicatePatternInspection::new()),
            InspectionKind::UnknownOwner => Box::new(UnknownOwnerInspection::new()),
            InspectionKind::UnsupportedPattern => Box::new(UnsupportedPatternInspection::new()),
            InspectionKind::EmptyPattern => Box::new(EmptyPatternInspection::new()),
        }
    }
}

impl fmt::Display for InspectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown inspection name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown inspection '{0}'")]
pub struct UnknownInspection(pub String);

impl FromStr for InspectionKind {
    type Err = UnknownInspection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InspectionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownInspection(s.to_string()))
    }
}

/// Runs multiple inspections and collects their findings.
#[derive(Default)]
pub struct InspectionRunner {
    inspections: Vec<Box<dyn Inspection>>,
}

impl InspectionRunner {
    /// Creates a runner with no inspections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner with every built-in inspection.
    pub fn with_all_inspections() -> Self {
        Self::with_inspections(InspectionKind::ALL)
    }

    /// Creates a runner with the given built-in inspections.
    pub fn with_inspections(kinds: impl IntoIterator<Item = InspectionKind>) -> Self {
        let mut runner = Self::new();
        for kind in kinds {
            runner.inspections.push(kind.create());
        }
        runner
    }

    /// Adds an inspection.
    pub fn add_inspection<I: Inspection + 'static>(&mut self, inspection: I) {
        self.inspections.push(Box::new(inspection));
    }

    /// Returns the number of inspections that will run.
    pub fn len(&self) -> usize {
        self.inspections.len()
    }

    /// Returns true if no inspection is configured.
    pub fn is_empty(&self) -> bool {
        self.inspections.is_empty()
    }

    /// Runs every inspection and returns the combined findings in source
    /// order.
    pub fn run(&self, file: &SourceFile, config: &InspectionConfig) -> InspectionReport {
        info!("Running {} inspections", self.inspections.len());
        let ctx = InspectionContext::new(file, config);
        let mut report = InspectionReport::new();

        for inspection in &self.inspections {
            debug!("Running inspection: {}", inspection.kind());
            let found = inspection.run(&ctx);
            debug!(
                "Inspection '{}' found {} issues",
                inspection.kind(),
                found.len()
            );
            report.merge(found);
        }

        report.sort_by_position();
        info!("Inspections complete: {} total issues", report.len());
        report
    }
}

impl fmt::Debug for InspectionRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.inspections.iter().map(|i| i.kind()))
            .finish()
    }
}
