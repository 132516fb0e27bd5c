//! Detection of entries without owners.

use super::{Finding, Inspection, InspectionContext, InspectionKind, InspectionReport};
use crate::parse::Entry;
use crate::visit::Visitor;

/// An inspection that reports entries listing no owners.
///
/// GitHub accepts such entries and treats matching paths as unowned, so the
/// finding is only a warning and can be turned off with
/// [`InspectionConfig::allow_unowned_entries`](super::InspectionConfig).
#[derive(Debug, Clone, Default)]
pub struct UnownedEntryInspection;

impl UnownedEntryInspection {
    /// Creates a new unowned entry inspection.
    pub fn new() -> Self {
        Self
    }
}

#[derive(Default)]
struct UnownedEntries {
    report: InspectionReport,
}

impl<'a> Visitor<'a> for UnownedEntries {
    fn visit_entry(&mut self, entry: Entry<'a>) {
        if !entry.has_owners() {
            self.report
                .add(Finding::unowned_entry(entry.pattern().text(), entry.span()));
        }
    }
}

impl Inspection for UnownedEntryInspection {
    fn kind(&self) -> InspectionKind {
        InspectionKind::UnownedEntry
    }

    fn run(&self, ctx: &InspectionContext<'_>) -> InspectionReport {
        if ctx.config.allow_unowned_entries {
            return InspectionReport::new();
        }
        let mut visitor = UnownedEntries::default();
        ctx.file.walk(&mut visitor);
        visitor.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::InspectionConfig;
    use crate::parse::{Span, parse};

    fn run_inspection(input: &str, config: &InspectionConfig) -> InspectionReport {
        let file = parse(input);
        UnownedEntryInspection::new().run(&InspectionContext::new(&file, config))
    }

    #[test]
    fn entry_without_owners() {
        let report = run_inspection("*.go\n", &InspectionConfig::new());
        assert_eq!(
            report.findings,
            vec![Finding::unowned_entry("*.go", Span::new(0, 1, 1, 4))]
        );
    }

    #[test]
    fn trailing_comment_is_not_an_owner() {
        let report = run_inspection("/vendor/ # nobody\n", &InspectionConfig::new());
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn owned_entries_pass() {
        assert!(run_inspection("*.go @gopher\n# just a comment\n", &InspectionConfig::new()).is_ok());
    }

    #[test]
    fn allowed_by_config() {
        let config = InspectionConfig::new().with_allow_unowned_entries(true);
        assert!(run_inspection("*.go\n", &config).is_ok());
    }
}
