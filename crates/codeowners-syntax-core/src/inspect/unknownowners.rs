//! Detection of owners with an unrecognized shape.

use super::{Finding, Inspection, InspectionContext, InspectionKind, InspectionReport};
use crate::parse::{Owner, OwnerKind};
use crate::visit::Visitor;

/// An inspection that reports owners which are neither `@user`,
/// `@org/team` nor an email address.
///
/// Classification is lexical; whether the owner exists is not checked.
#[derive(Debug, Clone, Default)]
pub struct UnknownOwnerInspection;

impl UnknownOwnerInspection {
    /// Creates a new unknown owner inspection.
    pub fn new() -> Self {
        Self
    }
}

struct UnknownOwners<'c> {
    ctx: &'c InspectionContext<'c>,
    report: InspectionReport,
}

impl<'a> Visitor<'a> for UnknownOwners<'_> {
    fn visit_owner(&mut self, owner: Owner<'a>) {
        if self.ctx.config.is_ignored(owner.text()) {
            return;
        }
        if let OwnerKind::Unknown(text) = owner.kind() {
            self.report.add(Finding::unknown_owner(text, owner.span()));
        }
    }
}

impl Inspection for UnknownOwnerInspection {
    fn kind(&self) -> InspectionKind {
        InspectionKind::UnknownOwner
    }

    fn run(&self, ctx: &InspectionContext<'_>) -> InspectionReport {
        let mut visitor = UnknownOwners {
            ctx,
            report: InspectionReport::new(),
        };
        ctx.file.walk(&mut visitor);
        visitor.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::{InspectionConfig, Severity};
    use crate::parse::parse;

    fn run_inspection(input: &str, config: &InspectionConfig) -> InspectionReport {
        let file = parse(input);
        UnknownOwnerInspection::new().run(&InspectionContext::new(&file, config))
    }

    #[test]
    fn recognized_shapes_pass() {
        let report = run_inspection(
            "* @user @org/team dev@example.com\n",
            &InspectionConfig::new(),
        );
        assert!(report.is_ok());
    }

    #[test]
    fn bare_names_and_malformed_handles() {
        let report = run_inspection("* bob @ @org/ @/team\n", &InspectionConfig::new());
        let owners: Vec<_> = report
            .findings
            .iter()
            .map(|f| match f {
                Finding::UnknownOwner { owner, .. } => owner.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(owners, vec!["bob", "@", "@org/", "@/team"]);
        assert!(report.findings.iter().all(|f| f.severity() == Severity::Error));
    }

    #[test]
    fn ignored_owner_is_skipped() {
        let config =
            InspectionConfig::new().with_ignored_owners(["legacy".to_string()].into_iter().collect());
        assert!(run_inspection("* legacy\n", &config).is_ok());
    }
}
