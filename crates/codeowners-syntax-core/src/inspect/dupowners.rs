//! Duplicate owner detection within a single entry.

use super::{Finding, Inspection, InspectionContext, InspectionKind, InspectionReport};
use crate::parse::Entry;
use crate::visit::Visitor;
use std::collections::HashMap;

/// An inspection that reports owners listed twice on the same line.
///
/// GitHub handles are case-insensitive, so `@Alice` and `@alice` are the same
/// owner.
#[derive(Debug, Clone, Default)]
pub struct DuplicateOwnerInspection;

impl DuplicateOwnerInspection {
    /// Creates a new duplicate owner inspection.
    pub fn new() -> Self {
        Self
    }
}

struct RepeatedOwners<'c> {
    ctx: &'c InspectionContext<'c>,
    report: InspectionReport,
}

impl<'a> Visitor<'a> for RepeatedOwners<'_> {
    fn visit_entry(&mut self, entry: Entry<'a>) {
        let mut first_columns: HashMap<String, usize> = HashMap::new();
        for owner in entry.owners() {
            if self.ctx.config.is_ignored(owner.text()) {
                continue;
            }
            let key = owner.text().to_lowercase();
            match first_columns.get(&key) {
                Some(&column) => self.report.add(Finding::duplicate_owner(
                    owner.text(),
                    owner.span(),
                    column,
                )),
                None => {
                    first_columns.insert(key, owner.span().column);
                }
            }
        }
    }
}

impl Inspection for DuplicateOwnerInspection {
    fn kind(&self) -> InspectionKind {
        InspectionKind::DuplicateOwner
    }

    fn run(&self, ctx: &InspectionContext<'_>) -> InspectionReport {
        let mut visitor = RepeatedOwners {
            ctx,
            report: InspectionReport::new(),
        };
        ctx.file.walk(&mut visitor);
        visitor.report
    }
}
