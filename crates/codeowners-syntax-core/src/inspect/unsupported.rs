//! Detection of gitignore syntax that CODEOWNERS does not support.
//!
//! GitHub ignores negated patterns (`!pattern`) and does not expand character
//! classes (`[abc]`), so such entries silently do something else than the
//! author expects.

use super::{Finding, Inspection, InspectionContext, InspectionKind, InspectionReport};
use crate::parse::{NodeKind, Pattern};
use crate::visit::Visitor;

/// An inspection that reports negation and character classes in patterns.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedPatternInspection;

impl UnsupportedPatternInspection {
    /// Creates a new unsupported pattern inspection.
    pub fn new() -> Self {
        Self
    }
}

/// Returns true if `ch` occurs in `text` outside a backslash escape.
fn contains_unescaped(text: &str, ch: char) -> bool {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == ch {
            return true;
        }
    }
    false
}

#[derive(Default)]
struct UnsupportedSyntax {
    report: InspectionReport,
}

impl<'a> Visitor<'a> for UnsupportedSyntax {
    fn visit_pattern(&mut self, pattern: Pattern<'a>) {
        let text = pattern.text();
        let literals = || {
            pattern
                .segments()
                .filter(|s| s.kind() == NodeKind::Literal)
                .map(|s| s.text())
        };

        if text.starts_with('!') {
            self.report.add(Finding::unsupported_pattern(
                text,
                "negation is not supported",
                pattern.span(),
            ));
        }
        if literals().any(|lit| contains_unescaped(lit, '[')) {
            self.report.add(Finding::unsupported_pattern(
                text,
                "character classes are not supported",
                pattern.span(),
            ));
        }
    }
}

impl Inspection for UnsupportedPatternInspection {
    fn kind(&self) -> InspectionKind {
        InspectionKind::UnsupportedPattern
    }

    fn run(&self, ctx: &InspectionContext<'_>) -> InspectionReport {
        let mut visitor = UnsupportedSyntax::default();
        ctx.file.walk(&mut visitor);
        visitor.report
    }
}
