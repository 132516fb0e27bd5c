//! Detection of patterns that name no path.

use super::{Finding, Inspection, InspectionContext, InspectionKind, InspectionReport};
use crate::parse::{NodeKind, Pattern};
use crate::visit::Visitor;

/// An inspection that reports patterns without any literal or wildcard
/// segment, such as `//`.
///
/// A lone `/` is the repository root and is not reported.
#[derive(Debug, Clone, Default)]
pub struct EmptyPatternInspection;

impl EmptyPatternInspection {
    /// Creates a new empty pattern inspection.
    pub fn new() -> Self {
        Self
    }
}

fn names_a_path(pattern: Pattern<'_>) -> bool {
    pattern
        .segments()
        .any(|s| matches!(s.kind(), NodeKind::Literal | NodeKind::Wildcard(_)))
}

#[derive(Default)]
struct EmptyPatterns {
    report: InspectionReport,
}

impl<'a> Visitor<'a> for EmptyPatterns {
    fn visit_pattern(&mut self, pattern: Pattern<'a>) {
        if pattern.text() != "/" && !names_a_path(pattern) {
            self.report
                .add(Finding::empty_pattern(pattern.text(), pattern.span()));
        }
    }
}

impl Inspection for EmptyPatternInspection {
    fn kind(&self) -> InspectionKind {
        InspectionKind::EmptyPattern
    }

    fn run(&self, ctx: &InspectionContext<'_>) -> InspectionReport {
        let mut visitor = EmptyPatterns::default();
        ctx.file.walk(&mut visitor);
        visitor.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::InspectionConfig;
    use crate::parse::{Span, parse};

    fn run_inspection(input: &str) -> InspectionReport {
        let file = parse(input);
        let config = InspectionConfig::new();
        EmptyPatternInspection::new().run(&InspectionContext::new(&file, &config))
    }

    #[test]
    fn separators_only() {
        let report = run_inspection("// @a\n");
        assert_eq!(
            report.findings,
            vec![Finding::empty_pattern("//", Span::new(0, 1, 1, 2))]
        );
    }

    #[test]
    fn root_pattern_is_allowed() {
        assert!(run_inspection("/ @a\n").is_ok());
    }

    #[test]
    fn regular_patterns_pass() {
        assert!(run_inspection("* @a\n/docs/ @b\n**/ @c\n").is_ok());
    }
}
