//! Duplicate pattern detection.
//!
//! Reports an entry whose pattern text was already used by an earlier entry.

use super::{Finding, Inspection, InspectionContext, InspectionKind, InspectionReport};
use crate::parse::Pattern;
use crate::visit::Visitor;
use std::collections::HashMap;

/// An inspection that detects duplicate patterns.
///
/// Only the last of several identical patterns has any effect, which usually
/// points at a copy-paste error.
#[derive(Debug, Clone, Default)]
pub struct DuplicatePatternInspection;

impl DuplicatePatternInspection {
    /// Creates a new duplicate pattern inspection.
    pub fn new() -> Self {
        Self
    }
}

/// Pattern text -> line of first occurrence.
#[derive(Default)]
struct SeenPatterns<'a> {
    seen: HashMap<&'a str, usize>,
    report: InspectionReport,
}

impl<'a> Visitor<'a> for SeenPatterns<'a> {
    fn visit_pattern(&mut self, pattern: Pattern<'a>) {
        let text = pattern.text();
        if let Some(&first_line) = self.seen.get(text) {
            self.report
                .add(Finding::duplicate_pattern(text, pattern.span(), first_line));
        } else {
            self.seen.insert(text, pattern.span().line);
        }
    }
}

impl Inspection for DuplicatePatternInspection {
    fn kind(&self) -> InspectionKind {
        InspectionKind::DuplicatePattern
    }

    fn run(&self, ctx: &InspectionContext<'_>) -> InspectionReport {
        let mut visitor = SeenPatterns::default();
        ctx.file.walk(&mut visitor);
        visitor.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::InspectionConfig;
    use crate::parse::parse;

    fn run_inspection(input: &str) -> InspectionReport {
        let file = parse(input);
        let config = InspectionConfig::new();
        DuplicatePatternInspection::new().run(&InspectionContext::new(&file, &config))
    }

    #[test]
    fn no_duplicates() {
        let report = run_inspection("*.rs @rust\n*.md @docs\n/src/ @dev\n");
        assert!(report.is_ok());
    }

    #[test]
    fn exact_duplicate() {
        let report = run_inspection("*.rs @owner1\n*.rs @owner2\n");
        assert_eq!(report.len(), 1);

        match &report.findings[0] {
            Finding::DuplicatePattern {
                pattern,
                line,
                first_line,
                ..
            } => {
                assert_eq!(pattern, "*.rs");
                assert_eq!(*line, 2);
                assert_eq!(*first_line, 1);
            }
            other => panic!("Expected DuplicatePattern, got {:?}", other),
        }
    }

    #[test]
    fn three_occurrences_refer_to_first() {
        let report = run_inspection("*.rs @a\n*.rs @b\n*.rs @c\n");
        let first_lines: Vec<_> = report
            .findings
            .iter()
            .map(|f| match f {
                Finding::DuplicatePattern { first_line, .. } => *first_line,
                _ => 0,
            })
            .collect();
        assert_eq!(first_lines, vec![1, 1]);
    }

    #[test]
    fn patterns_are_case_sensitive() {
        assert!(run_inspection("*.RS @a\n*.rs @b\n").is_ok());
    }

    #[test]
    fn anchored_and_unanchored_differ() {
        assert!(run_inspection("/src/*.rs @a\nsrc/*.rs @b\n").is_ok());
    }

    #[test]
    fn comments_are_ignored() {
        assert!(run_inspection("# *.rs\n# *.rs\n").is_ok());
    }
}
