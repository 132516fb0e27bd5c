//! Output formatting for the CLI.
//!
//! Every command has a human-readable form, written through [`HumanOutput`],
//! and a JSON form built from the serializable structs below.

use codeowners_syntax_core::edit::AppendOutcome;
use codeowners_syntax_core::inspect::{InspectionKind, InspectionReport};
use codeowners_syntax_core::matching::Rule;
use codeowners_syntax_core::parse::{Node, NodeKind, OwnerKind, SourceFile, Span, Token, TokenKind, WildcardKind};
use codeowners_syntax_core::visit::{WalkControl, walk_nodes};
use codeowners_syntax_core::{Finding, Severity};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Serializes `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    writeln!(writer, "{}", json)
}

fn owner_kind_name(kind: OwnerKind<'_>) -> &'static str {
    match kind {
        OwnerKind::User(_) => "user",
        OwnerKind::Team { .. } => "team",
        OwnerKind::Email(_) => "email",
        OwnerKind::Unknown(_) => "unknown",
    }
}

/// A syntax node in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonNode<'a> {
    /// The node variant.
    pub kind: &'static str,
    /// The exact source text.
    pub text: &'a str,
    /// Location of the node.
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchored: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<WildcardKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<JsonNode<'a>>,
}

impl<'a> From<Node<'a>> for JsonNode<'a> {
    fn from(node: Node<'a>) -> Self {
        let kind = node.kind();
        Self {
            kind: kind.name(),
            text: node.text(),
            span: node.span(),
            anchored: match kind {
                NodeKind::Pattern { anchored } => Some(anchored),
                _ => None,
            },
            wildcard: match kind {
                NodeKind::Wildcard(wildcard) => Some(wildcard),
                _ => None,
            },
            owner_kind: node.as_owner().map(|owner| owner_kind_name(owner.kind())),
            children: node.children().map(JsonNode::from).collect(),
        }
    }
}

/// A token in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonToken<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl<'a> From<Token<'a>> for JsonToken<'a> {
    fn from(token: Token<'a>) -> Self {
        Self {
            kind: token.kind,
            text: token.text,
            span: token.span,
        }
    }
}

/// The owners of one path in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonOwnership<'a> {
    /// The path as given.
    pub path: &'a str,
    /// The deciding pattern, or `None` if no rule matches.
    pub pattern: Option<&'a str>,
    /// Line of the deciding rule.
    pub line: Option<usize>,
    /// Owners assigned by the deciding rule.
    pub owners: &'a [String],
}

impl<'a> JsonOwnership<'a> {
    /// Creates the entry for `path` decided by `rule`.
    pub fn new(path: &'a str, rule: Option<&'a Rule>) -> Self {
        Self {
            path,
            pattern: rule.map(|r| r.pattern().as_str()),
            line: rule.map(Rule::line),
            owners: rule.map(Rule::owners).unwrap_or_default(),
        }
    }
}

/// A single finding in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonIssue {
    /// Line number where the issue occurred.
    pub line: usize,
    /// Column number where the issue occurred.
    pub column: usize,
    /// Human-readable message.
    pub message: String,
    /// Severity of the issue.
    pub severity: Severity,
}

impl From<&Finding> for JsonIssue {
    fn from(finding: &Finding) -> Self {
        let span = finding.span();
        Self {
            line: span.line,
            column: span.column,
            message: finding.to_string(),
            severity: finding.severity(),
        }
    }
}

/// Inspection results keyed by inspection name.
///
/// Every inspection that ran has a key, even without findings.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct JsonReport {
    inspections: BTreeMap<&'static str, Vec<JsonIssue>>,
}

impl JsonReport {
    /// Creates a report with an empty list for each inspection that ran.
    pub fn new(kinds: &[InspectionKind]) -> Self {
        Self {
            inspections: kinds.iter().map(|kind| (kind.name(), Vec::new())).collect(),
        }
    }

    /// Files every finding under its inspection.
    pub fn add_findings(&mut self, report: &InspectionReport) {
        for finding in &report.findings {
            self.inspections
                .entry(finding.kind().name())
                .or_default()
                .push(JsonIssue::from(finding));
        }
    }
}

/// The result of `append` in JSON format.
#[derive(Debug, Serialize)]
pub struct JsonAppend<'a> {
    pub path: &'a Path,
    pub dry_run: bool,
    pub appended: &'a [String],
    pub skipped: &'a [String],
}

/// Output formatter for human-readable console output.
pub struct HumanOutput<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> HumanOutput<W> {
    /// Creates a new human output formatter.
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Writes the tree as an indented outline, one node per line.
    pub fn write_tree(&mut self, file: &SourceFile) -> std::io::Result<()> {
        let mut result = Ok(());
        walk_nodes(file.root(), |node| {
            result = self.write_node(node);
            if result.is_ok() {
                WalkControl::Continue
            } else {
                WalkControl::Stop
            }
        });
        result
    }

    fn write_node(&mut self, node: Node<'_>) -> std::io::Result<()> {
        let depth = std::iter::successors(node.parent(), Node::parent).count();
        let kind = node.kind();
        let mut label = kind.name().to_string();
        match kind {
            NodeKind::Pattern { anchored: true } => label.push_str(" (anchored)"),
            NodeKind::Wildcard(wildcard) => label.push_str(&format!(" ({})", wildcard.as_str())),
            NodeKind::Owner => {
                if let Some(owner) = node.as_owner() {
                    label.push_str(&format!(" ({})", owner_kind_name(owner.kind())));
                }
            }
            _ => {}
        }

        let span = node.span();
        let label = if self.use_colors {
            label.cyan().to_string()
        } else {
            label
        };
        write!(
            self.writer,
            "{:indent$}{} {}:{}",
            "",
            label,
            span.line,
            span.column,
            indent = depth * 2
        )?;
        if kind != NodeKind::SourceFile {
            write!(self.writer, " {:?}", node.text())?;
        }
        writeln!(self.writer)
    }

    /// Writes one token per line.
    pub fn write_tokens<'a>(
        &mut self,
        tokens: impl IntoIterator<Item = Token<'a>>,
    ) -> std::io::Result<()> {
        for token in tokens {
            let kind = format!("{:?}", token.kind);
            let kind = if self.use_colors {
                kind.cyan().to_string()
            } else {
                kind
            };
            writeln!(
                self.writer,
                "{}:{} {} {:?}",
                token.span.line, token.span.column, kind, token.text
            )?;
        }
        Ok(())
    }

    /// Writes the deciding rule for a path.
    pub fn write_ownership(&mut self, path: &str, rule: Option<&Rule>) -> std::io::Result<()> {
        match rule {
            Some(rule) if rule.owners().is_empty() => writeln!(
                self.writer,
                "{}: unowned (line {}: {})",
                path,
                rule.line(),
                rule.pattern().as_str()
            ),
            Some(rule) => {
                let owners = rule.owners().join(" ");
                let owners = if self.use_colors {
                    owners.green().to_string()
                } else {
                    owners
                };
                writeln!(
                    self.writer,
                    "{}: {} (line {}: {})",
                    path,
                    owners,
                    rule.line(),
                    rule.pattern().as_str()
                )
            }
            None => {
                let message = "no matching rule";
                if self.use_colors {
                    writeln!(self.writer, "{}: {}", path, message.yellow())
                } else {
                    writeln!(self.writer, "{}: {}", path, message)
                }
            }
        }
    }

    /// Writes a header for an inspection.
    pub fn write_inspection_header(&mut self, name: &str) -> std::io::Result<()> {
        let header = format!("==> {}", name);
        if self.use_colors {
            writeln!(self.writer, "\n{}", header.cyan().bold())?;
        } else {
            writeln!(self.writer, "\n{}", header)?;
        }
        Ok(())
    }

    /// Writes the findings grouped by inspection, then a summary.
    pub fn write_report(
        &mut self,
        kinds: &[InspectionKind],
        report: &InspectionReport,
    ) -> std::io::Result<()> {
        for &kind in kinds {
            let mut findings = report.findings.iter().filter(|f| f.kind() == kind).peekable();
            if findings.peek().is_none() {
                continue;
            }
            self.write_inspection_header(kind.name())?;
            for finding in findings {
                self.write_finding(finding)?;
            }
        }
        self.write_summary(report.errors().count(), report.warnings().count())
    }

    /// Writes a single finding.
    pub fn write_finding(&mut self, finding: &Finding) -> std::io::Result<()> {
        let severity = finding.severity();
        let label = match severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };

        if self.use_colors {
            let colored_label = match severity {
                Severity::Error => format!("[{}]", label).red().bold(),
                Severity::Warning => format!("[{}]", label).yellow().bold(),
            };
            writeln!(self.writer, "  {} {}", colored_label, finding)?;
        } else {
            writeln!(self.writer, "  [{}] {}", label, finding)?;
        }

        Ok(())
    }

    /// Writes a summary of the inspection results.
    pub fn write_summary(
        &mut self,
        total_errors: usize,
        total_warnings: usize,
    ) -> std::io::Result<()> {
        writeln!(self.writer)?;

        if total_errors == 0 && total_warnings == 0 {
            let message = "✓ No issues found";
            if self.use_colors {
                writeln!(self.writer, "{}", message.green().bold())?;
            } else {
                writeln!(self.writer, "{}", message)?;
            }
        } else {
            let message = format!(
                "✗ Found {} error(s) and {} warning(s)",
                total_errors, total_warnings
            );
            if self.use_colors {
                writeln!(self.writer, "{}", message.red().bold())?;
            } else {
                writeln!(self.writer, "{}", message)?;
            }
        }

        Ok(())
    }

    /// Writes what `append` did. A dry run prints the resulting file text.
    pub fn write_append(
        &mut self,
        path: &Path,
        outcome: &AppendOutcome,
        dry_run: bool,
    ) -> std::io::Result<()> {
        for skipped in &outcome.skipped {
            let message = format!("Skipped existing entry: {}", skipped);
            if self.use_colors {
                writeln!(self.writer, "{}", message.yellow())?;
            } else {
                writeln!(self.writer, "{}", message)?;
            }
        }

        if dry_run {
            write!(self.writer, "{}", outcome.text)?;
            return Ok(());
        }

        let message = if outcome.changed() {
            format!(
                "Appended {} block(s) to {}",
                outcome.appended.len(),
                path.display()
            )
        } else {
            format!("{} is unchanged", path.display())
        };
        if self.use_colors {
            writeln!(self.writer, "{}", message.green())
        } else {
            writeln!(self.writer, "{}", message)
        }
    }

    /// Writes a plain line, such as a file path.
    pub fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{}", line)
    }

    /// Writes a startup error.
    pub fn write_error(&mut self, message: &str) -> std::io::Result<()> {
        if self.use_colors {
            writeln!(self.writer, "{} {}", "Error:".red().bold(), message)?;
        } else {
            writeln!(self.writer, "Error: {}", message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeowners_syntax_core::edit::{AppendOptions, append_entries};
    use codeowners_syntax_core::inspect::{InspectionConfig, InspectionRunner};
    use codeowners_syntax_core::matching::OwnershipMatcher;
    use codeowners_syntax_core::parse::{parse, tokenize};
    use pretty_assertions::assert_eq;

    fn human(f: impl FnOnce(&mut HumanOutput<&mut Vec<u8>>) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        let mut output = HumanOutput::new(&mut buf, false);
        f(&mut output).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn test_span() -> Span {
        Span::new(0, 1, 1, 5)
    }

    #[test]
    fn tree_outline() {
        let file = parse("# c\n/src/*.rs @a\n");
        let text = human(|out| out.write_tree(&file));
        assert_eq!(
            text,
            "source_file 1:1\n\
             \x20 comment 1:1 \"# c\"\n\
             \x20 entry 2:1 \"/src/*.rs @a\"\n\
             \x20   pattern (anchored) 2:1 \"/src/*.rs\"\n\
             \x20     literal 2:2 \"src\"\n\
             \x20     directory_separator 2:5 \"/\"\n\
             \x20     wildcard (*) 2:6 \"*\"\n\
             \x20     literal 2:7 \".rs\"\n\
             \x20   owner (user) 2:11 \"@a\"\n"
        );
    }

    #[test]
    fn tree_json_nests_children() {
        let file = parse("*.rs @org/team\n");
        let json = serde_json::to_value(JsonNode::from(file.root())).unwrap();

        assert_eq!(json["kind"], "source_file");
        let entry = &json["children"][0];
        assert_eq!(entry["kind"], "entry");
        assert_eq!(entry["children"][0]["anchored"], false);
        assert_eq!(entry["children"][0]["children"][0]["wildcard"], "any");
        assert_eq!(entry["children"][1]["owner_kind"], "team");
        assert!(entry["children"][1].get("children").is_none());
    }

    #[test]
    fn tokens_listing() {
        let text = human(|out| out.write_tokens(tokenize("*.rs @a")));
        assert_eq!(
            text,
            "1:1 Wildcard \"*\"\n1:2 Text \".rs\"\n1:5 Whitespace \" \"\n1:6 OwnerMark \"@\"\n1:7 Text \"a\"\n"
        );
    }

    #[test]
    fn token_json_uses_screaming_kind() {
        let token = tokenize("\n").next().unwrap();
        let json = serde_json::to_value(JsonToken::from(token)).unwrap();
        assert_eq!(json["kind"], "EOL");
        assert_eq!(json["span"]["offset"], 0);
    }

    #[test]
    fn ownership_lines() {
        let file = parse("* @all\n/vendor/\n");
        let matcher = OwnershipMatcher::new(&file);

        let text = human(|out| {
            out.write_ownership("README.md", matcher.owners_for("README.md"))?;
            out.write_ownership("vendor/x.c", matcher.owners_for("vendor/x.c"))
        });
        assert_eq!(
            text,
            "README.md: @all (line 1: *)\nvendor/x.c: unowned (line 2: /vendor/)\n"
        );

        let empty = OwnershipMatcher::new(&parse(""));
        let text = human(|out| out.write_ownership("a", empty.owners_for("a")));
        assert_eq!(text, "a: no matching rule\n");
    }

    #[test]
    fn ownership_json() {
        let file = parse("*.rs @a @b\n");
        let matcher = OwnershipMatcher::new(&file);

        let json = serde_json::to_value(JsonOwnership::new("x.rs", matcher.owners_for("x.rs"))).unwrap();
        assert_eq!(json["pattern"], "*.rs");
        assert_eq!(json["line"], 1);
        assert_eq!(json["owners"], serde_json::json!(["@a", "@b"]));

        let json = serde_json::to_value(JsonOwnership::new("x.md", matcher.owners_for("x.md"))).unwrap();
        assert!(json["pattern"].is_null());
        assert_eq!(json["owners"], serde_json::json!([]));
    }

    #[test]
    fn json_issue_from_finding() {
        let finding = Finding::duplicate_pattern("*.rs", test_span(), 1);
        let issue = JsonIssue::from(&finding);

        assert_eq!(issue.line, 1);
        assert_eq!(issue.column, 1);
        assert!(issue.message.contains("duplicate"));
        assert_eq!(issue.severity, Severity::Warning);
    }

    #[test]
    fn json_report_lists_every_inspection_that_ran() {
        let file = parse("*.rs @a\n*.rs @b\n");
        let kinds = [InspectionKind::DuplicatePattern, InspectionKind::UnknownOwner];
        let report = InspectionRunner::with_inspections(kinds).run(&file, &InspectionConfig::new());

        let mut json_report = JsonReport::new(&kinds);
        json_report.add_findings(&report);

        let mut buf = Vec::new();
        write_json(&mut buf, &json_report).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["duplicate-pattern"].as_array().unwrap().len(), 1);
        assert_eq!(json["unknown-owner"].as_array().unwrap().len(), 0);
        assert!(json.get("unowned-entry").is_none());
    }

    #[test]
    fn report_groups_by_inspection() {
        let file = parse("*.md\n*.rs bob\n");
        let report = InspectionRunner::with_all_inspections().run(&file, &InspectionConfig::new());
        let text = human(|out| out.write_report(&InspectionKind::ALL, &report));

        assert!(text.contains("==> unowned-entry\n  [WARN] line 1"));
        assert!(text.contains("==> unknown-owner\n  [ERROR] line 2"));
        assert!(text.contains("1 error(s) and 1 warning(s)"));
    }

    #[test]
    fn summary_without_issues() {
        let text = human(|out| out.write_summary(0, 0));
        assert!(text.contains("No issues found"));
    }

    #[test]
    fn append_messages() {
        let file = parse("*.rs @a\n");
        let outcome = append_entries(&file, &["*.rs @a", "*.md @b"], &AppendOptions::new());
        let path = Path::new("CODEOWNERS");

        let text = human(|out| out.write_append(path, &outcome, false));
        assert_eq!(
            text,
            "Skipped existing entry: *.rs @a\nAppended 1 block(s) to CODEOWNERS\n"
        );

        let text = human(|out| out.write_append(path, &outcome, true));
        assert_eq!(text, "Skipped existing entry: *.rs @a\n*.rs @a\n*.md @b\n");
    }

    #[test]
    fn error_without_colors() {
        let text = human(|out| out.write_error("boom"));
        assert_eq!(text, "Error: boom\n");
    }
}
