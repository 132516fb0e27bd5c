//! Owner resolution for parsed CODEOWNERS files.
//!
//! Patterns follow the gitignore-style rules GitHub uses:
//!
//! - `*` matches any sequence of non-slash characters
//! - `**` matches any sequence including slashes (any path)
//! - `/` at the start anchors to the repository root
//! - `/` at the end matches a directory and everything below it
//! - Patterns without any `/` match anywhere in the path
//! - A pattern naming a directory also matches everything below it, unless
//!   it ends in `*` (`docs/*` does not reach `docs/api/index.md`)
//!
//! When several entries match a path, the last one in the file wins.

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use log::{debug, warn};
use thiserror::Error;

use crate::parse::{Entry, SourceFile};

/// Errors raised while compiling entry patterns.
#[derive(Debug, Error)]
pub enum MatchError {
    /// A pattern could not be turned into a glob.
    #[error("line {line}: invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        line: usize,
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The compiled patterns could not be combined into a set.
    #[error("failed to build pattern set: {0}")]
    PatternSet(#[source] globset::Error),
}

/// A single compiled CODEOWNERS pattern.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    text: String,
    globs: Vec<Glob>,
    matcher: GlobSet,
    anchored: bool,
    directory_only: bool,
}

impl CompiledPattern {
    /// Compiles a CODEOWNERS pattern for matching.
    pub fn new(pattern: &str) -> Result<Self, globset::Error> {
        let (globs, anchored, directory_only) = compile_globs(pattern)?;
        let mut builder = GlobSetBuilder::new();
        for glob in &globs {
            builder.add(glob.clone());
        }
        Ok(Self {
            text: pattern.to_string(),
            matcher: builder.build()?,
            globs,
            anchored,
            directory_only,
        })
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if this pattern is anchored to the repository root.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Returns true if this pattern names a directory.
    pub fn is_directory_only(&self) -> bool {
        self.directory_only
    }

    /// Checks if this pattern matches the given path.
    ///
    /// The path should be relative to the repository root and use forward
    /// slashes. A leading slash is ignored.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(normalize_path(path))
    }
}

/// One compiled rule: a pattern and the owners it assigns.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: CompiledPattern,
    owners: Vec<String>,
    line: usize,
}

impl Rule {
    fn from_entry(entry: Entry<'_>) -> Result<Self, MatchError> {
        let text = entry.pattern().text();
        let pattern = CompiledPattern::new(text).map_err(|source| MatchError::InvalidPattern {
            line: entry.line(),
            pattern: text.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            owners: entry.owners().map(|o| o.text().to_string()).collect(),
            line: entry.line(),
        })
    }

    /// Returns the compiled pattern.
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Returns the owners in the order they were written.
    ///
    /// Empty when the entry explicitly leaves matching paths unowned.
    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    /// Returns the 1-based line the rule came from.
    pub fn line(&self) -> usize {
        self.line
    }
}

/// Resolves the owners of repository paths from a parsed CODEOWNERS file.
#[derive(Debug, Clone)]
pub struct OwnershipMatcher {
    set: GlobSet,
    /// Rule index of each glob in `set`.
    rule_of: Vec<usize>,
    rules: Vec<Rule>,
}

impl OwnershipMatcher {
    /// Compiles every entry of `file`.
    ///
    /// Entries whose pattern cannot be compiled are skipped with a warning.
    pub fn new(file: &SourceFile) -> Self {
        let rules = file
            .entries()
            .filter_map(|entry| match Rule::from_entry(entry) {
                Ok(rule) => Some(rule),
                Err(err) => {
                    warn!("Skipping entry: {}", err);
                    None
                }
            })
            .collect();
        match Self::from_rules(rules) {
            Ok(matcher) => matcher,
            Err(err) => {
                warn!("{}", err);
                Self {
                    set: GlobSet::empty(),
                    rule_of: Vec::new(),
                    rules: Vec::new(),
                }
            }
        }
    }

    /// Compiles every entry of `file`, failing on the first invalid pattern.
    pub fn strict(file: &SourceFile) -> Result<Self, MatchError> {
        let rules = file
            .entries()
            .map(Rule::from_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rules(rules)
    }

    fn from_rules(rules: Vec<Rule>) -> Result<Self, MatchError> {
        let mut builder = GlobSetBuilder::new();
        let mut rule_of = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            for glob in &rule.pattern.globs {
                builder.add(glob.clone());
                rule_of.push(index);
            }
        }
        let set = builder.build().map_err(MatchError::PatternSet)?;
        debug!("Compiled {} ownership rules", rules.len());
        Ok(Self {
            set,
            rule_of,
            rules,
        })
    }

    /// Indices of the rules matching `path`, ascending and without repeats.
    fn matching_indices(&self, path: &str) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .set
            .matches(normalize_path(path))
            .into_iter()
            .map(|glob| self.rule_of[glob])
            .collect();
        indices.dedup();
        indices
    }

    /// Returns the rule that decides ownership of `path`, if any.
    ///
    /// Later rules take precedence over earlier ones.
    pub fn owners_for(&self, path: &str) -> Option<&Rule> {
        self.matching_indices(path)
            .last()
            .map(|&index| &self.rules[index])
    }

    /// Returns every rule matching `path`, in file order.
    pub fn matching_rules(&self, path: &str) -> impl Iterator<Item = &Rule> + '_ {
        self.matching_indices(path)
            .into_iter()
            .map(|index| &self.rules[index])
    }

    /// Returns the compiled rules in file order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of compiled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule was compiled.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn normalize_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

fn compile_globs(pattern: &str) -> Result<(Vec<Glob>, bool, bool), globset::Error> {
    let (glob_pattern, anchored, directory_only) = normalize_pattern(pattern);
    let contents = contents_glob(&glob_pattern, directory_only);
    let globs = std::iter::once(glob_pattern)
        .chain(contents)
        .map(|glob| {
            // `*` must not cross directory boundaries.
            GlobBuilder::new(&glob).literal_separator(true).build()
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((globs, anchored, directory_only))
}

/// Returns the glob for everything below a path the pattern may name as a
/// directory, if the pattern does not already cover it.
fn contents_glob(glob: &str, directory_only: bool) -> Option<String> {
    if directory_only || glob == "**" || glob.ends_with("/*") || glob.ends_with("/**") {
        None
    } else {
        Some(format!("{}/**", glob))
    }
}

/// Normalizes a CODEOWNERS pattern to a glob pattern.
///
/// Returns (glob_pattern, is_anchored, is_directory_only).
fn normalize_pattern(pattern: &str) -> (String, bool, bool) {
    let mut directory_only = false;
    let mut rest = pattern;

    if let Some(stripped) = rest.strip_suffix('/') {
        directory_only = true;
        rest = stripped.trim_end_matches('/');
    }

    let anchored = rest.starts_with('/');
    let mut glob = if let Some(stripped) = rest.strip_prefix('/') {
        stripped.to_string()
    } else if rest.is_empty() {
        // A lone `/` covers the whole repository.
        "**".to_string()
    } else if !rest.contains('/') {
        format!("**/{}", rest)
    } else {
        rest.to_string()
    };

    if directory_only && glob != "**" {
        glob.push_str("/**");
    }

    (glob, anchored, directory_only)
}
