//! Random CODEOWNERS file generation for benchmarking and testing.
//!
//! Output is deterministic for a given seed and only uses syntax the parser
//! turns into entries and comments, so the number of generated rules equals
//! the number of entries after parsing.

use rand::prelude::*;
use rand::rngs::StdRng;
use std::fmt::Write;

/// Configuration for generating CODEOWNERS files.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of rule lines to generate.
    pub num_rules: usize,
    /// Upper bound on section comment lines.
    pub num_comments: usize,
    /// Maximum owners per rule.
    pub max_owners_per_rule: usize,
    /// Percentage of rules that get a trailing comment.
    pub trailing_comment_percent: u32,
    /// Percentage of rules written without owners.
    pub unowned_percent: u32,
    /// Seed for deterministic generation.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_rules: 100,
            num_comments: 20,
            max_owners_per_rule: 4,
            trailing_comment_percent: 5,
            unowned_percent: 0,
            seed: 42,
        }
    }
}

impl GeneratorConfig {
    /// Creates a config for `num_rules` rules with up to one section comment
    /// per five rules.
    pub fn new(num_rules: usize) -> Self {
        Self {
            num_rules,
            num_comments: num_rules / 5,
            ..Default::default()
        }
    }

    /// 10 rules.
    pub fn small() -> Self {
        Self::new(10)
    }

    /// 100 rules.
    pub fn medium() -> Self {
        Self::new(100)
    }

    /// 1,000 rules.
    pub fn large() -> Self {
        Self::new(1_000)
    }

    /// 10,000 rules.
    pub fn xlarge() -> Self {
        Self::new(10_000)
    }

    /// Roughly `bytes` of output. GitHub rejects files above 3MB.
    pub fn target_bytes(bytes: usize) -> Self {
        // Average line is ~50 bytes
        Self::new(bytes.saturating_div(50).max(1))
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the maximum number of section comments.
    pub fn with_comments(mut self, num_comments: usize) -> Self {
        self.num_comments = num_comments;
        self
    }

    /// Sets the maximum owners per rule (at least 1).
    pub fn with_max_owners(mut self, max: usize) -> Self {
        self.max_owners_per_rule = max.max(1);
        self
    }

    /// Sets the percentage of rules carrying a trailing comment.
    pub fn with_trailing_comments(mut self, percent: u32) -> Self {
        self.trailing_comment_percent = percent.min(100);
        self
    }

    /// Sets the percentage of rules that list no owners.
    pub fn with_unowned_rules(mut self, percent: u32) -> Self {
        self.unowned_percent = percent.min(100);
        self
    }
}

/// Words the generator draws from.
mod vocabulary {
    /// Pattern shapes. `{dir}` and `{ext}` are filled in per rule.
    pub const PATTERN_TEMPLATES: &[&str] = &[
        "*.{ext}",
        "**/*.{ext}",
        "/{dir}/",
        "/{dir}/**",
        "/{dir}/*.{ext}",
        "/src/{dir}/",
        "/src/**/*.{ext}",
        "/{dir}/**/test_*.{ext}",
        "{dir}/?/*.{ext}",
        "{dir}/release\\ notes.md",
        "docs/**/*.md",
        "/",
    ];

    pub const EXTENSIONS: &[&str] = &["rs", "py", "js", "ts", "go", "md", "yaml", "json", "toml"];
    pub const DIRECTORIES: &[&str] = &[
        "src", "lib", "tests", "docs", "config", "scripts", "api", "core",
    ];
    pub const USERNAMES: &[&str] = &["alice", "bob", "charlie", "dev", "maintainer", "reviewer"];
    pub const ORGS: &[&str] = &["acme", "github", "myorg"];
    pub const TEAMS: &[&str] = &["core", "platform", "frontend", "backend", "infra", "docs"];
    pub const SECTIONS: &[&str] = &["Frontend", "Backend", "Infrastructure", "Documentation"];
    pub const NOTES: &[&str] = &["owned jointly", "legacy", "see RFC 12", "on-call"];
}

/// Owner kinds as cumulative percentages: users, then teams, then emails.
const USER_CUTOFF: u32 = 50;
const TEAM_CUTOFF: u32 = 80;

/// Chance of a section break before a rule, in percent.
const SECTION_PERCENT: u32 = 20;

fn pick<'v>(rng: &mut StdRng, words: &[&'v str]) -> &'v str {
    words[rng.random_range(0..words.len())]
}

fn write_owner(out: &mut String, rng: &mut StdRng) {
    use vocabulary::*;

    let _ = match rng.random_range(0..100) {
        roll if roll < USER_CUTOFF => write!(out, "@{}", pick(rng, USERNAMES)),
        roll if roll < TEAM_CUTOFF => {
            let org = pick(rng, ORGS);
            write!(out, "@{}/{}", org, pick(rng, TEAMS))
        }
        _ => write!(out, "{}@example.com", pick(rng, USERNAMES)),
    };
}

fn write_pattern(out: &mut String, rng: &mut StdRng) {
    use vocabulary::*;

    let template = pick(rng, PATTERN_TEMPLATES);
    let ext = pick(rng, EXTENSIONS);
    let dir = pick(rng, DIRECTORIES);
    out.push_str(&template.replace("{ext}", ext).replace("{dir}", dir));
}

/// Generates CODEOWNERS text.
///
/// The file starts with a header comment. Sections are separated by a blank
/// line and introduced by a comment until `num_comments` is used up.
pub fn generate(config: &GeneratorConfig) -> String {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut out = String::with_capacity(config.num_rules * 50 + 64);
    let mut sections = 0;

    out.push_str("# Auto-generated CODEOWNERS for benchmarking\n\n");

    for rule in 0..config.num_rules {
        if rule > 0 && sections < config.num_comments && rng.random_ratio(SECTION_PERCENT, 100) {
            let section = pick(&mut rng, vocabulary::SECTIONS);
            let _ = write!(out, "\n# {} section\n", section);
            sections += 1;
        }

        write_pattern(&mut out, &mut rng);

        if !rng.random_ratio(config.unowned_percent, 100) {
            for _ in 0..rng.random_range(1..=config.max_owners_per_rule) {
                out.push(' ');
                write_owner(&mut out, &mut rng);
            }
        }

        if rng.random_ratio(config.trailing_comment_percent, 100) {
            let _ = write!(out, " # {}", pick(&mut rng, vocabulary::NOTES));
        }
        out.push('\n');
    }

    out
}
