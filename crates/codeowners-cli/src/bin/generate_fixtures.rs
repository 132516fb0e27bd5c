//! Generate CODEOWNERS fixtures for benchmarking.
//!
//! Usage: cargo run --release --bin generate-fixtures --features generate -- [output_dir]
//!
//! Writes the same deterministic presets the core benchmarks use, and checks
//! that each fixture parses back into the expected number of entries.

use codeowners_syntax_core::generate::{GeneratorConfig, generate};
use codeowners_syntax_core::parse::parse;
use std::{
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

/// Fixture presets - keep in sync with benches/fixtures.rs
const PRESETS: &[(&str, fn() -> GeneratorConfig)] = &[
    ("small", GeneratorConfig::small),
    ("medium", GeneratorConfig::medium),
    ("large", GeneratorConfig::large),
    ("xlarge", GeneratorConfig::xlarge),
    ("max_size", || GeneratorConfig::target_bytes(3_000_000)),
];

fn main() -> ExitCode {
    let output_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("fixtures"));

    if let Err(e) = run(&output_dir) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    for (name, config_fn) in PRESETS {
        let config = config_fn();
        let content = generate(&config);

        let entries = parse(&content).entries().count();
        if entries != config.num_rules {
            return Err(io::Error::other(format!(
                "fixture '{name}' parsed into {entries} entries, expected {}",
                config.num_rules
            )));
        }

        let path = output_dir.join(format!("{name}.codeowners"));
        fs::write(&path, &content)?;
        println!(
            "Generated {} ({} bytes, {} rules, {} comments)",
            path.display(),
            content.len(),
            config.num_rules,
            config.num_comments
        );
    }

    Ok(())
}
