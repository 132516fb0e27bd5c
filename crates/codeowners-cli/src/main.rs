//! CODEOWNERS Syntax CLI
//!
//! A command-line tool for inspecting the syntax of GitHub CODEOWNERS files.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode as StdExitCode;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::config::{CommandError, ExitCode, InspectionPlan, ValidatedConfig};
use cli::output::{HumanOutput, JsonAppend, JsonNode, JsonOwnership, JsonReport, JsonToken, write_json};
use cli::{AppendArgs, Args, Command, InspectArgs};
use codeowners_syntax_core::edit::{
    AppendOptions, append_entries, append_to_file, ensure_codeowners_file,
    read_codeowners_file,
};
use codeowners_syntax_core::inspect::InspectionRunner;
use codeowners_syntax_core::matching::OwnershipMatcher;
use codeowners_syntax_core::parse::{SourceFile, tokenize};

fn main() -> StdExitCode {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing
    init_tracing(args.verbose, args.json);

    run(args).into()
}

/// Initialize tracing based on verbosity level.
fn init_tracing(verbosity: u8, json_output: bool) {
    // Don't output logs when using JSON output mode
    if json_output {
        return;
    }

    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Run the selected command with the given arguments.
fn run(args: Args) -> ExitCode {
    let mut stderr = io::stderr().lock();

    // Validate configuration
    let config = match ValidatedConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            let use_colors = !args.json && io::stderr().is_terminal();
            write_error(&mut stderr, &e.to_string(), use_colors);
            return ExitCode::StartupFailure;
        }
    };

    let use_colors = !config.json_output && io::stdout().is_terminal();

    debug!("Validated configuration: {:?}", config);
    info!("Repository path: {}", config.repo_path.display());

    let stdout = io::stdout().lock();
    let result = match &args.command {
        Command::Tree => tree(&config, stdout, use_colors),
        Command::Tokens => tokens(&config, stdout, use_colors),
        Command::Owners { paths } => owners(&config, paths, stdout, use_colors),
        Command::Inspect(inspect_args) => inspect(&config, inspect_args, stdout, use_colors),
        Command::Append(append_args) => append(&config, append_args, stdout, use_colors),
        Command::Init { dir } => init(&config, dir.as_deref(), stdout),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            write_error(&mut stderr, &e.to_string(), use_colors);
            ExitCode::StartupFailure
        }
    }
}

/// Reads and parses the configured CODEOWNERS file.
fn load(config: &ValidatedConfig) -> Result<(PathBuf, SourceFile), CommandError> {
    let path = config.codeowners_file()?.to_path_buf();
    info!("CODEOWNERS file: {}", path.display());
    let file = read_codeowners_file(&path).map_err(|source| CommandError::Read {
        path: path.clone(),
        source,
    })?;
    Ok((path, file))
}

fn tree<W: Write>(
    config: &ValidatedConfig,
    mut out: W,
    use_colors: bool,
) -> Result<ExitCode, CommandError> {
    let (_, file) = load(config)?;
    if config.json_output {
        write_json(&mut out, &JsonNode::from(file.root()))?;
    } else {
        HumanOutput::new(out, use_colors).write_tree(&file)?;
    }
    Ok(ExitCode::Success)
}

fn tokens<W: Write>(
    config: &ValidatedConfig,
    mut out: W,
    use_colors: bool,
) -> Result<ExitCode, CommandError> {
    let (_, file) = load(config)?;
    let tokens = tokenize(file.source());
    if config.json_output {
        let tokens: Vec<JsonToken<'_>> = tokens.map(JsonToken::from).collect();
        write_json(&mut out, &tokens)?;
    } else {
        HumanOutput::new(out, use_colors).write_tokens(tokens)?;
    }
    Ok(ExitCode::Success)
}

fn owners<W: Write>(
    config: &ValidatedConfig,
    paths: &[String],
    mut out: W,
    use_colors: bool,
) -> Result<ExitCode, CommandError> {
    let (_, file) = load(config)?;
    let matcher = OwnershipMatcher::new(&file);
    debug!("Resolving {} path(s) against {} rules", paths.len(), matcher.len());

    if config.json_output {
        let ownership: Vec<_> = paths
            .iter()
            .map(|path| JsonOwnership::new(path, matcher.owners_for(path)))
            .collect();
        write_json(&mut out, &ownership)?;
    } else {
        let mut output = HumanOutput::new(out, use_colors);
        for path in paths {
            output.write_ownership(path, matcher.owners_for(path))?;
        }
    }
    Ok(ExitCode::Success)
}

fn inspect<W: Write>(
    config: &ValidatedConfig,
    args: &InspectArgs,
    mut out: W,
    use_colors: bool,
) -> Result<ExitCode, CommandError> {
    let (_, file) = load(config)?;
    let plan = InspectionPlan::from_args(args);
    let report = InspectionRunner::with_inspections(plan.kinds.iter().copied())
        .run(&file, &plan.config);

    if config.json_output {
        let mut json_report = JsonReport::new(&plan.kinds);
        json_report.add_findings(&report);
        write_json(&mut out, &json_report)?;
    } else {
        HumanOutput::new(out, use_colors).write_report(&plan.kinds, &report)?;
    }

    Ok(plan.exit_code(&report))
}

fn append<W: Write>(
    config: &ValidatedConfig,
    args: &AppendArgs,
    mut out: W,
    use_colors: bool,
) -> Result<ExitCode, CommandError> {
    let mut options = AppendOptions::new()
        .with_ignore_duplicates(args.ignore_duplicates)
        .with_ignore_comments(args.ignore_comments);
    if let Some(line) = args.insert_at_line {
        options = options.with_insert_at_line(line);
    }

    let (path, outcome) = if args.dry_run {
        let (path, file) = load(config)?;
        (path, append_entries(&file, &args.lines, &options))
    } else {
        let path = config.codeowners_file()?.to_path_buf();
        info!("Appending to {}", path.display());
        let outcome = append_to_file(&path, &args.lines, &options).map_err(|source| {
            CommandError::Write {
                path: path.clone(),
                source,
            }
        })?;
        (path, outcome)
    };

    if config.json_output {
        write_json(
            &mut out,
            &JsonAppend {
                path: &path,
                dry_run: args.dry_run,
                appended: &outcome.appended,
                skipped: &outcome.skipped,
            },
        )?;
    } else {
        HumanOutput::new(out, use_colors).write_append(&path, &outcome, args.dry_run)?;
    }
    Ok(ExitCode::Success)
}

fn init<W: Write>(
    config: &ValidatedConfig,
    dir: Option<&Path>,
    mut out: W,
) -> Result<ExitCode, CommandError> {
    let path = match (dir, &config.codeowners_path) {
        (Some(dir), _) => create(&config.repo_path.join(dir))?,
        (None, Some(existing)) if existing.is_file() => existing.clone(),
        (None, _) => create(&config.repo_path.join(".github"))?,
    };

    if config.json_output {
        write_json(&mut out, &serde_json::json!({ "path": path.display().to_string() }))?;
    } else {
        HumanOutput::new(out, false).write_line(&path.display().to_string())?;
    }
    Ok(ExitCode::Success)
}

fn create(dir: &Path) -> Result<PathBuf, CommandError> {
    ensure_codeowners_file(dir).map_err(|source| CommandError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write an error message to the writer.
fn write_error<W: Write>(writer: &mut W, message: &str, use_colors: bool) {
    let _ = HumanOutput::new(writer, use_colors).write_error(message);
}
