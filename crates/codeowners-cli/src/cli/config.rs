//! Validated configuration and exit codes.

use codeowners_syntax_core::find_codeowners_file;
use codeowners_syntax_core::inspect::{InspectionConfig, InspectionKind, InspectionReport};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::{Args, FailureLevel, InspectArgs};

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Everything went fine.
    Success = 0,
    /// The command could not run: bad configuration, unreadable file.
    StartupFailure = 1,
    /// Inspections reported findings at or above the failure level.
    InspectionFailed = 3,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

/// Errors detected before any command runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("repository path '{0}' does not exist or is not a directory")]
    InvalidRepositoryPath(PathBuf),

    #[error("no CODEOWNERS file found in '{0}' (looked in .github/, the root and docs/)")]
    CodeownersNotFound(PathBuf),

    #[error("CODEOWNERS file '{0}' does not exist")]
    CodeownersFileMissing(PathBuf),
}

/// Errors raised while a command runs.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read CODEOWNERS file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Global options after validation.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// The repository root.
    pub repo_path: PathBuf,
    /// The CODEOWNERS file, if one was given or found.
    pub codeowners_path: Option<PathBuf>,
    /// Whether output is JSON.
    pub json_output: bool,
}

impl ValidatedConfig {
    /// Validates the global options.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let repo_path = &args.repository_path;
        if !repo_path.is_dir() {
            return Err(ConfigError::InvalidRepositoryPath(repo_path.clone()));
        }

        let codeowners_path = match &args.codeowners_file {
            Some(file) if file.is_absolute() => Some(file.clone()),
            Some(file) => Some(repo_path.join(file)),
            None => find_codeowners_file(repo_path),
        };

        Ok(Self {
            repo_path: repo_path.clone(),
            codeowners_path,
            json_output: args.json,
        })
    }

    /// Returns the CODEOWNERS file, which must exist.
    pub fn codeowners_file(&self) -> Result<&Path, ConfigError> {
        match &self.codeowners_path {
            Some(path) if path.is_file() => Ok(path),
            Some(path) => Err(ConfigError::CodeownersFileMissing(path.clone())),
            None => Err(ConfigError::CodeownersNotFound(self.repo_path.clone())),
        }
    }
}

/// What `inspect` runs and when it fails.
#[derive(Debug, Clone)]
pub struct InspectionPlan {
    /// Inspections to run, in run order.
    pub kinds: Vec<InspectionKind>,
    /// Lowest severity that fails the command.
    pub failure_level: FailureLevel,
    /// Options handed to the inspections.
    pub config: InspectionConfig,
}

impl InspectionPlan {
    /// Builds the plan from `inspect` arguments. No checks means all of them.
    pub fn from_args(args: &InspectArgs) -> Self {
        let kinds = if args.checks.is_empty() {
            InspectionKind::ALL.to_vec()
        } else {
            let mut kinds = args.checks.clone();
            kinds.sort_by_key(|kind| InspectionKind::ALL.iter().position(|k| k == kind));
            kinds.dedup();
            kinds
        };

        let config = InspectionConfig::new()
            .with_ignored_owners(args.ignored_owners.iter().cloned().collect())
            .with_allow_unowned_entries(args.allow_unowned_entries);

        Self {
            kinds,
            failure_level: args.check_failure_level,
            config,
        }
    }

    /// Returns true if the report fails at this plan's failure level.
    pub fn has_failures(&self, report: &InspectionReport) -> bool {
        match self.failure_level {
            FailureLevel::Warning => !report.is_ok(),
            FailureLevel::Error => report.has_errors(),
        }
    }

    /// Returns the exit code for a report.
    pub fn exit_code(&self, report: &InspectionReport) -> ExitCode {
        if self.has_failures(report) {
            ExitCode::InspectionFailed
        } else {
            ExitCode::Success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Command;
    use codeowners_syntax_core::Finding;
    use codeowners_syntax_core::parse::Span;
    use std::fs;
    use tempfile::TempDir;

    fn args(repo: &Path, file: Option<&str>) -> Args {
        Args {
            repository_path: repo.to_path_buf(),
            codeowners_file: file.map(PathBuf::from),
            json: false,
            verbose: 0,
            command: Command::Tree,
        }
    }

    fn inspect_args(level: FailureLevel) -> InspectArgs {
        InspectArgs {
            checks: Vec::new(),
            check_failure_level: level,
            ignored_owners: Vec::new(),
            allow_unowned_entries: false,
        }
    }

    #[test]
    fn rejects_missing_repository() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = ValidatedConfig::from_args(&args(&missing, None)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRepositoryPath(_)));
    }

    #[test]
    fn finds_codeowners_in_repository() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".github")).unwrap();
        fs::write(temp.path().join(".github/CODEOWNERS"), "* @a\n").unwrap();

        let config = ValidatedConfig::from_args(&args(temp.path(), None)).unwrap();
        assert_eq!(
            config.codeowners_file().unwrap(),
            temp.path().join(".github/CODEOWNERS")
        );
    }

    #[test]
    fn relative_file_is_joined_to_repository() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("OWNERS"), "").unwrap();

        let config = ValidatedConfig::from_args(&args(temp.path(), Some("OWNERS"))).unwrap();
        assert_eq!(config.codeowners_file().unwrap(), temp.path().join("OWNERS"));
    }

    #[test]
    fn missing_file_is_reported_lazily() {
        let temp = TempDir::new().unwrap();

        let config = ValidatedConfig::from_args(&args(temp.path(), None)).unwrap();
        assert!(matches!(
            config.codeowners_file(),
            Err(ConfigError::CodeownersNotFound(_))
        ));

        let config = ValidatedConfig::from_args(&args(temp.path(), Some("OWNERS"))).unwrap();
        assert!(matches!(
            config.codeowners_file(),
            Err(ConfigError::CodeownersFileMissing(_))
        ));
    }

    #[test]
    fn plan_defaults_to_all_inspections() {
        let plan = InspectionPlan::from_args(&inspect_args(FailureLevel::Warning));
        assert_eq!(plan.kinds, InspectionKind::ALL.to_vec());
        assert!(!plan.config.allow_unowned_entries);
    }

    #[test]
    fn plan_orders_and_dedups_checks() {
        let mut args = inspect_args(FailureLevel::Warning);
        args.checks = vec![
            InspectionKind::UnknownOwner,
            InspectionKind::EmptyPattern,
            InspectionKind::UnknownOwner,
        ];
        args.ignored_owners = vec!["@ghost".to_string()];

        let plan = InspectionPlan::from_args(&args);
        assert_eq!(
            plan.kinds,
            vec![InspectionKind::EmptyPattern, InspectionKind::UnknownOwner]
        );
        assert!(plan.config.is_ignored("@ghost"));
    }

    #[test]
    fn failure_level_decides_exit_code() {
        let warning = InspectionReport::with_findings(vec![Finding::unowned_entry(
            "*.md",
            Span::new(0, 1, 1, 4),
        )]);
        let error = InspectionReport::with_findings(vec![Finding::unknown_owner(
            "bob",
            Span::new(5, 1, 6, 3),
        )]);

        let strict = InspectionPlan::from_args(&inspect_args(FailureLevel::Warning));
        assert_eq!(strict.exit_code(&warning), ExitCode::InspectionFailed);
        assert_eq!(strict.exit_code(&InspectionReport::new()), ExitCode::Success);

        let lenient = InspectionPlan::from_args(&inspect_args(FailureLevel::Error));
        assert_eq!(lenient.exit_code(&warning), ExitCode::Success);
        assert_eq!(lenient.exit_code(&error), ExitCode::InspectionFailed);
    }

    #[test]
    fn exit_code_values() {
        assert_eq!(ExitCode::Success as u8, 0);
        assert_eq!(ExitCode::StartupFailure as u8, 1);
        assert_eq!(ExitCode::InspectionFailed as u8, 3);
    }
}
