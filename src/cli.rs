//! Command-line interface definition.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "envdoctor",
    version,
    about = "Diagnostics for .env files: compare, audit, lint, scan, and fix",
    long_about = "envdoctor inspects dotenv-style environment files. It compares an \
                  example file against real env files, audits which variables the \
                  codebase actually reads, lints formatting and conventions, scans \
                  for leaked secrets, and can apply safe automatic fixes.",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,

    /// Compare the example file against env files and report drift
    #[command(after_help = "EXAMPLES:\n  \
        envdoctor compare\n  \
        envdoctor compare --env .env.production\n  \
        envdoctor compare --all --output json")]
    Compare {
        /// Repository root (defaults to auto-detection from the current directory)
        #[arg(long, value_name = "DIR")]
        repo_root: Option<String>,
        /// Example file path relative to the repository root
        #[arg(long, value_name = "FILE")]
        example: Option<String>,
        /// Env file path relative to the repository root
        #[arg(long, value_name = "FILE")]
        env: Option<String>,
        /// Compare every discovered env file, not just the configured one
        #[arg(long)]
        all: bool,
        /// Output format: text or json
        #[arg(long, value_name = "FORMAT")]
        output: Option<String>,
    },

    /// Audit which environment variables the codebase actually reads
    #[command(after_help = "EXAMPLES:\n  \
        envdoctor audit\n  \
        envdoctor audit --config --detailed")]
    Audit {
        /// Repository root (defaults to auto-detection from the current directory)
        #[arg(long, value_name = "DIR")]
        repo_root: Option<String>,
        /// Example file path relative to the repository root
        #[arg(long, value_name = "FILE")]
        example: Option<String>,
        /// Env file path relative to the repository root
        #[arg(long, value_name = "FILE")]
        env: Option<String>,
        /// Also count config() accesses on env-backed configuration paths
        #[arg(long)]
        config: bool,
        /// Show file and line for each usage site
        #[arg(long)]
        detailed: bool,
        /// Output format: text or json
        #[arg(long, value_name = "FORMAT")]
        output: Option<String>,
    },

    /// Lint an env file for syntax, format, and convention issues
    #[command(after_help = "EXAMPLES:\n  \
        envdoctor lint\n  \
        envdoctor lint --file .env.staging --strict\n  \
        envdoctor lint --rules syntax,format --output xml\n  \
        envdoctor lint --fix")]
    Lint {
        /// Repository root (defaults to auto-detection from the current directory)
        #[arg(long, value_name = "DIR")]
        repo_root: Option<String>,
        /// File to lint (defaults to the configured env file)
        #[arg(long, value_name = "FILE")]
        file: Option<String>,
        /// Enable strict checks (plaintext sensitive values)
        #[arg(long)]
        strict: bool,
        /// Output format: text, json, or xml
        #[arg(long, value_name = "FORMAT")]
        output: Option<String>,
        /// Apply automatic fixes and rewrite the file
        #[arg(long)]
        fix: bool,
        /// Suppress empty-value warnings
        #[arg(long)]
        ignore_empty: bool,
        /// Comma-separated rule categories: syntax, format, convention, security
        #[arg(long, value_name = "RULES")]
        rules: Option<String>,
    },

    /// Scan an env file for exposed secrets and weak values
    #[command(after_help = "EXAMPLES:\n  \
        envdoctor security\n  \
        envdoctor security --strict --check-git\n  \
        envdoctor security --risk-level high --export\n  \
        envdoctor security --fix")]
    Security {
        /// Repository root (defaults to auto-detection from the current directory)
        #[arg(long, value_name = "DIR")]
        repo_root: Option<String>,
        /// File to scan (defaults to the configured env file)
        #[arg(long, value_name = "FILE")]
        file: Option<String>,
        /// Enable strict checks (default values, empty secrets, local hosts)
        #[arg(long)]
        strict: bool,
        /// Also check git tracking and .gitignore coverage
        #[arg(long)]
        check_git: bool,
        /// Output format: text, json, or xml
        #[arg(long, value_name = "FORMAT")]
        output: Option<String>,
        /// Only report findings at or above this risk: low, medium, high, critical
        #[arg(long, value_name = "RISK")]
        risk_level: Option<String>,
        /// Write findings to a timestamped JSON report file
        #[arg(long)]
        export: bool,
        /// Remove commented-out sensitive data from the file
        #[arg(long)]
        fix: bool,
    },

    /// Repair an env file against its example file
    #[command(after_help = "EXAMPLES:\n  \
        envdoctor fix\n  \
        envdoctor fix --dry-run\n  \
        envdoctor fix --remove-unused --backup")]
    Fix {
        /// Repository root (defaults to auto-detection from the current directory)
        #[arg(long, value_name = "DIR")]
        repo_root: Option<String>,
        /// Example file path relative to the repository root
        #[arg(long, value_name = "FILE")]
        example: Option<String>,
        /// Env file path relative to the repository root
        #[arg(long, value_name = "FILE")]
        env: Option<String>,
        /// Copy the env file aside before rewriting it
        #[arg(long)]
        backup: bool,
        /// Show planned changes without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Normalize spacing and quote space-containing values
        #[arg(long)]
        format: bool,
        /// Append variables present in the example but missing from the env file
        #[arg(long)]
        add_missing: bool,
        /// Drop variables absent from the example file
        #[arg(long)]
        remove_unused: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_asserts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_lint_flags() {
        let cli = Cli::try_parse_from([
            "envdoctor",
            "lint",
            "--file",
            ".env.staging",
            "--strict",
            "--rules",
            "syntax,format",
        ])
        .unwrap();
        match cli.command {
            Commands::Lint {
                file,
                strict,
                rules,
                fix,
                ..
            } => {
                assert_eq!(file.as_deref(), Some(".env.staging"));
                assert!(strict);
                assert!(!fix);
                assert_eq!(rules.as_deref(), Some("syntax,format"));
            }
            _ => panic!("expected lint"),
        }
    }

    #[test]
    fn test_parse_security_risk_level() {
        let cli = Cli::try_parse_from([
            "envdoctor",
            "security",
            "--check-git",
            "--risk-level",
            "high",
        ])
        .unwrap();
        match cli.command {
            Commands::Security {
                check_git,
                risk_level,
                export,
                ..
            } => {
                assert!(check_git);
                assert!(!export);
                assert_eq!(risk_level.as_deref(), Some("high"));
            }
            _ => panic!("expected security"),
        }
    }
}
