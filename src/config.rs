//! Configuration discovery and effective settings resolution.
//!
//! envdoctor reads `envdoctor.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags. Defaults:
//! - `defaults.example_file`: `.env.example`
//! - `defaults.env_file`: `.env`
//! - `output`: `text`
//! - `file_patterns`: `["*.env", "*.env.*"]`
//! - `source_patterns`: `["*.php"]`
//! - `exclude_directories`: `["vendor", "node_modules", ".git", "storage",
//!   "bootstrap/cache"]`
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Default file paths under `[defaults]`.
pub struct DefaultsCfg {
    pub example_file: Option<String>,
    pub env_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `envdoctor.toml|yaml`.
pub struct DoctorConfig {
    #[serde(default)]
    pub defaults: Option<DefaultsCfg>,
    pub output: Option<String>,
    pub file_patterns: Option<Vec<String>>,
    pub source_patterns: Option<Vec<String>>,
    pub exclude_directories: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub example_file: String,
    pub env_file: String,
    pub output: String,
    pub file_patterns: Vec<String>,
    pub source_patterns: Vec<String>,
    pub exclude_directories: Vec<String>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when an `envdoctor.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("envdoctor.toml").exists()
            || cur.join("envdoctor.yaml").exists()
            || cur.join("envdoctor.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `DoctorConfig` from `envdoctor.toml` or `envdoctor.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<DoctorConfig> {
    let toml_path = root.join("envdoctor.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: DoctorConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["envdoctor.yaml", "envdoctor.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: DoctorConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_example: Option<&str>,
    cli_env: Option<&str>,
    cli_output: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let example_file = cli_example
        .map(|s| s.to_string())
        .or_else(|| cfg.defaults.as_ref().and_then(|d| d.example_file.clone()))
        .unwrap_or_else(|| ".env.example".to_string());

    let env_file = cli_env
        .map(|s| s.to_string())
        .or_else(|| cfg.defaults.as_ref().and_then(|d| d.env_file.clone()))
        .unwrap_or_else(|| ".env".to_string());

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "text".to_string());

    let file_patterns = cfg
        .file_patterns
        .unwrap_or_else(|| vec!["*.env".to_string(), "*.env.*".to_string()]);

    let source_patterns = cfg
        .source_patterns
        .unwrap_or_else(|| vec!["*.php".to_string()]);

    let exclude_directories = cfg.exclude_directories.unwrap_or_else(|| {
        ["vendor", "node_modules", ".git", "storage", "bootstrap/cache"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    });

    Effective {
        repo_root,
        example_file,
        env_file,
        output,
        file_patterns,
        source_patterns,
        exclude_directories,
    }
}
