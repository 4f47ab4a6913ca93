//! Source scanning for environment variable usage.
//!
//! Two extraction passes per file: direct `env('KEY')` calls, and
//! optionally `config('dotted.path')` calls that are translated to their
//! canonical environment variable through a fixed lookup table.

use crate::models::{AccessKind, UsageRecord};
use crate::parser::EnvMapping;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

/// Config paths treated as environment-related even without a known prefix.
const ENV_RELATED_PATHS: &[&str] = &[
    "app.name",
    "app.env",
    "app.debug",
    "app.url",
    "database.connections.mysql.host",
    "database.connections.mysql.database",
    "database.connections.mysql.username",
    "database.connections.mysql.password",
    "mail.mailers.smtp.host",
    "mail.mailers.smtp.port",
    "cache.default",
    "session.driver",
    "queue.default",
    "broadcasting.default",
    "filesystems.default",
];

/// Top-level config segments considered environment-related.
const ENV_RELATED_PREFIXES: &[&str] = &[
    "database.",
    "mail.",
    "cache.",
    "session.",
    "queue.",
    "broadcasting.",
];

/// Canonical config-path to environment-variable translations. Paths that
/// pass the relatedness filter but have no entry here are discarded.
const CONFIG_TO_ENV: &[(&str, &str)] = &[
    ("app.name", "APP_NAME"),
    ("app.env", "APP_ENV"),
    ("app.debug", "APP_DEBUG"),
    ("app.url", "APP_URL"),
    ("database.connections.mysql.host", "DB_HOST"),
    ("database.connections.mysql.database", "DB_DATABASE"),
    ("database.connections.mysql.username", "DB_USERNAME"),
    ("database.connections.mysql.password", "DB_PASSWORD"),
    ("mail.mailers.smtp.host", "MAIL_HOST"),
    ("mail.mailers.smtp.port", "MAIL_PORT"),
    ("cache.default", "CACHE_DRIVER"),
    ("session.driver", "SESSION_DRIVER"),
    ("queue.default", "QUEUE_CONNECTION"),
];

/// Ordered mapping from environment variable to its usage sites.
///
/// Keys keep first-seen order across all scanned files; records keep
/// file-scan order, then match order within a file.
#[derive(Debug, Clone, Default)]
pub struct UsageMap {
    entries: Vec<(String, Vec<UsageRecord>)>,
    index: HashMap<String, usize>,
}

impl UsageMap {
    fn push(&mut self, key: &str, record: UsageRecord) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1.push(record),
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), vec![record]));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[UsageRecord]> {
        self.index.get(key).map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[UsageRecord])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract env-variable usages from `(relative path, contents)` pairs.
///
/// `check_config` also scans `config()` calls and maps recognized paths to
/// their canonical environment variable.
pub fn extract_usages(files: &[(String, String)], check_config: bool) -> UsageMap {
    let env_call = Regex::new(r#"env\s*\(\s*['"]([^'"]+)['"]\s*(?:,\s*[^)]*)?\)"#)
        .expect("bad env() pattern");
    let config_call =
        Regex::new(r#"config\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("bad config() pattern");

    let mut usages = UsageMap::default();
    for (path, content) in files {
        for caps in env_call.captures_iter(content) {
            let key = &caps[1];
            usages.push(
                key,
                UsageRecord {
                    kind: AccessKind::DirectEnv,
                    file: path.clone(),
                    line: find_line_number(content, &format!("env('{}'", key)),
                },
            );
        }
        if check_config {
            for caps in config_call.captures_iter(content) {
                let config_key = &caps[1];
                if !is_environment_related(config_key) {
                    continue;
                }
                let Some(env_var) = config_key_to_env_var(config_key) else {
                    continue;
                };
                usages.push(
                    env_var,
                    UsageRecord {
                        kind: AccessKind::ConfigAccess,
                        file: path.clone(),
                        line: find_line_number(content, &format!("config('{}'", config_key)),
                    },
                );
            }
        }
    }
    usages
}

fn is_environment_related(config_key: &str) -> bool {
    ENV_RELATED_PATHS.contains(&config_key)
        || ENV_RELATED_PREFIXES
            .iter()
            .any(|prefix| config_key.starts_with(prefix))
}

fn config_key_to_env_var(config_key: &str) -> Option<&'static str> {
    CONFIG_TO_ENV
        .iter()
        .find(|(path, _)| *path == config_key)
        .map(|(_, env_var)| *env_var)
}

/// 1-based number of the first line containing `needle`, 0 when absent.
///
/// A plain substring scan: when the same text appears earlier for an
/// unrelated reason the reported line is that earlier occurrence. Known
/// imprecision, kept for output compatibility.
fn find_line_number(content: &str, needle: &str) -> usize {
    for (i, line) in content.split('\n').enumerate() {
        if line.contains(needle) {
            return i + 1;
        }
    }
    0
}

#[derive(Serialize, Clone, Debug, Default)]
/// Cross-reference of code usage against the example and env definitions.
pub struct AuditReport {
    /// Used in code but not defined in the example file, in usage order.
    pub missing_in_example: Vec<String>,
    /// Used in code but not defined in the env file.
    pub missing_in_env: Vec<String>,
    /// Defined in the example file but never used in code.
    pub unused_in_example: Vec<String>,
    /// Defined in the env file but never used in code.
    pub unused_in_env: Vec<String>,
    pub used_total: usize,
    pub example_total: usize,
    pub env_total: usize,
}

/// Compare scanned usages with the parsed example and env mappings.
pub fn analyze(usages: &UsageMap, example: &EnvMapping, env: &EnvMapping) -> AuditReport {
    let mut report = AuditReport {
        used_total: usages.len(),
        example_total: example.len(),
        env_total: env.len(),
        ..AuditReport::default()
    };
    for key in usages.keys() {
        if !example.contains_key(key) {
            report.missing_in_example.push(key.to_string());
        }
        if !env.contains_key(key) {
            report.missing_in_env.push(key.to_string());
        }
    }
    for key in example.keys() {
        if !usages.contains_key(key) {
            report.unused_in_example.push(key.to_string());
        }
    }
    for key in env.keys() {
        if !usages.contains_key(key) {
            report.unused_in_env.push(key.to_string());
        }
    }
    report
}
