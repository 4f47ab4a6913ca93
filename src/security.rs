//! Security classification of env keys and values.
//!
//! Classification is table-driven: a fixed ordered keyword table maps to
//! severity classes, and severity maps to risk. Every matching keyword
//! produces its own finding; nothing is deduplicated.

use crate::models::{Location, Risk, SecurityFinding, Severity};
use regex::Regex;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Keyword table matched case-insensitively as a substring of the key.
/// Order matters: findings are emitted in table order.
const SENSITIVE_KEYS: &[(&str, Severity)] = &[
    ("password", Severity::Error),
    ("secret", Severity::Error),
    ("private_key", Severity::Error),
    ("api_secret", Severity::Error),
    ("jwt_secret", Severity::Error),
    ("encryption_key", Severity::Error),
    ("master_key", Severity::Error),
    ("app_key", Severity::Error),
    ("key", Severity::Warning),
    ("token", Severity::Warning),
    ("api_key", Severity::Warning),
    ("access_token", Severity::Warning),
    ("refresh_token", Severity::Warning),
    ("session_secret", Severity::Warning),
    ("cipher_key", Severity::Warning),
    ("database_password", Severity::Warning),
    ("username", Severity::Info),
    ("email", Severity::Info),
    ("host", Severity::Info),
    ("port", Severity::Info),
    ("database", Severity::Info),
];

const WEAK_PASSWORDS: &[&str] = &[
    "password", "123456", "admin", "root", "test", "secret", "changeme", "default",
];

const DEFAULT_VALUES: &[&str] = &["secret", "password", "key", "token", "example", "test"];

const LOCAL_VALUES: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0"];

fn risk_for(severity: Severity) -> Risk {
    match severity {
        Severity::Error => Risk::High,
        Severity::Warning => Risk::Medium,
        Severity::Info => Risk::Low,
    }
}

fn recommendation_for(key: &str) -> String {
    let key = key.to_lowercase();
    if key.contains("password") {
        return "Use a strong, unique password with at least 12 characters".to_string();
    }
    if key.contains("api_key") {
        return "Use a long, random API key (32+ characters)".to_string();
    }
    if key.contains("secret") {
        return "Use a cryptographically secure random value".to_string();
    }
    "Ensure this value is secure and not committed to version control".to_string()
}

fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEYS.iter().any(|(kw, _)| key.contains(kw))
}

/// Scan env-file text for security findings, in discovery order: per-line
/// checks top to bottom, then file-level checks.
pub fn scan(content: &str, strict: bool) -> Vec<SecurityFinding> {
    let predictable = Regex::new(r"(?i)^(admin|user|test|demo|guest)$").expect("bad name pattern");
    let mut findings = Vec::new();
    for (i, line) in content.split('\n').enumerate() {
        scan_line(line, i + 1, strict, &predictable, &mut findings);
    }
    scan_file(content, strict, &mut findings);
    findings
}

fn scan_line(
    raw: &str,
    number: usize,
    strict: bool,
    predictable: &Regex,
    findings: &mut Vec<SecurityFinding>,
) {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return;
    }
    let Some((raw_key, raw_value)) = trimmed.split_once('=') else {
        return;
    };
    let key = raw_key.trim();
    let value = raw_value.trim();
    let key_lower = key.to_lowercase();
    let value_lower = value.to_lowercase();

    for (keyword, severity) in SENSITIVE_KEYS {
        if key_lower.contains(keyword) {
            findings.push(SecurityFinding {
                severity: *severity,
                line: Location::Line(number),
                key: key.to_string(),
                value: value.to_string(),
                message: format!("Sensitive key detected: {}", key),
                line_content: raw.to_string(),
                risk: risk_for(*severity),
                recommendation: recommendation_for(key),
                fixable: false,
            });
        }
    }

    if WEAK_PASSWORDS.contains(&value_lower.as_str()) {
        findings.push(SecurityFinding {
            severity: Severity::Error,
            line: Location::Line(number),
            key: key.to_string(),
            value: value.to_string(),
            message: format!("Weak password detected: {}", value),
            line_content: raw.to_string(),
            risk: Risk::High,
            recommendation: "Use a strong, unique password".to_string(),
            fixable: false,
        });
    }

    if key_lower.contains("api_key") && value.len() < 32 {
        findings.push(SecurityFinding {
            severity: Severity::Warning,
            line: Location::Line(number),
            key: key.to_string(),
            value: value.to_string(),
            message: format!("Short API key detected (length: {})", value.len()),
            line_content: raw.to_string(),
            risk: Risk::Medium,
            recommendation: "Use API keys with at least 32 characters".to_string(),
            fixable: false,
        });
    }

    if predictable.is_match(value) {
        findings.push(SecurityFinding {
            severity: Severity::Warning,
            line: Location::Line(number),
            key: key.to_string(),
            value: value.to_string(),
            message: format!("Predictable username detected: {}", value),
            line_content: raw.to_string(),
            risk: Risk::Medium,
            recommendation: "Use unique, non-predictable usernames".to_string(),
            fixable: false,
        });
    }

    if strict {
        if DEFAULT_VALUES.contains(&value_lower.as_str()) {
            findings.push(SecurityFinding {
                severity: Severity::Warning,
                line: Location::Line(number),
                key: key.to_string(),
                value: value.to_string(),
                message: format!("Default/example value detected: {}", value),
                line_content: raw.to_string(),
                risk: Risk::Medium,
                recommendation: "Replace with actual secure value".to_string(),
                fixable: false,
            });
        }

        if value.is_empty() && is_sensitive_key(key) {
            findings.push(SecurityFinding {
                severity: Severity::Warning,
                line: Location::Line(number),
                key: key.to_string(),
                value: value.to_string(),
                message: format!("Empty sensitive key: {}", key),
                line_content: raw.to_string(),
                risk: Risk::Medium,
                recommendation: "Set a secure value or remove if not needed".to_string(),
                fixable: false,
            });
        }

        if LOCAL_VALUES.contains(&value_lower.as_str())
            && (key_lower.contains("host") || key_lower.contains("url"))
        {
            findings.push(SecurityFinding {
                severity: Severity::Warning,
                line: Location::Line(number),
                key: key.to_string(),
                value: value.to_string(),
                message: format!("Local development value in production: {}", value),
                line_content: raw.to_string(),
                risk: Risk::Medium,
                recommendation: "Use production host/URL values".to_string(),
                fixable: false,
            });
        }
    }
}

fn scan_file(content: &str, strict: bool, findings: &mut Vec<SecurityFinding>) {
    if strict {
        findings.push(SecurityFinding {
            severity: Severity::Info,
            line: Location::File,
            key: String::new(),
            value: String::new(),
            message: "Ensure .env file has restricted permissions (600 or 400)".to_string(),
            line_content: "File permission check".to_string(),
            risk: Risk::Low,
            recommendation: "Set file permissions to 600 (owner read/write only)".to_string(),
            fixable: false,
        });
    }

    let commented_sensitive =
        Regex::new(r"(?i)#\s*(password|secret|key|token)\s*=\s*\S+").expect("bad comment pattern");
    if commented_sensitive.is_match(content) {
        findings.push(SecurityFinding {
            severity: Severity::Warning,
            line: Location::File,
            key: String::new(),
            value: String::new(),
            message: "Commented sensitive data detected".to_string(),
            line_content: "Commented sensitive values".to_string(),
            risk: Risk::Medium,
            recommendation: "Remove commented sensitive data".to_string(),
            fixable: true,
        });
    }

    let key_prefix_in_comment =
        Regex::new(r"(?i)#.*(sk-|pk_|ghp_|gho_|ghu_|ghs_|ghr_)").expect("bad prefix pattern");
    if key_prefix_in_comment.is_match(content) {
        findings.push(SecurityFinding {
            severity: Severity::Error,
            line: Location::File,
            key: String::new(),
            value: String::new(),
            message: "Potential secret key pattern detected in comments".to_string(),
            line_content: "Secret key in comment".to_string(),
            risk: Risk::High,
            recommendation: "Remove any secret keys from comments".to_string(),
            fixable: true,
        });
    }
}

/// Query version control for exposure of the env file.
///
/// Degrades silently to no findings when no `.git` directory exists; a
/// failing or absent `git` binary is treated as "not tracked".
pub fn check_git_tracking(file_path: &str, root: &Path) -> Vec<SecurityFinding> {
    let mut findings = Vec::new();
    if !root.join(".git").is_dir() {
        return findings;
    }

    let tracked = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["ls-files", file_path])
        .output()
        .ok()
        .map(|out| !String::from_utf8_lossy(&out.stdout).trim().is_empty())
        .unwrap_or(false);

    if tracked {
        findings.push(SecurityFinding {
            severity: Severity::Error,
            line: Location::Git,
            key: String::new(),
            value: String::new(),
            message: format!("Environment file is tracked by Git: {}", file_path),
            line_content: "File is committed to version control".to_string(),
            risk: Risk::Critical,
            recommendation: format!("Remove from Git tracking: git rm --cached {}", file_path),
            fixable: false,
        });
    } else {
        findings.push(SecurityFinding {
            severity: Severity::Info,
            line: Location::Git,
            key: String::new(),
            value: String::new(),
            message: "Environment file is not tracked by Git (good)".to_string(),
            line_content: "File is properly ignored".to_string(),
            risk: Risk::None,
            recommendation: "Continue to keep this file out of version control".to_string(),
            fixable: false,
        });
    }

    let gitignore = root.join(".gitignore");
    if gitignore.exists() {
        let ignored = fs::read_to_string(&gitignore).unwrap_or_default();
        if !ignored.contains(file_path) && !ignored.contains("*.env") {
            findings.push(SecurityFinding {
                severity: Severity::Warning,
                line: Location::Git,
                key: String::new(),
                value: String::new(),
                message: "Environment file not in .gitignore".to_string(),
                line_content: "File may be accidentally committed".to_string(),
                risk: Risk::Medium,
                recommendation: format!("Add {} to .gitignore", file_path),
                fixable: true,
            });
        }
    }

    findings
}

/// Resolve a `--risk-level` token to the minimum risk to keep.
///
/// Unknown tokens resolve to `none`, which keeps every finding.
pub fn minimum_risk(token: &str) -> Risk {
    Risk::parse(token).unwrap_or(Risk::None)
}

/// Keep findings whose risk is at least `minimum`.
pub fn filter_by_min_risk(findings: Vec<SecurityFinding>, minimum: Risk) -> Vec<SecurityFinding> {
    findings.into_iter().filter(|f| f.risk >= minimum).collect()
}

/// Apply fixable findings to the content, one pass.
///
/// The only mechanical fix is neutralizing commented sensitive data:
/// matching comment lines are rewritten to `# REMOVED: ` plus the original
/// line. The result is not re-scanned for convergence.
pub fn auto_fix(content: &str, findings: &[SecurityFinding]) -> String {
    let applies = findings
        .iter()
        .any(|f| f.fixable && f.message == "Commented sensitive data detected");
    if !applies {
        return content.to_string();
    }
    let commented =
        Regex::new(r"(?i)^#\s*(password|secret|key|token)\s*=").expect("bad comment pattern");
    content
        .split('\n')
        .map(|line| {
            if commented.is_match(line) {
                format!("# REMOVED: {}", line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Compose the export payload written by `security --export`.
pub fn compose_export(
    findings: &[SecurityFinding],
    file_path: &str,
    scan_date: &str,
) -> serde_json::Value {
    json!({
        "scan_date": scan_date,
        "file_scanned": file_path,
        "total_issues": findings.len(),
        "issues": findings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sensitive_key_table_order_no_dedup() {
        // API_KEY matches `key` then `api_key`, two findings in table order.
        let findings = scan("API_KEY=abcdefghijklmnopqrstuvwxyz123456", false);
        let sensitive: Vec<_> = findings
            .iter()
            .filter(|f| f.message.starts_with("Sensitive key detected"))
            .collect();
        assert_eq!(sensitive.len(), 2);
        assert_eq!(sensitive[0].severity, Severity::Warning);
        assert_eq!(sensitive[0].risk, Risk::Medium);
    }

    #[test]
    fn test_weak_password_and_sensitive_key_are_distinct_findings() {
        let findings = scan("DB_PASSWORD=password", false);
        assert!(findings
            .iter()
            .any(|f| f.message == "Sensitive key detected: DB_PASSWORD" && f.risk == Risk::High));
        assert!(findings
            .iter()
            .any(|f| f.message == "Weak password detected: password" && f.risk == Risk::High));
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_short_api_key() {
        let findings = scan("MY_API_KEY=short", false);
        assert!(findings
            .iter()
            .any(|f| f.message == "Short API key detected (length: 5)"));
    }

    #[test]
    fn test_predictable_username() {
        let findings = scan("LOGIN=Admin", false);
        assert!(findings
            .iter()
            .any(|f| f.message == "Predictable username detected: Admin"));
    }

    #[test]
    fn test_strict_checks() {
        let none = scan("DB_HOST=localhost", false);
        assert!(none
            .iter()
            .all(|f| !f.message.starts_with("Local development value")));

        let strict = scan("DB_HOST=localhost\nAPP_SECRET=\nMAIL_DRIVER=example", true);
        assert!(strict
            .iter()
            .any(|f| f.message == "Local development value in production: localhost"));
        assert!(strict
            .iter()
            .any(|f| f.message == "Empty sensitive key: APP_SECRET"));
        assert!(strict
            .iter()
            .any(|f| f.message == "Default/example value detected: example"));
        // Strict mode also emits the file-permission reminder.
        assert!(strict
            .iter()
            .any(|f| f.line == Location::File && f.risk == Risk::Low));
    }

    #[test]
    fn test_commented_sensitive_data_and_key_prefix() {
        let findings = scan("# password=hunter2\n# note: sk-abcdef\nAPP_NAME=x", false);
        assert!(findings
            .iter()
            .any(|f| f.message == "Commented sensitive data detected" && f.fixable));
        assert!(findings
            .iter()
            .any(|f| f.message == "Potential secret key pattern detected in comments"
                && f.risk == Risk::High));
    }

    #[test]
    fn test_filter_by_min_risk_keeps_critical_above_high() {
        let mut findings = scan("DB_PASSWORD=password\nDB_HOST=example.org", false);
        findings.push(SecurityFinding {
            severity: Severity::Error,
            line: Location::Git,
            key: String::new(),
            value: String::new(),
            message: "Environment file is tracked by Git: .env".to_string(),
            line_content: "File is committed to version control".to_string(),
            risk: Risk::Critical,
            recommendation: "Remove from Git tracking: git rm --cached .env".to_string(),
            fixable: false,
        });
        let total = findings.len();
        let high = filter_by_min_risk(findings, Risk::High);
        assert!(high.len() < total);
        assert!(high.iter().all(|f| f.risk >= Risk::High));
        assert!(high.iter().any(|f| f.risk == Risk::High));
        assert!(high.iter().any(|f| f.risk == Risk::Critical));
    }

    #[test]
    fn test_minimum_risk_unknown_token_keeps_everything() {
        assert_eq!(minimum_risk("high"), Risk::High);
        assert_eq!(minimum_risk("CRITICAL"), Risk::Critical);
        assert_eq!(minimum_risk("bogus"), Risk::None);

        // An unrecognized token must not drop risk-none findings, like the
        // untracked-file note from the git check.
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let findings = check_git_tracking(".env", dir.path());
        assert!(findings.iter().any(|f| f.risk == Risk::None));
        let kept = filter_by_min_risk(findings.clone(), minimum_risk("bogus"));
        assert_eq!(kept.len(), findings.len());
    }

    #[test]
    fn test_auto_fix_rewrites_commented_sensitive_lines() {
        let content = "# password=hunter2\nAPP_NAME=x";
        let findings = scan(content, false);
        let fixed = auto_fix(content, &findings);
        assert_eq!(fixed, "# REMOVED: # password=hunter2\nAPP_NAME=x");
    }

    #[test]
    fn test_auto_fix_noop_without_fixable_finding() {
        let content = "APP_NAME=x";
        assert_eq!(auto_fix(content, &scan(content, false)), content);
    }

    #[test]
    fn test_git_check_degrades_without_repo() {
        let dir = tempdir().unwrap();
        assert!(check_git_tracking(".env", dir.path()).is_empty());
    }

    #[test]
    fn test_git_check_flags_missing_gitignore_entry() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".gitignore"), "node_modules/\n").unwrap();
        let findings = check_git_tracking(".env", dir.path());
        assert!(findings
            .iter()
            .any(|f| f.message == "Environment file not in .gitignore"));
        // The fake repo has no index, so the file reads as untracked.
        assert!(findings
            .iter()
            .any(|f| f.message == "Environment file is not tracked by Git (good)"
                && f.risk == Risk::None));
    }

    #[test]
    fn test_gitignore_wildcard_suppresses_warning() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".gitignore"), "*.env\n").unwrap();
        let findings = check_git_tracking(".env", dir.path());
        assert!(findings
            .iter()
            .all(|f| f.message != "Environment file not in .gitignore"));
    }

    #[test]
    fn test_compose_export_shape() {
        let findings = scan("DB_PASSWORD=password", false);
        let out = compose_export(&findings, ".env", "2026-01-01T00:00:00Z");
        assert_eq!(out["file_scanned"], ".env");
        assert_eq!(out["total_issues"], 2);
        assert_eq!(out["scan_date"], "2026-01-01T00:00:00Z");
        assert!(out["issues"].as_array().unwrap().len() == 2);
    }
}
