//! Shared data models for diff, lint, usage, and security results.

use serde::{Serialize, Serializer};

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
/// Severity of a reported issue or finding.
///
/// `error` means the file is likely broken, `warning` means it works but is
/// risky, `info` is a style suggestion.
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
/// Rule category a lint issue belongs to.
pub enum Category {
    Syntax,
    Format,
    Convention,
    Security,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Syntax => "syntax",
            Category::Format => "format",
            Category::Convention => "convention",
            Category::Security => "security",
        }
    }

    /// Parse a category token as used by `--rules`. Unknown tokens map to `None`.
    pub fn parse(s: &str) -> Option<Category> {
        match s.trim() {
            "syntax" => Some(Category::Syntax),
            "format" => Some(Category::Format),
            "convention" => Some(Category::Convention),
            "security" => Some(Category::Security),
            _ => None,
        }
    }
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[serde(rename_all = "lowercase")]
/// Risk level of a security finding, ordered `none < low < medium < high < critical`.
pub enum Risk {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Risk {
    pub fn as_str(self) -> &'static str {
        match self {
            Risk::None => "none",
            Risk::Low => "low",
            Risk::Medium => "medium",
            Risk::High => "high",
            Risk::Critical => "critical",
        }
    }

    /// Parse a risk token as used by `--risk-level` (case-insensitive).
    pub fn parse(s: &str) -> Option<Risk> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Risk::None),
            "low" => Some(Risk::Low),
            "medium" => Some(Risk::Medium),
            "high" => Some(Risk::High),
            "critical" => Some(Risk::Critical),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Where an issue was found: a 1-based line, the whole file, or git metadata.
pub enum Location {
    Line(usize),
    File,
    Git,
}

impl Location {
    pub fn line_number(self) -> Option<usize> {
        match self {
            Location::Line(n) => Some(n),
            _ => None,
        }
    }

    /// Human label used by the text printers, e.g. `Line 3`, `FILE`, `GIT`.
    pub fn label(self) -> String {
        match self {
            Location::Line(n) => format!("Line {}", n),
            Location::File => "FILE".to_string(),
            Location::Git => "GIT".to_string(),
        }
    }
}

// Line locations serialize as a number; file/git levels keep the sentinel
// strings so JSON and XML consumers see `"file"` / `"git"`.
impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Location::Line(n) => serializer.serialize_u64(*n as u64),
            Location::File => serializer.serialize_str("file"),
            Location::Git => serializer.serialize_str("git"),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
/// A single lint issue with severity, location, and fixability.
pub struct Issue {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub line: Location,
    pub message: String,
    pub line_content: String,
    pub rule: Category,
    pub fixable: bool,
}

#[derive(Serialize, Clone, Debug)]
/// A security finding: the offending key/value plus risk and remediation.
///
/// `key` and `value` are empty for file-level and git-level findings.
pub struct SecurityFinding {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub line: Location,
    pub key: String,
    pub value: String,
    pub message: String,
    pub line_content: String,
    pub risk: Risk,
    pub recommendation: String,
    pub fixable: bool,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
/// How a configuration key is accessed in source code.
pub enum AccessKind {
    #[serde(rename = "env()")]
    DirectEnv,
    #[serde(rename = "config()")]
    ConfigAccess,
}

impl AccessKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessKind::DirectEnv => "env()",
            AccessKind::ConfigAccess => "config()",
        }
    }
}

#[derive(Serialize, Clone, Debug)]
/// One usage site of an environment variable in scanned source.
pub struct UsageRecord {
    #[serde(rename = "type")]
    pub kind: AccessKind,
    pub file: String,
    pub line: usize,
}

#[derive(Serialize, Clone, Copy, Debug, Default)]
/// Aggregated issue counts used by printers and exit-code mapping.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl Summary {
    pub fn of_severities<I: IntoIterator<Item = Severity>>(severities: I) -> Summary {
        let mut s = Summary::default();
        for sev in severities {
            match sev {
                Severity::Error => s.errors += 1,
                Severity::Warning => s.warnings += 1,
                Severity::Info => s.infos += 1,
            }
        }
        s
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_ordering() {
        assert!(Risk::Critical > Risk::High);
        assert!(Risk::High > Risk::Medium);
        assert!(Risk::Medium > Risk::Low);
        assert!(Risk::Low > Risk::None);
    }

    #[test]
    fn test_location_serialization() {
        assert_eq!(
            serde_json::to_value(Location::Line(7)).unwrap(),
            serde_json::json!(7)
        );
        assert_eq!(
            serde_json::to_value(Location::File).unwrap(),
            serde_json::json!("file")
        );
        assert_eq!(
            serde_json::to_value(Location::Git).unwrap(),
            serde_json::json!("git")
        );
    }

    #[test]
    fn test_category_parse_rejects_unknown() {
        assert_eq!(Category::parse(" format "), Some(Category::Format));
        assert_eq!(Category::parse("styles"), None);
    }

    #[test]
    fn test_summary_counts() {
        let s = Summary::of_severities([Severity::Error, Severity::Warning, Severity::Warning]);
        assert_eq!(s.errors, 1);
        assert_eq!(s.warnings, 2);
        assert_eq!(s.infos, 0);
        assert_eq!(s.total(), 3);
    }
}
