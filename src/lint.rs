//! Line-by-line lint rules for env files, plus a single-pass auto-fix.
//!
//! Issues are collected in discovery order: per-line checks top to bottom,
//! then file-level checks appended.

use crate::models::{Category, Issue, Location, Severity};
use regex::Regex;
use std::collections::HashMap;

#[derive(Debug, Clone)]
/// Options recognized by [`lint`].
pub struct LintOptions {
    /// Enables the security-adjacent sensitive-key check.
    pub strict: bool,
    /// Suppresses the empty-value warning.
    pub ignore_empty: bool,
    /// Enabled rule categories; default is syntax, format, convention.
    pub rules: Vec<Category>,
}

impl Default for LintOptions {
    fn default() -> Self {
        LintOptions {
            strict: false,
            ignore_empty: false,
            rules: vec![Category::Syntax, Category::Format, Category::Convention],
        }
    }
}

/// Parse a `--rules` list like `syntax,format`. Empty or absent input keeps
/// the default set; unknown tokens are dropped.
pub fn parse_rules(raw: Option<&str>) -> Vec<Category> {
    match raw {
        None | Some("") => LintOptions::default().rules,
        Some(s) => s.split(',').filter_map(Category::parse).collect(),
    }
}

/// Lint raw env-file text, producing issues in discovery order.
pub fn lint(content: &str, opts: &LintOptions) -> Vec<Issue> {
    let spaces_around_equals = Regex::new(r"\s+=\s+").expect("bad spacing pattern");
    let quoted = Regex::new(r#"^["'].*["']$"#).expect("bad quote pattern");

    let mut issues = Vec::new();
    for (i, line) in content.split('\n').enumerate() {
        lint_line(
            line,
            i + 1,
            opts,
            &spaces_around_equals,
            &quoted,
            &mut issues,
        );
    }
    lint_file(content, opts, &mut issues);
    issues
}

fn enabled(opts: &LintOptions, category: Category) -> bool {
    opts.rules.contains(&category)
}

fn lint_line(
    raw: &str,
    number: usize,
    opts: &LintOptions,
    spaces_around_equals: &Regex,
    quoted: &Regex,
    issues: &mut Vec<Issue>,
) {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return;
    }

    // Without an `=` there is no key/value split; the missing-equals error
    // short-circuits every remaining per-line check.
    let Some((raw_key, raw_value)) = trimmed.split_once('=') else {
        if enabled(opts, Category::Syntax) {
            issues.push(Issue {
                severity: Severity::Error,
                line: Location::Line(number),
                message: "Missing equals sign (=)".to_string(),
                line_content: raw.to_string(),
                rule: Category::Syntax,
                fixable: false,
            });
        }
        return;
    };
    let key = raw_key.trim();
    let value = raw_value.trim();

    if enabled(opts, Category::Syntax) && key.is_empty() {
        issues.push(Issue {
            severity: Severity::Error,
            line: Location::Line(number),
            message: "Empty key".to_string(),
            line_content: raw.to_string(),
            rule: Category::Syntax,
            fixable: false,
        });
    }

    if enabled(opts, Category::Format) {
        if spaces_around_equals.is_match(raw) {
            issues.push(Issue {
                severity: Severity::Warning,
                line: Location::Line(number),
                message: "Spaces around equals sign (recommended: no spaces)".to_string(),
                line_content: raw.to_string(),
                rule: Category::Format,
                fixable: true,
            });
        }
        if value.contains(' ') && !quoted.is_match(value) {
            issues.push(Issue {
                severity: Severity::Warning,
                line: Location::Line(number),
                message: "Value with spaces should be quoted".to_string(),
                line_content: raw.to_string(),
                rule: Category::Format,
                fixable: true,
            });
        }
        if !opts.ignore_empty && value.is_empty() {
            issues.push(Issue {
                severity: Severity::Warning,
                line: Location::Line(number),
                message: "Empty value (consider adding a default or comment)".to_string(),
                line_content: raw.to_string(),
                rule: Category::Format,
                fixable: false,
            });
        }
    }

    if enabled(opts, Category::Convention) {
        if key != key.to_uppercase() {
            issues.push(Issue {
                severity: Severity::Info,
                line: Location::Line(number),
                message: "Key should be uppercase".to_string(),
                line_content: raw.to_string(),
                rule: Category::Convention,
                fixable: true,
            });
        }
        if key.contains('-') && !key.contains('_') {
            issues.push(Issue {
                severity: Severity::Info,
                line: Location::Line(number),
                message: "Consider using snake_case instead of kebab-case for keys".to_string(),
                line_content: raw.to_string(),
                rule: Category::Convention,
                fixable: false,
            });
        }
    }

    if opts.strict && enabled(opts, Category::Security) {
        let key_lower = key.to_lowercase();
        // One warning per matching keyword, matching the classifier's
        // no-deduplication behavior.
        for sensitive in ["password", "secret", "key", "token", "api_key"] {
            if key_lower.contains(sensitive) && !value.is_empty() {
                issues.push(Issue {
                    severity: Severity::Warning,
                    line: Location::Line(number),
                    message:
                        "Sensitive key detected - ensure this is not committed to version control"
                            .to_string(),
                    line_content: raw.to_string(),
                    rule: Category::Security,
                    fixable: false,
                });
            }
        }
    }
}

fn lint_file(content: &str, opts: &LintOptions, issues: &mut Vec<Issue>) {
    if enabled(opts, Category::Syntax) {
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        for (i, line) in content.split('\n').enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((raw_key, _)) = trimmed.split_once('=') else {
                continue;
            };
            let key = raw_key.trim().to_string();
            if first_seen.contains_key(&key) {
                issues.push(Issue {
                    severity: Severity::Error,
                    line: Location::Line(i + 1),
                    message: format!("Duplicate key: {}", key),
                    line_content: line.to_string(),
                    rule: Category::Syntax,
                    fixable: false,
                });
            } else {
                first_seen.insert(key, i + 1);
            }
        }
    }

    if enabled(opts, Category::Format) {
        let trailing = Regex::new(r"(?m)[ \t]+$").expect("bad trailing pattern");
        if trailing.is_match(content) {
            issues.push(Issue {
                severity: Severity::Warning,
                line: Location::File,
                message: "File contains trailing whitespace".to_string(),
                line_content: "Trailing whitespace detected".to_string(),
                rule: Category::Format,
                fixable: true,
            });
        }
        if content.contains("\r\n") && content.replace("\r\n", "").contains('\n') {
            issues.push(Issue {
                severity: Severity::Warning,
                line: Location::File,
                message: "Mixed line endings detected (CRLF and LF)".to_string(),
                line_content: "Inconsistent line endings".to_string(),
                rule: Category::Format,
                fixable: true,
            });
        }
    }
}

/// Apply fixable issues to the content, one pass, line-scoped.
///
/// Format fixes collapse `key = value` spacing and quote space-containing
/// unquoted values; convention fixes uppercase the key. The result is not
/// re-linted for convergence.
pub fn auto_fix(content: &str, issues: &[Issue]) -> String {
    let spacing = Regex::new(r"^([^=]+)\s*=\s*(.*)$").expect("bad spacing pattern");
    let key_value = Regex::new(r"^([^=]+)=(.*)$").expect("bad key-value pattern");
    let quoted = Regex::new(r#"^["'].*["']$"#).expect("bad quote pattern");

    let mut fixed_lines = Vec::new();
    for (i, line) in content.split('\n').enumerate() {
        let mut fixed = line.to_string();
        for issue in issues
            .iter()
            .filter(|is| is.fixable && is.line == Location::Line(i + 1))
        {
            match issue.rule {
                Category::Format => {
                    let collapsed = spacing
                        .captures(&fixed)
                        .map(|caps| format!("{}={}", caps[1].trim(), caps[2].trim()));
                    if let Some(collapsed) = collapsed {
                        fixed = collapsed;
                    }
                    let wrapped = key_value.captures(&fixed).and_then(|caps| {
                        let value = caps.get(2).map_or("", |m| m.as_str());
                        if value.contains(' ') && !quoted.is_match(value) {
                            Some(format!("{}=\"{}\"", &caps[1], value))
                        } else {
                            None
                        }
                    });
                    if let Some(wrapped) = wrapped {
                        fixed = wrapped;
                    }
                }
                Category::Convention => {
                    let uppercased = key_value
                        .captures(&fixed)
                        .map(|caps| format!("{}={}", caps[1].trim().to_uppercase(), &caps[2]));
                    if let Some(uppercased) = uppercased {
                        fixed = uppercased;
                    }
                }
                _ => {}
            }
        }
        fixed_lines.push(fixed);
    }
    fixed_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> LintOptions {
        LintOptions::default()
    }

    fn messages(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.message.as_str()).collect()
    }

    #[test]
    fn test_clean_file_has_no_issues() {
        let issues = lint("APP_NAME=demo\nAPP_ENV=local\n# comment\n", &opts());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_missing_equals_short_circuits() {
        let issues = lint("JUSTAKEY", &opts());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].message, "Missing equals sign (=)");
        assert_eq!(issues[0].line, Location::Line(1));
    }

    #[test]
    fn test_empty_key_error() {
        let issues = lint("=value", &opts());
        assert!(messages(&issues).contains(&"Empty key"));
    }

    #[test]
    fn test_spaces_and_unquoted_value_warnings() {
        let issues = lint("  FOO = bar baz  ", &opts());
        let msgs = messages(&issues);
        assert!(msgs.contains(&"Spaces around equals sign (recommended: no spaces)"));
        assert!(msgs.contains(&"Value with spaces should be quoted"));
    }

    #[test]
    fn test_quoted_value_with_spaces_is_fine() {
        let issues = lint("FOO=\"bar baz\"", &opts());
        assert!(!messages(&issues).contains(&"Value with spaces should be quoted"));
    }

    #[test]
    fn test_empty_value_warning_and_ignore_flag() {
        let issues = lint("FOO=", &opts());
        assert!(messages(&issues)
            .contains(&"Empty value (consider adding a default or comment)"));
        let ignore = LintOptions {
            ignore_empty: true,
            ..opts()
        };
        assert!(lint("FOO=", &ignore).is_empty());
    }

    #[test]
    fn test_convention_checks() {
        let issues = lint("app_name=x", &opts());
        assert!(messages(&issues).contains(&"Key should be uppercase"));
        let issues = lint("APP-NAME=x", &opts());
        assert!(messages(&issues)
            .contains(&"Consider using snake_case instead of kebab-case for keys"));
    }

    #[test]
    fn test_strict_security_emits_one_warning_per_keyword() {
        let o = LintOptions {
            strict: true,
            rules: vec![Category::Security],
            ..opts()
        };
        // API_KEY matches both `key` and `api_key`.
        let issues = lint("API_KEY=abc", &o);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.rule == Category::Security));
        // Empty values are exempt.
        assert!(lint("API_KEY=", &o).is_empty());
    }

    #[test]
    fn test_security_requires_strict_and_category() {
        let o = LintOptions {
            strict: false,
            rules: vec![Category::Security],
            ..opts()
        };
        assert!(lint("SECRET=x", &o).is_empty());
    }

    #[test]
    fn test_duplicate_key_reported_at_second_occurrence() {
        let issues = lint("FOO=1\nBAR=2\nFOO=3", &opts());
        let dups: Vec<_> = issues
            .iter()
            .filter(|i| i.message == "Duplicate key: FOO")
            .collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].line, Location::Line(3));
    }

    #[test]
    fn test_mixed_line_endings_requires_bare_lf() {
        let crlf_only = "A=1\r\nB=2\r\n";
        let issues = lint(crlf_only, &opts());
        assert!(!messages(&issues).contains(&"Mixed line endings detected (CRLF and LF)"));
        let mixed = "A=1\r\nB=2\n";
        let issues = lint(mixed, &opts());
        assert!(messages(&issues).contains(&"Mixed line endings detected (CRLF and LF)"));
    }

    #[test]
    fn test_rule_filtering() {
        let o = LintOptions {
            rules: vec![Category::Convention],
            ..opts()
        };
        // Syntax and format findings are suppressed.
        let issues = lint("foo = bar baz\nfoo=2", &o);
        assert_eq!(messages(&issues), vec!["Key should be uppercase", "Key should be uppercase"]);
    }

    #[test]
    fn test_parse_rules() {
        assert_eq!(
            parse_rules(None),
            vec![Category::Syntax, Category::Format, Category::Convention]
        );
        assert_eq!(
            parse_rules(Some("security, format, bogus")),
            vec![Category::Security, Category::Format]
        );
    }

    #[test]
    fn test_auto_fix_spacing_and_quoting() {
        let content = "FOO = bar baz";
        let issues = lint(content, &opts());
        assert_eq!(auto_fix(content, &issues), "FOO=\"bar baz\"");
    }

    #[test]
    fn test_auto_fix_uppercases_key() {
        let content = "app_name=demo";
        let issues = lint(content, &opts());
        assert_eq!(auto_fix(content, &issues), "APP_NAME=demo");
    }

    #[test]
    fn test_auto_fix_leaves_unflagged_lines_alone() {
        let content = "GOOD=1\nFOO = 2";
        let issues = lint(content, &opts());
        assert_eq!(auto_fix(content, &issues), "GOOD=1\nFOO=2");
    }
}
