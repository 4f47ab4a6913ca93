//! Repair pipeline for an env file measured against its example file.
//!
//! Produces a new text buffer plus a human-readable change log; writing the
//! result back (and any backup copy) is the caller's job.

use crate::parser::EnvMapping;
use regex::Regex;

#[derive(Debug, Clone, Copy, Default)]
/// Which repairs to apply.
pub struct FixOptions {
    /// Append variables present in the example file but absent from the env file.
    pub add_missing: bool,
    /// Drop definition lines whose key is not in the example file.
    pub remove_unused: bool,
    /// Normalize `key = value` spacing and quote space-containing values.
    pub format: bool,
}

impl FixOptions {
    /// When no repair is selected, add-missing and format default on.
    pub fn normalized(self) -> FixOptions {
        if !self.add_missing && !self.remove_unused && !self.format {
            FixOptions {
                add_missing: true,
                remove_unused: false,
                format: true,
            }
        } else {
            self
        }
    }
}

#[derive(Debug, Clone)]
/// Repaired content plus one log entry per applied change.
pub struct FixOutcome {
    pub content: String,
    pub changes: Vec<String>,
}

/// Repair `env_content` against `example_content` per `opts`.
///
/// Passes run in order add-missing, remove-unused, format; each pass sees
/// the previous pass's output. Single pass, no fixed-point loop.
pub fn run_fix(example_content: &str, env_content: &str, opts: &FixOptions) -> FixOutcome {
    let example_vars = EnvMapping::parse(example_content);
    let env_vars = EnvMapping::parse(env_content);

    let mut content = env_content.to_string();
    let mut changes = Vec::new();

    if opts.add_missing {
        let missing: Vec<(&str, &str)> = example_vars
            .iter()
            .filter(|&(key, _)| !env_vars.contains_key(key))
            .collect();
        content = add_missing_variables(&content, &missing, &mut changes);
    }

    if opts.remove_unused {
        let unused: Vec<&str> = env_vars
            .keys()
            .filter(|&key| !example_vars.contains_key(key))
            .collect();
        content = remove_unused_variables(&content, &unused, &mut changes);
    }

    if opts.format {
        content = fix_formatting(&content, &mut changes);
    }

    FixOutcome { content, changes }
}

fn add_missing_variables(
    content: &str,
    missing: &[(&str, &str)],
    changes: &mut Vec<String>,
) -> String {
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    for (key, value) in missing {
        lines.push(format!("{}={}", key, value));
        changes.push(format!("Added missing variable: {}", key));
    }
    lines.join("\n")
}

fn remove_unused_variables(content: &str, unused: &[&str], changes: &mut Vec<String>) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for line in content.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            kept.push(line);
            continue;
        }
        if let Some((raw_key, _)) = trimmed.split_once('=') {
            let key = raw_key.trim();
            if unused.contains(&key) {
                changes.push(format!("Removed unused variable: {}", key));
                continue;
            }
        }
        kept.push(line);
    }
    kept.join("\n")
}

fn fix_formatting(content: &str, changes: &mut Vec<String>) -> String {
    let spacing = Regex::new(r"^([^=]+)\s*=\s*(.*)$").expect("bad spacing pattern");
    let key_value = Regex::new(r"^([^=]+)=(.*)$").expect("bad key-value pattern");
    let quoted = Regex::new(r#"^["'].*["']$"#).expect("bad quote pattern");

    let mut fixed_lines = Vec::new();
    for line in content.split('\n') {
        let mut fixed = line.to_string();

        let collapsed = spacing
            .captures(&fixed)
            .map(|caps| format!("{}={}", caps[1].trim(), caps[2].trim()));
        if let Some(collapsed) = collapsed {
            if collapsed != fixed {
                changes.push(format!("Fixed spacing: {} -> {}", fixed, collapsed));
                fixed = collapsed;
            }
        }

        let wrapped = key_value.captures(&fixed).and_then(|caps| {
            let key = caps.get(1).map_or("", |m| m.as_str());
            let value = caps.get(2).map_or("", |m| m.as_str());
            if value.contains(' ') && !quoted.is_match(value) {
                Some((
                    format!("{}=\"{}\"", key, value),
                    format!("Added quotes: {}={}", key, value),
                ))
            } else {
                None
            }
        });
        if let Some((new_line, note)) = wrapped {
            changes.push(format!("{} -> {}", note, new_line));
            fixed = new_line;
        }

        fixed_lines.push(fixed);
    }
    fixed_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_normalization() {
        let o = FixOptions::default().normalized();
        assert!(o.add_missing && o.format && !o.remove_unused);
        let explicit = FixOptions {
            remove_unused: true,
            ..FixOptions::default()
        }
        .normalized();
        assert!(explicit.remove_unused && !explicit.add_missing && !explicit.format);
    }

    #[test]
    fn test_add_missing_appends_example_values() {
        let opts = FixOptions {
            add_missing: true,
            ..FixOptions::default()
        };
        let outcome = run_fix("A=1\nB=from_example", "A=1", &opts);
        assert_eq!(outcome.content, "A=1\nB=from_example");
        assert_eq!(outcome.changes, vec!["Added missing variable: B"]);
    }

    #[test]
    fn test_remove_unused_keeps_comments() {
        let opts = FixOptions {
            remove_unused: true,
            ..FixOptions::default()
        };
        let outcome = run_fix("A=1", "# keep me\nA=1\nSTALE=x", &opts);
        assert_eq!(outcome.content, "# keep me\nA=1");
        assert_eq!(outcome.changes, vec!["Removed unused variable: STALE"]);
    }

    #[test]
    fn test_format_collapses_spacing_and_quotes() {
        let opts = FixOptions {
            format: true,
            ..FixOptions::default()
        };
        let outcome = run_fix("", "FOO = bar baz", &opts);
        assert_eq!(outcome.content, "FOO=\"bar baz\"");
        assert_eq!(outcome.changes.len(), 2);
    }

    #[test]
    fn test_no_changes_for_clean_file() {
        let opts = FixOptions::default().normalized();
        let content = "A=1\nB=\"two words\"";
        let outcome = run_fix("A=1\nB=\"two words\"", content, &opts);
        assert_eq!(outcome.content, content);
        assert!(outcome.changes.is_empty());
    }
}
