//! Output rendering for compare, audit, lint, and security commands.
//!
//! Supports `text` (default, colored), `json` (pretty-printed), and `xml`
//! (lint/security) outputs. The `compose_*` helpers are pure so shapes can
//! be unit tested without capturing stdout.

use crate::diff::DiffResult;
use crate::models::{Issue, Location, Risk, SecurityFinding, Severity, Summary};
use crate::usage::{AuditReport, UsageMap};
use owo_colors::OwoColorize;
use serde_json::{json, Value as JsonVal};

fn use_colors(output: &str) -> bool {
    output == "text" && std::env::var_os("NO_COLOR").is_none()
}

fn warn_heading(s: &str, color: bool) -> String {
    if color {
        s.yellow().bold().to_string()
    } else {
        s.to_string()
    }
}

fn info_heading(s: &str, color: bool) -> String {
    if color {
        s.green().bold().to_string()
    } else {
        s.to_string()
    }
}

fn severity_label(severity: Severity, color: bool) -> String {
    let label = format!("[{}]", severity.as_str().to_uppercase());
    if !color {
        return label;
    }
    match severity {
        Severity::Error => label.red().bold().to_string(),
        Severity::Warning => label.yellow().bold().to_string(),
        Severity::Info => label.blue().bold().to_string(),
    }
}

fn risk_label(risk: Risk, color: bool) -> String {
    let label = format!("[{}]", risk.as_str().to_uppercase());
    if !color {
        return label;
    }
    match risk {
        Risk::Critical | Risk::High => label.red().bold().to_string(),
        Risk::Medium => label.yellow().bold().to_string(),
        Risk::Low | Risk::None => label.blue().bold().to_string(),
    }
}

/// Print the diff of an example file against one env file.
pub fn print_compare(
    example_path: &str,
    env_path: &str,
    example_total: usize,
    env_total: usize,
    diff: &DiffResult,
    output: &str,
) {
    if output == "json" {
        let out = compose_compare_json(example_path, env_path, example_total, env_total, diff);
        println!("{}", serde_json::to_string_pretty(&out).unwrap());
        return;
    }
    let color = use_colors(output);
    if !diff.missing_in_target.is_empty() {
        println!(
            "{}",
            warn_heading(
                &format!("Missing in {} (present in {}):", env_path, example_path),
                color
            )
        );
        for key in &diff.missing_in_target {
            println!("  - {}", key);
        }
        println!();
    }
    if !diff.extra_in_target.is_empty() {
        println!(
            "{}",
            warn_heading(
                &format!("Extra in {} (not in {}):", env_path, example_path),
                color
            )
        );
        for key in &diff.extra_in_target {
            println!("  - {}", key);
        }
        println!();
    }
    if !diff.changed_values.is_empty() {
        println!(
            "{}",
            warn_heading(
                &format!(
                    "Different values between {} and {}:",
                    example_path, env_path
                ),
                color
            )
        );
        for change in &diff.changed_values {
            println!("  {}:", change.key);
            println!("    {}: {}", example_path, change.source_value);
            println!("    {}: {}", env_path, change.target_value);
        }
        println!();
    }
    println!("{}", info_heading("Summary:", color));
    println!("  Total keys in {}: {}", example_path, example_total);
    println!("  Total keys in {}: {}", env_path, env_total);
    println!("  Missing keys: {}", diff.missing_in_target.len());
    println!("  Extra keys: {}", diff.extra_in_target.len());
    println!("  Different values: {}", diff.changed_values.len());
}

/// Compose the compare JSON object (pure) for testing purposes.
pub fn compose_compare_json(
    example_path: &str,
    env_path: &str,
    example_total: usize,
    env_total: usize,
    diff: &DiffResult,
) -> JsonVal {
    json!({
        "example": example_path,
        "env": env_path,
        "missing_in_env": diff.missing_in_target,
        "extra_in_env": diff.extra_in_target,
        "changed_values": diff.changed_values,
        "summary": {
            "example_keys": example_total,
            "env_keys": env_total,
            "missing": diff.missing_in_target.len(),
            "extra": diff.extra_in_target.len(),
            "changed": diff.changed_values.len(),
        }
    })
}

/// Print the usage audit report.
pub fn print_audit(
    report: &AuditReport,
    usages: &UsageMap,
    detailed: bool,
    example_path: &str,
    env_path: &str,
    output: &str,
) {
    if output == "json" {
        let out = compose_audit_json(report, usages);
        println!("{}", serde_json::to_string_pretty(&out).unwrap());
        return;
    }
    let color = use_colors(output);
    println!(
        "{}",
        info_heading("Environment Variable Usage Analysis", color)
    );
    println!("{}", "=".repeat(50));

    if !report.missing_in_example.is_empty() {
        println!(
            "{}",
            warn_heading(
                &format!(
                    "Environment variables used in code but missing in {}:",
                    example_path
                ),
                color
            )
        );
        for key in &report.missing_in_example {
            println!("  - {}", key);
            if detailed {
                print_usage_details(usages, key);
            }
        }
        println!();
    }
    if !report.missing_in_env.is_empty() {
        println!(
            "{}",
            warn_heading(
                &format!(
                    "Environment variables used in code but missing in {}:",
                    env_path
                ),
                color
            )
        );
        for key in &report.missing_in_env {
            println!("  - {}", key);
            if detailed {
                print_usage_details(usages, key);
            }
        }
        println!();
    }
    if !report.unused_in_example.is_empty() {
        println!(
            "{}",
            info_heading(
                &format!(
                    "Environment variables defined in {} but not used in code:",
                    example_path
                ),
                color
            )
        );
        for key in &report.unused_in_example {
            println!("  - {}", key);
        }
        println!();
    }
    if !report.unused_in_env.is_empty() {
        println!(
            "{}",
            info_heading(
                &format!(
                    "Environment variables defined in {} but not used in code:",
                    env_path
                ),
                color
            )
        );
        for key in &report.unused_in_env {
            println!("  - {}", key);
        }
        println!();
    }

    println!("{}", info_heading("Summary:", color));
    println!(
        "  Total environment variables used in code: {}",
        report.used_total
    );
    println!(
        "  Total variables defined in {}: {}",
        example_path, report.example_total
    );
    println!(
        "  Total variables defined in {}: {}",
        env_path, report.env_total
    );
    println!("  Missing in {}: {}", example_path, report.missing_in_example.len());
    println!("  Missing in {}: {}", env_path, report.missing_in_env.len());
    println!("  Unused in {}: {}", example_path, report.unused_in_example.len());
    println!("  Unused in {}: {}", env_path, report.unused_in_env.len());
}

fn print_usage_details(usages: &UsageMap, key: &str) {
    if let Some(records) = usages.get(key) {
        for record in records {
            println!("    {} in {}:{}", record.kind.as_str(), record.file, record.line);
        }
    }
}

/// Compose the audit JSON object (pure) for testing purposes.
pub fn compose_audit_json(report: &AuditReport, usages: &UsageMap) -> JsonVal {
    let usage_map: serde_json::Map<String, JsonVal> = usages
        .iter()
        .map(|(key, records)| (key.to_string(), serde_json::to_value(records).unwrap()))
        .collect();
    json!({
        "report": report,
        "usages": usage_map,
    })
}

/// Print lint results in the requested format.
pub fn print_lint(issues: &[Issue], output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_lint_json(issues)).unwrap()
        ),
        "xml" => println!("{}", lint_xml(issues)),
        _ => {
            let color = use_colors(output);
            if issues.is_empty() {
                println!(
                    "{}",
                    info_heading("No issues found! Your environment file is clean.", color)
                );
                return;
            }
            let summary = Summary::of_severities(issues.iter().map(|i| i.severity));
            println!("Found {} issues:", summary.total());
            println!("  Errors: {}", summary.errors);
            println!("  Warnings: {}", summary.warnings);
            println!("  Info: {}", summary.infos);
            println!();
            for issue in issues {
                let fixable = if issue.fixable { " [FIXABLE]" } else { "" };
                println!(
                    "{}{} {}: {}",
                    severity_label(issue.severity, color),
                    fixable,
                    issue.line.label(),
                    issue.message
                );
                if issue.line.line_number().is_some() {
                    println!("  {}", issue.line_content);
                }
                println!();
            }
        }
    }
}

/// Print security findings in the requested format.
pub fn print_security(findings: &[SecurityFinding], output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_security_json(findings)).unwrap()
        ),
        "xml" => println!("{}", security_xml(findings)),
        _ => {
            let color = use_colors(output);
            if findings.is_empty() {
                println!(
                    "{}",
                    info_heading(
                        "No security issues found! Your environment file is secure.",
                        color
                    )
                );
                return;
            }
            let count = |risk: Risk| findings.iter().filter(|f| f.risk == risk).count();
            println!("Security Scan Results:");
            println!("  Critical: {}", count(Risk::Critical));
            println!("  High: {}", count(Risk::High));
            println!("  Medium: {}", count(Risk::Medium));
            println!("  Low: {}", count(Risk::Low));
            println!();
            for finding in findings {
                let fixable = if finding.fixable { " [FIXABLE]" } else { "" };
                println!(
                    "{}{} {} - {}: {}",
                    risk_label(finding.risk, color),
                    fixable,
                    finding.severity.as_str().to_uppercase(),
                    finding.line.label(),
                    finding.message
                );
                if finding.line.line_number().is_some() {
                    println!("  {}", finding.line_content);
                }
                println!("  Recommendation: {}", finding.recommendation);
                println!();
            }
        }
    }
}

/// Compose lint JSON (pure) for testing/snapshot purposes.
pub fn compose_lint_json(issues: &[Issue]) -> JsonVal {
    serde_json::to_value(issues).unwrap()
}

/// Compose security JSON (pure) for testing/snapshot purposes.
pub fn compose_security_json(findings: &[SecurityFinding]) -> JsonVal {
    serde_json::to_value(findings).unwrap()
}

fn location_attr(location: Location) -> String {
    match location {
        Location::Line(n) => n.to_string(),
        Location::File => "file".to_string(),
        Location::Git => "git".to_string(),
    }
}

/// Escape text for use in XML attributes and element content.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render lint issues as a flat XML document.
pub fn lint_xml(issues: &[Issue]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<lint-results>\n");
    for issue in issues {
        xml.push_str(&format!(
            "  <issue type=\"{}\" line=\"{}\" rule=\"{}\" fixable=\"{}\">\n",
            issue.severity.as_str(),
            location_attr(issue.line),
            issue.rule.as_str(),
            issue.fixable
        ));
        xml.push_str(&format!(
            "    <message>{}</message>\n",
            xml_escape(&issue.message)
        ));
        xml.push_str(&format!(
            "    <content>{}</content>\n",
            xml_escape(&issue.line_content)
        ));
        xml.push_str("  </issue>\n");
    }
    xml.push_str("</lint-results>");
    xml
}

/// Render security findings as a flat XML document.
pub fn security_xml(findings: &[SecurityFinding]) -> String {
    let mut xml =
        String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<security-scan-results>\n");
    for finding in findings {
        xml.push_str(&format!(
            "  <issue type=\"{}\" risk=\"{}\" line=\"{}\" fixable=\"{}\">\n",
            finding.severity.as_str(),
            finding.risk.as_str(),
            location_attr(finding.line),
            finding.fixable
        ));
        xml.push_str(&format!(
            "    <message>{}</message>\n",
            xml_escape(&finding.message)
        ));
        xml.push_str(&format!(
            "    <content>{}</content>\n",
            xml_escape(&finding.line_content)
        ));
        xml.push_str(&format!(
            "    <recommendation>{}</recommendation>\n",
            xml_escape(&finding.recommendation)
        ));
        xml.push_str("  </issue>\n");
    }
    xml.push_str("</security-scan-results>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::{lint, LintOptions};
    use crate::security::scan;

    #[test]
    fn test_compose_lint_json_shape() {
        let issues = lint("FOO = bar baz", &LintOptions::default());
        let out = compose_lint_json(&issues);
        let arr = out.as_array().unwrap();
        assert!(!arr.is_empty());
        assert_eq!(arr[0]["type"], "warning");
        assert_eq!(arr[0]["line"], 1);
        assert_eq!(arr[0]["rule"], "format");
        assert_eq!(arr[0]["fixable"], true);
    }

    #[test]
    fn test_lint_xml_escapes_content() {
        let issues = lint("FOO=a <b> & \"c\"", &LintOptions::default());
        let xml = lint_xml(&issues);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("&lt;b&gt; &amp; &quot;c&quot;"));
        assert!(!xml.contains("<b>"));
    }

    #[test]
    fn test_security_xml_includes_recommendation_and_risk() {
        let findings = scan("DB_PASSWORD=password", false);
        let xml = security_xml(&findings);
        assert!(xml.contains("<security-scan-results>"));
        assert!(xml.contains("risk=\"high\""));
        assert!(xml.contains("<recommendation>"));
    }

    #[test]
    fn test_file_level_location_attribute() {
        let findings = scan("# password=x", false);
        let xml = security_xml(&findings);
        assert!(xml.contains("line=\"file\""));
    }

    #[test]
    fn test_compose_compare_json_summary() {
        let source = crate::parser::EnvMapping::parse("A=1\nB=2");
        let target = crate::parser::EnvMapping::parse("B=3");
        let d = crate::diff::diff(&source, &target);
        let out = compose_compare_json(".env.example", ".env", source.len(), target.len(), &d);
        assert_eq!(out["summary"]["missing"], 1);
        assert_eq!(out["summary"]["changed"], 1);
        assert_eq!(out["missing_in_env"][0], "A");
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a&b<c>'d'"), "a&amp;b&lt;c&gt;&apos;d&apos;");
    }
}
