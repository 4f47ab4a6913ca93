use clap::Parser;
use std::fs;
use std::path::Path;
use std::process;

use envdoctor::cli::{Cli, Commands};
use envdoctor::config::{resolve_effective, Effective};
use envdoctor::parser::EnvMapping;
use envdoctor::{diff, fix, lint, output, security, usage, utils, walk};

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Version => {
            println!("envdoctor {}", env!("CARGO_PKG_VERSION"));
            0
        }
        Commands::Compare {
            repo_root,
            example,
            env,
            all,
            output,
        } => run_compare(
            repo_root.as_deref(),
            example.as_deref(),
            env.as_deref(),
            all,
            output.as_deref(),
        ),
        Commands::Audit {
            repo_root,
            example,
            env,
            config,
            detailed,
            output,
        } => run_audit(
            repo_root.as_deref(),
            example.as_deref(),
            env.as_deref(),
            config,
            detailed,
            output.as_deref(),
        ),
        Commands::Lint {
            repo_root,
            file,
            strict,
            output,
            fix,
            ignore_empty,
            rules,
        } => run_lint(
            repo_root.as_deref(),
            file.as_deref(),
            strict,
            output.as_deref(),
            fix,
            ignore_empty,
            rules.as_deref(),
        ),
        Commands::Security {
            repo_root,
            file,
            strict,
            check_git,
            output,
            risk_level,
            export,
            fix,
        } => run_security(
            repo_root.as_deref(),
            file.as_deref(),
            strict,
            check_git,
            output.as_deref(),
            risk_level.as_deref(),
            export,
            fix,
        ),
        Commands::Fix {
            repo_root,
            example,
            env,
            backup,
            dry_run,
            format,
            add_missing,
            remove_unused,
        } => run_fix(
            repo_root.as_deref(),
            example.as_deref(),
            env.as_deref(),
            backup,
            dry_run,
            format,
            add_missing,
            remove_unused,
        ),
    };

    process::exit(code);
}

fn read_required(path: &Path, label: &str, rel: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(_) => {
            eprintln!("{} {} not found: {}", utils::error_prefix(), label, rel);
            None
        }
    }
}

fn run_compare(
    repo_root: Option<&str>,
    example: Option<&str>,
    env: Option<&str>,
    all: bool,
    cli_output: Option<&str>,
) -> i32 {
    let eff = resolve_effective(repo_root, example, env, cli_output);

    let example_path = eff.repo_root.join(&eff.example_file);
    let Some(example_content) = read_required(&example_path, "example file", &eff.example_file)
    else {
        return 1;
    };
    let example_vars = EnvMapping::parse(&example_content);

    if all {
        return compare_all(&eff, &example_vars);
    }

    let env_path = eff.repo_root.join(&eff.env_file);
    let Some(env_content) = read_required(&env_path, "environment file", &eff.env_file) else {
        return 1;
    };
    let env_vars = EnvMapping::parse(&env_content);

    if eff.output == "text" {
        println!("Comparing {} with {}", eff.example_file, eff.env_file);
        println!();
    }
    let result = diff::diff(&example_vars, &env_vars);
    output::print_compare(
        &eff.example_file,
        &eff.env_file,
        example_vars.len(),
        env_vars.len(),
        &result,
        &eff.output,
    );
    0
}

fn compare_all(eff: &Effective, example_vars: &EnvMapping) -> i32 {
    if eff.output == "text" {
        println!(
            "Comparing all environment files with {}",
            eff.example_file
        );
        println!();
    }

    let files: Vec<String> = walk::find_files(
        &eff.repo_root,
        &eff.file_patterns,
        &eff.exclude_directories,
    )
    .iter()
    .map(|p| p.to_string_lossy().replace('\\', "/"))
    .filter(|rel| *rel != eff.example_file)
    .collect();

    if files.is_empty() {
        eprintln!(
            "{} no environment files found to compare",
            utils::warn_prefix()
        );
        return 0;
    }

    for rel in files {
        let content = fs::read_to_string(eff.repo_root.join(&rel)).unwrap_or_default();
        let env_vars = EnvMapping::parse(&content);

        if eff.output == "text" {
            println!();
            println!("{}", "=".repeat(50));
            println!("File: {}", rel);
            println!("{}", "=".repeat(50));
        }
        let result = diff::diff(example_vars, &env_vars);
        output::print_compare(
            &eff.example_file,
            &rel,
            example_vars.len(),
            env_vars.len(),
            &result,
            &eff.output,
        );
    }
    0
}

fn run_audit(
    repo_root: Option<&str>,
    example: Option<&str>,
    env: Option<&str>,
    check_config: bool,
    detailed: bool,
    cli_output: Option<&str>,
) -> i32 {
    let eff = resolve_effective(repo_root, example, env, cli_output);

    let example_path = eff.repo_root.join(&eff.example_file);
    let Some(example_content) = read_required(&example_path, "example file", &eff.example_file)
    else {
        return 1;
    };
    let example_vars = EnvMapping::parse(&example_content);

    // The env file is optional here; a missing one just reports everything
    // as missing on that side.
    let env_content = fs::read_to_string(eff.repo_root.join(&eff.env_file)).unwrap_or_default();
    let env_vars = EnvMapping::parse(&env_content);

    if eff.output == "text" {
        println!("Auditing environment variable usage in the project...");
        println!();
    }

    let sources: Vec<(String, String)> = walk::find_files(
        &eff.repo_root,
        &eff.source_patterns,
        &eff.exclude_directories,
    )
    .iter()
    .filter_map(|rel| {
        let content = fs::read_to_string(eff.repo_root.join(rel)).ok()?;
        Some((rel.to_string_lossy().replace('\\', "/"), content))
    })
    .collect();

    let usages = usage::extract_usages(&sources, check_config);
    let report = usage::analyze(&usages, &example_vars, &env_vars);
    output::print_audit(
        &report,
        &usages,
        detailed,
        &eff.example_file,
        &eff.env_file,
        &eff.output,
    );
    0
}

fn run_lint(
    repo_root: Option<&str>,
    file: Option<&str>,
    strict: bool,
    cli_output: Option<&str>,
    apply_fix: bool,
    ignore_empty: bool,
    rules: Option<&str>,
) -> i32 {
    let eff = resolve_effective(repo_root, None, None, cli_output);
    let file_rel = file.unwrap_or(&eff.env_file).to_string();
    let file_path = eff.repo_root.join(&file_rel);

    let Some(content) = read_required(&file_path, "file", &file_rel) else {
        return 1;
    };

    if eff.output == "text" {
        println!("Linting environment file: {}", file_rel);
        println!();
    }

    let opts = lint::LintOptions {
        strict,
        ignore_empty,
        rules: lint::parse_rules(rules),
    };
    let issues = lint::lint(&content, &opts);

    if apply_fix && !issues.is_empty() {
        let fixed = lint::auto_fix(&content, &issues);
        if fixed != content {
            if let Err(e) = fs::write(&file_path, &fixed) {
                eprintln!(
                    "{} failed to write {}: {}",
                    utils::error_prefix(),
                    file_rel,
                    e
                );
                return 1;
            }
            println!("Auto-fixed issues and updated file.");
        }
    }

    output::print_lint(&issues, &eff.output);
    if issues.is_empty() {
        0
    } else {
        1
    }
}

#[allow(clippy::too_many_arguments)]
fn run_security(
    repo_root: Option<&str>,
    file: Option<&str>,
    strict: bool,
    check_git: bool,
    cli_output: Option<&str>,
    risk_level: Option<&str>,
    export: bool,
    apply_fix: bool,
) -> i32 {
    let eff = resolve_effective(repo_root, None, None, cli_output);
    let file_rel = file.unwrap_or(&eff.env_file).to_string();
    let file_path = eff.repo_root.join(&file_rel);

    let Some(content) = read_required(&file_path, "file", &file_rel) else {
        return 1;
    };

    if eff.output == "text" {
        println!("Security scanning environment file: {}", file_rel);
        println!();
    }

    let mut findings = security::scan(&content, strict);
    if check_git {
        findings.extend(security::check_git_tracking(&file_rel, &eff.repo_root));
    }
    if let Some(level) = risk_level {
        findings = security::filter_by_min_risk(findings, security::minimum_risk(level));
    }

    if apply_fix && !findings.is_empty() {
        let fixed = security::auto_fix(&content, &findings);
        if fixed != content {
            if let Err(e) = fs::write(&file_path, &fixed) {
                eprintln!(
                    "{} failed to write {}: {}",
                    utils::error_prefix(),
                    file_rel,
                    e
                );
                return 1;
            }
            println!("Auto-fixed security issues and updated file.");
        }
    }

    if export && !findings.is_empty() {
        let export_rel = format!("security-scan-{}.json", utils::timestamp_slug());
        let export_path = eff.repo_root.join(&export_rel);
        let payload = security::compose_export(&findings, &file_rel, &utils::timestamp_iso());
        let doc = serde_json::to_string_pretty(&payload).unwrap_or_default();
        match fs::write(&export_path, doc) {
            Ok(()) => println!("Security findings exported to: {}", export_rel),
            Err(e) => eprintln!(
                "{} failed to write {}: {}",
                utils::error_prefix(),
                export_rel,
                e
            ),
        }
    }

    output::print_security(&findings, &eff.output);
    if findings.is_empty() {
        0
    } else {
        1
    }
}

#[allow(clippy::too_many_arguments)]
fn run_fix(
    repo_root: Option<&str>,
    example: Option<&str>,
    env: Option<&str>,
    backup: bool,
    dry_run: bool,
    format: bool,
    add_missing: bool,
    remove_unused: bool,
) -> i32 {
    let eff = resolve_effective(repo_root, example, env, None);

    let example_path = eff.repo_root.join(&eff.example_file);
    let Some(example_content) = read_required(&example_path, "example file", &eff.example_file)
    else {
        return 1;
    };
    let env_path = eff.repo_root.join(&eff.env_file);
    let Some(env_content) = read_required(&env_path, "environment file", &eff.env_file) else {
        return 1;
    };

    println!("Fixing environment file: {}", eff.env_file);
    println!();

    if backup && !dry_run {
        let backup_rel = format!("{}.backup.{}", eff.env_file, utils::timestamp_slug());
        if let Err(e) = fs::copy(&env_path, eff.repo_root.join(&backup_rel)) {
            eprintln!(
                "{} failed to create backup {}: {}",
                utils::error_prefix(),
                backup_rel,
                e
            );
            return 1;
        }
        println!("Backup created: {}", backup_rel);
    }

    let opts = fix::FixOptions {
        add_missing,
        remove_unused,
        format,
    }
    .normalized();
    let outcome = fix::run_fix(&example_content, &env_content, &opts);

    if !outcome.changes.is_empty() {
        println!("Changes Summary:");
        for change in &outcome.changes {
            println!("  - {}", change);
        }
    } else {
        println!("No changes needed.");
    }

    if !dry_run && outcome.content != env_content {
        if let Err(e) = fs::write(&env_path, &outcome.content) {
            eprintln!(
                "{} failed to write {}: {}",
                utils::error_prefix(),
                eff.env_file,
                e
            );
            return 1;
        }
        println!("Environment file updated successfully!");
    } else if dry_run {
        println!("Dry run completed. No changes were made.");
    }

    0
}
