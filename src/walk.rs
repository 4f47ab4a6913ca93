//! Recursive file discovery with directory exclusions and name patterns.
//!
//! The walker is synchronous and returns paths relative to the walk root,
//! sorted so diagnostics output is stable within a run.

use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};

/// Find files under `root` whose name matches any of `name_patterns`,
/// skipping directories whose name (or root-relative path, for entries like
/// `bootstrap/cache`) appears in `exclude_dirs`.
pub fn find_files(root: &Path, name_patterns: &[String], exclude_dirs: &[String]) -> Vec<PathBuf> {
    let patterns: Vec<Pattern> = name_patterns
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();
    let mut found = Vec::new();
    walk_dir(root, root, &patterns, exclude_dirs, &mut found);
    found.sort();
    found
}

fn walk_dir(
    root: &Path,
    dir: &Path,
    patterns: &[Pattern],
    exclude_dirs: &[String],
    found: &mut Vec<PathBuf>,
) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let rel = pathdiff::diff_paths(&path, root).unwrap_or_else(|| path.clone());
        let name = entry.file_name().to_string_lossy().to_string();
        // file_type() does not follow symlinks, so a symlinked directory is
        // never recursed into and a link cycle cannot loop the walk.
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            if exclude_dirs.iter().any(|ex| *ex == name || *ex == rel_str) {
                continue;
            }
            walk_dir(root, &path, patterns, exclude_dirs, found);
        } else if path.is_file() && patterns.iter().any(|p| p.matches(&name)) {
            found.push(rel);
        }
    }
}
