//! `rules.txt` lists: plain text files naming rule maps and other lists.
//!
//! Each non-blank line is a path relative to the list's directory. Lines
//! starting with `#` or `//` are comments. Listed `.txt` files are expanded
//! recursively; anything else is a rule map.

use std::path::{Path, PathBuf};

use crate::Issues;

/// File name looked up beside a map when no rules file is configured.
pub const DEFAULT_RULES_FILE_NAME: &str = "rules.txt";

/// Whether `path` names a rules list rather than a rule map
pub fn is_rules_list(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

/// The entries of a rules list, with comments and blank lines removed.
pub fn parse_rules_list(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .collect()
}

/// Expand `path` into the ordered list of rule maps it names.
///
/// A rule map path is returned as is. Missing or unreadable lists, missing
/// entries and include cycles are reported as errors and skipped; the rest of
/// the list is still expanded.
pub fn expand_rule_sources(path: &Path, issues: &mut Issues) -> Vec<PathBuf> {
    let mut sources = Vec::new();
    if !is_rules_list(path) {
        sources.push(path.to_path_buf());
        return sources;
    }

    if !path.exists() {
        issues.error(format!("No rules file found at '{}'", path.display()));
        return sources;
    }
    let mut stack = Vec::new();
    expand_list(path, &mut stack, &mut sources, issues);
    sources
}

fn expand_list(
    path: &Path,
    stack: &mut Vec<PathBuf>,
    sources: &mut Vec<PathBuf>,
    issues: &mut Issues,
) {
    // Compare resolved paths so `sub/../rules.txt` and symlinks are caught too
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if stack.contains(&resolved) {
        issues.error(format!("Rules file '{}' includes itself", path.display()));
        return;
    }

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            issues.error(format!(
                "Error opening rules file '{}': {err}",
                path.display()
            ));
            return;
        }
    };

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    stack.push(resolved);

    for entry in parse_rules_list(&text) {
        let entry_path = dir.join(entry);
        if !entry_path.exists() {
            issues.error(format!(
                "File not found: '{}' (referenced by '{}')",
                entry_path.display(),
                path.display()
            ));
            continue;
        }
        if is_rules_list(&entry_path) {
            expand_list(&entry_path, stack, sources, issues);
        } else {
            sources.push(entry_path);
        }
    }

    stack.pop();
    tracing::debug!(rules_file = %path.display(), sources = sources.len(), "expanded rules file");
}
