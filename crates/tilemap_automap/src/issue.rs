//! Diagnostics collected during an automapping run.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A single diagnostic, optionally attributed to the rule file it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_file: Option<PathBuf>,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.rule_file {
            Some(path) => write!(f, "{label}: {} ({})", self.message, path.display()),
            None => write!(f, "{label}: {}", self.message),
        }
    }
}

/// Ordered sink of [`Issue`]s.
///
/// Issues pushed while a rule file is being processed are attributed to it via
/// [`Issues::set_rule_file`]. Every issue is also logged through `tracing`.
#[derive(Debug, Default)]
pub struct Issues {
    items: Vec<Issue>,
    rule_file: Option<PathBuf>,
}

impl Issues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute subsequent issues to `path` (or to nothing)
    pub fn set_rule_file(&mut self, path: Option<&Path>) {
        self.rule_file = path.map(Path::to_path_buf);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into());
    }

    fn push(&mut self, severity: Severity, message: String) {
        let file = self.rule_file.as_deref().map(Path::display);
        match severity {
            Severity::Warning => tracing::warn!(rule_file = ?file, "{message}"),
            Severity::Error => tracing::error!(rule_file = ?file, "{message}"),
        }
        self.items.push(Issue {
            severity,
            message,
            rule_file: self.rule_file.clone(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_carry_current_rule_file() {
        let mut issues = Issues::new();
        issues.warning("before");
        issues.set_rule_file(Some(Path::new("rules/walls.json")));
        issues.error("during");
        issues.set_rule_file(None);
        issues.warning("after");

        let items = issues.into_vec();
        assert_eq!(items[0].rule_file, None);
        assert_eq!(items[1].rule_file, Some(PathBuf::from("rules/walls.json")));
        assert_eq!(items[1].severity, Severity::Error);
        assert_eq!(items[2].rule_file, None);
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let mut issues = Issues::new();
        issues.warning("only a warning");
        assert!(!issues.has_errors());
        issues.error("now an error");
        assert!(issues.has_errors());
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn display_includes_file() {
        let issue = Issue {
            severity: Severity::Warning,
            message: "no target layer named `a`".to_string(),
            rule_file: Some(PathBuf::from("r.json")),
        };
        assert_eq!(issue.to_string(), "warning: no target layer named `a` (r.json)");
    }
}
