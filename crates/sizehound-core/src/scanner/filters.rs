/// Name-based exclusion rules.
///
/// Rules apply to entry *names*, never to full or relative paths: an
/// excluded name is skipped wherever it appears in the tree.
///
/// - `excluded_names` are exact directory names (`node_modules`, `.git`).
/// - `exclude_patterns` are globs (`*.tmp`, `cache-*`) compiled into one
///   `GlobSet`, or regular expressions when prefixed with `re:`.
use crate::error::ScanError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use std::collections::HashSet;

const REGEX_PREFIX: &str = "re:";

/// Compiled exclusion rules for one scan.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    names: HashSet<String>,
    globs: GlobSet,
    regexes: Vec<Regex>,
}

impl ExclusionRules {
    /// Compile the rules. Malformed patterns are rejected up front.
    pub fn new(excluded_names: &[String], patterns: &[String]) -> Result<Self, ScanError> {
        let names = excluded_names
            .iter()
            .map(|n| fold_case(n.trim()))
            .filter(|n| !n.is_empty())
            .collect();

        let mut builder = GlobSetBuilder::new();
        let mut regexes = Vec::new();
        for pattern in patterns {
            if let Some(expr) = pattern.strip_prefix(REGEX_PREFIX) {
                let re = Regex::new(expr).map_err(|e| {
                    ScanError::invalid(format!("bad exclusion regex {expr:?}: {e}"))
                })?;
                regexes.push(re);
            } else {
                let glob = Glob::new(pattern).map_err(|e| {
                    ScanError::invalid(format!("bad exclusion glob {pattern:?}: {e}"))
                })?;
                builder.add(glob);
            }
        }
        let globs = builder
            .build()
            .map_err(|e| ScanError::invalid(format!("bad exclusion globs: {e}")))?;

        Ok(Self {
            names,
            globs,
            regexes,
        })
    }

    /// Rules that exclude nothing.
    pub fn none() -> Self {
        Self {
            names: HashSet::new(),
            globs: GlobSet::empty(),
            regexes: Vec::new(),
        }
    }

    /// `true` if `name` matches any glob or regex pattern.
    pub fn matches_pattern(&self, name: &str) -> bool {
        self.globs.is_match(name) || self.regexes.iter().any(|re| re.is_match(name))
    }

    /// `true` if a directory called `name` must be skipped with its subtree.
    pub fn excludes_dir(&self, name: &str) -> bool {
        self.names.contains(&fold_case(name)) || self.matches_pattern(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.globs.is_empty() && self.regexes.is_empty()
    }
}

fn fold_case(name: &str) -> String {
    if cfg!(any(windows, target_os = "macos")) {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}
