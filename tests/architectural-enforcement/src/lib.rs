//! Architectural Enforcement Helpers
//!
//! Shared source scanning for the tests in `tests/`, which enforce:
//! - The conversation core stays free of terminal dependencies
//! - No thread-blocking sleeps or blocking HTTP in production code
//!
//! Test modules (`#[cfg(test)]` onwards) are not scanned.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source roots scanned by the enforcement tests
pub const PRODUCTION_DIRS: &[&str] = &["conductor/core/src", "tui/src"];

/// Workspace root (two levels above this crate's manifest)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// All `.rs` files under `dir`, relative to the workspace root
pub fn rust_sources(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect()
}

/// A forbidden pattern found in production code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    pub line: usize,
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.text.trim())
    }
}

/// Find lines containing any of `patterns` in the non-test part of `source`
///
/// Line comments are ignored. Scanning stops at the first `#[cfg(test)]`.
pub fn scan_source(path: &Path, source: &str, patterns: &[&str]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        if line.trim_start().starts_with("#[cfg(test)]") {
            break;
        }

        let code_part = line.split("//").next().unwrap_or(line);
        if patterns.iter().any(|p| code_part.contains(p)) {
            violations.push(Violation {
                path: path.to_path_buf(),
                line: idx + 1,
                text: line.to_string(),
            });
        }
    }

    violations
}

/// Scan every production directory for `patterns`
pub fn find_violations(patterns: &[&str]) -> Vec<Violation> {
    PRODUCTION_DIRS
        .iter()
        .flat_map(|dir| rust_sources(dir))
        .flat_map(|path| match fs::read_to_string(&path) {
            Ok(source) => scan_source(&path, &source, patterns),
            Err(_) => Vec::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_skips_comments_and_test_modules() {
        let source = "\
fn run() {
    // std::thread::sleep(d) is forbidden
    std::thread::sleep(d);
}

#[cfg(test)]
mod tests {
    fn slow() { std::thread::sleep(d); }
}
";
        let found = scan_source(Path::new("x.rs"), source, &["thread::sleep("]);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 3);
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
