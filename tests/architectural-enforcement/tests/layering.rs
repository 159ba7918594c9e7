//! Integration Test: Core Layering
//!
//! The conversation core must build and test without a terminal. Only the
//! TUI crate may depend on terminal crates.

use std::fs;

use architectural_enforcement::{find_violations, workspace_root};

const TERMINAL_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_terminal_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .expect("core manifest should be readable");

    for krate in TERMINAL_CRATES {
        assert!(
            !manifest.contains(krate),
            "conductor/core must not depend on {krate}"
        );
    }
}

#[test]
fn test_core_sources_do_not_import_terminal_crates() {
    let violations: Vec<_> = find_violations(&["use ratatui", "use crossterm", "ratatui::", "crossterm::"])
        .into_iter()
        .filter(|v| v.path.to_string_lossy().contains("conductor"))
        .collect();

    assert!(
        violations.is_empty(),
        "terminal imports in core:\n{}",
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}
