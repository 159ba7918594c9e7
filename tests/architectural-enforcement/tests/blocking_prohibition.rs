//! Integration Test: Blocking Call Prohibition
//!
//! Production code runs on the tokio runtime. It must not park the worker
//! thread with `std::thread::sleep` or issue blocking HTTP requests.
//! Timers use `tokio::time`; HTTP uses async `reqwest`.

use architectural_enforcement::find_violations;

fn report(violations: &[architectural_enforcement::Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  ❌ {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_no_thread_sleep_in_production_code() {
    let violations = find_violations(&["thread::sleep("]);

    assert!(
        violations.is_empty(),
        "\nthread sleep in production code (use tokio::time):\n{}",
        report(&violations)
    );
}

#[test]
fn test_no_blocking_http_in_production_code() {
    let violations = find_violations(&["reqwest::blocking"]);

    assert!(
        violations.is_empty(),
        "\nblocking HTTP in production code:\n{}",
        report(&violations)
    );
}
