//! Common test utilities for integration tests.
//!
//! This module provides a scripted stand-in for cleartool and a guard for
//! tests that need a real ClearCase installation.
//!
//! Note: Each integration test file compiles as a separate crate,
//! so not all helpers are used in every test file. We suppress
//! dead_code warnings at the module level.

#![allow(dead_code)]
#![allow(unused_imports)]

#[cfg(unix)]
pub mod fake_cleartool;

#[cfg(unix)]
pub use fake_cleartool::FakeClearTool;

/// Whether a working `cleartool` is on PATH.
pub fn cleartool_available() -> bool {
    std::process::Command::new("cleartool")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Return early from a test when no real cleartool is installed.
#[macro_export]
macro_rules! skip_if_no_cleartool {
    () => {
        if !$crate::common::cleartool_available() {
            eprintln!("cleartool not available, skipping test");
            return;
        }
    };
}
