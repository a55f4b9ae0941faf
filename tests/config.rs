//! `~/.megadbgrc` loading (spec.md SPEC_FULL.md "Configuration"): falls back
//! to the bundled default when absent or malformed, and picks up overrides
//! when present.

use megadbg::config::Config;
use std::fs;
use std::sync::Mutex;

// `Config::load` reads the process-wide `HOME` environment variable, so
// these tests must not run concurrently with each other.
static HOME_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn missing_rc_file_falls_back_to_bundled_default() {
    let _guard = HOME_LOCK.lock().unwrap();
    let home = tempfile::tempdir().unwrap();
    std::env::set_var("HOME", home.path());

    let config = Config::load();
    assert_eq!(config.source_context_lines, 2);
    assert!(config.history_file.is_none());
}

#[test]
fn present_rc_file_overrides_the_default() {
    let _guard = HOME_LOCK.lock().unwrap();
    let home = tempfile::tempdir().unwrap();
    fs::write(
        home.path().join(".megadbgrc"),
        "source_context_lines = 5\nhistory_file = \"~/.megadbg_history\"\n",
    )
    .unwrap();
    std::env::set_var("HOME", home.path());

    let config = Config::load();
    assert_eq!(config.source_context_lines, 5);
    assert_eq!(
        config.history_file.as_deref(),
        Some(std::path::Path::new("~/.megadbg_history"))
    );
}

#[test]
fn malformed_rc_file_falls_back_to_default_rather_than_panicking() {
    let _guard = HOME_LOCK.lock().unwrap();
    let home = tempfile::tempdir().unwrap();
    fs::write(home.path().join(".megadbgrc"), "this is not valid toml {{{").unwrap();
    std::env::set_var("HOME", home.path());

    let config = Config::load();
    assert_eq!(config.source_context_lines, 2);
}
