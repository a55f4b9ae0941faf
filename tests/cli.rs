//! CLI argument/file-existence errors (spec.md §6.1), exercised against the
//! real `mdbg` binary. Neither case reaches the point of spawning a traced
//! process, so these run safely without a debug-info fixture.

use std::process::Command;

fn mdbg() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mdbg"))
}

#[test]
fn missing_executable_argument_exits_nonzero() {
    let output = mdbg().output().expect("failed to run mdbg");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn nonexistent_executable_path_exits_nonzero() {
    let output = mdbg()
        .arg("/definitely/does/not/exist/on/this/machine")
        .output()
        .expect("failed to run mdbg");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn program_flag_is_accepted_as_an_alternative_to_the_positional_argument() {
    let output = mdbg()
        .args(["-p", "/definitely/does/not/exist/on/this/machine"])
        .output()
        .expect("failed to run mdbg");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn help_flag_exits_cleanly() {
    let output = mdbg().arg("--help").output().expect("failed to run mdbg");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}
