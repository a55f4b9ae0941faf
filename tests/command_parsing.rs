//! End-to-end command-line parsing: the REPL's prefix-matching dispatch
//! against the full command table (spec.md §4.10), exercised without a
//! live traced process.

use megadbg::console::command::{self, BreakTarget, Command};
use megadbg::debugger::error::Error;

#[test]
fn every_full_command_name_parses_to_its_own_variant() {
    assert_eq!(command::parse("continue").unwrap(), Command::Continue);
    assert_eq!(command::parse("step").unwrap(), Command::Step);
    assert_eq!(command::parse("next").unwrap(), Command::Next);
    assert_eq!(command::parse("finish").unwrap(), Command::Finish);
    assert_eq!(command::parse("show").unwrap(), Command::Show);
    assert_eq!(command::parse("help").unwrap(), Command::Help);
}

#[test]
fn shortest_unambiguous_prefixes_resolve() {
    // "c" only matches "continue" in the listing order.
    assert_eq!(command::parse("c").unwrap(), Command::Continue);
    // "s" collides between "step", "symbol", "show" - earliest listed wins.
    assert_eq!(command::parse("s").unwrap(), Command::Step);
    assert_eq!(command::parse("n").unwrap(), Command::Next);
    assert_eq!(command::parse("f").unwrap(), Command::Finish);
}

#[test]
fn break_dispatches_on_argument_shape() {
    assert_eq!(
        command::parse("break 0x401130").unwrap(),
        Command::Break(BreakTarget::Address(0x401130))
    );
    assert_eq!(
        command::parse("b hello.c:7").unwrap(),
        Command::Break(BreakTarget::SourceLine("hello.c".to_string(), 7))
    );
    assert_eq!(
        command::parse("break main").unwrap(),
        Command::Break(BreakTarget::Function("main".to_string()))
    );
}

#[test]
fn register_and_memory_subcommands_parse() {
    assert_eq!(
        command::parse("register dump").unwrap(),
        Command::RegisterDump
    );
    assert_eq!(
        command::parse("register read rax").unwrap(),
        Command::RegisterRead("rax".to_string())
    );
    assert_eq!(
        command::parse("register write rax 0x2a").unwrap(),
        Command::RegisterWrite("rax".to_string(), 0x2a)
    );
    assert_eq!(
        command::parse("memory read 0x601030").unwrap(),
        Command::MemoryRead(0x601030)
    );
    assert_eq!(
        command::parse("memory write 0x601030 0xdeadbeef").unwrap(),
        Command::MemoryWrite(0x601030, 0xdeadbeef)
    );
}

#[test]
fn symbol_command_takes_a_bare_name() {
    assert_eq!(
        command::parse("symbol main").unwrap(),
        Command::Symbol("main".to_string())
    );
}

#[test]
fn unknown_commands_and_missing_arguments_are_diagnostics_not_panics() {
    assert!(matches!(
        command::parse("frobnicate"),
        Err(Error::UnknownCommand(_))
    ));
    assert!(matches!(
        command::parse("break"),
        Err(Error::MalformedCommand(_))
    ));
    assert!(matches!(
        command::parse("register"),
        Err(Error::MalformedCommand(_))
    ));
    assert!(matches!(
        command::parse("register write rax"),
        Err(Error::MalformedCommand(_))
    ));
}
