//! Parsing a REPL line into a [`Command`].
//!
//! Commands are matched by the shortest unambiguous prefix: the first entry
//! in [`COMMANDS`] whose name starts with the typed token wins, so earlier
//! entries shadow later ones on a collision.

use crate::debugger::error::{Error, Result};

/// Listing order breaks prefix collisions: an earlier entry wins.
const COMMANDS: &[&str] = &[
    "continue", "break", "step", "next", "finish", "register", "memory", "symbol", "show", "help",
];

const REGISTER_SUBCOMMANDS: &[&str] = &["dump", "read", "write"];
const MEMORY_SUBCOMMANDS: &[&str] = &["read", "write"];

#[derive(Debug, PartialEq, Eq)]
pub enum BreakTarget {
    Address(u64),
    SourceLine(String, u64),
    Function(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Continue,
    Break(BreakTarget),
    Step,
    Next,
    Finish,
    RegisterDump,
    RegisterRead(String),
    RegisterWrite(String, u64),
    MemoryRead(u64),
    MemoryWrite(u64, u64),
    Symbol(String),
    Show,
    Help,
}

fn resolve<'a>(table: &[&'a str], token: &str) -> Option<&'a str> {
    let token = token.to_lowercase();
    table.iter().find(|name| name.starts_with(&token)).copied()
}

fn parse_hex(token: &str) -> Result<u64> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .ok_or_else(|| Error::MalformedCommand(format!("expected 0x<hex>, got {token:?}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|_| Error::MalformedCommand(format!("not a hex address: {token:?}")))
}

fn parse_break_target(token: &str) -> Result<BreakTarget> {
    if token.starts_with("0x") || token.starts_with("0X") {
        return Ok(BreakTarget::Address(parse_hex(token)?));
    }
    if let Some((file, line)) = token.rsplit_once(':') {
        let line: u64 = line
            .parse()
            .map_err(|_| Error::MalformedCommand(format!("bad line number in {token:?}")))?;
        return Ok(BreakTarget::SourceLine(file.to_string(), line));
    }
    Ok(BreakTarget::Function(token.to_string()))
}

/// Parse one line of input. Blank lines are rejected by the caller before
/// reaching here (the REPL simply re-prompts).
pub fn parse(line: &str) -> Result<Command> {
    let mut tokens = line.split_whitespace();
    let head = tokens
        .next()
        .ok_or_else(|| Error::MalformedCommand("empty command".to_string()))?;
    let command = resolve(COMMANDS, head).ok_or_else(|| Error::UnknownCommand(head.to_string()))?;

    match command {
        "continue" => Ok(Command::Continue),
        "step" => Ok(Command::Step),
        "next" => Ok(Command::Next),
        "finish" => Ok(Command::Finish),
        "show" => Ok(Command::Show),
        "help" => Ok(Command::Help),
        "break" => {
            let arg = tokens
                .next()
                .ok_or_else(|| Error::MalformedCommand("break requires an argument".to_string()))?;
            Ok(Command::Break(parse_break_target(arg)?))
        }
        "symbol" => {
            let name = tokens
                .next()
                .ok_or_else(|| Error::MalformedCommand("symbol requires a name".to_string()))?;
            Ok(Command::Symbol(name.to_string()))
        }
        "register" => {
            let sub = tokens.next().ok_or_else(|| {
                Error::MalformedCommand("register requires dump/read/write".to_string())
            })?;
            match resolve(REGISTER_SUBCOMMANDS, sub) {
                Some("dump") => Ok(Command::RegisterDump),
                Some("read") => {
                    let name = tokens
                        .next()
                        .ok_or_else(|| Error::MalformedCommand("register read requires a name".to_string()))?;
                    Ok(Command::RegisterRead(name.to_string()))
                }
                Some("write") => {
                    let name = tokens.next().ok_or_else(|| {
                        Error::MalformedCommand("register write requires a name and value".to_string())
                    })?;
                    let value = tokens.next().ok_or_else(|| {
                        Error::MalformedCommand("register write requires a value".to_string())
                    })?;
                    Ok(Command::RegisterWrite(name.to_string(), parse_hex(value)?))
                }
                _ => Err(Error::MalformedCommand(format!("unknown register subcommand {sub:?}"))),
            }
        }
        "memory" => {
            let sub = tokens
                .next()
                .ok_or_else(|| Error::MalformedCommand("memory requires read/write".to_string()))?;
            match resolve(MEMORY_SUBCOMMANDS, sub) {
                Some("read") => {
                    let addr = tokens
                        .next()
                        .ok_or_else(|| Error::MalformedCommand("memory read requires an address".to_string()))?;
                    Ok(Command::MemoryRead(parse_hex(addr)?))
                }
                Some("write") => {
                    let addr = tokens.next().ok_or_else(|| {
                        Error::MalformedCommand("memory write requires an address and value".to_string())
                    })?;
                    let value = tokens.next().ok_or_else(|| {
                        Error::MalformedCommand("memory write requires a value".to_string())
                    })?;
                    Ok(Command::MemoryWrite(parse_hex(addr)?, parse_hex(value)?))
                }
                _ => Err(Error::MalformedCommand(format!("unknown memory subcommand {sub:?}"))),
            }
        }
        other => unreachable!("resolve() only returns entries from COMMANDS: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_prefix_resolves_to_earliest_listing() {
        assert_eq!(parse("c").unwrap(), Command::Continue);
        assert_eq!(parse("st").unwrap(), Command::Step);
    }

    #[test]
    fn break_argument_shape_selects_the_target_kind() {
        assert_eq!(
            parse("break 0x400100").unwrap(),
            Command::Break(BreakTarget::Address(0x400100))
        );
        assert_eq!(
            parse("break main.c:12").unwrap(),
            Command::Break(BreakTarget::SourceLine("main.c".to_string(), 12))
        );
        assert_eq!(
            parse("break main").unwrap(),
            Command::Break(BreakTarget::Function("main".to_string()))
        );
    }

    #[test]
    fn register_write_parses_name_and_hex_value() {
        assert_eq!(
            parse("register write rax 0x2a").unwrap(),
            Command::RegisterWrite("rax".to_string(), 0x2a)
        );
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(matches!(parse("frobnicate"), Err(Error::UnknownCommand(_))));
    }

    #[test]
    fn empty_line_is_malformed() {
        assert!(matches!(parse(""), Err(Error::MalformedCommand(_))));
    }
}
