use crate::debugger::address::{DwarfAddress, RuntimeAddress};

/// All ways a debugger command or internal operation can fail.
///
/// Every user command in the REPL is a transaction: an `Error` returned from
/// a command handler is printed and the loop continues, it never unwinds past
/// `console::Repl::handle_line`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ptrace syscall error: {0}")]
    Trace(#[from] nix::Error),
    #[error("waitpid syscall error: {0}")]
    Waitpid(nix::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("no function contains pc {0}")]
    NoFunctionForPC(DwarfAddress),
    #[error("no line entry for pc {0}")]
    NoLineForPC(DwarfAddress),
    #[error("no statement at {0}:{1}")]
    NoSuchSourceLine(String, u64),
    #[error("unknown register name {0:?}")]
    UnknownRegisterName(String),
    #[error("unknown dwarf register number {0}")]
    UnknownDwarfRegister(u16),
    #[error("no source available for address {0}")]
    NoSourceForAddress(RuntimeAddress),
    #[error("could not read a return address (no frame pointer at this pc?)")]
    NoReturnAddress,

    #[error("malformed command (try `help`): {0}")]
    MalformedCommand(String),
    #[error("unknown command {0:?} (try `help`)")]
    UnknownCommand(String),

    #[error("the inferior has already exited")]
    InferiorExited,
    #[error("the inferior is not running")]
    NotRunning,

    #[error("dwarf parsing error: {0}")]
    DwarfParsing(#[from] gimli::Error),
    #[error("object file parsing error: {0}")]
    ObjParsing(#[from] object::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
