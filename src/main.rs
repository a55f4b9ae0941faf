//! Debugger application entry point.

use clap::Parser;
use megadbg::config::Config;
use megadbg::console::Repl;
use megadbg::debugger::Debugger;
use std::path::Path;
use std::process::ExitCode;

/// `debugger [-h] [-p <executable>] <executable>`: the executable may be
/// given positionally or via `-p`, matching whichever the caller finds more
/// natural (shell completion vs. scripting).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Executable to trace.
    debugee: Option<String>,

    /// Executable to trace, as an alternative to the positional argument.
    #[arg(short = 'p', long = "program")]
    program: Option<String>,

    /// Log level passed to `env_logger` without requiring `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,

    /// Arguments passed through to the debugee.
    #[arg(raw(true))]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = &args.log_level {
        builder.parse_filters(level);
    }
    builder.init();

    let Some(debugee) = args.program.or(args.debugee) else {
        eprintln!("error: an executable is required (positionally or via -p/--program)");
        return ExitCode::from(2);
    };

    if !Path::new(&debugee).is_file() {
        eprintln!("error: {debugee:?} does not exist or is not a regular file");
        return ExitCode::from(2);
    }

    let debugger = match Debugger::launch(&debugee, args.args) {
        Ok(debugger) => debugger,
        Err(err) => {
            eprintln!("could not start {debugee}: {err}");
            return ExitCode::from(1);
        }
    };

    let repl = match Repl::new(debugger, Config::load()) {
        Ok(repl) => repl,
        Err(err) => {
            eprintln!("could not start command line editor: {err}");
            return ExitCode::from(1);
        }
    };

    match repl.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}
