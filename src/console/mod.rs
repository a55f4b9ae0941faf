//! The interactive command loop.

pub mod command;
pub mod help;

use crate::config::Config;
use crate::debugger::dwarf::SymbolKind;
use crate::debugger::error::Error;
use crate::debugger::signal::Stop;
use crate::debugger::source;
use crate::debugger::Debugger;
use command::{BreakTarget, Command};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "MEGAdbg> ";

pub struct Repl {
    debugger: Debugger,
    config: Config,
    editor: DefaultEditor,
}

impl Repl {
    pub fn new(debugger: Debugger, config: Config) -> rustyline::Result<Self> {
        let mut editor = DefaultEditor::new()?;
        if let Some(path) = &config.history_file {
            let _ = editor.load_history(path);
        }
        Ok(Self {
            debugger,
            config,
            editor,
        })
    }

    /// Run until EOF (`Ctrl-D`) or the inferior terminates in a way that
    /// ends the session.
    pub fn run(mut self) -> rustyline::Result<()> {
        loop {
            let line = match self.editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Eof) => break,
                Err(ReadlineError::Interrupted) => continue,
                Err(err) => return Err(err),
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.editor.add_history_entry(line)?;

            match command::parse(line) {
                Ok(command) => {
                    if !self.dispatch(command) {
                        break;
                    }
                }
                Err(err) => println!("{err}"),
            }
        }

        if let Some(path) = &self.config.history_file {
            let _ = self.editor.save_history(path);
        }
        Ok(())
    }

    /// Returns whether the REPL loop should keep running.
    fn dispatch(&mut self, command: Command) -> bool {
        let result = match command {
            Command::Continue => self.run_to_stop(Debugger::continue_execution),
            Command::Step => self.run_to_stop(Debugger::step_in),
            Command::Next => self.run_to_stop(Debugger::step_over),
            Command::Finish => self.run_to_stop(Debugger::step_out),
            Command::Break(target) => self.do_break(target),
            Command::RegisterDump => self.do_register_dump(),
            Command::RegisterRead(name) => self.do_register_read(&name),
            Command::RegisterWrite(name, value) => self.do_register_write(&name, value),
            Command::MemoryRead(addr) => self.do_memory_read(addr),
            Command::MemoryWrite(addr, value) => self.do_memory_write(addr, value),
            Command::Symbol(name) => self.do_symbol(&name),
            Command::Show => self.do_show(),
            Command::Help => {
                print!("{}", help::HELP_TEXT);
                Ok(true)
            }
        };

        match result {
            Ok(keep_going) => keep_going,
            Err(err) => {
                println!("{err}");
                true
            }
        }
    }

    fn run_to_stop(
        &mut self,
        op: impl FnOnce(&mut Debugger) -> crate::debugger::error::Result<Stop>,
    ) -> crate::debugger::error::Result<bool> {
        if self.debugger.is_terminated() {
            return Err(Error::InferiorExited);
        }
        let stop = op(&mut self.debugger)?;
        self.handle_stop(stop)
    }

    fn handle_stop(&self, stop: Stop) -> crate::debugger::error::Result<bool> {
        match stop {
            Stop::Breakpoint | Stop::SingleStep => {
                let (file, line) = self.debugger.current_source_location()?;
                println!("stopped at {}:{line}", file.display());
                print!(
                    "{}",
                    source::render_focal(&file, line, self.config.source_context_lines)?
                );
                Ok(true)
            }
            Stop::Exited(code) => {
                println!("inferior exited with code {code}");
                Ok(false)
            }
            Stop::Killed(signal) => {
                println!("inferior killed by signal {signal}");
                Ok(false)
            }
            Stop::Segv => {
                println!("segmentation fault");
                Ok(true)
            }
            Stop::OtherSignal(signal) => {
                println!("inferior received signal {signal}");
                Ok(false)
            }
        }
    }

    fn do_break(&mut self, target: BreakTarget) -> crate::debugger::error::Result<bool> {
        match target {
            BreakTarget::Address(addr) => {
                let installed = self.debugger.break_at_address(addr.into())?;
                println!("Set breakpoint at address {:#x}", installed.as_u64());
            }
            BreakTarget::SourceLine(file, line) => {
                let installed = self.debugger.break_at_source_line(&file, line)?;
                println!(
                    "Set breakpoint at address {:#x} ({file}:{line})",
                    installed.as_u64()
                );
            }
            BreakTarget::Function(name) => {
                let installed = self.debugger.break_at_function(&name)?;
                for addr in installed {
                    println!("Set breakpoint at address {:#x} (in {name})", addr.as_u64());
                }
            }
        }
        Ok(true)
    }

    fn do_register_dump(&self) -> crate::debugger::error::Result<bool> {
        for (name, value) in self.debugger.register_dump()? {
            println!("{name:<8} 0x{value:016x}");
        }
        Ok(true)
    }

    fn do_register_read(&self, name: &str) -> crate::debugger::error::Result<bool> {
        let value = self.debugger.register_read(name)?;
        println!("{name} = {value:#x}");
        Ok(true)
    }

    fn do_register_write(&mut self, name: &str, value: u64) -> crate::debugger::error::Result<bool> {
        self.debugger.register_write(name, value)?;
        println!("{name} = {value:#x}");
        Ok(true)
    }

    fn do_memory_read(&self, addr: u64) -> crate::debugger::error::Result<bool> {
        let value = self.debugger.memory_read(addr.into())?;
        println!("{addr:#x} = {value:#x}");
        Ok(true)
    }

    fn do_memory_write(&mut self, addr: u64, value: u64) -> crate::debugger::error::Result<bool> {
        self.debugger.memory_write(addr.into(), value)?;
        println!("{addr:#x} = {value:#x}");
        Ok(true)
    }

    fn do_symbol(&self, name: &str) -> crate::debugger::error::Result<bool> {
        let symbols = self.debugger.symbols_named(name);
        if symbols.is_empty() {
            println!("no symbol named {name:?}");
        }
        for symbol in symbols {
            println!("{} {} = {}", symbol_kind_name(symbol.kind), symbol.name, symbol.address);
        }
        Ok(true)
    }

    fn do_show(&mut self) -> crate::debugger::error::Result<bool> {
        let rendered = self.debugger.show()?;
        print!("{rendered}");
        Ok(true)
    }
}

fn symbol_kind_name(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::NoType => "notype",
        SymbolKind::Object => "object",
        SymbolKind::Func => "func",
        SymbolKind::Section => "section",
        SymbolKind::File => "file",
    }
}
