//! Debugger core: owns the traced process, its debug information, and the
//! breakpoint table; exposes one operation per REPL command.

pub mod address;
pub mod breakpoint;
pub mod breakpoint_manager;
pub mod code;
pub mod dwarf;
pub mod error;
pub mod load_base;
pub mod memory;
pub mod process;
pub mod register;
pub mod signal;
pub mod source;
pub mod step;

use address::RuntimeAddress;
use breakpoint_manager::BreakpointTable;
use dwarf::{DebugInfo, Symbol};
use error::{Error, Result};
use log::info;
use nix::unistd::Pid;
use register::Register;
use signal::Stop;
use std::path::{Path, PathBuf};

pub struct Debugger {
    program: PathBuf,
    child: process::Child<process::Installed>,
    debug_info: DebugInfo,
    breakpoints: BreakpointTable,
    load_base: u64,
    terminated: bool,
}

impl Debugger {
    /// Fork+exec `program` under trace, load its debug information, and
    /// compute its load base if it is position-independent.
    pub fn launch(program: impl Into<PathBuf>, args: Vec<String>) -> Result<Self> {
        let program = program.into();
        let debug_info = DebugInfo::load(&program)?;

        let template = process::Child::new(program.to_string_lossy().into_owned(), args);
        let child = template.install()?;
        let pid = child.pid();
        info!("debugee {} started with pid {pid}", program.display());

        let load_base = if debug_info.is_pie {
            load_base::read(pid, &program)?
        } else {
            0
        };

        Ok(Self {
            program,
            child,
            debug_info,
            breakpoints: BreakpointTable::new(pid),
            load_base,
            terminated: false,
        })
    }

    pub fn pid(&self) -> Pid {
        self.child.pid()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn current_pc(&self) -> Result<RuntimeAddress> {
        Ok(RuntimeAddress::from(register::get(self.pid(), Register::Rip)?))
    }

    fn note_stop(&mut self, stop: Stop) -> Stop {
        if matches!(stop, Stop::Exited(_) | Stop::Killed(_) | Stop::OtherSignal(_)) {
            self.terminated = true;
        }
        stop
    }

    // ---- C1 registers ----------------------------------------------------

    pub fn register_dump(&self) -> Result<Vec<(String, u64)>> {
        register::ALL
            .iter()
            .map(|&r| Ok((register::name_of(r), register::get(self.pid(), r)?)))
            .collect()
    }

    pub fn register_read(&self, name: &str) -> Result<u64> {
        register::get(self.pid(), register::id_of(name)?)
    }

    pub fn register_write(&self, name: &str, value: u64) -> Result<()> {
        register::set(self.pid(), register::id_of(name)?, value)
    }

    // ---- C2 memory ---------------------------------------------------------

    pub fn memory_read(&self, address: RuntimeAddress) -> Result<u64> {
        memory::read(self.pid(), address)
    }

    pub fn memory_write(&self, address: RuntimeAddress, value: u64) -> Result<()> {
        memory::write(self.pid(), address, value)
    }

    // ---- C4 symbols ----------------------------------------------------

    pub fn symbols_named(&self, name: &str) -> Vec<&Symbol> {
        self.debug_info.symbols_named(name)
    }

    // ---- C8 breakpoints --------------------------------------------------

    pub fn break_at_address(&mut self, address: RuntimeAddress) -> Result<RuntimeAddress> {
        self.breakpoints.set_at_address(address)?;
        Ok(address)
    }

    pub fn break_at_function(&mut self, name: &str) -> Result<Vec<RuntimeAddress>> {
        self.breakpoints
            .set_at_function(&self.debug_info, self.load_base, name)
    }

    pub fn break_at_source_line(&mut self, file: &str, line: u64) -> Result<RuntimeAddress> {
        self.breakpoints
            .set_at_source_line(&self.debug_info, self.load_base, file, line)
    }

    // ---- C7 stepping -------------------------------------------------------

    pub fn continue_execution(&mut self) -> Result<Stop> {
        let stop = step::continue_execution(self.pid(), &self.breakpoints)?;
        Ok(self.note_stop(stop))
    }

    pub fn step_in(&mut self) -> Result<Stop> {
        let stop = step::step_in(self.pid(), &self.debug_info, self.load_base, &self.breakpoints)?;
        Ok(self.note_stop(stop))
    }

    pub fn step_over(&mut self) -> Result<Stop> {
        let stop = step::step_over(
            self.pid(),
            &self.debug_info,
            self.load_base,
            &mut self.breakpoints,
        )?;
        Ok(self.note_stop(stop))
    }

    pub fn step_out(&mut self) -> Result<Stop> {
        let stop = step::step_out(self.pid(), &mut self.breakpoints)?;
        Ok(self.note_stop(stop))
    }

    // ---- C9 source ---------------------------------------------------------

    /// File + line of the current PC, for the verbose post-stop print.
    pub fn current_source_location(&self) -> Result<(PathBuf, u64)> {
        let pc = self.current_pc()?;
        let line = self.debug_info.line_entry_for(pc.to_dwarf(self.load_base))?;
        Ok((PathBuf::from(&line.file), line.line))
    }

    /// File + first/last line of the function containing the current PC,
    /// for `show`'s silent whole-function print.
    pub fn current_function_source_range(&self) -> Result<(PathBuf, u64, u64)> {
        let pc = self.current_pc()?;
        let pc_dwarf = pc.to_dwarf(self.load_base);
        let function = self.debug_info.function_containing(pc_dwarf)?;
        let lines = self.debug_info.line_entries_in(function);
        let file = lines
            .first()
            .map(|l| l.file.clone())
            .ok_or(Error::NoSourceForAddress(pc))?;
        let min_line = lines.iter().map(|l| l.line).min().unwrap_or(1);
        let max_line = lines.iter().map(|l| l.line).max().unwrap_or(min_line);
        Ok((PathBuf::from(file), min_line, max_line))
    }

    /// If nothing is breakpointed yet, run silently to `main`. Then render
    /// the whole current function and disable (without erasing) whatever
    /// breakpoint brought us to a stop at the current PC, so a second `show`
    /// reprints the same function rather than re-running to `main`.
    pub fn show(&mut self) -> Result<String> {
        if self.breakpoints.addresses().next().is_none() {
            self.break_at_function("main")?;
            self.continue_execution()?;
        }

        let (file, start, end) = self.current_function_source_range()?;
        let rendered = source::render_range_silent(&file, start, end)?;

        let pc = self.current_pc()?;
        if let Some(bp) = self.breakpoints.get(pc) {
            bp.disable()?;
        }
        Ok(rendered)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}
