//! Source-level and single-instruction stepping.

use crate::debugger::address::RuntimeAddress;
use crate::debugger::breakpoint_manager::{BreakpointTable, TempBreakpoints};
use crate::debugger::dwarf::DebugInfo;
use crate::debugger::error::{Error, Result};
use crate::debugger::memory;
use crate::debugger::register::{self, Register};
use crate::debugger::signal::{self, Stop};
use nix::sys::ptrace;
use nix::unistd::Pid;

/// One machine instruction, unconditionally.
pub fn single_step(pid: Pid) -> Result<Stop> {
    ptrace::step(pid, None).map_err(Error::Trace)?;
    signal::wait_for_stop(pid)
}

/// If a breakpoint is installed and enabled at the current PC, disable it,
/// single-step past it, and re-enable it. Returns `None` when there was
/// nothing to step over (the caller should fall back to [`single_step`]).
pub fn step_over_breakpoint(pid: Pid, breakpoints: &BreakpointTable) -> Result<Option<Stop>> {
    let pc = RuntimeAddress::from(register::get(pid, Register::Rip)?);
    let Some(bp) = breakpoints.get(pc) else {
        return Ok(None);
    };
    if !bp.is_enabled() {
        return Ok(None);
    }
    bp.disable()?;
    let stop = single_step(pid)?;
    bp.enable()?;
    Ok(Some(stop))
}

/// The stepping primitive consumed by the source-level modes: step over a
/// breakpoint at the current PC if there is one, otherwise a plain
/// single step.
pub fn single_step_checked(pid: Pid, breakpoints: &BreakpointTable) -> Result<Stop> {
    match step_over_breakpoint(pid, breakpoints)? {
        Some(stop) => Ok(stop),
        None => single_step(pid),
    }
}

/// Step over a breakpoint at the current PC if needed, then resume the
/// inferior until its next stop.
pub fn continue_execution(pid: Pid, breakpoints: &BreakpointTable) -> Result<Stop> {
    if let Some(stop) = step_over_breakpoint(pid, breakpoints)? {
        if matches!(stop, Stop::Exited(_) | Stop::Killed(_)) {
            return Ok(stop);
        }
    }
    ptrace::cont(pid, None).map_err(Error::Trace)?;
    signal::wait_for_stop(pid)
}

fn current_line(pid: Pid, debug_info: &DebugInfo, load_base: u64) -> Result<u64> {
    let pc = RuntimeAddress::from(register::get(pid, Register::Rip)?);
    let line = debug_info.line_entry_for(pc.to_dwarf(load_base))?;
    Ok(line.line)
}

/// `[rbp + 8]`: the return address pushed by `call`, assuming the current
/// function maintains a conventional frame pointer.
fn return_address(pid: Pid) -> Result<RuntimeAddress> {
    let rbp = register::get(pid, Register::Rbp)?;
    let slot = RuntimeAddress::from(rbp).offset(8);
    memory::read(pid, slot)
        .map(RuntimeAddress::from)
        .map_err(|_| Error::NoReturnAddress)
}

fn is_resume_stop(stop: &Stop) -> bool {
    matches!(stop, Stop::Breakpoint | Stop::SingleStep)
}

/// Single-step until the line entry at the (dwarf-mapped) PC names a
/// different source line than the one the step started on.
pub fn step_in(pid: Pid, debug_info: &DebugInfo, load_base: u64, breakpoints: &BreakpointTable) -> Result<Stop> {
    let start_line = current_line(pid, debug_info, load_base)?;
    loop {
        let stop = single_step_checked(pid, breakpoints)?;
        if !is_resume_stop(&stop) {
            return Ok(stop);
        }
        match current_line(pid, debug_info, load_base) {
            Ok(line) if line != start_line => return Ok(stop),
            _ => continue,
        }
    }
}

/// Temporarily breakpoint every other line in the current function plus
/// its return address, then continue; the temporaries are guaranteed to be
/// removed by [`TempBreakpoints`]'s `Drop` regardless of how this returns.
pub fn step_over(
    pid: Pid,
    debug_info: &DebugInfo,
    load_base: u64,
    breakpoints: &mut BreakpointTable,
) -> Result<Stop> {
    let pc = RuntimeAddress::from(register::get(pid, Register::Rip)?);
    let pc_dwarf = pc.to_dwarf(load_base);
    let function = debug_info.function_containing(pc_dwarf)?;
    let current = debug_info.line_entry_for(pc_dwarf)?;
    let current_addr = current.address;

    let mut temp = TempBreakpoints::new(breakpoints);
    for line in debug_info.line_entries_in(function) {
        if line.address != current_addr {
            temp.install(line.address.to_runtime(load_base))?;
        }
    }
    if let Ok(ret) = return_address(pid) {
        temp.install(ret)?;
    }

    continue_execution(pid, temp.table())
}

/// Install a temporary breakpoint at the return address and continue.
pub fn step_out(pid: Pid, breakpoints: &mut BreakpointTable) -> Result<Stop> {
    let ret = return_address(pid)?;
    let mut temp = TempBreakpoints::new(breakpoints);
    temp.install(ret)?;
    continue_execution(pid, temp.table())
}
