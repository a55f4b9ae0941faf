//! Classifying the traced process's stop after a `waitpid`.

use crate::debugger::code;
use crate::debugger::error::{Error, Result};
use crate::debugger::register::{self, Register};
use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::sys::{self};
use nix::unistd::Pid;

/// Why the inferior last stopped, reduced to the cases the stepper and the
/// command loop act on.
#[derive(Debug)]
pub enum Stop {
    /// Hit a software breakpoint (`int3`, reported as `TRAP_BRKPT` or, on
    /// some kernels, `SI_KERNEL`).
    Breakpoint,
    /// A single `PTRACE_SINGLESTEP` completed (`TRAP_TRACE`).
    SingleStep,
    /// A segmentation fault; the inferior remains stopped and the signal
    /// has not been forwarded, so the user may still inspect its state.
    Segv,
    /// Any other signal delivered to the inferior; this ends the session.
    OtherSignal(Signal),
    /// The inferior ran to completion.
    Exited(i32),
    /// The inferior was killed by a signal.
    Killed(Signal),
}

/// Block until `pid` stops or exits, classifying the result.
pub fn wait_for_stop(pid: Pid) -> Result<Stop> {
    match waitpid(pid, Some(WaitPidFlag::empty())).map_err(Error::Waitpid)? {
        WaitStatus::Exited(_, code) => Ok(Stop::Exited(code)),
        WaitStatus::Signaled(_, signal, _) => Ok(Stop::Killed(signal)),
        WaitStatus::Stopped(stopped_pid, Signal::SIGTRAP) => {
            let info = sys::ptrace::getsiginfo(stopped_pid).map_err(Error::Trace)?;
            match info.si_code {
                code::TRAP_TRACE => Ok(Stop::SingleStep),
                code::TRAP_BRKPT | code::SI_KERNEL => {
                    // The trap byte has already retired and advanced rip past
                    // it; rewind so rip names the breakpoint's own address.
                    let pc = register::get(stopped_pid, Register::Rip)?;
                    register::set(stopped_pid, Register::Rip, pc - 1)?;
                    Ok(Stop::Breakpoint)
                }
                _ => Ok(Stop::SingleStep),
            }
        }
        WaitStatus::Stopped(_, Signal::SIGSEGV) => Ok(Stop::Segv),
        WaitStatus::Stopped(_, signal) => Ok(Stop::OtherSignal(signal)),
        other => Err(Error::Other(format!("unexpected wait status: {other:?}"))),
    }
}
