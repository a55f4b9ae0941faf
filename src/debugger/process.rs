//! Spawning and attaching to the traced process.
//!
//! Uses the classic `PTRACE_TRACEME` + `execvp` attach protocol: the child
//! requests tracing on itself before `exec`, the kernel delivers it a
//! `SIGTRAP` at the new image's entry point, and the parent's first
//! `waitpid` observes that stop. This crate only ever traces one thread, so
//! unlike `PTRACE_SEIZE` there is no need to opt into `PTRACE_O_TRACECLONE`.

use crate::debugger::error::{Error, Result};
use nix::sys;
use nix::sys::personality::Persona;
use nix::sys::ptrace;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};
use std::marker::PhantomData;
use std::os::unix::process::CommandExt;
use std::process::Command;

pub trait State {}

/// Forked, `exec`'d, and stopped at its entry point; `ptrace` calls against
/// its pid are now valid.
pub struct Installed;
impl State for Installed {}

/// Not yet forked.
pub struct Template;
impl State for Template {}

pub struct Child<S: State> {
    pub program: String,
    args: Vec<String>,
    pid: Option<Pid>,
    _state: PhantomData<S>,
}

impl Child<Template> {
    pub fn new<ARGS, I>(program: impl Into<String>, args: ARGS) -> Child<Template>
    where
        ARGS: IntoIterator<Item = I>,
        I: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            pid: None,
            _state: PhantomData,
        }
    }

    /// Fork, `PTRACE_TRACEME` + `exec` in the child, and wait for the
    /// resulting entry-point trap in the parent.
    pub fn install(&self) -> Result<Child<Installed>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        unsafe {
            cmd.pre_exec(|| {
                ptrace::traceme()?;
                sys::personality::set(Persona::ADDR_NO_RANDOMIZE)?;
                Ok(())
            });
        }

        match unsafe { fork() }.map_err(Error::Trace)? {
            ForkResult::Parent { child: pid } => {
                match waitpid(pid, Some(WaitPidFlag::WSTOPPED)).map_err(Error::Waitpid)? {
                    WaitStatus::Stopped(_, _) => {}
                    other => return Err(Error::Other(format!("unexpected initial wait status: {other:?}"))),
                }
                Ok(Child {
                    program: self.program.clone(),
                    args: self.args.clone(),
                    pid: Some(pid),
                    _state: PhantomData,
                })
            }
            ForkResult::Child => {
                let err = cmd.exec();
                eprintln!("failed to exec {}: {err}", self.program);
                std::process::exit(127);
            }
        }
    }
}

impl Child<Installed> {
    pub fn pid(&self) -> Pid {
        self.pid.expect("Installed child always carries a pid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_carries_program_and_args_unchanged() {
        let child = Child::new("/bin/true", ["-a", "-b"]);
        assert_eq!(child.program, "/bin/true");
        assert_eq!(child.args, vec!["-a".to_string(), "-b".to_string()]);
    }
}
