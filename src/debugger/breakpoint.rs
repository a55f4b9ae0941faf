//! A single software breakpoint: one patched byte in the inferior's text.

use crate::debugger::address::RuntimeAddress;
use crate::debugger::error::Result;
use crate::debugger::memory;
use nix::unistd::Pid;
use std::cell::Cell;

/// x86-64 single-byte trap instruction (`int3`).
const TRAP_OPCODE: u64 = 0xCC;

/// Owns one patched address. Invariant: when `enabled`, the byte at
/// `address` in the inferior equals [`TRAP_OPCODE`] and `saved_byte` holds
/// the value previously there; when disabled, the original byte has been
/// restored.
pub struct Breakpoint {
    pub address: RuntimeAddress,
    pid: Pid,
    saved_byte: Cell<u8>,
    enabled: Cell<bool>,
}

impl Breakpoint {
    pub fn new(pid: Pid, address: RuntimeAddress) -> Self {
        Self {
            address,
            pid,
            saved_byte: Cell::new(0),
            enabled: Cell::new(false),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Patch the trap opcode in. A no-op if already enabled.
    pub fn enable(&self) -> Result<()> {
        if self.enabled.get() {
            return Ok(());
        }
        let word = memory::read(self.pid, self.address)?;
        self.saved_byte.set((word & 0xff) as u8);
        let patched = (word & !0xff) | TRAP_OPCODE;
        memory::write(self.pid, self.address, patched)?;
        self.enabled.set(true);
        Ok(())
    }

    /// Restore the original byte. A no-op if already disabled.
    pub fn disable(&self) -> Result<()> {
        if !self.enabled.get() {
            return Ok(());
        }
        let word = memory::read(self.pid, self.address)?;
        let restored = (word & !0xff) | self.saved_byte.get() as u64;
        memory::write(self.pid, self.address, restored)?;
        self.enabled.set(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `enable`/`disable` are idempotent with respect to `enabled`: calling
    /// either twice in a row must not touch the saved byte a second time.
    /// Exercised here purely on the `Cell` bookkeeping, without a live pid,
    /// since `enable`/`disable` short-circuit before touching memory.
    #[test]
    fn disable_before_enable_is_a_pure_flag_noop() {
        let bp = Breakpoint::new(Pid::from_raw(0), RuntimeAddress::from(0x1000u64));
        assert!(!bp.is_enabled());
        // disable() on a never-enabled breakpoint must not attempt a ptrace
        // call (which would fail against pid 0); it should short-circuit.
        assert!(bp.disable().is_ok());
        assert!(!bp.is_enabled());
    }
}
