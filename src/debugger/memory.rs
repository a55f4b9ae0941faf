//! Word-granular read/write of inferior address space.

use crate::debugger::address::RuntimeAddress;
use crate::debugger::error::{Error, Result};
use nix::libc::c_void;
use nix::sys;
use nix::unistd::Pid;
use std::mem;

/// Read one machine word at `addr`. No alignment adjustment is performed;
/// the caller is responsible for word-aligning `addr` if that matters to it.
pub fn read(pid: Pid, addr: RuntimeAddress) -> Result<u64> {
    let word = sys::ptrace::read(pid, addr.as_usize() as *mut c_void).map_err(Error::Trace)?;
    Ok(word as u64)
}

/// Write one machine word at `addr`.
pub fn write(pid: Pid, addr: RuntimeAddress, value: u64) -> Result<()> {
    unsafe {
        sys::ptrace::write(pid, addr.as_usize() as *mut c_void, value as *mut c_void)
            .map_err(Error::Trace)?;
    }
    Ok(())
}

/// Read `len` bytes starting at `addr`, composed out of whole-word reads.
pub fn read_bytes(pid: Pid, addr: RuntimeAddress, len: usize) -> Result<Vec<u8>> {
    let word_size = mem::size_of::<u64>();
    let mut out = Vec::with_capacity(len);
    let mut cursor = addr;
    while out.len() < len {
        let word = read(pid, cursor)?;
        let take = word_size.min(len - out.len());
        out.extend_from_slice(&word.to_ne_bytes()[..take]);
        cursor = cursor.offset(word_size as i64);
    }
    Ok(out)
}
