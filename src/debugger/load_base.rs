//! Computing the relocation offset between DWARF addresses and an
//! inferior's live address space.

use crate::debugger::error::{Error, Result};
use nix::unistd::Pid;
use std::path::Path;

/// The lowest mapped address of `program`'s text segment once the inferior
/// has stopped after `exec`.
pub fn read(pid: Pid, program: &Path) -> Result<u64> {
    let canonical = program.canonicalize()?;
    let maps = proc_maps::get_process_maps(pid.as_raw())
        .map_err(|e| Error::Other(format!("reading /proc/{}/maps: {e}", pid.as_raw())))?;

    maps.iter()
        .filter(|map| map.filename() == Some(canonical.as_path()))
        .map(|map| map.start() as u64)
        .min()
        .ok_or_else(|| Error::Other(format!("no mapping found for {}", program.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::unistd::getpid;

    #[test]
    fn missing_binary_is_an_error() {
        let result = read(getpid(), Path::new("/definitely/does/not/exist"));
        assert!(result.is_err());
    }
}
