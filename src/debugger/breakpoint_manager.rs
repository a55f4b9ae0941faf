//! The live table of installed breakpoints.

use crate::debugger::address::{DwarfAddress, RuntimeAddress};
use crate::debugger::breakpoint::Breakpoint;
use crate::debugger::dwarf::DebugInfo;
use crate::debugger::error::{Error, Result};
use nix::unistd::Pid;
use std::collections::HashMap;

pub struct BreakpointTable {
    pid: Pid,
    by_address: HashMap<RuntimeAddress, Breakpoint>,
}

impl BreakpointTable {
    pub fn new(pid: Pid) -> Self {
        Self {
            pid,
            by_address: HashMap::new(),
        }
    }

    pub fn contains(&self, address: RuntimeAddress) -> bool {
        self.by_address.contains_key(&address)
    }

    pub fn get(&self, address: RuntimeAddress) -> Option<&Breakpoint> {
        self.by_address.get(&address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = RuntimeAddress> + '_ {
        self.by_address.keys().copied()
    }

    /// Install a breakpoint at a runtime address already computed by the
    /// caller. A no-op if one is already there.
    pub fn set_at_address(&mut self, address: RuntimeAddress) -> Result<()> {
        if self.by_address.contains_key(&address) {
            return Ok(());
        }
        let bp = Breakpoint::new(self.pid, address);
        bp.enable()?;
        self.by_address.insert(address, bp);
        Ok(())
    }

    /// Install a breakpoint just past the prologue of every function named
    /// `name`; duplicate names each get their own breakpoint and their own
    /// acknowledgement.
    pub fn set_at_function(
        &mut self,
        debug_info: &DebugInfo,
        load_base: u64,
        name: &str,
    ) -> Result<Vec<RuntimeAddress>> {
        let functions = debug_info.functions_named(name);
        if functions.is_empty() {
            return Err(Error::NoFunctionForPC(DwarfAddress::from(0u64)));
        }
        let mut installed = Vec::with_capacity(functions.len());
        for function in functions {
            let entry = debug_info.entry_point_after_prologue(function)?;
            let runtime = entry.to_runtime(load_base);
            self.set_at_address(runtime)?;
            installed.push(runtime);
        }
        Ok(installed)
    }

    pub fn set_at_source_line(
        &mut self,
        debug_info: &DebugInfo,
        load_base: u64,
        file: &str,
        line: u64,
    ) -> Result<RuntimeAddress> {
        let dwarf_addr = debug_info.address_of_source_line(file, line)?;
        let runtime = dwarf_addr.to_runtime(load_base);
        self.set_at_address(runtime)?;
        Ok(runtime)
    }

    /// Disable and drop the breakpoint at `address`. Returns whether one was
    /// actually there.
    pub fn remove(&mut self, address: RuntimeAddress) -> Result<bool> {
        match self.by_address.remove(&address) {
            Some(bp) => {
                bp.disable()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Disable every installed breakpoint, so a single-step across a
    /// patched byte sees the original instruction.
    pub fn disable_all(&self) -> Result<()> {
        for bp in self.by_address.values() {
            bp.disable()?;
        }
        Ok(())
    }

    pub fn enable_all(&self) -> Result<()> {
        for bp in self.by_address.values() {
            bp.enable()?;
        }
        Ok(())
    }
}

/// Scoped installation of temporary breakpoints (used by step-over and
/// step-out), guaranteeing they are removed again on every exit path,
/// including an early return on error.
pub struct TempBreakpoints<'a> {
    table: &'a mut BreakpointTable,
    installed: Vec<RuntimeAddress>,
}

impl<'a> TempBreakpoints<'a> {
    pub fn new(table: &'a mut BreakpointTable) -> Self {
        Self {
            table,
            installed: Vec::new(),
        }
    }

    /// Install a temporary breakpoint at `address`, unless a (permanent or
    /// already-temporary) one is already there.
    pub fn install(&mut self, address: RuntimeAddress) -> Result<()> {
        if self.table.contains(address) {
            return Ok(());
        }
        self.table.set_at_address(address)?;
        self.installed.push(address);
        Ok(())
    }

    pub fn table(&mut self) -> &mut BreakpointTable {
        self.table
    }
}

impl Drop for TempBreakpoints<'_> {
    fn drop(&mut self) {
        for address in self.installed.drain(..) {
            let _ = self.table.remove(address);
        }
    }
}
