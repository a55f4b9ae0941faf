use std::fmt::{Display, Formatter};

/// An address as seen by a register or a patched breakpoint in the traced
/// process's live address space.
///
/// Related to [`DwarfAddress`] by the debugee's `load_base`:
/// `dwarf = runtime - load_base`.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct RuntimeAddress(u64);

impl RuntimeAddress {
    #[inline]
    pub fn to_dwarf(self, load_base: u64) -> DwarfAddress {
        DwarfAddress(self.0 - load_base)
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Address of the next machine word (used to step past a one-byte trap).
    #[inline]
    pub fn offset(self, delta: i64) -> RuntimeAddress {
        RuntimeAddress(self.0.wrapping_add_signed(delta))
    }
}

impl From<u64> for RuntimeAddress {
    fn from(addr: u64) -> Self {
        RuntimeAddress(addr)
    }
}

impl From<usize> for RuntimeAddress {
    fn from(addr: usize) -> Self {
        RuntimeAddress(addr as u64)
    }
}

impl From<RuntimeAddress> for u64 {
    fn from(addr: RuntimeAddress) -> Self {
        addr.0
    }
}

impl Display for RuntimeAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// An address as recorded in the DWARF debug information: function ranges,
/// line table rows. Unique per object file, not per process.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct DwarfAddress(u64);

impl DwarfAddress {
    #[inline]
    pub fn to_runtime(self, load_base: u64) -> RuntimeAddress {
        RuntimeAddress(self.0 + load_base)
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for DwarfAddress {
    fn from(addr: u64) -> Self {
        DwarfAddress(addr)
    }
}

impl From<DwarfAddress> for u64 {
    fn from(addr: DwarfAddress) -> Self {
        addr.0
    }
}

impl Display for DwarfAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_dwarf_round_trip() {
        let load_base = 0x5555_5555_0000_u64;
        let runtime = RuntimeAddress::from(0x5555_5555_1130_u64);
        let dwarf = runtime.to_dwarf(load_base);
        assert_eq!(dwarf.to_runtime(load_base), runtime);

        let dwarf2 = DwarfAddress::from(0x1130_u64);
        let runtime2 = dwarf2.to_runtime(load_base);
        assert_eq!(runtime2.to_dwarf(load_base), dwarf2);
    }

    #[test]
    fn zero_load_base_is_identity() {
        let runtime = RuntimeAddress::from(0x401130_u64);
        assert_eq!(runtime.to_dwarf(0).as_u64(), runtime.as_u64());
    }

    #[test]
    fn offset_rewinds_pc_past_trap_byte() {
        let pc = RuntimeAddress::from(0x401131_u64);
        assert_eq!(pc.offset(-1).as_u64(), 0x401130);
    }
}
