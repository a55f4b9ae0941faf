//! Named access to the inferior's general-purpose register file.

use crate::debugger::error::{Error, Result};
use nix::libc::user_regs_struct;
use nix::sys;
use nix::unistd::Pid;
use strum_macros::{Display, EnumString};

/// Logical register identifier, independent of slot order in
/// `user_regs_struct` or of the DWARF register numbering.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Register {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rdi,
    Rsi,
    Rbp,
    Rsp,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
    Rip,
    Eflags,
    Cs,
    Ss,
    Ds,
    Es,
    Fs,
    Gs,
    OrigRax,
    FsBase,
    GsBase,
}

/// A single row of the static register descriptor table:
/// `{logical_id, dwarf_id, name, slot}`.
struct Descriptor {
    register: Register,
    dwarf_id: u16,
}

/// Order is insignificant; `DWARF_TABLE` is scanned linearly on the rare
/// `get_by_dwarf` / dwarf-register lookups, not on the hot path.
const DWARF_TABLE: &[Descriptor] = &[
    Descriptor { register: Register::Rax, dwarf_id: 0 },
    Descriptor { register: Register::Rdx, dwarf_id: 1 },
    Descriptor { register: Register::Rcx, dwarf_id: 2 },
    Descriptor { register: Register::Rbx, dwarf_id: 3 },
    Descriptor { register: Register::Rsi, dwarf_id: 4 },
    Descriptor { register: Register::Rdi, dwarf_id: 5 },
    Descriptor { register: Register::Rbp, dwarf_id: 6 },
    Descriptor { register: Register::Rsp, dwarf_id: 7 },
    Descriptor { register: Register::R8, dwarf_id: 8 },
    Descriptor { register: Register::R9, dwarf_id: 9 },
    Descriptor { register: Register::R10, dwarf_id: 10 },
    Descriptor { register: Register::R11, dwarf_id: 11 },
    Descriptor { register: Register::R12, dwarf_id: 12 },
    Descriptor { register: Register::R13, dwarf_id: 13 },
    Descriptor { register: Register::R14, dwarf_id: 14 },
    Descriptor { register: Register::R15, dwarf_id: 15 },
    Descriptor { register: Register::Rip, dwarf_id: 16 },
    Descriptor { register: Register::Eflags, dwarf_id: 49 },
    Descriptor { register: Register::Es, dwarf_id: 50 },
    Descriptor { register: Register::Cs, dwarf_id: 51 },
    Descriptor { register: Register::Ss, dwarf_id: 52 },
    Descriptor { register: Register::Ds, dwarf_id: 53 },
    Descriptor { register: Register::Fs, dwarf_id: 54 },
    Descriptor { register: Register::Gs, dwarf_id: 55 },
    Descriptor { register: Register::FsBase, dwarf_id: 58 },
    Descriptor { register: Register::GsBase, dwarf_id: 59 },
];

/// All registers in the order `register dump` prints them.
pub const ALL: &[Register] = &[
    Register::Rax,
    Register::Rbx,
    Register::Rcx,
    Register::Rdx,
    Register::Rdi,
    Register::Rsi,
    Register::Rbp,
    Register::Rsp,
    Register::R8,
    Register::R9,
    Register::R10,
    Register::R11,
    Register::R12,
    Register::R13,
    Register::R14,
    Register::R15,
    Register::Rip,
    Register::Eflags,
    Register::Cs,
    Register::OrigRax,
    Register::FsBase,
    Register::GsBase,
    Register::Fs,
    Register::Gs,
    Register::Ss,
    Register::Ds,
    Register::Es,
];

pub fn name_of(register: Register) -> String {
    register.to_string()
}

pub fn id_of(name: &str) -> Result<Register> {
    name.to_lowercase()
        .parse()
        .map_err(|_| Error::UnknownRegisterName(name.to_string()))
}

fn slot(regs: &user_regs_struct, register: Register) -> u64 {
    match register {
        Register::Rax => regs.rax,
        Register::Rbx => regs.rbx,
        Register::Rcx => regs.rcx,
        Register::Rdx => regs.rdx,
        Register::Rdi => regs.rdi,
        Register::Rsi => regs.rsi,
        Register::Rbp => regs.rbp,
        Register::Rsp => regs.rsp,
        Register::R8 => regs.r8,
        Register::R9 => regs.r9,
        Register::R10 => regs.r10,
        Register::R11 => regs.r11,
        Register::R12 => regs.r12,
        Register::R13 => regs.r13,
        Register::R14 => regs.r14,
        Register::R15 => regs.r15,
        Register::Rip => regs.rip,
        Register::Eflags => regs.eflags,
        Register::Cs => regs.cs,
        Register::Ss => regs.ss,
        Register::Ds => regs.ds,
        Register::Es => regs.es,
        Register::Fs => regs.fs,
        Register::Gs => regs.gs,
        Register::OrigRax => regs.orig_rax,
        Register::FsBase => regs.fs_base,
        Register::GsBase => regs.gs_base,
    }
}

fn set_slot(regs: &mut user_regs_struct, register: Register, value: u64) {
    let slot = match register {
        Register::Rax => &mut regs.rax,
        Register::Rbx => &mut regs.rbx,
        Register::Rcx => &mut regs.rcx,
        Register::Rdx => &mut regs.rdx,
        Register::Rdi => &mut regs.rdi,
        Register::Rsi => &mut regs.rsi,
        Register::Rbp => &mut regs.rbp,
        Register::Rsp => &mut regs.rsp,
        Register::R8 => &mut regs.r8,
        Register::R9 => &mut regs.r9,
        Register::R10 => &mut regs.r10,
        Register::R11 => &mut regs.r11,
        Register::R12 => &mut regs.r12,
        Register::R13 => &mut regs.r13,
        Register::R14 => &mut regs.r14,
        Register::R15 => &mut regs.r15,
        Register::Rip => &mut regs.rip,
        Register::Eflags => &mut regs.eflags,
        Register::Cs => &mut regs.cs,
        Register::Ss => &mut regs.ss,
        Register::Ds => &mut regs.ds,
        Register::Es => &mut regs.es,
        Register::Fs => &mut regs.fs,
        Register::Gs => &mut regs.gs,
        Register::OrigRax => &mut regs.orig_rax,
        Register::FsBase => &mut regs.fs_base,
        Register::GsBase => &mut regs.gs_base,
    };
    *slot = value;
}

/// Read one register from the inferior's current register snapshot.
pub fn get(pid: Pid, register: Register) -> Result<u64> {
    let regs = sys::ptrace::getregs(pid).map_err(Error::Trace)?;
    Ok(slot(&regs, register))
}

/// Write one register into the inferior, leaving the rest of the snapshot
/// untouched.
pub fn set(pid: Pid, register: Register, value: u64) -> Result<()> {
    let mut regs = sys::ptrace::getregs(pid).map_err(Error::Trace)?;
    set_slot(&mut regs, register, value);
    sys::ptrace::setregs(pid, regs).map_err(Error::Trace)?;
    Ok(())
}

/// Read a register addressed by its DWARF number (as used by
/// `DW_OP_breg*`/CFI register rules).
pub fn get_by_dwarf(pid: Pid, dwarf_id: u16) -> Result<u64> {
    let descriptor = DWARF_TABLE
        .iter()
        .find(|d| d.dwarf_id == dwarf_id)
        .ok_or(Error::UnknownDwarfRegister(dwarf_id))?;
    get(pid, descriptor.register)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_round_trips_through_id_of() {
        for &register in ALL {
            let name = name_of(register);
            assert_eq!(id_of(&name).unwrap(), register);
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            id_of("not_a_register"),
            Err(Error::UnknownRegisterName(_))
        ));
    }

    #[test]
    fn dwarf_table_covers_common_registers() {
        assert_eq!(
            DWARF_TABLE.iter().find(|d| d.dwarf_id == 7).unwrap().register,
            Register::Rsp
        );
        assert_eq!(
            DWARF_TABLE.iter().find(|d| d.dwarf_id == 6).unwrap().register,
            Register::Rbp
        );
    }
}
