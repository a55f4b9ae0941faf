//! ELF symbol table entries, reduced to what the `info symbol` family of
//! commands and function-name breakpoints need.

use crate::debugger::address::RuntimeAddress;

/// Mirrors the ELF `st_info` type field, narrowed to the kinds this
/// debugger distinguishes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SymbolKind {
    NoType,
    Object,
    Func,
    Section,
    File,
}

impl SymbolKind {
    pub(super) fn from_object(kind: object::SymbolKind) -> Self {
        match kind {
            object::SymbolKind::Text => SymbolKind::Func,
            object::SymbolKind::Data => SymbolKind::Object,
            object::SymbolKind::Section => SymbolKind::Section,
            object::SymbolKind::File => SymbolKind::File,
            _ => SymbolKind::NoType,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    pub address: RuntimeAddress,
}
