//! Symbol and line-table resolution backed by a loaded ELF+DWARF object.
//!
//! Resolves source coordinates (file, line, function name) to DWARF
//! addresses; runtime/DWARF conversion is the caller's job (see
//! [`crate::debugger::address`]).

pub mod symbol;

pub use symbol::{Symbol, SymbolKind};

use crate::debugger::address::DwarfAddress;
use crate::debugger::error::{Error, Result};
use fallible_iterator::FallibleIterator;
use gimli::{EndianRcSlice, RunTimeEndian};
use object::{Object, ObjectSection, ObjectSymbol, ObjectSymbolTable};
use std::fs;
use std::path::Path;
use std::rc::Rc;

type R = EndianRcSlice<RunTimeEndian>;

/// One row of a compilation unit's line-number program, reduced to what the
/// resolver needs.
#[derive(Debug, Clone)]
pub struct LineRow {
    pub address: DwarfAddress,
    pub file: String,
    pub line: u64,
    pub is_stmt: bool,
}

/// A `DW_TAG_subprogram` DIE, reduced to its name and PC range.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Option<String>,
    pub low_pc: DwarfAddress,
    pub high_pc: DwarfAddress,
}

impl Function {
    pub fn contains(&self, pc: DwarfAddress) -> bool {
        pc >= self.low_pc && pc < self.high_pc
    }
}

struct CompUnit {
    /// Used for suffix matching against a user-supplied `file:line` request.
    name: String,
    /// Address-ascending, as the DWARF line program iterates.
    lines: Vec<LineRow>,
    functions: Vec<Function>,
}

impl CompUnit {
    fn low(&self) -> Option<DwarfAddress> {
        self.lines.first().map(|l| l.address)
    }

    fn high(&self) -> Option<DwarfAddress> {
        self.lines.last().map(|l| l.address)
    }
}

/// Parsed ELF symbol + DWARF debug information for one executable.
pub struct DebugInfo {
    units: Vec<CompUnit>,
    symbols: Vec<Symbol>,
    pub entry_point: DwarfAddress,
    pub is_pie: bool,
}

impl DebugInfo {
    pub fn load(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        let object = object::File::parse(&*mmap)?;

        let endian = if object.is_little_endian() {
            RunTimeEndian::Little
        } else {
            RunTimeEndian::Big
        };

        let load_section = |id: gimli::SectionId| -> std::result::Result<R, gimli::Error> {
            let data = object
                .section_by_name(id.name())
                .and_then(|section| section.uncompressed_data().ok())
                .unwrap_or_default();
            Ok(EndianRcSlice::new(Rc::from(&*data), endian))
        };

        let dwarf = gimli::Dwarf::load(load_section)?;
        let units = Self::parse_units(&dwarf)?;
        let symbols = Self::parse_symbols(&object);
        let is_pie = object.kind() == object::ObjectKind::Dynamic;

        Ok(Self {
            units,
            symbols,
            entry_point: DwarfAddress::from(object.entry()),
            is_pie,
        })
    }

    fn parse_units(dwarf: &gimli::Dwarf<R>) -> Result<Vec<CompUnit>> {
        let mut units = Vec::new();
        let mut headers = dwarf.units();
        while let Some(header) = headers.next()? {
            let unit = dwarf.unit(header)?;
            let unit_ref = unit.unit_ref(dwarf);

            let name = unit_ref
                .name()
                .ok()
                .flatten()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            let mut lines = Vec::new();
            if let Some(program) = unit.line_program.clone() {
                let header = program.header();
                let file_names: Vec<String> = (0..header.file_names().len() as u64)
                    .map(|i| file_name_at(dwarf, &unit, header, i).unwrap_or_else(|| name.clone()))
                    .collect();

                let mut rows = program.clone().rows();
                while let Some((_, row)) = rows.next_row()? {
                    if row.end_sequence() {
                        continue;
                    }
                    let file = file_names
                        .get(row.file_index() as usize)
                        .cloned()
                        .unwrap_or_else(|| name.clone());
                    lines.push(LineRow {
                        address: DwarfAddress::from(row.address()),
                        file,
                        line: row.line().map(|l| l.get()).unwrap_or(0),
                        is_stmt: row.is_stmt(),
                    });
                }
            }
            lines.sort_by_key(|l| l.address);

            let mut functions = Vec::new();
            let mut cursor = unit_ref.entries();
            while let Some((_, die)) = cursor.next_dfs()? {
                if die.tag() != gimli::DW_TAG_subprogram {
                    continue;
                }
                let fn_name = unit_ref
                    .attr_string(die, gimli::DW_AT_name)
                    .ok()
                    .map(|s| s.to_string_lossy().into_owned());

                let low_pc = die.attr_value(gimli::DW_AT_low_pc)?.and_then(|v| match v {
                    gimli::AttributeValue::Addr(a) => Some(a),
                    other => other.udata_value(),
                });
                let Some(low_pc) = low_pc else { continue };

                let high_pc = match die.attr_value(gimli::DW_AT_high_pc)? {
                    Some(gimli::AttributeValue::Addr(a)) => a,
                    Some(gimli::AttributeValue::Udata(offset)) => low_pc + offset,
                    _ => continue,
                };

                functions.push(Function {
                    name: fn_name,
                    low_pc: DwarfAddress::from(low_pc),
                    high_pc: DwarfAddress::from(high_pc),
                });
            }

            units.push(CompUnit {
                name,
                lines,
                functions,
            });
        }
        Ok(units)
    }

    fn parse_symbols(object: &object::File) -> Vec<Symbol> {
        let mut symbols = Vec::new();
        let tables: Vec<_> = object
            .symbol_table()
            .into_iter()
            .chain(object.dynamic_symbol_table())
            .collect();
        for table in tables {
            for sym in table.symbols() {
                let Ok(name) = sym.name() else { continue };
                if name.is_empty() {
                    continue;
                }
                symbols.push(Symbol {
                    kind: SymbolKind::from_object(sym.kind()),
                    name: name.to_string(),
                    address: sym.address().into(),
                });
            }
        }
        symbols
    }

    fn unit_for_pc(&self, pc: DwarfAddress) -> Option<&CompUnit> {
        self.units.iter().find(|u| match (u.low(), u.high()) {
            (Some(low), Some(high)) => pc >= low && pc <= high,
            _ => false,
        })
    }

    /// Binary search the line-table entry whose address range contains `pc`.
    pub fn line_entry_for(&self, pc: DwarfAddress) -> Result<&LineRow> {
        let unit = self.unit_for_pc(pc).ok_or(Error::NoLineForPC(pc))?;
        let pos = match unit.lines.binary_search_by_key(&pc, |l| l.address) {
            Ok(p) => p,
            Err(0) => return Err(Error::NoLineForPC(pc)),
            Err(p) => p - 1,
        };
        Ok(&unit.lines[pos])
    }

    /// The line-table entry immediately after the one at `pc`, if any (used
    /// to detect "a different source line" while single-stepping and to
    /// skip a function's prologue).
    pub fn next_line_entry(&self, pc: DwarfAddress) -> Option<&LineRow> {
        let unit = self.unit_for_pc(pc)?;
        let pos = unit.lines.iter().position(|l| l.address == pc)?;
        unit.lines.get(pos + 1)
    }

    pub fn function_containing(&self, pc: DwarfAddress) -> Result<&Function> {
        self.units
            .iter()
            .flat_map(|u| u.functions.iter())
            .find(|f| f.contains(pc))
            .ok_or(Error::NoFunctionForPC(pc))
    }

    /// Every line-table row whose address falls inside `function`'s PC
    /// range, in ascending address order (used by step-over to enumerate
    /// candidate temporary-breakpoint sites).
    pub fn line_entries_in(&self, function: &Function) -> Vec<&LineRow> {
        self.units
            .iter()
            .flat_map(|u| u.lines.iter())
            .filter(|l| l.address >= function.low_pc && l.address < function.high_pc)
            .collect()
    }

    pub fn functions_named(&self, name: &str) -> Vec<&Function> {
        self.units
            .iter()
            .flat_map(|u| u.functions.iter())
            .filter(|f| f.name.as_deref() == Some(name))
            .collect()
    }

    /// Take the line entry at a function's `low_pc` and advance by one;
    /// this lands past the function's prologue.
    pub fn entry_point_after_prologue(&self, function: &Function) -> Result<DwarfAddress> {
        let entry = self.line_entry_for(function.low_pc)?;
        let entry_addr = entry.address;
        Ok(self
            .next_line_entry(entry_addr)
            .map(|l| l.address)
            .unwrap_or(entry_addr))
    }

    /// First statement-marked line-table row matching `line` in a
    /// compilation unit whose name ends with `file_suffix`; matching by
    /// suffix lets callers pass a basename.
    pub fn address_of_source_line(&self, file_suffix: &str, line: u64) -> Result<DwarfAddress> {
        for unit in &self.units {
            if !unit.name.ends_with(file_suffix) {
                continue;
            }
            if let Some(row) = unit.lines.iter().find(|l| l.line == line && l.is_stmt) {
                return Ok(row.address);
            }
        }
        Err(Error::NoSuchSourceLine(file_suffix.to_string(), line))
    }

    /// Every symbol (static or dynamic table) named `name`; may be empty.
    pub fn symbols_named(&self, name: &str) -> Vec<&Symbol> {
        self.symbols.iter().filter(|s| s.name == name).collect()
    }
}

fn file_name_at(
    dwarf: &gimli::Dwarf<R>,
    unit: &gimli::Unit<R>,
    header: &gimli::LineProgramHeader<R>,
    index: u64,
) -> Option<String> {
    let file = header.file(index)?;
    let mut name = dwarf
        .attr_string(unit, file.path_name())
        .ok()?
        .to_string_lossy()
        .into_owned();
    if let Some(dir) = file.directory(header) {
        if let Ok(dir) = dwarf.attr_string(unit, dir) {
            let dir = dir.to_string_lossy().into_owned();
            if !dir.is_empty() && !name.starts_with('/') {
                name = format!("{dir}/{name}");
            }
        }
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_contains_is_half_open() {
        let f = Function {
            name: Some("main".to_string()),
            low_pc: DwarfAddress::from(0x1000u64),
            high_pc: DwarfAddress::from(0x1010u64),
        };
        assert!(f.contains(DwarfAddress::from(0x1000u64)));
        assert!(f.contains(DwarfAddress::from(0x100fu64)));
        assert!(!f.contains(DwarfAddress::from(0x1010u64)));
    }
}
