/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Ordered symbol table: every name the assembler knows about, tagged with
//! the role it plays and the address (or extern placeholder) it carries.

use crate::ast::Operation;
use crate::errors::AssemblyError;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolRole {
    Code,
    Data,
    Extern,
    Entry,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub value: u32,
    pub role: SymbolRole,
}

/// Insertion-ordered so the entry listing stays stable; the emitter relies
/// on this ordering directly rather than sorting symbols itself.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
}

const DIRECTIVE_STEMS: [&str; 4] = ["data", "string", "entry", "extern"];
const REGISTER_NAMES: [&str; 8] = ["r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7"];

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Reserved keywords: the 16 mnemonics, the four directive stems, and `r0`..`r7`.
    pub fn is_reserved(name: &str) -> bool {
        Operation::from_mnemonic(name).is_some()
            || DIRECTIVE_STEMS.contains(&name)
            || REGISTER_NAMES.contains(&name)
    }

    pub fn insert(
        &mut self,
        name: &str,
        value: u32,
        role: SymbolRole,
        line: usize,
    ) -> Result<(), AssemblyError> {
        if SymbolTable::is_reserved(name) {
            return Err(AssemblyError::syntax(
                line,
                format!("'{name}' is a reserved keyword and cannot be used as a symbol name"),
            ));
        }
        if self.symbols.contains_key(name) {
            return Err(AssemblyError::syntax(
                line,
                format!("duplicate symbol definition: '{name}'"),
            ));
        }
        self.symbols.insert(name.to_string(), Symbol { value, role });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Promotes an existing code/data symbol to the entry role. The symbol
    /// must already exist; a missing name is reported as an error rather
    /// than silently accepted.
    pub fn promote_to_entry(&mut self, name: &str, line: usize) -> Result<(), AssemblyError> {
        match self.symbols.get_mut(name) {
            Some(symbol) => {
                symbol.role = SymbolRole::Entry;
                Ok(())
            }
            None => Err(AssemblyError::syntax(
                line,
                format!("'.entry' references undefined symbol '{name}'"),
            )),
        }
    }

    /// Bulk-relocates every data symbol by the final instruction-segment
    /// length, run once between pass 1 and pass 2.
    pub fn relocate_data(&mut self, instruction_count: u32) {
        for symbol in self.symbols.values_mut() {
            if symbol.role == SymbolRole::Data {
                symbol.value += instruction_count;
            }
        }
    }

    /// Insertion-order iteration, depended on by the entry listing.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reserved_keywords() {
        let mut table = SymbolTable::new();
        assert!(table.insert("mov", 100, SymbolRole::Code, 1).is_err());
        assert!(table.insert("extern", 100, SymbolRole::Code, 1).is_err());
        assert!(table.insert("r3", 100, SymbolRole::Code, 1).is_err());
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut table = SymbolTable::new();
        table.insert("X", 100, SymbolRole::Code, 1).unwrap();
        assert!(table.insert("X", 101, SymbolRole::Data, 2).is_err());
    }

    #[test]
    fn relocate_only_touches_data_symbols() {
        let mut table = SymbolTable::new();
        table.insert("CODE", 100, SymbolRole::Code, 1).unwrap();
        table.insert("DATA", 102, SymbolRole::Data, 2).unwrap();
        table.relocate_data(5);
        assert_eq!(table.lookup("CODE").unwrap().value, 100);
        assert_eq!(table.lookup("DATA").unwrap().value, 107);
    }

    #[test]
    fn promote_requires_existing_symbol() {
        let mut table = SymbolTable::new();
        assert!(table.promote_to_entry("MISSING", 1).is_err());
        table.insert("HERE", 100, SymbolRole::Code, 1).unwrap();
        table.promote_to_entry("HERE", 2).unwrap();
        assert_eq!(table.lookup("HERE").unwrap().role, SymbolRole::Entry);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut table = SymbolTable::new();
        table.insert("B", 1, SymbolRole::Code, 1).unwrap();
        table.insert("A", 2, SymbolRole::Code, 2).unwrap();
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
