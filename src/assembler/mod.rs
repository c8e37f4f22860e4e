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

//! The two-pass driver: symbol table construction, data-symbol relocation,
//! and final instruction encoding.

pub mod emitter;
pub mod encoder;
pub mod symbol_table;
pub mod word;

use crate::ast::{AssemblyLine, LinkageDirective, StatementBody};
use crate::errors::AssemblyError;
use symbol_table::{SymbolRole, SymbolTable};
use word::Word;

pub struct AssemblyResult {
    pub instruction_words: Vec<Word>,
    pub data_words: Vec<Word>,
    pub symbol_table: SymbolTable,
}

/// Runs both passes over an already-parsed, line-numbered source. `errors`
/// is seeded with any errors the parse stage already collected, so that a
/// malformed line still suppresses pass 2 even though the bad line itself
/// carries no statement to assemble.
pub fn assemble_lines(
    lines: &[AssemblyLine],
    base_address: u32,
    mut errors: Vec<AssemblyError>,
    warnings: &mut Vec<String>,
) -> Result<AssemblyResult, Vec<AssemblyError>> {
    let mut symbol_table = SymbolTable::new();
    let mut instruction_counter: u32 = 0;
    let mut data_counter: u32 = 0;
    let mut data_words: Vec<Word> = Vec::new();
    let mut pending_entries: Vec<(String, usize)> = Vec::new();

    // Pass 1.
    for line in lines {
        match &line.body {
            StatementBody::Empty | StatementBody::Comment => {}

            StatementBody::Data(directive) => {
                if let Some(label) = &line.label {
                    let address = base_address + data_counter;
                    if let Err(err) = symbol_table.insert(label, address, SymbolRole::Data, line.line_number) {
                        errors.push(err);
                    }
                }
                let words = encoder::encode_data_directive(directive, base_address, &mut data_counter);
                data_words.extend(words);
            }

            StatementBody::Linkage(LinkageDirective::Extern(name)) => {
                if line.label.is_some() {
                    warnings.push(format!(
                        "line {}: label on '.extern' directive is ignored",
                        line.line_number
                    ));
                }
                if let Err(err) = symbol_table.insert(name, 0, SymbolRole::Extern, line.line_number) {
                    errors.push(err);
                }
            }

            StatementBody::Linkage(LinkageDirective::Entry(name)) => {
                if line.label.is_some() {
                    warnings.push(format!(
                        "line {}: label on '.entry' directive is ignored",
                        line.line_number
                    ));
                }
                pending_entries.push((name.clone(), line.line_number));
            }

            StatementBody::Instruction { operands, .. } => {
                if let Some(label) = &line.label {
                    let address = base_address + instruction_counter;
                    if let Err(err) = symbol_table.insert(label, address, SymbolRole::Code, line.line_number) {
                        errors.push(err);
                    }
                }
                instruction_counter += encoder::instruction_word_count(operands);
            }
        }
    }

    // Relocation: data symbols now live immediately after the instruction segment.
    symbol_table.relocate_data(instruction_counter);

    if !errors.is_empty() {
        return Err(errors);
    }

    // Pass 2.
    let mut counter = 0u32;
    let mut instruction_words: Vec<Word> = Vec::new();
    let mut pass2_errors: Vec<AssemblyError> = Vec::new();

    for line in lines {
        if let StatementBody::Instruction { operation, operands } = &line.body {
            match encoder::encode_instruction(
                *operation,
                operands,
                base_address,
                &mut counter,
                &symbol_table,
                line.line_number,
            ) {
                Ok(words) => instruction_words.extend(words),
                Err(err) => pass2_errors.push(err),
            }
        }
    }

    for (name, line_number) in &pending_entries {
        if let Err(err) = symbol_table.promote_to_entry(name, *line_number) {
            pass2_errors.push(err);
        }
    }

    if !pass2_errors.is_empty() {
        return Err(pass2_errors);
    }

    Ok(AssemblyResult { instruction_words, data_words, symbol_table })
}
