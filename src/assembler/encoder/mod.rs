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

//! Data and instruction encoding: turning parsed directives and operations
//! into concrete 12-bit [`Word`]s.

use crate::ast::{DataDirective, Operand, Operation};
use crate::assembler::symbol_table::{SymbolRole, SymbolTable};
use crate::assembler::word::{EncodingClass, Word};
use crate::errors::AssemblyError;

/// Clamps a `.data` literal to 12-bit two's complement range, saturating
/// positive overflow at 2047 rather than wrapping. Rust's `as` cast from a
/// (now in-range) `i16` to `u16` performs the two's-complement bit pattern
/// for negatives, so no manual invert-and-add-one is needed.
pub fn encode_data_value(raw: i32) -> u16 {
    let clamped = raw.clamp(-2048, 2047);
    (clamped as i16 as u16) & 0x0FFF
}

/// Encodes one `.data`/`.string` directive into its data words, advancing
/// `counter` (the data-segment word count) as it goes.
pub fn encode_data_directive(directive: &DataDirective, base_address: u32, counter: &mut u32) -> Vec<Word> {
    match directive {
        DataDirective::Data(values) => values
            .iter()
            .map(|value| {
                let word = Word::new(encode_data_value(*value), base_address + *counter);
                *counter += 1;
                word
            })
            .collect(),
        DataDirective::Str(content) => {
            let mut words: Vec<Word> = content
                .chars()
                .map(|ch| {
                    let word = Word::new(ch as u16 & 0x0FFF, base_address + *counter);
                    *counter += 1;
                    word
                })
                .collect();
            words.push(Word::new(0, base_address + *counter));
            *counter += 1;
            words
        }
    }
}

/// Number of instruction words an operation produces, computed purely from
/// its addressing modes rather than by materializing placeholder words: the
/// count never depends on resolved symbol values, only on how many operands
/// are present and whether they pair up as two register-direct operands.
pub fn instruction_word_count(operands: &[Operand]) -> u32 {
    let extra = match operands {
        [] => 0,
        [_] => 1,
        [a, b] => {
            if matches!(a, Operand::RegisterDirect(_)) && matches!(b, Operand::RegisterDirect(_)) {
                1
            } else {
                2
            }
        }
        _ => unreachable!("operand count is validated to be 0, 1, or 2 at parse time"),
    };
    1 + extra
}

/// Encodes one instruction into its final words. Requires a fully-populated
/// symbol table, so this is only ever called during pass 2.
pub fn encode_instruction(
    operation: Operation,
    operands: &[Operand],
    base_address: u32,
    counter: &mut u32,
    symbol_table: &SymbolTable,
    line_number: usize,
) -> Result<Vec<Word>, AssemblyError> {
    // Single-operand convention: the lone operand occupies the destination
    // field; the source-addressing field is zero.
    let (src_operand, dst_operand): (Option<&Operand>, Option<&Operand>) = match operands {
        [] => (None, None),
        [only] => (None, Some(only)),
        [a, b] => (Some(a), Some(b)),
        _ => unreachable!("operand count is validated to be 0, 1, or 2 at parse time"),
    };

    let src_mode = src_operand.map_or(0, Operand::mode);
    let dst_mode = dst_operand.map_or(0, Operand::mode);

    let first_word_value =
        (src_mode << 9) | (operation.opcode() << 5) | (dst_mode << 2) | EncodingClass::Absolute.bits();
    let mut words = vec![Word::new(first_word_value, base_address + *counter)];
    *counter += 1;

    match (src_operand, dst_operand) {
        (None, None) => {}
        (None, Some(only)) => {
            // A lone operand always lands in the source sub-field of its
            // operand word, regardless of the first word's destination-mode
            // framing.
            words.push(encode_operand_word(only, true, base_address, counter, symbol_table, line_number)?);
        }
        (Some(a), Some(b)) => {
            if let (Operand::RegisterDirect(ra), Operand::RegisterDirect(rb)) = (a, b) {
                let value = ((*ra as u16) << 7) | ((*rb as u16) << 2) | EncodingClass::Absolute.bits();
                words.push(Word::new(value, base_address + *counter));
                *counter += 1;
            } else {
                words.push(encode_operand_word(a, true, base_address, counter, symbol_table, line_number)?);
                words.push(encode_operand_word(b, false, base_address, counter, symbol_table, line_number)?);
            }
        }
    }

    Ok(words)
}

fn encode_operand_word(
    operand: &Operand,
    source_subfield: bool,
    base_address: u32,
    counter: &mut u32,
    symbol_table: &SymbolTable,
    line_number: usize,
) -> Result<Word, AssemblyError> {
    let address = base_address + *counter;
    *counter += 1;

    let (value, external_ref) = match operand {
        Operand::Immediate(value) => {
            let truncated = (*value) & 0x3FF;
            (((truncated as u16) << 2) | EncodingClass::Absolute.bits(), None)
        }
        Operand::RegisterDirect(register) => {
            let register = *register as u16;
            let placed = if source_subfield { register << 7 } else { register << 2 };
            (placed | EncodingClass::Absolute.bits(), None)
        }
        Operand::Direct(name) => {
            let symbol = symbol_table
                .lookup(name)
                .ok_or_else(|| AssemblyError::syntax(line_number, format!("undefined symbol '{name}'")))?;
            match symbol.role {
                SymbolRole::Extern => (EncodingClass::External.bits(), Some(name.clone())),
                _ => {
                    let truncated = (symbol.value as i32) & 0x3FF;
                    (((truncated as u16) << 2) | EncodingClass::Relocatable.bits(), None)
                }
            }
        }
    };

    let mut word = Word::new(value, address);
    word.external_ref = external_ref;
    Ok(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_one_is_all_ones() {
        assert_eq!(encode_data_value(-1), 0x0FFF);
    }

    #[test]
    fn positive_overflow_saturates() {
        assert_eq!(encode_data_value(5000), encode_data_value(2047));
    }

    #[test]
    fn stop_has_no_operand_words() {
        assert_eq!(instruction_word_count(&[]), 1);
    }

    #[test]
    fn two_registers_share_one_word() {
        let operands = [Operand::RegisterDirect(3), Operand::RegisterDirect(5)];
        assert_eq!(instruction_word_count(&operands), 2);
    }

    #[test]
    fn register_and_immediate_get_separate_words() {
        let operands = [Operand::RegisterDirect(3), Operand::Immediate(7)];
        assert_eq!(instruction_word_count(&operands), 3);
    }

    #[test]
    fn stop_first_word_matches_worked_example() {
        let mut counter = 0;
        let words =
            encode_instruction(Operation::Stop, &[], 100, &mut counter, &SymbolTable::new(), 1).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].value, 0b0000_1111_0000_0);
        assert_eq!(words[0].address, 100);
    }

    #[test]
    fn two_register_operand_word_matches_worked_example() {
        let mut counter = 0;
        let operands = [Operand::RegisterDirect(3), Operand::RegisterDirect(5)];
        let words = encode_instruction(
            Operation::Mov,
            &operands,
            100,
            &mut counter,
            &SymbolTable::new(),
            1,
        )
        .unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].value, 0b101_0000_101_00);
        assert_eq!(words[1].value, 0b00011_00101_00);
        assert_eq!(words[1].address, 101);
    }
}
