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

//! Renders the three output artifacts: object, entry, and external listings.

use super::symbol_table::{SymbolRole, SymbolTable};
use super::word::Word;

/// Non-standard ordering: uppercase first, then lowercase, then digits,
/// then `+` and `/`.
const BASE64_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encodes a 12-bit word as two base-64 characters: the upper 6 bits form
/// the first character, the lower 6 the second.
pub fn encode_word(value: u16) -> String {
    let value = value & 0x0FFF;
    let high = ((value >> 6) & 0x3F) as usize;
    let low = (value & 0x3F) as usize;
    let mut out = String::with_capacity(2);
    out.push(BASE64_ALPHABET[high] as char);
    out.push(BASE64_ALPHABET[low] as char);
    out
}

pub struct EmittedArtifacts {
    pub object: String,
    pub entries: Option<String>,
    pub externals: Option<String>,
}

pub fn emit(instruction_words: &[Word], data_words: &[Word], symbol_table: &SymbolTable) -> EmittedArtifacts {
    EmittedArtifacts {
        object: emit_object(instruction_words, data_words),
        entries: emit_entries(symbol_table),
        externals: emit_externals(instruction_words),
    }
}

fn emit_object(instruction_words: &[Word], data_words: &[Word]) -> String {
    let mut out = format!("{} {}\n", instruction_words.len(), data_words.len());
    for word in instruction_words.iter().chain(data_words.iter()) {
        out.push_str(&encode_word(word.value));
        out.push('\n');
    }
    out
}

fn emit_entries(symbol_table: &SymbolTable) -> Option<String> {
    let mut out = String::new();
    for (name, symbol) in symbol_table.iter() {
        if symbol.role == SymbolRole::Entry {
            out.push_str(&format!("{name:<10} {}\n", symbol.value));
        }
    }
    (!out.is_empty()).then_some(out)
}

fn emit_externals(instruction_words: &[Word]) -> Option<String> {
    let mut out = String::new();
    for word in instruction_words {
        if let Some(name) = &word.external_ref {
            out.push_str(&format!("{name:<10} {}\n", word.address));
        }
    }
    (!out.is_empty()).then_some(out)
}
