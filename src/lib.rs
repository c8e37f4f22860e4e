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

//! A two-pass assembler for a small didactic 12-bit instruction set. This
//! crate exposes a pure, testable [`assemble_source`]; `main.rs` is the
//! only place that touches `std::fs`, `std::process`, or stdout.

pub mod assembler;
pub mod ast;
pub mod errors;
pub mod file_reader;
pub mod parser;

use std::path::Path;

use anyhow::Result;
use errors::AssemblyError;
use file_reader::FileReader;

/// Default base address at which the combined (instructions, data) image
/// is considered to live.
pub const DEFAULT_BASE_ADDRESS: u32 = 100;

/// The three rendered output artifacts for one successfully-assembled file.
pub struct Assembled {
    pub object: String,
    pub entries: Option<String>,
    pub externals: Option<String>,
}

pub enum AssembleOutcome {
    Success(Assembled),
    Failure(Vec<AssemblyError>),
}

pub struct AssembleResult {
    pub outcome: AssembleOutcome,
    pub warnings: Vec<String>,
}

/// Assembles one source file read through `reader`. An I/O failure (file
/// missing, unreadable) is a fatal per-file open-failure and is returned as
/// an `Err`; a syntax error anywhere in the source is not fatal to the
/// process but does suppress emission, and is reported as
/// `AssembleOutcome::Failure`.
pub fn assemble_source<F: FileReader>(
    reader: &F,
    source_path: &Path,
    base_address: u32,
) -> Result<AssembleResult> {
    let source = reader.read_to_string(source_path).map_err(|reason| {
        AssemblyError::OpenFailure { name: source_path.display().to_string(), reason: reason.to_string() }
    })?;

    let (lines, parse_errors) = parser::parse_source(&source);
    let mut warnings = Vec::new();

    let outcome = match assembler::assemble_lines(&lines, base_address, parse_errors, &mut warnings) {
        Ok(result) => {
            let artifacts =
                assembler::emitter::emit(&result.instruction_words, &result.data_words, &result.symbol_table);
            AssembleOutcome::Success(Assembled {
                object: artifacts.object,
                entries: artifacts.entries,
                externals: artifacts.externals,
            })
        }
        Err(errors) => AssembleOutcome::Failure(errors),
    };

    Ok(AssembleResult { outcome, warnings })
}

/// Writes the object artifact always, and the entry/external artifacts only
/// when non-empty, under `<base_name>.ob`/`.ent`/`.ext`, through `reader`'s
/// `FileReader::write` so output never bypasses the file abstraction.
pub fn write_outputs<F: FileReader>(reader: &F, base_name: &str, assembled: &Assembled) -> Result<()> {
    reader.write(Path::new(&format!("{base_name}.ob")), &assembled.object)?;
    if let Some(entries) = &assembled.entries {
        reader.write(Path::new(&format!("{base_name}.ent")), entries)?;
    }
    if let Some(externals) = &assembled.externals {
        reader.write(Path::new(&format!("{base_name}.ext")), externals)?;
    }
    Ok(())
}
