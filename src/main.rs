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

use asm12::file_reader::AsmFileReader;
use asm12::{AssembleOutcome, DEFAULT_BASE_ADDRESS, assemble_source, write_outputs};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "asm12", version, author = "Connor Nolan", about = "Two-pass assembler for a 12-bit didactic ISA")]
struct Opts {
    /// Base names of input files; `.as` is appended to locate each source.
    #[arg(required = true)]
    inputs: Vec<String>,
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    let reader = AsmFileReader;
    let total = opts.inputs.len();
    let mut succeeded = 0usize;

    for base_name in &opts.inputs {
        let source_path = PathBuf::from(format!("{base_name}.as"));

        let result = match assemble_source(&reader, &source_path, DEFAULT_BASE_ADDRESS) {
            Ok(result) => result,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        for warning in &result.warnings {
            eprintln!("WARNING: {warning}");
        }

        match result.outcome {
            AssembleOutcome::Success(assembled) => match write_outputs(&reader, base_name, &assembled) {
                Ok(()) => succeeded += 1,
                Err(_) => println!("*** ERROR: failed to open '{base_name}.ob' ***"),
            },
            AssembleOutcome::Failure(errors) => {
                for error in &errors {
                    println!("{error}");
                }
            }
        }
    }

    println!("Successfully assembled {succeeded} files out of {total}.");

    if succeeded == total { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
