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

//! Black-box scenario tests driven through `assemble_source` against a
//! `MockFileReader`, asserting on the exact rendered artifact text.

use asm12::file_reader::{AsmFileReader, MockFileReader};
use asm12::{AssembleOutcome, DEFAULT_BASE_ADDRESS, assemble_source, write_outputs};
use std::path::PathBuf;

fn assemble_ok(source: &str) -> asm12::Assembled {
    let mut reader = MockFileReader::default();
    reader.add_file("prog.as", source);
    let result = assemble_source(&reader, &PathBuf::from("prog.as"), DEFAULT_BASE_ADDRESS).unwrap();
    match result.outcome {
        AssembleOutcome::Success(assembled) => assembled,
        AssembleOutcome::Failure(errors) => panic!("expected success, got errors: {errors:?}"),
    }
}

fn assemble_err(source: &str) -> Vec<asm12::errors::AssemblyError> {
    let mut reader = MockFileReader::default();
    reader.add_file("prog.as", source);
    let result = assemble_source(&reader, &PathBuf::from("prog.as"), DEFAULT_BASE_ADDRESS).unwrap();
    match result.outcome {
        AssembleOutcome::Success(_) => panic!("expected failure"),
        AssembleOutcome::Failure(errors) => errors,
    }
}

// Scenario 1: empty instruction segment, one data word.
#[test]
fn scenario_one_data_only() {
    let assembled = assemble_ok("X: .data 7\n");
    assert_eq!(assembled.object, "0 1\nAH\n");
    assert!(assembled.entries.is_none());
    assert!(assembled.externals.is_none());
}

// Scenario 2: a bare `stop`.
#[test]
fn scenario_stop_only() {
    let assembled = assemble_ok("stop\n");
    assert_eq!(assembled.object, "1 0\nHg\n");
}

// Scenario 3: two register-direct operands share one operand word.
#[test]
fn scenario_two_registers() {
    let assembled = assemble_ok("mov @r3, @r5\n");
    let lines: Vec<&str> = assembled.object.lines().collect();
    assert_eq!(lines[0], "2 0");
    assert_eq!(lines.len(), 3);
}

// Scenario 4: an extern reference appears in the external artifact at the
// address of the referencing operand word.
#[test]
fn scenario_extern_reference() {
    let assembled = assemble_ok(".extern K\njmp K\n");
    assert_eq!(assembled.externals.as_deref(), Some("K          101\n"));
}

// Scenario 5: data segment relocated to live after the instruction segment.
#[test]
fn scenario_data_after_code() {
    let mut reader = MockFileReader::default();
    reader.add_file("prog.as", "L1: mov @r0, @r1\nD: .data 4,5\n");
    let result = assemble_source(&reader, &PathBuf::from("prog.as"), DEFAULT_BASE_ADDRESS).unwrap();
    let assembled = match result.outcome {
        AssembleOutcome::Success(a) => a,
        AssembleOutcome::Failure(errors) => panic!("unexpected failure: {errors:?}"),
    };
    assert_eq!(assembled.object.lines().next(), Some("2 2"));
}

// Scenario 6: a duplicate label is a fatal, file-wide error; no artifacts
// are produced.
#[test]
fn scenario_duplicate_label() {
    let errors = assemble_err("A: .data 1\nA: .data 2\n");
    assert_eq!(errors.len(), 1);
}

#[test]
fn entry_listing_uses_final_relocated_value() {
    let assembled = assemble_ok("D: .data 1\n.entry D\nstop\n");
    assert_eq!(assembled.entries.as_deref(), Some("D          101\n"));
}

#[test]
fn string_directive_emits_chars_plus_terminator() {
    let assembled = assemble_ok(".string \"a\"\n");
    let lines: Vec<&str> = assembled.object.lines().collect();
    assert_eq!(lines[0], "0 2");
    assert_eq!(lines.len(), 3);
}

#[test]
fn empty_string_literal_is_rejected() {
    let errors = assemble_err(".string \"\"\n");
    assert_eq!(errors.len(), 1);
}

#[test]
fn immediate_saturates_at_2047() {
    let assembled = assemble_ok(".data 5000\n");
    // 2047 == 0b011111111111, upper 6 bits 011111 = 31 -> 'f', lower 6 bits 111111 = 63 -> '/'
    assert_eq!(assembled.object, "0 1\nf/\n");
}

#[test]
fn reserved_keyword_cannot_be_a_label() {
    let errors = assemble_err("mov: stop\n");
    assert_eq!(errors.len(), 1);
}

#[test]
fn operand_count_mismatch_is_a_syntax_error() {
    let errors = assemble_err("inc @r1, @r2\n");
    assert_eq!(errors.len(), 1);
}

#[test]
fn undefined_entry_symbol_is_reported() {
    let errors = assemble_err(".entry NOPE\nstop\n");
    assert_eq!(errors.len(), 1);
}

#[test]
fn open_failure_reports_a_distinct_error() {
    let reader = MockFileReader::default();
    let result = assemble_source(&reader, &PathBuf::from("missing.as"), DEFAULT_BASE_ADDRESS);
    assert!(result.is_err());
}

#[test]
fn write_outputs_writes_object_only_when_entries_and_externals_are_empty() {
    let mut reader = MockFileReader::default();
    reader.add_file("prog.as", "stop\n");
    let result = assemble_source(&reader, &PathBuf::from("prog.as"), DEFAULT_BASE_ADDRESS).unwrap();
    let assembled = match result.outcome {
        AssembleOutcome::Success(a) => a,
        AssembleOutcome::Failure(errors) => panic!("unexpected failure: {errors:?}"),
    };

    write_outputs(&reader, "prog", &assembled).unwrap();

    assert_eq!(reader.written_file("prog.ob").as_deref(), Some("1 0\nHg\n"));
    assert_eq!(reader.written_file("prog.ent"), None);
    assert_eq!(reader.written_file("prog.ext"), None);
}

#[test]
fn write_outputs_writes_entry_and_external_listings_when_present() {
    let mut reader = MockFileReader::default();
    reader.add_file("prog.as", ".extern K\n.entry D\nD: .data 1\njmp K\n");
    let result = assemble_source(&reader, &PathBuf::from("prog.as"), DEFAULT_BASE_ADDRESS).unwrap();
    let assembled = match result.outcome {
        AssembleOutcome::Success(a) => a,
        AssembleOutcome::Failure(errors) => panic!("unexpected failure: {errors:?}"),
    };

    write_outputs(&reader, "prog", &assembled).unwrap();

    assert!(reader.written_file("prog.ob").is_some());
    assert!(reader.written_file("prog.ent").is_some());
    assert!(reader.written_file("prog.ext").is_some());
}

#[test]
fn real_filesystem_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prog.as");
    std::fs::write(&path, "stop\n").unwrap();

    let reader = AsmFileReader;
    let result = assemble_source(&reader, &path, DEFAULT_BASE_ADDRESS).unwrap();
    match result.outcome {
        AssembleOutcome::Success(assembled) => assert_eq!(assembled.object, "1 0\nHg\n"),
        AssembleOutcome::Failure(errors) => panic!("unexpected failure: {errors:?}"),
    }
}
