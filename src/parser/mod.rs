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

//! Line classifier and statement builder: turns raw source text into a
//! line-numbered `Vec<AssemblyLine>`, one entry per physical line.

use crate::ast::*;
use crate::errors::{self, AssemblyError};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "./grammar.pest"]
pub struct Asm12Parser;

/// Source lines may be up to 82 characters including their terminator, so
/// content (the terminator stripped by `str::lines`) may be at most 81.
const MAX_LINE_CONTENT_LEN: usize = 81;

/// Parses an entire source file into a line-numbered AST. Lines that fail
/// to classify or parse are recorded as errors and represented by an empty
/// placeholder, so the returned vector's indices keep tracking 1-based line
/// numbers and the caller can keep walking subsequent lines.
pub fn parse_source(source: &str) -> (Vec<AssemblyLine>, Vec<AssemblyError>) {
    let mut lines = Vec::new();
    let mut errors = Vec::new();

    for (zero_based, raw_line) in source.lines().enumerate() {
        let line_number = zero_based + 1;

        if raw_line.len() > MAX_LINE_CONTENT_LEN {
            errors.push(AssemblyError::syntax(
                line_number,
                "line exceeds maximum length of 82 characters including terminator",
            ));
            lines.push(empty_line(line_number));
            continue;
        }

        match parse_line(raw_line, line_number) {
            Ok(line) => lines.push(line),
            Err(err) => {
                errors.push(err);
                lines.push(empty_line(line_number));
            }
        }
    }

    (lines, errors)
}

fn empty_line(line_number: usize) -> AssemblyLine {
    AssemblyLine { line_number, label: None, body: StatementBody::Empty }
}

fn parse_line(raw_line: &str, line_number: usize) -> Result<AssemblyLine, AssemblyError> {
    if raw_line.trim().is_empty() {
        return Ok(AssemblyLine { line_number, label: None, body: StatementBody::Empty });
    }
    if raw_line.trim_start().starts_with(';') {
        return Ok(AssemblyLine { line_number, label: None, body: StatementBody::Comment });
    }

    let mut parsed = Asm12Parser::parse(Rule::line, raw_line)
        .map_err(|err| errors::from_grammar_error(line_number, err))?;
    let line_pair = parsed.next().expect("Rule::line always produces exactly one pair");
    build_line(line_pair, line_number)
}

fn build_line(line_pair: Pair<Rule>, line_number: usize) -> Result<AssemblyLine, AssemblyError> {
    let mut label = None;
    let mut statement_pair = None;

    for pair in line_pair.into_inner() {
        match pair.as_rule() {
            Rule::label_prefix => {
                let name = pair.into_inner().next().unwrap().as_str();
                validate_label_name(name, line_number)?;
                label = Some(name.to_string());
            }
            Rule::statement => statement_pair = Some(pair),
            Rule::EOI => {}
            _ => {}
        }
    }

    let body = match statement_pair {
        Some(pair) => build_statement(pair, line_number)?,
        None if label.is_some() => {
            return Err(AssemblyError::syntax(
                line_number,
                "label must be followed by a directive or instruction",
            ));
        }
        None => StatementBody::Empty,
    };

    Ok(AssemblyLine { line_number, label, body })
}

/// Grammar's `ident` already guarantees an alphanumeric token starting with
/// a letter; only the length bound remains to check here.
fn validate_label_name(name: &str, line_number: usize) -> Result<(), AssemblyError> {
    if name.len() > 31 {
        return Err(AssemblyError::syntax(
            line_number,
            format!("label '{name}' exceeds the maximum length of 31 characters"),
        ));
    }
    Ok(())
}

fn build_statement(pair: Pair<Rule>, line_number: usize) -> Result<StatementBody, AssemblyError> {
    let inner = pair.into_inner().next().expect("statement always wraps exactly one alternative");
    match inner.as_rule() {
        Rule::data_directive => build_data_directive(inner, line_number),
        Rule::string_directive => build_string_directive(inner, line_number),
        Rule::entry_directive => Ok(build_entry_directive(inner)),
        Rule::extern_directive => Ok(build_extern_directive(inner)),
        Rule::instruction_stmt => build_instruction_stmt(inner, line_number),
        _ => unreachable!("grammar's `statement` rule only admits these five alternatives"),
    }
}

fn build_data_directive(pair: Pair<Rule>, line_number: usize) -> Result<StatementBody, AssemblyError> {
    let int_list = pair.into_inner().next().expect("data_directive always wraps an int_list");
    let values = int_list
        .into_inner()
        .map(|token| {
            token
                .as_str()
                .parse::<i32>()
                .map_err(|_| AssemblyError::syntax(line_number, format!("invalid integer '{}'", token.as_str())))
        })
        .collect::<Result<Vec<i32>, _>>()?;
    Ok(StatementBody::Data(DataDirective::Data(values)))
}

fn build_string_directive(pair: Pair<Rule>, line_number: usize) -> Result<StatementBody, AssemblyError> {
    let literal = pair.into_inner().next().expect("string_directive always wraps a string_literal");
    let raw = literal.as_str();
    let content = &raw[1..raw.len() - 1];
    if content.is_empty() {
        return Err(AssemblyError::syntax(line_number, "empty string literal is not allowed"));
    }
    Ok(StatementBody::Data(DataDirective::Str(content.to_string())))
}

fn build_entry_directive(pair: Pair<Rule>) -> StatementBody {
    let name = pair.into_inner().next().expect("entry_directive always wraps an ident").as_str();
    StatementBody::Linkage(LinkageDirective::Entry(name.to_string()))
}

fn build_extern_directive(pair: Pair<Rule>) -> StatementBody {
    let name = pair.into_inner().next().expect("extern_directive always wraps an ident").as_str();
    StatementBody::Linkage(LinkageDirective::Extern(name.to_string()))
}

fn build_instruction_stmt(pair: Pair<Rule>, line_number: usize) -> Result<StatementBody, AssemblyError> {
    let mut inner = pair.into_inner();
    let mnemonic_pair = inner.next().expect("instruction_stmt always starts with a mnemonic");
    let mnemonic = mnemonic_pair.as_str();
    let operation = Operation::from_mnemonic(mnemonic)
        .ok_or_else(|| AssemblyError::syntax(line_number, format!("unknown operation '{mnemonic}'")))?;

    let operands = match inner.next() {
        Some(operand_list_pair) => build_operand_list(operand_list_pair, line_number)?,
        None => Vec::new(),
    };

    if operands.len() != operation.operand_count() {
        return Err(AssemblyError::syntax(
            line_number,
            format!(
                "operation '{mnemonic}' expects {} operand(s), found {}",
                operation.operand_count(),
                operands.len()
            ),
        ));
    }

    Ok(StatementBody::Instruction { operation, operands })
}

fn build_operand_list(pair: Pair<Rule>, line_number: usize) -> Result<Vec<Operand>, AssemblyError> {
    pair.into_inner().map(|operand_pair| build_operand(operand_pair, line_number)).collect()
}

fn build_operand(pair: Pair<Rule>, line_number: usize) -> Result<Operand, AssemblyError> {
    let inner = pair.into_inner().next().expect("operand always wraps exactly one alternative");
    match inner.as_rule() {
        Rule::integer => {
            let value = inner
                .as_str()
                .parse::<i32>()
                .map_err(|_| AssemblyError::syntax(line_number, format!("invalid immediate operand '{}'", inner.as_str())))?;
            Ok(Operand::Immediate(value))
        }
        Rule::register => {
            let text = inner.as_str();
            let digit = text.as_bytes()[2] - b'0';
            Ok(Operand::RegisterDirect(digit))
        }
        Rule::ident => Ok(Operand::Direct(inner.as_str().to_string())),
        _ => unreachable!("grammar's `operand` rule only admits these three alternatives"),
    }
}
