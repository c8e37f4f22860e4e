use thiserror::Error;

/// Structured error type for the parsing/encoding/symbol-table layers.
///
/// `Syntax` is the workhorse variant: every malformed-directive, bad-operand,
/// duplicate-symbol, or reserved-keyword condition renders through it in the
/// original tool's exact diagnostic format. `OpenFailure` is the one variant
/// with no source line, since it means the file itself could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("ERROR: in line {line} - {message}")]
    Syntax { line: usize, message: String },

    #[error("*** ERROR: failed to open '{name}' ***")]
    OpenFailure { name: String, reason: String },
}

impl AssemblyError {
    pub fn syntax(line: usize, message: impl Into<String>) -> AssemblyError {
        AssemblyError::Syntax { line, message: message.into() }
    }

    /// The 1-based line number this error pins to, where one exists.
    pub fn line(&self) -> Option<usize> {
        match self {
            AssemblyError::Syntax { line, .. } => Some(*line),
            AssemblyError::OpenFailure { .. } => None,
        }
    }
}

/// Converts a grammar-level parse failure (scoped to a single line) into the
/// uniform syntax-error shape, substituting the caller's known line number
/// since pest's own line/column is relative to the single-line buffer it was
/// handed, not the source file.
pub fn from_grammar_error(line: usize, err: pest::error::Error<crate::parser::Rule>) -> AssemblyError {
    AssemblyError::syntax(line, err.variant.message().to_string())
}
