//! Errors raised by the analyzer passes.
//!
//! There are two flavours. A `Diagnostic` is recoverable: the pass that
//! produced it keeps going and hands every diagnostic back alongside its
//! result. An `Error` is fatal and is propagated with `?`.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("`{keyword}` at position {position} needs {needed} operand(s) but only {available} lexeme(s) remain")]
    MissingOperand {
        keyword: String,
        position: usize,
        needed: usize,
        available: usize,
    },

    #[error("failed to compile token rule: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum Diagnostic {
    #[error("Illegal character '{character}' at line {line}")]
    IllegalCharacter { character: char, line: usize },

    #[error("Undefined label '{label}' at position {position}")]
    UndefinedLabel { label: String, position: usize },
}

impl Diagnostic {
    /// Stable tag used when diagnostics are reported or filtered.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::IllegalCharacter { .. } => "illegal_character",
            Diagnostic::UndefinedLabel { .. } => "undefined_label",
        }
    }

    /// Line number for lexical diagnostics, lexeme index for semantic ones.
    pub fn position(&self) -> usize {
        match self {
            Diagnostic::IllegalCharacter { line, .. } => *line,
            Diagnostic::UndefinedLabel { position, .. } => *position,
        }
    }
}
