//! Error types for the Mini front end
//!
//! Two families live here. [`Error`] covers everything that stops work outright: fatal
//! lexical errors, scope-table violations, the summary of a failed parse and driver I/O.
//! [`Diagnostic`] is the recoverable kind: the parser accumulates them and keeps going.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Mini front-end errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lexical errors (fatal, scanning stops immediately)
    /// Character that starts no token
    ///
    /// **Triggered by:** any character outside the lexical grammar
    /// **Example:** `int x = 5 @ 3;`, a lone `&` or `|`
    #[error("Lexical error at line {line}, column {column}: illegal character '{ch}'")]
    IllegalCharacter {
        /// The offending character
        ch: char,
        /// Line of the character (1-indexed)
        line: usize,
        /// Column of the character (1-indexed)
        column: usize,
    },

    /// String literal without its closing delimiter
    ///
    /// **Triggered by:** reaching end of input inside a string
    /// **Example:** `string s = "abc`
    #[error(
        "Lexical error at line {line}, column {column}: unterminated string literal \
         (opened at line {start_line}, column {start_column})"
    )]
    UnterminatedString {
        /// Line where input ended
        line: usize,
        /// Column where input ended
        column: usize,
        /// Line of the opening quote
        start_line: usize,
        /// Column of the opening quote
        start_column: usize,
    },

    /// Numeric literal that cannot be represented
    #[error("Lexical error at line {line}, column {column}: invalid number literal '{text}'")]
    InvalidNumber {
        /// Literal text as written
        text: String,
        /// Line of the literal
        line: usize,
        /// Column of the literal
        column: usize,
    },

    // Semantic errors
    /// Name declared twice in the same scope
    #[error("duplicate declaration of variable '{name}' in the same scope")]
    DuplicateDeclaration {
        /// Variable name
        name: String,
    },

    /// Name used without a visible declaration
    #[error("undeclared variable '{name}' used before declaration")]
    UndeclaredVariable {
        /// Variable name
        name: String,
    },

    // Parse summary
    /// Parsing finished with one or more diagnostics
    #[error("Parse failed: found {} syntax error(s)", diagnostics.len())]
    ParseFailed {
        /// Every diagnostic collected during the parse, in source order of discovery
        diagnostics: Vec<Diagnostic>,
    },

    // Driver errors
    /// Source file could not be read
    #[error("I/O error on '{path}': {message}")]
    Io {
        /// Path that was being accessed
        path: String,
        /// Underlying error text
        message: String,
    },
}

impl Error {
    /// Returns true for errors raised by the scanner
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            Error::IllegalCharacter { .. }
                | Error::UnterminatedString { .. }
                | Error::InvalidNumber { .. }
        )
    }

    /// Source position carried by the error, if any
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::IllegalCharacter { line, column, .. }
            | Error::UnterminatedString { line, column, .. }
            | Error::InvalidNumber { line, column, .. } => Some((*line, *column)),
            Error::ParseFailed { diagnostics } => {
                diagnostics.first().map(|d| (d.line, d.column))
            }
            _ => None,
        }
    }

    /// Diagnostics attached to a failed parse (empty for every other variant)
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::ParseFailed { diagnostics } => diagnostics,
            _ => &[],
        }
    }
}

/// Result type for Mini front-end operations
pub type Result<T> = std::result::Result<T, Error>;

/// Category of a recoverable problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Grammar violation
    Syntax,
    /// Declaration or scope violation
    Semantic,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticKind::Syntax => write!(f, "Syntax"),
            DiagnosticKind::Semantic => write!(f, "Semantic"),
        }
    }
}

/// A recoverable problem found while parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Syntax or semantic
    pub kind: DiagnosticKind,
    /// Human-readable description
    pub message: String,
    /// Line of the offending token (1-indexed)
    pub line: usize,
    /// Column of the offending token (1-indexed)
    pub column: usize,
    /// Description of the offending token, e.g. `Identifier 'x'` or `end of input`
    pub found: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} error at line {}, column {}: {} (found {})",
            self.kind, self.line, self.column, self.message, self.found
        )
    }
}
