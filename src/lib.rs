//! # Minilang - A Front End for the Mini Language
//!
//! Lexer, recursive-descent parser and scope checker for **Mini**, a small imperative
//! teaching language with typed declarations, assignments, `if`, `while` and
//! `begin ... end` blocks.
//!
//! ## Quick Start
//!
//! ```rust
//! use minilang::{Parser, Scanner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let code = r#"
//!     int total = 0;
//!     int i = 1;
//!     while i <= 10 do
//!         total = total + i;
//!         i = i + 1;
//!     end
//! "#;
//!
//! // Tokenize (scan)
//! let tokens = Scanner::new(code).scan_tokens()?;
//!
//! // Parse into AST, collecting diagnostics
//! let output = Parser::new(tokens).parse();
//! assert!(output.is_success());
//! assert_eq!(output.program.statements.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Lexical errors are fatal and come back as [`Error`]. Syntax and scope problems are
//! [`Diagnostic`]s: the parser records them, resynchronizes and keeps going, so one call
//! reports every independent problem it can find.
//!
//! ```rust
//! let output = minilang::parse(minilang::tokenize("x = 1;\nint y = ;").unwrap());
//! assert_eq!(output.diagnostics.len(), 2);
//! assert!(output.diagnostics[0].message.contains("undeclared"));
//!
//! assert!(minilang::tokenize("string s = \"open").is_err());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → Parser (+ ScopeTable) → AST + Diagnostics
//! ```
//!
//! - [`Scanner`] - Tokenizes source code
//! - [`Parser`] - Builds the [`Program`] tree and reports [`Diagnostic`]s
//! - [`ScopeTable`] - Nested declaration frames consulted during parsing
//! - [`AstPrinter`] - Indented tree rendering
//! - [`driver`] - Report rendering and the batch runner used by the `mini` binary

/// Version of the Mini front end
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "cli")]
pub mod cli;
pub mod driver;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod semantic;

// Re-export main types
pub use error::{Diagnostic, DiagnosticKind, Error, Result};
pub use lexer::{MiniScanner, Number, Token, TokenKind, VarType};
pub use parser::{
    BinaryOp, Expression, MiniParser, ParseOutput, Position, Program, Statement, UnaryOp,
};
pub use printer::AstPrinter;
pub use semantic::ScopeTable;

/// Type alias for the Mini scanner (lexer).
/// Converts raw source text into tokens for the parser.
pub type Scanner = MiniScanner;

/// Type alias for the Mini parser.
/// Converts tokens into an abstract syntax tree (AST) plus diagnostics.
pub type Parser = MiniParser;

/// Tokenizes `source`; fails on the first illegal character or unterminated string
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Scanner::new(source).scan_tokens()
}

/// Parses a token sequence. Success is `output.diagnostics.is_empty()`.
pub fn parse(tokens: Vec<Token>) -> ParseOutput {
    Parser::new(tokens).parse()
}

/// Tokenizes and parses `source`, returning the program only when it is valid
pub fn check(source: &str) -> Result<Program> {
    parse(tokenize(source)?).into_result()
}
