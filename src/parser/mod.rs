//! Mini Parser Module
//!
//! Parses the token stream into an Abstract Syntax Tree (AST), checking declarations
//! against a scope table on the way and recovering from errors in panic mode.

mod ast;
mod mini_parser;

pub use ast::{BinaryOp, Expression, Position, Program, Statement, UnaryOp};
pub use mini_parser::{MiniParser, ParseOutput, DEFAULT_MAX_NESTING};
