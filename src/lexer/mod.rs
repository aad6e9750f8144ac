//! Lexical analysis for Mini
//!
//! Converts source text into a stream of tokens terminated by a single end-of-input token.

mod mini_scanner;
mod token;

pub use mini_scanner::MiniScanner;
pub use token::{Number, Token, TokenKind, VarType};
