use serde::{Deserialize, Serialize};
use std::fmt;

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Line number where token starts (1-indexed)
    pub line: usize,
    /// Column number where token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme,
            line,
            column,
        }
    }

    /// Short description used in diagnostics: `Identifier 'x'`, `end of input`
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("{} '{}'", self.kind.name(), self.lexeme),
        }
    }
}

/// Numeric literal payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    /// Integer literal such as `42`
    Int(i64),
    /// Floating-point literal such as `3.14`
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Declared type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarType {
    /// `int`
    Int,
    /// `float`
    Float,
    /// `bool`
    Bool,
    /// `string`
    String,
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            VarType::Int => "int",
            VarType::Float => "float",
            VarType::Bool => "bool",
            VarType::String => "string",
        };
        write!(f, "{}", name)
    }
}

/// All possible token types in Mini
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Integer or floating-point literal
    Number(Number),
    /// String literal with escapes decoded
    String(String),
    /// `true` literal
    True,
    /// `false` literal
    False,

    /// Identifier, original case preserved
    Identifier(String),

    // Keywords
    /// Type keyword: `int`, `float`, `bool`, `string`
    Type(VarType),
    /// IF keyword
    If,
    /// THEN keyword
    Then,
    /// ELSE keyword
    Else,
    /// END keyword
    End,
    /// WHILE keyword
    While,
    /// DO keyword
    Do,
    /// BEGIN keyword
    Begin,

    // Operators
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Star operator (*)
    Star,
    /// Slash operator (/)
    Slash,
    /// Assignment operator (=)
    Assign,
    /// Equality operator (==)
    Eq,
    /// Inequality operator (!=)
    NotEq,
    /// Less than operator (<)
    Lt,
    /// Greater than operator (>)
    Gt,
    /// Less than or equal operator (<=)
    LtEq,
    /// Greater than or equal operator (>=)
    GtEq,
    /// Logical AND, spelled `and` or `&&`
    And,
    /// Logical OR, spelled `or` or `||`
    Or,
    /// Logical NOT, spelled `not` or `!`
    Not,

    // Delimiters
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Semicolon delimiter
    Semicolon,
    /// Comma delimiter
    Comma,

    // Special
    /// End of input marker
    Eof,
}

impl TokenKind {
    /// Looks up a keyword, ignoring case
    pub fn keyword(s: &str) -> Option<TokenKind> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "end" => TokenKind::End,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "begin" => TokenKind::Begin,
            "int" => TokenKind::Type(VarType::Int),
            "float" => TokenKind::Type(VarType::Float),
            "bool" => TokenKind::Type(VarType::Bool),
            "string" => TokenKind::Type(VarType::String),
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => return None,
        };
        Some(kind)
    }

    /// Check if token is a keyword, i.e. anything [`keyword`](Self::keyword) can return
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Type(_)
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::End
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::Begin
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::True
                | TokenKind::False
        )
    }

    /// Check if token can begin a statement
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Type(_) | TokenKind::If | TokenKind::While | TokenKind::Begin
        )
    }

    /// Check if token closes a statement list
    pub fn is_block_terminator(&self) -> bool {
        matches!(self, TokenKind::End | TokenKind::Else)
    }

    /// Human-readable kind name without payload
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "Number",
            TokenKind::String(_) => "String",
            TokenKind::True | TokenKind::False => "Bool",
            TokenKind::Identifier(_) => "Identifier",
            TokenKind::Type(_) => "Type",
            TokenKind::If => "If",
            TokenKind::Then => "Then",
            TokenKind::Else => "Else",
            TokenKind::End => "End",
            TokenKind::While => "While",
            TokenKind::Do => "Do",
            TokenKind::Begin => "Begin",
            TokenKind::Plus => "Plus",
            TokenKind::Minus => "Minus",
            TokenKind::Star => "Star",
            TokenKind::Slash => "Slash",
            TokenKind::Assign => "Assign",
            TokenKind::Eq => "Eq",
            TokenKind::NotEq => "NotEq",
            TokenKind::Lt => "Lt",
            TokenKind::Gt => "Gt",
            TokenKind::LtEq => "LtEq",
            TokenKind::GtEq => "GtEq",
            TokenKind::And => "And",
            TokenKind::Or => "Or",
            TokenKind::Not => "Not",
            TokenKind::LeftParen => "LeftParen",
            TokenKind::RightParen => "RightParen",
            TokenKind::Semicolon => "Semicolon",
            TokenKind::Comma => "Comma",
            TokenKind::Eof => "Eof",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Identifier(id) => write!(f, "{}", id),
            TokenKind::Type(t) => write!(f, "{}", t),
            _ => write!(f, "{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_ignores_case() {
        assert_eq!(TokenKind::keyword("if"), Some(TokenKind::If));
        assert_eq!(TokenKind::keyword("WHILE"), Some(TokenKind::While));
        assert_eq!(
            TokenKind::keyword("Int"),
            Some(TokenKind::Type(VarType::Int))
        );
        assert_eq!(TokenKind::keyword("TRUE"), Some(TokenKind::True));
        assert_eq!(TokenKind::keyword("if_count"), None);
    }

    #[test]
    fn test_is_keyword() {
        assert!(TokenKind::If.is_keyword());
        assert!(TokenKind::Type(VarType::Bool).is_keyword());
        assert!(!TokenKind::Number(Number::Int(42)).is_keyword());
        assert!(!TokenKind::Identifier("test".to_string()).is_keyword());
        assert!(!TokenKind::Star.is_keyword());
    }

    #[test]
    fn test_keyword_table_agrees_with_is_keyword() {
        let words = [
            "if", "then", "else", "end", "while", "do", "begin", "int", "float", "bool",
            "string", "and", "or", "not", "true", "false",
        ];
        for word in words {
            let kind = TokenKind::keyword(word).unwrap();
            assert!(kind.is_keyword(), "{} should be a keyword", word);
        }
    }

    #[test]
    fn test_describe() {
        let token = Token::new(TokenKind::Identifier("x".to_string()), "x".to_string(), 1, 5);
        assert_eq!(token.describe(), "Identifier 'x'");
        let eof = Token::new(TokenKind::Eof, String::new(), 3, 1);
        assert_eq!(eof.describe(), "end of input");
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Int(5).to_string(), "5");
        assert_eq!(Number::Float(3.14).to_string(), "3.14");
        assert_eq!(Number::Float(2.0).to_string(), "2.0");
    }
}
