use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lexer::{Number, VarType};

/// Source position of a node (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Line number
    pub line: usize,
    /// Column number
    pub column: usize,
}

impl Position {
    /// Creates a position
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Complete Mini program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Top-level statements in the program
    pub statements: Vec<Statement>,
    /// Always 1:1
    pub position: Position,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Variable declaration: `int x = expr;`
    Declaration {
        /// Declared type
        var_type: VarType,
        /// Name of the declared variable
        name: String,
        /// Optional initializer
        init: Option<Expression>,
        /// Position of the type keyword
        position: Position,
    },

    /// Assignment: `x = expr;`
    Assignment {
        /// Name of the variable to assign to
        name: String,
        /// Expression value to assign
        value: Expression,
        /// Position of the target name
        position: Position,
    },

    /// If statement
    If {
        /// Condition expression to evaluate
        condition: Expression,
        /// Statements of the `then` branch
        then_branch: Vec<Statement>,
        /// Statements of the `else` branch, when present
        else_branch: Option<Vec<Statement>>,
        /// Position of the `if` keyword
        position: Position,
    },

    /// While loop
    While {
        /// Loop condition expression
        condition: Expression,
        /// Statements to execute in loop body
        body: Vec<Statement>,
        /// Position of the `while` keyword
        position: Position,
    },

    /// `begin ... end` block
    Block {
        /// Statements inside the block
        statements: Vec<Statement>,
        /// Position of the `begin` keyword
        position: Position,
    },
}

impl Statement {
    /// Position of the token that starts the statement
    pub fn position(&self) -> Position {
        match self {
            Statement::Declaration { position, .. }
            | Statement::Assignment { position, .. }
            | Statement::If { position, .. }
            | Statement::While { position, .. }
            | Statement::Block { position, .. } => *position,
        }
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    // Literals
    /// Integer or floating-point literal
    NumberLiteral {
        /// Literal value
        value: Number,
        /// Literal position
        position: Position,
    },
    /// String literal with escapes decoded
    StringLiteral {
        /// Literal value
        value: String,
        /// Literal position
        position: Position,
    },
    /// `true` or `false`
    BoolLiteral {
        /// Literal value
        value: bool,
        /// Literal position
        position: Position,
    },

    /// Variable reference
    Identifier {
        /// Referenced name
        name: String,
        /// Reference position
        position: Position,
    },

    /// Binary operation expression
    Binary {
        /// Binary operator to apply
        op: BinaryOp,
        /// Left operand expression
        left: Box<Expression>,
        /// Right operand expression
        right: Box<Expression>,
        /// Position of the operator token
        position: Position,
    },

    /// Unary operation expression
    Unary {
        /// Unary operator to apply
        op: UnaryOp,
        /// Operand expression
        operand: Box<Expression>,
        /// Position of the operator token
        position: Position,
    },
}

impl Expression {
    /// Position recorded for the node
    pub fn position(&self) -> Position {
        match self {
            Expression::NumberLiteral { position, .. }
            | Expression::StringLiteral { position, .. }
            | Expression::BoolLiteral { position, .. }
            | Expression::Identifier { position, .. }
            | Expression::Binary { position, .. }
            | Expression::Unary { position, .. } => *position,
        }
    }
}

/// Fully parenthesized prefix form: `(+ 1 (* 2 3))`
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::NumberLiteral { value, .. } => write!(f, "{}", value),
            Expression::StringLiteral { value, .. } => write!(f, "{:?}", value),
            Expression::BoolLiteral { value, .. } => write!(f, "{}", value),
            Expression::Identifier { name, .. } => write!(f, "{}", name),
            Expression::Binary {
                op, left, right, ..
            } => write!(f, "({} {} {})", op, left, right),
            Expression::Unary { op, operand, .. } => write!(f, "({} {})", op, operand),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    /// Addition operator (+)
    Add,
    /// Subtraction operator (-)
    Sub,
    /// Multiplication operator (*)
    Mul,
    /// Division operator (/)
    Div,

    // Comparison
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

    // Logical
    /// Logical AND operator (`and`, `&&`)
    And,
    /// Logical OR operator (`or`, `||`)
    Or,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Identity operator (+x)
    Plus,
    /// Negation operator (-x)
    Neg,
    /// Logical NOT operator (`not`, `!`)
    Not,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Eq => write!(f, "=="),
            BinaryOp::NotEq => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::LtEq => write!(f, "<="),
            BinaryOp::GtEq => write!(f, ">="),
            BinaryOp::And => write!(f, "and"),
            BinaryOp::Or => write!(f, "or"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Plus => write!(f, "+"),
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "not"),
        }
    }
}
