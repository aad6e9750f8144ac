use serde::{Deserialize, Serialize};

use super::ast::{BinaryOp, Expression, Position, Program, Statement, UnaryOp};
use crate::error::{Diagnostic, DiagnosticKind, Error, Result};
use crate::lexer::{Token, TokenKind, VarType};
use crate::semantic::ScopeTable;

/// Nesting limit for `begin`/`if`/`while` bodies and parentheses
pub const DEFAULT_MAX_NESTING: usize = 128;

/// Result of parsing one token sequence
///
/// The tree is always present. It is only trustworthy when `diagnostics` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutput {
    /// Best-effort syntax tree
    pub program: Program,
    /// Every problem found, in discovery order
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    /// True when the program is valid
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Converts into the program, or [`Error::ParseFailed`] when anything was reported
    pub fn into_result(self) -> Result<Program> {
        if self.diagnostics.is_empty() {
            Ok(self.program)
        } else {
            Err(Error::ParseFailed {
                diagnostics: self.diagnostics,
            })
        }
    }
}

/// Grammar rules report through this; the nearest statement list records and recovers
type ParseResult<T> = std::result::Result<T, Diagnostic>;

/// Recursive-descent parser for Mini with panic-mode recovery
pub struct MiniParser {
    tokens: Vec<Token>,
    current: usize,
    diagnostics: Vec<Diagnostic>,
    scopes: ScopeTable,
    depth: usize,
    max_nesting: usize,
}

impl MiniParser {
    /// Creates a new parser
    ///
    /// A missing end-of-input marker is appended so the token invariant always holds.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(token) if token.kind == TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map(|t| (t.line, t.column + t.lexeme.chars().count()))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, String::new(), line, column));
        }

        MiniParser {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
            scopes: ScopeTable::new(),
            depth: 0,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    /// Overrides the nesting limit
    pub fn with_max_nesting(mut self, max_nesting: usize) -> Self {
        self.max_nesting = max_nesting;
        self
    }

    /// Parses the tokens into a program, collecting every diagnostic along the way
    pub fn parse(mut self) -> ParseOutput {
        let statements = self.statement_list(&[TokenKind::Eof]);

        if !self.is_at_end() {
            let diagnostic = self.syntax_error(format!(
                "expected end of input, found '{}'",
                self.peek().lexeme
            ));
            self.diagnostics.push(diagnostic);
        } else if let Some(trailing) = self.tokens.get(self.current + 1) {
            // Only one end-of-input marker may exist; nothing may follow it
            let diagnostic = self.error_at(
                trailing,
                DiagnosticKind::Syntax,
                "unexpected tokens after the end-of-input marker",
            );
            self.diagnostics.push(diagnostic);
        }

        tracing::debug!(
            statements = statements.len(),
            diagnostics = self.diagnostics.len(),
            "parse finished"
        );

        ParseOutput {
            program: Program {
                statements,
                position: Position::new(1, 1),
            },
            diagnostics: self.diagnostics,
        }
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    /// StmtList = { Stmt }, stopping before any of `terminators`
    fn statement_list(&mut self, terminators: &[TokenKind]) -> Vec<Statement> {
        let mut statements = Vec::new();
        let mut last_position = None;

        while !self.check_any(terminators) {
            if self.is_at_end() {
                break;
            }
            if last_position == Some(self.current) {
                let diagnostic = self.syntax_error(format!(
                    "unable to continue parsing at '{}'",
                    self.peek().lexeme
                ));
                self.diagnostics.push(diagnostic);
                break;
            }
            last_position = Some(self.current);

            match self.statement() {
                Ok(Some(statement)) => statements.push(statement),
                Ok(None) => {}
                Err(diagnostic) => {
                    self.diagnostics.push(diagnostic);
                    self.synchronize();
                }
            }
        }

        statements
    }

    /// Statement list inside its own scope frame
    fn scoped_list(&mut self, terminators: &[TokenKind]) -> Vec<Statement> {
        self.scopes.enter_scope();
        let statements = self.statement_list(terminators);
        self.scopes.exit_scope();
        statements
    }

    /// Stmt = DeclStmt | AssignStmt | IfStmt | WhileStmt | BlockStmt
    ///
    /// Returns `None` without consuming anything at a list boundary.
    fn statement(&mut self) -> ParseResult<Option<Statement>> {
        let kind = self.peek().kind.clone();

        let statement = match kind {
            TokenKind::Type(var_type) => self.declaration(var_type)?,
            TokenKind::If => self.nested(Self::if_statement)?,
            TokenKind::While => self.nested(Self::while_statement)?,
            TokenKind::Begin => self.nested(Self::block)?,
            TokenKind::Identifier(name) => {
                if self.peek_next().kind == TokenKind::Assign {
                    self.assignment()?
                } else {
                    return Err(self.syntax_error(format!(
                        "identifier '{}' must be followed by '=' to form an assignment",
                        name
                    )));
                }
            }
            TokenKind::Eof | TokenKind::End | TokenKind::Else | TokenKind::Semicolon => {
                return Ok(None)
            }
            _ => {
                return Err(self.syntax_error(format!(
                    "expected a declaration, assignment, if, while or begin statement, found '{}'",
                    self.peek().lexeme
                )))
            }
        };

        Ok(Some(statement))
    }

    /// DeclStmt = TypeKeyword Identifier [ '=' Expr ] ';'
    fn declaration(&mut self, var_type: VarType) -> ParseResult<Statement> {
        let type_token = self.advance();
        let (name, name_token) = self.consume_identifier("expected variable name")?;

        if let Err(err) = self.scopes.define(&name, var_type) {
            return Err(self.error_at(&name_token, DiagnosticKind::Semantic, err.to_string()));
        }

        let init = if self.match_kind(&TokenKind::Assign) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenKind::Semicolon, "expected ';'")?;

        Ok(Statement::Declaration {
            var_type,
            name,
            init,
            position: position_of(&type_token),
        })
    }

    /// AssignStmt = Identifier '=' Expr ';'
    fn assignment(&mut self) -> ParseResult<Statement> {
        let (name, name_token) = self.consume_identifier("expected variable name")?;
        self.check_declared(&name, &name_token)?;

        self.consume(TokenKind::Assign, "expected '='")?;
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "expected ';'")?;

        Ok(Statement::Assignment {
            name,
            value,
            position: position_of(&name_token),
        })
    }

    /// IfStmt = 'if' Expr 'then' StmtList [ 'else' StmtList ] 'end'
    fn if_statement(&mut self) -> ParseResult<Statement> {
        let if_token = self.advance();

        let condition = self.expression()?;
        self.consume(TokenKind::Then, "expected 'then'")?;

        let then_branch = self.scoped_list(&[TokenKind::Else, TokenKind::End]);

        let else_branch = if self.match_kind(&TokenKind::Else) {
            Some(self.scoped_list(&[TokenKind::End]))
        } else {
            None
        };

        self.consume(TokenKind::End, "expected 'end'")?;

        Ok(Statement::If {
            condition,
            then_branch,
            else_branch,
            position: position_of(&if_token),
        })
    }

    /// WhileStmt = 'while' Expr 'do' StmtList 'end'
    fn while_statement(&mut self) -> ParseResult<Statement> {
        let while_token = self.advance();

        let condition = self.expression()?;
        self.consume(TokenKind::Do, "expected 'do'")?;

        let body = self.scoped_list(&[TokenKind::End]);

        self.consume(TokenKind::End, "expected 'end'")?;

        Ok(Statement::While {
            condition,
            body,
            position: position_of(&while_token),
        })
    }

    /// BlockStmt = 'begin' StmtList 'end'
    fn block(&mut self) -> ParseResult<Statement> {
        let begin_token = self.advance();

        let statements = self.scoped_list(&[TokenKind::End]);

        self.consume(TokenKind::End, "expected 'end'")?;

        Ok(Statement::Block {
            statements,
            position: position_of(&begin_token),
        })
    }

    // ------------------------------------------------------------------------
    // Expressions, loosest binding first
    // ------------------------------------------------------------------------

    fn expression(&mut self) -> ParseResult<Expression> {
        self.logic_or()
    }

    /// LogicOr = LogicAnd { ('or'|'||') LogicAnd }
    fn logic_or(&mut self) -> ParseResult<Expression> {
        let mut left = self.logic_and()?;

        while self.check(&TokenKind::Or) {
            let op_token = self.advance();
            let right = self.logic_and()?;
            left = binary(BinaryOp::Or, left, right, &op_token);
        }

        Ok(left)
    }

    /// LogicAnd = LogicNot { ('and'|'&&') LogicNot }
    fn logic_and(&mut self) -> ParseResult<Expression> {
        let mut left = self.logic_not()?;

        while self.check(&TokenKind::And) {
            let op_token = self.advance();
            let right = self.logic_not()?;
            left = binary(BinaryOp::And, left, right, &op_token);
        }

        Ok(left)
    }

    /// LogicNot = ('not'|'!') LogicNot | Comparison
    ///
    /// Prefix chains are collected in a loop, so they do not count against the nesting limit.
    fn logic_not(&mut self) -> ParseResult<Expression> {
        let mut prefixes = Vec::new();
        while self.check(&TokenKind::Not) {
            prefixes.push((UnaryOp::Not, self.advance()));
        }

        let operand = self.comparison()?;
        Ok(wrap_prefixes(prefixes, operand))
    }

    /// Comparison = ArithExpr [ CompOp ArithExpr ], never chained
    fn comparison(&mut self) -> ParseResult<Expression> {
        let left = self.arith_expr()?;

        if let Some(op) = comparison_op(&self.peek().kind) {
            let op_token = self.advance();
            let right = self.arith_expr()?;
            return Ok(binary(op, left, right, &op_token));
        }

        Ok(left)
    }

    /// ArithExpr = Term { ('+'|'-') Term }
    fn arith_expr(&mut self) -> ParseResult<Expression> {
        let mut left = self.term()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let op_token = self.advance();
            let right = self.term()?;
            left = binary(op, left, right, &op_token);
        }

        Ok(left)
    }

    /// Term = Factor { ('*'|'/') Factor }
    fn term(&mut self) -> ParseResult<Expression> {
        let mut left = self.factor()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            let op_token = self.advance();
            let right = self.factor()?;
            left = binary(op, left, right, &op_token);
        }

        Ok(left)
    }

    /// Factor = '(' Expr ')' | Number | String | Bool | Identifier | ('+'|'-') Factor
    fn factor(&mut self) -> ParseResult<Expression> {
        let token = self.peek().clone();
        let position = position_of(&token);

        match &token.kind {
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.nested(Self::expression)?;
                self.consume(TokenKind::RightParen, "expected ')'")?;
                Ok(expr)
            }
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expression::NumberLiteral {
                    value: *value,
                    position,
                })
            }
            TokenKind::String(value) => {
                self.advance();
                Ok(Expression::StringLiteral {
                    value: value.clone(),
                    position,
                })
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(Expression::BoolLiteral {
                    value: token.kind == TokenKind::True,
                    position,
                })
            }
            TokenKind::Identifier(name) => {
                self.advance();
                self.check_declared(name, &token)?;
                Ok(Expression::Identifier {
                    name: name.clone(),
                    position,
                })
            }
            TokenKind::Plus | TokenKind::Minus => {
                let mut prefixes = Vec::new();
                while let Some(op) = sign_op(&self.peek().kind) {
                    prefixes.push((op, self.advance()));
                }
                let operand = self.factor()?;
                Ok(wrap_prefixes(prefixes, operand))
            }
            _ => Err(self.syntax_error("expected expression")),
        }
    }

    // ------------------------------------------------------------------------
    // Semantic checks
    // ------------------------------------------------------------------------

    fn check_declared(&self, name: &str, token: &Token) -> ParseResult<()> {
        self.scopes
            .lookup(name)
            .map(|_| ())
            .map_err(|err| self.error_at(token, DiagnosticKind::Semantic, err.to_string()))
    }

    // ------------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------------

    /// Panic-mode recovery: skip at least one token, then stop right after a `;`,
    /// before a statement keyword, before `end`/`else`, or at end of input
    fn synchronize(&mut self) {
        let start = self.current;
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                break;
            }
            let kind = &self.peek().kind;
            if kind.starts_statement() || kind.is_block_terminator() {
                break;
            }
            self.advance();
        }

        tracing::debug!(
            skipped = self.current - start,
            line = self.peek().line,
            column = self.peek().column,
            "synchronized after error"
        );
    }

    /// Runs a recursive rule one nesting level deeper
    fn nested<T>(&mut self, rule: fn(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.max_nesting {
            return Err(self.syntax_error(format!(
                "nesting deeper than {} levels",
                self.max_nesting
            )));
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    // ------------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------------

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> &Token {
        let idx = (self.current + 1).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Consumes the current token; never moves past end of input
    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.is_at_end() && self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.peek().kind)
    }

    fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.syntax_error(message))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> ParseResult<(String, Token)> {
        match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                Ok((name, self.advance()))
            }
            _ => Err(self.syntax_error(message)),
        }
    }

    fn syntax_error(&self, message: impl Into<String>) -> Diagnostic {
        self.error_at(self.peek(), DiagnosticKind::Syntax, message)
    }

    fn error_at(
        &self,
        token: &Token,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Diagnostic {
        Diagnostic {
            kind,
            message: message.into(),
            line: token.line,
            column: token.column,
            found: token.describe(),
        }
    }
}

fn position_of(token: &Token) -> Position {
    Position::new(token.line, token.column)
}

fn binary(op: BinaryOp, left: Expression, right: Expression, op_token: &Token) -> Expression {
    Expression::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        position: position_of(op_token),
    }
}

fn unary(op: UnaryOp, operand: Expression, op_token: &Token) -> Expression {
    Expression::Unary {
        op,
        operand: Box::new(operand),
        position: position_of(op_token),
    }
}

/// Applies prefix operators innermost-last: `- - 5` becomes `(- (- 5))`
fn wrap_prefixes(prefixes: Vec<(UnaryOp, Token)>, operand: Expression) -> Expression {
    prefixes
        .into_iter()
        .rev()
        .fold(operand, |expr, (op, op_token)| unary(op, expr, &op_token))
}

fn sign_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Minus => Some(UnaryOp::Neg),
        _ => None,
    }
}

fn comparison_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        _ => None,
    }
}
