//! Indented rendering of a syntax tree
//!
//! ```text
//! Program
//!   Declaration: int x (with init)
//!     Number: 5
//!   Assignment: x =
//!     BinaryOp: +
//!       Identifier: x
//!       Number: 1
//! ```

use std::fmt;

use crate::parser::{Expression, Program, Statement};

/// Renders a [`Program`] as an indented outline, two spaces per level
#[derive(Debug, Default)]
pub struct AstPrinter {
    lines: Vec<String>,
    indent: usize,
}

impl AstPrinter {
    /// Creates an empty printer
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the whole tree
    pub fn print(mut self, program: &Program) -> String {
        self.line("Program");
        self.indented(|p| p.statements(&program.statements));
        self.lines.join("\n")
    }

    fn statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.statement(statement);
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Declaration {
                var_type,
                name,
                init,
                ..
            } => {
                let suffix = if init.is_some() { " (with init)" } else { "" };
                self.line(format!("Declaration: {} {}{}", var_type, name, suffix));
                if let Some(init) = init {
                    self.indented(|p| p.expression(init));
                }
            }
            Statement::Assignment { name, value, .. } => {
                self.line(format!("Assignment: {} =", name));
                self.indented(|p| p.expression(value));
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.line("IfStmt");
                self.indented(|p| {
                    p.section("Condition:", |p| p.expression(condition));
                    p.section("Then:", |p| p.statements(then_branch));
                    if let Some(branch) = else_branch.as_ref().filter(|b| !b.is_empty()) {
                        p.section("Else:", |p| p.statements(branch));
                    }
                });
            }
            Statement::While {
                condition, body, ..
            } => {
                self.line("WhileStmt");
                self.indented(|p| {
                    p.section("Condition:", |p| p.expression(condition));
                    p.section("Body:", |p| p.statements(body));
                });
            }
            Statement::Block { statements, .. } => {
                self.line("Block");
                self.indented(|p| p.statements(statements));
            }
        }
    }

    fn expression(&mut self, expression: &Expression) {
        match expression {
            Expression::NumberLiteral { value, .. } => self.line(format!("Number: {}", value)),
            Expression::StringLiteral { value, .. } => {
                self.line(format!("String: \"{}\"", value))
            }
            Expression::BoolLiteral { value, .. } => self.line(format!("Bool: {}", value)),
            Expression::Identifier { name, .. } => self.line(format!("Identifier: {}", name)),
            Expression::Binary {
                op, left, right, ..
            } => {
                self.line(format!("BinaryOp: {}", op));
                self.indented(|p| {
                    p.expression(left);
                    p.expression(right);
                });
            }
            Expression::Unary { op, operand, .. } => {
                self.line(format!("UnaryOp: {}", op));
                self.indented(|p| p.expression(operand));
            }
        }
    }

    fn section(&mut self, title: &str, body: impl FnOnce(&mut Self)) {
        self.line(title);
        self.indented(body);
    }

    fn indented(&mut self, body: impl FnOnce(&mut Self)) {
        self.indent += 1;
        body(self);
        self.indent -= 1;
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", "  ".repeat(self.indent), text.as_ref()));
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", AstPrinter::new().print(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check;

    #[test]
    fn test_declaration_and_assignment() {
        let program = check("int x = 5;\nx = x + 1;").unwrap();
        assert_eq!(
            program.to_string(),
            "Program\n\
             \x20\x20Declaration: int x (with init)\n\
             \x20\x20\x20\x20Number: 5\n\
             \x20\x20Assignment: x =\n\
             \x20\x20\x20\x20BinaryOp: +\n\
             \x20\x20\x20\x20\x20\x20Identifier: x\n\
             \x20\x20\x20\x20\x20\x20Number: 1"
        );
    }

    #[test]
    fn test_control_flow_layout() {
        let program =
            check("bool f; if not f then f = true; else f = false; end while f do end").unwrap();
        let expected = [
            "Program",
            "  Declaration: bool f",
            "  IfStmt",
            "    Condition:",
            "      UnaryOp: not",
            "        Identifier: f",
            "    Then:",
            "      Assignment: f =",
            "        Bool: true",
            "    Else:",
            "      Assignment: f =",
            "        Bool: false",
            "  WhileStmt",
            "    Condition:",
            "      Identifier: f",
            "    Body:",
        ];
        assert_eq!(AstPrinter::new().print(&program), expected.join("\n"));
    }

    #[test]
    fn test_empty_else_is_omitted() {
        let program = check("begin string s = \"hi\"; end if true then else end").unwrap();
        let expected = [
            "Program",
            "  Block",
            "    Declaration: string s (with init)",
            "      String: \"hi\"",
            "  IfStmt",
            "    Condition:",
            "      Bool: true",
            "    Then:",
        ];
        assert_eq!(program.to_string(), expected.join("\n"));
    }
}
