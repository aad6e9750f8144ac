/// End-to-end tests for the Mini front end
/// Demonstrates: Scanner → Parser (+ scope checks) → tree and diagnostics
use minilang::{
    check, parse, tokenize, BinaryOp, DiagnosticKind, Error, Expression, Number, Parser,
    Program, Scanner, Statement, TokenKind, VarType,
};

fn init_of(program: &Program, index: usize) -> &Expression {
    match &program.statements[index] {
        Statement::Declaration {
            init: Some(init), ..
        } => init,
        other => panic!("Expected declaration with initializer, got {:?}", other),
    }
}

#[test]
fn test_e2e_token_kinds_and_columns() {
    let tokens = tokenize("int x = 5;").unwrap();

    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Type(VarType::Int),
            TokenKind::Identifier("x".to_string()),
            TokenKind::Assign,
            TokenKind::Number(Number::Int(5)),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );

    assert!(tokens.iter().all(|t| t.line == 1));
    assert!(tokens.windows(2).all(|w| w[0].column <= w[1].column));
}

#[test]
fn test_e2e_valid_program() {
    let source = r#"
        // running sum
        int total = 0;
        int i = 1;
        while i <= 10 do
            total = total + i;
            i = i + 1;
        end
        if total > 50 then
            string msg = "big";
        else
            string msg = 'small';
        end
    "#;

    let tokens = Scanner::new(source).scan_tokens().unwrap();
    let output = Parser::new(tokens).parse();

    assert!(output.is_success(), "{:?}", output.diagnostics);
    assert_eq!(output.program.statements.len(), 4);
}

#[test]
fn test_e2e_precedence_trees() {
    let program = check("int r = 1 + 2 * 3;").unwrap();
    match init_of(&program, 0) {
        Expression::Binary {
            op: BinaryOp::Add,
            left,
            right,
            ..
        } => {
            assert!(matches!(
                **left,
                Expression::NumberLiteral {
                    value: Number::Int(1),
                    ..
                }
            ));
            assert!(matches!(
                **right,
                Expression::Binary {
                    op: BinaryOp::Mul,
                    ..
                }
            ));
        }
        other => panic!("Expected addition at the root, got {:?}", other),
    }

    let program = check("bool a; bool b; bool c; bool r = a or b and c;").unwrap();
    assert_eq!(init_of(&program, 3).to_string(), "(or a (and b c))");
}

#[test]
fn test_e2e_duplicate_declaration_recovers() {
    let output = parse(tokenize("begin int x; int x; end int y = 1;").unwrap());

    assert!(!output.is_success());
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.message.contains("duplicate declaration")));
    // Parsing continued after the block
    assert_eq!(output.program.statements.len(), 2);
}

#[test]
fn test_e2e_undeclared_and_shadowing() {
    let output = parse(tokenize("x = 1;").unwrap());
    assert_eq!(output.diagnostics.len(), 1);
    assert!(output.diagnostics[0].message.contains("undeclared"));
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::Semantic);

    assert!(check("int x; begin int x; x = 1; end").is_ok());
}

#[test]
fn test_e2e_chained_comparison() {
    let output = parse(tokenize("int a; int b; int c; bool r = a < b < c;").unwrap());
    assert!(!output.is_success());
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::Syntax);
}

#[test]
fn test_e2e_multiple_missing_semicolons() {
    let source = "int a = 1\nint b = 2;\nint c = 3\nint d = 4;";
    let output = parse(tokenize(source).unwrap());
    assert!(output.diagnostics.len() >= 2);

    let err = check(source).unwrap_err();
    assert!(matches!(err, Error::ParseFailed { .. }));
    assert!(err.to_string().starts_with("Parse failed"));
}

#[test]
fn test_e2e_unterminated_string_is_fatal() {
    let err = tokenize("string s = \"abc").unwrap_err();
    assert!(err.is_lexical());
    assert!(matches!(err, Error::UnterminatedString { .. }));

    let err = check("int x = 1; string s = 'abc").unwrap_err();
    assert!(err.is_lexical());
}

#[test]
fn test_e2e_illegal_character_position() {
    let err = tokenize("int x = 5;\nint y = 5 # 1;").unwrap_err();
    assert_eq!(
        err,
        Error::IllegalCharacter {
            ch: '#',
            line: 2,
            column: 11
        }
    );
}

#[test]
fn test_e2e_idempotence() {
    let source = "int x = 1\nbegin y = x; int x; x = (1 + ; end\nwhile x do x = x - 1; end";

    let first = parse(tokenize(source).unwrap());
    let second = parse(tokenize(source).unwrap());

    assert_eq!(first, second);
    assert!(!first.diagnostics.is_empty());
}

#[test]
fn test_e2e_case_insensitive_keywords_and_aliases() {
    let program = check("INT Count = 1; BOOL ok = count == 1 || TRUE;");
    // Identifiers keep their case, so `count` is undeclared
    assert!(program.is_err());

    let program = check("Int Count = 1; Bool ok = Count == 1 Or True;").unwrap();
    let alias = check("int Count = 1; bool ok = Count == 1 || true;").unwrap();
    assert_eq!(init_of(&program, 1).to_string(), init_of(&alias, 1).to_string());
}

#[test]
fn test_e2e_best_effort_tree_on_failure() {
    let output = parse(tokenize("int x = 1; y = 2; int z = x;").unwrap());
    assert_eq!(output.diagnostics.len(), 1);
    // Good statements on both sides of the error are still in the tree
    assert_eq!(output.program.statements.len(), 2);
}
