//! Property-based fuzzing tests for the Mini scanner and parser
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. The scanner never panics on arbitrary input
//! 2. The parser always terminates, even on token soup, and keeps the end-of-input invariant
//! 3. Repeated runs over the same text give identical results
//! 4. Generated valid programs parse without diagnostics

use minilang::parser::DEFAULT_MAX_NESTING;
use minilang::{Number, Parser, Scanner, Token, TokenKind, VarType};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Generate random strings that might break the scanner
fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x00-\x7F]{0,500}").unwrap()
}

/// Generate whitespace-separated Mini-looking fragments
fn mini_like_string() -> impl Strategy<Value = String> {
    prop::collection::vec(mini_token(), 0..60).prop_map(|tokens| tokens.join(" "))
}

/// Generate fragments that look like Mini tokens
fn mini_token() -> impl Strategy<Value = String> {
    prop_oneof![
        // Keywords
        Just("int".to_string()),
        Just("float".to_string()),
        Just("bool".to_string()),
        Just("string".to_string()),
        Just("if".to_string()),
        Just("then".to_string()),
        Just("else".to_string()),
        Just("end".to_string()),
        Just("while".to_string()),
        Just("do".to_string()),
        Just("begin".to_string()),
        Just("true".to_string()),
        Just("not".to_string()),
        Just("and".to_string()),
        Just("or".to_string()),
        // Operators and delimiters
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
        Just("<".to_string()),
        Just(">=".to_string()),
        Just("!".to_string()),
        Just("&&".to_string()),
        Just("||".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just(";".to_string()),
        Just(",".to_string()),
        // Literals
        (0i64..1000i64).prop_map(|n| n.to_string()),
        (0.0f64..100.0f64).prop_map(|f| format!("{:.2}", f)),
        r#""[a-zA-Z0-9 ]{0,20}""#.prop_map(|s| s),
        // Identifiers
        "[a-z][a-z0-9_]{0,6}".prop_map(|s| s),
        // Comments
        "//[^\n]{0,20}\n".prop_map(|s| s),
    ]
}

/// Generate raw token kinds, bypassing the scanner
fn token_kind() -> impl Strategy<Value = TokenKind> {
    prop_oneof![
        Just(TokenKind::Type(VarType::Int)),
        Just(TokenKind::Type(VarType::Bool)),
        Just(TokenKind::If),
        Just(TokenKind::Then),
        Just(TokenKind::Else),
        Just(TokenKind::End),
        Just(TokenKind::While),
        Just(TokenKind::Do),
        Just(TokenKind::Begin),
        Just(TokenKind::Assign),
        Just(TokenKind::Plus),
        Just(TokenKind::Minus),
        Just(TokenKind::Lt),
        Just(TokenKind::And),
        Just(TokenKind::Not),
        Just(TokenKind::LeftParen),
        Just(TokenKind::RightParen),
        Just(TokenKind::Semicolon),
        Just(TokenKind::Comma),
        Just(TokenKind::True),
        Just(TokenKind::Eof),
        (0i64..10).prop_map(|n| TokenKind::Number(Number::Int(n))),
        prop_oneof![Just("x"), Just("y")].prop_map(|s| TokenKind::Identifier(s.to_string())),
    ]
}

fn arith_expr() -> impl Strategy<Value = String> + Clone {
    let leaf = prop_oneof![
        (0i64..1000).prop_map(|n| n.to_string()),
        (0u32..100, 0u32..100).prop_map(|(a, b)| format!("{}.{}", a, b)),
        Just("v0".to_string()),
        Just("v1".to_string()),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop_oneof![Just("+"), Just("-"), Just("*"), Just("/")],
                inner.clone()
            )
                .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
            inner.clone().prop_map(|e| format!("({})", e)),
            inner.prop_map(|e| format!("-{}", e)),
        ]
    })
}

fn condition() -> impl Strategy<Value = String> {
    let comparison = (
        arith_expr(),
        prop_oneof![
            Just("=="),
            Just("!="),
            Just("<"),
            Just(">"),
            Just("<="),
            Just(">=")
        ],
        arith_expr(),
    )
        .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r));
    let joined = (
        comparison.clone(),
        prop_oneof![Just("and"), Just("or"), Just("&&"), Just("||")],
        comparison.clone(),
    )
        .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r));
    prop_oneof![
        comparison.clone(),
        comparison.prop_map(|c| format!("not {}", c)),
        joined,
        Just("true".to_string()),
    ]
}

fn statement() -> impl Strategy<Value = String> {
    let assignment = (prop_oneof![Just("v0"), Just("v1")], arith_expr())
        .prop_map(|(name, expr)| format!("{} = {};", name, expr));
    assignment.prop_recursive(3, 24, 3, |inner| {
        let body = prop::collection::vec(inner, 0..3).prop_map(|s| s.join("\n"));
        prop_oneof![
            (condition(), body.clone())
                .prop_map(|(c, b)| format!("while {} do\n{}\nend", c, b)),
            (condition(), body.clone(), body.clone())
                .prop_map(|(c, t, e)| format!("if {} then\n{}\nelse\n{}\nend", c, t, e)),
            (arith_expr(), body)
                .prop_map(|(e, b)| format!("begin\nint tmp = {};\n{}\nend", e, b)),
        ]
    })
}

/// Generate valid Mini programs
fn valid_mini_program() -> impl Strategy<Value = String> {
    prop::collection::vec(statement(), 0..6)
        .prop_map(|stmts| format!("int v0 = 1;\nfloat v1;\n{}", stmts.join("\n")))
}

fn eof_count(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| t.kind == TokenKind::Eof).count()
}

// =============================================================================
// SCANNER FUZZ TESTS
// =============================================================================

proptest! {
    /// The scanner should never panic on arbitrary input
    #[test]
    fn scanner_never_panics(source in arbitrary_source_string()) {
        // Should either succeed or return an error, never panic
        let _ = Scanner::new(&source).scan_tokens();
    }

    /// Any unicode input is either rejected or ends with exactly one end-of-input token
    #[test]
    fn scanner_eof_invariant(source in "\\PC{0,200}") {
        if let Ok(tokens) = Scanner::new(&source).scan_tokens() {
            prop_assert_eq!(eof_count(&tokens), 1);
            prop_assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
        }
    }

    /// Token start positions never go backwards
    #[test]
    fn scanner_positions_are_monotonic(source in mini_like_string()) {
        if let Ok(tokens) = Scanner::new(&source).scan_tokens() {
            for pair in tokens.windows(2) {
                prop_assert!(
                    (pair[0].line, pair[0].column) <= (pair[1].line, pair[1].column),
                    "{:?} then {:?}", pair[0], pair[1]
                );
            }
        }
    }
}

// =============================================================================
// PARSER FUZZ TESTS
// =============================================================================

proptest! {
    /// The parser terminates on scanned token soup
    #[test]
    fn parser_terminates_on_mini_like(source in mini_like_string()) {
        if let Ok(tokens) = Scanner::new(&source).scan_tokens() {
            let _ = Parser::new(tokens).parse();
        }
    }

    /// The parser terminates on arbitrary token sequences, including stray end markers
    #[test]
    fn parser_terminates_on_raw_tokens(kinds in prop::collection::vec(token_kind(), 0..80)) {
        let tokens: Vec<Token> = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Token::new(kind, String::new(), 1, i + 1))
            .collect();
        let _ = Parser::new(tokens).parse();
    }

    /// Parser handles deep nesting past the limit without overflowing the stack
    #[test]
    fn parser_handles_deep_nesting(depth in 1usize..300) {
        let sources = [
            format!("int x = {}1{};", "(".repeat(depth), ")".repeat(depth)),
            format!("{}{}", "begin ".repeat(depth), "end ".repeat(depth)),
        ];

        for source in sources {
            let tokens = Scanner::new(&source).scan_tokens().unwrap();
            let output = Parser::new(tokens).parse();
            prop_assert_eq!(output.is_success(), depth <= DEFAULT_MAX_NESTING);
        }
    }

    /// Prefix operator chains of any length parse cleanly
    #[test]
    fn parser_handles_long_prefix_chains(depth in 1usize..2000) {
        let source = format!("bool b = {}(1 < {}2);", "not ".repeat(depth), "-".repeat(depth));
        let tokens = Scanner::new(&source).scan_tokens().unwrap();
        let output = Parser::new(tokens).parse();
        prop_assert!(output.is_success(), "{:?}", output.diagnostics);
    }

    /// Parser handles unbalanced parentheses without panic
    #[test]
    fn parser_handles_unbalanced_parens(opens in 0usize..50, closes in 0usize..50) {
        let source = format!("int x = {}1{};", "(".repeat(opens), ")".repeat(closes));
        let tokens = Scanner::new(&source).scan_tokens().unwrap();
        let output = Parser::new(tokens).parse();
        prop_assert_eq!(output.is_success(), opens == closes);
    }

    /// Same text, same tokens, same tree, same diagnostics
    #[test]
    fn parsing_is_idempotent(source in mini_like_string()) {
        let first = Scanner::new(&source).scan_tokens();
        let second = Scanner::new(&source).scan_tokens();
        prop_assert_eq!(&first, &second);

        if let (Ok(a), Ok(b)) = (first, second) {
            prop_assert_eq!(Parser::new(a).parse(), Parser::new(b).parse());
        }
    }

    /// Generated valid programs parse cleanly
    #[test]
    fn valid_programs_have_no_diagnostics(source in valid_mini_program()) {
        let tokens = Scanner::new(&source).scan_tokens().unwrap();
        let output = Parser::new(tokens).parse();
        prop_assert!(output.is_success(), "{}\n{:?}", source, output.diagnostics);
    }
}
