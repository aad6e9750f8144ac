use super::token::{Number, Token, TokenKind};
use crate::error::{Error, Result};

/// Scanner for Mini source text
pub struct MiniScanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Start index of current token
    start: usize,
    /// Line where current token starts
    start_line: usize,
    /// Column where current token starts
    start_column: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
}

impl MiniScanner {
    /// Creates a new scanner from source code
    pub fn new(source: &str) -> Self {
        MiniScanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            start_line: 1,
            start_column: 1,
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans all tokens from source code and returns them as a vector
    ///
    /// The returned sequence always ends with exactly one [`TokenKind::Eof`].
    /// Illegal characters, unterminated strings and out-of-range integers abort the scan.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>> {
        loop {
            self.skip_trivia();
            if self.is_at_end() {
                break;
            }
            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token()?;
        }

        self.tokens.push(Token::new(
            TokenKind::Eof,
            String::new(),
            self.line,
            self.column,
        ));

        tracing::debug!(count = self.tokens.len(), "scan finished");
        Ok(self.tokens)
    }

    /// Skips whitespace and `//` comments
    fn skip_trivia(&mut self) {
        while !self.is_at_end() {
            let c = self.peek();
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek_next() == '/' {
                while !self.is_at_end() && self.peek() != '\n' {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            ';' => self.add_token(TokenKind::Semicolon),
            ',' => self.add_token(TokenKind::Comma),

            // Arithmetic
            '+' => self.add_token(TokenKind::Plus),
            '-' => self.add_token(TokenKind::Minus),
            '*' => self.add_token(TokenKind::Star),
            '/' => self.add_token(TokenKind::Slash),

            // Comparison and assignment
            '=' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::Eq);
                } else {
                    self.add_token(TokenKind::Assign);
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::NotEq);
                } else {
                    self.add_token(TokenKind::Not);
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::LtEq);
                } else {
                    self.add_token(TokenKind::Lt);
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::GtEq);
                } else {
                    self.add_token(TokenKind::Gt);
                }
            }

            // Logical operators only exist doubled
            '&' if self.match_char('&') => self.add_token(TokenKind::And),
            '|' if self.match_char('|') => self.add_token(TokenKind::Or),

            '"' | '\'' => self.scan_string(c)?,

            c if c.is_ascii_digit() => self.scan_number()?,

            c if c.is_alphabetic() || c == '_' => self.scan_identifier_or_keyword(),

            _ => {
                return Err(Error::IllegalCharacter {
                    ch: c,
                    line: self.start_line,
                    column: self.start_column,
                });
            }
        }

        Ok(())
    }

    fn scan_string(&mut self, quote: char) -> Result<()> {
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != quote {
            let c = self.advance();
            if c != '\\' {
                value.push(c);
                continue;
            }
            if self.is_at_end() {
                break;
            }
            match self.advance() {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                // `\\`, the escaped delimiter and anything else stand for themselves
                other => value.push(other),
            }
        }

        if self.is_at_end() {
            return Err(Error::UnterminatedString {
                line: self.line,
                column: self.column,
                start_line: self.start_line,
                start_column: self.start_column,
            });
        }

        self.advance(); // Closing quote

        self.add_token(TokenKind::String(value));
        Ok(())
    }

    fn scan_number(&mut self) -> Result<()> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // A dot only belongs to the number when a digit follows it
        let mut is_float = false;
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = self.lexeme();
        let invalid = || Error::InvalidNumber {
            text: text.clone(),
            line: self.start_line,
            column: self.start_column,
        };

        let number = if is_float {
            Number::Float(text.parse().map_err(|_| invalid())?)
        } else {
            Number::Int(text.parse().map_err(|_| invalid())?)
        };

        self.add_token(TokenKind::Number(number));
        Ok(())
    }

    fn scan_identifier_or_keyword(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text = self.lexeme();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier(text));
        self.add_token(kind);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(
            kind,
            lexeme,
            self.start_line,
            self.start_column,
        ));
    }
}
