use super::token::{Token, TokenKind};
use crate::error::{Error, Result, Span};

/// Tokenizes a single line of source text. The language is line-oriented:
/// one statement per line, so the scanner never tracks newlines internally.
pub struct Scanner {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
}

impl Scanner {
    /// Creates a scanner over `source`, attributing every token to `line`.
    pub fn new(source: &str, line: usize) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line,
        }
    }

    /// Scans the whole line into a token stream terminated by `Eof`.
    pub fn scan_tokens(mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }
        self.tokens
            .push(Token::new(TokenKind::Eof, String::new(), self.point()));
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();
        match c {
            ' ' | '\t' | '\r' | '\n' => {}
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '+' => self.add_token(TokenKind::Plus),
            '*' => self.add_token(TokenKind::Star),
            '/' => self.add_token(TokenKind::Slash),
            '^' => self.add_token(TokenKind::Caret),
            '=' => self.add_token(TokenKind::Equals),
            '-' => {
                if self.match_char('>') {
                    self.add_token(TokenKind::Arrow);
                } else {
                    self.add_token(TokenKind::Minus);
                }
            }
            '"' => self.scan_string()?,
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            other => {
                return Err(Error::Syntax {
                    span: self.point(),
                    message: format!("unexpected character '{}'", other),
                })
            }
        }
        Ok(())
    }

    fn scan_string(&mut self) -> Result<()> {
        let mut value = String::new();
        while self.peek() != '"' {
            if self.is_at_end() {
                return Err(Error::Syntax {
                    span: self.point(),
                    message: "unterminated string literal".to_string(),
                });
            }
            let c = self.advance();
            if c == '\\' && !self.is_at_end() {
                match self.advance() {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    '"' => value.push('"'),
                    '\\' => value.push('\\'),
                    other => value.push(other),
                }
            } else {
                value.push(c);
            }
        }
        self.advance(); // closing quote
        self.add_token(TokenKind::StringLit(value));
        Ok(())
    }

    fn scan_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        let mut is_float = false;
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_float = true;
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        let text: String = self.source[self.start..self.current].iter().collect();
        if is_float {
            self.add_token(TokenKind::Float(text.parse().unwrap_or(0.0)));
        } else {
            self.add_token(TokenKind::Integer(text.parse().unwrap_or(0)));
        }
    }

    fn scan_identifier(&mut self) {
        while is_identifier_continue(self.peek()) {
            self.advance();
        }
        let text: String = self.source[self.start..self.current].iter().collect();
        let kind = match text.as_str() {
            "var" => TokenKind::Var,
            "out" => TokenKind::Out,
            "print" => TokenKind::Print,
            "map" => TokenKind::Map,
            "reduce" => TokenKind::Reduce,
            _ => TokenKind::Identifier(text.clone()),
        };
        self.add_token(kind);
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme: String = self.source[self.start..self.current].iter().collect();
        self.tokens
            .push(Token::new(kind, lexeme, Span::point(self.line, self.start)));
    }

    fn point(&self) -> Span {
        Span::point(self.line, self.current)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        *self.source.get(self.current).unwrap_or(&'\0')
    }

    fn peek_next(&self) -> char {
        *self.source.get(self.current + 1).unwrap_or(&'\0')
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.current += 1;
            true
        } else {
            false
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
