//! Lexical analyzer

use crate::diag::{Diagnostics, Position};
use crate::token::{Literal, Token, TokenKind};

/// Turn source text into a sequence of tokens.
///
/// Scanning never fails as a whole: lexical errors are reported to the
/// diagnostics accumulator and the scan continues past the offending
/// character, so one pass can surface several errors.
pub struct Scanner<'d> {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: Position,
    diags: &'d mut Diagnostics,
}

impl<'d> Scanner<'d> {
    /// Creates a new scanner operating on `source`.
    pub fn new(source: &str, diags: &'d mut Diagnostics) -> Scanner<'d> {
        Scanner {
            source: source.chars().collect(),
            tokens: vec![],
            start: 0,
            current: 0,
            line: 1,
            diags,
        }
    }

    /// Scan the whole input, always ending with an `Eof` token.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, String::new(), None, self.line));
        self.tokens
    }

    fn scan_token(&mut self) {
        let ch = self.advance();
        match ch {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftCurly),
            '}' => self.add_token(TokenKind::RightCurly),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '!' => {
                let kind = if self.matches('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.matches('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }
            '/' => {
                if self.matches('/') {
                    self.skip_comment();
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            ' ' | '\t' | '\r' => (),
            '\n' => self.line += 1,
            '"' => self.scan_string(),
            '0'..='9' => self.scan_number(),
            ch if ch.is_ascii_alphabetic() || ch == '_' => self.scan_identifier(),
            _ => self.diags.report(self.line, "Unexpected character."),
        }
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn scan_string(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '"' {
                break;
            }
            if ch == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.diags.report(self.line, "Unterminated string.");
            return;
        }

        // The closing quote.
        self.advance();

        // The stored value excludes the delimiting quotes.
        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        self.add_literal_token(TokenKind::String, Literal::Str(value));
    }

    fn scan_number(&mut self) {
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }

        // A fractional part requires a digit after the dot; a trailing dot is
        // left for the next token.
        if self.peek() == Some('.') && matches!(self.peek_next(), Some('0'..='9')) {
            self.advance();
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }

        match self.lexeme().parse::<f64>() {
            Ok(n) => self.add_literal_token(TokenKind::Number, Literal::Number(n)),
            Err(_) => self.diags.report(self.line, "Invalid number literal."),
        }
    }

    fn scan_identifier(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_alphanumeric() && ch != '_' {
                break;
            }
            self.advance();
        }

        let kind = keyword(&self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.tokens
            .push(Token::new(kind, self.lexeme(), None, self.line));
    }

    fn add_literal_token(&mut self, kind: TokenKind, literal: Literal) {
        self.tokens
            .push(Token::new(kind, self.lexeme(), Some(literal), self.line));
    }

    fn advance(&mut self) -> char {
        let ch = self.source[self.current];
        self.current += 1;
        ch
    }

    /// Consume the next character only if it equals `expected`.
    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.current + 1).copied()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

const KEYWORDS: [(&str, TokenKind); 16] = [
    ("and", TokenKind::And),
    ("class", TokenKind::Class),
    ("else", TokenKind::Else),
    ("false", TokenKind::False),
    ("for", TokenKind::For),
    ("fun", TokenKind::Fun),
    ("if", TokenKind::If),
    ("nil", TokenKind::Nil),
    ("or", TokenKind::Or),
    ("print", TokenKind::Print),
    ("return", TokenKind::Return),
    ("super", TokenKind::Super),
    ("this", TokenKind::This),
    ("true", TokenKind::True),
    ("var", TokenKind::Var),
    ("while", TokenKind::While),
];

fn keyword(name: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == name)
        .map(|(_, kind)| *kind)
}
