use std::io;
use std::num::ParseFloatError;
use thiserror::Error;

pub use stream::{ScanEvent, TokenStream};
pub use tokens::{Token, TokenType, Value};

pub mod stream;
pub mod tokens;

/// Problems with the source text itself. The scanner reports these and keeps going.
#[derive(Error, Debug)]
pub enum LexicalError {
    #[error("Unexpected character: {0:?}")]
    UnexpectedCharacter(char),
    #[error("string error: unterminated string")]
    UnterminatedString,
    #[error("number error: {0}")]
    InvalidNumber(#[from] ParseFloatError),
}

#[derive(Debug)]
pub enum ScanError {
    /// Recoverable, tagged with the 0-based line it was found on.
    Lexical { line: usize, error: LexicalError },
    /// The source could not be read at all. Nothing follows this on a stream.
    Read(io::Error),
}

impl ScanError {
    pub fn line(&self) -> Option<usize> {
        match self {
            ScanError::Lexical { line, .. } => Some(*line),
            ScanError::Read(_) => None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ScanError::Read(_))
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::Lexical { error, .. } => Some(error),
            ScanError::Read(e) => Some(e),
        }
    }
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // lines are reported 1-based
            ScanError::Lexical { line, error } => write!(f, "line: {}, error: {}", line + 1, error),
            ScanError::Read(e) => write!(f, "error: could not read source: {}", e),
        }
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

/// Lazily turns source text into tokens and errors, in source order, ending with a single `Eof`.
pub struct Scanner<'s> {
    source: &'s str,
    // first byte of the current lexeme
    start: usize,
    // next unread byte
    current: usize,
    // 0-based
    line: usize,
    finished: bool,
}

impl<'s> Scanner<'s> {
    pub fn new(source: &'s str) -> Self {
        Scanner {
            source,
            start: 0,
            current: 0,
            line: 0,
            finished: false,
        }
    }

    /// Scan everything up front, splitting tokens from errors.
    pub fn scan_tokens(self) -> (Vec<Token>, Vec<ScanError>) {
        let mut tokens = vec![];
        let mut errors = vec![];
        for event in self {
            match event {
                Ok(token) => tokens.push(token),
                Err(e) => errors.push(e),
            }
        }
        (tokens, errors)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        match self.source[self.current..].chars().next() {
            Some(c) => {
                self.current += c.len_utf8();
                c
            }
            None => '\0',
        }
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source[self.current..].chars().nth(1).unwrap_or('\0')
    }

    /// consume the next character only if it is `target`
    fn match_next(&mut self, target: char) -> bool {
        if self.is_at_end() || self.peek() != target {
            return false;
        }
        self.current += target.len_utf8();
        true
    }

    fn lexeme(&self) -> &'s str {
        &self.source[self.start..self.current]
    }

    fn token(&self, token_type: TokenType, literal: Option<Value>) -> Option<ScanEvent> {
        Some(Ok(Token::new(
            token_type,
            self.lexeme().to_owned(),
            literal,
            self.line,
        )))
    }

    fn error(&self, error: LexicalError) -> Option<ScanEvent> {
        Some(Err(ScanError::Lexical {
            line: self.line,
            error,
        }))
    }

    /// Consume one lexeme. Whitespace, newlines and comments produce nothing.
    fn scan_token(&mut self) -> Option<ScanEvent> {
        let c = self.advance();
        match c {
            // single-character tokens
            '(' => self.token(TokenType::LeftParen, None),
            ')' => self.token(TokenType::RightParen, None),
            '{' => self.token(TokenType::LeftBrace, None),
            '}' => self.token(TokenType::RightBrace, None),
            ',' => self.token(TokenType::Comma, None),
            '.' => self.token(TokenType::Dot, None),
            '-' => self.token(TokenType::Minus, None),
            '+' => self.token(TokenType::Plus, None),
            ';' => self.token(TokenType::Semicolon, None),
            '*' => self.token(TokenType::Star, None),

            // one-or-two character tokens
            '!' => {
                let token_type = if self.match_next('=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.token(token_type, None)
            }
            '=' => {
                let token_type = if self.match_next('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.token(token_type, None)
            }
            '<' => {
                let token_type = if self.match_next('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.token(token_type, None)
            }
            '>' => {
                let token_type = if self.match_next('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.token(token_type, None)
            }

            '/' => {
                // double slash comments out the rest of the line
                if self.match_next('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                    None
                } else {
                    self.token(TokenType::Slash, None)
                }
            }

            '\n' => {
                self.line += 1;
                None
            }
            '\r' | ' ' | '\t' => None,

            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),

            c => self.error(LexicalError::UnexpectedCharacter(c)),
        }
    }

    fn string(&mut self) -> Option<ScanEvent> {
        // strings may span lines
        while self.peek() != '"' && !self.is_at_end() {
            if self.advance() == '\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            return self.error(LexicalError::UnterminatedString);
        }

        // closing quote
        self.advance();
        let value = &self.source[self.start + 1..self.current - 1];
        self.token(TokenType::String, Some(Value::String(value.to_owned())))
    }

    fn number(&mut self) -> Option<ScanEvent> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // a dot only belongs to the number when a digit follows it
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        match self.lexeme().parse::<f64>() {
            Ok(val) => self.token(TokenType::Number, Some(Value::Number(val))),
            Err(e) => self.error(e.into()),
        }
    }

    fn identifier(&mut self) -> Option<ScanEvent> {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }

        let token_type = tokens::keyword(self.lexeme()).unwrap_or(TokenType::Identifier);
        self.token(token_type, None)
    }
}

impl Iterator for Scanner<'_> {
    type Item = ScanEvent;

    fn next(&mut self) -> Option<ScanEvent> {
        if self.finished {
            return None;
        }

        while !self.is_at_end() {
            self.start = self.current;
            if let Some(event) = self.scan_token() {
                return Some(event);
            }
        }

        self.finished = true;
        self.start = self.current;
        Some(Ok(Token::new(TokenType::Eof, String::new(), None, self.line)))
    }
}

impl std::iter::FusedIterator for Scanner<'_> {}
