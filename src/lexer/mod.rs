use std::{iter::Peekable, str::Chars};

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::error::LexError;

pub type LexResult<T> = Result<T, LexError>;

/// Maps a character-literal name (as written after `#\`) to its lexeme.
static CHAR_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("newline", "newline");
    m.insert("space", "space");
    m.insert("tab", "tab");
    m
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Number { value: i64, position: (usize, usize) },
    Boolean { value: bool, position: (usize, usize) },
    Character { value: String, position: (usize, usize) },
    String { value: String, position: (usize, usize) },
    Id { value: String, position: (usize, usize) },
    LParen { position: (usize, usize) },
    RParen { position: (usize, usize) },
    Quote { position: (usize, usize) },
    Dot { position: (usize, usize) },
}

impl Token {
    pub fn position(&self) -> (usize, usize) {
        match self {
            Token::Number { position, .. }
            | Token::Boolean { position, .. }
            | Token::Character { position, .. }
            | Token::String { position, .. }
            | Token::Id { position, .. }
            | Token::LParen { position }
            | Token::RParen { position }
            | Token::Quote { position }
            | Token::Dot { position } => *position,
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')' || c == '"' || c == ';' || c == '\''
}

/// Pulls tokens lazily from a `Peekable<Chars>`, tracking line/col as it goes.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    iterator: Peekable<Chars<'a>>,
    line: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            iterator: input.chars().peekable(),
            line: 1,
            col: 1,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.iterator.peek()
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.iterator.next();
        match next {
            Some('\n') => {
                self.line += 1;
                self.col = 1;
            }
            Some(_) => self.col += 1,
            None => {}
        }
        next
    }

    fn eat_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
            }
            if matches!(self.peek(), Some(';')) {
                while !matches!(self.peek(), Some('\n') | None) {
                    self.bump();
                }
                continue;
            }
            break;
        }
    }

    /// Consume and return every remaining token, or the first lex failure.
    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> LexResult<Option<Token>> {
        self.eat_whitespace_and_comments();

        let Some(&c) = self.peek() else {
            return Ok(None);
        };

        let position = (self.line, self.col);

        let token = match c {
            '(' => {
                self.bump();
                Token::LParen { position }
            }
            ')' => {
                self.bump();
                Token::RParen { position }
            }
            '\'' => {
                self.bump();
                Token::Quote { position }
            }
            '"' => self.lex_string(position)?,
            '#' => self.lex_hash(position)?,
            '0'..='9' => self.lex_number(position)?,
            '+' | '-' if self.starts_number() => self.lex_number(position)?,
            '.' if self.is_lone_dot() => {
                self.bump();
                Token::Dot { position }
            }
            _ => self.lex_id(position)?,
        };

        Ok(Some(token))
    }

    fn starts_number(&mut self) -> bool {
        let mut clone = self.iterator.clone();
        let sign = clone.next();
        matches!(sign, Some('+') | Some('-')) && matches!(clone.peek(), Some(d) if d.is_ascii_digit())
    }

    fn is_lone_dot(&mut self) -> bool {
        let mut clone = self.iterator.clone();
        clone.next();
        matches!(clone.peek(), None) || matches!(clone.peek(), Some(c) if is_delimiter(*c))
    }

    fn lex_number(&mut self, position: (usize, usize)) -> LexResult<Token> {
        let mut text = String::new();
        if matches!(self.peek(), Some('+') | Some('-')) {
            text.push(self.bump().unwrap());
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            text.push(self.bump().unwrap());
        }
        let value = text.parse::<i64>().map_err(|_| LexError {
            message: format!("failed to parse number '{text}'"),
            line: position.0,
            col: position.1,
        })?;
        Ok(Token::Number { value, position })
    }

    fn lex_hash(&mut self, position: (usize, usize)) -> LexResult<Token> {
        self.bump(); // '#'
        match self.peek() {
            Some('t') => {
                self.bump();
                Ok(Token::Boolean { value: true, position })
            }
            Some('f') => {
                self.bump();
                Ok(Token::Boolean { value: false, position })
            }
            Some('\\') => {
                self.bump();
                self.lex_character(position)
            }
            other => Err(LexError {
                message: format!("unexpected character after '#': {other:?}"),
                line: position.0,
                col: position.1,
            }),
        }
    }

    fn lex_character(&mut self, position: (usize, usize)) -> LexResult<Token> {
        let mut text = String::new();
        // A character literal is at least one character, then continues
        // while the run could still be a named literal like "newline".
        if let Some(c) = self.bump() {
            text.push(c);
        } else {
            return Err(LexError {
                message: "unterminated character literal".into(),
                line: position.0,
                col: position.1,
            });
        }
        while matches!(self.peek(), Some(c) if c.is_alphabetic()) {
            text.push(self.bump().unwrap());
        }
        if text.len() > 1 && !CHAR_NAMES.contains_key(text.as_str()) {
            return Err(LexError {
                message: format!("unknown character name '{text}'"),
                line: position.0,
                col: position.1,
            });
        }
        Ok(Token::Character { value: text, position })
    }

    fn lex_string(&mut self, position: (usize, usize)) -> LexResult<Token> {
        self.bump(); // opening quote
        let mut raw = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => {
                    raw.push('\\');
                    if let Some(escaped) = self.bump() {
                        raw.push(escaped);
                    }
                }
                Some(c) => raw.push(c),
                None => {
                    return Err(LexError {
                        message: "unterminated string literal".into(),
                        line: position.0,
                        col: position.1,
                    })
                }
            }
        }
        let value = unescape::unescape(&raw).unwrap_or(raw);
        Ok(Token::String { value, position })
    }

    fn lex_id(&mut self, position: (usize, usize)) -> LexResult<Token> {
        let mut text = String::new();
        while matches!(self.peek(), Some(&c) if !is_delimiter(c)) {
            text.push(self.bump().unwrap());
        }
        if text.is_empty() {
            let unexpected = self.peek().copied();
            return Err(LexError {
                message: format!("unexpected character: {unexpected:?}"),
                line: position.0,
                col: position.1,
            });
        }
        Ok(Token::Id { value: text, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new(input).lex().expect("lex should succeed")
    }

    #[test]
    fn lexes_number() {
        assert_eq!(
            lex("1337"),
            vec![Token::Number { value: 1337, position: (1, 1) }]
        );
    }

    #[test]
    fn lexes_negative_number() {
        assert_eq!(
            lex("-5"),
            vec![Token::Number { value: -5, position: (1, 1) }]
        );
    }

    #[test]
    fn minus_alone_is_an_id() {
        assert_eq!(
            lex("-"),
            vec![Token::Id { value: "-".into(), position: (1, 1) }]
        );
    }

    #[test]
    fn lexes_booleans() {
        assert_eq!(
            lex("#t #f"),
            vec![
                Token::Boolean { value: true, position: (1, 1) },
                Token::Boolean { value: false, position: (1, 4) },
            ]
        );
    }

    #[test]
    fn lexes_named_character() {
        assert_eq!(
            lex("#\\newline"),
            vec![Token::Character { value: "newline".into(), position: (1, 1) }]
        );
    }

    #[test]
    fn lexes_string_with_escape() {
        assert_eq!(
            lex("\"a\\nb\""),
            vec![Token::String { value: "a\nb".into(), position: (1, 1) }]
        );
    }

    #[test]
    fn lexes_list() {
        assert_eq!(
            lex("(+ 1 2)"),
            vec![
                Token::LParen { position: (1, 1) },
                Token::Id { value: "+".into(), position: (1, 2) },
                Token::Number { value: 1, position: (1, 4) },
                Token::Number { value: 2, position: (1, 6) },
                Token::RParen { position: (1, 7) },
            ]
        );
    }

    #[test]
    fn lexes_dotted_pair() {
        assert_eq!(
            lex("(a . b)"),
            vec![
                Token::LParen { position: (1, 1) },
                Token::Id { value: "a".into(), position: (1, 2) },
                Token::Dot { position: (1, 4) },
                Token::Id { value: "b".into(), position: (1, 6) },
                Token::RParen { position: (1, 7) },
            ]
        );
    }

    #[test]
    fn lexes_quote_abbreviation() {
        assert_eq!(
            lex("'(a b)"),
            vec![
                Token::Quote { position: (1, 1) },
                Token::LParen { position: (1, 2) },
                Token::Id { value: "a".into(), position: (1, 3) },
                Token::Id { value: "b".into(), position: (1, 5) },
                Token::RParen { position: (1, 6) },
            ]
        );
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            lex("; a comment\n42"),
            vec![Token::Number { value: 42, position: (2, 1) }]
        );
    }
}
