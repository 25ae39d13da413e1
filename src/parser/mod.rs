use crate::error::ParseError;
use crate::lexer::Token;
use crate::value::Value;

/// A materialized token stream with a movable read cursor, giving at least
/// one token of lookahead.
#[derive(Debug, Clone)]
struct ParseState {
    tokens: Vec<Token>,
    index: usize,
}

impl From<Vec<Token>> for ParseState {
    fn from(tokens: Vec<Token>) -> Self {
        ParseState { tokens, index: 0 }
    }
}

impl ParseState {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let (line, col) = self
            .peek()
            .map(|t| t.position())
            .or_else(|| self.tokens.last().map(|t| t.position()))
            .unwrap_or((1, 1));
        ParseError { message: message.into(), line, col }
    }
}

/// Parse a full program: a top-level sequence of datums.
pub fn parse(source: &str) -> Result<Vec<Value>, crate::error::ServalError> {
    let tokens = crate::lexer::Lexer::new(source).lex()?;
    let mut state = ParseState::from(tokens);
    let mut datums = Vec::new();
    while state.peek().is_some() {
        datums.push(datum(&mut state)?);
    }
    Ok(datums)
}

fn datum(state: &mut ParseState) -> Result<Value, ParseError> {
    match state.peek() {
        Some(Token::LParen { .. }) => list(state),
        Some(Token::Quote { .. }) => {
            state.bump();
            let quoted = datum(state)?;
            Ok(Value::cons(
                Value::symbol("quote"),
                Value::cons(quoted, Value::EmptyList),
            ))
        }
        Some(_) => simple_datum(state),
        None => Err(state.error("unexpected end of input while reading a datum")),
    }
}

fn simple_datum(state: &mut ParseState) -> Result<Value, ParseError> {
    let token = state.bump().ok_or_else(|| state.error("expected a datum"))?;
    Ok(match token {
        Token::Number { value, .. } => Value::Number(value),
        Token::Boolean { value, .. } => Value::Boolean(value),
        Token::Character { value, .. } => Value::character(value),
        Token::String { value, .. } => Value::string(value),
        Token::Id { value, .. } => Value::symbol(value),
        Token::LParen { .. } | Token::Quote { .. } => unreachable!("handled by datum()"),
        Token::RParen { position } => {
            return Err(ParseError {
                message: "unexpected ')'".into(),
                line: position.0,
                col: position.1,
            })
        }
        Token::Dot { position } => {
            return Err(ParseError {
                message: "unexpected '.'".into(),
                line: position.0,
                col: position.1,
            })
        }
    })
}

/// Parses `'(' datum* ')'` and `'(' datum+ '.' datum ')'`, folding
/// right-to-left into cons cells. Mirrors the original Python parser's
/// dotted-index-tracked list construction.
fn list(state: &mut ParseState) -> Result<Value, ParseError> {
    state.bump(); // '('

    let mut items = Vec::new();
    let mut tail = Value::EmptyList;

    loop {
        match state.peek() {
            Some(Token::RParen { .. }) => {
                state.bump();
                break;
            }
            Some(Token::Dot { .. }) => {
                state.bump();
                if items.is_empty() {
                    return Err(state.error("'.' may not appear before any datum in a list"));
                }
                tail = datum(state)?;
                match state.bump() {
                    Some(Token::RParen { .. }) => break,
                    _ => return Err(state.error("expected ')' after dotted tail")),
                }
            }
            Some(_) => items.push(datum(state)?),
            None => return Err(state.error("unexpected end of input inside a list")),
        }
    }

    Ok(items
        .into_iter()
        .rev()
        .fold(tail, |acc, item| Value::cons(item, acc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(src: &str) -> Value {
        let mut datums = parse(src).expect("parse should succeed");
        assert_eq!(datums.len(), 1);
        datums.remove(0)
    }

    #[test]
    fn parses_number() {
        assert_eq!(parse_one("42"), Value::Number(42));
    }

    #[test]
    fn parses_empty_list() {
        assert_eq!(parse_one("()"), Value::EmptyList);
    }

    #[test]
    fn parses_proper_list() {
        let value = parse_one("(1 2 3)");
        assert_eq!(value.to_vec().unwrap(), vec![Value::Number(1), Value::Number(2), Value::Number(3)]);
    }

    #[test]
    fn parses_dotted_pair() {
        let value = parse_one("(1 . 2)");
        assert_eq!(value.car(), Some(Value::Number(1)));
        assert_eq!(value.cdr(), Some(Value::Number(2)));
    }

    #[test]
    fn parses_quote_abbreviation() {
        let value = parse_one("'a");
        assert!(value.is_tagged_list("quote"));
        assert_eq!(value.cdr().unwrap().car(), Some(Value::symbol("a")));
    }

    #[test]
    fn rejects_leading_dot() {
        assert!(parse("(. a)").is_err());
    }

    #[test]
    fn parses_multiple_top_level_datums() {
        let datums = parse("1 2 3").expect("parse should succeed");
        assert_eq!(datums, vec![Value::Number(1), Value::Number(2), Value::Number(3)]);
    }
}
