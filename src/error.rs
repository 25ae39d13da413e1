use std::error::Error;
use std::fmt::{self, Display};

/// Every fallible outcome in the interpreter, from a malformed character up
/// through a missing binding.
#[derive(Debug)]
pub enum ServalError {
    Lex(LexError),
    Parse(ParseError),
    Eval(EvalError),
    Io(String),
}

#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lex error at {}:{}: {}", self.line, self.col, self.message)
    }
}

#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}:{}: {}", self.line, self.col, self.message)
    }
}

#[derive(Debug)]
pub enum EvalError {
    UnboundVariable(String),
    Arity {
        expected: String,
        got: usize,
        context: String,
    },
    Type {
        expected: String,
        got: String,
    },
    Syntax(String),
}

impl Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundVariable(name) => write!(f, "unbound variable: {name}"),
            EvalError::Arity { expected, got, context } => write!(
                f,
                "wrong number of arguments to {context}: expected {expected}, got {got}"
            ),
            EvalError::Type { expected, got } => {
                write!(f, "type error: expected {expected}, got {got}")
            }
            EvalError::Syntax(message) => write!(f, "syntax error: {message}"),
        }
    }
}

impl Display for ServalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServalError::Lex(e) => write!(f, "{e}"),
            ServalError::Parse(e) => write!(f, "{e}"),
            ServalError::Eval(e) => write!(f, "{e}"),
            ServalError::Io(message) => write!(f, "io error: {message}"),
        }
    }
}

impl Error for ServalError {}

impl From<LexError> for ServalError {
    fn from(e: LexError) -> Self {
        ServalError::Lex(e)
    }
}

impl From<ParseError> for ServalError {
    fn from(e: ParseError) -> Self {
        ServalError::Parse(e)
    }
}

impl From<EvalError> for ServalError {
    fn from(e: EvalError) -> Self {
        ServalError::Eval(e)
    }
}

impl From<std::io::Error> for ServalError {
    fn from(e: std::io::Error) -> Self {
        ServalError::Io(e.to_string())
    }
}
