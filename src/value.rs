use std::cell::RefCell;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::env::Env;

/// A compound procedure: parameters, an unevaluated body, and the
/// environment it was created in.
#[derive(Debug)]
pub struct Lambda {
    pub params: Vec<Rc<str>>,
    pub body: Vec<Value>,
    pub env: Env,
}

pub type PrimitiveFn = dyn Fn(&[Value]) -> Result<Value, crate::error::ServalError>;

/// A built-in procedure, wrapped for uniform dispatch alongside `Compound`.
pub struct Primitive {
    pub name: &'static str,
    pub func: Rc<PrimitiveFn>,
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive").field("name", &self.name).finish()
    }
}

/// The single runtime value type for both Scheme data and Scheme code.
#[derive(Debug, Clone)]
pub enum Value {
    Number(i64),
    Boolean(bool),
    Character(Rc<str>),
    String(Rc<str>),
    Symbol(Rc<str>),
    EmptyList,
    Pair(Rc<RefCell<(Value, Value)>>),
    Primitive(Rc<Primitive>),
    Compound(Rc<Lambda>),
}

impl Value {
    pub fn symbol(name: impl AsRef<str>) -> Value {
        Value::Symbol(Rc::from(name.as_ref()))
    }

    pub fn string(s: impl AsRef<str>) -> Value {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn character(lexeme: impl AsRef<str>) -> Value {
        Value::Character(Rc::from(lexeme.as_ref()))
    }

    pub fn cons(head: Value, tail: Value) -> Value {
        Value::Pair(Rc::new(RefCell::new((head, tail))))
    }

    /// Every value is truthy except `#f`. This is the entire predicate.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false))
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Value::Pair(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::EmptyList)
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn as_symbol_name(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn car(&self) -> Option<Value> {
        match self {
            Value::Pair(cell) => Some(cell.borrow().0.clone()),
            _ => None,
        }
    }

    pub fn cdr(&self) -> Option<Value> {
        match self {
            Value::Pair(cell) => Some(cell.borrow().1.clone()),
            _ => None,
        }
    }

    /// True iff `self` is a tagged list whose head is the symbol `tag`.
    pub fn is_tagged_list(&self, tag: &str) -> bool {
        match self.car() {
            Some(Value::Symbol(s)) => &*s == tag,
            _ => false,
        }
    }

    /// Collect a proper list into a `Vec<Value>`. Returns `None` if the list
    /// is improper (does not terminate in `EmptyList`).
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        let mut out = Vec::new();
        let mut cur = self.clone();
        loop {
            match cur {
                Value::EmptyList => return Some(out),
                Value::Pair(cell) => {
                    let (head, tail) = cell.borrow().clone();
                    out.push(head);
                    cur = tail;
                }
                _ => return None,
            }
        }
    }

    /// Build a proper list from a slice of values.
    pub fn list(items: &[Value]) -> Value {
        items
            .iter()
            .rev()
            .fold(Value::EmptyList, |tail, head| Value::cons(head.clone(), tail))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::EmptyList, Value::EmptyList) => true,
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Primitive(a), Value::Primitive(b)) => Rc::ptr_eq(a, b),
            (Value::Compound(a), Value::Compound(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Identity-flavored equality matching Scheme's `eq?`: structural for atoms,
/// pointer-based for the heap-shared variants.
pub fn eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Pair(x), Value::Pair(y)) => Rc::ptr_eq(x, y),
        (Value::Compound(x), Value::Compound(y)) => Rc::ptr_eq(x, y),
        (Value::Primitive(x), Value::Primitive(y)) => Rc::ptr_eq(x, y),
        _ => a == b,
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(true) => write!(f, "#t"),
            Value::Boolean(false) => write!(f, "#f"),
            Value::Character(c) => write!(f, "#\\{c}"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::EmptyList => write!(f, "()"),
            Value::Primitive(p) => write!(f, "#<primitive {}>", p.name),
            Value::Compound(lambda) => {
                let params = lambda
                    .params
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                let body = lambda
                    .body
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                write!(f, "#<procedure ({params}) ({body}) <procedure-env>")
            }
            Value::Pair(_) => write_pair(self, f),
        }
    }
}

fn write_pair(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "(")?;
    let mut cur = value.clone();
    let mut first = true;
    loop {
        match cur {
            Value::Pair(cell) => {
                let (head, tail) = cell.borrow().clone();
                if !first {
                    write!(f, " ")?;
                }
                first = false;
                write!(f, "{head}")?;
                cur = tail;
            }
            Value::EmptyList => break,
            other => {
                write!(f, " . {other}")?;
                break;
            }
        }
    }
    write!(f, ")")
}
