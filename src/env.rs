use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::EvalError;
use crate::value::Value;

#[derive(Debug)]
pub struct Frame {
    bindings: HashMap<Rc<str>, Value>,
    parent: Option<Env>,
}

/// A lexical environment frame, shared by every closure that captures it.
/// Mirrors the original Python `Environment`'s parent-chain model, reworked
/// as an `Rc<RefCell<Frame>>` so `define`/`set!` mutate shared state.
pub type Env = Rc<RefCell<Frame>>;

pub fn new_root() -> Env {
    Rc::new(RefCell::new(Frame {
        bindings: HashMap::new(),
        parent: None,
    }))
}

pub fn new_child(parent: &Env) -> Env {
    Rc::new(RefCell::new(Frame {
        bindings: HashMap::new(),
        parent: Some(Rc::clone(parent)),
    }))
}

pub fn define(env: &Env, name: impl Into<Rc<str>>, value: Value) {
    env.borrow_mut().bindings.insert(name.into(), value);
}

pub fn lookup(env: &Env, name: &str) -> Result<Value, EvalError> {
    let frame = env.borrow();
    if let Some(value) = frame.bindings.get(name) {
        return Ok(value.clone());
    }
    match &frame.parent {
        Some(parent) => lookup(parent, name),
        None => Err(EvalError::UnboundVariable(name.to_string())),
    }
}

pub fn set(env: &Env, name: &str, value: Value) -> Result<(), EvalError> {
    let mut frame = env.borrow_mut();
    if frame.bindings.contains_key(name) {
        frame.bindings.insert(Rc::from(name), value);
        return Ok(());
    }
    match &frame.parent {
        Some(parent) => {
            let parent = Rc::clone(parent);
            drop(frame);
            set(&parent, name, value)
        }
        None => Err(EvalError::UnboundVariable(name.to_string())),
    }
}

/// Build a fresh frame binding each parameter to the corresponding argument,
/// chained off `parent`. Arity must match exactly.
pub fn extend(params: &[Rc<str>], args: &[Value], parent: &Env) -> Result<Env, EvalError> {
    if params.len() != args.len() {
        return Err(EvalError::Arity {
            expected: params.len().to_string(),
            got: args.len(),
            context: "procedure call".to_string(),
        });
    }
    let frame = new_child(parent);
    for (name, value) in params.iter().zip(args.iter()) {
        define(&frame, Rc::clone(name), value.clone());
    }
    Ok(frame)
}
