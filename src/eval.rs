use std::rc::Rc;

use crate::env::{self, Env};
use crate::error::{EvalError, ServalError};
use crate::value::{Lambda, Value};

/// Evaluate a single expression in `env`.
pub fn eval(expr: &Value, env: &Env) -> Result<Value, ServalError> {
    match expr {
        Value::Number(_) | Value::Boolean(_) | Value::Character(_) | Value::String(_) => {
            Ok(expr.clone())
        }
        Value::Symbol(name) => Ok(env::lookup(env, name)?),
        Value::Pair(_) if expr.is_tagged_list("quote") => eval_quote(expr),
        Value::Pair(_) if expr.is_tagged_list("define") => eval_definition(expr, env),
        Value::Pair(_) if expr.is_tagged_list("begin") => {
            eval_sequence(&operands(expr)?, env)
        }
        Value::Pair(_) if expr.is_tagged_list("let") => eval_let(expr, env),
        Value::Pair(_) if expr.is_tagged_list("set!") => eval_assignment(expr, env),
        Value::Pair(_) if expr.is_tagged_list("if") => eval_if(expr, env),
        Value::Pair(_) if expr.is_tagged_list("cond") => eval(&cond_to_if(expr)?, env),
        Value::Pair(_) if expr.is_tagged_list("and") => eval_and(&operands(expr)?, env),
        Value::Pair(_) if expr.is_tagged_list("or") => eval_or(&operands(expr)?, env),
        Value::Pair(_) if expr.is_tagged_list("lambda") => eval_lambda(expr, env),
        Value::Pair(_) => eval_application(expr, env),
        Value::EmptyList => Err(EvalError::Syntax("cannot evaluate the empty list".into()).into()),
        Value::Primitive(_) | Value::Compound(_) => Ok(expr.clone()),
    }
}

/// Apply a procedure value to already-evaluated arguments.
pub fn apply(proc: &Value, args: &[Value]) -> Result<Value, ServalError> {
    match proc {
        Value::Primitive(p) => (p.func)(args),
        Value::Compound(lambda) => {
            let frame = env::extend(&lambda.params, args, &lambda.env)?;
            eval_sequence(&lambda.body, &frame)
        }
        other => Err(EvalError::Type {
            expected: "procedure".into(),
            got: other.to_string(),
        }
        .into()),
    }
}

/// `expr`'s `car`, or a syntax error naming what was expected there.
fn car_of(expr: &Value, what: &str) -> Result<Value, EvalError> {
    expr.car()
        .ok_or_else(|| EvalError::Syntax(format!("expected {what}")))
}

/// `expr`'s `cdr`, or a syntax error naming what was expected there.
fn cdr_of(expr: &Value, what: &str) -> Result<Value, EvalError> {
    expr.cdr()
        .ok_or_else(|| EvalError::Syntax(format!("expected {what}")))
}

/// The arguments of a tagged-list special form, as a Rust vector.
fn operands(expr: &Value) -> Result<Vec<Value>, ServalError> {
    expr.cdr()
        .and_then(|rest| rest.to_vec())
        .ok_or_else(|| EvalError::Syntax("malformed special form".into()).into())
}

fn eval_sequence(exprs: &[Value], env: &Env) -> Result<Value, ServalError> {
    let Some((last, init)) = exprs.split_last() else {
        return Err(EvalError::Syntax("empty expression sequence".into()).into());
    };
    for expr in init {
        eval(expr, env)?;
    }
    eval(last, env)
}

fn eval_quote(expr: &Value) -> Result<Value, ServalError> {
    let rest = cdr_of(expr, "a quoted datum after 'quote'")?;
    Ok(car_of(&rest, "a quoted datum after 'quote'")?)
}

fn eval_definition(expr: &Value, env: &Env) -> Result<Value, ServalError> {
    let args = cdr_of(expr, "a target after 'define'")?;
    let target = car_of(&args, "a target after 'define'")?;
    let rest = cdr_of(&args, "a value or body after the define target")?;

    if target.is_symbol() {
        let name = target.as_symbol_name().unwrap().to_string();
        let value_expr = rest.car().unwrap_or(Value::EmptyList);
        let value = eval(&value_expr, env)?;
        env::define(env, name, value);
    } else if target.is_pair() {
        // (define (f params...) body...) => (define f (lambda (params...) body...))
        let name = target
            .car()
            .and_then(|v| v.as_symbol_name().map(str::to_string))
            .ok_or_else(|| EvalError::Syntax("define target must name a procedure".into()))?;
        let params = cdr_of(&target, "a parameter list in the define target")?;
        let body = rest.to_vec().ok_or_else(|| EvalError::Syntax("malformed define body".into()))?;
        let lambda = make_lambda(&params, body, env)?;
        env::define(env, name, lambda);
    } else {
        return Err(EvalError::Syntax("define target must be a symbol or procedure head".into()).into());
    }

    Ok(Value::symbol("ok"))
}

fn eval_assignment(expr: &Value, env: &Env) -> Result<Value, ServalError> {
    let args = cdr_of(expr, "a target and value after 'set!'")?;
    let name = args
        .car()
        .and_then(|v| v.as_symbol_name().map(str::to_string))
        .ok_or_else(|| EvalError::Syntax("set! target must be a symbol".into()))?;
    let rest = cdr_of(&args, "a value after the set! target")?;
    let value_expr = car_of(&rest, "a value after the set! target")?;
    let value = eval(&value_expr, env)?;
    env::set(env, &name, value)?;
    Ok(Value::symbol("ok"))
}

fn eval_if(expr: &Value, env: &Env) -> Result<Value, ServalError> {
    let rest = cdr_of(expr, "a predicate after 'if'")?;
    let predicate = car_of(&rest, "a predicate after 'if'")?;
    let after_predicate = cdr_of(&rest, "a consequent after the if predicate")?;
    let consequent = car_of(&after_predicate, "a consequent after the if predicate")?;
    let alternative = after_predicate.cdr().and_then(|v| v.car());

    if eval(&predicate, env)?.is_truthy() {
        eval(&consequent, env)
    } else {
        match alternative {
            Some(alt) => eval(&alt, env),
            None => Ok(Value::Boolean(false)),
        }
    }
}

fn eval_and(exprs: &[Value], env: &Env) -> Result<Value, ServalError> {
    if exprs.is_empty() {
        return Ok(Value::Boolean(true));
    }
    let (last, init) = exprs.split_last().unwrap();
    for expr in init {
        let value = eval(expr, env)?;
        if !value.is_truthy() {
            return Ok(value);
        }
    }
    eval(last, env)
}

fn eval_or(exprs: &[Value], env: &Env) -> Result<Value, ServalError> {
    if exprs.is_empty() {
        return Ok(Value::Boolean(false));
    }
    let (last, init) = exprs.split_last().unwrap();
    for expr in init {
        let value = eval(expr, env)?;
        if value.is_truthy() {
            return Ok(value);
        }
    }
    eval(last, env)
}

fn eval_let(expr: &Value, env: &Env) -> Result<Value, ServalError> {
    let rest = cdr_of(expr, "bindings after 'let'")?;
    let bindings = rest
        .car()
        .and_then(|v| v.to_vec())
        .ok_or_else(|| EvalError::Syntax("let bindings must be a list".into()))?;
    let body_list = cdr_of(&rest, "a body after the let bindings")?;
    let body = body_list.to_vec().ok_or_else(|| EvalError::Syntax("malformed let body".into()))?;

    let mut names = Vec::new();
    let mut values = Vec::new();
    for binding in bindings {
        let name = binding
            .car()
            .and_then(|v| v.as_symbol_name().map(str::to_string))
            .ok_or_else(|| EvalError::Syntax("let binding must start with a symbol".into()))?;
        let binding_rest = cdr_of(&binding, "a value expression in a let binding")?;
        let value_expr = car_of(&binding_rest, "a value expression in a let binding")?;
        names.push(Value::symbol(name));
        values.push(value_expr);
    }

    // Rewrite as ((lambda (names...) body...) values...)
    let lambda = make_lambda(&Value::list(&names), body, env)?;
    let application = Value::cons(lambda, Value::list(&values));
    eval_application(&application, env)
}

fn eval_lambda(expr: &Value, env: &Env) -> Result<Value, ServalError> {
    let rest = cdr_of(expr, "a parameter list after 'lambda'")?;
    let params = car_of(&rest, "a parameter list after 'lambda'")?;
    let body_list = cdr_of(&rest, "a body after the lambda parameters")?;
    let body = body_list.to_vec().ok_or_else(|| EvalError::Syntax("malformed lambda body".into()))?;
    make_lambda(&params, body, env)
}

fn make_lambda(params: &Value, body: Vec<Value>, env: &Env) -> Result<Value, ServalError> {
    let params = params
        .to_vec()
        .ok_or_else(|| EvalError::Syntax("lambda parameters must be a list".into()))?
        .into_iter()
        .map(|p| {
            p.as_symbol_name()
                .map(Rc::from)
                .ok_or_else(|| EvalError::Syntax("lambda parameters must be symbols".into()).into())
        })
        .collect::<Result<Vec<Rc<str>>, ServalError>>()?;
    if body.is_empty() {
        return Err(EvalError::Syntax("lambda body must not be empty".into()).into());
    }
    Ok(Value::Compound(Rc::new(Lambda { params, body, env: Rc::clone(env) })))
}

fn eval_application(expr: &Value, env: &Env) -> Result<Value, ServalError> {
    let operator_expr = car_of(expr, "an operator")?;
    let operator = eval(&operator_expr, env)?;
    let operand_list = cdr_of(expr, "an operand list")?;
    let operand_exprs = operand_list.to_vec().ok_or_else(|| EvalError::Syntax("malformed application".into()))?;
    let args = operand_exprs
        .iter()
        .map(|e| eval(e, env))
        .collect::<Result<Vec<_>, _>>()?;
    apply(&operator, &args)
}

/// Rewrite `(cond (p e...)... (else e...)?)` into nested `if`/`begin`.
fn cond_to_if(expr: &Value) -> Result<Value, ServalError> {
    let clauses = cdr_of(expr, "clauses after 'cond'")?
        .to_vec()
        .ok_or_else(|| EvalError::Syntax("malformed cond".into()))?;
    expand_clauses(&clauses)
}

fn expand_clauses(clauses: &[Value]) -> Result<Value, ServalError> {
    let Some((first, rest)) = clauses.split_first() else {
        return Ok(Value::Boolean(false));
    };

    let predicate = first.car().ok_or_else(|| EvalError::Syntax("malformed cond clause".into()))?;
    let actions = first.cdr().unwrap().to_vec().ok_or_else(|| EvalError::Syntax("malformed cond clause".into()))?;
    let body = sequence_to_expr(actions);

    let is_else = predicate.as_symbol_name() == Some("else");
    if is_else {
        if !rest.is_empty() {
            return Err(EvalError::Syntax("else clause must be last in cond".into()).into());
        }
        return Ok(body);
    }

    let alternative = expand_clauses(rest)?;
    Ok(Value::list(&[Value::symbol("if"), predicate, body, alternative]))
}

fn sequence_to_expr(mut exprs: Vec<Value>) -> Value {
    if exprs.len() == 1 {
        exprs.remove(0)
    } else {
        let mut items = vec![Value::symbol("begin")];
        items.extend(exprs);
        Value::list(&items)
    }
}
