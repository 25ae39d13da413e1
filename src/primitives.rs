use std::rc::Rc;

use crate::env::{define, Env};
use crate::error::EvalError;
use crate::value::{eq, Primitive, Value};

fn wrong_type(expected: &str, got: &Value) -> EvalError {
    EvalError::Type {
        expected: expected.to_string(),
        got: got.to_string(),
    }
}

fn as_number(value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Number(n) => Ok(*n),
        other => Err(wrong_type("number", other)),
    }
}

fn arity(expected: &str, args: &[Value], context: &str) -> Result<(), EvalError> {
    if args.is_empty() {
        return Err(EvalError::Arity {
            expected: expected.to_string(),
            got: 0,
            context: context.to_string(),
        });
    }
    Ok(())
}

fn arithmetic(name: &'static str, args: &[Value], op: fn(i64, i64) -> i64) -> Result<Value, EvalError> {
    arity("at least 1", args, name)?;
    let mut numbers = args.iter().map(as_number);
    let first = numbers.next().unwrap()?;
    if args.len() == 1 {
        // Matches the source's deviation: unary application is a no-op.
        return Ok(Value::Number(first));
    }
    let mut acc = first;
    for n in numbers {
        acc = op(acc, n?);
    }
    Ok(Value::Number(acc))
}

fn comparison(name: &'static str, args: &[Value], op: fn(i64, i64) -> bool) -> Result<Value, EvalError> {
    arity("at least 1", args, name)?;
    let numbers = args.iter().map(as_number).collect::<Result<Vec<_>, _>>()?;
    if numbers.len() == 1 {
        return Ok(Value::Boolean(true));
    }
    let ok = numbers.windows(2).all(|pair| op(pair[0], pair[1]));
    Ok(Value::Boolean(ok))
}

fn prim(name: &'static str, func: impl Fn(&[Value]) -> Result<Value, crate::error::ServalError> + 'static) -> Value {
    Value::Primitive(Rc::new(Primitive { name, func: Rc::new(func) }))
}

/// Seed `env` with every primitive procedure from the component table.
pub fn install(env: &Env) {
    define(env, "+", prim("+", |args| Ok(arithmetic("+", args, |a, b| a + b)?)));
    define(env, "-", prim("-", |args| Ok(arithmetic("-", args, |a, b| a - b)?)));
    define(env, "*", prim("*", |args| Ok(arithmetic("*", args, |a, b| a * b)?)));
    define(env, "/", prim("/", |args| Ok(arithmetic("/", args, |a, b| a / b)?)));

    define(env, "=", prim("=", |args| Ok(comparison("=", args, |a, b| a == b)?)));
    define(env, "<", prim("<", |args| Ok(comparison("<", args, |a, b| a < b)?)));
    define(env, "<=", prim("<=", |args| Ok(comparison("<=", args, |a, b| a <= b)?)));
    define(env, ">", prim(">", |args| Ok(comparison(">", args, |a, b| a > b)?)));
    define(env, ">=", prim(">=", |args| Ok(comparison(">=", args, |a, b| a >= b)?)));

    define(env, "cons", prim("cons", |args| {
        match args {
            [a, b] => Ok(Value::cons(a.clone(), b.clone())),
            _ => Err(EvalError::Arity { expected: "2".into(), got: args.len(), context: "cons".into() }.into()),
        }
    }));

    define(env, "car", prim("car", |args| {
        match args {
            [value] => value.car().ok_or_else(|| wrong_type("pair", value).into()),
            _ => Err(EvalError::Arity { expected: "1".into(), got: args.len(), context: "car".into() }.into()),
        }
    }));

    define(env, "cdr", prim("cdr", |args| {
        match args {
            [value] => value.cdr().ok_or_else(|| wrong_type("pair", value).into()),
            _ => Err(EvalError::Arity { expected: "1".into(), got: args.len(), context: "cdr".into() }.into()),
        }
    }));

    define(env, "list", prim("list", |args| Ok(Value::list(args))));

    define(env, "pair?", prim("pair?", |args| {
        match args {
            [value] => Ok(Value::Boolean(value.is_pair())),
            _ => Err(EvalError::Arity { expected: "1".into(), got: args.len(), context: "pair?".into() }.into()),
        }
    }));

    define(env, "null?", prim("null?", |args| {
        match args {
            [value] => Ok(Value::Boolean(value.is_null())),
            _ => Err(EvalError::Arity { expected: "1".into(), got: args.len(), context: "null?".into() }.into()),
        }
    }));

    define(env, "eq?", prim("eq?", |args| {
        match args {
            [a, b] => Ok(Value::Boolean(eq(a, b))),
            _ => Err(EvalError::Arity { expected: "2".into(), got: args.len(), context: "eq?".into() }.into()),
        }
    }));

    define(env, "zero?", prim("zero?", |args| {
        match args {
            [value] => Ok(Value::Boolean(as_number(value)? == 0)),
            _ => Err(EvalError::Arity { expected: "1".into(), got: args.len(), context: "zero?".into() }.into()),
        }
    }));

    define(env, "number?", prim("number?", |args| {
        match args {
            [value] => Ok(Value::Boolean(matches!(value, Value::Number(_)))),
            _ => Err(EvalError::Arity { expected: "1".into(), got: args.len(), context: "number?".into() }.into()),
        }
    }));

    define(env, "even?", prim("even?", |args| {
        match args {
            [value] => Ok(Value::Boolean(as_number(value)? % 2 == 0)),
            _ => Err(EvalError::Arity { expected: "1".into(), got: args.len(), context: "even?".into() }.into()),
        }
    }));

    define(env, "abs", prim("abs", |args| {
        match args {
            [value] => Ok(Value::Number(as_number(value)?.abs())),
            _ => Err(EvalError::Arity { expected: "1".into(), got: args.len(), context: "abs".into() }.into()),
        }
    }));

    define(env, "expt", prim("expt", |args| {
        match args {
            [base, exponent] => {
                let base = as_number(base)?;
                let exponent = as_number(exponent)?;
                Ok(Value::Number(base.pow(exponent.max(0) as u32)))
            }
            _ => Err(EvalError::Arity { expected: "2".into(), got: args.len(), context: "expt".into() }.into()),
        }
    }));

    define(env, "length", prim("length", |args| {
        match args {
            [value] => {
                let items = value.to_vec().ok_or_else(|| wrong_type("proper list", value))?;
                Ok(Value::Number(items.len() as i64))
            }
            _ => Err(EvalError::Arity { expected: "1".into(), got: args.len(), context: "length".into() }.into()),
        }
    }));

    define(env, "not", prim("not", |args| {
        match args {
            [value] => Ok(Value::Boolean(!value.is_truthy())),
            _ => Err(EvalError::Arity { expected: "1".into(), got: args.len(), context: "not".into() }.into()),
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::new_root;

    fn call(env: &Env, name: &str, args: &[Value]) -> Value {
        let proc = crate::env::lookup(env, name).unwrap();
        match proc {
            Value::Primitive(p) => (p.func)(args).unwrap(),
            _ => panic!("not a primitive"),
        }
    }

    #[test]
    fn plus_sums_all_args() {
        let env = new_root();
        install(&env);
        assert_eq!(call(&env, "+", &[Value::Number(1), Value::Number(2), Value::Number(3)]), Value::Number(6));
    }

    #[test]
    fn unary_minus_is_noop() {
        let env = new_root();
        install(&env);
        assert_eq!(call(&env, "-", &[Value::Number(5)]), Value::Number(5));
    }

    #[test]
    fn car_of_non_pair_is_type_error() {
        let env = new_root();
        install(&env);
        let proc = crate::env::lookup(&env, "car").unwrap();
        let Value::Primitive(p) = proc else { unreachable!() };
        assert!((p.func)(&[Value::Number(1)]).is_err());
    }

    #[test]
    fn eq_is_structural_for_numbers() {
        let env = new_root();
        install(&env);
        assert_eq!(call(&env, "eq?", &[Value::Number(3), Value::Number(3)]), Value::Boolean(true));
    }
}
