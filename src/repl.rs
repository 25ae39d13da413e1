use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use log::{error, info};

use crate::env::Env;
use crate::error::ServalError;
use crate::eval::eval;
use crate::parser::parse;
use crate::value::Value;

const PROMPT: &str = "serval> ";

/// Evaluate every top-level datum parsed from `source` against `env`,
/// returning the last result. Used by both `load` and script mode.
pub fn eval_source(source: &str, env: &Env) -> Result<Value, ServalError> {
    let datums = parse(source)?;
    let mut result = Value::Boolean(false);
    for datum in datums {
        if let Some(path) = as_load(&datum) {
            result = load(&path, env)?;
        } else {
            result = eval(&datum, env)?;
        }
    }
    Ok(result)
}

/// Recognize the driver-level `(load "path")` form. Not an `eval` special
/// form: it is handled here because it drives the parser/evaluator
/// recursively against a file, which belongs to the driver boundary.
fn as_load(expr: &Value) -> Option<String> {
    if !expr.is_tagged_list("load") {
        return None;
    }
    match expr.cdr()?.car()? {
        Value::String(path) => Some(path.to_string()),
        _ => None,
    }
}

/// Read `path`, parse it fully, and evaluate every datum in order against
/// `env`. Mirrors the original `expression/util.py::load`.
pub fn load(path: &str, env: &Env) -> Result<Value, ServalError> {
    let resolved = fs::canonicalize(Path::new(path)).map_err(ServalError::from)?;
    info!("loading {}", resolved.display());
    let source = fs::read_to_string(&resolved).map_err(ServalError::from)?;
    eval_source(&source, env)
}

/// Run the `serval> ` REPL against `env` until EOF.
pub fn repl(env: &Env) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{PROMPT}");
        let _ = stdout.flush();

        let mut line = String::new();
        let bytes_read = stdin.lock().read_line(&mut line).unwrap_or(0);
        if bytes_read == 0 {
            info!("received EOF, exiting");
            println!();
            break;
        }

        let datums = match parse(&line) {
            Ok(datums) => datums,
            Err(e) => {
                error!("{e}");
                continue;
            }
        };

        for datum in datums {
            let outcome = if let Some(path) = as_load(&datum) {
                load(&path, env)
            } else {
                eval(&datum, env)
            };

            match outcome {
                Ok(value) => println!("{value}"),
                Err(e) => {
                    error!("{e}");
                    break;
                }
            }
        }
    }
}
