pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod primitives;
pub mod repl;
pub mod value;

use env::Env;
use error::ServalError;
use value::Value;

/// Build a fresh global environment seeded with every primitive procedure.
pub fn new_interpreter() -> Env {
    let root = env::new_root();
    primitives::install(&root);
    root
}

/// Parse and evaluate every top-level datum in `source` against `env`,
/// returning the value of the last one. The entry point integration tests
/// drive directly, without shelling out to the `serval` binary.
pub fn run_source(source: &str, env: &Env) -> Result<Value, ServalError> {
    repl::eval_source(source, env)
}
