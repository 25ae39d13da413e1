use serval::value::Value;
use serval::{new_interpreter, run_source};

#[test]
fn sums_a_variadic_argument_list() {
    let env = new_interpreter();
    let result = run_source("(+ 1 2 3 4)", &env).expect("eval should succeed");
    assert_eq!(result, Value::Number(10));
}
