use serval::value::Value;
use serval::{new_interpreter, run_source};

#[test]
fn or_returns_the_first_truthy_value() {
    let env = new_interpreter();
    let result = run_source("(or #f '(1 2) '(3 4))", &env).expect("eval should succeed");

    assert_eq!(result.to_vec().unwrap(), vec![Value::Number(1), Value::Number(2)]);
}
