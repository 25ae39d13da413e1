use serval::value::Value;
use serval::{new_interpreter, run_source};

#[test]
fn nested_dotted_pairs_print_as_a_proper_list() {
    let env = new_interpreter();
    let result = run_source("'(1 . (2 . (3 . ())))", &env).expect("eval should succeed");

    assert_eq!(
        result.to_vec().unwrap(),
        vec![Value::Number(1), Value::Number(2), Value::Number(3)]
    );
    assert_eq!(result.to_string(), "(1 2 3)");
}
