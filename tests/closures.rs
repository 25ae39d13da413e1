use serval::value::Value;
use serval::{new_interpreter, run_source};

#[test]
fn set_through_a_nested_closure_mutates_the_captured_frame() {
    let env = new_interpreter();
    let result = run_source(
        "((lambda (x)
            (define y x)
            ((lambda (z) (set! y z)) 3)
            y)
          10)",
        &env,
    )
    .expect("eval should succeed");

    assert_eq!(result, Value::Number(3));
}
