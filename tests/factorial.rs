use serval::value::Value;
use serval::{new_interpreter, run_source};

#[test]
fn recursive_factorial_definition() {
    let env = new_interpreter();
    let result = run_source(
        "(define (factorial n) (if (= n 0) 1 (* n (factorial (- n 1)))))
         (factorial 5)",
        &env,
    )
    .expect("eval should succeed");

    assert_eq!(result, Value::Number(120));
}
