use serval::value::Value;
use serval::{new_interpreter, run_source};

#[test]
fn let_and_cond_dispatch_on_sign() {
    let env = new_interpreter();
    let result = run_source(
        "(let ((x -1))
           (cond ((< x 0) (list 'minus (abs x)))
                 ((> x 0) (list 'plus x))
                 (else (list 'zero x))))",
        &env,
    )
    .expect("eval should succeed");

    assert_eq!(result.to_vec().unwrap(), vec![Value::symbol("minus"), Value::Number(1)]);
}
