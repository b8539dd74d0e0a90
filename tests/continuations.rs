//! First-class continuations: capture, escape, re-entry.

use tailspin::engine::{eval_source, top_level_environment, Result, SchemeError, Value};

fn run(source: &str) -> Result<Value> {
    let env = top_level_environment();
    eval_source(&env, source)
}

fn eval_str(source: &str) -> String {
    run(source).expect("evaluation should succeed").to_string()
}

#[test]
fn invoking_abandons_the_rest_of_the_receiver() {
    // The 999 never becomes the result; the jump replaces it.
    assert_eq!(eval_str("(+ 1 (call/cc (lambda (k) (k 10) 999)))"), "11");
    assert_eq!(eval_str("(call/cc (lambda (k) (+ 1 (k 42))))"), "42");
}

#[test]
fn falling_off_the_receiver_returns_normally() {
    assert_eq!(eval_str("(call/cc (lambda (k) 5))"), "5");
    assert_eq!(eval_str("(+ 1 (call/cc (lambda (k) 2)))"), "3");
}

#[test]
fn both_names_are_bound() {
    assert_eq!(
        eval_str("(call-with-current-continuation (lambda (k) (k 'ok)))"),
        "ok"
    );
    assert_eq!(eval_str("(call/cc (lambda (k) (k 'ok)))"), "ok");
}

#[test]
fn a_continuation_is_a_procedure_value() {
    assert_eq!(eval_str("(procedure? (call/cc (lambda (k) k)))"), "#t");
    assert_eq!(eval_str("(continuation? (call/cc (lambda (k) 1)))"), "#f");
}

#[test]
fn invocation_takes_exactly_one_argument() {
    let err = run("(call/cc (lambda (k) (k 1 2)))").unwrap_err();
    assert_eq!(
        err,
        SchemeError::WrongArgumentCount {
            expected: 1,
            received: 2
        }
    );
}

#[test]
fn a_continuation_can_be_the_receiver() {
    // The inner capture jumps straight out through the outer continuation.
    assert_eq!(
        eval_str("(procedure? (call/cc (lambda (k) (call/cc k))))"),
        "#t"
    );
    assert_eq!(
        eval_str("(continuation? (call/cc (lambda (k) (call/cc k))))"),
        "#t"
    );
}

#[test]
fn receiver_must_be_a_procedure() {
    let err = run("(call/cc 3)").unwrap_err();
    assert!(matches!(
        err,
        SchemeError::Type {
            expected: "procedure",
            ..
        }
    ));
}

#[test]
fn escape_from_deep_inside_a_walk() {
    let source = "(define (first-above lst limit)
                    (call/cc
                      (lambda (return)
                        (letrec ((walk (lambda (l)
                                         (if (null? l)
                                             #f
                                             (begin
                                               (if (> (car l) limit)
                                                   (return (car l))
                                                   #f)
                                               (walk (cdr l)))))))
                          (walk lst)))))
                  (first-above '(1 2 5 7) 3)";
    assert_eq!(eval_str(source), "5");
}

#[test]
fn captured_continuation_outlives_its_extent_and_is_multi_shot() {
    // Each re-entry resumes the addition; count doubles until it passes 10.
    let source = "(let ((saved #f) (count 0))
                    (set! count (+ (call/cc (lambda (k) (set! saved k) 1)) count))
                    (if (< count 10)
                        (saved count)
                        count))";
    assert_eq!(eval_str(source), "16");
}

#[test]
fn re_entry_does_not_corrupt_previously_collected_arguments() {
    let source = "(let ((saved #f) (runs 0) (acc '()))
                    (set! acc (cons (call/cc (lambda (k) (set! saved k) 0)) acc))
                    (set! runs (+ runs 1))
                    (if (< runs 3)
                        (saved runs)
                        acc))";
    assert_eq!(eval_str(source), "(2 1 0)");
}

#[test]
fn continuation_in_operator_position() {
    let value = run("((call/cc (lambda (k) k)) 1 2)").unwrap_err();
    assert_eq!(
        value,
        SchemeError::WrongArgumentCount {
            expected: 1,
            received: 2
        }
    );
}
