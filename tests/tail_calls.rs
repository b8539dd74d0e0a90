//! Stack safety: language-level recursion depth must not translate into
//! host stack depth. These would overflow the host stack on a conventional
//! recursive evaluator.

use tailspin::engine::{eval_source, step_count, top_level_environment};

fn eval_str(source: &str) -> String {
    let env = top_level_environment();
    eval_source(&env, source)
        .expect("evaluation should succeed")
        .to_string()
}

#[test]
fn deep_self_recursion() {
    let source = "(define (loop n)
                    (if (= n 0) 'done (loop (- n 1))))
                  (loop 100000)";
    assert_eq!(eval_str(source), "done");
}

#[test]
fn deep_mutual_recursion() {
    let source = "(define (even? n) (if (= n 0) #t (odd? (- n 1))))
                  (define (odd? n) (if (= n 0) #f (even? (- n 1))))
                  (even? 100000)";
    assert_eq!(eval_str(source), "#t");
}

#[test]
fn deep_iteration_through_do() {
    let source = "(do ((i 0 (+ i 1)))
                      ((= i 100000) 'done))";
    assert_eq!(eval_str(source), "done");
}

#[test]
fn deep_non_tail_argument_recursion() {
    // The recursive call sits inside an argument position, so this also
    // exercises pending-argument accumulation at depth.
    let source = "(define (sum n)
                    (if (= n 0) 0 (+ n (sum (- n 1)))))
                  (sum 50000)";
    assert_eq!(eval_str(source), "1250025000");
}

#[test]
fn tail_position_inside_let_and_begin() {
    let source = "(define (countdown n)
                    (let ((m (- n 1)))
                      (begin
                        (if (= n 0) 'done (countdown m)))))
                  (countdown 100000)";
    assert_eq!(eval_str(source), "done");
}

#[test]
fn step_counter_advances_during_evaluation() {
    let before = step_count();
    let _ = eval_str("(+ 1 2)");
    assert!(step_count() > before);
}
