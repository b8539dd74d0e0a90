//! End-to-end coverage of the core special forms through the reader and the
//! full evaluation pipeline.

use tailspin::engine::{eval_source, top_level_environment, Result, SchemeError, Value};

fn run(source: &str) -> Result<Value> {
    let env = top_level_environment();
    eval_source(&env, source)
}

fn eval_str(source: &str) -> String {
    run(source).expect("evaluation should succeed").to_string()
}

#[test]
fn quote_returns_datum_unevaluated() {
    assert_eq!(eval_str("(quote (1 2 3))"), "(1 2 3)");
    assert_eq!(eval_str("'x"), "x");
    assert_eq!(eval_str("''x"), "(quote x)");
}

#[test]
fn quoted_data_is_constant() {
    let err = run("(define l '(1 2)) (set-car! l 9)").unwrap_err();
    assert!(matches!(err, SchemeError::ConstantMutation(_)));
}

#[test]
fn define_binds_and_yields_empty_list() {
    assert_eq!(eval_str("(define x 3)"), "()");
    assert_eq!(eval_str("(define x 3) x"), "3");
}

#[test]
fn define_procedure_shorthand() {
    assert_eq!(eval_str("(define (add a b) (+ a b)) (add 2 3)"), "5");
    // The shorthand names the procedure.
    assert_eq!(eval_str("(define (f) 1) f"), "#<procedure f>");
}

#[test]
fn define_shadows_without_touching_outer() {
    let source = "(define x 1)
                  (define (probe) x)
                  (define (shadow) (define x 2) x)
                  (list (shadow) (probe))";
    assert_eq!(eval_str(source), "(2 1)");
}

#[test]
fn assignment_mutates_nearest_binding() {
    assert_eq!(eval_str("(define x 1) (set! x 5) x"), "5");
    assert_eq!(eval_str("(define x 1) (set! x 5)"), "()");
}

#[test]
fn assignment_to_unbound_fails() {
    let err = run("(set! ghost 1)").unwrap_err();
    assert!(matches!(err, SchemeError::AssignUnbound(_)));
}

#[test]
fn assignment_target_must_be_a_symbol() {
    let err = run("(set! 3 1)").unwrap_err();
    assert!(matches!(err, SchemeError::Syntax { form: "set!", .. }));
}

#[test]
fn if_evaluates_only_the_chosen_branch() {
    assert_eq!(eval_str("(if #t 1 (error \"unreachable\"))"), "1");
    assert_eq!(eval_str("(if #f (error \"unreachable\") 2)"), "2");
}

#[test]
fn if_without_alternative_on_false_is_unspecified() {
    let value = run("(if #f 1)").unwrap();
    assert!(matches!(value, Value::Unspecified));
}

#[test]
fn everything_but_false_is_true() {
    assert_eq!(eval_str("(if 0 'yes 'no)"), "yes");
    assert_eq!(eval_str("(if '() 'yes 'no)"), "yes");
    assert_eq!(eval_str("(if \"\" 'yes 'no)"), "yes");
}

#[test]
fn and_threads_the_last_value() {
    assert_eq!(eval_str("(and)"), "#t");
    assert_eq!(eval_str("(and 1 2 3)"), "3");
    assert_eq!(eval_str("(and 1 #f (error \"unreachable\"))"), "#f");
}

#[test]
fn or_returns_the_first_true_value() {
    assert_eq!(eval_str("(or)"), "#f");
    assert_eq!(eval_str("(or #f 7 (error \"unreachable\"))"), "7");
    assert_eq!(eval_str("(or #f #f)"), "#f");
}

#[test]
fn begin_yields_the_last_value() {
    assert_eq!(eval_str("(begin 1 2 3)"), "3");
    assert_eq!(eval_str("(define x 0) (begin (set! x 1) (set! x (+ x 1)) x)"), "2");
}

#[test]
fn lambda_captures_its_definition_environment() {
    let source = "(define (make-adder n) (lambda (m) (+ n m)))
                  (define add3 (make-adder 3))
                  (add3 4)";
    assert_eq!(eval_str(source), "7");
}

#[test]
fn variadic_formals() {
    assert_eq!(eval_str("((lambda args args) 1 2 3)"), "(1 2 3)");
    assert_eq!(eval_str("((lambda (a . rest) rest) 1 2 3)"), "(2 3)");
    assert_eq!(eval_str("((lambda (a . rest) rest) 1)"), "()");
}

#[test]
fn duplicate_formals_fail_at_definition_time() {
    let err = run("(lambda (a a) a)").unwrap_err();
    assert!(matches!(err, SchemeError::DuplicateFormal(_)));
}

#[test]
fn wrong_argument_count_is_reported_with_both_counts() {
    let err = run("((lambda (a b) a) 1)").unwrap_err();
    assert_eq!(
        err,
        SchemeError::WrongArgumentCount {
            expected: 2,
            received: 1
        }
    );
}

#[test]
fn ranged_arity_reports_the_violated_bound() {
    let err = run("(car '(1) '(2))").unwrap_err();
    assert_eq!(
        err,
        SchemeError::TooManyArguments {
            max: 1,
            received: 2
        }
    );
}

#[test]
fn compound_syntax_receives_operands_raw() {
    assert_eq!(eval_str("(%syntax (xquote value) value) (xquote micbinz)"), "micbinz");
}

#[test]
fn time_yields_an_elapsed_and_result_pair() {
    let value = run("(%time (+ 1 2))").unwrap();
    let Value::Pair(pair) = value else {
        panic!("expected a pair");
    };
    assert!(matches!(pair.cdr(), Value::Integer(3)));
    assert!(matches!(pair.car(), Value::Integer(ms) if ms >= 0));
    // The result is a dotted pair, not a proper list.
    assert_eq!(eval_str("(pair? (%time 1))"), "#t");
    assert_eq!(eval_str("(list? (%time 1))"), "#f");
}

#[test]
fn time_is_a_bound_syntax() {
    assert_eq!(eval_str("%time"), "#<syntax %time>");
    let err = run("(%time)").unwrap_err();
    assert_eq!(
        err,
        SchemeError::WrongArgumentCount {
            expected: 1,
            received: 0
        }
    );
}

#[test]
fn applying_a_non_operation_fails() {
    let err = run("(3 1 2)").unwrap_err();
    assert!(matches!(err, SchemeError::NotApplicable(_)));
}

#[test]
fn unbound_symbol_is_an_error_not_a_default() {
    let err = run("nowhere").unwrap_err();
    assert!(matches!(err, SchemeError::UnboundSymbol(_)));
}

#[test]
fn integer_overflow_fails_instead_of_wrapping() {
    let err = run("(+ 9223372036854775807 1)").unwrap_err();
    assert_eq!(err, SchemeError::Overflow("+"));
}

#[test]
fn mixed_arithmetic_promotes_to_real() {
    assert_eq!(eval_str("(+ 1 2.5)"), "3.5");
    assert_eq!(eval_str("(* 2 2)"), "4");
    assert_eq!(eval_str("(- 5)"), "-5");
}

#[test]
fn at_least_arity_reports_the_minimum() {
    let err = run("(-)").unwrap_err();
    assert_eq!(
        err,
        SchemeError::NotEnoughArguments {
            min: 1,
            received: 0
        }
    );
}

#[test]
fn closures_keep_state_across_calls() {
    let source = "(define (make-counter)
                    (let ((n 0))
                      (lambda () (set! n (+ n 1)) n)))
                  (define tick (make-counter))
                  (tick)
                  (tick)
                  (tick)";
    assert_eq!(eval_str(source), "3");
}

#[test]
fn error_builtin_propagates_to_the_caller() {
    let err = run("(error \"boom\" 1 2)").unwrap_err();
    assert_eq!(err, SchemeError::User("boom: 1 2".to_string()));
}

#[test]
fn equivalence_predicates() {
    assert_eq!(eval_str("(eq? 'a 'a)"), "#t");
    assert_eq!(eval_str("(eq? '(1) '(1))"), "#f");
    assert_eq!(eval_str("(equal? '(1 (2)) '(1 (2)))"), "#t");
    assert_eq!(eval_str("(not #f)"), "#t");
    assert_eq!(eval_str("(not 0)"), "#f");
}
