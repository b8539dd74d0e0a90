//! Trampoline throughput on recursion-heavy workloads.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use tailspin::engine::{eval_source, top_level_environment};

fn bench_deep_recursion(c: &mut Criterion) {
    let env = top_level_environment();
    eval_source(
        &env,
        "(define (countdown n) (if (= n 0) 'done (countdown (- n 1))))",
    )
    .expect("definition should succeed");

    c.bench_function("tail_recursion_100k", |b| {
        b.iter(|| {
            let value = eval_source(&env, black_box("(countdown 100000)"))
                .expect("evaluation should succeed");
            black_box(value)
        })
    });

    c.bench_function("do_loop_100k", |b| {
        b.iter(|| {
            let value = eval_source(
                &env,
                black_box("(do ((i 0 (+ i 1)) (sum 0 (+ sum i))) ((= i 100000) sum))"),
            )
            .expect("evaluation should succeed");
            black_box(value)
        })
    });

    c.bench_function("callcc_escape", |b| {
        b.iter(|| {
            let value = eval_source(
                &env,
                black_box("(+ 1 (call/cc (lambda (k) (k 10) 999)))"),
            )
            .expect("evaluation should succeed");
            black_box(value)
        })
    });
}

criterion_group!(benches, bench_deep_recursion);
criterion_main!(benches);
