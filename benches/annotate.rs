//! Criterion benchmarks for annotated-code generation.
//!
//! These measure the single-pass token-stream transformation on synthetic
//! documents of increasing size.
//!
//! Run with: `cargo bench --bench annotate`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use retdec_annotate::generate_output;
use serde_json::json;

/// Build a token-stream document for `statements` assignment statements,
/// each under its own address marker.
fn synthetic_document(statements: usize) -> String {
    let mut tokens = Vec::with_capacity(statements * 7);
    for i in 0..statements {
        tokens.push(json!({ "addr": format!("{:x}", 0x40_0000 + i * 4) }));
        tokens.push(json!({ "val": "int", "kind": "type" }));
        tokens.push(json!({ "val": " ", "kind": "ws" }));
        tokens.push(json!({ "val": format!("v{i}"), "kind": "i_var" }));
        tokens.push(json!({ "val": " = ", "kind": "op" }));
        tokens.push(json!({ "val": format!("{i}"), "kind": "l_int" }));
        tokens.push(json!({ "val": ";\n", "kind": "punc" }));
    }
    json!({ "tokens": tokens }).to_string()
}

fn bench_generate_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_output");

    for statements in [100usize, 1_000, 10_000] {
        let document = synthetic_document(statements);
        group.throughput(Throughput::Bytes(document.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(statements),
            &document,
            |b, document| b.iter(|| generate_output(document).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_generate_output);

criterion_main!(benches);
