//! Rule parser benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use transval_core::{format_adjacency, parse};

/// Builds a chain of `rules` rules, each with `fanout` targets.
fn rule_text(rules: usize, fanout: usize) -> String {
    (0..rules)
        .map(|from| {
            let targets: Vec<String> = (1..=fanout).map(|t| (from + t).to_string()).collect();
            format!("{} => {}", from, targets.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules_parse");

    for rules in [1usize, 10, 100, 1000] {
        let text = rule_text(rules, 4);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rules), &text, |b, text| {
            b.iter(|| black_box(parse(text).unwrap()))
        });
    }

    group.finish();
}

fn bench_parse_errors(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules_parse_error");

    // Failure at the end of a long text still scans every rule before it.
    let mut late_failure = rule_text(100, 4);
    late_failure.push_str("; 100 => x");

    group.bench_function("wrong_input_late", |b| {
        b.iter(|| black_box(parse(&late_failure).unwrap_err()))
    });

    group.bench_function("target_empty", |b| {
        b.iter(|| black_box(parse("1=>2;2=> , ;3=>4").unwrap_err()))
    });

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("rules_format");

    for rules in [10usize, 1000] {
        let adjacency = parse(&rule_text(rules, 4)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(rules), &adjacency, |b, adj| {
            b.iter(|| black_box(format_adjacency(adj)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_parse_errors, bench_format);
criterion_main!(benches);
