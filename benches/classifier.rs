//! Benchmarks for MSISDN classification.
//!
//! Run with: cargo bench --bench classifier

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

use msisdnd::classifier::{normalize, Classifier};
use msisdnd::directory::PrefixDirectory;

fn builtin_classifier() -> Classifier {
    Classifier::new(Arc::new(PrefixDirectory::builtin()))
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier/classify");
    let classifier = builtin_classifier();

    let inputs = [
        ("hit_three_digit_code", "38977123456"),
        ("hit_two_digit_code", "48536612345"),
        ("punctuated", "+389 (77) 123-456"),
        ("unknown_country", "11177554333"),
        ("unknown_operator", "38942123456"),
        ("too_short", "123456"),
    ];

    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| black_box(classifier.classify(black_box(input))))
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier/normalize");

    group.bench_function("digits_only", |b| {
        b.iter(|| black_box(normalize(black_box("38977123456"))))
    });

    group.bench_function("mixed", |b| {
        b.iter(|| black_box(normalize(black_box("+389 (0)77 123-456 ext."))))
    });

    group.finish();
}

fn bench_directory_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("directory/match");
    let directory = PrefixDirectory::builtin();

    group.bench_function("country", |b| {
        b.iter(|| black_box(directory.match_country(black_box("258841234567"))))
    });

    // Longest of nested 53 / 5366 prefixes
    group.bench_function("operator_nested", |b| {
        b.iter(|| black_box(directory.match_operator("48", black_box("536612345"))))
    });

    group.finish();
}

fn bench_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier/batch");
    let classifier = builtin_classifier();

    for size in [100usize, 1_000, 10_000] {
        let numbers: Vec<String> = (0..size)
            .map(|i| format!("38977{:06}", i % 1_000_000))
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &numbers, |b, numbers| {
            b.iter(|| {
                for number in numbers {
                    let _ = black_box(classifier.classify(number));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_classify,
    bench_normalize,
    bench_directory_match,
    bench_throughput
);
criterion_main!(benches);
