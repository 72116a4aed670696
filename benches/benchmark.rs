// Throughput benchmarks for the scorer and classifier
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lexitag_core::{
    apply_classifier, apply_scorer, classify_text, score_text, DictionarySet,
    SentimentDictionary, Table,
};
use rand::prelude::*;

const FILLER: &[&str] = &[
    "the", "product", "arrived", "on", "time", "and", "was", "packed", "in", "a", "box",
    "support", "team", "answered", "my", "question", "price", "offer", "deal", "today",
];

const SIGNAL: &[&str] = &[
    "good", "great", "love", "bad", "terrible", "hate", "limited", "hurry", "exclusive",
    "vip", "premium", "members only", "act now",
];

fn generate_sentence(words: usize) -> String {
    let mut rng = rand::rng();
    (0..words)
        .map(|_| {
            let pool = if rng.random_range(0..5) == 0 { SIGNAL } else { FILLER };
            *pool.choose(&mut rng).unwrap_or(&"")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_table(rows: usize) -> Table {
    let rows = (0..rows)
        .map(|i| vec![i.to_string(), generate_sentence(24)])
        .collect();
    Table::new(vec!["id".to_string(), "text".to_string()], rows).unwrap()
}

fn benchmark_score_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_text");
    let dictionary = SentimentDictionary::default();

    for words in [10, 100, 1000].iter() {
        let text = generate_sentence(*words);
        group.bench_with_input(BenchmarkId::new("words", words), &text, |b, text| {
            b.iter(|| score_text(black_box(Some(text.as_str())), &dictionary));
        });
    }

    group.finish();
}

fn benchmark_classify_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_text");
    let dictionaries = DictionarySet::default();

    for words in [10, 100, 1000].iter() {
        let text = generate_sentence(*words);
        group.bench_with_input(BenchmarkId::new("words", words), &text, |b, text| {
            b.iter(|| classify_text(black_box(Some(text.as_str())), &dictionaries));
        });
    }

    group.finish();
}

fn benchmark_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");
    group.sample_size(20);

    let dictionary = SentimentDictionary::default();
    let dictionaries = DictionarySet::default();

    for rows in [1_000, 10_000].iter() {
        let table = generate_table(*rows);

        group.bench_with_input(BenchmarkId::new("scorer", rows), &table, |b, table| {
            b.iter(|| apply_scorer(black_box(table), "text", &dictionary).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("classifier", rows), &table, |b, table| {
            b.iter(|| apply_classifier(black_box(table), "text", &dictionaries).unwrap());
        });
    }

    group.finish();
}

fn benchmark_csv(c: &mut Criterion) {
    let csv = generate_table(10_000).to_csv_string().unwrap();

    c.bench_function("csv_parse_10k", |b| {
        b.iter(|| Table::from_csv_bytes(black_box(csv.as_bytes())).unwrap());
    });
}

criterion_group!(
    benches,
    benchmark_score_text,
    benchmark_classify_text,
    benchmark_apply,
    benchmark_csv
);
criterion_main!(benches);
