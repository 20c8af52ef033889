//! Validation throughput benchmarks.
//!
//! Measures the per-record check sequence with and without a schema, and the
//! full read-validate-write loop over an in-memory file.

use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gristle::{
    Dialect, InputStream, OutputRouter, Record, RecordValidator, RouterOptions, SchemaDocument,
    ValidationRun,
};

const SCHEMA: &str = "\
items:
  - title: id
    dg_type: integer
    dg_minimum: 1
  - title: name
    minLength: 1
    maxLength: 40
  - title: state
    enum: [CA, NY, OR, WA]
  - title: score
    dg_type: float
    dg_minimum: 0
    dg_maximum: 100
  - title: code
    pattern: '[A-Z]{3}-[0-9]{4}'
";

fn sample_csv(rows: usize) -> String {
    let states = ["CA", "NY", "OR", "WA", "TX"];
    let mut out = String::new();
    for i in 0..rows {
        out.push_str(&format!(
            "{},person{},{},{}.5,ABC-{:04}\n",
            i + 1,
            i,
            states[i % states.len()],
            i % 120,
            i % 10_000
        ));
    }
    out
}

fn bench_validate_record(c: &mut Criterion) {
    let schema = SchemaDocument::parse(SCHEMA).unwrap();
    let record = Record::from_fields(["42", "alice", "CA", "88.5", "ABC-0042"]);

    let mut group = c.benchmark_group("validate_record");

    let mut counts_only = RecordValidator::new(None, false);
    group.bench_function("field_count", |b| {
        b.iter(|| counts_only.validate(black_box(&record)))
    });

    let mut with_schema = RecordValidator::new(Some(schema), false);
    group.bench_function("schema", |b| {
        b.iter(|| with_schema.validate(black_box(&record)))
    });

    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let schema = SchemaDocument::parse(SCHEMA).unwrap();
    let dialect = Dialect::default();

    let mut group = c.benchmark_group("full_run");
    for rows in [1_000, 10_000] {
        let content = sample_csv(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &content, |b, content| {
            b.iter(|| {
                let mut stream =
                    InputStream::from_reader("bench", Cursor::new(content.clone()), dialect);
                let mut router = OutputRouter::new(
                    ("good".to_string(), Vec::new()),
                    ("bad".to_string(), Vec::new()),
                    RouterOptions::default(),
                    &dialect,
                );
                let mut run = ValidationRun::new(&dialect, Some(schema.clone()), None);
                run.process(&mut stream, &mut router).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_schema_parse(c: &mut Criterion) {
    c.bench_function("schema_parse", |b| {
        b.iter(|| SchemaDocument::parse(black_box(SCHEMA)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_validate_record,
    bench_full_run,
    bench_schema_parse
);
criterion_main!(benches);
