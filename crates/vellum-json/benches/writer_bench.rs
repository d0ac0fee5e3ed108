use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use vellum_json::{to_json_bytes, JsonTextWriter, JsonWriter, WriterOptions};

fn write_document(writer: &mut JsonTextWriter) {
    writer.write_object_start().unwrap();
    writer.write_field_name("name").unwrap();
    writer.write_string_value("Miku").unwrap();
    writer.write_field_name("age").unwrap();
    writer.write_number_value(16).unwrap();
    writer.write_field_name("score").unwrap();
    writer.write_number_value(99.5).unwrap();
    writer.write_field_name("active").unwrap();
    writer.write_bool_value(true).unwrap();
    writer.write_object_end().unwrap();
}

fn bench_validated_document(c: &mut Criterion) {
    c.bench_function("document_write_validated", |b| {
        b.iter(|| {
            let mut writer = JsonTextWriter::new();
            write_document(&mut writer);
            writer.into_bytes()
        })
    });
}

fn bench_trusted_document(c: &mut Criterion) {
    c.bench_function("document_write_trusted", |b| {
        b.iter(|| {
            let mut writer = JsonTextWriter::with_options(WriterOptions::trusted());
            write_document(&mut writer);
            writer.into_bytes()
        })
    });
}

fn bench_escaped_strings(c: &mut Criterion) {
    let clean = "a fairly ordinary string value without escapes".repeat(4);
    let dirty = "line one\nline \"two\"\ttabbed\\".repeat(4);

    c.bench_function("string_fast_path", |b| {
        b.iter(|| {
            let mut writer = JsonTextWriter::new();
            writer.write_string_value(&clean).unwrap();
            writer.into_bytes()
        })
    });

    c.bench_function("string_escape_path", |b| {
        b.iter(|| {
            let mut writer = JsonTextWriter::new();
            writer.write_string_value(&dirty).unwrap();
            writer.into_bytes()
        })
    });
}

fn bench_query_results(c: &mut Criterion) {
    let rows: Vec<_> = (0..100)
        .map(|i| json!({"id": i, "name": format!("doc-{}", i), "ratio": i as f64 / 7.0}))
        .collect();
    let value = json!({"Documents": rows, "_count": 100});

    c.bench_function("query_results_from_value", |b| {
        b.iter(|| to_json_bytes(&value, WriterOptions::default()))
    });
}

criterion_group!(
    benches,
    bench_validated_document,
    bench_trusted_document,
    bench_escaped_strings,
    bench_query_results,
);

criterion_main!(benches);
