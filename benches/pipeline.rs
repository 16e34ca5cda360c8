use criterion::{criterion_group, criterion_main, Criterion};
use std::path::Path;

fn bench_slug(c: &mut Criterion) {
    c.bench_function("derive_slug", |b| {
        b.iter(|| moblog::pipeline::slug::derive_slug("Trip to the coast"))
    });
}

fn bench_convert_body(c: &mut Criterion) {
    let text = "We reached the coast.\r\n[image: photo.png]\r\nWhat a view!\r\n".repeat(200);
    let html = "<div><p>We reached the <b>coast</b>.</p><ul><li>sand</li><li>sea</li></ul></div>"
        .repeat(200);

    c.bench_function("convert_body_text", |b| {
        b.iter(|| moblog::pipeline::body::convert_body(&text, None, false))
    });
    c.bench_function("convert_body_html", |b| {
        b.iter(|| moblog::pipeline::body::convert_body(&text, Some(&html), true))
    });
}

fn bench_parse_envelope(c: &mut Criterion) {
    let raw = std::fs::read(
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("trip.eml"),
    )
    .unwrap();

    c.bench_function("parse_envelope_trip", |b| {
        b.iter(|| moblog::parser::envelope::parse_envelope(&raw).unwrap())
    });
}

criterion_group!(benches, bench_slug, bench_convert_body, bench_parse_envelope);
criterion_main!(benches);
