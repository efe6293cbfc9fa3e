//! Benchmarks for reference matching
//!
//! Tests performance of recognizing catalog URLs and extracting identities,
//! the work done on every piece of text a host offers the provider.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cineref::reference::{extract_identity, recognize};
use cineref::reference::preview::compose_title;

const INPUTS: [(&str, &str); 5] = [
    ("movie", "https://www.themoviedb.org/movie/293-a-river-runs-through-it"),
    ("person", "themoviedb.org/person/42-jane-doe"),
    ("series", "HTTP://WWW.THEMOVIEDB.ORG/TV/1399"),
    ("imdb", "https://www.imdb.com/title/tt0105265/"),
    ("prose", "had a look at that film you mentioned yesterday, great soundtrack"),
];

fn bench_recognize(c: &mut Criterion) {
    let mut group = c.benchmark_group("recognize");

    for (name, text) in INPUTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| recognize(black_box(text)))
        });
    }

    group.finish();
}

fn bench_extract_identity(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_identity");

    group.bench_function("movie/hit", |b| {
        b.iter(|| extract_identity(black_box(INPUTS[0].1)))
    });
    group.bench_function("person/miss", |b| {
        b.iter(|| extract_identity(black_box(INPUTS[1].1)))
    });

    group.finish();
}

fn bench_compose_title(c: &mut Criterion) {
    c.bench_function("compose_title/differing", |b| {
        b.iter(|| {
            compose_title(
                black_box(Some("Aus der Mitte entspringt ein Fluß")),
                black_box(Some("A River Runs Through It")),
            )
        })
    });
}

criterion_group!(
    benches,
    bench_recognize,
    bench_extract_identity,
    bench_compose_title
);
criterion_main!(benches);
