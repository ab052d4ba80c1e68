//! Benchmarks for the deterministic embed + search path

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use semantic_recall::{Document, Embedder, HashEmbedder, InMemoryIndex, VectorIndex};

const DIM: usize = 128;

fn bench_embed(c: &mut Criterion) {
    let embedder = HashEmbedder::new(DIM);
    let texts: Vec<&str> = vec![
        "red rose meaning love",
        "lotus symbolizing purity",
        "bamboo representing resilience",
        "a longer document about the cultural history of flower symbolism across regions",
    ];

    c.bench_function("hash_embed_batch_4", |b| {
        b.iter(|| embedder.embed_batch(black_box(&texts)).unwrap())
    });
}

fn bench_search(c: &mut Criterion) {
    let embedder = HashEmbedder::new(DIM);
    let index = InMemoryIndex::new(DIM);

    let corpus: Vec<String> = (0..1000)
        .map(|i| format!("document {i} about topic {}", i % 37))
        .collect();
    let refs: Vec<&str> = corpus.iter().map(String::as_str).collect();
    let vectors = embedder.embed_batch(&refs).unwrap();
    let docs: Vec<Document> = corpus
        .iter()
        .zip(vectors)
        .map(|(text, vector)| Document::new(text.clone(), "bench", vector))
        .collect();
    index.insert_batch(docs).unwrap();

    let query = embedder.embed_batch(&["topic 12 document"]).unwrap().remove(0);

    c.bench_function("search_1k_unfiltered_top10", |b| {
        b.iter(|| index.search(black_box(&query), None, 10).unwrap())
    });

    c.bench_function("search_1k_filtered_top10", |b| {
        b.iter(|| index.search(black_box(&query), Some("bench"), 10).unwrap())
    });
}

criterion_group!(benches, bench_embed, bench_search);
criterion_main!(benches);
