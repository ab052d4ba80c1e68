//! End-to-end retrieval pipeline tests over deterministic components.
//!
//! The hash embedder and token-overlap reranker make the full
//! ingest -> recall -> rerank path reproducible without model downloads; the
//! final test exercises the real fastembed models and is ignored by default.

use std::sync::Arc;

use semantic_recall::{
    DiskIndex, EmbeddingEngine, HashEmbedder, InMemoryIndex, RetrievalConfig, RetrievalService,
    TokenOverlapReranker, VectorIndex,
};

const DIM: usize = 128;

fn in_memory_service() -> RetrievalService {
    let engine = Arc::new(EmbeddingEngine::new(Arc::new(HashEmbedder::new(DIM))));
    RetrievalService::with_components(
        engine,
        Arc::new(TokenOverlapReranker::new()),
        Arc::new(InMemoryIndex::new(DIM)),
        2,
    )
    .unwrap()
}

#[test]
fn embedding_is_reproducible_across_calls() {
    let engine = EmbeddingEngine::new(Arc::new(HashEmbedder::new(DIM)));
    let first = engine.embed("the quick brown fox").unwrap();

    // A second engine shares no cache with the first, so this exercises the
    // model, not the memoization
    let fresh = EmbeddingEngine::new(Arc::new(HashEmbedder::new(DIM)));
    let second = fresh.embed("the quick brown fox").unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert!((a - b).abs() < 1e-5);
    }
}

#[test]
fn query_against_empty_index_is_empty_for_any_limit() {
    let service = in_memory_service();
    for limit in [0, 1, 5, 100] {
        assert!(service.query("whatever", None, limit).unwrap().is_empty());
        assert!(service
            .query("whatever", Some("flora"), limit)
            .unwrap()
            .is_empty());
    }
}

#[test]
fn end_to_end_ingest_and_query() {
    let service = in_memory_service();
    service
        .ingest(
            &[
                "red rose stands for love and romance".into(),
                "lotus flower stands for purity".into(),
                "bamboo stands for resilience".into(),
            ],
            "flora",
        )
        .unwrap();

    let results = service
        .query("rose love romance", Some("flora"), 1)
        .unwrap();
    assert_eq!(results, vec!["red rose stands for love and romance".to_string()]);
}

#[test]
fn query_returns_at_most_limit_from_ingested_corpus() {
    let service = in_memory_service();
    let corpus: Vec<String> = (0..8)
        .map(|i| format!("gardening note number {i} about roses"))
        .collect();
    service.ingest(&corpus, "notes").unwrap();

    let results = service.query("roses gardening", None, 5).unwrap();
    assert!(results.len() <= 5);
    for result in &results {
        assert!(corpus.contains(result));
    }
}

#[test]
fn overfetch_gives_reranker_room_to_reorder() {
    // limit=1 recalls two candidates; the reranker decides which survives,
    // so the winner must be the best joint match, not merely a near neighbor.
    let service = in_memory_service();
    service
        .ingest(
            &[
                "rose rose rose rose thorn".into(),
                "a rose stands for romance".into(),
                "tulip bulbs in spring".into(),
                "watering can maintenance".into(),
            ],
            "garden",
        )
        .unwrap();

    let results = service
        .query("what rose stands for romance", None, 1)
        .unwrap();
    assert_eq!(results, vec!["a rose stands for romance".to_string()]);
}

#[test]
fn delete_category_then_filtered_search_is_empty() {
    let service = in_memory_service();
    service
        .ingest(&["red rose".into(), "white lily".into()], "flora")
        .unwrap();
    service.ingest(&["amber fossil".into()], "minerals").unwrap();

    service.clear_category("flora").unwrap();

    assert!(service.query("rose", Some("flora"), 10).unwrap().is_empty());
    // Other categories untouched
    assert_eq!(service.document_count(), 1);
}

#[test]
fn clear_all_empties_the_corpus() {
    let service = in_memory_service();
    service.ingest(&["one".into(), "two".into()], "misc").unwrap();
    service.clear_all().unwrap();
    assert_eq!(service.document_count(), 0);
    assert!(service.query("one", None, 5).unwrap().is_empty());
}

#[test]
fn disk_index_pipeline_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(EmbeddingEngine::new(Arc::new(HashEmbedder::new(DIM))));

    {
        let service = RetrievalService::with_components(
            engine.clone(),
            Arc::new(TokenOverlapReranker::new()),
            Arc::new(DiskIndex::open(dir.path(), DIM).unwrap()),
            2,
        )
        .unwrap();
        service
            .ingest(&["red rose stands for romance".into()], "flora")
            .unwrap();
    }

    let reopened = RetrievalService::with_components(
        engine,
        Arc::new(TokenOverlapReranker::new()),
        Arc::new(DiskIndex::open(dir.path(), DIM).unwrap()),
        2,
    )
    .unwrap();

    let results = reopened.query("rose romance", Some("flora"), 5).unwrap();
    assert_eq!(results, vec!["red rose stands for romance".to_string()]);
}

#[test]
fn disk_index_trait_object_behaves_like_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let index: Arc<dyn VectorIndex> = Arc::new(DiskIndex::open(dir.path(), DIM).unwrap());
    index.ensure_schema().unwrap();
    assert!(index.is_empty());
    index.delete_by_category("nothing-here").unwrap();
    index.delete_all().unwrap();
}

/// Full pipeline over the real ONNX models. Downloads the embedding and
/// reranker models on first run, so it is opt-in:
/// `cargo test -- --ignored flora`
#[test]
#[ignore = "downloads embedding and reranker models"]
fn flora_query_with_real_models() {
    let dir = tempfile::tempdir().unwrap();
    let config = RetrievalConfig {
        index_path: dir.path().join("index"),
        ..RetrievalConfig::default()
    };

    let service = RetrievalService::open(&config).unwrap();
    service
        .ingest(
            &[
                "red rose meaning love".into(),
                "lotus symbolizing purity".into(),
                "bamboo representing resilience".into(),
            ],
            "flora",
        )
        .unwrap();

    let results = service
        .query("flower that symbolizes romance", Some("flora"), 1)
        .unwrap();
    assert_eq!(results, vec!["red rose meaning love".to_string()]);
}
