//! HNSW approximate nearest-neighbor set
//!
//! Shared by both index backends. instant-distance builds immutable graphs,
//! so every structural mutation rebuilds; with the corpus sizes this core
//! serves (thousands of short documents) a rebuild is cheap relative to
//! model inference.

use instant_distance::{Builder, HnswMap, Point, Search};
use parking_lot::RwLock;

use crate::config::cosine_similarity;

/// Candidate width of [`Search::default`]; queries past this would come back
/// short even when more documents exist
const SEARCH_WIDTH: usize = 100;

/// A document's position in embedding space
#[derive(Clone)]
pub(crate) struct IndexPoint {
    pub id: String,
    pub vector: Vec<f32>,
}

impl Point for IndexPoint {
    fn distance(&self, other: &Self) -> f32 {
        // Cosine distance = 1 - similarity (HNSW finds minimum)
        1.0 - cosine_similarity(&self.vector, &other.vector)
    }
}

/// Cosine-space HNSW over document ids.
///
/// The points write lock is held across snapshot, rebuild, and store of the
/// graph, so concurrent mutations cannot publish a stale graph over a newer
/// one; searches share the graph read lock and never take the points lock.
pub(crate) struct AnnSet {
    points: RwLock<Vec<IndexPoint>>,
    hnsw: RwLock<Option<HnswMap<IndexPoint, String>>>,
}

impl AnnSet {
    pub fn new() -> Self {
        Self {
            points: RwLock::new(Vec::new()),
            hnsw: RwLock::new(None),
        }
    }

    /// Add points and rebuild the graph
    pub fn extend(&self, new_points: Vec<IndexPoint>) {
        let mut points = self.points.write();
        points.extend(new_points);
        self.rebuild(&points);
    }

    /// Drop points whose id fails the predicate and rebuild
    pub fn retain(&self, keep: impl Fn(&str) -> bool) {
        let mut points = self.points.write();
        points.retain(|p| keep(&p.id));
        self.rebuild(&points);
    }

    /// Drop everything
    pub fn clear(&self) {
        let mut points = self.points.write();
        points.clear();
        *self.hnsw.write() = None;
    }

    /// Nearest ids by cosine similarity, most similar first.
    ///
    /// Returns `None` when no graph is built or when `limit` exceeds the
    /// graph's search width; callers fall back to a linear scan, which has
    /// no width cap.
    pub fn search(&self, query: &[f32], limit: usize) -> Option<Vec<(String, f32)>> {
        if limit > SEARCH_WIDTH {
            return None;
        }
        let guard = self.hnsw.read();
        let index = guard.as_ref()?;

        let query_point = IndexPoint {
            id: String::new(),
            vector: query.to_vec(),
        };

        let mut search = Search::default();
        let mut results = Vec::new();

        for item in index.search(&query_point, &mut search) {
            let similarity = cosine_similarity(query, &item.point.vector);
            results.push((item.value.clone(), similarity));

            if results.len() >= limit {
                break;
            }
        }

        Some(results)
    }

    /// Rebuild and publish the graph. Callers hold the points write lock, so
    /// rebuilds are serialized and each published graph reflects the points
    /// state that produced it.
    fn rebuild(&self, points: &[IndexPoint]) {
        if points.is_empty() {
            *self.hnsw.write() = None;
            return;
        }

        let values: Vec<String> = points.iter().map(|p| p.id.clone()).collect();
        let hnsw = Builder::default()
            .ef_construction(100)
            .build(points.to_vec(), values);
        *self.hnsw.write() = Some(hnsw);
    }
}
