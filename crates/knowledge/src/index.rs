//! In-memory flat vector index with exact nearest-neighbor search.
//!
//! No approximation and no pruning: every query scans every stored vector
//! under squared Euclidean (L2) distance. Corpora here are session-scale
//! (hundreds to low thousands of chunks) and `k` is small, so an exact
//! scan is both correct and fast enough.

use docchat_core::{AppError, AppResult};

/// A bulk-loaded vector index.
///
/// Holds exactly one vector per chunk, keyed by position. The index is
/// built once and read-only afterwards; the dimension is fixed by the
/// first vector at build time.
#[derive(Debug)]
pub struct FlatIndex {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Build an index from one vector per chunk, in chunk order.
    ///
    /// Positions reported by [`search`](FlatIndex::search) are indices into
    /// this vector sequence, so the caller must keep its chunk sequence in
    /// the same order for the lifetime of the index.
    ///
    /// Fails with [`AppError::EmptyCorpus`] for an empty input and with
    /// [`AppError::DimensionMismatch`] if any vector's length differs from
    /// the first one's.
    pub fn build(vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        let dimensions = match vectors.first() {
            Some(first) => first.len(),
            None => return Err(AppError::EmptyCorpus),
        };

        if dimensions == 0 {
            return Err(AppError::Embedding(
                "embedding provider returned a zero-length vector".to_string(),
            ));
        }

        for vector in &vectors {
            if vector.len() != dimensions {
                return Err(AppError::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
        }

        tracing::debug!(
            "Built flat index: {} vectors, {} dimensions",
            vectors.len(),
            dimensions
        );

        Ok(Self {
            dimensions,
            vectors,
        })
    }

    /// Search for the `k` stored vectors nearest to `query`.
    ///
    /// Returns `(position, squared L2 distance)` pairs in ascending
    /// distance order, ties broken by lower position, truncated to
    /// `min(k, len)`. A query whose length differs from the index
    /// dimension is a configuration error, never a silent truncation.
    pub fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<(usize, f32)>> {
        if query.len() != self.dimensions {
            return Err(AppError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (position, squared_l2(query, vector)))
            .collect();

        // Stable sort over an in-order scan keeps equal distances in
        // ascending position order.
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the index holds no vectors. Always false for a built index.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimension fixed at build time.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Squared Euclidean distance between two equal-length vectors.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_empty_fails() {
        let result = FlatIndex::build(Vec::new());
        assert!(matches!(result, Err(AppError::EmptyCorpus)));
    }

    #[test]
    fn test_build_dimension_mismatch_fails() {
        let result = FlatIndex::build(vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]]);
        assert!(matches!(
            result,
            Err(AppError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_search_orders_by_ascending_distance() {
        let index = FlatIndex::build(vec![
            vec![10.0, 0.0],
            vec![1.0, 0.0],
            vec![5.0, 0.0],
        ])
        .unwrap();

        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = hits.iter().map(|(p, _)| *p).collect();
        assert_eq!(positions, vec![1, 2, 0]);

        assert!(hits[0].1 <= hits[1].1 && hits[1].1 <= hits[2].1);
        assert_eq!(hits[0].1, 1.0);
        assert_eq!(hits[1].1, 25.0);
        assert_eq!(hits[2].1, 100.0);
    }

    #[test]
    fn test_search_k_larger_than_len_returns_all() {
        let index = FlatIndex::build(vec![vec![0.0], vec![1.0]]).unwrap();
        let hits = index.search(&[0.0], 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_no_duplicate_positions() {
        let index = FlatIndex::build(vec![vec![0.0], vec![0.0], vec![0.0]]).unwrap();
        let hits = index.search(&[0.0], 3).unwrap();

        let mut positions: Vec<usize> = hits.iter().map(|(p, _)| *p).collect();
        // Equal distances keep ascending position order
        assert_eq!(positions, vec![0, 1, 2]);
        positions.dedup();
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn test_search_query_dimension_mismatch_fails() {
        let index = FlatIndex::build(vec![vec![1.0, 2.0, 3.0]]).unwrap();
        let result = index.search(&[1.0, 2.0], 1);
        assert!(matches!(
            result,
            Err(AppError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_squared_l2() {
        assert_eq!(squared_l2(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_l2(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
    }
}
