use std::collections::HashMap;

use crate::errors::PipelineError;

/// One scored training sample from a `classify` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub label: u32,
    pub distance: f32,
}

/// The outcome of classifying one feature vector.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Majority label among the k nearest training samples.
    pub label: u32,
    /// The k nearest training samples, closest first.
    pub neighbors: Vec<Neighbor>,
}

impl Classification {
    /// Distance to the single nearest training sample.
    pub fn nearest_distance(&self) -> f32 {
        self.neighbors.first().map_or(0.0, |n| n.distance)
    }
}

/// k-nearest-neighbor classifier over flattened pixel features.
///
/// Holds the full fit set; every stored vector has the length recorded as
/// the model dimension. Classification is read-only, so a trained model can
/// be shared behind `&self` as long as nobody retrains it.
#[derive(Debug, Default)]
pub struct KnnModel {
    samples: Vec<Vec<f32>>,
    labels: Vec<u32>,
    dimension: usize,
}

impl KnnModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored training samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Store the fit set.
    ///
    /// Vectors and labels must pair up one-to-one and every vector must
    /// have the same length; a non-empty set is required.
    pub fn train(&mut self, vectors: Vec<Vec<f32>>, labels: Vec<u32>) -> Result<(), PipelineError> {
        if vectors.len() != labels.len() {
            return Err(PipelineError::CountMismatch {
                vectors: vectors.len(),
                labels: labels.len(),
            });
        }
        if vectors.is_empty() {
            return Err(PipelineError::EmptyModel);
        }

        let dimension = vectors[0].len();
        for vector in &vectors {
            if vector.len() != dimension {
                return Err(PipelineError::ShapeMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
        }

        self.samples = vectors;
        self.labels = labels;
        self.dimension = dimension;
        Ok(())
    }

    /// Label a query vector by majority vote among its `k` nearest training
    /// samples, by plain Euclidean distance.
    ///
    /// Requires `1 <= k <= self.len()`. When two labels tie in vote count,
    /// the label owning the single nearest neighbor among the tied
    /// candidates wins.
    pub fn classify(&self, vector: &[f32], k: usize) -> Result<Classification, PipelineError> {
        if self.samples.is_empty() {
            return Err(PipelineError::EmptyModel);
        }
        if vector.len() != self.dimension {
            return Err(PipelineError::ShapeMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if k == 0 || k > self.samples.len() {
            return Err(PipelineError::InvalidNeighborCount {
                k,
                samples: self.samples.len(),
            });
        }

        let mut scored: Vec<Neighbor> = self
            .samples
            .iter()
            .zip(&self.labels)
            .map(|(sample, &label)| Neighbor {
                label,
                distance: euclidean(vector, sample),
            })
            .collect();
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k);

        let mut votes: HashMap<u32, usize> = HashMap::new();
        for neighbor in &scored {
            *votes.entry(neighbor.label).or_insert(0) += 1;
        }
        let top_votes = votes.values().copied().max().unwrap_or(0);

        // Neighbors are sorted by distance, so the first label holding the
        // top vote count is the closest of any tied candidates.
        let label = scored
            .iter()
            .find(|n| votes.get(&n.label).copied() == Some(top_votes))
            .map_or(0, |n| n.label);

        Ok(Classification {
            label,
            neighbors: scored,
        })
    }
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
