use serde::{Deserialize, Serialize};

/// A dense embedding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f32 {
        // Two accumulators keep the loop pipelined on long embeddings
        let mut even = 0.0f32;
        let mut odd = 0.0f32;
        let pairs = self.data.chunks_exact(2).zip(other.data.chunks_exact(2));
        for (a, b) in pairs {
            even += a[0] * b[0];
            odd += a[1] * b[1];
        }
        let tail = self.data.len().min(other.data.len()) & !1;
        let rest: f32 = self.data[tail..]
            .iter()
            .zip(&other.data[tail..])
            .map(|(a, b)| a * b)
            .sum();
        even + odd + rest
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Cosine similarity in [-1, 1].
    ///
    /// Returns 0.0 when either vector has zero norm. Callers are expected to
    /// check dimensions first; mismatched lengths also score 0.0.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        (self.dot(other) / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}
