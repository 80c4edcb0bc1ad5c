//! Cosine similarity ranking
//!
//! Scores candidates against a query vector and orders them by descending
//! similarity. Ties keep their input order, so near-duplicate garments
//! always come back in catalog order.

use rayon::prelude::*;
use serde::Serialize;
use stylx_core::{Error, Product, Result, Vector};

/// Candidate sets at least this large are scored on the rayon pool
const PARALLEL_SCORING_THRESHOLD: usize = 4096;

/// A product with its cosine similarity to the query
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RankedResult<'a> {
    pub product: &'a Product,
    /// Cosine similarity in [-1, 1]
    pub score: f32,
}

impl RankedResult<'_> {
    /// Get the product ID as a string
    pub fn id_string(&self) -> String {
        self.product.id.to_string()
    }
}

/// Rank `candidates` by cosine similarity to `query`, keeping the best `top_n`.
///
/// # Returns
/// Up to `top_n` results, highest score first. An empty candidate set gives
/// an empty result; `top_n` larger than the candidate count returns every
/// candidate.
///
/// # Errors
/// [`Error::DimensionMismatch`] if any candidate embedding length differs
/// from the query length.
pub fn rank<'a, I>(candidates: I, query: &Vector, top_n: usize) -> Result<Vec<RankedResult<'a>>>
where
    I: IntoIterator<Item = &'a Product>,
{
    let candidates: Vec<&'a Product> = candidates.into_iter().collect();
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    if let Some(product) = candidates
        .iter()
        .find(|p| p.embedding.dim() != query.dim())
    {
        return Err(Error::DimensionMismatch {
            expected: product.embedding.dim(),
            actual: query.dim(),
        });
    }

    let score = |product: &'a Product| RankedResult {
        product,
        score: product.embedding.cosine_similarity(query),
    };

    // Both paths collect in input order, which the stable sort relies on
    let mut results: Vec<RankedResult<'a>> = if candidates.len() >= PARALLEL_SCORING_THRESHOLD {
        candidates.par_iter().map(|p| score(*p)).collect()
    } else {
        candidates.iter().map(|p| score(*p)).collect()
    };

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(top_n);
    Ok(results)
}
