//! Similar-item sets with attribute-constrained backfill
//!
//! Items sharing the anchor's gender and article type come first, ranked by
//! similarity to the anchor. When there are fewer of them than requested,
//! the shortfall is filled from the rest of the catalog.

use crate::rank::{rank, RankedResult};
use ahash::AHashSet;
use stylx_core::{filter_by_attributes, Catalog, Product, ProductId, Result};
use tracing::debug;

/// Build up to `k` products similar to `anchor`.
///
/// If no other product shares the anchor's gender and article type, this
/// falls back to an unconstrained ranking over the whole catalog, and that
/// fallback may return the anchor itself. On every other path the anchor is
/// excluded and no id is returned twice.
///
/// # Errors
/// [`stylx_core::Error::DimensionMismatch`] if the anchor embedding does
/// not match the catalog dimension.
pub fn build_similar_set<'a>(
    anchor: &Product,
    catalog: &'a Catalog,
    k: usize,
) -> Result<Vec<RankedResult<'a>>> {
    let strict = filter_by_attributes(catalog, &anchor.id, &anchor.gender, &anchor.article_type);

    if strict.is_empty() {
        debug!(
            anchor = %anchor.id,
            gender = %anchor.gender,
            article_type = %anchor.article_type,
            "no attribute matches, ranking whole catalog"
        );
        return rank(catalog, &anchor.embedding, k);
    }

    let mut similar = rank(strict.iter().copied(), &anchor.embedding, k)?;
    if strict.len() >= k {
        return Ok(similar);
    }

    let backfill_count = k - strict.len();
    let taken: AHashSet<&ProductId> = strict.iter().map(|p| &p.id).collect();
    let remainder = catalog
        .iter()
        .filter(|p| p.id != anchor.id && !taken.contains(&p.id));
    let backfill = rank(remainder, &anchor.embedding, backfill_count)?;

    debug!(
        anchor = %anchor.id,
        strict = strict.len(),
        backfilled = backfill.len(),
        "backfilled similar set"
    );

    // Constrained matches always precede backfilled ones
    similar.extend(backfill);
    Ok(similar)
}
