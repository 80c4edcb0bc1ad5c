//! Retrieval orchestration
//!
//! Turns a text or image query into ranked anchors, each with its own
//! backfilled similar set.

use crate::backfill::build_similar_set;
use crate::provider::{ImageDescriber, ImageInput, TextEmbedder};
use crate::rank::{rank, RankedResult};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use stylx_core::{
    extract_color, filter_by_color_keyword, Catalog, Color, Error, Product, Result, Vector,
};
use tracing::{debug, info, warn};

/// Configuration for a retriever
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Number of anchors returned per query
    pub top_n: usize,
    /// Size of each anchor's similar set
    pub similar_count: usize,
    /// Narrow text queries by the color they mention
    pub color_filter_text: bool,
    /// Narrow image queries by the color in their extracted description
    pub color_filter_image: bool,
    /// Embedding calls per query before giving up
    pub embed_attempts: usize,
    /// Wait before the first retry; doubles on each further retry
    pub retry_backoff: Duration,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            similar_count: 5,
            color_filter_text: true,
            color_filter_image: false,
            embed_attempts: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Query {
    Text(String),
    Image(ImageInput),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryOrigin {
    Text,
    Image,
}

/// A top result and the items shown alongside it
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation<'a> {
    pub anchor: RankedResult<'a>,
    pub similar: Vec<RankedResult<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RetrievalOutcome<'a> {
    pub origin: QueryOrigin,
    /// The text that was embedded; for image queries, the extracted description
    pub query_text: String,
    /// Color the candidates were narrowed to, if any
    pub color: Option<Color>,
    pub recommendations: Vec<Recommendation<'a>>,
}

/// Rank a candidate set against a query vector
pub fn search<'a, I>(candidates: I, query: &Vector, top_n: usize) -> Result<Vec<RankedResult<'a>>>
where
    I: IntoIterator<Item = &'a Product>,
{
    rank(candidates, query, top_n)
}

/// Query pipeline over one catalog snapshot
pub struct Retriever {
    catalog: Catalog,
    embedder: Arc<dyn TextEmbedder>,
    describer: Arc<dyn ImageDescriber>,
    config: RetrieverConfig,
}

impl Retriever {
    pub fn new(
        catalog: Catalog,
        embedder: Arc<dyn TextEmbedder>,
        describer: Arc<dyn ImageDescriber>,
        config: RetrieverConfig,
    ) -> Result<Self> {
        if config.embed_attempts == 0 {
            return Err(Error::InvalidConfig(
                "embed_attempts must be at least 1".to_string(),
            ));
        }

        info!(
            products = catalog.len(),
            dimension = ?catalog.dimension(),
            embedder = embedder.name(),
            describer = describer.name(),
            "retriever ready"
        );

        Ok(Self {
            catalog,
            embedder,
            describer,
            config,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Run a full query: describe (images), embed, rank, build similar sets.
    ///
    /// # Errors
    /// - [`Error::InvalidQuery`] for blank text
    /// - [`Error::AttributeExtractionEmpty`] when an image yields no description
    /// - [`Error::EmbeddingUnavailable`] when every embedding attempt fails
    /// - [`Error::DimensionMismatch`] when the embedder disagrees with the catalog
    pub async fn retrieve(&self, query: Query) -> Result<RetrievalOutcome<'_>> {
        let (origin, query_text) = match query {
            Query::Text(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    return Err(Error::InvalidQuery("search text is empty".to_string()));
                }
                (QueryOrigin::Text, text)
            }
            Query::Image(image) => (QueryOrigin::Image, self.describe_image(&image).await?),
        };

        let apply_color_filter = match origin {
            QueryOrigin::Text => self.config.color_filter_text,
            QueryOrigin::Image => self.config.color_filter_image,
        };

        let query_vector = self.embed_query(&query_text).await?;
        let recommendations = self.recommend(&query_vector, &query_text, apply_color_filter)?;

        Ok(RetrievalOutcome {
            origin,
            color: if apply_color_filter {
                extract_color(&query_text)
            } else {
                None
            },
            query_text,
            recommendations,
        })
    }

    /// Rank anchors for an already-embedded query and attach similar sets.
    ///
    /// With `apply_color_filter`, anchors are drawn only from products whose
    /// description carries the color named in `query_text`. Similar sets are
    /// always built over the full catalog.
    pub fn recommend(
        &self,
        query_vector: &Vector,
        query_text: &str,
        apply_color_filter: bool,
    ) -> Result<Vec<Recommendation<'_>>> {
        self.check_dimension(query_vector)?;

        let candidates = if apply_color_filter {
            filter_by_color_keyword(&self.catalog, query_text)
        } else {
            self.catalog.iter().collect()
        };
        debug!(
            candidates = candidates.len(),
            color_filter = apply_color_filter,
            "ranking anchors"
        );

        let anchors = search(candidates, query_vector, self.config.top_n)?;

        anchors
            .into_par_iter()
            .map(|anchor| -> Result<Recommendation<'_>> {
                let similar =
                    build_similar_set(anchor.product, &self.catalog, self.config.similar_count)?;
                Ok(Recommendation { anchor, similar })
            })
            .collect()
    }

    /// Similar set for a catalog product, looked up by its id as text
    pub fn similar_to(&self, id: &str) -> Result<Vec<RankedResult<'_>>> {
        let product = self
            .catalog
            .find(id)
            .ok_or_else(|| Error::ProductNotFound(id.to_string()))?;
        build_similar_set(product, &self.catalog, self.config.similar_count)
    }

    async fn describe_image(&self, image: &ImageInput) -> Result<String> {
        match self.describer.describe(image).await {
            Ok(description) if !description.trim().is_empty() => {
                let description = description.trim().to_string();
                debug!(%description, "image described");
                Ok(description)
            }
            Ok(_) => {
                warn!(describer = self.describer.name(), "image description came back empty");
                Err(Error::AttributeExtractionEmpty)
            }
            Err(e) => {
                warn!(describer = self.describer.name(), error = %e, "image description failed");
                Err(Error::AttributeExtractionEmpty)
            }
        }
    }

    /// Embed the query, retrying transient provider failures with backoff.
    async fn embed_query(&self, text: &str) -> Result<Vector> {
        let max_attempts = self.config.embed_attempts;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let error = match self.embedder.embed(text).await {
                Ok(vector) if !vector.is_empty() => {
                    self.check_dimension(&vector)?;
                    return Ok(vector);
                }
                Ok(_) => Error::Provider("provider returned an empty vector".to_string()),
                Err(e) => e,
            };

            if !error.is_transient() || attempt >= max_attempts {
                warn!(
                    embedder = self.embedder.name(),
                    attempt,
                    max_attempts,
                    error = %error,
                    "query embedding failed"
                );
                return Err(Error::EmbeddingUnavailable(error.to_string()));
            }

            let delay = self.retry_backoff(attempt);
            warn!(
                embedder = self.embedder.name(),
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "query embedding failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn retry_backoff(&self, attempt: usize) -> Duration {
        let doublings = attempt.saturating_sub(1).min(5) as u32;
        self.config.retry_backoff * (1 << doublings)
    }

    fn check_dimension(&self, query_vector: &Vector) -> Result<()> {
        match self.catalog.dimension() {
            Some(expected) if expected != query_vector.dim() => Err(Error::DimensionMismatch {
                expected,
                actual: query_vector.dim(),
            }),
            _ => Ok(()),
        }
    }
}
