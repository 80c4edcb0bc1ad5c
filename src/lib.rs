//! # Stylx
//!
//! Garment retrieval: rank a catalog by cosine similarity to a text or
//! image query, then attach to every top result a set of similar items of
//! the same gender and article type, backfilled from the rest of the
//! catalog when too few exist.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! API_KEY=... stylx --data-dir ./data --http-port 8501
//! curl -X POST localhost:8501/search -H 'content-type: application/json' \
//!      -d '{"query": "looking for a blue dress"}'
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use stylx::prelude::*;
//!
//! let catalog = Catalog::new(vec![
//!     Product::new(1u64, Vector::new(vec![1.0, 0.0]), "women", "dress"),
//!     Product::new(2u64, Vector::new(vec![0.9, 0.1]), "women", "dress"),
//!     Product::new(3u64, Vector::new(vec![0.0, 1.0]), "men", "shirt"),
//! ]).unwrap();
//!
//! let query = Vector::new(vec![1.0, 0.0]);
//! let anchors = search(&catalog, &query, 2).unwrap();
//! for anchor in &anchors {
//!     let similar = build_similar_set(anchor.product, &catalog, 3).unwrap();
//!     assert!(similar.iter().all(|s| s.product.id != anchor.product.id));
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `stylx-core` - Products, catalog, vectors, attribute and color filters
//! - `stylx-similarity` - Ranker, backfill, provider traits, retriever
//! - `stylx-storage` - Catalog loading from JSON / JSON Lines files
//! - `stylx-api` - REST API and the Gemini provider client

// Re-export core types
pub use stylx_core::{
    extract_color, filter_by_attributes, filter_by_color_keyword, AttributeFilter, Catalog,
    CatalogStats, Color, ColorFilter, Error, Filter, Product, ProductId, Result, Vector,
};

// Re-export the engine
pub use stylx_similarity::{
    build_similar_set, rank, search, ImageDescriber, ImageInput, Query, QueryOrigin, RankedResult,
    Recommendation, RetrievalOutcome, Retriever, RetrieverConfig, TextEmbedder,
};

// Re-export storage
pub use stylx_storage::CatalogLoader;

// Re-export API
pub use stylx_api::{ApiError, GeminiClient, GeminiConfig, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_similar_set, rank, search, Catalog, CatalogLoader, Color, Error, ImageDescriber,
        ImageInput, Product, ProductId, Query, RankedResult, Result, Retriever, RetrieverConfig,
        TextEmbedder, Vector,
    };
}
