//! # Stylx Similarity
//!
//! Retrieval engine for the Stylx garment catalog.
//!
//! ## Features
//!
//! - **Similarity Ranker**: cosine ranking with stable tie-breaking
//! - **Backfill Aggregator**: per-anchor similar sets constrained to the
//!   anchor's gender and article type, topped up from the rest of the catalog
//! - **Providers**: narrow async traits for query embedding and image description
//! - **Retriever**: text or image query in, ranked anchors with similar sets out
//!
//! ## Example
//!
//! ```rust
//! use stylx_core::{Catalog, Product, ProductId, Vector};
//! use stylx_similarity::{build_similar_set, rank};
//!
//! let catalog = Catalog::new(vec![
//!     Product::new(1u64, Vector::new(vec![1.0, 0.0]), "women", "dress"),
//!     Product::new(2u64, Vector::new(vec![0.9, 0.1]), "women", "dress"),
//!     Product::new(3u64, Vector::new(vec![0.0, 1.0]), "men", "shirt"),
//! ]).unwrap();
//!
//! let top = rank(&catalog, &Vector::new(vec![1.0, 0.0]), 2).unwrap();
//! assert_eq!(top[0].product.id, ProductId::Integer(1));
//!
//! let anchor = top[0].product;
//! let similar = build_similar_set(anchor, &catalog, 3).unwrap();
//! assert_eq!(similar.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Query     │────>│  Embedder   │────>│   Ranker    │──> anchors
//! │ (text/img)  │     │ (text→v)    │     │ (cosine)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                      ┌─────────────┐           │
//!                      │  Backfill   │<──────────┘
//!                      │ (per anchor)│
//!                      └─────────────┘
//! ```

pub mod backfill;
pub mod provider;
pub mod rank;
pub mod retriever;

pub use backfill::build_similar_set;
pub use provider::{ImageDescriber, ImageInput, TextEmbedder, SUPPORTED_IMAGE_TYPES};
pub use rank::{rank, RankedResult};
pub use retriever::{
    search, Query, QueryOrigin, Recommendation, RetrievalOutcome, Retriever, RetrieverConfig,
};
