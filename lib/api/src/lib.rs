//! # Stylx API
//!
//! HTTP surface and external providers for the Stylx retrieval engine.
//!
//! - [`RestApi`] - JSON endpoints for text and image search, similar items
//!   and catalog statistics (actix-web)
//! - [`GeminiClient`] - query embeddings and garment image descriptions
//!   from the Generative Language API

pub mod gemini;
pub mod rest;

pub use gemini::{GeminiClient, GeminiConfig};
pub use rest::{ApiError, RestApi};
