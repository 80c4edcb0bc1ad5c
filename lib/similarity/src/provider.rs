//! Query-side collaborators
//!
//! The engine never computes embeddings or looks at pixels itself. It asks
//! a [`TextEmbedder`] for query vectors and an [`ImageDescriber`] for a
//! textual description of an uploaded garment photo.

use async_trait::async_trait;
use bytes::Bytes;
use stylx_core::{Error, Result, Vector};

/// Image types accepted for image queries
pub const SUPPORTED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Turns query text into a vector in the catalog's embedding space
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed `text`. The vector must have the catalog's dimension.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Provider name, for logs
    fn name(&self) -> &str;
}

/// Produces a free-text attribute description of a garment image
#[async_trait]
pub trait ImageDescriber: Send + Sync {
    async fn describe(&self, image: &ImageInput) -> Result<String>;

    /// Provider name, for logs
    fn name(&self) -> &str;
}

/// An uploaded query image
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl ImageInput {
    /// Wrap image bytes, rejecting empty uploads and unsupported types.
    ///
    /// `image/jpg` is accepted as an alias of `image/jpeg`.
    pub fn new(bytes: impl Into<Bytes>, mime_type: &str) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::InvalidQuery("empty image upload".to_string()));
        }

        let mime_type = match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/jpg" => "image/jpeg".to_string(),
            other => other.to_string(),
        };
        if !SUPPORTED_IMAGE_TYPES.contains(&mime_type.as_str()) {
            return Err(Error::InvalidQuery(format!(
                "unsupported image type {mime_type}, expected one of {}",
                SUPPORTED_IMAGE_TYPES.join(", ")
            )));
        }

        Ok(Self { bytes, mime_type })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
