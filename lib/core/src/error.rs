use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Image attribute extraction returned an empty description")]
    AttributeExtractionEmpty,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Product {id} has embedding dimension {actual}, catalog dimension is {expected}")]
    CatalogDimension {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider error: {message}")]
    ProviderStatus { status: u16, message: String },

    #[error("Provider unreachable: {0}")]
    ProviderUnreachable(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether retrying the same provider call may succeed: rate limits,
    /// server errors and transport failures.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::ProviderStatus { status, .. } => *status == 429 || (500..600).contains(status),
            Error::ProviderUnreachable(_) => true,
            _ => false,
        }
    }
}
