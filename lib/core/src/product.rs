use serde::{Deserialize, Serialize};
use crate::vector::Vector;

/// Catalog identifier. Source catalogs use integer ids; string ids are
/// accepted for hand-built catalogs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Integer(u64),
    String(String),
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductId::Integer(i) => write!(f, "{}", i),
            ProductId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for ProductId {
    fn from(i: u64) -> Self {
        ProductId::Integer(i)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        ProductId::String(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId::String(s.to_string())
    }
}

/// A garment in the catalog with its precomputed embedding
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "embeddings")]
    pub embedding: Vector,
    pub gender: String,
    #[serde(rename = "articleType", alias = "article_type")]
    pub article_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "image_desc")]
    pub description: String,
    #[serde(default, alias = "image_url")]
    pub image_ref: String,
    #[serde(default, alias = "myntra_product_url")]
    pub purchase_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl Product {
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        embedding: Vector,
        gender: impl Into<String>,
        article_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            embedding,
            gender: gender.into(),
            article_type: article_type.into(),
            name: String::new(),
            description: String::new(),
            image_ref: String::new(),
            purchase_url: String::new(),
            brand: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_purchase_url(mut self, url: impl Into<String>) -> Self {
        self.purchase_url = url.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }
}
