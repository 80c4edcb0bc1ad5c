use crate::{Error, Product, ProductId, Result};
use ahash::AHashMap;
use serde::Serialize;
use std::sync::Arc;

/// Read-only, load-once product catalog.
///
/// Cloning is cheap: the products and the id index are shared. A catalog is
/// never mutated after construction, so it can be handed to any number of
/// concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<[Product]>,
    index: Arc<AHashMap<ProductId, usize>>,
    dimension: Option<usize>,
}

impl Catalog {
    /// Build a catalog, checking that ids are unique and every embedding
    /// shares one dimension.
    pub fn new(products: Vec<Product>) -> Result<Self> {
        let dimension = products.first().map(|p| p.embedding.dim());
        if dimension == Some(0) {
            return Err(Error::CatalogDimension {
                id: products[0].id.to_string(),
                expected: 1,
                actual: 0,
            });
        }

        let mut index = AHashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if let Some(expected) = dimension {
                if product.embedding.dim() != expected {
                    return Err(Error::CatalogDimension {
                        id: product.id.to_string(),
                        expected,
                        actual: product.embedding.dim(),
                    });
                }
            }
            if index.insert(product.id.clone(), position).is_some() {
                return Err(Error::DuplicateProduct(product.id.to_string()));
            }
        }

        Ok(Self {
            products: products.into(),
            index: Arc::new(index),
            dimension,
        })
    }

    pub fn empty() -> Self {
        Self {
            products: Arc::from(Vec::new()),
            index: Arc::new(AHashMap::new()),
            dimension: None,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Embedding dimension shared by every product; `None` for an empty catalog.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&position| &self.products[position])
    }

    /// Look up an id written as text, e.g. a URL segment. The id whose
    /// canonical text is exactly `raw` wins; `"007"` prefers a string id
    /// `"007"` and falls back to integer id 7.
    pub fn find(&self, raw: &str) -> Option<&Product> {
        let text = ProductId::String(raw.to_string());
        match raw.parse::<u64>() {
            Ok(n) if n.to_string() == raw => self
                .get(&ProductId::Integer(n))
                .or_else(|| self.get(&text)),
            Ok(n) => self.get(&text).or_else(|| self.get(&ProductId::Integer(n))),
            Err(_) => self.get(&text),
        }
    }

    pub fn stats(&self) -> CatalogStats {
        let mut genders: AHashMap<&str, usize> = AHashMap::new();
        let mut article_types: AHashMap<&str, usize> = AHashMap::new();
        let mut brands: AHashMap<&str, usize> = AHashMap::new();

        for product in self.products.iter() {
            *genders.entry(product.gender.as_str()).or_default() += 1;
            *article_types.entry(product.article_type.as_str()).or_default() += 1;
            if let Some(brand) = &product.brand {
                *brands.entry(brand.as_str()).or_default() += 1;
            }
        }

        CatalogStats {
            total: self.len(),
            dimension: self.dimension,
            by_gender: ValueCount::sorted(genders),
            by_article_type: ValueCount::sorted(article_types),
            by_brand: ValueCount::sorted(brands),
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Per-attribute product counts
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogStats {
    pub total: usize,
    pub dimension: Option<usize>,
    pub by_gender: Vec<ValueCount>,
    pub by_article_type: Vec<ValueCount>,
    pub by_brand: Vec<ValueCount>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

impl ValueCount {
    // Descending count, then name, so output is stable across runs
    fn sorted(counts: AHashMap<&str, usize>) -> Vec<ValueCount> {
        let mut values: Vec<ValueCount> = counts
            .into_iter()
            .map(|(value, count)| ValueCount {
                value: value.to_string(),
                count,
            })
            .collect();
        values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        values
    }
}
