//! # Stylx Core
//!
//! Core library for the Stylx garment retrieval engine.
//!
//! This crate provides the fundamental data structures:
//!
//! - [`Vector`] - Dense embedding with cosine similarity
//! - [`Product`] - A catalog garment with its embedding and attributes
//! - [`Catalog`] - Load-once, read-only, cheaply shared product collection
//! - [`filter`] - Gender/article-type and color-keyword filters
//!
//! ## Example
//!
//! ```rust
//! use stylx_core::{Catalog, Product, Vector, filter_by_color_keyword};
//!
//! let catalog = Catalog::new(vec![
//!     Product::new(1u64, Vector::new(vec![1.0, 0.0]), "Women", "Dresses")
//!         .with_description("Color: Blue, Pattern: Floral"),
//!     Product::new(2u64, Vector::new(vec![0.0, 1.0]), "Men", "Shirts")
//!         .with_description("Color: White, Pattern: Solid"),
//! ]).unwrap();
//!
//! let blue = filter_by_color_keyword(&catalog, "a blue summer dress");
//! assert_eq!(blue.len(), 1);
//! ```

pub mod catalog;
pub mod error;
pub mod filter;
pub mod product;
pub mod vector;

pub use catalog::{Catalog, CatalogStats, ValueCount};
pub use error::{Error, Result};
pub use filter::{
    extract_color, filter_by_attributes, filter_by_color_keyword, AttributeFilter, Color,
    ColorFilter, Filter,
};
pub use product::{Product, ProductId};
pub use vector::Vector;
