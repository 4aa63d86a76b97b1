//! Cache types for catalogue responses.
//!
//! User and terminal data is never cached; only products, categories and
//! boutiques are.

use wardrobe_core::{BoutiqueId, ProductId};

use crate::directus::types::{Boutique, Category, Product, ProductQuery, ProductSummary};

/// Cache key for catalogue reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products(ProductQuery),
    Categories,
    Boutique(BoutiqueId),
    Boutiques,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<ProductSummary>),
    Categories(Vec<Category>),
    Boutique(Box<Boutique>),
    Boutiques(Vec<Boutique>),
}
