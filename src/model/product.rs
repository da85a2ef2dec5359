/// Catalog records as the storefront sees them.
///
/// # Actor Framework
/// [`CatalogProduct`] implements [`ActorEntity`](storefront_actor::ActorEntity) so the
/// in-process catalog can be served by a [`ResourceActor`](storefront_actor::ResourceActor).
/// See [`crate::catalog_actor`] for the create/update/action semantics.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Catalog identifier, e.g. `CPU001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A product record. Prices are whole VND.
///
/// The cart stores a snapshot of this record and never changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,
    pub stock: u32,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl CatalogProduct {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: u64, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            original_price: None,
            stock,
            image_urls: Vec::new(),
            category: String::new(),
            brand: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Percentage off the original price, if the product is discounted.
    pub fn discount_percent(&self) -> Option<u8> {
        let original = self.original_price?;
        if original <= self.price || original == 0 {
            return None;
        }
        Some((((original - self.price) * 100) / original) as u8)
    }
}

/// Payload for seeding the catalog. The id is chosen by the caller.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    pub original_price: Option<u64>,
    pub stock: u32,
    pub image_urls: Vec<String>,
    pub category: String,
    pub brand: Option<String>,
    pub tags: BTreeSet<String>,
}

impl ProductCreate {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: u64,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            original_price: None,
            stock,
            image_urls: Vec::new(),
            category: category.into(),
            brand: None,
            tags: BTreeSet::new(),
        }
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn original_price(mut self, price: u64) -> Self {
        self.original_price = Some(price);
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_urls.push(url.into());
        self
    }
}

/// Partial update. `None` leaves the field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub price: Option<u64>,
    pub original_price: Option<u64>,
    pub stock: Option<u32>,
}

/// Listing filter. Every set criterion must match.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    /// Case-insensitive substring of the name or brand.
    pub query: Option<String>,
    pub in_stock_only: bool,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl ProductFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, product: &CatalogProduct) -> bool {
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !product.tags.contains(tag) {
                return false;
            }
        }
        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&query);
            let in_brand = product
                .brand
                .as_deref()
                .is_some_and(|b| b.to_lowercase().contains(&query));
            if !in_name && !in_brand {
                return false;
            }
        }
        !self.in_stock_only || product.in_stock()
    }
}

/// One page of a filtered listing. `total` counts every match, not just this page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<CatalogProduct>,
    pub total: usize,
}
