//! Catalog models.

use buckery::{
    cart::CartLine,
    ids::{ProductId, TypedId},
    money::Amount,
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Category id.
pub type CategoryId = TypedId<Category>;

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Creation time
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Product as listed by `/products/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price in rupiah
    pub price: Amount,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Units in stock
    #[serde(default)]
    pub stock: i64,

    /// Image reference, relative to the backend origin
    #[serde(default)]
    pub image: Option<String>,

    /// Category id
    pub category: CategoryId,

    /// Whether the product is on sale
    #[serde(default = "active")]
    pub is_active: bool,

    /// Creation time
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

fn active() -> bool {
    true
}

impl Product {
    /// One unit of this product as a cart line.
    pub fn to_cart_line(&self) -> CartLine {
        CartLine::single(
            self.id,
            self.name.clone(),
            self.price,
            self.image.clone().unwrap_or_default(),
        )
    }
}
