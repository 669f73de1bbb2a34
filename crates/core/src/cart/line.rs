//! Cart Lines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ids::ProductId, money::Amount};

/// One product entry in the cart.
///
/// Serialized with the field names the storefront has always used in local
/// storage: `{id, name, price, quantity, image}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog product id, unique within a cart
    #[serde(rename = "id")]
    pub product_id: ProductId,

    /// Product name at the time it was added
    pub name: String,

    /// Unit price in rupiah
    #[serde(rename = "price")]
    pub unit_price: Amount,

    /// Quantity, zero allowed until the line is removed
    pub quantity: u32,

    /// Product image reference
    #[serde(rename = "image", default)]
    pub image_ref: String,
}

impl CartLine {
    /// A line with quantity 1, as created by an "add to cart" button.
    pub fn single(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Amount,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity: 1,
            image_ref: image_ref.into(),
        }
    }

    /// Same line with a different quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// `unit_price × quantity`.
    pub fn line_total(&self) -> Amount {
        self.unit_price * Decimal::from(self.quantity)
    }
}
