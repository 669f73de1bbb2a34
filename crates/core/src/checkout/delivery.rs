//! Delivery

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Amount;

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// Customer collects from the shop.
    Pickup,

    /// Shop courier, Karawang only.
    Local,

    /// Ride-hailing food delivery.
    Gojek,

    /// Long-distance parcel courier.
    Courier,
}

impl DeliveryMethod {
    /// Every method, in the order the order-data form lists them.
    pub const ALL: [Self; 4] = [Self::Pickup, Self::Local, Self::Gojek, Self::Courier];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Local => "local",
            Self::Gojek => "gojek",
            Self::Courier => "courier",
        }
    }

    /// Option label on the order-data form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pickup => "Pick Up (ambil sendiri)",
            Self::Local => "Antar (hanya daerah karawang)",
            Self::Gojek => "Go-Jek, Grab, Shopee food",
            Self::Courier => "Jarak jauh (JNE, JNT, Paxel)",
        }
    }

    /// Flat shipping fee in rupiah.
    pub fn shipping_cost(self) -> Amount {
        match self {
            Self::Pickup => Decimal::ZERO,
            Self::Local => Decimal::from(10_000),
            Self::Gojek => Decimal::from(15_000),
            Self::Courier => Decimal::from(20_000),
        }
    }
}

/// Shipping fee for a delivery method given as its wire string.
///
/// # Errors
///
/// Returns [`UnknownDeliveryMethod`] when the string names no method.
pub fn compute_shipping(method: &str) -> Result<Amount, UnknownDeliveryMethod> {
    method.parse::<DeliveryMethod>().map(DeliveryMethod::shipping_cost)
}

impl Display for DeliveryMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unknown delivery method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown delivery method: {0}")]
pub struct UnknownDeliveryMethod(pub String);

impl FromStr for DeliveryMethod {
    type Err = UnknownDeliveryMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value)
            .ok_or_else(|| UnknownDeliveryMethod(value.to_string()))
    }
}
