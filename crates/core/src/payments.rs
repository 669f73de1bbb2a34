//! Payments

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the customer paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Manual bank transfer.
    #[default]
    Bank,

    /// QRIS code scan.
    Qris,
}

impl PaymentMethod {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Qris => "qris",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bank => "Transfer Bank",
            Self::Qris => "QRIS",
        }
    }
}

/// Review state of a submitted payment. Only back-office review moves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Waiting for review.
    #[default]
    Pending,

    /// Proof accepted.
    Confirmed,

    /// Proof refused.
    Rejected,
}

/// Raised for a status change the review process does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("payment cannot move from {from} to {to}")]
pub struct InvalidTransition {
    /// Current status
    pub from: PaymentStatus,

    /// Requested status
    pub to: PaymentStatus,
}

impl PaymentStatus {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }

    /// Badge text shown in order lists.
    pub fn badge(self) -> &'static str {
        match self {
            Self::Pending => "Menunggu Konfirmasi",
            Self::Confirmed => "Dikonfirmasi",
            Self::Rejected => "Ditolak",
        }
    }

    /// Whether review is finished.
    pub fn is_final(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Check a review decision: only pending payments can be confirmed or
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] for any other change.
    pub fn transition(self, to: Self) -> Result<Self, InvalidTransition> {
        match (self, to) {
            (Self::Pending, Self::Confirmed | Self::Rejected) => Ok(to),
            (from, to) => Err(InvalidTransition { from, to }),
        }
    }
}

macro_rules! wire_enum {
    ($ty:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownValue;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(UnknownValue(value.to_string())),
                }
            }
        }
    };
}

/// Raised when parsing an unknown method or status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

wire_enum!(PaymentMethod { Bank => "bank", Qris => "qris" });
wire_enum!(PaymentStatus { Pending => "pending", Confirmed => "confirmed", Rejected => "rejected" });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_be_confirmed_or_rejected() {
        assert_eq!(
            PaymentStatus::Pending.transition(PaymentStatus::Confirmed),
            Ok(PaymentStatus::Confirmed)
        );
        assert_eq!(
            PaymentStatus::Pending.transition(PaymentStatus::Rejected),
            Ok(PaymentStatus::Rejected)
        );
    }

    #[test]
    fn reviewed_payments_stay_reviewed() {
        let result = PaymentStatus::Confirmed.transition(PaymentStatus::Rejected);

        assert!(
            matches!(result, Err(InvalidTransition { .. })),
            "expected invalid transition, got {result:?}"
        );
        assert!(PaymentStatus::Pending.transition(PaymentStatus::Pending).is_err());
    }

    #[test]
    fn parses_cli_values() {
        assert_eq!("QRIS".parse::<PaymentMethod>(), Ok(PaymentMethod::Qris));
        assert_eq!(" confirmed ".parse::<PaymentStatus>(), Ok(PaymentStatus::Confirmed));
        assert!("cash".parse::<PaymentMethod>().is_err());
    }
}
