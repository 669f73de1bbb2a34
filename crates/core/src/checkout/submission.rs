//! Payment submissions
//!
//! Everything the payment modal uploads, assembled and checked locally so an
//! invalid submission never reaches the network.

use serde::{Deserialize, Serialize};

use crate::{
    cart::CartLine,
    checkout::{OrderDraft, PaymentProof, ValidationError},
    money::Amount,
    payments::{PaymentMethod, PaymentStatus},
};

/// One line of the cart snapshot stored with a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotItem {
    /// Product name
    pub name: String,

    /// Quantity ordered
    pub quantity: u32,

    /// Unit price
    pub price: Amount,

    /// Product image reference
    #[serde(default)]
    pub image: String,
}

/// The `items` field of a payment: `{"items": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Ordered lines
    pub items: Vec<SnapshotItem>,
}

impl CartSnapshot {
    /// Snapshot the purchasable part of a cart. Zero-quantity lines are left
    /// out.
    pub fn of(lines: &[CartLine]) -> Self {
        Self {
            items: lines
                .iter()
                .filter(|line| line.quantity > 0)
                .map(|line| SnapshotItem {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    price: line.unit_price,
                    image: line.image_ref.clone(),
                })
                .collect(),
        }
    }

    /// Whether nothing was ordered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ price × quantity.
    pub fn subtotal(&self) -> Amount {
        self.items
            .iter()
            .map(|item| item.price * Amount::from(item.quantity))
            .sum()
    }
}

/// Subtotal, shipping and grand total of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of line totals
    pub subtotal: Amount,

    /// Delivery fee
    pub shipping: Amount,

    /// `subtotal + shipping`
    pub total: Amount,
}

impl OrderTotals {
    /// Totals for a cart subtotal and a draft's delivery method.
    pub fn new(subtotal: Amount, draft: &OrderDraft) -> Self {
        let shipping = draft.delivery_method.shipping_cost();

        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

/// A complete, validated payment ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSubmission {
    /// Customer details
    pub draft: OrderDraft,

    /// Ordered lines
    pub snapshot: CartSnapshot,

    /// Computed totals
    pub totals: OrderTotals,

    /// Selected payment method
    pub method: PaymentMethod,

    /// Proof of payment
    pub proof: PaymentProof,

    /// Initial review status
    pub status: PaymentStatus,
}

impl PaymentSubmission {
    /// Assemble a submission from the saved draft and current cart lines.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyCart`] when no line has a positive
    /// quantity.
    pub fn build(
        draft: OrderDraft,
        lines: &[CartLine],
        method: PaymentMethod,
        proof: PaymentProof,
    ) -> Result<Self, ValidationError> {
        let snapshot = CartSnapshot::of(lines);

        if snapshot.is_empty() {
            return Err(ValidationError::EmptyCart);
        }

        let totals = OrderTotals::new(snapshot.subtotal(), &draft);

        Ok(Self {
            draft,
            snapshot,
            totals,
            method,
            proof,
            status: PaymentStatus::Pending,
        })
    }

    /// Text parts of the multipart form, in upload order. The proof file is
    /// sent separately as `payment_proof`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart snapshot cannot be serialized.
    pub fn text_fields(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        Ok(vec![
            ("customer_name", self.draft.name.clone()),
            ("phone", self.draft.phone.clone()),
            ("email", self.draft.email.clone()),
            ("address", self.draft.address.clone()),
            ("items", serde_json::to_string(&self.snapshot)?),
            ("total", self.totals.total.normalize().to_string()),
            ("payment_method", self.method.as_str().to_string()),
            ("status", self.status.as_str().to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{checkout::DeliveryMethod, ids::ProductId};

    use super::*;

    fn draft(delivery_method: DeliveryMethod) -> OrderDraft {
        OrderDraft {
            name: "Sari".to_string(),
            phone: "08123456789".to_string(),
            email: "sari@example.com".to_string(),
            address: "Karawang".to_string(),
            notes: String::new(),
            delivery_method,
        }
    }

    fn proof() -> TestResult<PaymentProof> {
        Ok(PaymentProof::new("bukti.png", "image/png", vec![1, 2, 3])?)
    }

    #[test]
    fn zero_quantity_lines_are_not_ordered() -> TestResult {
        let lines = [
            CartLine::single(ProductId::new(1), "Roti", Decimal::from(10_000), "/roti.png")
                .with_quantity(2),
            CartLine::single(ProductId::new(2), "Bolu", Decimal::from(15_000), "/bolu.png")
                .with_quantity(0),
        ];

        let submission = PaymentSubmission::build(
            draft(DeliveryMethod::Local),
            &lines,
            PaymentMethod::Bank,
            proof()?,
        )?;

        assert_eq!(submission.snapshot.items.len(), 1);
        assert_eq!(submission.totals.total, Decimal::from(30_000));

        Ok(())
    }

    #[test]
    fn empty_cart_cannot_be_submitted() -> TestResult {
        let lines = [CartLine::single(ProductId::new(1), "Roti", Decimal::from(10_000), "")
            .with_quantity(0)];

        let result = PaymentSubmission::build(
            draft(DeliveryMethod::Pickup),
            &lines,
            PaymentMethod::Qris,
            proof()?,
        );

        assert!(
            matches!(result, Err(ValidationError::EmptyCart)),
            "expected empty cart, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn form_fields_match_the_upload_contract() -> TestResult {
        let lines = [CartLine::single(
            ProductId::new(1),
            "Roti",
            Decimal::new(1_000_000, 2),
            "/roti.png",
        )];

        let submission = PaymentSubmission::build(
            draft(DeliveryMethod::Pickup),
            &lines,
            PaymentMethod::Qris,
            proof()?,
        )?;
        let fields = submission.text_fields()?;

        let names: Vec<_> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            [
                "customer_name",
                "phone",
                "email",
                "address",
                "items",
                "total",
                "payment_method",
                "status"
            ]
        );

        let value = |name: &str| {
            fields
                .iter()
                .find(|(field, _)| *field == name)
                .map(|(_, value)| value.clone())
        };

        assert_eq!(value("total").as_deref(), Some("10000"));
        assert_eq!(value("payment_method").as_deref(), Some("qris"));
        assert_eq!(value("status").as_deref(), Some("pending"));

        let items: serde_json::Value = serde_json::from_str(&value("items").ok_or("no items")?)?;
        assert_eq!(items.pointer("/items/0/name"), Some(&"Roti".into()));
        assert_eq!(items.pointer("/items/0/quantity"), Some(&1.into()));

        Ok(())
    }
}
