//! Checkout
//!
//! Order data, shipping, payment proof validation and the submission state
//! machine shared by the order-data and payment pages.

mod delivery;
mod draft;
mod flow;
mod proof;
mod submission;

pub use delivery::{DeliveryMethod, UnknownDeliveryMethod, compute_shipping};
pub use draft::{DraftError, DraftStore, OrderDraft, OrderDraftForm, ValidationError};
pub use flow::{CheckoutError, CheckoutFlow, CheckoutState};
pub use proof::{MAX_PROOF_BYTES, PaymentProof, ProofError, ProofType};
pub use submission::{CartSnapshot, OrderTotals, PaymentSubmission, SnapshotItem};
