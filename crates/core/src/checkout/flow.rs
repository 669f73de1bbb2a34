//! Checkout flow
//!
//! `NoDraft → DraftSaved → Submitting → Submitted`, with `Submitting →
//! DraftSaved` when the upload fails. Only the last step touches the server.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{CartError, CartStore},
    checkout::{
        DraftError, DraftStore, OrderDraft, OrderDraftForm, OrderTotals, PaymentProof,
        PaymentSubmission, ProofError, ValidationError,
    },
    payments::PaymentMethod,
};

/// Where the visitor is in checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutState {
    /// No order data has been saved.
    #[default]
    NoDraft,

    /// Order data saved, payment not yet sent.
    DraftSaved(OrderDraft),

    /// Payment upload in flight.
    Submitting(OrderDraft),

    /// Payment accepted by the server.
    Submitted,
}

/// Checkout failures. None of them has touched the server.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The payment step was reached without saved order data.
    #[error("order data has not been filled in")]
    NoDraft,

    /// A payment upload is already running.
    #[error("payment is already being submitted")]
    InProgress,

    /// The order-data form or the cart is incomplete.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The proof file was refused.
    #[error(transparent)]
    Proof(#[from] ProofError),

    /// The order data could not be saved.
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// The cart could not be cleared.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Drives a visitor from order data to a submitted payment.
#[derive(Debug)]
pub struct CheckoutFlow {
    cart: Arc<CartStore>,
    drafts: DraftStore,
    state: Mutex<CheckoutState>,
}

impl CheckoutFlow {
    /// Start from whatever order data is saved.
    pub fn new(cart: Arc<CartStore>, drafts: DraftStore) -> Self {
        let flow = Self {
            cart,
            drafts,
            state: Mutex::new(CheckoutState::NoDraft),
        };
        flow.resume();

        flow
    }

    /// Re-read the saved order data, as a page load does.
    pub fn resume(&self) -> CheckoutState {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if !matches!(*state, CheckoutState::Submitting(_)) {
            *state = match self.drafts.load() {
                Some(draft) => CheckoutState::DraftSaved(draft),
                None => CheckoutState::NoDraft,
            };
        }

        state.clone()
    }

    /// Current state.
    pub fn state(&self) -> CheckoutState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Saved order data, if any.
    pub fn draft(&self) -> Option<OrderDraft> {
        match self.state() {
            CheckoutState::DraftSaved(draft) | CheckoutState::Submitting(draft) => Some(draft),
            CheckoutState::NoDraft | CheckoutState::Submitted => self.drafts.load(),
        }
    }

    /// Totals for the current cart and saved delivery method.
    pub fn totals(&self) -> Option<OrderTotals> {
        let draft = self.draft()?;

        Some(OrderTotals::new(self.cart.subtotal(), &draft))
    }

    /// Validate the order-data form and save it.
    ///
    /// # Errors
    ///
    /// Returns a validation error without saving anything, or a storage
    /// error if the draft could not be written.
    pub fn save_draft(&self, form: &OrderDraftForm) -> Result<OrderDraft, CheckoutError> {
        let draft = form.validate()?;

        self.drafts.save(&draft)?;
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) =
            CheckoutState::DraftSaved(draft.clone());

        debug!(delivery = %draft.delivery_method, "order data saved");

        Ok(draft)
    }

    /// Validate everything the payment modal collected and enter
    /// `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NoDraft`] without saved order data,
    /// [`CheckoutError::InProgress`] while another upload runs, and proof or
    /// validation errors for bad input. The state is unchanged on error.
    pub fn begin_submission(
        &self,
        method: PaymentMethod,
        proof: Option<PaymentProof>,
    ) -> Result<PaymentSubmission, CheckoutError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let draft = match &*state {
            CheckoutState::DraftSaved(draft) => draft.clone(),
            CheckoutState::Submitting(_) => return Err(CheckoutError::InProgress),
            CheckoutState::NoDraft | CheckoutState::Submitted => {
                self.drafts.load().ok_or(CheckoutError::NoDraft)?
            }
        };

        let proof = proof.ok_or(ProofError::Missing)?;
        let submission =
            PaymentSubmission::build(draft.clone(), &self.cart.lines(), method, proof)?;

        *state = CheckoutState::Submitting(draft);

        Ok(submission)
    }

    /// The upload failed: return to `DraftSaved` so the visitor can retry.
    pub fn submission_failed(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let CheckoutState::Submitting(draft) = &*state {
            *state = CheckoutState::DraftSaved(draft.clone());
        }
    }

    /// The server accepted the payment: empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be cleared. The payment has
    /// been recorded regardless.
    pub fn submission_succeeded(&self) -> Result<(), CheckoutError> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = CheckoutState::Submitted;

        info!("payment submitted");

        self.cart.clear_cart()?;

        Ok(())
    }
}
