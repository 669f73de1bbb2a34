//! Payment.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use buckery::{
    cart::{CartLine, CartStore},
    checkout::{CheckoutFlow, CheckoutState, OrderDraft, OrderTotals, PaymentProof, ProofError},
    payments::PaymentMethod,
    routes::Route,
};
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::{
    context::AppContext,
    navigation::Navigator,
    pages::{ErrorBanner, UserMessage},
    payments::PaymentsService,
};

/// How long the success notification stays up before moving on to the
/// order list.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// Payment upload dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentModal {
    /// Chosen payment method
    pub method: PaymentMethod,

    /// Validated proof file
    pub proof: Option<PaymentProof>,

    /// Error shown inside the dialog
    pub error: Option<String>,
}

/// Success message shown after upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Order label, e.g. `#BK-0007`
    pub order: String,

    /// Text shown to the customer
    pub message: String,
}

#[derive(Debug, Default)]
struct PaymentState {
    modal: Option<PaymentModal>,
    uploading: bool,
    notification: Option<Notification>,
}

/// Order summary, payment dialog and the success notification.
pub struct PaymentPage {
    checkout: Arc<CheckoutFlow>,
    cart: Arc<CartStore>,
    payments: Arc<dyn PaymentsService>,
    navigator: Arc<dyn Navigator>,
    banner: ErrorBanner,
    dismissed: Notify,
    state: Mutex<PaymentState>,
}

impl Debug for PaymentPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PaymentPage")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl PaymentPage {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            checkout: context.checkout.clone(),
            cart: context.cart.clone(),
            payments: context.payments.clone(),
            navigator: context.navigator.clone(),
            banner: ErrorBanner::new(),
            dismissed: Notify::new(),
            state: Mutex::new(PaymentState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, PaymentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reload the saved order data. Without it the visitor is sent back to
    /// the order-data form and `false` is returned.
    pub fn mount(&self) -> bool {
        if self.checkout.resume() == CheckoutState::NoDraft {
            debug!("payment page opened without order data");

            self.navigator.navigate(Route::OrderData);

            return false;
        }

        true
    }

    /// Saved order data.
    pub fn draft(&self) -> Option<OrderDraft> {
        self.checkout.draft()
    }

    /// Subtotal, shipping and total.
    pub fn totals(&self) -> Option<OrderTotals> {
        self.checkout.totals()
    }

    /// Lines being paid for.
    pub fn lines(&self) -> Vec<CartLine> {
        self.cart.purchasable_lines()
    }

    /// Open the upload dialog with bank transfer selected.
    pub fn open_modal(&self) -> bool {
        if self.checkout.draft().is_none() {
            self.navigator.navigate(Route::OrderData);
            return false;
        }

        let mut state = self.state();

        if state.modal.is_none() {
            state.modal = Some(PaymentModal::default());
        }

        true
    }

    /// Close the dialog unless an upload is running.
    pub fn close_modal(&self) -> bool {
        let mut state = self.state();

        if state.uploading {
            return false;
        }

        state.modal = None;

        true
    }

    /// Dialog state, if open.
    pub fn modal(&self) -> Option<PaymentModal> {
        self.state().modal.clone()
    }

    /// Pick a payment method.
    pub fn choose_method(&self, method: PaymentMethod) {
        if let Some(modal) = self.state().modal.as_mut() {
            modal.method = method;
        }
    }

    /// Attach a proof file. Refused files never replace the current one.
    pub fn attach_proof(&self, file_name: &str, mime: &str, bytes: Vec<u8>) -> bool {
        let proof = PaymentProof::new(file_name, mime, bytes);

        self.accept_proof(proof)
    }

    /// Attach a proof file from disk.
    pub fn attach_proof_file(&self, path: impl AsRef<Path>) -> bool {
        self.accept_proof(PaymentProof::from_path(path))
    }

    fn accept_proof(&self, proof: Result<PaymentProof, ProofError>) -> bool {
        let mut state = self.state();

        let Some(modal) = state.modal.as_mut() else {
            return false;
        };

        match proof {
            Ok(proof) => {
                modal.proof = Some(proof);
                modal.error = None;
                true
            }
            Err(error) => {
                debug!(%error, "proof file refused");

                modal.error = Some(error.user_message());
                false
            }
        }
    }

    /// Whether an upload is running.
    pub fn is_uploading(&self) -> bool {
        self.state().uploading
    }

    /// Upload the payment. On failure the dialog stays open with the error
    /// and the chosen file; on success the cart is emptied and the
    /// notification shown.
    pub async fn submit(&self) -> bool {
        let (method, proof) = {
            let mut state = self.state();

            if state.uploading {
                return false;
            }

            let Some(modal) = state.modal.as_ref() else {
                return false;
            };
            let choice = (modal.method, modal.proof.clone());

            state.uploading = true;
            choice
        };

        let submission = match self.checkout.begin_submission(method, proof) {
            Ok(submission) => submission,
            Err(error) => {
                self.fail(error.user_message());
                return false;
            }
        };

        let result = self.payments.create_payment(submission).await;

        match result {
            Ok(payment) => {
                if let Err(error) = self.checkout.submission_succeeded() {
                    self.banner.report(&error);
                }

                info!(payment = %payment.id, "payment uploaded");

                let mut state = self.state();
                state.uploading = false;
                state.modal = None;
                state.notification = Some(Notification {
                    order: payment.display_number(),
                    message: "Pembayaran berhasil dikirim! Pesanan Anda sedang diproses."
                        .to_string(),
                });

                true
            }
            Err(error) => {
                self.checkout.submission_failed();
                self.fail(error.user_message());
                false
            }
        }
    }

    fn fail(&self, message: String) {
        let mut state = self.state();
        state.uploading = false;

        if let Some(modal) = state.modal.as_mut() {
            modal.error = Some(message);
        }
    }

    /// Success notification, if shown.
    pub fn notification(&self) -> Option<Notification> {
        self.state().notification.clone()
    }

    /// Close the notification now instead of waiting.
    pub fn dismiss_notification(&self) {
        self.dismissed.notify_one();
    }

    /// After a successful upload, wait for [`REDIRECT_DELAY`] or a dismissal
    /// and then open the order list. Returns `false` when there is nothing to
    /// wait for.
    pub async fn await_redirect(&self) -> bool {
        if self.notification().is_none() {
            return false;
        }

        tokio::select! {
            () = tokio::time::sleep(REDIRECT_DELAY) => debug!("notification timed out"),
            () = self.dismissed.notified() => debug!("notification dismissed"),
        }

        self.state().notification = None;
        self.navigator.navigate(Route::Orders);

        true
    }

    /// Message on the error banner.
    pub fn error(&self) -> Option<String> {
        self.banner.message()
    }
}

#[cfg(test)]
mod tests {
    use buckery::{
        checkout::{CartSnapshot, DeliveryMethod, OrderDraftForm},
        ids::ProductId,
        payments::PaymentStatus,
        storage::{LocalStorage, keys},
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use tokio::time::Instant;

    use crate::{
        api::ApiError,
        payments::{MockPaymentsService, Payment, PaymentId},
        test::context::memory_context,
    };

    use super::*;

    const PNG: &str = "image/png";

    fn fill_checkout(context: &AppContext) -> TestResult {
        context.cart.add_item(
            CartLine::single(ProductId::new(1), "Roti Sobek", Decimal::from(20_000), "")
                .with_quantity(2),
        )?;

        context.checkout.save_draft(&OrderDraftForm {
            name: "Sari".to_string(),
            phone: "0812".to_string(),
            email: "sari@example.com".to_string(),
            address: "Karawang".to_string(),
            notes: String::new(),
            delivery_method: Some(DeliveryMethod::Local),
        })?;

        Ok(())
    }

    fn accepted(id: i64) -> Payment {
        Payment {
            id: PaymentId::new(id),
            order_number: Some("BK-0007".to_string()),
            customer_name: "Sari".to_string(),
            phone: "0812".to_string(),
            email: "sari@example.com".to_string(),
            address: "Karawang".to_string(),
            items: CartSnapshot::default(),
            total: Decimal::from(50_000),
            payment_method: PaymentMethod::Bank,
            payment_proof: None,
            status: PaymentStatus::Pending,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn without_order_data_the_modal_never_opens() -> TestResult {
        let (mut context, history) = memory_context(Route::Payment)?;

        let mut payments = MockPaymentsService::new();
        payments.expect_create_payment().never();
        context.payments = Arc::new(payments);

        let page = PaymentPage::new(&context);

        assert!(!page.mount());
        assert!(!page.open_modal());
        assert!(page.modal().is_none());
        assert_eq!(history.current_path(), "/datapemesanan");

        Ok(())
    }

    #[tokio::test]
    async fn totals_include_shipping() -> TestResult {
        let (context, _) = memory_context(Route::Payment)?;
        fill_checkout(&context)?;

        let page = PaymentPage::new(&context);
        assert!(page.mount());

        let totals = page.totals().ok_or("no totals")?;
        assert_eq!(totals.subtotal, Decimal::from(40_000));
        assert_eq!(totals.shipping, Decimal::from(10_000));
        assert_eq!(totals.total, Decimal::from(50_000));

        Ok(())
    }

    #[tokio::test]
    async fn refused_files_never_reach_the_backend() -> TestResult {
        let (mut context, _) = memory_context(Route::Payment)?;
        fill_checkout(&context)?;

        let mut payments = MockPaymentsService::new();
        payments.expect_create_payment().never();
        context.payments = Arc::new(payments);

        let page = PaymentPage::new(&context);
        page.mount();
        page.open_modal();

        assert!(!page.attach_proof("bukti.gif", "image/gif", vec![0; 16]));
        assert!(!page.attach_proof("bukti.png", PNG, vec![0; 6 * 1024 * 1024]));

        let modal = page.modal().ok_or("modal closed")?;
        assert_eq!(modal.method, PaymentMethod::Bank);
        assert!(modal.proof.is_none());
        assert_eq!(modal.error.as_deref(), Some("File terlalu besar. Maksimal 5MB"));

        assert!(!page.submit().await);
        assert_eq!(
            page.modal().and_then(|modal| modal.error).as_deref(),
            Some("Harap upload bukti pembayaran")
        );
        assert!(!context.cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn failed_uploads_keep_the_file() -> TestResult {
        let (mut context, _) = memory_context(Route::Payment)?;
        fill_checkout(&context)?;

        let mut payments = MockPaymentsService::new();
        payments
            .expect_create_payment()
            .once()
            .return_once(|_| Err(ApiError::InvalidRequest("offline".into())));
        context.payments = Arc::new(payments);

        let page = PaymentPage::new(&context);
        page.mount();
        page.open_modal();
        page.attach_proof("bukti.png", PNG, vec![1, 2, 3]);

        assert!(!page.submit().await);

        let modal = page.modal().ok_or("modal closed")?;
        assert!(modal.proof.is_some());
        assert!(modal.error.is_some());
        assert!(!page.is_uploading());
        assert_eq!(context.cart.item_count(), 2);
        assert!(matches!(context.checkout.state(), CheckoutState::DraftSaved(_)));

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn success_empties_the_cart_and_moves_on_after_a_pause() -> TestResult {
        let (mut context, history) = memory_context(Route::Payment)?;
        fill_checkout(&context)?;

        let mut payments = MockPaymentsService::new();
        payments
            .expect_create_payment()
            .once()
            .withf(|submission| {
                submission.method == PaymentMethod::Qris
                    && submission.totals.total == Decimal::from(50_000)
            })
            .return_once(|_| Ok(accepted(7)));
        context.payments = Arc::new(payments);

        let page = PaymentPage::new(&context);
        page.mount();
        page.open_modal();
        page.choose_method(PaymentMethod::Qris);
        page.attach_proof("bukti.jpg", "image/jpeg", vec![1, 2, 3]);

        assert!(page.submit().await);
        assert!(context.cart.is_empty());
        assert!(context.storage.get_item(keys::CART).is_none());
        assert!(page.modal().is_none());
        assert_eq!(
            page.notification().map(|notification| notification.order).as_deref(),
            Some("#BK-0007")
        );
        assert_eq!(history.current_path(), "/pembayaran");

        let started = Instant::now();
        assert!(page.await_redirect().await);

        assert!(started.elapsed() >= REDIRECT_DELAY);
        assert_eq!(history.current_path(), "/orders");
        assert!(page.notification().is_none());

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn dismissing_the_notification_skips_the_wait() -> TestResult {
        let (mut context, history) = memory_context(Route::Payment)?;
        fill_checkout(&context)?;

        let mut payments = MockPaymentsService::new();
        payments
            .expect_create_payment()
            .once()
            .return_once(|_| Ok(accepted(8)));
        context.payments = Arc::new(payments);

        let page = PaymentPage::new(&context);
        page.mount();
        page.open_modal();
        page.attach_proof("bukti.png", PNG, vec![1]);
        page.submit().await;

        let started = Instant::now();
        page.dismiss_notification();

        assert!(page.await_redirect().await);
        assert!(started.elapsed() < REDIRECT_DELAY);
        assert_eq!(history.current_path(), "/orders");

        Ok(())
    }
}
