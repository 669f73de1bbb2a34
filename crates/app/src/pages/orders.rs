//! Orders.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use buckery::{
    money::format_rupiah,
    routes::{GuardDecision, Route, guard_orders},
    session::SessionStore,
};
use tracing::debug;

use crate::{
    api::ApiClient,
    context::AppContext,
    navigation::Navigator,
    pages::ErrorBanner,
    payments::{Payment, PaymentId, PaymentsService},
};

/// One row of the order history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEntry {
    /// Payment id
    pub id: PaymentId,

    /// Order label
    pub number: String,

    /// Formatted total
    pub total: String,

    /// Status badge text
    pub badge: &'static str,
}

impl From<&Payment> for OrderEntry {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            number: payment.display_number(),
            total: format_rupiah(payment.total),
            badge: payment.status.badge(),
        }
    }
}

#[derive(Debug, Default)]
struct OrdersState {
    payments: Vec<Payment>,
    selected: Option<PaymentId>,
}

/// The signed-in customer's orders.
pub struct OrdersPage {
    payments: Arc<dyn PaymentsService>,
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    banner: ErrorBanner,
    state: Mutex<OrdersState>,
}

impl Debug for OrdersPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OrdersPage")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl OrdersPage {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            payments: context.payments.clone(),
            api: context.api.clone(),
            session: context.session.clone(),
            navigator: context.navigator.clone(),
            banner: ErrorBanner::new(),
            state: Mutex::new(OrdersState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, OrdersState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send anonymous visitors to login and back-office users to the payment
    /// monitor, then load the orders.
    pub async fn mount(&self) -> bool {
        if let GuardDecision::Redirect(route) = guard_orders(&self.session.current())
        {
            debug!(%route, "orders page refused");

            self.navigator.navigate(route);

            return false;
        }

        match self.payments.list_payments().await {
            Ok(payments) => {
                self.state().payments = payments;
                true
            }
            Err(error) => {
                self.banner.report(&error);
                false
            }
        }
    }

    /// Rows for the list.
    pub fn entries(&self) -> Vec<OrderEntry> {
        self.state().payments.iter().map(OrderEntry::from).collect()
    }

    /// Open an order's detail view.
    pub fn select(&self, id: PaymentId) -> Option<Payment> {
        let mut state = self.state();
        let payment = state
            .payments
            .iter()
            .find(|payment| payment.id == id)
            .cloned()?;

        state.selected = Some(id);

        Some(payment)
    }

    /// Order in the detail view.
    pub fn selected(&self) -> Option<Payment> {
        let state = self.state();
        let id = state.selected?;

        state.payments.iter().find(|payment| payment.id == id).cloned()
    }

    /// Close the detail view.
    pub fn close_detail(&self) {
        self.state().selected = None;
    }

    /// Absolute URL of the uploaded proof.
    pub fn proof_url(&self, payment: &Payment) -> Option<String> {
        payment
            .payment_proof
            .as_deref()
            .filter(|reference| !reference.is_empty())
            .map(|reference| self.api.media_url(reference))
    }

    /// Message on the error banner.
    pub fn error(&self) -> Option<String> {
        self.banner.message()
    }
}
