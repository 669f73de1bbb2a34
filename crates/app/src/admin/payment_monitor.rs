//! Payment review.

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use buckery::{
    payments::{PaymentStatus, UnknownValue},
    routes::{GuardDecision, guard_admin_layout},
    session::SessionStore,
};
use tracing::info;

use crate::{
    api::ApiClient,
    navigation::Navigator,
    pages::ErrorBanner,
    payments::{Payment, PaymentId, PaymentsService},
};

/// Which payments the monitor lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every payment
    #[default]
    All,

    /// Payments in one status
    Only(PaymentStatus),
}

impl StatusFilter {
    /// Whether a payment passes the filter.
    pub fn matches(self, payment: &Payment) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => payment.status == status,
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        value.parse().map(Self::Only)
    }
}

#[derive(Debug, Default)]
struct MonitorState {
    payments: Vec<Payment>,
    filter: StatusFilter,
    selected: Option<PaymentId>,
    reviewing: bool,
}

/// Back-office list of every payment with confirm and reject actions.
pub struct PaymentMonitorPage {
    payments: Arc<dyn PaymentsService>,
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    banner: ErrorBanner,
    state: Mutex<MonitorState>,
}

impl Debug for PaymentMonitorPage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PaymentMonitorPage")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}

impl PaymentMonitorPage {
    #[must_use]
    pub fn new(
        payments: Arc<dyn PaymentsService>,
        api: Arc<ApiClient>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            payments,
            api,
            session,
            navigator,
            banner: ErrorBanner::new(),
            state: Mutex::new(MonitorState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send anyone without a back-office role to the admin login, then load
    /// every payment.
    pub async fn mount(&self) -> bool {
        if let GuardDecision::Redirect(route) = guard_admin_layout(&self.session.current()) {
            self.navigator.navigate(route);
            return false;
        }

        self.load().await
    }

    /// Fetch payments.
    pub async fn load(&self) -> bool {
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

    /// Change the status filter.
    pub fn set_filter(&self, filter: StatusFilter) {
        self.state().filter = filter;
    }

    /// Current filter.
    pub fn filter(&self) -> StatusFilter {
        self.state().filter
    }

    /// Payments passing the filter.
    pub fn visible(&self) -> Vec<Payment> {
        let state = self.state();

        state
            .payments
            .iter()
            .filter(|payment| state.filter.matches(payment))
            .cloned()
            .collect()
    }

    /// Open the detail view for a payment.
    pub fn select(&self, id: PaymentId) -> Option<Payment> {
        let mut state = self.state();
        let payment = state.payments.iter().find(|payment| payment.id == id).cloned()?;

        state.selected = Some(id);

        Some(payment)
    }

    /// Payment in the detail view.
    pub fn selected(&self) -> Option<Payment> {
        let state = self.state();
        let id = state.selected?;

        state.payments.iter().find(|payment| payment.id == id).cloned()
    }

    /// Close the detail view.
    pub fn close_detail(&self) {
        self.state().selected = None;
    }

    /// Absolute URL of a payment's proof image.
    pub fn proof_url(&self, payment: &Payment) -> Option<String> {
        payment
            .payment_proof
            .as_deref()
            .filter(|reference| !reference.is_empty())
            .map(|reference| self.api.media_url(reference))
    }

    /// Accept a pending payment.
    pub async fn confirm(&self, id: PaymentId) -> bool {
        self.review(id, PaymentStatus::Confirmed).await
    }

    /// Refuse a pending payment.
    pub async fn reject(&self, id: PaymentId) -> bool {
        self.review(id, PaymentStatus::Rejected).await
    }

    async fn review(&self, id: PaymentId, to: PaymentStatus) -> bool {
        let next = {
            let mut state = self.state();

            if state.reviewing {
                return false;
            }

            let Some(payment) = state.payments.iter().find(|payment| payment.id == id) else {
                return false;
            };

            match payment.status.transition(to) {
                Ok(next) => {
                    state.reviewing = true;
                    next
                }
                Err(error) => {
                    drop(state);
                    self.banner.show(error.to_string());
                    return false;
                }
            }
        };

        let result = self.payments.update_status(id, next).await;

        let mut state = self.state();
        state.reviewing = false;

        match result {
            Ok(()) => {
                if let Some(payment) = state.payments.iter_mut().find(|payment| payment.id == id) {
                    payment.status = next;
                }
                state.selected = None;

                info!(payment = %id, status = %next, "payment reviewed");

                true
            }
            Err(error) => {
                drop(state);
                self.banner.report(&error);
                false
            }
        }
    }

    /// Message on the error banner.
    pub fn error(&self) -> Option<String> {
        self.banner.message()
    }
}
