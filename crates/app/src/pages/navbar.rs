//! Navbar.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use buckery::{cart::CartStore, session::Session};
use tokio::sync::{
    Mutex,
    broadcast::{Receiver, error::RecvError, error::TryRecvError},
};
use tracing::debug;

use crate::{
    context::AppContext,
    pages::ErrorBanner,
    session::{SessionEvent, SessionManager},
};

/// Cart badge, sign-in state and logout button.
///
/// The navbar re-reads the session whenever a [`SessionEvent`] arrives, so a
/// login or an expired token elsewhere shows up without a reload.
pub struct Navbar {
    sessions: Arc<SessionManager>,
    cart: Arc<CartStore>,
    events: Mutex<Receiver<SessionEvent>>,
    banner: ErrorBanner,
}

impl Debug for Navbar {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Navbar")
            .field("session", &self.sessions.current())
            .finish_non_exhaustive()
    }
}

impl Navbar {
    #[must_use]
    pub fn new(context: &AppContext) -> Self {
        Self {
            sessions: context.sessions.clone(),
            cart: context.cart.clone(),
            events: Mutex::new(context.events.subscribe()),
            banner: ErrorBanner::new(),
        }
    }

    /// Number of units in the cart.
    pub fn cart_badge(&self) -> u64 {
        self.cart.item_count()
    }

    /// Session as currently stored.
    pub fn session(&self) -> Session {
        self.sessions.current()
    }

    /// Whether someone is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Signed-in username.
    pub fn username(&self) -> Option<String> {
        self.session().username().map(str::to_string)
    }

    /// Drain pending session events. Returns `true` if any arrived.
    pub async fn refresh(&self) -> bool {
        let mut events = self.events.lock().await;
        let mut changed = false;

        loop {
            match events.try_recv() {
                Ok(event) => {
                    debug!(?event, "navbar saw session change");
                    changed = true;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "navbar lagged behind session events");
                    changed = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return changed,
            }
        }
    }

    /// Wait for the next session change.
    pub async fn changed(&self) -> Option<SessionEvent> {
        let mut events = self.events.lock().await;

        loop {
            match events.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Sign out from the navbar button.
    pub async fn logout(&self) -> bool {
        match self.sessions.logout().await {
            Ok(()) => true,
            Err(error) => {
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

#[cfg(test)]
mod tests {
    use buckery::{
        cart::CartLine,
        ids::ProductId,
        routes::Route,
        session::{Credentials, Role},
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{navigation::Navigator, test::context::memory_context};

    use super::*;

    #[tokio::test]
    async fn badge_follows_the_cart() -> TestResult {
        let (context, _) = memory_context(Route::Menu)?;
        let navbar = Navbar::new(&context);

        context.cart.add_item(
            CartLine::single(ProductId::new(1), "Roti", Decimal::from(10_000), "").with_quantity(2),
        )?;
        context
            .cart
            .add_item(CartLine::single(ProductId::new(2), "Bolu", Decimal::from(5_000), ""))?;

        assert_eq!(navbar.cart_badge(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn sign_in_elsewhere_is_picked_up() -> TestResult {
        let (context, _) = memory_context(Route::Home)?;
        let navbar = Navbar::new(&context);

        assert!(!navbar.refresh().await);
        assert!(!navbar.is_authenticated());

        context
            .sessions
            .login(Credentials::new("t0k3n", "sari", Role::User))?;

        assert!(navbar.refresh().await);
        assert!(navbar.is_authenticated());
        assert_eq!(navbar.username().as_deref(), Some("sari"));

        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_the_badge() -> TestResult {
        let (context, history) = memory_context(Route::Cart)?;
        let navbar = Navbar::new(&context);

        context
            .cart
            .add_item(CartLine::single(ProductId::new(1), "Roti", Decimal::from(10_000), ""))?;

        assert!(navbar.logout().await);
        assert_eq!(navbar.cart_badge(), 0);
        assert_eq!(navbar.changed().await, Some(SessionEvent::SignedOut));
        assert_eq!(history.current_path(), "/login");

        Ok(())
    }
}
