//! Session expiry.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use buckery::{routes::Area, session::SessionStore};
use tracing::{info, warn};

use crate::{
    api::UnauthorizedHandler,
    navigation::Navigator,
    session::{SessionEvent, SessionEvents},
};

/// Handles every 401 the same way: forget the session and send the visitor to
/// the login page of the area they were in. The cart is left alone.
#[derive(Clone)]
pub struct SessionExpiry {
    store: Arc<SessionStore>,
    events: SessionEvents,
    navigator: Arc<dyn Navigator>,
}

impl Debug for SessionExpiry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SessionExpiry").finish_non_exhaustive()
    }
}

impl SessionExpiry {
    #[must_use]
    pub fn new(
        store: Arc<SessionStore>,
        events: SessionEvents,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            events,
            navigator,
        }
    }
}

impl UnauthorizedHandler for SessionExpiry {
    fn session_expired(&self) {
        if let Err(error) = self.store.clear() {
            warn!(%error, "failed to clear expired session");
        }

        self.events.publish(SessionEvent::Expired);

        let target = Area::of(&self.navigator.current_path()).login_route();

        info!(%target, "session expired");

        self.navigator.navigate(target);
    }
}

#[cfg(test)]
mod tests {
    use buckery::{
        routes::Route,
        session::{Credentials, Role},
        storage::{CookieJar, LocalStorage, MemoryCookieJar, MemoryStorage, keys},
    };
    use testresult::TestResult;

    use crate::navigation::History;

    use super::*;

    fn signed_in() -> TestResult<(Arc<SessionStore>, Arc<MemoryCookieJar>, Arc<MemoryStorage>)> {
        let jar = Arc::new(MemoryCookieJar::new());
        let storage = Arc::new(MemoryStorage::new());
        let store = Arc::new(SessionStore::new(jar.clone(), storage.clone()));

        store.synchronize(Credentials::new("t0k3n", "bos", Role::Admin))?;

        Ok((store, jar, storage))
    }

    #[test]
    fn expiry_in_the_back_office_goes_to_admin_login() -> TestResult {
        let (store, jar, storage) = signed_in()?;
        let history = Arc::new(History::new(Route::AdminProducts));
        let events = SessionEvents::new();
        let mut receiver = events.subscribe();

        SessionExpiry::new(store.clone(), events, history.clone()).session_expired();

        assert!(!store.is_authenticated());
        assert!(jar.get(keys::TOKEN).is_none());
        assert!(storage.get_item(keys::TOKEN).is_none());
        assert_eq!(history.current_path(), "/admin/login");
        assert_eq!(receiver.try_recv()?, SessionEvent::Expired);

        Ok(())
    }

    #[test]
    fn expiry_on_the_storefront_goes_to_login_and_keeps_the_cart() -> TestResult {
        let (store, _, storage) = signed_in()?;
        storage.set_item(keys::CART, r#"[{"id":1,"name":"Roti","price":"10000","quantity":2}]"#)?;
        let history = Arc::new(History::new(Route::Orders));

        SessionExpiry::new(store, SessionEvents::new(), history.clone()).session_expired();

        assert_eq!(history.current_path(), "/login");
        assert!(storage.get_item(keys::CART).is_some());

        Ok(())
    }
}
