//! Session manager.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use buckery::{
    cart::CartStore,
    checkout::DraftStore,
    routes::Area,
    session::{Credentials, Role, Session, SessionStore},
};
use tracing::{info, warn};

use crate::{
    api::ApiClient,
    auth::{AuthService, LoginRequest, RegisterRequest},
    navigation::Navigator,
    session::{SessionError, SessionEvent, SessionEvents},
};

/// Owns sign-in, sign-out and session verification.
pub struct SessionManager {
    store: Arc<SessionStore>,
    cart: Arc<CartStore>,
    drafts: DraftStore,
    auth: Arc<dyn AuthService>,
    api: Arc<ApiClient>,
    events: SessionEvents,
    navigator: Arc<dyn Navigator>,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SessionManager")
            .field("session", &self.store.current())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    #[must_use]
    pub fn new(
        store: Arc<SessionStore>,
        cart: Arc<CartStore>,
        drafts: DraftStore,
        auth: Arc<dyn AuthService>,
        api: Arc<ApiClient>,
        events: SessionEvents,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            cart,
            drafts,
            auth,
            api,
            events,
            navigator,
        }
    }

    /// Current session.
    pub fn current(&self) -> Session {
        self.store.current()
    }

    /// Session change notifications.
    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    /// Adopt credentials issued by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the session could not be persisted.
    pub fn login(&self, credentials: Credentials) -> Result<(), SessionError> {
        let username = credentials.username.clone();
        let role = credentials.role;

        self.api.set_bearer(&credentials.token);
        self.store.synchronize(credentials)?;

        info!(%username, %role, "signed in");

        self.events.publish(SessionEvent::SignedIn { username, role });

        Ok(())
    }

    /// Post credentials to `/login/` and adopt the result.
    ///
    /// The back-office login page refuses customer accounts.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, [`SessionError::Role`] for an unknown
    /// role, and [`SessionError::Forbidden`] for a customer on the admin
    /// login page. Nothing is persisted in any of these cases.
    pub async fn sign_in(
        &self,
        request: LoginRequest,
        area: Area,
        remember: bool,
    ) -> Result<Credentials, SessionError> {
        let response = self.auth.login(request).await?;
        let role: Role = response.user_type.parse()?;

        if area == Area::Admin && !role.is_back_office() {
            warn!(username = %response.username, "customer account refused at admin login");

            return Err(SessionError::Forbidden);
        }

        let credentials = Credentials::new(response.token, response.username, role);

        self.login(credentials.clone())?;
        self.store.remember(remember)?;

        Ok(credentials)
    }

    /// Create a customer account. The visitor still has to sign in.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, e.g. a taken username.
    pub async fn register(&self, request: RegisterRequest) -> Result<(), SessionError> {
        self.auth.register(request).await?;

        Ok(())
    }

    /// Sign out.
    ///
    /// The server is told on a best-effort basis. Locally the session, the
    /// cart and the saved order data are always cleared, then the visitor is
    /// sent to the login page of the area they were in.
    ///
    /// # Errors
    ///
    /// Returns the first local persistence error, after every step has run.
    pub async fn logout(&self) -> Result<(), SessionError> {
        if self.api.has_bearer()
            && let Err(error) = self.auth.logout().await
        {
            warn!(%error, "logout request failed");
        }

        let session = self.store.clear();
        self.api.clear_bearer();
        let cart = self.cart.clear_cart();
        let draft = self.drafts.discard();

        info!("signed out");

        self.events.publish(SessionEvent::SignedOut);
        self.navigator
            .navigate(Area::of(&self.navigator.current_path()).login_route());

        session?;
        cart?;
        draft?;

        Ok(())
    }

    /// Restore the persisted session and confirm it with the backend.
    ///
    /// The restored session is trusted while `GET /user/profile/` runs. If
    /// that fails for any reason the session is cleared; nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns an error only when local storage fails.
    pub async fn check_auth(&self) -> Result<Session, SessionError> {
        let session = self.store.hydrate()?;

        let Some(credentials) = session.credentials() else {
            self.api.clear_bearer();
            return Ok(Session::Anonymous);
        };

        self.api.set_bearer(&credentials.token);

        match self.auth.profile().await {
            Ok(_) => Ok(session),
            Err(error) => {
                warn!(%error, "could not verify session");

                self.store.clear()?;
                self.api.clear_bearer();
                self.events.publish(SessionEvent::SignedOut);

                Ok(Session::Anonymous)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use buckery::{
        cart::CartLine,
        ids::ProductId,
        routes::Route,
        storage::{CookieJar, LocalStorage, MemoryCookieJar, MemoryStorage, keys},
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;
    use url::Url;

    use crate::{
        api::ApiError,
        auth::{LoginResponse, MockAuthService, UserProfile},
        navigation::History,
    };

    use super::*;

    struct Fixture {
        jar: Arc<MemoryCookieJar>,
        storage: Arc<MemoryStorage>,
        store: Arc<SessionStore>,
        cart: Arc<CartStore>,
        api: Arc<ApiClient>,
        history: Arc<History>,
    }

    impl Fixture {
        fn new(route: Route) -> TestResult<Self> {
            let jar = Arc::new(MemoryCookieJar::new());
            let storage = Arc::new(MemoryStorage::new());

            Ok(Self {
                store: Arc::new(SessionStore::new(jar.clone(), storage.clone())),
                cart: Arc::new(CartStore::hydrate(storage.clone())),
                api: Arc::new(ApiClient::with_timeout(
                    Url::parse("http://127.0.0.1:9/api")?,
                    Duration::from_secs(1),
                )?),
                history: Arc::new(History::new(route)),
                jar,
                storage,
            })
        }

        fn manager(&self, auth: MockAuthService) -> SessionManager {
            SessionManager::new(
                self.store.clone(),
                self.cart.clone(),
                DraftStore::new(self.storage.clone()),
                Arc::new(auth),
                self.api.clone(),
                SessionEvents::new(),
                self.history.clone(),
            )
        }
    }

    fn login_response(user_type: &str) -> LoginResponse {
        LoginResponse {
            token: "t0k3n".to_string(),
            username: "sari".to_string(),
            user_type: user_type.to_string(),
        }
    }

    #[tokio::test]
    async fn sign_in_persists_both_copies_and_announces_it() -> TestResult {
        let fixture = Fixture::new(Route::Login)?;

        let mut auth = MockAuthService::new();
        auth.expect_login()
            .once()
            .withf(|request| request.username == "sari" && request.password.as_str() == "rahasia")
            .return_once(|_| Ok(login_response("USER")));

        let manager = fixture.manager(auth);
        let mut events = manager.events().subscribe();

        let credentials = manager
            .sign_in(LoginRequest::new("sari", "rahasia"), Area::Storefront, true)
            .await?;

        assert_eq!(credentials.role, Role::User);
        assert_eq!(fixture.jar.get(keys::TOKEN).as_deref(), Some("t0k3n"));
        assert_eq!(fixture.storage.get_item(keys::USER_TYPE).as_deref(), Some("USER"));
        assert!(fixture.store.is_remembered());
        assert!(fixture.api.has_bearer());
        assert_eq!(
            events.try_recv()?,
            SessionEvent::SignedIn {
                username: "sari".to_string(),
                role: Role::User
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn customers_cannot_sign_in_to_the_back_office() -> TestResult {
        let fixture = Fixture::new(Route::AdminLogin)?;

        let mut auth = MockAuthService::new();
        auth.expect_login()
            .once()
            .return_once(|_| Ok(login_response("USER")));

        let result = fixture
            .manager(auth)
            .sign_in(LoginRequest::new("sari", "rahasia"), Area::Admin, false)
            .await;

        assert!(
            matches!(result, Err(SessionError::Forbidden)),
            "expected forbidden, got {result:?}"
        );
        assert!(!fixture.store.is_authenticated());
        assert!(fixture.jar.get(keys::TOKEN).is_none());

        Ok(())
    }

    #[tokio::test]
    async fn logout_empties_the_cart_even_when_the_server_fails() -> TestResult {
        let fixture = Fixture::new(Route::Cart)?;

        fixture
            .cart
            .add_item(CartLine::single(ProductId::new(1), "Roti", Decimal::from(10_000), ""))?;

        let mut auth = MockAuthService::new();
        auth.expect_logout()
            .once()
            .return_once(|| Err(ApiError::InvalidRequest("offline".into())));

        let manager = fixture.manager(auth);
        manager.login(Credentials::new("t0k3n", "sari", Role::User))?;

        let mut events = manager.events().subscribe();

        manager.logout().await?;

        assert!(fixture.cart.is_empty());
        assert!(fixture.storage.get_item(keys::CART).is_none());
        assert!(!fixture.store.is_authenticated());
        assert!(!fixture.api.has_bearer());
        assert_eq!(fixture.history.current_path(), "/login");
        assert_eq!(events.try_recv()?, SessionEvent::SignedOut);

        Ok(())
    }

    #[tokio::test]
    async fn logout_from_the_back_office_returns_to_admin_login() -> TestResult {
        let fixture = Fixture::new(Route::AdminDashboard)?;

        let mut auth = MockAuthService::new();
        auth.expect_logout().never();

        fixture.manager(auth).logout().await?;

        assert_eq!(fixture.history.current_path(), "/admin/login");

        Ok(())
    }

    #[tokio::test]
    async fn verified_session_is_kept() -> TestResult {
        let fixture = Fixture::new(Route::Home)?;
        fixture
            .store
            .synchronize(Credentials::new("t0k3n", "sari", Role::User))?;

        let mut auth = MockAuthService::new();
        auth.expect_profile()
            .once()
            .return_once(|| Ok(UserProfile::default()));

        let session = fixture.manager(auth).check_auth().await?;

        assert!(session.is_authenticated());
        assert!(fixture.api.has_bearer());

        Ok(())
    }

    #[tokio::test]
    async fn failed_verification_clears_everything() -> TestResult {
        let fixture = Fixture::new(Route::Home)?;
        fixture
            .store
            .synchronize(Credentials::new("t0k3n", "sari", Role::User))?;

        let mut auth = MockAuthService::new();
        auth.expect_profile()
            .once()
            .return_once(|| Err(ApiError::InvalidRequest("offline".into())));

        let session = fixture.manager(auth).check_auth().await?;

        assert_eq!(session, Session::Anonymous);
        assert!(fixture.jar.get(keys::TOKEN).is_none());
        assert!(fixture.storage.get_item(keys::USERNAME).is_none());
        assert!(!fixture.api.has_bearer());

        Ok(())
    }

    #[tokio::test]
    async fn rejected_token_clears_everything() -> TestResult {
        let fixture = Fixture::new(Route::Home)?;
        fixture
            .store
            .synchronize(Credentials::new("t0k3n", "sari", Role::User))?;

        let mut auth = MockAuthService::new();
        auth.expect_profile()
            .once()
            .return_once(|| Err(ApiError::Unauthorized));

        let manager = fixture.manager(auth);
        let session = manager.check_auth().await?;

        assert_eq!(session, Session::Anonymous);
        assert!(!manager.current().is_authenticated());
        assert!(fixture.jar.get(keys::TOKEN).is_none());
        assert!(fixture.storage.get_item(keys::TOKEN).is_none());
        assert!(!fixture.api.has_bearer());

        Ok(())
    }

    #[tokio::test]
    async fn partial_state_is_never_trusted() -> TestResult {
        let fixture = Fixture::new(Route::Home)?;
        fixture.storage.set_item(keys::TOKEN, "t0k3n")?;

        let mut auth = MockAuthService::new();
        auth.expect_profile().never();

        let session = fixture.manager(auth).check_auth().await?;

        assert_eq!(session, Session::Anonymous);
        assert!(fixture.storage.get_item(keys::TOKEN).is_none());

        Ok(())
    }
}
