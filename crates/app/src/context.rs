//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use buckery::{
    cart::CartStore,
    checkout::{CheckoutFlow, DraftStore},
    session::SessionStore,
    storage::{CookieJar, FileCookieJar, FileStorage, LocalStorage, StorageError},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    api::{ApiClient, ApiError},
    auth::{AuthService, HttpAuthService},
    catalog::{CatalogService, HttpCatalogService},
    config::ClientConfig,
    content::{ContentService, HttpContentService},
    navigation::Navigator,
    payments::{HttpPaymentsService, PaymentsService},
    session::{SessionEvents, SessionExpiry, SessionManager},
    staff::{HttpStaffService, StaffService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build api client")]
    Api(#[from] ApiError),

    #[error("failed to open browser state")]
    Storage(#[from] StorageError),
}

/// Everything a page needs, built once per visit.
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<ApiClient>,
    pub storage: Arc<dyn LocalStorage>,
    pub cookies: Arc<dyn CookieJar>,
    pub navigator: Arc<dyn Navigator>,
    pub events: SessionEvents,
    pub session: Arc<SessionStore>,
    pub cart: Arc<CartStore>,
    pub drafts: DraftStore,
    pub checkout: Arc<CheckoutFlow>,
    pub auth: Arc<dyn AuthService>,
    pub catalog: Arc<dyn CatalogService>,
    pub content: Arc<dyn ContentService>,
    pub payments: Arc<dyn PaymentsService>,
    pub staff: Arc<dyn StaffService>,
    pub sessions: Arc<SessionManager>,
    pub whatsapp_number: String,
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext")
            .field("api", &self.api)
            .field("session", &self.session.current())
            .field("cart_items", &self.cart.item_count())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Wire the stores and services over the given browser state.
    ///
    /// The persisted session is restored and, when complete, its token is
    /// attached to the API client straight away.
    ///
    /// # Errors
    ///
    /// Returns an error when the persisted session cannot be read or cleaned
    /// up.
    pub fn new(
        api: ApiClient,
        storage: Arc<dyn LocalStorage>,
        cookies: Arc<dyn CookieJar>,
        navigator: Arc<dyn Navigator>,
        whatsapp_number: impl Into<String>,
    ) -> Result<Self, AppInitError> {
        let api = Arc::new(api);
        let events = SessionEvents::new();

        let session = Arc::new(SessionStore::new(cookies.clone(), storage.clone()));
        if let Some(credentials) = session.hydrate()?.credentials() {
            api.set_bearer(&credentials.token);
        }

        api.set_unauthorized_handler(Arc::new(SessionExpiry::new(
            session.clone(),
            events.clone(),
            navigator.clone(),
        )));

        let cart = Arc::new(CartStore::hydrate(storage.clone()));
        let drafts = DraftStore::new(storage.clone());
        let checkout = Arc::new(CheckoutFlow::new(cart.clone(), drafts.clone()));

        let auth: Arc<dyn AuthService> = Arc::new(HttpAuthService::new(api.clone()));

        let sessions = Arc::new(SessionManager::new(
            session.clone(),
            cart.clone(),
            drafts.clone(),
            auth.clone(),
            api.clone(),
            events.clone(),
            navigator.clone(),
        ));

        debug!(authenticated = session.is_authenticated(), "app context ready");

        Ok(Self {
            catalog: Arc::new(HttpCatalogService::new(api.clone())),
            content: Arc::new(HttpContentService::new(api.clone())),
            payments: Arc::new(HttpPaymentsService::new(api.clone())),
            staff: Arc::new(HttpStaffService::new(api.clone())),
            api,
            storage,
            cookies,
            navigator,
            events,
            session,
            cart,
            drafts,
            checkout,
            auth,
            sessions,
            whatsapp_number: whatsapp_number.into(),
        })
    }

    /// Build a context over file-backed browser state in the configured
    /// state directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the API client cannot be built or the state
    /// files cannot be read.
    pub fn from_config(
        config: &ClientConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AppInitError> {
        let storage = Arc::new(FileStorage::open(config.storage.local_storage_path())?);
        let cookies = Arc::new(FileCookieJar::open(config.storage.cookie_jar_path())?);

        Self::new(
            ApiClient::new(&config.api)?,
            storage,
            cookies,
            navigator,
            config.api.whatsapp_number.clone(),
        )
    }
}
