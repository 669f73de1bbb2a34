//! HTTP client for the bakery backend.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::{Arc, OnceLock, PoisonError, RwLock},
    time::Duration,
};

use mockall::automock;
use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{AUTHORIZATION, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use url::Url;
use zeroize::Zeroizing;

use crate::{
    api::{ApiError, FormPayload},
    config::ApiConfig,
};

/// Reacts to the backend rejecting the session token.
#[automock]
pub trait UnauthorizedHandler: Send + Sync {
    /// The token was rejected; the bearer has already been dropped.
    fn session_expired(&self);
}

/// The one HTTP client every service goes through.
pub struct ApiClient {
    http: Client,
    base: Url,
    bearer: RwLock<Option<Zeroizing<String>>>,
    unauthorized: OnceLock<Arc<dyn UnauthorizedHandler>>,
}

impl Debug for ApiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("authenticated", &self.has_bearer())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::with_timeout(config.api_url.clone(), config.request_timeout())
    }

    /// Build a client for a base URL such as `http://localhost:8000/api`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_timeout(base: Url, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base,
            bearer: RwLock::new(None),
            unauthorized: OnceLock::new(),
        })
    }

    /// Register the session-expiry handler. Only the first registration
    /// takes effect.
    pub fn set_unauthorized_handler(&self, handler: Arc<dyn UnauthorizedHandler>) -> bool {
        self.unauthorized.set(handler).is_ok()
    }

    /// Attach `Authorization: Token <token>` to every following request.
    pub fn set_bearer(&self, token: &str) {
        *self.bearer.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Zeroizing::new(token.to_string()));
    }

    /// Stop authenticating requests.
    pub fn clear_bearer(&self) {
        *self.bearer.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether requests are authenticated.
    pub fn has_bearer(&self) -> bool {
        self.bearer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for an API path such as `/products/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base.as_str().trim_end_matches('/'))
    }

    /// Absolute URL for a media reference returned by the backend. Relative
    /// references resolve against the backend origin.
    pub fn media_url(&self, reference: &str) -> String {
        if reference.is_empty() {
            return String::new();
        }

        self.base
            .join(reference)
            .map_or_else(|_| reference.to_string(), String::from)
    }

    /// `GET` and decode.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a body of the
    /// wrong shape.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;

        decode(response).await
    }

    /// `GET` with query parameters and decode.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a body of the
    /// wrong shape.
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;

        decode(response).await
    }

    /// `POST` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a body of the
    /// wrong shape.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    /// `PUT` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a body of the
    /// wrong shape.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body).await
    }

    /// `PATCH` a JSON body and decode.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a body of the
    /// wrong shape.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    /// `POST` a multipart form and decode.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a body of the
    /// wrong shape.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: FormPayload,
    ) -> Result<T, ApiError> {
        self.send_form(Method::POST, path, form).await
    }

    /// `PUT` a multipart form and decode.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or a body of the
    /// wrong shape.
    pub async fn put_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: FormPayload,
    ) -> Result<T, ApiError> {
        self.send_form(Method::PUT, path, form).await
    }

    /// `POST` without a body, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::POST, path)).await?;

        Ok(())
    }

    /// `DELETE`, ignoring the response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)).await?;

        Ok(())
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(method, path).json(body)).await?;

        decode(response).await
    }

    async fn send_form<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: FormPayload,
    ) -> Result<T, ApiError> {
        let form = form.into_form()?;
        let response = self.send(self.request(method, path).multipart(form)).await?;

        decode(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "api request");

        self.http.request(method, self.url(path))
    }

    fn authorization(&self) -> Result<Option<HeaderValue>, ApiError> {
        let bearer = self.bearer.read().unwrap_or_else(PoisonError::into_inner);

        let Some(token) = bearer.as_ref() else {
            return Ok(None);
        };

        let mut value = HeaderValue::from_str(&format!("Token {}", token.as_str()))
            .map_err(|_| ApiError::InvalidRequest("session token is not header-safe".into()))?;
        value.set_sensitive(true);

        Ok(Some(value))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let authorization = self.authorization()?;
        let authenticated = authorization.is_some();

        let request = match authorization {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED && authenticated {
            warn!("backend rejected the session token");

            self.clear_bearer();

            if let Some(handler) = self.unauthorized.get() {
                handler.session_expired();
            }

            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            debug!(%status, "api request failed");

            return Err(ApiError::from_response(status, &body));
        }

        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };

    serde_json::from_slice(body).map_err(ApiError::Decode)
}
