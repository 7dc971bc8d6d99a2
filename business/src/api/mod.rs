//! Typed client for the ledger REST API.
//!
//! Every call goes through [`ApiClient::execute`], which attaches the bearer
//! token, keeps the busy flag up to date and signs the session out on a 401.
//! Endpoint groups live in the submodules as further `impl ApiClient` blocks.

mod auth;
mod categories;
mod costs;
mod reports;

pub use reports::ExportFormat;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use corral_states::Observable;
use log::{error, warn};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::BusinessConfig;
use crate::envelope::ApiResponse;
use crate::error::{ApiError, ApiResult};
use crate::http::{Client, RequestBuilder, Response};
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<BusinessConfig>,
    session: Session,
    busy: Observable<bool>,
    in_flight: Arc<AtomicUsize>,
}

/// Keeps the busy flag raised while at least one request is in flight.
struct BusyGuard {
    in_flight: Arc<AtomicUsize>,
    busy: Observable<bool>,
}

impl BusyGuard {
    fn enter(in_flight: &Arc<AtomicUsize>, busy: &Observable<bool>) -> Self {
        if in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            busy.set_if_changed(true);
        }
        Self {
            in_flight: Arc::clone(in_flight),
            busy: busy.clone(),
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.busy.set_if_changed(false);
        }
    }
}

impl ApiClient {
    pub fn new(config: BusinessConfig, session: Session) -> ApiResult<Self> {
        let http = Client::new(config.timeout)?;
        Ok(Self {
            http,
            config: Arc::new(config),
            session,
            busy: Observable::new(false),
            in_flight: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// True while any request is in flight. Subscribe to follow changes.
    pub fn busy(&self) -> &Observable<bool> {
        &self.busy
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.access_token() {
            Some(token) => request.bearer(&token),
            None => request,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.get(self.config.endpoint(path)))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.authorize(self.http.delete(self.config.endpoint(path)))
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<RequestBuilder> {
        self.authorize(self.http.post(self.config.endpoint(path)))
            .json(body)
            .map_err(|e| ApiError::Encode(e.to_string()))
    }

    fn put<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<RequestBuilder> {
        self.authorize(self.http.put(self.config.endpoint(path)))
            .json(body)
            .map_err(|e| ApiError::Encode(e.to_string()))
    }

    /// Sends `request`, failing on non-2xx statuses. A 401 also ends the session.
    async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let _guard = BusyGuard::enter(&self.in_flight, &self.busy);
        let method = request.method().as_str();
        let url = request.url().to_owned();

        let response = request.send().await.inspect_err(|e| {
            error!("{method} {url} failed: {e}");
        })?;

        if response.is_success() {
            return Ok(response);
        }

        let err = ApiError::from_response(&response);
        error!("{method} {url} returned {}", response.status);
        if err.is_unauthorized() {
            warn!("Received 401, signing out");
            self.session.logout();
        }
        Err(err)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &'static str,
    ) -> ApiResult<ApiResponse<T>> {
        let response = self.execute(request).await?;
        response.json().map_err(|e| ApiError::decode(what, e))
    }

    async fn fetch_data<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &'static str,
    ) -> ApiResult<T> {
        self.fetch(request, what).await?.into_data(what)
    }

    /// For endpoints whose payload is irrelevant (deletes). Empty bodies count as success.
    async fn fetch_ack(&self, request: RequestBuilder, what: &'static str) -> ApiResult<()> {
        let response = self.execute(request).await?;
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        let envelope: ApiResponse<IgnoredAny> =
            response.json().map_err(|e| ApiError::decode(what, e))?;
        envelope.ensure_success().map(|_| ())
    }

    async fn fetch_bytes(&self, request: RequestBuilder) -> ApiResult<Vec<u8>> {
        Ok(self.execute(request).await?.body)
    }
}
