//! Client core of the marketplace: the HTTP wrapper, session binding, role
//! resolver, query cache, route gate and checkout flow the screens are built
//! on.
//!
//! Everything hangs off [`Bazaar`], an explicitly constructed context. Build
//! one per process with [`Bazaar::start`] inside a tokio runtime and tear it
//! down with [`Bazaar::shutdown`].

use std::sync::Arc;

use crate::{config::ClientConfig, dto::auth::RegisterRequest};

pub mod api;
pub mod cache;
pub mod checkout;
pub mod error;
pub mod gate;
pub mod http;
pub mod identity;
pub mod role;
pub mod screens;
pub mod session;
pub mod upload;
pub mod validation;

use cache::QueryCache;
use error::{ClientError, ClientResult, IdentityError};
use http::ApiClient;
use identity::{IdentityProvider, LocalIdentity};
use session::{Session, SessionSnapshot};
use validation::{LoginForm, RegisterForm};

pub struct Bazaar {
    config: ClientConfig,
    identity: Arc<dyn IdentityProvider>,
    api: ApiClient,
    cache: Arc<QueryCache>,
    session: Session,
}

impl Bazaar {
    pub fn start(config: ClientConfig, identity: Arc<dyn IdentityProvider>) -> Self {
        let api = ApiClient::new(&config.api_base_url, identity.clone());
        let cache = Arc::new(QueryCache::new(config.cache_stale_after));
        let session = Session::start(identity.clone(), api.clone(), cache.clone());
        tracing::info!(base_url = %config.api_base_url, "client started");
        Self {
            config,
            identity,
            api,
            cache,
            session,
        }
    }

    /// Uses the development backend as identity provider as well.
    pub fn start_local(config: ClientConfig) -> Self {
        let identity = Arc::new(LocalIdentity::new(&config.api_base_url));
        Self::start(config, identity)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    /// Validates the form, creates the account and waits until the session
    /// reflects it.
    pub async fn sign_up(&self, form: &RegisterForm) -> ClientResult<SessionSnapshot> {
        form.validate()?;
        let request = RegisterRequest {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            name: form.name.trim().to_string(),
            photo_url: form.photo_url.clone(),
        };
        let user = self.identity.create_account(&request).await?;
        self.session
            .wait_for(|s| s.email() == Some(user.email.as_str()))
            .await
    }

    pub async fn sign_in(&self, form: &LoginForm) -> ClientResult<SessionSnapshot> {
        form.validate()?;
        let user = self
            .identity
            .sign_in(form.email.trim(), &form.password)
            .await?;
        self.session
            .wait_for(|s| s.email() == Some(user.email.as_str()))
            .await
    }

    /// Signs in with the configured demo credentials.
    pub async fn sign_in_demo(&self) -> ClientResult<SessionSnapshot> {
        let (email, password) = self
            .config
            .demo_credentials()
            .ok_or_else(|| {
                IdentityError::Provider("demo credentials are not configured".to_string())
            })?;
        let form = LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.sign_in(&form).await
    }

    pub async fn sign_out(&self) -> ClientResult<SessionSnapshot> {
        self.identity.sign_out().await?;
        self.session.wait_for(|s| !s.loading() && !s.is_authenticated()).await
    }

    /// Waits until the profile sync of the signed-in user has settled.
    pub async fn profile_settled(&self) -> ClientResult<SessionSnapshot> {
        self.session
            .wait_for(|s| {
                !s.loading()
                    && !matches!(s.profile_sync, Some(session::ProfileSync::Pending))
            })
            .await
    }

    pub(crate) fn require_email(&self) -> ClientResult<String> {
        self.session
            .snapshot()
            .email()
            .map(str::to_string)
            .ok_or(ClientError::Unauthenticated)
    }

    pub async fn shutdown(self) {
        self.session.shutdown().await;
        self.cache.clear();
        tracing::info!("client stopped");
    }
}
