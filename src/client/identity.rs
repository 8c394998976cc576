//! Seam to the identity provider.
//!
//! The provider owns credentials and sessions. The rest of the client only
//! sees [`IdentityUser`], a state-change channel and short-lived id tokens.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::watch;

use crate::{
    client::{
        error::{ClientError, ClientResult, IdentityError},
        http::{decode_envelope, require_data},
    },
    dto::auth::{IdToken, LoginRequest, RegisterRequest, SessionTokens, TokenRequest},
};

pub use crate::dto::auth::IdentityUser;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_account(&self, request: &RegisterRequest) -> ClientResult<IdentityUser>;

    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<IdentityUser>;

    async fn sign_out(&self) -> ClientResult<()>;

    fn current_user(&self) -> Option<IdentityUser>;

    /// A newly minted token for the signed-in user, `None` when signed out.
    async fn id_token(&self) -> ClientResult<Option<String>>;

    /// State-change notifications. The value present at subscription time is
    /// the startup notification; every sign-in and sign-out publishes again.
    fn subscribe(&self) -> watch::Receiver<Option<IdentityUser>>;
}

#[derive(Debug, Clone)]
struct LocalSession {
    user: IdentityUser,
    refresh_token: String,
}

/// Identity provider backed by the development backend's `/auth` endpoints.
pub struct LocalIdentity {
    http: reqwest::Client,
    base_url: String,
    session: Mutex<Option<LocalSession>>,
    changes: watch::Sender<Option<IdentityUser>>,
}

impl LocalIdentity {
    pub fn new(base_url: &str) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session: Mutex::new(None),
            changes,
        }
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let envelope = decode_envelope(response, path)
            .await
            .map_err(|err| match err {
                ClientError::Backend { status, message } if status < 500 => {
                    ClientError::Identity(IdentityError::from_code(&message))
                }
                other => other,
            })?;
        require_data(envelope, path)
    }

    fn establish(&self, tokens: SessionTokens) -> IdentityUser {
        let user = tokens.user.clone();
        *self.session.lock() = Some(LocalSession {
            user: tokens.user,
            refresh_token: tokens.refresh_token,
        });
        self.changes.send_replace(Some(user.clone()));
        tracing::info!(uid = %user.uid, "signed in");
        user
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    async fn create_account(&self, request: &RegisterRequest) -> ClientResult<IdentityUser> {
        let tokens: SessionTokens = self.post("/auth/register", request).await?;
        Ok(self.establish(tokens))
    }

    async fn sign_in(&self, email: &str, password: &str) -> ClientResult<IdentityUser> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let tokens: SessionTokens = self.post("/auth/login", &request).await?;
        Ok(self.establish(tokens))
    }

    async fn sign_out(&self) -> ClientResult<()> {
        let previous = self.session.lock().take();
        self.changes.send_replace(None);

        if let Some(previous) = previous {
            let request = TokenRequest {
                refresh_token: previous.refresh_token,
            };
            // The local session is already gone; a failed revoke only leaves a
            // dangling refresh token on the server.
            if let Err(err) = self
                .post::<serde_json::Value, _>("/auth/logout", &request)
                .await
            {
                tracing::warn!(error = %err, "refresh token revoke failed");
            }
            tracing::info!(uid = %previous.user.uid, "signed out");
        }
        Ok(())
    }

    fn current_user(&self) -> Option<IdentityUser> {
        self.session.lock().as_ref().map(|s| s.user.clone())
    }

    async fn id_token(&self) -> ClientResult<Option<String>> {
        let refresh_token = match self.session.lock().as_ref() {
            Some(session) => session.refresh_token.clone(),
            None => return Ok(None),
        };
        let token: IdToken = self
            .post("/auth/token", &TokenRequest { refresh_token })
            .await?;
        Ok(Some(token.id_token))
    }

    fn subscribe(&self) -> watch::Receiver<Option<IdentityUser>> {
        self.changes.subscribe()
    }
}
