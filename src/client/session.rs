//! Binding between the identity provider and the rest of the client.
//!
//! State machine: `Unknown -> (Authenticated | Anonymous)`, advanced by the
//! provider's notifications. Entering `Authenticated` upserts the profile to
//! the backend in a detached task whose outcome is recorded as
//! [`ProfileSync`]; it never blocks or fails the session.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::{sync::watch, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    client::{
        cache::QueryCache,
        error::{ClientError, ClientResult},
        http::ApiClient,
        identity::{IdentityProvider, IdentityUser},
    },
    dto::users::UpsertUserRequest,
    models::User,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// No notification from the provider yet. Not the same as signed out.
    Unknown,
    Anonymous,
    Authenticated(IdentityUser),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSync {
    Pending,
    Synced,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub auth: AuthState,
    pub profile: Option<User>,
    pub profile_sync: Option<ProfileSync>,
}

impl SessionSnapshot {
    pub fn unknown() -> Self {
        Self {
            auth: AuthState::Unknown,
            profile: None,
            profile_sync: None,
        }
    }

    fn anonymous() -> Self {
        Self {
            auth: AuthState::Anonymous,
            profile: None,
            profile_sync: None,
        }
    }

    pub fn loading(&self) -> bool {
        self.auth == AuthState::Unknown
    }

    pub fn user(&self) -> Option<&IdentityUser> {
        match &self.auth {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.user().map(|u| u.email.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

pub struct Session {
    state: Arc<watch::Sender<SessionSnapshot>>,
    api: ApiClient,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Subscribes to `identity` and starts the binding task. Must be called
    /// from within a tokio runtime.
    pub fn start(
        identity: Arc<dyn IdentityProvider>,
        api: ApiClient,
        cache: Arc<QueryCache>,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::unknown());
        let state = Arc::new(state);
        let cancel = CancellationToken::new();

        let binding = Binding {
            state: state.clone(),
            api: api.clone(),
            cache,
        };
        let changes = identity.subscribe();
        let task = tokio::spawn(binding.run(changes, cancel.clone()));

        Self {
            state,
            api,
            cancel,
            task: Mutex::new(Some(task)),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Stream of snapshots; the receiver starts at the current one.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Waits until a snapshot satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> ClientResult<SessionSnapshot> {
        let mut rx = self.state.subscribe();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map_err(|_| ClientError::Unauthenticated)?;
        Ok(snapshot.clone())
    }

    /// Waits for the first provider notification.
    pub async fn ready(&self) -> ClientResult<SessionSnapshot> {
        self.wait_for(|s| !s.loading()).await
    }

    /// Re-reads the profile from the backend, e.g. after a profile edit or a
    /// role change. A successful read also settles a failed sign-in sync.
    pub async fn refresh_profile(&self) -> ClientResult<Option<User>> {
        let Some(email) = self.snapshot().email().map(str::to_string) else {
            return Ok(None);
        };
        let profile: User = self.api.get(&format!("/user/{email}")).await?;
        self.state.send_if_modified(|s| {
            if s.email() == Some(email.as_str()) {
                s.profile = Some(profile.clone());
                s.profile_sync = Some(ProfileSync::Synced);
                true
            } else {
                false
            }
        });
        Ok(Some(profile))
    }

    /// Stops listening to the provider. Idempotent.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "session task ended abnormally");
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Binding {
    state: Arc<watch::Sender<SessionSnapshot>>,
    api: ApiClient,
    cache: Arc<QueryCache>,
}

impl Binding {
    async fn run(
        self,
        mut changes: watch::Receiver<Option<IdentityUser>>,
        cancel: CancellationToken,
    ) {
        let initial = changes.borrow_and_update().clone();
        self.apply(initial);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        tracing::debug!("identity provider dropped");
                        break;
                    }
                    let user = changes.borrow_and_update().clone();
                    self.apply(user);
                }
            }
        }
        tracing::debug!("session binding stopped");
    }

    fn apply(&self, user: Option<IdentityUser>) {
        let previous = self.state.borrow().auth.clone();

        match user {
            None => {
                if previous != AuthState::Anonymous {
                    if matches!(previous, AuthState::Authenticated(_)) {
                        self.cache.clear();
                    }
                    self.state.send_replace(SessionSnapshot::anonymous());
                    tracing::info!("session anonymous");
                }
            }
            Some(user) => {
                if previous == AuthState::Authenticated(user.clone()) {
                    return;
                }
                if matches!(previous, AuthState::Authenticated(_)) {
                    self.cache.clear();
                }
                self.state.send_replace(SessionSnapshot {
                    auth: AuthState::Authenticated(user.clone()),
                    profile: None,
                    profile_sync: Some(ProfileSync::Pending),
                });
                tracing::info!(email = %user.email, "session authenticated");
                tokio::spawn(sync_profile(self.state.clone(), self.api.clone(), user));
            }
        }
    }
}

/// Upserts the profile and records the outcome on the snapshot of the same
/// user; a result for a user who has since signed out is dropped.
async fn sync_profile(
    state: Arc<watch::Sender<SessionSnapshot>>,
    api: ApiClient,
    user: IdentityUser,
) -> ProfileSync {
    let request = UpsertUserRequest {
        email: user.email.clone(),
        name: user.display_name.clone(),
        photo_url: user.photo_url.clone(),
    };

    let result: ClientResult<User> = api.send(reqwest::Method::PUT, "/users", &request).await;
    let (profile, outcome) = match result {
        Ok(profile) => (Some(profile), ProfileSync::Synced),
        Err(err) => {
            tracing::warn!(email = %user.email, error = %err, "profile sync failed");
            (None, ProfileSync::Failed(err.to_string()))
        }
    };

    state.send_if_modified(|s| {
        if s.email() != Some(user.email.as_str()) {
            return false;
        }
        s.profile = profile;
        s.profile_sync = Some(outcome.clone());
        true
    });
    outcome
}
