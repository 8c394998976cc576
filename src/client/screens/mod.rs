//! View-models the front end renders. Each screen loads its data through
//! [`Bazaar`](crate::client::Bazaar) and keeps its own UI state; failures end
//! up as [`Loadable::Failed`], never as a panic.

pub mod dashboard;
pub mod home;
pub mod meal_detail;
pub mod meals;
pub mod order;

use crate::client::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    Loading,
    Failed(ClientError),
    Ready(T),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_ready(self) -> Option<T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Message to show in place of the content.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Loadable::Failed(err) => Some(err.user_message()),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Loadable::Loading => Loadable::Loading,
            Loadable::Failed(err) => Loadable::Failed(err),
            Loadable::Ready(value) => Loadable::Ready(f(value)),
        }
    }
}

impl<T> From<ClientResult<T>> for Loadable<T> {
    fn from(result: ClientResult<T>) -> Self {
        match result {
            Ok(value) => Loadable::Ready(value),
            Err(err) => {
                tracing::debug!(error = %err, "screen data failed to load");
                Loadable::Failed(err)
            }
        }
    }
}
