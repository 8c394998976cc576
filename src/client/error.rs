use std::fmt;

use thiserror::Error;

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Failures reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("An account with this email already exists")]
    EmailAlreadyInUse,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password is too weak")]
    WeakPassword,

    /// The email is registered through another sign-in method.
    #[error("An account already exists with a different sign-in method")]
    AccountExistsWithDifferentCredential,

    #[error("Session expired, please sign in again")]
    SessionExpired,

    #[error("{0}")]
    Provider(String),
}

impl IdentityError {
    /// Maps provider error codes onto variants.
    pub fn from_code(code: &str) -> Self {
        match code {
            "EMAIL_EXISTS" => IdentityError::EmailAlreadyInUse,
            "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" => {
                IdentityError::InvalidCredentials
            }
            "WEAK_PASSWORD" => IdentityError::WeakPassword,
            "ACCOUNT_EXISTS_WITH_DIFFERENT_CREDENTIAL" => {
                IdentityError::AccountExistsWithDifferentCredential
            }
            "INVALID_REFRESH_TOKEN" | "TOKEN_EXPIRED" => IdentityError::SessionExpired,
            other => IdentityError::Provider(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Client-side form validation failures, collected per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.message.as_str())
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ClientError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&joined.join("; "))
    }
}

/// Every failure the client core can surface. `Clone` so one in-flight
/// result can be handed to every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("unexpected response from {context}: {message}")]
    Decode { context: String, message: String },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("payment failed: {0}")]
    Payment(String),

    #[error("invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("sign in required")]
    Unauthenticated,

    #[error("a submission is already in progress")]
    InFlight,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Text suitable for a toast or inline form message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) | ClientError::Decode { .. } => GENERIC_FAILURE.to_string(),
            ClientError::Backend { status, message } if (400..500).contains(status) => {
                message.clone()
            }
            ClientError::Backend { .. } => GENERIC_FAILURE.to_string(),
            ClientError::Identity(err) => err.to_string(),
            ClientError::Payment(message) => message.clone(),
            ClientError::Validation(errors) => errors.to_string(),
            ClientError::Unauthenticated => "Please sign in to continue".to_string(),
            ClientError::InFlight => "Please wait, your request is being processed".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
