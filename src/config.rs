use std::{env, time::Duration};

use crate::db::DEFAULT_DATABASE_URL;

/// Settings of the development backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub image_upload_key: Option<String>,
    /// Accounts that get the admin role when their profile is first created.
    pub admin_emails: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")?;
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let token_ttl_secs = env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|t| t.parse::<i64>().ok())
            .unwrap_or(300);
        let image_upload_key = env::var("IMAGE_UPLOAD_KEY").ok();
        let admin_emails = env::var("ADMIN_EMAILS")
            .map(|raw| parse_email_list(&raw))
            .unwrap_or_default();
        Ok(Self {
            port,
            host,
            database_url,
            jwt_secret,
            token_ttl_secs,
            image_upload_key,
            admin_emails,
        })
    }

    /// Config for in-process servers started by tests and tools.
    pub fn local(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: 300,
            image_upload_key: None,
            admin_emails: Vec::new(),
        }
    }

    pub fn with_admin(mut self, email: &str) -> Self {
        self.admin_emails.push(email.trim().to_lowercase());
        self
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.iter().any(|e| e == email)
    }
}

fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Settings of the marketplace client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub demo_email: Option<String>,
    pub demo_password: Option<String>,
    pub image_upload_url: String,
    pub image_upload_key: Option<String>,
    pub cache_stale_after: Duration,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url = env::var("API_BASE_URL")?;
        let image_upload_url = env::var("IMAGE_UPLOAD_URL")
            .unwrap_or_else(|_| "https://api.imgbb.com/1/upload".to_string());
        let cache_stale_after = env::var("CACHE_STALE_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));
        Ok(Self {
            api_base_url,
            demo_email: env::var("DEMO_EMAIL").ok(),
            demo_password: env::var("DEMO_PASSWORD").ok(),
            image_upload_url,
            image_upload_key: env::var("IMAGE_UPLOAD_KEY").ok(),
            cache_stale_after,
        })
    }

    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into();
        Self {
            image_upload_url: format!("{}/upload", api_base_url.trim_end_matches('/')),
            api_base_url,
            demo_email: None,
            demo_password: None,
            image_upload_key: None,
            cache_stale_after: Duration::from_secs(60),
        }
    }

    pub fn demo_credentials(&self) -> Option<(&str, &str)> {
        match (&self.demo_email, &self.demo_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}
