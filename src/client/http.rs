//! Thin wrapper over `reqwest` for calls to the marketplace backend.
//!
//! Every call asks the identity provider for a freshly minted token; tokens are
//! short-lived and rotated by the provider, so they are never cached here.

use std::{sync::Arc, time::Instant};

use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    client::{
        error::{ClientError, ClientResult},
        identity::IdentityProvider,
    },
    response::{ApiResponse, ErrorData, Meta},
};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    identity: Arc<dyn IdentityProvider>,
}

impl ApiClient {
    pub fn new(base_url: &str, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, identity)
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: &str,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            identity,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generic entry point: `request(method, path, body?)`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> ClientResult<ApiResponse<T>> {
        self.execute(method, path, |builder| match body {
            Some(body) => builder.json(body),
            None => builder,
        })
        .await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let resp = self.execute(Method::GET, path, |b| b).await?;
        require_data(resp, path)
    }

    /// GET with a query string; also returns the pagination meta.
    pub async fn get_page<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<(T, Meta)> {
        let resp: ApiResponse<T> = self.execute(Method::GET, path, |b| b.query(query)).await?;
        let meta = resp.meta.clone().unwrap_or_default();
        Ok((require_data(resp, path)?, meta))
    }

    pub async fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let resp = self.execute(method, path, |b| b.json(body)).await?;
        require_data(resp, path)
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let resp = self.execute(Method::DELETE, path, |b| b).await?;
        require_data(resp, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        configure: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ClientResult<ApiResponse<T>> {
        let url = format!("{}{}", self.base_url, path);
        let token = self.identity.id_token().await?;

        let mut builder = configure(self.http.request(method.clone(), &url));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(|err| {
            tracing::debug!(%method, path, error = %err, "api call failed");
            ClientError::from(err)
        })?;
        tracing::debug!(
            %method,
            path,
            status = response.status().as_u16(),
            ms = started.elapsed().as_millis() as u64,
            "api call"
        );

        decode_envelope(response, path).await
    }
}

/// Turns a response into the envelope, surfacing non-2xx answers as
/// [`ClientError::Backend`] with the backend's own message.
pub(crate) async fn decode_envelope<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> ClientResult<ApiResponse<T>> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ApiResponse<ErrorData>>(&bytes)
            .map(|body| body.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).trim().to_string());
        return Err(ClientError::Backend {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode {
        context: context.to_string(),
        message: err.to_string(),
    })
}

pub(crate) fn require_data<T>(resp: ApiResponse<T>, context: &str) -> ClientResult<T> {
    resp.data.ok_or_else(|| ClientError::Decode {
        context: context.to_string(),
        message: "response carried no data".to_string(),
    })
}
