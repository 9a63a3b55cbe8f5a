//! HTTP client for the Classync API.

use api_protocol::Envelope;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{ClientError, ClientResult};

/// A thin client around the Classync REST API.
///
/// Holds the base URL and the bearer token slot shared by every store.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Creates a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    /// Stores the bearer token sent with subsequent requests.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Drops the stored bearer token.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ClientResult<Envelope<T>> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let envelope: Envelope<T> = response.json().await?;

        if !envelope.success {
            return Err(ClientError::Api {
                status,
                message: envelope.message,
            });
        }
        Ok(envelope)
    }

    fn payload<T>(envelope: Envelope<T>) -> ClientResult<T> {
        envelope.response.ok_or(ClientError::MissingPayload)
    }

    /// GET, returning the envelope payload.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        Self::payload(self.send(Method::GET, path, None::<&()>).await?)
    }

    /// POST with a JSON body, returning the envelope payload.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        Self::payload(self.send(Method::POST, path, Some(body)).await?)
    }

    /// POST without a body, returning the envelope payload.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        Self::payload(self.send(Method::POST, path, None::<&()>).await?)
    }

    /// POST with a JSON body, discarding any payload.
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        self.send::<serde_json::Value>(Method::POST, path, Some(body))
            .await?;
        Ok(())
    }

    /// PUT with a JSON body, returning the envelope payload.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        Self::payload(self.send(Method::PUT, path, Some(body)).await?)
    }

    /// DELETE, discarding any payload.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send::<serde_json::Value>(Method::DELETE, path, None::<&()>)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:4860/");
        assert_eq!(client.url("/classes"), "http://localhost:4860/classes");
    }

    #[tokio::test]
    async fn test_token_slot() {
        let client = ApiClient::new("http://localhost:4860");
        assert!(client.token.read().await.is_none());

        client.set_token("tok").await;
        assert_eq!(client.token.read().await.as_deref(), Some("tok"));

        client.clear_token().await;
        assert!(client.token.read().await.is_none());
    }
}
