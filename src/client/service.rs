//! Shared JSON-over-HTTP plumbing for the service clients.

use std::time::Instant;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::client::error::{ClientError, ClientResult};

/// A response kept as-is, for assertions on status codes and error bodies.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    /// Parsed JSON body; `Null` when the body was empty or not JSON.
    pub body: serde_json::Value,
}

impl RawResponse {
    /// Decode the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }
}

/// Base client bound to one service's API root.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    name: &'static str,
    http: Client,
    base_url: Url,
}

impl ServiceClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(name: &'static str, base_url: &str, http: Client) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
                reason: "cannot be used as a base URL".to_string(),
            });
        }

        Ok(Self {
            name,
            http,
            base_url,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `base_url/segment/segment…`, percent-encoding each segment.
    pub fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "cannot be used as a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let url = self.url(segments)?;
        let request = self.http.get(url.clone()).query(query);
        self.expect_json(Method::GET, &url, request).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(segments)?;
        let request = self.http.post(url.clone()).json(body);
        self.expect_json(Method::POST, &url, request).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(segments)?;
        let request = self.http.put(url.clone()).json(body);
        self.expect_json(Method::PUT, &url, request).await
    }

    pub async fn get_raw(&self, segments: &[&str]) -> ClientResult<RawResponse> {
        let url = self.url(segments)?;
        let request = self.http.get(url.clone());
        self.raw(Method::GET, &url, request).await
    }

    pub async fn post_raw<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<RawResponse> {
        let url = self.url(segments)?;
        let request = self.http.post(url.clone()).json(body);
        self.raw(Method::POST, &url, request).await
    }

    pub async fn put_raw<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<RawResponse> {
        let url = self.url(segments)?;
        let request = self.http.put(url.clone()).json(body);
        self.raw(Method::PUT, &url, request).await
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        request: RequestBuilder,
    ) -> ClientResult<(StatusCode, String)> {
        let started = Instant::now();
        let response: Response = request.send().await.map_err(|source| ClientError::Transport {
            method: method_name(method),
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|source| ClientError::Transport {
            method: method_name(method),
            url: url.to_string(),
            source,
        })?;

        tracing::debug!(
            service = self.name,
            method = %method,
            url = %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );
        Ok((status, text))
    }

    async fn expect_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &Url,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let (status, text) = self.send(&method, url, request).await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                method: method_name(&method),
                url: url.to_string(),
                status,
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn raw(&self, method: Method, url: &Url, request: RequestBuilder) -> ClientResult<RawResponse> {
        let (status, text) = self.send(&method, url, request).await?;
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
        Ok(RawResponse { status, body })
    }
}

fn method_name(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        _ => "HTTP",
    }
}
