use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;

/// One GET request against an upstream JSON API.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            timeout,
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Value of a query parameter, if set.
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    /// Parsed JSON body; `Value::Null` when the status is not 2xx.
    pub body: Value,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// GET `request` and return its JSON body, turning non-2xx into [`ScraperError::Status`].
pub async fn fetch_json(http: &dyn HttpClientPort, request: &HttpRequest) -> Result<Value> {
    let response = http.get(request).await?;
    if !response.is_success() {
        return Err(ScraperError::Status {
            url: request.url.clone(),
            status: response.status,
        });
    }
    Ok(response.body)
}

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl Default for ReqwestHttp {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestHttp {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let resp = self
            .client
            .get(&request.url)
            .query(&request.query)
            .timeout(request.timeout)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            return Ok(HttpResponse { status, body: Value::Null });
        }

        let bytes = resp.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(HttpResponse { status, body })
    }
}
