#![allow(dead_code)]

use async_trait::async_trait;
use restaurant_scraper::error::{Result, ScraperError};
use restaurant_scraper::infra::{HttpClientPort, HttpRequest, HttpResponse};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::time::Instant;

/// Scripted reply for one request.
pub enum Reply {
    Json(Value),
    Status(u16),
    Fail,
}

/// HTTP double: replies are queued per URL and served in order; every request is recorded.
#[derive(Default)]
pub struct ScriptedHttp {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, url: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.timed_requests().into_iter().map(|(_, r)| r).collect()
    }

    /// Requests with the (tokio) time they were received.
    pub fn timed_requests(&self) -> Vec<(Instant, HttpRequest)> {
        self.requests.lock().unwrap().clone()
    }

    /// Arrival times of the requests sent to `url`.
    pub fn arrivals_at(&self, url: &str) -> Vec<Instant> {
        self.timed_requests()
            .into_iter()
            .filter(|(_, r)| r.url == url)
            .map(|(at, _)| at)
            .collect()
    }

    pub fn requests_to(&self, url: &str) -> Vec<HttpRequest> {
        self.requests().into_iter().filter(|r| r.url == url).collect()
    }
}

#[async_trait]
impl HttpClientPort for ScriptedHttp {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push((Instant::now(), request.clone()));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&request.url)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Json(body)) => Ok(HttpResponse { status: 200, body }),
            Some(Reply::Status(status)) => Ok(HttpResponse { status, body: Value::Null }),
            Some(Reply::Fail) | None => Err(ScraperError::Api {
                message: format!("connection refused: {}", request.url),
            }),
        }
    }
}
