//! Resilient HTTP fetcher: one primary attempt, at most one fallback attempt.

use futures_util::future::join;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::error::{AttemptError, FetchError};
use crate::types::{EndpointPair, FetchResult, Request, Tier};

pub struct ResilientFetcher {
    client: reqwest::Client,
}

impl ResilientFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Fetch a payload, falling back once if the primary attempt fails.
    pub async fn fetch(&self, pair: &EndpointPair) -> Result<FetchResult, FetchError> {
        let primary = match self.attempt(&pair.primary).await {
            Ok(payload) => return Ok(FetchResult::new(payload, Tier::Primary)),
            Err(e) => {
                warn!("[FETCH] Primary {} failed: {}", pair.primary.url, e);
                e
            }
        };

        let Some(fallback) = &pair.fallback else {
            return Err(FetchError::DataUnavailable {
                primary,
                fallback: None,
            });
        };

        match self.attempt(fallback).await {
            Ok(payload) => {
                debug!("[FETCH] Served by fallback {}", fallback.url);
                Ok(FetchResult::new(payload, Tier::Fallback))
            }
            Err(e) => {
                warn!("[FETCH] Fallback {} failed: {}", fallback.url, e);
                Err(FetchError::DataUnavailable {
                    primary,
                    fallback: Some(e),
                })
            }
        }
    }

    /// Fetch two independent payloads concurrently
    pub async fn fetch_both(
        &self,
        first: &EndpointPair,
        second: &EndpointPair,
    ) -> Result<(FetchResult, FetchResult), FetchError> {
        let (a, b) = join(self.fetch(first), self.fetch(second)).await;
        Ok((a?, b?))
    }

    async fn attempt(&self, request: &Request) -> Result<Value, AttemptError> {
        let mut builder = match &request.body {
            Some(body) => self.client.post(&request.url).json(body),
            None => self.client.get(&request.url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!("[FETCH] {}", request.url);
        let response = builder.send().await.map_err(AttemptError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        let payload: Value = response.json().await.map_err(AttemptError::Decode)?;
        if is_empty_payload(&payload) {
            return Err(AttemptError::Empty);
        }
        Ok(payload)
    }
}

fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
