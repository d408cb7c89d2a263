//! # Remote Generation Service Client
//!
//! Thin transport wrapper around the external generation service: one POST
//! per stage, JSON body with the authorization secret injected, and a
//! `{success, data?, error?}` response envelope.
//!
//! The envelope's two failure signals (`success == false`, absent `data`)
//! are checked independently - an inconsistent service must degrade into a
//! rejection, never a crash.

use crate::config::ForgeConfig;
use crate::error::StageError;
use crate::pipeline::Stage;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Response envelope returned by every stage endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ServiceEnvelope {
    /// Convert the envelope into stage data, or a rejection.
    pub fn into_data(self, stage: Stage) -> Result<Value, StageError> {
        if !self.success {
            return Err(StageError::Rejected(self.error.unwrap_or_else(|| {
                format!("{} stage reported failure without detail", stage)
            })));
        }
        match self.data {
            Some(data) => Ok(data),
            None => Err(StageError::Rejected(self.error.unwrap_or_else(|| {
                format!("{} stage reported success but returned no data", stage)
            }))),
        }
    }
}

/// HTTP client for the remote generation service.
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    secret: String,
}

impl RemoteClient {
    pub fn new(config: ForgeConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            base_url: config.service_url.trim_end_matches('/').to_string(),
            secret: config.service_secret,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Invoke one stage endpoint with the given payload.
    ///
    /// The secret is injected into the body here so stage code never
    /// handles it. Transport failures and undecodable envelopes both map
    /// to `StageError::Transport`.
    pub async fn invoke(&self, stage: Stage, mut payload: Value) -> Result<Value, StageError> {
        let url = format!("{}/{}", self.base_url, stage.endpoint());
        if let Value::Object(ref mut body) = payload {
            body.insert("secret".to_string(), Value::String(self.secret.clone()));
        }

        tracing::debug!(stage = %stage, url = %url, "calling generation service");

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(StageError::Transport)?;

        let envelope: ServiceEnvelope = response.json().await.map_err(StageError::Transport)?;
        envelope.into_data(stage)
    }
}
