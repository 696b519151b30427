use std::time::Instant;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::constants::{CHAT_PATH, HEALTH_PATH, SERVER_INFO_PATH};
use crate::errors::{BalcaoError, BalcaoResult};
use crate::logging::{log_api_call, ApiCallLog};

/// Company metadata served by the support backend, shown in the header.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub company_name: String,
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub work_hours: String,
    #[serde(default)]
    pub contact_phone: String,
}

/// HTTP boundary to the remote support assistant.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a user message and returns the assistant's reply text.
    ///
    /// Failures are classified so the caller can substitute the right
    /// fallback message: transport errors while sending, non-2xx statuses,
    /// and bodies without a usable `response` field are reported as
    /// separate variants.
    pub async fn request_reply(&self, message: &str) -> BalcaoResult<String> {
        let url = format!("{}{}", self.base_url, CHAT_PATH);
        let payload = json!({
            "message": message,
            "timestamp": Utc::now().to_rfc3339(),
        });

        let started = Instant::now();
        let response = match self.http.post(&url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                log_api_call(&ApiCallLog::new(CHAT_PATH, summarize(message), 0, started));
                return Err(BalcaoError::network(e));
            }
        };

        let status = response.status();
        log_api_call(&ApiCallLog::new(
            CHAT_PATH,
            summarize(message),
            status.as_u16(),
            started,
        ));

        if !status.is_success() {
            return Err(BalcaoError::status(status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BalcaoError::invalid_reply(format!("undecodable body: {}", e)))?;

        match body["response"].as_str() {
            Some(reply) if !reply.is_empty() => Ok(reply.to_string()),
            Some(_) => Err(BalcaoError::invalid_reply("empty response field")),
            None => Err(BalcaoError::invalid_reply("missing response field")),
        }
    }

    /// Fetches company metadata for the header. Best-effort; the caller
    /// falls back to a fixed title when this fails.
    pub async fn fetch_server_info(&self) -> BalcaoResult<ServerInfo> {
        let url = format!("{}{}", self.base_url, SERVER_INFO_PATH);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(BalcaoError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BalcaoError::status(status));
        }

        response
            .json::<ServerInfo>()
            .await
            .map_err(|e| BalcaoError::invalid_reply(format!("undecodable server info: {}", e)))
    }

    /// Startup reachability probe against the backend's health endpoint.
    pub async fn health_check(&self) -> BalcaoResult<()> {
        let url = format!("{}{}", self.base_url, HEALTH_PATH);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(BalcaoError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BalcaoError::status(status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BalcaoError::invalid_reply(format!("undecodable health body: {}", e)))?;

        if body["status"].as_str() == Some("ok") {
            Ok(())
        } else {
            Err(BalcaoError::invalid_reply("health status is not ok"))
        }
    }
}

fn summarize(message: &str) -> String {
    if message.len() > 80 {
        let cut = message
            .char_indices()
            .take_while(|(i, _)| *i < 80)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &message[..cut])
    } else {
        message.to_string()
    }
}
