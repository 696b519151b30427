// src/errors.rs

use reqwest::StatusCode;
use thiserror::Error;

use crate::constants::{FALLBACK_GENERIC, FALLBACK_NETWORK, FALLBACK_PREFIX, FALLBACK_SERVER};

pub type BalcaoResult<T> = Result<T, BalcaoError>;

#[derive(Debug, Error)]
pub enum BalcaoError {
    #[error("request to the chat endpoint failed: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },

    #[error("chat endpoint returned HTTP {status}")]
    Status { status: StatusCode },

    #[error("chat endpoint returned an invalid reply: {reason}")]
    InvalidReply { reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl BalcaoError {
    pub fn network(source: reqwest::Error) -> Self {
        BalcaoError::Network { source }
    }

    pub fn status(status: StatusCode) -> Self {
        BalcaoError::Status { status }
    }

    pub fn invalid_reply(reason: impl Into<String>) -> Self {
        BalcaoError::InvalidReply {
            reason: reason.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        BalcaoError::Config(msg.into())
    }

    /// Fixed user-facing text substituted for the reply when a request
    /// fails. Transport failures suggest checking connectivity, HTTP errors
    /// suggest the server is temporarily down, anything else gets the
    /// generic retry-or-phone suggestion.
    pub fn fallback_text(&self) -> String {
        let suffix = match self {
            BalcaoError::Network { .. } => FALLBACK_NETWORK,
            BalcaoError::Status { .. } => FALLBACK_SERVER,
            _ => FALLBACK_GENERIC,
        };
        format!("{}{}", FALLBACK_PREFIX, suffix)
    }
}
