// src/logging.rs

use std::time::Instant;

use chrono::{DateTime, Utc};
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use log::info;

use crate::errors::{BalcaoError, BalcaoResult};

/// Starts the file logger. The terminal itself belongs to the TUI, so all
/// log output goes to `balcao.log` in the working directory. The returned
/// handle must stay alive for the duration of the program.
pub fn init(log_level: &str) -> BalcaoResult<LoggerHandle> {
    Logger::try_with_str(log_level)
        .map_err(|e| BalcaoError::config_error(format!("invalid log level: {}", e)))?
        .log_to_file(FileSpec::default().basename("balcao").suppress_timestamp())
        .append()
        .start()
        .map_err(|e| BalcaoError::config_error(format!("failed to start logger: {}", e)))
}

/// Details of one request to the backend. A transport failure that never
/// produced a response is recorded with status 0.
#[derive(Debug)]
pub struct ApiCallLog {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub request_summary: String,
    pub response_status: u16,
    pub response_time_ms: u128,
}

impl ApiCallLog {
    pub fn new(
        endpoint: &str,
        request_summary: String,
        response_status: u16,
        started: Instant,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            endpoint: endpoint.to_string(),
            request_summary,
            response_status,
            response_time_ms: started.elapsed().as_millis(),
        }
    }
}

/// Logs an API call through the file logger.
pub fn log_api_call(log: &ApiCallLog) {
    info!(
        "[{}] {} - {} - status: {} - time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        log.response_status,
        log.response_time_ms
    );
}
