use thiserror::Error;

/// Failures from the time-tracking store, workforce directory, or marker
/// store. These abort one employee's analysis but never the whole sweep.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }
}

/// Failures from the outbound notification gateway.
///
/// Always logged and swallowed by the dispatcher; delivery is best-effort.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("send failed: {0}")]
    Send(String),
    #[error("gateway not configured: {0}")]
    NotConfigured(String),
}

/// Errors that can abort a single employee's analysis.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
