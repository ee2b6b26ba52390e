use async_trait::async_trait;
use time::Date;

use crate::domain::{
    models::{EmployeeId, RiskSnapshot},
    Email, GatewayError, StoreError,
};

/// Outbound port for the external mail/SMS gateway.
///
/// Fire-and-forget from the engine's perspective: delivery failures are the
/// gateway's to log, the engine never retries.
#[async_trait]
pub trait NotificationGateway: Send + Sync + 'static {
    async fn send_email(
        &self,
        recipients: &[Email],
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<(), GatewayError>;

    async fn send_sms(&self, recipients: &[String], message: &str) -> Result<(), GatewayError>;
}

/// Outbound port for the once-per-day notification marker.
///
/// Keyed on employee + calendar day; `upsert` replaces the stored snapshot in
/// place so a second qualifying analysis the same day never appends a
/// duplicate record.
#[async_trait]
pub trait NotificationMarkerStore: Send + Sync + 'static {
    async fn notified_on(&self, employee: &EmployeeId, date: Date) -> Result<bool, StoreError>;

    async fn upsert(
        &self,
        employee: &EmployeeId,
        date: Date,
        snapshot: &RiskSnapshot,
    ) -> Result<(), StoreError>;
}
