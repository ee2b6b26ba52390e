use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{
    models::{BreakEntry, EmployeeId, Shift, TimeEntry, TimeEntryId},
    StoreError,
};

/// Outbound port for the external time-tracking store.
///
/// Simple equality/range queries only; all business computation happens in
/// the engine. Read-only from the engine's perspective.
#[async_trait]
pub trait TimeLedgerStore: Send + Sync + 'static {
    /// Time entries whose clock-in falls within the inclusive range,
    /// both closed and still open.
    async fn entries_in_range(
        &self,
        employee: &EmployeeId,
        range: (OffsetDateTime, OffsetDateTime),
    ) -> Result<Vec<TimeEntry>, StoreError>;

    /// Breaks recorded against one time entry, open and closed.
    async fn breaks_for_entry(&self, entry: &TimeEntryId) -> Result<Vec<BreakEntry>, StoreError>;

    /// Scheduled shifts whose start falls within the inclusive range,
    /// excluding day-off placeholders.
    async fn shifts_in_range(
        &self,
        employee: &EmployeeId,
        range: (OffsetDateTime, OffsetDateTime),
    ) -> Result<Vec<Shift>, StoreError>;

    /// The employee's currently open time entry, if any.
    async fn open_entry(&self, employee: &EmployeeId) -> Result<Option<TimeEntry>, StoreError>;
}
