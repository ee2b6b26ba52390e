use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use crate::domain::{
    models::{BreakEntry, EmployeeId, Shift, TimeEntry, WeekWindow},
    ports::outbound::TimeLedgerStore,
    StoreError,
};

/// A time entry together with its associated breaks.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub entry: TimeEntry,
    pub breaks: Vec<BreakEntry>,
}

impl LedgerEntry {
    /// Minutes of closed breaks within this entry. Open breaks count zero.
    pub fn break_minutes(&self) -> f64 {
        self.breaks.iter().map(BreakEntry::minutes).sum()
    }
}

/// The employee's currently open clock session, paired with today's scheduled
/// shift when one exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenSession {
    pub entry: LedgerEntry,
    pub todays_shift: Option<Shift>,
}

/// Everything the analysis pipeline needs for one employee and one week:
/// clock sessions with breaks, scheduled shifts, and the open session if any.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekLedger {
    pub window: WeekWindow,
    pub entries: Vec<LedgerEntry>,
    pub shifts: Vec<Shift>,
    pub open: Option<OpenSession>,
}

impl WeekLedger {
    /// Completed sessions only; the projector excludes open entries from
    /// actual hours entirely.
    pub fn completed_entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(|e| !e.entry.is_open())
    }

    /// The shift scheduled on the same calendar day as the given moment.
    pub fn shift_on_day_of(&self, moment: OffsetDateTime) -> Option<&Shift> {
        self.shifts
            .iter()
            .find(|s| s.start.to_offset(moment.offset()).date() == moment.date())
    }
}

/// Resolves the week ledger for one employee. Straight retrieval and
/// association, no business computation.
pub struct TimeLedgerReader<S> {
    store: Arc<S>,
}

impl<S> Clone for TimeLedgerReader<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: TimeLedgerStore> TimeLedgerReader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn load(
        &self,
        employee: &EmployeeId,
        window: &WeekWindow,
        now: OffsetDateTime,
    ) -> Result<WeekLedger, StoreError> {
        let raw_entries = self.store.entries_in_range(employee, window.range()).await?;

        let mut entries = Vec::with_capacity(raw_entries.len());
        for entry in raw_entries {
            let breaks = self.store.breaks_for_entry(&entry.id).await?;
            entries.push(LedgerEntry { entry, breaks });
        }

        let shifts = self.store.shifts_in_range(employee, window.range()).await?;

        let open = match self.store.open_entry(employee).await? {
            Some(entry) => {
                let breaks = self.store.breaks_for_entry(&entry.id).await?;
                let todays_shift = self
                    .store
                    .shifts_in_range(employee, day_range(now))
                    .await?
                    .into_iter()
                    .next();
                Some(OpenSession {
                    entry: LedgerEntry { entry, breaks },
                    todays_shift,
                })
            }
            None => None,
        };

        tracing::debug!(
            %employee,
            entries = entries.len(),
            shifts = shifts.len(),
            clocked_in = open.is_some(),
            "loaded week ledger"
        );

        Ok(WeekLedger {
            window: *window,
            entries,
            shifts,
            open,
        })
    }
}

/// Inclusive bounds covering the calendar day of `moment`, in its offset.
fn day_range(moment: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    let start = moment.date().midnight().assume_offset(moment.offset());
    (start, start + Duration::days(1) - Duration::milliseconds(1))
}
