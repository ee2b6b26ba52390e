use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::{EmployeeId, TimeEntryId};

/// One real clock session.
///
/// Created on clock-in; `clock_out` is set on clock-out and is strictly after
/// `clock_in` once present. An entry without a clock-out is still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: TimeEntryId,
    pub employee_id: EmployeeId,
    pub clock_in: OffsetDateTime,
    pub clock_out: Option<OffsetDateTime>,
}

impl TimeEntry {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Span from clock-in to clock-out; `None` while the entry is open.
    pub fn span(&self) -> Option<Duration> {
        self.clock_out.map(|out| out - self.clock_in)
    }
}

/// A sub-interval of exactly one time entry.
///
/// Fully contained within the parent entry's span when closed. Open breaks
/// contribute zero duration to every aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEntry {
    pub time_entry_id: TimeEntryId,
    pub start: OffsetDateTime,
    pub end: Option<OffsetDateTime>,
}

impl BreakEntry {
    /// Minutes covered by this break; zero while it is still active.
    pub fn minutes(&self) -> f64 {
        match self.end {
            Some(end) => (end - self.start).as_seconds_f64() / 60.0,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn open_entry_has_no_span() {
        let entry = TimeEntry {
            id: TimeEntryId::new("e1"),
            employee_id: EmployeeId::new("emp-1"),
            clock_in: datetime!(2025-06-09 08:00 UTC),
            clock_out: None,
        };

        assert!(entry.is_open());
        assert!(entry.span().is_none());
    }

    #[test]
    fn closed_entry_span() {
        let entry = TimeEntry {
            id: TimeEntryId::new("e1"),
            employee_id: EmployeeId::new("emp-1"),
            clock_in: datetime!(2025-06-09 08:00 UTC),
            clock_out: Some(datetime!(2025-06-09 16:30 UTC)),
        };

        assert_eq!(entry.span().unwrap(), Duration::minutes(510));
    }

    #[test]
    fn open_break_contributes_zero_minutes() {
        let b = BreakEntry {
            time_entry_id: TimeEntryId::new("e1"),
            start: datetime!(2025-06-09 12:00 UTC),
            end: None,
        };

        assert_eq!(b.minutes(), 0.0);
    }

    #[test]
    fn closed_break_minutes() {
        let b = BreakEntry {
            time_entry_id: TimeEntryId::new("e1"),
            start: datetime!(2025-06-09 12:00 UTC),
            end: Some(datetime!(2025-06-09 12:25 UTC)),
        };

        assert_eq!(b.minutes(), 25.0);
    }
}
