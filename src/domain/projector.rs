use time::OffsetDateTime;

use crate::domain::ledger::WeekLedger;

/// The three hour aggregates the risk classifier works from.
///
/// Full f64 precision; display truncation happens only when the final
/// `RiskAnalysis` is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HoursProjection {
    /// Completed sessions this week, net of closed breaks.
    pub actual_hours: f64,
    /// Projection for the in-progress session, if any.
    pub current_shift_hours: f64,
    /// Shifts that have not started yet, within the window.
    pub remaining_scheduled_hours: f64,
}

impl HoursProjection {
    pub fn projected_total(&self) -> f64 {
        self.actual_hours + self.current_shift_hours + self.remaining_scheduled_hours
    }
}

/// Computes the weekly hours projection from a resolved ledger.
pub fn project(ledger: &WeekLedger, now: OffsetDateTime) -> HoursProjection {
    HoursProjection {
        actual_hours: actual_hours(ledger),
        current_shift_hours: current_shift_hours(ledger, now),
        remaining_scheduled_hours: remaining_scheduled_hours(ledger, now),
    }
}

/// Sum over closed entries of span minus closed-break time. Open entries are
/// excluded entirely, never partially counted.
fn actual_hours(ledger: &WeekLedger) -> f64 {
    ledger
        .completed_entries()
        .filter_map(|e| {
            e.entry.span().map(|span| {
                let worked_minutes = span.as_seconds_f64() / 60.0 - e.break_minutes();
                worked_minutes / 60.0
            })
        })
        .sum()
}

/// Projects the in-progress session to its effective end: the scheduled end
/// of today's shift when that is still ahead, otherwise "now".
fn current_shift_hours(ledger: &WeekLedger, now: OffsetDateTime) -> f64 {
    let Some(open) = &ledger.open else {
        return 0.0;
    };

    let effective_end = match &open.todays_shift {
        Some(shift) if shift.end > now => shift.end,
        _ => now,
    };

    let projected_minutes =
        (effective_end - open.entry.entry.clock_in).as_seconds_f64() / 60.0;
    (projected_minutes - open.entry.break_minutes()) / 60.0
}

/// Hours on shifts that start strictly after "now".
fn remaining_scheduled_hours(ledger: &WeekLedger, now: OffsetDateTime) -> f64 {
    ledger
        .shifts
        .iter()
        .filter(|s| s.starts_after(now))
        .map(|s| s.duration_hours())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::{LedgerEntry, OpenSession};
    use crate::domain::models::{
        BreakEntry, EmployeeId, Shift, ShiftId, TimeEntry, TimeEntryId, WeekWindow,
    };
    use time::macros::datetime;

    fn closed_entry(
        id: &str,
        clock_in: OffsetDateTime,
        clock_out: OffsetDateTime,
        break_minutes: i64,
    ) -> LedgerEntry {
        let breaks = if break_minutes > 0 {
            vec![BreakEntry {
                time_entry_id: TimeEntryId::new(id),
                start: clock_in + time::Duration::hours(4),
                end: Some(clock_in + time::Duration::hours(4) + time::Duration::minutes(break_minutes)),
            }]
        } else {
            Vec::new()
        };

        LedgerEntry {
            entry: TimeEntry {
                id: TimeEntryId::new(id),
                employee_id: EmployeeId::new("emp-1"),
                clock_in,
                clock_out: Some(clock_out),
            },
            breaks,
        }
    }

    fn open_entry(id: &str, clock_in: OffsetDateTime) -> LedgerEntry {
        LedgerEntry {
            entry: TimeEntry {
                id: TimeEntryId::new(id),
                employee_id: EmployeeId::new("emp-1"),
                clock_in,
                clock_out: None,
            },
            breaks: Vec::new(),
        }
    }

    fn shift(id: &str, start: OffsetDateTime, end: OffsetDateTime) -> Shift {
        Shift {
            id: ShiftId::new(id),
            employee_id: EmployeeId::new("emp-1"),
            start,
            end,
            day_off: false,
        }
    }

    fn ledger_at(now: OffsetDateTime) -> WeekLedger {
        WeekLedger {
            window: WeekWindow::containing(now),
            entries: Vec::new(),
            shifts: Vec::new(),
            open: None,
        }
    }

    #[test]
    fn empty_week_projects_zero() {
        let now = datetime!(2025-06-11 12:00 UTC);
        let projection = project(&ledger_at(now), now);

        assert_eq!(projection.projected_total(), 0.0);
    }

    #[test]
    fn actual_hours_subtract_closed_breaks() {
        let now = datetime!(2025-06-11 12:00 UTC);
        let mut ledger = ledger_at(now);
        ledger.entries.push(closed_entry(
            "e1",
            datetime!(2025-06-09 08:00 UTC),
            datetime!(2025-06-09 16:30 UTC),
            30,
        ));

        let projection = project(&ledger, now);

        assert_eq!(projection.actual_hours, 8.0);
    }

    #[test]
    fn open_entries_are_excluded_from_actual_hours() {
        let now = datetime!(2025-06-11 12:00 UTC);
        let mut ledger = ledger_at(now);
        ledger.entries.push(closed_entry(
            "e1",
            datetime!(2025-06-09 08:00 UTC),
            datetime!(2025-06-09 16:00 UTC),
            0,
        ));
        ledger
            .entries
            .push(open_entry("e2", datetime!(2025-06-11 08:00 UTC)));

        let projection = project(&ledger, now);

        // Only the Monday entry counts; the in-progress one contributes
        // nothing to actual hours.
        assert_eq!(projection.actual_hours, 8.0);
    }

    #[test]
    fn open_session_projects_to_scheduled_end() {
        let now = datetime!(2025-06-11 12:00 UTC);
        let mut ledger = ledger_at(now);
        ledger.open = Some(OpenSession {
            entry: open_entry("e1", datetime!(2025-06-11 08:00 UTC)),
            todays_shift: Some(shift(
                "s1",
                datetime!(2025-06-11 08:00 UTC),
                datetime!(2025-06-11 16:00 UTC),
            )),
        });

        let projection = project(&ledger, now);

        assert_eq!(projection.current_shift_hours, 8.0);
    }

    #[test]
    fn open_session_past_scheduled_end_projects_to_now() {
        let now = datetime!(2025-06-11 17:00 UTC);
        let mut ledger = ledger_at(now);
        ledger.open = Some(OpenSession {
            entry: open_entry("e1", datetime!(2025-06-11 08:00 UTC)),
            todays_shift: Some(shift(
                "s1",
                datetime!(2025-06-11 08:00 UTC),
                datetime!(2025-06-11 16:00 UTC),
            )),
        });

        let projection = project(&ledger, now);

        assert_eq!(projection.current_shift_hours, 9.0);
    }

    #[test]
    fn open_session_without_shift_projects_to_now() {
        let now = datetime!(2025-06-11 11:30 UTC);
        let mut ledger = ledger_at(now);
        ledger.open = Some(OpenSession {
            entry: open_entry("e1", datetime!(2025-06-11 08:00 UTC)),
            todays_shift: None,
        });

        let projection = project(&ledger, now);

        assert_eq!(projection.current_shift_hours, 3.5);
    }

    #[test]
    fn remaining_counts_only_future_shifts() {
        let now = datetime!(2025-06-11 12:00 UTC);
        let mut ledger = ledger_at(now);
        ledger.shifts.push(shift(
            "past",
            datetime!(2025-06-09 08:00 UTC),
            datetime!(2025-06-09 16:00 UTC),
        ));
        ledger.shifts.push(shift(
            "future",
            datetime!(2025-06-13 08:00 UTC),
            datetime!(2025-06-13 18:00 UTC),
        ));

        let projection = project(&ledger, now);

        assert_eq!(projection.remaining_scheduled_hours, 10.0);
    }
}
