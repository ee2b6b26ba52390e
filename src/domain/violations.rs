use crate::config::EngineConfig;
use crate::domain::ledger::WeekLedger;
use crate::domain::models::{Violation, ViolationKind};

/// Flags schedule deviations on every completed entry in the window.
///
/// An entry's nominal shift is the one scheduled on the same calendar day as
/// its clock-in; entries without a nominal shift contribute no violations.
/// The three rules are independent and may all fire for one entry.
pub fn detect(ledger: &WeekLedger, config: &EngineConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    for ledger_entry in ledger.completed_entries() {
        let entry = &ledger_entry.entry;
        let Some(shift) = ledger.shift_on_day_of(entry.clock_in) else {
            continue;
        };

        let early_minutes = (shift.start - entry.clock_in).as_seconds_f64() / 60.0;
        if early_minutes >= config.early_clock_in_threshold_minutes as f64 {
            let minutes = early_minutes.round() as i64;
            violations.push(Violation {
                kind: ViolationKind::EarlyClockIn,
                date: entry.clock_in.date(),
                minutes,
                description: format!("Clocked in {minutes} minutes early"),
            });
        }

        if let Some(clock_out) = entry.clock_out {
            let late_minutes = (clock_out - shift.end).as_seconds_f64() / 60.0;
            if late_minutes >= config.late_clock_out_threshold_minutes as f64 {
                let minutes = late_minutes.round() as i64;
                violations.push(Violation {
                    kind: ViolationKind::LateClockOut,
                    date: clock_out.date(),
                    minutes,
                    description: format!("Clocked out {minutes} minutes late"),
                });
            }

            let span_hours = (clock_out - entry.clock_in).as_seconds_f64() / 3600.0;
            if span_hours >= config.break_required_after_hours {
                let break_minutes = ledger_entry.break_minutes();
                if break_minutes < config.full_break_minutes as f64 {
                    let minutes = config.full_break_minutes - break_minutes.round() as i64;
                    violations.push(Violation {
                        kind: ViolationKind::ShortBreak,
                        date: entry.clock_in.date(),
                        minutes,
                        description: format!("Break was {minutes} minutes short"),
                    });
                }
            }
        }
    }

    violations
}
