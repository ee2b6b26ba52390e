use std::sync::Arc;

use itertools::Itertools;
use time::OffsetDateTime;

use crate::config::EngineConfig;
use crate::domain::{
    ledger::{TimeLedgerReader, WeekLedger},
    models::{
        format_date, tenths, EmployeeId, RemediationStrategy, StrategyKind, SwapCandidate,
        Violation, ViolationKind,
    },
    ports::outbound::{TimeLedgerStore, WorkforceDirectory},
    projector::{project, HoursProjection},
    StoreError,
};

/// Turns behavioral violations into time-savings estimates and, when those
/// are insufficient, searches the workforce for a feasible shift swap.
pub struct RemediationStrategist<S, D> {
    reader: TimeLedgerReader<S>,
    directory: Arc<D>,
    config: EngineConfig,
}

impl<S: TimeLedgerStore, D: WorkforceDirectory> RemediationStrategist<S, D> {
    pub fn new(store: Arc<S>, directory: Arc<D>, config: EngineConfig) -> Self {
        Self {
            reader: TimeLedgerReader::new(store),
            directory,
            config,
        }
    }

    /// Priority-ordered strategies: clock discipline, then break compliance,
    /// then a shift swap when the projection still meets the threshold after
    /// the cheaper levers.
    pub async fn strategies(
        &self,
        employee: &EmployeeId,
        ledger: &WeekLedger,
        projection: &HoursProjection,
        violations: &[Violation],
        now: OffsetDateTime,
    ) -> Result<Vec<RemediationStrategy>, StoreError> {
        let mut strategies = Vec::new();

        let behavior_minutes: i64 = violations
            .iter()
            .filter(|v| v.kind != ViolationKind::ShortBreak)
            .map(|v| v.minutes)
            .sum();

        if behavior_minutes > 0 {
            strategies.push(RemediationStrategy {
                priority: 1,
                kind: StrategyKind::ClockDiscipline,
                hours_saved: tenths(behavior_minutes as f64 / 60.0),
                description: format!(
                    "Clock in and out at your scheduled times. You have accumulated \
                     {behavior_minutes} extra minutes this week."
                ),
                swap_with: None,
            });
        }

        let break_minutes: i64 = violations
            .iter()
            .filter(|v| v.kind == ViolationKind::ShortBreak)
            .map(|v| v.minutes)
            .sum();

        // Breaks are paid time in this compliance model, so recovering them
        // is a separate lever from clock discipline.
        if break_minutes > 0 {
            strategies.push(RemediationStrategy {
                priority: 2,
                kind: StrategyKind::FullBreaks,
                hours_saved: tenths(break_minutes as f64 / 60.0),
                description: format!(
                    "Take your full {}-minute breaks. You have missed {break_minutes} minutes \
                     of breaks this week.",
                    self.config.full_break_minutes
                ),
                swap_with: None,
            });
        }

        let recoverable_hours = (behavior_minutes + break_minutes) as f64 / 60.0;
        if projection.projected_total() - recoverable_hours
            >= self.config.overtime_threshold_hours
        {
            if let Some(candidate) = self.best_swap_candidate(employee, ledger, now).await? {
                strategies.push(RemediationStrategy {
                    priority: 3,
                    kind: StrategyKind::ShiftSwap,
                    hours_saved: candidate.shift_hours,
                    description: format!(
                        "Swap your {} shift ({:.1}h) with {}.",
                        format_date(candidate.shift_date),
                        candidate.shift_hours,
                        candidate.employee_name
                    ),
                    swap_with: Some(candidate),
                });
            }
        }

        Ok(strategies)
    }

    /// Candidate evaluation: for each of the subject's remaining shifts,
    /// recompute every other employee's actual + remaining hours and keep
    /// those the swapped shift would not push over the threshold. Sequential
    /// and bounded; it only runs when cheaper strategies fall short.
    async fn best_swap_candidate(
        &self,
        employee: &EmployeeId,
        ledger: &WeekLedger,
        now: OffsetDateTime,
    ) -> Result<Option<SwapCandidate>, StoreError> {
        let remaining_shifts: Vec<_> = ledger
            .shifts
            .iter()
            .filter(|s| s.starts_after(now))
            .collect();
        if remaining_shifts.is_empty() {
            return Ok(None);
        }

        // Fresh workforce snapshot per run; loads shift between checks.
        let workforce = self.directory.employees().await?;

        let mut candidates = Vec::new();
        for shift in remaining_shifts {
            let shift_hours = shift.duration_hours();

            for other in workforce.iter().filter(|e| e.id != *employee) {
                let other_ledger = self.reader.load(&other.id, &ledger.window, now).await?;
                let other_projection = project(&other_ledger, now);
                let current_hours =
                    other_projection.actual_hours + other_projection.remaining_scheduled_hours;

                if current_hours + shift_hours <= self.config.overtime_threshold_hours {
                    candidates.push(SwapCandidate {
                        employee_id: other.id.clone(),
                        employee_name: other.full_name.clone(),
                        shift_id: shift.id.clone(),
                        shift_date: shift.start.date(),
                        shift_hours: tenths(shift_hours),
                        current_hours: tenths(current_hours),
                    });
                }
            }
        }

        tracing::debug!(
            %employee,
            candidates = candidates.len(),
            "evaluated shift-swap candidates"
        );

        // Least-loaded first: spread the hours rather than creating a second
        // at-risk employee.
        Ok(candidates
            .into_iter()
            .sorted_by(|a, b| a.current_hours.total_cmp(&b.current_hours))
            .next())
    }
}
