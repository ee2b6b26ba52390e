use serde::{Deserialize, Serialize};
use strum::Display;
use time::Date;

use crate::config::EngineConfig;
use crate::domain::HoursProjection;

use super::{EmployeeId, ShiftId, WeekWindow};

/// Weekly overtime risk tier, ordered from least to most urgent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Maps projected weekly hours to a tier.
    ///
    /// Cheap classification gates the expensive violation/remediation
    /// analysis: only `Medium` and above proceed downstream.
    pub fn classify(projected_total_hours: f64, config: &EngineConfig) -> Self {
        let threshold = config.overtime_threshold_hours;

        if projected_total_hours >= threshold {
            RiskTier::Critical
        } else if projected_total_hours >= threshold - config.high_risk_margin_hours {
            RiskTier::High
        } else if projected_total_hours >= threshold - config.medium_risk_margin_hours {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    EarlyClockIn,
    LateClockOut,
    ShortBreak,
}

/// A detected deviation from scheduled shift behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub kind: ViolationKind,
    pub date: Date,
    /// Magnitude of the deviation, in whole minutes.
    pub minutes: i64,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyKind {
    #[strum(serialize = "Clock In/Out On Time")]
    ClockDiscipline,
    #[strum(serialize = "Take Full Breaks")]
    FullBreaks,
    #[strum(serialize = "Shift Swap")]
    ShiftSwap,
}

/// A shift-swap proposal: hand a future shift to a lower-loaded colleague.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapCandidate {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub shift_id: ShiftId,
    pub shift_date: Date,
    pub shift_hours: f64,
    /// The candidate's own actual + remaining hours before taking the shift.
    pub current_hours: f64,
}

/// A ranked, quantified suggestion for avoiding projected overtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationStrategy {
    /// Ascending: lower numbers are more urgent and simpler to apply.
    pub priority: u8,
    pub kind: StrategyKind,
    pub hours_saved: f64,
    pub description: String,
    pub swap_with: Option<SwapCandidate>,
}

/// The engine's output artifact for one employee and one week window.
///
/// Ephemeral: computed fresh on each invocation. Hour fields are truncated to
/// one decimal for display; tier classification happens on the full-precision
/// projection before this struct is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    pub employee_id: EmployeeId,
    pub week: WeekWindow,
    pub actual_hours: f64,
    pub current_shift_hours: f64,
    pub remaining_scheduled_hours: f64,
    pub projected_total_hours: f64,
    pub overtime_hours: f64,
    pub tier: RiskTier,
    pub violations: Vec<Violation>,
    pub strategies: Vec<RemediationStrategy>,
}

impl RiskAnalysis {
    pub fn new(
        employee_id: EmployeeId,
        week: WeekWindow,
        projection: &HoursProjection,
        tier: RiskTier,
        violations: Vec<Violation>,
        strategies: Vec<RemediationStrategy>,
        config: &EngineConfig,
    ) -> Self {
        let total = projection.projected_total();

        Self {
            employee_id,
            week,
            actual_hours: tenths(projection.actual_hours),
            current_shift_hours: tenths(projection.current_shift_hours),
            remaining_scheduled_hours: tenths(projection.remaining_scheduled_hours),
            projected_total_hours: tenths(total),
            overtime_hours: tenths((total - config.overtime_threshold_hours).max(0.0)),
            tier,
            violations,
            strategies,
        }
    }
}

/// What the marker store persists, once per employee per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSnapshot {
    pub employee_name: String,
    pub tier: RiskTier,
    pub projected_hours: f64,
    pub overtime_hours: f64,
}

impl RiskSnapshot {
    pub fn of(employee_name: &str, analysis: &RiskAnalysis) -> Self {
        Self {
            employee_name: employee_name.to_string(),
            tier: analysis.tier,
            projected_hours: analysis.projected_total_hours,
            overtime_hours: analysis.overtime_hours,
        }
    }
}

/// Truncates hours to one decimal for display; full precision stays internal.
pub fn tenths(hours: f64) -> f64 {
    (hours * 10.0).trunc() / 10.0
}
