use std::str::FromStr;

use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};

/// Tunable thresholds for the analysis engine.
///
/// Passed explicitly into the engine at construction time so deployments can
/// override any value and tests can vary thresholds per case. `Default`
/// carries the standard policy.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Weekly hours at which overtime begins.
    #[serde(default = "default_overtime_threshold")]
    pub overtime_threshold_hours: f64,
    /// Margin below the threshold at which the tier becomes `High`.
    #[serde(default = "default_high_risk_margin")]
    pub high_risk_margin_hours: f64,
    /// Margin below the threshold at which the tier becomes `Medium`.
    #[serde(default = "default_medium_risk_margin")]
    pub medium_risk_margin_hours: f64,
    /// Minutes before scheduled start that count as an early clock-in.
    #[serde(default = "default_early_clock_in_minutes")]
    pub early_clock_in_threshold_minutes: i64,
    /// Minutes after scheduled end that count as a late clock-out.
    #[serde(default = "default_late_clock_out_minutes")]
    pub late_clock_out_threshold_minutes: i64,
    /// Break minutes an entry must accumulate to satisfy the full-break policy.
    #[serde(default = "default_full_break_minutes")]
    pub full_break_minutes: i64,
    /// Entry span (hours) above which the full break is required.
    #[serde(default = "default_break_required_after_hours")]
    pub break_required_after_hours: f64,
}

fn default_overtime_threshold() -> f64 {
    40.0
}

fn default_high_risk_margin() -> f64 {
    2.0
}

fn default_medium_risk_margin() -> f64 {
    5.0
}

fn default_early_clock_in_minutes() -> i64 {
    10
}

fn default_late_clock_out_minutes() -> i64 {
    10
}

fn default_full_break_minutes() -> i64 {
    30
}

fn default_break_required_after_hours() -> f64 {
    6.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overtime_threshold_hours: default_overtime_threshold(),
            high_risk_margin_hours: default_high_risk_margin(),
            medium_risk_margin_hours: default_medium_risk_margin(),
            early_clock_in_threshold_minutes: default_early_clock_in_minutes(),
            late_clock_out_threshold_minutes: default_late_clock_out_minutes(),
            full_break_minutes: default_full_break_minutes(),
            break_required_after_hours: default_break_required_after_hours(),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSettings {
    /// Minutes between workforce sweeps.
    #[serde_as(as = "serde_with::DisplayFromStr")]
    #[serde(default = "default_sweep_interval_minutes")]
    pub sweep_interval_minutes: u64,
}

fn default_sweep_interval_minutes() -> u64 {
    120
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            sweep_interval_minutes: default_sweep_interval_minutes(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub monitor: MonitorSettings,
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .expect("Failed to parse APP_ENVIRONMENT");
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(
            config::File::from(config_directory.join("base.yaml")).required(false),
        )
        .add_source(
            config::File::from(config_directory.join(environment_filename)).required(false),
        )
        .add_source(
            config::Environment::with_prefix("SHIFTWATCH")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_policy() {
        let config = EngineConfig::default();

        assert_eq!(config.overtime_threshold_hours, 40.0);
        assert_eq!(config.high_risk_margin_hours, 2.0);
        assert_eq!(config.medium_risk_margin_hours, 5.0);
        assert_eq!(config.early_clock_in_threshold_minutes, 10);
        assert_eq!(config.late_clock_out_threshold_minutes, 10);
        assert_eq!(config.full_break_minutes, 30);
        assert_eq!(config.break_required_after_hours, 6.0);
    }

    #[test]
    fn empty_settings_deserialize_to_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();

        assert_eq!(settings.engine.overtime_threshold_hours, 40.0);
        assert_eq!(settings.monitor.sweep_interval_minutes, 120);
    }
}
