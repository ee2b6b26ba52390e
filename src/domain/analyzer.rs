use std::sync::Arc;

use tracing::instrument;

use crate::config::EngineConfig;
use crate::domain::{
    clock::Clock,
    ledger::TimeLedgerReader,
    models::{EmployeeId, RiskAnalysis, RiskTier, WeekWindow},
    ports::outbound::{TimeLedgerStore, WorkforceDirectory},
    projector::project,
    strategist::RemediationStrategist,
    violations, EngineError,
};

/// Runs the full analysis pipeline for one employee: ledger → projection →
/// tier → (at `Medium`+) violations and remediation strategies.
///
/// Pure and idempotent given the ledger state and "now": repeated runs with
/// unchanged inputs yield identical analyses.
pub struct OvertimeAnalyzer<S, D, C> {
    reader: TimeLedgerReader<S>,
    strategist: RemediationStrategist<S, D>,
    directory: Arc<D>,
    clock: Arc<C>,
    config: EngineConfig,
}

impl<S, D, C> OvertimeAnalyzer<S, D, C>
where
    S: TimeLedgerStore,
    D: WorkforceDirectory,
    C: Clock,
{
    pub fn new(store: Arc<S>, directory: Arc<D>, clock: Arc<C>, config: EngineConfig) -> Self {
        Self {
            reader: TimeLedgerReader::new(Arc::clone(&store)),
            strategist: RemediationStrategist::new(store, Arc::clone(&directory), config.clone()),
            directory,
            clock,
            config,
        }
    }

    /// `Ok(None)` means the employee has no directory record and no analysis
    /// is possible; that is a skip, not an error.
    #[instrument(name = "OvertimeAnalyzer::analyze", skip(self), fields(employee = %employee_id))]
    pub async fn analyze(
        &self,
        employee_id: &EmployeeId,
    ) -> Result<Option<RiskAnalysis>, EngineError> {
        if self.directory.employee(employee_id).await?.is_none() {
            tracing::debug!("no directory record, skipping analysis");
            return Ok(None);
        }

        let now = self.clock.now();
        let window = WeekWindow::containing(now);

        let ledger = self.reader.load(employee_id, &window, now).await?;
        let projection = project(&ledger, now);
        let tier = RiskTier::classify(projection.projected_total(), &self.config);

        tracing::debug!(
            actual = projection.actual_hours,
            current_shift = projection.current_shift_hours,
            remaining = projection.remaining_scheduled_hours,
            projected_total = projection.projected_total(),
            %tier,
            "projected weekly hours"
        );

        // Cheap classification gates the expensive analysis.
        let (violations, strategies) = if tier >= RiskTier::Medium {
            let violations = violations::detect(&ledger, &self.config);
            let strategies = self
                .strategist
                .strategies(employee_id, &ledger, &projection, &violations, now)
                .await?;
            (violations, strategies)
        } else {
            (Vec::new(), Vec::new())
        };

        Ok(Some(RiskAnalysis::new(
            employee_id.clone(),
            window,
            &projection,
            tier,
            violations,
            strategies,
            &self.config,
        )))
    }
}
