use std::{sync::Arc, time::Duration};

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::{mpsc, RwLock};
use tracing::instrument;

use crate::config::EngineConfig;
use crate::domain::{
    analyzer::OvertimeAnalyzer,
    clock::Clock,
    dispatcher::NotificationDispatcher,
    models::{EmployeeId, RiskTier},
    ports::outbound::{
        NotificationGateway, NotificationMarkerStore, TimeLedgerStore, WorkforceDirectory,
    },
    EngineError,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MonitorStatus {
    Running,
    Stopped,
}

#[derive(Debug, Clone)]
pub enum MonitorMessage {
    Start(Duration),
    ForceSweep,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepSummary {
    pub checked: usize,
    pub notified: usize,
}

/// Drives the two invocation paths of the engine: a periodic sweep over the
/// whole workforce and a synchronous per-employee check after clock events.
///
/// The paths use different minimum tiers: a sweep notifies at `Medium`+, the
/// per-event check only at `High`+.
pub struct OvertimeMonitor<S, D, C, G, M> {
    analyzer: OvertimeAnalyzer<S, D, C>,
    dispatcher: NotificationDispatcher<G, M, D, C>,
    directory: Arc<D>,
    clock: Arc<C>,
    pub status: Arc<RwLock<MonitorStatus>>,
    pub last_swept: Arc<RwLock<Option<OffsetDateTime>>>,
    pub interval: Arc<RwLock<Option<Duration>>>,
}

impl<S, D, C, G, M> OvertimeMonitor<S, D, C, G, M>
where
    S: TimeLedgerStore,
    D: WorkforceDirectory,
    C: Clock,
    G: NotificationGateway,
    M: NotificationMarkerStore,
{
    const SWEEP_MINIMUM_TIER: RiskTier = RiskTier::Medium;
    const EVENT_MINIMUM_TIER: RiskTier = RiskTier::High;

    pub fn new(
        store: Arc<S>,
        directory: Arc<D>,
        clock: Arc<C>,
        gateway: Arc<G>,
        markers: Arc<M>,
        config: EngineConfig,
    ) -> Self {
        Self {
            analyzer: OvertimeAnalyzer::new(
                store,
                Arc::clone(&directory),
                Arc::clone(&clock),
                config.clone(),
            ),
            dispatcher: NotificationDispatcher::new(
                gateway,
                markers,
                Arc::clone(&directory),
                Arc::clone(&clock),
                config,
            ),
            directory,
            clock,
            status: Arc::new(RwLock::new(MonitorStatus::Stopped)),
            last_swept: Arc::new(RwLock::new(None)),
            interval: Arc::new(RwLock::new(None)),
        }
    }

    #[instrument(name = "OvertimeMonitor::run", skip(self, receiver))]
    pub async fn run(&self, mut receiver: mpsc::Receiver<MonitorMessage>) {
        let mut tick_interval: Option<tokio::time::Interval> = None;

        loop {
            tokio::select! {
                Some(message) = receiver.recv() => {
                    match message {
                        MonitorMessage::Start(duration) => {
                            tracing::debug!("starting sweeps with interval: {:?}", duration);
                            tick_interval = Some(tokio::time::interval(duration));
                            self.interval.write().await.replace(duration);
                            *self.status.write().await = MonitorStatus::Running;
                        }
                        MonitorMessage::ForceSweep => {
                            tracing::debug!("forcing sweep");
                            if let Err(err) = self.sweep().await {
                                tracing::error!("forced sweep failed: {err}");
                            }
                        }
                        MonitorMessage::Stop => {
                            tracing::debug!("stopping sweeps");
                            tick_interval = None;
                            self.interval.write().await.take();
                            *self.status.write().await = MonitorStatus::Stopped;
                        }
                    }
                }
                _ = interval_tick_or_sleep(&mut tick_interval) => {
                    match self.sweep().await {
                        Ok(summary) => {
                            tracing::info!(
                                checked = summary.checked,
                                notified = summary.notified,
                                "overtime risk sweep completed"
                            );
                        }
                        Err(err) => tracing::error!("overtime risk sweep failed: {err}"),
                    }
                }
            }
        }
    }

    /// Analyzes every employee sequentially. One bad record must not halt
    /// the batch: per-employee failures are logged and skipped.
    #[instrument(name = "OvertimeMonitor::sweep", skip(self))]
    pub async fn sweep(&self) -> Result<SweepSummary, EngineError> {
        let employees = self.directory.employees().await?;
        tracing::debug!(count = employees.len(), "checking employees for overtime risk");

        let mut notified = 0;
        for employee in &employees {
            match self.analyzer.analyze(&employee.id).await {
                Ok(Some(analysis)) => {
                    match self
                        .dispatcher
                        .dispatch(&analysis, Self::SWEEP_MINIMUM_TIER)
                        .await
                    {
                        Ok(true) => notified += 1,
                        Ok(false) => {}
                        Err(err) => {
                            tracing::error!(
                                employee = %employee.id,
                                "failed to dispatch risk notification: {err}"
                            );
                        }
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(employee = %employee.id, "analysis failed: {err}");
                }
            }
        }

        self.last_swept.write().await.replace(self.clock.now());

        Ok(SweepSummary {
            checked: employees.len(),
            notified,
        })
    }

    /// Synchronous check after a clock-in/clock-out write, scoped to that one
    /// employee. Never raises: any engine error is caught and logged here so
    /// the originating clock write cannot fail.
    #[instrument(
        name = "OvertimeMonitor::on_clock_event",
        skip(self),
        fields(employee = %employee_id)
    )]
    pub async fn on_clock_event(&self, employee_id: &EmployeeId) {
        match self.analyzer.analyze(employee_id).await {
            Ok(Some(analysis)) => {
                if let Err(err) = self
                    .dispatcher
                    .dispatch(&analysis, Self::EVENT_MINIMUM_TIER)
                    .await
                {
                    tracing::error!("failed to dispatch risk notification: {err}");
                }
            }
            Ok(None) => tracing::debug!("no directory record, nothing to check"),
            Err(err) => tracing::error!("overtime check after clock event failed: {err}"),
        }
    }
}

async fn interval_tick_or_sleep(interval: &mut Option<tokio::time::Interval>) {
    if let Some(interval) = interval {
        interval.tick().await;
    } else {
        // Sleep for a very long time to mimic a pending future.
        tokio::time::sleep(tokio::time::Duration::from_secs(86400)).await;
    }
}
