use std::sync::Arc;

use itertools::Itertools;
use tracing::instrument;

use crate::config::EngineConfig;
use crate::domain::{
    clock::Clock,
    models::{format_date, Employee, RiskAnalysis, RiskSnapshot, RiskTier},
    ports::outbound::{NotificationGateway, NotificationMarkerStore, WorkforceDirectory},
    Email, EngineError,
};

/// Decides who must be told about a risk analysis and de-duplicates to one
/// notification per employee per calendar day.
///
/// Sending is a best-effort side effect: gateway failures are logged and
/// swallowed, never propagated, and nothing is retried within an invocation.
pub struct NotificationDispatcher<G, M, D, C> {
    gateway: Arc<G>,
    markers: Arc<M>,
    directory: Arc<D>,
    clock: Arc<C>,
    config: EngineConfig,
}

impl<G, M, D, C> NotificationDispatcher<G, M, D, C>
where
    G: NotificationGateway,
    M: NotificationMarkerStore,
    D: WorkforceDirectory,
    C: Clock,
{
    pub fn new(
        gateway: Arc<G>,
        markers: Arc<M>,
        directory: Arc<D>,
        clock: Arc<C>,
        config: EngineConfig,
    ) -> Self {
        Self {
            gateway,
            markers,
            directory,
            clock,
            config,
        }
    }

    /// Returns whether a notification actually went out. When the employee
    /// was already notified today, the stored snapshot is refreshed with the
    /// latest numbers but no second send happens.
    #[instrument(
        name = "NotificationDispatcher::dispatch",
        skip(self, analysis),
        fields(employee = %analysis.employee_id, tier = %analysis.tier)
    )]
    pub async fn dispatch(
        &self,
        analysis: &RiskAnalysis,
        minimum_tier: RiskTier,
    ) -> Result<bool, EngineError> {
        if analysis.tier < minimum_tier {
            tracing::debug!(%minimum_tier, "below notification tier, skipping");
            return Ok(false);
        }

        let Some(employee) = self.directory.employee(&analysis.employee_id).await? else {
            tracing::debug!("no directory record, skipping notification");
            return Ok(false);
        };
        let snapshot = RiskSnapshot::of(&employee.full_name, analysis);

        let today = self.clock.now().date();
        if self
            .markers
            .notified_on(&analysis.employee_id, today)
            .await?
        {
            tracing::debug!("already notified today, refreshing marker only");
            self.markers
                .upsert(&analysis.employee_id, today, &snapshot)
                .await?;
            return Ok(false);
        }

        let manager = match &employee.manager_id {
            Some(id) => self.directory.manager(id).await?,
            None => None,
        };
        let admins = self.directory.admins().await?;

        let message = RiskMessage::build(&employee, analysis, &self.config);

        let email_recipients: Vec<Email> = employee
            .email
            .iter()
            .chain(manager.iter().filter_map(|m| m.email.as_ref()))
            .chain(admins.iter().filter_map(|a| a.email.as_ref()))
            .cloned()
            .unique()
            .collect();
        if !email_recipients.is_empty() {
            if let Err(err) = self
                .gateway
                .send_email(
                    &email_recipients,
                    &message.subject,
                    &message.html_body,
                    &message.text_body,
                )
                .await
            {
                tracing::error!("failed to send overtime risk email: {err}");
            }
        }

        // SMS goes to supervisors only, and only those with a phone on file.
        let sms_recipients: Vec<String> = manager
            .iter()
            .chain(admins.iter())
            .filter_map(|c| c.phone.clone())
            .unique()
            .collect();
        if !sms_recipients.is_empty() {
            if let Err(err) = self.gateway.send_sms(&sms_recipients, &message.sms).await {
                tracing::error!("failed to send overtime risk SMS: {err}");
            }
        }

        self.markers
            .upsert(&analysis.employee_id, today, &snapshot)
            .await?;

        tracing::info!("overtime risk notification dispatched");
        Ok(true)
    }
}

/// The rendered notification content for one analysis.
struct RiskMessage {
    subject: String,
    text_body: String,
    html_body: String,
    sms: String,
}

impl RiskMessage {
    fn build(employee: &Employee, analysis: &RiskAnalysis, config: &EngineConfig) -> Self {
        let tier_upper = analysis.tier.to_string().to_uppercase();

        Self {
            subject: format!(
                "Overtime Risk Alert: {} - {} Risk",
                employee.full_name, tier_upper
            ),
            text_body: build_text(employee, analysis, config),
            html_body: build_html(employee, analysis, config),
            sms: build_sms(employee, analysis),
        }
    }
}

fn hours_summary(analysis: &RiskAnalysis) -> String {
    format!(
        "- Actual Hours Worked: {:.1}h\n\
         - Current Shift (if active): {:.1}h\n\
         - Remaining Scheduled: {:.1}h\n\
         - Projected Total: {:.1}h\n\
         - Potential Overtime: {:.1}h\n",
        analysis.actual_hours,
        analysis.current_shift_hours,
        analysis.remaining_scheduled_hours,
        analysis.projected_total_hours,
        analysis.overtime_hours,
    )
}

fn build_text(employee: &Employee, analysis: &RiskAnalysis, config: &EngineConfig) -> String {
    let mut text = format!(
        "OVERTIME RISK ALERT - {} RISK\n\n\
         Employee: {}\n\
         Week: {} - {}\n\n\
         HOURS SUMMARY:\n{}",
        analysis.tier.to_string().to_uppercase(),
        employee.full_name,
        format_date(analysis.week.start.date()),
        format_date(analysis.week.end.date()),
        hours_summary(analysis),
    );

    if !analysis.violations.is_empty() {
        text.push_str("\nTIME TRACKING ISSUES:\n");
        for violation in &analysis.violations {
            text.push_str(&format!(
                "- {} on {}\n",
                violation.description,
                format_date(violation.date)
            ));
        }
    }

    if !analysis.strategies.is_empty() {
        text.push_str("\nRECOMMENDED ACTIONS:\n");
        for (i, strategy) in analysis.strategies.iter().enumerate() {
            text.push_str(&format!(
                "{}. {} (Save {:.1}h)\n   {}\n",
                i + 1,
                strategy.kind,
                strategy.hours_saved,
                strategy.description
            ));
        }
    }

    text.push_str(&format!(
        "\nOvertime threshold: {:.0} hours per week\n",
        config.overtime_threshold_hours
    ));

    text
}

fn build_html(employee: &Employee, analysis: &RiskAnalysis, config: &EngineConfig) -> String {
    let violations_html = if analysis.violations.is_empty() {
        String::new()
    } else {
        let items: String = analysis
            .violations
            .iter()
            .map(|v| format!("<li>{} on {}</li>", v.description, format_date(v.date)))
            .collect();
        format!("<h3>Time Tracking Issues This Week</h3><ul>{items}</ul>")
    };

    let strategies_html = if analysis.strategies.is_empty() {
        String::new()
    } else {
        let items: String = analysis
            .strategies
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    "<h4>{}. {} (Save {:.1}h)</h4><p>{}</p>",
                    i + 1,
                    s.kind,
                    s.hours_saved,
                    s.description
                )
            })
            .collect();
        format!("<h3>Recommended Actions to Avoid Overtime</h3>{items}")
    };

    format!(
        "<html><body>\
         <h1>Overtime Risk Alert: {tier} RISK</h1>\
         <h3>Employee: {name}</h3>\
         <p><strong>Week:</strong> {week_start} - {week_end}</p>\
         <h3>Hours Summary</h3>\
         <ul>\
         <li>Actual Hours Worked: {actual:.1}h</li>\
         <li>Current Shift (if active): {current:.1}h</li>\
         <li>Remaining Scheduled: {remaining:.1}h</li>\
         <li>Projected Total: <strong>{total:.1}h</strong></li>\
         <li>Potential Overtime: <strong>{overtime:.1}h</strong></li>\
         </ul>\
         {violations}{strategies}\
         <p>Overtime threshold: {threshold:.0} hours per week</p>\
         </body></html>",
        tier = analysis.tier.to_string().to_uppercase(),
        name = employee.full_name,
        week_start = format_date(analysis.week.start.date()),
        week_end = format_date(analysis.week.end.date()),
        actual = analysis.actual_hours,
        current = analysis.current_shift_hours,
        remaining = analysis.remaining_scheduled_hours,
        total = analysis.projected_total_hours,
        overtime = analysis.overtime_hours,
        violations = violations_html,
        strategies = strategies_html,
        threshold = config.overtime_threshold_hours,
    )
}

fn build_sms(employee: &Employee, analysis: &RiskAnalysis) -> String {
    format!(
        "Overtime Alert!\n\n\
         Employee: {}\n\
         Risk: {}\n\
         Projected Hours: {:.1}h\n\
         Potential OT: {:.1}h\n\n\
         Check the schedule for details.",
        employee.full_name,
        analysis.tier.to_string().to_uppercase(),
        analysis.projected_total_hours,
        analysis.overtime_hours,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::models::{EmployeeId, WeekWindow};
    use crate::domain::ports::outbound::mock::{
        InMemoryDirectory, InMemoryMarkerStore, RecordingGateway,
    };
    use crate::domain::projector::HoursProjection;
    use time::macros::datetime;

    fn subject() -> EmployeeId {
        EmployeeId::new("emp-1")
    }

    fn analysis(tier_hours: f64) -> RiskAnalysis {
        let now = datetime!(2025-06-13 06:00 UTC);
        let projection = HoursProjection {
            actual_hours: tier_hours,
            ..HoursProjection::default()
        };
        let config = EngineConfig::default();
        let tier = RiskTier::classify(projection.projected_total(), &config);

        RiskAnalysis::new(
            subject(),
            WeekWindow::containing(now),
            &projection,
            tier,
            Vec::new(),
            Vec::new(),
            &config,
        )
    }

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new()
            .with_employees(vec![Employee::new("emp-1", "Sam Rivera")
                .with_email(Email::try_from("sam@example.com").unwrap())
                .with_manager("mgr-1")])
            .with_admins(vec![
                Employee::new("mgr-1", "Jordan Blake")
                    .with_email(Email::try_from("jordan@example.com").unwrap())
                    .with_phone("+15550001111"),
                Employee::new("adm-1", "Casey Fox")
                    .with_email(Email::try_from("casey@example.com").unwrap())
                    .with_phone("+15550002222"),
            ])
    }

    fn dispatcher(
        gateway: Arc<RecordingGateway>,
        markers: Arc<InMemoryMarkerStore>,
    ) -> NotificationDispatcher<RecordingGateway, InMemoryMarkerStore, InMemoryDirectory, FixedClock>
    {
        NotificationDispatcher::new(
            gateway,
            markers,
            Arc::new(directory()),
            Arc::new(FixedClock(datetime!(2025-06-13 06:00 UTC))),
            EngineConfig::default(),
        )
    }

    #[tokio::test]
    async fn below_minimum_tier_sends_nothing() {
        let gateway = Arc::new(RecordingGateway::new());
        let markers = Arc::new(InMemoryMarkerStore::new());
        let dispatcher = dispatcher(Arc::clone(&gateway), Arc::clone(&markers));

        // Medium analysis, but the per-event path requires High.
        let sent = dispatcher
            .dispatch(&analysis(36.0), RiskTier::High)
            .await
            .unwrap();

        assert!(!sent);
        assert!(gateway.emails().is_empty());
        assert!(markers.is_empty());
    }

    #[tokio::test]
    async fn qualifying_analysis_notifies_all_channels_once() {
        let gateway = Arc::new(RecordingGateway::new());
        let markers = Arc::new(InMemoryMarkerStore::new());
        let dispatcher = dispatcher(Arc::clone(&gateway), Arc::clone(&markers));

        let sent = dispatcher
            .dispatch(&analysis(41.0), RiskTier::Medium)
            .await
            .unwrap();
        assert!(sent);

        let emails = gateway.emails();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].recipients.len(), 3);
        assert!(emails[0].subject.contains("Sam Rivera"));
        assert!(emails[0].subject.contains("CRITICAL"));
        assert!(emails[0].text_body.contains("Projected Total: 41.0h"));

        let sms = gateway.sms();
        assert_eq!(sms.len(), 1);
        // Manager and admin have phones; the employee record has none.
        assert_eq!(
            sms[0].recipients,
            vec!["+15550001111".to_string(), "+15550002222".to_string()]
        );

        let today = datetime!(2025-06-13 06:00 UTC).date();
        assert_eq!(markers.snapshot(&subject(), today).unwrap().tier, RiskTier::Critical);
    }

    #[tokio::test]
    async fn second_dispatch_same_day_refreshes_marker_without_sending() {
        let gateway = Arc::new(RecordingGateway::new());
        let markers = Arc::new(InMemoryMarkerStore::new());
        let dispatcher = dispatcher(Arc::clone(&gateway), Arc::clone(&markers));

        assert!(dispatcher
            .dispatch(&analysis(38.5), RiskTier::Medium)
            .await
            .unwrap());
        assert!(!dispatcher
            .dispatch(&analysis(41.0), RiskTier::Medium)
            .await
            .unwrap());

        assert_eq!(gateway.emails().len(), 1);
        assert_eq!(markers.len(), 1);

        // The single stored record carries the latest numbers.
        let today = datetime!(2025-06-13 06:00 UTC).date();
        let snapshot = markers.snapshot(&subject(), today).unwrap();
        assert_eq!(snapshot.tier, RiskTier::Critical);
        assert_eq!(snapshot.projected_hours, 41.0);
    }

    #[tokio::test]
    async fn gateway_failure_is_swallowed_and_marker_still_written() {
        let gateway = Arc::new(RecordingGateway::failing());
        let markers = Arc::new(InMemoryMarkerStore::new());
        let dispatcher = dispatcher(gateway, Arc::clone(&markers));

        let sent = dispatcher
            .dispatch(&analysis(41.0), RiskTier::Medium)
            .await
            .unwrap();

        assert!(sent);
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn text_body_lists_violations_and_strategies() {
        let mut risk = analysis(42.0);
        risk.violations.push(crate::domain::models::Violation {
            kind: crate::domain::models::ViolationKind::ShortBreak,
            date: datetime!(2025-06-09 08:00 UTC).date(),
            minutes: 5,
            description: "Break was 5 minutes short".into(),
        });
        risk.strategies.push(crate::domain::models::RemediationStrategy {
            priority: 2,
            kind: crate::domain::models::StrategyKind::FullBreaks,
            hours_saved: 0.3,
            description: "Take your full 30-minute breaks.".into(),
            swap_with: None,
        });

        let employee = Employee::new("emp-1", "Sam Rivera");
        let text = build_text(&employee, &risk, &EngineConfig::default());

        assert!(text.contains("Break was 5 minutes short on Jun 9, 2025"));
        assert!(text.contains("1. Take Full Breaks (Save 0.3h)"));
        assert!(text.contains("Overtime threshold: 40 hours per week"));
    }
}
