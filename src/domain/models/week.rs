use serde::{Deserialize, Serialize};
use time::macros::{format_description, time};
use time::{Date, Duration, OffsetDateTime};

/// The Sunday-to-Saturday pay week containing a given moment.
///
/// Derived, never stored: [Sunday 00:00:00, Saturday 23:59:59.999] in the
/// offset of the moment it was computed from. All hour aggregation is scoped
/// to exactly one window per analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl WeekWindow {
    pub fn containing(moment: OffsetDateTime) -> Self {
        let days_from_sunday = i64::from(moment.weekday().number_days_from_sunday());
        let sunday = moment.date() - Duration::days(days_from_sunday);
        let saturday = sunday + Duration::days(6);

        Self {
            start: sunday.midnight().assume_offset(moment.offset()),
            end: saturday
                .with_time(time!(23:59:59.999))
                .assume_offset(moment.offset()),
        }
    }

    pub fn contains(&self, moment: OffsetDateTime) -> bool {
        moment >= self.start && moment <= self.end
    }

    /// Inclusive bounds, in the shape the store queries take.
    pub fn range(&self) -> (OffsetDateTime, OffsetDateTime) {
        (self.start, self.end)
    }
}

/// Human-readable date for notification text, e.g. "Jun 13, 2025".
pub fn format_date(date: Date) -> String {
    let description = format_description!("[month repr:short] [day padding:none], [year]");
    date.format(&description)
        .unwrap_or_else(|_| date.to_string())
}
