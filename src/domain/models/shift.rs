use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{EmployeeId, ShiftId};

/// A planned work interval for one employee.
///
/// Owned by the scheduling subsystem; read-only from the engine's
/// perspective. Day-off placeholders carry the `day_off` flag and never
/// contribute hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    pub employee_id: EmployeeId,
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
    pub day_off: bool,
}

impl Shift {
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).as_seconds_f64() / 3600.0
    }

    pub fn starts_after(&self, moment: OffsetDateTime) -> bool {
        self.start > moment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn shift(start: OffsetDateTime, end: OffsetDateTime) -> Shift {
        Shift {
            id: ShiftId::new("s1"),
            employee_id: EmployeeId::new("emp-1"),
            start,
            end,
            day_off: false,
        }
    }

    #[test]
    fn duration_in_hours() {
        let s = shift(
            datetime!(2025-06-13 08:00 UTC),
            datetime!(2025-06-13 18:00 UTC),
        );
        assert_eq!(s.duration_hours(), 10.0);
    }

    #[test]
    fn starts_after_is_strict() {
        let s = shift(
            datetime!(2025-06-13 08:00 UTC),
            datetime!(2025-06-13 18:00 UTC),
        );
        assert!(s.starts_after(datetime!(2025-06-13 07:59 UTC)));
        assert!(!s.starts_after(datetime!(2025-06-13 08:00 UTC)));
    }
}
