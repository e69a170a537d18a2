use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

/// One weekly time window. `day_of_week` is 0=Sunday; times are local
/// wall-clock strings ("18:00"), compared lexically.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RecurringSlot {
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
}

impl RecurringSlot {
    pub fn new(day_of_week: u8, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        RecurringSlot {
            day_of_week,
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.day_of_week <= 6 && self.start_time < self.end_time
    }

    /// Day-matching predicate shared by expansion and numbering.
    pub fn matches(&self, date: NaiveDate) -> bool {
        u32::from(self.day_of_week) == date.weekday().num_days_from_sunday()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_sunday_zero() {
        // 2024-01-07 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert!(RecurringSlot::new(0, "10:00", "11:00").matches(sunday));
        assert!(!RecurringSlot::new(1, "10:00", "11:00").matches(sunday));
    }

    #[test]
    fn test_matches_monday() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(RecurringSlot::new(1, "18:00", "19:00").matches(monday));
        assert!(!RecurringSlot::new(0, "18:00", "19:00").matches(monday));
    }

    #[test]
    fn test_validity() {
        assert!(RecurringSlot::new(6, "08:00", "09:30").is_valid());
        assert!(!RecurringSlot::new(7, "08:00", "09:30").is_valid());
        assert!(!RecurringSlot::new(3, "10:00", "10:00").is_valid());
        assert!(!RecurringSlot::new(3, "19:00", "18:00").is_valid());
    }
}
