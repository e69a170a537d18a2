use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceRecord;

/// Attendance counters over recorded sessions. `total_sessions` counts
/// the records folded in, not the class's declared target.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceStats {
    pub total_sessions: u32,
    pub attended_sessions: u32,
    pub missed_sessions: u32,
    pub attendance_rate: u32,
}

impl AttendanceStats {
    pub fn new<'r>(records: impl Iterator<Item = &'r AttendanceRecord>) -> AttendanceStats {
        let mut stats = records.fold(AttendanceStats::default(), |mut acc, record| {
            acc.total_sessions += 1;
            if record.is_present {
                acc.attended_sessions += 1;
            } else {
                acc.missed_sessions += 1;
            }
            acc
        });

        stats.attendance_rate = if stats.total_sessions == 0 {
            0
        } else {
            (f64::from(stats.attended_sessions) / f64::from(stats.total_sessions) * 100.0).round()
                as u32
        };
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use chrono::{NaiveDate, Utc};

    fn record(is_present: bool) -> AttendanceRecord {
        AttendanceRecord::new(
            ObjectId::new(),
            ObjectId::new(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            1,
            is_present,
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_two_of_three_present() {
        let records = vec![record(true), record(true), record(false)];
        let stats = AttendanceStats::new(records.iter());

        assert_eq!(
            stats,
            AttendanceStats {
                total_sessions: 3,
                attended_sessions: 2,
                missed_sessions: 1,
                attendance_rate: 67,
            }
        );
    }

    #[test]
    fn test_empty_records() {
        let stats = AttendanceStats::new([].iter());
        assert_eq!(stats, AttendanceStats::default());
    }

    #[test]
    fn test_all_present() {
        let records = vec![record(true), record(true)];
        let stats = AttendanceStats::new(records.iter());
        assert_eq!(stats.attendance_rate, 100);
        assert_eq!(stats.missed_sessions, 0);
    }
}
