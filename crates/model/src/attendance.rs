use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One present/absent decision for a student in a concrete class
/// session. While the session is open a later mark overwrites an
/// earlier one.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AttendanceRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub class_id: ObjectId,
    pub student_id: ObjectId,
    pub date: NaiveDate,
    pub session_number: u32,
    pub is_present: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub marked_at: DateTime<Utc>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub version: u64,
}

impl AttendanceRecord {
    pub fn new(
        class_id: ObjectId,
        student_id: ObjectId,
        date: NaiveDate,
        session_number: u32,
        is_present: bool,
        notes: Option<String>,
        marked_at: DateTime<Utc>,
    ) -> AttendanceRecord {
        AttendanceRecord {
            id: ObjectId::new(),
            class_id,
            student_id,
            date,
            session_number,
            is_present,
            notes,
            marked_at,
            is_locked: false,
            version: 0,
        }
    }

    /// Default-absent record written at lock time.
    pub fn absent(
        class_id: ObjectId,
        student_id: ObjectId,
        date: NaiveDate,
        session_number: u32,
        marked_at: DateTime<Utc>,
    ) -> AttendanceRecord {
        AttendanceRecord::new(
            class_id,
            student_id,
            date,
            session_number,
            false,
            None,
            marked_at,
        )
    }

    pub fn status(&self) -> &'static str {
        if self.is_present {
            "present"
        } else {
            "absent"
        }
    }
}

/// Eligible students without a record, backfilled as absent at lock
/// time.
pub fn absentees(eligible: &[ObjectId], existing: &[AttendanceRecord]) -> Vec<ObjectId> {
    eligible
        .iter()
        .filter(|id| !existing.iter().any(|record| record.student_id == **id))
        .copied()
        .collect()
}

/// The irreversible per-(class, date) lock. No reverse transition.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionLock {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub class_id: ObjectId,
    pub date: NaiveDate,
    pub locked_by: ObjectId,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub locked_at: DateTime<Utc>,
}

impl SessionLock {
    pub fn new(class_id: ObjectId, date: NaiveDate, locked_by: ObjectId) -> SessionLock {
        SessionLock {
            id: ObjectId::new(),
            class_id,
            date,
            locked_by,
            locked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(student_id: ObjectId, is_present: bool) -> AttendanceRecord {
        AttendanceRecord::new(
            ObjectId::new(),
            student_id,
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            3,
            is_present,
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_absentees_skips_marked_students() {
        let marked = ObjectId::new();
        let skipped = ObjectId::new();
        let missing = ObjectId::new();

        let existing = vec![record(marked, true), record(skipped, false)];
        let eligible = vec![marked, skipped, missing];

        assert_eq!(absentees(&eligible, &existing), vec![missing]);
    }

    #[test]
    fn test_absentees_empty_session() {
        let eligible = vec![ObjectId::new(), ObjectId::new()];
        assert_eq!(absentees(&eligible, &[]), eligible);
        assert!(absentees(&[], &[]).is_empty());
    }

    #[test]
    fn test_status_string() {
        assert_eq!(record(ObjectId::new(), true).status(), "present");
        assert_eq!(record(ObjectId::new(), false).status(), "absent");
    }
}
