use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use eyre::{Error, Result};
use log::info;
use model::{
    attendance::{self, AttendanceRecord, SessionLock},
    schedule,
    session::Session,
};
use mongodb::bson::oid::ObjectId;
use storage::attendance::AttendanceStore;
use thiserror::Error;
use tx_macro::tx;

use super::{classes::Classes, enrollments::Enrollments};

/// The attendance recorder: one present/absent decision per
/// (class, student, date), and the irreversible per-(class, date) lock.
#[derive(Clone)]
pub struct Attendance {
    store: Arc<AttendanceStore>,
    classes: Classes,
    enrollments: Enrollments,
}

impl Attendance {
    pub(crate) fn new(
        store: Arc<AttendanceStore>,
        classes: Classes,
        enrollments: Enrollments,
    ) -> Self {
        Attendance {
            store,
            classes,
            enrollments,
        }
    }

    /// Last-write-wins while the session is open; after `lock_session`
    /// the call fails with `SessionLocked` and changes nothing.
    #[tx]
    pub async fn mark(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        student_id: ObjectId,
        date: NaiveDate,
        is_present: bool,
        notes: Option<String>,
    ) -> Result<AttendanceRecord, MarkAttendanceError> {
        let class = self
            .classes
            .get_by_id(session, class_id)
            .await?
            .ok_or(MarkAttendanceError::ClassNotFound)?;

        if !class.in_range(date) || class.slot_for(date).is_none() {
            return Err(MarkAttendanceError::DateNotInSchedule);
        }

        let eligible = self.enrollments.eligible_students(session, class_id).await?;
        if !eligible.contains(&student_id) {
            return Err(MarkAttendanceError::StudentNotEligible);
        }

        if self.store.is_locked(session, class_id, date).await? {
            return Err(MarkAttendanceError::SessionLocked);
        }

        let session_number = schedule::session_number_for(&class, date);
        let record = AttendanceRecord::new(
            class_id,
            student_id,
            date,
            session_number,
            is_present,
            notes,
            Utc::now(),
        );
        self.store.upsert_mark(session, &record).await?;
        Ok(record)
    }

    /// Backfills an absent record for every eligible student without an
    /// explicit mark, then freezes all records for the key. Idempotent.
    /// The transaction makes lock, backfill, and freeze one atomic
    /// write; a racing mark either lands before the lock or fails.
    #[tx]
    pub async fn lock_session(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        date: NaiveDate,
    ) -> Result<(), MarkAttendanceError> {
        let class = self
            .classes
            .get_by_id(session, class_id)
            .await?
            .ok_or(MarkAttendanceError::ClassNotFound)?;

        let lock = SessionLock::new(class_id, date, session.trainer());
        if !self.store.try_lock(session, &lock).await? {
            return Ok(());
        }

        let eligible = self.enrollments.eligible_students(session, class_id).await?;
        let existing = self.store.for_class_and_date(session, class_id, date).await?;
        let session_number = schedule::session_number_for(&class, date);
        let now = Utc::now();

        let missing = attendance::absentees(&eligible, &existing);
        info!(
            "Lock session: class {:?} {} with {} backfilled absences",
            class_id,
            date,
            missing.len()
        );
        for student_id in missing {
            let record =
                AttendanceRecord::absent(class_id, student_id, date, session_number, now);
            self.store.insert_absent(session, &record).await?;
        }

        self.store.set_locked(session, class_id, date).await?;
        Ok(())
    }

    pub async fn is_session_locked(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        date: NaiveDate,
    ) -> Result<bool, Error> {
        self.store.is_locked(session, class_id, date).await
    }

    pub async fn records_for_date(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, Error> {
        self.store.for_class_and_date(session, class_id, date).await
    }
}

#[derive(Debug, Error)]
pub enum MarkAttendanceError {
    #[error("Class not found")]
    ClassNotFound,
    #[error("Date is not a session occurrence of the class")]
    DateNotInSchedule,
    #[error("Student is not enrolled with a paid status")]
    StudentNotEligible,
    #[error("Session is already finalized")]
    SessionLocked,
    #[error("Common error:{0}")]
    Common(#[from] eyre::Error),
}

impl From<mongodb::error::Error> for MarkAttendanceError {
    fn from(e: mongodb::error::Error) -> Self {
        MarkAttendanceError::Common(e.into())
    }
}
