use std::sync::Arc;

use bson::Document;
use eyre::{Error, Result};
use model::{normalize, session::Session, statistics::AttendanceStats};
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use storage::attendance::AttendanceStore;

/// Aggregated attendance views. Raw documents go through the normalizer
/// before folding; locked sessions were already backfilled by the
/// recorder, so there is no date-range reasoning here.
#[derive(Clone)]
pub struct Statistics {
    store: Arc<AttendanceStore>,
}

impl Statistics {
    pub(crate) fn new(store: Arc<AttendanceStore>) -> Self {
        Statistics { store }
    }

    pub async fn student_class_stats(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        student_id: ObjectId,
    ) -> Result<AttendanceStats, Error> {
        let raw = self
            .store
            .raw_for_student_in_class(session, class_id, student_id)
            .await?;
        Ok(fold(raw))
    }

    pub async fn student_stats(
        &self,
        session: &mut Session,
        student_id: ObjectId,
    ) -> Result<AttendanceStats, Error> {
        let raw = self.store.raw_for_student(session, student_id).await?;
        Ok(fold(raw))
    }

    pub async fn class_stats(
        &self,
        session: &mut Session,
        class_id: ObjectId,
    ) -> Result<AttendanceStats, Error> {
        let raw = self.store.raw_for_class(session, class_id).await?;
        Ok(fold(raw))
    }
}

fn fold(raw: Vec<Document>) -> AttendanceStats {
    let values: Vec<Value> = raw
        .iter()
        .filter_map(|document| serde_json::to_value(document).ok())
        .collect();
    let records = normalize::normalize_attendance_list(&Value::Array(values));
    AttendanceStats::new(records.iter())
}
