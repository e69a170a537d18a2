use std::sync::Arc;

use eyre::{eyre, Context as _, Result};
use model::{class::ClassDefinition, session::Session};
use mongodb::bson::oid::ObjectId;
use service::attendance::Attendance;
use service::classes::Classes;
use service::enrollments::Enrollments;
use service::schedule::Schedule;
use service::statistics::Statistics;
use storage::session::Db;
use storage::Storage;

pub mod service;

#[derive(Clone)]
pub struct Journal {
    pub db: Db,
    pub classes: Classes,
    pub enrollments: Enrollments,
    pub schedule: Schedule,
    pub attendance: Attendance,
    pub statistics: Statistics,
}

impl Journal {
    pub fn new(storage: Storage) -> Self {
        let classes = Classes::new(Arc::new(storage.classes));
        let enrollments = Enrollments::new(Arc::new(storage.enrollments));
        let attendance_store = Arc::new(storage.attendance);
        let schedule = Schedule::new(classes.clone());
        let attendance = Attendance::new(
            attendance_store.clone(),
            classes.clone(),
            enrollments.clone(),
        );
        let statistics = Statistics::new(attendance_store);

        Journal {
            db: storage.db,
            classes,
            enrollments,
            schedule,
            attendance,
            statistics,
        }
    }

    pub async fn get_class(&self, session: &mut Session, id: ObjectId) -> Result<ClassDefinition> {
        self.classes
            .get_by_id(session, id)
            .await
            .context("get_class")?
            .ok_or_else(|| eyre!("Class not found:{}", id))
    }
}
