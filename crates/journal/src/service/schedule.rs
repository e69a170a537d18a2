use chrono::NaiveDate;
use model::{
    errors::JournalError,
    schedule::{self, SessionOccurrence},
    session::Session,
};
use mongodb::bson::oid::ObjectId;

use super::classes::Classes;

/// Computed schedule views. All calendar logic lives in
/// `model::schedule`; this only resolves the class.
#[derive(Clone)]
pub struct Schedule {
    classes: Classes,
}

impl Schedule {
    pub(crate) fn new(classes: Classes) -> Self {
        Schedule { classes }
    }

    pub async fn occurrences(
        &self,
        session: &mut Session,
        class_id: ObjectId,
    ) -> Result<Vec<SessionOccurrence>, JournalError> {
        let class = self
            .classes
            .get_by_id(session, class_id)
            .await?
            .ok_or(JournalError::ClassNotFound(class_id))?;
        Ok(schedule::expand_schedule(&class))
    }

    pub async fn session_number(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        date: NaiveDate,
    ) -> Result<u32, JournalError> {
        let class = self
            .classes
            .get_by_id(session, class_id)
            .await?
            .ok_or(JournalError::ClassNotFound(class_id))?;
        Ok(schedule::session_number_for(&class, date))
    }
}
