use std::{ops::Deref, sync::Arc};

use chrono::NaiveDate;
use eyre::{Error, Result};
use model::{enrollment::EnrollmentRecord, session::Session};
use mongodb::bson::oid::ObjectId;
use storage::enrollment::EnrollmentStore;
use tx_macro::tx;

#[derive(Clone)]
pub struct Enrollments {
    store: Arc<EnrollmentStore>,
}

impl Enrollments {
    pub(crate) fn new(store: Arc<EnrollmentStore>) -> Self {
        Enrollments { store }
    }

    #[tx]
    pub async fn enroll(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        student_id: ObjectId,
        enrollment_date: NaiveDate,
    ) -> Result<ObjectId, Error> {
        let enrollment = EnrollmentRecord::new(class_id, student_id, enrollment_date);
        self.store.enroll(session, &enrollment).await?;
        Ok(enrollment.id)
    }

    #[tx]
    pub async fn set_payment_status(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        student_id: ObjectId,
        paid: bool,
    ) -> Result<(), Error> {
        self.store
            .set_payment_status(session, class_id, student_id, paid)
            .await
    }

    /// Students offered for attendance marking in a class.
    pub async fn eligible_students(
        &self,
        session: &mut Session,
        class_id: ObjectId,
    ) -> Result<Vec<ObjectId>, Error> {
        let enrollments = self.store.eligible_for_class(session, class_id).await?;
        Ok(enrollments
            .into_iter()
            .map(|enrollment| enrollment.student_id)
            .collect())
    }
}

impl Deref for Enrollments {
    type Target = EnrollmentStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
