use bson::to_document;
use eyre::Error;
use futures_util::TryStreamExt as _;
use log::info;
use model::{enrollment::EnrollmentRecord, session::Session};
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{IndexOptions, UpdateOptions},
    Collection, Database, IndexModel,
};

const COLLECTION: &str = "enrollments";

#[derive(Clone)]
pub struct EnrollmentStore {
    pub(crate) store: Collection<EnrollmentRecord>,
}

impl EnrollmentStore {
    pub(crate) async fn new(db: &Database) -> Result<Self, Error> {
        let store: Collection<EnrollmentRecord> = db.collection(COLLECTION);
        let index = IndexModel::builder()
            .keys(doc! { "class_id": 1, "student_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        store.create_index(index).await?;

        Ok(EnrollmentStore { store })
    }

    pub async fn enroll(
        &self,
        session: &mut Session,
        enrollment: &EnrollmentRecord,
    ) -> Result<(), Error> {
        info!("Enroll: {:?}", enrollment);
        let result = self
            .store
            .update_one(
                doc! {
                    "class_id": enrollment.class_id,
                    "student_id": enrollment.student_id,
                },
                doc! { "$setOnInsert": to_document(enrollment)? },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .session(&mut *session)
            .await?;

        if result.upserted_id.is_none() {
            return Err(Error::msg("Student already enrolled"));
        }
        Ok(())
    }

    /// Enrollments eligible for attendance marking: active and paid.
    pub async fn eligible_for_class(
        &self,
        session: &mut Session,
        class_id: ObjectId,
    ) -> Result<Vec<EnrollmentRecord>, Error> {
        let filter = doc! {
            "class_id": class_id,
            "status": true,
            "payment_status": true,
        };
        let mut cursor = self.store.find(filter).session(&mut *session).await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn for_student(
        &self,
        session: &mut Session,
        student_id: ObjectId,
    ) -> Result<Vec<EnrollmentRecord>, Error> {
        let mut cursor = self
            .store
            .find(doc! { "student_id": student_id })
            .session(&mut *session)
            .await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn get(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        student_id: ObjectId,
    ) -> Result<Option<EnrollmentRecord>, Error> {
        Ok(self
            .store
            .find_one(doc! { "class_id": class_id, "student_id": student_id })
            .session(&mut *session)
            .await?)
    }

    pub async fn set_payment_status(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        student_id: ObjectId,
        paid: bool,
    ) -> Result<(), Error> {
        info!("Set payment status: {:?} {} {}", class_id, student_id, paid);
        let result = self
            .store
            .update_one(
                doc! { "class_id": class_id, "student_id": student_id },
                doc! { "$set": { "payment_status": paid }, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;

        if result.matched_count == 0 {
            return Err(eyre::eyre!("Enrollment not found"));
        }
        Ok(())
    }

    pub async fn set_status(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        student_id: ObjectId,
        active: bool,
    ) -> Result<(), Error> {
        info!("Set enrollment status: {:?} {} {}", class_id, student_id, active);
        let result = self
            .store
            .update_one(
                doc! { "class_id": class_id, "student_id": student_id },
                doc! { "$set": { "status": active }, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;

        if result.matched_count == 0 {
            return Err(eyre::eyre!("Enrollment not found"));
        }
        Ok(())
    }
}
