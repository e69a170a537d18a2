use bson::{to_document, Document};
use chrono::NaiveDate;
use eyre::Error;
use futures_util::TryStreamExt as _;
use log::info;
use model::{
    attendance::{AttendanceRecord, SessionLock},
    session::Session,
};
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{IndexOptions, UpdateOptions},
    Collection, Database, IndexModel,
};

const COLLECTION: &str = "attendance";
const LOCK_COLLECTION: &str = "session_locks";

#[derive(Clone)]
pub struct AttendanceStore {
    pub(crate) store: Collection<AttendanceRecord>,
    // Same collection, untyped. Legacy callers wrote records with their
    // own field names; reads that feed the normalizer must not assume
    // the canonical shape.
    raw: Collection<Document>,
    locks: Collection<SessionLock>,
}

impl AttendanceStore {
    pub(crate) async fn new(db: &Database) -> Result<Self, Error> {
        let store: Collection<AttendanceRecord> = db.collection(COLLECTION);
        let index = IndexModel::builder()
            .keys(doc! { "class_id": 1, "student_id": 1, "date": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        store.create_index(index).await?;

        let locks: Collection<SessionLock> = db.collection(LOCK_COLLECTION);
        let index = IndexModel::builder()
            .keys(doc! { "class_id": 1, "date": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        locks.create_index(index).await?;

        Ok(AttendanceStore {
            raw: db.collection(COLLECTION),
            store,
            locks,
        })
    }

    pub async fn is_locked(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        date: NaiveDate,
    ) -> Result<bool, Error> {
        let lock = self
            .locks
            .find_one(doc! { "class_id": class_id, "date": date.to_string() })
            .session(&mut *session)
            .await?;
        Ok(lock.is_some())
    }

    /// Transitions the (class, date) key to `Locked`. Returns false when
    /// the key was locked already; the unique index makes the insert the
    /// serialization point for concurrent lockers.
    pub async fn try_lock(&self, session: &mut Session, lock: &SessionLock) -> Result<bool, Error> {
        info!("Lock session: {:?} {}", lock.class_id, lock.date);
        let result = self
            .locks
            .update_one(
                doc! { "class_id": lock.class_id, "date": lock.date.to_string() },
                doc! { "$setOnInsert": to_document(lock)? },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .session(&mut *session)
            .await?;
        Ok(result.upserted_id.is_some())
    }

    /// Last-write-wins upsert keyed by (class, student, date).
    pub async fn upsert_mark(
        &self,
        session: &mut Session,
        record: &AttendanceRecord,
    ) -> Result<(), Error> {
        info!(
            "Mark attendance: class {:?} student {:?} {} -> {}",
            record.class_id,
            record.student_id,
            record.date,
            record.status()
        );
        self.store
            .update_one(
                doc! {
                    "class_id": record.class_id,
                    "student_id": record.student_id,
                    "date": record.date.to_string(),
                },
                doc! {
                    "$set": {
                        "session_number": record.session_number,
                        "is_present": record.is_present,
                        "notes": record.notes.clone(),
                        "marked_at": bson::DateTime::from_chrono(record.marked_at),
                        "is_locked": false,
                    },
                    "$setOnInsert": { "_id": record.id },
                    "$inc": { "version": 1 },
                },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .session(&mut *session)
            .await?;
        Ok(())
    }

    /// Backfill insert at lock time; `$setOnInsert` keeps an explicit
    /// mark racing the lock from being overwritten.
    pub async fn insert_absent(
        &self,
        session: &mut Session,
        record: &AttendanceRecord,
    ) -> Result<(), Error> {
        self.store
            .update_one(
                doc! {
                    "class_id": record.class_id,
                    "student_id": record.student_id,
                    "date": record.date.to_string(),
                },
                doc! { "$setOnInsert": to_document(record)? },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn set_locked(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        date: NaiveDate,
    ) -> Result<(), Error> {
        self.store
            .update_many(
                doc! { "class_id": class_id, "date": date.to_string() },
                doc! { "$set": { "is_locked": true }, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn for_class_and_date(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, Error> {
        let filter = doc! { "class_id": class_id, "date": date.to_string() };
        let mut cursor = self.store.find(filter).session(&mut *session).await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn raw_for_class(
        &self,
        session: &mut Session,
        class_id: ObjectId,
    ) -> Result<Vec<Document>, Error> {
        let filter = doc! {
            "$or": [ { "class_id": class_id }, { "classId": class_id } ]
        };
        let mut cursor = self.raw.find(filter).session(&mut *session).await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn raw_for_student(
        &self,
        session: &mut Session,
        student_id: ObjectId,
    ) -> Result<Vec<Document>, Error> {
        let filter = doc! {
            "$or": [ { "student_id": student_id }, { "studentId": student_id } ]
        };
        let mut cursor = self.raw.find(filter).session(&mut *session).await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn raw_for_student_in_class(
        &self,
        session: &mut Session,
        class_id: ObjectId,
        student_id: ObjectId,
    ) -> Result<Vec<Document>, Error> {
        let filter = doc! {
            "$and": [
                { "$or": [ { "class_id": class_id }, { "classId": class_id } ] },
                { "$or": [ { "student_id": student_id }, { "studentId": student_id } ] },
            ]
        };
        let mut cursor = self.raw.find(filter).session(&mut *session).await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }
}
