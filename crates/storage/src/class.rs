use bson::{to_bson, to_document};
use eyre::Error;
use futures_util::TryStreamExt as _;
use log::info;
use model::{
    class::{ClassDefinition, ClassStatus},
    session::Session,
    slot::RecurringSlot,
};
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::UpdateOptions,
    Collection,
};

const COLLECTION: &str = "classes";

#[derive(Clone)]
pub struct ClassStore {
    pub(crate) store: Collection<ClassDefinition>,
}

impl ClassStore {
    pub(crate) fn new(db: &mongodb::Database) -> Self {
        let store = db.collection(COLLECTION);
        ClassStore { store }
    }

    pub async fn get_by_id(
        &self,
        session: &mut Session,
        id: ObjectId,
    ) -> Result<Option<ClassDefinition>, Error> {
        Ok(self
            .store
            .find_one(doc! { "_id": id })
            .session(&mut *session)
            .await?)
    }

    pub async fn find(
        &self,
        session: &mut Session,
        query: Option<&str>,
    ) -> Result<Vec<ClassDefinition>, Error> {
        let filter = if let Some(query) = query {
            doc! { "name": { "$regex": query, "$options": "i" } }
        } else {
            doc! {}
        };

        let mut cursor = self.store.find(filter).session(&mut *session).await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn by_status(
        &self,
        session: &mut Session,
        status: ClassStatus,
    ) -> Result<Vec<ClassDefinition>, Error> {
        let filter = doc! { "status": status.to_string() };
        let mut cursor = self.store.find(filter).session(&mut *session).await?;
        Ok(cursor.stream(&mut *session).try_collect().await?)
    }

    pub async fn insert(&self, session: &mut Session, class: &ClassDefinition) -> Result<(), Error> {
        info!("Insert class: {:?}", class);
        let result = self
            .store
            .update_one(
                doc! { "name": class.name.clone() },
                doc! { "$setOnInsert": to_document(class)? },
            )
            .with_options(UpdateOptions::builder().upsert(true).build())
            .session(&mut *session)
            .await?;

        if result.upserted_id.is_none() {
            return Err(Error::msg("Class already exists"));
        }
        Ok(())
    }

    pub async fn update_status(
        &self,
        session: &mut Session,
        id: ObjectId,
        status: ClassStatus,
    ) -> Result<(), Error> {
        info!("Update class status: {:?} {}", id, status);
        let result = self
            .store
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "status": status.to_string() }, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;

        if result.matched_count == 0 {
            return Err(eyre::eyre!("Class not found"));
        }
        Ok(())
    }

    pub async fn update_slots(
        &self,
        session: &mut Session,
        id: ObjectId,
        slots: &[RecurringSlot],
    ) -> Result<(), Error> {
        info!("Update class slots: {:?} {:?}", id, slots);
        let result = self
            .store
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "slots": to_bson(slots)? }, "$inc": { "version": 1 } },
            )
            .session(&mut *session)
            .await?;

        if result.matched_count == 0 {
            return Err(eyre::eyre!("Class not found"));
        }
        Ok(())
    }

    pub async fn update_enrolled(
        &self,
        session: &mut Session,
        id: ObjectId,
        delta: i32,
    ) -> Result<(), Error> {
        let result = self
            .store
            .update_one(
                doc! { "_id": id },
                doc! { "$inc": { "enrolled": delta, "version": 1 } },
            )
            .session(&mut *session)
            .await?;

        if result.matched_count == 0 {
            return Err(eyre::eyre!("Class not found"));
        }
        Ok(())
    }

    pub async fn delete(&self, session: &mut Session, id: ObjectId) -> Result<(), Error> {
        info!("Delete class: {:?}", id);
        self.store
            .delete_one(doc! { "_id": id })
            .session(&mut *session)
            .await?;
        Ok(())
    }
}
