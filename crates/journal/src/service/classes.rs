use std::{ops::Deref, sync::Arc};

use chrono::NaiveDate;
use eyre::{Error, Result};
use model::{
    class::{ClassDefinition, ClassStatus},
    session::Session,
    slot::RecurringSlot,
};
use mongodb::bson::oid::ObjectId;
use storage::class::ClassStore;
use tx_macro::tx;

#[derive(Clone)]
pub struct Classes {
    store: Arc<ClassStore>,
}

impl Classes {
    pub(crate) fn new(store: Arc<ClassStore>) -> Self {
        Classes { store }
    }

    #[tx]
    pub async fn create(
        &self,
        session: &mut Session,
        name: String,
        description: String,
        capacity: u32,
        instructor: ObjectId,
        instructor_name: String,
        service_id: ObjectId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        slots: Vec<RecurringSlot>,
        total_sessions: u32,
    ) -> Result<ObjectId, Error> {
        if start_date > end_date {
            return Err(eyre::eyre!("Start date is after end date"));
        }
        if let Some(slot) = slots.iter().find(|slot| !slot.is_valid()) {
            return Err(eyre::eyre!("Invalid recurring slot:{:?}", slot));
        }

        let class = ClassDefinition::new(
            name,
            description,
            capacity,
            instructor,
            instructor_name,
            service_id,
            start_date,
            end_date,
            slots,
            total_sessions,
        );
        self.store.insert(session, &class).await?;
        Ok(class.id)
    }

    #[tx]
    pub async fn set_status(
        &self,
        session: &mut Session,
        id: ObjectId,
        status: ClassStatus,
    ) -> Result<(), Error> {
        self.store.update_status(session, id, status).await
    }

    #[tx]
    pub async fn edit_slots(
        &self,
        session: &mut Session,
        id: ObjectId,
        slots: Vec<RecurringSlot>,
    ) -> Result<(), Error> {
        if let Some(slot) = slots.iter().find(|slot| !slot.is_valid()) {
            return Err(eyre::eyre!("Invalid recurring slot:{:?}", slot));
        }
        self.store.update_slots(session, id, &slots).await
    }
}

impl Deref for Classes {
    type Target = ClassStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
