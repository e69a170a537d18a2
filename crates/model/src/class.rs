use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::slot::RecurringSlot;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClassDefinition {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub capacity: u32,
    pub enrolled: u32,
    pub instructor: ObjectId,
    pub instructor_name: String,
    pub service_id: ObjectId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub slots: Vec<RecurringSlot>,
    pub total_sessions: u32,
    #[serde(default)]
    pub status: ClassStatus,
    #[serde(default)]
    pub version: u64,
}

impl ClassDefinition {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
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
    ) -> ClassDefinition {
        ClassDefinition {
            id: ObjectId::new(),
            name,
            description,
            capacity,
            enrolled: 0,
            instructor,
            instructor_name,
            service_id,
            start_date,
            end_date,
            slots,
            total_sessions,
            status: ClassStatus::Upcoming,
            version: 0,
        }
    }

    /// First declared slot matching the date's weekday wins when several
    /// slots share a weekday.
    pub fn slot_for(&self, date: NaiveDate) -> Option<&RecurringSlot> {
        self.slots.iter().find(|slot| slot.matches(date))
    }

    pub fn in_range(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn is_full(&self) -> bool {
        self.enrolled >= self.capacity
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClassStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl ClassStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ClassStatus::Upcoming | ClassStatus::Ongoing)
    }
}

impl Default for ClassStatus {
    fn default() -> Self {
        ClassStatus::Upcoming
    }
}
