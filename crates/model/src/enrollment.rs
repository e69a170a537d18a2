use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnrollmentRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub class_id: ObjectId,
    pub student_id: ObjectId,
    pub enrollment_date: NaiveDate,
    pub status: bool,
    pub payment_status: bool,
    #[serde(default)]
    pub version: u64,
}

impl EnrollmentRecord {
    pub fn new(class_id: ObjectId, student_id: ObjectId, enrollment_date: NaiveDate) -> Self {
        EnrollmentRecord {
            id: ObjectId::new(),
            class_id,
            student_id,
            enrollment_date,
            status: true,
            payment_status: false,
            version: 0,
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.status && self.payment_status
    }
}
