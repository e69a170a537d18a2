use bson::oid::ObjectId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Common error: {0}")]
    Eyre(#[from] eyre::Error),
    #[error("Class not found: {0}")]
    ClassNotFound(ObjectId),
}
