use std::ops::{Deref, DerefMut};

use bson::oid::ObjectId;
use mongodb::ClientSession;

/// A MongoDB client session paired with the trainer performing the
/// operation. Identity is always threaded explicitly.
pub struct Session {
    client_session: ClientSession,
    trainer: ObjectId,
}

impl Session {
    pub fn new(client_session: ClientSession, trainer: ObjectId) -> Self {
        Session {
            client_session,
            trainer,
        }
    }

    pub fn trainer(&self) -> ObjectId {
        self.trainer
    }
}

impl Deref for Session {
    type Target = ClientSession;

    fn deref(&self) -> &Self::Target {
        &self.client_session
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.client_session
    }
}

impl<'a> From<&'a mut Session> for &'a mut ClientSession {
    fn from(session: &'a mut Session) -> &'a mut ClientSession {
        &mut session.client_session
    }
}
