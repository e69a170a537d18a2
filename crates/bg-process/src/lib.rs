use std::time::Duration;

use bson::oid::ObjectId;
use chrono::Local;
use eyre::Error;
use journal::Journal;
use log::error;
use model::{class::ClassStatus, schedule};
use tokio::time;

const INTERVAL: Duration = Duration::from_secs(10 * 60);

pub fn start(journal: Journal) {
    tokio::spawn(async move {
        let mut interval = time::interval(INTERVAL);
        loop {
            interval.tick().await;
            if let Err(err) = process(&journal).await {
                error!("Error in background process: {:#}", err);
            }
        }
    });
}

/// Locks every past occurrence of ongoing classes that a trainer has
/// not finalized yet.
async fn process(journal: &Journal) -> Result<(), Error> {
    let mut session = journal.db.start_session(ObjectId::new()).await?;
    let today = Local::now().date_naive();

    let classes = journal
        .classes
        .by_status(&mut session, ClassStatus::Ongoing)
        .await?;
    for class in classes {
        for occurrence in schedule::expand_schedule(&class) {
            if occurrence.date >= today {
                break;
            }
            if journal
                .attendance
                .is_session_locked(&mut session, class.id, occurrence.date)
                .await?
            {
                continue;
            }
            journal
                .attendance
                .lock_session(&mut session, class.id, occurrence.date)
                .await?;
        }
    }
    Ok(())
}
