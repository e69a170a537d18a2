pub mod attendance;
pub mod class;
pub mod enrollment;
pub mod session;

use attendance::AttendanceStore;
use class::ClassStore;
use enrollment::EnrollmentStore;
use eyre::Result;
use session::Db;

const DB_NAME: &str = "journal_db";

#[derive(Clone)]
pub struct Storage {
    pub db: Db,
    pub classes: ClassStore,
    pub enrollments: EnrollmentStore,
    pub attendance: AttendanceStore,
}

impl Storage {
    pub async fn new(uri: &str) -> Result<Self> {
        let db = Db::new(uri, DB_NAME).await?;
        let classes = ClassStore::new(&db);
        let enrollments = EnrollmentStore::new(&db).await?;
        let attendance = AttendanceStore::new(&db).await?;

        Ok(Storage {
            db,
            classes,
            enrollments,
            attendance,
        })
    }
}
