pub mod attendance;
pub mod classes;
pub mod enrollments;
pub mod schedule;
pub mod statistics;
