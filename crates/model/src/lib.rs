pub mod attendance;
pub mod class;
pub mod enrollment;
pub mod errors;
pub mod normalize;
pub mod schedule;
pub mod session;
pub mod slot;
pub mod statistics;
