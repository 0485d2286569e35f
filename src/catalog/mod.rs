pub mod fixtures;
mod store;
mod types;

pub use store::{AttendanceStore, InMemoryStore};
pub use types::{AttendanceRecord, Class, Student};
