pub mod manager;
pub mod models;
pub mod params;
pub mod record;

pub use manager::{DatabaseError, DatabaseManager};
pub use record::{RecordError, Validate};
