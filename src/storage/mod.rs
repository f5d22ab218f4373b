pub mod records;
pub mod sqlite;

pub use records::{DistrictRow, NewDistrict, StateRow, StateStats};
pub use sqlite::{CovidStore, StorageError};
