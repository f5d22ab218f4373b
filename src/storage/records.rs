//! Rows as stored in SQLite.
//!
//! Seeded data may leave any non-key column NULL, so those columns are optional
//! when read back. Writes through [`NewDistrict`] always carry every value.

/// A row of the `state` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRow {
    pub state_id: i64,
    pub state_name: Option<String>,
    pub population: Option<i64>,
}

/// A row of the `district` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictRow {
    pub district_id: i64,
    pub district_name: Option<String>,
    pub state_id: Option<i64>,
    pub cases: Option<i64>,
    pub cured: Option<i64>,
    pub active: Option<i64>,
    pub deaths: Option<i64>,
}

/// The mutable columns of a district, used for both insert and full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDistrict {
    pub district_name: String,
    pub state_id: i64,
    pub cases: i64,
    pub cured: i64,
    pub active: i64,
    pub deaths: i64,
}

/// Per-state sums of district counters.
///
/// Every total is `None` when the state has no districts, matching SQL `SUM`
/// over an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateStats {
    pub total_cases: Option<i64>,
    pub total_cured: Option<i64>,
    pub total_active: Option<i64>,
    pub total_deaths: Option<i64>,
}
