use crate::storage::records::{DistrictRow, NewDistrict, StateRow, StateStats};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

const REQUIRED_TABLES: [&str; 2] = ["state", "district"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open database {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("database is missing table `{0}`")]
    MissingTable(&'static str),

    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error("database task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage handle for the COVID-19 database.
///
/// Holds the single SQLite connection opened at startup. Cloning shares the
/// same connection. Statements run on the blocking thread pool and are
/// serialized by the mutex.
#[derive(Clone)]
pub struct CovidStore {
    conn: Arc<Mutex<Connection>>,
}

impl CovidStore {
    /// Open an existing database file.
    ///
    /// The file is never created: a missing path, an unreadable file, or a
    /// database without the `state` and `district` tables is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| {
            StorageError::Open {
                path: path.display().to_string(),
                source,
            }
        })?;

        verify_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StorageError::LockPoisoned)?;
            f(&*conn)
        })
        .await?
    }

    /// Number of rows in the `state` table.
    pub async fn count_states(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM state", [], |row| row.get(0))?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
        .await
    }

    pub async fn list_states(&self) -> Result<Vec<StateRow>> {
        let states = self
            .with_conn(|conn| {
                let mut stmt = conn.prepare("SELECT state_id, state_name, population FROM state")?;
                let rows = stmt
                    .query_map([], state_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        debug!(count = states.len(), "Listed states");
        Ok(states)
    }

    pub async fn get_state(&self, state_id: i64) -> Result<Option<StateRow>> {
        self.with_conn(move |conn| {
            let state = conn
                .query_row(
                    "SELECT state_id, state_name, population FROM state WHERE state_id = ?1",
                    params![state_id],
                    state_from_row,
                )
                .optional()?;
            Ok(state)
        })
        .await
    }

    /// Insert a district and return the id SQLite assigned to it.
    ///
    /// `state_id` is stored as given; no matching state is required.
    pub async fn add_district(&self, district: NewDistrict) -> Result<i64> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO district (district_name, state_id, cases, cured, active, deaths)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    district.district_name,
                    district.state_id,
                    district.cases,
                    district.cured,
                    district.active,
                    district.deaths,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn get_district(&self, district_id: i64) -> Result<Option<DistrictRow>> {
        self.with_conn(move |conn| {
            let district = conn
                .query_row(
                    "SELECT district_id, district_name, state_id, cases, cured, active, deaths
                     FROM district WHERE district_id = ?1",
                    params![district_id],
                    district_from_row,
                )
                .optional()?;
            Ok(district)
        })
        .await
    }

    /// Delete a district. Returns the number of rows removed (0 for an unknown id).
    pub async fn delete_district(&self, district_id: i64) -> Result<usize> {
        self.with_conn(move |conn| {
            let removed = conn.execute(
                "DELETE FROM district WHERE district_id = ?1",
                params![district_id],
            )?;
            Ok(removed)
        })
        .await
    }

    /// Overwrite all mutable columns of a district. Returns the number of rows changed.
    pub async fn update_district(&self, district_id: i64, district: NewDistrict) -> Result<usize> {
        self.with_conn(move |conn| {
            let updated = conn.execute(
                "UPDATE district
                 SET district_name = ?1, state_id = ?2, cases = ?3,
                     cured = ?4, active = ?5, deaths = ?6
                 WHERE district_id = ?7",
                params![
                    district.district_name,
                    district.state_id,
                    district.cases,
                    district.cured,
                    district.active,
                    district.deaths,
                    district_id,
                ],
            )?;
            Ok(updated)
        })
        .await
    }

    pub async fn state_stats(&self, state_id: i64) -> Result<StateStats> {
        self.with_conn(move |conn| {
            let stats = conn.query_row(
                "SELECT SUM(cases), SUM(cured), SUM(active), SUM(deaths)
                 FROM district WHERE state_id = ?1",
                params![state_id],
                |row| {
                    Ok(StateStats {
                        total_cases: row.get(0)?,
                        total_cured: row.get(1)?,
                        total_active: row.get(2)?,
                        total_deaths: row.get(3)?,
                    })
                },
            )?;
            Ok(stats)
        })
        .await
    }

    /// Name of the state a district belongs to.
    ///
    /// The outer `None` means no district joined a state; the inner one is a
    /// state whose `state_name` is NULL.
    pub async fn district_state_name(&self, district_id: i64) -> Result<Option<Option<String>>> {
        self.with_conn(move |conn| {
            let name = conn
                .query_row(
                    "SELECT DISTINCT state.state_name
                     FROM state INNER JOIN district ON state.state_id = district.state_id
                     WHERE district.district_id = ?1",
                    params![district_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(name)
        })
        .await
    }
}

fn verify_schema(conn: &Connection) -> Result<()> {
    for table in REQUIRED_TABLES {
        let found: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get(0),
        )?;
        if found == 0 {
            return Err(StorageError::MissingTable(table));
        }
    }
    Ok(())
}

fn state_from_row(row: &Row<'_>) -> rusqlite::Result<StateRow> {
    Ok(StateRow {
        state_id: row.get(0)?,
        state_name: row.get(1)?,
        population: row.get(2)?,
    })
}

fn district_from_row(row: &Row<'_>) -> rusqlite::Result<DistrictRow> {
    Ok(DistrictRow {
        district_id: row.get(0)?,
        district_name: row.get(1)?,
        state_id: row.get(2)?,
        cases: row.get(3)?,
        cured: row.get(4)?,
        active: row.get(5)?,
        deaths: row.get(6)?,
    })
}

#[cfg(test)]
pub(crate) const SCHEMA: &str = "
    CREATE TABLE state (
        state_id INTEGER PRIMARY KEY,
        state_name TEXT,
        population INTEGER
    );
    CREATE TABLE district (
        district_id INTEGER PRIMARY KEY AUTOINCREMENT,
        district_name TEXT,
        state_id INTEGER,
        cases INTEGER,
        cured INTEGER,
        active INTEGER,
        deaths INTEGER
    );
";

#[cfg(test)]
impl CovidStore {
    /// In-memory store with the schema already created.
    pub(crate) fn in_memory() -> Self {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        Self::from_connection(conn)
    }

    /// Run raw SQL directly, bypassing the blocking pool.
    pub(crate) fn execute_raw(&self, sql: &str) {
        self.conn.lock().unwrap().execute_batch(sql).unwrap();
    }

    pub(crate) fn seed_state(&self, state_id: i64, state_name: &str, population: i64) {
        self.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO state (state_id, state_name, population) VALUES (?1, ?2, ?3)",
                params![state_id, state_name, population],
            )
            .unwrap();
    }
}
