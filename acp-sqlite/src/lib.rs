#![warn(missing_docs)]
// Note: this overwrites the link in the README to point to the rust docs of the acp-core crate.
//! [acp_core]: https://docs.rs/acp_core/latest/acp_core/index.html
#![doc = include_str!("../README.md")]

use sqlx::sqlite;
use std::{str::FromStr, time::Duration};
use tokio::try_join;

pub mod config;
mod r#impl;
pub mod types;

use config::SqliteConfig;

/// SQLite implementation of the platform repositories.
///
/// Reads go through `reader`, a regular pool. Writes go through `writer`,
/// which holds a single connection so that every write, and in particular
/// every conditional bid update, is serialized.
///
/// # Example
///
/// ```no_run
/// # use acp_sqlite::{Db, config::SqliteConfig};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Db::open(&SqliteConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Db {
    /// Connection pool for read operations
    pub reader: sqlx::Pool<sqlx::Sqlite>,
    /// Connection pool for write operations (limited to 1 connection)
    pub writer: sqlx::Pool<sqlx::Sqlite>,
}

impl Db {
    /// Open a connection to the configured SQLite database.
    ///
    /// Creates the database if it is missing and `create_if_missing` is set,
    /// then applies all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if connecting fails or a migration cannot be applied.
    pub async fn open(config: &SqliteConfig) -> Result<Self, sqlx::Error> {
        let db_path = config
            .database_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        // sqlx turns ":memory:" into a shared-cache database, so both pools see the same data
        let options =
            sqlite::SqliteConnectOptions::from_str(db_path.as_deref().unwrap_or(":memory:"))?
                .busy_timeout(Duration::from_secs(5))
                .foreign_keys(true)
                .journal_mode(sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlite::SqliteSynchronous::Normal)
                .pragma("journal_size_limit", "27103364")
                .pragma("mmap_size", "134217728")
                .pragma("temp_store", "memory")
                .create_if_missing(config.create_if_missing);

        let reader = sqlite::SqlitePoolOptions::new().connect_with(options.clone());
        let writer = sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options);

        let (reader, writer) = try_join!(reader, writer)?;

        sqlx::migrate!("./schema").run(&writer).await?;

        Ok(Self { reader, writer })
    }
}
