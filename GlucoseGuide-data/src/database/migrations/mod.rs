// Schema migrations for the persistent blob store backends

#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(feature = "sqlite")]
pub use sqlite::run_migrations as run_sqlite_migrations;
