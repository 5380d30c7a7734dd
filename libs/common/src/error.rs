//! Error types shared by the database layer

use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Errors raised while talking to the document store's database
///
/// Connection and configuration problems surface during startup; query
/// errors can happen on any request and are mapped to a store failure by
/// the service that sees them.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Could not open a connection to the database
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A query failed after the connection was established
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Applying the embedded migrations failed
    #[error("Database migration error: {0}")]
    Migration(#[from] MigrateError),

    /// The connection settings could not be parsed
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Result alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
