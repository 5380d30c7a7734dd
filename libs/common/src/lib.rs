//! Common library for the Foto Kunga application
//!
//! This crate provides shared functionality used across different services
//! in the Foto Kunga application, including database connectivity and error
//! handling.

pub mod database;
pub mod error;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        let result = 2 + 2;
        assert_eq!(result, 4);
    }
}

/// Example usage of the database module
///
/// Services open a pool from the environment, verify connectivity, then run
/// their own migrations with [`database::run_migrations`] before serving.
///
/// ```rust,no_run
/// use common::database::{health_check, init_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = init_pool(&DatabaseConfig::from_env()?).await?;
///     if !health_check(&pool).await? {
///         return Err("database is not reachable".into());
///     }
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
