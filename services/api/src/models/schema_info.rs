//! Schema metadata singleton and collection counts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Schema/version metadata document
///
/// Exactly one instance exists per store; it doubles as a connectivity
/// check for the `/test/info` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SchemaInfo {
    pub version: String,
    pub load_date_time: DateTime<Utc>,
}

/// Per-collection document counts for `/test/counts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCounts {
    pub user: i64,
    pub photo: i64,
    #[serde(rename = "schemaInfo")]
    pub schema_info: i64,
}
