//! User document and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User document as stored in the users collection
///
/// `created_at` and `updated_at` are row metadata; they never appear in a
/// response payload (see the view models in `views`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub login_name: String,
    pub location: String,
    pub description: String,
    pub occupation: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub login_name: String,
    pub location: String,
    pub description: String,
    pub occupation: String,
}

impl NewUser {
    /// Minimal registration record: the login name doubles as the first
    /// name and every profile field starts out empty.
    pub fn from_login_name(login_name: &str) -> Self {
        Self {
            first_name: login_name.to_string(),
            last_name: String::new(),
            login_name: login_name.to_string(),
            location: String::new(),
            description: String::new(),
            occupation: String::new(),
        }
    }
}
