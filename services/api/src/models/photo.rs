//! Photo document with its embedded comment sequence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Photo document as stored in the photos collection
///
/// Comments are embedded in the document in insertion order; that order is
/// the display order and is never changed by any operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    /// Owner of the photo
    pub user_id: Uuid,
    /// Storage key of the image file under the image root
    pub file_name: String,
    pub date_time: DateTime<Utc>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment embedded in a photo document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub comment: String,
    pub date_time: DateTime<Utc>,
    /// Author of the comment
    pub user_id: Uuid,
}

/// New photo creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPhoto {
    pub user_id: Uuid,
    pub file_name: String,
}

/// New comment creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub comment: String,
    pub user_id: Uuid,
}
