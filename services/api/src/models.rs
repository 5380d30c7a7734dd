//! API models for stored documents and request payloads

use serde::Deserialize;

pub mod photo;
pub mod schema_info;
pub mod user;

// Re-export for convenience
pub use photo::{Comment, NewComment, NewPhoto, Photo};
pub use schema_info::{CollectionCounts, SchemaInfo};
pub use user::{NewUser, User};

/// Request body for `/admin/login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login_name: String,
}

/// Request body for `/admin/register`
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub login_name: String,
}

/// Request body for `/commentsOfPhoto/:photo_id`
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub comment: Option<String>,
}
