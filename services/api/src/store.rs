//! Document store adapter for database operations
//!
//! The handlers only ever see this trait; the concrete backend (PostgreSQL
//! or in-memory) is picked at startup and carried in the application state
//! as `Arc<dyn DocumentStore>`.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    CollectionCounts, Comment, NewComment, NewPhoto, NewUser, Photo, SchemaInfo, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Query and mutation surface over the three document collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All users, in insertion order
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Find a user by ID
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Find a user by unique login name
    async fn find_user_by_login(&self, login_name: &str) -> Result<Option<User>>;

    /// Create a new user
    async fn create_user(&self, new_user: NewUser) -> Result<User>;

    /// All photos owned by a user, oldest first
    async fn photos_of_user(&self, user_id: Uuid) -> Result<Vec<Photo>>;

    /// Create a new photo with an empty comment sequence
    async fn create_photo(&self, new_photo: NewPhoto) -> Result<Photo>;

    /// Append a comment to a photo's sequence
    ///
    /// Returns `None` when the photo does not exist; the sequence order of
    /// existing comments is never touched.
    async fn add_comment(
        &self,
        photo_id: Uuid,
        new_comment: NewComment,
    ) -> Result<Option<Comment>>;

    /// The schema metadata singleton
    async fn schema_info(&self) -> Result<Option<SchemaInfo>>;

    /// Document counts of all collections
    async fn counts(&self) -> Result<CollectionCounts>;
}
