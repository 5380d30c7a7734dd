//! In-memory document store
//!
//! Keeps the three collections in process-local vectors so the service can
//! run without a database (and so the test suite can exercise the full HTTP
//! surface hermetically). Vectors preserve insertion order, which is the
//! only ordering guarantee the store makes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    CollectionCounts, Comment, NewComment, NewPhoto, NewUser, Photo, SchemaInfo, User,
};
use crate::store::DocumentStore;

/// Document store over process-local collections
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    photos: RwLock<Vec<Photo>>,
    schema_info: RwLock<SchemaInfo>,
}

impl MemoryStore {
    /// Create an empty store with the schema metadata singleton seeded
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            photos: RwLock::new(Vec::new()),
            schema_info: RwLock::new(SchemaInfo {
                version: "1.0".to_string(),
                load_date_time: Utc::now(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_login(&self, login_name: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.login_name == login_name).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            login_name: new_user.login_name,
            location: new_user.location,
            description: new_user.description,
            occupation: new_user.occupation,
            created_at: now,
            updated_at: now,
        };

        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn photos_of_user(&self, user_id: Uuid) -> Result<Vec<Photo>> {
        let photos = self.photos.read().await;
        Ok(photos
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_photo(&self, new_photo: NewPhoto) -> Result<Photo> {
        let now = Utc::now();
        let photo = Photo {
            id: Uuid::new_v4(),
            user_id: new_photo.user_id,
            file_name: new_photo.file_name,
            date_time: now,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.photos.write().await.push(photo.clone());
        Ok(photo)
    }

    async fn add_comment(
        &self,
        photo_id: Uuid,
        new_comment: NewComment,
    ) -> Result<Option<Comment>> {
        let mut photos = self.photos.write().await;
        let Some(photo) = photos.iter_mut().find(|p| p.id == photo_id) else {
            return Ok(None);
        };

        let comment = Comment {
            id: Uuid::new_v4(),
            comment: new_comment.comment,
            date_time: Utc::now(),
            user_id: new_comment.user_id,
        };
        photo.comments.push(comment.clone());
        photo.updated_at = comment.date_time;

        Ok(Some(comment))
    }

    async fn schema_info(&self) -> Result<Option<SchemaInfo>> {
        Ok(Some(self.schema_info.read().await.clone()))
    }

    async fn counts(&self) -> Result<CollectionCounts> {
        Ok(CollectionCounts {
            user: self.users.read().await.len() as i64,
            photo: self.photos.read().await.len() as i64,
            schema_info: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_are_idempotent_without_writes() {
        let store = MemoryStore::new();
        store
            .create_user(NewUser::from_login_name("ansel"))
            .await
            .unwrap();

        let first = store.counts().await.unwrap();
        let second = store.counts().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.user, 1);
        assert_eq!(first.photo, 0);
        assert_eq!(first.schema_info, 1);
    }

    #[tokio::test]
    async fn test_comments_append_in_order() {
        let store = MemoryStore::new();
        let owner = store
            .create_user(NewUser::from_login_name("dorothea"))
            .await
            .unwrap();
        let photo = store
            .create_photo(NewPhoto {
                user_id: owner.id,
                file_name: "a.jpg".to_string(),
            })
            .await
            .unwrap();

        for text in ["first", "second", "third"] {
            store
                .add_comment(
                    photo.id,
                    NewComment {
                        comment: text.to_string(),
                        user_id: owner.id,
                    },
                )
                .await
                .unwrap()
                .expect("photo exists");
        }

        let photos = store.photos_of_user(owner.id).await.unwrap();
        let texts: Vec<&str> = photos[0].comments.iter().map(|c| c.comment.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_add_comment_to_missing_photo_is_none() {
        let store = MemoryStore::new();
        let created = store
            .add_comment(
                Uuid::new_v4(),
                NewComment {
                    comment: "hello".to_string(),
                    user_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap();
        assert!(created.is_none());
    }

    #[tokio::test]
    async fn test_schema_info_singleton_is_seeded() {
        let store = MemoryStore::new();
        let info = store.schema_info().await.unwrap().expect("singleton seeded");
        assert_eq!(info.version, "1.0");
    }
}
