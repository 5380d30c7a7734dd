//! Response view models and the photo/comment join assembler
//!
//! Stored documents never leave the service as-is: every payload is built
//! field by field from one of the view structs here, so a sensitive field
//! can only be exposed by adding it explicitly. Two user shapes exist: the
//! public summary (what other users may see) and the full view (the session
//! owner and direct `/user/:id` lookups). Row metadata is in neither.

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Comment, Photo, User};
use crate::store::DocumentStore;

/// Public user summary: identity and names only
///
/// `location`, `description` and `occupation` are private to their owner and
/// deliberately absent here.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub login_name: String,
}

impl UserSummary {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            login_name: user.login_name.clone(),
        }
    }
}

/// Full user view: every domain field, no row metadata
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub login_name: String,
    pub location: String,
    pub description: String,
    pub occupation: String,
}

impl UserView {
    pub fn of(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            login_name: user.login_name.clone(),
            location: user.location.clone(),
            description: user.description.clone(),
            occupation: user.occupation.clone(),
        }
    }
}

/// Comment with its author reference resolved to a public summary
///
/// The raw `user_id` is dropped; `user` is `null` when the author could not
/// be resolved, so one dangling reference never sinks a whole response.
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub comment: String,
    pub date_time: DateTime<Utc>,
    pub user: Option<UserSummary>,
}

impl CommentView {
    pub fn of(comment: &Comment, author: Option<&User>) -> Self {
        Self {
            id: comment.id,
            comment: comment.comment.clone(),
            date_time: comment.date_time,
            user: author.map(UserSummary::of),
        }
    }
}

/// Photo with its comment sequence resolved into comment views
#[derive(Debug, Clone, Serialize)]
pub struct PhotoView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub date_time: DateTime<Utc>,
    pub comments: Vec<CommentView>,
}

/// Resolve one photo's embedded comments into a `PhotoView`
///
/// Author lookups for the comments run concurrently; results are collected
/// positionally so the comment sequence keeps its stored order.
pub async fn assemble_photo_view(store: &dyn DocumentStore, photo: Photo) -> Result<PhotoView> {
    let Photo {
        id,
        user_id,
        file_name,
        date_time,
        comments,
        ..
    } = photo;

    let comments = try_join_all(comments.iter().map(|c| resolve_comment(store, c))).await?;

    Ok(PhotoView {
        id,
        user_id,
        file_name,
        date_time,
        comments,
    })
}

/// Resolve a set of photos into `PhotoView`s, preserving the input order
///
/// Photos are assembled concurrently with each other as well; only a store
/// failure aborts the whole assembly.
pub async fn assemble_photo_views(
    store: &dyn DocumentStore,
    photos: Vec<Photo>,
) -> Result<Vec<PhotoView>> {
    try_join_all(
        photos
            .into_iter()
            .map(|photo| assemble_photo_view(store, photo)),
    )
    .await
}

async fn resolve_comment(store: &dyn DocumentStore, comment: &Comment) -> Result<CommentView> {
    let author = store.find_user(comment.user_id).await?;
    Ok(CommentView::of(comment, author.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewComment, NewPhoto, NewUser};
    use crate::store::MemoryStore;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Imogen".to_string(),
            last_name: "Cunningham".to_string(),
            login_name: "imogen".to_string(),
            location: "San Francisco".to_string(),
            description: "botanical prints".to_string(),
            occupation: "photographer".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_summary_never_contains_private_fields() {
        let user = sample_user();
        let value = serde_json::to_value(UserSummary::of(&user)).unwrap();
        let object = value.as_object().unwrap();

        for private in ["location", "description", "occupation"] {
            assert!(!object.contains_key(private), "{private} leaked");
        }
        for metadata in ["created_at", "updated_at"] {
            assert!(!object.contains_key(metadata), "{metadata} leaked");
        }
        assert_eq!(object["login_name"], "imogen");
        assert_eq!(object["first_name"], "Imogen");
    }

    #[test]
    fn test_full_view_keeps_profile_fields_but_not_row_metadata() {
        let user = sample_user();
        let value = serde_json::to_value(UserView::of(&user)).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["location"], "San Francisco");
        assert_eq!(object["occupation"], "photographer");
        assert!(!object.contains_key("created_at"));
        assert!(!object.contains_key("updated_at"));
    }

    #[test]
    fn test_comment_view_drops_raw_author_reference() {
        let user = sample_user();
        let comment = Comment {
            id: Uuid::new_v4(),
            comment: "lovely light".to_string(),
            date_time: Utc::now(),
            user_id: user.id,
        };

        let value = serde_json::to_value(CommentView::of(&comment, Some(&user))).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("user_id"));
        assert_eq!(object["user"]["login_name"], "imogen");
        assert!(!object["user"].as_object().unwrap().contains_key("location"));
    }

    #[test]
    fn test_unresolved_author_serializes_as_null() {
        let comment = Comment {
            id: Uuid::new_v4(),
            comment: "orphaned".to_string(),
            date_time: Utc::now(),
            user_id: Uuid::new_v4(),
        };

        let value = serde_json::to_value(CommentView::of(&comment, None)).unwrap();
        assert!(value["user"].is_null());
    }

    #[tokio::test]
    async fn test_assembler_preserves_order_and_substitutes_null_authors() {
        let store = MemoryStore::new();
        let owner = store
            .create_user(NewUser::from_login_name("owner"))
            .await
            .unwrap();
        let commenter = store
            .create_user(NewUser::from_login_name("commenter"))
            .await
            .unwrap();

        let photo = store
            .create_photo(NewPhoto {
                user_id: owner.id,
                file_name: "dunes.png".to_string(),
            })
            .await
            .unwrap();

        store
            .add_comment(
                photo.id,
                NewComment {
                    comment: "first".to_string(),
                    user_id: commenter.id,
                },
            )
            .await
            .unwrap();
        // Author reference that resolves to nobody
        store
            .add_comment(
                photo.id,
                NewComment {
                    comment: "second".to_string(),
                    user_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap();
        store
            .add_comment(
                photo.id,
                NewComment {
                    comment: "third".to_string(),
                    user_id: owner.id,
                },
            )
            .await
            .unwrap();

        let photos = store.photos_of_user(owner.id).await.unwrap();
        let views = assemble_photo_views(&store, photos).await.unwrap();

        assert_eq!(views.len(), 1);
        let comments = &views[0].comments;
        let texts: Vec<&str> = comments.iter().map(|c| c.comment.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);

        assert_eq!(
            comments[0].user.as_ref().map(|u| u.login_name.as_str()),
            Some("commenter")
        );
        assert!(comments[1].user.is_none());
        assert_eq!(
            comments[2].user.as_ref().map(|u| u.login_name.as_str()),
            Some("owner")
        );
    }

    #[tokio::test]
    async fn test_assembler_keeps_photo_order() {
        let store = MemoryStore::new();
        let owner = store
            .create_user(NewUser::from_login_name("owner"))
            .await
            .unwrap();

        for name in ["one.jpg", "two.jpg", "three.jpg"] {
            store
                .create_photo(NewPhoto {
                    user_id: owner.id,
                    file_name: name.to_string(),
                })
                .await
                .unwrap();
        }

        let photos = store.photos_of_user(owner.id).await.unwrap();
        let views = assemble_photo_views(&store, photos).await.unwrap();
        let names: Vec<&str> = views.iter().map(|v| v.file_name.as_str()).collect();
        assert_eq!(names, vec!["one.jpg", "two.jpg", "three.jpg"]);
    }
}
