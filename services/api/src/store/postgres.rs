//! PostgreSQL-backed document store
//!
//! Users and photos are plain rows; a photo's comment sequence is embedded
//! in the row as a JSONB array, appended to atomically so concurrent
//! commenters never reorder or drop each other's entries.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{
    CollectionCounts, Comment, NewComment, NewPhoto, NewUser, Photo, SchemaInfo, User,
};
use crate::store::DocumentStore;

/// Document store over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new PostgreSQL document store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
        User {
            id: row.get("id"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            login_name: row.get("login_name"),
            location: row.get("location"),
            description: row.get("description"),
            occupation: row.get("occupation"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn photo_from_row(row: &sqlx::postgres::PgRow) -> Result<Photo> {
        let comments: serde_json::Value = row.get("comments");
        Ok(Photo {
            id: row.get("id"),
            user_id: row.get("user_id"),
            file_name: row.get("file_name"),
            date_time: row.get("date_time"),
            comments: serde_json::from_value(comments)?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, login_name, location, description, occupation,
                   created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::user_from_row).collect())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, login_name, location, description, occupation,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::user_from_row))
    }

    async fn find_user_by_login(&self, login_name: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, login_name, location, description, occupation,
                   created_at, updated_at
            FROM users
            WHERE login_name = $1
            "#,
        )
        .bind(login_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::user_from_row))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        info!("Creating new user: {}", new_user.login_name);

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, login_name, location, description, occupation)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, first_name, last_name, login_name, location, description, occupation,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.login_name)
        .bind(&new_user.location)
        .bind(&new_user.description)
        .bind(&new_user.occupation)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::user_from_row(&row))
    }

    async fn photos_of_user(&self, user_id: Uuid) -> Result<Vec<Photo>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, file_name, date_time, comments, created_at, updated_at
            FROM photos
            WHERE user_id = $1
            ORDER BY date_time ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::photo_from_row).collect()
    }

    async fn create_photo(&self, new_photo: NewPhoto) -> Result<Photo> {
        info!("Creating new photo for user: {}", new_photo.user_id);

        let row = sqlx::query(
            r#"
            INSERT INTO photos (id, user_id, file_name, date_time, comments)
            VALUES ($1, $2, $3, $4, '[]'::jsonb)
            RETURNING id, user_id, file_name, date_time, comments, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_photo.user_id)
        .bind(&new_photo.file_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Self::photo_from_row(&row)
    }

    async fn add_comment(
        &self,
        photo_id: Uuid,
        new_comment: NewComment,
    ) -> Result<Option<Comment>> {
        let comment = Comment {
            id: Uuid::new_v4(),
            comment: new_comment.comment,
            date_time: Utc::now(),
            user_id: new_comment.user_id,
        };

        let result = sqlx::query(
            r#"
            UPDATE photos
            SET comments = comments || $1::jsonb, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(serde_json::to_value(&comment)?)
        .bind(photo_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(None)
        } else {
            Ok(Some(comment))
        }
    }

    async fn schema_info(&self) -> Result<Option<SchemaInfo>> {
        let row = sqlx::query(
            r#"
            SELECT version, load_date_time
            FROM schema_info
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| SchemaInfo {
            version: row.get("version"),
            load_date_time: row.get("load_date_time"),
        }))
    }

    async fn counts(&self) -> Result<CollectionCounts> {
        let user: i64 = sqlx::query("SELECT COUNT(*) AS count FROM users")
            .fetch_one(&self.pool)
            .await?
            .get("count");
        let photo: i64 = sqlx::query("SELECT COUNT(*) AS count FROM photos")
            .fetch_one(&self.pool)
            .await?
            .get("count");
        let schema_info: i64 = sqlx::query("SELECT COUNT(*) AS count FROM schema_info")
            .fetch_one(&self.pool)
            .await?
            .get("count");

        Ok(CollectionCounts {
            user,
            photo,
            schema_info,
        })
    }
}
