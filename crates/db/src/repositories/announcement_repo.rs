//! Repository for the `announcements` table.

use fittrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::announcement::{Announcement, CreateAnnouncement, UpdateAnnouncement};

const COLUMNS: &str = "id, title, content, is_active, created_by, created_at, updated_at";

pub struct AnnouncementRepo;

impl AnnouncementRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateAnnouncement,
    ) -> Result<Announcement, sqlx::Error> {
        let query = format!(
            "INSERT INTO announcements (title, content, is_active, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Announcement>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.is_active)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Announcements, newest first. With `active_only`, hidden ones are skipped.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Announcement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM announcements
             WHERE ($1 = false OR is_active = true)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Announcement>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAnnouncement,
    ) -> Result<Option<Announcement>, sqlx::Error> {
        let query = format!(
            "UPDATE announcements SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                is_active = COALESCE($4, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Announcement>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
