//! PostgreSQL-backed resume, statistics and identity stores.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeRow, ResumeStatistics, StatisticsRow};
use crate::models::user::UserProfile;
use crate::resume::repository::{
    Counter, IdentityStore, NewResume, ResumePatch, ResumeRepository, StatisticsRepository,
    UpdateOutcome,
};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn conflict_or_database(err: sqlx::Error, slug: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            AppError::Conflict(format!("A resume with slug '{slug}' already exists"))
        }
        _ => AppError::Database(err),
    }
}

fn into_resumes(rows: Vec<ResumeRow>) -> Result<Vec<Resume>, AppError> {
    rows.into_iter().map(Resume::try_from).collect()
}

#[async_trait]
impl ResumeRepository for PgStore {
    async fn insert(&self, resume: NewResume) -> Result<Resume, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (id, user_id, title, slug, visibility, locked, data)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(resume.user_id)
        .bind(&resume.title)
        .bind(&resume.slug)
        .bind(resume.visibility.as_str())
        .bind(Json(&resume.data))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, &resume.slug))?;

        row.try_into()
    }

    async fn find_all_by_owner(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        into_resumes(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Resume::try_from)
            .transpose()
    }

    async fn find_by_owner(&self, user_id: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Resume::try_from)
            .transpose()
    }

    async fn find_public(&self, username: &str, slug: &str) -> Result<Option<Resume>, AppError> {
        sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT r.*
            FROM resumes r
            JOIN users u ON u.id = r.user_id
            WHERE u.username = $1 AND r.slug = $2 AND r.visibility = 'public'
            "#,
        )
        .bind(username)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .map(Resume::try_from)
        .transpose()
    }

    async fn update_unlocked(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &ResumePatch,
    ) -> Result<UpdateOutcome, AppError> {
        // The lock check and the write are one statement, so a concurrent
        // lock(true) either lands before (no rows) or after (update applied).
        let updated = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET title = COALESCE($3, title),
                slug = COALESCE($4, slug),
                visibility = COALESCE($5, visibility),
                data = COALESCE($6, data),
                updated_at = NOW()
            WHERE user_id = $1 AND id = $2 AND locked = FALSE
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.slug.as_deref())
        .bind(patch.visibility.map(|v| v.as_str()))
        .bind(patch.data.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, patch.slug.as_deref().unwrap_or_default()))?;

        if let Some(row) = updated {
            return Ok(UpdateOutcome::Updated(row.try_into()?));
        }

        let exists: Option<bool> =
            sqlx::query_scalar("SELECT locked FROM resumes WHERE user_id = $1 AND id = $2")
                .bind(user_id)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(match exists {
            Some(_) => UpdateOutcome::Locked,
            None => UpdateOutcome::NotFound,
        })
    }

    async fn set_locked(
        &self,
        user_id: Uuid,
        id: Uuid,
        locked: bool,
    ) -> Result<Option<Resume>, AppError> {
        sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET locked = $3, updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(locked)
        .fetch_optional(&self.pool)
        .await?
        .map(Resume::try_from)
        .transpose()
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        // statistics rows go with it via ON DELETE CASCADE
        sqlx::query_as::<_, ResumeRow>(
            "DELETE FROM resumes WHERE user_id = $1 AND id = $2 RETURNING *",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Resume::try_from)
        .transpose()
    }
}

#[async_trait]
impl StatisticsRepository for PgStore {
    async fn increment(
        &self,
        resume_id: Uuid,
        counter: Counter,
    ) -> Result<ResumeStatistics, AppError> {
        let (views, downloads): (i64, i64) = match counter {
            Counter::Views => (1, 0),
            Counter::Downloads => (0, 1),
        };

        let row = sqlx::query_as::<_, StatisticsRow>(
            r#"
            INSERT INTO statistics (resume_id, views, downloads)
            VALUES ($1, $2, $3)
            ON CONFLICT (resume_id) DO UPDATE SET
                views = statistics.views + EXCLUDED.views,
                downloads = statistics.downloads + EXCLUDED.downloads,
                updated_at = NOW()
            RETURNING views, downloads
            "#,
        )
        .bind(resume_id)
        .bind(views)
        .bind(downloads)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find(&self, resume_id: Uuid) -> Result<Option<ResumeStatistics>, AppError> {
        Ok(sqlx::query_as::<_, StatisticsRow>(
            "SELECT views, downloads FROM statistics WHERE resume_id = $1",
        )
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?
        .map(ResumeStatistics::from))
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        Ok(
            sqlx::query_as::<_, UserProfile>(
                "SELECT name, email, picture FROM users WHERE id = $1",
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?,
        )
    }
}
