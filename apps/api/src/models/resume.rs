use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::schema::ResumeData;

/// Who may read a resume. Writes are always restricted to the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            other => Err(AppError::Validation(format!("Unknown visibility '{other}'"))),
        }
    }
}

/// A stored resume document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub visibility: Visibility,
    pub locked: bool,
    pub data: ResumeData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `resumes` row as stored in PostgreSQL.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub visibility: String,
    pub locked: bool,
    pub data: Json<ResumeData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ResumeRow> for Resume {
    type Error = AppError;

    fn try_from(row: ResumeRow) -> Result<Self, Self::Error> {
        let visibility = row.visibility.parse().map_err(|_| {
            AppError::Internal(anyhow::anyhow!(
                "Resume {} has corrupt visibility '{}'",
                row.id,
                row.visibility
            ))
        })?;

        Ok(Resume {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            slug: row.slug,
            visibility,
            locked: row.locked,
            data: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// View and download counters for one resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResumeStatistics {
    pub views: u64,
    pub downloads: u64,
}

#[derive(Debug, Clone, FromRow)]
pub struct StatisticsRow {
    pub views: i64,
    pub downloads: i64,
}

impl From<StatisticsRow> for ResumeStatistics {
    fn from(row: StatisticsRow) -> Self {
        // Counters only ever grow from zero
        Self {
            views: row.views.max(0) as u64,
            downloads: row.downloads.max(0) as u64,
        }
    }
}
