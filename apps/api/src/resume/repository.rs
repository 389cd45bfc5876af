//! Persistence seams for the resume lifecycle.
//!
//! The lifecycle only talks to storage through these traits; `postgres` holds
//! the production implementation and `memory` the one tests run against.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeStatistics, Visibility};
use crate::models::user::UserProfile;
use crate::schema::ResumeData;

/// Everything needed to insert a resume. Id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub visibility: Visibility,
    pub data: ResumeData,
}

/// Field changes for an update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub visibility: Option<Visibility>,
    pub data: Option<ResumeData>,
}

/// Result of a conditional (unlocked-only) update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Resume),
    Locked,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Downloads,
}

#[async_trait]
pub trait ResumeRepository: Send + Sync {
    /// Fails with `AppError::Conflict` when the owner already has a resume with this slug.
    async fn insert(&self, resume: NewResume) -> Result<Resume, AppError>;

    /// Most recently updated first.
    async fn find_all_by_owner(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resume>, AppError>;

    async fn find_by_owner(&self, user_id: Uuid, id: Uuid) -> Result<Option<Resume>, AppError>;

    /// Public resume matching the owner's username and slug.
    async fn find_public(&self, username: &str, slug: &str) -> Result<Option<Resume>, AppError>;

    /// Applies `patch` only if the resume exists for `user_id` and is unlocked,
    /// as a single conditional write.
    async fn update_unlocked(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &ResumePatch,
    ) -> Result<UpdateOutcome, AppError>;

    async fn set_locked(
        &self,
        user_id: Uuid,
        id: Uuid,
        locked: bool,
    ) -> Result<Option<Resume>, AppError>;

    /// Deletes the resume and its statistics row; returns the deleted resume.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Option<Resume>, AppError>;
}

#[async_trait]
pub trait StatisticsRepository: Send + Sync {
    /// Atomic upsert: creates the row with `counter` at 1, or adds 1 to it.
    async fn increment(
        &self,
        resume_id: Uuid,
        counter: Counter,
    ) -> Result<ResumeStatistics, AppError>;

    async fn find(&self, resume_id: Uuid) -> Result<Option<ResumeStatistics>, AppError>;
}

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError>;
}
