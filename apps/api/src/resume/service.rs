//! Resume lifecycle: creation, reads, lock-guarded updates and removal.
//!
//! Creation: blank (`create`), AI-assisted (`create_from_ai`) or caller-supplied
//! (`import`). All three end in a complete `ResumeData` before the insert;
//! identity fields copied from the user store are kept as stored. Updates go
//! through a conditional write that refuses locked resumes; `lock` is the only
//! mutation a locked resume accepts besides removal.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::resume::{Resume, ResumeStatistics, Visibility};
use crate::models::user::UserProfile;
use crate::printer::Renderer;
use crate::resume::generation::GenerationPipeline;
use crate::resume::repository::{
    Counter, IdentityStore, NewResume, ResumePatch, ResumeRepository, StatisticsRepository,
    UpdateOutcome,
};
use crate::resume::slug::{kebab_case, random_title};
use crate::resume::statistics::StatisticsTracker;
use crate::schema::ResumeData;
use crate::storage::{ArtifactCategory, ArtifactStorage};

/// Appended to the title of AI-drafted resumes.
pub const AI_TITLE_SUFFIX: &str = " (AI)";

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateResumeRequest {
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAiResumeRequest {
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    /// Owned resume to draft from.
    pub existing_resume_id: Option<Uuid>,
    pub job_description: Option<String>,
}

/// Import payload. Any visibility sent by the client is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportResumeRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub data: ResumeData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResumeRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub visibility: Option<Visibility>,
    pub data: Option<ResumeData>,
}

// ────────────────────────────────────────────────────────────────────────────
// Service
// ────────────────────────────────────────────────────────────────────────────

/// External collaborators the lifecycle depends on.
pub struct Collaborators {
    pub resumes: Arc<dyn ResumeRepository>,
    pub statistics: Arc<dyn StatisticsRepository>,
    pub users: Arc<dyn IdentityStore>,
    pub generator: Arc<dyn TextGenerator>,
    pub storage: Arc<dyn ArtifactStorage>,
    pub printer: Arc<dyn Renderer>,
}

pub struct ResumeService {
    resumes: Arc<dyn ResumeRepository>,
    users: Arc<dyn IdentityStore>,
    statistics: StatisticsTracker,
    pipeline: GenerationPipeline,
    storage: Arc<dyn ArtifactStorage>,
    printer: Arc<dyn Renderer>,
}

impl ResumeService {
    pub fn new(deps: Collaborators) -> Self {
        Self {
            resumes: deps.resumes,
            users: deps.users,
            statistics: StatisticsTracker::new(deps.statistics),
            pipeline: GenerationPipeline::new(deps.generator),
            storage: deps.storage,
            printer: deps.printer,
        }
    }

    /// Blank resume: default document carrying the owner's name, email and picture.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateResumeRequest,
    ) -> Result<Resume, AppError> {
        let title = normalize_title(&request.title)?;
        let slug = resolve_slug(request.slug.as_deref(), &title)?;
        let profile = self.profile(user_id).await?;

        let data = profile.apply_to(&ResumeData::default());

        let resume = self
            .resumes
            .insert(NewResume {
                user_id,
                title,
                slug,
                visibility: request.visibility,
                data,
            })
            .await?;

        info!(resume_id = %resume.id, user_id = %user_id, "Created resume '{}'", resume.slug);
        Ok(resume)
    }

    /// AI-drafted resume. Nothing is stored unless both generation calls succeed.
    pub async fn create_from_ai(
        &self,
        user_id: Uuid,
        request: CreateAiResumeRequest,
    ) -> Result<Resume, AppError> {
        let title = normalize_title(&request.title)?;
        let slug = resolve_slug(request.slug.as_deref(), &title)?;
        let profile = self.profile(user_id).await?;

        let existing = match request.existing_resume_id {
            Some(existing_id) => Some(
                self.resumes
                    .find_by_owner(user_id, existing_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Validation(format!("Existing resume {existing_id} not found"))
                    })?,
            ),
            None => None,
        };

        let job_description = request.job_description.unwrap_or_default();
        info!(
            user_id = %user_id,
            from_existing = existing.is_some(),
            "Drafting resume with AI"
        );

        let data = self
            .pipeline
            .generate(
                &profile,
                existing.as_ref().map(|r| &r.data),
                &job_description,
            )
            .await?;

        let resume = self
            .resumes
            .insert(NewResume {
                user_id,
                title: format!("{title}{AI_TITLE_SUFFIX}"),
                slug,
                visibility: request.visibility,
                data,
            })
            .await?;

        info!(resume_id = %resume.id, user_id = %user_id, "Created AI resume '{}'", resume.slug);
        Ok(resume)
    }

    /// Stores a caller-supplied document. Imports are always private.
    pub async fn import(
        &self,
        user_id: Uuid,
        request: ImportResumeRequest,
    ) -> Result<Resume, AppError> {
        request.data.validate()?;

        let title = match request.title.as_deref() {
            Some(title) => normalize_title(title)?,
            None => random_title(),
        };
        let slug = resolve_slug(request.slug.as_deref(), &title)?;

        let resume = self
            .resumes
            .insert(NewResume {
                user_id,
                title,
                slug,
                visibility: Visibility::Private,
                data: request.data,
            })
            .await?;

        info!(resume_id = %resume.id, user_id = %user_id, "Imported resume '{}'", resume.title);
        Ok(resume)
    }

    pub async fn find_all(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        self.resumes.find_all_by_owner(user_id).await
    }

    /// Owner-scoped when `user_id` is given, otherwise by id alone.
    pub async fn find_one(&self, id: Uuid, user_id: Option<Uuid>) -> Result<Resume, AppError> {
        let found = match user_id {
            Some(user_id) => self.resumes.find_by_owner(user_id, id).await?,
            None => self.resumes.find_by_id(id).await?,
        };
        found.ok_or_else(|| not_found(id))
    }

    /// A resume `viewer_id` may read: any public resume, or a private one they own.
    pub async fn find_readable(
        &self,
        id: Uuid,
        viewer_id: Option<Uuid>,
    ) -> Result<Resume, AppError> {
        let resume = self.find_one(id, None).await?;
        let readable =
            resume.visibility == Visibility::Public || viewer_id == Some(resume.user_id);
        if readable {
            Ok(resume)
        } else {
            Err(not_found(id))
        }
    }

    pub async fn find_statistics(&self, id: Uuid) -> Result<ResumeStatistics, AppError> {
        self.statistics.get_statistics(id).await
    }

    /// Public resume by owner username and slug. Anonymous reads count as a view;
    /// a failed count is logged and never fails the read.
    pub async fn find_public_by_slug(
        &self,
        username: &str,
        slug: &str,
        viewer_id: Option<Uuid>,
    ) -> Result<Resume, AppError> {
        let resume = self
            .resumes
            .find_public(username, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resume {username}/{slug} not found")))?;

        if viewer_id.is_none() {
            self.statistics
                .record_quietly(resume.id, Counter::Views)
                .await;
        }

        Ok(resume)
    }

    /// Applies `request` unless the resume is locked.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: UpdateResumeRequest,
    ) -> Result<Resume, AppError> {
        let patch = match build_patch(request) {
            Ok(patch) => patch,
            // A locked resume reports as locked whatever the payload
            Err(invalid) => {
                return Err(match self.resumes.find_by_owner(user_id, id).await? {
                    None => not_found(id),
                    Some(resume) if resume.locked => locked(id),
                    Some(_) => invalid,
                })
            }
        };

        match self.resumes.update_unlocked(user_id, id, &patch).await? {
            UpdateOutcome::Updated(resume) => {
                info!(resume_id = %id, user_id = %user_id, "Updated resume");
                Ok(resume)
            }
            UpdateOutcome::Locked => Err(locked(id)),
            UpdateOutcome::NotFound => Err(not_found(id)),
        }
    }

    /// Sets the lock flag. Always permitted, whatever the current state.
    pub async fn lock(&self, user_id: Uuid, id: Uuid, locked: bool) -> Result<Resume, AppError> {
        let resume = self
            .resumes
            .set_locked(user_id, id, locked)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(resume_id = %id, user_id = %user_id, locked, "Set resume lock");
        Ok(resume)
    }

    /// Deletes the resume, then cleans up its stored artifacts. Cleanup is
    /// best-effort: failures are logged and the deletion stands.
    pub async fn remove(&self, user_id: Uuid, id: Uuid) -> Result<Resume, AppError> {
        let resume = self
            .resumes
            .delete(user_id, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let (pdf, preview) = tokio::join!(
            self.storage
                .delete_object(user_id, ArtifactCategory::Resumes, id),
            self.storage
                .delete_object(user_id, ArtifactCategory::Previews, id),
        );

        for (category, result) in [
            (ArtifactCategory::Resumes, pdf),
            (ArtifactCategory::Previews, preview),
        ] {
            if let Err(e) = result {
                warn!(
                    resume_id = %id,
                    category = category.as_str(),
                    "Artifact cleanup failed: {e}"
                );
            }
        }

        info!(resume_id = %id, user_id = %user_id, "Removed resume");
        Ok(resume)
    }

    /// Renders the resume for download. Anonymous downloads are counted.
    pub async fn print_resume(
        &self,
        resume: &Resume,
        viewer_id: Option<Uuid>,
    ) -> Result<String, AppError> {
        let url = self.printer.print_resume(resume).await?;

        if viewer_id.is_none() {
            self.statistics
                .record_quietly(resume.id, Counter::Downloads)
                .await;
        }

        Ok(url)
    }

    pub async fn print_preview(&self, resume: &Resume) -> Result<String, AppError> {
        self.printer.print_preview(resume).await
    }

    async fn profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        self.users
            .find_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

fn locked(id: Uuid) -> AppError {
    AppError::Locked(format!(
        "Resume {id} is locked; unlock it before making changes"
    ))
}

fn normalize_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

/// Kebab-cases the given slug, or the title when no slug is given.
fn resolve_slug(slug: Option<&str>, title: &str) -> Result<String, AppError> {
    let slug = kebab_case(slug.unwrap_or(title));
    if slug.is_empty() {
        return Err(AppError::Validation(
            "slug must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(slug)
}

fn build_patch(request: UpdateResumeRequest) -> Result<ResumePatch, AppError> {
    let title = request.title.as_deref().map(normalize_title).transpose()?;
    let slug = request
        .slug
        .as_deref()
        .map(|slug| resolve_slug(Some(slug), ""))
        .transpose()?;
    if let Some(data) = &request.data {
        data.validate()?;
    }

    Ok(ResumePatch {
        title,
        slug,
        visibility: request.visibility,
        data: request.data,
    })
}
