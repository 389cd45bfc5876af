//! In-memory stores for tests. Mirrors the PostgreSQL constraints: per-owner
//! unique slugs, conditional unlocked updates, cascading statistics deletion.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Resume, ResumeStatistics, Visibility};
use crate::models::user::UserProfile;
use crate::resume::repository::{
    Counter, IdentityStore, NewResume, ResumePatch, ResumeRepository, StatisticsRepository,
    UpdateOutcome,
};

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, (String, UserProfile)>,
    resumes: HashMap<Uuid, Resume>,
    statistics: HashMap<Uuid, ResumeStatistics>,
    last_tick: Option<DateTime<Utc>>,
}

impl Inner {
    /// Strictly increasing timestamps so ordering by `updated_at` is deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }

    fn slug_taken(&self, user_id: Uuid, slug: &str, except: Option<Uuid>) -> bool {
        self.resumes
            .values()
            .any(|r| r.user_id == user_id && r.slug == slug && Some(r.id) != except)
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str, profile: UserProfile) -> Uuid {
        let id = Uuid::new_v4();
        self.inner
            .lock()
            .unwrap()
            .users
            .insert(id, (username.to_string(), profile));
        id
    }

    pub fn resume_count(&self) -> usize {
        self.inner.lock().unwrap().resumes.len()
    }

    pub fn has_statistics(&self, resume_id: Uuid) -> bool {
        self.inner.lock().unwrap().statistics.contains_key(&resume_id)
    }
}

fn conflict(slug: &str) -> AppError {
    AppError::Conflict(format!("A resume with slug '{slug}' already exists"))
}

#[async_trait]
impl ResumeRepository for InMemoryStore {
    async fn insert(&self, resume: NewResume) -> Result<Resume, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.slug_taken(resume.user_id, &resume.slug, None) {
            return Err(conflict(&resume.slug));
        }
        let now = inner.tick();
        let stored = Resume {
            id: Uuid::new_v4(),
            user_id: resume.user_id,
            title: resume.title,
            slug: resume.slug,
            visibility: resume.visibility,
            locked: false,
            data: resume.data,
            created_at: now,
            updated_at: now,
        };
        inner.resumes.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_all_by_owner(&self, user_id: Uuid) -> Result<Vec<Resume>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut resumes: Vec<Resume> = inner
            .resumes
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        resumes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(resumes)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self.inner.lock().unwrap().resumes.get(&id).cloned())
    }

    async fn find_by_owner(&self, user_id: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .resumes
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn find_public(&self, username: &str, slug: &str) -> Result<Option<Resume>, AppError> {
        let inner = self.inner.lock().unwrap();
        let owner = inner
            .users
            .iter()
            .find(|(_, (name, _))| name == username)
            .map(|(id, _)| *id);
        Ok(owner.and_then(|owner| {
            inner
                .resumes
                .values()
                .find(|r| {
                    r.user_id == owner && r.slug == slug && r.visibility == Visibility::Public
                })
                .cloned()
        }))
    }

    async fn update_unlocked(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: &ResumePatch,
    ) -> Result<UpdateOutcome, AppError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.resumes.get(&id) {
            Some(r) if r.user_id != user_id => return Ok(UpdateOutcome::NotFound),
            Some(r) if r.locked => return Ok(UpdateOutcome::Locked),
            Some(_) => {}
            None => return Ok(UpdateOutcome::NotFound),
        }
        if let Some(slug) = &patch.slug {
            if inner.slug_taken(user_id, slug, Some(id)) {
                return Err(conflict(slug));
            }
        }

        let now = inner.tick();
        let Some(resume) = inner.resumes.get_mut(&id) else {
            return Ok(UpdateOutcome::NotFound);
        };
        if let Some(title) = &patch.title {
            resume.title = title.clone();
        }
        if let Some(slug) = &patch.slug {
            resume.slug = slug.clone();
        }
        if let Some(visibility) = patch.visibility {
            resume.visibility = visibility;
        }
        if let Some(data) = &patch.data {
            resume.data = data.clone();
        }
        resume.updated_at = now;
        Ok(UpdateOutcome::Updated(resume.clone()))
    }

    async fn set_locked(
        &self,
        user_id: Uuid,
        id: Uuid,
        locked: bool,
    ) -> Result<Option<Resume>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let now = inner.tick();
        Ok(inner
            .resumes
            .get_mut(&id)
            .filter(|r| r.user_id == user_id)
            .map(|resume| {
                resume.locked = locked;
                resume.updated_at = now;
                resume.clone()
            }))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<Option<Resume>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.resumes.get(&id).is_some_and(|r| r.user_id == user_id) {
            return Ok(None);
        }
        inner.statistics.remove(&id);
        Ok(inner.resumes.remove(&id))
    }
}

#[async_trait]
impl StatisticsRepository for InMemoryStore {
    async fn increment(
        &self,
        resume_id: Uuid,
        counter: Counter,
    ) -> Result<ResumeStatistics, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.resumes.contains_key(&resume_id) {
            return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
        }
        let stats = inner.statistics.entry(resume_id).or_default();
        match counter {
            Counter::Views => stats.views += 1,
            Counter::Downloads => stats.downloads += 1,
        }
        Ok(*stats)
    }

    async fn find(&self, resume_id: Uuid) -> Result<Option<ResumeStatistics>, AppError> {
        Ok(self.inner.lock().unwrap().statistics.get(&resume_id).copied())
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, AppError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .get(&user_id)
            .map(|(_, profile)| profile.clone()))
    }
}
