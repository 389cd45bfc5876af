//! View and download counters for public resumes.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeStatistics;
use crate::resume::repository::{Counter, StatisticsRepository};

#[derive(Clone)]
pub struct StatisticsTracker {
    store: Arc<dyn StatisticsRepository>,
}

impl StatisticsTracker {
    pub fn new(store: Arc<dyn StatisticsRepository>) -> Self {
        Self { store }
    }

    pub async fn record_view(&self, resume_id: Uuid) -> Result<ResumeStatistics, AppError> {
        self.store.increment(resume_id, Counter::Views).await
    }

    pub async fn record_download(&self, resume_id: Uuid) -> Result<ResumeStatistics, AppError> {
        self.store.increment(resume_id, Counter::Downloads).await
    }

    /// Zeroes when the resume has never been viewed or downloaded.
    pub async fn get_statistics(&self, resume_id: Uuid) -> Result<ResumeStatistics, AppError> {
        Ok(self.store.find(resume_id).await?.unwrap_or_default())
    }

    /// Increments `counter`, logging instead of returning any failure.
    /// Used where the counter rides along with a read or render that must not fail.
    pub async fn record_quietly(&self, resume_id: Uuid, counter: Counter) {
        let recorded = match counter {
            Counter::Views => self.record_view(resume_id).await,
            Counter::Downloads => self.record_download(resume_id).await,
        };
        match recorded {
            Ok(stats) => debug!(
                resume_id = %resume_id,
                views = stats.views,
                downloads = stats.downloads,
                "Recorded {counter:?}"
            ),
            Err(e) => warn!(resume_id = %resume_id, "Failed to record {counter:?}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Visibility;
    use crate::models::user::UserProfile;
    use crate::resume::memory::InMemoryStore;
    use crate::resume::repository::{NewResume, ResumeRepository};
    use crate::schema::ResumeData;

    async fn store_with_resume() -> (Arc<InMemoryStore>, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let owner = store.add_user(
            "jane",
            UserProfile {
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
                picture: None,
            },
        );
        let resume = store
            .insert(NewResume {
                user_id: owner,
                title: "Resume".to_string(),
                slug: "resume".to_string(),
                visibility: Visibility::Public,
                data: ResumeData::default(),
            })
            .await
            .unwrap();
        (store, resume.id)
    }

    #[tokio::test]
    async fn test_missing_row_reads_as_zero() {
        let (store, id) = store_with_resume().await;
        let tracker = StatisticsTracker::new(store);
        assert_eq!(
            tracker.get_statistics(id).await.unwrap(),
            ResumeStatistics::default()
        );
    }

    #[tokio::test]
    async fn test_first_view_creates_row_with_other_counter_zero() {
        let (store, id) = store_with_resume().await;
        let tracker = StatisticsTracker::new(store);

        let stats = tracker.record_view(id).await.unwrap();
        assert_eq!(stats, ResumeStatistics { views: 1, downloads: 0 });

        let stats = tracker.record_download(id).await.unwrap();
        assert_eq!(stats, ResumeStatistics { views: 1, downloads: 1 });
    }

    #[tokio::test]
    async fn test_concurrent_views_are_not_lost() {
        let (store, id) = store_with_resume().await;
        let tracker = StatisticsTracker::new(store);

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let tracker = tracker.clone();
                tokio::spawn(async move { tracker.record_view(id).await })
            })
            .collect();
        for handle in futures::future::join_all(handles).await {
            handle.unwrap().unwrap();
        }

        assert_eq!(tracker.get_statistics(id).await.unwrap().views, 50);
    }

    #[tokio::test]
    async fn test_record_quietly_counts_the_requested_counter() {
        let (store, id) = store_with_resume().await;
        let tracker = StatisticsTracker::new(store);

        tracker.record_quietly(id, Counter::Downloads).await;
        tracker.record_quietly(id, Counter::Downloads).await;
        tracker.record_quietly(id, Counter::Views).await;

        assert_eq!(
            tracker.get_statistics(id).await.unwrap(),
            ResumeStatistics { views: 1, downloads: 2 }
        );
    }

    #[tokio::test]
    async fn test_record_quietly_swallows_failures() {
        let store = Arc::new(InMemoryStore::new());
        let tracker = StatisticsTracker::new(store.clone());
        let missing = Uuid::new_v4();

        // No such resume: the store rejects the increment, the tracker only logs
        tracker.record_quietly(missing, Counter::Views).await;
        tracker.record_quietly(missing, Counter::Downloads).await;

        assert!(!store.has_statistics(missing));
        assert_eq!(
            tracker.get_statistics(missing).await.unwrap(),
            ResumeStatistics::default()
        );
    }
}
