//! Stored render artifacts (PDFs and preview images) in S3 / MinIO.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use tracing::debug;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::errors::AppError;

/// Kinds of artifact stored per resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactCategory {
    Resumes,
    Previews,
}

impl ArtifactCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactCategory::Resumes => "resumes",
            ArtifactCategory::Previews => "previews",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ArtifactCategory::Resumes => "pdf",
            ArtifactCategory::Previews => "jpg",
        }
    }
}

/// Object key of an artifact: `<user>/<category>/<resume>.<ext>`.
pub fn artifact_key(user_id: Uuid, category: ArtifactCategory, resume_id: Uuid) -> String {
    format!(
        "{user_id}/{}/{resume_id}.{}",
        category.as_str(),
        category.extension()
    )
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    /// Deleting an artifact that was never stored succeeds.
    async fn delete_object(
        &self,
        user_id: Uuid,
        category: ArtifactCategory,
        resume_id: Uuid,
    ) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct S3ArtifactStorage {
    client: S3Client,
    bucket: String,
}

impl S3ArtifactStorage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ArtifactStorage for S3ArtifactStorage {
    async fn delete_object(
        &self,
        user_id: Uuid,
        category: ArtifactCategory,
        resume_id: Uuid,
    ) -> Result<(), AppError> {
        let key = artifact_key(user_id, category, resume_id);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete of {key} failed: {e}")))?;

        debug!("Deleted s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
