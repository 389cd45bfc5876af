//! Rendering collaborator: turns a resume into a downloadable PDF and a preview image.
//!
//! Rendering itself happens in a separate printer service; this module only
//! forwards the document and returns the URL of the stored output.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::errors::AppError;
use crate::models::resume::Resume;
use crate::schema::ResumeData;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders the full document and returns its download URL.
    async fn print_resume(&self, resume: &Resume) -> Result<String, AppError>;

    /// Renders the first page as an image and returns its URL.
    async fn print_preview(&self, resume: &Resume) -> Result<String, AppError>;
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum PrintKind {
    Resume,
    Preview,
}

#[derive(Debug, Serialize)]
struct PrintRequest<'a> {
    kind: PrintKind,
    resume_id: Uuid,
    user_id: Uuid,
    data: &'a ResumeData,
}

#[derive(Debug, Deserialize)]
struct PrintResponse {
    url: String,
}

/// HTTP client for the printer service (`POST {base_url}/print`).
#[derive(Clone)]
pub struct HttpPrinter {
    client: Client,
    base_url: String,
}

impl HttpPrinter {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn print(&self, resume: &Resume, kind: PrintKind) -> Result<String, AppError> {
        let request = PrintRequest {
            kind,
            resume_id: resume.id,
            user_id: resume.user_id,
            data: &resume.data,
        };

        let response = self
            .client
            .post(format!("{}/print", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Printer(format!("Printer request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Printer(format!(
                "Printer returned {status} for {kind:?} of resume {}: {body}",
                resume.id
            )));
        }

        let printed: PrintResponse = response
            .json()
            .await
            .map_err(|e| AppError::Printer(format!("Malformed printer response: {e}")))?;
        Ok(printed.url)
    }
}

#[async_trait]
impl Renderer for HttpPrinter {
    async fn print_resume(&self, resume: &Resume) -> Result<String, AppError> {
        self.print(resume, PrintKind::Resume).await
    }

    async fn print_preview(&self, resume: &Resume) -> Result<String, AppError> {
        self.print(resume, PrintKind::Preview).await
    }
}
