//! AI-assisted resume drafting.
//!
//! Flow: build prompt → (basics ∥ sections) structured generation → validate both
//!       against the lean schemas → merge onto the default document → overlay identity.
//!
//! Both fragments must succeed before anything is merged; any failure along the
//! way is a `Generation` error and no document comes out.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{ObjectRequest, TextGenerator};
use crate::models::user::UserProfile;
use crate::resume::prompts::{GENERATION_PROMPT_TEMPLATE, GENERATION_SYSTEM};
use crate::schema::lean::{LeanBasics, LeanSections};
use crate::schema::merge::{merge_document, PartialBasics, PartialResumeData, PartialSections};
use crate::schema::ResumeData;

#[derive(Clone)]
pub struct GenerationPipeline {
    generator: Arc<dyn TextGenerator>,
}

impl GenerationPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Drafts a complete resume for `job_description`, optionally starting from
    /// an existing document, with identity fields taken from `profile`.
    pub async fn generate(
        &self,
        profile: &UserProfile,
        existing: Option<&ResumeData>,
        job_description: &str,
    ) -> Result<ResumeData, AppError> {
        let prompt = build_prompt(existing, job_description)?;

        let (basics, sections) = tokio::try_join!(
            self.request::<LeanBasics>("basics", &prompt),
            self.request::<LeanSections>("sections", &prompt),
        )?;
        info!(
            experience = sections.experience.len(),
            skills = sections.skills.len(),
            "Generated basics and sections fragments"
        );

        // Identity is taken from the profile, never from the generated basics
        let basics = PartialBasics {
            name: None,
            email: None,
            picture: None,
            ..PartialBasics::from(basics)
        };

        let overrides = PartialResumeData {
            basics: Some(basics),
            sections: Some(PartialSections::from(sections)),
            metadata: None,
        };

        let generated = merge_document(&ResumeData::default(), &overrides).map_err(|e| {
            AppError::Generation(format!("Generated resume failed validation: {e}"))
        })?;
        Ok(profile.apply_to(&generated))
    }

    /// One structured-generation call, validated against `T`.
    async fn request<T: DeserializeOwned + JsonSchema>(
        &self,
        schema_name: &'static str,
        prompt: &str,
    ) -> Result<T, AppError> {
        let schema = serde_json::to_value(schemars::schema_for!(T)).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to serialize {schema_name} schema: {e}"))
        })?;

        let request = ObjectRequest {
            system: GENERATION_SYSTEM.to_string(),
            prompt: prompt.to_string(),
            schema_name,
            schema,
        };

        let value = self
            .generator
            .generate_object(&request)
            .await
            .map_err(|e| AppError::Generation(format!("{schema_name} generation failed: {e}")))?;

        serde_json::from_value(value).map_err(|e| {
            AppError::Generation(format!("{schema_name} output did not match its schema: {e}"))
        })
    }
}

fn build_prompt(existing: Option<&ResumeData>, job_description: &str) -> Result<String, AppError> {
    let existing_resume = match existing {
        Some(data) => serde_json::to_string_pretty(data).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to serialize existing resume: {e}"))
        })?,
        None => "none".to_string(),
    };

    Ok(GENERATION_PROMPT_TEMPLATE
        .replace("{existing_resume}", &existing_resume)
        .replace("{job_description}", job_description))
}
