//! Resume document schema.
//!
//! `ResumeData` is the complete, typed payload stored on every resume. Every
//! node rejects unknown keys, so a document that deserializes is structurally
//! complete; `validate()` adds the value-level rules (emails, URLs, ranges,
//! item identity) that serde cannot express.

pub mod lean;
pub mod merge;

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for `columns` on any section.
pub const MAX_SECTION_COLUMNS: u8 = 5;
/// Upper bound for skill and language levels.
pub const MAX_LEVEL: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{field}: invalid email address '{value}'")]
    InvalidEmail { field: String, value: String },

    #[error("{field}: invalid URL '{value}'")]
    InvalidUrl { field: String, value: String },

    #[error("{field}: {value} is out of range ({min}..={max})")]
    OutOfRange {
        field: String,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{field}: must not be empty")]
    Empty { field: String },

    #[error("{section}: duplicate item id '{id}'")]
    DuplicateId { section: String, id: String },
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResumeData {
    pub basics: Basics,
    pub sections: Sections,
    pub metadata: Metadata,
}

// ────────────────────────────────────────────────────────────────────────────
// Basics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Basics {
    pub name: String,
    pub headline: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub url: Url,
    pub custom_fields: Vec<CustomField>,
    pub picture: Picture,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Url {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomField {
    pub id: String,
    pub icon: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Picture {
    pub url: String,
    pub size: u32,
    pub aspect_ratio: f32,
    pub border_radius: u32,
    pub effects: PictureEffects,
}

impl Default for Picture {
    fn default() -> Self {
        Self {
            url: String::new(),
            size: 64,
            aspect_ratio: 1.0,
            border_radius: 0,
            effects: PictureEffects::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PictureEffects {
    pub hidden: bool,
    pub border: bool,
    pub grayscale: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sections {
    pub summary: SummarySection,
    pub experience: Section<Experience>,
    pub education: Section<Education>,
    pub skills: Section<Skill>,
    pub projects: Section<Project>,
    pub languages: Section<Language>,
    pub awards: Section<Award>,
    pub certifications: Section<Certification>,
    pub profiles: Section<Profile>,
    pub interests: Section<Interest>,
}

impl Default for Sections {
    fn default() -> Self {
        Self {
            summary: SummarySection::default(),
            experience: Section::named("experience", "Experience"),
            education: Section::named("education", "Education"),
            skills: Section::named("skills", "Skills"),
            projects: Section::named("projects", "Projects"),
            languages: Section::named("languages", "Languages"),
            awards: Section::named("awards", "Awards"),
            certifications: Section::named("certifications", "Certifications"),
            profiles: Section::named("profiles", "Profiles"),
            interests: Section::named("interests", "Interests"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummarySection {
    pub id: String,
    pub name: String,
    pub columns: u8,
    pub separate_links: bool,
    pub visible: bool,
    pub content: String,
}

impl Default for SummarySection {
    fn default() -> Self {
        Self {
            id: "summary".to_string(),
            name: "Summary".to_string(),
            columns: 1,
            separate_links: true,
            visible: true,
            content: String::new(),
        }
    }
}

/// A titled list of items. Items are always replaced as a whole on merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section<T> {
    pub id: String,
    pub name: String,
    pub columns: u8,
    pub separate_links: bool,
    pub visible: bool,
    pub items: Vec<T>,
}

impl<T> Section<T> {
    pub fn named(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            columns: 1,
            separate_links: true,
            visible: true,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Experience {
    pub id: String,
    pub visible: bool,
    pub company: String,
    pub position: String,
    pub location: String,
    pub date: String,
    pub summary: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub id: String,
    pub visible: bool,
    pub institution: String,
    pub study_type: String,
    pub area: String,
    pub score: String,
    pub date: String,
    pub summary: String,
    pub courses: Vec<String>,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Skill {
    pub id: String,
    pub visible: bool,
    pub name: String,
    pub description: String,
    pub level: u8,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub id: String,
    pub visible: bool,
    pub name: String,
    pub description: String,
    pub date: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Language {
    pub id: String,
    pub visible: bool,
    pub name: String,
    pub description: String,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Award {
    pub id: String,
    pub visible: bool,
    pub title: String,
    pub awarder: String,
    pub date: String,
    pub summary: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Certification {
    pub id: String,
    pub visible: bool,
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub summary: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub id: String,
    pub visible: bool,
    pub network: String,
    pub username: String,
    pub icon: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Interest {
    pub id: String,
    pub visible: bool,
    pub name: String,
    pub keywords: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Metadata
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    pub template: String,
    /// pages → columns → section ids
    pub layout: Vec<Vec<Vec<String>>>,
    pub css: Css,
    pub page: Page,
    pub theme: Theme,
    pub typography: Typography,
    pub notes: String,
}

impl Default for Metadata {
    fn default() -> Self {
        let main = ["profiles", "summary", "experience", "education", "projects"];
        let sidebar = ["skills", "languages", "awards", "certifications", "interests"];
        Self {
            template: "rhyhorn".to_string(),
            layout: vec![vec![
                main.iter().map(|s| s.to_string()).collect(),
                sidebar.iter().map(|s| s.to_string()).collect(),
            ]],
            css: Css::default(),
            page: Page::default(),
            theme: Theme::default(),
            typography: Typography::default(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Css {
    pub value: String,
    pub visible: bool,
}

impl Default for Css {
    fn default() -> Self {
        Self {
            value: "* {\n\toutline: 1px solid #000;\n\toutline-offset: 4px;\n}".to_string(),
            visible: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Page {
    pub margin: u32,
    pub format: PageFormat,
    pub options: PageOptions,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            margin: 18,
            format: PageFormat::A4,
            options: PageOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageOptions {
    pub break_line: bool,
    pub page_numbers: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            break_line: true,
            page_numbers: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    pub background: String,
    pub text: String,
    pub primary: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#000000".to_string(),
            primary: "#dc2626".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Typography {
    pub font: Font,
    pub line_height: f32,
    pub hide_icons: bool,
    pub underline_links: bool,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font: Font::default(),
            line_height: 1.5,
            hide_icons: false,
            underline_links: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Font {
    pub family: String,
    pub subset: String,
    pub variants: Vec<String>,
    pub size: f32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "IBM Plex Serif".to_string(),
            subset: "latin".to_string(),
            variants: vec!["regular".to_string(), "italic".to_string(), "600".to_string()],
            size: 14.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

/// Anything carrying an item id, so section-level checks can be shared.
trait Identified {
    fn item_id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),* $(,)?) => {
        $(impl Identified for $ty {
            fn item_id(&self) -> &str {
                &self.id
            }
        })*
    };
}

identified!(
    Experience,
    Education,
    Skill,
    Project,
    Language,
    Award,
    Certification,
    Profile,
    Interest
);

impl ResumeData {
    /// Checks the value-level rules every stored document must satisfy.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.basics.validate()?;
        self.sections.validate()?;
        self.metadata.validate()
    }
}

impl Basics {
    fn validate(&self) -> Result<(), SchemaError> {
        check_email("basics.email", &self.email)?;
        check_url("basics.url.href", &self.url.href)?;
        check_url("basics.picture.url", &self.picture.url)?;
        for field in &self.custom_fields {
            check_not_empty("basics.custom_fields.id", &field.id)?;
        }
        Ok(())
    }
}

impl Sections {
    fn validate(&self) -> Result<(), SchemaError> {
        check_columns("summary", self.summary.columns)?;

        check_section("experience", &self.experience)?;
        check_section("education", &self.education)?;
        check_section("skills", &self.skills)?;
        check_section("projects", &self.projects)?;
        check_section("languages", &self.languages)?;
        check_section("awards", &self.awards)?;
        check_section("certifications", &self.certifications)?;
        check_section("profiles", &self.profiles)?;
        check_section("interests", &self.interests)?;

        for skill in &self.skills.items {
            check_level("skills.level", skill.level)?;
        }
        for language in &self.languages.items {
            check_level("languages.level", language.level)?;
        }

        let links = self
            .experience
            .items
            .iter()
            .map(|i| &i.url)
            .chain(self.education.items.iter().map(|i| &i.url))
            .chain(self.projects.items.iter().map(|i| &i.url))
            .chain(self.awards.items.iter().map(|i| &i.url))
            .chain(self.certifications.items.iter().map(|i| &i.url))
            .chain(self.profiles.items.iter().map(|i| &i.url));
        for url in links {
            check_url("sections.url.href", &url.href)?;
        }
        Ok(())
    }
}

impl Metadata {
    fn validate(&self) -> Result<(), SchemaError> {
        check_not_empty("metadata.template", &self.template)?;
        check_not_empty("metadata.theme.background", &self.theme.background)?;
        check_not_empty("metadata.theme.text", &self.theme.text)?;
        check_not_empty("metadata.theme.primary", &self.theme.primary)
    }
}

fn check_section<T: Identified>(name: &str, section: &Section<T>) -> Result<(), SchemaError> {
    check_columns(name, section.columns)?;
    let mut seen = HashSet::new();
    for item in &section.items {
        let id = item.item_id();
        check_not_empty(&format!("{name}.items.id"), id)?;
        if !seen.insert(id) {
            return Err(SchemaError::DuplicateId {
                section: name.to_string(),
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn check_columns(section: &str, columns: u8) -> Result<(), SchemaError> {
    if (1..=MAX_SECTION_COLUMNS).contains(&columns) {
        Ok(())
    } else {
        Err(SchemaError::OutOfRange {
            field: format!("{section}.columns"),
            value: u32::from(columns),
            min: 1,
            max: u32::from(MAX_SECTION_COLUMNS),
        })
    }
}

fn check_level(field: &str, level: u8) -> Result<(), SchemaError> {
    if level <= MAX_LEVEL {
        Ok(())
    } else {
        Err(SchemaError::OutOfRange {
            field: field.to_string(),
            value: u32::from(level),
            min: 0,
            max: u32::from(MAX_LEVEL),
        })
    }
}

fn check_not_empty(field: &str, value: &str) -> Result<(), SchemaError> {
    if value.trim().is_empty() {
        Err(SchemaError::Empty {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Empty, or `local@domain`: exactly one `@`, both sides non-empty.
fn check_email(field: &str, value: &str) -> Result<(), SchemaError> {
    if value.is_empty() {
        return Ok(());
    }
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidEmail {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// Empty, or an absolute http(s) URL with a host.
fn check_url(field: &str, value: &str) -> Result<(), SchemaError> {
    if value.is_empty() {
        return Ok(());
    }
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') && !value.contains(' ') => Ok(()),
        _ => Err(SchemaError::InvalidUrl {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(id: &str, level: u8) -> Skill {
        Skill {
            id: id.to_string(),
            visible: true,
            name: "Rust".to_string(),
            description: String::new(),
            level,
            keywords: vec![],
        }
    }

    #[test]
    fn test_default_document_is_valid() {
        assert_eq!(ResumeData::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_document_survives_json() {
        let json = serde_json::to_value(ResumeData::default()).unwrap();
        let recovered: ResumeData = serde_json::from_value(json).unwrap();
        assert_eq!(recovered, ResumeData::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut json = serde_json::to_value(ResumeData::default()).unwrap();
        json["basics"]["favourite_colour"] = serde_json::json!("teal");
        let result: Result<ResumeData, _> = serde_json::from_value(json);
        assert!(result.is_err(), "unknown basics key must not deserialize");
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut json = serde_json::to_value(ResumeData::default()).unwrap();
        json["metadata"]
            .as_object_mut()
            .unwrap()
            .remove("template");
        let result: Result<ResumeData, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_email_rules() {
        let mut data = ResumeData::default();
        data.basics.email = "jane@example.com".to_string();
        assert!(data.validate().is_ok());

        data.basics.email = "not-an-email".to_string();
        assert!(matches!(
            data.validate(),
            Err(SchemaError::InvalidEmail { .. })
        ));

        data.basics.email = "a@b@c.com".to_string();
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_email_needs_only_non_empty_parts() {
        let mut data = ResumeData::default();
        for valid in ["ops@localhost", "jane@example.com", "a@b"] {
            data.basics.email = valid.to_string();
            assert!(data.validate().is_ok(), "{valid} should be accepted");
        }
        for invalid in ["@example.com", "jane@", "@"] {
            data.basics.email = invalid.to_string();
            assert!(
                matches!(data.validate(), Err(SchemaError::InvalidEmail { .. })),
                "{invalid} should be rejected"
            );
        }
    }

    #[test]
    fn test_picture_url_must_be_http() {
        let mut data = ResumeData::default();
        data.basics.picture.url = "ftp://example.com/me.png".to_string();
        assert!(matches!(data.validate(), Err(SchemaError::InvalidUrl { .. })));

        data.basics.picture.url = "https://example.com/me.png".to_string();
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_skill_level_capped_at_five() {
        let mut data = ResumeData::default();
        data.sections.skills.items = vec![skill("a", 5)];
        assert!(data.validate().is_ok());

        data.sections.skills.items = vec![skill("a", 6)];
        assert!(matches!(
            data.validate(),
            Err(SchemaError::OutOfRange { value: 6, .. })
        ));
    }

    #[test]
    fn test_duplicate_item_ids_rejected() {
        let mut data = ResumeData::default();
        data.sections.skills.items = vec![skill("dup", 1), skill("dup", 2)];
        assert_eq!(
            data.validate(),
            Err(SchemaError::DuplicateId {
                section: "skills".to_string(),
                id: "dup".to_string()
            })
        );
    }

    #[test]
    fn test_zero_columns_rejected() {
        let mut data = ResumeData::default();
        data.sections.projects.columns = 0;
        assert!(data.validate().is_err());
    }
}
