//! Document merging: overlays a partial document onto a complete one.
//!
//! Every object node of the schema has a `Partial*` counterpart whose fields are
//! all optional. Merging walks the two trees together:
//! - nested objects present in the partial are merged recursively,
//! - leaf values and arrays present in the partial replace the base value whole,
//! - anything absent from the partial keeps the base value.
//!
//! Merging borrows both inputs and builds a new document; `merge_document` also
//! validates the result so callers only ever see complete, valid documents.

use serde::{Deserialize, Serialize};

use crate::schema::{
    Basics, Css, CustomField, Font, Metadata, Page, PageFormat, PageOptions, Picture,
    PictureEffects, ResumeData, SchemaError, Section, Sections, SummarySection, Theme,
    Typography, Url,
};
use crate::schema::{
    Award, Certification, Education, Experience, Interest, Language, Profile, Project, Skill,
};

/// Structural merge of a partial overlay onto a complete value.
pub trait Merge: Clone {
    type Partial;

    fn merge(&self, overrides: &Self::Partial) -> Self;
}

/// Merges `overrides` onto `base` and validates the resulting document.
pub fn merge_document(
    base: &ResumeData,
    overrides: &PartialResumeData,
) -> Result<ResumeData, SchemaError> {
    let merged = base.merge(overrides);
    merged.validate()?;
    Ok(merged)
}

fn pick<T: Clone>(base: &T, overrides: &Option<T>) -> T {
    overrides.as_ref().unwrap_or(base).clone()
}

fn nest<M: Merge>(base: &M, overrides: &Option<M::Partial>) -> M {
    match overrides {
        Some(partial) => base.merge(partial),
        None => base.clone(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Partial types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialResumeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basics: Option<PartialBasics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<PartialSections>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PartialMetadata>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialBasics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<PartialUrl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<PartialPicture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialUrl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialPicture {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<PartialPictureEffects>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialPictureEffects {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grayscale: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialSections {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PartialSummarySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<PartialSection<Experience>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<PartialSection<Education>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<PartialSection<Skill>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<PartialSection<Project>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<PartialSection<Language>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awards: Option<PartialSection<Award>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<PartialSection<Certification>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<PartialSection<Profile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<PartialSection<Interest>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialSummarySection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separate_links: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialSection<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separate_links: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<T>>,
}

impl<T> Default for PartialSection<T> {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            columns: None,
            separate_links: None,
            visible: None,
            items: None,
        }
    }
}

impl<T> PartialSection<T> {
    /// A partial that only replaces the section's items.
    pub fn items(items: Vec<T>) -> Self {
        Self {
            items: Some(items),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<Vec<Vec<String>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<PartialCss>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PartialPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<PartialTheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<PartialTypography>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialCss {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<PageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<PartialPageOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialPageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_line: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_numbers: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialTheme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialTypography {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<PartialFont>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_icons: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline_links: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialFont {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Merge implementations
// ────────────────────────────────────────────────────────────────────────────

impl Merge for ResumeData {
    type Partial = PartialResumeData;

    fn merge(&self, o: &PartialResumeData) -> Self {
        Self {
            basics: nest(&self.basics, &o.basics),
            sections: nest(&self.sections, &o.sections),
            metadata: nest(&self.metadata, &o.metadata),
        }
    }
}

impl Merge for Basics {
    type Partial = PartialBasics;

    fn merge(&self, o: &PartialBasics) -> Self {
        Self {
            name: pick(&self.name, &o.name),
            headline: pick(&self.headline, &o.headline),
            email: pick(&self.email, &o.email),
            phone: pick(&self.phone, &o.phone),
            location: pick(&self.location, &o.location),
            url: nest(&self.url, &o.url),
            custom_fields: pick(&self.custom_fields, &o.custom_fields),
            picture: nest(&self.picture, &o.picture),
        }
    }
}

impl Merge for Url {
    type Partial = PartialUrl;

    fn merge(&self, o: &PartialUrl) -> Self {
        Self {
            label: pick(&self.label, &o.label),
            href: pick(&self.href, &o.href),
        }
    }
}

impl Merge for Picture {
    type Partial = PartialPicture;

    fn merge(&self, o: &PartialPicture) -> Self {
        Self {
            url: pick(&self.url, &o.url),
            size: pick(&self.size, &o.size),
            aspect_ratio: pick(&self.aspect_ratio, &o.aspect_ratio),
            border_radius: pick(&self.border_radius, &o.border_radius),
            effects: nest(&self.effects, &o.effects),
        }
    }
}

impl Merge for PictureEffects {
    type Partial = PartialPictureEffects;

    fn merge(&self, o: &PartialPictureEffects) -> Self {
        Self {
            hidden: pick(&self.hidden, &o.hidden),
            border: pick(&self.border, &o.border),
            grayscale: pick(&self.grayscale, &o.grayscale),
        }
    }
}

impl Merge for Sections {
    type Partial = PartialSections;

    fn merge(&self, o: &PartialSections) -> Self {
        Self {
            summary: nest(&self.summary, &o.summary),
            experience: nest(&self.experience, &o.experience),
            education: nest(&self.education, &o.education),
            skills: nest(&self.skills, &o.skills),
            projects: nest(&self.projects, &o.projects),
            languages: nest(&self.languages, &o.languages),
            awards: nest(&self.awards, &o.awards),
            certifications: nest(&self.certifications, &o.certifications),
            profiles: nest(&self.profiles, &o.profiles),
            interests: nest(&self.interests, &o.interests),
        }
    }
}

impl Merge for SummarySection {
    type Partial = PartialSummarySection;

    fn merge(&self, o: &PartialSummarySection) -> Self {
        Self {
            id: pick(&self.id, &o.id),
            name: pick(&self.name, &o.name),
            columns: pick(&self.columns, &o.columns),
            separate_links: pick(&self.separate_links, &o.separate_links),
            visible: pick(&self.visible, &o.visible),
            content: pick(&self.content, &o.content),
        }
    }
}

impl<T: Clone> Merge for Section<T> {
    type Partial = PartialSection<T>;

    fn merge(&self, o: &PartialSection<T>) -> Self {
        Self {
            id: pick(&self.id, &o.id),
            name: pick(&self.name, &o.name),
            columns: pick(&self.columns, &o.columns),
            separate_links: pick(&self.separate_links, &o.separate_links),
            visible: pick(&self.visible, &o.visible),
            items: pick(&self.items, &o.items),
        }
    }
}

impl Merge for Metadata {
    type Partial = PartialMetadata;

    fn merge(&self, o: &PartialMetadata) -> Self {
        Self {
            template: pick(&self.template, &o.template),
            layout: pick(&self.layout, &o.layout),
            css: nest(&self.css, &o.css),
            page: nest(&self.page, &o.page),
            theme: nest(&self.theme, &o.theme),
            typography: nest(&self.typography, &o.typography),
            notes: pick(&self.notes, &o.notes),
        }
    }
}

impl Merge for Css {
    type Partial = PartialCss;

    fn merge(&self, o: &PartialCss) -> Self {
        Self {
            value: pick(&self.value, &o.value),
            visible: pick(&self.visible, &o.visible),
        }
    }
}

impl Merge for Page {
    type Partial = PartialPage;

    fn merge(&self, o: &PartialPage) -> Self {
        Self {
            margin: pick(&self.margin, &o.margin),
            format: pick(&self.format, &o.format),
            options: nest(&self.options, &o.options),
        }
    }
}

impl Merge for PageOptions {
    type Partial = PartialPageOptions;

    fn merge(&self, o: &PartialPageOptions) -> Self {
        Self {
            break_line: pick(&self.break_line, &o.break_line),
            page_numbers: pick(&self.page_numbers, &o.page_numbers),
        }
    }
}

impl Merge for Theme {
    type Partial = PartialTheme;

    fn merge(&self, o: &PartialTheme) -> Self {
        Self {
            background: pick(&self.background, &o.background),
            text: pick(&self.text, &o.text),
            primary: pick(&self.primary, &o.primary),
        }
    }
}

impl Merge for Typography {
    type Partial = PartialTypography;

    fn merge(&self, o: &PartialTypography) -> Self {
        Self {
            font: nest(&self.font, &o.font),
            line_height: pick(&self.line_height, &o.line_height),
            hide_icons: pick(&self.hide_icons, &o.hide_icons),
            underline_links: pick(&self.underline_links, &o.underline_links),
        }
    }
}

impl Merge for Font {
    type Partial = PartialFont;

    fn merge(&self, o: &PartialFont) -> Self {
        Self {
            family: pick(&self.family, &o.family),
            subset: pick(&self.subset, &o.subset),
            variants: pick(&self.variants, &o.variants),
            size: pick(&self.size, &o.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interest(id: &str, name: &str) -> Interest {
        Interest {
            id: id.to_string(),
            visible: true,
            name: name.to_string(),
            keywords: vec![],
        }
    }

    #[test]
    fn test_empty_partial_returns_base() {
        let base = ResumeData::default();
        let merged = merge_document(&base, &PartialResumeData::default()).unwrap();
        assert_eq!(merged, base);
    }

    #[test]
    fn test_nested_override_keeps_sibling_values() {
        let mut base = ResumeData::default();
        base.basics.headline = "Backend Engineer".to_string();
        base.basics.picture.size = 120;

        let overrides = PartialResumeData {
            basics: Some(PartialBasics {
                name: Some("Jane Doe".to_string()),
                picture: Some(PartialPicture {
                    url: Some("https://example.com/jane.png".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = merge_document(&base, &overrides).unwrap();
        assert_eq!(merged.basics.name, "Jane Doe");
        assert_eq!(merged.basics.picture.url, "https://example.com/jane.png");
        // Untouched siblings keep the base value at every depth
        assert_eq!(merged.basics.headline, "Backend Engineer");
        assert_eq!(merged.basics.picture.size, 120);
        assert_eq!(merged.sections, base.sections);
        assert_eq!(merged.metadata, base.metadata);
    }

    #[test]
    fn test_arrays_are_replaced_not_appended() {
        let mut base = ResumeData::default();
        base.sections.interests.items = vec![interest("a", "Chess"), interest("b", "Climbing")];

        let overrides = PartialResumeData {
            sections: Some(PartialSections {
                interests: Some(PartialSection::items(vec![interest("c", "Sailing")])),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = merge_document(&base, &overrides).unwrap();
        assert_eq!(merged.sections.interests.items, vec![interest("c", "Sailing")]);
        assert_eq!(merged.sections.interests.name, "Interests");
    }

    #[test]
    fn test_empty_array_override_clears_items() {
        let mut base = ResumeData::default();
        base.metadata.typography.font.variants = vec!["regular".to_string()];

        let overrides = PartialResumeData {
            metadata: Some(PartialMetadata {
                typography: Some(PartialTypography {
                    font: Some(PartialFont {
                        variants: Some(vec![]),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = merge_document(&base, &overrides).unwrap();
        assert!(merged.metadata.typography.font.variants.is_empty());
        assert_eq!(merged.metadata.typography.font.family, "IBM Plex Serif");
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let base = ResumeData::default();
        let snapshot = base.clone();
        let overrides = PartialResumeData {
            basics: Some(PartialBasics {
                email: Some("jane@example.com".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overrides_snapshot = overrides.clone();

        let first = merge_document(&base, &overrides).unwrap();
        let second = merge_document(&base, &overrides).unwrap();

        assert_eq!(base, snapshot);
        assert_eq!(overrides, overrides_snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let overrides = PartialResumeData {
            sections: Some(PartialSections {
                summary: Some(PartialSummarySection {
                    columns: Some(9),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let result = merge_document(&ResumeData::default(), &overrides);
        assert!(matches!(result, Err(SchemaError::OutOfRange { value: 9, .. })));
    }

    #[test]
    fn test_partial_json_omits_absent_keys_and_rejects_unknown() {
        let partial: PartialResumeData =
            serde_json::from_str(r#"{"basics": {"name": "Jane"}}"#).unwrap();
        assert_eq!(
            serde_json::to_value(&partial).unwrap(),
            serde_json::json!({"basics": {"name": "Jane"}})
        );

        let unknown: Result<PartialResumeData, _> =
            serde_json::from_str(r#"{"basics": {"nickname": "JD"}}"#);
        assert!(unknown.is_err());
    }
}
