//! Lean schemas: the reduced shapes the text-generation service is asked to fill.
//!
//! Generated content never carries ids, visibility flags or layout; those are
//! assigned here when a lean fragment is turned into a partial document.
//! The JSON Schema sent alongside each prompt is derived from these types, and
//! the same types validate what comes back.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::merge::{
    PartialBasics, PartialSection, PartialSections, PartialSummarySection, PartialUrl,
};
use crate::schema::{Award, Certification, Education, Experience, Language, Project, Skill, Url};

/// Contact and headline fields of a generated resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LeanBasics {
    pub name: String,
    /// One-line professional headline tailored to the target role.
    pub headline: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    /// Personal website or portfolio. Empty strings when unknown.
    pub url: Url,
}

/// Content sections of a generated resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LeanSections {
    /// Short professional summary in plain text or markdown.
    pub summary: String,
    pub experience: Vec<LeanExperience>,
    pub education: Vec<LeanEducation>,
    pub skills: Vec<LeanSkill>,
    pub projects: Vec<LeanProject>,
    pub languages: Vec<LeanLanguage>,
    pub certifications: Vec<LeanCertification>,
    pub awards: Vec<LeanAward>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LeanExperience {
    pub company: String,
    pub position: String,
    pub location: String,
    /// Free-form date range, e.g. "Jan 2021 - Present".
    pub date: String,
    /// Responsibilities and impact, markdown bullet list allowed.
    pub summary: String,
    /// Absolute http(s) URL or empty string.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LeanEducation {
    pub institution: String,
    /// Degree type, e.g. "Bachelor of Science".
    pub study_type: String,
    /// Field of study.
    pub area: String,
    pub score: String,
    pub date: String,
    pub summary: String,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LeanSkill {
    pub name: String,
    pub description: String,
    /// Proficiency from 0 (unrated) to 5 (expert).
    pub level: u8,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LeanProject {
    pub name: String,
    pub description: String,
    pub date: String,
    pub summary: String,
    pub keywords: Vec<String>,
    /// Absolute http(s) URL or empty string.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LeanLanguage {
    pub name: String,
    pub description: String,
    /// Proficiency from 0 (unrated) to 5 (native).
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LeanCertification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub summary: String,
    /// Absolute http(s) URL or empty string.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LeanAward {
    pub title: String,
    pub awarder: String,
    pub date: String,
    pub summary: String,
}

fn new_item_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn link(href: String) -> Url {
    Url {
        label: String::new(),
        href,
    }
}

impl From<LeanBasics> for PartialBasics {
    fn from(lean: LeanBasics) -> Self {
        Self {
            name: Some(lean.name),
            headline: Some(lean.headline),
            email: Some(lean.email),
            phone: Some(lean.phone),
            location: Some(lean.location),
            url: Some(PartialUrl {
                label: Some(lean.url.label),
                href: Some(lean.url.href),
            }),
            custom_fields: None,
            picture: None,
        }
    }
}

impl From<LeanSections> for PartialSections {
    fn from(lean: LeanSections) -> Self {
        let experience = lean
            .experience
            .into_iter()
            .map(|e| Experience {
                id: new_item_id(),
                visible: true,
                company: e.company,
                position: e.position,
                location: e.location,
                date: e.date,
                summary: e.summary,
                url: link(e.url),
            })
            .collect();

        let education = lean
            .education
            .into_iter()
            .map(|e| Education {
                id: new_item_id(),
                visible: true,
                institution: e.institution,
                study_type: e.study_type,
                area: e.area,
                score: e.score,
                date: e.date,
                summary: e.summary,
                courses: e.courses,
                url: Url::default(),
            })
            .collect();

        let skills = lean
            .skills
            .into_iter()
            .map(|s| Skill {
                id: new_item_id(),
                visible: true,
                name: s.name,
                description: s.description,
                level: s.level,
                keywords: s.keywords,
            })
            .collect();

        let projects = lean
            .projects
            .into_iter()
            .map(|p| Project {
                id: new_item_id(),
                visible: true,
                name: p.name,
                description: p.description,
                date: p.date,
                summary: p.summary,
                keywords: p.keywords,
                url: link(p.url),
            })
            .collect();

        let languages = lean
            .languages
            .into_iter()
            .map(|l| Language {
                id: new_item_id(),
                visible: true,
                name: l.name,
                description: l.description,
                level: l.level,
            })
            .collect();

        let certifications = lean
            .certifications
            .into_iter()
            .map(|c| Certification {
                id: new_item_id(),
                visible: true,
                name: c.name,
                issuer: c.issuer,
                date: c.date,
                summary: c.summary,
                url: link(c.url),
            })
            .collect();

        let awards = lean
            .awards
            .into_iter()
            .map(|a| Award {
                id: new_item_id(),
                visible: true,
                title: a.title,
                awarder: a.awarder,
                date: a.date,
                summary: a.summary,
                url: Url::default(),
            })
            .collect();

        Self {
            summary: Some(PartialSummarySection {
                content: Some(lean.summary),
                ..Default::default()
            }),
            experience: Some(PartialSection::items(experience)),
            education: Some(PartialSection::items(education)),
            skills: Some(PartialSection::items(skills)),
            projects: Some(PartialSection::items(projects)),
            languages: Some(PartialSection::items(languages)),
            awards: Some(PartialSection::items(awards)),
            certifications: Some(PartialSection::items(certifications)),
            profiles: None,
            interests: None,
        }
    }
}
