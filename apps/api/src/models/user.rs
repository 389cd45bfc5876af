use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::schema::merge::{Merge, PartialBasics, PartialPicture, PartialResumeData};
use crate::schema::ResumeData;

/// Identity fields copied onto every resume a user creates. Read from `users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

impl UserProfile {
    /// Basics overlay carrying name, email and picture URL.
    pub fn basics_overlay(&self) -> PartialBasics {
        PartialBasics {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            picture: Some(PartialPicture {
                url: Some(self.picture.clone().unwrap_or_default()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Copies the identity fields onto `data`. Identity comes from the user
    /// store and is kept as stored, so the result is not re-validated.
    pub fn apply_to(&self, data: &ResumeData) -> ResumeData {
        data.merge(&PartialResumeData {
            basics: Some(self.basics_overlay()),
            ..Default::default()
        })
    }
}
