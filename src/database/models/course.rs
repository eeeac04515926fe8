use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{required, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course together with the user that owns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithOwner {
    #[serde(flatten)]
    pub course: Course,
    pub owner: UserProfile,
}

/// Body of `POST /api/courses` and `PUT /api/courses/:id`.
///
/// Any `userId` the client sends is ignored; ownership always comes from
/// the authenticated identity.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

/// Validated course columns, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFields {
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

impl CourseInput {
    pub fn validate(self) -> Result<CourseFields, Vec<String>> {
        let mut errors = Vec::new();

        let title = required(
            self.title,
            "Title is required",
            "Please provide a title",
            &mut errors,
        );
        let description = required(
            self.description,
            "Description is required",
            "Please provide a description",
            &mut errors,
        );

        match (title, description) {
            (Some(title), Some(description)) => Ok(CourseFields {
                title,
                description,
                estimated_time: self.estimated_time,
                materials_needed: self.materials_needed,
            }),
            _ => Err(errors),
        }
    }
}
