use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Display format of `CurriculumRecord::created_at`, e.g. `05 Mar 2025 14:07`.
pub const TIMESTAMP_FORMAT: &str = "%d %b %Y %H:%M";

/// One persisted curriculum. Field names on disk: `id`, `title`, `timestamp`,
/// `content`, `rubric`, `quiz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumRecord {
    pub id: u64,
    pub title: String,
    /// Set once at creation, never rewritten.
    #[serde(rename = "timestamp")]
    pub created_at: String,
    pub content: String,
    /// Null until a rubric is generated. Each regeneration overwrites it.
    pub rubric: Option<String>,
    /// Null until a quiz is generated. Each regeneration overwrites it.
    pub quiz: Option<String>,
}

impl CurriculumRecord {
    pub fn new(id: u64, title: String, content: String, created_at: String) -> Self {
        Self {
            id,
            title,
            created_at,
            content,
            rubric: None,
            quiz: None,
        }
    }
}

/// Record title as shown in the teacher's picker: `"{subject} ({level})"`.
pub fn curriculum_title(subject: &str, level: &str) -> String {
    format!("{subject} ({level})")
}

pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}
