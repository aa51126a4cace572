//! Generation: turns form submissions into prompts and prompts into text.
//!
//! Every call is a single blocking round trip through `LlmProvider`. A failed
//! or blank completion becomes `AppError::Generation`; nothing from a failed
//! attempt is kept.

use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::options::{
    ensure_choice, ensure_present, SKILLS, STUDENT_DURATIONS, STUDENT_LEVELS, TEACHER_DURATIONS,
    TEACHER_LEVELS,
};
use crate::generation::prompts::{
    CURRICULUM_PROMPT_TEMPLATE, QUIZ_PROMPT_PREFIX, ROADMAP_PROMPT_TEMPLATE,
    RUBRIC_PROMPT_TEMPLATE,
};
use crate::llm_client::LlmProvider;
use crate::models::roadmap::RoadmapDraft;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// Teacher form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CurriculumRequest {
    pub subject: String,
    pub level: String,
    pub duration: String,
    pub skills: Vec<String>,
    pub goal: String,
}

impl CurriculumRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        ensure_present("subject", &self.subject)?;
        ensure_present("goal", &self.goal)?;
        ensure_choice("level", &self.level, TEACHER_LEVELS)?;
        ensure_choice("duration", &self.duration, TEACHER_DURATIONS)?;
        if self.skills.is_empty() {
            return Err(AppError::Validation(
                "select at least one skill".to_string(),
            ));
        }
        for skill in &self.skills {
            ensure_choice("skills", skill, SKILLS)?;
        }
        Ok(())
    }
}

/// Student form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct RoadmapRequest {
    pub topic: String,
    pub level: String,
    pub duration: String,
    pub goal: String,
}

impl RoadmapRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        ensure_present("topic", &self.topic)?;
        ensure_present("goal", &self.goal)?;
        ensure_choice("level", &self.level, STUDENT_LEVELS)?;
        ensure_choice("duration", &self.duration, STUDENT_DURATIONS)?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt builders
// ────────────────────────────────────────────────────────────────────────────

/// Substitutes `{name}` placeholders in one left-to-right pass. Inserted
/// values are never rescanned, and unknown placeholders are left as-is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let filled = tail[1..].find('}').and_then(|end| {
            let name = &tail[1..1 + end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end + 2))
        });
        match filled {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

pub(crate) fn build_curriculum_prompt(req: &CurriculumRequest) -> String {
    let skills = req.skills.join(", ");
    fill_template(
        CURRICULUM_PROMPT_TEMPLATE,
        &[
            ("subject", req.subject.as_str()),
            ("level", req.level.as_str()),
            ("duration", req.duration.as_str()),
            ("skills", skills.as_str()),
            ("goal", req.goal.as_str()),
        ],
    )
}

pub(crate) fn build_roadmap_prompt(req: &RoadmapRequest) -> String {
    fill_template(
        ROADMAP_PROMPT_TEMPLATE,
        &[
            ("topic", req.topic.as_str()),
            ("level", req.level.as_str()),
            ("duration", req.duration.as_str()),
            ("goal", req.goal.as_str()),
        ],
    )
}

pub(crate) fn build_quiz_prompt(text: &str) -> String {
    format!("{QUIZ_PROMPT_PREFIX}{text}")
}

pub(crate) fn build_rubric_prompt(text: &str) -> String {
    fill_template(RUBRIC_PROMPT_TEMPLATE, &[("text", text)])
}

// ────────────────────────────────────────────────────────────────────────────
// Generation calls
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_curriculum(
    llm: &dyn LlmProvider,
    req: &CurriculumRequest,
) -> Result<String, AppError> {
    info!(subject = %req.subject, level = %req.level, "Generating curriculum");
    complete(llm, &build_curriculum_prompt(req), "Curriculum").await
}

pub async fn generate_roadmap(
    llm: &dyn LlmProvider,
    req: RoadmapRequest,
) -> Result<RoadmapDraft, AppError> {
    info!(topic = %req.topic, level = %req.level, "Generating roadmap");
    let content = complete(llm, &build_roadmap_prompt(&req), "Roadmap").await?;
    Ok(RoadmapDraft {
        topic: req.topic,
        level: req.level,
        duration: req.duration,
        goal: req.goal,
        content,
    })
}

pub async fn generate_quiz(llm: &dyn LlmProvider, text: &str) -> Result<String, AppError> {
    complete(llm, &build_quiz_prompt(text), "Quiz").await
}

pub async fn generate_rubric(llm: &dyn LlmProvider, text: &str) -> Result<String, AppError> {
    complete(llm, &build_rubric_prompt(text), "Rubric").await
}

async fn complete(llm: &dyn LlmProvider, prompt: &str, what: &str) -> Result<String, AppError> {
    let text = llm
        .complete(prompt)
        .await
        .map_err(|e| AppError::Generation(format!("{what} generation failed: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::Generation(format!(
            "{what} generation returned no text"
        )));
    }

    info!(chars = text.len(), "{what} generated");
    Ok(text)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
