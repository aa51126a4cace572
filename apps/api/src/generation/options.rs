//! Fixed choice lists offered by the teacher and student forms.

use serde::Serialize;

use crate::errors::AppError;

pub const TEACHER_LEVELS: &[&str] = &["High School", "Undergraduate", "Postgraduate", "Professional"];
pub const TEACHER_DURATIONS: &[&str] = &["4 Weeks", "8 Weeks", "12 Weeks", "6 Months"];
pub const SKILLS: &[&str] = &[
    "Critical Thinking",
    "Problem Solving",
    "Industry Readiness",
    "Hands-on Projects",
    "Research Skills",
];
pub const STUDENT_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced"];
pub const STUDENT_DURATIONS: &[&str] = &["2 Weeks", "4 Weeks", "8 Weeks", "3 Months"];

#[derive(Debug, Serialize)]
pub struct TeacherOptions {
    pub levels: &'static [&'static str],
    pub durations: &'static [&'static str],
    pub skills: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct StudentOptions {
    pub levels: &'static [&'static str],
    pub durations: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub teacher: TeacherOptions,
    pub student: StudentOptions,
}

pub fn form_options() -> FormOptions {
    FormOptions {
        teacher: TeacherOptions {
            levels: TEACHER_LEVELS,
            durations: TEACHER_DURATIONS,
            skills: SKILLS,
        },
        student: StudentOptions {
            levels: STUDENT_LEVELS,
            durations: STUDENT_DURATIONS,
        },
    }
}

/// Rejects a value that is not one of `allowed`.
pub fn ensure_choice(field: &str, value: &str, allowed: &[&str]) -> Result<(), AppError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} must be one of: {}",
            allowed.join(", ")
        )))
    }
}

/// Rejects a blank free-text field.
pub fn ensure_present(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::Validation(format!("{field} cannot be empty")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_choice_accepts_listed_value() {
        assert!(ensure_choice("level", "Postgraduate", TEACHER_LEVELS).is_ok());
    }

    #[test]
    fn test_ensure_choice_rejects_student_level_on_teacher_form() {
        let err = ensure_choice("level", "Beginner", TEACHER_LEVELS).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("High School")));
    }

    #[test]
    fn test_ensure_present_rejects_whitespace() {
        assert!(ensure_present("goal", "   \n").is_err());
        assert!(ensure_present("goal", "Get hired").is_ok());
    }

    #[test]
    fn test_form_options_serialize() {
        let value = serde_json::to_value(form_options()).unwrap();
        assert_eq!(value["teacher"]["skills"].as_array().unwrap().len(), 5);
        assert_eq!(value["student"]["durations"][3], "3 Months");
    }
}
