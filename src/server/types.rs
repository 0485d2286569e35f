use crate::catalog::{Class, Student};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ClassOverview {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub student_count: usize,
    pub cover_image_url: String,
}

impl From<Class> for ClassOverview {
    fn from(class: Class) -> Self {
        Self {
            student_count: class.student_count(),
            id: class.id,
            name: class.name,
            subject: class.subject,
            cover_image_url: class.cover_image_url,
        }
    }
}

/// Current attendance state for a class, as tracked by the caller.
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceStateRequest {
    /// Ids of students already marked present.
    #[serde(default)]
    pub present: Vec<String>,
    /// Defaults to today (UTC).
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ClassSummaryResponse {
    pub class_id: String,
    pub date: NaiveDate,
    pub present: Vec<Student>,
    pub absent: Vec<Student>,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
