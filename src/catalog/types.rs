use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub cover_image_url: String,
    pub students: Vec<Student>,
}

impl Class {
    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Student names, comma separated, in enrolment order.
    pub fn roster(&self) -> String {
        self.students
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Splits the roster into (present, absent) given the ids already marked
    /// present. Enrolment order is kept on both sides.
    pub fn partition(&self, present_ids: &[String]) -> Result<(Vec<Student>, Vec<Student>)> {
        if let Some(unknown) = present_ids
            .iter()
            .find(|id| !self.students.iter().any(|s| &s.id == *id))
        {
            return Err(Error::validation(format!(
                "student '{}' is not enrolled in {}",
                unknown, self.id
            )));
        }

        Ok(self
            .students
            .iter()
            .cloned()
            .partition(|s| present_ids.contains(&s.id)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub class_id: String,
    pub class_name: String,
    pub date: NaiveDate,
    pub present: u32,
    pub absent: u32,
    pub confirmed_by: String,
}

impl AttendanceRecord {
    pub fn new(
        class: &Class,
        date: NaiveDate,
        present: u32,
        absent: u32,
        confirmed_by: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            class_id: class.id.clone(),
            class_name: class.name.clone(),
            date,
            present,
            absent,
            confirmed_by: confirmed_by.into(),
        }
    }

    /// Percentage of counted students who were present; 0 for an empty record.
    pub fn attendance_rate(&self) -> f64 {
        let total = self.present + self.absent;
        if total == 0 {
            return 0.0;
        }
        f64::from(self.present) / f64::from(total) * 100.0
    }
}
