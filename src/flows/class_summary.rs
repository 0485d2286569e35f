//! Turns raw attendance counts into a short narrative for the teacher.
//! All analysis (rate, notable absences, patterns) is left to the model.

use super::{Flow, join_or_none, run_flow};
use crate::{
    Error, Result,
    llm::{ChatMessage, LlmClient, ResponseSchema},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that helps teachers summarize class attendance.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassSummaryRequest {
    pub class_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub present_students: Vec<String>,
    pub absent_students: Vec<String>,
    pub total_students: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub summary: String,
}

pub struct ClassSummaryFlow;

impl Flow for ClassSummaryFlow {
    const NAME: &'static str = "class_summary";

    type Input = ClassSummaryRequest;
    type Output = ClassSummary;

    fn validate(input: &ClassSummaryRequest) -> Result<()> {
        if input.class_id.trim().is_empty() {
            return Err(Error::validation("class_id must not be empty"));
        }

        if input.date.len() != 10 || NaiveDate::parse_from_str(&input.date, "%Y-%m-%d").is_err() {
            return Err(Error::validation(format!(
                "date must be a calendar date in YYYY-MM-DD form, got '{}'",
                input.date
            )));
        }

        let lists = [
            ("present_students", &input.present_students),
            ("absent_students", &input.absent_students),
        ];
        for (field, students) in lists {
            if students.iter().any(|s| s.trim().is_empty()) {
                return Err(Error::validation(format!("{field} contains a blank entry")));
            }
        }

        let counted = input.present_students.len() + input.absent_students.len();
        if counted > input.total_students as usize {
            return Err(Error::validation(format!(
                "present ({}) + absent ({}) exceeds total_students ({})",
                input.present_students.len(),
                input.absent_students.len(),
                input.total_students
            )));
        }

        Ok(())
    }

    fn messages(input: &ClassSummaryRequest) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(render_prompt(input)),
        ]
    }

    fn output_schema() -> ResponseSchema {
        ResponseSchema {
            name: "class_summary".to_string(),
            description: Some("Narrative summary of one class's attendance".to_string()),
            schema: json!({
                "type": "object",
                "properties": {
                    "summary": {
                        "type": "string",
                        "description": "Attendance rate, notable absences and any patterns observed"
                    }
                },
                "required": ["summary"],
                "additionalProperties": false
            }),
            strict: true,
        }
    }

    fn check_output(_input: &ClassSummaryRequest, output: ClassSummary) -> Result<ClassSummary> {
        let summary = output.summary.trim();
        if summary.is_empty() {
            return Err(Error::response_parse("summary must not be empty"));
        }
        Ok(ClassSummary {
            summary: summary.to_string(),
        })
    }
}

fn render_prompt(input: &ClassSummaryRequest) -> String {
    format!(
        "Given the following information, write a brief summary of the class attendance, \
         including the overall attendance rate, notable absences and any patterns observed.\n\
         \n\
         Class ID: {class_id}\n\
         Date: {date}\n\
         Total Students: {total}\n\
         Present Students: {present}\n\
         Absent Students: {absent}",
        class_id = input.class_id,
        date = input.date,
        total = input.total_students,
        present = join_or_none(&input.present_students),
        absent = join_or_none(&input.absent_students),
    )
}

pub async fn generate_class_summary(
    client: &dyn LlmClient,
    request: &ClassSummaryRequest,
) -> Result<ClassSummary> {
    run_flow::<ClassSummaryFlow>(client, request).await
}
