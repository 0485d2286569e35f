use crate::catalog::AttendanceRecord;
use chrono::NaiveDate;
use serde::Serialize;

const CSV_HEADER: [&str; 6] = [
    "Class Name",
    "Date",
    "Present",
    "Absent",
    "Attendance Rate",
    "Confirmed By",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub id: String,
    pub class_id: String,
    pub class_name: String,
    pub date: NaiveDate,
    pub present: u32,
    pub absent: u32,
    /// Whole percentage, e.g. `92`.
    pub attendance_rate: u32,
    pub confirmed_by: String,
}

impl From<&AttendanceRecord> for ReportRow {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: record.id.clone(),
            class_id: record.class_id.clone(),
            class_name: record.class_name.clone(),
            date: record.date,
            present: record.present,
            absent: record.absent,
            attendance_rate: record.attendance_rate().round() as u32,
            confirmed_by: record.confirmed_by.clone(),
        }
    }
}

pub fn rows(records: &[AttendanceRecord]) -> Vec<ReportRow> {
    records.iter().map(ReportRow::from).collect()
}

pub fn to_csv(records: &[AttendanceRecord]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push_str("\r\n");

    for row in rows(records) {
        let fields = [
            escape(&row.class_name),
            row.date.to_string(),
            row.present.to_string(),
            row.absent.to_string(),
            format!("{}%", row.attendance_rate),
            escape(&row.confirmed_by),
        ];
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }

    out
}

// RFC 4180 quoting.
fn escape(field: &str) -> String {
    if field.contains(&[',', '"', '\r', '\n'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
