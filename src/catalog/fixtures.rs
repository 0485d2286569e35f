use super::{AttendanceRecord, Class, Student};
use chrono::NaiveDate;

const STUDENTS: [(&str, &str); 12] = [
    ("s1", "Alice Johnson"),
    ("s2", "Bob Williams"),
    ("s3", "Charlie Brown"),
    ("s4", "Diana Miller"),
    ("s5", "Ethan Davis"),
    ("s6", "Fiona Garcia"),
    ("s7", "George Rodriguez"),
    ("s8", "Hannah Martinez"),
    ("s9", "Ian Hernandez"),
    ("s10", "Julia Lopez"),
    ("s11", "Kevin Gonzalez"),
    ("s12", "Laura Wilson"),
];

// (id, name, subject, number of students enrolled from the start of STUDENTS)
const CLASSES: [(&str, &str, &str, usize); 4] = [
    ("math101", "Algebra 1", "Mathematics", 12),
    ("phy201", "Physics I", "Science", 10),
    ("eng301", "American Literature", "English", 8),
    ("his102", "World History", "History", 11),
];

// (id, class id, (y, m, d), present, absent)
const RECORDS: [(&str, &str, (i32, u32, u32), u32, u32); 5] = [
    ("r1", "math101", (2024, 5, 20), 11, 1),
    ("r2", "phy201", (2024, 5, 20), 9, 1),
    ("r3", "eng301", (2024, 5, 19), 8, 0),
    ("r4", "his102", (2024, 5, 19), 10, 1),
    ("r5", "math101", (2024, 5, 18), 12, 0),
];

pub const DEFAULT_CONFIRMED_BY: &str = "Mr. Davison";

pub fn students() -> Vec<Student> {
    STUDENTS
        .iter()
        .map(|(id, name)| Student {
            id: id.to_string(),
            name: name.to_string(),
            avatar_url: format!("https://picsum.photos/seed/{id}/100/100"),
        })
        .collect()
}

pub fn classes() -> Vec<Class> {
    let students = students();
    CLASSES
        .iter()
        .map(|(id, name, subject, enrolled)| Class {
            id: id.to_string(),
            name: name.to_string(),
            subject: subject.to_string(),
            cover_image_url: format!("https://picsum.photos/seed/{id}/600/400"),
            students: students[..*enrolled].to_vec(),
        })
        .collect()
}

pub fn attendance_records(classes: &[Class]) -> Vec<AttendanceRecord> {
    RECORDS
        .iter()
        .filter_map(|(id, class_id, (y, m, d), present, absent)| {
            let class = classes.iter().find(|c| c.id == *class_id)?;
            Some(AttendanceRecord {
                id: id.to_string(),
                class_id: class.id.clone(),
                class_name: class.name.clone(),
                date: NaiveDate::from_ymd_opt(*y, *m, *d)?,
                present: *present,
                absent: *absent,
                confirmed_by: DEFAULT_CONFIRMED_BY.to_string(),
            })
        })
        .collect()
}
