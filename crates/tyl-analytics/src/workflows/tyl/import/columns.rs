use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Column {
    StudentId,
    SubjectCode,
    Semester,
    Ia1,
    Ia2,
    Assignment1,
    Assignment2,
    Name,
    Department,
    Section,
    Year,
    CurrentSemester,
}

impl Column {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Column::StudentId => "student_id",
            Column::SubjectCode => "subject_code",
            Column::Semester => "semester",
            Column::Ia1 => "ia1",
            Column::Ia2 => "ia2",
            Column::Assignment1 => "assignment1",
            Column::Assignment2 => "assignment2",
            Column::Name => "name",
            Column::Department => "department",
            Column::Section => "section",
            Column::Year => "year",
            Column::CurrentSemester => "current_semester",
        }
    }
}

static HEADER_MAP: OnceLock<HashMap<String, Column>> = OnceLock::new();

pub(crate) fn column_for_header(header: &str) -> Option<Column> {
    header_map().get(&normalize_header(header)).copied()
}

fn header_map() -> &'static HashMap<String, Column> {
    HEADER_MAP.get_or_init(|| {
        const HEADER_TO_COLUMN: &[(&str, Column)] = &[
            ("student_id", Column::StudentId),
            ("Student ID", Column::StudentId),
            ("USN", Column::StudentId),
            ("Roll No", Column::StudentId),
            ("subject_code", Column::SubjectCode),
            ("Subject", Column::SubjectCode),
            ("Code", Column::SubjectCode),
            ("semester", Column::Semester),
            ("Sem", Column::Semester),
            ("ia1", Column::Ia1),
            ("IA-1", Column::Ia1),
            ("Internal Assessment 1", Column::Ia1),
            ("ia2", Column::Ia2),
            ("IA-2", Column::Ia2),
            ("Internal Assessment 2", Column::Ia2),
            ("assignment1", Column::Assignment1),
            ("Assign 1", Column::Assignment1),
            ("assignment2", Column::Assignment2),
            ("Assign 2", Column::Assignment2),
            ("name", Column::Name),
            ("Student Name", Column::Name),
            ("department", Column::Department),
            ("Dept", Column::Department),
            ("Branch", Column::Department),
            ("section", Column::Section),
            ("year", Column::Year),
            ("current_semester", Column::CurrentSemester),
            ("Current Sem", Column::CurrentSemester),
        ];

        HEADER_TO_COLUMN
            .iter()
            .map(|(header, column)| (normalize_header(header), *column))
            .collect()
    })
}
