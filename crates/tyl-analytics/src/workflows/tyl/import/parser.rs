use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

use csv::StringRecord;

use super::super::classifier;
use super::super::domain::{MarkRecord, StudentId, StudentProfile};
use super::super::service::{check_record, MarkValidationError};
use super::columns::{column_for_header, Column};
use super::normalizer::normalize_cell;
use super::MarkImportError;

const MARK_COLUMNS: &[Column] = &[Column::StudentId, Column::SubjectCode, Column::Semester];
const PROFILE_COLUMNS: &[Column] = &[
    Column::StudentId,
    Column::Department,
    Column::Year,
    Column::CurrentSemester,
];

struct Row<'a> {
    line: usize,
    record: &'a StringRecord,
    columns: &'a HashMap<Column, usize>,
}

impl Row<'_> {
    fn text(&self, column: Column) -> Option<&str> {
        self.columns
            .get(&column)
            .and_then(|index| self.record.get(*index))
            .and_then(normalize_cell)
    }

    fn required(&self, column: Column) -> Result<&str, MarkImportError> {
        self.text(column).ok_or(MarkImportError::MissingValue {
            line: self.line,
            column: column.label(),
        })
    }

    fn number<T: FromStr>(&self, column: Column) -> Result<Option<T>, MarkImportError> {
        match self.text(column) {
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| MarkImportError::InvalidValue {
                    line: self.line,
                    column: column.label(),
                    value: raw.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn required_number<T: FromStr>(&self, column: Column) -> Result<T, MarkImportError> {
        self.number(column)?.ok_or(MarkImportError::MissingValue {
            line: self.line,
            column: column.label(),
        })
    }
}

pub(crate) fn parse_marks<R: Read>(reader: R) -> Result<Vec<MarkRecord>, MarkImportError> {
    read_rows(reader, MARK_COLUMNS, |row| {
        let record = MarkRecord {
            student_id: StudentId(row.required(Column::StudentId)?.to_string()),
            subject_code: classifier::normalize(row.required(Column::SubjectCode)?),
            semester: row.required_number(Column::Semester)?,
            ia1: row.number(Column::Ia1)?,
            ia2: row.number(Column::Ia2)?,
            assignment1: row.number(Column::Assignment1)?,
            assignment2: row.number(Column::Assignment2)?,
        };
        check_record(&record).map_err(|err| out_of_range(row.line, err))?;
        Ok(record)
    })
}

fn out_of_range(line: usize, err: MarkValidationError) -> MarkImportError {
    match err {
        MarkValidationError::EmptySubjectCode => MarkImportError::MissingValue {
            line,
            column: Column::SubjectCode.label(),
        },
        MarkValidationError::SemesterOutOfRange(semester)
        | MarkValidationError::FinalSemester(semester) => MarkImportError::InvalidValue {
            line,
            column: Column::Semester.label(),
            value: semester.to_string(),
        },
        MarkValidationError::ScoreOutOfRange { field, value, .. } => {
            MarkImportError::InvalidValue {
                line,
                column: field,
                value: value.to_string(),
            }
        }
    }
}

pub(crate) fn parse_profiles<R: Read>(reader: R) -> Result<Vec<StudentProfile>, MarkImportError> {
    read_rows(reader, PROFILE_COLUMNS, |row| {
        let student_id = row.required(Column::StudentId)?.to_string();
        Ok(StudentProfile {
            name: row
                .text(Column::Name)
                .map(str::to_string)
                .unwrap_or_else(|| student_id.clone()),
            student_id: StudentId(student_id),
            department: row.required(Column::Department)?.to_string(),
            section: row.text(Column::Section).map(str::to_string),
            year: row.required_number(Column::Year)?,
            current_semester: row.required_number(Column::CurrentSemester)?,
        })
    })
}

fn read_rows<R, T, F>(
    reader: R,
    required: &[Column],
    mut build: F,
) -> Result<Vec<T>, MarkImportError>
where
    R: Read,
    F: FnMut(&Row<'_>) -> Result<T, MarkImportError>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut columns = HashMap::new();
    for (index, header) in csv_reader.headers()?.iter().enumerate() {
        if let Some(column) = column_for_header(header) {
            columns.entry(column).or_insert(index);
        }
    }

    if let Some(missing) = required.iter().find(|column| !columns.contains_key(*column)) {
        return Err(MarkImportError::MissingColumn(missing.label()));
    }

    let mut rows = Vec::new();
    for (offset, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let row = Row {
            line: offset + 1,
            record: &record,
            columns: &columns,
        };
        rows.push(build(&row)?);
    }

    Ok(rows)
}
