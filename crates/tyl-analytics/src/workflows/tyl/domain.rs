use std::fmt;

use serde::{Deserialize, Serialize};

use super::classifier;

/// Identifier wrapper for enrolled students.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Highest semester a student can be enrolled in.
pub const FINAL_SEMESTER: u8 = 8;
/// Upper bound of a single internal-assessment score.
pub const MAX_INTERNAL_ASSESSMENT: f32 = 50.0;
/// Upper bound of a single assignment score.
pub const MAX_ASSIGNMENT: f32 = 20.0;

/// Enrolment metadata used to scope cohort reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub student_id: StudentId,
    pub name: String,
    pub department: String,
    #[serde(default)]
    pub section: Option<String>,
    pub year: u8,
    pub current_semester: u8,
}

/// A persisted score row, unique per (student, subject code, semester).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkRecord {
    pub student_id: StudentId,
    pub subject_code: String,
    pub semester: u8,
    #[serde(default)]
    pub ia1: Option<f32>,
    #[serde(default)]
    pub ia2: Option<f32>,
    #[serde(default)]
    pub assignment1: Option<f32>,
    #[serde(default)]
    pub assignment2: Option<f32>,
}

impl MarkRecord {
    /// Sum of both internal assessments, missing scores contributing zero.
    pub fn combined_score(&self) -> f32 {
        self.ia1.unwrap_or(0.0) + self.ia2.unwrap_or(0.0)
    }

    /// A record with neither internal assessment filled in counts as "not attempted".
    pub fn is_entered(&self) -> bool {
        self.ia1.is_some() || self.ia2.is_some()
    }

    pub fn tyl_code(&self) -> Option<SubjectCode> {
        SubjectCode::parse(&self.subject_code)
    }

    pub fn key(&self) -> (StudentId, String, u8) {
        (
            self.student_id.clone(),
            classifier::normalize(&self.subject_code),
            self.semester,
        )
    }
}

/// A profile paired with every mark record the caller chose to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentMarks {
    pub profile: StudentProfile,
    pub marks: Vec<MarkRecord>,
}

/// Faculty-submitted marks before validation and normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkEntry {
    pub student_id: StudentId,
    pub subject_code: String,
    pub semester: u8,
    #[serde(default)]
    pub ia1: Option<f32>,
    #[serde(default)]
    pub ia2: Option<f32>,
    #[serde(default)]
    pub assignment1: Option<f32>,
    #[serde(default)]
    pub assignment2: Option<f32>,
}

/// Skill category encoded by the first letter of a subject code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Aptitude,
    Language,
    SoftSkills,
    Programming,
    Core,
}

impl Category {
    pub const fn ordered() -> [Category; 5] {
        [
            Category::Language,
            Category::SoftSkills,
            Category::Aptitude,
            Category::Programming,
            Category::Core,
        ]
    }

    pub const fn letter(self) -> char {
        match self {
            Category::Aptitude => 'a',
            Category::Language => 'l',
            Category::SoftSkills => 's',
            Category::Programming => 'p',
            Category::Core => 'c',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'a' => Some(Category::Aptitude),
            'l' => Some(Category::Language),
            's' => Some(Category::SoftSkills),
            'p' => Some(Category::Programming),
            'c' => Some(Category::Core),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::Aptitude => "Aptitude",
            Category::Language => "Language",
            Category::SoftSkills => "Soft Skills",
            Category::Programming => "Programming",
            Category::Core => "Core",
        }
    }
}

/// Dash-suffixed tag distinguishing otherwise identical subject codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Odd,
    Full,
    Python,
    Java,
    C,
    Mad,
    Fsd,
    Ds,
}

impl Variant {
    pub const fn suffix(self) -> &'static str {
        match self {
            Variant::Odd => "odd",
            Variant::Full => "full",
            Variant::Python => "python",
            Variant::Java => "java",
            Variant::C => "c",
            Variant::Mad => "mad",
            Variant::Fsd => "fsd",
            Variant::Ds => "ds",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "odd" => Some(Variant::Odd),
            "full" => Some(Variant::Full),
            "python" => Some(Variant::Python),
            "java" => Some(Variant::Java),
            "c" => Some(Variant::C),
            "mad" => Some(Variant::Mad),
            "fsd" => Some(Variant::Fsd),
            "ds" => Some(Variant::Ds),
            _ => None,
        }
    }

    pub const fn core_variant(self) -> Option<CoreVariant> {
        match self {
            Variant::Odd => Some(CoreVariant::Odd),
            Variant::Full => Some(CoreVariant::Full),
            _ => None,
        }
    }
}

/// Odd-semester or full-year offering of a core subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreVariant {
    Odd,
    Full,
}

/// Category and level pair such as `a1` or `c4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BaseCode {
    pub category: Category,
    pub level: u8,
}

impl BaseCode {
    pub const fn new(category: Category, level: u8) -> Self {
        Self { category, level }
    }
}

impl fmt::Display for BaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.category.letter(), self.level)
    }
}

/// A TYL subject code parsed once into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectCode {
    pub category: Category,
    pub level: u8,
    pub variant: Option<Variant>,
}

impl SubjectCode {
    /// Strict parse: `None` unless the normalised code is a recognised TYL subject.
    pub fn parse(raw: &str) -> Option<Self> {
        classifier::parse(raw)
    }

    pub const fn base(&self) -> BaseCode {
        BaseCode::new(self.category, self.level)
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            Some(variant) => write!(f, "{}-{}", self.base(), variant.suffix()),
            None => write!(f, "{}", self.base()),
        }
    }
}

/// Which marks an evaluation may look at.
///
/// `AllHistory` never consults a student's current semester, so promotion cannot change results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "semester")]
pub enum EvaluationScope {
    AllHistory,
    Semester(u8),
}

impl EvaluationScope {
    pub fn from_optional(semester: Option<u8>) -> Self {
        semester.map_or(Self::AllHistory, Self::Semester)
    }

    pub fn includes(&self, record: &MarkRecord) -> bool {
        match self {
            EvaluationScope::AllHistory => true,
            EvaluationScope::Semester(semester) => record.semester == *semester,
        }
    }

    pub fn label(&self) -> String {
        match self {
            EvaluationScope::AllHistory => "all semesters".to_string(),
            EvaluationScope::Semester(semester) => format!("semester {semester}"),
        }
    }
}
