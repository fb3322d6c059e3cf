use serde::{Deserialize, Serialize};

/// Category assigned when a grade falls inside none of the saved bands.
pub const NO_MATCH_CATEGORY: &str = "N/A";

/// Grades at or above this count as top performers, regardless of bands.
pub const TOP_PERFORMER_THRESHOLD: f64 = 80.0;

/// Grades strictly below this count as at risk, regardless of bands.
pub const AT_RISK_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub grade: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_category: Option<String>,
}

impl Student {
    pub fn new(name: impl Into<String>, grade: f64) -> Self {
        Self {
            name: name.into(),
            grade,
            grade_category: None,
        }
    }
}

/// An inclusive grade band. `min <= max` is expected but never checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRange {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub color: String,
}

impl GradeRange {
    pub fn new(min: f64, max: f64, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            min,
            max,
            label: label.into(),
            color: color.into(),
        }
    }

    pub fn contains(&self, grade: f64) -> bool {
        self.min <= grade && grade <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCount {
    pub label: String,
    pub color: String,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeStats {
    pub total_students: usize,
    /// `None` for an empty roster; callers render it explicitly.
    pub average_grade: Option<f64>,
    pub top_performers: usize,
    pub at_risk: usize,
    pub distribution: Vec<BandCount>,
    pub unmatched: usize,
}

/// One exported line: exactly the three columns the export sinks write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub name: String,
    pub grade: f64,
    pub grade_category: String,
}

impl From<&Student> for ExportRow {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            grade: student.grade,
            grade_category: student.grade_category.clone().unwrap_or_default(),
        }
    }
}
