//! The ordered set of grade bands a roster is categorized against.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::GradeRange;

pub const DEFAULT_COLOR: &str = "#000000";

const COVERAGE_FLOOR: i32 = 0;
const COVERAGE_CEILING: i32 = 100;

#[derive(Debug, Error)]
pub enum RangeError {
    #[error("no grade band at index {index} (set has {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("failed to read range file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid range file: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single-field edit, mirroring one input cell of the band editor.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeField {
    Min(f64),
    Max(f64),
    Label(String),
    Color(String),
}

/// Something worth warning about in a band set. None of these change how
/// students are categorized.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeIssue {
    Inverted { index: usize, min: f64, max: f64 },
    Overlap { first: usize, second: usize },
    /// Whole grades from `from` to `to` inclusive that match no band.
    Gap { from: i32, to: i32 },
}

impl std::fmt::Display for RangeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeIssue::Inverted { index, min, max } => {
                write!(f, "band {index} has min {min} above max {max}")
            }
            RangeIssue::Overlap { first, second } => {
                write!(f, "bands {first} and {second} overlap; band {first} wins")
            }
            RangeIssue::Gap { from, to } if from == to => {
                write!(f, "grade {from} matches no band")
            }
            RangeIssue::Gap { from, to } => write!(f, "grades {from}-{to} match no band"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeSet {
    ranges: Vec<GradeRange>,
}

impl RangeSet {
    pub fn new(ranges: Vec<GradeRange>) -> Self {
        Self { ranges }
    }

    /// The five-band F-A scale offered before the user edits anything.
    pub fn standard() -> Self {
        Self::new(vec![
            GradeRange::new(0.0, 39.0, "F", "#ef4444"),
            GradeRange::new(40.0, 49.0, "D", "#f97316"),
            GradeRange::new(50.0, 59.0, "C", "#eab308"),
            GradeRange::new(60.0, 79.0, "B", "#22c55e"),
            GradeRange::new(80.0, 100.0, "A", "#3b82f6"),
        ])
    }

    pub fn from_path(path: &Path) -> Result<Self, RangeError> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), RangeError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Appends a placeholder band covering everything. No validation.
    pub fn add_default(&mut self) -> usize {
        self.ranges
            .push(GradeRange::new(0.0, 100.0, String::new(), DEFAULT_COLOR));
        self.ranges.len() - 1
    }

    pub fn update(&mut self, index: usize, field: RangeField) -> Result<(), RangeError> {
        let len = self.ranges.len();
        let range = self
            .ranges
            .get_mut(index)
            .ok_or(RangeError::IndexOutOfBounds { index, len })?;

        match field {
            RangeField::Min(min) => range.min = min,
            RangeField::Max(max) => range.max = max,
            RangeField::Label(label) => range.label = label,
            RangeField::Color(color) => range.color = color,
        }
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<GradeRange, RangeError> {
        if index >= self.ranges.len() {
            return Err(RangeError::IndexOutOfBounds {
                index,
                len: self.ranges.len(),
            });
        }
        Ok(self.ranges.remove(index))
    }

    pub fn as_slice(&self) -> &[GradeRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn diagnose(&self) -> Vec<RangeIssue> {
        let mut issues = Vec::new();

        for (index, range) in self.ranges.iter().enumerate() {
            if range.min > range.max {
                issues.push(RangeIssue::Inverted {
                    index,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        for (first, a) in self.ranges.iter().enumerate() {
            if a.min > a.max {
                continue;
            }
            for (offset, b) in self.ranges[first + 1..].iter().enumerate() {
                if b.min <= b.max && a.min <= b.max && b.min <= a.max {
                    issues.push(RangeIssue::Overlap {
                        first,
                        second: first + 1 + offset,
                    });
                }
            }
        }

        let mut gap_start: Option<i32> = None;
        for grade in COVERAGE_FLOOR..=COVERAGE_CEILING {
            let covered = first_match(&self.ranges, f64::from(grade)).is_some();
            match (covered, gap_start) {
                (false, None) => gap_start = Some(grade),
                (true, Some(from)) => {
                    issues.push(RangeIssue::Gap {
                        from,
                        to: grade - 1,
                    });
                    gap_start = None;
                }
                _ => {}
            }
        }
        if let Some(from) = gap_start {
            issues.push(RangeIssue::Gap {
                from,
                to: COVERAGE_CEILING,
            });
        }

        issues
    }
}

/// Index of the first band containing `grade`. Shared by categorization and
/// distribution counting so both resolve overlaps the same way.
pub fn first_match(ranges: &[GradeRange], grade: f64) -> Option<usize> {
    ranges.iter().position(|range| range.contains(grade))
}
