use crate::models::{GradeRange, Student, NO_MATCH_CATEGORY};
use crate::ranges::first_match;

/// Label of the first band containing `grade`, or `"N/A"`.
pub fn category_for(grade: f64, ranges: &[GradeRange]) -> String {
    match first_match(ranges, grade) {
        Some(index) => ranges[index].label.clone(),
        None => NO_MATCH_CATEGORY.to_string(),
    }
}

/// Returns a fresh roster with every `grade_category` recomputed from scratch.
pub fn categorize(students: &[Student], ranges: &[GradeRange]) -> Vec<Student> {
    students
        .iter()
        .map(|student| Student {
            grade_category: Some(category_for(student.grade, ranges)),
            ..student.clone()
        })
        .collect()
}
