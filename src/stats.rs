use crate::models::{
    BandCount, GradeRange, GradeStats, Student, AT_RISK_THRESHOLD, TOP_PERFORMER_THRESHOLD,
};
use crate::ranges::first_match;

pub fn compute_stats(students: &[Student], ranges: &[GradeRange]) -> GradeStats {
    let (distribution, unmatched) = distribution(students, ranges);

    GradeStats {
        total_students: students.len(),
        average_grade: average_grade(students),
        top_performers: students
            .iter()
            .filter(|s| s.grade >= TOP_PERFORMER_THRESHOLD)
            .count(),
        at_risk: students
            .iter()
            .filter(|s| s.grade < AT_RISK_THRESHOLD)
            .count(),
        distribution,
        unmatched,
    }
}

/// Mean grade, or `None` when there is nobody to average.
pub fn average_grade(students: &[Student]) -> Option<f64> {
    if students.is_empty() {
        return None;
    }
    let total: f64 = students.iter().map(|s| s.grade).sum();
    Some(total / students.len() as f64)
}

/// Per-band counts in band order plus the number of students matching no
/// band. Each student counts toward its first matching band only.
pub fn distribution(students: &[Student], ranges: &[GradeRange]) -> (Vec<BandCount>, usize) {
    let mut counts = vec![0usize; ranges.len()];
    let mut unmatched = 0usize;

    for student in students {
        match first_match(ranges, student.grade) {
            Some(index) => counts[index] += 1,
            None => unmatched += 1,
        }
    }

    let bands = ranges
        .iter()
        .zip(counts)
        .map(|(range, count)| BandCount {
            label: range.label.clone(),
            color: range.color.clone(),
            min: range.min,
            max: range.max,
            count,
        })
        .collect();

    (bands, unmatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::categorize;
    use crate::models::NO_MATCH_CATEGORY;
    use crate::ranges::RangeSet;

    fn roster(grades: &[f64]) -> Vec<Student> {
        grades
            .iter()
            .map(|grade| Student::new("Avery Lee", *grade))
            .collect()
    }

    #[test]
    fn empty_roster_has_undefined_average() {
        let stats = compute_stats(&[], RangeSet::standard().as_slice());
        assert_eq!(stats.total_students, 0);
        assert!(stats.average_grade.is_none());
        assert_eq!(stats.top_performers, 0);
        assert_eq!(stats.at_risk, 0);
        assert!(stats.distribution.iter().all(|b| b.count == 0));
        assert_eq!(stats.unmatched, 0);
    }

    #[test]
    fn fixed_thresholds_ignore_bands() {
        let stats = compute_stats(&roster(&[85.0, 35.0, 55.0]), &[]);
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.top_performers, 1);
        assert_eq!(stats.at_risk, 1);
        let average = stats.average_grade.unwrap();
        assert!((average - 58.333).abs() < 0.01);
        assert_eq!(stats.unmatched, 3);
    }

    #[test]
    fn threshold_edges() {
        let stats = compute_stats(&roster(&[80.0, 40.0, 39.99, 79.99]), &[]);
        assert_eq!(stats.top_performers, 1);
        assert_eq!(stats.at_risk, 1);
    }

    #[test]
    fn partition_distribution_sums_to_total() {
        let grades: Vec<f64> = (0..=100i32).step_by(3).map(f64::from).collect();
        let students = roster(&grades);
        let stats = compute_stats(&students, RangeSet::standard().as_slice());
        let summed: usize = stats.distribution.iter().map(|b| b.count).sum();
        assert_eq!(summed, stats.total_students);
        assert_eq!(stats.unmatched, 0);
    }

    #[test]
    fn overlaps_are_not_double_counted() {
        let ranges = vec![
            GradeRange::new(0.0, 60.0, "C", "#111111"),
            GradeRange::new(40.0, 100.0, "B", "#222222"),
        ];
        let (bands, unmatched) = distribution(&roster(&[50.0, 55.0, 90.0]), &ranges);
        assert_eq!(bands[0].count, 2);
        assert_eq!(bands[1].count, 1);
        assert_eq!(unmatched, 0);
    }

    #[test]
    fn distribution_agrees_with_categories() {
        let ranges = vec![
            GradeRange::new(10.0, 70.0, "Mid", "#111111"),
            GradeRange::new(0.0, 50.0, "Low", "#222222"),
            GradeRange::new(60.0, 90.0, "High", "#333333"),
            GradeRange::new(60.0, 90.0, "Mid", "#444444"),
        ];
        let grades: Vec<f64> = (0..=100i32).map(|g| f64::from(g) + 0.5).collect();
        let categorized = categorize(&roster(&grades), &ranges);
        let (bands, unmatched) = distribution(&categorized, &ranges);

        let labelled = |label: &str| {
            categorized
                .iter()
                .filter(|s| s.grade_category.as_deref() == Some(label))
                .count()
        };
        assert_eq!(bands[0].count + bands[3].count, labelled("Mid"));
        assert_eq!(bands[1].count, labelled("Low"));
        assert_eq!(bands[2].count, labelled("High"));

        let sentinel = categorized
            .iter()
            .filter(|s| s.grade_category.as_deref() == Some(NO_MATCH_CATEGORY))
            .count();
        assert_eq!(unmatched, sentinel);
        assert_eq!(bands[3].count, 0);
    }
}
