use std::fmt::Write;

use chrono::NaiveDate;

use crate::locale::Locale;
use crate::models::{Student, AT_RISK_THRESHOLD};
use crate::roster::{self, RosterQuery, SortOrder};
use crate::session::Dashboard;

const TOP_STUDENT_LIMIT: usize = 5;

/// Renders an average for display; an empty roster has no average.
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{value:.1}%"),
        None => "n/a".to_string(),
    }
}

pub fn at_risk_students(students: &[Student]) -> Vec<&Student> {
    roster::view(students, &RosterQuery::new("", SortOrder::Asc))
        .into_iter()
        .filter(|s| s.grade < AT_RISK_THRESHOLD)
        .collect()
}

pub fn build_report(
    source: &str,
    generated_on: NaiveDate,
    dashboard: &Dashboard<'_>,
    locale: Locale,
) -> String {
    let labels = locale.display_labels();
    let stats = &dashboard.stats;
    let mut output = String::new();

    let _ = writeln!(output, "# {}", labels.report_title);
    let _ = writeln!(
        output,
        "{} {} {} {}",
        labels.generated_for, source, labels.generated_on, generated_on
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", labels.overview);
    let _ = writeln!(output, "- {}: {}", labels.total_students, stats.total_students);
    let _ = writeln!(
        output,
        "- {}: {}",
        labels.average_grade,
        format_average(stats.average_grade)
    );
    let _ = writeln!(output, "- {} (80+): {}", labels.top_performers, stats.top_performers);
    let _ = writeln!(output, "- {} (<40): {}", labels.at_risk, stats.at_risk);

    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", labels.distribution);

    if stats.distribution.is_empty() {
        let _ = writeln!(output, "{}", labels.no_bands);
    } else {
        for band in stats.distribution.iter() {
            let _ = writeln!(
                output,
                "- {} ({}-{}): {} {}",
                band.label, band.min, band.max, band.count, labels.students
            );
        }
    }
    if stats.unmatched > 0 {
        let _ = writeln!(
            output,
            "- {}: {} {}",
            labels.outside_bands, stats.unmatched, labels.students
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", labels.top_students);

    let ranked = roster::view(dashboard.students, &RosterQuery::default());
    if ranked.is_empty() {
        let _ = writeln!(output, "{}", labels.no_students);
    } else {
        for student in ranked.iter().take(TOP_STUDENT_LIMIT) {
            let _ = writeln!(
                output,
                "- {} {} {} ({})",
                student.name,
                labels.scored,
                student.grade,
                student
                    .grade_category
                    .as_deref()
                    .unwrap_or(labels.uncategorized)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", labels.at_risk);

    let flagged = at_risk_students(dashboard.students);
    if flagged.is_empty() {
        let _ = writeln!(output, "{}", labels.none_at_risk);
    } else {
        for student in flagged {
            let _ = writeln!(
                output,
                "- {} {} {}",
                student.name, labels.scored, student.grade
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorize::categorize;
    use crate::models::GradeRange;
    use crate::ranges::RangeSet;
    use crate::stats::compute_stats;

    fn dashboard_for<'a>(students: &'a [Student], ranges: &'a RangeSet) -> Dashboard<'a> {
        Dashboard {
            students,
            ranges: ranges.as_slice(),
            stats: compute_stats(students, ranges.as_slice()),
        }
    }

    #[test]
    fn average_formatting_guards_empty_roster() {
        assert_eq!(format_average(None), "n/a");
        assert_eq!(format_average(Some(58.3333)), "58.3%");
    }

    #[test]
    fn at_risk_lists_lowest_first() {
        let students = vec![
            Student::new("Avery", 38.0),
            Student::new("Jules", 90.0),
            Student::new("Kiara", 12.0),
        ];
        let names: Vec<&str> = at_risk_students(&students)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Kiara", "Avery"]);
    }

    #[test]
    fn report_includes_all_sections() {
        let ranges = RangeSet::standard();
        let students = categorize(
            &[
                Student::new("Avery Lee", 85.0),
                Student::new("Jules Moreno", 35.0),
                Student::new("Kiara Patel", 55.0),
            ],
            ranges.as_slice(),
        );
        let dashboard = dashboard_for(&students, &ranges);
        let generated = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let report = build_report("grades.csv", generated, &dashboard, Locale::En);

        assert!(report.contains("Generated for grades.csv on 2026-02-02"));
        assert!(report.contains("- Average Grade: 58.3%"));
        assert!(report.contains("- A (80-100): 1 students"));
        assert!(report.contains("- Avery Lee scored 85 (A)"));
        assert!(report.contains("- Jules Moreno scored 35"));
        assert!(!report.contains("Outside every band"));
    }

    #[test]
    fn report_follows_locale() {
        let ranges = RangeSet::new(vec![GradeRange::new(0.0, 39.0, "F", "#ef4444")]);
        let students = categorize(
            &[Student::new("Avery Lee", 85.0), Student::new("Kiara Patel", 12.0)],
            ranges.as_slice(),
        );
        let dashboard = dashboard_for(&students, &ranges);
        let generated = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let report = build_report("grades.xlsx", generated, &dashboard, Locale::Sw);

        assert!(report.starts_with("# Ripoti ya Madaraja\n"));
        assert!(report.contains("Imetolewa kwa grades.xlsx tarehe 2026-02-02"));
        assert!(report.contains("- Wastani wa Alama: 48.5%"));
        assert!(report.contains("## Walio Hatarini"));
        assert!(report.contains("- Nje ya madaraja yote: 1 wanafunzi"));
        assert!(report.contains("- Kiara Patel alipata 12"));
        assert!(!report.contains("Average Grade"));
    }
}
