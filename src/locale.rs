use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Sw,
}

/// Column headers and title used by export sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportLabels {
    pub title: &'static str,
    pub name: &'static str,
    pub grade: &'static str,
    pub category: &'static str,
}

/// Labels for the stats summary and the Markdown report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLabels {
    pub report_title: &'static str,
    pub generated_for: &'static str,
    pub generated_on: &'static str,
    pub overview: &'static str,
    pub total_students: &'static str,
    pub average_grade: &'static str,
    pub top_performers: &'static str,
    pub at_risk: &'static str,
    pub distribution: &'static str,
    pub outside_bands: &'static str,
    pub students: &'static str,
    pub top_students: &'static str,
    pub scored: &'static str,
    pub uncategorized: &'static str,
    pub no_bands: &'static str,
    pub no_students: &'static str,
    pub none_at_risk: &'static str,
}

impl Locale {
    pub fn display_labels(self) -> DisplayLabels {
        match self {
            Locale::En => DisplayLabels {
                report_title: "Grade Band Report",
                generated_for: "Generated for",
                generated_on: "on",
                overview: "Performance Overview",
                total_students: "Total Students",
                average_grade: "Average Grade",
                top_performers: "Top Performers",
                at_risk: "At Risk",
                distribution: "Grade Distribution",
                outside_bands: "Outside every band",
                students: "students",
                top_students: "Top Students",
                scored: "scored",
                uncategorized: "uncategorized",
                no_bands: "No grade bands saved.",
                no_students: "No students uploaded.",
                none_at_risk: "No students below 40.",
            },
            Locale::Sw => DisplayLabels {
                report_title: "Ripoti ya Madaraja",
                generated_for: "Imetolewa kwa",
                generated_on: "tarehe",
                overview: "Muhtasari wa Utendaji",
                total_students: "Jumla ya Wanafunzi",
                average_grade: "Wastani wa Alama",
                top_performers: "Wanafunzi Bora",
                at_risk: "Walio Hatarini",
                distribution: "Mgawanyo wa Madaraja",
                outside_bands: "Nje ya madaraja yote",
                students: "wanafunzi",
                top_students: "Wanafunzi wa Juu",
                scored: "alipata",
                uncategorized: "bila daraja",
                no_bands: "Hakuna madaraja yaliyohifadhiwa.",
                no_students: "Hakuna wanafunzi waliopakiwa.",
                none_at_risk: "Hakuna mwanafunzi chini ya 40.",
            },
        }
    }

    pub fn export_labels(self) -> ExportLabels {
        match self {
            Locale::En => ExportLabels {
                title: "Grade Distribution Report",
                name: "Student Name",
                grade: "Grade",
                category: "Grade Category",
            },
            Locale::Sw => ExportLabels {
                title: "Ripoti ya Mgawanyo wa Madaraja",
                name: "Jina la Mwanafunzi",
                grade: "Alama",
                category: "Daraja",
            },
        }
    }
}
