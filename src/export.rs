//! Export sinks. Each one takes the already-sorted three-column rows and
//! writes a complete document in one call.

use std::io::Write;

use thiserror::Error;

use crate::locale::Locale;
use crate::models::ExportRow;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write spreadsheet: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Markdown,
}

pub trait ExportSink {
    fn write_rows(&mut self, rows: &[ExportRow]) -> Result<(), ExportError>;
}

/// Spreadsheet export: header row, then one record per student.
pub struct CsvSink<W: Write> {
    writer: W,
    locale: Locale,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W, locale: Locale) -> Self {
        Self { writer, locale }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ExportSink for CsvSink<W> {
    fn write_rows(&mut self, rows: &[ExportRow]) -> Result<(), ExportError> {
        let labels = self.locale.export_labels();
        let mut csv = csv::Writer::from_writer(&mut self.writer);
        csv.write_record([labels.name, labels.grade, labels.category])?;

        for row in rows {
            let grade = row.grade.to_string();
            csv.write_record([
                row.name.as_str(),
                grade.as_str(),
                row.grade_category.as_str(),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}

/// Document export: a title followed by a three-column Markdown table.
pub struct MarkdownSink<W: Write> {
    writer: W,
    locale: Locale,
}

impl<W: Write> MarkdownSink<W> {
    pub fn new(writer: W, locale: Locale) -> Self {
        Self { writer, locale }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ExportSink for MarkdownSink<W> {
    fn write_rows(&mut self, rows: &[ExportRow]) -> Result<(), ExportError> {
        let labels = self.locale.export_labels();
        let out = &mut self.writer;

        writeln!(out, "# {}", labels.title)?;
        writeln!(out)?;
        writeln!(
            out,
            "| {} | {} | {} |",
            labels.name, labels.grade, labels.category
        )?;
        writeln!(out, "| --- | ---: | --- |")?;

        for row in rows {
            writeln!(
                out,
                "| {} | {} | {} |",
                escape_cell(&row.name),
                row.grade,
                escape_cell(&row.grade_category)
            )?;
        }

        out.flush()?;
        Ok(())
    }
}

/// Keeps each student on one table row.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ExportRow> {
        vec![
            ExportRow {
                name: "Jules Moreno".into(),
                grade: 91.0,
                grade_category: "A".into(),
            },
            ExportRow {
                name: "Kiara | Patel".into(),
                grade: 34.5,
                grade_category: String::new(),
            },
        ]
    }

    #[test]
    fn csv_sink_writes_header_and_rows() {
        let mut sink = CsvSink::new(Vec::new(), Locale::En);
        sink.write_rows(&rows()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            text,
            "Student Name,Grade,Grade Category\nJules Moreno,91,A\nKiara | Patel,34.5,\n"
        );
    }

    #[test]
    fn markdown_sink_uses_localized_headers() {
        let mut sink = MarkdownSink::new(Vec::new(), Locale::Sw);
        sink.write_rows(&rows()).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# Ripoti ya Mgawanyo wa Madaraja");
        assert_eq!(lines[2], "| Jina la Mwanafunzi | Alama | Daraja |");
        assert_eq!(lines[4], "| Jules Moreno | 91 | A |");
        assert_eq!(lines[5], "| Kiara \\| Patel | 34.5 |  |");
    }

    #[test]
    fn markdown_rows_stay_on_one_line() {
        let rows = vec![ExportRow {
            name: "Avery\r\nLee".into(),
            grade: 72.0,
            grade_category: "B\n".into(),
        }];
        let mut sink = MarkdownSink::new(Vec::new(), Locale::En);
        sink.write_rows(&rows).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[4], "| Avery  Lee | 72 | B  |");
    }
}
