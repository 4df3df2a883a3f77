use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{AnnotatedRecord, RiskLevel};
use crate::risk;

pub const TABLE_COLUMNS: [&str; 7] = [
    "id",
    "heart_rate",
    "stress",
    "sleep_hours",
    "risk_level",
    "risk_reason",
    "intervention",
];

fn table_cells(row: &AnnotatedRecord) -> [String; 7] {
    [
        row.record.id.clone(),
        row.record.heart_rate.to_string(),
        row.record.stress.to_string(),
        row.record.sleep_hours.to_string(),
        row.assessment.risk_level.to_string(),
        row.assessment.risk_reason.clone(),
        row.assessment.intervention.to_string(),
    ]
}

/// Plain-text table with columns padded to their widest cell.
pub fn render_table(rows: &[AnnotatedRecord]) -> String {
    let cells: Vec<[String; 7]> = rows.iter().map(table_cells).collect();
    let mut widths = TABLE_COLUMNS.map(|name| name.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let header: Vec<String> = TABLE_COLUMNS
        .iter()
        .zip(widths)
        .map(|(name, width)| format!("{name:<width$}"))
        .collect();
    let _ = writeln!(output, "{}", header.join("  ").trim_end());
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let _ = writeln!(output, "{}", rule.join("  "));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(output, "{}", line.join("  ").trim_end());
    }

    output
}

fn markdown_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

pub fn build_report(
    generated_on: NaiveDate,
    source: &str,
    rows: &[AnnotatedRecord],
    plot_file: Option<&str>,
) -> String {
    let summaries = risk::summarize_by_tier(rows);

    let mut output = String::new();
    let _ = writeln!(output, "# Workplace Wellness Risk Monitor");
    let _ = writeln!(
        output,
        "Generated on {} from {} ({} records)",
        generated_on,
        source,
        rows.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Mix");

    for summary in summaries.iter() {
        let _ = writeln!(
            output,
            "- {}: {} ({:.0}%)",
            summary.risk_level,
            summary.count,
            summary.share * 100.0
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Analysis Table");

    if rows.is_empty() {
        let _ = writeln!(output, "No records in this upload.");
    } else {
        let _ = writeln!(output, "| {} |", TABLE_COLUMNS.join(" | "));
        let _ = writeln!(output, "|{}", "---|".repeat(TABLE_COLUMNS.len()));
        for row in rows {
            let cells: Vec<String> = table_cells(row)
                .iter()
                .map(|cell| markdown_cell(cell))
                .collect();
            let _ = writeln!(output, "| {} |", cells.join(" | "));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Highest Risk Employees");

    let high: Vec<&AnnotatedRecord> = rows
        .iter()
        .filter(|row| row.assessment.risk_level == RiskLevel::High)
        .collect();
    if high.is_empty() {
        let _ = writeln!(output, "No employees in the High tier.");
    } else {
        for row in high {
            let _ = writeln!(
                output,
                "- {}: {}",
                markdown_cell(&row.record.id),
                row.assessment.risk_reason
            );
        }
    }

    if let Some(plot) = plot_file {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Stress vs Heart Rate Risk Plot");
        let _ = writeln!(output, "![Employee Risk Clustering]({plot})");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HealthRecord;

    fn sample_rows() -> Vec<AnnotatedRecord> {
        let record = |id: &str, heart_rate: f64, stress: f64, sleep_hours: f64| HealthRecord {
            id: id.to_string(),
            heart_rate,
            stress,
            sleep_hours,
            extra: Vec::new(),
        };
        risk::annotate(vec![
            record("E1", 95.0, 8.0, 4.0),
            record("E2", 90.0, 7.0, 5.0),
            record("E3", 91.0, 3.0, 8.0),
            record("E|4", 70.0, 2.0, 7.5),
        ])
    }

    #[test]
    fn table_lists_every_column_and_row() {
        let table = render_table(&sample_rows());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        for column in TABLE_COLUMNS {
            assert!(lines[0].contains(column));
        }
        assert!(lines[2].starts_with("E1 "));
        assert!(lines[2].contains("High HR, High Stress, Poor Sleep"));
        assert!(lines[3].contains("Low"));
        assert!(lines[4].contains("Moderate"));
    }

    #[test]
    fn table_columns_line_up() {
        let table = render_table(&sample_rows());
        let lines: Vec<&str> = table.lines().collect();
        let risk_column = lines[0].find("risk_level").unwrap();
        assert_eq!(&lines[2][risk_column..risk_column + 4], "High");
    }

    #[test]
    fn empty_table_has_header_only() {
        let table = render_table(&[]);
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn report_includes_mix_table_and_high_risk() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let report = build_report(date, "team.csv", &sample_rows(), Some("risk_plot.svg"));

        assert!(report.starts_with("# Workplace Wellness Risk Monitor"));
        assert!(report.contains("Generated on 2026-03-02 from team.csv (4 records)"));
        assert!(report.contains("- Low: 2 (50%)"));
        assert!(report.contains("- Moderate: 1 (25%)"));
        assert!(report.contains("- High: 1 (25%)"));
        assert!(report.contains("| E\\|4 |"));
        assert!(report.contains("- E1: High HR, High Stress, Poor Sleep"));
        assert!(report.contains("![Employee Risk Clustering](risk_plot.svg)"));
    }

    #[test]
    fn report_handles_empty_upload() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let report = build_report(date, "empty.csv", &[], None);
        assert!(report.contains("- High: 0 (0%)"));
        assert!(report.contains("No records in this upload."));
        assert!(report.contains("No employees in the High tier."));
        assert!(!report.contains("risk_plot.svg"));
    }
}
