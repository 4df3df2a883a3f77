use std::io::Read;

use crate::error::Result;
use crate::export::{self, Artifact};
use crate::models::AnnotatedRecord;
use crate::{ingest, plot, report, risk};

/// Everything produced from one uploaded table.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub rows: Vec<AnnotatedRecord>,
    pub table: String,
    pub plot_svg: String,
    pub export: Artifact,
}

/// Loads, classifies and renders one table. Nothing is rendered if loading fails.
pub fn run<R: Read>(source: R) -> Result<Analysis> {
    let records = ingest::load_records(source)?;
    let rows = risk::annotate(records);

    Ok(Analysis {
        table: report::render_table(&rows),
        plot_svg: plot::scatter_svg(&rows),
        export: export::risk_report(&rows)?,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;
    use crate::models::RiskLevel;

    #[test]
    fn produces_table_plot_and_export() {
        let data = "id,heart_rate,stress,sleep_hours\nE1,95,8,4\nE2,90,7,5\nE3,91,3,8\n";
        let analysis = run(data.as_bytes()).unwrap();

        let levels: Vec<RiskLevel> = analysis
            .rows
            .iter()
            .map(|row| row.assessment.risk_level)
            .collect();
        assert_eq!(levels, vec![RiskLevel::High, RiskLevel::Low, RiskLevel::Moderate]);
        assert!(analysis.table.contains("High HR, High Stress, Poor Sleep"));
        assert_eq!(analysis.plot_svg.matches("<circle").count(), 3);
        assert_eq!(analysis.export.file_name, "risk_report.csv");
    }

    #[test]
    fn large_close_readings_still_render() {
        let data = "id,heart_rate,stress,sleep_hours\nA,1e17,3,8\nB,100000000000000016,3,8\n";
        let analysis = run(data.as_bytes()).unwrap();
        assert_eq!(analysis.rows.len(), 2);
        assert!(analysis.rows.iter().all(|row| row.assessment.risk_level == RiskLevel::Moderate));
        assert_eq!(analysis.plot_svg.matches("<circle").count(), 2);
    }

    #[test]
    fn missing_column_stops_before_rendering() {
        let data = "id,heart_rate,stress\nE1,95,8\n";
        assert!(matches!(run(data.as_bytes()), Err(MonitorError::MissingColumns(_))));
    }
}
