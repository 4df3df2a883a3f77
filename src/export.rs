use std::io::{Read, Write};

use crate::error::Result;
use crate::models::{AnnotatedRecord, ReportRow};

pub const REPORT_FILE_NAME: &str = "risk_report.csv";
pub const REPORT_CONTENT_TYPE: &str = "text/csv";

/// Columns appended by the assessment; an input column with one of these names is replaced.
pub const DERIVED_COLUMNS: [&str; 3] = ["risk_level", "risk_reason", "intervention"];

/// A rendered file offered for download.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn risk_report(rows: &[AnnotatedRecord]) -> Result<Artifact> {
    let mut bytes = Vec::new();
    write_report(&mut bytes, rows)?;
    Ok(Artifact {
        file_name: REPORT_FILE_NAME,
        content_type: REPORT_CONTENT_TYPE,
        bytes,
    })
}

/// Serializes annotated rows: required columns, pass-through columns, then the assessment.
///
/// Pass-through headers are taken from the first row.
pub fn write_report<W: Write>(out: W, rows: &[AnnotatedRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["id", "heart_rate", "stress", "sleep_hours"];
    if let Some(first) = rows.first() {
        header.extend(first.record.extra.iter().map(|(name, _)| name.as_str()));
    }
    header.extend(DERIVED_COLUMNS);
    writer.write_record(&header)?;

    for row in rows {
        let record = &row.record;
        let mut fields = vec![
            record.id.clone(),
            record.heart_rate.to_string(),
            record.stress.to_string(),
            record.sleep_hours.to_string(),
        ];
        fields.extend(record.extra.iter().map(|(_, value)| value.clone()));
        fields.push(row.assessment.risk_level.to_string());
        fields.push(row.assessment.risk_reason.clone());
        fields.push(row.assessment.intervention.to_string());
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn read_report<R: Read>(source: R) -> Result<Vec<ReportRow>> {
    let mut reader = csv::Reader::from_reader(source);
    let mut rows = Vec::new();

    for result in reader.deserialize::<ReportRow>() {
        rows.push(result?);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest;
    use crate::models::RiskLevel;
    use crate::risk;

    const INPUT: &str = "id,heart_rate,stress,sleep_hours,site\n\
                         E1,95,8,4,North\n\
                         E2,90,7,5,South\n\
                         E3,91.25,3,8,\"East, Annex\"\n";

    #[test]
    fn artifact_has_fixed_name_and_type() {
        let rows = risk::annotate(ingest::load_records(INPUT.as_bytes()).unwrap());
        let artifact = risk_report(&rows).unwrap();
        assert_eq!(artifact.file_name, "risk_report.csv");
        assert_eq!(artifact.content_type, "text/csv");

        let text = String::from_utf8(artifact.bytes).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "id,heart_rate,stress,sleep_hours,site,risk_level,risk_reason,intervention"
        );
    }

    #[test]
    fn exported_report_reads_back_identically() {
        let rows = risk::annotate(ingest::load_records(INPUT.as_bytes()).unwrap());
        let artifact = risk_report(&rows).unwrap();
        let parsed = read_report(artifact.bytes.as_slice()).unwrap();

        assert_eq!(parsed.len(), rows.len());
        for (read_back, original) in parsed.iter().zip(&rows) {
            assert_eq!(read_back.id, original.record.id);
            assert_eq!(read_back.heart_rate, original.record.heart_rate);
            assert_eq!(read_back.stress, original.record.stress);
            assert_eq!(read_back.sleep_hours, original.record.sleep_hours);
            assert_eq!(read_back.risk_level, original.assessment.risk_level);
            assert_eq!(read_back.risk_reason, original.assessment.risk_reason);
            assert_eq!(read_back.intervention, original.assessment.intervention);
        }
        assert_eq!(parsed[0].risk_reason, "High HR, High Stress, Poor Sleep");
        assert_eq!(parsed[1].risk_level, RiskLevel::Low);
    }

    #[test]
    fn pass_through_columns_survive_export() {
        let rows = risk::annotate(ingest::load_records(INPUT.as_bytes()).unwrap());
        let artifact = risk_report(&rows).unwrap();
        let reloaded = ingest::load_records(artifact.bytes.as_slice()).unwrap();

        let site = |idx: usize| {
            reloaded[idx]
                .extra
                .iter()
                .find(|(name, _)| name == "site")
                .map(|(_, value)| value.clone())
        };
        assert_eq!(site(0).as_deref(), Some("North"));
        assert_eq!(site(2).as_deref(), Some("East, Annex"));
    }

    #[test]
    fn reanalyzing_an_export_replaces_derived_columns() {
        let first = risk::annotate(ingest::load_records(INPUT.as_bytes()).unwrap());
        let exported = risk_report(&first).unwrap();

        let second = risk::annotate(ingest::load_records(exported.bytes.as_slice()).unwrap());
        let reexported = risk_report(&second).unwrap();
        let text = String::from_utf8(reexported.bytes.clone()).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "id,heart_rate,stress,sleep_hours,site,risk_level,risk_reason,intervention"
        );

        let parsed = read_report(reexported.bytes.as_slice()).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].risk_level, RiskLevel::High);
        assert_eq!(parsed[2].risk_reason, "High HR");
    }

    #[test]
    fn empty_table_exports_header_only() {
        let artifact = risk_report(&[]).unwrap();
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert_eq!(
            text,
            "id,heart_rate,stress,sleep_hours,risk_level,risk_reason,intervention\n"
        );
    }
}
