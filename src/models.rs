use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

#[derive(Debug, Clone, PartialEq)]
pub struct HealthRecord {
    pub id: String,
    pub heart_rate: f64,
    pub stress: f64,
    pub sleep_hours: f64,
    /// Columns beyond the required four, kept as raw text in input order.
    pub extra: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Low" => Ok(RiskLevel::Low),
            "Moderate" => Ok(RiskLevel::Moderate),
            "High" => Ok(RiskLevel::High),
            other => Err(MonitorError::UnknownRiskLevel(other.to_string())),
        }
    }
}

/// Threshold checks, declared in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    HighHeartRate,
    HighStress,
    PoorSleep,
}

impl Condition {
    pub fn label(self) -> &'static str {
        match self {
            Condition::HighHeartRate => "High HR",
            Condition::HighStress => "High Stress",
            Condition::PoorSleep => "Poor Sleep",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub risk_level: RiskLevel,
    pub risk_reason: String,
    pub intervention: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRecord {
    pub record: HealthRecord,
    pub assessment: Assessment,
}

/// Flat view of an annotated record, as shown in the table and in `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedRow<'a> {
    pub id: &'a str,
    pub heart_rate: f64,
    pub stress: f64,
    pub sleep_hours: f64,
    pub risk_level: RiskLevel,
    pub risk_reason: &'a str,
    pub intervention: &'a str,
}

impl AnnotatedRecord {
    pub fn row(&self) -> AnnotatedRow<'_> {
        AnnotatedRow {
            id: &self.record.id,
            heart_rate: self.record.heart_rate,
            stress: self.record.stress,
            sleep_hours: self.record.sleep_hours,
            risk_level: self.assessment.risk_level,
            risk_reason: &self.assessment.risk_reason,
            intervention: self.assessment.intervention,
        }
    }
}

/// One row of an exported risk report, as read back from CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportRow {
    pub id: String,
    pub heart_rate: f64,
    pub stress: f64,
    pub sleep_hours: f64,
    pub risk_level: RiskLevel,
    pub risk_reason: String,
    pub intervention: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierSummary {
    pub risk_level: RiskLevel,
    pub count: usize,
    pub share: f64,
}
