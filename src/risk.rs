use std::str::FromStr;

use crate::error::MonitorError;
use crate::models::{AnnotatedRecord, Assessment, Condition, HealthRecord, RiskLevel, TierSummary};

pub const HEART_RATE_LIMIT: f64 = 90.0;
pub const STRESS_LIMIT: f64 = 7.0;
pub const SLEEP_FLOOR: f64 = 5.0;

/// Reason reported when no condition triggers.
pub const NO_RISK_REASON: &str = "-";

pub fn triggered_conditions(heart_rate: f64, stress: f64, sleep_hours: f64) -> Vec<Condition> {
    let mut conditions = Vec::with_capacity(3);

    if heart_rate > HEART_RATE_LIMIT {
        conditions.push(Condition::HighHeartRate);
    }
    if stress > STRESS_LIMIT {
        conditions.push(Condition::HighStress);
    }
    if sleep_hours < SLEEP_FLOOR {
        conditions.push(Condition::PoorSleep);
    }

    conditions
}

pub fn tier_for_score(score: usize) -> RiskLevel {
    match score {
        0 => RiskLevel::Low,
        1 => RiskLevel::Moderate,
        _ => RiskLevel::High,
    }
}

pub fn classify(heart_rate: f64, stress: f64, sleep_hours: f64) -> (RiskLevel, String) {
    let conditions = triggered_conditions(heart_rate, stress, sleep_hours);
    let level = tier_for_score(conditions.len());

    let reason = if conditions.is_empty() {
        NO_RISK_REASON.to_string()
    } else {
        conditions
            .iter()
            .map(|condition| condition.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    (level, reason)
}

pub fn intervention(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "✅ Keep up the good work!",
        RiskLevel::Moderate => "🧘 Try meditation or short breaks.",
        RiskLevel::High => "🚨 Consult wellness coach, prioritize rest, reduce stress.",
    }
}

/// Looks up the intervention for a tier given as text.
pub fn intervention_for(level: &str) -> Result<&'static str, MonitorError> {
    RiskLevel::from_str(level).map(intervention)
}

pub fn assess(record: &HealthRecord) -> Assessment {
    let (risk_level, risk_reason) = classify(record.heart_rate, record.stress, record.sleep_hours);
    Assessment {
        risk_level,
        risk_reason,
        intervention: intervention(risk_level),
    }
}

pub fn annotate(records: Vec<HealthRecord>) -> Vec<AnnotatedRecord> {
    records
        .into_iter()
        .map(|record| {
            let assessment = assess(&record);
            log::debug!(
                "{}: {} ({})",
                record.id,
                assessment.risk_level,
                assessment.risk_reason
            );
            AnnotatedRecord { record, assessment }
        })
        .collect()
}

/// Counts per tier, always listing Low, Moderate and High in that order.
pub fn summarize_by_tier(rows: &[AnnotatedRecord]) -> Vec<TierSummary> {
    let total = rows.len();

    RiskLevel::ALL
        .iter()
        .map(|&risk_level| {
            let count = rows
                .iter()
                .filter(|row| row.assessment.risk_level == risk_level)
                .count();
            TierSummary {
                risk_level,
                count,
                share: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                },
            }
        })
        .collect()
}
