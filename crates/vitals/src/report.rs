//! Bundled health report for status displays and alert context.

use serde::{Deserialize, Serialize};

use crate::{health_score, HealthStatus, MetricStatus, VitalReadings};

/// Score, status band, and per-metric classifications for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub readings: VitalReadings,
    pub score: u8,
    pub status: HealthStatus,
    pub heart_rate: MetricStatus,
    pub blood_pressure: MetricStatus,
}

impl HealthReport {
    pub fn from_readings(readings: VitalReadings) -> Self {
        let score = health_score(&readings);
        Self {
            readings,
            score,
            status: HealthStatus::from_score(score),
            heart_rate: readings.heart_rate_status(),
            blood_pressure: readings.blood_pressure_status(),
        }
    }

    /// One-line summary, e.g. `"Health: 100/100 (Good)"`.
    pub fn summary(&self) -> String {
        format!("Health: {}/100 ({})", self.score, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_from_ideal_readings() {
        let readings = VitalReadings {
            step_count: 9000,
            ..VitalReadings::default()
        };
        let report = HealthReport::from_readings(readings);
        assert_eq!(report.score, 100);
        assert_eq!(report.status, HealthStatus::Good);
        assert_eq!(report.heart_rate, MetricStatus::Normal);
        assert_eq!(report.blood_pressure, MetricStatus::Normal);
        assert_eq!(report.summary(), "Health: 100/100 (Good)");
    }

    #[test]
    fn test_report_from_poor_readings() {
        let readings = VitalReadings {
            heart_rate: 45.0,
            body_temperature: 39.0,
            respiratory_rate: 22.0,
            systolic: 150.0,
            diastolic: 95.0,
            step_count: 500,
        };
        let report = HealthReport::from_readings(readings);
        assert_eq!(report.score, 50);
        assert_eq!(report.status, HealthStatus::Average);
        assert_eq!(report.heart_rate, MetricStatus::Low);
        assert_eq!(report.blood_pressure, MetricStatus::High);
    }

    #[test]
    fn test_report_serializes() {
        let report = HealthReport::from_readings(VitalReadings::default());
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["score"], 90);
        assert_eq!(json["status"], "Good");
    }
}
