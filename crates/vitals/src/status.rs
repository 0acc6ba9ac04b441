//! Categorical statuses derived from scores and single metrics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall status band for a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Good,
    Average,
    BelowAverage,
    NeedsAttention,
}

impl HealthStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => HealthStatus::Good,
            s if s >= 60 => HealthStatus::Average,
            s if s >= 40 => HealthStatus::BelowAverage,
            _ => HealthStatus::NeedsAttention,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Good => "Good",
            HealthStatus::Average => "Average",
            HealthStatus::BelowAverage => "Below Average",
            HealthStatus::NeedsAttention => "Needs Attention",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Low/Normal/High classification of a single metric.
///
/// These thresholds are independent of the score weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricStatus {
    Low,
    Normal,
    High,
}

impl MetricStatus {
    pub fn heart_rate(bpm: f64) -> Self {
        if bpm < 60.0 {
            MetricStatus::Low
        } else if bpm > 100.0 {
            MetricStatus::High
        } else {
            MetricStatus::Normal
        }
    }

    /// High wins over Low when both thresholds are crossed.
    pub fn blood_pressure(systolic: f64, diastolic: f64) -> Self {
        if systolic > 140.0 || diastolic > 90.0 {
            MetricStatus::High
        } else if systolic < 90.0 || diastolic < 60.0 {
            MetricStatus::Low
        } else {
            MetricStatus::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricStatus::Low => "Low",
            MetricStatus::Normal => "Normal",
            MetricStatus::High => "High",
        }
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(HealthStatus::from_score(100), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(80), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(79), HealthStatus::Average);
        assert_eq!(HealthStatus::from_score(60), HealthStatus::Average);
        assert_eq!(HealthStatus::from_score(50), HealthStatus::Average);
        assert_eq!(HealthStatus::from_score(59), HealthStatus::BelowAverage);
        assert_eq!(HealthStatus::from_score(40), HealthStatus::BelowAverage);
        assert_eq!(HealthStatus::from_score(39), HealthStatus::NeedsAttention);
        assert_eq!(HealthStatus::from_score(0), HealthStatus::NeedsAttention);
    }

    #[test]
    fn test_labels() {
        assert_eq!(HealthStatus::BelowAverage.to_string(), "Below Average");
        assert_eq!(HealthStatus::NeedsAttention.to_string(), "Needs Attention");
    }

    #[test]
    fn test_heart_rate_status() {
        assert_eq!(MetricStatus::heart_rate(59.0), MetricStatus::Low);
        assert_eq!(MetricStatus::heart_rate(60.0), MetricStatus::Normal);
        assert_eq!(MetricStatus::heart_rate(100.0), MetricStatus::Normal);
        assert_eq!(MetricStatus::heart_rate(101.0), MetricStatus::High);
    }

    #[test]
    fn test_blood_pressure_status() {
        assert_eq!(MetricStatus::blood_pressure(120.0, 80.0), MetricStatus::Normal);
        assert_eq!(MetricStatus::blood_pressure(141.0, 80.0), MetricStatus::High);
        assert_eq!(MetricStatus::blood_pressure(120.0, 91.0), MetricStatus::High);
        assert_eq!(MetricStatus::blood_pressure(89.0, 70.0), MetricStatus::Low);
        assert_eq!(MetricStatus::blood_pressure(100.0, 59.0), MetricStatus::Low);
        assert_eq!(MetricStatus::blood_pressure(150.0, 50.0), MetricStatus::High);
    }
}
