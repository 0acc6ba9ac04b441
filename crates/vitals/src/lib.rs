//! Vital-signs scoring for Raksha.
//!
//! Turns a [`VitalReadings`] snapshot into a 0-100 health score with a
//! four-level [`HealthStatus`], plus independent per-metric classifiers used
//! for display.
//!
//! # Example
//!
//! ```rust
//! use vitals::{HealthStatus, VitalReadings};
//!
//! let readings = VitalReadings {
//!     heart_rate: 72.0,
//!     body_temperature: 36.6,
//!     respiratory_rate: 16.0,
//!     systolic: 120.0,
//!     diastolic: 80.0,
//!     step_count: 9000,
//! };
//!
//! assert_eq!(vitals::health_score(&readings), 100);
//! assert_eq!(HealthStatus::from_score(100), HealthStatus::Good);
//! ```

mod report;
mod score;
mod status;

pub use report::HealthReport;
pub use score::{health_score, MAX_SCORE};
pub use status::{HealthStatus, MetricStatus};

use serde::{Deserialize, Serialize};

/// A transient snapshot of vital signs. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalReadings {
    /// Beats per minute.
    pub heart_rate: f64,
    /// Degrees Celsius.
    pub body_temperature: f64,
    /// Breaths per minute.
    pub respiratory_rate: f64,
    /// mmHg.
    pub systolic: f64,
    /// mmHg.
    pub diastolic: f64,
    pub step_count: u32,
}

impl Default for VitalReadings {
    fn default() -> Self {
        Self {
            heart_rate: 72.0,
            body_temperature: 36.6,
            respiratory_rate: 16.0,
            systolic: 120.0,
            diastolic: 80.0,
            step_count: 0,
        }
    }
}

impl VitalReadings {
    pub fn heart_rate_text(&self) -> String {
        format!("{} Bpm", self.heart_rate as i64)
    }

    pub fn body_temperature_text(&self) -> String {
        format!("{:.1}°C", self.body_temperature)
    }

    pub fn respiratory_rate_text(&self) -> String {
        format!("{} Bpm", self.respiratory_rate as i64)
    }

    pub fn blood_pressure_text(&self) -> String {
        format!("{}/{}", self.systolic as i64, self.diastolic as i64)
    }

    /// Heart rate classification: Low below 60, High above 100.
    pub fn heart_rate_status(&self) -> MetricStatus {
        MetricStatus::heart_rate(self.heart_rate)
    }

    /// Blood pressure classification against 90/60 and 140/90.
    pub fn blood_pressure_status(&self) -> MetricStatus {
        MetricStatus::blood_pressure(self.systolic, self.diastolic)
    }
}

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text() {
        let r = VitalReadings::default();
        assert_eq!(r.heart_rate_text(), "72 Bpm");
        assert_eq!(r.body_temperature_text(), "36.6°C");
        assert_eq!(r.respiratory_rate_text(), "16 Bpm");
        assert_eq!(r.blood_pressure_text(), "120/80");
    }
}
