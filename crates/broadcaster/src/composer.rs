//! Emergency alert message composition.

use chrono::{DateTime, Utc};
use raksha_core::{Location, UserProfile};
use vitals::HealthReport;

const PREAMBLE: &str = "🚨 EMERGENCY ALERT from RakshaOne 🚨";
const PLEA: &str = "I need immediate help!";

/// Timestamp format used in outgoing messages, e.g. `Oct 19, 2026 14:05:09 UTC`.
pub const TIME_FORMAT: &str = "%b %d, %Y %H:%M:%S UTC";

/// Build a maps link for a coordinate pair.
pub fn map_link(location: &Location) -> String {
    format!(
        "https://www.google.com/maps?q={},{}",
        location.latitude, location.longitude
    )
}

/// Optional medical details appended to an alert.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicalContext {
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub blood_type: String,
    /// One-line health summary, if vitals were available.
    pub health: Option<String>,
}

impl MedicalContext {
    pub fn new(profile: &UserProfile, report: Option<&HealthReport>) -> Self {
        Self {
            name: profile.name.clone(),
            age: profile.age,
            gender: profile.gender.to_string(),
            blood_type: profile.blood_type.to_string(),
            health: report.map(HealthReport::summary),
        }
    }

    fn render(&self, out: &mut Vec<String>) {
        out.push("🩺 Medical info:".to_string());
        out.push(format!("Name: {} ({}, {})", self.name, self.age, self.gender));
        out.push(format!("Blood type: {}", self.blood_type));
        if let Some(ref health) = self.health {
            out.push(health.clone());
        }
    }
}

/// Compose the alert body for a location snapshot and a point in time.
///
/// Never fails. Non-finite coordinates are rendered as-is.
pub fn compose_alert(location: Option<&Location>, now: DateTime<Utc>) -> String {
    AlertComposer::new().compose(location, now)
}

/// Builds outgoing alert bodies.
#[derive(Debug, Clone, Default)]
pub struct AlertComposer {
    medical: Option<MedicalContext>,
}

impl AlertComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Medical details appended to every composed alert, or none.
    pub fn set_medical_context(&mut self, medical: Option<MedicalContext>) {
        self.medical = medical;
    }

    pub fn compose(&self, location: Option<&Location>, now: DateTime<Utc>) -> String {
        let mut lines = vec![PREAMBLE.to_string(), String::new(), PLEA.to_string(), String::new()];

        match location {
            Some(location) => {
                lines.push("📍 My Location:".to_string());
                lines.push(format!("Latitude: {}", location.latitude));
                lines.push(format!("Longitude: {}", location.longitude));
                lines.push(format!("Maps: {}", map_link(location)));
            }
            None => lines.push("📍 Location unavailable: unable to retrieve a fix".to_string()),
        }

        lines.push(String::new());
        lines.push(format!("Time: {}", now.format(TIME_FORMAT)));

        if let Some(ref medical) = self.medical {
            lines.push(String::new());
            medical.render(&mut lines);
        }

        lines.join("\n")
    }
}
