//! Emergency contact, event, and location types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::ValidationError;

/// A latitude/longitude pair captured from the location provider.
///
/// Values are stored as-is. NaN or infinite coordinates are not rejected here;
/// callers that care about validity check before building a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A person to notify when an alert fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Opaque unique id.
    pub id: Uuid,
    /// Display name (never empty).
    pub name: String,
    /// Phone number as entered; only normalized by the channel at dial time.
    pub phone_number: String,
    /// Relationship label (e.g., "Sister").
    pub relationship: String,
}

impl EmergencyContact {
    /// Create a contact with a fresh id.
    ///
    /// Returns an error if the name is blank.
    pub fn new(
        name: impl Into<String>,
        phone_number: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty("name".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            phone_number: phone_number.into(),
            relationship: relationship.into(),
        })
    }
}

/// A record of one fired alert. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Number of contacts in the store when the alert fired. This counts
    /// dispatch attempts, not confirmed deliveries.
    pub contacts_notified: usize,
}

impl EmergencyEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        location: Option<Location>,
        contacts_notified: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            latitude: location.map(|l| l.latitude),
            longitude: location.map(|l| l.longitude),
            contacts_notified,
        }
    }

    /// The location snapshot, if both coordinates were recorded.
    pub fn location(&self) -> Option<Location> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Location::new(lat, lon)),
            _ => None,
        }
    }

    /// A maps link for viewing the event location.
    pub fn map_url(&self) -> Option<String> {
        self.location()
            .map(|l| format!("https://maps.apple.com/?q={},{}", l.latitude, l.longitude))
    }

    /// Coordinates rendered to six decimals, or a fixed placeholder.
    pub fn coordinates_text(&self) -> String {
        match self.location() {
            Some(l) => format!("{:.6}, {:.6}", l.latitude, l.longitude),
            None => "Location unavailable".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_requires_name() {
        assert!(EmergencyContact::new("  ", "+15551234567", "Friend").is_err());
        let contact = EmergencyContact::new("Asha", "+15551234567", "Sister").unwrap();
        assert_eq!(contact.name, "Asha");
        assert_eq!(contact.relationship, "Sister");
    }

    #[test]
    fn test_contact_ids_are_unique() {
        let a = EmergencyContact::new("A", "1", "x").unwrap();
        let b = EmergencyContact::new("A", "1", "x").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_event_location_snapshot() {
        let event = EmergencyEvent::new(Utc::now(), Some(Location::new(12.97, 77.59)), 2);
        assert_eq!(event.location(), Some(Location::new(12.97, 77.59)));
        assert_eq!(event.coordinates_text(), "12.970000, 77.590000");
        assert_eq!(
            event.map_url().as_deref(),
            Some("https://maps.apple.com/?q=12.97,77.59")
        );
    }

    #[test]
    fn test_event_without_location() {
        let event = EmergencyEvent::new(Utc::now(), None, 0);
        assert!(event.location().is_none());
        assert!(event.map_url().is_none());
        assert_eq!(event.coordinates_text(), "Location unavailable");
    }

    #[test]
    fn test_event_json_shape() {
        let event = EmergencyEvent::new(Utc::now(), None, 3);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["contacts_notified"], 3);
        assert!(json["latitude"].is_null());
    }
}
