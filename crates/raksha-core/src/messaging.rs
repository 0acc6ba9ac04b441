//! Reusable message templates and the record of composed messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::ValidationError;

/// A user-defined reusable message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: Uuid,
    pub name: String,
    /// Single glyph shown next to the template (e.g., "🆘").
    pub icon: String,
    pub body: String,
    /// Append the current location when drafting from this template.
    pub include_location: bool,
}

impl MessageTemplate {
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        body: impl Into<String>,
        include_location: bool,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let body = body.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Empty("template name".to_string()));
        }
        if body.trim().is_empty() {
            return Err(ValidationError::Empty("template message".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            icon: icon.into(),
            body,
            include_location,
        })
    }
}

/// What kind of message a compose attempt sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Sos,
    Safe,
    Location,
    Template,
    Custom,
}

impl MessageKind {
    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::Sos => "SOS",
            MessageKind::Safe => "Safe",
            MessageKind::Location => "Location",
            MessageKind::Template => "Template",
            MessageKind::Custom => "Custom",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            MessageKind::Sos => "🆘",
            MessageKind::Safe => "✅",
            MessageKind::Location => "📍",
            MessageKind::Template => "💬",
            MessageKind::Custom => "✉️",
        }
    }
}

/// A record of one compose attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHistoryEntry {
    pub id: Uuid,
    pub kind: MessageKind,
    pub preview: String,
    pub recipient_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl MessageHistoryEntry {
    pub fn new(kind: MessageKind, preview: impl Into<String>, recipient_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            preview: preview.into(),
            recipient_count,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_requires_name_and_body() {
        assert!(MessageTemplate::new("", "💬", "hi", false).is_err());
        assert!(MessageTemplate::new("Home", "🏠", "  ", false).is_err());
        let t = MessageTemplate::new("Home", "🏠", "Reached home", false).unwrap();
        assert_eq!(t.name, "Home");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&MessageKind::Sos).unwrap();
        assert_eq!(json, "\"sos\"");
    }
}
