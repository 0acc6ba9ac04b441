//! Quick messages and template drafting for the messaging screen.

use raksha_core::{Location, MessageHistoryEntry, MessageKind, MessageTemplate};

use crate::composer::map_link;

/// A message body ready to hand to the compose UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub kind: MessageKind,
    pub body: String,
}

impl Draft {
    /// Canned "SOS" message.
    pub fn sos() -> Self {
        Self {
            kind: MessageKind::Sos,
            body: "SOS! I need help.".to_string(),
        }
    }

    /// Canned "I'm safe" message.
    pub fn safe() -> Self {
        Self {
            kind: MessageKind::Safe,
            body: "I'm safe.".to_string(),
        }
    }

    /// Location share. Falls back to the bare sentence without a fix.
    pub fn location(location: Option<&Location>) -> Self {
        let mut body = "Here is my location.".to_string();
        append_location(&mut body, location);
        Self {
            kind: MessageKind::Location,
            body,
        }
    }

    /// Draft from a stored template.
    pub fn from_template(template: &MessageTemplate, location: Option<&Location>) -> Self {
        let mut body = template.body.clone();
        if template.include_location {
            append_location(&mut body, location);
        }
        Self {
            kind: MessageKind::Template,
            body,
        }
    }

    pub fn custom(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Custom,
            body: text.into(),
        }
    }

    /// History entry for a sent draft.
    pub fn history_entry(&self, recipient_count: usize) -> MessageHistoryEntry {
        MessageHistoryEntry::new(self.kind, self.body.clone(), recipient_count)
    }
}

fn append_location(body: &mut String, location: Option<&Location>) {
    if let Some(location) = location {
        body.push_str(&format!(
            "\n📍 {}, {}\n{}",
            location.latitude,
            location.longitude,
            map_link(location)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_messages() {
        assert_eq!(Draft::sos().body, "SOS! I need help.");
        assert_eq!(Draft::safe().kind, MessageKind::Safe);
        assert_eq!(Draft::location(None).body, "Here is my location.");
    }

    #[test]
    fn test_location_draft_includes_link() {
        let draft = Draft::location(Some(&Location::new(12.97, 77.59)));
        assert!(draft.body.contains("12.97, 77.59"));
        assert!(draft.body.contains("maps?q=12.97,77.59"));
    }

    #[test]
    fn test_template_location_flag() {
        let here = Location::new(1.5, 2.5);
        let with = MessageTemplate::new("Cab", "🚗", "In a cab", true).unwrap();
        let without = MessageTemplate::new("Home", "🏠", "Home now", false).unwrap();

        assert!(Draft::from_template(&with, Some(&here)).body.contains("maps?q=1.5,2.5"));
        assert_eq!(Draft::from_template(&without, Some(&here)).body, "Home now");
        assert_eq!(Draft::from_template(&with, None).body, "In a cab");
    }

    #[test]
    fn test_history_entry() {
        let entry = Draft::custom("On my way").history_entry(3);
        assert_eq!(entry.kind, MessageKind::Custom);
        assert_eq!(entry.preview, "On my way");
        assert_eq!(entry.recipient_count, 3);
    }
}
