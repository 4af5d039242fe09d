use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_CONTENT_CHARS: usize = 2000;
pub const DEFAULT_TOPIC: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: String,
    pub content: String,
    pub title: Option<String>,
    pub parent_id: Option<String>,
    pub topic: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub pos_x: f64,
    pub pos_y: f64,
}

impl Bubble {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// A bubble row as the backend hands it over: every field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BubbleRecord {
    pub id: Option<String>,
    pub content: Option<String>,
    pub title: Option<String>,
    pub parent_id: Option<String>,
    pub topic: Option<String>,
    pub owner_id: Option<String>,
    pub created_at: Option<String>, // RFC 3339
    pub pos_x: Option<f64>,
    pub pos_y: Option<f64>,
}

impl TryFrom<BubbleRecord> for Bubble {
    type Error = String;

    fn try_from(record: BubbleRecord) -> Result<Self, Self::Error> {
        let id = required(record.id, "id")?;
        let owner_id = required(record.owner_id, "owner_id")?;
        let content = required(record.content, "content")?;

        let raw_created = required(record.created_at, "created_at")?;
        let created_at = DateTime::parse_from_rfc3339(&raw_created)
            .map_err(|e| format!("INVALID_RECORD: bubble {id} has bad created_at '{raw_created}': {e}"))?
            .with_timezone(&Utc);

        let pos_x = position(record.pos_x, "pos_x", &id)?;
        let pos_y = position(record.pos_y, "pos_y", &id)?;

        let topic = record
            .topic
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

        Ok(Bubble {
            id,
            content,
            title: non_blank(record.title),
            parent_id: non_blank(record.parent_id),
            topic,
            owner_id,
            created_at,
            pos_x,
            pos_y,
        })
    }
}

impl From<&Bubble> for BubbleRecord {
    fn from(bubble: &Bubble) -> Self {
        BubbleRecord {
            id: Some(bubble.id.clone()),
            content: Some(bubble.content.clone()),
            title: bubble.title.clone(),
            parent_id: bubble.parent_id.clone(),
            topic: Some(bubble.topic.clone()),
            owner_id: Some(bubble.owner_id.clone()),
            created_at: Some(bubble.created_at.to_rfc3339()),
            pos_x: Some(bubble.pos_x),
            pos_y: Some(bubble.pos_y),
        }
    }
}

/// Input for a new post, as submitted by the compose form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBubble {
    pub content: String,
    pub title: Option<String>,
    pub parent_id: Option<String>,
    pub topic: Option<String>,
}

impl NewBubble {
    /// Trims and checks the form fields before anything is sent to the store.
    pub fn validate(self) -> Result<NewBubble, String> {
        let content = self.content.trim().to_string();
        if content.is_empty() {
            return Err("EMPTY_CONTENT: A bubble needs some text".to_string());
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(format!(
                "CONTENT_TOO_LONG: Bubbles are limited to {MAX_CONTENT_CHARS} characters"
            ));
        }

        Ok(NewBubble {
            content,
            title: non_blank(self.title),
            parent_id: non_blank(self.parent_id),
            topic: Some(
                non_blank(self.topic).unwrap_or_else(|| DEFAULT_TOPIC.to_string()),
            ),
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("INVALID_RECORD: bubble is missing {field}"))
}

fn position(value: Option<f64>, field: &str, id: &str) -> Result<f64, String> {
    let v = value.ok_or_else(|| format!("INVALID_RECORD: bubble {id} is missing {field}"))?;
    if !(0.0..100.0).contains(&v) {
        return Err(format!("INVALID_RECORD: bubble {id} has {field} {v} outside [0, 100)"));
    }
    Ok(v)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BubbleRecord {
        BubbleRecord {
            id: Some("b-1".to_string()),
            content: Some("drifting thoughts".to_string()),
            title: Some("  ".to_string()),
            parent_id: None,
            topic: None,
            owner_id: Some("user-1".to_string()),
            created_at: Some("2026-03-01T08:30:00Z".to_string()),
            pos_x: Some(12.5),
            pos_y: Some(99.9),
        }
    }

    #[test]
    fn valid_record_becomes_bubble_with_defaults() {
        let bubble = Bubble::try_from(record()).expect("valid record");
        assert_eq!(bubble.topic, DEFAULT_TOPIC);
        assert_eq!(bubble.title, None);
        assert!(!bubble.is_reply());
    }

    #[test]
    fn rejects_positions_outside_unit_square() {
        let err = Bubble::try_from(BubbleRecord {
            pos_x: Some(100.0),
            ..record()
        })
        .unwrap_err();
        assert!(err.contains("pos_x"));

        assert!(Bubble::try_from(BubbleRecord {
            pos_y: Some(-0.1),
            ..record()
        })
        .is_err());
    }

    #[test]
    fn rejects_missing_owner_and_bad_timestamp() {
        assert!(Bubble::try_from(BubbleRecord {
            owner_id: None,
            ..record()
        })
        .is_err());
        assert!(Bubble::try_from(BubbleRecord {
            created_at: Some("yesterday".to_string()),
            ..record()
        })
        .is_err());
    }

    #[test]
    fn new_bubble_validation_trims_and_rejects_empty() {
        let err = NewBubble {
            content: "   \n".to_string(),
            ..NewBubble::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.starts_with("EMPTY_CONTENT"));

        let ok = NewBubble {
            content: "  hello sea  ".to_string(),
            topic: Some(" ".to_string()),
            ..NewBubble::default()
        }
        .validate()
        .expect("valid bubble");
        assert_eq!(ok.content, "hello sea");
        assert_eq!(ok.topic.as_deref(), Some(DEFAULT_TOPIC));
    }

    #[test]
    fn content_limit_counts_characters_not_bytes() {
        let at_limit = NewBubble {
            content: "é".repeat(MAX_CONTENT_CHARS),
            ..NewBubble::default()
        };
        assert_eq!(at_limit.validate().expect("2000 chars fit").content.chars().count(), 2000);

        let over = NewBubble {
            content: "é".repeat(MAX_CONTENT_CHARS + 1),
            ..NewBubble::default()
        }
        .validate()
        .unwrap_err();
        assert!(over.starts_with("CONTENT_TOO_LONG"));

        let padded = NewBubble {
            content: format!("  {}  ", "a".repeat(MAX_CONTENT_CHARS)),
            ..NewBubble::default()
        };
        assert!(padded.validate().is_ok());
    }
}
