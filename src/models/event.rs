use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::speaker::Speaker;

/// An event in the catalog. `speakers` is populated on read from the speaker
/// side of the relationship and is never written back by the event store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_deleted: bool,
    pub speakers: Vec<Speaker>,
}

impl Event {
    pub fn new(input: CreateEvent) -> Self {
        let CreateEvent {
            id,
            title,
            description,
            start_date,
            end_date,
        } = input;
        Self {
            id: id.unwrap_or_else(Uuid::new_v4),
            title,
            description,
            start_date,
            end_date,
            is_deleted: false,
            speakers: Vec::new(),
        }
    }

    /// Applies the mutable fields only. Identity, the delete flag and the
    /// speaker set are left as loaded.
    pub fn update(&mut self, fields: UpdateEvent) {
        let UpdateEvent {
            title,
            description,
            start_date,
            end_date,
        } = fields;
        self.title = title;
        self.description = description;
        self.start_date = start_date;
        self.end_date = end_date;
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    /// Client-chosen identifier; generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvent {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_input() -> CreateEvent {
        CreateEvent {
            id: None,
            title: "Conf".into(),
            description: "D".into(),
            start_date: Utc.with_ymd_and_hms(2023, 7, 10, 9, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2023, 7, 10, 18, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_new_event_is_active_without_speakers() {
        let event = Event::new(create_input());
        assert!(!event.is_deleted);
        assert!(event.speakers.is_empty());
        assert_eq!(event.title, "Conf");
    }

    #[test]
    fn test_new_event_keeps_supplied_id() {
        let id = Uuid::new_v4();
        let event = Event::new(CreateEvent {
            id: Some(id),
            ..create_input()
        });
        assert_eq!(event.id, id);
    }

    #[test]
    fn test_update_leaves_flag_and_identity() {
        let mut event = Event::new(create_input());
        let id = event.id;
        event.is_deleted = true;

        event.update(UpdateEvent {
            title: "Conf2".into(),
            description: "D2".into(),
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        });

        assert_eq!(event.id, id);
        assert!(event.is_deleted);
        assert_eq!(event.title, "Conf2");
        assert_eq!(event.description, "D2");
    }

    #[test]
    fn test_serializes_camel_case() {
        let event = Event::new(create_input());
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("startDate").is_some());
        assert!(json.get("endDate").is_some());
        assert_eq!(json["isDeleted"], false);
        assert!(json["speakers"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_create_input_id_is_optional() {
        let input: CreateEvent = serde_json::from_str(
            r#"{ "title": "", "description": "", "startDate": "2023-07-10T16:16:21.643Z", "endDate": "2023-07-10T16:16:21.643Z" }"#,
        )
        .unwrap();
        assert!(input.id.is_none());
    }
}
