use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub id: Uuid,
    pub name: String,
    pub talk_title: String,
    pub linked_in_profile: String,
    pub event_id: Uuid,
}

impl Speaker {
    pub fn new(event_id: Uuid, input: CreateSpeaker) -> Self {
        let CreateSpeaker {
            name,
            talk_title,
            linked_in_profile,
        } = input;
        Self {
            id: Uuid::new_v4(),
            name,
            talk_title,
            linked_in_profile,
            event_id,
        }
    }
}

/// Registration payload. The owning event comes from the route, never the body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpeaker {
    pub name: String,
    pub talk_title: String,
    pub linked_in_profile: String,
}
