use tracing::info;
use uuid::Uuid;

use super::event_not_found;
use crate::models::{CreateSpeaker, Speaker};
use crate::store::StoreArc;
use crate::utils::error::AppResult;

#[derive(Clone)]
pub struct SpeakerRepository {
    store: StoreArc,
}

impl SpeakerRepository {
    pub fn new(store: StoreArc) -> Self {
        Self { store }
    }

    /// Registers a speaker against an active event. Nothing is returned to
    /// the caller, unlike event creation.
    pub async fn add_speaker(&self, event_id: Uuid, input: CreateSpeaker) -> AppResult<()> {
        let mut uow = self.store.begin().await?;

        if !uow.event_exists(event_id, false).await? {
            return Err(event_not_found(event_id));
        }

        let speaker = Speaker::new(event_id, input);
        uow.insert_speaker(&speaker).await?;
        uow.commit().await?;

        info!(event_id = %event_id, speaker_id = %speaker.id, "Speaker registered");
        Ok(())
    }

    /// Every speaker of every event, deleted events included.
    pub async fn list_all_speakers(&self) -> AppResult<Vec<Speaker>> {
        let mut uow = self.store.begin().await?;
        uow.find_all_speakers().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::CreateEvent;
    use crate::repository::EventRepository;
    use crate::store::MemoryStore;
    use crate::utils::error::AppError;
    use chrono::{TimeZone, Utc};

    fn repositories() -> (EventRepository, SpeakerRepository) {
        let store: StoreArc = Arc::new(MemoryStore::new());
        (
            EventRepository::new(store.clone()),
            SpeakerRepository::new(store),
        )
    }

    fn conf() -> CreateEvent {
        CreateEvent {
            id: None,
            title: "Conf".into(),
            description: "D".into(),
            start_date: Utc.with_ymd_and_hms(2023, 7, 10, 9, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2023, 7, 10, 18, 0, 0).unwrap(),
        }
    }

    fn speaker(name: &str) -> CreateSpeaker {
        CreateSpeaker {
            name: name.into(),
            talk_title: "T".into(),
            linked_in_profile: "L".into(),
        }
    }

    #[tokio::test]
    async fn test_add_speaker_to_missing_event() -> AppResult<()> {
        let (_, speakers) = repositories();

        let res = speakers.add_speaker(Uuid::new_v4(), speaker("A")).await;

        assert!(matches!(res, Err(AppError::NotFound(_))));
        assert!(speakers.list_all_speakers().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_speaker_to_deleted_event() -> AppResult<()> {
        let (events, speakers) = repositories();
        let event = events.create(conf()).await?;
        events.delete(event.id).await?;

        let res = speakers.add_speaker(event.id, speaker("A")).await;

        assert!(matches!(res, Err(AppError::NotFound(_))));
        assert!(speakers.list_all_speakers().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_speaker() -> AppResult<()> {
        let (events, speakers) = repositories();
        let event = events.create(conf()).await?;

        speakers.add_speaker(event.id, speaker("A")).await?;

        let all = speakers.list_all_speakers().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].event_id, event.id);
        assert_eq!(all[0].name, "A");
        assert_eq!(all[0].talk_title, "T");
        assert_eq!(all[0].linked_in_profile, "L");

        let found = events.get_by_id(event.id, false).await?;
        assert_eq!(found.speakers, all);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_all_speakers_spans_events() -> AppResult<()> {
        let (events, speakers) = repositories();
        let first = events.create(conf()).await?;
        let second = events.create(conf()).await?;
        speakers.add_speaker(first.id, speaker("A")).await?;
        speakers.add_speaker(second.id, speaker("B")).await?;
        events.delete(second.id).await?;

        let all = speakers.list_all_speakers().await?;
        let owners: Vec<_> = all.iter().map(|s| (s.name.as_str(), s.event_id)).collect();
        assert_eq!(owners, vec![("A", first.id), ("B", second.id)]);
        Ok(())
    }
}
