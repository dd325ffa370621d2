use tracing::{debug, info};
use uuid::Uuid;

use super::event_not_found;
use crate::models::{CreateEvent, Event, UpdateEvent};
use crate::store::StoreArc;
use crate::utils::error::AppResult;

/// Event lifecycle operations. Each call runs in its own unit of work.
///
/// Soft-deleted events are treated as absent by every lookup here; only
/// [`EventRepository::get_by_id`] can be asked to include them.
#[derive(Clone)]
pub struct EventRepository {
    store: StoreArc,
}

impl EventRepository {
    pub fn new(store: StoreArc) -> Self {
        Self { store }
    }

    /// Active events in insertion order, each with its speakers.
    pub async fn list(&self) -> AppResult<Vec<Event>> {
        let mut uow = self.store.begin().await?;

        let mut events = uow.find_events(false).await?;
        for event in &mut events {
            event.speakers = uow.find_speakers_by_event(event.id).await?;
        }

        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    pub async fn get_by_id(&self, id: Uuid, show_deleted: bool) -> AppResult<Event> {
        let mut uow = self.store.begin().await?;

        uow.find_event_with_speakers(id, show_deleted)
            .await?
            .ok_or_else(|| event_not_found(id))
    }

    pub async fn create(&self, input: CreateEvent) -> AppResult<Event> {
        let event = Event::new(input);

        let mut uow = self.store.begin().await?;
        uow.insert_event(&event).await?;
        uow.commit().await?;

        info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    /// Replaces the four mutable fields of an active event. The delete flag
    /// and speaker relationship are not part of the write, so an update racing
    /// a delete fails with `NotFound` instead of reviving the event.
    pub async fn update(&self, id: Uuid, fields: UpdateEvent) -> AppResult<()> {
        let mut uow = self.store.begin().await?;

        let mut event = uow
            .find_event(id, false)
            .await?
            .ok_or_else(|| event_not_found(id))?;
        event.update(fields);

        uow.update_event_fields(&event).await?;
        uow.commit().await?;

        info!(event_id = %id, "Event updated");
        Ok(())
    }

    /// Soft delete. Speakers of the event are kept as they are.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut uow = self.store.begin().await?;

        if !uow.event_exists(id, false).await? {
            return Err(event_not_found(id));
        }

        uow.mark_event_deleted(id).await?;
        uow.commit().await?;

        info!(event_id = %id, "Event deleted");
        Ok(())
    }
}
