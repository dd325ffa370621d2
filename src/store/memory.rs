use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, UnitOfWork};
use crate::models::{Event, Speaker};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    events: Vec<Event>,
    speakers: Vec<Speaker>,
}

impl MemoryState {
    fn event(&self, id: Uuid, show_deleted: bool) -> Option<&Event> {
        self.events
            .iter()
            .find(|event| event.id == id && (show_deleted || !event.is_deleted))
    }

    fn event_mut(&mut self, id: Uuid, show_deleted: bool) -> AppResult<&mut Event> {
        self.events
            .iter_mut()
            .find(|event| event.id == id && (show_deleted || !event.is_deleted))
            .ok_or_else(|| event_not_found(id))
    }

    fn apply(&mut self, write: PendingWrite) -> AppResult<()> {
        match write {
            PendingWrite::InsertEvent(event) => {
                if self.event(event.id, true).is_some() {
                    return Err(duplicate_event(event.id));
                }
                self.events.push(Event {
                    speakers: Vec::new(),
                    ..event
                });
            }
            PendingWrite::UpdateEventFields(event) => {
                let stored = self.event_mut(event.id, false)?;
                stored.title = event.title;
                stored.description = event.description;
                stored.start_date = event.start_date;
                stored.end_date = event.end_date;
            }
            PendingWrite::MarkEventDeleted(id) => {
                self.event_mut(id, true)?.is_deleted = true;
            }
            PendingWrite::InsertSpeaker(speaker) => {
                if self.event(speaker.event_id, true).is_none() {
                    return Err(event_not_found(speaker.event_id));
                }
                if self.speakers.iter().any(|s| s.id == speaker.id) {
                    return Err(AppError::Conflict(format!(
                        "Speaker with id '{}' already exists",
                        speaker.id
                    )));
                }
                self.speakers.push(speaker);
            }
        }
        Ok(())
    }

    fn speakers_of(&self, event_id: Uuid) -> Vec<Speaker> {
        self.speakers
            .iter()
            .filter(|speaker| speaker.event_id == event_id)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone)]
enum PendingWrite {
    InsertEvent(Event),
    UpdateEventFields(Event),
    MarkEventDeleted(Uuid),
    InsertSpeaker(Speaker),
}

/// In-process store for development and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let snapshot = self.state.read().await.clone();
        Ok(Box::new(MemoryUnitOfWork {
            state: self.state.clone(),
            snapshot,
            pending: Vec::new(),
        }))
    }
}

/// Reads see the snapshot taken at `begin` plus this unit's own writes.
/// Writes are buffered and applied together on commit.
#[derive(Debug)]
pub struct MemoryUnitOfWork {
    state: Arc<RwLock<MemoryState>>,
    snapshot: MemoryState,
    pending: Vec<PendingWrite>,
}

fn event_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Event with id '{}' was not found", id))
}

fn duplicate_event(id: Uuid) -> AppError {
    AppError::Conflict(format!("Event with id '{}' already exists", id))
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_events(&mut self, show_deleted: bool) -> AppResult<Vec<Event>> {
        Ok(self
            .snapshot
            .events
            .iter()
            .filter(|event| show_deleted || !event.is_deleted)
            .cloned()
            .collect())
    }

    async fn find_event(&mut self, id: Uuid, show_deleted: bool) -> AppResult<Option<Event>> {
        Ok(self.snapshot.event(id, show_deleted).cloned())
    }

    async fn find_event_with_speakers(
        &mut self,
        id: Uuid,
        show_deleted: bool,
    ) -> AppResult<Option<Event>> {
        Ok(self.snapshot.event(id, show_deleted).map(|event| Event {
            speakers: self.snapshot.speakers_of(id),
            ..event.clone()
        }))
    }

    async fn event_exists(&mut self, id: Uuid, show_deleted: bool) -> AppResult<bool> {
        Ok(self.snapshot.event(id, show_deleted).is_some())
    }

    async fn insert_event(&mut self, event: &Event) -> AppResult<()> {
        self.stage(PendingWrite::InsertEvent(event.clone()))
    }

    async fn update_event_fields(&mut self, event: &Event) -> AppResult<()> {
        self.stage(PendingWrite::UpdateEventFields(event.clone()))
    }

    async fn mark_event_deleted(&mut self, id: Uuid) -> AppResult<()> {
        self.stage(PendingWrite::MarkEventDeleted(id))
    }

    async fn find_speakers_by_event(&mut self, event_id: Uuid) -> AppResult<Vec<Speaker>> {
        Ok(self.snapshot.speakers_of(event_id))
    }

    async fn find_all_speakers(&mut self) -> AppResult<Vec<Speaker>> {
        Ok(self.snapshot.speakers.clone())
    }

    async fn insert_speaker(&mut self, speaker: &Speaker) -> AppResult<()> {
        self.stage(PendingWrite::InsertSpeaker(speaker.clone()))
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryUnitOfWork { state, pending, .. } = *self;
        if pending.is_empty() {
            return Ok(());
        }

        let mut shared = state.write().await;

        // Replay against the latest committed state; a write that no longer
        // applies (duplicate id, event deleted since our snapshot) rejects
        // the whole batch.
        let mut next = shared.clone();
        for write in pending {
            next.apply(write)?;
        }
        *shared = next;

        Ok(())
    }
}

impl MemoryUnitOfWork {
    /// Applies a write to the snapshot so later reads see it, and queues it
    /// for commit.
    fn stage(&mut self, write: PendingWrite) -> AppResult<()> {
        self.snapshot.apply(write.clone())?;
        self.pending.push(write);
        Ok(())
    }
}
