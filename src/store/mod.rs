use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Event, Speaker};
use crate::utils::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Shared handle to the persistent store. Every operation opens its own
/// [`UnitOfWork`] from it and never holds one across requests.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}

pub type StoreArc = Arc<dyn Store>;

/// Store session bound to a single operation.
///
/// Writes become visible to other sessions only after [`UnitOfWork::commit`].
/// Dropping a unit of work without committing discards its writes and
/// releases the underlying connection.
///
/// Every event lookup takes `show_deleted`; with `false` soft-deleted events
/// are treated as absent.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Events in insertion order, without speakers attached.
    async fn find_events(&mut self, show_deleted: bool) -> AppResult<Vec<Event>>;

    /// Single event without speakers attached.
    async fn find_event(&mut self, id: Uuid, show_deleted: bool) -> AppResult<Option<Event>>;

    /// Single event with its speakers, fetched eagerly in one query.
    async fn find_event_with_speakers(
        &mut self,
        id: Uuid,
        show_deleted: bool,
    ) -> AppResult<Option<Event>>;

    async fn event_exists(&mut self, id: Uuid, show_deleted: bool) -> AppResult<bool>;

    /// Fails with `AppError::Conflict` when the id is already taken.
    async fn insert_event(&mut self, event: &Event) -> AppResult<()>;

    /// Writes title, description and dates of an active event. The delete
    /// flag and `speakers` are never written. Fails with `AppError::NotFound`
    /// when the event is missing or was soft-deleted in the meantime.
    async fn update_event_fields(&mut self, event: &Event) -> AppResult<()>;

    /// Sets the soft-delete flag. Nothing else about the event is written.
    async fn mark_event_deleted(&mut self, id: Uuid) -> AppResult<()>;

    async fn find_speakers_by_event(&mut self, event_id: Uuid) -> AppResult<Vec<Speaker>>;

    async fn find_all_speakers(&mut self) -> AppResult<Vec<Speaker>>;

    async fn insert_speaker(&mut self, speaker: &Speaker) -> AppResult<()>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}
