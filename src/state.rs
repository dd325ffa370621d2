use crate::repository::{EventRepository, SpeakerRepository};
use crate::store::StoreArc;

/// Shared handler state. Repositories are cheap handles over one store.
#[derive(Clone)]
pub struct AppState {
    event_repository: EventRepository,
    speaker_repository: SpeakerRepository,
}

impl AppState {
    pub fn new(store: StoreArc) -> Self {
        Self {
            event_repository: EventRepository::new(store.clone()),
            speaker_repository: SpeakerRepository::new(store),
        }
    }

    pub fn event_repository(&self) -> &EventRepository {
        &self.event_repository
    }

    pub fn speaker_repository(&self) -> &SpeakerRepository {
        &self.speaker_repository
    }
}
