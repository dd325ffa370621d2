use uuid::Uuid;

use crate::utils::error::AppError;

pub mod event;
pub mod speaker;

pub use event::EventRepository;
pub use speaker::SpeakerRepository;

fn event_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Event with id '{}' was not found", id))
}
