pub mod event;
pub mod speaker;

pub use event::{CreateEvent, Event, UpdateEvent};
pub use speaker::{CreateSpeaker, Speaker};
