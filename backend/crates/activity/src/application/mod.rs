//! Application Layer
//!
//! Use cases and application services.

pub mod browse_events;
pub mod causes;
pub mod config;
pub mod create_event;
pub mod event_details;
mod participant;
pub mod signups;
pub mod update_event;

// Re-exports
pub use browse_events::BrowseEventsUseCase;
pub use causes::CauseUseCase;
pub use config::ActivityConfig;
pub use create_event::{CreateEventInput, CreateEventUseCase, CreatedEvent};
pub use event_details::EventDetailsUseCase;
pub use signups::{FavouriteUseCase, SignUpUseCase};
pub use update_event::{UpdateEventInput, UpdateEventUseCase};
