//! Domain Layer
//!
//! Events, signups, favourites and causes, the pure services that sort and
//! filter events, and the repository traits.

pub mod entity;
pub mod repository;
pub mod services;

pub use entity::cause::Cause;
pub use entity::event::{Event, EventDetails, EventDraft, EventListing, EventSummary, NewEvent};
pub use entity::signup::{Attendee, Participant, SignUp};
pub use repository::{
    ActivityStore, CauseRepository, EventRepository, EventScope, EventSelection,
    FavouriteRepository, SignUpRepository, Timeframe,
};
pub use services::filter::{BooleanFilter, EventFilters};
