//! Domain Layer
//!
//! Profiles, settings, notifications and information entries, and the
//! repository traits.

pub mod entity;
pub mod repository;

pub use entity::information::Information;
pub use entity::notification::{NewNotification, Notification};
pub use entity::profile::{
    AddressChange, Individual, KarmaProfile, NewIndividual, NewOrganisation, Organisation,
    ProfileView, UserAccount,
};
pub use entity::settings::Settings;
pub use repository::{
    CommunityStore, InformationRepository, NotificationRepository, ProfileRepository,
    SettingsRepository,
};
