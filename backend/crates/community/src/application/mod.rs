//! Application Layer
//!
//! Use cases and application services.

pub mod edit_profile;
pub mod information;
pub mod notifications;
pub mod register_profile;
pub mod settings;
pub mod view_profile;

// Re-exports
pub use edit_profile::{EditProfileInput, EditProfileUseCase, IndividualChanges, OrganisationChanges};
pub use information::InformationUseCase;
pub use notifications::{NotificationUseCase, SendNotificationInput};
pub use register_profile::RegisterProfileUseCase;
pub use settings::SettingsUseCase;
pub use view_profile::ViewProfileUseCase;
