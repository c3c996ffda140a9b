pub mod information;
pub mod notification;
pub mod profile;
pub mod settings;
