//! Entity Module

pub mod registration;
pub mod reset;
pub mod user;
