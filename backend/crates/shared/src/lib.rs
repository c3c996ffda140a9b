//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the vocabulary every Karma crate agrees on:
//! - Common error types and result aliases
//! - Typed integer ids for database rows
//! - The `{message, data}` response envelope and pagination metadata
//! - Postal address data shared by events and profiles
//! - The account username rule, shared by registration and profile edits
//! - The authenticated caller, as placed in request extensions
//!
//! Only things that mean the same in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod address;
pub mod id;
pub mod pagination;
pub mod response;
pub mod username;

#[cfg(feature = "axum")]
pub mod caller;
