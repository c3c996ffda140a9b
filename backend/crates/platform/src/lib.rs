//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, random codes and token ids)
//! - Password hashing (Argon2id) and strength testing
//! - JWT signing and verification
//! - Outgoing mail and address geocoding
//! - Typed environment configuration

pub mod config;
pub mod crypto;
pub mod geocode;
pub mod mail;
pub mod password;
pub mod token;
