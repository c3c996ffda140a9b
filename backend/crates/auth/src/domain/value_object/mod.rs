//! Value Object Module

pub mod email;
pub mod one_time_code;
pub mod username;
