//! Username Value Object
//!
//! The rule lives in the kernel so profile edits apply the same checks.

pub use kernel::username::{USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH, Username};
