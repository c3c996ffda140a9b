//! Cause Entity

use kernel::id::CauseId;
use serde::Serialize;

/// A charitable cause events and users can be linked to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cause {
    pub id: CauseId,
    pub name: String,
    pub title: String,
    pub description: String,
}
