//! Information Entity
//!
//! Static texts such as the privacy policy, keyed by type.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Information {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}
