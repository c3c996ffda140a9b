//! Presentation Layer
//!
//! HTTP handlers, DTOs and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{CommunityAppState, InformationAppState};
pub use router::{
    community_router, community_router_generic, information_router, information_router_generic,
};
