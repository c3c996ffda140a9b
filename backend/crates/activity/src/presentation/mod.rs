//! Presentation Layer
//!
//! HTTP handlers, DTOs and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{ActivityAppState, CauseAppState};
pub use router::{activity_router, activity_router_generic, causes_router, causes_router_generic};
