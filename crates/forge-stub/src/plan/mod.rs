//! Request and response planning for client stubs
//!
//! This module provides the planners, leaves first:
//! - Plain-value encoding selection (`encoding`)
//! - Argument placement (`placement`)
//! - Endpoint plans (`endpoint`)
//! - Service plans (`service`)

pub mod encoding;
pub mod endpoint;
pub mod placement;
pub mod service;

pub use encoding::{CollectionKind, FlatEncoding};
pub use endpoint::{EndpointPlan, EndpointPlanner, ResponseDecoding};
pub use placement::{ArgumentPlanner, PlacementInstruction, Presence, RequestSlot, ValueEncoding};
pub use service::{ServicePlan, ServicePlanner};
