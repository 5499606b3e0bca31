//! Intermediate Representation (IR) for service definitions
//!
//! This module provides the type grammar and the service, endpoint and
//! argument metadata that the planner consumes.

pub mod service;
pub mod types;

pub use service::*;
pub use types::*;
