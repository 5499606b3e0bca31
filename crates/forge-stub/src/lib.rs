//! Forge-Stub: Client stub planning for Forge service definitions
//!
//! This crate turns a service definition (endpoints with typed arguments
//! tagged by wire location, and typed return values) into plans that an
//! emission stage can turn into asynchronous client code. For every endpoint
//! it decides how each argument is written into the outgoing request and how
//! the response body is decoded, rejecting illegal combinations up front.
//!
//! # Architecture
//!
//! - `ir`: Type grammar and service/endpoint/argument definitions
//! - `plan`: Encoding selection, argument placement, endpoint and service plans
//! - `config`: Planner options loaded from TOML
//! - `error`: Planning and configuration errors
//!
//! # Usage
//!
//! ```rust
//! use forge_stub::{
//!     ArgumentDefinition, EndpointDefinition, PlannerConfig, ServiceDefinition,
//!     ServicePlanner, TypeNode,
//! };
//!
//! let service = ServiceDefinition::new("CatalogService").endpoint(
//!     EndpointDefinition::new("listDatasets")
//!         .arg(ArgumentDefinition::query("ids", "id", TypeNode::list(TypeNode::integer())))
//!         .returns(TypeNode::list(TypeNode::reference("Dataset"))),
//! );
//!
//! let config = PlannerConfig::default();
//! let plan = ServicePlanner::new(&config).plan(&service).unwrap();
//! assert_eq!(plan.endpoints[0].instructions[0].request_method(), "putAllQueryParams");
//! ```

pub mod config;
pub mod error;
pub mod ir;
pub mod plan;

// Re-export commonly used types
pub use config::PlannerConfig;
pub use error::{ConfigError, EncodingError, EndpointError, PlanError, ServicePlanError};
pub use ir::{
    ArgumentDefinition, AuthType, EndpointDefinition, ParameterLocation, PrimitiveKind,
    ServiceDefinition, TypeCategory, TypeNode,
};
pub use plan::{
    ArgumentPlanner, CollectionKind, EndpointPlan, EndpointPlanner, FlatEncoding,
    PlacementInstruction, Presence, RequestSlot, ResponseDecoding, ServicePlan, ServicePlanner,
    ValueEncoding,
};
