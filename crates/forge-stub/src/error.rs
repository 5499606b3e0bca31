//! Error types for stub planning
//!
//! Every error here is raised while planning, never deferred into the
//! generated client. Argument errors abort their endpoint; endpoint errors
//! are collected across the whole service.

use crate::ir::{AuthType, ParameterLocation, TypeNode};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A type has no flat scalar or repeated representation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// The type cannot be written as plain text
    #[error("cannot serialize {ty} as a plain value: {reason}")]
    Unencodable { ty: TypeNode, reason: &'static str },
}

impl EncodingError {
    pub(crate) fn unencodable(ty: &TypeNode, reason: &'static str) -> Self {
        Self::Unencodable {
            ty: ty.clone(),
            reason,
        }
    }
}

/// Errors raised while planning a single endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The argument's location does not accept its type
    #[error("argument `{argument}` of type {ty} cannot be placed in {location}: {source}")]
    IllegalPlacement {
        argument: String,
        location: ParameterLocation,
        ty: TypeNode,
        #[source]
        source: EncodingError,
    },

    /// The endpoint demands an auth mechanism other than a header bearer token
    #[error("{auth} auth is not supported; only header bearer tokens can be sent by async clients")]
    InvalidAuthLocation { auth: AuthType },

    /// Two arguments share a local name
    #[error("duplicate argument name `{0}`")]
    DuplicateArgumentName(String),

    /// Two endpoints share a name
    #[error("duplicate endpoint name `{0}`")]
    DuplicateEndpointName(String),

    /// A declared header reuses the header carrying the bearer token
    #[error("argument `{argument}` uses header `{header}`, which carries the auth token")]
    ReservedHeader { argument: String, header: String },

    /// More than one argument targets the body
    #[error("multiple body arguments: `{first}` and `{second}`")]
    MultipleBodyArguments { first: String, second: String },
}

/// A planning failure attributed to an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("endpoint `{endpoint}`: {error}")]
pub struct EndpointError {
    /// Endpoint name
    pub endpoint: String,
    /// Underlying failure
    #[source]
    pub error: PlanError,
}

impl EndpointError {
    /// Create a new endpoint error
    pub fn new(endpoint: impl Into<String>, error: PlanError) -> Self {
        Self {
            endpoint: endpoint.into(),
            error,
        }
    }
}

/// Every endpoint failure of a service planning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePlanError {
    /// Service name
    pub service: String,
    /// Failures in endpoint declaration order
    pub errors: Vec<EndpointError>,
}

impl fmt::Display for ServicePlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to plan {} endpoint(s) of service `{}`",
            self.errors.len(),
            self.service
        )?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServicePlanError {}

/// Errors that can occur while loading planner configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error
    #[error("invalid planner config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_illegal_placement_message() {
        let ty = TypeNode::map(TypeNode::string(), TypeNode::integer());
        let error = EndpointError::new(
            "search",
            PlanError::IllegalPlacement {
                argument: "filters".to_string(),
                location: ParameterLocation::query("filter"),
                ty: ty.clone(),
                source: EncodingError::unencodable(&ty, "maps have no plain representation"),
            },
        );

        let message = error.to_string();
        assert!(message.starts_with("endpoint `search`: argument `filters`"));
        assert!(message.contains("map<string, integer>"));
        assert!(message.contains("query `filter`"));
    }

    #[test]
    fn test_service_error_lists_every_endpoint() {
        let error = ServicePlanError {
            service: "CatalogService".to_string(),
            errors: vec![
                EndpointError::new("a", PlanError::DuplicateArgumentName("x".to_string())),
                EndpointError::new("b", PlanError::DuplicateEndpointName("b".to_string())),
            ],
        };

        let message = error.to_string();
        assert!(message.contains("2 endpoint(s)"));
        assert!(message.contains("endpoint `a`: duplicate argument name `x`"));
        assert!(message.contains("endpoint `b`: duplicate endpoint name `b`"));
    }
}
