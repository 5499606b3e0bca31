//! Service, endpoint and argument definitions
//!
//! This module provides the input model consumed by the planner. Definitions
//! are produced once by an external loader (or by the builders below) and
//! only read afterwards.

use crate::error::PlanError;
use crate::ir::TypeNode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Where in the request an argument is placed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterLocation {
    /// Request body
    Body,
    /// Header with the given wire name
    Header(String),
    /// Path segment, keyed by the argument name
    Path,
    /// Query entry with the given wire name
    Query(String),
}

impl ParameterLocation {
    /// Create a header location
    pub fn header(wire_name: impl Into<String>) -> Self {
        ParameterLocation::Header(wire_name.into())
    }

    /// Create a query location
    pub fn query(wire_name: impl Into<String>) -> Self {
        ParameterLocation::Query(wire_name.into())
    }

    /// Check if this is the body location
    pub fn is_body(&self) -> bool {
        matches!(self, ParameterLocation::Body)
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterLocation::Body => f.write_str("body"),
            ParameterLocation::Header(name) => write!(f, "header `{}`", name),
            ParameterLocation::Path => f.write_str("path"),
            ParameterLocation::Query(name) => write!(f, "query `{}`", name),
        }
    }
}

/// Authentication mechanism demanded by an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Bearer token in the authorization header
    Header,
    /// Bearer token in the named cookie
    Cookie(String),
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthType::Header => f.write_str("header"),
            AuthType::Cookie(name) => write!(f, "cookie `{}`", name),
        }
    }
}

/// A single endpoint argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArgumentDefinition {
    /// Local argument name (unique within the endpoint)
    pub name: String,
    /// Wire location
    pub location: ParameterLocation,
    /// Declared type
    #[serde(rename = "type")]
    pub ty: TypeNode,
    /// Documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl ArgumentDefinition {
    /// Create a new argument
    pub fn new(name: impl Into<String>, location: ParameterLocation, ty: TypeNode) -> Self {
        Self {
            name: name.into(),
            location,
            ty,
            doc: None,
        }
    }

    /// Create a body argument
    pub fn body(name: impl Into<String>, ty: TypeNode) -> Self {
        Self::new(name, ParameterLocation::Body, ty)
    }

    /// Create a header argument
    pub fn header(name: impl Into<String>, wire_name: impl Into<String>, ty: TypeNode) -> Self {
        Self::new(name, ParameterLocation::header(wire_name), ty)
    }

    /// Create a path argument
    pub fn path(name: impl Into<String>, ty: TypeNode) -> Self {
        Self::new(name, ParameterLocation::Path, ty)
    }

    /// Create a query argument
    pub fn query(name: impl Into<String>, wire_name: impl Into<String>, ty: TypeNode) -> Self {
        Self::new(name, ParameterLocation::query(wire_name), ty)
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// A single endpoint of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDefinition {
    /// Endpoint name (unique within the service)
    pub name: String,
    /// Arguments in declaration order
    #[serde(default)]
    pub args: Vec<ArgumentDefinition>,
    /// Declared return type (None = no response body)
    #[serde(default)]
    pub returns: Option<TypeNode>,
    /// Authentication requirement (None = unauthenticated)
    #[serde(default)]
    pub auth: Option<AuthType>,
    /// Documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl EndpointDefinition {
    /// Create a new endpoint with no arguments and no return type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            returns: None,
            auth: None,
            doc: None,
        }
    }

    /// Add an argument
    pub fn arg(mut self, arg: ArgumentDefinition) -> Self {
        self.args.push(arg);
        self
    }

    /// Set arguments
    pub fn with_args(mut self, args: Vec<ArgumentDefinition>) -> Self {
        self.args = args;
        self
    }

    /// Set return type
    pub fn returns(mut self, ty: TypeNode) -> Self {
        self.returns = Some(ty);
        self
    }

    /// Require authentication
    pub fn with_auth(mut self, auth: AuthType) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Whether the endpoint requires authentication
    pub fn requires_auth(&self) -> bool {
        self.auth.is_some()
    }

    /// The body argument, if any
    pub fn body_arg(&self) -> Option<&ArgumentDefinition> {
        self.args.iter().find(|arg| arg.location.is_body())
    }

    /// Check structural invariants: unique argument names, at most one body
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut seen = HashSet::new();
        for arg in &self.args {
            if !seen.insert(arg.name.as_str()) {
                return Err(PlanError::DuplicateArgumentName(arg.name.clone()));
            }
        }

        let mut bodies = self.args.iter().filter(|arg| arg.location.is_body());
        if let (Some(first), Some(second)) = (bodies.next(), bodies.next()) {
            return Err(PlanError::MultipleBodyArguments {
                first: first.name.clone(),
                second: second.name.clone(),
            });
        }

        Ok(())
    }
}

/// A service: a named, ordered collection of endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Service name (e.g., "CatalogService")
    pub name: String,
    /// Endpoints in declaration order
    #[serde(default)]
    pub endpoints: Vec<EndpointDefinition>,
    /// Documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl ServiceDefinition {
    /// Create a new empty service
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoints: Vec::new(),
            doc: None,
        }
    }

    /// Add an endpoint
    pub fn endpoint(mut self, endpoint: EndpointDefinition) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Set endpoints
    pub fn with_endpoints(mut self, endpoints: Vec<EndpointDefinition>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set documentation
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Load a service definition from its JSON form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Indices of endpoints whose name repeats an earlier endpoint
    pub fn duplicate_endpoints(&self) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.endpoints
            .iter()
            .enumerate()
            .filter(|(_, endpoint)| !seen.insert(endpoint.name.as_str()))
            .map(|(index, _)| index)
            .collect()
    }
}
