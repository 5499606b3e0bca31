//! Endpoint plan building
//!
//! Assembles the ordered placement instructions of one endpoint together
//! with its response decoding.

use crate::config::PlannerConfig;
use crate::error::{EndpointError, PlanError};
use crate::ir::{AuthType, EndpointDefinition, ParameterLocation, PrimitiveKind, TypeNode};
use crate::plan::{
    ArgumentPlanner, FlatEncoding, PlacementInstruction, Presence, RequestSlot, ValueEncoding,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the response body is decoded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseDecoding {
    /// Body deserializer for the declared return type
    Typed(TypeNode),
    /// No body is expected
    EmptyBody,
}

impl ResponseDecoding {
    /// Decoding for an optional declared return type
    pub fn for_return_type(returns: Option<&TypeNode>) -> Self {
        match returns {
            Some(ty) => ResponseDecoding::Typed(ty.clone()),
            None => ResponseDecoding::EmptyBody,
        }
    }
}

/// Request construction and response decoding plan for one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointPlan {
    /// Service the endpoint belongs to
    pub service: String,
    /// Endpoint name
    pub endpoint: String,
    /// Placement instructions in application order
    pub instructions: Vec<PlacementInstruction>,
    /// Response decoding
    pub response: ResponseDecoding,
}

impl EndpointPlan {
    /// Channel endpoint reference (e.g. `CatalogService.getDataset`)
    pub fn channel_endpoint(&self) -> String {
        format!("{}.{}", self.service, self.endpoint)
    }

    /// The body placement, if the endpoint sends one
    pub fn body_instruction(&self) -> Option<&PlacementInstruction> {
        self.instructions
            .iter()
            .find(|instruction| instruction.slot == RequestSlot::Body)
    }

    /// Name and type of the body serializer handle
    pub fn serializer(&self) -> Option<(String, &TypeNode)> {
        self.body_instruction()
            .and_then(|instruction| match &instruction.encoding {
                ValueEncoding::BodySerializer(ty) => Some(ty),
                _ => None,
            })
            .map(|ty| (format!("{}Serializer", self.endpoint), ty))
    }

    /// Name of the response deserializer handle
    pub fn deserializer_name(&self) -> String {
        format!("{}Deserializer", self.endpoint)
    }
}

/// Planner for the endpoints of one service
pub struct EndpointPlanner<'a> {
    service: &'a str,
    config: &'a PlannerConfig,
}

impl<'a> EndpointPlanner<'a> {
    /// Create a new endpoint planner
    pub fn new(service: &'a str, config: &'a PlannerConfig) -> Self {
        Self { service, config }
    }

    /// Plan a single endpoint; the first failure aborts the whole endpoint
    pub fn plan(&self, endpoint: &EndpointDefinition) -> Result<EndpointPlan, EndpointError> {
        debug!(
            service = %self.service,
            endpoint = %endpoint.name,
            args = endpoint.args.len(),
            "stub.plan_endpoint"
        );

        self.plan_instructions(endpoint)
            .map(|instructions| EndpointPlan {
                service: self.service.to_string(),
                endpoint: endpoint.name.clone(),
                instructions,
                response: ResponseDecoding::for_return_type(endpoint.returns.as_ref()),
            })
            .map_err(|error| EndpointError::new(endpoint.name.clone(), error))
    }

    fn plan_instructions(
        &self,
        endpoint: &EndpointDefinition,
    ) -> Result<Vec<PlacementInstruction>, PlanError> {
        endpoint.validate()?;

        let mut instructions = Vec::with_capacity(endpoint.args.len() + 1);
        if let Some(auth) = &endpoint.auth {
            instructions.push(self.auth_instruction(endpoint, auth)?);
        }

        let planner = ArgumentPlanner::new(self.config);
        for arg in &endpoint.args {
            instructions.push(planner.plan(arg)?);
        }

        Ok(instructions)
    }

    fn auth_instruction(
        &self,
        endpoint: &EndpointDefinition,
        auth: &AuthType,
    ) -> Result<PlacementInstruction, PlanError> {
        match auth {
            AuthType::Header => {
                self.check_auth_collisions(endpoint)?;
                Ok(PlacementInstruction {
                    argument: self.config.auth_param.clone(),
                    slot: RequestSlot::Header(self.config.auth_header.clone()),
                    encoding: ValueEncoding::Plain(FlatEncoding::Scalar(
                        PrimitiveKind::BearerToken,
                    )),
                    presence: Presence::Always,
                })
            }
            AuthType::Cookie(_) => Err(PlanError::InvalidAuthLocation { auth: auth.clone() }),
        }
    }

    /// The bearer token argument and header must not clash with declared arguments
    fn check_auth_collisions(&self, endpoint: &EndpointDefinition) -> Result<(), PlanError> {
        for arg in &endpoint.args {
            if arg.name == self.config.auth_param {
                return Err(PlanError::DuplicateArgumentName(arg.name.clone()));
            }
            if let ParameterLocation::Header(wire_name) = &arg.location {
                if wire_name.eq_ignore_ascii_case(&self.config.auth_header) {
                    return Err(PlanError::ReservedHeader {
                        argument: arg.name.clone(),
                        header: wire_name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
