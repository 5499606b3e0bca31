//! Service plan building
//!
//! Plans every endpoint of a service independently and collects all
//! failures, so a single run reports every illegal endpoint at once.

use crate::config::PlannerConfig;
use crate::error::{EndpointError, PlanError, ServicePlanError};
use crate::ir::{EndpointDefinition, ServiceDefinition};
use crate::plan::{EndpointPlan, EndpointPlanner};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Plans for every endpoint of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePlan {
    /// Service name
    pub service: String,
    /// Name of the generated asynchronous client
    pub client_name: String,
    /// Endpoint plans in declaration order
    pub endpoints: Vec<EndpointPlan>,
}

impl ServicePlan {
    /// Look up an endpoint plan by name
    pub fn endpoint(&self, name: &str) -> Option<&EndpointPlan> {
        self.endpoints.iter().find(|plan| plan.endpoint == name)
    }

    /// Serialize to pretty JSON for the emission stage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Planner for whole services
pub struct ServicePlanner<'a> {
    config: &'a PlannerConfig,
}

impl<'a> ServicePlanner<'a> {
    /// Create a new service planner
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    /// Plan every endpoint, returning one result per endpoint in declaration order
    pub fn plan_each(
        &self,
        service: &ServiceDefinition,
    ) -> Vec<Result<EndpointPlan, EndpointError>> {
        debug!(
            service = %service.name,
            endpoints = service.endpoints.len(),
            parallel = self.config.parallel,
            "stub.plan_service"
        );

        let duplicates: HashSet<usize> = service.duplicate_endpoints().into_iter().collect();
        let planner = EndpointPlanner::new(&service.name, self.config);

        let plan_one = |(index, endpoint): (usize, &EndpointDefinition)| {
            if duplicates.contains(&index) {
                return Err(EndpointError::new(
                    endpoint.name.clone(),
                    PlanError::DuplicateEndpointName(endpoint.name.clone()),
                ));
            }
            planner.plan(endpoint)
        };

        let results: Vec<_> = if self.config.parallel {
            service
                .endpoints
                .par_iter()
                .enumerate()
                .map(plan_one)
                .collect()
        } else {
            service.endpoints.iter().enumerate().map(plan_one).collect()
        };

        for error in results.iter().filter_map(|result| result.as_ref().err()) {
            warn!(
                service = %service.name,
                endpoint = %error.endpoint,
                error = %error.error,
                "stub.endpoint_failed"
            );
        }

        results
    }

    /// Plan the whole service; succeeds only if every endpoint does
    pub fn plan(&self, service: &ServiceDefinition) -> Result<ServicePlan, ServicePlanError> {
        let mut endpoints = Vec::with_capacity(service.endpoints.len());
        let mut errors = Vec::new();

        for result in self.plan_each(service) {
            match result {
                Ok(plan) => endpoints.push(plan),
                Err(error) => errors.push(error),
            }
        }

        if !errors.is_empty() {
            return Err(ServicePlanError {
                service: service.name.clone(),
                errors,
            });
        }

        Ok(ServicePlan {
            service: service.name.clone(),
            client_name: format!("{}Async", service.name),
            endpoints,
        })
    }
}
