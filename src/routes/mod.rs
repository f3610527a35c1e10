//! Route & middleware compiler.
//!
//! Operations are grouped into resources by the first static segment of their
//! URL template. Each registration carries the router-native path, the
//! ordered handler chain and a response stub. The chain only names entries in
//! the runtime security, validation and middleware registries; their
//! implementations live outside the compiler.
//!
//! Handler precedence is fixed for every operation: security lookups, then
//! the validation lookup, then custom middleware (PathItem-level first).

mod path;
mod stub;

#[cfg(test)]
mod tests;

pub use path::{path_params, resource_for_path, translate_path, RouterSyntax, ROOT_RESOURCE};
pub use stub::{response_stub, ResponseStub};

use crate::error::RegistrationConflict;
use crate::naming::{to_camel_case, to_pascal_case};
use crate::spec::{HttpMethod, Operation, OrderedMap, PathItem, SecurityScheme, SpecModel};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use tracing::{debug, warn};

/// Runtime registry a handler step is looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepRegistry {
    Security,
    Validation,
    Middleware,
}

impl StepRegistry {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepRegistry::Security => "security",
            StepRegistry::Validation => "validation",
            StepRegistry::Middleware => "middleware",
        }
    }
}

/// One entry of a route's handler chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerStep {
    pub registry: StepRegistry,
    /// Scheme name, operationId or middleware name
    pub key: String,
    /// Security scheme `type` when the scheme is declared
    pub kind: Option<String>,
    /// Required scopes or roles
    pub scopes: Vec<String>,
}

impl HandlerStep {
    fn new(registry: StepRegistry, key: impl Into<String>) -> Self {
        HandlerStep {
            registry,
            key: key.into(),
            kind: None,
            scopes: Vec::new(),
        }
    }

    /// Lookup expression, e.g. `middleware.audit`
    pub fn lookup(&self) -> String {
        format!("{}.{}", self.registry.as_str(), self.key)
    }
}

impl Serialize for HandlerStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HandlerStep", 4)?;
        state.serialize_field("registry", &self.registry)?;
        state.serialize_field("lookup", &self.lookup())?;
        if let Some(kind) = &self.kind {
            state.serialize_field("kind", kind)?;
        }
        if !self.scopes.is_empty() {
            state.serialize_field("scopes", &self.scopes)?;
        }
        state.end()
    }
}

/// A single method registration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRegistration {
    pub method: HttpMethod,
    /// Router-native path
    pub path: String,
    /// URL template as declared
    pub template: String,
    pub operation_id: String,
    /// Operation hint, else PathItem hint, else the resource default
    pub service: String,
    pub handlers: Vec<HandlerStep>,
    pub response: ResponseStub,
}

impl RouteRegistration {
    /// Handler lookup expressions in execution order
    pub fn lookups(&self) -> Vec<String> {
        self.handlers.iter().map(HandlerStep::lookup).collect()
    }
}

/// Registrations of one resource, in source order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceRoutes {
    pub resource: String,
    /// `<Resource>Router`
    pub router_name: String,
    /// `<resource>Service`
    pub service: String,
    pub routes: Vec<RouteRegistration>,
}

impl ResourceRoutes {
    fn new(resource: String) -> Self {
        ResourceRoutes {
            router_name: format!("{}Router", to_pascal_case(&resource)),
            service: format!("{}Service", to_camel_case(&resource)),
            resource,
            routes: Vec::new(),
        }
    }
}

/// All resources, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteArtifact {
    pub syntax: &'static str,
    pub resources: Vec<ResourceRoutes>,
}

impl RouteArtifact {
    pub fn resource(&self, name: &str) -> Option<&ResourceRoutes> {
        self.resources.iter().find(|r| r.resource == name)
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteRegistration> {
        self.resources.iter().flat_map(|r| r.routes.iter())
    }
}

/// Security steps from the operation's requirements, in declaration order
///
/// A scheme named twice yields one step; the repeat is reported.
fn security_steps(
    operation: &Operation,
    schemes: Option<&OrderedMap<SecurityScheme>>,
    conflicts: &mut Vec<RegistrationConflict>,
) -> Vec<HandlerStep> {
    let mut steps: Vec<HandlerStep> = Vec::new();
    for requirement in &operation.security {
        for (scheme, scopes) in requirement.iter() {
            if steps.iter().any(|s| s.key == *scheme) {
                let conflict = RegistrationConflict {
                    registry: StepRegistry::Security.as_str().to_string(),
                    key: format!("{}.{}", operation.operation_id, scheme),
                };
                warn!(%conflict, "security registration rejected");
                conflicts.push(conflict);
                continue;
            }
            let mut step = HandlerStep::new(StepRegistry::Security, scheme);
            step.kind = schemes
                .and_then(|s| s.get(scheme))
                .map(|s| s.kind.clone());
            step.scopes = scopes.clone();
            steps.push(step);
        }
    }
    steps
}

fn handler_chain(
    item: &PathItem,
    operation: &Operation,
    schemes: Option<&OrderedMap<SecurityScheme>>,
    conflicts: &mut Vec<RegistrationConflict>,
) -> Vec<HandlerStep> {
    let mut chain = security_steps(operation, schemes, conflicts);
    chain.push(HandlerStep::new(
        StepRegistry::Validation,
        operation.operation_id.as_str(),
    ));
    chain.extend(
        item.middleware
            .iter()
            .chain(operation.middleware.iter())
            .map(|m| HandlerStep::new(StepRegistry::Middleware, m.name.as_str())),
    );
    chain
}

/// Compile the route model into per-resource registrations
///
/// Returns the artifact and any rejected (non-fatal) registrations.
pub fn compile_routes(
    model: &SpecModel,
    schemes: Option<&OrderedMap<SecurityScheme>>,
    syntax: RouterSyntax,
) -> (RouteArtifact, Vec<RegistrationConflict>) {
    let mut artifact = RouteArtifact {
        syntax: syntax.as_str(),
        resources: Vec::new(),
    };
    let mut conflicts = Vec::new();

    for (item, operation) in model.operations() {
        let resource = resource_for_path(&item.path);
        let index = match artifact.resources.iter().position(|r| r.resource == resource) {
            Some(index) => index,
            None => {
                artifact.resources.push(ResourceRoutes::new(resource));
                artifact.resources.len() - 1
            }
        };
        let group = &mut artifact.resources[index];

        let service = operation
            .service
            .clone()
            .or_else(|| item.service.clone())
            .unwrap_or_else(|| group.service.clone());

        let registration = RouteRegistration {
            method: operation.method,
            path: translate_path(&item.path, syntax),
            template: item.path.clone(),
            operation_id: operation.operation_id.clone(),
            service,
            handlers: handler_chain(item, operation, schemes, &mut conflicts),
            response: response_stub(operation),
        };
        debug!(
            resource = %group.resource,
            method = %registration.method,
            path = %registration.path,
            operation_id = %registration.operation_id,
            handlers = registration.handlers.len(),
            "registered route"
        );
        group.routes.push(registration);
    }

    (artifact, conflicts)
}
