//! Request guards: token authentication and permission checks
//!
//! Guards are ordinary middleware functions composed at route-registration
//! time. Each either short-circuits with an error response or passes
//! control onward; the resolved identity travels in request extensions,
//! never in shared application state.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::AppState;
use crate::authz::{self, AccessRequest};
use crate::config::{AUTH_TOKEN_HEADER, SERVICE_SECRET_HEADER};
use crate::error::ApiError;
use crate::models::Identity;

/// Require a well-formed, resolvable authentication token. Runs before any
/// handler logic; the resolved identity is stored in request extensions.
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ApiError::Unauthenticated("authentication token is required".to_string())
        })?;

    let identity = state.authenticator.validate_token(presented).await?;
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Authorization requirements for one route, fixed at registration time.
#[derive(Debug, Clone)]
pub struct PermissionPolicy {
    /// Submodules whose grants may satisfy the check, in precedence order
    pub submodules: Vec<String>,
    /// Endpoint name grants are matched against
    pub endpoint: String,
    /// Methods open to any caller on this route
    pub exempt_methods: Vec<Method>,
}

impl PermissionPolicy {
    pub fn new(endpoint: &str, submodules: &[&str]) -> Self {
        Self {
            submodules: submodules.iter().map(|s| s.to_string()).collect(),
            endpoint: endpoint.to_string(),
            exempt_methods: Vec::new(),
        }
    }
}

/// Evaluate the route's permission policy against the caller. Merges the
/// caller's permission document from the store before deciding; the
/// decision itself is pure.
pub async fn require_permission(
    State((state, policy)): State<(AppState, PermissionPolicy)>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let mut identity = req.extensions().get::<Identity>().cloned();

    if let Some(identity) = identity.as_mut()
        && !identity.permissions.contains_key(&state.config.module_name)
    {
        let document = state
            .users
            .fetch_permission_document(&identity.user_id)
            .await
            .map_err(|e| ApiError::store("failed to fetch permission details", e))?;
        if let Some(document) = document {
            identity
                .permissions
                .insert(state.config.module_name.clone(), document);
        }
    }

    let presented_secret = req
        .headers()
        .get(SERVICE_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());

    let decision = authz::authorize(&AccessRequest {
        identity: identity.as_ref(),
        module: &state.config.module_name,
        submodules: &policy.submodules,
        endpoint: &policy.endpoint,
        method: req.method(),
        exempt_methods: &policy.exempt_methods,
        configured_secret: state.config.rpc_secret_key.as_deref(),
        presented_secret,
    });

    if !decision.is_allowed() {
        warn!(
            "Access denied for endpoint '{}' ({})",
            policy.endpoint,
            req.method()
        );
        return Err(ApiError::ModuleAccessDenied);
    }

    // Hand the merged identity to the handler.
    if let Some(identity) = identity {
        req.extensions_mut().insert(identity);
    }

    Ok(next.run(req).await)
}
