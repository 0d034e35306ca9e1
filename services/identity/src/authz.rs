//! Authorization decision engine
//!
//! A pure function over an authenticated identity, a permission snapshot and
//! a request descriptor. The engine performs no I/O; permission data is
//! handed in by the caller, which keeps decisions synchronous and
//! unit-testable.
//!
//! Precedence, first match wins:
//! 1. service bypass: trusted internal callers presenting the shared
//!    secret are never blocked by user permission gaps;
//! 2. chief admin: the superuser role does not depend on per-entity
//!    permission documents being populated;
//! 3. explicit grant from the caller's permission document;
//! 4. exempt methods declared at route registration;
//! 5. deny.

use axum::http::Method;

use crate::models::{Identity, UserType};

/// Everything the engine needs to decide one request.
#[derive(Debug)]
pub struct AccessRequest<'a> {
    /// Authenticated caller, if any. Anonymous service calls pass `None`.
    pub identity: Option<&'a Identity>,
    /// Module this deployment governs (`MODULE_NAME`).
    pub module: &'a str,
    /// Submodules the route requires, in caller-supplied order.
    pub submodules: &'a [String],
    /// Endpoint name the route was registered under.
    pub endpoint: &'a str,
    /// HTTP method of the current request.
    pub method: &'a Method,
    /// Methods open to any caller on this route, regardless of grants.
    pub exempt_methods: &'a [Method],
    /// Shared secret configured for this deployment, if any.
    pub configured_secret: Option<&'a str>,
    /// Secret presented in the current request's headers, if any.
    pub presented_secret: Option<&'a str>,
}

/// Outcome of an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(AllowReason),
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

/// Which precedence layer granted access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    ServiceBypass,
    Superuser,
    ExplicitGrant,
    ExemptMethod,
}

/// Decide whether the request is allowed. Layers short-circuit; they are
/// never merged or aggregated.
pub fn authorize(request: &AccessRequest<'_>) -> Decision {
    if let (Some(configured), Some(presented)) =
        (request.configured_secret, request.presented_secret)
        && configured == presented
    {
        return Decision::Allow(AllowReason::ServiceBypass);
    }

    if let Some(identity) = request.identity {
        if identity.user_type == UserType::ChiefAdmin {
            return Decision::Allow(AllowReason::Superuser);
        }

        if let Some(document) = identity.permissions.get(request.module) {
            for submodule in request.submodules {
                // Missing submodule keys mean "no grant", not an error.
                let Some(leaf) = document.submodule(submodule) else {
                    continue;
                };
                if leaf
                    .methods_for(request.endpoint)
                    .contains(&request.method.as_str())
                {
                    return Decision::Allow(AllowReason::ExplicitGrant);
                }
            }
        }
    }

    // Exemption is global to the call, not per-submodule, and applies even
    // when the route requires no submodules at all.
    if request.exempt_methods.contains(request.method) {
        return Decision::Allow(AllowReason::ExemptMethod);
    }

    Decision::Deny
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PermissionDocument;
    use serde_json::json;

    fn identity_with(user_type: UserType, document: serde_json::Value) -> Identity {
        let mut identity = Identity::new(
            "u123456789".to_string(),
            "Test User".to_string(),
            user_type,
        );
        let document: PermissionDocument = serde_json::from_value(document).unwrap();
        identity.permissions.insert("USER".to_string(), document);
        identity
    }

    fn request<'a>(
        identity: Option<&'a Identity>,
        submodules: &'a [String],
        method: &'a Method,
    ) -> AccessRequest<'a> {
        AccessRequest {
            identity,
            module: "USER",
            submodules,
            endpoint: "entity_permissions",
            method,
            exempt_methods: &[],
            configured_secret: None,
            presented_secret: None,
        }
    }

    #[test]
    fn test_service_secret_allows_anonymous_caller() {
        let mut req = request(None, &[], &Method::DELETE);
        req.configured_secret = Some("shared-secret");
        req.presented_secret = Some("shared-secret");
        assert_eq!(authorize(&req), Decision::Allow(AllowReason::ServiceBypass));
    }

    #[test]
    fn test_mismatched_secret_does_not_bypass() {
        let mut req = request(None, &[], &Method::GET);
        req.configured_secret = Some("shared-secret");
        req.presented_secret = Some("wrong");
        assert_eq!(authorize(&req), Decision::Deny);
    }

    #[test]
    fn test_presented_secret_without_configuration_is_ignored() {
        let mut req = request(None, &[], &Method::GET);
        req.presented_secret = Some("anything");
        assert_eq!(authorize(&req), Decision::Deny);
    }

    #[test]
    fn test_chief_admin_is_always_allowed() {
        let identity = identity_with(UserType::ChiefAdmin, json!({}));
        let submodules = vec!["anything".to_string()];
        for method in [Method::GET, Method::POST, Method::DELETE, Method::PATCH] {
            let req = request(Some(&identity), &submodules, &method);
            assert_eq!(authorize(&req), Decision::Allow(AllowReason::Superuser));
        }
    }

    #[test]
    fn test_explicit_grant_allows_matching_method() {
        let identity = identity_with(
            UserType::User,
            json!({"permissions": {"read": {"entity_permissions": ["POST"]}}}),
        );
        let submodules = vec!["permissions".to_string()];

        let req = request(Some(&identity), &submodules, &Method::POST);
        assert_eq!(authorize(&req), Decision::Allow(AllowReason::ExplicitGrant));

        let req = request(Some(&identity), &submodules, &Method::DELETE);
        assert_eq!(authorize(&req), Decision::Deny);
    }

    #[test]
    fn test_write_side_grants_count() {
        let identity = identity_with(
            UserType::User,
            json!({"permissions": {"write": {"entity_permissions": ["PATCH"]}}}),
        );
        let submodules = vec!["permissions".to_string()];
        let req = request(Some(&identity), &submodules, &Method::PATCH);
        assert_eq!(authorize(&req), Decision::Allow(AllowReason::ExplicitGrant));
    }

    #[test]
    fn test_grant_is_scoped_to_endpoint() {
        let identity = identity_with(
            UserType::User,
            json!({"permissions": {"read": {"other_endpoint": ["POST"]}}}),
        );
        let submodules = vec!["permissions".to_string()];
        let req = request(Some(&identity), &submodules, &Method::POST);
        assert_eq!(authorize(&req), Decision::Deny);
    }

    #[test]
    fn test_any_required_submodule_suffices() {
        let identity = identity_with(
            UserType::User,
            json!({"reports": {"read": {"entity_permissions": ["GET"]}}}),
        );
        let submodules = vec!["permissions".to_string(), "reports".to_string()];
        let req = request(Some(&identity), &submodules, &Method::GET);
        assert_eq!(authorize(&req), Decision::Allow(AllowReason::ExplicitGrant));
    }

    #[test]
    fn test_missing_module_key_means_no_grant() {
        let mut identity = identity_with(UserType::User, json!({}));
        identity.permissions.clear();
        let submodules = vec!["permissions".to_string()];
        let req = request(Some(&identity), &submodules, &Method::GET);
        assert_eq!(authorize(&req), Decision::Deny);
    }

    #[test]
    fn test_exempt_method_allows_without_grant() {
        let identity = identity_with(UserType::User, json!({}));
        let submodules = vec!["permissions".to_string()];
        let mut req = request(Some(&identity), &submodules, &Method::GET);
        let exempt = [Method::GET];
        req.exempt_methods = &exempt;
        assert_eq!(authorize(&req), Decision::Allow(AllowReason::ExemptMethod));
    }

    #[test]
    fn test_exemption_applies_with_empty_submodules() {
        let mut req = request(None, &[], &Method::OPTIONS);
        let exempt = [Method::OPTIONS];
        req.exempt_methods = &exempt;
        assert_eq!(authorize(&req), Decision::Allow(AllowReason::ExemptMethod));
    }

    #[test]
    fn test_empty_submodules_deny_by_default() {
        let identity = identity_with(
            UserType::User,
            json!({"permissions": {"read": {"entity_permissions": ["GET"]}}}),
        );
        let req = request(Some(&identity), &[], &Method::GET);
        assert_eq!(authorize(&req), Decision::Deny);
    }

    #[test]
    fn test_anonymous_caller_without_bypass_is_denied() {
        let submodules = vec!["permissions".to_string()];
        let req = request(None, &submodules, &Method::GET);
        assert_eq!(authorize(&req), Decision::Deny);
    }

    #[test]
    fn test_service_bypass_wins_over_grant_lookup() {
        // An identity with no grants still passes when the secret matches.
        let identity = identity_with(UserType::User, json!({}));
        let submodules = vec!["permissions".to_string()];
        let mut req = request(Some(&identity), &submodules, &Method::DELETE);
        req.configured_secret = Some("s");
        req.presented_secret = Some("s");
        assert_eq!(authorize(&req), Decision::Allow(AllowReason::ServiceBypass));
    }
}
