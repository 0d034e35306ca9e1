//! Permission set models and document validation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Allowed methods for one side (read or write) of a submodule grant,
/// keyed by endpoint name.
pub type EndpointMethods = HashMap<String, Vec<String>>;

/// Leaf grant inside a permission document. At least one of `read` or
/// `write` must be present; unknown keys are ignored on decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LeafPermissions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<EndpointMethods>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<EndpointMethods>,
}

impl LeafPermissions {
    /// Collect the union of read and write methods granted for an endpoint.
    pub fn methods_for(&self, endpoint: &str) -> Vec<&str> {
        let mut methods = Vec::new();
        for side in [&self.read, &self.write].into_iter().flatten() {
            if let Some(allowed) = side.get(endpoint) {
                methods.extend(allowed.iter().map(String::as_str));
            }
        }
        methods
    }
}

/// Permission document body: submodule name -> leaf grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PermissionDocument(pub HashMap<String, LeafPermissions>);

impl PermissionDocument {
    /// Look up the grant for a submodule, if any.
    pub fn submodule(&self, name: &str) -> Option<&LeafPermissions> {
        self.0.get(name)
    }

    /// Domain validation: the document must be non-empty and every leaf
    /// must carry at least one of read or write.
    pub fn validate(&self) -> Result<(), String> {
        if self.0.is_empty() {
            return Err("permission set cannot be empty".to_string());
        }
        for (submodule, leaf) in &self.0 {
            if leaf.read.is_none() && leaf.write.is_none() {
                return Err(format!(
                    "either one of read or write permission must be present for submodule '{submodule}'"
                ));
            }
        }
        Ok(())
    }
}

/// A stored permission set, as returned to API consumers.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionSetRecord {
    pub permission_id: String,
    pub permission_name: String,
    pub permission_json: PermissionDocument,
}

/// Query parameters for fetching an entity's permission sets.
#[derive(Debug, Deserialize)]
pub struct GetEntityPermissions {
    pub entity_id: String,
}

/// Request payload for creating an entity-scoped permission set.
#[derive(Debug, Deserialize)]
pub struct CreatePermissionSet {
    pub entity_id: String,
    pub permission_name: String,
    pub permissions: PermissionDocument,
}

impl CreatePermissionSet {
    pub fn validate(&self) -> Result<(), String> {
        crate::validation::validate_entity_id(&self.entity_id)?;
        if self.permission_name.is_empty() {
            return Err("permission name is required".to_string());
        }
        self.permissions.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_decodes_endpoint_methods() {
        let doc: PermissionDocument = serde_json::from_value(json!({
            "permissions": {"read": {"entity_permissions": ["POST"]}}
        }))
        .unwrap();

        let leaf = doc.submodule("permissions").unwrap();
        assert_eq!(leaf.methods_for("entity_permissions"), vec!["POST"]);
        assert!(leaf.methods_for("other_endpoint").is_empty());
    }

    #[test]
    fn test_methods_for_unions_read_and_write() {
        let doc: PermissionDocument = serde_json::from_value(json!({
            "users": {
                "read": {"entity_users": ["GET"]},
                "write": {"entity_users": ["POST", "PATCH"]}
            }
        }))
        .unwrap();

        let methods = doc.submodule("users").unwrap().methods_for("entity_users");
        assert_eq!(methods, vec!["GET", "POST", "PATCH"]);
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let doc = PermissionDocument::default();
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_leaf_without_read_or_write_is_rejected() {
        let doc: PermissionDocument =
            serde_json::from_value(json!({"permissions": {}})).unwrap();
        assert!(doc.validate().is_err());
    }

    #[test]
    fn test_unknown_leaf_keys_are_ignored() {
        let doc: PermissionDocument = serde_json::from_value(json!({
            "permissions": {"read": {"entity": ["GET"]}, "admin": true}
        }))
        .unwrap();
        assert!(doc.validate().is_ok());
    }
}
