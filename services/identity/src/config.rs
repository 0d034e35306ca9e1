//! Service configuration from environment variables

use anyhow::Result;

/// Header carrying the authentication token on authenticated routes.
pub const AUTH_TOKEN_HEADER: &str = "authenticationtoken";

/// Header carrying the shared service secret for internal calls.
pub const SERVICE_SECRET_HEADER: &str = "rpc-secret-key";

/// Runtime configuration for the identity service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Route prefix all endpoints are nested under (may be empty)
    pub base_route: String,
    /// Module this deployment governs in permission documents
    pub module_name: String,
    /// Shared secret for the service bypass; unset disables it
    pub rpc_secret_key: Option<String>,
    /// Authentication token time-to-live in seconds; unset means tokens
    /// never expire (single-session rotation still applies)
    pub token_ttl_seconds: Option<u64>,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: listen address (default: "0.0.0.0:3000")
    /// - `BASE_ROUTE`: route prefix (default: empty)
    /// - `MODULE_NAME`: governed module name (default: "USER")
    /// - `RPC_SECRET_KEY`: shared service secret (optional)
    /// - `TOKEN_TTL_SECONDS`: token time-to-live (optional)
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let base_route = normalize_base_route(&std::env::var("BASE_ROUTE").unwrap_or_default());
        let module_name = std::env::var("MODULE_NAME").unwrap_or_else(|_| "USER".to_string());
        let rpc_secret_key = std::env::var("RPC_SECRET_KEY").ok().filter(|s| !s.is_empty());

        let token_ttl_seconds = match std::env::var("TOKEN_TTL_SECONDS") {
            Ok(raw) => Some(
                raw.parse()
                    .map_err(|_| anyhow::anyhow!("TOKEN_TTL_SECONDS must be a positive integer"))?,
            ),
            Err(_) => None,
        };

        Ok(AppConfig {
            bind_addr,
            base_route,
            module_name,
            rpc_secret_key,
            token_ttl_seconds,
        })
    }
}

/// Normalize a route prefix into the "/segment" shape nesting expects.
/// Accepts values with or without a leading slash and drops trailing
/// slashes; a bare "/" or empty value means no prefix at all.
fn normalize_base_route(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
