use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub gateway: GatewayConfig,
    pub routes: RouteConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Connection settings for the hosted backend. Empty strings mean "not configured";
/// the gateway reports that per call instead of refusing to start.
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub url: String,
    pub anon_key: String,
    pub service_key: Option<String>,
    pub blob_api_url: String,
    pub blob_token: String,
    pub timeout_secs: Option<u64>,
}

// Keys stay out of logs.
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url)
            .field("anon_key", &redacted(&self.anon_key))
            .field("service_key", &self.service_key.as_deref().map(redacted))
            .field("blob_api_url", &self.blob_api_url)
            .field("blob_token", &redacted(&self.blob_token))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() { "<unset>" } else { "<redacted>" }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Where the landing gate sends callers with a valid session
    pub home_path: String,
    /// Where the landing gate sends everyone else
    pub login_path: String,
    /// Cookie holding the access token when no Authorization header is sent
    pub session_cookie: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingFailurePolicy {
    /// Answer 200 with an empty array; callers cannot tell an outage from zero rows
    Empty,
    /// Answer 502 with a generic error body
    Error,
}

impl ListingFailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "empty" => Some(ListingFailurePolicy::Empty),
            "error" => Some(ListingFailurePolicy::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    pub listing_failure_policy: ListingFailurePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Gateway connection
        if let Ok(v) = env::var("GATEWAY_URL") {
            self.gateway.url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("GATEWAY_ANON_KEY") {
            self.gateway.anon_key = v;
        }
        if let Ok(v) = env::var("GATEWAY_SERVICE_KEY") {
            self.gateway.service_key = Some(v).filter(|k| !k.is_empty());
        }
        if let Ok(v) = env::var("BLOB_API_URL") {
            self.gateway.blob_api_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("BLOB_READ_WRITE_TOKEN") {
            self.gateway.blob_token = v;
        }
        if let Ok(v) = env::var("GATEWAY_TIMEOUT_SECS") {
            self.gateway.timeout_secs = v.parse().ok();
        }

        // Route overrides
        if let Ok(v) = env::var("ROUTES_HOME_PATH") {
            self.routes.home_path = v;
        }
        if let Ok(v) = env::var("ROUTES_LOGIN_PATH") {
            self.routes.login_path = v;
        }
        if let Ok(v) = env::var("ROUTES_SESSION_COOKIE") {
            self.routes.session_cookie = v;
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("LISTING_FAILURE_POLICY") {
            match ListingFailurePolicy::parse(&v) {
                Some(policy) => self.api.listing_failure_policy = policy,
                None => tracing::warn!("Ignoring unknown LISTING_FAILURE_POLICY '{}'", v),
            }
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn gateway_defaults() -> GatewayConfig {
        GatewayConfig {
            url: String::new(),
            anon_key: String::new(),
            service_key: None,
            blob_api_url: "https://blob.vercel-storage.com".to_string(),
            blob_token: String::new(),
            timeout_secs: None,
        }
    }

    fn route_defaults() -> RouteConfig {
        RouteConfig {
            home_path: "/dashboard".to_string(),
            login_path: "/login".to_string(),
            session_cookie: "sb-access-token".to_string(),
        }
    }

    pub(crate) fn development() -> Self {
        Self {
            environment: Environment::Development,
            gateway: Self::gateway_defaults(),
            routes: Self::route_defaults(),
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                listing_failure_policy: ListingFailurePolicy::Empty,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            gateway: Self::gateway_defaults(),
            routes: Self::route_defaults(),
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 25 * 1024 * 1024, // 25MB
                listing_failure_policy: ListingFailurePolicy::Empty,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            gateway: Self::gateway_defaults(),
            routes: Self::route_defaults(),
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 25 * 1024 * 1024, // 25MB
                listing_failure_policy: ListingFailurePolicy::Empty,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
