/// Configuration management for n8n-tools
///
/// Handles server binding, the remote positioning endpoint, display limits and
/// session lifetime. Every value can be overridden through an environment variable.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default remote endpoint computing node positions
pub const DEFAULT_POSITIONING_URL: &str = "https://api.example.org/webhook/workflow/magic/position";

/// Characters shown in preview mode unless configured otherwise
pub const DEFAULT_PREVIEW_CHARS: usize = 1000;
/// Inline rendering limit unless configured otherwise
pub const DEFAULT_INLINE_THRESHOLD_CHARS: usize = 50_000;
/// Session idle time unless configured otherwise
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
/// Upper bound on the session idle time (ten years)
pub const MAX_SESSION_TTL_SECS: u64 = 10 * 365 * 24 * 3600;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Remote positioning service
    pub positioning: PositioningConfig,
    /// Rendering limits for the results pane
    pub display: DisplayConfig,
    /// Session lifetime
    pub session: SessionConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
    /// Largest accepted request body (pasted text or uploaded file)
    pub max_body_bytes: usize,
}

/// Remote positioning service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositioningConfig {
    /// Endpoint receiving `{"workflow": ...}` POSTs
    pub url: String,
    /// Request timeout in seconds. Calls are never retried.
    pub timeout_secs: u64,
}

/// Rendering limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Characters shown in preview mode before the continuation marker
    pub preview_chars: usize,
    /// Pretty-printed results longer than this are collapsed behind a `<details>` section
    pub inline_threshold_chars: usize,
}

/// Session lifetime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which a session is dropped
    pub ttl_secs: u64,
    /// How often the sweeper looks for idle sessions
    pub sweep_interval_secs: u64,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("N8N_TOOLS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_or("N8N_TOOLS_PORT", 3004),
                max_body_bytes: env_or("N8N_TOOLS_MAX_BODY_BYTES", 16 * 1024 * 1024),
            },
            positioning: PositioningConfig {
                url: std::env::var("N8N_TOOLS_POSITIONING_URL")
                    .unwrap_or_else(|_| DEFAULT_POSITIONING_URL.to_string()),
                timeout_secs: env_or("N8N_TOOLS_POSITIONING_TIMEOUT_SECS", 30),
            },
            display: DisplayConfig::from_env(),
            session: SessionConfig {
                ttl_secs: env_or("N8N_TOOLS_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS),
                sweep_interval_secs: env_or("N8N_TOOLS_SWEEP_INTERVAL_SECS", 60),
            },
        }
    }
}

impl SessionConfig {
    /// Idle time as a chrono duration, clamped to `MAX_SESSION_TTL_SECS`
    pub fn ttl(&self) -> chrono::Duration {
        let secs = self.ttl_secs.min(MAX_SESSION_TTL_SECS);
        if secs < self.ttl_secs {
            tracing::warn!("Session TTL of {}s clamped to {}s", self.ttl_secs, secs);
        }
        // Bounded by MAX_SESSION_TTL_SECS, well inside chrono's range
        chrono::Duration::seconds(secs as i64)
    }
}

impl DisplayConfig {
    fn from_env() -> Self {
        Self {
            preview_chars: env_or("N8N_TOOLS_PREVIEW_CHARS", DEFAULT_PREVIEW_CHARS),
            inline_threshold_chars: env_or("N8N_TOOLS_INLINE_THRESHOLD", DEFAULT_INLINE_THRESHOLD_CHARS),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
            inline_threshold_chars: DEFAULT_INLINE_THRESHOLD_CHARS,
        }
    }
}

/// Read and parse an environment variable, falling back on absence or parse failure
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
