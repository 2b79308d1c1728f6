/// n8n-tools: Magic Workflow Positioning
///
/// Main entry point. Loads configuration from the environment and starts the
/// HTTP server.

use n8n_tools::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - The positioning form at /
/// - Form actions at /submit, /upload, /mode, /reset and /download
/// - Session snapshot at /api/session
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3004, overridable through N8N_TOOLS_* variables)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
