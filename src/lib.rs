/// n8n-tools: Magic Workflow Positioning
///
/// A single-page form that forwards an n8n workflow to a remote positioning
/// webhook and shows, copies or downloads the positioned result.

// Core configuration and setup
pub mod config;

// Remote positioning service client
pub mod positioning;

// Per-browser session state, change detection and submission handling
pub mod session;

// Handlebars page rendering and JSON text helpers
pub mod render;

// HTTP API layer - form page and one endpoint per user action
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use positioning::{HttpPositioningClient, PositioningClient, PositioningError};
pub use server::{create_app, start_server};
pub use session::{Session, SessionRegistry, SubmitError, WorkflowSubmitter};
