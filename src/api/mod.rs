/// HTTP API Layer
///
/// Serves the single-page positioning form. It handles:
/// - Page rendering for the current session
/// - One handler per user action (paste, upload, mode toggle, reset)
/// - Download of the full result and a JSON session snapshot

// Form pages and action handlers
pub mod routes;

// Session cookie parsing and issuing
pub mod cookie;

pub use routes::{create_routes, AppState};
