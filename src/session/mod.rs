/// Session Layer
///
/// Holds the per-browser state of the positioning form and the logic that
/// updates it:
/// - Session state types and the per-source state machine
/// - Submission handling with change detection
/// - Lock-free registry of live sessions

// Session state, display mode and status types
pub mod types;

// Typed submission failures and their user-visible messages
pub mod error;

// Validation, change detection and the remote call
pub mod submitter;

// Live sessions keyed by cookie id
pub mod registry;

pub use error::SubmitError;
pub use registry::{SessionHandle, SessionId, SessionRegistry};
pub use submitter::{SubmitOutcome, WorkflowSubmitter};
pub use types::{DisplayMode, InputSource, Session, SessionSnapshot, SourceState};
