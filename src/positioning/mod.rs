/// Remote positioning service access
///
/// The positioning algorithm lives in an external webhook. This module only
/// knows how to hand it a workflow and read back the positioned result.

// Typed failures of the remote call
pub mod error;

// reqwest-backed client and the trait the submitter depends on
pub mod client;

pub use client::{HttpPositioningClient, PositioningClient};
pub use error::PositioningError;
