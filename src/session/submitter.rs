/// Workflow submitter
///
/// Turns one user action (paste or upload) into at most one call to the
/// positioning service. Validates the text, skips the call when the source
/// already positioned the exact same text, and only replaces the stored result
/// on success.

use crate::{
    positioning::PositioningClient,
    render::json::pretty,
    session::{
        error::SubmitError,
        types::{InputSource, PositionedWorkflow, Session, SourceState, StatusMessage},
    },
};
use serde_json::Value;
use std::{sync::Arc, time::Instant};

/// Message shown when a submission had nothing in it
pub const EMPTY_INPUT_MESSAGE: &str = "Paste a workflow or upload a .json file to get started.";
/// Message shown after a successful positioning call
pub const SUCCESS_MESSAGE: &str = "✅ Workflow positioned successfully!";
/// Message shown when the input matches what was already positioned and is on display
pub const UNCHANGED_MESSAGE: &str = "Workflow unchanged - showing the previous result.";
/// Message shown when the input was already positioned but another source produced the result on display
pub const UNCHANGED_OTHER_SOURCE_MESSAGE: &str =
    "Workflow unchanged since it was last positioned - the result shown comes from your other input.";

/// Result of a submission that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to submit; no call was made
    Empty,
    /// Same text as the last successful submission from this source; no call was made
    Unchanged,
    /// The service positioned the workflow and the session holds the new result
    Positioned,
}

/// Drives the per-source state machine against a positioning service
#[derive(Clone)]
pub struct WorkflowSubmitter {
    client: Arc<dyn PositioningClient>,
}

impl WorkflowSubmitter {
    pub fn new(client: Arc<dyn PositioningClient>) -> Self {
        Self { client }
    }

    /// Submit workflow text from `source`.
    ///
    /// The session's status message is always updated. On error the stored
    /// result is left exactly as it was.
    pub async fn submit(
        &self,
        session: &mut Session,
        source: InputSource,
        text: &str,
    ) -> Result<SubmitOutcome, SubmitError> {
        tracing::info!("📥 {} submission received ({} bytes)", source.as_str(), text.len());
        session.touch();

        if text.trim().is_empty() {
            let tracker = session.tracker_mut(source);
            tracker.last_received = None;
            if tracker.last_submitted.is_none() {
                tracker.state = SourceState::Empty;
            }
            session.status = Some(StatusMessage::info(EMPTY_INPUT_MESSAGE));
            return Ok(SubmitOutcome::Empty);
        }

        let tracker = session.tracker_mut(source);
        tracker.last_received = Some(text.to_string());

        if tracker.last_submitted.as_deref() == Some(text) {
            tracing::debug!("♻️ {} input unchanged, skipping positioning call", source.as_str());
            tracker.state = SourceState::Idle;
            let on_display = session
                .result
                .as_ref()
                .is_some_and(|result| result.source == source && result.input == text);
            session.status = Some(StatusMessage::info(if on_display {
                UNCHANGED_MESSAGE
            } else {
                UNCHANGED_OTHER_SOURCE_MESSAGE
            }));
            return Ok(SubmitOutcome::Unchanged);
        }

        tracker.state = SourceState::Validating;
        let workflow = match serde_json::from_str::<Value>(text) {
            Ok(workflow) => {
                tracker.last_invalid = None;
                workflow
            }
            Err(e) => {
                if tracker.last_invalid.as_deref() == Some(text) {
                    tracing::debug!("{} input still invalid", source.as_str());
                } else {
                    tracing::warn!("❌ Invalid JSON from {}: {}", source.as_str(), e);
                }
                tracker.last_invalid = Some(text.to_string());
                tracker.state = SourceState::Invalid;
                let error = SubmitError::InvalidJson(e);
                session.status = Some(StatusMessage::error(error.user_message()));
                return Err(error);
            }
        };

        tracker.state = SourceState::Calling;
        tracing::debug!("🚀 Sending {} workflow to positioning service", source.as_str());
        let started = Instant::now();
        let response = self.client.position(&workflow).await;
        let tracker = session.tracker_mut(source);
        tracker.state = SourceState::Idle;

        match response {
            Ok(value) => {
                tracker.last_submitted = Some(text.to_string());
                session.result = Some(PositionedWorkflow {
                    pretty: pretty(&value),
                    value,
                    input: text.to_string(),
                    source,
                    positioned_at: chrono::Utc::now(),
                });
                session.status = Some(StatusMessage::success(SUCCESS_MESSAGE));
                tracing::info!(
                    "🎉 {} workflow positioned in {:?}",
                    source.as_str(),
                    started.elapsed()
                );
                Ok(SubmitOutcome::Positioned)
            }
            Err(e) => {
                tracing::error!(
                    "❌ Positioning failed for {} input after {:?} - Error: {}",
                    source.as_str(),
                    started.elapsed(),
                    e
                );
                let error = SubmitError::Api(e);
                session.status = Some(StatusMessage::error(error.user_message()));
                Err(error)
            }
        }
    }

    /// Record a request body that never became workflow text.
    ///
    /// No call is made and the stored result is untouched.
    pub fn reject_unreadable(
        &self,
        session: &mut Session,
        source: InputSource,
        reason: impl std::fmt::Display,
    ) -> SubmitError {
        tracing::warn!("❌ Unreadable {} input: {}", source.as_str(), reason);
        session.touch();
        session.tracker_mut(source).state = SourceState::Invalid;
        let error = SubmitError::Unreadable(reason.to_string());
        session.status = Some(StatusMessage::error(error.user_message()));
        error
    }

    /// Submit the raw bytes of an uploaded file.
    ///
    /// Bytes must be UTF-8; a leading byte-order mark is dropped.
    pub async fn submit_file(
        &self,
        session: &mut Session,
        file_name: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<SubmitOutcome, SubmitError> {
        if file_name.is_some() {
            session.upload_name = file_name;
        }

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("❌ Uploaded file is not UTF-8: {}", e);
                session.touch();
                let tracker = session.tracker_mut(InputSource::Upload);
                tracker.state = SourceState::Invalid;
                tracker.last_received = None;
                let error = SubmitError::NotUtf8(e);
                session.status = Some(StatusMessage::error(error.user_message()));
                return Err(error);
            }
        };

        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
        self.submit(session, InputSource::Upload, text).await
    }
}
