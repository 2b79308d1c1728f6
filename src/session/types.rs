/// Per-session state for the positioning form
///
/// A session holds everything one browser needs between requests: the
/// change-detection markers of each input source, the last successful result,
/// the display mode and the latest status message. Nothing here outlives the
/// session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Where a submitted workflow text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// Text pasted into the textarea
    Paste,
    /// Decoded contents of an uploaded `.json` file
    Upload,
}

impl InputSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputSource::Paste => "paste",
            InputSource::Upload => "upload",
        }
    }
}

/// How the results pane is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Truncated text plus a download link
    Preview,
    /// Complete pretty-printed JSON with a copy button
    Full,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Preview => DisplayMode::Full,
            DisplayMode::Full => DisplayMode::Preview,
        }
    }
}

/// State machine of one input source
///
/// `Empty -> Validating -> {Invalid, Calling -> Idle}`; any changed input
/// from `Idle` or `Invalid` goes back through `Validating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceState {
    Empty,
    Validating,
    Invalid,
    Calling,
    Idle,
}

/// Change-detection marker and state of one input source
#[derive(Debug, Clone)]
pub struct SourceTracker {
    pub state: SourceState,
    /// Last text received from this source, whatever its outcome
    pub last_received: Option<String>,
    /// Text that was last positioned successfully from this source
    pub last_submitted: Option<String>,
    /// Last text that failed validation, so resubmitting it stays `Invalid`
    pub last_invalid: Option<String>,
}

impl Default for SourceTracker {
    fn default() -> Self {
        Self {
            state: SourceState::Empty,
            last_received: None,
            last_submitted: None,
            last_invalid: None,
        }
    }
}

/// Severity of the message shown above the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// User-visible status line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: StatusLevel::Error, text: text.into() }
    }
}

/// The most recent successfully positioned workflow
#[derive(Debug, Clone)]
pub struct PositionedWorkflow {
    /// Parsed response of the positioning service
    pub value: Value,
    /// `value` pretty-printed with 2-space indentation
    pub pretty: String,
    /// Input text that produced this result
    pub input: String,
    pub source: InputSource,
    pub positioned_at: DateTime<Utc>,
}

/// All state owned by one browser session
#[derive(Debug, Clone)]
pub struct Session {
    pub paste: SourceTracker,
    pub upload: SourceTracker,
    /// Last successful result; never replaced by a failure
    pub result: Option<PositionedWorkflow>,
    /// Mode picked by the user, `None` until the toggle is used
    pub mode_override: Option<DisplayMode>,
    pub status: Option<StatusMessage>,
    /// Name of the last uploaded file, for display only
    pub upload_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            paste: SourceTracker::default(),
            upload: SourceTracker::default(),
            result: None,
            mode_override: None,
            status: None,
            upload_name: None,
            created_at: now,
            last_seen: now,
        }
    }

    pub fn tracker(&self, source: InputSource) -> &SourceTracker {
        match source {
            InputSource::Paste => &self.paste,
            InputSource::Upload => &self.upload,
        }
    }

    pub fn tracker_mut(&mut self, source: InputSource) -> &mut SourceTracker {
        match source {
            InputSource::Paste => &mut self.paste,
            InputSource::Upload => &mut self.upload,
        }
    }

    /// Mode used for rendering.
    ///
    /// The user's toggle wins. Without one, results whose pretty-printed form
    /// exceeds `inline_threshold` start in preview, everything else in full.
    pub fn effective_mode(&self, inline_threshold: usize) -> DisplayMode {
        if let Some(mode) = self.mode_override {
            return mode;
        }
        match &self.result {
            Some(result) if result.pretty.chars().count() > inline_threshold => DisplayMode::Preview,
            _ => DisplayMode::Full,
        }
    }

    /// Flip the display mode relative to what is currently shown
    pub fn toggle_mode(&mut self, inline_threshold: usize) -> DisplayMode {
        let next = self.effective_mode(inline_threshold).toggled();
        self.mode_override = Some(next);
        next
    }

    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON view of a session for `/api/session`
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub paste_state: SourceState,
    pub upload_state: SourceState,
    pub mode: DisplayMode,
    pub status: Option<StatusMessage>,
    pub has_result: bool,
    pub result_source: Option<InputSource>,
    pub result_chars: Option<usize>,
    pub positioned_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    pub fn from_session(session: &Session, inline_threshold: usize) -> Self {
        Self {
            paste_state: session.paste.state,
            upload_state: session.upload.state,
            mode: session.effective_mode(inline_threshold),
            status: session.status.clone(),
            has_result: session.result.is_some(),
            result_source: session.result.as_ref().map(|r| r.source),
            result_chars: session.result.as_ref().map(|r| r.pretty.chars().count()),
            positioned_at: session.result.as_ref().map(|r| r.positioned_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session_with_result(pretty_len: usize) -> Session {
        let mut session = Session::new();
        session.result = Some(PositionedWorkflow {
            value: json!({}),
            pretty: "x".repeat(pretty_len),
            input: "{}".to_string(),
            source: InputSource::Paste,
            positioned_at: Utc::now(),
        });
        session
    }

    #[test]
    fn test_effective_mode_defaults_by_size() {
        assert_eq!(Session::new().effective_mode(10), DisplayMode::Full);
        assert_eq!(session_with_result(10).effective_mode(10), DisplayMode::Full);
        assert_eq!(session_with_result(11).effective_mode(10), DisplayMode::Preview);
    }

    #[test]
    fn test_toggle_overrides_size_policy() {
        let mut session = session_with_result(100);
        assert_eq!(session.toggle_mode(10), DisplayMode::Full);
        assert_eq!(session.effective_mode(10), DisplayMode::Full);
        assert_eq!(session.toggle_mode(10), DisplayMode::Preview);
    }

    #[test]
    fn test_snapshot_reports_result_metadata() {
        let session = session_with_result(42);
        let snapshot = SessionSnapshot::from_session(&session, 50_000);
        assert!(snapshot.has_result);
        assert_eq!(snapshot.result_chars, Some(42));
        assert_eq!(snapshot.paste_state, SourceState::Empty);
    }
}
