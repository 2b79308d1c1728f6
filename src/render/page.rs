/// Page rendering with handlebars
///
/// Builds a `PageView` from the session and renders the single-page form.
/// Handlebars HTML-escapes every value, so pasted workflow text and service
/// responses are safe to echo back.

use crate::{
    config::DisplayConfig,
    render::json::truncate,
    session::types::{DisplayMode, InputSource, Session, StatusMessage},
};
use anyhow::Result;
use handlebars::Handlebars;
use serde::Serialize;

const PAGE_TEMPLATE_NAME: &str = "page";
const PAGE_TEMPLATE: &str = include_str!("page.hbs");

/// File name offered for the full-result download
pub const DOWNLOAD_FILE_NAME: &str = "positioned_workflow.json";
/// Shown in the results pane before anything was positioned
pub const EMPTY_RESULT_MESSAGE: &str =
    "Paste a valid workflow JSON on the left to see the positioned result here.";

/// Everything the page template reads
#[derive(Debug, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub tool_name: &'static str,
    pub status: Option<StatusMessage>,
    /// Refills the textarea with the last pasted text
    pub paste_text: String,
    pub upload_name: Option<String>,
    pub mode: DisplayMode,
    pub mode_toggle_label: &'static str,
    pub result: Option<ResultView>,
    pub empty_message: &'static str,
    pub download_name: &'static str,
}

/// The results pane in either mode
#[derive(Debug, Serialize)]
pub struct ResultView {
    /// Preview mode: truncated input and result
    pub preview: bool,
    pub input_preview: String,
    pub result_preview: String,
    pub input_chars: usize,
    pub result_chars: usize,
    /// Full mode: complete pretty-printed result, empty in preview
    pub full: String,
    /// Full mode above the inline threshold: render inside `<details>`
    pub collapsed: bool,
}

impl PageView {
    pub fn from_session(session: &Session, display: &DisplayConfig) -> Self {
        let mode = session.effective_mode(display.inline_threshold_chars);
        let result = session.result.as_ref().map(|positioned| {
            let result_chars = positioned.pretty.chars().count();
            let preview = mode == DisplayMode::Preview;
            ResultView {
                preview,
                input_preview: if preview {
                    truncate(&positioned.input, display.preview_chars).into_owned()
                } else {
                    String::new()
                },
                result_preview: if preview {
                    truncate(&positioned.pretty, display.preview_chars).into_owned()
                } else {
                    String::new()
                },
                input_chars: positioned.input.chars().count(),
                result_chars,
                full: if preview { String::new() } else { positioned.pretty.clone() },
                collapsed: !preview && result_chars > display.inline_threshold_chars,
            }
        });

        Self {
            title: "n8n Tools",
            tool_name: "Magic Workflow Positioning",
            status: session.status.clone(),
            paste_text: session
                .tracker(InputSource::Paste)
                .last_received
                .clone()
                .unwrap_or_default(),
            upload_name: session.upload_name.clone(),
            mode,
            mode_toggle_label: match mode {
                DisplayMode::Preview => "Show full result",
                DisplayMode::Full => "Show preview",
            },
            result,
            empty_message: EMPTY_RESULT_MESSAGE,
            download_name: DOWNLOAD_FILE_NAME,
        }
    }
}

/// Compiled page template
#[derive(Debug)]
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
}

impl PageRenderer {
    /// Compile the embedded template; fails only on template syntax errors
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)
            .map_err(|e| anyhow::anyhow!("Failed to compile page template: {}", e))?;
        Ok(Self { handlebars })
    }

    /// Render the page for one session
    pub fn render(&self, session: &Session, display: &DisplayConfig) -> Result<String> {
        let view = PageView::from_session(session, display);
        let html = self
            .handlebars
            .render(PAGE_TEMPLATE_NAME, &view)
            .map_err(|e| anyhow::anyhow!("Failed to render page: {}", e))?;
        Ok(html)
    }
}
