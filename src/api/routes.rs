/// Positioning form endpoints
///
/// Every user action has its own handler that updates the session and answers
/// with a 303 redirect to `/`, so the page is rendered once per action and a
/// reload never resubmits a workflow. Status messages are shown on one render
/// only. Bodies that cannot be read become a status message too.

use crate::{
    api::cookie::{expired_session_cookie, session_cookie, session_id_from_headers},
    config::DisplayConfig,
    render::{page::DOWNLOAD_FILE_NAME, PageRenderer},
    session::{
        InputSource, SessionHandle, SessionId, SessionRegistry, SessionSnapshot, WorkflowSubmitter,
    },
};
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::FormRejection,
        Multipart, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Live sessions keyed by cookie id
    pub registry: Arc<SessionRegistry>,
    /// Validation, change detection and the remote call
    pub submitter: WorkflowSubmitter,
    /// Compiled page template
    pub renderer: Arc<PageRenderer>,
    /// Preview and inline limits
    pub display: DisplayConfig,
}

/// Body of the paste form
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub workflow: String,
}

/// Create the positioning form routes
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/submit", post(submit_workflow))
        .route("/upload", post(upload_workflow))
        .route("/mode", post(toggle_mode))
        .route("/download", get(download_result))
        .route("/reset", post(reset_session))
        .route("/api/session", get(session_snapshot))
}

/// Session of the request, created if the cookie is missing or stale
fn resolve_session(state: &AppState, headers: &HeaderMap) -> (SessionId, SessionHandle, bool) {
    state.registry.get_or_create(session_id_from_headers(headers))
}

/// Attach the session cookie when the session was just created
fn with_session_cookie(mut response: Response, id: &SessionId, created: bool) -> Response {
    if created {
        response
            .headers_mut()
            .insert(header::SET_COOKIE, session_cookie(id));
    }
    response
}

/// Render the page
///
/// GET /
async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, StatusCode> {
    let (id, handle, created) = resolve_session(&state, &headers);
    let mut session = handle.lock().await;
    session.touch();

    match state.renderer.render(&session, &state.display) {
        Ok(html) => {
            session.status = None;
            Ok(with_session_cookie(Html(html).into_response(), &id, created))
        }
        Err(e) => {
            tracing::error!("Failed to render page for session {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Submit pasted workflow text
///
/// POST /submit
/// Body: workflow=<urlencoded JSON text>
async fn submit_workflow(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<SubmitForm>, FormRejection>,
) -> Response {
    let (id, handle, created) = resolve_session(&state, &headers);
    let mut session = handle.lock().await;

    match form {
        Ok(Form(form)) => {
            if let Err(e) = state
                .submitter
                .submit(&mut session, InputSource::Paste, &form.workflow)
                .await
            {
                tracing::debug!("Paste submission for session {} rejected: {}", id, e);
            }
        }
        Err(rejection) => {
            state
                .submitter
                .reject_unreadable(&mut session, InputSource::Paste, rejection.body_text());
        }
    }

    with_session_cookie(Redirect::to("/").into_response(), &id, created)
}

/// Submit an uploaded workflow file
///
/// POST /upload
/// Body: multipart/form-data with a `file` part
async fn upload_workflow(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let (id, handle, created) = resolve_session(&state, &headers);

    let upload = match multipart {
        Ok(multipart) => read_file_part(multipart).await,
        Err(rejection) => Err(rejection.body_text()),
    };

    let mut session = handle.lock().await;
    match upload {
        Ok((file_name, bytes)) => {
            // Browsers send an unnamed empty part when no file was picked
            let file_name = file_name.filter(|name| !name.is_empty());
            tracing::debug!("📎 Upload {:?} ({} bytes) for session {}", file_name, bytes.len(), id);
            if let Err(e) = state.submitter.submit_file(&mut session, file_name, bytes).await {
                tracing::debug!("Upload for session {} rejected: {}", id, e);
            }
        }
        Err(reason) => {
            state
                .submitter
                .reject_unreadable(&mut session, InputSource::Upload, reason);
        }
    }

    with_session_cookie(Redirect::to("/").into_response(), &id, created)
}

/// Pull the `file` part out of an upload; a missing part reads as empty
async fn read_file_part(mut multipart: Multipart) -> Result<(Option<String>, Vec<u8>), String> {
    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| e.body_text())?;
        return Ok((file_name, bytes.to_vec()));
    }
    Ok((None, Vec::new()))
}

/// Toggle between preview and full display
///
/// POST /mode
async fn toggle_mode(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (id, handle, created) = resolve_session(&state, &headers);
    let mut session = handle.lock().await;
    session.touch();
    let mode = session.toggle_mode(state.display.inline_threshold_chars);
    tracing::debug!("🔀 Session {} display mode: {:?}", id, mode);

    with_session_cookie(Redirect::to("/").into_response(), &id, created)
}

/// Download the full positioned workflow
///
/// GET /download
/// Returns: positioned_workflow.json as an attachment, 404 when nothing was positioned
async fn download_result(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    let id = session_id_from_headers(&headers).ok_or(StatusCode::NOT_FOUND)?;
    let handle = state.registry.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let mut session = handle.lock().await;
    session.touch();

    let result = session.result.as_ref().ok_or(StatusCode::NOT_FOUND)?;
    let disposition = format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        result.pretty.clone(),
    )
        .into_response())
}

/// End the session and forget its state
///
/// POST /reset
async fn reset_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id_from_headers(&headers) {
        state.registry.remove(&id);
    }

    let mut response = Redirect::to("/").into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, expired_session_cookie());
    response
}

/// JSON snapshot of the current session
///
/// GET /api/session
/// Returns: { "paste_state": "idle", "mode": "full", "has_result": true, ... }
async fn session_snapshot(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (id, handle, created) = resolve_session(&state, &headers);
    let mut session = handle.lock().await;
    session.touch();
    let snapshot = SessionSnapshot::from_session(&session, state.display.inline_threshold_chars);

    with_session_cookie(Json(snapshot).into_response(), &id, created)
}
