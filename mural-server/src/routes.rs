//! HTTP handlers for the paint protocol.
//!
//! ## Endpoints
//!
//! - `POST /paint/update` - submit one stroke (form fields `u`, `s`,
//!   `c`, `l`); always `200` with an empty body unless rasterization
//!   itself fails.
//! - `GET /paint/updates?u=<user>&i=<cursor>` - long-lived plain-text
//!   stream of diff lines, polled on a fixed interval.
//! - `GET /canvas.png` - the current canvas, encoded from memory.
//! - `GET /status` - board counters as JSON.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use mural_raster::scan_decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::board::BoardStatus;
use crate::{health, AppState};

/// Interval between differential polls on a live update stream.
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Length of the padding run that defeats proxy buffering on stream open.
const STREAM_PRELUDE_PADDING: usize = 2048;

/// Form payload of a stroke submission. Field names are the wire names.
#[derive(Debug, Deserialize)]
pub struct StrokeForm {
    /// User id, permissive decimal.
    #[serde(default)]
    u: String,
    /// Brush diameter, permissive decimal.
    #[serde(default)]
    s: String,
    /// Color hex, echoed verbatim.
    #[serde(default)]
    c: String,
    /// Polyline text.
    #[serde(default)]
    l: String,
}

/// Query parameters of an update stream request.
#[derive(Debug, Deserialize)]
pub struct PollQuery {
    /// User id, permissive decimal.
    #[serde(default)]
    u: String,
    /// Last seen update id, permissive decimal.
    #[serde(default)]
    i: String,
}

/// Build the paint protocol router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/paint/update", post(submit_update))
        .route("/paint/updates", get(stream_updates))
        .route("/canvas.png", get(canvas_png))
        .route("/status", get(status))
        .route("/health", get(health::liveness))
        .route("/ready", get(health::readiness))
        .with_state(state)
}

/// Accept one stroke submission.
///
/// Malformed strokes are swallowed (still `200`, empty body) so a
/// buggy client cannot disturb the shared session; only a failure to
/// rasterize an accepted stroke surfaces as a server error.
#[tracing::instrument(name = "submit_update", skip(state, form))]
pub async fn submit_update(State(state): State<AppState>, Form(form): Form<StrokeForm>) -> Response {
    let user = scan_decimal::<u32>(&form.u);
    let size = scan_decimal::<u32>(&form.s);

    match state.board.submit_stroke(user, size, &form.c, &form.l) {
        Ok(Some(id)) => tracing::debug!(user, id, "stroke accepted"),
        Ok(None) => tracing::debug!(user, "stroke rejected"),
        Err(err) => {
            tracing::error!(user, %err, "stroke rasterization failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    StatusCode::OK.into_response()
}

/// Stream differential updates to one polling session.
///
/// Emits the anti-buffering prelude, then polls the board every
/// [`POLL_INTERVAL`], writing a chunk only when there is something to
/// say. The session count is held by a guard owned by the stream, so
/// client disconnects end the session exactly once.
#[tracing::instrument(name = "stream_updates", skip(state, query))]
pub async fn stream_updates(
    State(state): State<AppState>,
    Query(query): Query<PollQuery>,
) -> Response {
    let user = scan_decimal::<u32>(&query.u);
    let mut cursor = scan_decimal::<u64>(&query.i);
    let session = Uuid::new_v4();
    tracing::info!(%session, user, cursor, "update stream opened");

    let board = state.board.clone();
    let stream = async_stream::stream! {
        let _guard = board.begin_session();
        let mut last_users = 0u32;

        let mut prelude = String::with_capacity(STREAM_PRELUDE_PADDING + 4);
        prelude.push_str("hi:");
        for _ in 0..STREAM_PRELUDE_PADDING {
            prelude.push('z');
        }
        prelude.push('\n');
        yield Ok::<_, Infallible>(prelude.into_bytes());

        // First tick fires immediately, so a fresh session learns the
        // user count without waiting an interval.
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        loop {
            ticker.tick().await;
            let reply = board.poll_updates(user, cursor);
            cursor = reply.cursor;
            let chunk = reply.render(last_users);
            last_users = reply.users;
            if !chunk.is_empty() {
                yield Ok(chunk.into_bytes());
            }
        }
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Serve the current canvas as PNG.
#[tracing::instrument(name = "canvas_png", skip(state))]
pub async fn canvas_png(State(state): State<AppState>) -> Response {
    match state.board.canvas_png() {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(%err, "canvas encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Board counters as JSON.
#[tracing::instrument(name = "status", skip(state))]
pub async fn status(State(state): State<AppState>) -> Json<BoardStatus> {
    Json(state.board.status())
}
