//! The shared board: canvas, update log, session count, and snapshot
//! clock behind one lock.
//!
//! Every operation here can be called from any number of concurrent
//! sessions. A single mutex covers all shared state because a stroke
//! rasterization interleaved with a snapshot write, or an append
//! interleaved with a prune, would corrupt ordering and durability
//! guarantees; none of the operations run long enough to need anything
//! finer.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use mural_core::{Canvas, Color, PixelFormat};
use mural_raster::{codec, BrushSet, Painter, RasterError};
use serde::Serialize;
use thiserror::Error;

use crate::log::{UpdateLog, UpdateRecord};
use crate::metrics::{
    record_rasterize_duration, record_snapshot_written, record_stroke_accepted,
    record_stroke_rejected, set_active_sessions,
};
use crate::validation::validate_polyline;

/// Milliseconds between durable canvas snapshots.
pub const SNAPSHOT_INTERVAL_MS: u64 = 15_000;
/// How long the update log retains a stroke once snapshots are current.
pub const RETENTION_MS: u64 = 10_000;

/// Result alias for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors surfaced by board operations.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A stroke could not be rasterized. Its record is already logged
    /// and stays logged; only the canvas mutation was lost.
    #[error("Stroke rasterization failed: {0}")]
    Raster(#[from] RasterError),
    /// The canvas snapshot could not be written.
    #[error("Snapshot write failed: {0}")]
    Snapshot(#[source] RasterError),
}

/// Diff records pending for one polling session, plus bookkeeping.
#[derive(Debug, Clone)]
pub struct PollReply {
    /// Records newer than the caller's cursor, oldest first, never the
    /// caller's own.
    pub updates: Vec<UpdateRecord>,
    /// Highest id assigned so far; the caller's next cursor. Advances
    /// past the caller's own and already-pruned strokes.
    pub cursor: u64,
    /// Sessions currently polling.
    pub users: u32,
}

impl PollReply {
    /// Render the reply in wire form: a `uo:<count>` line when the user
    /// count differs from what this session last observed, then one
    /// line per record in id order. Empty when there is nothing new.
    #[must_use]
    pub fn render(&self, last_observed_users: u32) -> String {
        let mut out = String::new();
        if self.users != last_observed_users {
            out.push_str(&format!("uo:{}\n", self.users));
        }
        for record in &self.updates {
            out.push_str(&record.wire_line());
        }
        out
    }
}

/// Snapshot of board counters for the status endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStatus {
    /// Sessions currently polling.
    pub users: u32,
    /// Highest stroke id assigned so far.
    pub last_update_id: u64,
    /// Records currently retained in the log.
    pub log_len: usize,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

/// State behind the board lock.
struct BoardInner {
    canvas: Canvas,
    log: UpdateLog,
    last_id: u64,
    users: u32,
    last_snapshot_ms: u64,
}

/// The shared drawing surface and its synchronization state.
///
/// Cheap to clone; clones share the same underlying state.
#[derive(Clone)]
pub struct Board {
    inner: Arc<Mutex<BoardInner>>,
    painter: Arc<Painter>,
    snapshot_path: Arc<PathBuf>,
}

impl Board {
    /// Open a board backed by the snapshot file at `snapshot_path`.
    ///
    /// A missing or unreadable snapshot is not an error: a blank opaque
    /// white RGB canvas of `width` x `height` is synthesized and
    /// persisted immediately, so the file exists from the first moment
    /// the board is reachable. A loaded snapshot keeps its own
    /// dimensions and pixel format.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Snapshot`] if the synthesized canvas
    /// cannot be persisted.
    pub fn open(
        snapshot_path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        brushes: BrushSet,
    ) -> BoardResult<Self> {
        let snapshot_path = snapshot_path.into();
        let canvas = match codec::load(&snapshot_path) {
            Ok(canvas) => {
                tracing::info!(
                    path = %snapshot_path.display(),
                    width = canvas.width(),
                    height = canvas.height(),
                    "loaded canvas snapshot"
                );
                canvas
            }
            Err(err) => {
                tracing::warn!(
                    path = %snapshot_path.display(),
                    %err,
                    "no usable snapshot, starting blank"
                );
                let canvas = Canvas::new(width, height, PixelFormat::Rgb);
                codec::save(&canvas, &snapshot_path).map_err(BoardError::Snapshot)?;
                canvas
            }
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(BoardInner {
                canvas,
                log: UpdateLog::new(),
                last_id: 0,
                users: 0,
                last_snapshot_ms: now_ms(),
            })),
            painter: Arc::new(Painter::new(brushes)),
            snapshot_path: Arc::new(snapshot_path),
        })
    }

    /// The snapshot file this board persists to.
    #[must_use]
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    /// Submit one stroke on behalf of `user`.
    ///
    /// Returns `Ok(Some(id))` when the stroke was recorded and drawn,
    /// and `Ok(None)` when it failed validation; malformed strokes are
    /// dropped without an error so one broken client cannot disturb the
    /// shared session. The color is echoed to other clients verbatim
    /// and falls back to opaque white for rasterization when it does
    /// not parse.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Raster`] for an unsupported brush size.
    /// The record has already been assigned an id and logged at that
    /// point, mirroring the append-then-draw order of the submission
    /// path.
    pub fn submit_stroke(
        &self,
        user: u32,
        brush_size: u32,
        color_hex: &str,
        polyline: &str,
    ) -> BoardResult<Option<u64>> {
        self.submit_stroke_at(user, brush_size, color_hex, polyline, now_ms())
    }

    /// [`Board::submit_stroke`] with an explicit clock, for tests.
    ///
    /// # Errors
    ///
    /// See [`Board::submit_stroke`].
    pub fn submit_stroke_at(
        &self,
        user: u32,
        brush_size: u32,
        color_hex: &str,
        polyline: &str,
        now_ms: u64,
    ) -> BoardResult<Option<u64>> {
        let mut inner = self.lock();
        self.housekeeping(&mut inner, now_ms);

        if let Err(err) = validate_polyline(polyline) {
            tracing::debug!(user, %err, "rejecting malformed stroke");
            record_stroke_rejected();
            return Ok(None);
        }

        inner.last_id += 1;
        let id = inner.last_id;
        inner.log.append(UpdateRecord {
            id,
            user,
            brush_size,
            color_hex: color_hex.to_string(),
            polyline: polyline.to_string(),
            timestamp_ms: now_ms,
        });
        record_stroke_accepted();

        let color = Color::from_hex(color_hex).unwrap_or_default();
        let started = Instant::now();
        self.painter
            .apply_stroke(&mut inner.canvas, brush_size, color, polyline)?;
        record_rasterize_duration(started.elapsed().as_secs_f64());

        tracing::debug!(user, id, brush_size, "stroke applied");
        Ok(Some(id))
    }

    /// Collect the diff pending for `user` past its `last_seen` cursor.
    ///
    /// Also runs snapshot/prune housekeeping, exactly like submission,
    /// so a quiet board still snapshots as long as anyone is polling.
    #[must_use]
    pub fn poll_updates(&self, user: u32, last_seen: u64) -> PollReply {
        self.poll_updates_at(user, last_seen, now_ms())
    }

    /// [`Board::poll_updates`] with an explicit clock, for tests.
    #[must_use]
    pub fn poll_updates_at(&self, user: u32, last_seen: u64, now_ms: u64) -> PollReply {
        let mut inner = self.lock();
        self.housekeeping(&mut inner, now_ms);

        let updates: Vec<UpdateRecord> = inner.log.newer_for(user, last_seen).cloned().collect();
        PollReply {
            updates,
            cursor: inner.last_id,
            users: inner.users,
        }
    }

    /// Begin a polling session. The returned guard ends it on drop.
    #[must_use]
    pub fn begin_session(&self) -> SessionGuard {
        {
            let mut inner = self.lock();
            inner.users += 1;
            set_active_sessions(inner.users);
            tracing::debug!(users = inner.users, "session started");
        }
        SessionGuard {
            board: self.clone(),
        }
    }

    fn end_session(&self) {
        let mut inner = self.lock();
        inner.users = inner.users.saturating_sub(1);
        set_active_sessions(inner.users);
        tracing::debug!(users = inner.users, "session ended");
    }

    /// Sessions currently polling.
    #[must_use]
    pub fn user_count(&self) -> u32 {
        self.lock().users
    }

    /// Write a snapshot unconditionally and reset the snapshot clock.
    ///
    /// Used at shutdown; the periodic cadence runs through
    /// housekeeping instead.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Snapshot`] if the write fails.
    pub fn snapshot_now(&self) -> BoardResult<()> {
        let mut inner = self.lock();
        codec::save(&inner.canvas, &self.snapshot_path).map_err(BoardError::Snapshot)?;
        inner.last_snapshot_ms = now_ms();
        record_snapshot_written();
        tracing::info!(path = %self.snapshot_path.display(), "canvas snapshot written");
        Ok(())
    }

    /// PNG-encode the current canvas from memory.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Raster`] if encoding fails.
    pub fn canvas_png(&self) -> BoardResult<Vec<u8>> {
        let inner = self.lock();
        Ok(codec::encode_png(&inner.canvas)?)
    }

    /// Current counters for the status endpoint.
    #[must_use]
    pub fn status(&self) -> BoardStatus {
        let inner = self.lock();
        BoardStatus {
            users: inner.users,
            last_update_id: inner.last_id,
            log_len: inner.log.len(),
            width: inner.canvas.width(),
            height: inner.canvas.height(),
        }
    }

    /// Snapshot the canvas and prune the log when the interval is up.
    ///
    /// The snapshot clock resets even when the write fails; retrying
    /// every call would hammer a full disk, and the next interval will
    /// try again. Pruning stays coupled to the snapshot cadence so a
    /// record is only discarded once a snapshot attempt has covered it.
    fn housekeeping(&self, inner: &mut BoardInner, now_ms: u64) {
        if now_ms.saturating_sub(inner.last_snapshot_ms) > SNAPSHOT_INTERVAL_MS {
            match codec::save(&inner.canvas, &self.snapshot_path) {
                Ok(()) => {
                    record_snapshot_written();
                    tracing::debug!(path = %self.snapshot_path.display(), "canvas snapshot written");
                }
                Err(err) => {
                    tracing::warn!(path = %self.snapshot_path.display(), %err, "canvas snapshot failed");
                }
            }
            inner.last_snapshot_ms = now_ms;
            inner.log.prune_older_than(RETENTION_MS, now_ms);
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Ends a polling session exactly once when dropped.
pub struct SessionGuard {
    board: Board,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.board.end_session();
    }
}

/// Current time as unix epoch milliseconds.
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
