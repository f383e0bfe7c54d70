//! # Mural Server Library
//!
//! Shared state and route handlers for the mural server.
//! This library is used by both the binary and integration tests.

pub mod board;
pub mod config;
pub mod health;
pub mod log;
pub mod metrics;
pub mod routes;
pub mod validation;

pub use board::{Board, BoardError, BoardResult, BoardStatus, PollReply, SessionGuard};
pub use config::ServerConfig;
pub use log::{UpdateLog, UpdateRecord};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The board every handler operates on.
    pub board: Board,
}

impl AppState {
    /// Create state over a board.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self { board }
    }

    /// Get a reference to the board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }
}
