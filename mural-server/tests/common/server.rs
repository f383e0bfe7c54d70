//! Test server harness for integration tests.
//!
//! Provides a way to spin up a real Axum server on a random port
//! for integration testing with plain HTTP clients.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

use mural_raster::BrushSet;
use mural_server::{routes, AppState, Board};

/// Canvas dimensions for test boards. Small keeps PNG round trips fast.
const TEST_WIDTH: u32 = 64;
const TEST_HEIGHT: u32 = 64;

/// A test server instance with control handles.
pub struct TestServer {
    addr: SocketAddr,
    board: Board,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
    _snapshot_dir: tempfile::TempDir,
}

impl TestServer {
    /// Start a new test server on a random available port.
    ///
    /// # Panics
    ///
    /// Panics if no port is available or the server fails to bind.
    pub async fn start() -> Self {
        let port = portpicker::pick_unused_port().expect("no available port");
        let addr = SocketAddr::from(([127, 0, 0, 1], port));

        let snapshot_dir = tempfile::tempdir().expect("tempdir");
        let board = Board::open(
            snapshot_dir.path().join("Canvas.png"),
            TEST_WIDTH,
            TEST_HEIGHT,
            BrushSet::procedural(),
        )
        .expect("board should open");

        let state = AppState::new(board.clone());

        // The production router without the outer middleware stack
        let app =
            routes::router(state).layer(CorsLayer::new().allow_origin(Any).allow_methods(Any));

        let listener = TcpListener::bind(addr).await.expect("failed to bind");
        let actual_addr = listener.local_addr().expect("failed to get local addr");

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        // Spawn the server
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("server error");
        });

        // Give the server a moment to start
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr: actual_addr,
            board,
            shutdown_tx: Some(shutdown_tx),
            handle,
            _snapshot_dir: snapshot_dir,
        }
    }

    /// Get the server's socket address.
    #[allow(dead_code)]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Build a full URL for the given path.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Get access to the board (for test assertions).
    #[allow(dead_code)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Gracefully shut down the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = tokio::time::timeout(tokio::time::Duration::from_secs(5), self.handle).await;
    }
}
