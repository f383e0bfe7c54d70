//! Shared test support.

pub mod server;

pub use server::TestServer;
