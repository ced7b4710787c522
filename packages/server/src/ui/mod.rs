//! WebSocket and HTTP surface of the room coordination server.

mod command;
pub mod config;
mod handler;
mod server;
pub mod shutdown;
pub mod state;

pub use command::{CommandFailure, CommandRouter};
pub use config::ServerConfig;
pub use server::{Server, ServerError};
pub use shutdown::{ShutdownCoordinator, ShutdownPhase};
