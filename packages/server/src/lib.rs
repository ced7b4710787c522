//! Room coordination server for watch-together sessions.
//!
//! Clients connect over WebSocket, create or join rooms, and share a chat
//! log, the current video, a playlist, and playback signals with the other
//! members of the room. A small HTTP API exposes health and room listings.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
