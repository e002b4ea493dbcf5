//! Hiroba group chat relay.
//!
//! Tracks who is present across any number of connections per display name,
//! keeps a bounded message history and fans events out over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
