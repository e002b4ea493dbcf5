//! Infrastructure layer: wire formats and concrete collaborators.

pub mod dto;
pub mod message_pusher;
pub mod repository;
