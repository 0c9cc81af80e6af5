//! Commonly used types and utilities for ease of import.

pub use crate::{
    Board, ClientMessage, GameConfig, GameCoordinator, Orientation, Phase, PlayerId, PlayerSession,
    ServerMessage, Ship, ShotOutcome,
};

pub use crate::transport::{in_memory::InMemoryTransport, LineSink, LineSource};
