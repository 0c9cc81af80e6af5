#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod board;
mod common;
mod config;
pub mod protocol;
mod ship;
#[cfg(feature = "std")]
pub mod bot;
#[cfg(feature = "std")]
pub mod coordinator;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod prelude;
#[cfg(feature = "std")]
pub mod server;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;

pub use board::*;
pub use common::*;
pub use config::*;
pub use protocol::*;
pub use ship::*;
#[cfg(feature = "std")]
pub use bot::{simulate, Bot, BotReport, SimulationReport};
#[cfg(feature = "std")]
pub use coordinator::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, init_logging_with_default, LOG_ENV};
#[cfg(feature = "std")]
pub use server::serve_match;
#[cfg(feature = "std")]
pub use session::*;
