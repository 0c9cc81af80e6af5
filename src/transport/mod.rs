//! Line-oriented connection plumbing.
//!
//! A connection is split into a [`LineSource`] read by the session's reader
//! task and a [`LineSink`] owned by its writer task, so a read blocked on the
//! remote peer never stalls outbound delivery.

/// Inbound half of a connection.
#[async_trait::async_trait]
pub trait LineSource: Send {
    /// Next line without its terminator, or `None` once the peer closed the
    /// stream.
    async fn recv_line(&mut self) -> anyhow::Result<Option<String>>;
}

/// Outbound half of a connection.
#[async_trait::async_trait]
pub trait LineSink: Send {
    /// Write `line` followed by `\n`.
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()>;
    /// Flush and close the outbound half.
    async fn shutdown(&mut self) -> anyhow::Result<()>;
}

pub mod in_memory;
pub mod tcp;
