#![cfg(feature = "std")]

//! Listener bootstrap: pairs two connections into one match.

use std::sync::Arc;

use log::{info, warn};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::GameConfig;
use crate::coordinator::{GameCoordinator, MatchSummary};
use crate::transport::tcp;

/// Accept exactly two connections from `listener` and run one match between
/// them to completion.
pub async fn serve_match(listener: &TcpListener, config: GameConfig) -> anyhow::Result<MatchSummary> {
    let coordinator = Arc::new(GameCoordinator::new(config));
    let mut readers: Vec<JoinHandle<anyhow::Result<()>>> = Vec::with_capacity(2);

    while readers.len() < 2 {
        let (stream, addr) = listener.accept().await?;
        let (source, sink) = tcp::split(stream, config.max_line_len);
        let (session, outbound) = coordinator.admit()?;
        info!("player {} connected from {}", session.player_id(), addr);

        // Write failures are logged and handled by the session itself.
        tokio::spawn(session.clone().run_writer(coordinator.clone(), outbound, sink));
        readers.push(tokio::spawn(session.run(coordinator.clone(), source)));
    }

    for reader in readers {
        match reader.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("session ended with error: {}", e),
            Err(e) => warn!("session task failed: {}", e),
        }
    }

    let summary = coordinator.summary();
    info!(
        "match finished: winner {:?}, shots fired {:?}",
        summary.winner.map(|id| id.0),
        summary.shots_fired
    );
    Ok(summary)
}
