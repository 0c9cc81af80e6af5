#![cfg(feature = "std")]

//! Server-side representative of one connected player.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};

use crate::board::Board;
use crate::common::{Orientation, PlayerId};
use crate::coordinator::GameCoordinator;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::ship::Ship;
use crate::transport::{LineSink, LineSource};

/// Items queued for a session's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Message(ServerMessage),
    /// Flush what is queued so far, then close the connection.
    Close,
}

pub struct PlayerSession {
    player_id: PlayerId,
    board: Mutex<Board>,
    ready: AtomicBool,
    closed: AtomicBool,
    outbound: mpsc::UnboundedSender<Outbound>,
    shutdown: watch::Sender<bool>,
}

impl PlayerSession {
    /// Create a session with an empty `board_size` board. The receiver must be
    /// drained by [`run_writer`](Self::run_writer) (or read directly in tests).
    pub fn new(player_id: PlayerId, board_size: usize) -> (Arc<Self>, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown, _) = watch::channel(false);
        let session = Arc::new(Self {
            player_id,
            board: Mutex::new(Board::new(board_size)),
            ready: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            outbound: tx,
            shutdown,
        });
        (session, rx)
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Whether the player has ended its placement phase.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Lock the player's board. Held only for the duration of a placement or
    /// a single shot resolution.
    pub fn board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue `msg` for delivery. Messages queued after [`close`](Self::close)
    /// are dropped.
    pub fn send(&self, msg: ServerMessage) {
        if self.is_closed() {
            debug!("player {}: dropping {} after close", self.player_id, msg);
            return;
        }
        if self.outbound.send(Outbound::Message(msg)).is_err() {
            debug!("player {}: writer already gone", self.player_id);
        }
    }

    /// Close the connection once queued messages are flushed and stop the
    /// reader. Safe to call any number of times.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("player {}: closing connection", self.player_id);
        let _ = self.outbound.send(Outbound::Close);
        self.shutdown.send_replace(true);
    }

    /// Flip the ready flag. Returns `false` if it was already set.
    fn mark_ready(&self) -> bool {
        self.ready
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Place a batch of ships, each given as the cells it covers in order.
    /// The first cell is the origin; the ship runs vertically when the first
    /// two cells share `x` and horizontally otherwise. Ships that do not fit
    /// are logged and skipped. Returns the number placed.
    pub fn place_ships(&self, ships: &[Vec<(i32, i32)>]) -> usize {
        let mut board = self.board();
        let mut placed = 0;
        for cells in ships {
            let Some(&(x, y)) = cells.first() else {
                continue;
            };
            let orientation = match cells.get(1) {
                Some(&(next_x, _)) if next_x == x => Orientation::Vertical,
                _ => Orientation::Horizontal,
            };
            match board.place_ship(Ship::new(cells.len()), x, y, orientation) {
                Ok(id) => {
                    placed += 1;
                    debug!(
                        "player {}: placed ship {} (length {}) at ({}, {}) {:?}",
                        self.player_id,
                        id.0,
                        cells.len(),
                        x,
                        y,
                        orientation
                    );
                }
                Err(e) => warn!(
                    "player {}: failed to place ship at ({}, {}): {}",
                    self.player_id, x, y, e
                ),
            }
        }
        placed
    }

    /// Act on one inbound line.
    pub fn handle_line(&self, coordinator: &GameCoordinator, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let msg = match line.parse::<ClientMessage>() {
            Ok(msg) => msg,
            Err(e) => {
                warn!("player {}: dropping malformed line: {}", self.player_id, e);
                return;
            }
        };

        if !self.is_ready() {
            match msg {
                ClientMessage::Ready => {
                    if self.mark_ready() {
                        info!(
                            "player {} is ready with {} ships",
                            self.player_id,
                            self.board().ships().len()
                        );
                        coordinator.try_start();
                    }
                }
                ClientMessage::Ships(ships) => {
                    let placed = self.place_ships(&ships);
                    debug!(
                        "player {}: placed {}/{} ships from batch",
                        self.player_id,
                        placed,
                        ships.len()
                    );
                }
                ClientMessage::Shot { .. } => {
                    debug!("player {}: ignoring shot during placement", self.player_id)
                }
            }
            return;
        }

        match msg {
            ClientMessage::Shot { x, y } => coordinator.process_shot(self.player_id, x, y),
            other => debug!("player {}: ignoring {} after ready", self.player_id, other),
        }
    }

    /// Serve the connection: announce the player id, then feed inbound lines
    /// to [`handle_line`](Self::handle_line) until the peer leaves, the read
    /// fails or the session is closed. Leaving always removes the player from
    /// the match.
    pub async fn run<S: LineSource>(
        self: Arc<Self>,
        coordinator: Arc<GameCoordinator>,
        mut source: S,
    ) -> anyhow::Result<()> {
        let mut shutdown = self.shutdown.subscribe();
        self.send(ServerMessage::PlayerId(self.player_id));

        let result = loop {
            if *shutdown.borrow() {
                break Ok(());
            }
            tokio::select! {
                _ = shutdown.changed() => break Ok(()),
                line = source.recv_line() => match line {
                    Ok(Some(line)) => self.handle_line(&coordinator, &line),
                    Ok(None) => {
                        info!("player {} disconnected", self.player_id);
                        break Ok(());
                    }
                    Err(e) => {
                        warn!("player {}: connection error: {}", self.player_id, e);
                        break Err(e);
                    }
                },
            }
        };

        coordinator.remove_player(self.player_id);
        self.close();
        result
    }

    /// Writer task: deliver queued messages to `sink` until the session
    /// closes. A failed write is a connection fault like a failed read: the
    /// player leaves the match, which forfeits it mid-game, and the reader
    /// is stopped.
    pub async fn run_writer<K: LineSink>(
        self: Arc<Self>,
        coordinator: Arc<GameCoordinator>,
        rx: mpsc::UnboundedReceiver<Outbound>,
        sink: K,
    ) -> anyhow::Result<()> {
        let result = pump_outbound(rx, sink).await;
        if let Err(e) = &result {
            warn!("player {}: connection error on write: {}", self.player_id, e);
            coordinator.remove_player(self.player_id);
            self.close();
        }
        result
    }
}

async fn pump_outbound<K: LineSink>(
    mut rx: mpsc::UnboundedReceiver<Outbound>,
    mut sink: K,
) -> anyhow::Result<()> {
    while let Some(item) = rx.recv().await {
        match item {
            Outbound::Message(msg) => {
                if let Err(e) = sink.send_line(&msg.to_string()).await {
                    debug!("write failed, dropping remaining messages: {}", e);
                    return Err(e);
                }
            }
            Outbound::Close => break,
        }
    }
    sink.shutdown().await
}
