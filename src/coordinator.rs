#![cfg(feature = "std")]

//! Shared state of one match.
//!
//! Both session reader tasks call into the same `GameCoordinator`. Every
//! phase change, turn flip and shot resolution happens while holding the
//! single `MatchState` mutex, which is never held across an `.await`. Board
//! locks are only ever taken while the match lock is held, never the other
//! way round.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::common::{PlayerId, ShotOutcome};
use crate::config::GameConfig;
use crate::protocol::ServerMessage;
use crate::session::{Outbound, PlayerSession};

/// Match-level state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WaitingForPlayers,
    Placement,
    InProgress,
    GameOver,
}

/// Errors returned when admitting a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// Both player slots have already been handed out.
    Full,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::Full => write!(f, "Match already has two players"),
        }
    }
}

impl std::error::Error for MatchError {}

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MatchSummary {
    /// `None` if the match ended without a winner.
    pub winner: Option<PlayerId>,
    /// Shots accepted from each player, indexed by slot.
    pub shots_fired: [usize; 2],
}

struct MatchState {
    sessions: [Option<Arc<PlayerSession>>; 2],
    admitted: usize,
    turn: usize,
    phase: Phase,
    winner: Option<PlayerId>,
    shots_fired: [usize; 2],
}

impl MatchState {
    fn send_to(&self, slot: usize, msg: ServerMessage) {
        if let Some(session) = &self.sessions[slot] {
            session.send(msg);
        }
    }

    fn broadcast(&self, msg: ServerMessage) {
        for session in self.sessions.iter().flatten() {
            session.send(msg.clone());
        }
    }

    fn end_match(&mut self, winner: Option<PlayerId>) {
        self.phase = Phase::GameOver;
        self.winner = winner;
        self.broadcast(ServerMessage::GameOver(winner));
        match winner {
            Some(id) => info!("game over, player {} wins", id),
            None => info!("game over, no winner"),
        }
        for session in self.sessions.iter().flatten() {
            session.close();
        }
    }
}

pub struct GameCoordinator {
    config: GameConfig,
    state: Mutex<MatchState>,
}

impl GameCoordinator {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            state: Mutex::new(MatchState {
                sessions: [None, None],
                admitted: 0,
                turn: 0,
                phase: Phase::WaitingForPlayers,
                winner: None,
                shots_fired: [0, 0],
            }),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, MatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hand the next player slot to a new connection. Player ids follow
    /// admission order; once both slots are taken the match enters placement.
    pub fn admit(
        &self,
    ) -> Result<(Arc<PlayerSession>, mpsc::UnboundedReceiver<Outbound>), MatchError> {
        let mut state = self.state();
        if state.admitted >= state.sessions.len() {
            return Err(MatchError::Full);
        }
        let slot = state.admitted;
        state.admitted += 1;

        let player_id = PlayerId::from_slot(slot);
        let (session, rx) = PlayerSession::new(player_id, self.config.board_size);
        state.sessions[slot] = Some(session.clone());
        info!("player {} joined", player_id);

        if state.admitted == state.sessions.len() && state.phase == Phase::WaitingForPlayers {
            state.phase = Phase::Placement;
            info!("both players connected, placement phase started");
        }
        Ok((session, rx))
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    /// Player allowed to fire, while the match is in progress.
    pub fn active_player(&self) -> Option<PlayerId> {
        let state = self.state();
        (state.phase == Phase::InProgress).then(|| PlayerId::from_slot(state.turn))
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.state().winner
    }

    pub fn summary(&self) -> MatchSummary {
        let state = self.state();
        MatchSummary {
            winner: state.winner,
            shots_fired: state.shots_fired,
        }
    }

    /// Session currently holding `player_id`'s slot.
    pub fn session(&self, player_id: PlayerId) -> Option<Arc<PlayerSession>> {
        let slot = player_id.slot()?;
        self.state().sessions[slot].clone()
    }

    /// Start the match if both players are present and ready. Returns `true`
    /// only for the call that performed the transition.
    pub fn try_start(&self) -> bool {
        let mut state = self.state();
        if state.phase != Phase::Placement {
            return false;
        }
        let all_ready = state
            .sessions
            .iter()
            .all(|s| s.as_ref().is_some_and(|s| s.is_ready()));
        if !all_ready {
            return false;
        }

        state.phase = Phase::InProgress;
        state.turn = 0;
        state.broadcast(ServerMessage::GameStart);
        state.broadcast(ServerMessage::Turn(PlayerId::ONE));
        info!("game started, player {} moves first", PlayerId::ONE);
        true
    }

    /// Resolve a shot by `player_id` at (`x`, `y`) on the opponent's board.
    ///
    /// Ignored without any reply unless the match is in progress and it is
    /// `player_id`'s turn. A miss passes the turn; every other outcome that
    /// does not end the match lets the shooter fire again.
    pub fn process_shot(&self, player_id: PlayerId, x: i32, y: i32) {
        let mut state = self.state();
        if state.phase != Phase::InProgress {
            debug!("player {}: shot at ({}, {}) outside play ignored", player_id, x, y);
            return;
        }
        let Some(slot) = player_id.slot() else {
            return;
        };
        if slot != state.turn {
            debug!("player {}: out-of-turn shot at ({}, {}) ignored", player_id, x, y);
            return;
        }
        let opponent_slot = 1 - slot;
        let Some(opponent) = state.sessions[opponent_slot].clone() else {
            return;
        };

        let (outcome, fleet_destroyed) = {
            let mut board = opponent.board();
            let outcome = board.receive_shot(x, y);
            (outcome, board.all_ships_sunk())
        };
        state.shots_fired[slot] += 1;
        info!("player {} fired at ({}, {}): {}", player_id, x, y, outcome);

        state.send_to(slot, ServerMessage::ShotResult { x, y, outcome });
        state.send_to(opponent_slot, ServerMessage::OpponentShot { x, y, outcome });

        if outcome == ShotOutcome::GameOver || fleet_destroyed {
            state.end_match(Some(player_id));
            return;
        }

        if outcome == ShotOutcome::Miss {
            state.turn = opponent_slot;
            state.broadcast(ServerMessage::Turn(PlayerId::from_slot(opponent_slot)));
        } else {
            state.send_to(slot, ServerMessage::Turn(player_id));
        }
    }

    /// Drop `player_id` from the match. Leaving mid-game forfeits to the
    /// remaining player.
    pub fn remove_player(&self, player_id: PlayerId) {
        let mut state = self.state();
        let Some(slot) = player_id.slot() else {
            return;
        };
        if state.sessions[slot].take().is_none() {
            return;
        }
        info!("player {} left the match", player_id);

        if state.phase == Phase::InProgress {
            let winner = state.sessions[1 - slot].as_ref().map(|s| s.player_id());
            warn!("player {} forfeits by disconnecting", player_id);
            state.end_match(winner);
        }
    }
}
