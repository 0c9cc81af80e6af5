#![cfg(feature = "std")]

//! Scripted client that plays a full match against the server.
//!
//! The bot places the standard fleet at random, then fires using a simple
//! hunt/target strategy: while a struck ship is still afloat it tries the
//! untried neighbours of its hits, otherwise it picks a random untried cell.

use std::collections::VecDeque;
use std::net::SocketAddr;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::net::{TcpListener, ToSocketAddrs};

use crate::common::{PlayerId, ShotOutcome};
use crate::config::{GameConfig, STANDARD_FLEET};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::server::serve_match;
use crate::ship::ShipType;
use crate::transport::{tcp, LineSink, LineSource};

/// What a bot saw of its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BotReport {
    pub player_id: Option<PlayerId>,
    /// Winner announced by the server. `None` if the connection ended first or
    /// the match ended without a winner.
    pub winner: Option<PlayerId>,
    pub shots: usize,
    pub hits: usize,
}

impl BotReport {
    pub fn won(&self) -> bool {
        self.player_id.is_some() && self.player_id == self.winner
    }
}

/// Random non-overlapping layout of `fleet` on a `size`×`size` grid, each ship
/// listed as its cells in order. Ships that find no room in 100 attempts are
/// left out.
pub fn random_layout<R: Rng>(rng: &mut R, size: usize, fleet: &[ShipType]) -> Vec<Vec<(i32, i32)>> {
    let mut occupied = vec![false; size * size];
    let mut layout = Vec::with_capacity(fleet.len());
    for ship in fleet {
        let len = ship.length();
        if len == 0 || len > size {
            continue;
        }
        for _ in 0..100 {
            let vertical: bool = rng.random();
            let (max_x, max_y) = if vertical { (size - 1, size - len) } else { (size - len, size - 1) };
            let x = rng.random_range(0..=max_x);
            let y = rng.random_range(0..=max_y);
            let cells: Vec<(usize, usize)> = (0..len)
                .map(|i| if vertical { (x, y + i) } else { (x + i, y) })
                .collect();
            if cells.iter().any(|&(cx, cy)| occupied[cy * size + cx]) {
                continue;
            }
            for &(cx, cy) in &cells {
                occupied[cy * size + cx] = true;
            }
            layout.push(cells.into_iter().map(|(cx, cy)| (cx as i32, cy as i32)).collect());
            break;
        }
    }
    layout
}

/// Shot selection state for one opponent board.
struct Targeting {
    size: usize,
    tried: Vec<bool>,
    pending: VecDeque<(usize, usize)>,
}

impl Targeting {
    fn new(size: usize) -> Self {
        Self {
            size,
            tried: vec![false; size * size],
            pending: VecDeque::new(),
        }
    }

    fn next<R: Rng>(&mut self, rng: &mut R) -> Option<(usize, usize)> {
        while let Some((x, y)) = self.pending.pop_front() {
            if !self.tried[y * self.size + x] {
                return Some((x, y));
            }
        }
        let open: Vec<usize> = (0..self.tried.len()).filter(|&i| !self.tried[i]).collect();
        if open.is_empty() {
            return None;
        }
        let i = open[rng.random_range(0..open.len())];
        Some((i % self.size, i / self.size))
    }

    fn record(&mut self, x: i32, y: i32, outcome: ShotOutcome) {
        if x < 0 || y < 0 || x as usize >= self.size || y as usize >= self.size {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        self.tried[y * self.size + x] = true;
        match outcome {
            ShotOutcome::Hit => {
                if x > 0 {
                    self.pending.push_back((x - 1, y));
                }
                if x + 1 < self.size {
                    self.pending.push_back((x + 1, y));
                }
                if y > 0 {
                    self.pending.push_back((x, y - 1));
                }
                if y + 1 < self.size {
                    self.pending.push_back((x, y + 1));
                }
            }
            // The struck ship is gone; stop chasing its neighbours.
            ShotOutcome::Sunk | ShotOutcome::GameOver => self.pending.clear(),
            _ => {}
        }
    }
}

/// Bot client playing over any line transport.
pub struct Bot {
    rng: SmallRng,
    config: GameConfig,
}

impl Bot {
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            config,
        }
    }

    /// Play one match: place the fleet, declare ready, fire on every turn
    /// announcement addressed to this bot, and stop at `GAME_OVER` or EOF.
    pub async fn play<S: LineSource, K: LineSink>(
        &mut self,
        source: &mut S,
        sink: &mut K,
    ) -> anyhow::Result<BotReport> {
        let mut report = BotReport {
            player_id: None,
            winner: None,
            shots: 0,
            hits: 0,
        };
        let mut targeting = Targeting::new(self.config.board_size);

        let layout = random_layout(&mut self.rng, self.config.board_size, &STANDARD_FLEET);
        sink.send_line(&ClientMessage::Ships(layout).to_string()).await?;
        sink.send_line(&ClientMessage::Ready.to_string()).await?;

        while let Some(line) = source.recv_line().await? {
            let msg = match line.parse::<ServerMessage>() {
                Ok(msg) => msg,
                Err(e) => {
                    warn!("bot: ignoring unexpected line: {}", e);
                    continue;
                }
            };
            match msg {
                ServerMessage::PlayerId(id) => {
                    debug!("bot: playing as player {}", id);
                    report.player_id = Some(id);
                }
                ServerMessage::GameStart => debug!("bot: game started"),
                ServerMessage::Turn(id) if Some(id) == report.player_id => {
                    let Some((x, y)) = targeting.next(&mut self.rng) else {
                        warn!("bot: no untried cells left");
                        break;
                    };
                    let shot = ClientMessage::Shot {
                        x: x as i32,
                        y: y as i32,
                    };
                    sink.send_line(&shot.to_string()).await?;
                    report.shots += 1;
                }
                ServerMessage::Turn(_) => {}
                ServerMessage::ShotResult { x, y, outcome } => {
                    if outcome.is_hit() {
                        report.hits += 1;
                    }
                    targeting.record(x, y, outcome);
                }
                ServerMessage::OpponentShot { .. } => {}
                ServerMessage::GameOver(winner) => {
                    report.winner = winner;
                    break;
                }
            }
        }
        Ok(report)
    }

    /// Connect to `addr` over TCP and play one match.
    pub async fn run<A: ToSocketAddrs>(&mut self, addr: A) -> anyhow::Result<BotReport> {
        let (mut source, mut sink) = tcp::connect(addr).await?;
        let report = self.play(&mut source, &mut sink).await;
        let _ = sink.shutdown().await;
        report
    }
}

/// Summary printed by the `sim` binary.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SimulationReport {
    pub config: GameConfig,
    pub winner: Option<PlayerId>,
    pub shots_fired: [usize; 2],
    pub bots: [BotReport; 2],
}

/// Run a server and two bots on a loopback port and play one match.
pub async fn simulate(seed1: u64, seed2: u64, config: GameConfig) -> anyhow::Result<SimulationReport> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    let server = tokio::spawn(async move { serve_match(&listener, config).await });

    // Connections are accepted in arrival order, so seed1 plays as player 1.
    let (mut source1, mut sink1) = tcp::connect(addr).await?;
    let (mut source2, mut sink2) = tcp::connect(addr).await?;
    let mut bot1 = Bot::new(seed1, config);
    let mut bot2 = Bot::new(seed2, config);

    let bot1_task = tokio::spawn(async move {
        let report = bot1.play(&mut source1, &mut sink1).await;
        let _ = sink1.shutdown().await;
        report
    });
    let bot2_task = tokio::spawn(async move {
        let report = bot2.play(&mut source2, &mut sink2).await;
        let _ = sink2.shutdown().await;
        report
    });

    let (r1, r2, summary) = tokio::try_join!(bot1_task, bot2_task, server)?;
    let summary = summary?;
    let bots = [r1?, r2?];
    info!("simulation finished: winner {:?}", summary.winner.map(|id| id.0));
    Ok(SimulationReport {
        config,
        winner: summary.winner,
        shots_fired: summary.shots_fired,
        bots,
    })
}
