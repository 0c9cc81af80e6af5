//! Line protocol spoken between the match server and its two clients.
//!
//! Every message is a single UTF-8 line. `Display` renders a message without
//! the line terminator and `FromStr` parses one, tolerating surrounding
//! whitespace and a trailing `\r`.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::num::ParseIntError;
use core::str::FromStr;

use crate::common::{PlayerId, ShotOutcome, UnknownOutcome};

/// Messages sent by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Assigns the recipient its player number.
    PlayerId(PlayerId),
    /// Both players are ready; the placement phase is over.
    GameStart,
    /// The named player may fire now.
    Turn(PlayerId),
    /// Outcome of the recipient's own shot.
    ShotResult { x: i32, y: i32, outcome: ShotOutcome },
    /// Outcome of the opponent's shot at the recipient's board.
    OpponentShot { x: i32, y: i32, outcome: ShotOutcome },
    /// The match is over. `None` when nobody won.
    GameOver(Option<PlayerId>),
}

/// Messages sent by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Ends the sender's placement phase.
    Ready,
    /// Ships to place, each listed as the cells it covers in order.
    Ships(Vec<Vec<(i32, i32)>>),
    /// Fire at the opponent's board.
    Shot { x: i32, y: i32 },
}

/// Reasons a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line does not start with a known message keyword.
    UnknownMessage(String),
    /// A coordinate pair was not of the form `<x>,<y>`.
    BadCoordinate(String),
    /// A numeric field failed to parse.
    BadNumber(ParseIntError),
    /// The outcome field is not one of the known outcome names.
    BadOutcome(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnknownMessage(line) => write!(f, "unknown message: {:?}", line),
            ProtocolError::BadCoordinate(field) => write!(f, "malformed coordinate: {:?}", field),
            ProtocolError::BadNumber(e) => write!(f, "malformed number: {}", e),
            ProtocolError::BadOutcome(field) => write!(f, "unknown outcome: {:?}", field),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

impl From<ParseIntError> for ProtocolError {
    fn from(err: ParseIntError) -> Self {
        ProtocolError::BadNumber(err)
    }
}

fn parse_coordinate(field: &str) -> Result<(i32, i32), ProtocolError> {
    let (x, y) = field
        .split_once(',')
        .ok_or_else(|| ProtocolError::BadCoordinate(field.into()))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

/// Parse `<x>,<y>,<OUTCOME>`.
fn parse_shot_report(field: &str) -> Result<(i32, i32, ShotOutcome), ProtocolError> {
    let (coord, outcome) = field
        .rsplit_once(',')
        .ok_or_else(|| ProtocolError::BadCoordinate(field.into()))?;
    let (x, y) = parse_coordinate(coord)?;
    let outcome = outcome
        .trim()
        .parse()
        .map_err(|_: UnknownOutcome| ProtocolError::BadOutcome(outcome.into()))?;
    Ok((x, y, outcome))
}

/// Parse the body of a `SHIPS:` line. Empty ship and coordinate segments are
/// skipped.
fn parse_ships(body: &str) -> Result<Vec<Vec<(i32, i32)>>, ProtocolError> {
    let mut ships = Vec::new();
    for segment in body.split('|').filter(|s| !s.trim().is_empty()) {
        let cells = segment
            .split(';')
            .filter(|c| !c.trim().is_empty())
            .map(parse_coordinate)
            .collect::<Result<Vec<_>, _>>()?;
        if !cells.is_empty() {
            ships.push(cells);
        }
    }
    Ok(ships)
}

impl FromStr for ClientMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line == "READY" {
            return Ok(ClientMessage::Ready);
        }
        if let Some(body) = line.strip_prefix("SHIPS:") {
            return Ok(ClientMessage::Ships(parse_ships(body)?));
        }
        if let Some(body) = line.strip_prefix("SHOT:") {
            let (x, y) = parse_coordinate(body)?;
            return Ok(ClientMessage::Shot { x, y });
        }
        Err(ProtocolError::UnknownMessage(line.into()))
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientMessage::Ready => f.write_str("READY"),
            ClientMessage::Ships(ships) => {
                f.write_str("SHIPS:")?;
                for (i, ship) in ships.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    for (j, (x, y)) in ship.iter().enumerate() {
                        if j > 0 {
                            f.write_str(";")?;
                        }
                        write!(f, "{},{}", x, y)?;
                    }
                }
                Ok(())
            }
            ClientMessage::Shot { x, y } => write!(f, "SHOT:{},{}", x, y),
        }
    }
}

impl FromStr for ServerMessage {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line == "GAME_START" {
            return Ok(ServerMessage::GameStart);
        }
        let (keyword, body) = line
            .split_once(':')
            .ok_or_else(|| ProtocolError::UnknownMessage(line.into()))?;
        match keyword {
            "PLAYER_ID" => Ok(ServerMessage::PlayerId(PlayerId(body.trim().parse()?))),
            "TURN" => Ok(ServerMessage::Turn(PlayerId(body.trim().parse()?))),
            "SHOT_RESULT" => {
                let (x, y, outcome) = parse_shot_report(body)?;
                Ok(ServerMessage::ShotResult { x, y, outcome })
            }
            "OPPONENT_SHOT" => {
                let (x, y, outcome) = parse_shot_report(body)?;
                Ok(ServerMessage::OpponentShot { x, y, outcome })
            }
            "GAME_OVER" => {
                let id: u8 = body.trim().parse()?;
                Ok(ServerMessage::GameOver((id != 0).then_some(PlayerId(id))))
            }
            _ => Err(ProtocolError::UnknownMessage(line.into())),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::PlayerId(id) => write!(f, "PLAYER_ID:{}", id),
            ServerMessage::GameStart => f.write_str("GAME_START"),
            ServerMessage::Turn(id) => write!(f, "TURN:{}", id),
            ServerMessage::ShotResult { x, y, outcome } => {
                write!(f, "SHOT_RESULT:{},{},{}", x, y, outcome)
            }
            ServerMessage::OpponentShot { x, y, outcome } => {
                write!(f, "OPPONENT_SHOT:{},{},{}", x, y, outcome)
            }
            ServerMessage::GameOver(winner) => {
                write!(f, "GAME_OVER:{}", winner.map_or(0, |id| id.0))
            }
        }
    }
}
