//! Line-based game server protocol.
//!
//! The server speaks plain text over stdin/stdout:
//!
//! ```text
//! <player tag>
//! <width> <height>
//! <production × width·height>
//! <frame>
//! ```
//!
//! A frame is run-length encoded ownership, `count owner` pairs covering
//! every cell in row-major order (owner 0 is unowned), followed by one
//! strength per cell. The bot answers the init block with its name and each
//! frame with `x y direction` triples.
//!
//! [`StdioDriver`] adapts this to [`TurnDriver`]. Productions arrive once and
//! are reused for every later frame.

use std::fmt::Write as _;
use std::io::{BufRead, Write};
use std::str::FromStr;

use thiserror::Error;

use crate::error::FlowError;
use crate::grid::{Cell, GameMap, PlayerId};
use crate::policy::ActionSet;
use crate::turn::TurnDriver;

/// Error reading or writing the game protocol.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The stream ended in the middle of the handshake.
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),
    /// A token that should be a number is not one.
    #[error("invalid number {token:?}")]
    InvalidNumber {
        /// The offending token.
        token: String,
    },
    /// A line ended before all expected values were read.
    #[error("expected {expected} values, found {found}")]
    MissingTokens {
        /// Values required.
        expected: usize,
        /// Values present.
        found: usize,
    },
    /// Run-length ownership covered more cells than the map has.
    #[error("run-length ownership covers {covered} cells on a {total}-cell map")]
    RunLengthOverflow {
        /// Cells covered so far, including the offending run.
        covered: usize,
        /// Cells in the map.
        total: usize,
    },
    /// Transport failure.
    #[error("protocol I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The decoded grid is inconsistent.
    #[error(transparent)]
    Flow(#[from] FlowError),
}

fn parse_token<T: FromStr>(token: &str) -> Result<T, ProtocolError> {
    token.parse().map_err(|_| ProtocolError::InvalidNumber {
        token: token.to_string(),
    })
}

/// Cursor over the numbers on one line.
struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
    consumed: usize,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            iter: line.split_whitespace(),
            consumed: 0,
        }
    }

    /// Parse the next token; `expected` is the token count the line should reach.
    fn next_value<T: FromStr>(&mut self, expected: usize) -> Result<T, ProtocolError> {
        let token = self.iter.next().ok_or(ProtocolError::MissingTokens {
            expected,
            found: self.consumed,
        })?;
        self.consumed += 1;
        parse_token(token)
    }
}

/// Parse every whitespace-separated token on a line.
fn parse_all<T: FromStr>(line: &str) -> Result<Vec<T>, ProtocolError> {
    line.split_whitespace().map(parse_token).collect()
}

/// Parse the `width height` line.
///
/// # Errors
///
/// Returns an error for a missing or non-numeric dimension.
pub fn decode_dimensions(line: &str) -> Result<(u16, u16), ProtocolError> {
    let values: Vec<u16> = parse_all(line)?;
    match values[..] {
        [width, height, ..] => Ok((width, height)),
        _ => Err(ProtocolError::MissingTokens {
            expected: 2,
            found: values.len(),
        }),
    }
}

/// Parse the production line.
///
/// # Errors
///
/// Returns an error for a non-numeric token or fewer than `width·height` values.
pub fn decode_productions(width: u16, height: u16, line: &str) -> Result<Vec<u8>, ProtocolError> {
    let total = usize::from(width) * usize::from(height);
    let mut values: Vec<u8> = parse_all(line)?;
    if values.len() < total {
        return Err(ProtocolError::MissingTokens {
            expected: total,
            found: values.len(),
        });
    }
    values.truncate(total);
    Ok(values)
}

/// Decode one frame line into a map.
///
/// # Errors
///
/// Returns an error for malformed tokens, runs that overflow the map, a
/// short strength list, or a production grid of the wrong size.
pub fn decode_frame(
    width: u16,
    height: u16,
    productions: &[u8],
    line: &str,
) -> Result<GameMap, ProtocolError> {
    let total = usize::from(width) * usize::from(height);
    if productions.len() != total {
        return Err(FlowError::MalformedSnapshot {
            width,
            height,
            cells: productions.len(),
        }
        .into());
    }

    let mut tokens = Tokens::new(line);
    let mut owners: Vec<Option<PlayerId>> = Vec::with_capacity(total);
    while owners.len() < total {
        let needed = tokens.consumed + 2;
        let count: usize = tokens.next_value(needed)?;
        let owner: PlayerId = tokens.next_value(needed)?;
        if owners.len().checked_add(count).is_none_or(|covered| covered > total) {
            return Err(ProtocolError::RunLengthOverflow {
                covered: owners.len().saturating_add(count),
                total,
            });
        }
        let owner = (owner != 0).then_some(owner);
        owners.extend(std::iter::repeat_n(owner, count));
    }

    let needed = tokens.consumed + total;
    let mut cells = Vec::with_capacity(total);
    for (owner, &production) in owners.into_iter().zip(productions) {
        let strength: u8 = tokens.next_value(needed)?;
        cells.push(Cell {
            owner,
            strength,
            production,
        });
    }

    Ok(GameMap::new(width, height, cells)?)
}

/// Encode a frame line for `map`; the inverse of [`decode_frame`].
#[must_use]
pub fn encode_frame(map: &GameMap) -> String {
    let mut line = String::new();
    let mut run: Option<(u8, usize)> = None;

    for cell in map.cells() {
        let owner = cell.owner.unwrap_or(0);
        run = match run {
            Some((current, count)) if current == owner => Some((current, count + 1)),
            Some((current, count)) => {
                let _ = write!(line, "{count} {current} ");
                Some((owner, 1))
            }
            None => Some((owner, 1)),
        };
    }
    if let Some((current, count)) = run {
        let _ = write!(line, "{count} {current}");
    }
    for cell in map.cells() {
        let _ = write!(line, " {}", cell.strength);
    }
    line
}

/// Encode actions as `x y direction` triples.
#[must_use]
pub fn encode_moves(actions: &ActionSet) -> String {
    let mut line = String::new();
    for action in actions {
        if !line.is_empty() {
            line.push(' ');
        }
        let _ = write!(
            line,
            "{} {} {}",
            action.coord.x,
            action.coord.y,
            action.direction.code()
        );
    }
    line
}

/// [`TurnDriver`] over a line-based reader and writer.
#[derive(Debug)]
pub struct StdioDriver<R, W> {
    reader: R,
    writer: W,
    player: PlayerId,
    width: u16,
    height: u16,
    productions: Vec<u8>,
    /// The frame delivered with the init block, served as the first turn.
    pending: Option<GameMap>,
    line: String,
}

impl<R: BufRead, W: Write> StdioDriver<R, W> {
    /// Read the init block and reply with `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the init block is incomplete or malformed, or the
    /// reply cannot be written.
    pub fn connect(mut reader: R, mut writer: W, name: &str) -> Result<Self, ProtocolError> {
        let mut line = String::new();

        read_required(&mut reader, &mut line, "player tag")?;
        let player: PlayerId = parse_token(line.trim())?;

        read_required(&mut reader, &mut line, "map dimensions")?;
        let (width, height) = decode_dimensions(&line)?;

        read_required(&mut reader, &mut line, "productions")?;
        let productions = decode_productions(width, height, &line)?;

        read_required(&mut reader, &mut line, "initial frame")?;
        let map = decode_frame(width, height, &productions, &line)?;

        writeln!(writer, "{name}")?;
        writer.flush()?;

        tracing::info!(player, width, height, "connected to game server");

        Ok(Self {
            reader,
            writer,
            player,
            width,
            height,
            productions,
            pending: Some(map),
            line,
        })
    }

    /// Map dimensions announced at init.
    #[must_use]
    pub const fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}

fn read_required<R: BufRead>(
    reader: &mut R,
    line: &mut String,
    what: &'static str,
) -> Result<(), ProtocolError> {
    line.clear();
    if reader.read_line(line)? == 0 {
        return Err(ProtocolError::UnexpectedEof(what));
    }
    Ok(())
}

impl<R: BufRead, W: Write> TurnDriver for StdioDriver<R, W> {
    type Error = ProtocolError;

    fn player(&self) -> PlayerId {
        self.player
    }

    fn next_snapshot(&mut self) -> Result<Option<GameMap>, ProtocolError> {
        if let Some(map) = self.pending.take() {
            return Ok(Some(map));
        }

        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 || self.line.trim().is_empty() {
            tracing::debug!("game server closed the stream");
            return Ok(None);
        }
        decode_frame(self.width, self.height, &self.productions, &self.line).map(Some)
    }

    fn submit(&mut self, actions: &ActionSet) -> Result<(), ProtocolError> {
        writeln!(self.writer, "{}", encode_moves(actions))?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Coord, Direction};
    use crate::policy::Action;

    #[test]
    fn test_decode_frame() {
        // 3x2: first three cells owned by 1, then three unowned.
        let productions = [1, 2, 3, 4, 5, 6];
        let map = decode_frame(3, 2, &productions, "3 1 3 0 10 20 30 40 50 60").unwrap();

        assert_eq!(map.count_owned(1), 3);
        let cell = map.get(Coord::new(2, 1)).unwrap();
        assert_eq!(cell.owner, None);
        assert_eq!(cell.strength, 60);
        assert_eq!(cell.production, 6);
        assert_eq!(map.get(Coord::new(1, 0)).unwrap().strength, 20);
    }

    #[test]
    fn test_decode_frame_errors() {
        let productions = [1; 4];
        assert!(matches!(
            decode_frame(2, 2, &productions, "5 1 1 1 1 1 1"),
            Err(ProtocolError::RunLengthOverflow { covered: 5, total: 4 })
        ));
        assert!(matches!(
            decode_frame(2, 2, &productions, &format!("1 1 {} 1 4 1 1 1 1 1", usize::MAX)),
            Err(ProtocolError::RunLengthOverflow {
                covered: usize::MAX,
                total: 4
            })
        ));
        assert!(matches!(
            decode_frame(2, 2, &productions, "4 1 1 1 1"),
            Err(ProtocolError::MissingTokens { .. })
        ));
        assert!(matches!(
            decode_frame(2, 2, &productions, "4 x 1 1 1 1"),
            Err(ProtocolError::InvalidNumber { .. })
        ));
        assert!(matches!(
            decode_frame(2, 2, &productions, "4 1 1 1 1 300"),
            Err(ProtocolError::InvalidNumber { .. })
        ));
        assert!(matches!(
            decode_frame(2, 2, &[1; 3], "4 1 1 1 1 1"),
            Err(ProtocolError::Flow(FlowError::MalformedSnapshot { cells: 3, .. }))
        ));
    }

    #[test]
    fn test_encode_frame_matches_decode() {
        let productions = [1, 2, 3, 4, 5, 6];
        let line = "2 1 1 0 2 2 1 0 10 20 30 40 50 60";
        let map = decode_frame(3, 2, &productions, line).unwrap();
        assert_eq!(encode_frame(&map), line);
    }

    #[test]
    fn test_encode_moves() {
        let map = GameMap::filled(3, 3, Cell::owned(1, 100, 1)).unwrap();
        let mut actions = ActionSet::new();
        actions
            .insert(&map, 1, Action::new(Coord::new(1, 2), Direction::West))
            .unwrap();
        actions
            .insert(&map, 1, Action::new(Coord::new(0, 0), Direction::Still))
            .unwrap();
        assert_eq!(encode_moves(&actions), "1 2 4 0 0 0");
        assert_eq!(encode_moves(&ActionSet::new()), "");
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(decode_dimensions("30 20\n").unwrap(), (30, 20));
        assert!(matches!(
            decode_dimensions("30"),
            Err(ProtocolError::MissingTokens { expected: 2, found: 1 })
        ));
    }
}
