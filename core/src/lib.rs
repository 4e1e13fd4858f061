//! Match simulation for the paddle-chess arcade game: a ball bounces inside
//! a bounded arena, striking paddles and static chess-piece obstacles with
//! hit points. A side wins when the opposing king is destroyed.
//!
//! This crate is pure logic with no I/O; the `chesspong-host` crate layers
//! networking, persistence and the CLI on top of it.

use serde::{Deserialize, Serialize};

pub mod ball;
pub mod board;
pub mod config;
pub mod constants;
pub mod game;
pub mod geometry;
pub mod paddle;
pub mod piece;
pub mod snapshot;

pub use ball::Ball;
pub use board::Board;
pub use config::GameConfig;
pub use game::{Game, InputFrame, Phase};
pub use geometry::Rect;
pub use paddle::Paddle;
pub use piece::{Piece, PieceKind};
pub use snapshot::Snapshot;

/// One of the two players. `Top` defends the upper ranks and is player 1 in
/// the configuration numbering; `Bottom` is player 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    /// Map the 1/2 player numbering used by configuration to a side.
    /// Anything other than 2 is player 1.
    pub fn from_player_number(n: i64) -> Side {
        if n == 2 {
            Side::Bottom
        } else {
            Side::Top
        }
    }

    pub fn player_number(self) -> u8 {
        match self {
            Side::Top => 1,
            Side::Bottom => 2,
        }
    }
}
