//! Static chess-piece obstacles. Pieces never move and have no legal-move
//! logic; they only hold hit points and a hitbox.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

/// A destructible obstacle on the board.
///
/// `id` is assigned once at layout time and stays stable for the whole
/// match; network replication matches pieces by id, never by list position.
/// Dead pieces remain in the board collection with `life == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub id: u16,
    pub kind: PieceKind,
    pub owner: Side,
    pub rect: Rect,
    pub max_life: i32,
    pub life: i32,
}

impl Piece {
    pub fn new(id: u16, kind: PieceKind, owner: Side, rect: Rect, max_life: i32) -> Self {
        Self {
            id,
            kind,
            owner,
            rect,
            max_life,
            life: max_life,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Reduce life by `amount`, flooring at zero. Life never goes negative
    /// and never regenerates.
    pub fn take_damage(&mut self, amount: i32) {
        self.life = (self.life - amount).max(0);
    }
}
