//! Board layout engine. Places two ranks of pieces per side in a chess-like
//! starting formation and derives the cell geometry every other component
//! positions itself against.
//!
//! The layout is a pure function of (column count, row count): re-running it
//! on reset reproduces the identical board, including piece ids.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::constants::{ARENA_HEIGHT, ARENA_WIDTH, BOARD_ROWS, PIECE_HEIGHT, PIECE_WIDTH};
use crate::geometry::Rect;
use crate::piece::{Piece, PieceKind};
use crate::Side;

/// Canonical 8-wide back rank. Narrower boards take the center-aligned
/// subset: 2 cols → queen+king, 4 cols → bishops in, 6 cols → knights in.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub pieces: Vec<Piece>,
    pub cols: u32,
    /// Square cell edge length (pixels).
    pub cell_size: f32,
    /// Left edge of the board, centered within the arena.
    pub left: f32,
    /// Top edge of the board, centered within the arena.
    pub top: f32,
}

impl Board {
    pub fn new(config: &GameConfig) -> Self {
        let cols = config.board_cols as usize;
        let rows = BOARD_ROWS;

        // Largest whole-pixel square cell that fits the arena.
        let cell_size = (ARENA_WIDTH / cols as f32)
            .min(ARENA_HEIGHT / rows as f32)
            .floor();
        let left = ((ARENA_WIDTH - cell_size * cols as f32) / 2.0).floor();
        let top = ((ARENA_HEIGHT - cell_size * rows as f32) / 2.0).floor();

        let mut board = Self {
            pieces: Vec::with_capacity(cols * 4),
            cols: config.board_cols,
            cell_size,
            left,
            top,
        };

        let start = (8 - cols) / 2;
        let back_rank = &BACK_RANK[start..start + cols];
        let mut next_id: u16 = 0;
        let mut place = |board: &mut Board, kind: PieceKind, owner: Side, col: usize, row: usize| {
            let rect = board.cell_centered_rect(col, row, PIECE_WIDTH, PIECE_HEIGHT);
            let piece = Piece::new(next_id, kind, owner, rect, config.lives.get(kind));
            next_id += 1;
            board.pieces.push(piece);
        };

        // Top side: back rank on rank 0, pawns on rank 1.
        for (col, &kind) in back_rank.iter().enumerate() {
            place(&mut board, kind, Side::Top, col, 0);
        }
        for col in 0..cols {
            place(&mut board, PieceKind::Pawn, Side::Top, col, 1);
        }
        // Bottom side mirrored: pawns on rank rows-2, back rank on rank rows-1.
        for col in 0..cols {
            place(&mut board, PieceKind::Pawn, Side::Bottom, col, rows - 2);
        }
        for (col, &kind) in back_rank.iter().enumerate() {
            place(&mut board, kind, Side::Bottom, col, rows - 1);
        }

        board
    }

    fn cell_centered_rect(&self, col: usize, row: usize, width: f32, height: f32) -> Rect {
        Rect::new(
            self.left + col as f32 * self.cell_size + (self.cell_size - width) / 2.0,
            self.top + row as f32 * self.cell_size + (self.cell_size - height) / 2.0,
            width,
            height,
        )
    }

    /// Playable area the ball is confined to.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.cell_size * self.cols as f32,
            self.cell_size * BOARD_ROWS as f32,
        )
    }

    /// Horizontal corridor paddles may slide within (full arena height).
    pub fn paddle_bounds(&self) -> Rect {
        Rect::new(self.left, 0.0, self.cell_size * self.cols as f32, ARENA_HEIGHT)
    }

    /// The given side's king, if it is still alive.
    pub fn king(&self, side: Side) -> Option<&Piece> {
        self.pieces
            .iter()
            .find(|p| p.kind == PieceKind::King && p.owner == side && p.is_alive())
    }
}
