//! Full-state snapshot: the single shape used for network replication and
//! for save files. The authoritative side captures one per tick; the thin
//! side applies it wholesale.
//!
//! Pieces are matched by the stable id assigned at layout time, not by list
//! position, so a snapshot survives reordering of the board collection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Game, Phase};
use crate::Side;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub last_touched_by: Option<Side>,
    pub is_special: bool,
    pub damage: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleSnapshot {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceSnapshot {
    pub id: u16,
    pub life: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ball: BallSnapshot,
    pub top_paddle: PaddleSnapshot,
    pub bottom_paddle: PaddleSnapshot,
    pub pieces: Vec<PieceSnapshot>,
    pub game_over: bool,
    pub winner: Option<Side>,
    pub serving: bool,
    pub serving_player: Side,
    pub serve_angle: f32,
    pub paused: bool,
    pub special_bar: u32,
    pub score_top: u32,
    pub score_bottom: u32,
}

/// Shape mismatch between a snapshot and the receiving board. The receiver
/// leaves its state untouched when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    PieceCountMismatch { expected: usize, got: usize },
    UnknownPieceId(u16),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::PieceCountMismatch { expected, got } => {
                write!(f, "snapshot has {got} pieces, board has {expected}")
            }
            SnapshotError::UnknownPieceId(id) => {
                write!(f, "snapshot references unknown piece id {id}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

impl Snapshot {
    pub fn capture(game: &Game) -> Self {
        Self {
            ball: BallSnapshot {
                x: game.ball.x,
                y: game.ball.y,
                vx: game.ball.vx,
                vy: game.ball.vy,
                last_touched_by: game.ball.last_touched_by,
                is_special: game.ball.is_special,
                damage: game.ball.damage,
            },
            top_paddle: PaddleSnapshot {
                x: game.top_paddle.rect.left,
                y: game.top_paddle.rect.top,
            },
            bottom_paddle: PaddleSnapshot {
                x: game.bottom_paddle.rect.left,
                y: game.bottom_paddle.rect.top,
            },
            pieces: game
                .board
                .pieces
                .iter()
                .map(|p| PieceSnapshot { id: p.id, life: p.life })
                .collect(),
            game_over: game.phase == Phase::GameOver,
            winner: game.winner,
            serving: game.phase == Phase::Serving,
            serving_player: game.serving_player,
            serve_angle: game.serve_angle,
            paused: game.phase == Phase::Paused,
            special_bar: game.special_bar,
            score_top: game.score_top,
            score_bottom: game.score_bottom,
        }
    }
}

impl Game {
    /// Replace live state wholesale with `snapshot`. The only validation is
    /// shape-matching the piece list against the board; on error nothing is
    /// modified.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if snapshot.pieces.len() != self.board.pieces.len() {
            return Err(SnapshotError::PieceCountMismatch {
                expected: self.board.pieces.len(),
                got: snapshot.pieces.len(),
            });
        }
        let mut indices = Vec::with_capacity(snapshot.pieces.len());
        for ps in &snapshot.pieces {
            match self.board.pieces.iter().position(|p| p.id == ps.id) {
                Some(i) => indices.push(i),
                None => return Err(SnapshotError::UnknownPieceId(ps.id)),
            }
        }

        for (ps, &i) in snapshot.pieces.iter().zip(&indices) {
            self.board.pieces[i].life = ps.life;
        }

        self.ball.x = snapshot.ball.x;
        self.ball.y = snapshot.ball.y;
        self.ball.vx = snapshot.ball.vx;
        self.ball.vy = snapshot.ball.vy;
        self.ball.last_touched_by = snapshot.ball.last_touched_by;
        self.ball.is_special = snapshot.ball.is_special;
        self.ball.damage = snapshot.ball.damage;

        self.top_paddle.rect.left = snapshot.top_paddle.x;
        self.top_paddle.rect.top = snapshot.top_paddle.y;
        self.bottom_paddle.rect.left = snapshot.bottom_paddle.x;
        self.bottom_paddle.rect.top = snapshot.bottom_paddle.y;

        self.winner = snapshot.winner;
        self.serving_player = snapshot.serving_player;
        self.serve_angle = snapshot.serve_angle;
        self.special_bar = snapshot.special_bar;
        self.score_top = snapshot.score_top;
        self.score_bottom = snapshot.score_bottom;

        self.phase = if snapshot.game_over {
            Phase::GameOver
        } else if snapshot.serving {
            Phase::Serving
        } else if snapshot.paused {
            Phase::Paused
        } else {
            Phase::Playing
        };

        Ok(())
    }
}
