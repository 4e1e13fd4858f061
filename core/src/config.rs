//! Match configuration: a typed record built once before play and passed
//! explicitly to the board, ball and game constructors. The value is
//! immutable after construction; mutating settings mid-match is not
//! supported.
//!
//! Every tunable has a declared range in [`SCHEMA`]. Out-of-range override
//! values clamp, unknown keys are ignored, nothing is ever rejected — the
//! same schema backs the (external) configuration menu.

use serde::{Deserialize, Serialize};

use crate::piece::PieceKind;
use crate::Side;

/// Declared range and default for one configuration key.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

/// Every key accepted by [`GameConfig::apply`].
pub const SCHEMA: &[FieldSpec] = &[
    FieldSpec { key: "ball_speed", min: 1, max: 20, default: 3 },
    FieldSpec { key: "ball_damage", min: 1, max: 10, default: 1 },
    FieldSpec { key: "board_width", min: 2, max: 8, default: 8 },
    FieldSpec { key: "starting_player", min: 1, max: 2, default: 1 },
    FieldSpec { key: "king_lives", min: 1, max: 10, default: 3 },
    FieldSpec { key: "queen_lives", min: 1, max: 10, default: 2 },
    FieldSpec { key: "bishop_lives", min: 1, max: 10, default: 2 },
    FieldSpec { key: "knight_lives", min: 1, max: 10, default: 2 },
    FieldSpec { key: "rook_lives", min: 1, max: 10, default: 2 },
    FieldSpec { key: "pawn_lives", min: 1, max: 10, default: 1 },
    FieldSpec { key: "king_points", min: 0, max: 1000, default: 100 },
    FieldSpec { key: "queen_points", min: 0, max: 1000, default: 50 },
    FieldSpec { key: "bishop_points", min: 0, max: 1000, default: 30 },
    FieldSpec { key: "knight_points", min: 0, max: 1000, default: 30 },
    FieldSpec { key: "rook_points", min: 0, max: 1000, default: 30 },
    FieldSpec { key: "pawn_points", min: 0, max: 1000, default: 10 },
    FieldSpec { key: "special_bar_max", min: 1, max: 100, default: 10 },
    FieldSpec { key: "special_ball_damage", min: 1, max: 20, default: 3 },
];

/// Per-piece-kind integer table (lives or point values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceTable {
    pub king: i32,
    pub queen: i32,
    pub bishop: i32,
    pub knight: i32,
    pub rook: i32,
    pub pawn: i32,
}

impl PieceTable {
    pub fn get(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::King => self.king,
            PieceKind::Queen => self.queen,
            PieceKind::Bishop => self.bishop,
            PieceKind::Knight => self.knight,
            PieceKind::Rook => self.rook,
            PieceKind::Pawn => self.pawn,
        }
    }

    fn set(&mut self, kind: PieceKind, value: i32) {
        match kind {
            PieceKind::King => self.king = value,
            PieceKind::Queen => self.queen = value,
            PieceKind::Bishop => self.bishop = value,
            PieceKind::Knight => self.knight = value,
            PieceKind::Rook => self.rook = value,
            PieceKind::Pawn => self.pawn = value,
        }
    }
}

/// Immutable-after-construction match settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub ball_speed: f32,
    pub ball_damage: i32,
    /// Number of board files, always even, in [2, 8].
    pub board_cols: u32,
    pub starting_player: Side,
    pub lives: PieceTable,
    pub points: PieceTable,
    pub special_bar_max: u32,
    pub special_ball_damage: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut cfg = Self {
            ball_speed: 0.0,
            ball_damage: 0,
            board_cols: 0,
            starting_player: Side::Top,
            lives: PieceTable { king: 0, queen: 0, bishop: 0, knight: 0, rook: 0, pawn: 0 },
            points: PieceTable { king: 0, queen: 0, bishop: 0, knight: 0, rook: 0, pawn: 0 },
            special_bar_max: 0,
            special_ball_damage: 0,
        };
        for spec in SCHEMA {
            cfg.apply(spec.key, spec.default);
        }
        cfg
    }
}

impl GameConfig {
    /// Build a configuration from defaults plus a flat key→value override
    /// map. Unknown keys are ignored; out-of-range values clamp.
    pub fn from_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut cfg = Self::default();
        for (key, value) in overrides {
            cfg.apply(key, value);
        }
        cfg
    }

    /// Apply a single keyed value, clamping it to its declared range.
    /// `board_width` is additionally rounded down to an even value before
    /// clamping. Keys not present in [`SCHEMA`] are silently ignored.
    pub fn apply(&mut self, key: &str, value: i64) {
        let Some(spec) = SCHEMA.iter().find(|s| s.key == key) else {
            return;
        };
        let mut value = value;
        if key == "board_width" {
            value -= value.rem_euclid(2);
        }
        let value = value.clamp(spec.min, spec.max);

        match key {
            "ball_speed" => self.ball_speed = value as f32,
            "ball_damage" => self.ball_damage = value as i32,
            "board_width" => self.board_cols = value as u32,
            "starting_player" => self.starting_player = Side::from_player_number(value),
            "king_lives" => self.lives.set(PieceKind::King, value as i32),
            "queen_lives" => self.lives.set(PieceKind::Queen, value as i32),
            "bishop_lives" => self.lives.set(PieceKind::Bishop, value as i32),
            "knight_lives" => self.lives.set(PieceKind::Knight, value as i32),
            "rook_lives" => self.lives.set(PieceKind::Rook, value as i32),
            "pawn_lives" => self.lives.set(PieceKind::Pawn, value as i32),
            "king_points" => self.points.set(PieceKind::King, value as i32),
            "queen_points" => self.points.set(PieceKind::Queen, value as i32),
            "bishop_points" => self.points.set(PieceKind::Bishop, value as i32),
            "knight_points" => self.points.set(PieceKind::Knight, value as i32),
            "rook_points" => self.points.set(PieceKind::Rook, value as i32),
            "pawn_points" => self.points.set(PieceKind::Pawn, value as i32),
            "special_bar_max" => self.special_bar_max = value as u32,
            "special_ball_damage" => self.special_ball_damage = value as i32,
            _ => unreachable!("key validated against SCHEMA"),
        }
    }
}
