//! Match orchestrator: the control-state machine, input application,
//! special-bar resource, scoring and win detection.

use serde::{Deserialize, Serialize};

use crate::ball::Ball;
use crate::board::Board;
use crate::config::GameConfig;
use crate::constants::{
    ARENA_HEIGHT, ARENA_WIDTH, BOARD_ROWS, PADDLE_GAP, PADDLE_HEIGHT, PADDLE_WIDTH, SERVE_AIM_STEP_DEG,
    SERVE_GAP, SERVE_MAX_ANGLE_DEG,
};
use crate::geometry::Rect;
use crate::paddle::Paddle;
use crate::piece::PieceKind;
use crate::Side;

/// Control state. Exactly one is active at a time; combinations like
/// "paused while serving" are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Ball glued to the serving paddle, aimable, waiting for launch.
    Serving,
    /// Live simulation.
    Playing,
    /// Frozen mid-play; only unpause or reset leave this state.
    Paused,
    /// Terminal until an explicit reset.
    GameOver,
}

/// One player's input flags for a single tick. Sent over the wire every
/// tick in networked mode, with no delta compression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    pub left: bool,
    pub right: bool,
    pub launch: bool,
    pub aim_up: bool,
    pub aim_down: bool,
    pub power_shot: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub config: GameConfig,
    pub board: Board,
    pub ball: Ball,
    pub top_paddle: Paddle,
    pub bottom_paddle: Paddle,
    pub phase: Phase,
    pub winner: Option<Side>,
    pub serving_player: Side,
    /// Serve aim in degrees, clamped to the symmetric limit.
    pub serve_angle: f32,
    /// Shared piercing-shot resource, fed by both players' piece hits.
    pub special_bar: u32,
    /// Set when a special shot activates; cleared (with the bar) on the
    /// first piece hit that follows.
    pub(crate) special_reset_pending: bool,
    pub score_top: u32,
    pub score_bottom: u32,
    board_bounds: Rect,
    paddle_bounds: Rect,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let board = Board::new(&config);
        let board_bounds = board.bounds();
        let paddle_bounds = board.paddle_bounds();

        let paddle_x = board.left + (board_bounds.width - PADDLE_WIDTH) / 2.0;
        // Paddles sit one gap beyond their own pawn rank, shielding it.
        let top_paddle_y = board.top + 2.0 * board.cell_size + PADDLE_GAP;
        let bottom_paddle_y =
            board.top + (BOARD_ROWS - 2) as f32 * board.cell_size - PADDLE_GAP - PADDLE_HEIGHT;

        let ball = Ball::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0, &config);
        let serving_player = config.starting_player;

        Self {
            board,
            ball,
            top_paddle: Paddle::new(paddle_x, top_paddle_y, Side::Top),
            bottom_paddle: Paddle::new(paddle_x, bottom_paddle_y, Side::Bottom),
            phase: Phase::Serving,
            winner: None,
            serving_player,
            serve_angle: 0.0,
            special_bar: 0,
            special_reset_pending: false,
            score_top: 0,
            score_bottom: 0,
            board_bounds,
            paddle_bounds,
            config,
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Top => &self.top_paddle,
            Side::Bottom => &self.bottom_paddle,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Top => self.score_top,
            Side::Bottom => self.score_bottom,
        }
    }

    /// Advance the simulation by one tick with both players' inputs.
    /// `Paused` and `GameOver` freeze everything; leaving those states goes
    /// through [`Game::toggle_pause`] and [`Game::reset`].
    pub fn tick(&mut self, top: &InputFrame, bottom: &InputFrame) {
        match self.phase {
            Phase::Paused | Phase::GameOver => {}
            Phase::Serving => {
                self.apply_movement(Side::Top, top);
                self.apply_movement(Side::Bottom, bottom);
                self.glue_ball_to_server();

                let server_input = match self.serving_player {
                    Side::Top => top,
                    Side::Bottom => bottom,
                };
                self.apply_aim(*server_input);
                if server_input.launch {
                    self.launch();
                }
            }
            Phase::Playing => {
                self.apply_movement(Side::Top, top);
                self.apply_movement(Side::Bottom, bottom);
                if top.power_shot {
                    self.try_power_shot(Side::Top);
                }
                if bottom.power_shot {
                    self.try_power_shot(Side::Bottom);
                }
                self.step_physics();
            }
        }
    }

    /// Pause toggle; reachable only from `Playing` and back.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            other => other,
        };
    }

    /// Unconditional restart, accepted from any state: fresh board, zeroed
    /// scores, cleared special bar, ball at rest in the center, paddles at
    /// their initial spot, back to `Serving`.
    pub fn reset(&mut self) {
        let fresh = Game::new(self.config.clone());
        *self = fresh;
    }

    fn apply_movement(&mut self, side: Side, input: &InputFrame) {
        let bounds = self.paddle_bounds;
        let paddle = match side {
            Side::Top => &mut self.top_paddle,
            Side::Bottom => &mut self.bottom_paddle,
        };
        if input.left {
            paddle.slide(true, &bounds);
        }
        if input.right {
            paddle.slide(false, &bounds);
        }
    }

    fn apply_aim(&mut self, input: InputFrame) {
        if input.aim_up {
            self.serve_angle += SERVE_AIM_STEP_DEG;
        }
        if input.aim_down {
            self.serve_angle -= SERVE_AIM_STEP_DEG;
        }
        self.serve_angle = self
            .serve_angle
            .clamp(-SERVE_MAX_ANGLE_DEG, SERVE_MAX_ANGLE_DEG);
    }

    /// Keep the ball attached to the serving paddle's face, horizontally
    /// centered. Ownership is pre-set to the server so the launch cannot
    /// immediately damage the server's own pieces.
    fn glue_ball_to_server(&mut self) {
        let rect = self.paddle(self.serving_player).rect;
        self.ball.x = rect.center_x();
        self.ball.y = match self.serving_player {
            Side::Top => rect.bottom() + self.ball.radius + SERVE_GAP,
            Side::Bottom => rect.top - self.ball.radius - SERVE_GAP,
        };
        self.ball.last_touched_by = Some(self.serving_player);
    }

    fn launch(&mut self) {
        let angle = self.serve_angle.to_radians();
        let speed = self.config.ball_speed;
        let toward_opponent = match self.serving_player {
            Side::Top => 1.0,
            Side::Bottom => -1.0,
        };
        self.ball.vx = speed * angle.sin();
        self.ball.vy = speed * angle.cos() * toward_opponent;
        self.ball.last_touched_by = Some(self.serving_player);

        // A full bar at launch serves a piercing ball right away.
        if self.special_bar >= self.config.special_bar_max && !self.ball.is_special {
            self.activate_special();
        }
        self.phase = Phase::Playing;
    }

    fn activate_special(&mut self) {
        self.ball.activate_special(self.config.special_ball_damage);
        self.special_reset_pending = true;
    }

    /// Aim the live special ball at the opposing king's center. Only the
    /// player currently owning the ball may trigger it, and a dead king
    /// makes it a no-op.
    fn try_power_shot(&mut self, side: Side) {
        if !self.ball.is_special || self.ball.last_touched_by != Some(side) {
            return;
        }
        if let Some(king) = self.board.king(side.opponent()) {
            let (kx, ky) = king.rect.center();
            self.ball.direct_to(kx, ky, None);
        }
    }

    fn step_physics(&mut self) {
        self.ball.advance(&self.board_bounds);

        // Auto-activation happens before piece collisions are evaluated.
        if self.special_bar >= self.config.special_bar_max && !self.ball.is_special {
            self.activate_special();
        }

        self.ball.collide_with_paddle(&self.top_paddle);
        self.ball.collide_with_paddle(&self.bottom_paddle);

        let hits = self.ball.collide_with_pieces(&mut self.board.pieces);
        for hit in &hits {
            if self.special_reset_pending {
                // The bar empties exactly once, on the first hit after a
                // special shot went out.
                self.special_bar = 0;
                self.special_reset_pending = false;
            } else if !hit.special {
                self.special_bar = (self.special_bar + 1).min(self.config.special_bar_max);
            }

            if hit.destroyed {
                let scorer = hit.owner.opponent();
                let value = self.config.points.get(hit.kind) as u32;
                match scorer {
                    Side::Top => self.score_top += value,
                    Side::Bottom => self.score_bottom += value,
                }
                if hit.kind == PieceKind::King {
                    self.winner = Some(scorer);
                    self.phase = Phase::GameOver;
                }
            }
        }
    }
}
