//! Fixed arena and entity dimensions. Everything tunable per match lives in
//! [`crate::config::GameConfig`] instead.

/// Arena width (pixels). Eight 70 px files.
pub const ARENA_WIDTH: f32 = 560.0;

/// Arena height (pixels). Thirteen 70 px ranks.
pub const ARENA_HEIGHT: f32 = 910.0;

/// Number of board ranks. The two outermost ranks per side hold pieces.
pub const BOARD_ROWS: usize = 13;

/// Chess piece hitbox width (pixels)
pub const PIECE_WIDTH: f32 = 36.0;

/// Chess piece hitbox height (pixels)
pub const PIECE_HEIGHT: f32 = 36.0;

/// Paddle width (pixels)
pub const PADDLE_WIDTH: f32 = 100.0;

/// Paddle height (pixels)
pub const PADDLE_HEIGHT: f32 = 16.0;

/// Paddle horizontal speed (pixels per tick)
pub const PADDLE_SPEED: f32 = 7.0;

/// Ball radius (pixels)
pub const BALL_RADIUS: f32 = 10.0;

/// Horizontal velocity added per unit of normalized paddle-center offset
pub const PADDLE_SPIN: f32 = 1.5;

/// Gap between a pawn rank and the paddle protecting it (pixels)
pub const PADDLE_GAP: f32 = 25.0;

/// Gap between the serving paddle's face and the glued ball (pixels)
pub const SERVE_GAP: f32 = 2.0;

/// Serve aim limit, symmetric around straight ahead (degrees)
pub const SERVE_MAX_ANGLE_DEG: f32 = 45.0;

/// Serve aim adjustment per tick of held aim input (degrees)
pub const SERVE_AIM_STEP_DEG: f32 = 1.5;

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
