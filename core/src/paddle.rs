//! Horizontal paddles. Each paddle slides along a fixed row and clamps to
//! the board's horizontal extent instead of erroring.

use serde::{Deserialize, Serialize};

use crate::constants::{PADDLE_HEIGHT, PADDLE_SPEED, PADDLE_WIDTH};
use crate::geometry::Rect;
use crate::Side;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    pub speed: f32,
    pub owner: Side,
}

impl Paddle {
    pub fn new(x: f32, y: f32, owner: Side) -> Self {
        Self {
            rect: Rect::new(x, y, PADDLE_WIDTH, PADDLE_HEIGHT),
            speed: PADDLE_SPEED,
            owner,
        }
    }

    /// Shift horizontally by one speed step, then clamp inside `bounds`.
    /// The vertical position never changes during a match.
    pub fn slide(&mut self, left: bool, bounds: &Rect) {
        if left {
            self.rect.left -= self.speed;
        } else {
            self.rect.left += self.speed;
        }

        if self.rect.left < bounds.left {
            self.rect.left = bounds.left;
        }
        if self.rect.right() > bounds.right() {
            self.rect.left = bounds.right() - self.rect.width;
        }
    }
}
