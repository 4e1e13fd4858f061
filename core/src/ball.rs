//! Ball kinematics and collision resolution: boundary bounce, paddle spin,
//! and the ordered piece scan with the piercing-shot budget.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::constants::{BALL_RADIUS, PADDLE_SPIN};
use crate::geometry::Rect;
use crate::paddle::Paddle;
use crate::piece::{Piece, PieceKind};
use crate::Side;

/// One resolved ball→piece contact, in scan order. The last entry of a
/// tick's hit list is the most recently struck piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceHit {
    pub id: u16,
    pub kind: PieceKind,
    pub owner: Side,
    /// Damage actually dealt: min(piece life, remaining budget).
    pub damage: i32,
    pub destroyed: bool,
    /// True when the ball was in special mode for this contact.
    pub special: bool,
    /// True when the piercing budget carried past this piece without a bounce.
    pub pierced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Side that last touched the ball via paddle, piece bounce or serve.
    /// Pieces owned by this side are immune until something else is touched.
    pub last_touched_by: Option<Side>,
    /// Piercing-shot state: while set, piece hits consume `damage` instead
    /// of bouncing.
    pub is_special: bool,
    /// Remaining damage budget. Equals `base_damage` outside special mode.
    pub damage: i32,
    base_damage: i32,
    base_speed: f32,
}

impl Ball {
    pub fn new(x: f32, y: f32, config: &GameConfig) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius: BALL_RADIUS,
            last_touched_by: None,
            is_special: false,
            damage: config.ball_damage,
            base_damage: config.ball_damage,
            base_speed: config.ball_speed,
        }
    }

    /// Bounding box, used for every collision test.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x - self.radius,
            self.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }

    /// Current speed magnitude.
    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Reposition at rest. Ownership and any active special are cleared.
    pub fn reset(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.last_touched_by = None;
        self.end_special();
    }

    pub fn activate_special(&mut self, special_damage: i32) {
        self.is_special = true;
        self.damage = special_damage;
    }

    /// Revert to normal mode, restoring the base damage budget.
    pub fn end_special(&mut self) {
        self.is_special = false;
        self.damage = self.base_damage;
    }

    /// Integrate one tick of motion and reflect off the arena edges.
    ///
    /// Reflection clamps the ball back to the edge before negating the
    /// velocity component, so a single call can never leave the ball
    /// outside `bounds`. Crossing the top or bottom edge cancels an active
    /// piercing shot.
    pub fn advance(&mut self, bounds: &Rect) {
        self.x += self.vx;
        self.y += self.vy;

        if self.y - self.radius <= bounds.top {
            self.y = bounds.top + self.radius;
            self.vy = -self.vy;
            if self.is_special {
                self.end_special();
            }
        } else if self.y + self.radius >= bounds.bottom() {
            self.y = bounds.bottom() - self.radius;
            self.vy = -self.vy;
            if self.is_special {
                self.end_special();
            }
        }

        if self.x - self.radius <= bounds.left {
            self.x = bounds.left + self.radius;
            self.vx = -self.vx;
        } else if self.x + self.radius >= bounds.right() {
            self.x = bounds.right() - self.radius;
            self.vx = -self.vx;
        }
    }

    /// Resolve a possible paddle contact. On hit the ball is placed just
    /// outside the paddle on the approach side, the vertical velocity is
    /// reflected, and a horizontal spin term proportional to the offset
    /// from the paddle center is added — the only source of horizontal
    /// velocity change outside serving and aiming.
    pub fn collide_with_paddle(&mut self, paddle: &Paddle) -> bool {
        if !self.rect().overlaps(&paddle.rect) {
            return false;
        }

        self.last_touched_by = Some(paddle.owner);

        if self.vy > 0.0 {
            self.y = paddle.rect.top - self.radius;
        } else {
            self.y = paddle.rect.bottom() + self.radius;
        }
        self.vy = -self.vy;

        let offset = (self.x - paddle.rect.center_x()) / (paddle.rect.width / 2.0);
        self.vx += offset * PADDLE_SPIN;
        true
    }

    /// Ordered scan over the piece collection, resolving at most one bounce.
    ///
    /// Dead pieces and pieces owned by `last_touched_by` are skipped. A
    /// piercing ball keeps scanning (and keeps its ownership) while budget
    /// remains; once the budget is spent it reverts to normal and the final
    /// contact bounces like any other. Bounce axis selection preserves the
    /// left→right→top→bottom comparison order of the four overlaps — equal
    /// overlaps resolve horizontal first, and changing that order changes
    /// observable behavior. After the geometric bounce the vertical
    /// direction is forced toward the struck owner's opponent so the ball
    /// always continues past that side's obstacles.
    pub fn collide_with_pieces(&mut self, pieces: &mut [Piece]) -> Vec<PieceHit> {
        let mut hits = Vec::new();
        let ball_rect = self.rect();

        for piece in pieces.iter_mut() {
            if !piece.is_alive() || !ball_rect.overlaps(&piece.rect) {
                continue;
            }
            if self.last_touched_by == Some(piece.owner) {
                continue;
            }

            let was_special = self.is_special;
            let dealt = self.damage.min(piece.life);
            piece.take_damage(dealt);
            let destroyed = !piece.is_alive();

            if was_special {
                self.damage -= dealt;
                if self.damage > 0 {
                    // Punch through: no bounce, ownership unchanged.
                    hits.push(PieceHit {
                        id: piece.id,
                        kind: piece.kind,
                        owner: piece.owner,
                        damage: dealt,
                        destroyed,
                        special: true,
                        pierced: true,
                    });
                    continue;
                }
                self.end_special();
            }

            self.last_touched_by = Some(piece.owner);

            let overlap_left = ball_rect.right() - piece.rect.left;
            let overlap_right = piece.rect.right() - ball_rect.left;
            let overlap_top = ball_rect.bottom() - piece.rect.top;
            let overlap_bottom = piece.rect.bottom() - ball_rect.top;
            let min_overlap = overlap_left
                .min(overlap_right)
                .min(overlap_top)
                .min(overlap_bottom);

            if min_overlap == overlap_left || min_overlap == overlap_right {
                if self.vx > 0.0 {
                    self.x = piece.rect.left - self.radius;
                } else {
                    self.x = piece.rect.right() + self.radius;
                }
                self.vx = -self.vx;
            } else {
                if self.vy > 0.0 {
                    self.y = piece.rect.top - self.radius;
                } else {
                    self.y = piece.rect.bottom() + self.radius;
                }
                self.vy = -self.vy;
            }

            // Deflect toward the struck side's opponent regardless of the
            // geometric bounce axis.
            match piece.owner {
                Side::Top => self.vy = self.vy.abs(),
                Side::Bottom => self.vy = -self.vy.abs(),
            }

            hits.push(PieceHit {
                id: piece.id,
                kind: piece.kind,
                owner: piece.owner,
                damage: dealt,
                destroyed,
                special: was_special,
                pierced: false,
            });
            break;
        }

        hits
    }

    /// Re-aim the velocity at a target point, preserving the current speed
    /// magnitude unless an override is given. No-op when already exactly at
    /// the target.
    pub fn direct_to(&mut self, target_x: f32, target_y: f32, speed: Option<f32>) {
        let dx = target_x - self.x;
        let dy = target_y - self.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance == 0.0 {
            return;
        }

        let speed = speed.unwrap_or_else(|| {
            let current = self.speed();
            if current == 0.0 {
                self.base_speed
            } else {
                current
            }
        });

        self.vx = dx / distance * speed;
        self.vy = dy / distance * speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn test_ball(x: f32, y: f32) -> Ball {
        Ball::new(x, y, &GameConfig::default())
    }

    fn piece_at(id: u16, owner: Side, left: f32, top: f32, life: i32) -> Piece {
        Piece::new(
            id,
            PieceKind::Pawn,
            owner,
            Rect::new(left, top, 36.0, 36.0),
            life,
        )
    }

    #[test]
    fn boundary_bounce_clamps_and_reflects() {
        let bounds = Rect::new(0.0, 0.0, 560.0, 910.0);
        let mut ball = test_ball(100.0, 12.0);
        ball.vx = 0.0;
        ball.vy = -5.0;
        ball.advance(&bounds);
        assert_eq!(ball.y, bounds.top + ball.radius);
        assert!(ball.vy > 0.0, "top bounce must send the ball down");

        let mut ball = test_ball(12.0, 400.0);
        ball.vx = -5.0;
        ball.advance(&bounds);
        assert_eq!(ball.x, bounds.left + ball.radius);
        assert!(ball.vx > 0.0, "left bounce must send the ball right");
    }

    #[test]
    fn ball_never_tunnels_past_an_edge() {
        let bounds = Rect::new(0.0, 0.0, 560.0, 910.0);
        let mut ball = test_ball(280.0, 455.0);
        ball.vx = 19.0;
        ball.vy = -17.0;
        for _ in 0..2000 {
            ball.advance(&bounds);
            assert!(ball.x - ball.radius >= bounds.left);
            assert!(ball.x + ball.radius <= bounds.right());
            assert!(ball.y - ball.radius >= bounds.top);
            assert!(ball.y + ball.radius <= bounds.bottom());
        }
    }

    #[test]
    fn wall_bounce_cancels_special() {
        let bounds = Rect::new(0.0, 0.0, 560.0, 910.0);
        let mut ball = test_ball(100.0, 15.0);
        ball.vy = -10.0;
        ball.activate_special(3);
        ball.advance(&bounds);
        assert!(!ball.is_special);
        assert_eq!(ball.damage, 1, "damage must revert to the base value");
    }

    #[test]
    fn side_wall_bounce_keeps_special() {
        let bounds = Rect::new(0.0, 0.0, 560.0, 910.0);
        let mut ball = test_ball(15.0, 455.0);
        ball.vx = -10.0;
        ball.activate_special(3);
        ball.advance(&bounds);
        assert!(ball.is_special);
        assert_eq!(ball.damage, 3);
    }

    #[test]
    fn paddle_hit_reflects_and_adds_spin() {
        let mut ball = test_ball(300.0, 720.0);
        ball.vx = 0.0;
        ball.vy = 3.0;
        let paddle = Paddle::new(230.0, 729.0, Side::Bottom);

        assert!(ball.collide_with_paddle(&paddle));
        assert_eq!(ball.last_touched_by, Some(Side::Bottom));
        assert!(ball.vy < 0.0);
        assert_eq!(ball.y, paddle.rect.top - ball.radius);
        // Hit right of center: spin pushes right.
        assert!(ball.vx > 0.0);
    }

    #[test]
    fn paddle_center_hit_adds_no_spin() {
        let mut ball = test_ball(280.0, 720.0);
        ball.vy = 3.0;
        let paddle = Paddle::new(230.0, 729.0, Side::Bottom);
        ball.collide_with_paddle(&paddle);
        assert_eq!(ball.vx, 0.0);
    }

    #[test]
    fn friendly_pieces_are_immune() {
        let mut ball = test_ball(50.0, 50.0);
        ball.vy = 3.0;
        ball.last_touched_by = Some(Side::Top);
        let mut pieces = vec![piece_at(0, Side::Top, 32.0, 32.0, 2)];

        let hits = ball.collide_with_pieces(&mut pieces);
        assert!(hits.is_empty());
        assert_eq!(pieces[0].life, 2, "friendly piece must take no damage");
    }

    #[test]
    fn dead_pieces_are_skipped() {
        let mut ball = test_ball(50.0, 50.0);
        ball.vy = 3.0;
        let mut pieces = vec![piece_at(0, Side::Bottom, 32.0, 32.0, 1)];
        pieces[0].life = 0;

        let hits = ball.collide_with_pieces(&mut pieces);
        assert!(hits.is_empty());
    }

    #[test]
    fn normal_hit_bounces_and_transfers_ownership() {
        // Ball descending into the top edge of an enemy piece.
        let mut ball = test_ball(50.0, 28.0);
        ball.vx = 0.0;
        ball.vy = 3.0;
        let mut pieces = vec![piece_at(7, Side::Bottom, 32.0, 32.0, 2)];

        let hits = ball.collide_with_pieces(&mut pieces);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 7);
        assert_eq!(hits[0].damage, 1);
        assert!(!hits[0].destroyed);
        assert_eq!(pieces[0].life, 1);
        assert_eq!(ball.last_touched_by, Some(Side::Bottom));
        // Bottom-owned piece always deflects upward.
        assert!(ball.vy < 0.0);
        assert_eq!(ball.y, pieces[0].rect.top - ball.radius);
    }

    #[test]
    fn symmetric_corner_resolves_horizontal_first() {
        // Ball dead-centered on a piece: all four overlaps are equal, so
        // the left overlap wins the fixed comparison order and the bounce
        // is horizontal.
        let mut ball = test_ball(50.0, 50.0);
        ball.vx = 2.0;
        ball.vy = 2.0;
        let mut pieces = vec![piece_at(0, Side::Bottom, 32.0, 32.0, 5)];

        ball.collide_with_pieces(&mut pieces);
        assert_eq!(ball.x, pieces[0].rect.left - ball.radius);
        assert!(ball.vx < 0.0, "horizontal component must reflect");
    }

    #[test]
    fn piercing_consumes_budget_without_bouncing() {
        let mut ball = test_ball(50.0, 50.0);
        ball.vx = 0.0;
        ball.vy = 3.0;
        ball.last_touched_by = Some(Side::Bottom);
        ball.activate_special(3);

        // Three overlapping enemy pawns, one life each.
        let mut pieces = vec![
            piece_at(0, Side::Top, 32.0, 32.0, 1),
            piece_at(1, Side::Top, 34.0, 34.0, 1),
            piece_at(2, Side::Top, 36.0, 36.0, 1),
        ];

        let hits = ball.collide_with_pieces(&mut pieces);
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.destroyed && h.special));
        assert!(hits[0].pierced && hits[1].pierced);
        assert!(!hits[2].pierced, "budget exhausted on the final contact");

        assert!(pieces.iter().all(|p| !p.is_alive()));
        assert!(!ball.is_special);
        assert_eq!(ball.damage, 1, "budget resets to base damage");
        // The final contact bounces, forced downward by the Top owner.
        assert!(ball.vy > 0.0);
        // Ownership only transfers on the bouncing contact.
        assert_eq!(ball.last_touched_by, Some(Side::Top));
    }

    #[test]
    fn piercing_keeps_ownership_while_budget_remains() {
        let mut ball = test_ball(50.0, 50.0);
        ball.vy = 3.0;
        ball.last_touched_by = Some(Side::Bottom);
        ball.activate_special(5);

        let mut pieces = vec![piece_at(0, Side::Top, 32.0, 32.0, 2)];
        let vy_before = ball.vy;
        let hits = ball.collide_with_pieces(&mut pieces);

        assert_eq!(hits.len(), 1);
        assert!(hits[0].pierced);
        assert_eq!(ball.last_touched_by, Some(Side::Bottom));
        assert_eq!(ball.vy, vy_before, "piercing contact must not bounce");
        assert!(ball.is_special);
        assert_eq!(ball.damage, 3);
    }

    #[test]
    fn special_hit_damage_is_capped_by_piece_life() {
        let mut ball = test_ball(50.0, 50.0);
        ball.vy = 3.0;
        ball.activate_special(10);
        let mut pieces = vec![piece_at(0, Side::Top, 32.0, 32.0, 2)];

        let hits = ball.collide_with_pieces(&mut pieces);
        assert_eq!(hits[0].damage, 2);
        assert_eq!(ball.damage, 8, "budget only pays the piece's actual life");
    }

    #[test]
    fn direct_to_preserves_speed() {
        let mut ball = test_ball(100.0, 100.0);
        ball.vx = 3.0;
        ball.vy = 4.0;
        ball.direct_to(200.0, 100.0, None);
        assert!((ball.speed() - 5.0).abs() < 1e-4);
        assert!(ball.vx > 0.0);
        assert_eq!(ball.vy, 0.0);
    }

    #[test]
    fn direct_to_zero_distance_is_a_no_op() {
        let mut ball = test_ball(100.0, 100.0);
        ball.vx = 3.0;
        ball.vy = 4.0;
        ball.direct_to(100.0, 100.0, None);
        assert_eq!((ball.vx, ball.vy), (3.0, 4.0));
    }

    #[test]
    fn direct_to_from_rest_uses_base_speed() {
        let mut ball = test_ball(100.0, 100.0);
        ball.direct_to(100.0, 200.0, None);
        assert!((ball.speed() - 3.0).abs() < 1e-4);
        assert!(ball.vy > 0.0);
    }
}
