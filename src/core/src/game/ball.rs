use crate::game::{EventCollection, GameEvent, GoalLine, PitchSize};
use nalgebra::Vector2;

pub const BALL_RADIUS: f32 = 8.0;

/// Per-tick multiplicative velocity decay. Applied once per tick,
/// independent of the dt-scaling approximation.
const DRAG: f32 = 0.985;
/// Fraction of speed kept after a wall rebound.
const RESTITUTION: f32 = 0.65;

pub struct Ball {
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    /// Lateral curve acceleration: bends the horizontal velocity only.
    pub spin: f32,
    pub radius: f32,

    start_position: Vector2<f32>,
}

impl Ball {
    pub fn with_coord(size: &PitchSize) -> Self {
        let center = size.center();

        Ball {
            position: center,
            velocity: Vector2::zeros(),
            spin: 0.0,
            radius: BALL_RADIUS,
            start_position: center,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.norm()
    }

    /// Advance the ball by one tick: spin, integration, drag, then
    /// goal detection ahead of wall rebound so an end-line crossing
    /// inside the goal mouth is observable before any clamp.
    pub fn update(&mut self, dt: f32, size: &PitchSize, events: &mut EventCollection) {
        self.velocity.x += self.spin * dt;

        self.position += self.velocity * dt;

        self.velocity *= DRAG;

        self.check_goal(size, events);
        self.check_boundary_collision(size);
    }

    /// Leading-edge crossing of either end line inside the goal mouth.
    /// The ball is left beyond the line; the event dispatcher performs
    /// the kickoff reset.
    fn check_goal(&self, size: &PitchSize, events: &mut EventCollection) {
        if !size.within_goal_mouth(self.position.x) {
            return;
        }

        if self.position.y - self.radius <= 0.0 {
            events.push(GameEvent::Goal(GoalLine::Far));
        } else if self.position.y + self.radius >= size.height {
            events.push(GameEvent::Goal(GoalLine::Near));
        }
    }

    /// Rebound on all four edges: clamp to the boundary minus radius
    /// and invert the offending component scaled by restitution, but
    /// only while still moving into the wall. End-line sections inside
    /// the goal mouth are left open for goal detection.
    fn check_boundary_collision(&mut self, size: &PitchSize) {
        if self.position.x - self.radius <= 0.0 {
            self.position.x = self.radius;
            if self.velocity.x < 0.0 {
                self.velocity.x = -self.velocity.x * RESTITUTION;
            }
        }

        if self.position.x + self.radius >= size.width {
            self.position.x = size.width - self.radius;
            if self.velocity.x > 0.0 {
                self.velocity.x = -self.velocity.x * RESTITUTION;
            }
        }

        if size.within_goal_mouth(self.position.x) {
            return;
        }

        if self.position.y - self.radius <= 0.0 {
            self.position.y = self.radius;
            if self.velocity.y < 0.0 {
                self.velocity.y = -self.velocity.y * RESTITUTION;
            }
        }

        if self.position.y + self.radius >= size.height {
            self.position.y = size.height - self.radius;
            if self.velocity.y > 0.0 {
                self.velocity.y = -self.velocity.y * RESTITUTION;
            }
        }
    }

    pub fn reset(&mut self) {
        self.position = self.start_position;
        self.velocity = Vector2::zeros();
        self.spin = 0.0;
    }
}
