use crate::game::{Ball, EventCollection, GameEvent, PitchSize, PossessionState, TeamSide};
use nalgebra::{Rotation2, Vector2};
use rand::Rng;
use rand::rngs::StdRng;

pub const KEEPER_SPEED: f32 = 170.0;
pub const KEEPER_REACTION_DELAY: f32 = 0.18;

/// Keeper stays this far inside the posts when shading across.
const GOAL_MARGIN: f32 = 12.0;
/// Lateral reach for a save attempt.
const SAVE_LATERAL_TOLERANCE: f32 = 26.0;
/// Depth band around the goal line where contact resolves.
const SAVE_DEPTH: f32 = 16.0;
/// Below this ball speed the keeper smothers instead of parrying.
const HOLD_SPEED_MAX: f32 = 240.0;
/// Fraction of speed kept on a parry.
const PARRY_DAMPING: f32 = 0.55;
/// Half-range of the randomized parry deflection, in radians.
const PARRY_DEFLECT: f32 = 0.5;

pub const PROTECT_AFTER_HOLD: f32 = 1.2;
pub const PROTECT_AFTER_PARRY: f32 = 0.4;
const TRAP_LOCK_AFTER_HOLD: f32 = 0.5;

/// One keeper per side, anchored to its own goal line. Repositioning
/// is gated by a reaction timer so tracking looks discrete and
/// human-like rather than continuous.
pub struct Goalkeeper {
    pub side: TeamSide,
    pub position: Vector2<f32>,
    pub speed: f32,
    pub reaction_delay: f32,
    pub reaction_timer: f32,
}

impl Goalkeeper {
    pub fn new(side: TeamSide, size: &PitchSize) -> Self {
        let mut keeper = Goalkeeper {
            side,
            position: Vector2::zeros(),
            speed: KEEPER_SPEED,
            reaction_delay: KEEPER_REACTION_DELAY,
            reaction_timer: 0.0,
        };
        keeper.reset(size);
        keeper
    }

    /// The goal line this keeper guards. The defending side guards the
    /// far goal, the attacking side the near goal.
    pub fn goal_line_y(&self, size: &PitchSize) -> f32 {
        match self.side {
            TeamSide::Defending => 0.0,
            TeamSide::Attacking => size.height,
        }
    }

    pub fn reset(&mut self, size: &PitchSize) {
        self.position = Vector2::new(size.half_width, self.goal_line_y(size));
        self.reaction_timer = 0.0;
    }

    fn ball_incoming(&self, ball: &Ball, size: &PitchSize) -> bool {
        match self.goal_line_y(size) {
            y if y == 0.0 => ball.velocity.y < 0.0,
            _ => ball.velocity.y > 0.0,
        }
    }

    /// Reposition towards the ball's projected goal-line crossing.
    /// Linear extrapolation only: the lateral effect of spin is
    /// deliberately ignored.
    pub fn update(&mut self, dt: f32, ball: &Ball, size: &PitchSize) {
        if !self.ball_incoming(ball, size) {
            return;
        }

        if self.reaction_timer > 0.0 {
            self.reaction_timer = (self.reaction_timer - dt).max(0.0);
            return;
        }

        let goal_y = self.goal_line_y(size);
        let vertical_speed = ball.velocity.y;

        if vertical_speed.abs() <= f32::EPSILON {
            return;
        }

        let time_to_line = (goal_y - ball.position.y) / vertical_speed;
        if time_to_line <= 0.0 {
            return;
        }

        let predicted_x = ball.position.x + ball.velocity.x * time_to_line;

        let reach = size.goal_half_width() - GOAL_MARGIN;
        let target_x = predicted_x.clamp(size.half_width - reach, size.half_width + reach);

        let max_step = self.speed * dt;
        let delta = target_x - self.position.x;
        self.position.x += delta.clamp(-max_step, max_step);

        // Reimpose the delay after every movement update.
        self.reaction_timer = self.reaction_delay;
    }

    /// Resolve contact at the goal line: smother a slow ball, parry a
    /// fast one back into play with a randomized, damped deflection.
    pub fn try_save(
        &mut self,
        ball: &mut Ball,
        state: &mut PossessionState,
        size: &PitchSize,
        rng: &mut StdRng,
        events: &mut EventCollection,
    ) {
        if !self.ball_incoming(ball, size) {
            return;
        }

        let goal_y = self.goal_line_y(size);

        if (ball.position.y - goal_y).abs() > SAVE_DEPTH {
            return;
        }

        if (ball.position.x - self.position.x).abs() > SAVE_LATERAL_TOLERANCE {
            return;
        }

        if ball.speed() < HOLD_SPEED_MAX {
            // Smothered: dead ball at the keeper's feet.
            ball.velocity = Vector2::zeros();
            ball.spin = 0.0;
            ball.position = self.position + Vector2::new(0.0, self.infield_direction() * ball.radius * 2.0);

            state.possession = crate::game::Possession::Unowned;
            state.protect = PROTECT_AFTER_HOLD;
            state.trap_lock = TRAP_LOCK_AFTER_HOLD;

            events.push(GameEvent::Save { held: true });
        } else {
            // Parried: reflected outward, damped, still live.
            let deflection = rng.random_range(-PARRY_DEFLECT..PARRY_DEFLECT);
            let mut outgoing = ball.velocity;
            outgoing.y = -outgoing.y;

            ball.velocity = Rotation2::new(deflection) * outgoing * PARRY_DAMPING;
            ball.spin = 0.0;

            state.protect = PROTECT_AFTER_PARRY;

            events.push(GameEvent::Save { held: false });
        }
    }

    /// Unit y-direction pointing from this keeper's line into the field.
    fn infield_direction(&self) -> f32 {
        match self.side {
            TeamSide::Defending => 1.0,
            TeamSide::Attacking => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn far_keeper(size: &PitchSize) -> Goalkeeper {
        Goalkeeper::new(TeamSide::Defending, size)
    }

    #[test]
    fn keeper_ignores_a_ball_moving_away() {
        let size = PitchSize::default();
        let mut keeper = far_keeper(&size);
        let mut ball = Ball::with_coord(&size);
        ball.velocity = Vector2::new(0.0, 120.0);

        let before = keeper.position;
        keeper.update(0.016, &ball, &size);

        assert_eq!(keeper.position, before);
    }

    #[test]
    fn keeper_moves_towards_the_projected_crossing() {
        let size = PitchSize::default();
        let mut keeper = far_keeper(&size);
        let mut ball = Ball::with_coord(&size);

        // Angled shot towards the far goal's left half.
        ball.position = Vector2::new(size.half_width, 300.0);
        ball.velocity = Vector2::new(-60.0, -300.0);

        keeper.update(0.016, &ball, &size);

        assert!(keeper.position.x < size.half_width);
        assert!(keeper.reaction_timer > 0.0, "delay must be reimposed");

        // While the delay is pending the keeper holds position.
        let held = keeper.position;
        keeper.update(0.016, &ball, &size);
        assert_eq!(keeper.position, held);
    }

    #[test]
    fn keeper_stays_within_the_goal_mouth() {
        let size = PitchSize::default();
        let mut keeper = far_keeper(&size);
        let mut ball = Ball::with_coord(&size);

        // Crossing far outside the posts.
        ball.position = Vector2::new(50.0, 100.0);
        ball.velocity = Vector2::new(-400.0, -100.0);

        for _ in 0..200 {
            keeper.reaction_timer = 0.0;
            keeper.update(0.016, &ball, &size);
        }

        let reach = size.goal_half_width() - GOAL_MARGIN;
        assert!(keeper.position.x >= size.half_width - reach - 1e-3);
    }

    #[test]
    fn slow_ball_is_smothered() {
        let size = PitchSize::default();
        let mut keeper = far_keeper(&size);
        let mut ball = Ball::with_coord(&size);
        let mut state = PossessionState::new();
        let mut events = EventCollection::new();
        let mut rng = StdRng::seed_from_u64(5);

        ball.position = Vector2::new(size.half_width + 4.0, 10.0);
        ball.velocity = Vector2::new(0.0, -100.0);

        keeper.try_save(&mut ball, &mut state, &size, &mut rng, &mut events);

        assert_eq!(ball.velocity, Vector2::zeros());
        assert_eq!(state.protect, PROTECT_AFTER_HOLD);
        assert!(events.iter().any(|e| *e == GameEvent::Save { held: true }));
        assert!(ball.position.y > keeper.position.y);
    }

    #[test]
    fn fast_ball_is_parried_outward_and_damped() {
        let size = PitchSize::default();
        let mut keeper = far_keeper(&size);
        let mut ball = Ball::with_coord(&size);
        let mut state = PossessionState::new();
        let mut events = EventCollection::new();
        let mut rng = StdRng::seed_from_u64(5);

        ball.position = Vector2::new(size.half_width, 8.0);
        ball.velocity = Vector2::new(0.0, -400.0);
        let incoming_speed = ball.speed();

        keeper.try_save(&mut ball, &mut state, &size, &mut rng, &mut events);

        assert!(ball.velocity.y > 0.0, "parry must send the ball back out");
        assert!((ball.speed() - incoming_speed * PARRY_DAMPING).abs() < 1e-2);
        assert_eq!(state.protect, PROTECT_AFTER_PARRY);
        assert!(events.iter().any(|e| *e == GameEvent::Save { held: false }));
    }

    #[test]
    fn save_requires_lateral_contact() {
        let size = PitchSize::default();
        let mut keeper = far_keeper(&size);
        let mut ball = Ball::with_coord(&size);
        let mut state = PossessionState::new();
        let mut events = EventCollection::new();
        let mut rng = StdRng::seed_from_u64(5);

        ball.position = Vector2::new(size.half_width + SAVE_LATERAL_TOLERANCE + 10.0, 8.0);
        ball.velocity = Vector2::new(0.0, -400.0);

        keeper.try_save(&mut ball, &mut state, &size, &mut rng, &mut events);

        assert!(events.is_empty());
        assert!(ball.velocity.y < 0.0);
    }
}
