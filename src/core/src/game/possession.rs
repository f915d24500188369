use crate::game::math::safe_normalize;
use crate::game::{EventCollection, Field, GameEvent, Tier};
use nalgebra::{Rotation2, Vector2};
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

pub const PROTECT_AFTER_TRAP: f32 = 0.5;
pub const PROTECT_AFTER_CAPTURE: f32 = 0.4;
pub const PROTECT_AFTER_KICK: f32 = 0.35;
pub const TRAP_LOCK_AFTER_TRAP: f32 = 0.3;
pub const TRAP_LOCK_AFTER_KICK: f32 = 0.3;
pub const TACKLE_COOLDOWN: f32 = 0.8;

/// Overlap slack subtracted from the radii sum for a trap to register.
const TRAP_TOLERANCE: f32 = 2.0;

/// How far ahead of a carrying defender the ball is glued.
const CARRY_LEAD: f32 = 14.0;
/// Distance from the near goal line at which a carrier shoots.
const CARRY_SHOT_RANGE: f32 = 180.0;
/// Extra lateral slack beyond the goal mouth for the carrier shot.
const CARRY_SHOT_LATERAL: f32 = 40.0;

pub const SHOT_SPEED_MAX: f32 = 520.0;
/// Random angular error applied to every human shot, in radians.
pub const SHOT_SPRAY: f32 = 0.06;
/// Hold duration mapping onto shot power: the cap and the floor.
pub const SHOT_HOLD_MAX: f32 = 0.9;
const SHOT_POWER_MIN: f32 = 0.35;

const FINESSE_FACTOR: f32 = 0.8;
const DRIVEN_FACTOR: f32 = 1.25;
/// Lateral curve towards the far post on finesse shots.
const FINESSE_SPIN: f32 = 320.0;

const PASS_SPEED_MIN: f32 = 220.0;
const PASS_SPEED_MAX: f32 = 420.0;
const PASS_SPEED_PER_UNIT: f32 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShotKind {
    Standard,
    /// Slower, curling towards the far post.
    Finesse,
    /// Faster, no spin.
    Driven,
}

/// Who controls the ball right now. Carrier and receiver are mutually
/// exclusive by construction; both clear together on any kick or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Possession {
    Unowned,
    /// Defending-team index dribbling the ball.
    CarriedBy(usize),
    /// Attacking-team index that trapped a loose ball or pass.
    ReceivedBy(usize),
}

pub struct PossessionState {
    pub possession: Possession,
    /// Grace period during which no tackle may occur.
    pub protect: f32,
    /// Grace period preventing re-trapping straight after a kick.
    pub trap_lock: f32,
    /// Cooldown shared across the whole defending team.
    pub tackle_cooldown: f32,
}

impl Default for PossessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl PossessionState {
    pub fn new() -> Self {
        PossessionState {
            possession: Possession::Unowned,
            protect: 0.0,
            trap_lock: 0.0,
            tackle_cooldown: 0.0,
        }
    }

    pub fn carrier(&self) -> Option<usize> {
        match self.possession {
            Possession::CarriedBy(index) => Some(index),
            _ => None,
        }
    }

    pub fn receiver(&self) -> Option<usize> {
        match self.possession {
            Possession::ReceivedBy(index) => Some(index),
            _ => None,
        }
    }

    /// Timers only ever count down here; events reset them upwards.
    pub fn tick_timers(&mut self, dt: f32) {
        self.protect = (self.protect - dt).max(0.0);
        self.trap_lock = (self.trap_lock - dt).max(0.0);
        self.tackle_cooldown = (self.tackle_cooldown - dt).max(0.0);
    }

    /// Any kick releases both trackers and arms the fresh grace timers.
    pub fn release_for_kick(&mut self) {
        self.possession = Possession::Unowned;
        self.protect = PROTECT_AFTER_KICK;
        self.trap_lock = TRAP_LOCK_AFTER_KICK;
    }

    pub fn clear(&mut self) {
        self.possession = Possession::Unowned;
        self.protect = 0.0;
        self.trap_lock = 0.0;
        self.tackle_cooldown = 0.0;
    }
}

/// Attacking players absorb a loose ball on overlap, in roster order.
/// Must run before the capture test each tick; swapping the order
/// changes contested outcomes.
pub fn try_trap(field: &mut Field, state: &mut PossessionState, events: &mut EventCollection) {
    if state.trap_lock > 0.0 {
        return;
    }

    if state.receiver().is_some() {
        return;
    }

    let ball_position = field.ball.position;
    let ball_radius = field.ball.radius;

    let trapped = field
        .attackers
        .iter()
        .enumerate()
        .find(|(_, player)| {
            let reach = ball_radius + player.radius - TRAP_TOLERANCE;
            (player.position - ball_position).norm() < reach
        })
        .map(|(index, _)| index);

    if let Some(index) = trapped {
        state.possession = Possession::ReceivedBy(index);
        state.protect = PROTECT_AFTER_TRAP;
        state.trap_lock = TRAP_LOCK_AFTER_TRAP;

        glue_to_receiver(field, index);
        field.ball.velocity = Vector2::zeros();
        field.ball.spin = 0.0;

        events.push(GameEvent::Trapped(index));
    }
}

/// A defender wins the ball only when no protection grace is active,
/// the team cooldown has expired, it is in contact distance, and the
/// ball is slow enough to be held.
pub fn try_capture(
    field: &mut Field,
    state: &mut PossessionState,
    tier: &Tier,
    events: &mut EventCollection,
) {
    if state.protect > 0.0 || state.tackle_cooldown > 0.0 {
        return;
    }

    if field.ball.speed() > tier.capture_speed_max {
        return;
    }

    let ball_position = field.ball.position;
    let carrier = state.carrier();

    let capturer = field
        .defenders
        .iter()
        .enumerate()
        .filter(|(index, _)| carrier != Some(*index))
        .find(|(_, defender)| (defender.position - ball_position).norm() < tier.hold_radius)
        .map(|(index, _)| index);

    if let Some(index) = capturer {
        state.possession = Possession::CarriedBy(index);
        state.protect = PROTECT_AFTER_CAPTURE;
        state.tackle_cooldown = TACKLE_COOLDOWN;

        field.ball.spin = 0.0;

        events.push(GameEvent::Captured(index));
    }
}

/// A carrying defender dribbles towards the near goal with the ball
/// glued just ahead, and unleashes an automatic randomized shot once
/// close and laterally aligned with the goal mouth.
pub fn advance_carrier(
    field: &mut Field,
    state: &mut PossessionState,
    tier: &Tier,
    dt: f32,
    rng: &mut StdRng,
    events: &mut EventCollection,
) {
    let Some(index) = state.carrier() else {
        return;
    };

    let size = field.size;
    let goal_center = Vector2::new(size.half_width, size.height);

    let carrier = &mut field.defenders[index];
    let direction = safe_normalize(goal_center - carrier.position);

    carrier.position = size.clamp_point(carrier.position + direction * tier.defender_speed * dt);

    field.ball.position = carrier.position + direction * CARRY_LEAD;
    field.ball.velocity = direction * tier.defender_speed;
    field.ball.spin = 0.0;

    let close_enough = size.height - carrier.position.y < CARRY_SHOT_RANGE;
    let aligned =
        (carrier.position.x - size.half_width).abs() < size.goal_half_width() + CARRY_SHOT_LATERAL;

    if close_enough && aligned {
        let aim = safe_normalize(goal_center - field.ball.position);
        let jitter = rng.random_range(-0.14..0.14);
        let power = rng.random_range(0.75..1.0);

        field.ball.velocity = Rotation2::new(jitter) * aim * SHOT_SPEED_MAX * power;
        state.release_for_kick();

        events.push(GameEvent::ShotTaken(ShotKind::Standard));
    }
}

/// Human shot: aim from the ball to the world-space aim point, spray,
/// hold-derived power and shot-kind multiplier.
pub fn shoot(
    field: &mut Field,
    state: &mut PossessionState,
    aim: Vector2<f32>,
    hold: f32,
    kind: ShotKind,
    rng: &mut StdRng,
    events: &mut EventCollection,
) {
    let ball = &mut field.ball;

    let spray = rng.random_range(-SHOT_SPRAY..SHOT_SPRAY);
    let direction = Rotation2::new(spray) * safe_normalize(aim - ball.position);

    let power = SHOT_POWER_MIN + (1.0 - SHOT_POWER_MIN) * (hold / SHOT_HOLD_MAX).clamp(0.0, 1.0);

    let factor = match kind {
        ShotKind::Standard => 1.0,
        ShotKind::Finesse => FINESSE_FACTOR,
        ShotKind::Driven => DRIVEN_FACTOR,
    };

    ball.velocity = direction * SHOT_SPEED_MAX * power * factor;
    ball.spin = match kind {
        // Curl towards the far post: the post on the other side of the
        // midline from where the shot is struck.
        ShotKind::Finesse => {
            if ball.position.x < field.size.half_width {
                FINESSE_SPIN
            } else {
                -FINESSE_SPIN
            }
        }
        _ => 0.0,
    };

    state.release_for_kick();

    events.push(GameEvent::ShotTaken(kind));
}

/// Human pass towards a chosen teammate: speed proportional to the
/// distance within a fixed band, reception grace from the active tier.
pub fn pass(
    field: &mut Field,
    state: &mut PossessionState,
    tier: &Tier,
    target_index: usize,
    events: &mut EventCollection,
) {
    let Some(target) = field.attackers.get(target_index) else {
        return;
    };

    let to_target = target.position - field.ball.position;
    let distance = to_target.norm();
    let speed = (distance * PASS_SPEED_PER_UNIT).clamp(PASS_SPEED_MIN, PASS_SPEED_MAX);

    field.ball.velocity = safe_normalize(to_target) * speed;
    field.ball.spin = 0.0;

    state.release_for_kick();
    state.protect = tier.pass_grace;

    events.push(GameEvent::PassMade(target_index));
}

/// Pass target selection: the nearest teammate ahead of the ball
/// (closer to the far goal), falling back to the nearest teammate
/// overall. The current receiver is excluded.
pub fn choose_pass_target(field: &Field, exclude: Option<usize>) -> Option<usize> {
    let ball_position = field.ball.position;

    let nearest = |ahead_only: bool| {
        field
            .attackers
            .iter()
            .enumerate()
            .filter(|(index, _)| exclude != Some(*index))
            .filter(|(_, player)| !ahead_only || player.position.y < ball_position.y)
            .min_by(|a, b| {
                let da = (a.1.position - ball_position).norm();
                let db = (b.1.position - ball_position).norm();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(index, _)| index)
    };

    nearest(true).or_else(|| nearest(false))
}

/// Keep the ball just above the receiving player while the attacking
/// side holds it, so dribbling follows the player's movement.
pub fn glue_to_receiver(field: &mut Field, index: usize) {
    if let Some(receiver) = field.attackers.get(index) {
        let offset = Vector2::new(0.0, -(receiver.radius + field.ball.radius));
        field.ball.position = receiver.position + offset;
    }
}
