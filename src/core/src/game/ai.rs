use crate::game::math::{safe_normalize, step_towards};
use crate::game::{Field, Tier};
use itertools::Itertools;
use nalgebra::Vector2;
use std::cmp::Ordering;

pub const SELECTED_SPEED: f32 = 185.0;
const ATTACKER_DRIFT_SPEED: f32 = 90.0;

/// Idle-motion weave fed by each player's private phase accumulator.
const WEAVE_AMPLITUDE: f32 = 14.0;
const WEAVE_RATE: f32 = 1.6;

/// Off-ball attackers never advance more than this beyond the ball's
/// depth towards the far goal.
const DEPTH_AHEAD_MAX: f32 = 120.0;

/// Seconds of ball travel a pursuing defender anticipates.
const LEAD_TIME: f32 = 0.22;
/// Reaction lag imposed when a defender enters engagement.
pub const DEFENDER_REACTION: f32 = 0.25;
/// Off-ball defenders drift to anchor at this fraction of tier speed.
const OFF_BALL_DRIFT_FACTOR: f32 = 0.5;

/// Attacking team movement: the selected player follows directional
/// input directly, the receiver holds the ball, everyone else drifts
/// towards their anchor with a sinusoidal lateral weave.
pub fn update_attackers(
    field: &mut Field,
    selected: usize,
    receiver: Option<usize>,
    movement: Vector2<f32>,
    dt: f32,
) {
    let size = field.size;
    let ball_depth = field.ball.position.y;

    for (index, player) in field.attackers.iter_mut().enumerate() {
        if index == selected {
            if movement.norm() > f32::EPSILON {
                let direction = safe_normalize(movement);
                player.position =
                    size.clamp_point(player.position + direction * SELECTED_SPEED * dt);
            }
            continue;
        }

        if receiver == Some(index) {
            continue;
        }

        player.phase += WEAVE_RATE * dt;
        let weave = Vector2::new(player.phase.sin() * WEAVE_AMPLITUDE, 0.0);
        let target = player.anchor + weave;

        player.position = step_towards(player.position, target, ATTACKER_DRIFT_SPEED * dt);

        // Do not run far beyond the ball towards the far goal.
        if player.position.y < ball_depth - DEPTH_AHEAD_MAX {
            player.position.y = ball_depth - DEPTH_AHEAD_MAX;
        }

        player.position = size.clamp_point(player.position);
    }
}

/// Defending team movement: engage the nearest defenders to the ball
/// up to the tier's cap, each with a personal reaction lag before
/// pursuit of a lead point ahead of the ball; the rest drift home.
pub fn update_defenders(field: &mut Field, carrier: Option<usize>, tier: &Tier, dt: f32) {
    let size = field.size;
    let ball_position = field.ball.position;
    let ball_velocity = field.ball.velocity;

    let engaged_set: Vec<usize> = field
        .defenders
        .iter()
        .enumerate()
        .filter(|(index, _)| carrier != Some(*index))
        .map(|(index, defender)| (index, (defender.position - ball_position).norm()))
        .sorted_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
        .filter(|(_, distance)| *distance < tier.engage_radius)
        .take(tier.max_engaged)
        .map(|(index, _)| index)
        .collect();

    let lead_point = ball_position + ball_velocity * LEAD_TIME;

    for (index, defender) in field.defenders.iter_mut().enumerate() {
        // Carrier movement is handled by the possession step.
        if carrier == Some(index) {
            defender.engaged = false;
            defender.lag_timer = 0.0;
            continue;
        }

        let engage = engaged_set.contains(&index);

        if engage && !defender.engaged {
            defender.lag_timer = DEFENDER_REACTION;
        }
        if !engage && defender.engaged {
            defender.lag_timer = 0.0;
        }
        defender.engaged = engage;

        if engage {
            if defender.lag_timer > 0.0 {
                // Holds its anchor until the reaction lag elapses.
                defender.lag_timer = (defender.lag_timer - dt).max(0.0);
                continue;
            }

            defender.position = size.clamp_point(step_towards(
                defender.position,
                lead_point,
                tier.defender_speed * dt,
            ));
        } else {
            defender.position = step_towards(
                defender.position,
                defender.anchor,
                tier.defender_speed * OFF_BALL_DRIFT_FACTOR * dt,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TIERS;

    #[test]
    fn engagement_never_exceeds_the_tier_cap() {
        let tier = &TIERS[1];
        let mut field = Field::default();

        // Crowd every defender around the ball.
        for defender in field.defenders.iter_mut() {
            defender.position = field.ball.position + Vector2::new(10.0, 0.0);
        }

        for _ in 0..50 {
            update_defenders(&mut field, None, tier, 0.016);

            let engaged = field.defenders.iter().filter(|d| d.engaged).count();
            assert!(engaged <= tier.max_engaged);
        }

        let engaged = field.defenders.iter().filter(|d| d.engaged).count();
        assert_eq!(engaged, tier.max_engaged);
    }

    #[test]
    fn engagement_requires_being_inside_the_radius() {
        let tier = &TIERS[0];
        let mut field = Field::default();

        for defender in field.defenders.iter_mut() {
            defender.position = field.ball.position + Vector2::new(tier.engage_radius + 50.0, 0.0);
        }

        update_defenders(&mut field, None, tier, 0.016);

        assert!(field.defenders.iter().all(|d| !d.engaged));
    }

    #[test]
    fn new_engagement_starts_with_reaction_lag_then_pursues() {
        let tier = &TIERS[0];
        let mut field = Field::default();

        // Keep the ball away from the formation anchors so only the
        // planted defender is inside the engagement radius.
        field.ball.position = Vector2::new(100.0, 700.0);
        field.defenders[0].position = field.ball.position + Vector2::new(40.0, 0.0);
        field.defenders[0].anchor = field.defenders[0].position;
        field.ball.velocity = Vector2::new(0.0, 0.0);

        update_defenders(&mut field, None, tier, 0.016);
        assert!(field.defenders[0].engaged);
        assert!(field.defenders[0].lag_timer > 0.0);

        let held = field.defenders[0].position;
        update_defenders(&mut field, None, tier, 0.016);
        assert_eq!(field.defenders[0].position, held, "lagging holds anchor");

        // Let the lag elapse, then the defender closes on the ball.
        for _ in 0..30 {
            update_defenders(&mut field, None, tier, 0.016);
        }
        let closed = (field.defenders[0].position - field.ball.position).norm();
        assert!(closed < 40.0);
    }

    #[test]
    fn disengaging_resets_the_lag_timer() {
        let tier = &TIERS[0];
        let mut field = Field::default();

        field.ball.position = Vector2::new(100.0, 700.0);
        field.defenders[0].position = field.ball.position + Vector2::new(40.0, 0.0);
        update_defenders(&mut field, None, tier, 0.016);
        assert!(field.defenders[0].engaged);

        // Ball teleports away: engagement drops, lag resets.
        field.ball.position = Vector2::new(500.0, 50.0);
        update_defenders(&mut field, None, tier, 0.016);

        assert!(!field.defenders[0].engaged);
        assert_eq!(field.defenders[0].lag_timer, 0.0);
    }

    #[test]
    fn pursuit_leads_the_ball_along_its_velocity() {
        let tier = &TIERS[0];
        let mut field = Field::default();

        field.ball.position = Vector2::new(100.0, 700.0);
        field.defenders[0].position = field.ball.position + Vector2::new(60.0, 0.0);
        field.ball.velocity = Vector2::new(0.0, 200.0);

        // Burn through the reaction lag first.
        update_defenders(&mut field, None, tier, 0.016);
        for _ in 0..20 {
            update_defenders(&mut field, None, tier, 0.016);
        }

        // The defender should be heading below the ball's current
        // position, towards the extrapolated lead point.
        assert!(field.defenders[0].position.y > field.ball.position.y - 1.0);
    }

    #[test]
    fn selected_player_follows_input_and_stays_in_bounds() {
        let mut field = Field::default();

        field.attackers[0].position = Vector2::new(5.0, 450.0);

        for _ in 0..100 {
            update_attackers(&mut field, 0, None, Vector2::new(-1.0, 0.0), 0.016);
        }

        assert_eq!(field.attackers[0].position.x, 0.0);
    }

    #[test]
    fn off_ball_attackers_stay_behind_the_ball_depth_limit() {
        let mut field = Field::default();

        field.ball.position = Vector2::new(300.0, 800.0);
        field.attackers[9].position = Vector2::new(300.0, 400.0);
        field.attackers[9].anchor = Vector2::new(300.0, 340.0);

        update_attackers(&mut field, 0, None, Vector2::zeros(), 0.016);

        assert!(field.attackers[9].position.y >= 800.0 - DEPTH_AHEAD_MAX);
    }

    #[test]
    fn receiver_holds_position() {
        let mut field = Field::default();
        let before = field.attackers[4].position;

        update_attackers(&mut field, 0, Some(4), Vector2::zeros(), 0.016);

        assert_eq!(field.attackers[4].position, before);
    }
}
