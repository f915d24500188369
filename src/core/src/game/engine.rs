use crate::game::{
    BallView, EventCollection, EventDispatcher, Field, InputCollector, InputSnapshot, KeeperView,
    PlayerView, PossessionState, Progression, Projection, RawInput, RenderSnapshot, possession,
};
use crate::game::{ai, levels::Tier};
use nalgebra::Vector2;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Upper bound on the integration step so a slow or backgrounded frame
/// cannot destabilize the simulation.
pub const MAX_FRAME_DT: f32 = 0.05;

/// Distance within which the selected player can kick a loose ball.
const KICK_RANGE: f32 = 30.0;

/// The whole simulation context: every entity and timer lives here and
/// is passed explicitly to the component functions. No ambient state.
pub struct GameEngine {
    pub field: Field,
    pub possession: PossessionState,
    pub progression: Progression,
    pub projection: Projection,
    pub input: InputCollector,
    pub selected: usize,

    rng: StdRng,
}

impl GameEngine {
    pub fn new(seed: u64) -> Self {
        let field = Field::default();
        let projection = Projection::new(field.size.width, field.size.height);

        GameEngine {
            field,
            possession: PossessionState::new(),
            progression: Progression::new(),
            projection,
            input: InputCollector::new(),
            selected: 9, // striker
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Record a raw host input event. Safe to call at any time between
    /// ticks; only the next tick reads it.
    pub fn record_input(&mut self, event: RawInput) {
        self.input.record(event);
    }

    /// One simulation tick: Physics → Possession → Keepers → AI →
    /// Level, then a render snapshot. All tier-dependent values are
    /// read live from the active tier.
    pub fn tick(&mut self, dt: f32) -> RenderSnapshot {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        self.input.advance(dt);
        let input = self.input.take_snapshot(&self.projection);

        let mut events = EventCollection::new();
        let tier = self.progression.tier();

        self.possession.tick_timers(dt);

        self.apply_actions(&input, tier, &mut events);

        self.field.ball.update(dt, &self.field.size, &mut events);

        if events.has_goal() {
            // The scene resets immediately; the remaining phases would
            // only act on stale positions.
            EventDispatcher::dispatch(
                &events,
                &mut self.field,
                &mut self.possession,
                &mut self.progression,
            );
            return self.snapshot();
        }

        // Trap strictly before the tackle test: swapping this order
        // changes contested outcomes.
        possession::try_trap(&mut self.field, &mut self.possession, &mut events);
        possession::try_capture(&mut self.field, &mut self.possession, tier, &mut events);
        possession::advance_carrier(
            &mut self.field,
            &mut self.possession,
            tier,
            dt,
            &mut self.rng,
            &mut events,
        );

        self.field
            .keeper_far
            .update(dt, &self.field.ball, &self.field.size);
        self.field.keeper_far.try_save(
            &mut self.field.ball,
            &mut self.possession,
            &self.field.size,
            &mut self.rng,
            &mut events,
        );

        self.field
            .keeper_near
            .update(dt, &self.field.ball, &self.field.size);
        self.field.keeper_near.try_save(
            &mut self.field.ball,
            &mut self.possession,
            &self.field.size,
            &mut self.rng,
            &mut events,
        );

        ai::update_attackers(
            &mut self.field,
            self.selected,
            self.possession.receiver(),
            input.movement,
            dt,
        );
        ai::update_defenders(&mut self.field, self.possession.carrier(), tier, dt);

        // The ball follows the receiving player's movement.
        if let Some(receiver) = self.possession.receiver() {
            possession::glue_to_receiver(&mut self.field, receiver);
        }

        EventDispatcher::dispatch(
            &events,
            &mut self.field,
            &mut self.possession,
            &mut self.progression,
        );

        self.snapshot()
    }

    fn apply_actions(&mut self, input: &InputSnapshot, tier: &Tier, events: &mut EventCollection) {
        if input.cycle && !self.field.attackers.is_empty() {
            self.selected = (self.selected + 1) % self.field.attackers.len();
        }

        if !self.can_kick() {
            return;
        }

        if let Some(shot) = input.shot {
            let aim = input
                .aim
                .unwrap_or_else(|| Vector2::new(self.field.size.half_width, 0.0));

            possession::shoot(
                &mut self.field,
                &mut self.possession,
                aim,
                shot.hold,
                shot.kind,
                &mut self.rng,
                events,
            );
        } else if input.pass {
            let exclude = self.possession.receiver();
            if let Some(target) = possession::choose_pass_target(&self.field, exclude) {
                possession::pass(&mut self.field, &mut self.possession, tier, target, events);
            }
        }
    }

    /// The human may kick while a teammate holds the ball, or while
    /// the selected player is close enough to a loose one.
    fn can_kick(&self) -> bool {
        if self.possession.receiver().is_some() {
            return true;
        }

        if self.possession.carrier().is_some() {
            return false;
        }

        self.field
            .attackers
            .get(self.selected)
            .map(|player| (player.position - self.field.ball.position).norm() < KICK_RANGE)
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let player_view = |player: &crate::game::OutfieldPlayer| PlayerView {
            side: player.side,
            role: player.role,
            jersey: player.role.jersey_number(),
            position: player.position,
            engaged: player.engaged,
        };

        RenderSnapshot {
            ball: BallView {
                position: self.field.ball.position,
                velocity: self.field.ball.velocity,
                spin: self.field.ball.spin,
            },
            attackers: self.field.attackers.iter().map(player_view).collect(),
            defenders: self.field.defenders.iter().map(player_view).collect(),
            keeper_far: KeeperView {
                position: self.field.keeper_far.position,
                reaction_timer: self.field.keeper_far.reaction_timer,
            },
            keeper_near: KeeperView {
                position: self.field.keeper_near.position,
                reaction_timer: self.field.keeper_near.reaction_timer,
            },
            score_attacking: self.progression.score.attacking,
            score_defending: self.progression.score.defending,
            tier_index: self.progression.tier_index(),
            tier_name: self.progression.tier().name,
            carrier: self.possession.carrier(),
            receiver: self.possession.receiver(),
            protect: self.possession.protect,
            trap_lock: self.possession.trap_lock,
            tackle_cooldown: self.possession.tackle_cooldown,
            selected: self.selected,
        }
    }
}

/// Where each tick's snapshot is presented. The core does not care how
/// or whether it is drawn.
pub trait RenderSink {
    fn present(&mut self, snapshot: &RenderSnapshot);
}

/// Supplies raw host input events once per frame.
pub trait InputSource {
    fn poll(&mut self, out: &mut Vec<RawInput>);
}

/// Fixed-cadence tick loop. Input source and render sink are borrowed
/// for the duration of a run and released when it returns, however it
/// ends.
pub struct FrameDriver {
    tick_seconds: f32,
}

impl FrameDriver {
    pub fn new(ticks_per_second: f32) -> Self {
        FrameDriver {
            tick_seconds: 1.0 / ticks_per_second.max(1.0),
        }
    }

    pub fn tick_seconds(&self) -> f32 {
        self.tick_seconds
    }

    pub fn run_frames(
        &self,
        engine: &mut GameEngine,
        source: &mut dyn InputSource,
        sink: &mut dyn RenderSink,
        frames: u64,
    ) {
        let mut buffer = Vec::new();

        for _ in 0..frames {
            source.poll(&mut buffer);
            for event in buffer.drain(..) {
                engine.record_input(event);
            }

            let snapshot = engine.tick(self.tick_seconds);
            sink.present(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameKey, Possession, PointerButton, Modifiers};

    #[test]
    fn dt_is_clamped_to_the_upper_bound() {
        let mut engine = GameEngine::new(1);

        engine.field.ball.velocity = Vector2::new(100.0, 0.0);
        let before = engine.field.ball.position.x;

        engine.tick(10.0);

        let moved = engine.field.ball.position.x - before;
        assert!(moved <= 100.0 * MAX_FRAME_DT + 1e-3, "moved {}", moved);
    }

    #[test]
    fn far_goal_increments_score_and_resets_everything() {
        let mut engine = GameEngine::new(1);

        engine.possession.possession = Possession::ReceivedBy(3);
        engine.possession.protect = 0.2;
        engine.field.ball.position = Vector2::new(engine.field.size.half_width, 6.0);
        engine.field.ball.velocity = Vector2::new(0.0, -400.0);

        let snapshot = engine.tick(0.016);

        assert_eq!(snapshot.score_attacking, 1);
        assert_eq!(snapshot.score_defending, 0);
        assert_eq!(snapshot.receiver, None);
        assert_eq!(snapshot.carrier, None);
        assert_eq!(snapshot.protect, 0.0);
        assert_eq!(snapshot.ball.position, engine.field.size.center());
        assert_eq!(snapshot.ball.velocity, Vector2::zeros());
    }

    #[test]
    fn near_goal_scores_for_the_defending_side() {
        let mut engine = GameEngine::new(1);

        engine.field.ball.position =
            Vector2::new(engine.field.size.half_width, engine.field.size.height - 6.0);
        engine.field.ball.velocity = Vector2::new(0.0, 400.0);

        let snapshot = engine.tick(0.016);

        assert_eq!(snapshot.score_attacking, 0);
        assert_eq!(snapshot.score_defending, 1);
    }

    #[test]
    fn cycle_key_advances_the_selection() {
        let mut engine = GameEngine::new(1);
        let initial = engine.selected;

        engine.record_input(RawInput::KeyDown(GameKey::Cycle));
        engine.tick(0.016);

        assert_eq!(engine.selected, (initial + 1) % engine.field.attackers.len());
    }

    #[test]
    fn shot_releases_possession_and_sets_the_ball_moving() {
        let mut engine = GameEngine::new(1);

        // Give the striker the ball.
        engine.possession.possession = Possession::ReceivedBy(9);
        possession::glue_to_receiver(&mut engine.field, 9);

        // Aim at the far goal center and release immediately.
        let target = engine
            .projection
            .project(Vector2::new(engine.field.size.half_width, 0.0));
        engine.record_input(RawInput::PointerDown {
            x: target.x,
            y: target.y,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        });
        engine.record_input(RawInput::PointerUp {
            x: target.x,
            y: target.y,
            button: PointerButton::Primary,
        });

        let snapshot = engine.tick(0.016);

        assert_eq!(snapshot.receiver, None);
        assert!(snapshot.ball.velocity.norm() > 0.0);
        assert!(snapshot.ball.velocity.y < 0.0, "shot heads to the far goal");
        assert!(snapshot.trap_lock > 0.0);
    }

    #[test]
    fn pass_grants_the_tier_reception_grace() {
        let mut engine = GameEngine::new(1);

        engine.possession.possession = Possession::ReceivedBy(9);
        possession::glue_to_receiver(&mut engine.field, 9);

        engine.record_input(RawInput::PointerDown {
            x: 0.0,
            y: 0.0,
            button: PointerButton::Secondary,
            modifiers: Modifiers::default(),
        });
        engine.record_input(RawInput::PointerUp {
            x: 0.0,
            y: 0.0,
            button: PointerButton::Secondary,
        });

        let grace = engine.progression.tier().pass_grace;
        let snapshot = engine.tick(0.016);

        assert_eq!(snapshot.receiver, None);
        assert!((snapshot.protect - grace).abs() < 1e-6);
    }

    #[test]
    fn kick_is_ignored_without_possession_or_proximity() {
        let mut engine = GameEngine::new(1);

        // Ball at center, selected striker far away, defenders hold.
        engine.possession.possession = Possession::CarriedBy(0);

        engine.record_input(RawInput::PointerDown {
            x: 320.0,
            y: 100.0,
            button: PointerButton::Primary,
            modifiers: Modifiers::default(),
        });
        engine.record_input(RawInput::PointerUp {
            x: 320.0,
            y: 100.0,
            button: PointerButton::Primary,
        });

        engine.tick(0.016);

        assert!(engine.possession.carrier().is_some());
    }

    #[test]
    fn frame_driver_runs_the_requested_frames_and_releases() {
        struct CountingSink(u64);
        impl RenderSink for CountingSink {
            fn present(&mut self, _snapshot: &RenderSnapshot) {
                self.0 += 1;
            }
        }

        struct SilentSource;
        impl InputSource for SilentSource {
            fn poll(&mut self, _out: &mut Vec<RawInput>) {}
        }

        let mut engine = GameEngine::new(1);
        let mut sink = CountingSink(0);
        let mut source = SilentSource;

        let driver = FrameDriver::new(60.0);
        driver.run_frames(&mut engine, &mut source, &mut sink, 120);

        assert_eq!(sink.0, 120);
        // Borrows end with the run: the sink is freely usable again.
        assert!(sink.0 > 0);
    }
}
