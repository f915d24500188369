use crate::game::{Ball, FIELD_ROLES, Goalkeeper, OutfieldPlayer, TeamSide};
use nalgebra::Vector2;

pub const FIELD_WIDTH: f32 = 600.0;
pub const FIELD_HEIGHT: f32 = 900.0;
pub const GOAL_MOUTH_WIDTH: f32 = 160.0;

#[derive(Debug, Clone, Copy)]
pub struct PitchSize {
    pub width: f32,
    pub height: f32,
    pub half_width: f32,
}

impl Default for PitchSize {
    fn default() -> Self {
        PitchSize::new(FIELD_WIDTH, FIELD_HEIGHT)
    }
}

impl PitchSize {
    pub fn new(width: f32, height: f32) -> Self {
        PitchSize {
            width,
            height,
            half_width: width / 2.0,
        }
    }

    pub fn center(&self) -> Vector2<f32> {
        Vector2::new(self.half_width, self.height / 2.0)
    }

    pub fn goal_half_width(&self) -> f32 {
        GOAL_MOUTH_WIDTH / 2.0
    }

    /// Whether an x coordinate lies within the goal mouth centered on
    /// the horizontal midline.
    pub fn within_goal_mouth(&self, x: f32) -> bool {
        (x - self.half_width).abs() < self.goal_half_width()
    }

    pub fn clamp_point(&self, point: Vector2<f32>) -> Vector2<f32> {
        Vector2::new(
            point.x.clamp(0.0, self.width),
            point.y.clamp(0.0, self.height),
        )
    }
}

/// The whole scene: ball, both rosters and both goalkeepers. Created
/// once at simulation start, mutated every tick, torn down with the
/// session.
pub struct Field {
    pub size: PitchSize,
    pub ball: Ball,
    pub attackers: Vec<OutfieldPlayer>,
    pub defenders: Vec<OutfieldPlayer>,
    /// Defending side's keeper, guarding the far goal (y = 0).
    pub keeper_far: Goalkeeper,
    /// Attacking side's keeper, guarding the near goal (y = height).
    pub keeper_near: Goalkeeper,
}

impl Default for Field {
    fn default() -> Self {
        Field::new(PitchSize::default())
    }
}

impl Field {
    pub fn new(size: PitchSize) -> Self {
        let attackers = setup_roster(TeamSide::Attacking, &size);
        let defenders = setup_roster(TeamSide::Defending, &size);

        Field {
            size,
            ball: Ball::with_coord(&size),
            attackers,
            defenders,
            keeper_far: Goalkeeper::new(TeamSide::Defending, &size),
            keeper_near: Goalkeeper::new(TeamSide::Attacking, &size),
        }
    }

    /// Kickoff reset after either goal: ball to center with zero
    /// velocity and spin, every player back to its anchor, keepers to
    /// their lines.
    pub fn reset_after_goal(&mut self) {
        self.ball.reset();

        for player in self.attackers.iter_mut().chain(self.defenders.iter_mut()) {
            player.reset();
        }

        self.keeper_far.reset(&self.size);
        self.keeper_near.reset(&self.size);
    }
}

fn setup_roster(side: TeamSide, size: &PitchSize) -> Vec<OutfieldPlayer> {
    FIELD_ROLES
        .iter()
        .enumerate()
        .map(|(index, role)| {
            let own_half = role.anchor();

            // Anchors are authored with the own goal at y = 0. The
            // defending team guards the far goal, so its table applies
            // directly; the attacking team mirrors in both axes.
            let anchor = match side {
                TeamSide::Defending => own_half,
                TeamSide::Attacking => {
                    Vector2::new(size.width - own_half.x, size.height - own_half.y)
                }
            };

            // Stagger idle-motion phases so players do not weave in sync.
            let phase = index as f32 * 0.7;

            OutfieldPlayer::new(side, *role, anchor, phase)
        })
        .collect()
}
