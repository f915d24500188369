use nalgebra::Vector2;
use serde::Serialize;

pub const PLAYER_RADIUS: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TeamSide {
    /// The human-controlled team, attacking the far goal (y = 0).
    Attacking,
    /// The AI team, attacking the near goal (y = field height).
    Defending,
}

impl TeamSide {
    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::Attacking => TeamSide::Defending,
            TeamSide::Defending => TeamSide::Attacking,
        }
    }
}

/// Outfield positional roles. Goalkeepers are modelled separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    LeftBack,
    LeftCenterBack,
    RightCenterBack,
    RightBack,
    DefensiveMidfielder,
    LeftMidfielder,
    CenterMidfielder,
    RightMidfielder,
    AttackingMidfielder,
    Striker,
    SecondStriker,
}

/// Formation table: role, jersey number and the home anchor expressed
/// in own-half orientation (own goal at y = 0). The second striker has
/// no slot in the default formation and falls back to neutral values.
pub static ROLE_ANCHORS: &[(Role, u8, f32, f32)] = &[
    (Role::LeftBack, 3, 110.0, 140.0),
    (Role::LeftCenterBack, 6, 230.0, 110.0),
    (Role::RightCenterBack, 5, 370.0, 110.0),
    (Role::RightBack, 2, 490.0, 140.0),
    (Role::DefensiveMidfielder, 4, 300.0, 230.0),
    (Role::LeftMidfielder, 11, 120.0, 320.0),
    (Role::CenterMidfielder, 8, 300.0, 350.0),
    (Role::RightMidfielder, 7, 480.0, 320.0),
    (Role::AttackingMidfielder, 10, 300.0, 470.0),
    (Role::Striker, 9, 300.0, 560.0),
];

/// The ten roles fielded per side.
pub static FIELD_ROLES: [Role; 10] = [
    Role::LeftBack,
    Role::LeftCenterBack,
    Role::RightCenterBack,
    Role::RightBack,
    Role::DefensiveMidfielder,
    Role::LeftMidfielder,
    Role::CenterMidfielder,
    Role::RightMidfielder,
    Role::AttackingMidfielder,
    Role::Striker,
];

impl Role {
    /// Jersey number derived from the formation table; unknown roles
    /// degrade to 0 rather than failing the tick.
    pub fn jersey_number(&self) -> u8 {
        ROLE_ANCHORS
            .iter()
            .find(|(role, _, _, _)| role == self)
            .map(|(_, jersey, _, _)| *jersey)
            .unwrap_or(0)
    }

    /// Anchor in own-half orientation. Missing entries degrade to a
    /// zero offset.
    pub fn anchor(&self) -> Vector2<f32> {
        ROLE_ANCHORS
            .iter()
            .find(|(role, _, _, _)| role == self)
            .map(|(_, _, x, y)| Vector2::new(*x, *y))
            .unwrap_or_else(Vector2::zeros)
    }
}

pub struct OutfieldPlayer {
    pub side: TeamSide,
    pub role: Role,
    pub position: Vector2<f32>,
    /// Home formation slot this player drifts back to off the ball.
    pub anchor: Vector2<f32>,
    pub radius: f32,

    /// Defending team only: currently pursuing the ball.
    pub engaged: bool,
    /// Reaction lag remaining after entering engagement.
    pub lag_timer: f32,
    /// Private accumulator feeding the idle-motion weave.
    pub phase: f32,
}

impl OutfieldPlayer {
    pub fn new(side: TeamSide, role: Role, anchor: Vector2<f32>, phase: f32) -> Self {
        OutfieldPlayer {
            side,
            role,
            position: anchor,
            anchor,
            radius: PLAYER_RADIUS,
            engaged: false,
            lag_timer: 0.0,
            phase,
        }
    }

    pub fn reset(&mut self) {
        self.position = self.anchor;
        self.engaged = false;
        self.lag_timer = 0.0;
    }
}
