use crate::game::{Role, TeamSide};
use nalgebra::Vector2;
use serde::Serialize;

/// Read-only view of one simulation tick, sufficient for a
/// presentation layer to draw the scene and HUD. The core has no
/// dependency on how or whether it is drawn.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub ball: BallView,
    pub attackers: Vec<PlayerView>,
    pub defenders: Vec<PlayerView>,
    pub keeper_far: KeeperView,
    pub keeper_near: KeeperView,

    pub score_attacking: u32,
    pub score_defending: u32,
    pub tier_index: usize,
    pub tier_name: &'static str,

    pub carrier: Option<usize>,
    pub receiver: Option<usize>,
    pub protect: f32,
    pub trap_lock: f32,
    pub tackle_cooldown: f32,

    pub selected: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BallView {
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    pub spin: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlayerView {
    pub side: TeamSide,
    pub role: Role,
    pub jersey: u8,
    pub position: Vector2<f32>,
    pub engaged: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct KeeperView {
    pub position: Vector2<f32>,
    pub reaction_timer: f32,
}
