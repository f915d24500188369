use log::info;

/// Goals the human side must score to advance to the next tier.
pub const GOALS_PER_TIER: u32 = 2;

/// One difficulty configuration bundle. All tier-dependent values are
/// read live from the active tier each tick, never cached.
#[derive(Debug, Clone, Copy)]
pub struct Tier {
    pub name: &'static str,
    /// Maximum simultaneous defenders allowed to engage the ball.
    pub max_engaged: usize,
    pub defender_speed: f32,
    pub engage_radius: f32,
    /// Contact distance within which a defender can hold/capture the ball.
    pub hold_radius: f32,
    /// Ceiling on ball speed at which a capture is still possible.
    pub capture_speed_max: f32,
    /// Reception grace granted to a pass while it travels.
    pub pass_grace: f32,
}

pub static TIERS: [Tier; 5] = [
    Tier {
        name: "sunday league",
        max_engaged: 1,
        defender_speed: 110.0,
        engage_radius: 170.0,
        hold_radius: 18.0,
        capture_speed_max: 140.0,
        pass_grace: 1.0,
    },
    Tier {
        name: "semi-pro",
        max_engaged: 2,
        defender_speed: 125.0,
        engage_radius: 200.0,
        hold_radius: 20.0,
        capture_speed_max: 170.0,
        pass_grace: 0.85,
    },
    Tier {
        name: "professional",
        max_engaged: 2,
        defender_speed: 140.0,
        engage_radius: 240.0,
        hold_radius: 22.0,
        capture_speed_max: 200.0,
        pass_grace: 0.7,
    },
    Tier {
        name: "continental",
        max_engaged: 3,
        defender_speed: 155.0,
        engage_radius: 280.0,
        hold_radius: 24.0,
        capture_speed_max: 240.0,
        pass_grace: 0.55,
    },
    Tier {
        name: "world class",
        max_engaged: 4,
        defender_speed: 170.0,
        engage_radius: 320.0,
        hold_radius: 26.0,
        capture_speed_max: 300.0,
        pass_grace: 0.4,
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Score {
    pub attacking: u32,
    pub defending: u32,
}

/// Score bookkeeping and monotonic difficulty progression. The active
/// tier index only ever increases and clamps at the final tier.
#[derive(Debug, Clone)]
pub struct Progression {
    tier_index: usize,
    goals_in_tier: u32,
    pub score: Score,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Progression {
            tier_index: 0,
            goals_in_tier: 0,
            score: Score::default(),
        }
    }

    pub fn tier(&self) -> &'static Tier {
        &TIERS[self.tier_index]
    }

    pub fn tier_index(&self) -> usize {
        self.tier_index
    }

    pub fn record_attacking_goal(&mut self) {
        self.score.attacking += 1;
        self.goals_in_tier += 1;

        if self.goals_in_tier >= GOALS_PER_TIER && self.tier_index + 1 < TIERS.len() {
            self.tier_index += 1;
            self.goals_in_tier = 0;

            info!("difficulty tier advanced to '{}'", self.tier().name);
        }
    }

    pub fn record_defending_goal(&mut self) {
        self.score.defending += 1;
    }
}
