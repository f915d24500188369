use crate::game::{Field, PossessionState, Progression, ShotKind};
use log::debug;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GoalLine {
    /// Far end line (y = 0): a goal for the attacking, human side.
    Far,
    /// Near end line (y = field height): a goal for the defending side.
    Near,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GameEvent {
    Goal(GoalLine),
    Trapped(usize),
    Captured(usize),
    ShotTaken(ShotKind),
    PassMade(usize),
    Save { held: bool },
}

#[derive(Default)]
pub struct EventCollection {
    events: Vec<GameEvent>,
}

impl EventCollection {
    pub fn new() -> Self {
        EventCollection { events: Vec::new() }
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn has_goal(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, GameEvent::Goal(_)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}

pub struct EventDispatcher;

impl EventDispatcher {
    /// Apply the tick's events to score, progression and field state.
    /// A goal resets the whole scene: ball to center, players to
    /// anchors, possession and timers cleared together.
    pub fn dispatch(
        events: &EventCollection,
        field: &mut Field,
        possession: &mut PossessionState,
        progression: &mut Progression,
    ) {
        for event in events.iter() {
            debug!("game event: {:?}", event);

            if let GameEvent::Goal(line) = event {
                match line {
                    GoalLine::Far => progression.record_attacking_goal(),
                    GoalLine::Near => progression.record_defending_goal(),
                }

                field.reset_after_goal();
                possession.clear();
            }
        }
    }
}
