use crate::game::{Projection, ShotKind};
use nalgebra::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKey {
    Up,
    Down,
    Left,
    Right,
    Cycle,
}

/// Raw host events, recorded asynchronously and only read at the next
/// tick boundary.
#[derive(Debug, Clone, Copy)]
pub enum RawInput {
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
        button: PointerButton,
    },
    KeyDown(GameKey),
    KeyUp(GameKey),
}

#[derive(Debug, Clone, Copy)]
pub struct ShotCommand {
    pub kind: ShotKind,
    /// Seconds the button was held, feeding shot power.
    pub hold: f32,
}

/// Everything the simulation reads from input for one tick. Discrete
/// actions appear in exactly one snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    /// Pointer position mapped to world space through the inverse
    /// projection, if the pointer has been seen at all.
    pub aim: Option<Vector2<f32>>,
    pub shot: Option<ShotCommand>,
    pub pass: bool,
    pub cycle: bool,
    pub movement: Vector2<f32>,
}

struct HoldState {
    button: PointerButton,
    modifiers: Modifiers,
    seconds: f32,
}

/// Accumulates raw press/release flags and aim samples between ticks.
/// Recording never mutates simulation state; the owning tick consumes
/// the snapshot once.
#[derive(Default)]
pub struct InputCollector {
    aim_screen: Option<Vector2<f32>>,
    hold: Option<HoldState>,
    released: Option<(PointerButton, Modifiers, f32)>,
    held_keys: [bool; 4],
    cycle_pending: bool,
}

impl InputCollector {
    pub fn new() -> Self {
        InputCollector::default()
    }

    pub fn record(&mut self, event: RawInput) {
        match event {
            RawInput::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => {
                self.aim_screen = Some(Vector2::new(x, y));
                self.hold = Some(HoldState {
                    button,
                    modifiers,
                    seconds: 0.0,
                });
            }
            RawInput::PointerMove { x, y } => {
                self.aim_screen = Some(Vector2::new(x, y));
            }
            RawInput::PointerUp { x, y, button } => {
                self.aim_screen = Some(Vector2::new(x, y));

                if let Some(hold) = self.hold.take_if(|hold| hold.button == button) {
                    self.released = Some((button, hold.modifiers, hold.seconds));
                }
            }
            RawInput::KeyDown(key) => match key {
                GameKey::Cycle => self.cycle_pending = true,
                _ => self.set_key(key, true),
            },
            RawInput::KeyUp(key) => {
                if key != GameKey::Cycle {
                    self.set_key(key, false);
                }
            }
        }
    }

    /// Advance the hold-duration accumulator by one tick.
    pub fn advance(&mut self, dt: f32) {
        if let Some(hold) = &mut self.hold {
            hold.seconds += dt;
        }
    }

    /// Produce and consume the per-tick snapshot. Discrete flags are
    /// cleared; held movement keys and the in-progress hold persist.
    pub fn take_snapshot(&mut self, projection: &Projection) -> InputSnapshot {
        let aim = self.aim_screen.map(|screen| projection.unproject(screen));

        let mut shot = None;
        let mut pass = false;

        if let Some((button, modifiers, hold_seconds)) = self.released.take() {
            match button {
                PointerButton::Primary => {
                    shot = Some(ShotCommand {
                        kind: shot_kind(modifiers),
                        hold: hold_seconds,
                    });
                }
                PointerButton::Secondary => pass = true,
            }
        }

        let cycle = std::mem::take(&mut self.cycle_pending);

        InputSnapshot {
            aim,
            shot,
            pass,
            cycle,
            movement: self.movement_direction(),
        }
    }

    fn movement_direction(&self) -> Vector2<f32> {
        let mut direction = Vector2::zeros();

        if self.held_keys[0] {
            direction.y -= 1.0; // towards the far goal
        }
        if self.held_keys[1] {
            direction.y += 1.0;
        }
        if self.held_keys[2] {
            direction.x -= 1.0;
        }
        if self.held_keys[3] {
            direction.x += 1.0;
        }

        direction
    }

    fn set_key(&mut self, key: GameKey, down: bool) {
        let slot = match key {
            GameKey::Up => 0,
            GameKey::Down => 1,
            GameKey::Left => 2,
            GameKey::Right => 3,
            GameKey::Cycle => return,
        };
        self.held_keys[slot] = down;
    }
}

fn shot_kind(modifiers: Modifiers) -> ShotKind {
    if modifiers.shift {
        ShotKind::Finesse
    } else if modifiers.ctrl {
        ShotKind::Driven
    } else {
        ShotKind::Standard
    }
}
