use env_logger::Env;
use goalrush_core::{
    FrameDriver, GameEngine, GameKey, InputSource, Modifiers, PointerButton, RawInput, RenderSink,
    RenderSnapshot,
};
use log::info;
use std::time::{Duration, Instant};

const TICKS_PER_SECOND: f32 = 60.0;
const SESSION_FRAMES: u64 = 1800;

/// Headless demo session: a scripted attacker pushes forward and takes
/// a shot every few seconds while the AI defends.
struct ScriptedSource {
    frame: u64,
}

impl InputSource for ScriptedSource {
    fn poll(&mut self, out: &mut Vec<RawInput>) {
        self.frame += 1;

        match self.frame {
            1 => out.push(RawInput::KeyDown(GameKey::Up)),
            f if f % 300 == 120 => out.push(RawInput::PointerDown {
                x: 320.0,
                y: 90.0,
                button: PointerButton::Primary,
                modifiers: Modifiers::default(),
            }),
            f if f % 300 == 150 => out.push(RawInput::PointerUp {
                x: 320.0,
                y: 90.0,
                button: PointerButton::Primary,
            }),
            _ => {}
        }
    }
}

struct LogSink {
    last_attacking: u32,
    last_defending: u32,
}

impl RenderSink for LogSink {
    fn present(&mut self, snapshot: &RenderSnapshot) {
        if snapshot.score_attacking != self.last_attacking
            || snapshot.score_defending != self.last_defending
        {
            self.last_attacking = snapshot.score_attacking;
            self.last_defending = snapshot.score_defending;

            info!(
                "score {}:{} (tier '{}')",
                snapshot.score_attacking, snapshot.score_defending, snapshot.tier_name
            );
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();

    let mut engine = GameEngine::new(42);
    let mut source = ScriptedSource { frame: 0 };
    let mut sink = LogSink {
        last_attacking: 0,
        last_defending: 0,
    };

    let driver = FrameDriver::new(TICKS_PER_SECOND);
    let frame_budget = Duration::from_secs_f32(driver.tick_seconds());

    info!("session started: {} frames", SESSION_FRAMES);
    let started = Instant::now();

    for _ in 0..SESSION_FRAMES {
        let frame_start = Instant::now();

        driver.run_frames(&mut engine, &mut source, &mut sink, 1);

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }

    let final_snapshot = engine.snapshot();
    info!(
        "session over after {:?}: {}:{}",
        started.elapsed(),
        final_snapshot.score_attacking,
        final_snapshot.score_defending
    );

    Ok(())
}
