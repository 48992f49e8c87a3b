//! Tilt Maze host runner
//!
//! Runs the game against the simulated QMI8658 with a simulated clock, so
//! the full boot → calibrate → play → advance loop can be watched in the log.
//!
//! Usage: `tilt-maze [tuning.json] [seed]`

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use tilt_maze::consts::*;
use tilt_maze::imu::registers::DEFAULT_ADDRESS;
use tilt_maze::imu::simulated::SimulatedQmi8658;
use tilt_maze::imu::{Qmi8658, RawSample, SensorConfig};
use tilt_maze::sim::GameEvent;
use tilt_maze::{Clock, TiltMaze, Tuning};

/// Levels to play before printing the final snapshot
const LEVELS_TO_PLAY: u32 = 4;
/// Give up after this much simulated time (ms)
const MAX_RUN_MS: u64 = 10 * 60 * 1000;

/// Shared simulated time in nanoseconds
#[derive(Clone, Default)]
struct SimTime(Rc<Cell<u64>>);

impl SimTime {
    fn advance_ns(&self, ns: u64) {
        self.0.set(self.0.get().saturating_add(ns));
    }
}

impl Clock for SimTime {
    fn now_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }
}

/// Delay that advances simulated time instead of sleeping
struct SimDelay(SimTime);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.advance_ns(ns as u64);
    }
}

type HostGame = TiltMaze<Qmi8658<SimulatedQmi8658>, SimDelay, SimTime>;

/// Tilt toward the goal, with a random shake when the ball stalls
fn autopilot(game: &HostGame, rng: &mut Pcg32) -> RawSample {
    let pos = game.ball_position();
    let target = tilt_maze::sim::maze::cell_center(7, GRID_COLS - 1);
    let lsb_per_g = game.sensor().device().config().accel_range.lsb_per_g() as f32;

    let mut dir = (target - pos).normalize_or_zero();
    if rng.random_bool(0.15) {
        dir = glam::Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
    }
    let tilt = dir * 0.5 * lsb_per_g;
    RawSample::new([tilt.x as i16, tilt.y as i16, lsb_per_g as i16], [0; 3])
}

fn main() {
    env_logger::init();
    log::info!("Tilt Maze (host simulation) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let tuning = match args.first() {
        Some(path) => Tuning::load(Path::new(path)),
        None => Tuning::default(),
    };
    let seed = args
        .get(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);
    log::info!("Seed {}", seed);

    let config = SensorConfig::default();
    let mut device = SimulatedQmi8658::new(DEFAULT_ADDRESS);
    device.set_level(config.accel_range.lsb_per_g() as i16);
    let imu = Qmi8658::new(device, DEFAULT_ADDRESS, config);

    let time = SimTime::default();
    let mut game = TiltMaze::new(imu, SimDelay(time.clone()), time.clone(), tuning, seed);
    let mut rng = Pcg32::seed_from_u64(seed ^ 0xA11CE);

    if !game.boot() {
        log::warn!("No motion sensor, the ball will not move");
    }

    let mut played = 0;
    let mut finished_at: Option<u64> = None;
    while played < LEVELS_TO_PLAY && time.now_ms() < MAX_RUN_MS {
        let sample = autopilot(&game, &mut rng);
        game.sensor_mut()
            .device_mut()
            .bus_mut()
            .set_sample(sample);

        game.update();
        time.advance_ns(TICK_INTERVAL_MS * 1_000_000);

        for event in game.drain_events() {
            match event {
                GameEvent::LevelStarted { level, difficulty } => {
                    println!("Level {} ({})", level, difficulty.as_str());
                }
                GameEvent::WallBounce => log::trace!("bounce at {:?}", game.ball_position()),
                GameEvent::LevelComplete {
                    level,
                    award,
                    total,
                } => println!("  level {} complete: +{} -> {}", level, award, total),
                GameEvent::LevelFailed { level } => println!("  level {} failed", level),
            }
        }

        if game.is_level_complete() || game.is_level_failed() {
            let now = time.now_ms();
            let since = *finished_at.get_or_insert(now);
            if now.saturating_sub(since) >= END_SCREEN_MS {
                played += 1;
                finished_at = None;
                if played < LEVELS_TO_PLAY {
                    if let Err(e) = game.advance_or_retry() {
                        log::error!("{}", e);
                        break;
                    }
                }
            }
        }
    }

    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Cannot serialize snapshot: {}", e),
    }
}
