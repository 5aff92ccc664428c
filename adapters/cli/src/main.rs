#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the labyrinth simulation headlessly.

mod ascii;
mod autopilot;

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use labyrinth_core::{ClickEvent, GameConfig, CLICK_QUEUE_CAPACITY};
use labyrinth_engine::{InputQueues, SharedWorld, Simulation};
use labyrinth_rendering::Raster;
use labyrinth_world::query;
use tracing::{debug, error, info, trace, warn};
use tracing_subscriber::EnvFilter;

/// How often the monitor and the viewer look at the shared world.
const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Runs a real-time maze game without a window.
#[derive(Debug, Parser)]
#[command(name = "labyrinth", version, about)]
struct Args {
    /// Number of block rows (odd, 9 through 99).
    #[arg(long, default_value_t = 33)]
    rows: u32,
    /// Number of block columns (odd, 9 through 99).
    #[arg(long, default_value_t = 33)]
    columns: u32,
    /// Edge length of a block in pixels.
    #[arg(long, default_value_t = 32)]
    block_size: u32,
    /// Entity speed in pixels per second [default: twice the block size].
    #[arg(long)]
    speed: Option<f64>,
    /// Hostiles per 1000 blocks.
    #[arg(long, default_value_t = 10.0)]
    density: f64,
    /// Nominal pause between ticks in milliseconds.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
    /// Seed for maze generation and wandering.
    #[arg(long)]
    seed: Option<u64>,
    /// Width of the follow-camera view in pixels.
    #[arg(long, default_value_t = 700, value_parser = clap::value_parser!(u32).range(150..=2000))]
    view_width: u32,
    /// Height of the follow-camera view in pixels.
    #[arg(long, default_value_t = 700, value_parser = clap::value_parser!(u32).range(150..=2000))]
    view_height: u32,
    /// Seconds to run before shutting down.
    #[arg(long, default_value_t = 30)]
    duration: u64,
    /// Steer the player toward the exit automatically.
    #[arg(long)]
    autopilot: bool,
    /// Print the first maze as text before starting.
    #[arg(long)]
    print_maze: bool,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig {
            rows: self.rows,
            columns: self.columns,
            block_size: self.block_size,
            speed: self
                .speed
                .unwrap_or_else(|| f64::from(self.block_size) * 2.0),
            hostile_density: self.density,
            tick_interval: Duration::from_millis(self.tick_ms),
            seed: self.seed,
        }
    }
}

/// Window copied out of the raster on every refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct View {
    width: u32,
    height: u32,
}

/// Tally of finished games.
#[derive(Debug, Default)]
struct Outcomes {
    won: u32,
    lost: u32,
}

/// Entry point for the labyrinth command-line interface.
fn main() {
    init_tracing();

    if let Err(error) = run(Args::parse()) {
        error!(error = ?error, "labyrinth failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = args.game_config();
    config
        .validate()
        .context("invalid game configuration")?;

    let raster = Raster::new(config.columns, config.rows, config.block_size)
        .context("failed to allocate the maze raster")?;
    let view = View {
        width: clamp_view("width", args.view_width, raster.width()),
        height: clamp_view("height", args.view_height, raster.height()),
    };

    let (simulation, shared, queues) =
        Simulation::new(config, raster).context("failed to start the simulation")?;
    if args.print_maze {
        println!("{}", shared.read(|state| ascii::render(&state.world)));
    }

    let simulation = simulation
        .spawn()
        .context("failed to spawn the simulation thread")?;
    let stop = Arc::new(AtomicBool::new(false));
    let viewer = spawn_viewer(shared.clone(), view, Arc::clone(&stop))?;

    let outcomes = monitor(
        &shared,
        &queues,
        args.autopilot,
        Duration::from_secs(args.duration),
    );

    stop.store(true, Ordering::Relaxed);
    drop(queues);
    simulation
        .join()
        .map_err(|_| anyhow!("simulation thread panicked"))?;
    let frames = viewer
        .join()
        .map_err(|_| anyhow!("viewer thread panicked"))?;

    info!(
        won = outcomes.won,
        lost = outcomes.lost,
        frames,
        "session finished"
    );
    Ok(())
}

/// Limits a requested view dimension to the maze size.
fn clamp_view(axis: &str, requested: u32, available: u32) -> u32 {
    if requested > available {
        warn!(axis, requested, available, "view larger than the maze, clamping");
        available
    } else {
        requested
    }
}

/// Copies the follow-camera window out of the raster until told to stop.
///
/// Returns the number of frames copied.
fn spawn_viewer(
    shared: SharedWorld<Raster>,
    view: View,
    stop: Arc<AtomicBool>,
) -> Result<thread::JoinHandle<u64>> {
    thread::Builder::new()
        .name("viewer".into())
        .spawn(move || {
            let mut frames = 0_u64;
            while !stop.load(Ordering::Relaxed) {
                let frame = shared.read(|state| {
                    let center = query::player(&state.world).pixel();
                    let (x, y) = state.canvas.view_origin(center, view.width, view.height);
                    state.canvas.region(x, y, view.width, view.height)
                });
                match frame {
                    Ok(bytes) => {
                        frames += 1;
                        trace!(bytes = bytes.len(), "copied view");
                    }
                    Err(error) => warn!(%error, "failed to copy view"),
                }
                thread::sleep(REFRESH_INTERVAL);
            }
            frames
        })
        .context("failed to spawn the viewer thread")
}

/// Watches the running game, restarting finished ones and steering when asked.
fn monitor(
    shared: &SharedWorld<Raster>,
    queues: &InputQueues,
    autopilot: bool,
    duration: Duration,
) -> Outcomes {
    let deadline = Instant::now() + duration;
    let mut outcomes = Outcomes::default();
    let mut finished_game = None;
    let mut steered_from = None;

    while Instant::now() < deadline {
        thread::sleep(REFRESH_INTERVAL);

        let (game, flags, target, clicks) = shared.read(|state| {
            let world = &state.world;
            let block_size = query::config(world).block_size;
            let player = query::player(world);
            let idle = query::path_len(world) == 0 && player.pixel() == player.target;
            let clicks = match player.target.block(block_size) {
                Some(from) if autopilot && idle => {
                    autopilot::route_corners(query::navigation(world), from, CLICK_QUEUE_CAPACITY)
                        .into_iter()
                        .map(|block| block.center(block_size))
                        .collect()
                }
                _ => Vec::new(),
            };
            (query::game(world), query::flags(world), player.target, clicks)
        });

        if flags.won || flags.dead {
            if finished_game != Some(game) {
                finished_game = Some(game);
                if flags.won {
                    outcomes.won += 1;
                } else {
                    outcomes.lost += 1;
                }
                info!(game, won = flags.won, "game over, requesting a new one");
            }
            let _ = queues.request_new_game();
            continue;
        }

        // Clicks from the previous refresh may still be waiting in the queue.
        if clicks.is_empty() || steered_from == Some((game, target)) {
            continue;
        }
        steered_from = Some((game, target));
        for point in clicks {
            if !queues.submit_click(ClickEvent::primary(point.x, point.y)) {
                debug!("autopilot click dropped");
                break;
            }
        }
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_map_to_the_default_configuration() {
        let args = Args::try_parse_from(["labyrinth"]).expect("defaults parse");
        assert_eq!(args.game_config(), GameConfig::default());
        assert_eq!((args.view_width, args.view_height), (700, 700));
    }

    #[test]
    fn flags_override_the_configuration() {
        let args = Args::try_parse_from([
            "labyrinth",
            "--rows",
            "21",
            "--columns",
            "45",
            "--block-size",
            "16",
            "--density",
            "25",
            "--tick-ms",
            "20",
            "--seed",
            "7",
        ])
        .expect("flags parse");
        let config = args.game_config();

        assert_eq!((config.rows, config.columns), (21, 45));
        assert_eq!(config.speed, 32.0);
        assert_eq!(config.hostile_density, 25.0);
        assert_eq!(config.tick_interval, Duration::from_millis(20));
        assert_eq!(config.seed, Some(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn view_size_outside_its_range_is_rejected() {
        assert!(Args::try_parse_from(["labyrinth", "--view-width", "149"]).is_err());
        assert!(Args::try_parse_from(["labyrinth", "--view-height", "2001"]).is_err());
    }

    #[test]
    fn oversized_view_is_clamped_to_the_maze() {
        assert_eq!(clamp_view("width", 700, 288), 288);
        assert_eq!(clamp_view("height", 200, 288), 200);
    }
}
