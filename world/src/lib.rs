#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the labyrinth.
//!
//! The [`World`] owns the maze, the player with its waypoint queue, the
//! hostiles and the terminal flags. It is only ever mutated through
//! [`apply`]; read access goes through the [`query`] module.

mod entity;
mod maze;
mod navigation;
mod path;

use labyrinth_core::{
    BlockCoord, Command, ConfigError, EntityId, Event, GameConfig, GameFlags, HostileId, MazeGrid,
    PixelPoint, PATH_CAPACITY,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::{
    entity::{Entity, Motion},
    path::PathQueue,
};

pub use maze::generate_maze;
pub use navigation::DistanceField;

/// Hostiles never start on a block whose column and row are both below this.
const PLAYER_SAFE_ZONE: u32 = 5;

/// Represents the authoritative labyrinth world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    rng: ChaCha8Rng,
    maze: MazeGrid,
    exit: PixelPoint,
    navigation: DistanceField,
    player: Entity,
    path: PathQueue,
    hostiles: Vec<Hostile>,
    flags: GameFlags,
    game: u64,
}

#[derive(Clone, Debug)]
struct Hostile {
    id: HostileId,
    entity: Entity,
}

impl World {
    /// Validates the configuration and starts the first game.
    ///
    /// Maze generation and hostile placement draw from the configured seed, or
    /// from OS entropy when no seed is configured.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let start = BlockCoord::new(1, 1).center(config.block_size);
        let mut world = Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            maze: MazeGrid::bordered(config.columns, config.rows),
            exit: start,
            navigation: DistanceField::default(),
            player: Entity::resting_at(start),
            path: PathQueue::with_capacity(PATH_CAPACITY),
            hostiles: Vec::new(),
            flags: GameFlags::default(),
            game: 0,
            config,
        };
        world.start_game();
        Ok(world)
    }

    fn start_game(&mut self) {
        let columns = self.config.columns;
        let rows = self.config.rows;
        let block_size = self.config.block_size;

        self.maze = generate_maze(columns, rows, &mut self.rng);
        self.player = Entity::resting_at(BlockCoord::new(1, 1).center(block_size));
        let _ = self.path.take_all();
        let exit = BlockCoord::new(columns - 2, rows - 2);
        self.exit = exit.center(block_size);
        self.navigation = DistanceField::toward(&self.maze, exit);
        let count = self.config.hostile_count();
        let mut hostiles = Vec::with_capacity(count);
        for index in 0..count {
            let start = self.random_hostile_start().center(block_size);
            hostiles.push(Hostile {
                id: HostileId::new(index as u32),
                entity: Entity::resting_at(start),
            });
        }
        self.hostiles = hostiles;
        self.flags = GameFlags::default();
        self.game = self.game.saturating_add(1);

        debug!(
            game = self.game,
            columns,
            rows,
            hostiles = self.hostiles.len(),
            "game started"
        );
    }

    /// Random odd/odd block outside the player's safe zone.
    fn random_hostile_start(&mut self) -> BlockCoord {
        let column_slots = (self.config.columns - 1) / 2;
        let row_slots = (self.config.rows - 1) / 2;
        loop {
            let column = 1 + 2 * self.rng.gen_range(0..column_slots);
            let row = 1 + 2 * self.rng.gen_range(0..row_slots);
            if column >= PLAYER_SAFE_ZONE || row >= PLAYER_SAFE_ZONE {
                return BlockCoord::new(column, row);
            }
        }
    }

    fn speed(&self) -> f64 {
        self.config.speed
    }
}

fn moved(entity: EntityId, motion: Motion) -> Event {
    Event::EntityMoved {
        entity,
        from: motion.from,
        to: motion.to,
        direction: motion.direction,
    }
}

/// Applies the provided command to the world, mutating state and reporting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewGame => {
            world.start_game();
            out_events.push(Event::GameStarted { game: world.game });
        }
        Command::QueueWaypoint { waypoint } => {
            if world.path.push(waypoint) {
                out_events.push(Event::WaypointQueued { waypoint });
            }
        }
        Command::ClearPath => {
            if !world.path.is_empty() {
                out_events.push(Event::PathCleared {
                    waypoints: world.path.take_all(),
                });
            }
        }
        Command::AdvancePlayer { dt } => {
            if world.flags.dead || world.flags.won {
                return;
            }
            if world.player.at_target() {
                match world.path.pop_front() {
                    Some(next) => world.player.retarget(next),
                    None => return,
                }
            }
            let speed = world.speed();
            if let Some(motion) = world.player.step(speed, dt.as_secs_f64()) {
                out_events.push(moved(EntityId::Player, motion));
            }
        }
        Command::RetargetHostile { hostile, target } => {
            let block_size = world.config.block_size;
            let open = target
                .block(block_size)
                .map_or(false, |coord| world.maze.is_open(coord));
            if !open {
                return;
            }
            if let Some(entry) = world.hostiles.iter_mut().find(|entry| entry.id == hostile) {
                entry.entity.retarget(target);
                out_events.push(Event::HostileRetargeted { hostile, target });
            }
        }
        Command::AdvanceHostiles { dt } => {
            let speed = world.speed();
            let dt = dt.as_secs_f64();
            for hostile in &mut world.hostiles {
                if let Some(motion) = hostile.entity.step(speed, dt) {
                    out_events.push(moved(EntityId::Hostile(hostile.id), motion));
                }
            }
        }
        Command::MarkWon => {
            if !world.flags.won && !world.flags.dead {
                world.flags.won = true;
                out_events.push(Event::GameWon);
            }
        }
        Command::MarkDead => {
            if !world.flags.dead && !world.flags.won {
                world.flags.dead = true;
                out_events.push(Event::PlayerDied);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use labyrinth_core::{
        GameConfig, GameFlags, HostileSnapshot, HostileView, MazeGrid, PixelPoint, PlayerSnapshot,
    };

    use super::{DistanceField, World};

    /// Configuration the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Provides read-only access to the maze layout.
    #[must_use]
    pub fn maze(world: &World) -> &MazeGrid {
        &world.maze
    }

    /// Pixel-center of the exit block.
    #[must_use]
    pub fn exit(world: &World) -> PixelPoint {
        world.exit
    }

    /// Block distances toward the exit for the running maze.
    #[must_use]
    pub fn navigation(world: &World) -> &DistanceField {
        &world.navigation
    }

    /// Terminal flags of the running game.
    #[must_use]
    pub fn flags(world: &World) -> GameFlags {
        world.flags
    }

    /// Sequence number of the running game, starting at one.
    #[must_use]
    pub fn game(world: &World) -> u64 {
        world.game
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position(),
            direction: world.player.direction(),
            target: world.player.target(),
        }
    }

    /// Waypoints queued for the player, oldest first.
    #[must_use]
    pub fn waypoints(world: &World) -> Vec<PixelPoint> {
        world.path.iter().collect()
    }

    /// Most recently queued waypoint, if any.
    #[must_use]
    pub fn last_waypoint(world: &World) -> Option<PixelPoint> {
        world.path.last()
    }

    /// Number of queued waypoints.
    #[must_use]
    pub fn path_len(world: &World) -> usize {
        world.path.len()
    }

    /// Maximum number of waypoints the path accepts.
    #[must_use]
    pub fn path_capacity(world: &World) -> usize {
        world.path.capacity()
    }

    /// Captures a read-only view of the hostiles.
    #[must_use]
    pub fn hostile_view(world: &World) -> HostileView {
        HostileView::from_snapshots(
            world
                .hostiles
                .iter()
                .map(|hostile| HostileSnapshot {
                    id: hostile.id,
                    position: hostile.entity.position(),
                    direction: hostile.entity.direction(),
                    target: hostile.entity.target(),
                })
                .collect(),
        )
    }
}
