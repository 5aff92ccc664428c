#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the labyrinth engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable snapshots
//! and emit [`Command`] values, the world executes those commands via its
//! `apply` entry point and broadcasts [`Event`] values describing what
//! actually changed. The engine turns events into [`Canvas`] draw calls.

use std::time::Duration;

use glam::DVec2;
use serde::{Deserialize, Serialize};

mod config;

pub use config::{ConfigError, GameConfig};

/// Maximum number of waypoints the player may have queued at once.
pub const PATH_CAPACITY: usize = 20;

/// Number of click events that may wait for the simulation before new ones are dropped.
pub const CLICK_QUEUE_CAPACITY: usize = 10;

/// Number of pending new-game requests; duplicates collapse into one.
pub const NEW_GAME_QUEUE_CAPACITY: usize = 1;

/// Fraction of the block size under which a hostile touches the player on both axes.
pub const CONTACT_FACTOR: f64 = 0.75;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards the current game and generates a fresh maze and population.
    NewGame,
    /// Appends an already validated waypoint to the player's path.
    QueueWaypoint {
        /// Pixel-center of the block the player should walk to.
        waypoint: PixelPoint,
    },
    /// Drops every queued waypoint.
    ClearPath,
    /// Moves the player toward its target, consuming waypoints on arrival.
    AdvancePlayer {
        /// Wall-clock time elapsed since the previous tick.
        dt: Duration,
    },
    /// Assigns a new target to a hostile that reached its previous one.
    RetargetHostile {
        /// Hostile receiving the target.
        hostile: HostileId,
        /// Pixel-center of the block the hostile should walk to.
        target: PixelPoint,
    },
    /// Moves every hostile toward its current target.
    AdvanceHostiles {
        /// Wall-clock time elapsed since the previous tick.
        dt: Duration,
    },
    /// Records that the player reached the exit.
    MarkWon,
    /// Records that a hostile caught the player.
    MarkDead,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new maze was generated and the population placed.
    GameStarted {
        /// Sequence number of the game, starting at one.
        game: u64,
    },
    /// A waypoint was appended to the player's path.
    WaypointQueued {
        /// Pixel-center of the queued block.
        waypoint: PixelPoint,
    },
    /// The player's path was emptied.
    PathCleared {
        /// Waypoints that were pending when the path was cleared.
        waypoints: Vec<PixelPoint>,
    },
    /// An entity changed its pixel position.
    EntityMoved {
        /// Entity that moved.
        entity: EntityId,
        /// Integer pixel position before the move.
        from: PixelPoint,
        /// Integer pixel position after the move.
        to: PixelPoint,
        /// Facing after the move.
        direction: Direction,
    },
    /// A hostile received a new target.
    HostileRetargeted {
        /// Hostile that was retargeted.
        hostile: HostileId,
        /// New target of the hostile.
        target: PixelPoint,
    },
    /// The player reached the exit.
    GameWon,
    /// A hostile caught the player.
    PlayerDied,
}

/// Kind of a single maze block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block {
    /// Walkable block.
    #[default]
    Empty,
    /// Impassable block.
    Wall,
}

/// Facing of a moving entity, derived from its last movement axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward increasing x.
    Right,
    /// Toward decreasing x.
    Left,
    /// Toward decreasing y.
    Up,
    /// Toward increasing y.
    Down,
}

impl Direction {
    /// All four cardinal directions.
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit offset of the direction as `(columns, rows)`.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }
}

/// Unique identifier assigned to a hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostileId(u32);

impl HostileId {
    /// Creates a new hostile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifies one of the moving entities of the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// The player-controlled entity.
    Player,
    /// One of the wandering hostiles.
    Hostile(HostileId),
}

/// Location of a single maze block expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockCoord {
    column: u32,
    row: u32,
}

impl BlockCoord {
    /// Creates a new block coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the block.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the block.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Pixel-center of the block for the provided block size.
    #[must_use]
    pub const fn center(&self, block_size: u32) -> PixelPoint {
        let half = (block_size / 2) as i32;
        PixelPoint::new(
            (self.column * block_size) as i32 + half,
            (self.row * block_size) as i32 + half,
        )
    }

    /// Block reached by walking `steps` blocks in `direction`.
    ///
    /// Returns `None` when the walk would leave the non-negative quadrant.
    #[must_use]
    pub fn step(self, direction: Direction, steps: u32) -> Option<BlockCoord> {
        let (dc, dr) = direction.offset();
        let column = offset_axis(self.column, dc, steps)?;
        let row = offset_axis(self.row, dr, steps)?;
        Some(Self::new(column, row))
    }
}

fn offset_axis(value: u32, unit: i32, steps: u32) -> Option<u32> {
    match unit {
        1 => value.checked_add(steps),
        -1 => value.checked_sub(steps),
        _ => Some(value),
    }
}

/// Integer pixel coordinate inside the maze image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal pixel coordinate.
    pub x: i32,
    /// Vertical pixel coordinate.
    pub y: i32,
}

impl PixelPoint {
    /// Creates a new pixel coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Truncates a continuous position to whole pixels.
    #[must_use]
    pub fn from_position(position: DVec2) -> Self {
        Self::new(position.x as i32, position.y as i32)
    }

    /// Continuous position located exactly on this pixel.
    #[must_use]
    pub fn to_position(self) -> DVec2 {
        DVec2::new(f64::from(self.x), f64::from(self.y))
    }

    /// Block containing the pixel, or `None` for negative coordinates.
    #[must_use]
    pub fn block(self, block_size: u32) -> Option<BlockCoord> {
        if block_size == 0 {
            return None;
        }
        let column = u32::try_from(self.x).ok()? / block_size;
        let row = u32::try_from(self.y).ok()? / block_size;
        Some(BlockCoord::new(column, row))
    }
}

/// Dense grid of blocks describing the maze layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    columns: u32,
    rows: u32,
    blocks: Vec<Block>,
}

impl MazeGrid {
    /// Creates a grid whose border blocks are walls and whose interior is empty.
    #[must_use]
    pub fn bordered(columns: u32, rows: u32) -> Self {
        let count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut grid = Self {
            columns,
            rows,
            blocks: vec![Block::Empty; count],
        };
        for row in 0..rows {
            for column in 0..columns {
                let on_border =
                    row == 0 || column == 0 || row + 1 == rows || column + 1 == columns;
                if on_border {
                    grid.set(BlockCoord::new(column, row), Block::Wall);
                }
            }
        }
        grid
    }

    /// Number of block columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of block rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Block stored at the coordinate, or `None` outside the grid.
    #[must_use]
    pub fn block(&self, coord: BlockCoord) -> Option<Block> {
        self.index(coord).map(|index| self.blocks[index])
    }

    /// Reports whether the coordinate lies inside the grid and is walkable.
    #[must_use]
    pub fn is_open(&self, coord: BlockCoord) -> bool {
        self.block(coord) == Some(Block::Empty)
    }

    /// Overwrites a block. Coordinates outside the grid are ignored.
    pub fn set(&mut self, coord: BlockCoord, block: Block) {
        if let Some(index) = self.index(coord) {
            self.blocks[index] = block;
        }
    }

    /// Iterates over every block in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockCoord, Block)> + '_ {
        let columns = self.columns.max(1);
        self.blocks.iter().enumerate().map(move |(index, block)| {
            let index = index as u32;
            (BlockCoord::new(index % columns, index / columns), *block)
        })
    }

    /// Iterates over the walkable blocks in row-major order.
    pub fn open_blocks(&self) -> impl Iterator<Item = BlockCoord> + '_ {
        self.iter()
            .filter(|(_, block)| *block == Block::Empty)
            .map(|(coord, _)| coord)
    }

    /// Pixel width of the maze for the provided block size.
    #[must_use]
    pub const fn pixel_width(&self, block_size: u32) -> u32 {
        self.columns * block_size
    }

    /// Pixel height of the maze for the provided block size.
    #[must_use]
    pub const fn pixel_height(&self, block_size: u32) -> u32 {
        self.rows * block_size
    }

    fn index(&self, coord: BlockCoord) -> Option<usize> {
        if coord.column() < self.columns && coord.row() < self.rows {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Mouse button that produced a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Queues a waypoint.
    Primary,
    /// Cancels the queued path before the click is evaluated.
    Secondary,
}

/// Click submitted by an input collaborator, in maze pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Horizontal pixel coordinate of the click.
    pub x: i32,
    /// Vertical pixel coordinate of the click.
    pub y: i32,
    /// Button that produced the click.
    pub button: MouseButton,
}

impl ClickEvent {
    /// Creates a primary-button click.
    #[must_use]
    pub const fn primary(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            button: MouseButton::Primary,
        }
    }

    /// Creates a secondary-button click.
    #[must_use]
    pub const fn secondary(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            button: MouseButton::Secondary,
        }
    }

    /// Pixel the click landed on.
    #[must_use]
    pub const fn point(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }
}

/// Request to regenerate the whole world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NewGameSignal;

/// Terminal-state markers of the running game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GameFlags {
    /// A hostile caught the player.
    pub dead: bool,
    /// The player reached the exit.
    pub won: bool,
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Continuous position in maze pixel space.
    pub position: DVec2,
    /// Current facing.
    pub direction: Direction,
    /// Point the player is currently walking to.
    pub target: PixelPoint,
}

impl PlayerSnapshot {
    /// Integer pixel position of the player.
    #[must_use]
    pub fn pixel(&self) -> PixelPoint {
        PixelPoint::from_position(self.position)
    }
}

/// Immutable representation of a single hostile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostileSnapshot {
    /// Identifier of the hostile.
    pub id: HostileId,
    /// Continuous position in maze pixel space.
    pub position: DVec2,
    /// Current facing.
    pub direction: Direction,
    /// Point the hostile is currently walking to.
    pub target: PixelPoint,
}

impl HostileSnapshot {
    /// Integer pixel position of the hostile.
    #[must_use]
    pub fn pixel(&self) -> PixelPoint {
        PixelPoint::from_position(self.position)
    }

    /// Reports whether the hostile stands exactly on its target.
    #[must_use]
    pub fn at_target(&self) -> bool {
        self.pixel() == self.target
    }
}

/// Read-only snapshot describing all hostiles within the maze.
#[derive(Clone, Debug, Default)]
pub struct HostileView {
    snapshots: Vec<HostileSnapshot>,
}

impl HostileView {
    /// Creates a new hostile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HostileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &HostileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of hostiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no hostiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<HostileSnapshot> {
        self.snapshots
    }
}

/// Visual variants the engine asks a [`Canvas`] to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    /// The living player facing a direction.
    Player(Direction),
    /// A hostile facing a direction.
    Hostile(Direction),
    /// The player after being caught.
    DeadPlayer,
    /// A queued waypoint marker.
    Marker,
    /// The maze exit.
    Exit,
    /// Victory banner.
    Won,
}

/// Drawing surface owned by the rendering collaborator.
///
/// The engine decides when to draw; implementations decide how pixels are
/// produced. Every coordinate is in maze pixel space and sprites are centered
/// on the supplied point.
pub trait Canvas {
    /// Paints the whole surface with the empty-block background.
    fn clear(&mut self);

    /// Paints a single maze block.
    fn fill_block(&mut self, coord: BlockCoord, block: Block);

    /// Draws a sprite centered on `center`.
    fn draw(&mut self, sprite: Sprite, center: PixelPoint);

    /// Restores the empty background under a block-sized square centered on `center`.
    fn erase(&mut self, center: PixelPoint);
}
