#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wandering system that picks random, maze-valid targets for hostiles.

use labyrinth_core::{BlockCoord, Command, Direction, HostileView, MazeGrid};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::warn;

/// System that retargets every hostile standing on its current target.
#[derive(Debug)]
pub struct Wanderer {
    rng: ChaCha8Rng,
}

impl Wanderer {
    /// Creates a wanderer whose choices are reproducible for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits a `RetargetHostile` command for each hostile that reached its target.
    ///
    /// A hostile with no open neighbour keeps its target; the connected maze
    /// makes that unreachable in practice.
    pub fn handle(
        &mut self,
        hostiles: &HostileView,
        maze: &MazeGrid,
        block_size: u32,
        out: &mut Vec<Command>,
    ) {
        for hostile in hostiles.iter().filter(|hostile| hostile.at_target()) {
            let Some(block) = hostile.target.block(block_size) else {
                continue;
            };

            match choose_target(maze, block, &mut self.rng) {
                Some(next) => out.push(Command::RetargetHostile {
                    hostile: hostile.id,
                    target: next.center(block_size),
                }),
                None => warn!(
                    hostile = hostile.id.get(),
                    column = block.column(),
                    row = block.row(),
                    "hostile has no open direction"
                ),
            }
        }
    }
}

/// Picks the next block for a hostile standing on `block`.
///
/// Directions are tried in a uniformly shuffled order and the first one with
/// an open neighbour wins. When the block behind that neighbour is open too,
/// the hostile leaps two blocks instead of one.
pub fn choose_target<R>(maze: &MazeGrid, block: BlockCoord, rng: &mut R) -> Option<BlockCoord>
where
    R: Rng + ?Sized,
{
    let mut directions = Direction::ALL;
    directions.shuffle(rng);

    directions.into_iter().find_map(|direction| {
        let near = block.step(direction, 1).filter(|near| maze.is_open(*near))?;
        match block.step(direction, 2).filter(|far| maze.is_open(*far)) {
            Some(far) => Some(far),
            None => Some(near),
        }
    })
}
