//! Plain-text dump of a running game.

use labyrinth_core::{Block, BlockCoord};
use labyrinth_world::{query, World};

/// Renders the maze one character per block.
///
/// `#` is a wall, `E` the exit, `P` the player, `H` a hostile and `*` a
/// queued waypoint. Entities are placed on the block containing their pixel
/// position.
pub(crate) fn render(world: &World) -> String {
    let maze = query::maze(world);
    let block_size = query::config(world).block_size;
    let columns = maze.columns() as usize;
    let mut rows: Vec<Vec<char>> = (0..maze.rows())
        .map(|_| Vec::with_capacity(columns))
        .collect();
    for (coord, block) in maze.iter() {
        let glyph = match block {
            Block::Wall => '#',
            Block::Empty => ' ',
        };
        rows[coord.row() as usize].push(glyph);
    }

    let mut place = |block: Option<BlockCoord>, glyph: char| {
        let Some(block) = block else {
            return;
        };
        if let Some(cell) = rows
            .get_mut(block.row() as usize)
            .and_then(|row| row.get_mut(block.column() as usize))
        {
            *cell = glyph;
        }
    };

    place(query::exit(world).block(block_size), 'E');
    for waypoint in query::waypoints(world) {
        place(waypoint.block(block_size), '*');
    }
    for hostile in query::hostile_view(world).iter() {
        place(hostile.pixel().block(block_size), 'H');
    }
    place(query::player(world).pixel().block(block_size), 'P');

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
