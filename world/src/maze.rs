//! Recursive-division maze generator.
//!
//! Wall lines always sit on even coordinates and passages on odd ones, so
//! every block whose column and row are both odd stays open. Each division
//! adds one wall line with exactly one gap, which keeps the open blocks
//! connected as a spanning tree.

use labyrinth_core::{Block, BlockCoord, MazeGrid};
use rand::Rng;

/// Areas whose longer side exceeds this use a midpoint wall to avoid long corridors.
const RANDOM_WALL_LIMIT: u32 = 6;

/// Generates a fully connected maze with a walled border.
///
/// `columns` and `rows` are expected to be odd and at least 9.
pub fn generate_maze<R>(columns: u32, rows: u32, rng: &mut R) -> MazeGrid
where
    R: Rng + ?Sized,
{
    let mut grid = MazeGrid::bordered(columns, rows);
    if columns >= 3 && rows >= 3 {
        divide(&mut grid, Area::new(0, 0, columns - 1, rows - 1), rng);
    }
    grid
}

/// Rectangle of blocks whose edges are walls, in block coordinates.
#[derive(Clone, Copy, Debug)]
struct Area {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

impl Area {
    const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    const fn width(&self) -> u32 {
        self.right - self.left
    }

    const fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

fn divide<R>(grid: &mut MazeGrid, area: Area, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let (width, height) = (area.width(), area.height());
    if width <= 2 || height <= 2 {
        return;
    }

    let vertical = match width.cmp(&height) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => rng.gen_bool(0.5),
    };

    if vertical {
        let column = if width > RANDOM_WALL_LIMIT {
            middle_wall(area.left, area.right)
        } else {
            random_wall(area.left, area.right, rng)
        };
        let gap = random_passage(area.top, area.bottom, rng);
        for row in area.top..=area.bottom {
            if row != gap {
                grid.set(BlockCoord::new(column, row), Block::Wall);
            }
        }

        divide(grid, Area::new(area.left, area.top, column, area.bottom), rng);
        divide(grid, Area::new(column, area.top, area.right, area.bottom), rng);
    } else {
        let row = if height > RANDOM_WALL_LIMIT {
            middle_wall(area.top, area.bottom)
        } else {
            random_wall(area.top, area.bottom, rng)
        };
        let gap = random_passage(area.left, area.right, rng);
        for column in area.left..=area.right {
            if column != gap {
                grid.set(BlockCoord::new(column, row), Block::Wall);
            }
        }

        divide(grid, Area::new(area.left, area.top, area.right, row), rng);
        divide(grid, Area::new(area.left, row, area.right, area.bottom), rng);
    }
}

/// Random even offset strictly between `min` and `max`.
fn random_wall<R>(min: u32, max: u32, rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    let slots = ((max - min) / 2).saturating_sub(1).max(1);
    min + (rng.gen_range(0..slots) + 1) * 2
}

/// Midpoint of `min` and `max`, rounded down to even.
fn middle_wall(min: u32, max: u32) -> u32 {
    let middle = (min + max) / 2;
    middle - middle % 2
}

/// Random odd offset strictly between `min` and `max`.
fn random_passage<R>(min: u32, max: u32, rng: &mut R) -> u32
where
    R: Rng + ?Sized,
{
    random_wall(min, max + 2, rng) - 1
}
