//! Breadth-first distance field seeded from the maze exit.

use std::collections::VecDeque;

use labyrinth_core::{BlockCoord, Direction, MazeGrid};

/// Dense block-distance grid toward a single goal block.
///
/// Distances are `u32::MAX` for walls and for open blocks the search could
/// not reach, so callers can tell disconnected regions apart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistanceField {
    columns: u32,
    rows: u32,
    distances: Vec<u32>,
}

impl DistanceField {
    /// Runs a breadth-first search over the open blocks of `maze` starting at `goal`.
    #[must_use]
    pub fn toward(maze: &MazeGrid, goal: BlockCoord) -> Self {
        let columns = maze.columns();
        let rows = maze.rows();
        let count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut field = Self {
            columns,
            rows,
            distances: vec![u32::MAX; count],
        };

        if !maze.is_open(goal) {
            return field;
        }

        let mut queue = VecDeque::new();
        field.store(goal, 0);
        queue.push_back(goal);

        while let Some(block) = queue.pop_front() {
            let Some(current) = field.distance(block) else {
                continue;
            };
            let next = current + 1;

            for direction in Direction::ALL {
                let Some(neighbor) = block.step(direction, 1) else {
                    continue;
                };
                if !maze.is_open(neighbor) {
                    continue;
                }
                if field.distance(neighbor).map_or(false, |known| known <= next) {
                    continue;
                }
                field.store(neighbor, next);
                queue.push_back(neighbor);
            }
        }

        field
    }

    /// Distance of the block from the goal, or `None` when it is a wall,
    /// unreachable, or outside the field.
    #[must_use]
    pub fn distance(&self, block: BlockCoord) -> Option<u32> {
        self.index(block)
            .and_then(|index| self.distances.get(index).copied())
            .filter(|distance| *distance != u32::MAX)
    }

    /// Neighbor of `block` that is one step closer to the goal.
    #[must_use]
    pub fn next_toward_goal(&self, block: BlockCoord) -> Option<BlockCoord> {
        let closer = self.distance(block)?.checked_sub(1)?;
        Direction::ALL
            .into_iter()
            .filter_map(|direction| block.step(direction, 1))
            .find(|neighbor| self.distance(*neighbor) == Some(closer))
    }

    /// Number of blocks the search reached, the goal included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances
            .iter()
            .filter(|distance| **distance != u32::MAX)
            .count()
    }

    fn store(&mut self, block: BlockCoord, distance: u32) {
        if let Some(index) = self.index(block) {
            self.distances[index] = distance;
        }
    }

    fn index(&self, block: BlockCoord) -> Option<usize> {
        if block.column() >= self.columns || block.row() >= self.rows {
            return None;
        }
        let column = usize::try_from(block.column()).ok()?;
        let row = usize::try_from(block.row()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
