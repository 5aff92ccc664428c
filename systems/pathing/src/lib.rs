#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure pathing system that validates player clicks and emits waypoint commands.

use labyrinth_core::{BlockCoord, ClickEvent, Command, MazeGrid, MouseButton, PixelPoint};
use tracing::trace;

/// Read-only state the pathing system needs to judge a click.
#[derive(Clone, Copy, Debug)]
pub struct PathView<'a> {
    maze: &'a MazeGrid,
    block_size: u32,
    player_target: PixelPoint,
    last_waypoint: Option<PixelPoint>,
    queued: usize,
    capacity: usize,
}

impl<'a> PathView<'a> {
    /// Captures a view of the maze and of the player's path.
    #[must_use]
    pub const fn new(
        maze: &'a MazeGrid,
        block_size: u32,
        player_target: PixelPoint,
        last_waypoint: Option<PixelPoint>,
        queued: usize,
        capacity: usize,
    ) -> Self {
        Self {
            maze,
            block_size,
            player_target,
            last_waypoint,
            queued,
            capacity,
        }
    }

    /// Point new waypoints must line up with.
    #[must_use]
    pub fn reference(&self) -> PixelPoint {
        self.last_waypoint.unwrap_or(self.player_target)
    }

    const fn cleared(self) -> Self {
        Self {
            last_waypoint: None,
            queued: 0,
            ..self
        }
    }
}

/// Reasons a click does not become a waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickRejection {
    /// The click landed outside the maze.
    OutsideMaze,
    /// The clicked block is a wall.
    WallClicked,
    /// The click shares neither row nor column with the reference point.
    Misaligned,
    /// A wall lies between the reference point and the click.
    Blocked {
        /// First wall found while scanning from the reference point.
        wall: BlockCoord,
    },
    /// The path already holds its maximum number of waypoints.
    PathFull,
}

/// Pure system translating clicks into path commands.
#[derive(Debug, Default)]
pub struct Pathing;

impl Pathing {
    /// Creates a new pathing system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates a single click and emits the resulting commands.
    ///
    /// A secondary-button click clears the path first and is then validated
    /// against the player's target as if no waypoint were queued. Rejected
    /// clicks emit nothing beyond that clear.
    pub fn handle(&mut self, click: ClickEvent, view: PathView<'_>, out: &mut Vec<Command>) {
        let view = match click.button {
            MouseButton::Primary => view,
            MouseButton::Secondary => {
                out.push(Command::ClearPath);
                view.cleared()
            }
        };

        match validate_click(click.point(), &view) {
            Ok(waypoint) => out.push(Command::QueueWaypoint { waypoint }),
            Err(reason) => trace!(?click, ?reason, "click rejected"),
        }
    }
}

/// Checks a clicked pixel against the path and the maze.
///
/// Returns the pixel-center of the clicked block when it lies on the same row
/// or column as the reference point with no wall strictly between them.
pub fn validate_click(point: PixelPoint, view: &PathView<'_>) -> Result<PixelPoint, ClickRejection> {
    let maze = view.maze;
    let clicked = point
        .block(view.block_size)
        .filter(|block| block.column() < maze.columns() && block.row() < maze.rows())
        .ok_or(ClickRejection::OutsideMaze)?;
    if !maze.is_open(clicked) {
        return Err(ClickRejection::WallClicked);
    }

    let reference = view
        .reference()
        .block(view.block_size)
        .ok_or(ClickRejection::OutsideMaze)?;
    let between: Vec<BlockCoord> = if clicked.column() == reference.column() {
        span(reference.row(), clicked.row())
            .map(|row| BlockCoord::new(clicked.column(), row))
            .collect()
    } else if clicked.row() == reference.row() {
        span(reference.column(), clicked.column())
            .map(|column| BlockCoord::new(column, clicked.row()))
            .collect()
    } else {
        return Err(ClickRejection::Misaligned);
    };

    if let Some(wall) = between.into_iter().find(|block| !maze.is_open(*block)) {
        return Err(ClickRejection::Blocked { wall });
    }

    if view.queued >= view.capacity {
        return Err(ClickRejection::PathFull);
    }

    Ok(clicked.center(view.block_size))
}

/// Indices strictly between `from` and `to`, walking away from `from`.
fn span(from: u32, to: u32) -> Box<dyn Iterator<Item = u32>> {
    if from < to {
        Box::new(from + 1..to)
    } else {
        Box::new((to + 1..from).rev())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_core::Block;

    const BLOCK: u32 = 32;

    fn open_maze() -> MazeGrid {
        MazeGrid::bordered(15, 15)
    }

    fn view(maze: &MazeGrid, target: BlockCoord) -> PathView<'_> {
        PathView::new(maze, BLOCK, target.center(BLOCK), None, 0, 20)
    }

    #[test]
    fn span_excludes_both_ends() {
        assert_eq!(span(5, 9).collect::<Vec<_>>(), vec![6, 7, 8]);
        assert_eq!(span(9, 5).collect::<Vec<_>>(), vec![8, 7, 6]);
        assert_eq!(span(4, 5).count(), 0);
    }

    #[test]
    fn aligned_click_with_clear_line_is_accepted() {
        let maze = open_maze();
        let target = BlockCoord::new(5, 5);
        let click = BlockCoord::new(5, 9).center(BLOCK);

        let accepted = validate_click(PixelPoint::new(click.x + 7, click.y - 9), &view(&maze, target));
        assert_eq!(accepted, Ok(click));
    }

    #[test]
    fn wall_between_reference_and_click_is_rejected() {
        let mut maze = open_maze();
        maze.set(BlockCoord::new(5, 7), Block::Wall);
        let target = BlockCoord::new(5, 5);
        let click = BlockCoord::new(5, 9).center(BLOCK);

        assert_eq!(
            validate_click(click, &view(&maze, target)),
            Err(ClickRejection::Blocked {
                wall: BlockCoord::new(5, 7)
            })
        );
    }

    #[test]
    fn diagonal_click_is_rejected() {
        let maze = open_maze();
        let click = BlockCoord::new(7, 9).center(BLOCK);
        assert_eq!(
            validate_click(click, &view(&maze, BlockCoord::new(5, 5))),
            Err(ClickRejection::Misaligned)
        );
    }

    #[test]
    fn clicks_outside_or_on_walls_are_rejected() {
        let maze = open_maze();
        let target = BlockCoord::new(5, 5);
        assert_eq!(
            validate_click(PixelPoint::new(-3, 40), &view(&maze, target)),
            Err(ClickRejection::OutsideMaze)
        );
        assert_eq!(
            validate_click(PixelPoint::new(15 * 32 + 1, 40), &view(&maze, target)),
            Err(ClickRejection::OutsideMaze)
        );
        assert_eq!(
            validate_click(BlockCoord::new(5, 0).center(BLOCK), &view(&maze, target)),
            Err(ClickRejection::WallClicked)
        );
    }

    #[test]
    fn click_on_the_reference_block_is_accepted() {
        let maze = open_maze();
        let target = BlockCoord::new(5, 5);

        assert_eq!(
            validate_click(PixelPoint::new(170, 181), &view(&maze, target)),
            Ok(PixelPoint::new(176, 176))
        );
    }

    #[test]
    fn last_waypoint_is_the_reference_when_present() {
        let maze = open_maze();
        let last = BlockCoord::new(9, 5).center(BLOCK);
        let view = PathView::new(&maze, BLOCK, BlockCoord::new(5, 5).center(BLOCK), Some(last), 1, 20);

        assert_eq!(
            validate_click(BlockCoord::new(9, 11).center(BLOCK), &view),
            Ok(BlockCoord::new(9, 11).center(BLOCK))
        );
        assert_eq!(
            validate_click(BlockCoord::new(5, 11).center(BLOCK), &view),
            Err(ClickRejection::Misaligned)
        );
    }

    #[test]
    fn full_path_rejects_valid_click() {
        let maze = open_maze();
        let target = BlockCoord::new(5, 5).center(BLOCK);
        let view = PathView::new(&maze, BLOCK, target, Some(target), 20, 20);
        assert_eq!(
            validate_click(BlockCoord::new(5, 9).center(BLOCK), &view),
            Err(ClickRejection::PathFull)
        );
    }

    #[test]
    fn secondary_click_clears_then_validates_from_player_target() {
        let maze = open_maze();
        let target = BlockCoord::new(5, 5).center(BLOCK);
        let last = BlockCoord::new(9, 5).center(BLOCK);
        let view = PathView::new(&maze, BLOCK, target, Some(last), 20, 20);
        let click = BlockCoord::new(5, 9).center(BLOCK);

        let mut out = Vec::new();
        Pathing::new().handle(ClickEvent::secondary(click.x, click.y), view, &mut out);
        assert_eq!(
            out,
            vec![Command::ClearPath, Command::QueueWaypoint { waypoint: click }]
        );
    }

    #[test]
    fn rejected_primary_click_emits_nothing() {
        let maze = open_maze();
        let click = BlockCoord::new(7, 9).center(BLOCK);
        let mut out = Vec::new();
        Pathing::new().handle(
            ClickEvent::primary(click.x, click.y),
            view(&maze, BlockCoord::new(5, 5)),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
