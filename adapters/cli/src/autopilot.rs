//! Unattended play: steers the player toward the exit by submitting clicks.

use labyrinth_core::{BlockCoord, Direction};
use labyrinth_world::DistanceField;

/// Blocks where the shortest route from `from` to the goal turns, ending on the goal.
///
/// Each returned block shares a row or column with the previous one and the
/// blocks between them are open, so every entry is a valid waypoint. At most
/// `limit` blocks are returned.
pub(crate) fn route_corners(
    navigation: &DistanceField,
    from: BlockCoord,
    limit: usize,
) -> Vec<BlockCoord> {
    let mut corners = Vec::new();
    let mut current = from;
    let mut heading: Option<Direction> = None;

    while let Some(next) = navigation.next_toward_goal(current) {
        let direction = Direction::ALL
            .into_iter()
            .find(|direction| current.step(*direction, 1) == Some(next));
        if heading.is_some() && heading != direction {
            if corners.len() == limit {
                return corners;
            }
            corners.push(current);
        }
        heading = direction;
        current = next;
    }

    if current != from && corners.len() < limit {
        corners.push(current);
    }
    corners
}
