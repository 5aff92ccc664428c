//! Continuous motion integration shared by the player and the hostiles.

use glam::DVec2;
use labyrinth_core::{Direction, PixelPoint};

/// Moving actor with a continuous position and an integer-pixel target.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Entity {
    position: DVec2,
    direction: Direction,
    target: PixelPoint,
}

/// Pixel-level change produced by a single integration step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Motion {
    pub(crate) from: PixelPoint,
    pub(crate) to: PixelPoint,
    pub(crate) direction: Direction,
}

impl Entity {
    /// Entity resting on `point`, facing right.
    pub(crate) fn resting_at(point: PixelPoint) -> Self {
        Self {
            position: point.to_position(),
            direction: Direction::Right,
            target: point,
        }
    }

    pub(crate) fn position(&self) -> DVec2 {
        self.position
    }

    pub(crate) fn direction(&self) -> Direction {
        self.direction
    }

    pub(crate) fn target(&self) -> PixelPoint {
        self.target
    }

    pub(crate) fn pixel(&self) -> PixelPoint {
        PixelPoint::from_position(self.position)
    }

    pub(crate) fn at_target(&self) -> bool {
        self.pixel() == self.target
    }

    pub(crate) fn retarget(&mut self, target: PixelPoint) {
        self.target = target;
    }

    /// Moves toward the target by at most `speed * dt` pixels along a single axis.
    ///
    /// The horizontal axis is resolved first; vertical motion only starts once
    /// the integer horizontal position matches the target. Returns `None` when
    /// the position did not change.
    pub(crate) fn step(&mut self, speed: f64, dt: f64) -> Option<Motion> {
        let from = self.pixel();
        let budget = (speed * dt).max(0.0);

        if from.x != self.target.x {
            let remaining = f64::from(self.target.x) - self.position.x;
            let distance = budget.min(remaining.abs());
            if distance <= 0.0 {
                return None;
            }
            if from.x > self.target.x {
                self.position.x -= distance;
                self.direction = Direction::Left;
            } else {
                self.position.x += distance;
                self.direction = Direction::Right;
            }
        } else if from.y != self.target.y {
            let remaining = f64::from(self.target.y) - self.position.y;
            let distance = budget.min(remaining.abs());
            if distance <= 0.0 {
                return None;
            }
            if from.y > self.target.y {
                self.position.y -= distance;
                self.direction = Direction::Up;
            } else {
                self.position.y += distance;
                self.direction = Direction::Down;
            }
        } else {
            return None;
        }

        Some(Motion {
            from,
            to: self.pixel(),
            direction: self.direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_entity_does_not_move() {
        let mut entity = Entity::resting_at(PixelPoint::new(48, 48));
        assert!(entity.at_target());
        assert_eq!(entity.step(64.0, 0.05), None);
        assert_eq!(entity.position(), DVec2::new(48.0, 48.0));
    }

    #[test]
    fn horizontal_axis_is_resolved_before_vertical() {
        let mut entity = Entity::resting_at(PixelPoint::new(48, 48));
        entity.retarget(PixelPoint::new(112, 112));

        let motion = entity.step(64.0, 0.5).expect("entity should move");
        assert_eq!(motion.direction, Direction::Right);
        assert_eq!(entity.position(), DVec2::new(80.0, 48.0));

        let _ = entity.step(64.0, 0.5);
        assert_eq!(entity.position(), DVec2::new(112.0, 48.0));

        let motion = entity.step(64.0, 0.25).expect("entity should move");
        assert_eq!(motion.direction, Direction::Down);
        assert_eq!(entity.position(), DVec2::new(112.0, 64.0));
    }

    #[test]
    fn step_never_overshoots_target() {
        let mut entity = Entity::resting_at(PixelPoint::new(176, 48));
        entity.retarget(PixelPoint::new(144, 48));

        let motion = entity.step(200.0, 1.0).expect("entity should move");
        assert_eq!(motion.to, PixelPoint::new(144, 48));
        assert_eq!(motion.direction, Direction::Left);
        assert!(entity.at_target());
        assert_eq!(entity.step(200.0, 1.0), None);
    }

    #[test]
    fn zero_delta_time_is_not_a_move() {
        let mut entity = Entity::resting_at(PixelPoint::new(48, 48));
        entity.retarget(PixelPoint::new(48, 16));
        assert_eq!(entity.step(64.0, 0.0), None);
        assert_eq!(entity.direction(), Direction::Right);
    }
}
