#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision system that decides when a game is won or lost.

use glam::DVec2;
use labyrinth_core::{Command, GameFlags, HostileView, PixelPoint, PlayerSnapshot, CONTACT_FACTOR};

/// Read-only state the collision system inspects each tick.
#[derive(Clone, Copy, Debug)]
pub struct CollisionView<'a> {
    /// Current player state.
    pub player: &'a PlayerSnapshot,
    /// Current hostile states.
    pub hostiles: &'a HostileView,
    /// Pixel-center of the exit block.
    pub exit: PixelPoint,
    /// Terminal flags before this tick's checks.
    pub flags: GameFlags,
    /// Edge length of a maze block in pixels.
    pub block_size: u32,
}

/// Pure system that emits terminal-state commands.
#[derive(Debug, Default)]
pub struct Collision;

impl Collision {
    /// Creates a new collision system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Runs the win check and then the lose check.
    ///
    /// Reaching the exit takes precedence: the lose check is skipped on the
    /// tick the game is won. Neither check runs once a flag is already set.
    pub fn handle(&mut self, view: CollisionView<'_>, out: &mut Vec<Command>) {
        if view.flags.won || view.flags.dead {
            return;
        }

        if view.player.pixel() == view.exit {
            out.push(Command::MarkWon);
            return;
        }

        let caught = view
            .hostiles
            .iter()
            .any(|hostile| touches(view.player.position, hostile.position, view.block_size));
        if caught {
            out.push(Command::MarkDead);
        }
    }
}

/// Reports whether two entities overlap closely enough on both axes to count as contact.
#[must_use]
pub fn touches(player: DVec2, hostile: DVec2, block_size: u32) -> bool {
    let reach = f64::from(block_size) * CONTACT_FACTOR;
    let gap = (player - hostile).abs();
    gap.x < reach && gap.y < reach
}
