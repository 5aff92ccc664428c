//! Translates world events into canvas draw calls.

use labyrinth_core::{Block, Canvas, Event, Sprite};
use labyrinth_world::{query, World};
use tracing::trace;

/// Decides what gets redrawn after a tick.
///
/// Moved entities and cleared markers are erased first. The exit, queued
/// markers and hostiles are then drawn back, and the player goes on top.
#[derive(Debug, Default)]
pub(crate) struct Presenter;

impl Presenter {
    /// Paints the whole maze and every entity from scratch.
    pub(crate) fn repaint<C: Canvas>(&self, world: &World, canvas: &mut C) {
        canvas.clear();
        for (coord, block) in query::maze(world).iter() {
            if block == Block::Wall {
                canvas.fill_block(coord, block);
            }
        }
        self.overlay(world, canvas);
    }

    pub(crate) fn present<C: Canvas>(&self, events: &[Event], world: &World, canvas: &mut C) {
        if events
            .iter()
            .any(|event| matches!(event, Event::GameStarted { .. }))
        {
            self.repaint(world, canvas);
            return;
        }

        // A dead player is redrawn every tick since passing hostiles erase it.
        if events.is_empty() && !query::flags(world).dead {
            return;
        }

        for event in events {
            match event {
                Event::EntityMoved { entity, from, .. } => {
                    trace!(?entity, ?from, "erasing moved entity");
                    canvas.erase(*from);
                }
                Event::PathCleared { waypoints } => {
                    for waypoint in waypoints {
                        canvas.erase(*waypoint);
                    }
                }
                _ => {}
            }
        }

        self.overlay(world, canvas);
    }

    fn overlay<C: Canvas>(&self, world: &World, canvas: &mut C) {
        canvas.draw(Sprite::Exit, query::exit(world));
        for waypoint in query::waypoints(world) {
            canvas.draw(Sprite::Marker, waypoint);
        }
        for hostile in query::hostile_view(world).iter() {
            canvas.draw(Sprite::Hostile(hostile.direction), hostile.pixel());
        }

        let player = query::player(world);
        let flags = query::flags(world);
        let sprite = if flags.dead {
            Sprite::DeadPlayer
        } else {
            Sprite::Player(player.direction)
        };
        canvas.draw(sprite, player.pixel());
        if flags.won {
            canvas.draw(Sprite::Won, player.pixel());
        }
    }
}
