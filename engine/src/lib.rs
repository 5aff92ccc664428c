#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-cadence simulation loop driving the labyrinth world.
//!
//! A [`Simulation`] owns the systems and the consumer side of the input
//! queues. Each tick it locks the [`SharedWorld`], drains input, advances
//! every entity, runs the collision checks and redraws what changed. The
//! lock is released while the loop sleeps, which is when readers get in.

mod input;
mod presenter;
mod shared;

use std::{
    io,
    sync::mpsc::TryRecvError,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use labyrinth_core::{Canvas, Command, ConfigError, Event, GameConfig};
use labyrinth_system_collision::{Collision, CollisionView};
use labyrinth_system_pathing::{PathView, Pathing};
use labyrinth_system_wander::Wanderer;
use labyrinth_world::{self as world, query, World};
use tracing::{debug, info, trace};

use crate::{input::InputReceivers, presenter::Presenter};

pub use input::InputQueues;
pub use shared::{SharedWorld, WorldState};

/// Mixed into the world seed so hostiles do not replay the maze generator's draws.
const WANDER_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Result of a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game goes on.
    Running,
    /// A new-game request regenerated the world; nothing else happened this tick.
    Restarted,
    /// The player is standing on the exit.
    Won,
    /// Every input producer is gone.
    Stopped,
}

/// Owns the systems and advances the shared world one tick at a time.
#[derive(Debug)]
pub struct Simulation<C> {
    shared: SharedWorld<C>,
    inputs: InputReceivers,
    tick_interval: Duration,
    pathing: Pathing,
    wanderer: Wanderer,
    collision: Collision,
    presenter: Presenter,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl<C: Canvas> Simulation<C> {
    /// Validates the configuration, starts the first game and paints it.
    ///
    /// Returns the simulation together with the reader handle and the input
    /// producers. The seed is resolved here so that maze generation and
    /// wandering both replay from the configured seed.
    pub fn new(
        config: GameConfig,
        mut canvas: C,
    ) -> Result<(Self, SharedWorld<C>, InputQueues), ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let tick_interval = config.tick_interval;
        let world = World::new(GameConfig {
            seed: Some(seed),
            ..config
        })?;

        let presenter = Presenter;
        presenter.repaint(&world, &mut canvas);
        info!(
            seed,
            columns = query::config(&world).columns,
            rows = query::config(&world).rows,
            hostiles = query::hostile_view(&world).len(),
            "simulation ready"
        );

        let shared = SharedWorld::new(WorldState { world, canvas });
        let (queues, inputs) = input::input_queues();
        let simulation = Self {
            shared: shared.clone(),
            inputs,
            tick_interval,
            pathing: Pathing::new(),
            wanderer: Wanderer::new(seed ^ WANDER_SEED_SALT),
            collision: Collision::new(),
            presenter,
            commands: Vec::new(),
            events: Vec::new(),
        };

        Ok((simulation, shared, queues))
    }

    /// Runs one tick with `dt` as the time elapsed since the previous one.
    pub fn step(&mut self, dt: Duration) -> TickOutcome {
        let shared = self.shared.clone();
        let mut guard = shared.lock();
        let WorldState { world, canvas } = &mut *guard;
        self.events.clear();

        match self.inputs.new_game.try_recv() {
            Ok(_) => {
                self.restart(world, canvas);
                return TickOutcome::Restarted;
            }
            Err(TryRecvError::Disconnected) => return TickOutcome::Stopped,
            Err(TryRecvError::Empty) => {}
        }

        self.drain_clicks(world);

        self.execute(world, Command::AdvancePlayer { dt });

        let block_size = query::config(world).block_size;
        self.wanderer.handle(
            &query::hostile_view(world),
            query::maze(world),
            block_size,
            &mut self.commands,
        );
        self.commands.push(Command::AdvanceHostiles { dt });
        self.flush(world);

        let player = query::player(world);
        let hostiles = query::hostile_view(world);
        self.collision.handle(
            CollisionView {
                player: &player,
                hostiles: &hostiles,
                exit: query::exit(world),
                flags: query::flags(world),
                block_size,
            },
            &mut self.commands,
        );
        self.flush(world);

        for event in &self.events {
            match event {
                Event::GameWon => info!(game = query::game(world), "player reached the exit"),
                Event::PlayerDied => info!(game = query::game(world), "player was caught"),
                _ => {}
            }
        }
        trace!(?dt, events = self.events.len(), "tick");

        self.presenter.present(&self.events, world, canvas);

        if query::flags(world).won {
            TickOutcome::Won
        } else {
            TickOutcome::Running
        }
    }

    /// Blocks until a new game is requested, then starts it.
    ///
    /// Returns `false` when every input producer was dropped instead.
    pub fn await_new_game(&mut self) -> bool {
        if self.inputs.new_game.recv().is_err() {
            return false;
        }
        let shared = self.shared.clone();
        let mut guard = shared.lock();
        let WorldState { world, canvas } = &mut *guard;
        self.restart(world, canvas);
        true
    }

    /// Drives ticks at the configured cadence until the input producers are gone.
    ///
    /// A won game pauses the loop until a new game is requested.
    pub fn run(mut self) {
        info!(interval = ?self.tick_interval, "simulation started");
        let mut last_tick = Instant::now();
        loop {
            let now = Instant::now();
            let dt = now.duration_since(last_tick);
            last_tick = now;

            match self.step(dt) {
                TickOutcome::Running => {}
                TickOutcome::Restarted => last_tick = Instant::now(),
                TickOutcome::Won => {
                    debug!("waiting for a new game");
                    if !self.await_new_game() {
                        break;
                    }
                    last_tick = Instant::now();
                    continue;
                }
                TickOutcome::Stopped => break,
            }

            thread::sleep(self.tick_interval);
        }
        info!("simulation stopped");
    }

    fn restart(&mut self, world: &mut World, canvas: &mut C) {
        self.events.clear();
        self.execute(world, Command::NewGame);
        self.presenter.present(&self.events, world, canvas);
        info!(game = query::game(world), "new game started");
    }

    fn drain_clicks(&mut self, world: &mut World) {
        while let Ok(click) = self.inputs.clicks.try_recv() {
            let view = PathView::new(
                query::maze(world),
                query::config(world).block_size,
                query::player(world).target,
                query::last_waypoint(world),
                query::path_len(world),
                query::path_capacity(world),
            );
            self.pathing.handle(click, view, &mut self.commands);
            self.flush(world);
        }
    }

    fn execute(&mut self, world: &mut World, command: Command) {
        world::apply(world, command, &mut self.events);
    }

    fn flush(&mut self, world: &mut World) {
        for command in self.commands.drain(..) {
            world::apply(world, command, &mut self.events);
        }
    }
}

impl<C: Canvas + Send + 'static> Simulation<C> {
    /// Moves the simulation onto its own named thread.
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("simulation".into())
            .spawn(move || self.run())
    }
}
