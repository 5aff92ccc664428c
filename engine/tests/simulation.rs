use std::{
    thread,
    time::{Duration, Instant},
};

use labyrinth_core::{
    Block, BlockCoord, Canvas, ClickEvent, ConfigError, GameConfig, GameFlags, PixelPoint, Sprite,
};
use labyrinth_engine::{InputQueues, SharedWorld, Simulation, TickOutcome};
use labyrinth_world::{query, World};

#[derive(Debug, Default)]
struct Sketch {
    clears: usize,
    draws: Vec<(Sprite, PixelPoint)>,
}

impl Canvas for Sketch {
    fn clear(&mut self) {
        self.clears += 1;
        self.draws.clear();
    }

    fn fill_block(&mut self, _coord: BlockCoord, _block: Block) {}

    fn draw(&mut self, sprite: Sprite, center: PixelPoint) {
        self.draws.push((sprite, center));
    }

    fn erase(&mut self, _center: PixelPoint) {}
}

fn config(rows: u32, columns: u32, density: f64, seed: u64) -> GameConfig {
    GameConfig {
        rows,
        columns,
        hostile_density: density,
        tick_interval: Duration::from_millis(10),
        seed: Some(seed),
        ..GameConfig::default()
    }
}

fn start(config: GameConfig) -> (Simulation<Sketch>, SharedWorld<Sketch>, InputQueues) {
    Simulation::new(config, Sketch::default()).expect("valid configuration")
}

/// Blocks from the player's start to the exit, following the exit distance field.
fn route_to_exit(world: &World) -> Vec<BlockCoord> {
    let navigation = query::navigation(world);
    let mut block = BlockCoord::new(1, 1);
    let mut route = vec![block];
    while let Some(next) = navigation.next_toward_goal(block) {
        route.push(next);
        block = next;
    }
    route
}

fn click_on(block: BlockCoord) -> ClickEvent {
    let center = block.center(GameConfig::default().block_size);
    ClickEvent::primary(center.x, center.y)
}

/// Feeds the route one block per tick until the game is won.
fn walk_to_exit(simulation: &mut Simulation<Sketch>, shared: &SharedWorld<Sketch>, queues: &InputQueues) {
    let route = shared.read(|state| route_to_exit(&state.world));
    let mut pending = route.into_iter().skip(1);
    for _ in 0..500 {
        if let Some(block) = pending.next() {
            assert!(queues.submit_click(click_on(block)));
        }
        if simulation.step(Duration::from_secs(1)) == TickOutcome::Won {
            return;
        }
    }
    panic!("player never reached the exit");
}

#[test]
fn invalid_configuration_is_reported() {
    let error = Simulation::new(
        GameConfig {
            columns: 101,
            ..GameConfig::default()
        },
        Sketch::default(),
    )
    .expect_err("columns above the limit");
    assert_eq!(error, ConfigError::ColumnsOutOfRange { columns: 101 });
}

#[test]
fn first_game_is_painted_before_any_tick() {
    let (_simulation, shared, _queues) = start(config(15, 15, 20.0, 3));
    shared.read(|state| {
        assert_eq!(state.canvas.clears, 1);
        let exit = query::exit(&state.world);
        assert!(state.canvas.draws.contains(&(Sprite::Exit, exit)));
    });
}

#[test]
fn aligned_click_becomes_the_player_target() {
    let (mut simulation, shared, queues) = start(config(15, 15, 0.0, 42));
    let route = shared.read(|state| route_to_exit(&state.world));
    let next = route[1];

    assert!(queues.submit_click(ClickEvent::primary(1, 1)));
    assert!(queues.submit_click(click_on(next)));
    assert_eq!(simulation.step(Duration::ZERO), TickOutcome::Running);

    shared.read(|state| {
        let player = query::player(&state.world);
        assert_eq!(player.target, next.center(32));
        assert_eq!(player.pixel(), BlockCoord::new(1, 1).center(32));
        assert_eq!(query::path_len(&state.world), 0);
    });
}

#[test]
fn player_moves_with_elapsed_time() {
    let (mut simulation, shared, queues) = start(config(15, 15, 0.0, 42));
    let route = shared.read(|state| route_to_exit(&state.world));
    assert!(queues.submit_click(click_on(route[1])));

    let _ = simulation.step(Duration::from_millis(250));
    let moved = shared.read(|state| {
        let start = BlockCoord::new(1, 1).center(32).to_position();
        query::player(&state.world).position.distance(start)
    });
    assert!((moved - 16.0).abs() < 1e-9, "moved {moved} pixels");
}

#[test]
fn reaching_the_exit_pauses_until_a_new_game() {
    let (mut simulation, shared, queues) = start(config(9, 9, 0.0, 11));
    walk_to_exit(&mut simulation, &shared, &queues);

    shared.read(|state| {
        let world = &state.world;
        assert!(query::flags(world).won);
        assert_eq!(query::player(world).pixel(), query::exit(world));
        assert!(state.canvas.draws.contains(&(Sprite::Won, query::exit(world))));
    });
    assert_eq!(simulation.step(Duration::from_secs(1)), TickOutcome::Won);

    assert!(queues.request_new_game());
    assert_eq!(simulation.step(Duration::from_secs(1)), TickOutcome::Restarted);
    shared.read(|state| {
        let world = &state.world;
        assert_eq!(query::game(world), 2);
        assert_eq!(query::flags(world), GameFlags::default());
        assert_eq!(query::path_len(world), 0);
        assert_eq!(query::player(world).pixel(), BlockCoord::new(1, 1).center(32));
        assert_eq!(state.canvas.clears, 2);
    });
}

#[test]
fn same_seed_replays_the_same_game() {
    let snapshot = |seed| {
        let (mut simulation, shared, queues) = start(config(21, 25, 40.0, seed));
        let route = shared.read(|state| route_to_exit(&state.world));
        for block in route.into_iter().skip(1).take(6) {
            let _ = queues.submit_click(click_on(block));
            let _ = simulation.step(Duration::from_millis(300));
        }
        for _ in 0..40 {
            let _ = simulation.step(Duration::from_millis(70));
        }
        shared.read(|state| {
            (
                query::player(&state.world),
                query::hostile_view(&state.world).into_vec(),
                query::flags(&state.world),
            )
        })
    };

    assert_eq!(snapshot(99), snapshot(99));
}

/// Idles the player on a crowded board until a hostile catches it.
fn caught_game() -> (Simulation<Sketch>, SharedWorld<Sketch>, InputQueues) {
    for seed in 0..32 {
        let (mut simulation, shared, queues) = start(config(9, 9, 50.0, seed));
        for _ in 0..3000 {
            assert_eq!(simulation.step(Duration::from_millis(50)), TickOutcome::Running);
            if shared.read(|state| query::flags(&state.world).dead) {
                return (simulation, shared, queues);
            }
        }
    }
    panic!("no hostile ever caught the player");
}

#[test]
fn caught_player_stays_dead_until_a_new_game() {
    let (mut simulation, shared, queues) = caught_game();
    let caught_at = shared.read(|state| {
        assert!(state.canvas.draws.contains(&(
            Sprite::DeadPlayer,
            query::player(&state.world).pixel()
        )));
        query::player(&state.world).pixel()
    });

    let route = shared.read(|state| route_to_exit(&state.world));
    let _ = queues.submit_click(click_on(route[1]));
    for _ in 0..300 {
        assert_eq!(simulation.step(Duration::from_millis(50)), TickOutcome::Running);
        shared.read(|state| {
            let world = &state.world;
            assert_eq!(
                query::flags(world),
                GameFlags {
                    won: false,
                    dead: true
                }
            );
            assert_eq!(query::player(world).pixel(), caught_at);
        });
    }

    assert!(queues.request_new_game());
    assert_eq!(simulation.step(Duration::from_millis(50)), TickOutcome::Restarted);
    shared.read(|state| {
        let world = &state.world;
        assert_eq!(query::game(world), 2);
        assert_eq!(query::flags(world), GameFlags::default());
        assert_eq!(query::path_len(world), 0);
        assert_eq!(query::player(world).pixel(), BlockCoord::new(1, 1).center(32));
    });
}

#[test]
fn dropping_every_producer_stops_the_loop() {
    let (mut simulation, _shared, queues) = start(config(9, 9, 0.0, 1));
    drop(queues);
    assert_eq!(simulation.step(Duration::ZERO), TickOutcome::Stopped);
}

#[test]
fn threaded_loop_waits_out_a_win_and_restarts() {
    let (mut simulation, shared, queues) = start(config(9, 9, 0.0, 23));
    walk_to_exit(&mut simulation, &shared, &queues);

    let handle = simulation.spawn().expect("spawn simulation thread");

    thread::sleep(Duration::from_millis(50));
    shared.read(|state| {
        assert!(query::flags(&state.world).won);
        assert_eq!(query::game(&state.world), 1);
    });

    assert!(queues.request_new_game());
    let deadline = Instant::now() + Duration::from_secs(5);
    while shared.read(|state| query::game(&state.world)) < 2 {
        assert!(Instant::now() < deadline, "new game never started");
        thread::sleep(Duration::from_millis(5));
    }
    shared.read(|state| assert_eq!(query::flags(&state.world), GameFlags::default()));

    drop(queues);
    handle.join().expect("simulation thread panicked");
}
