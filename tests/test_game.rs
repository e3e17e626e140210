use exhaust_blaster::collision::exhaust_center;
use exhaust_blaster::compute::FireOutcome;
use exhaust_blaster::config::GameConfig;
use exhaust_blaster::entities::*;
use exhaust_blaster::error::{Command, GameError};
use exhaust_blaster::game::{Game, InputEvent};
use exhaust_blaster::timer::TaskKind;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Id well clear of anything the spawner hands out.
const TRACKED: u64 = u64::MAX;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn started_game() -> Game {
    let mut game = Game::new(GameConfig::default());
    game.start(0).expect("start from NotStarted");
    game
}

fn track(game: &mut Game, lane: usize, y: f32, speed: f32) {
    game.session_mut().expect("active").vehicles.push(Vehicle {
        id: TRACKED,
        lane,
        x: 0.0,
        y,
        speed,
        color: VehicleColor::Teal,
        burst_dir: -1,
        hit_at: None,
    });
}

fn tracked(game: &Game) -> Option<&Vehicle> {
    game.session().and_then(|s| s.vehicle(TRACKED))
}

// ── Transitions ───────────────────────────────────────────────────────────────

#[test]
fn new_game_waits_on_start_screen() {
    let game = Game::new(GameConfig::default());
    assert_eq!(game.status(), GameStatus::NotStarted);
    assert!(game.session().is_none());
    assert_eq!(game.score(), 0);
}

#[test]
fn restart_only_from_ended() {
    let mut game = Game::new(GameConfig::default());
    assert_eq!(
        game.restart(),
        Err(GameError::InvalidTransition {
            from: GameStatus::NotStarted,
            command: Command::Restart,
        })
    );
    game.start(0).unwrap();
    assert!(game.restart().is_err());
    assert_eq!(game.status(), GameStatus::Active);
}

#[test]
fn start_while_active_resets_session() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    game.advance(2000, &mut rng);
    game.session_mut().unwrap().score = 5;
    assert!(!game.session().unwrap().vehicles.is_empty());

    game.start(2000).unwrap();
    let s = game.session().unwrap();
    assert_eq!(s.score, 0);
    assert!(s.vehicles.is_empty());
    assert_eq!(s.time_left, 60);
    // Timers re-armed from the new start time.
    assert_eq!(s.timers().get(TaskKind::Spawn).next_due(), Some(2750));
    assert!(!s.timers().get(TaskKind::FireRepeat).is_armed());
}

#[test]
fn start_resets_aim_to_center() {
    let mut game = started_game();
    game.handle_input(InputEvent::PointerMove { x: 10.0, y: 10.0 }, 5);
    game.start(10).unwrap();
    assert_eq!(game.session().unwrap().aim, AimPoint { x: 400.0, y: 300.0 });
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[test]
fn spawner_fires_on_its_interval() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    game.advance(749, &mut rng);
    assert!(game.session().unwrap().vehicles.is_empty());

    game.advance(750, &mut rng);
    let s = game.session().unwrap();
    assert_eq!(s.vehicles.len(), 1);
    assert_eq!(s.vehicles[0].y, GameConfig::default().spawn_depth());
}

#[test]
fn vehicle_advances_by_speed_each_tick() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    let spawn = game.config().spawn_depth();
    track(&mut game, 1, spawn, 2.5);

    game.advance(160, &mut rng); // ten frames of 16 ms
    assert_eq!(tracked(&game).map(|v| v.y), Some(spawn - 10.0 * 2.5));
}

#[test]
fn vehicle_removed_after_crossing_despawn() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    track(&mut game, 1, 720.0, 4.0);

    // 187 frames → y = -28, still on the road.
    game.advance(187 * 16, &mut rng);
    assert_eq!(tracked(&game).map(|v| v.y), Some(-28.0));

    // 188th frame → y = -32, past the -30 boundary.
    game.advance(188 * 16, &mut rng);
    assert!(tracked(&game).is_none());
}

#[test]
fn countdown_ticks_once_per_second() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    game.advance(3500, &mut rng);
    assert_eq!(game.session().unwrap().time_left, 57);
}

// ── Fire controller ───────────────────────────────────────────────────────────

#[test]
fn press_on_exhaust_scores() {
    let mut game = started_game();
    track(&mut game, 1, 300.0, 2.0);
    let (cx, cy) = exhaust_center(game.config(), tracked(&game).unwrap());

    let outcome = game.handle_input(InputEvent::PointerDown { x: cx, y: cy }, 10);
    assert!(matches!(outcome, Some(FireOutcome::Fired { hits: 1, .. })));
    assert_eq!(game.score(), 1);
    assert_eq!(tracked(&game).unwrap().hit_at, Some(10));
}

#[test]
fn hit_vehicle_freezes_then_disappears() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    track(&mut game, 1, 300.0, 2.0);
    let (cx, cy) = exhaust_center(game.config(), tracked(&game).unwrap());
    game.handle_input(InputEvent::PointerDown { x: cx, y: cy }, 0);
    game.handle_input(InputEvent::PointerUp, 0);

    game.advance(992, &mut rng);
    assert_eq!(tracked(&game).map(|v| v.y), Some(300.0));

    game.advance(1008, &mut rng); // first frame more than 1000 ms after the hit
    assert!(tracked(&game).is_none());
    assert_eq!(game.score(), 1);
}

#[test]
fn second_press_on_hit_vehicle_scores_nothing() {
    let mut game = started_game();
    track(&mut game, 1, 300.0, 2.0);
    let (cx, cy) = exhaust_center(game.config(), tracked(&game).unwrap());

    game.handle_input(InputEvent::PointerDown { x: cx, y: cy }, 10);
    game.handle_input(InputEvent::PointerUp, 20);
    let outcome = game.handle_input(InputEvent::PointerDown { x: cx, y: cy }, 400);
    assert!(matches!(outcome, Some(FireOutcome::Fired { hits: 0, .. })));
    assert_eq!(game.score(), 1);
}

#[test]
fn rapid_presses_respect_cooldown() {
    let mut game = started_game();
    game.handle_input(InputEvent::PointerDown { x: 50.0, y: 50.0 }, 10);
    game.handle_input(InputEvent::PointerUp, 20);
    let outcome = game.handle_input(InputEvent::PointerDown { x: 60.0, y: 60.0 }, 100);
    assert_eq!(outcome, Some(FireOutcome::Rejected));
    assert_eq!(game.session().unwrap().shots.len(), 1);
}

#[test]
fn held_press_repeats_at_current_aim() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    game.handle_input(InputEvent::PointerDown { x: 100.0, y: 100.0 }, 0);
    game.handle_input(InputEvent::PointerMove { x: 200.0, y: 250.0 }, 50);
    assert!(game.session().unwrap().is_spraying());

    game.advance(300, &mut rng);
    let shots = &game.session().unwrap().shots;
    assert_eq!(shots.len(), 2);
    let last = shots.last().unwrap();
    assert_eq!((last.x, last.y, last.fired_at), (200.0, 250.0, 300));
}

#[test]
fn release_stops_auto_fire() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    game.handle_input(InputEvent::PointerDown { x: 100.0, y: 100.0 }, 0);
    game.handle_input(InputEvent::PointerUp, 100);
    assert!(!game.session().unwrap().is_spraying());

    game.advance(2000, &mut rng);
    // The one shot has faded and nothing replaced it.
    assert!(game.session().unwrap().shots.is_empty());
}

#[test]
fn touch_end_waits_for_last_finger() {
    let mut game = started_game();
    game.handle_input(InputEvent::TouchStart { x: 100.0, y: 100.0 }, 0);
    game.handle_input(InputEvent::TouchEnd { remaining: 1 }, 10);
    assert!(game.session().unwrap().is_spraying());
    game.handle_input(InputEvent::TouchEnd { remaining: 0 }, 20);
    assert!(!game.session().unwrap().is_spraying());
}

#[test]
fn second_press_rearms_instead_of_stacking() {
    let mut game = started_game();
    game.handle_input(InputEvent::PointerDown { x: 1.0, y: 1.0 }, 0);
    game.handle_input(InputEvent::TouchStart { x: 2.0, y: 2.0 }, 100);
    let repeat = game.session().unwrap().timers().get(TaskKind::FireRepeat).clone();
    assert_eq!(repeat.next_due(), Some(400));
}

#[test]
fn moves_clamp_to_field() {
    let mut game = started_game();
    game.handle_input(InputEvent::PointerMove { x: -50.0, y: 9999.0 }, 0);
    assert_eq!(game.session().unwrap().aim, AimPoint { x: 0.0, y: 600.0 });
    game.handle_input(InputEvent::TouchMove { x: 900.0, y: -3.0 }, 0);
    assert_eq!(game.session().unwrap().aim, AimPoint { x: 800.0, y: 0.0 });
}

#[test]
fn press_coordinates_clamp_to_field() {
    let mut game = started_game();
    game.handle_input(InputEvent::PointerDown { x: 1000.0, y: -10.0 }, 0);
    let shot = game.session().unwrap().shots[0];
    assert_eq!((shot.x, shot.y), (800.0, 0.0));
}

#[test]
fn input_ignored_outside_active() {
    let mut game = Game::new(GameConfig::default());
    assert_eq!(game.handle_input(InputEvent::PointerDown { x: 1.0, y: 1.0 }, 0), None);
    assert_eq!(game.status(), GameStatus::NotStarted);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn game_ends_when_time_runs_out() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    game.advance(59_999, &mut rng);
    assert_eq!(game.status(), GameStatus::Active);
    assert_eq!(game.session().unwrap().time_left, 1);

    game.advance(60_000, &mut rng);
    assert_eq!(game.status(), GameStatus::Ended);
    assert!(game.session().is_none());
}

#[test]
fn nothing_runs_after_game_over() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    game.handle_input(InputEvent::PointerDown { x: 400.0, y: 300.0 }, 59_900);
    game.advance(60_000, &mut rng);
    assert_eq!(game.status(), GameStatus::Ended);

    game.advance(120_000, &mut rng);
    assert_eq!(game.handle_input(InputEvent::PointerDown { x: 1.0, y: 1.0 }, 120_001), None);
    assert_eq!(game.handle_input(InputEvent::PointerUp, 120_002), None);
    assert_eq!(game.status(), GameStatus::Ended);
    assert!(game.session().is_none());
}

#[test]
fn final_score_survives_game_over() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    track(&mut game, 0, 200.0, 1.5);
    let (cx, cy) = exhaust_center(game.config(), tracked(&game).unwrap());
    game.handle_input(InputEvent::PointerDown { x: cx, y: cy }, 0);
    game.handle_input(InputEvent::PointerUp, 0);

    game.advance(60_000, &mut rng);
    assert_eq!(game.status(), GameStatus::Ended);
    assert_eq!(game.score(), 1);
}

#[test]
fn full_cycle_back_to_a_fresh_game() {
    let mut game = started_game();
    let mut rng = seeded_rng();
    game.advance(60_000, &mut rng);

    assert_eq!(
        game.start(60_001),
        Err(GameError::InvalidTransition {
            from: GameStatus::Ended,
            command: Command::Start,
        })
    );
    game.restart().unwrap();
    assert_eq!(game.status(), GameStatus::NotStarted);
    assert_eq!(game.score(), 0);

    game.start(70_000).unwrap();
    let s = game.session().unwrap();
    assert_eq!(s.time_left, 60);
    assert!(s.vehicles.is_empty() && s.shots.is_empty());
}
