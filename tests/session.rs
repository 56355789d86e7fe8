use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snake_arcade::{
    Collision, Config, Coords, Direction, GameOverReason, InputEvent, Session, SessionState,
};

fn session_with(config: Config, seed: u64) -> Session<ChaCha8Rng> {
    Session::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
}

fn assert_disjoint(session: &Session<ChaCha8Rng>) {
    let snake = session.snake().body();
    for apple in session.food() {
        assert!(!snake.contains(apple), "apple {:?} under the snake", apple);
        assert_ne!(Some(*apple), session.hazard(), "apple under the bomb");
    }
    if let Some(bomb) = session.hazard() {
        assert!(!snake.contains(&bomb), "bomb {:?} under the snake", bomb);
    }
}

#[test]
fn eating_food_grows_snake_and_scores() {
    let mut session = session_with(Config::default(), 1);
    session.debug_set_snake(&[(0, 0), (1, 0), (2, 0)], Direction::Right);
    session.debug_set_food(&[(3, 0)]);
    session.debug_set_hazard(Some((10, 10)));

    session.tick_movement();

    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.snake().len(), 4);
    assert_eq!(session.snake().head(), Some((3, 0)));
    assert_eq!(session.score(), 1);
    assert_eq!(session.high_score(), 1);
    assert_eq!(session.food().len(), 1);
    assert!(!session.food().contains(&(3, 0)));
    assert_ne!(session.hazard(), Some((10, 10)), "bomb should relocate");
    assert_disjoint(&session);
}

#[test]
fn wall_collision_ends_the_session() {
    let mut session = session_with(Config::default(), 2);
    session.debug_set_snake(&[(2, 0), (1, 0), (0, 0)], Direction::Left);
    session.debug_set_food(&[(7, 7)]);
    session.debug_set_hazard(Some((8, 8)));

    session.tick_movement();

    assert_eq!(session.snake().head(), Some((-1, 0)));
    assert_eq!(session.state(), SessionState::GameOver);
    assert_eq!(
        session.game_over_reason(),
        Some(&GameOverReason::Collision(vec![Collision::Wall]))
    );
    assert!(!session.timers_running());
}

#[test]
fn bomb_collision_ends_the_session() {
    let mut session = session_with(Config::default(), 3);
    session.debug_set_snake(&[(4, 5), (5, 5), (6, 5)], Direction::Right);
    session.debug_set_food(&[(0, 14)]);
    session.debug_set_hazard(Some((7, 5)));

    session.tick_movement();

    assert_eq!(
        session.game_over_reason(),
        Some(&GameOverReason::Collision(vec![Collision::Hazard]))
    );
}

#[test]
fn self_collision_ends_the_session() {
    let mut session = session_with(Config::default(), 4);
    session.debug_set_snake(
        &[(3, 4), (3, 5), (4, 5), (5, 5), (5, 4), (4, 4)],
        Direction::Left,
    );
    session.debug_set_food(&[(0, 14)]);
    session.debug_set_hazard(Some((14, 0)));

    session.handle_input(InputEvent::Turn(Direction::Down));
    session.tick_movement();

    assert_eq!(
        session.game_over_reason(),
        Some(&GameOverReason::Collision(vec![Collision::SelfBite]))
    );
}

#[test]
fn countdown_runs_out() {
    let mut session = session_with(Config::default(), 5);
    assert_eq!(session.time_remaining(), 30);

    for _ in 0..29 {
        session.tick_countdown();
    }
    assert_eq!(session.time_remaining(), 1);
    assert_eq!(session.state(), SessionState::Running);

    session.tick_countdown();
    assert_eq!(session.time_remaining(), 0);
    assert_eq!(session.state(), SessionState::GameOver);
    assert_eq!(session.game_over_reason(), Some(&GameOverReason::TimeUp));
}

#[test]
fn opposite_direction_is_rejected() {
    let mut session = session_with(Config::default(), 6);
    assert_eq!(session.direction(), Direction::Right);

    session.handle_input(InputEvent::Turn(Direction::Left));
    assert_eq!(session.direction(), Direction::Right);

    session.handle_input(InputEvent::Turn(Direction::Down));
    assert_eq!(session.direction(), Direction::Down);
}

#[test]
fn high_score_survives_restart() {
    let mut session = session_with(Config::default(), 7);
    session.debug_set_snake(&[(0, 3), (1, 3), (2, 3)], Direction::Right);
    session.debug_set_food(&[(3, 3), (4, 3)]);
    session.debug_set_hazard(Some((12, 12)));

    session.tick_movement();
    session.debug_set_food(&[(4, 3)]);
    session.debug_set_hazard(Some((12, 12)));
    session.tick_movement();
    assert_eq!(session.score(), 2);

    for _ in 0..10 {
        session.tick_countdown();
    }
    session.handle_input(InputEvent::Pause);
    assert_eq!(session.time_remaining(), 20);
    session.debug_set_snake(&[(1, 0), (0, 0)], Direction::Left);
    session.handle_input(InputEvent::Resume);
    session.tick_movement();
    assert_eq!(session.state(), SessionState::GameOver);

    session.handle_input(InputEvent::Restart);
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.score(), 0);
    assert_eq!(session.high_score(), 2);
    assert_eq!(session.time_remaining(), 30);
    assert_eq!(session.direction(), Direction::Right);
    assert_eq!(session.snake().body(), &[(0, 0), (1, 0), (2, 0)]);
    assert_eq!(session.food().len(), 3);
    assert!(session.hazard().is_some());
    assert_disjoint(&session);
}

#[test]
fn no_tick_runs_after_the_session_stops() {
    let mut session = session_with(Config::default(), 8);
    session.debug_set_snake(&[(2, 0), (1, 0), (0, 0)], Direction::Left);
    session.debug_set_food(&[(7, 7)]);
    session.debug_set_hazard(Some((8, 8)));

    // The first movement tick is fatal; nothing after it may run.
    let ran = session.update(Duration::from_secs(10));
    assert_eq!(ran, 1);
    assert_eq!(session.state(), SessionState::GameOver);
    assert_eq!(session.time_remaining(), 30);
    assert_eq!(session.update(Duration::from_secs(10)), 0);
}

#[test]
fn pause_freezes_both_timers() {
    let mut session = session_with(Config::default(), 9);
    session.debug_set_food(&[(14, 14)]);
    session.debug_set_hazard(Some((14, 13)));

    session.update(Duration::from_millis(950));
    let head = session.snake().head();
    session.handle_input(InputEvent::TogglePause);

    assert_eq!(session.update(Duration::from_secs(60)), 0);
    assert_eq!(session.snake().head(), head);
    assert_eq!(session.time_remaining(), 30);

    session.handle_input(InputEvent::TogglePause);
    // 50 ms finishes both the pending move and the first second.
    assert_eq!(session.update(Duration::from_millis(50)), 2);
    assert_eq!(session.time_remaining(), 29);
}

#[test]
fn full_board_ends_the_round() {
    let config = Config { grid_size: 5, food_count: 1, ..Config::default() };
    let mut session = session_with(config, 10);

    let mut path: Vec<Coords> = Vec::new();
    for y in 0..5 {
        let row: Vec<Coords> = (0..5).map(|x| (x, y)).collect();
        if y % 2 == 0 {
            path.extend(row);
        } else {
            path.extend(row.into_iter().rev());
        }
    }
    let apple = path.pop();
    assert_eq!(apple, Some((4, 4)));

    session.debug_set_snake(&path, Direction::Right);
    session.debug_set_food(&[(4, 4)]);
    session.debug_set_hazard(None);

    session.tick_movement();

    assert_eq!(session.snake().len(), 25);
    assert_eq!(session.score(), 1);
    assert_eq!(session.state(), SessionState::GameOver);
    assert_eq!(session.game_over_reason(), Some(&GameOverReason::BoardFull));
}

#[test]
fn long_run_never_shrinks_or_overlaps() {
    let config = Config { countdown: 3600, ..Config::default() };
    let mut session = session_with(config, 11);
    let turns = [Direction::Down, Direction::Right, Direction::Up, Direction::Right];

    for i in 0..400 {
        if session.state() != SessionState::Running {
            session.handle_input(InputEvent::Restart);
        }
        // Zig-zag across the board so the snake eats now and then.
        let col = session.snake().head().map(|h| h.0).unwrap_or(0);
        if i % 14 == 0 || col >= 13 {
            session.handle_input(InputEvent::Turn(turns[(i / 14) % turns.len()]));
        }

        let before = session.snake().len();
        let score = session.score();
        session.tick_movement();

        if session.state() == SessionState::Running {
            let grew = session.snake().len() - before;
            assert!(grew <= 1);
            assert_eq!(session.score() - score, grew as u32);
            assert!(session.high_score() >= session.score());
            assert_disjoint(&session);
        }
    }
}
