use arcade_dodger::compute::*;
use arcade_dodger::entities::*;

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

const W: i32 = 900;
const H: i32 = 600;

fn make_state() -> GameState {
    GameState {
        player: Player { x: 450, y: 520 },
        enemies: Vec::new(),
        particles: Vec::new(),
        controls: Controls::default(),
        score: 0,
        status: GameStatus::Playing,
        frame: 0,
        width: W,
        height: H,
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Every draw is zero: the spawn roll always succeeds, at x = 0 with speed 3.
fn always_spawn_rng() -> StepRng {
    StepRng::new(0, 0)
}

fn holding(state: &GameState, direction: Direction) -> GameState {
    set_control(state, direction, true)
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_position() {
    let s = init_state(W, H);
    assert_eq!(s.player.x, 450); // width / 2
    assert_eq!(s.player.y, 520); // height - 80
}

#[test]
fn init_state_is_idle_and_empty() {
    let s = init_state(W, H);
    assert_eq!(s.status, GameStatus::Idle);
    assert!(s.enemies.is_empty());
    assert!(s.particles.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.controls, Controls::default());
}

// ── start / restart ───────────────────────────────────────────────────────────

#[test]
fn start_from_idle_begins_playing() {
    let s = start_game(&init_state(W, H));
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn start_ignored_while_game_over() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.score = 77;
    let s2 = start_game(&s);
    assert_eq!(s2.status, GameStatus::GameOver);
    assert_eq!(s2.score, 77);
}

#[test]
fn restart_ignored_unless_game_over() {
    let mut s = make_state();
    s.score = 10;
    let s2 = restart(&s);
    assert_eq!(s2.status, GameStatus::Playing);
    assert_eq!(s2.score, 10);

    let idle = init_state(W, H);
    assert_eq!(restart(&idle).status, GameStatus::Idle);
}

#[test]
fn restart_resets_everything_and_returns_to_idle() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.score = 321;
    s.frame = 321;
    s.player = Player { x: 0, y: 0 };
    s.enemies.push(Enemy { x: 10, y: 10, speed: 4 });
    s = explode_state(&s);

    let s2 = restart(&s);
    assert_eq!(s2.status, GameStatus::Idle);
    assert_eq!(s2.score, 0);
    assert_eq!(s2.frame, 0);
    assert!(s2.enemies.is_empty());
    assert!(s2.particles.is_empty());
    assert_eq!(s2.player, Player { x: 450, y: 520 });
}

fn explode_state(s: &GameState) -> GameState {
    GameState {
        particles: explode(&s.particles, s.player.x, s.player.y, &mut seeded_rng()),
        ..s.clone()
    }
}

#[test]
fn transitions_do_not_mutate_original() {
    let s = init_state(W, H);
    let _ = start_game(&s);
    let _ = set_control(&s, Direction::Left, true);
    assert_eq!(s.status, GameStatus::Idle);
    assert!(!s.controls.left);
}

// ── set_control ───────────────────────────────────────────────────────────────

#[test]
fn press_and_release_toggle_flag() {
    let s = holding(&make_state(), Direction::Up);
    assert!(s.controls.up);
    assert!(!s.controls.down);
    let s = set_control(&s, Direction::Up, false);
    assert!(!s.controls.up);
}

// ── rects_intersect ───────────────────────────────────────────────────────────

#[test]
fn overlapping_squares_intersect() {
    assert!(rects_intersect(0, 0, 40, 40, 39, 39, 40, 40));
    assert!(rects_intersect(100, 100, 40, 40, 100, 100, 40, 40));
}

#[test]
fn squares_sharing_an_edge_do_not_intersect() {
    assert!(!rects_intersect(0, 0, 40, 40, 40, 0, 40, 40));
    assert!(!rects_intersect(0, 0, 40, 40, 0, 40, 40, 40));
}

#[test]
fn overlap_on_one_axis_only_is_not_a_hit() {
    assert!(!rects_intersect(0, 0, 40, 40, 10, 100, 40, 40));
    assert!(!rects_intersect(0, 0, 40, 40, 100, 10, 40, 40));
}

// ── update_player ─────────────────────────────────────────────────────────────

#[test]
fn each_held_direction_moves_six_units() {
    let p = Player { x: 450, y: 300 };
    let mut c = Controls::default();
    c.right = true;
    assert_eq!(update_player(&p, &c, W, H), Player { x: 456, y: 300 });
    c = Controls { up: true, ..Controls::default() };
    assert_eq!(update_player(&p, &c, W, H), Player { x: 450, y: 294 });
}

#[test]
fn diagonal_is_full_speed_on_both_axes() {
    let p = Player { x: 450, y: 300 };
    let c = Controls { down: true, left: true, ..Controls::default() };
    assert_eq!(update_player(&p, &c, W, H), Player { x: 444, y: 306 });
}

#[test]
fn opposite_directions_cancel() {
    let p = Player { x: 450, y: 300 };
    let c = Controls { up: true, down: true, left: true, right: true };
    assert_eq!(update_player(&p, &c, W, H), p);
}

#[test]
fn player_clamped_to_field() {
    let c = Controls { up: true, left: true, ..Controls::default() };
    assert_eq!(update_player(&Player { x: 2, y: 3 }, &c, W, H), Player { x: 0, y: 0 });

    let c = Controls { down: true, right: true, ..Controls::default() };
    let p = update_player(&Player { x: 858, y: 558 }, &c, W, H);
    assert_eq!(p, Player { x: W - PLAYER_SIZE, y: H - PLAYER_SIZE });
}

// ── spawn_enemy ───────────────────────────────────────────────────────────────

#[test]
fn successful_spawn_appends_enemy_above_top_edge() {
    let enemies = spawn_enemy(&[], W, &mut always_spawn_rng());
    assert_eq!(enemies, vec![Enemy { x: 0, y: ENEMY_SPAWN_Y, speed: ENEMY_SPEED_MIN }]);
}

#[test]
fn spawn_keeps_existing_enemies_in_order() {
    let existing = vec![Enemy { x: 5, y: 5, speed: 4 }, Enemy { x: 9, y: 9, speed: 6 }];
    let enemies = spawn_enemy(&existing, W, &mut always_spawn_rng());
    assert_eq!(enemies.len(), 3);
    assert_eq!(&enemies[..2], &existing[..]);
}

#[test]
fn spawned_enemies_stay_in_range() {
    let mut rng = seeded_rng();
    let mut enemies = Vec::new();
    for _ in 0..3000 {
        enemies = spawn_enemy(&enemies, W, &mut rng);
    }
    // 1 in 15 over 3000 rolls: 200 expected
    assert!(enemies.len() > 120 && enemies.len() < 300, "got {}", enemies.len());
    for e in &enemies {
        assert!(e.x >= 0 && e.x < W - ENEMY_SIZE);
        assert_eq!(e.y, ENEMY_SPAWN_Y);
        assert!((ENEMY_SPEED_MIN..=ENEMY_SPEED_MAX).contains(&e.speed));
    }
}

// ── advance_enemies ───────────────────────────────────────────────────────────

#[test]
fn enemies_fall_by_own_speed() {
    let enemies = vec![Enemy { x: 0, y: 0, speed: 3 }, Enemy { x: 50, y: 10, speed: 6 }];
    let moved = advance_enemies(&enemies, H);
    assert_eq!(moved[0].y, 3);
    assert_eq!(moved[1].y, 16);
}

#[test]
fn enemy_culled_only_past_margin() {
    // height + 50 = 650; y == 650 survives, y > 650 is removed
    let enemies = vec![Enemy { x: 0, y: 646, speed: 4 }, Enemy { x: 0, y: 647, speed: 4 }];
    let moved = advance_enemies(&enemies, H);
    assert_eq!(moved, vec![Enemy { x: 0, y: 650, speed: 4 }]);
}

fn ticks_until_culled(speed: i32) -> usize {
    let mut enemies = vec![Enemy { x: 0, y: ENEMY_SPAWN_Y, speed }];
    let mut ticks = 0;
    while !enemies.is_empty() {
        enemies = advance_enemies(&enemies, H);
        ticks += 1;
    }
    ticks
}

#[test]
fn enemy_lifetime_matches_fall_distance() {
    // Smallest n with -40 + n*s > 650
    assert_eq!(ticks_until_culled(4), 173); // ceil(690 / 4)
    assert_eq!(ticks_until_culled(3), 231); // 690 / 3 = 230 lands exactly on 650
    assert_eq!(ticks_until_culled(5), 139);
    assert_eq!(ticks_until_culled(6), 116);
}

// ── find_collision ────────────────────────────────────────────────────────────

#[test]
fn collision_reports_first_hit_in_order() {
    let player = Player { x: 450, y: 520 };
    let enemies = vec![
        Enemy { x: 0, y: 0, speed: 3 },
        Enemy { x: 430, y: 500, speed: 3 },
        Enemy { x: 460, y: 530, speed: 3 },
    ];
    assert_eq!(find_collision(&player, &enemies), Some(1));
}

#[test]
fn near_miss_is_not_a_collision() {
    let player = Player { x: 450, y: 520 };
    let enemies = vec![Enemy { x: 490, y: 520, speed: 3 }, Enemy { x: 450, y: 480, speed: 3 }];
    assert_eq!(find_collision(&player, &enemies), None);
}

// ── particles ─────────────────────────────────────────────────────────────────

#[test]
fn explode_creates_burst_at_position() {
    let particles = explode(&[], 120, 340, &mut seeded_rng());
    assert_eq!(particles.len(), BURST_SIZE);
    for p in &particles {
        assert_eq!((p.x, p.y), (120.0, 340.0));
        assert!(p.dx >= -PARTICLE_MAX_SPEED && p.dx < PARTICLE_MAX_SPEED);
        assert!(p.dy >= -PARTICLE_MAX_SPEED && p.dy < PARTICLE_MAX_SPEED);
        assert_eq!(p.life, PARTICLE_LIFE);
        assert!(p.alive);
    }
}

#[test]
fn particle_moves_by_velocity() {
    let p = Particle { x: 10.0, y: 20.0, dx: 1.5, dy: -2.0, life: 40, alive: true };
    let moved = advance_particles(&[p]);
    assert_eq!(moved[0].x, 11.5);
    assert_eq!(moved[0].y, 18.0);
    assert_eq!(moved[0].life, 39);
}

#[test]
fn particle_lives_exactly_forty_updates() {
    let mut particles = explode(&[], 0, 0, &mut seeded_rng());
    for update in 1..PARTICLE_LIFE {
        particles = advance_particles(&particles);
        assert_eq!(particles.len(), BURST_SIZE, "died early at update {update}");
        assert!(particles.iter().all(|p| p.alive));
    }
    // Life goes 1 → 0 on the 40th update
    particles = advance_particles(&particles);
    assert!(particles.is_empty());
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_does_nothing_while_idle() {
    let s = holding(&init_state(W, H), Direction::Left);
    let s2 = tick(&s, &mut always_spawn_rng());
    assert_eq!(s2.score, 0);
    assert_eq!(s2.frame, 0);
    assert_eq!(s2.player, s.player);
    assert!(s2.enemies.is_empty());
}

#[test]
fn tick_freezes_game_over() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.score = 99;
    s.enemies.push(Enemy { x: 10, y: 10, speed: 5 });
    s = explode_state(&s);
    let s2 = tick(&s, &mut always_spawn_rng());
    assert_eq!(s2.score, 99);
    assert_eq!(s2.enemies, s.enemies);
    assert_eq!(s2.particles, s.particles);
}

#[test]
fn tick_increments_score_and_frame() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    // Fresh spawns need 80+ ticks to reach the player's row
    for expected in 1..=50 {
        s = tick(&s, &mut rng);
        assert_eq!(s.status, GameStatus::Playing);
        assert_eq!(s.score, expected);
        assert_eq!(s.frame, expected as u64);
    }
}

#[test]
fn tick_spawned_enemy_falls_in_same_tick() {
    let s = tick(&make_state(), &mut always_spawn_rng());
    assert_eq!(s.enemies, vec![Enemy { x: 0, y: ENEMY_SPAWN_Y + 3, speed: 3 }]);
}

#[test]
fn holding_left_moves_then_clamps() {
    let mut s = holding(&make_state(), Direction::Left);
    let mut rng = seeded_rng();
    for _ in 0..10 {
        s = tick(&s, &mut rng);
    }
    assert_eq!(s.player.x, 390);

    for _ in 0..90 {
        s.enemies.clear();
        s = tick(&s, &mut rng);
    }
    assert_eq!(s.player.x, 0);
}

#[test]
fn player_stays_in_bounds_under_any_input() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let combos = [
        Controls { up: true, left: true, ..Controls::default() },
        Controls { down: true, right: true, ..Controls::default() },
        Controls { up: true, right: true, ..Controls::default() },
        Controls { down: true, left: true, ..Controls::default() },
    ];
    for (i, controls) in combos.iter().cycle().take(8).enumerate() {
        s.controls = controls.clone();
        for _ in 0..(60 + i * 7) {
            // Keep playing even if a fresh spawn clipped the player
            s.enemies.clear();
            s.status = GameStatus::Playing;
            s = tick(&s, &mut rng);
            assert!(s.player.x >= 0 && s.player.x <= W - PLAYER_SIZE);
            assert!(s.player.y >= 0 && s.player.y <= H - PLAYER_SIZE);
        }
    }
}

#[test]
fn collision_ends_game_with_one_burst() {
    let mut s = make_state();
    s.score = 10;
    // Two enemies that will both overlap the player after falling
    s.enemies.push(Enemy { x: 440, y: 500, speed: 3 });
    s.enemies.push(Enemy { x: 460, y: 510, speed: 3 });

    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::GameOver);
    assert_eq!(s2.particles.len(), BURST_SIZE);
    // Collision tick still counts toward the score
    assert_eq!(s2.score, 11);
    // Burst animates immediately: one step taken from the player's corner
    for p in &s2.particles {
        assert_eq!(p.life, PARTICLE_LIFE - 1);
        assert!((p.x - (450.0 + p.dx)).abs() < 1e-9);
        assert!((p.y - (520.0 + p.dy)).abs() < 1e-9);
    }
}

#[test]
fn burst_uses_player_position_after_movement() {
    let mut s = holding(&make_state(), Direction::Up);
    s.enemies.push(Enemy { x: 450, y: 480, speed: 3 });
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::GameOver);
    assert_eq!(s2.player, Player { x: 450, y: 514 });
    let p = &s2.particles[0];
    assert!((p.x - p.dx - 450.0).abs() < 1e-9);
    assert!((p.y - p.dy - 514.0).abs() < 1e-9);
}

#[test]
fn tick_removes_enemies_past_margin() {
    let mut s = make_state();
    s.player = Player { x: 0, y: H - PLAYER_SIZE };
    s.enemies.push(Enemy { x: 0, y: 648, speed: 6 });
    s.enemies.push(Enemy { x: 800, y: 600, speed: 3 });
    let s2 = tick(&s, &mut seeded_rng());
    assert_eq!(s2.status, GameStatus::Playing);
    assert!(s2.enemies.iter().all(|e| e.y <= H + ENEMY_CULL_MARGIN));
    assert!(s2.enemies.contains(&Enemy { x: 800, y: 603, speed: 3 }));
}

#[test]
fn full_round_trip_idle_play_over_idle() {
    let mut rng = seeded_rng();
    let mut s = start_game(&init_state(W, H));
    s.enemies.push(Enemy { x: 450, y: 470, speed: 6 });

    let mut ticks = 0;
    while s.status == GameStatus::Playing {
        s = tick(&s, &mut rng);
        ticks += 1;
        assert!(ticks < 100, "never collided");
    }
    assert_eq!(s.status, GameStatus::GameOver);
    let final_score = s.score;

    // Nothing moves while over
    let frozen = tick(&s, &mut rng);
    assert_eq!(frozen.score, final_score);

    let s = restart(&frozen);
    assert_eq!(s.status, GameStatus::Idle);
    assert_eq!(s.score, 0);
}
