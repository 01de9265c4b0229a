/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG.

use log::info;
use rand::Rng;

use crate::entities::{Controls, Direction, Enemy, GameState, GameStatus, Particle, Player};

// ── Tuning ───────────────────────────────────────────────────────────────────

pub const PLAYER_SIZE: i32 = 40;
/// Logical units per tick on each held axis (diagonals are not normalised).
pub const PLAYER_SPEED: i32 = 6;
/// Distance of the player's spawn point above the bottom edge.
pub const PLAYER_BOTTOM_OFFSET: i32 = 80;

pub const ENEMY_SIZE: i32 = 40;
/// One spawn draw in this many succeeds.
pub const ENEMY_SPAWN_ODDS: u32 = 15;
pub const ENEMY_SPEED_MIN: i32 = 3;
pub const ENEMY_SPEED_MAX: i32 = 6;
pub const ENEMY_SPAWN_Y: i32 = -ENEMY_SIZE;
/// Enemies are culled once `y > height + ENEMY_CULL_MARGIN`.
pub const ENEMY_CULL_MARGIN: i32 = 50;

pub const BURST_SIZE: usize = 30;
pub const PARTICLE_LIFE: u32 = 40;
/// Each velocity component is drawn from `[-PARTICLE_MAX_SPEED, PARTICLE_MAX_SPEED)`.
pub const PARTICLE_MAX_SPEED: f64 = 3.0;

// ── Constructors ─────────────────────────────────────────────────────────────

fn spawn_point(width: i32, height: i32) -> Player {
    Player {
        x: width / 2,
        y: height - PLAYER_BOTTOM_OFFSET,
    }
}

/// Build the idle state shown before the first start.
pub fn init_state(width: i32, height: i32) -> GameState {
    GameState {
        player: spawn_point(width, height),
        enemies: Vec::new(),
        particles: Vec::new(),
        controls: Controls::default(),
        score: 0,
        status: GameStatus::Idle,
        frame: 0,
        width,
        height,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Idle → Playing.  Ignored in any other state.
pub fn start_game(state: &GameState) -> GameState {
    if state.status != GameStatus::Idle {
        return state.clone();
    }
    info!("game started");
    GameState {
        status: GameStatus::Playing,
        ..state.clone()
    }
}

/// Over → Idle: wipe the field and recenter the player.  Ignored unless the
/// game is over.
pub fn restart(state: &GameState) -> GameState {
    if state.status != GameStatus::GameOver {
        return state.clone();
    }
    info!("restart after final score {}", state.score);
    init_state(state.width, state.height)
}

/// Record a press or release of a direction key.
pub fn set_control(state: &GameState, direction: Direction, held: bool) -> GameState {
    let mut controls = state.controls.clone();
    controls.set(direction, held);
    GameState {
        controls,
        ..state.clone()
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle overlap.  Rectangles that only share an edge do not
/// intersect.
#[allow(clippy::too_many_arguments)]
pub fn rects_intersect(
    ax: i32,
    ay: i32,
    aw: i32,
    ah: i32,
    bx: i32,
    by: i32,
    bw: i32,
    bh: i32,
) -> bool {
    ax < bx + bw && bx < ax + aw && ay < by + bh && by < ay + ah
}

fn player_hits(player: &Player, enemy: &Enemy) -> bool {
    rects_intersect(
        player.x,
        player.y,
        PLAYER_SIZE,
        PLAYER_SIZE,
        enemy.x,
        enemy.y,
        ENEMY_SIZE,
        ENEMY_SIZE,
    )
}

// ── Per-tick steps ───────────────────────────────────────────────────────────

/// Move the player one step for every held direction, then clamp to the field.
pub fn update_player(player: &Player, controls: &Controls, width: i32, height: i32) -> Player {
    let mut x = player.x;
    let mut y = player.y;

    if controls.left {
        x -= PLAYER_SPEED;
    }
    if controls.right {
        x += PLAYER_SPEED;
    }
    if controls.up {
        y -= PLAYER_SPEED;
    }
    if controls.down {
        y += PLAYER_SPEED;
    }

    Player {
        x: x.clamp(0, (width - PLAYER_SIZE).max(0)),
        y: y.clamp(0, (height - PLAYER_SIZE).max(0)),
    }
}

/// Roll the spawn die; on success append one enemy above the top edge.
pub fn spawn_enemy(enemies: &[Enemy], width: i32, rng: &mut impl Rng) -> Vec<Enemy> {
    let mut enemies = enemies.to_vec();
    if rng.gen_range(0..ENEMY_SPAWN_ODDS) == 0 {
        let x = rng.gen_range(0..(width - ENEMY_SIZE).max(1));
        let speed = rng.gen_range(ENEMY_SPEED_MIN..=ENEMY_SPEED_MAX);
        enemies.push(Enemy {
            x,
            y: ENEMY_SPAWN_Y,
            speed,
        });
    }
    enemies
}

/// Drop every enemy by its own speed and cull those past the bottom margin.
pub fn advance_enemies(enemies: &[Enemy], height: i32) -> Vec<Enemy> {
    let mut enemies: Vec<Enemy> = enemies
        .iter()
        .map(|e| Enemy {
            y: e.y + e.speed,
            ..e.clone()
        })
        .collect();
    enemies.retain(|e| e.y <= height + ENEMY_CULL_MARGIN);
    enemies
}

/// Index of the first enemy overlapping the player, in collection order.
pub fn find_collision(player: &Player, enemies: &[Enemy]) -> Option<usize> {
    enemies.iter().position(|e| player_hits(player, e))
}

/// Append a burst of `BURST_SIZE` particles at `(x, y)`.
pub fn explode(particles: &[Particle], x: i32, y: i32, rng: &mut impl Rng) -> Vec<Particle> {
    let mut particles = particles.to_vec();
    particles.extend((0..BURST_SIZE).map(|_| Particle {
        x: x as f64,
        y: y as f64,
        dx: rng.gen_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
        dy: rng.gen_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
        life: PARTICLE_LIFE,
        alive: true,
    }));
    particles
}

/// Move every particle, age it by one tick and drop the dead ones.
pub fn advance_particles(particles: &[Particle]) -> Vec<Particle> {
    let mut particles: Vec<Particle> = particles
        .iter()
        .map(|p| {
            let life = p.life.saturating_sub(1);
            Particle {
                x: p.x + p.dx,
                y: p.y + p.dy,
                life,
                alive: life > 0,
                ..p.clone()
            }
        })
        .collect();
    particles.retain(|p| p.alive);
    particles
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Only `Playing` advances anything; `Idle` and `GameOver` are returned as-is.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    // ── 1. Player movement ───────────────────────────────────────────────────
    let player = update_player(&state.player, &state.controls, state.width, state.height);

    // ── 2. Spawn ─────────────────────────────────────────────────────────────
    let enemies = spawn_enemy(&state.enemies, state.width, rng);

    // ── 3. Fall & cull ───────────────────────────────────────────────────────
    let enemies = advance_enemies(&enemies, state.height);

    // ── 4. Collision: player ↔ enemies (one burst per game over) ─────────────
    let mut particles = state.particles.clone();
    let mut status = GameStatus::Playing;
    if find_collision(&player, &enemies).is_some() {
        particles = explode(&particles, player.x, player.y, rng);
        status = GameStatus::GameOver;
    }

    // ── 5. Particles ─────────────────────────────────────────────────────────
    let particles = advance_particles(&particles);

    // ── 6. Score (the collision tick still counts) ──────────────────────────
    let score = state.score + 1;
    if status == GameStatus::GameOver {
        info!("game over, final score {}", score);
    }

    GameState {
        player,
        enemies,
        particles,
        score,
        status,
        frame: state.frame + 1,
        ..state.clone()
    }
}
