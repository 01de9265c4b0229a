/// All game entity types — pure data, no logic.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Exactly one of these holds at any time; score only advances in `Playing`.
#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    /// Waiting for the start key.
    Idle,
    Playing,
    /// Frozen until the restart key is pressed.
    GameOver,
}

// ── Player & enemy ────────────────────────────────────────────────────────────

/// The player's hit-box is a `PLAYER_SIZE` square; it is drawn as a disc.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: i32,
    pub y: i32,
    /// Rows (logical units) fallen per tick, fixed at creation.
    pub speed: i32,
}

// ── Explosion debris ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    /// Ticks left before the particle dies.
    pub life: u32,
    pub alive: bool,
}

// ── Input flags ───────────────────────────────────────────────────────────────

/// Held direction keys.  Several may be set at once (diagonal movement).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Controls {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub controls: Controls,
    pub score: u32,
    pub status: GameStatus,
    /// Number of `Playing` ticks since the last start.
    pub frame: u64,
    /// Logical playfield size (not terminal cells).
    pub width: i32,
    pub height: i32,
}
