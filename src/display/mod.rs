/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer, the current `Viewport` and an
/// immutable view of the game state.  No game logic is performed; this module
/// only translates logical playfield coordinates into terminal cells.

mod viewport;

pub use viewport::{Viewport, MIN_COLS, MIN_ROWS};

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    terminal, QueueableCommand,
};

use crate::compute::{ENEMY_SIZE, PLAYER_SIZE};
use crate::entities::{Enemy, GameState, GameStatus, Particle};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GRID: Color = Color::Rgb { r: 40, g: 40, b: 40 };
const C_SCORE: Color = Color::White;
const C_PLAYER: Color = Color::Cyan;
const C_ENEMY: Color = Color::Red;
const C_PARTICLE: Color = Color::Rgb { r: 255, g: 200, b: 0 };
const C_TITLE: Color = Color::White;
const C_GAME_OVER: Color = Color::Red;

/// Logical spacing of the background grid lines.
pub const GRID_SPACING: i32 = 50;
/// Logical diameter of a particle disc.
const PARTICLE_SIZE: f64 = 8.0;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    if vp.is_too_small() {
        return draw_too_small(out, vp);
    }

    draw_grid(out, vp)?;
    draw_score(out, state)?;
    draw_player(out, vp, state)?;

    for enemy in &state.enemies {
        draw_enemy(out, vp, enemy)?;
    }
    for particle in state.particles.iter().filter(|p| p.alive) {
        draw_particle(out, vp, particle)?;
    }

    match state.status {
        GameStatus::Idle => draw_start(out, vp)?,
        GameStatus::GameOver => draw_game_over(out, vp, state)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, vp.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

/// Paints every cell of the screen, so no explicit clear is needed per frame.
fn draw_grid<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let line_cols = vp.grid_columns(GRID_SPACING);
    let line_rows = vp.grid_rows(GRID_SPACING);

    out.queue(style::SetForegroundColor(C_GRID))?;
    for row in 0..vp.rows {
        let horizontal = line_rows.contains(&row);
        let text: String = (0..vp.cols)
            .map(|col| match (horizontal, line_cols.contains(&col)) {
                (true, true) => '┼',
                (true, false) => '─',
                (false, true) => '│',
                (false, false) => ' ',
            })
            .collect();
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

fn draw_score<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_SCORE))?;
    out.queue(Print(format!("Score: {}", state.score)))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    let cells = vp.disc_cells(p.x as f64, p.y as f64, PLAYER_SIZE as f64);

    out.queue(style::SetForegroundColor(C_PLAYER))?;
    if cells.is_empty() {
        // Disc is smaller than a cell: mark its centre
        let half = PLAYER_SIZE as f64 / 2.0;
        if let Some((col, row)) = vp.cell_at(p.x as f64 + half, p.y as f64 + half) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("●"))?;
        }
        return Ok(());
    }
    for (col, row) in cells {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("█"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, vp: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let Some((cols, rows)) = vp.cell_span(
        enemy.x as f64,
        enemy.y as f64,
        ENEMY_SIZE as f64,
        ENEMY_SIZE as f64,
    ) else {
        return Ok(());
    };

    let block = "█".repeat(cols.len());
    out.queue(style::SetForegroundColor(C_ENEMY))?;
    for row in rows {
        out.queue(cursor::MoveTo(cols.start, row))?;
        out.queue(Print(&block))?;
    }
    Ok(())
}

fn draw_particle<W: Write>(out: &mut W, vp: &Viewport, particle: &Particle) -> std::io::Result<()> {
    let half = PARTICLE_SIZE / 2.0;
    if let Some((col, row)) = vp.cell_at(particle.x.trunc() + half, particle.y.trunc() + half) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(C_PARTICLE))?;
        out.queue(Print("•"))?;
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    vp: &Viewport,
    logical_y: i32,
    text: &str,
    color: Color,
    bold: bool,
) -> std::io::Result<()> {
    let row = vp.row(logical_y as f64).clamp(0, vp.rows as i32 - 1) as u16;
    let col = (vp.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    if bold {
        out.queue(style::SetAttribute(Attribute::Bold))?;
    }
    out.queue(Print(text))?;
    if bold {
        out.queue(style::SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

fn draw_start<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let mid = vp.field_h / 2;
    draw_centered(out, vp, mid - 30, "Arcade Dodger", C_TITLE, true)?;
    draw_centered(out, vp, mid + 20, "Press SPACE to start", C_TITLE, false)?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, vp: &Viewport, state: &GameState) -> std::io::Result<()> {
    let mid = vp.field_h / 2;
    draw_centered(out, vp, mid - 30, "Game Over", C_GAME_OVER, true)?;
    draw_centered(
        out,
        vp,
        mid + 10,
        &format!("Final Score: {}", state.score),
        C_GAME_OVER,
        false,
    )?;
    draw_centered(out, vp, mid + 40, "Press R to restart", C_GAME_OVER, false)?;
    Ok(())
}

fn draw_too_small<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(Print(format!(
        "Terminal too small ({}x{}), need at least {MIN_COLS}x{MIN_ROWS}",
        vp.cols, vp.rows
    )))?;
    out.flush()?;
    Ok(())
}
