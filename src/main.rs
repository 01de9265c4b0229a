use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyEvent, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand, QueueableCommand,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use arcade_dodger::audio::start_background_music;
use arcade_dodger::compute::{init_state, restart, set_control, start_game, tick};
use arcade_dodger::config::{Config, WINDOW_TITLE};
use arcade_dodger::display::{self, Viewport};
use arcade_dodger::entities::Direction;
use arcade_dodger::input::{map_key, Command, HeldKeys};

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log records go to a file: stderr belongs to the alternate screen while the
/// game runs.  `RUST_LOG` overrides the default `info` filter.
fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("create log file {}", config.log_file.display()))?;
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input arrives on `rx` from the reader thread and is drained at the top of
/// every frame, so key handling and the tick never overlap.  The whole frame
/// (input, update, redraw) happens on this thread.
fn game_loop<W: Write>(
    out: &mut W,
    config: &Config,
    rx: &mpsc::Receiver<Event>,
    reports_release: bool,
) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut state = init_state(config.width, config.height);
    let mut held = HeldKeys::new(reports_release);
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match map_key(code, kind, modifiers) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Start) => state = start_game(&state),
                    Some(Command::Restart) => state = restart(&state),
                    Some(Command::Press(direction)) => held.press(direction, frame),
                    Some(Command::Release(direction)) => held.release(direction),
                    None => {}
                },
                // Stale cells outside the new grid would otherwise linger
                Event::Resize(..) => {
                    out.queue(terminal::Clear(terminal::ClearType::All))?;
                }
                _ => {}
            }
        }

        for direction in Direction::ALL {
            state = set_control(&state, direction, held.is_held(direction, frame));
        }

        state = tick(&state, &mut rng);

        let (cols, rows) = terminal::size().context("query terminal size")?;
        let viewport = Viewport::new(cols, rows, state.width, state.height);
        display::render(out, &viewport, &state).context("draw frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < config.tick {
            thread::sleep(config.tick - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    // Parse before touching the terminal so usage errors print normally
    let config = Config::load()?;
    init_logging(&config)?;
    info!("starting with {:?}", config);

    // Held for the whole run; dropping it stops the track
    let _music = start_background_music(&config);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::SetTitle(WINDOW_TITLE))?;
    out.execute(cursor::Hide)?;
    out.execute(terminal::Clear(terminal::ClearType::All))?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to hold expiry.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok()
        && terminal::supports_keyboard_enhancement().unwrap_or(false);
    if !keyboard_enhanced {
        debug!("keyboard enhancement unavailable, direction keys expire after repeats stop");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                debug!("input reader stopped: {e}");
                break;
            }
        }
    });

    let result = game_loop(&mut out, &config, &rx, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("shutting down");
    result
}
