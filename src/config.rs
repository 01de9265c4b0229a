/// Runtime configuration, gathered from command-line flags and `DODGER_*`
/// environment variables.  Flags win over the environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};

/// Logical playfield size; the renderer scales it onto the terminal.
pub const FIELD_WIDTH: i32 = 900;
pub const FIELD_HEIGHT: i32 = 600;

pub const WINDOW_TITLE: &str = "Arcade Dodger";

/// ≈60 FPS
pub const TICK: Duration = Duration::from_millis(16);

pub const DEFAULT_MUSIC: &str = "res/bgm.wav";
pub const DEFAULT_LOG_FILE: &str = "arcade_dodger.log";

pub const USAGE: &str = "usage: arcade_dodger [--music <path>] [--mute] [--seed <n>] [--log <path>]";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub width: i32,
    pub height: i32,
    pub tick: Duration,
    pub music: PathBuf,
    pub mute: bool,
    /// Fixed RNG seed for reproducible runs; entropy when `None`.
    pub seed: Option<u64>,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            tick: TICK,
            music: PathBuf::from(DEFAULT_MUSIC),
            mute: false,
            seed: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

fn parse_seed(raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("invalid seed '{raw}'"))
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl Config {
    /// Read the real process arguments and environment.
    pub fn load() -> Result<Self> {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Build a config from an argument list (without the program name) and an
    /// environment lookup.
    pub fn from_sources<I, S, F>(args: I, env: F) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = env("DODGER_MUSIC") {
            config.music = PathBuf::from(path);
        }
        if let Some(raw) = env("DODGER_MUTE") {
            config.mute = is_truthy(&raw);
        }
        if let Some(raw) = env("DODGER_SEED") {
            config.seed = Some(parse_seed(&raw).context("DODGER_SEED")?);
        }
        if let Some(path) = env("DODGER_LOG") {
            config.log_file = PathBuf::from(path);
        }

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| anyhow!("{flag} needs a value\n{USAGE}"))
            };
            match arg.as_str() {
                "--music" => config.music = PathBuf::from(value("--music")?),
                "--mute" => config.mute = true,
                "--seed" => config.seed = Some(parse_seed(&value("--seed")?)?),
                "--log" => config.log_file = PathBuf::from(value("--log")?),
                other => bail!("unknown argument '{other}'\n{USAGE}"),
            }
        }

        Ok(config)
    }
}
