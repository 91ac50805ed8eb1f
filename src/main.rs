mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use taxi_rush::compute::Session;
use taxi_rush::config::GameConfig;
use taxi_rush::entities::InputState;
use taxi_rush::level::Level;
use taxi_rush::scores::{self, ScoreEntry, LEADERBOARD_SIZE};
use taxi_rush::spawn::SpawnService;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

#[derive(Parser)]
#[command(name = "taxi_rush")]
#[command(about = "Top-down scrolling taxi game in the terminal")]
struct Args {
    /// JSON file overriding any subset of the stock tuning
    #[arg(long)]
    config: Option<PathBuf>,
    /// Level objects CSV; the built-in demo level is used when absent
    #[arg(long, requires = "weather")]
    level: Option<PathBuf>,
    /// Weather timeline CSV
    #[arg(long, requires = "level")]
    weather: Option<PathBuf>,
    /// Score store, one `name,score` row per finished session
    #[arg(long, default_value = "scores.csv")]
    scores: PathBuf,
    #[arg(long, default_value = "PLAYER")]
    name: String,
    /// Seed for traffic; fresh entropy when absent
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "taxi_rush.log")]
    log_file: PathBuf,
}

/// Logs go to a file: the terminal belongs to the game.
fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load(args: &Args) -> Result<(GameConfig, Level)> {
    let config = match &args.config {
        Some(path) => GameConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let level = match (&args.level, &args.weather) {
        (Some(objects), Some(weather)) => Level::from_paths(objects, weather)
            .with_context(|| format!("loading level {}", objects.display()))?,
        _ => Level::demo(),
    };
    Ok((config, level))
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn input_state(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    use KeyCode::{Char, Down, Left, Right, Up};
    InputState {
        up: any_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        down: any_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        left: any_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[Right, Char('d'), Char('D')], frame),
    }
}

// ── Start screen ──────────────────────────────────────────────────────────────

/// Returns `true` to start a session, `false` to quit.
fn start_screen<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, name: &str) -> Result<bool> {
    display::draw_start_screen(out, name)?;
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(false);
        };
        let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) = event else {
            continue;
        };
        match code {
            KeyCode::Enter | KeyCode::Char(' ') => return Ok(true),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(false),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(false),
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program, `false` → back to the start screen.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key. Each frame the keys still "fresh"
/// (within `HOLD_WINDOW` frames) become the held directions for `step`, so
/// diagonal movement works and releasing every key reads as stationary.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    spawner: &mut SpawnService<StdRng>,
    rx: &mpsc::Receiver<Event>,
    args: &Args,
) -> Result<bool> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut leaderboard: Vec<ScoreEntry> = Vec::new();
    let mut recorded = false;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(true);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if session.status().is_over() => {
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if !session.status().is_over() {
            let input = input_state(&key_frame, frame);
            session.step(&input, spawner);
        }

        // The score is written exactly once, on the frame the session ends.
        if session.status().is_over() && !recorded {
            recorded = true;
            let entry = ScoreEntry {
                name: args.name.clone(),
                score: session.total_earnings(),
            };
            if let Err(err) = scores::append_score(&args.scores, &entry) {
                warn!(%err, "could not record score");
            }
            leaderboard = scores::leaderboard(&args.scores, LEADERBOARD_SIZE).unwrap_or_else(|err| {
                warn!(%err, "could not read leaderboard");
                Vec::new()
            });
        }

        display::render(out, session, &leaderboard)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let (config, level) = match load(&args) {
        Ok(loaded) => loaded,
        Err(err) => {
            error!("{err:#}");
            return Err(err);
        }
    };

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

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
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &args, &config, &level);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        error!("{err:#}");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    args: &Args,
    config: &GameConfig,
    level: &Level,
) -> Result<()> {
    let mut seed = args.seed;
    loop {
        if !start_screen(out, rx, &args.name)? {
            break;
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut spawner = SpawnService::new(config, rng);
        let mut session = Session::new(config.clone(), level).context("starting session")?;
        info!(seed = ?seed, player = %args.name, "new session");

        let quit = game_loop(out, &mut session, &mut spawner, rx, args)?;
        if quit {
            break;
        }
        // the next session gets the next seed
        seed = seed.map(|s| s.wrapping_add(1));
    }
    Ok(())
}
