mod display;

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
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::filter::EnvFilter;

use exhaust_blaster::config::{GameConfig, FRAME_MS};
use exhaust_blaster::entities::{GameStatus, Millis};
use exhaust_blaster::game::{Game, InputEvent};

use display::Viewport;

const FRAME: Duration = Duration::from_millis(FRAME_MS);

#[derive(Parser)]
#[command(name = "exhaust-blaster")]
#[command(about = "Spray the exhaust pipes of cars driving up a perspective road")]
struct Args {
    /// Seed for a reproducible game (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal itself is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn millis_since(clock: Instant) -> Millis {
    duration_millis(clock.elapsed())
}

/// Whole milliseconds in `d`, saturating at `Millis::MAX`.
fn duration_millis(d: Duration) -> Millis {
    Millis::try_from(d.as_millis()).unwrap_or(Millis::MAX)
}

// ── Input mapping ─────────────────────────────────────────────────────────────

/// Terminal mouse → field-pixel pointer events.  Only the left button sprays.
fn pointer_input(view: &Viewport, mouse: &MouseEvent) -> Option<InputEvent> {
    let (x, y) = view.to_field(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
            Some(InputEvent::PointerMove { x, y })
        }
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerDown { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::PointerUp),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    view: &mut Viewport,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    let clock = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let now = millis_since(clock);
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    modifiers,
                    ..
                }) => match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Enter | KeyCode::Char(' ')
                        if game.status() == GameStatus::NotStarted =>
                    {
                        if let Err(err) = game.start(now) {
                            warn!("{err}");
                        }
                    }
                    KeyCode::Char('r') | KeyCode::Char('R')
                        if game.status() == GameStatus::Ended =>
                    {
                        if let Err(err) = game.restart() {
                            warn!("{err}");
                        }
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if let Some(input) = pointer_input(view, &mouse) {
                        game.handle_input(input, now);
                    }
                }
                Event::Resize(cols, rows) => match Viewport::fit(game.config(), cols, rows) {
                    Ok(fitted) => *view = fitted,
                    Err(err) => warn!("{err}; keeping the previous layout"),
                },
                _ => {}
            }
        }

        let now = millis_since(clock);
        game.advance(now, rng);
        display::render(out, game, view, now)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let config = GameConfig::default();

    // No usable surface means no game: fail before touching the terminal mode.
    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    let mut view = Viewport::fit(&config, cols, rows)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(seed = ?args.seed, cols, rows, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

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

    let mut game = Game::new(config);
    let result = game_loop(&mut out, &mut game, &mut view, &rx, &mut rng);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(score = game.score(), "bye");
    result.context("terminal I/O failed")
}
