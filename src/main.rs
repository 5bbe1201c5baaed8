use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use ratatui::crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use ratatui::crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fin_elite_sim::career::CareerEngine;
use fin_elite_sim::config::EngineConfig;
use fin_elite_sim::input::{ClickState, InputEvent};
use fin_elite_sim::time::FrameClock;
use fin_elite_sim::ui::{render, App, TICKS_PER_SEC};

/// Climb the finance career ladder, one month at a time.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seed for the random generator; defaults to the current time.
    #[arg(long)]
    seed: Option<u64>,

    /// Balance overrides in TOML.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write diagnostics here. Nothing is logged without it, since the
    /// terminal belongs to the UI.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the final state as JSON after quitting.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    info!(seed, "starting");

    let mut app = App::new(CareerEngine::seeded(config, seed));

    let mut terminal = ratatui::init();
    if let Err(e) = execute!(std::io::stdout(), EnableMouseCapture) {
        warn!(error = %e, "mouse capture unavailable");
    }
    let result = run(&mut terminal, &mut app);
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result?;

    if args.summary {
        let json = match app.engine().ending() {
            Some(ending) => serde_json::to_string_pretty(ending)?,
            None => serde_json::to_string_pretty(app.snapshot())?,
        };
        println!("{}", json);
    }
    Ok(())
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> std::io::Result<()> {
    let mut clicks = ClickState::new();
    let mut clock = FrameClock::new(TICKS_PER_SEC);
    clock.update(Instant::now());

    while !app.should_quit() {
        terminal.draw(|f| render::draw(f, app, &mut clicks))?;

        if event::poll(clock.until_next_tick())? {
            let input = match event::read()? {
                Event::Key(key) => InputEvent::from_key(key),
                Event::Mouse(mouse) => InputEvent::from_mouse(mouse, &clicks),
                _ => None,
            };
            if let Some(input) = input {
                app.handle_input(&input);
            }
        }

        let ticks = clock.update(Instant::now());
        if ticks > 0 {
            app.tick(ticks);
        }
    }
    Ok(())
}
