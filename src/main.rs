mod api;
mod app;
mod config;
mod constants;
mod disposition;
mod download;
mod format;
mod input;
mod matrix;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::{Duration, Instant};
use tracing::info;

use app::App;
use constants::constants;
use matrix::MatrixRain;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Base URL of the search/download server (default: config file, then http://127.0.0.1:5000)
  #[arg(short, long)]
  server: Option<String>,

  /// Directory downloads are saved into (default: config file, then the platform download folder)
  #[arg(short, long)]
  download_dir: Option<std::path::PathBuf>,

  /// Theme to start with (cycle at runtime with Ctrl+T)
  #[arg(short, long)]
  theme: Option<String>,
}

// --- Logging ---

/// Route tracing output to a file under the platform data directory — stdout
/// and stderr belong to the terminal UI. Returns the guard keeping the
/// non-blocking writer alive.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let proj_dirs = directories::ProjectDirs::from("", "", "vget")?;
  let log_dir = proj_dirs.data_local_dir().join("logs");
  std::fs::create_dir_all(&log_dir).ok()?;
  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, "vget.log"));
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = init_tracing();

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, args).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, args: Args) -> Result<()> {
  let mut app = App::new(args.server, args.download_dir, args.theme.as_deref());

  let size = terminal.size().context("failed to query terminal size")?;
  let mut rain = MatrixRain::new(size.width, size.height);

  let tick = Duration::from_millis(constants().tick_ms);
  let mut last_tick = Instant::now();

  info!(server = %app.server, download_dir = %app.download_dir.display(), "vget started");

  loop {
    app.check_pending();

    if last_tick.elapsed() >= tick {
      rain.tick();
      app.advance_spinner();
      last_tick = Instant::now();
    }

    terminal.draw(|frame| ui::ui(frame, &mut app, &rain))?;

    let timeout = tick.saturating_sub(last_tick.elapsed());
    if event::poll(timeout)? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  Ok(())
}
