use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use fastrand::Rng;
use std::fs::File;
use std::io::{BufWriter, Stdout, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod show;
mod term;

use config::Config;
use error::Result;
use show::director::ShowStyle;
use term::app::FireshowApp;

#[derive(Parser)]
#[command(name = "fireshow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive fireworks show in the terminal", long_about = None)]
#[command(after_help = "Press space, enter or click to launch. 'q', ESC, or Ctrl+C to exit.")]
struct Cli {
    /// Show style: classic or anime
    #[arg(short, long, value_parser = parse_style)]
    style: Option<ShowStyle>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Background color as hex (e.g., --bg-color 1a1a2e)
    #[arg(long, value_name = "RRGGBB")]
    bg_color: Option<String>,

    /// Seed for a reproducible show
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal is busy drawing)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_style(value: &str) -> std::result::Result<ShowStyle, String> {
    match value.to_ascii_lowercase().as_str() {
        "classic" => Ok(ShowStyle::Classic),
        "anime" => Ok(ShowStyle::Anime),
        other => Err(format!(
            "unknown style '{other}' (expected classic or anime)"
        )),
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}

fn run_show(config: &Config) -> Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(
        stdout,
        EnterAlternateScreen,
        Hide,
        Clear(ClearType::All),
        EnableMouseCapture
    )?;

    let result = event_loop(&mut stdout, config);

    execute!(stdout, Show, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    result
}

fn event_loop(stdout: &mut BufWriter<Stdout>, config: &Config) -> Result<()> {
    let rng = config.seed.map(Rng::with_seed).unwrap_or_else(Rng::new);
    let (cols, rows) = terminal::size()?;
    let mut app = FireshowApp::new(
        cols as usize,
        rows as usize,
        config.pixels_per_cell,
        config.show_plan()?,
        config.message_rgb()?,
        rng,
    );
    info!(cols, rows, style = ?config.style, "show ready");

    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    const FIXED_DT: f32 = 1.0 / 60.0;

    loop {
        if event::poll(Duration::from_millis(1))? {
            let event = event::read()?;
            match &event {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(KeyModifiers::CONTROL))
                    {
                        break;
                    }
                    app.handle_event(&event);
                }
                Event::Resize(cols, rows) => {
                    app.resize(*cols as usize, *rows as usize);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => app.handle_event(&event),
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            app.update(FIXED_DT);
            accumulator -= FIXED_DT;
        }

        app.render(stdout)?;
    }

    app.shutdown();
    info!("show closed");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(style) = cli.style {
        config.style = style;
    }
    if let Some(color) = cli.bg_color {
        config.background = color;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file;
    }
    config.validate()?;

    if let Some(path) = &config.log_file {
        init_logging(path)?;
    }

    run_show(&config)
}
