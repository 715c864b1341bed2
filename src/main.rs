mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use mot_magique::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    expansion::CsvExpander,
    feedback::{BellFeedback, LogFeedback},
    high_score::FileHighScoreStore,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    session::{Difficulty, SessionController},
    words::WordList,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;

/// word-guessing game: rebuild the hidden French word from a shuffled pool of letters
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Rebuild the hidden word from a shuffled pool of letters before the 60 second clock runs out. Correct answers score 10 points plus the seconds left plus a streak bonus; wrong answers, skips and timeouts cost a life."
)]
pub struct Cli {
    /// difficulty to preselect on the start screen
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// seconds per round
    #[clap(short = 's', long)]
    round_secs: Option<u32>,

    /// extra words (CSV with a `word,clue` header) added to the built-in list
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// CSV file the `e` key draws new words from
    #[clap(long)]
    expand_from: Option<PathBuf>,

    /// do not ring the terminal bell on mistakes
    #[clap(long)]
    no_sound: bool,

    /// store the resulting settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags win over the stored config.
    fn merge(&self, mut config: Config) -> Config {
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(secs) = self.round_secs {
            config.round_secs = secs;
        }
        if self.no_sound {
            config.sound = false;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging()?;

    let config_store = FileConfigStore::new();
    let config = cli.merge(config_store.load());
    if cli.save_config {
        config_store.save(&config)?;
    }

    let mut app = build_app(&cli, &config)?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn init_logging() -> io::Result<()> {
    let path = AppDirs::log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    // stdout belongs to the TUI, so logs go to a file (RUST_LOG overrides the level)
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mot_magique=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn build_app(cli: &Cli, config: &Config) -> Result<App, Box<dyn Error>> {
    let words = WordList::builtin()?.words;
    let session = SessionController::new(words, StdRng::from_entropy())
        .with_rules(config.rules())
        .with_store(FileHighScoreStore::new());
    let session = if config.sound {
        session.with_feedback(BellFeedback::stdout())
    } else {
        session.with_feedback(LogFeedback)
    };

    let mut app = App::new(session, config.difficulty);
    if let Some(path) = &cli.words {
        app.add_words_from(path)?;
    }

    Ok(match &cli.expand_from {
        Some(path) => app.with_expander(CsvExpander::new(path)),
        None => app,
    })
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(&*app, f))?;

        match runner.step() {
            GameEvent::Key(key) => app.handle_key(key),
            GameEvent::Resize | GameEvent::Tick => {}
        }

        // keys and ticks both move the clocks forward by real time
        let now = Instant::now();
        app.on_tick(now - last_tick);
        last_tick = now;

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
