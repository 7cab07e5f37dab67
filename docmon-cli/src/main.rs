mod engines;
mod input;
mod runtime;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use docmon_core::command::CommandSet;
use docmon_core::config::{ConfigError, DocmonConfig, ThemeName};
use docmon_core::engine::{ContainerSource, Engine, SnapshotSource, VolumeSource};
use docmon_core::model::{Container, ListEntry, Volume};
use docmon_core::reducer::SessionEvent;
use docmon_core::state::ListSession;

use engines::FakeEngine;
use runtime::EffectRunner;
use ui::Theme;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const EVENT_BUFFER: usize = 100;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Parser)]
#[command(name = "docmon")]
#[command(about = "Browse and control local Docker containers and volumes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (otherwise docmon.yml is searched for)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Refresh interval in milliseconds
    #[arg(long, global = true)]
    refresh_ms: Option<u64>,

    /// Colour theme: dark or high-contrast
    #[arg(long, global = true)]
    theme: Option<ThemeName>,

    /// Use a built-in fake engine instead of the Docker daemon
    #[arg(long, global = true)]
    demo: bool,

    /// Append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[arg(long, global = true, default_value = "info")]
    log_filter: String,
}

#[derive(Subcommand, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Commands {
    /// List containers (default)
    #[default]
    Containers,
    /// List volumes
    Volumes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_filter, cli.log_file.as_deref())?;

    let config = load_config(cli.config.as_deref())?
        .with_overrides(cli.refresh_ms, cli.theme)
        .context("invalid command-line override")?;
    let theme = Theme::named(config.theme);

    // Fail before touching the terminal when the daemon is not reachable.
    let engine = connect_engine(cli.demo).await?;
    info!(engine = engine.name(), "engine connected");

    match cli.command.unwrap_or_default() {
        Commands::Containers => {
            let session = ListSession::<Container>::new(CommandSet::lifecycle(
                config.kill_signal.clone(),
            ))
            .with_refresh_interval(config.refresh_interval());
            let source: Arc<dyn SnapshotSource<Container>> =
                Arc::new(ContainerSource::new(engine.clone(), config.include_stopped));
            run(session, source, engine, &theme).await
        }
        Commands::Volumes => {
            let session = ListSession::<Volume>::new(CommandSet::none())
                .with_refresh_interval(config.refresh_interval());
            let source: Arc<dyn SnapshotSource<Volume>> = Arc::new(VolumeSource::new(engine.clone()));
            run(session, source, engine, &theme).await
        }
    }
}

fn init_tracing(level_filter: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_new(level_filter)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to initialize tracing filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .compact();

    // The terminal belongs to the UI, so logs go to a file or nowhere.
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let _ = builder.with_writer(Mutex::new(file)).try_init();
        }
        None => {
            let _ = builder.with_writer(io::sink).try_init();
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<DocmonConfig> {
    if let Some(path) = explicit {
        return DocmonConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    match DocmonConfig::discover(&cwd) {
        Ok((path, config)) => {
            info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        Err(ConfigError::NotFound { .. }) => Ok(DocmonConfig::default()),
        Err(e) => Err(e).context("failed to load discovered config"),
    }
}

async fn connect_engine(demo: bool) -> Result<Arc<dyn Engine>> {
    if demo {
        return Ok(Arc::new(FakeEngine::demo()));
    }
    connect_docker().await
}

#[cfg(feature = "docker")]
async fn connect_docker() -> Result<Arc<dyn Engine>> {
    let engine = engines::DockerEngine::connect()
        .await
        .context("cannot reach the Docker daemon (try --demo)")?;
    Ok(Arc::new(engine))
}

#[cfg(not(feature = "docker"))]
async fn connect_docker() -> Result<Arc<dyn Engine>> {
    anyhow::bail!("built without the `docker` feature; run with --demo")
}

async fn run<E>(
    session: ListSession<E>,
    source: Arc<dyn SnapshotSource<E>>,
    engine: Arc<dyn Engine>,
    theme: &Theme,
) -> Result<()>
where
    E: ListEntry + Send + 'static,
{
    let mut terminal = setup_terminal().context("failed to set up terminal")?;
    let run_result = run_loop(&mut terminal, session, source, engine, theme).await;
    let restore_result = restore_terminal(&mut terminal);

    match (run_result, restore_result) {
        (Err(run_error), Err(restore_error)) => Err(anyhow::anyhow!(
            "{run_error:#}\nterminal restore error: {restore_error:#}"
        )),
        (Err(error), _) => Err(error),
        (Ok(()), Err(error)) => Err(error).context("failed to restore terminal"),
        (Ok(()), Ok(())) => Ok(()),
    }
}

async fn run_loop<E>(
    terminal: &mut Term,
    mut session: ListSession<E>,
    source: Arc<dyn SnapshotSource<E>>,
    engine: Arc<dyn Engine>,
    theme: &Theme,
) -> Result<()>
where
    E: ListEntry + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
    let runner = EffectRunner::new(source, engine, tx);

    let size = terminal.size()?;
    runner.run_all(session.start(size.width, size.height));

    let mut dirty = true;
    loop {
        while let Ok(event) = rx.try_recv() {
            runner.run_all(session.handle(event));
            dirty = true;
        }

        if dirty {
            terminal.draw(|f| ui::draw(f, &session, theme))?;
            dirty = false;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        match event::read()? {
            CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                if input::is_quit(&key) {
                    return Ok(());
                }
                let effects = session.handle(SessionEvent::Key(input::decode(key.code)));
                runner.run_all(effects);
                dirty = true;
            }
            CEvent::Resize(width, height) => {
                runner.run_all(session.handle(SessionEvent::Resize { width, height }));
                dirty = true;
            }
            _ => {}
        }
    }
}

// --- Terminal setup/teardown ---
fn setup_terminal() -> io::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}
