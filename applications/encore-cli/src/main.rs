/// Encore - terminal music player
use clap::{Parser, Subcommand};
use encore_cli::{command::HELP, render, Catalog, CliConfig, Command, Session};
use encore_playback::RepeatMode;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Encore terminal music player", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ENCORE_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog JSON file (overrides the configured one)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session reading commands from stdin
    Play,
    /// Play through the catalog at accelerated speed
    Demo {
        /// Simulated seconds per real second
        #[arg(short, long, default_value_t = 30.0)]
        speed: f64,

        /// Real seconds to run for
        #[arg(short, long, default_value_t = 20)]
        duration: u64,
    },
    /// List catalog tracks
    Tracks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore_cli=info,encore_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let catalog_path = cli.catalog.as_deref().or(config.player.catalog.as_deref());
    let catalog = load_catalog(catalog_path)?;

    match cli.command {
        Commands::Play => {
            interactive(Session::new(&config, catalog), config.tick_interval()).await?;
        }
        Commands::Demo { speed, duration } => {
            anyhow::ensure!(speed.is_finite() && speed > 0.0, "speed must be positive");
            demo(
                Session::new(&config, catalog),
                config.tick_interval(),
                speed,
                Duration::from_secs(duration),
            )
            .await?;
        }
        Commands::Tracks => {
            println!("{}", render::catalog_listing(&catalog));
        }
    }

    Ok(())
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    let catalog = match path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    Ok(catalog)
}

async fn interactive(mut session: Session, tick: Duration) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    println!("{HELP}");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                session.tick(now - last_tick);
                last_tick = now;
            }
            line = lines.next_line() => {
                // EOF ends the session
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => match session.execute(command) {
                        Ok(output) if !output.is_empty() => println!("{output}"),
                        Ok(_) => {}
                        Err(err) => println!("{err}"),
                    },
                    Err(err) => println!("{err}"),
                }
            }
        }

        for message in session.drain_messages() {
            println!("{message}");
        }
    }

    tracing::info!("Session ended");
    Ok(())
}

async fn demo(
    mut session: Session,
    tick: Duration,
    speed: f64,
    duration: Duration,
) -> anyhow::Result<()> {
    session.execute(Command::Repeat(RepeatMode::Context))?;
    session.execute(Command::PlayAll(Vec::new()))?;

    tracing::info!(
        tracks = session.catalog().len(),
        speed,
        "Starting demo"
    );

    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let deadline = Instant::now() + duration;
    let mut last_tick = Instant::now();

    while Instant::now() < deadline {
        interval.tick().await;
        let now = Instant::now();
        session.tick((now - last_tick).mul_f64(speed));
        last_tick = now;

        for message in session.drain_messages() {
            println!("{message}");
        }
        println!("{}", render::status_line(&session.snapshot()));
    }

    Ok(())
}
