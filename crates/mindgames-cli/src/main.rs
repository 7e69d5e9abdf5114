//! Strategic Mind Games - terminal front end.

use anyhow::Context;
use clap::Parser;
use mindgames_cli::{
    open_editor, start_orchestrator, start_search, AppConfig, Cli, Command, Formatter,
    GameRunner, InitSummary, PlayArgs,
};
use mindgames_domain::PlayerType;
use mindgames_engine::GameEngine;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (log to stderr)
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(url) = cli.ai_url {
        config.attach_to(url);
    }

    let formatter = Formatter::new(!cli.no_color && config.settings.color);

    let args = match &cli.command {
        Some(Command::Status) => None,
        Some(Command::Play(args)) => Some(args.clone()),
        None => Some(PlayArgs::default()),
    };

    // Everything that can fail runs before a backend process exists
    let mut editor = match &args {
        Some(args) if !args.ai_vs_ai => {
            let history_path = AppConfig::dir()?.join("history.txt");
            let editor = open_editor(&history_path, config.settings.history_size)?;
            Some((editor, history_path))
        }
        _ => None,
    };

    println!("Strategic Mind Games v{}", env!("CARGO_PKG_VERSION"));

    // Bring up both bridges; neither is required to play
    let search = start_search(&config);
    let mut orchestrator = start_orchestrator(&config, &formatter).await?;
    println!();
    println!(
        "{}",
        InitSummary::collect(&orchestrator, &search).render(&formatter)
    );
    println!();

    let Some(args) = args else {
        orchestrator.shutdown().await;
        return Ok(());
    };

    let runner = GameRunner::new(
        GameEngine::new(config.rules.clone()),
        orchestrator,
        search,
        config.heuristics.clone(),
        formatter,
    );
    let runner = if args.ai_vs_ai {
        runner.with_ai_move_delay(Duration::from_millis(config.settings.ai_move_delay_ms))
    } else {
        runner
    };

    let outcome = match editor.as_mut() {
        Some((editor, history_path)) => {
            let outcome = runner
                .play_interactive(&args.name, args.difficulty.into(), editor)
                .await;
            editor.save_history(history_path).ok();
            outcome
        }
        None => {
            let difficulty = PlayerType::from(args.difficulty);
            runner.play_ai_vs_ai(difficulty, difficulty).await.map(Some)
        }
    };
    runner.shutdown().await;

    outcome.map(|_| ()).context("game aborted")
}
