//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand, ValueEnum};
use mindgames_domain::PlayerType;
use std::path::PathBuf;

/// Strategic Mind Games - a two-player trust economy in the terminal.
#[derive(Debug, Parser)]
#[command(name = "mindgames")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (default: ~/.mindgames/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `mindgames_decision=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Decision server URL; attaches to a running server instead of launching one
    #[arg(long, global = true, env = "MINDGAMES_AI_URL")]
    pub ai_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play a game (the default)
    Play(PlayArgs),

    /// Start both AI bridges, print their status and exit
    Status,
}

/// Arguments for the play command.
#[derive(Debug, Clone, Parser)]
pub struct PlayArgs {
    /// Let two AI players play each other
    #[arg(long)]
    pub ai_vs_ai: bool,

    /// AI difficulty
    #[arg(short, long, value_enum, default_value = "medium")]
    pub difficulty: Difficulty,

    /// Your display name
    #[arg(short, long, default_value = "Player")]
    pub name: String,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            ai_vs_ai: false,
            difficulty: Difficulty::Medium,
            name: "Player".to_string(),
        }
    }
}

/// AI difficulty options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    /// Cautious, predictable opponent
    Easy,
    /// Balanced opponent (default)
    Medium,
    /// Aggressive opponent
    Hard,
    /// Bluffs relentlessly
    Ruthless,
}

impl From<Difficulty> for PlayerType {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => PlayerType::AiEasy,
            Difficulty::Medium => PlayerType::AiMedium,
            Difficulty::Hard => PlayerType::AiHard,
            Difficulty::Ruthless => PlayerType::AiRuthless,
        }
    }
}
