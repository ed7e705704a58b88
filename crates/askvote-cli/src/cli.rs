use std::path::PathBuf;

use askvote_core::models::button::ButtonRole;
use askvote_core::models::target::TargetKind;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "askvote", version, about = "Vote on forum questions and answers")]
pub struct Cli {
    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,
    #[arg(long, global = true, help = "Config file (defaults to the user config directory)")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Click the like or dislike button of a question or answer.
    Vote {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
        #[arg(value_enum)]
        direction: Direction,
        #[arg(long, default_value_t = 0, help = "Rating shown before the vote")]
        rating: i64,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Init {
        #[arg(long)]
        base_url: String,
        #[arg(long, help = "Cookie header of a logged-in session, e.g. sessionid=...")]
        session_cookie: Option<String>,
        #[arg(long)]
        csrf_token: Option<String>,
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    Show,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Question,
    Answer,
}

impl From<KindArg> for TargetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Question => TargetKind::Question,
            KindArg::Answer => TargetKind::Answer,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Direction {
    Like,
    Dislike,
}

impl From<Direction> for ButtonRole {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Like => ButtonRole::Like,
            Direction::Dislike => ButtonRole::Dislike,
        }
    }
}
