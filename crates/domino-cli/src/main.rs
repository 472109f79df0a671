use anyhow::Result;
use clap::{Parser, Subcommand};
use domino_core::GameMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

/// Environment variable holding the log filter (e.g. `DOMINO_LOG=debug`).
const LOG_ENV: &str = "DOMINO_LOG";

#[derive(Parser)]
#[command(name = "domino")]
#[command(about = "Domino Scorer - keep score of team and free-for-all domino games", long_about = None)]
struct Cli {
    /// Directory holding the saved game and history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a game, resuming a compatible unfinished one
    New {
        /// teams or players
        #[arg(long, default_value = "teams")]
        mode: GameMode,
        /// Score needed to win (defaults to the configured value)
        #[arg(long)]
        target: Option<u32>,
        /// Participant name, repeated once per participant
        #[arg(long = "name")]
        names: Vec<String>,
        /// Number of players when no names are given
        #[arg(long)]
        count: Option<usize>,
        /// Discard a compatible unfinished game instead of resuming it
        #[arg(long)]
        fresh: bool,
    },
    /// Record a round score
    Add {
        participant: usize,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Remove a recorded score by its position
    Delete {
        participant: usize,
        score_index: usize,
    },
    /// Zero every participant in the current game
    Reset,
    /// Print the current standings
    Show {
        #[arg(long)]
        json: bool,
    },
    /// List completed games, most recent first
    History {
        #[arg(long)]
        json: bool,
    },
    /// Delete all completed games
    ClearHistory,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut context = commands::Context::open(cli.data_dir.as_deref())?;

    let result = match cli.command {
        Commands::New {
            mode,
            target,
            names,
            count,
            fresh,
        } => commands::game::new_game(&mut context, mode, target, names, count, fresh).await,
        Commands::Add {
            participant,
            amount,
        } => commands::score::add(&mut context, participant, &amount).await,
        Commands::Delete {
            participant,
            score_index,
        } => commands::score::delete(&mut context, participant, score_index).await,
        Commands::Reset => commands::game::reset(&mut context).await,
        Commands::Show { json } => commands::show::standings(&mut context, json).await,
        Commands::History { json } => commands::show::history(&context, json).await,
        Commands::ClearHistory => commands::show::clear_history(&context).await,
    };

    context.controller.flush().await;
    let failed = context.controller.failed_writes();
    if failed > 0 {
        tracing::warn!("{} write(s) to {} failed", failed, context.data_dir.display());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_with_names() {
        let cli = Cli::try_parse_from([
            "domino", "new", "--mode", "players", "--target", "150", "--name", "Ana", "--name",
            "Luis", "--name", "Marta",
        ])
        .unwrap();

        match cli.command {
            Commands::New {
                mode,
                target,
                names,
                ..
            } => {
                assert_eq!(mode, GameMode::Players);
                assert_eq!(target, Some(150));
                assert_eq!(names, vec!["Ana", "Luis", "Marta"]);
            }
            _ => panic!("expected new"),
        }
    }

    #[test]
    fn test_negative_amount_reaches_validation() {
        let cli = Cli::try_parse_from(["domino", "add", "0", "-5"]).unwrap();
        match cli.command {
            Commands::Add { amount, .. } => assert_eq!(amount, "-5"),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_global_data_dir() {
        let cli = Cli::try_parse_from(["domino", "show", "--data-dir", "/tmp/scores"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/scores")));
    }
}
