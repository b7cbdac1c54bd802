use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "randisode",
    version,
    about = "Jump to a random episode of the show you are watching"
)]
pub struct Cli {
    /// Episode catalog to use instead of the configured one.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play an episode and switch to a random one just before it ends.
    Watch {
        /// Episode URL or path to start with.
        episode: String,

        /// Stay within this show instead of the one the episode belongs to.
        #[arg(long)]
        show: Option<String>,
    },

    /// Interactive picker (default).
    Pick,

    /// Print one random episode.
    Random {
        /// Show to pick from.
        #[arg(long, conflicts_with = "current")]
        show: Option<String>,

        /// Episode being watched; picks from its show and never returns it
        /// while an alternative exists.
        #[arg(long)]
        current: Option<String>,

        /// Restrict to these seasons (repeatable).
        #[arg(long = "season")]
        seasons: Vec<String>,

        /// Open the result in a new player instead of only printing it.
        #[arg(long)]
        open: bool,
    },

    /// List shows, their seasons and episode counts.
    Shows,
}
