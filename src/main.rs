mod app;
mod catalog;
mod cli;
mod commands;
mod config;
mod error;
mod picker;
mod player;
mod session;
mod ui;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

use crate::app::App;
use crate::cli::{Cli, Command};
use crate::commands::RandomRequest;
use crate::config::Config;
use crate::error::Result;

fn setup_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "randisode.log");

    let filter = EnvFilter::from_default_env().add_directive(
        "randisode=info"
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // File-based logging; the picker owns the terminal
    if let Err(e) = setup_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    info!("Starting randisode");

    let config = Config::load()?;
    let catalog_path = match cli.catalog {
        Some(path) => config::expand_home(&path),
        None => config.catalog_path()?,
    };
    info!(catalog = %catalog_path.display(), "Loaded config");

    match cli.command.unwrap_or(Command::Pick) {
        Command::Watch { episode, show } => {
            commands::watch(&config, &catalog_path, episode, show).await
        }
        Command::Random {
            show,
            current,
            seasons,
            open,
        } => {
            let request = RandomRequest {
                show,
                current,
                seasons,
            };
            commands::random(&config, &catalog_path, request, open).await
        }
        Command::Shows => commands::shows(&catalog_path).await,
        Command::Pick => {
            let mut terminal = app::init_terminal()?;

            let mut app = App::new(&config, catalog_path);
            let result = app.run(&mut terminal).await;

            app::restore_terminal()?;
            result
        }
    }
}
