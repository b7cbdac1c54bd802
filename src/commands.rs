use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::catalog::{self, Catalog, SeasonFilter, Selection, Shortfall};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::player::{Monitor, MpvIpc, MpvPlayer, generate_socket_path};
use crate::session::Session;

/// Arguments of a one-shot random pick
#[derive(Debug, Clone, Default)]
pub struct RandomRequest {
    pub show: Option<String>,
    pub current: Option<String>,
    pub seasons: Vec<String>,
}

impl RandomRequest {
    fn filter(&self) -> SeasonFilter {
        if self.seasons.is_empty() {
            SeasonFilter::All
        } else {
            SeasonFilter::specific(self.seasons.iter().cloned())
        }
    }
}

/// Pick an episode for `request`. `Ok(None)` means there was nothing to pick,
/// or nothing other than the current episode.
pub fn choose_random(
    catalog: &Catalog,
    request: &RandomRequest,
    default_show: &str,
    max_attempts: u32,
) -> Result<Option<String>> {
    let current = request.current.as_deref().unwrap_or("");
    let show = match &request.show {
        Some(show) => show.as_str(),
        None => catalog::resolve(catalog, current, default_show),
    };

    let candidates = catalog::aggregate(catalog, show, &request.filter());
    match candidates.shortfall() {
        Some(Shortfall::ShowNotFound) => return Err(Error::UnknownShow(show.to_string())),
        Some(Shortfall::NoEpisodes) => {
            warn!(show = %show, "No episodes found for the selected criteria");
            return Ok(None);
        }
        None => {}
    }

    let selection = catalog::select_distinct(candidates.episodes(), current, max_attempts);
    if let Selection::Unchanged(id) = selection {
        info!(current = %id, "Only the current episode is available");
    }
    Ok(selection.destination().map(String::from))
}

pub async fn random(
    config: &Config,
    catalog_path: &Path,
    request: RandomRequest,
    open: bool,
) -> Result<()> {
    let catalog = Catalog::load(catalog_path).await?;

    match choose_random(
        &catalog,
        &request,
        &config.general.default_show,
        config.autoplay.max_attempts,
    )? {
        Some(url) => {
            println!("{}", url);
            if open {
                MpvPlayer::new(config.general.player.clone(), config.player.args.clone())
                    .open_detached(&url)?;
            }
        }
        None => eprintln!("{}", Shortfall::NoEpisodes.message()),
    }
    Ok(())
}

/// Human-readable catalog overview, seasons in display order
pub fn format_shows(catalog: &Catalog) -> String {
    let mut out = String::new();
    for show in catalog.show_names() {
        let seasons = catalog.seasons_sorted(show);
        out.push_str(&format!("{} ({} seasons)\n", show, seasons.len()));
        for (label, episodes) in seasons {
            out.push_str(&format!("  {} ({} episodes)\n", label, episodes));
        }
    }
    out
}

pub async fn shows(catalog_path: &Path) -> Result<()> {
    let catalog = Catalog::load(catalog_path).await?;
    if catalog.is_empty() {
        println!("No shows found in the episode data");
    } else {
        print!("{}", format_shows(&catalog));
    }
    Ok(())
}

/// Play `episode` and keep hopping to random episodes of its show, or of
/// `show` when given.
pub async fn watch(
    config: &Config,
    catalog_path: &Path,
    episode: String,
    show: Option<String>,
) -> Result<()> {
    let catalog = match Catalog::load(catalog_path).await {
        Ok(catalog) => Some(Arc::new(catalog)),
        Err(e) => {
            error!(error = %e, "Error loading episode lists");
            eprintln!("Warning: {}; playing without auto-advance", e);
            None
        }
    };

    let mut player = MpvPlayer::new(config.general.player.clone(), config.player.args.clone());

    let Some(catalog) = catalog.filter(|_| config.autoplay.enabled) else {
        player.play(&episode, None)?;
        player.wait().await?;
        return Ok(());
    };

    let mut session = Session::new(
        catalog,
        episode.clone(),
        config.general.default_show.clone(),
        &config.autoplay,
    );
    if let Some(show) = show {
        session = session.with_show(show);
    }

    let socket = generate_socket_path();
    player.play(&episode, Some(&socket))?;

    let mut monitor = Monitor::new(
        MpvIpc::new(socket),
        Duration::from_millis(config.autoplay.poll_interval_ms.max(1)),
    );

    tokio::select! {
        result = monitor.run(&mut session) => {
            if let Err(e) = result {
                player.stop().await?;
                return Err(e);
            }
            player.wait().await?;
        }
        status = player.wait() => {
            let success = status?;
            info!(success, "Player exited");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            player.stop().await?;
        }
    }

    info!(
        last = %session.current(),
        show = %session.show(),
        monitor = ?monitor.state(),
        "Watch finished"
    );
    Ok(())
}
