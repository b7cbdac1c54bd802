//! Per-playback state for the automatic trigger.
//!
//! A [`Session`] holds the catalog, the episode currently playing, the show
//! it resolved to and the one-shot latch. The monitor feeds it progress
//! samples and asks it where to go once the episode is nearly over.

use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::{self, Catalog, SeasonFilter, Selection};
use crate::config::AutoplayConfig;

/// Latest known playback position, in seconds
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Progress {
    pub position: Option<f64>,
    pub duration: Option<f64>,
}

impl Progress {
    pub fn remaining(&self) -> Option<f64> {
        Some(self.duration? - self.position?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Keep watching
    Idle,
    /// Threshold reached; replace playback with this identifier
    Advance(String),
    /// Threshold reached but nothing else to play
    Stay,
}

#[derive(Debug)]
pub struct Session {
    catalog: Arc<Catalog>,
    default_show: String,
    current: String,
    show: String,
    pinned: bool,
    threshold_secs: f64,
    max_attempts: u32,
    triggered: bool,
    progress: Progress,
}

impl Session {
    pub fn new(
        catalog: Arc<Catalog>,
        current: impl Into<String>,
        default_show: impl Into<String>,
        autoplay: &AutoplayConfig,
    ) -> Self {
        let current = current.into();
        let default_show = default_show.into();
        let show = catalog::resolve(&catalog, &current, &default_show).to_string();
        info!(show = %show, current = %current, "Session started");

        Self {
            catalog,
            default_show,
            current,
            show,
            pinned: false,
            threshold_secs: autoplay.threshold_secs,
            max_attempts: autoplay.max_attempts,
            triggered: false,
            progress: Progress::default(),
        }
    }

    /// Pick from `show` for the whole run instead of resolving it from the
    /// playing episode.
    pub fn with_show(mut self, show: impl Into<String>) -> Self {
        self.show = show.into();
        self.pinned = true;
        info!(show = %self.show, "Session show pinned");
        self
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn show(&self) -> &str {
        &self.show
    }

    #[cfg(test)]
    pub fn has_triggered(&self) -> bool {
        self.triggered
    }

    #[cfg(test)]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn update_position(&mut self, position: Option<f64>) -> Decision {
        self.progress.position = position;
        self.evaluate()
    }

    pub fn update_duration(&mut self, duration: Option<f64>) -> Decision {
        self.progress.duration = duration;
        self.evaluate()
    }

    /// Forget position and duration, e.g. while the player loads a new file
    pub fn reset_progress(&mut self) {
        self.progress = Progress::default();
    }

    /// Check the latch and threshold against the latest progress.
    pub fn evaluate(&mut self) -> Decision {
        if self.triggered {
            return Decision::Idle;
        }

        let Some(remaining) = self.progress.remaining() else {
            return Decision::Idle;
        };
        if remaining <= 0.0 || remaining > self.threshold_secs {
            return Decision::Idle;
        }

        self.triggered = true;
        debug!(remaining, "Threshold reached");

        match self.pick_next() {
            Some(next) => {
                info!(next = %next, show = %self.show, "Random episode selected");
                Decision::Advance(next)
            }
            None => {
                info!(show = %self.show, "No other episode to switch to");
                Decision::Stay
            }
        }
    }

    fn pick_next(&self) -> Option<String> {
        let candidates = catalog::aggregate(&self.catalog, &self.show, &SeasonFilter::All);
        if let Some(shortfall) = candidates.shortfall() {
            debug!(show = %self.show, ?shortfall, "No candidates");
        }

        match catalog::select_distinct(candidates.episodes(), &self.current, self.max_attempts) {
            Selection::Distinct(id) => Some(id.to_string()),
            Selection::Unchanged(_) | Selection::NotFound => None,
        }
    }

    /// Begin a new playback session on `next`, re-opening the latch.
    pub fn advance_to(&mut self, next: impl Into<String>) {
        self.current = next.into();
        if !self.pinned {
            self.show =
                catalog::resolve(&self.catalog, &self.current, &self.default_show).to_string();
        }
        self.triggered = false;
        self.progress = Progress::default();
        info!(show = %self.show, current = %self.current, "Session advanced");
    }
}
