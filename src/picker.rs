//! State behind the manual episode picker.

use std::collections::BTreeSet;
use std::sync::Arc;

use ratatui::widgets::ListState;
use tracing::{info, warn};

use crate::catalog::{self, Catalog, SeasonFilter, Selection, Shortfall};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    All,
    Selected,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::All => "All seasons",
            Mode::Selected => "Selected seasons",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Mode::All => Mode::Selected,
            Mode::Selected => Mode::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Shows,
    Seasons,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonEntry {
    pub label: String,
    pub episodes: usize,
    pub checked: bool,
}

pub struct Picker {
    catalog: Arc<Catalog>,
    max_attempts: u32,
    pub shows: Vec<String>,
    pub show_state: ListState,
    pub seasons: Vec<SeasonEntry>,
    pub season_state: ListState,
    pub mode: Mode,
    pub focus: Focus,
    pub status: String,
    pub loading: bool,
    // empty until something has been opened
    last_opened: String,
}

impl Picker {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            catalog: Arc::new(Catalog::default()),
            max_attempts,
            shows: Vec::new(),
            show_state: ListState::default(),
            seasons: Vec::new(),
            season_state: ListState::default(),
            mode: Mode::default(),
            focus: Focus::Shows,
            status: "Loading episode data...".to_string(),
            loading: true,
            last_opened: String::new(),
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        info!(status = %self.status, "Picker status");
    }

    pub fn load(&mut self, catalog: Arc<Catalog>) {
        self.loading = false;
        self.shows = catalog.show_names().into_iter().map(String::from).collect();
        self.catalog = catalog;

        if self.shows.is_empty() {
            self.show_state.select(None);
            self.seasons.clear();
            self.set_status("No shows found in the episode data");
            return;
        }

        self.show_state.select(Some(0));
        let count = self.shows.len();
        self.populate_seasons();
        // the show-count message wins over the seasons one on first load
        self.set_status(format!("Loaded {} shows", count));
    }

    pub fn load_failed(&mut self, reason: &str) {
        self.loading = false;
        warn!(reason = %reason, "Picker has no catalog");
        self.set_status("Failed to load episode data. Check the log for details.");
    }

    pub fn selected_show(&self) -> Option<&str> {
        self.show_state
            .selected()
            .and_then(|idx| self.shows.get(idx))
            .map(String::as_str)
    }

    fn populate_seasons(&mut self) {
        self.seasons.clear();
        self.season_state.select(None);

        let Some(show) = self.selected_show().map(String::from) else {
            return;
        };

        if !self.catalog.contains_show(&show) {
            self.set_status(format!("No data found for {}", show));
            return;
        }

        self.seasons = self
            .catalog
            .seasons_sorted(&show)
            .into_iter()
            .map(|(label, episodes)| SeasonEntry {
                label: label.to_string(),
                episodes,
                checked: true,
            })
            .collect();

        if !self.seasons.is_empty() {
            self.season_state.select(Some(0));
        }
        self.set_status(format!("{}: {} seasons available", show, self.seasons.len()));
    }

    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Shows => {
                if step(&mut self.show_state, self.shows.len(), 1) {
                    self.populate_seasons();
                }
            }
            Focus::Seasons => {
                step(&mut self.season_state, self.seasons.len(), 1);
            }
        }
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Shows => {
                if step(&mut self.show_state, self.shows.len(), -1) {
                    self.populate_seasons();
                }
            }
            Focus::Seasons => {
                step(&mut self.season_state, self.seasons.len(), -1);
            }
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.next();
        if self.mode == Mode::All {
            self.focus = Focus::Shows;
        }
    }

    /// Season list only takes focus in Selected mode
    pub fn toggle_focus(&mut self) {
        self.focus = match (self.focus, self.mode) {
            (Focus::Shows, Mode::Selected) => Focus::Seasons,
            _ => Focus::Shows,
        };
    }

    pub fn toggle_season(&mut self) {
        if self.focus != Focus::Seasons {
            return;
        }
        if let Some(entry) = self
            .season_state
            .selected()
            .and_then(|idx| self.seasons.get_mut(idx))
        {
            entry.checked = !entry.checked;
        }
    }

    pub fn set_all_seasons(&mut self, checked: bool) {
        for entry in &mut self.seasons {
            entry.checked = checked;
        }
    }

    pub fn season_filter(&self) -> SeasonFilter {
        match self.mode {
            Mode::All => SeasonFilter::All,
            Mode::Selected => SeasonFilter::Specific(
                self.seasons
                    .iter()
                    .filter(|entry| entry.checked)
                    .map(|entry| entry.label.clone())
                    .collect::<BTreeSet<_>>(),
            ),
        }
    }

    /// Choose an episode for the current show and filter. Returns the
    /// identifier to open, or `None` with the reason left in the status line.
    pub fn pick(&mut self) -> Option<String> {
        let Some(show) = self.selected_show().map(String::from) else {
            self.set_status("No data available for the selected show");
            return None;
        };

        let data = Arc::clone(&self.catalog);
        let candidates = catalog::aggregate(&data, &show, &self.season_filter());
        if let Some(shortfall) = candidates.shortfall() {
            self.set_status(shortfall.message());
            return None;
        }

        let picked = match catalog::select_distinct(
            candidates.episodes(),
            &self.last_opened,
            self.max_attempts,
        ) {
            // Each pick opens a new player, so repeating the last one is allowed
            Selection::Distinct(id) | Selection::Unchanged(id) => id.to_string(),
            Selection::NotFound => {
                self.set_status(Shortfall::NoEpisodes.message());
                return None;
            }
        };

        self.set_status(format!(
            "Opening random episode ({} episodes available)...",
            candidates.len()
        ));
        self.last_opened = picked.clone();
        Some(picked)
    }
}

/// Move a list selection by `delta` with wrap-around. Returns whether it moved.
fn step(state: &mut ListState, len: usize, delta: isize) -> bool {
    if len == 0 {
        return false;
    }
    let current = state.selected().unwrap_or(0);
    let next = (current as isize + delta).rem_euclid(len as isize) as usize;
    state.select(Some(next));
    next != current
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Family Guy": {
            "Season 10": ["fg/10/1"],
            "Season 2": ["fg/2/1", "fg/2/2"],
            "Season 1": ["fg/1/1"]
        },
        "American Dad": {
            "Season 1": ["ad/1/1", "ad/1/2"]
        },
        "Empty Show": {}
    }"#;

    fn loaded() -> Picker {
        let mut picker = Picker::new(10);
        picker.load(Arc::new(Catalog::from_json(SAMPLE).unwrap()));
        picker
    }

    #[test]
    fn test_load_selects_first_show_alphabetically() {
        let picker = loaded();
        assert!(!picker.loading);
        assert_eq!(picker.shows, vec!["American Dad", "Empty Show", "Family Guy"]);
        assert_eq!(picker.selected_show(), Some("American Dad"));
        assert_eq!(picker.status, "Loaded 3 shows");
        assert_eq!(picker.seasons.len(), 1);
    }

    #[test]
    fn test_empty_catalog_status() {
        let mut picker = Picker::new(10);
        picker.load(Arc::new(Catalog::default()));
        assert_eq!(picker.status, "No shows found in the episode data");
        assert_eq!(picker.pick(), None);
    }

    #[test]
    fn test_load_failure_leaves_picker_inert() {
        let mut picker = Picker::new(10);
        picker.load_failed("missing file");
        assert!(!picker.loading);
        assert!(picker.status.starts_with("Failed to load episode data"));
        assert_eq!(picker.pick(), None);
        assert_eq!(picker.status, "No data available for the selected show");
    }

    #[test]
    fn test_changing_show_repopulates_seasons_in_order() {
        let mut picker = loaded();
        picker.move_up();
        assert_eq!(picker.selected_show(), Some("Family Guy"));
        assert_eq!(picker.status, "Family Guy: 3 seasons available");

        let labels: Vec<_> = picker.seasons.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Season 1", "Season 2", "Season 10"]);
        assert!(picker.seasons.iter().all(|s| s.checked));
        assert_eq!(picker.seasons[1].episodes, 2);
    }

    #[test]
    fn test_pick_all_seasons() {
        let mut picker = loaded();
        let picked = picker.pick().unwrap();
        assert!(picked.starts_with("ad/1/"));
        assert_eq!(picker.status, "Opening random episode (2 episodes available)...");
    }

    #[test]
    fn test_pick_avoids_last_opened() {
        let mut picker = Picker::new(64);
        picker.load(Arc::new(Catalog::from_json(SAMPLE).unwrap()));

        let mut previous = picker.pick().unwrap();
        for _ in 0..20 {
            let next = picker.pick().unwrap();
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn test_pick_selected_seasons_only() {
        let mut picker = loaded();
        picker.move_up();
        picker.toggle_mode();
        picker.toggle_focus();
        assert_eq!(picker.focus, Focus::Seasons);

        picker.set_all_seasons(false);
        picker.move_down();
        picker.toggle_season();
        assert_eq!(
            picker.season_filter(),
            SeasonFilter::specific(["Season 2"])
        );

        for _ in 0..10 {
            assert!(picker.pick().unwrap().starts_with("fg/2/"));
        }
    }

    #[test]
    fn test_pick_reopens_only_episode() {
        let mut picker = loaded();
        picker.move_up();
        picker.toggle_mode();
        picker.toggle_focus();
        picker.set_all_seasons(false);
        picker.toggle_season();
        assert_eq!(picker.season_filter(), SeasonFilter::specific(["Season 1"]));

        assert_eq!(picker.pick().as_deref(), Some("fg/1/1"));
        assert_eq!(picker.pick().as_deref(), Some("fg/1/1"));
        assert_eq!(picker.status, "Opening random episode (1 episodes available)...");
    }

    #[test]
    fn test_pick_with_nothing_checked() {
        let mut picker = loaded();
        picker.toggle_mode();
        picker.set_all_seasons(false);
        assert_eq!(picker.pick(), None);
        assert_eq!(picker.status, "No episodes found for the selected criteria");
    }

    #[test]
    fn test_show_without_seasons() {
        let mut picker = loaded();
        picker.move_down();
        assert_eq!(picker.selected_show(), Some("Empty Show"));
        assert!(picker.seasons.is_empty());
        assert_eq!(picker.pick(), None);
        assert_eq!(picker.status, "No episodes found for the selected criteria");
    }

    #[test]
    fn test_season_focus_requires_selected_mode() {
        let mut picker = loaded();
        picker.toggle_focus();
        assert_eq!(picker.focus, Focus::Shows);

        picker.toggle_mode();
        picker.toggle_focus();
        assert_eq!(picker.focus, Focus::Seasons);

        picker.toggle_mode();
        assert_eq!(picker.focus, Focus::Shows);
    }
}
