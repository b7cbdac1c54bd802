use std::collections::BTreeSet;

use rand::Rng;

use super::Catalog;

/// Attempts used when the caller has no configured bound
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Which seasons of a show feed the candidate sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonFilter {
    All,
    /// Only these labels. An empty set selects nothing.
    Specific(BTreeSet<String>),
}

impl SeasonFilter {
    pub fn specific<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SeasonFilter::Specific(labels.into_iter().map(Into::into).collect())
    }

    fn includes(&self, label: &str) -> bool {
        match self {
            SeasonFilter::All => true,
            SeasonFilter::Specific(labels) => labels.contains(label),
        }
    }
}

/// Why a candidate sequence came back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    ShowNotFound,
    NoEpisodes,
}

impl Shortfall {
    pub fn message(&self) -> &'static str {
        match self {
            Shortfall::ShowNotFound => "No data available for the selected show",
            Shortfall::NoEpisodes => "No episodes found for the selected criteria",
        }
    }
}

/// Flattened episode identifiers for one show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates<'a> {
    episodes: Vec<&'a str>,
    shortfall: Option<Shortfall>,
}

impl<'a> Candidates<'a> {
    fn empty(shortfall: Shortfall) -> Self {
        Self {
            episodes: Vec::new(),
            shortfall: Some(shortfall),
        }
    }

    pub fn episodes(&self) -> &[&'a str] {
        &self.episodes
    }

    /// Set whenever the sequence is empty
    pub fn shortfall(&self) -> Option<Shortfall> {
        self.shortfall
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

/// Outcome of [`select_distinct`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// A candidate other than the current identifier
    Distinct(&'a str),
    /// Every draw hit the current identifier; nothing to do
    Unchanged(&'a str),
    /// No candidates at all
    NotFound,
}

impl<'a> Selection<'a> {
    /// Where to go next, if anywhere
    pub fn destination(&self) -> Option<&'a str> {
        match *self {
            Selection::Distinct(id) => Some(id),
            _ => None,
        }
    }
}

/// Name of the first show with a season listing `current`, else `default`.
pub fn resolve<'a>(catalog: &'a Catalog, current: &str, default: &'a str) -> &'a str {
    catalog
        .shows()
        .find(|(_, seasons)| {
            seasons
                .values()
                .any(|episodes| episodes.iter().any(|id| id == current))
        })
        .map(|(name, _)| name)
        .unwrap_or(default)
}

/// Concatenate the episode lists of `show` allowed by `filter`.
///
/// Filter labels missing from the show are skipped. Duplicates are kept.
pub fn aggregate<'a>(catalog: &'a Catalog, show: &str, filter: &SeasonFilter) -> Candidates<'a> {
    let Some(seasons) = catalog.show(show) else {
        return Candidates::empty(Shortfall::ShowNotFound);
    };

    let episodes: Vec<&str> = seasons
        .iter()
        .filter(|(label, _)| filter.includes(label))
        .flat_map(|(_, episodes)| episodes.iter().map(String::as_str))
        .collect();

    if episodes.is_empty() {
        return Candidates::empty(Shortfall::NoEpisodes);
    }

    Candidates {
        episodes,
        shortfall: None,
    }
}

/// Uniformly draw a candidate different from `current`, using the thread RNG.
pub fn select_distinct<'a, S: AsRef<str>>(
    candidates: &'a [S],
    current: &str,
    max_attempts: u32,
) -> Selection<'a> {
    select_distinct_with(candidates, current, max_attempts, &mut rand::rng())
}

/// Draw with replacement up to `max_attempts` times (at least once), stopping
/// at the first draw that differs from `current`.
pub fn select_distinct_with<'a, S, R>(
    candidates: &'a [S],
    current: &str,
    max_attempts: u32,
    rng: &mut R,
) -> Selection<'a>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if candidates.is_empty() {
        return Selection::NotFound;
    }

    let mut attempts = 0;
    loop {
        let drawn = candidates[rng.random_range(0..candidates.len())].as_ref();
        attempts += 1;
        if drawn != current {
            return Selection::Distinct(drawn);
        }
        if attempts >= max_attempts {
            return Selection::Unchanged(drawn);
        }
    }
}
