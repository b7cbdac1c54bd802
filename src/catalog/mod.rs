pub mod season;
pub mod select;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub use select::{SeasonFilter, Selection, Shortfall, aggregate, resolve, select_distinct};

use crate::error::{Error, Result};

/// Season label -> ordered episode identifiers
pub type SeasonMap = HashMap<String, Vec<String>>;

/// Every known show, keyed by name. Read-only once loaded.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    shows: HashMap<String, SeasonMap>,
}

impl Catalog {
    /// Read and parse the catalog document at `path`.
    ///
    /// Missing files and documents that are not a
    /// `{ show: { season: [id, ...] } }` object both surface as
    /// [`Error::CatalogLoad`].
    pub async fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading catalog");

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::CatalogLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let catalog = Self::from_json(&content).map_err(|e| Error::CatalogLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!(
            shows = catalog.len(),
            episodes = catalog.episode_count(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    #[cfg(test)]
    pub fn from_shows(shows: HashMap<String, SeasonMap>) -> Self {
        Self { shows }
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }

    pub fn contains_show(&self, name: &str) -> bool {
        self.shows.contains_key(name)
    }

    pub fn show(&self, name: &str) -> Option<&SeasonMap> {
        self.shows.get(name)
    }

    pub fn shows(&self) -> impl Iterator<Item = (&str, &SeasonMap)> {
        self.shows.iter().map(|(name, seasons)| (name.as_str(), seasons))
    }

    /// Show names in alphabetical order, for display
    pub fn show_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shows.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Season labels of `show` in display order, with their episode counts
    pub fn seasons_sorted(&self, show: &str) -> Vec<(&str, usize)> {
        let Some(seasons) = self.shows.get(show) else {
            return Vec::new();
        };

        let mut labels: Vec<&str> = seasons.keys().map(String::as_str).collect();
        season::sort_labels(&mut labels);
        labels
            .into_iter()
            .map(|label| (label, seasons[label].len()))
            .collect()
    }

    pub fn episode_count(&self) -> usize {
        self.shows
            .values()
            .flat_map(|seasons| seasons.values())
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"{
        "Family Guy": {
            "Season 10": ["fg/10/1", "fg/10/2"],
            "Season 2": ["fg/2/1"],
            "Season 1": ["fg/1/1", "fg/1/2", "fg/1/3"]
        },
        "American Dad": {
            "Season 1": []
        }
    }"#;

    #[test]
    fn test_parse_nested_document() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.episode_count(), 6);
        assert!(catalog.contains_show("American Dad"));
        assert_eq!(catalog.show("Family Guy").unwrap().len(), 3);
    }

    #[test]
    fn test_show_names_sorted() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.show_names(), vec!["American Dad", "Family Guy"]);
    }

    #[test]
    fn test_seasons_sorted_numerically_with_counts() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(
            catalog.seasons_sorted("Family Guy"),
            vec![("Season 1", 3), ("Season 2", 1), ("Season 10", 2)]
        );
        assert!(catalog.seasons_sorted("Futurama").is_empty());
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(Catalog::from_json(r#"["not", "a", "map"]"#).is_err());
        assert!(Catalog::from_json(r#"{"Show": {"S1": "u1"}}"#).is_err());
        assert!(Catalog::from_json(r#"{"Show": {"S1": [1, 2]}}"#).is_err());
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).await.unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_catalog_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episodeLists.json");

        let err = Catalog::load(&path).await.unwrap_err();
        match err {
            Error::CatalogLoad { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_catalog_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"Show\": {\"S1\": [\"u1\"").unwrap();

        let err = Catalog::load(file.path()).await.unwrap_err();
        assert!(matches!(err, Error::CatalogLoad { .. }));
    }
}
