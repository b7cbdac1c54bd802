use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Failed to load catalog {}: {reason}", path.display())]
    CatalogLoad { path: PathBuf, reason: String },

    #[error("Show not in catalog: {0}")]
    UnknownShow(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Failed to launch player: {0}")]
    PlayerLaunch(String),

    #[error("Player IPC error: {0}")]
    Ipc(String),
}

pub type Result<T> = std::result::Result<T, Error>;
