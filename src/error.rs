use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons a settings bundle cannot be turned into a playable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snake cells must be square, got {width}x{height}")]
    NonSquareCell { width: u16, height: u16 },

    #[error("cell size must be at least 1")]
    ZeroCell,

    #[error("food cell {width}x{height} does not match the snake cell size {alpha}")]
    FoodCellMismatch { width: u16, height: u16, alpha: u16 },

    #[error("map dimension {dimension} ({value}) is not a positive multiple of the cell size {alpha}")]
    MisalignedMap {
        dimension: &'static str,
        value: u16,
        alpha: u16,
    },

    #[error("snake must have at least one part")]
    NoParts,

    #[error("initial snake of {segments} segments does not fit left of the map centre")]
    SnakeTooLong { segments: u32 },

    #[error("move speed must be at least 1 ms")]
    ZeroSpeed,

    #[error("invalid color {value:?} for {field}")]
    InvalidColor { field: &'static str, value: String },
}

/// Top-level failure returned from the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
