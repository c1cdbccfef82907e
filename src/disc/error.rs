//! Errors raised by the disc hierarchy

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for disc operations
pub type Result<T> = std::result::Result<T, BlurayError>;

/// Child view kinds, used to name the index in range errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Title,
    Chapter,
    Clip,
    Video,
    Audio,
    Subtitle,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "Title",
            Self::Chapter => "Chapter",
            Self::Clip => "Clip",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Subtitle => "Subtitle",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while opening or walking a disc
#[derive(Error, Debug)]
pub enum BlurayError {
    #[error("Device not open, must open it first before accessing it")]
    NotOpen,

    #[error("Device is already open, close it first to re-open")]
    AlreadyOpen,

    #[error("Failed to open device: {}", path.display())]
    Open { path: PathBuf },

    #[error("Failed to get disc info")]
    DiscInfo,

    #[error("Failed to get titles: disc has no titles")]
    NoTitles,

    #[error("Failed to get title information for title {title} from disc")]
    Load { title: u32 },

    #[error("Query failed: {0}")]
    Query(String),

    #[error("{kind} number ({num}) is out of range for the {count} available")]
    Range { kind: ViewKind, num: u32, count: u32 },

    #[error("Invalid disc fixture: {0}")]
    Fixture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report error: {0}")]
    Report(String),
}
