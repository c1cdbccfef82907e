//! bluread
//!
//! Read-only view of a Blu-ray disc's titles, chapters, clips and elementary
//! streams as reported by libbluray.

pub mod config;
pub mod disc;
pub mod native;
pub mod report;

pub use disc::{
    Bluray, BlurayError, Chapter, Clip, OpenOptions, Plain, Result, Stream, StreamCodec,
    StreamKind, Ticks, Title, ViewFactory, ViewKind,
};
pub use report::DiscReport;

/// Crate version, reported as the parser in disc reports
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
