//! Boundary with the native Blu-ray library
//!
//! Everything the views report comes from records behind these traits. The
//! `libbluray` backend maps them onto the C library; the `memory` backend
//! serves disc descriptions built in code or loaded from JSON.

#[cfg(feature = "libbluray")]
pub mod libbluray;
pub mod memory;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use memory::{ClipImage, DiscImage, IdentityImage, MemoryLibrary, TitleImage};

/// Size of the UDF volume id buffer, including the terminator
pub const VOLUME_ID_LEN: usize = 33;

/// Size of the BD-J disc id buffer, including the terminator
pub const DISC_ID_LEN: usize = 33;

/// Size of the BD-J organization id buffer, including the terminator
pub const ORG_ID_LEN: usize = 9;

/// Size of a stream language code (ISO 639-2, not terminated)
pub const LANGUAGE_LEN: usize = 4;

/// Size of a clip id (e.g. "00001")
pub const CLIP_ID_LEN: usize = 5;

/// An opened native library able to start disc sessions
pub trait DiscLibrary {
    /// Start a session rooted at `path`.
    ///
    /// Dropping the returned session closes it.
    fn open(&self, path: &Path, key_db: Option<&Path>) -> Option<Box<dyn DiscSession>>;
}

/// One open disc session
pub trait DiscSession {
    /// Raw disc identification fields, `None` if the disc cannot be identified
    fn disc_info(&self) -> Option<DiscIdentity<'_>>;

    /// Enumerate titles; later title indexes refer to this enumeration
    fn title_count(&self, flags: u8, min_title_length: u32) -> u32;

    /// Index of the main title, negative on error
    fn main_title(&self) -> i32;

    /// Load per-title metadata. Dropping the result releases it.
    fn title_info(&self, index: u32, angle: u32) -> Option<Box<dyn TitleMetadata>>;
}

/// Disc identifiers exactly as the native library stores them
#[derive(Debug, Clone, Copy)]
pub struct DiscIdentity<'a> {
    pub volume_id: &'a [u8],
    pub disc_id: &'a [u8],
    pub org_id: &'a [u8],
}

/// Per-title metadata, a single allocation covering chapters, clips and streams
pub trait TitleMetadata {
    fn playlist(&self) -> u32;

    /// Duration in 90 kHz ticks
    fn duration(&self) -> u64;

    fn angle_count(&self) -> u8;

    fn chapters(&self) -> &[ChapterRecord];

    fn clip_count(&self) -> u32;

    fn clip(&self, index: u32) -> Option<ClipRecord<'_>>;
}

/// One chapter entry, laid out like `BLURAY_TITLE_CHAPTER`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    #[serde(default)]
    pub idx: u32,
    pub start: u64,
    pub duration: u64,
    #[serde(default)]
    pub offset: u64,
    pub clip_ref: u32,
}

/// One elementary stream entry, laid out like `BLURAY_STREAM_INFO`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub coding_type: u8,
    #[serde(default)]
    pub format: u8,
    #[serde(default)]
    pub rate: u8,
    #[serde(default)]
    pub char_code: u8,
    #[serde(default)]
    pub lang: [u8; LANGUAGE_LEN],
    #[serde(default)]
    pub pid: u16,
    #[serde(default)]
    pub aspect: u8,
    #[serde(default)]
    pub subpath_id: u8,
}

impl StreamInfo {
    /// Build a stream entry with a language code, e.g. `"eng"`
    pub fn with_language(coding_type: u8, language: &str) -> Self {
        let mut lang = [0u8; LANGUAGE_LEN];
        for (slot, byte) in lang.iter_mut().zip(language.bytes()) {
            *slot = byte;
        }
        Self {
            coding_type,
            lang,
            ..Default::default()
        }
    }
}

/// A clip entry borrowed from title metadata
#[derive(Debug, Clone, Copy)]
pub struct ClipRecord<'a> {
    pub clip_id: &'a [u8],
    pub pkt_count: u32,
    pub still_mode: u8,
    pub still_time: u16,
    pub start_time: u64,
    pub in_time: u64,
    pub out_time: u64,
    pub video_streams: &'a [StreamInfo],
    pub audio_streams: &'a [StreamInfo],
    pub pg_streams: &'a [StreamInfo],
    pub ig_streams: &'a [StreamInfo],
    pub sec_video_streams: &'a [StreamInfo],
    pub sec_audio_streams: &'a [StreamInfo],
}

/// Copy at most `max` bytes out of a fixed-size field, stopping at the first NUL
///
/// The source does not have to be terminated.
pub fn bounded_string(field: &[u8], max: usize) -> String {
    let field = &field[..field.len().min(max)];
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}
