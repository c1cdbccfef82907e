//! In-memory disc library
//!
//! Serves disc descriptions instead of real media. Descriptions can be built in
//! code or loaded from JSON fixtures. The library keeps counters of live
//! sessions and title allocations so callers can check that everything opened
//! was released again.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{
    ChapterRecord, ClipRecord, DiscIdentity, DiscLibrary, DiscSession, StreamInfo, TitleMetadata,
};
use crate::disc::{BlurayError, Result, TICKS_PER_SECOND};

/// Description of a whole disc
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscImage {
    /// Identification; `None` makes identification fail after open
    #[serde(default)]
    pub identity: Option<IdentityImage>,
    /// Value reported by the main title query (negative means failure)
    #[serde(default)]
    pub main_title: i32,
    #[serde(default)]
    pub titles: Vec<TitleImage>,
}

/// Raw identification fields, stored unbounded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityImage {
    #[serde(default)]
    pub volume_id: String,
    #[serde(default)]
    pub disc_id: String,
    #[serde(default)]
    pub org_id: String,
}

/// Description of one title (playlist)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleImage {
    #[serde(default)]
    pub playlist: u32,
    /// Duration in 90 kHz ticks
    #[serde(default)]
    pub duration: u64,
    #[serde(default = "default_angle_count")]
    pub angle_count: u8,
    #[serde(default)]
    pub chapters: Vec<ChapterRecord>,
    #[serde(default)]
    pub clips: Vec<ClipImage>,
}

fn default_angle_count() -> u8 {
    1
}

impl Default for TitleImage {
    fn default() -> Self {
        Self {
            playlist: 0,
            duration: 0,
            angle_count: default_angle_count(),
            chapters: Vec::new(),
            clips: Vec::new(),
        }
    }
}

/// Description of one clip referenced by a title
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipImage {
    #[serde(default)]
    pub clip_id: String,
    #[serde(default)]
    pub pkt_count: u32,
    #[serde(default)]
    pub still_mode: u8,
    #[serde(default)]
    pub still_time: u16,
    #[serde(default)]
    pub start_time: u64,
    #[serde(default)]
    pub in_time: u64,
    #[serde(default)]
    pub out_time: u64,
    #[serde(default)]
    pub video_streams: Vec<StreamInfo>,
    #[serde(default)]
    pub audio_streams: Vec<StreamInfo>,
    #[serde(default)]
    pub pg_streams: Vec<StreamInfo>,
    #[serde(default)]
    pub ig_streams: Vec<StreamInfo>,
    #[serde(default)]
    pub sec_video_streams: Vec<StreamInfo>,
    #[serde(default)]
    pub sec_audio_streams: Vec<StreamInfo>,
}

impl ClipImage {
    fn record(&self) -> ClipRecord<'_> {
        ClipRecord {
            clip_id: self.clip_id.as_bytes(),
            pkt_count: self.pkt_count,
            still_mode: self.still_mode,
            still_time: self.still_time,
            start_time: self.start_time,
            in_time: self.in_time,
            out_time: self.out_time,
            video_streams: &self.video_streams,
            audio_streams: &self.audio_streams,
            pg_streams: &self.pg_streams,
            ig_streams: &self.ig_streams,
            sec_video_streams: &self.sec_video_streams,
            sec_audio_streams: &self.sec_audio_streams,
        }
    }
}

impl DiscImage {
    /// Create an identified disc with no titles
    pub fn new(volume_id: &str, disc_id: &str, org_id: &str) -> Self {
        Self {
            identity: Some(IdentityImage {
                volume_id: volume_id.to_string(),
                disc_id: disc_id.to_string(),
                org_id: org_id.to_string(),
            }),
            main_title: 0,
            titles: Vec::new(),
        }
    }

    /// Append a title
    pub fn with_title(mut self, title: TitleImage) -> Self {
        self.titles.push(title);
        self
    }

    /// Parse a disc description from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BlurayError::Fixture(e.to_string()))
    }
}

#[derive(Debug, Default)]
struct Counters {
    opens: Cell<usize>,
    sessions: Cell<usize>,
    titles: Cell<usize>,
    last_key_db: RefCell<Option<PathBuf>>,
}

impl Counters {
    fn inc(cell: &Cell<usize>) {
        cell.set(cell.get() + 1);
    }

    fn dec(cell: &Cell<usize>) {
        cell.set(cell.get().saturating_sub(1));
    }
}

/// Disc library backed by in-memory descriptions
///
/// Clones share their discs' counters, so a clone handed to a disc handle can
/// still be inspected from the outside.
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    discs: HashMap<PathBuf, Rc<DiscImage>>,
    counters: Rc<Counters>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a disc under `path`
    pub fn with_disc(mut self, path: impl Into<PathBuf>, image: DiscImage) -> Self {
        self.insert(path, image);
        self
    }

    /// Register a disc under `path`, replacing any previous one
    pub fn insert(&mut self, path: impl Into<PathBuf>, image: DiscImage) {
        self.discs.insert(path.into(), Rc::new(image));
    }

    /// Load a JSON disc description and register it under the fixture's own path
    pub fn load_fixture(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let image = DiscImage::from_json(&content)?;
        log::debug!("Loaded disc fixture {} ({} titles)", path.display(), image.titles.len());
        Ok(Self::new().with_disc(path, image))
    }

    /// Number of successful opens so far
    pub fn open_count(&self) -> usize {
        self.counters.opens.get()
    }

    /// Number of sessions not yet closed
    pub fn live_sessions(&self) -> usize {
        self.counters.sessions.get()
    }

    /// Number of title metadata blocks not yet released
    pub fn live_titles(&self) -> usize {
        self.counters.titles.get()
    }

    /// Key database path passed to the most recent open attempt
    pub fn last_key_db(&self) -> Option<PathBuf> {
        self.counters.last_key_db.borrow().clone()
    }
}

impl DiscLibrary for MemoryLibrary {
    fn open(&self, path: &Path, key_db: Option<&Path>) -> Option<Box<dyn DiscSession>> {
        *self.counters.last_key_db.borrow_mut() = key_db.map(Path::to_path_buf);

        let image = self.discs.get(path)?;
        Counters::inc(&self.counters.opens);
        Counters::inc(&self.counters.sessions);

        Some(Box::new(MemorySession {
            image: Rc::clone(image),
            visible: RefCell::new(Vec::new()),
            counters: Rc::clone(&self.counters),
        }))
    }
}

struct MemorySession {
    image: Rc<DiscImage>,
    /// Positions in `image.titles` of the last enumeration
    visible: RefCell<Vec<usize>>,
    counters: Rc<Counters>,
}

impl DiscSession for MemorySession {
    fn disc_info(&self) -> Option<DiscIdentity<'_>> {
        self.image.identity.as_ref().map(|id| DiscIdentity {
            volume_id: id.volume_id.as_bytes(),
            disc_id: id.disc_id.as_bytes(),
            org_id: id.org_id.as_bytes(),
        })
    }

    fn title_count(&self, flags: u8, min_title_length: u32) -> u32 {
        if flags != 0 {
            log::debug!("Title filter flags 0x{:02x} ignored by in-memory library", flags);
        }

        let min_ticks = u64::from(min_title_length) * TICKS_PER_SECOND;
        let visible: Vec<usize> = self
            .image
            .titles
            .iter()
            .enumerate()
            .filter(|(_, title)| title.duration >= min_ticks)
            .map(|(pos, _)| pos)
            .collect();

        let count = visible.len() as u32;
        *self.visible.borrow_mut() = visible;
        count
    }

    fn main_title(&self) -> i32 {
        self.image.main_title
    }

    fn title_info(&self, index: u32, angle: u32) -> Option<Box<dyn TitleMetadata>> {
        let pos = *self.visible.borrow().get(index as usize)?;
        let title = self.image.titles.get(pos)?;
        if angle >= u32::from(title.angle_count.max(1)) {
            return None;
        }

        Counters::inc(&self.counters.titles);
        Some(Box::new(MemoryTitle {
            title: title.clone(),
            counters: Rc::clone(&self.counters),
        }))
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        Counters::dec(&self.counters.sessions);
    }
}

struct MemoryTitle {
    title: TitleImage,
    counters: Rc<Counters>,
}

impl TitleMetadata for MemoryTitle {
    fn playlist(&self) -> u32 {
        self.title.playlist
    }

    fn duration(&self) -> u64 {
        self.title.duration
    }

    fn angle_count(&self) -> u8 {
        self.title.angle_count
    }

    fn chapters(&self) -> &[ChapterRecord] {
        &self.title.chapters
    }

    fn clip_count(&self) -> u32 {
        self.title.clips.len() as u32
    }

    fn clip(&self, index: u32) -> Option<ClipRecord<'_>> {
        self.title.clips.get(index as usize).map(ClipImage::record)
    }
}

impl Drop for MemoryTitle {
    fn drop(&mut self) {
        Counters::dec(&self.counters.titles);
    }
}
