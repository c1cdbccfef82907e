//! Disc handle
//!
//! Root of the view hierarchy. Owns the native session; every title, chapter,
//! clip and stream view created from it shares the session state and checks it
//! on each access.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::error::{BlurayError, Result, ViewKind};
use super::factory::{Plain, ViewFactory};
use super::title::Title;
use crate::native::{
    bounded_string, DiscIdentity, DiscLibrary, DiscSession, DISC_ID_LEN, ORG_ID_LEN,
    VOLUME_ID_LEN,
};

/// How a disc is opened and its titles enumerated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    /// Native title filter flags (0: no filtering)
    pub title_flags: u8,
    /// Minimum title length in seconds (0: no minimum)
    pub min_title_length: u32,
    /// Pass the key database path on to the native open call
    pub forward_key_db: bool,
}

/// Identifiers read once when the disc is opened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DiscIds {
    volume_id: String,
    disc_id: String,
    org_id: String,
}

impl From<DiscIdentity<'_>> for DiscIds {
    fn from(identity: DiscIdentity<'_>) -> Self {
        Self {
            volume_id: bounded_string(identity.volume_id, VOLUME_ID_LEN),
            disc_id: bounded_string(identity.disc_id, DISC_ID_LEN),
            org_id: bounded_string(identity.org_id, ORG_ID_LEN),
        }
    }
}

pub(crate) struct OpenSession {
    pub(crate) session: Box<dyn DiscSession>,
    ids: DiscIds,
    title_count: u32,
}

/// Session state shared by the handle and all of its views
pub(crate) struct DiscState {
    open: RefCell<Option<OpenSession>>,
    /// Bumped on every successful open
    generation: Cell<u64>,
}

impl DiscState {
    fn new() -> Self {
        Self {
            open: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    fn is_open(&self) -> bool {
        self.open.borrow().is_some()
    }

    fn session(&self) -> Result<Ref<'_, OpenSession>> {
        Ref::filter_map(self.open.borrow(), Option::as_ref).map_err(|_| BlurayError::NotOpen)
    }
}

impl Drop for DiscState {
    fn drop(&mut self) {
        if self.open.get_mut().take().is_some() {
            log::info!("Closing disc session released by its last handle");
        }
    }
}

/// Ties a view to the session it was created in
#[derive(Clone)]
pub(crate) struct SessionGuard {
    state: Rc<DiscState>,
    generation: u64,
}

impl SessionGuard {
    /// Fails once the disc is closed, including after a later re-open
    pub(crate) fn check(&self) -> Result<()> {
        if self.state.is_open() && self.state.generation.get() == self.generation {
            Ok(())
        } else {
            Err(BlurayError::NotOpen)
        }
    }
}

/// An optical disc (or disc image) opened through the native library
///
/// Views created from the handle keep its session alive, so the session is
/// only released once the handle and all of its views are dropped, or when
/// [`Bluray::close`] is called. Handles and views are not `Send`.
pub struct Bluray<F = Plain> {
    path: PathBuf,
    key_db: Option<PathBuf>,
    options: OpenOptions,
    library: Box<dyn DiscLibrary>,
    state: Rc<DiscState>,
    factory: F,
}

#[cfg(feature = "libbluray")]
impl Bluray<Plain> {
    /// Create a handle backed by the system libbluray
    pub fn new(path: impl Into<PathBuf>, key_db: Option<PathBuf>) -> Self {
        Self::with_library(crate::native::libbluray::Libbluray, path, key_db)
    }
}

impl Bluray<Plain> {
    /// Create a closed handle. Nothing is read until [`Bluray::open`].
    pub fn with_library(
        library: impl DiscLibrary + 'static,
        path: impl Into<PathBuf>,
        key_db: Option<PathBuf>,
    ) -> Self {
        Self::with_options(library, path, key_db, OpenOptions::default())
    }

    /// Create a closed handle with explicit open options
    pub fn with_options(
        library: impl DiscLibrary + 'static,
        path: impl Into<PathBuf>,
        key_db: Option<PathBuf>,
        options: OpenOptions,
    ) -> Self {
        Self {
            path: path.into(),
            key_db,
            options,
            library: Box::new(library),
            state: Rc::new(DiscState::new()),
            factory: Plain,
        }
    }
}

impl<F: ViewFactory> Bluray<F> {
    /// Build child views through `factory` from now on
    pub fn with_factory<G: ViewFactory>(self, factory: G) -> Bluray<G> {
        Bluray {
            path: self.path,
            key_db: self.key_db,
            options: self.options,
            library: self.library,
            state: self.state,
            factory,
        }
    }

    /// Device, mount point or image the handle opens
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key database given at construction
    pub fn key_db(&self) -> Option<&Path> {
        self.key_db.as_deref()
    }

    /// Options used by [`Bluray::open`]
    pub fn options(&self) -> OpenOptions {
        self.options
    }

    /// Whether a session is currently open
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Open the disc session
    ///
    /// On failure the partially opened session is closed again and the handle
    /// stays closed.
    pub fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(BlurayError::AlreadyOpen);
        }

        let key_db = match (&self.key_db, self.options.forward_key_db) {
            (Some(key_db), true) => Some(key_db.as_path()),
            (Some(key_db), false) => {
                log::warn!(
                    "Key database {} is configured but not forwarded to the native library",
                    key_db.display()
                );
                None
            }
            (None, _) => None,
        };

        // Dropping `session` on any early return closes it
        let session = self.library.open(&self.path, key_db).ok_or_else(|| {
            log::warn!("Failed to open {}", self.path.display());
            BlurayError::Open {
                path: self.path.clone(),
            }
        })?;

        let ids = match session.disc_info() {
            Some(identity) => DiscIds::from(identity),
            None => {
                log::warn!("Failed to identify disc at {}", self.path.display());
                return Err(BlurayError::DiscInfo);
            }
        };

        let title_count =
            session.title_count(self.options.title_flags, self.options.min_title_length);
        if title_count == 0 {
            log::warn!("No titles found on {}", self.path.display());
            return Err(BlurayError::NoTitles);
        }

        log::info!(
            "Opened {} (volume '{}', {} titles)",
            self.path.display(),
            ids.volume_id,
            title_count
        );

        *self.state.open.borrow_mut() = Some(OpenSession {
            session,
            ids,
            title_count,
        });
        self.state.generation.set(self.state.generation.get() + 1);
        Ok(())
    }

    /// Close the session and reset everything read from it
    ///
    /// Views created while open fail with [`BlurayError::NotOpen`] afterwards.
    pub fn close(&mut self) -> Result<()> {
        let open = self.state.open.borrow_mut().take();
        match open {
            Some(open) => {
                drop(open);
                log::info!("Closed {}", self.path.display());
                Ok(())
            }
            None => Err(BlurayError::NotOpen),
        }
    }

    /// UDF volume id, at most 33 characters
    pub fn volume_id(&self) -> Result<String> {
        Ok(self.state.session()?.ids.volume_id.clone())
    }

    /// BD-J disc id, at most 33 characters
    pub fn disc_id(&self) -> Result<String> {
        Ok(self.state.session()?.ids.disc_id.clone())
    }

    /// BD-J organization id, at most 9 characters
    pub fn org_id(&self) -> Result<String> {
        Ok(self.state.session()?.ids.org_id.clone())
    }

    /// Number of titles found when the disc was opened
    pub fn number_of_titles(&self) -> Result<u32> {
        Ok(self.state.session()?.title_count)
    }

    /// Index of the title the native library considers the main feature
    pub fn main_title_number(&self) -> Result<u32> {
        let num = self.state.session()?.session.main_title();
        u32::try_from(num)
            .map_err(|_| BlurayError::Query("Unable to get main title number".to_string()))
    }

    /// Load title `num`
    ///
    /// Accepts `0..=number_of_titles`; the native library decides whether the
    /// last index has metadata and otherwise the load fails.
    pub fn title(&self, num: u32) -> Result<F::Title> {
        let open = self.state.session()?;
        if num > open.title_count {
            return Err(BlurayError::Range {
                kind: ViewKind::Title,
                num,
                count: open.title_count,
            });
        }

        let title = Title::load(self.guard(), open.session.as_ref(), num, self.factory.clone())?;
        Ok(self.factory.title(title))
    }

    fn guard(&self) -> SessionGuard {
        SessionGuard {
            state: Rc::clone(&self.state),
            generation: self.state.generation.get(),
        }
    }
}

impl<F> fmt::Debug for Bluray<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bluray")
            .field("path", &self.path)
            .field("key_db", &self.key_db)
            .field("options", &self.options)
            .field("open", &self.state.is_open())
            .finish()
    }
}
