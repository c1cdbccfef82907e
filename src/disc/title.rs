//! Title view

use std::fmt;
use std::rc::Rc;

use super::bluray::SessionGuard;
use super::chapter::Chapter;
use super::clip::Clip;
use super::error::{BlurayError, Result, ViewKind};
use super::factory::{Plain, ViewFactory};
use super::ticks::Ticks;
use crate::native::{DiscSession, TitleMetadata};

/// Only the first angle of multi-angle titles is loaded
const DEFAULT_ANGLE: u32 = 0;

/// Loaded title metadata, shared with every chapter, clip and stream view of the title
pub(crate) struct TitleData {
    pub(crate) guard: SessionGuard,
    pub(crate) num: u32,
    pub(crate) info: Box<dyn TitleMetadata>,
}

impl fmt::Debug for TitleData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TitleData")
            .field("num", &self.num)
            .field("playlist", &self.info.playlist())
            .finish()
    }
}

impl Drop for TitleData {
    fn drop(&mut self) {
        log::debug!("Releasing metadata for title {}", self.num);
    }
}

/// One playlist-backed title
#[derive(Debug, Clone)]
pub struct Title<F = Plain> {
    data: Rc<TitleData>,
    factory: F,
}

impl<F: ViewFactory> Title<F> {
    pub(crate) fn load(
        guard: SessionGuard,
        session: &dyn DiscSession,
        num: u32,
        factory: F,
    ) -> Result<Self> {
        let info = session
            .title_info(num, DEFAULT_ANGLE)
            .ok_or(BlurayError::Load { title: num })?;

        log::debug!(
            "Loaded title {} (playlist {}, {} chapters, {} clips)",
            num,
            info.playlist(),
            info.chapters().len(),
            info.clip_count()
        );

        Ok(Self {
            data: Rc::new(TitleData { guard, num, info }),
            factory,
        })
    }

    fn metadata(&self) -> Result<&dyn TitleMetadata> {
        self.data.guard.check()?;
        Ok(self.data.info.as_ref())
    }

    /// Index of the title on its disc
    pub fn num(&self) -> Result<u32> {
        self.data.guard.check()?;
        Ok(self.data.num)
    }

    /// Duration of the title
    pub fn length(&self) -> Result<Ticks> {
        Ok(Ticks::from(self.metadata()?.duration()))
    }

    /// Number of camera angles
    pub fn number_of_angles(&self) -> Result<u8> {
        Ok(self.metadata()?.angle_count())
    }

    /// Number of chapters
    pub fn number_of_chapters(&self) -> Result<u32> {
        Ok(self.metadata()?.chapters().len() as u32)
    }

    /// Number of clips referenced by the playlist
    pub fn number_of_clips(&self) -> Result<u32> {
        Ok(self.metadata()?.clip_count())
    }

    /// Number of the playlist file (`NNNNN.mpls`) backing this title
    pub fn playlist(&self) -> Result<u32> {
        Ok(self.metadata()?.playlist())
    }

    /// Chapter `num`, counted from 1
    pub fn chapter(&self, num: u32) -> Result<F::Chapter> {
        let count = self.number_of_chapters()?;
        if num < 1 || num > count {
            return Err(BlurayError::Range {
                kind: ViewKind::Chapter,
                num,
                count,
            });
        }

        Ok(self.factory.chapter(Chapter::new(Rc::clone(&self.data), num)))
    }

    /// Clip `num`, counted from 0
    pub fn clip(&self, num: u32) -> Result<F::Clip> {
        let count = self.number_of_clips()?;
        if num >= count {
            return Err(BlurayError::Range {
                kind: ViewKind::Clip,
                num,
                count,
            });
        }

        let clip = Clip::new(Rc::clone(&self.data), num, self.factory.clone());
        Ok(self.factory.clip(clip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::testing::open_sample;

    #[test]
    fn test_title_accessors() {
        let (_lib, disc) = open_sample();
        let title = disc.title(1).unwrap();

        assert_eq!(title.num().unwrap(), 1);
        assert_eq!(title.playlist().unwrap(), 801);
        assert_eq!(title.length().unwrap(), Ticks::from_secs(5400));
        assert_eq!(title.number_of_angles().unwrap(), 1);
        assert_eq!(title.number_of_chapters().unwrap(), 4);
        assert_eq!(title.number_of_clips().unwrap(), 3);
    }

    #[test]
    fn test_chapter_bounds_are_one_based() {
        let (_lib, disc) = open_sample();
        let title = disc.title(0).unwrap();

        assert!(matches!(
            title.chapter(0),
            Err(BlurayError::Range { kind: ViewKind::Chapter, num: 0, count: 2 })
        ));
        assert!(title.chapter(1).is_ok());
        assert!(title.chapter(2).is_ok());
        assert!(matches!(title.chapter(3), Err(BlurayError::Range { .. })));
    }

    #[test]
    fn test_clip_out_of_range() {
        let (_lib, disc) = open_sample();
        let title = disc.title(1).unwrap();

        let err = title.clip(5).unwrap_err();
        assert!(matches!(
            err,
            BlurayError::Range { kind: ViewKind::Clip, num: 5, count: 3 }
        ));
        let msg = err.to_string();
        assert!(msg.contains('5') && msg.contains('3'));

        assert!(title.clip(2).is_ok());
        assert!(matches!(title.clip(3), Err(BlurayError::Range { .. })));
    }

    #[test]
    fn test_title_released_on_drop() {
        let (lib, disc) = open_sample();
        let title = disc.title(0).unwrap();
        let chapter = title.chapter(1).unwrap();
        assert_eq!(lib.live_titles(), 1);

        // The chapter still borrows the title's metadata
        drop(title);
        assert_eq!(lib.live_titles(), 1);
        drop(chapter);
        assert_eq!(lib.live_titles(), 0);
    }

    #[test]
    fn test_each_load_is_separate() {
        let (lib, disc) = open_sample();
        let first = disc.title(0).unwrap();
        let second = disc.title(0).unwrap();
        assert_eq!(lib.live_titles(), 2);
        drop(first);
        drop(second);
        assert_eq!(lib.live_titles(), 0);
    }

    #[test]
    fn test_stale_after_close() {
        let (_lib, mut disc) = open_sample();
        let title = disc.title(0).unwrap();
        disc.close().unwrap();

        assert!(matches!(title.num(), Err(BlurayError::NotOpen)));
        assert!(matches!(title.length(), Err(BlurayError::NotOpen)));
        assert!(matches!(title.playlist(), Err(BlurayError::NotOpen)));
        assert!(matches!(title.chapter(1), Err(BlurayError::NotOpen)));
        assert!(matches!(title.clip(0), Err(BlurayError::NotOpen)));
    }

    #[test]
    fn test_stale_after_reopen() {
        let (_lib, mut disc) = open_sample();
        let title = disc.title(0).unwrap();
        disc.close().unwrap();
        disc.open().unwrap();

        assert!(matches!(title.num(), Err(BlurayError::NotOpen)));
        assert_eq!(disc.title(0).unwrap().num().unwrap(), 0);
    }
}
