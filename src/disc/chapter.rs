//! Chapter view

use std::rc::Rc;

use super::error::{BlurayError, Result, ViewKind};
use super::ticks::Ticks;
use super::title::TitleData;
use crate::native::ChapterRecord;

/// One chapter of a title
///
/// Chapters are numbered from 1; chapter `n` is the `n - 1`th record of the
/// title's chapter list.
#[derive(Debug, Clone)]
pub struct Chapter {
    title: Rc<TitleData>,
    num: u32,
}

impl Chapter {
    pub(crate) fn new(title: Rc<TitleData>, num: u32) -> Self {
        Self { title, num }
    }

    fn record(&self) -> Result<&ChapterRecord> {
        self.title.guard.check()?;
        let chapters = self.title.info.chapters();
        self.num
            .checked_sub(1)
            .and_then(|pos| chapters.get(pos as usize))
            .ok_or(BlurayError::Range {
                kind: ViewKind::Chapter,
                num: self.num,
                count: chapters.len() as u32,
            })
    }

    /// Chapter number, counted from 1
    pub fn num(&self) -> Result<u32> {
        self.title.guard.check()?;
        Ok(self.num)
    }

    /// Start offset within the title
    pub fn start(&self) -> Result<Ticks> {
        Ok(Ticks::from(self.record()?.start))
    }

    /// Chapter duration
    pub fn length(&self) -> Result<Ticks> {
        Ok(Ticks::from(self.record()?.duration))
    }

    /// Start plus length
    pub fn end(&self) -> Result<Ticks> {
        let record = self.record()?;
        Ok(Ticks::from(record.start) + Ticks::from(record.duration))
    }

    /// Index of the clip the chapter starts in
    pub fn clip_num(&self) -> Result<u32> {
        Ok(self.record()?.clip_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::testing::open_sample;

    #[test]
    fn test_chapter_reads_its_own_record() {
        let (_lib, disc) = open_sample();
        let title = disc.title(0).unwrap();

        let first = title.chapter(1).unwrap();
        assert_eq!(first.num().unwrap(), 1);
        assert_eq!(first.start().unwrap(), Ticks(0));
        assert_eq!(first.length().unwrap(), Ticks::from_secs(300));

        let second = title.chapter(2).unwrap();
        assert_eq!(second.start().unwrap(), Ticks::from_secs(300));
        assert_eq!(second.end().unwrap(), Ticks::from_secs(600));
    }

    #[test]
    fn test_clip_num_within_title() {
        let (_lib, disc) = open_sample();
        for t in 0..disc.number_of_titles().unwrap() {
            let title = disc.title(t).unwrap();
            let clips = title.number_of_clips().unwrap();
            for c in 1..=title.number_of_chapters().unwrap() {
                let clip_num = title.chapter(c).unwrap().clip_num().unwrap();
                assert!(clip_num < clips, "title {} chapter {} clip {}", t, c, clip_num);
            }
        }
    }

    #[test]
    fn test_last_chapter_points_at_last_clip() {
        let (_lib, disc) = open_sample();
        let title = disc.title(1).unwrap();
        let last = title.chapter(4).unwrap();
        assert_eq!(last.clip_num().unwrap(), 2);
        assert_eq!(last.end().unwrap(), title.length().unwrap());
    }

    #[test]
    fn test_stale_chapter() {
        let (_lib, mut disc) = open_sample();
        let chapter = disc.title(0).unwrap().chapter(1).unwrap();
        disc.close().unwrap();

        assert!(matches!(chapter.num(), Err(BlurayError::NotOpen)));
        assert!(matches!(chapter.start(), Err(BlurayError::NotOpen)));
        assert!(matches!(chapter.clip_num(), Err(BlurayError::NotOpen)));
    }
}
