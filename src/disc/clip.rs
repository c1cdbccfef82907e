//! Clip view

use std::rc::Rc;

use super::error::{BlurayError, Result, ViewKind};
use super::factory::{Plain, ViewFactory};
use super::stream::{Stream, StreamKind};
use super::ticks::Ticks;
use super::title::TitleData;
use crate::native::{bounded_string, ClipRecord, CLIP_ID_LEN};

/// One clip referenced by a title's playlist, numbered from 0
#[derive(Debug, Clone)]
pub struct Clip<F = Plain> {
    title: Rc<TitleData>,
    num: u32,
    factory: F,
}

impl<F: ViewFactory> Clip<F> {
    pub(crate) fn new(title: Rc<TitleData>, num: u32, factory: F) -> Self {
        Self {
            title,
            num,
            factory,
        }
    }

    fn record(&self) -> Result<ClipRecord<'_>> {
        clip_record(&self.title, self.num)
    }

    /// Index of the clip within its title
    pub fn num(&self) -> Result<u32> {
        self.title.guard.check()?;
        Ok(self.num)
    }

    /// Clip file name without extension, e.g. `00001`
    pub fn clip_id(&self) -> Result<String> {
        Ok(bounded_string(self.record()?.clip_id, CLIP_ID_LEN))
    }

    /// Position of the clip on the title's timeline
    pub fn start_time(&self) -> Result<Ticks> {
        Ok(Ticks::from(self.record()?.start_time))
    }

    /// First presentation timestamp played from the clip
    pub fn in_time(&self) -> Result<Ticks> {
        Ok(Ticks::from(self.record()?.in_time))
    }

    /// Presentation timestamp where playback of the clip stops
    pub fn out_time(&self) -> Result<Ticks> {
        Ok(Ticks::from(self.record()?.out_time))
    }

    /// Number of transport stream packets in the clip
    pub fn packet_count(&self) -> Result<u32> {
        Ok(self.record()?.pkt_count)
    }

    /// Still mode after the clip: 0 none, 1 timed, 2 infinite
    pub fn still_mode(&self) -> Result<u8> {
        Ok(self.record()?.still_mode)
    }

    /// Seconds to hold a timed still
    pub fn still_time(&self) -> Result<u16> {
        Ok(self.record()?.still_time)
    }

    /// Primary video streams
    pub fn number_of_videos_primary(&self) -> Result<u32> {
        Ok(self.record()?.video_streams.len() as u32)
    }

    /// Picture-in-picture video streams
    pub fn number_of_videos_secondary(&self) -> Result<u32> {
        Ok(self.record()?.sec_video_streams.len() as u32)
    }

    /// Primary audio streams
    pub fn number_of_audios_primary(&self) -> Result<u32> {
        Ok(self.record()?.audio_streams.len() as u32)
    }

    /// Secondary (commentary, mixing) audio streams
    pub fn number_of_audios_secondary(&self) -> Result<u32> {
        Ok(self.record()?.sec_audio_streams.len() as u32)
    }

    /// Presentation graphics streams
    pub fn number_of_subtitles(&self) -> Result<u32> {
        Ok(self.record()?.pg_streams.len() as u32)
    }

    /// Interactive graphics (menu) streams
    pub fn number_of_interactive_graphics(&self) -> Result<u32> {
        Ok(self.record()?.ig_streams.len() as u32)
    }

    /// Primary video stream `num`
    pub fn video(&self, num: u32) -> Result<F::Video> {
        let stream = self.stream(StreamKind::Video, num)?;
        Ok(self.factory.video(stream))
    }

    /// Primary audio stream `num`
    pub fn audio(&self, num: u32) -> Result<F::Audio> {
        let stream = self.stream(StreamKind::Audio, num)?;
        Ok(self.factory.audio(stream))
    }

    /// Subtitle (presentation graphics) stream `num`
    pub fn subtitle(&self, num: u32) -> Result<F::Subtitle> {
        let stream = self.stream(StreamKind::Subtitle, num)?;
        Ok(self.factory.subtitle(stream))
    }

    fn stream(&self, kind: StreamKind, num: u32) -> Result<Stream> {
        let count = kind.streams(&self.record()?).len() as u32;
        if num >= count {
            return Err(BlurayError::Range {
                kind: kind.view_kind(),
                num,
                count,
            });
        }
        Ok(Stream::new(Rc::clone(&self.title), self.num, kind, num))
    }
}

/// Clip record `num` of a title, checking the session first
pub(crate) fn clip_record(title: &TitleData, num: u32) -> Result<ClipRecord<'_>> {
    title.guard.check()?;
    title.info.clip(num).ok_or(BlurayError::Range {
        kind: ViewKind::Clip,
        num,
        count: title.info.clip_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::testing::open_sample;

    #[test]
    fn test_clip_counts() {
        let (_lib, disc) = open_sample();
        let clip = disc.title(0).unwrap().clip(0).unwrap();

        assert_eq!(clip.num().unwrap(), 0);
        assert_eq!(clip.clip_id().unwrap(), "00001");
        assert_eq!(clip.number_of_videos_primary().unwrap(), 1);
        assert_eq!(clip.number_of_videos_secondary().unwrap(), 0);
        assert_eq!(clip.number_of_audios_primary().unwrap(), 1);
        assert_eq!(clip.number_of_audios_secondary().unwrap(), 1);
        assert_eq!(clip.number_of_subtitles().unwrap(), 2);
    }

    #[test]
    fn test_clip_reads_record_at_its_index() {
        let (_lib, disc) = open_sample();
        let title = disc.title(1).unwrap();

        let ids: Vec<String> = (0..3)
            .map(|n| title.clip(n).unwrap().clip_id().unwrap())
            .collect();
        assert_eq!(ids, ["00010", "00011", "00012"]);

        let second = title.clip(1).unwrap();
        assert_eq!(second.start_time().unwrap(), Ticks::from_secs(2700));
        assert!(second.out_time().unwrap() > second.in_time().unwrap());
    }

    #[test]
    fn test_stream_bounds() {
        let (_lib, disc) = open_sample();
        let clip = disc.title(0).unwrap().clip(0).unwrap();

        assert!(clip.video(0).is_ok());
        assert!(matches!(
            clip.video(1),
            Err(BlurayError::Range { kind: ViewKind::Video, num: 1, count: 1 })
        ));
        assert!(clip.audio(0).is_ok());
        assert!(matches!(
            clip.audio(1),
            Err(BlurayError::Range { kind: ViewKind::Audio, num: 1, count: 1 })
        ));
        assert!(clip.subtitle(1).is_ok());
        assert!(matches!(
            clip.subtitle(2),
            Err(BlurayError::Range { kind: ViewKind::Subtitle, num: 2, count: 2 })
        ));
    }

    #[test]
    fn test_clip_without_streams() {
        let (_lib, disc) = open_sample();
        let clip = disc.title(2).unwrap().clip(0).unwrap();

        assert_eq!(clip.number_of_videos_primary().unwrap(), 0);
        assert!(matches!(clip.video(0), Err(BlurayError::Range { count: 0, .. })));
        assert!(matches!(clip.subtitle(0), Err(BlurayError::Range { count: 0, .. })));
    }

    #[test]
    fn test_still_and_menu_fields() {
        let (_lib, disc) = open_sample();

        let intro = disc.title(0).unwrap().clip(0).unwrap();
        assert_eq!(intro.packet_count().unwrap(), 12_000);
        assert_eq!(intro.still_mode().unwrap(), 0);
        assert_eq!(intro.number_of_interactive_graphics().unwrap(), 0);

        let trailer = disc.title(2).unwrap().clip(0).unwrap();
        assert_eq!(trailer.still_mode().unwrap(), 1);
        assert_eq!(trailer.still_time().unwrap(), 5);
        assert_eq!(trailer.number_of_interactive_graphics().unwrap(), 1);
    }

    #[test]
    fn test_stale_clip() {
        let (_lib, mut disc) = open_sample();
        let clip = disc.title(0).unwrap().clip(0).unwrap();
        disc.close().unwrap();

        assert!(matches!(clip.num(), Err(BlurayError::NotOpen)));
        assert!(matches!(clip.number_of_subtitles(), Err(BlurayError::NotOpen)));
        assert!(matches!(clip.audio(0), Err(BlurayError::NotOpen)));
        assert!(matches!(clip.packet_count(), Err(BlurayError::NotOpen)));
    }
}
