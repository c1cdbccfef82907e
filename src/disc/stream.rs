//! Elementary stream views (video, audio, subtitle)

use std::fmt;
use std::rc::Rc;

use super::clip::clip_record;
use super::error::{BlurayError, Result, ViewKind};
use super::title::TitleData;
use crate::native::{bounded_string, ClipRecord, StreamInfo, LANGUAGE_LEN};

/// Which stream list of a clip a view reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Primary video
    Video,
    /// Primary audio
    Audio,
    /// Presentation graphics
    Subtitle,
}

impl StreamKind {
    pub(crate) fn streams<'a>(self, clip: &ClipRecord<'a>) -> &'a [StreamInfo] {
        match self {
            Self::Video => clip.video_streams,
            Self::Audio => clip.audio_streams,
            Self::Subtitle => clip.pg_streams,
        }
    }

    pub(crate) fn view_kind(self) -> ViewKind {
        match self {
            Self::Video => ViewKind::Video,
            Self::Audio => ViewKind::Audio,
            Self::Subtitle => ViewKind::Subtitle,
        }
    }
}

/// Stream coding types known to libbluray (`bd_stream_type_e`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCodec {
    Mpeg1Video,
    Mpeg2Video,
    Vc1,
    H264,
    Hevc,
    Mpeg1Audio,
    Mpeg2Audio,
    Lpcm,
    Ac3,
    Dts,
    TrueHd,
    Ac3Plus,
    DtsHd,
    DtsHdMaster,
    Ac3PlusSecondary,
    DtsHdSecondary,
    PresentationGraphics,
    InteractiveGraphics,
    TextSubtitle,
    Unknown(u8),
}

impl StreamCodec {
    /// Map a raw `coding_type` value
    pub fn from_raw(coding_type: u8) -> Self {
        match coding_type {
            0x01 => Self::Mpeg1Video,
            0x02 => Self::Mpeg2Video,
            0xea => Self::Vc1,
            0x1b => Self::H264,
            0x24 => Self::Hevc,
            0x03 => Self::Mpeg1Audio,
            0x04 => Self::Mpeg2Audio,
            0x80 => Self::Lpcm,
            0x81 => Self::Ac3,
            0x82 => Self::Dts,
            0x83 => Self::TrueHd,
            0x84 => Self::Ac3Plus,
            0x85 => Self::DtsHd,
            0x86 => Self::DtsHdMaster,
            0xa1 => Self::Ac3PlusSecondary,
            0xa2 => Self::DtsHdSecondary,
            0x90 => Self::PresentationGraphics,
            0x91 => Self::InteractiveGraphics,
            0x92 => Self::TextSubtitle,
            other => Self::Unknown(other),
        }
    }

    /// Human readable codec name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mpeg1Video => "MPEG-1 Video",
            Self::Mpeg2Video => "MPEG-2 Video",
            Self::Vc1 => "VC-1",
            Self::H264 => "H.264/AVC",
            Self::Hevc => "H.265/HEVC",
            Self::Mpeg1Audio => "MPEG-1 Audio",
            Self::Mpeg2Audio => "MPEG-2 Audio",
            Self::Lpcm => "LPCM",
            Self::Ac3 => "Dolby Digital",
            Self::Dts => "DTS",
            Self::TrueHd => "Dolby TrueHD",
            Self::Ac3Plus => "Dolby Digital Plus",
            Self::DtsHd => "DTS-HD High Resolution",
            Self::DtsHdMaster => "DTS-HD Master Audio",
            Self::Ac3PlusSecondary => "Dolby Digital Plus (secondary)",
            Self::DtsHdSecondary => "DTS-HD (secondary)",
            Self::PresentationGraphics => "Presentation Graphics",
            Self::InteractiveGraphics => "Interactive Graphics",
            Self::TextSubtitle => "Text Subtitle",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for StreamCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "Unknown (0x{:02x})", code),
            known => f.write_str(known.display_name()),
        }
    }
}

/// One elementary stream of a clip, numbered from 0 within its kind
///
/// The numeric fields are passed through unchanged from the native record.
#[derive(Debug, Clone)]
pub struct Stream {
    title: Rc<TitleData>,
    clip: u32,
    kind: StreamKind,
    num: u32,
}

impl Stream {
    pub(crate) fn new(title: Rc<TitleData>, clip: u32, kind: StreamKind, num: u32) -> Self {
        Self {
            title,
            clip,
            kind,
            num,
        }
    }

    fn info(&self) -> Result<StreamInfo> {
        let clip = clip_record(&self.title, self.clip)?;
        let streams = self.kind.streams(&clip);
        streams
            .get(self.num as usize)
            .copied()
            .ok_or(BlurayError::Range {
                kind: self.kind.view_kind(),
                num: self.num,
                count: streams.len() as u32,
            })
    }

    /// Video, audio or subtitle
    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    /// Index of the stream within its clip and kind
    pub fn num(&self) -> Result<u32> {
        self.title.guard.check()?;
        Ok(self.num)
    }

    /// ISO 639-2 language code, e.g. `eng`
    pub fn language(&self) -> Result<String> {
        Ok(bounded_string(&self.info()?.lang, LANGUAGE_LEN))
    }

    /// Raw stream coding type
    pub fn coding_type(&self) -> Result<u8> {
        Ok(self.info()?.coding_type)
    }

    /// Codec identified from the coding type
    pub fn codec(&self) -> Result<StreamCodec> {
        Ok(StreamCodec::from_raw(self.info()?.coding_type))
    }

    /// Raw video or audio format code
    pub fn format(&self) -> Result<u8> {
        Ok(self.info()?.format)
    }

    /// Raw frame or sample rate code
    pub fn rate(&self) -> Result<u8> {
        Ok(self.info()?.rate)
    }

    /// Raw aspect ratio code (video only)
    pub fn aspect(&self) -> Result<u8> {
        Ok(self.info()?.aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::testing::open_sample;

    #[test]
    fn test_audio_language() {
        let (_lib, disc) = open_sample();
        let audio = disc.title(0).unwrap().clip(0).unwrap().audio(0).unwrap();

        assert_eq!(audio.kind(), StreamKind::Audio);
        assert_eq!(audio.num().unwrap(), 0);
        assert_eq!(audio.language().unwrap(), "eng");
        assert_eq!(audio.codec().unwrap(), StreamCodec::DtsHdMaster);
    }

    #[test]
    fn test_video_fields_pass_through() {
        let (_lib, disc) = open_sample();
        let video = disc.title(0).unwrap().clip(0).unwrap().video(0).unwrap();

        assert_eq!(video.coding_type().unwrap(), 0x1b);
        assert_eq!(video.codec().unwrap(), StreamCodec::H264);
        assert_eq!(video.format().unwrap(), 6);
        assert_eq!(video.rate().unwrap(), 1);
        assert_eq!(video.aspect().unwrap(), 3);
        assert_eq!(video.language().unwrap(), "");
    }

    #[test]
    fn test_subtitles_in_order() {
        let (_lib, disc) = open_sample();
        let clip = disc.title(0).unwrap().clip(0).unwrap();

        assert_eq!(clip.subtitle(0).unwrap().language().unwrap(), "eng");
        assert_eq!(clip.subtitle(1).unwrap().language().unwrap(), "fra");
        assert_eq!(clip.subtitle(1).unwrap().codec().unwrap(), StreamCodec::PresentationGraphics);
    }

    #[test]
    fn test_unterminated_language_is_bounded() {
        let (_lib, disc) = open_sample();
        // Stored as four raw bytes with no terminator
        let audio = disc.title(1).unwrap().clip(0).unwrap().audio(1).unwrap();
        assert_eq!(audio.language().unwrap(), "deux");
    }

    #[test]
    fn test_stale_stream() {
        let (_lib, mut disc) = open_sample();
        let audio = disc.title(0).unwrap().clip(0).unwrap().audio(0).unwrap();
        disc.close().unwrap();

        assert_eq!(audio.kind(), StreamKind::Audio);
        assert!(matches!(audio.num(), Err(BlurayError::NotOpen)));
        assert!(matches!(audio.language(), Err(BlurayError::NotOpen)));
        assert!(matches!(audio.coding_type(), Err(BlurayError::NotOpen)));
    }

    #[test]
    fn test_codec_names() {
        assert_eq!(StreamCodec::from_raw(0x83), StreamCodec::TrueHd);
        assert_eq!(StreamCodec::from_raw(0x24).to_string(), "H.265/HEVC");
        assert_eq!(StreamCodec::from_raw(0x7f), StreamCodec::Unknown(0x7f));
        assert_eq!(StreamCodec::Unknown(0x7f).to_string(), "Unknown (0x7f)");
    }
}
