//! Disc structure report
//!
//! Walks every title, chapter, clip and primary stream of an open disc and
//! renders the result as XML:
//!
//! ```text
//! <br numtitles="3" parser="bluread 1.5.0">
//!   <device>/media/BDROM</device>
//!   <titles main="1">
//!     <title idx="0" playlist="800">
//!       <length fancy="00:10:00.000">54000000</length>
//!       ...
//! ```

use serde::Serialize;

use crate::disc::{Bluray, BlurayError, Chapter, Clip, Result, Stream, Ticks, Title};

/// Root element name
const ROOT_TAG: &str = "br";

/// A tick value with its `HH:MM:SS.mmm` form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeNode {
    #[serde(rename = "@fancy")]
    pub fancy: String,
    #[serde(rename = "$text")]
    pub ticks: u64,
}

impl From<Ticks> for TimeNode {
    fn from(ticks: Ticks) -> Self {
        Self {
            fancy: ticks.to_string(),
            ticks: ticks.get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscReport {
    #[serde(rename = "@numtitles")]
    pub num_titles: u32,
    #[serde(rename = "@parser")]
    pub parser: String,
    pub device: String,
    #[serde(rename = "KEYDB", skip_serializing_if = "Option::is_none")]
    pub key_db: Option<String>,
    pub titles: TitlesNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitlesNode {
    #[serde(rename = "@main", skip_serializing_if = "Option::is_none")]
    pub main: Option<u32>,
    #[serde(rename = "title")]
    pub titles: Vec<TitleNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleNode {
    #[serde(rename = "@idx")]
    pub idx: u32,
    #[serde(rename = "@playlist")]
    pub playlist: u32,
    pub length: TimeNode,
    pub angles: CountNode,
    pub chapters: ChaptersNode,
    pub clips: ClipsNode,
}

/// An element carrying only a `num` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountNode {
    #[serde(rename = "@num")]
    pub num: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChaptersNode {
    #[serde(rename = "@num")]
    pub num: u32,
    #[serde(rename = "chapter")]
    pub chapters: Vec<ChapterNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterNode {
    #[serde(rename = "@num")]
    pub num: u32,
    pub start: TimeNode,
    pub end: TimeNode,
    pub length: TimeNode,
    pub clipnum: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipsNode {
    #[serde(rename = "@num")]
    pub num: u32,
    #[serde(rename = "clip")]
    pub clips: Vec<ClipNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipNode {
    #[serde(rename = "@num")]
    pub num: u32,
    pub videos: VideosNode,
    pub audios: AudiosNode,
    pub subtitles: SubtitlesNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideosNode {
    #[serde(rename = "@num")]
    pub num: u32,
    #[serde(rename = "video")]
    pub streams: Vec<StreamNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudiosNode {
    #[serde(rename = "@num")]
    pub num: u32,
    #[serde(rename = "audio")]
    pub streams: Vec<StreamNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitlesNode {
    #[serde(rename = "@num")]
    pub num: u32,
    #[serde(rename = "subtitle")]
    pub streams: Vec<SubtitleNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamNode {
    #[serde(rename = "@num")]
    pub num: u32,
    pub language: String,
    pub coding_type: u8,
    pub codec: String,
    pub format: u8,
    pub rate: u8,
    /// Only meaningful for video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubtitleNode {
    #[serde(rename = "@num")]
    pub num: u32,
    pub language: String,
}

impl DiscReport {
    /// Walk the whole disc; it must already be open
    pub fn collect(disc: &Bluray) -> Result<Self> {
        let num_titles = disc.number_of_titles()?;

        let main = match disc.main_title_number() {
            Ok(main) => Some(main),
            Err(e) => {
                log::warn!("Main title unknown: {}", e);
                None
            }
        };

        let titles = (0..num_titles)
            .map(|num| disc.title(num).and_then(|title| title_node(num, &title)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            num_titles,
            parser: format!("bluread {}", crate::VERSION),
            device: disc.path().display().to_string(),
            key_db: disc.key_db().map(|p| p.display().to_string()),
            titles: TitlesNode { main, titles },
        })
    }

    /// Render as XML, indented by two spaces when `pretty`
    pub fn to_xml(&self, pretty: bool) -> Result<String> {
        let mut xml = String::new();
        let mut ser = quick_xml::se::Serializer::with_root(&mut xml, Some(ROOT_TAG))
            .map_err(|e| BlurayError::Report(e.to_string()))?;
        if pretty {
            ser.indent(' ', 2);
        }
        self.serialize(ser)
            .map_err(|e| BlurayError::Report(e.to_string()))?;
        Ok(xml)
    }
}

fn title_node(idx: u32, title: &Title) -> Result<TitleNode> {
    let num_chapters = title.number_of_chapters()?;
    let chapters = (1..=num_chapters)
        .map(|num| title.chapter(num).and_then(|chapter| chapter_node(&chapter)))
        .collect::<Result<Vec<_>>>()?;

    let num_clips = title.number_of_clips()?;
    let clips = (0..num_clips)
        .map(|num| title.clip(num).and_then(|clip| clip_node(&clip)))
        .collect::<Result<Vec<_>>>()?;

    Ok(TitleNode {
        idx,
        playlist: title.playlist()?,
        length: title.length()?.into(),
        angles: CountNode {
            num: title.number_of_angles()?.into(),
        },
        chapters: ChaptersNode {
            num: num_chapters,
            chapters,
        },
        clips: ClipsNode {
            num: num_clips,
            clips,
        },
    })
}

fn chapter_node(chapter: &Chapter) -> Result<ChapterNode> {
    Ok(ChapterNode {
        num: chapter.num()?,
        start: chapter.start()?.into(),
        end: chapter.end()?.into(),
        length: chapter.length()?.into(),
        clipnum: chapter.clip_num()?,
    })
}

fn clip_node(clip: &Clip) -> Result<ClipNode> {
    let num_videos = clip.number_of_videos_primary()?;
    let videos = (0..num_videos)
        .map(|num| clip.video(num).and_then(|s| stream_node(&s, true)))
        .collect::<Result<Vec<_>>>()?;

    let num_audios = clip.number_of_audios_primary()?;
    let audios = (0..num_audios)
        .map(|num| clip.audio(num).and_then(|s| stream_node(&s, false)))
        .collect::<Result<Vec<_>>>()?;

    let num_subtitles = clip.number_of_subtitles()?;
    let subtitles = (0..num_subtitles)
        .map(|num| {
            clip.subtitle(num).and_then(|s| {
                Ok(SubtitleNode {
                    num: s.num()?,
                    language: s.language()?,
                })
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ClipNode {
        num: clip.num()?,
        videos: VideosNode {
            num: num_videos,
            streams: videos,
        },
        audios: AudiosNode {
            num: num_audios,
            streams: audios,
        },
        subtitles: SubtitlesNode {
            num: num_subtitles,
            streams: subtitles,
        },
    })
}

fn stream_node(stream: &Stream, with_aspect: bool) -> Result<StreamNode> {
    Ok(StreamNode {
        num: stream.num()?,
        language: stream.language()?,
        coding_type: stream.coding_type()?,
        codec: stream.codec()?.to_string(),
        format: stream.format()?,
        rate: stream.rate()?,
        aspect: if with_aspect {
            Some(stream.aspect()?)
        } else {
            None
        },
    })
}
