//! Sample disc shared by the unit tests

use super::bluray::Bluray;
use super::ticks::Ticks;
use crate::native::{ChapterRecord, ClipImage, DiscImage, MemoryLibrary, StreamInfo, TitleImage};

pub const DISC_PATH: &str = "/media/SAMPLE_MOVIE";

fn chapter(start_secs: u64, len_secs: u64, clip_ref: u32) -> ChapterRecord {
    ChapterRecord {
        start: Ticks::from_secs(start_secs).get(),
        duration: Ticks::from_secs(len_secs).get(),
        clip_ref,
        ..Default::default()
    }
}

fn clip(id: &str, start_secs: u64, len_secs: u64) -> ClipImage {
    let in_time = Ticks::from_secs(600).get();
    ClipImage {
        clip_id: id.to_string(),
        start_time: Ticks::from_secs(start_secs).get(),
        in_time,
        out_time: in_time + Ticks::from_secs(len_secs).get(),
        ..Default::default()
    }
}

fn h264() -> StreamInfo {
    StreamInfo {
        coding_type: 0x1b,
        format: 6,
        rate: 1,
        aspect: 3,
        pid: 0x1011,
        ..Default::default()
    }
}

/// Three titles: a short intro, the main feature and a trailer
///
/// - title 0: 2 chapters, 1 clip with video, one "eng" audio, a secondary
///   audio and two subtitles
/// - title 1: 4 chapters over 3 clips, the main title
/// - title 2: 1 chapter, 1 clip with a timed still and only a menu stream
pub fn sample_disc() -> DiscImage {
    let intro = TitleImage {
        playlist: 800,
        duration: Ticks::from_secs(600).get(),
        angle_count: 1,
        chapters: vec![chapter(0, 300, 0), chapter(300, 300, 0)],
        clips: vec![ClipImage {
            video_streams: vec![h264()],
            audio_streams: vec![StreamInfo::with_language(0x86, "eng")],
            sec_audio_streams: vec![StreamInfo::with_language(0xa1, "eng")],
            pg_streams: vec![
                StreamInfo::with_language(0x90, "eng"),
                StreamInfo::with_language(0x90, "fra"),
            ],
            pkt_count: 12_000,
            ..clip("00001", 0, 600)
        }],
    };

    let feature = TitleImage {
        playlist: 801,
        duration: Ticks::from_secs(5400).get(),
        angle_count: 1,
        chapters: vec![
            chapter(0, 1200, 0),
            chapter(1200, 1500, 0),
            chapter(2700, 1300, 1),
            chapter(4000, 1400, 2),
        ],
        clips: vec![
            ClipImage {
                video_streams: vec![h264()],
                audio_streams: vec![
                    StreamInfo::with_language(0x83, "eng"),
                    StreamInfo::with_language(0x80, "deux"),
                ],
                ..clip("00010", 0, 2700)
            },
            clip("00011", 2700, 1300),
            clip("00012", 4000, 1400),
        ],
    };

    let trailer = TitleImage {
        playlist: 802,
        duration: Ticks::from_secs(90).get(),
        angle_count: 1,
        chapters: vec![chapter(0, 90, 0)],
        clips: vec![ClipImage {
            still_mode: 1,
            still_time: 5,
            ig_streams: vec![StreamInfo::with_language(0x91, "eng")],
            ..clip("00020", 0, 90)
        }],
    };

    DiscImage {
        main_title: 1,
        ..DiscImage::new("SAMPLE_MOVIE", "0123456789ABCDEF0123456789ABCDEF", "00000001")
    }
    .with_title(intro)
    .with_title(feature)
    .with_title(trailer)
}

pub fn sample_library() -> MemoryLibrary {
    MemoryLibrary::new().with_disc(DISC_PATH, sample_disc())
}

/// An opened handle over the sample disc, with the library for inspection
pub fn open_sample() -> (MemoryLibrary, Bluray) {
    let lib = sample_library();
    let mut disc = Bluray::with_library(lib.clone(), DISC_PATH, None);
    disc.open().expect("sample disc opens");
    (lib, disc)
}
