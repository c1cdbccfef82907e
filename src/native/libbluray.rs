//! libbluray backend
//!
//! Declarations are generated from `libbluray/bluray.h` at build time. Chapter
//! and stream records are handed out as slices of [`ChapterRecord`] and
//! [`StreamInfo`], whose layout is checked against the generated structs.

use std::ffi::{c_char, CString};
use std::mem::{align_of, offset_of, size_of};
use std::path::Path;
use std::ptr::NonNull;
use std::slice;

use super::{
    ChapterRecord, ClipRecord, DiscIdentity, DiscLibrary, DiscSession, StreamInfo, TitleMetadata,
    VOLUME_ID_LEN,
};

#[allow(non_camel_case_types, non_upper_case_globals, non_snake_case, dead_code)]
mod sys {
    include!(concat!(env!("OUT_DIR"), "/libbluray_bindings.rs"));
}

use sys::{
    bd_close, bd_free_title_info, bd_get_disc_info, bd_get_main_title, bd_get_title_info,
    bd_get_titles, bd_get_version, bd_init, bd_open_disc, BLURAY, BLURAY_STREAM_INFO,
    BLURAY_TITLE_CHAPTER, BLURAY_TITLE_INFO,
};

const _: () = {
    assert!(size_of::<ChapterRecord>() == size_of::<BLURAY_TITLE_CHAPTER>());
    assert!(align_of::<ChapterRecord>() == align_of::<BLURAY_TITLE_CHAPTER>());
    assert!(offset_of!(ChapterRecord, start) == offset_of!(BLURAY_TITLE_CHAPTER, start));
    assert!(offset_of!(ChapterRecord, duration) == offset_of!(BLURAY_TITLE_CHAPTER, duration));
    assert!(offset_of!(ChapterRecord, clip_ref) == offset_of!(BLURAY_TITLE_CHAPTER, clip_ref));

    assert!(size_of::<StreamInfo>() == size_of::<BLURAY_STREAM_INFO>());
    assert!(align_of::<StreamInfo>() == align_of::<BLURAY_STREAM_INFO>());
    assert!(offset_of!(StreamInfo, lang) == offset_of!(BLURAY_STREAM_INFO, lang));
    assert!(offset_of!(StreamInfo, pid) == offset_of!(BLURAY_STREAM_INFO, pid));
    assert!(offset_of!(StreamInfo, aspect) == offset_of!(BLURAY_STREAM_INFO, aspect));
};

/// View a C character array as bytes
fn char_bytes(field: &[c_char]) -> &[u8] {
    // SAFETY: c_char and u8 have the same size and alignment
    unsafe { slice::from_raw_parts(field.as_ptr().cast::<u8>(), field.len()) }
}

/// Version of the linked libbluray as (major, minor, micro)
pub fn version() -> (i32, i32, i32) {
    let (mut major, mut minor, mut micro) = (0, 0, 0);
    // SAFETY: the three pointers are valid for writes
    unsafe { bd_get_version(&mut major, &mut minor, &mut micro) };
    (major, minor, micro)
}

/// Build a slice from a native pointer/count pair, tolerating null
///
/// # Safety
/// When non-null, `ptr` must point to `len` initialized values that outlive `'a`.
unsafe fn native_slice<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        slice::from_raw_parts(ptr, len)
    }
}

/// The system libbluray
#[derive(Debug, Clone, Copy, Default)]
pub struct Libbluray;

impl Libbluray {
    fn c_path(path: &Path) -> Option<CString> {
        let text = path.to_str()?;
        CString::new(text).ok()
    }
}

impl DiscLibrary for Libbluray {
    fn open(&self, path: &Path, key_db: Option<&Path>) -> Option<Box<dyn DiscSession>> {
        let device = Self::c_path(path)?;
        let keyfile = match key_db {
            Some(key_db) => Some(Self::c_path(key_db)?),
            None => None,
        };

        // SAFETY: bd_init has no preconditions
        let bd = NonNull::new(unsafe { bd_init() })?;
        // Dropping the session runs bd_close, which also frees the bd_init allocation
        let session = LibblueraySession { bd };

        let keyfile_ptr = keyfile.as_ref().map_or(std::ptr::null(), |k| k.as_ptr());
        // SAFETY: bd is live, both strings outlive the call
        let opened = unsafe { bd_open_disc(session.bd.as_ptr(), device.as_ptr(), keyfile_ptr) };
        if opened == 0 {
            log::debug!("bd_open_disc failed for {}", path.display());
            return None;
        }

        Some(Box::new(session))
    }
}

struct LibblueraySession {
    bd: NonNull<BLURAY>,
}

impl DiscSession for LibblueraySession {
    fn disc_info(&self) -> Option<DiscIdentity<'_>> {
        // SAFETY: the disc info is owned by the session and lives until bd_close
        let info = unsafe { bd_get_disc_info(self.bd.as_ptr()).as_ref()? };

        let volume_id: &[u8] = if info.udf_volume_id.is_null() {
            &[]
        } else {
            // SAFETY: a NUL-terminated string owned by the session; never read
            // more than the declared buffer size
            unsafe {
                let ptr = info.udf_volume_id as *const u8;
                let mut len = 0;
                while len < VOLUME_ID_LEN && *ptr.add(len) != 0 {
                    len += 1;
                }
                slice::from_raw_parts(ptr, len)
            }
        };

        Some(DiscIdentity {
            volume_id,
            disc_id: char_bytes(&info.bdj_disc_id),
            org_id: char_bytes(&info.bdj_org_id),
        })
    }

    fn title_count(&self, flags: u8, min_title_length: u32) -> u32 {
        // SAFETY: bd is live for the lifetime of self
        unsafe { bd_get_titles(self.bd.as_ptr(), flags, min_title_length) }
    }

    fn main_title(&self) -> i32 {
        // SAFETY: bd is live for the lifetime of self
        unsafe { bd_get_main_title(self.bd.as_ptr()) }
    }

    fn title_info(&self, index: u32, angle: u32) -> Option<Box<dyn TitleMetadata>> {
        // SAFETY: bd is live; the returned block is independent of the session
        let info = NonNull::new(unsafe { bd_get_title_info(self.bd.as_ptr(), index, angle) })?;
        Some(Box::new(LibblurayTitle { info }))
    }
}

impl Drop for LibblueraySession {
    fn drop(&mut self) {
        // SAFETY: bd came from bd_init and is closed exactly once
        unsafe { bd_close(self.bd.as_ptr()) };
    }
}

struct LibblurayTitle {
    info: NonNull<BLURAY_TITLE_INFO>,
}

impl LibblurayTitle {
    fn raw(&self) -> &BLURAY_TITLE_INFO {
        // SAFETY: info stays valid until bd_free_title_info in Drop
        unsafe { self.info.as_ref() }
    }
}

impl TitleMetadata for LibblurayTitle {
    fn playlist(&self) -> u32 {
        self.raw().playlist
    }

    fn duration(&self) -> u64 {
        self.raw().duration
    }

    fn angle_count(&self) -> u8 {
        self.raw().angle_count
    }

    fn chapters(&self) -> &[ChapterRecord] {
        let raw = self.raw();
        // SAFETY: chapters holds chapter_count records inside the title block
        unsafe {
            native_slice(
                raw.chapters.cast_const().cast::<ChapterRecord>(),
                raw.chapter_count as usize,
            )
        }
    }

    fn clip_count(&self) -> u32 {
        self.raw().clip_count
    }

    fn clip(&self, index: u32) -> Option<ClipRecord<'_>> {
        let raw = self.raw();
        // SAFETY: clips holds clip_count records inside the title block
        let clips = unsafe { native_slice(raw.clips.cast_const(), raw.clip_count as usize) };
        let clip = clips.get(index as usize)?;

        // SAFETY: every stream array holds its matching count of records
        unsafe {
            Some(ClipRecord {
                clip_id: char_bytes(&clip.clip_id),
                pkt_count: clip.pkt_count,
                still_mode: clip.still_mode,
                still_time: clip.still_time,
                start_time: clip.start_time,
                in_time: clip.in_time,
                out_time: clip.out_time,
                video_streams: native_slice(
                    clip.video_streams.cast_const().cast::<StreamInfo>(),
                    clip.video_stream_count.into(),
                ),
                audio_streams: native_slice(
                    clip.audio_streams.cast_const().cast::<StreamInfo>(),
                    clip.audio_stream_count.into(),
                ),
                pg_streams: native_slice(
                    clip.pg_streams.cast_const().cast::<StreamInfo>(),
                    clip.pg_stream_count.into(),
                ),
                ig_streams: native_slice(
                    clip.ig_streams.cast_const().cast::<StreamInfo>(),
                    clip.ig_stream_count.into(),
                ),
                sec_video_streams: native_slice(
                    clip.sec_video_streams.cast_const().cast::<StreamInfo>(),
                    clip.sec_video_stream_count.into(),
                ),
                sec_audio_streams: native_slice(
                    clip.sec_audio_streams.cast_const().cast::<StreamInfo>(),
                    clip.sec_audio_stream_count.into(),
                ),
            })
        }
    }
}

impl Drop for LibblurayTitle {
    fn drop(&mut self) {
        // SAFETY: info came from bd_get_title_info and is freed exactly once
        unsafe { bd_free_title_info(self.info.as_ptr()) };
    }
}
