//! Disc view hierarchy
//!
//! A [`Bluray`] handle owns the native session. Titles are loaded from it by
//! index; chapters and clips come from titles and streams from clips. Every
//! view refuses access once its disc has been closed.

mod bluray;
mod chapter;
mod clip;
mod error;
mod factory;
mod stream;
mod ticks;
mod title;

#[cfg(test)]
pub(crate) mod testing;

pub use bluray::{Bluray, OpenOptions};
pub use chapter::Chapter;
pub use clip::Clip;
pub use error::{BlurayError, Result, ViewKind};
pub use factory::{Plain, ViewFactory};
pub use stream::{Stream, StreamCodec, StreamKind};
pub use ticks::{Ticks, TICKS_PER_SECOND};
pub use title::Title;
