//! Construction of child views
//!
//! A disc handle carries one [`ViewFactory`] and hands it down to every view it
//! creates. Each getter (`Bluray::title`, `Title::chapter`, `Clip::audio`, ...)
//! builds the base view and passes it through the factory, so callers can wrap
//! views in their own types without touching the parent logic.

use super::chapter::Chapter;
use super::clip::Clip;
use super::stream::Stream;
use super::title::Title;

/// Wraps base views into the types returned by the getters
pub trait ViewFactory: Clone {
    type Title;
    type Chapter;
    type Clip;
    type Video;
    type Audio;
    type Subtitle;

    fn title(&self, view: Title<Self>) -> Self::Title;
    fn chapter(&self, view: Chapter) -> Self::Chapter;
    fn clip(&self, view: Clip<Self>) -> Self::Clip;
    fn video(&self, view: Stream) -> Self::Video;
    fn audio(&self, view: Stream) -> Self::Audio;
    fn subtitle(&self, view: Stream) -> Self::Subtitle;
}

/// Returns the base views unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plain;

impl ViewFactory for Plain {
    type Title = Title<Plain>;
    type Chapter = Chapter;
    type Clip = Clip<Plain>;
    type Video = Stream;
    type Audio = Stream;
    type Subtitle = Stream;

    fn title(&self, view: Title<Self>) -> Self::Title {
        view
    }

    fn chapter(&self, view: Chapter) -> Self::Chapter {
        view
    }

    fn clip(&self, view: Clip<Self>) -> Self::Clip {
        view
    }

    fn video(&self, view: Stream) -> Self::Video {
        view
    }

    fn audio(&self, view: Stream) -> Self::Audio {
        view
    }

    fn subtitle(&self, view: Stream) -> Self::Subtitle {
        view
    }
}
