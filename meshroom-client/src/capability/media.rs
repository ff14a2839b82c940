use crate::error::MediaError;
use async_trait::async_trait;

/// Local capture. Acquired once per room visit and shared by every link.
#[async_trait]
pub trait MediaSource: Send + Sync + 'static {
    type Stream: Send + Sync + 'static;

    async fn acquire(&self) -> Result<Self::Stream, MediaError>;

    fn set_audio_enabled(&self, stream: &Self::Stream, enabled: bool);

    fn set_video_enabled(&self, stream: &Self::Stream, enabled: bool);

    async fn release(&self, stream: Self::Stream);
}

/// The acquired local stream plus its toggles. Links only ever see it by
/// shared reference.
#[derive(Debug)]
pub struct LocalMedia<S> {
    stream: S,
    audio_enabled: bool,
    video_enabled: bool,
}

impl<S> LocalMedia<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            audio_enabled: true,
            video_enabled: true,
        }
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn video_enabled(&self) -> bool {
        self.video_enabled
    }

    pub(crate) fn set_audio(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }

    pub(crate) fn set_video(&mut self, enabled: bool) {
        self.video_enabled = enabled;
    }

    pub fn into_stream(self) -> S {
        self.stream
    }
}
