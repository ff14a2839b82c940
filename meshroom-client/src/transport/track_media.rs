use crate::capability::MediaSource;
use crate::error::MediaError;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Outgoing Opus/VP8 tracks shared by every peer connection of a client.
///
/// Whoever does the capture pushes encoded samples through
/// [`write_audio`](LocalTracks::write_audio) and
/// [`write_video`](LocalTracks::write_video); a disabled toggle swallows them.
pub struct LocalTracks {
    audio: Option<Arc<TrackLocalStaticSample>>,
    video: Option<Arc<TrackLocalStaticSample>>,
    audio_enabled: AtomicBool,
    video_enabled: AtomicBool,
}

impl LocalTracks {
    pub fn tracks(&self) -> Vec<Arc<dyn TrackLocal + Send + Sync>> {
        let mut tracks: Vec<Arc<dyn TrackLocal + Send + Sync>> = Vec::with_capacity(2);
        if let Some(audio) = &self.audio {
            tracks.push(audio.clone());
        }
        if let Some(video) = &self.video {
            tracks.push(video.clone());
        }
        tracks
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled.load(Ordering::Relaxed)
    }

    pub fn video_enabled(&self) -> bool {
        self.video_enabled.load(Ordering::Relaxed)
    }

    pub async fn write_audio(&self, sample: &Sample) -> Result<()> {
        match &self.audio {
            Some(track) if self.audio_enabled() => Ok(track.write_sample(sample).await?),
            _ => Ok(()),
        }
    }

    pub async fn write_video(&self, sample: &Sample) -> Result<()> {
        match &self.video {
            Some(track) if self.video_enabled() => Ok(track.write_sample(sample).await?),
            _ => Ok(()),
        }
    }
}

/// [`MediaSource`] handing out [`LocalTracks`].
#[derive(Debug, Clone)]
pub struct TrackMediaSource {
    audio: bool,
    video: bool,
    stream_id: String,
}

impl TrackMediaSource {
    pub fn new(audio: bool, video: bool) -> Self {
        Self {
            audio,
            video,
            stream_id: "meshroom".to_owned(),
        }
    }

    pub fn with_stream_id(mut self, stream_id: impl Into<String>) -> Self {
        self.stream_id = stream_id.into();
        self
    }

    fn track(&self, mime_type: &str, kind: &str) -> Arc<TrackLocalStaticSample> {
        Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: mime_type.to_owned(),
                ..Default::default()
            },
            kind.to_owned(),
            self.stream_id.clone(),
        ))
    }
}

#[async_trait]
impl MediaSource for TrackMediaSource {
    type Stream = LocalTracks;

    async fn acquire(&self) -> Result<LocalTracks, MediaError> {
        if !self.audio && !self.video {
            return Err(MediaError::Unavailable(
                "both audio and video are disabled".to_owned(),
            ));
        }

        debug!(audio = self.audio, video = self.video, "Creating local tracks");
        Ok(LocalTracks {
            audio: self.audio.then(|| self.track(MIME_TYPE_OPUS, "audio")),
            video: self.video.then(|| self.track(MIME_TYPE_VP8, "video")),
            audio_enabled: AtomicBool::new(true),
            video_enabled: AtomicBool::new(true),
        })
    }

    fn set_audio_enabled(&self, stream: &LocalTracks, enabled: bool) {
        stream.audio_enabled.store(enabled, Ordering::Relaxed);
    }

    fn set_video_enabled(&self, stream: &LocalTracks, enabled: bool) {
        stream.video_enabled.store(enabled, Ordering::Relaxed);
    }

    async fn release(&self, stream: LocalTracks) {
        debug!(tracks = stream.tracks().len(), "Local tracks released");
    }
}
