use async_trait::async_trait;
use meshcast_core::MediaError;
use std::fmt;
use std::sync::Arc;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Local tracks attached to every outgoing call.
#[derive(Clone, Default)]
pub struct LocalMedia {
    pub tracks: Vec<Arc<dyn TrackLocal + Send + Sync>>,
}

impl LocalMedia {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl fmt::Debug for LocalMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.tracks.iter().map(|t| t.id()).collect();
        f.debug_struct("LocalMedia").field("tracks", &ids).finish()
    }
}

/// Whatever produces the screen/audio content. Acquisition may prompt the user
/// and may fail; it is only attempted when sharing starts.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn acquire(&self) -> Result<LocalMedia, MediaError>;
}

/// Hands out a fixed VP8 screen track and an Opus audio track.
/// A capture pipeline outside the session writes samples into them.
pub struct StaticMediaSource {
    screen: Arc<TrackLocalStaticSample>,
    audio: Option<Arc<TrackLocalStaticSample>>,
}

impl StaticMediaSource {
    pub fn new(stream_id: &str) -> Self {
        let mut source = Self::screen_only(stream_id);
        source.audio = Some(Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            "audio".to_owned(),
            stream_id.to_owned(),
        )));
        source
    }

    pub fn screen_only(stream_id: &str) -> Self {
        let screen = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
            "screen".to_owned(),
            stream_id.to_owned(),
        ));
        Self {
            screen,
            audio: None,
        }
    }

    pub fn screen_track(&self) -> Arc<TrackLocalStaticSample> {
        Arc::clone(&self.screen)
    }

    pub fn audio_track(&self) -> Option<Arc<TrackLocalStaticSample>> {
        self.audio.clone()
    }
}

#[async_trait]
impl MediaSource for StaticMediaSource {
    async fn acquire(&self) -> Result<LocalMedia, MediaError> {
        let mut tracks: Vec<Arc<dyn TrackLocal + Send + Sync>> = Vec::with_capacity(2);
        tracks.push(self.screen.clone());
        if let Some(audio) = &self.audio {
            tracks.push(audio.clone());
        }
        Ok(LocalMedia { tracks })
    }
}
