use crate::capability::{PeerConnector, Role, SessionEvents};
use crate::error::ConnectorError;
use crate::transport::{ConnectorConfig, LocalTracks};
use anyhow::{Context, Result};
use async_trait::async_trait;
use meshroom_core::{IceServerConfig, PeerId};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::setting_engine::SettingEngine;
use webrtc::api::{API, APIBuilder};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::signaling_state::RTCSignalingState;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_remote::TrackRemote;

/// Tracks received from one remote member.
#[derive(Clone, Default)]
pub struct RemoteMedia {
    tracks: Arc<Mutex<Vec<Arc<TrackRemote>>>>,
}

impl RemoteMedia {
    pub async fn tracks(&self) -> Vec<Arc<TrackRemote>> {
        self.tracks.lock().await.clone()
    }

    async fn push(&self, track: Arc<TrackRemote>) {
        self.tracks.lock().await.push(track);
    }
}

impl fmt::Debug for RemoteMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteMedia").finish_non_exhaustive()
    }
}

pub struct WebRtcSession {
    peer_connection: Arc<RTCPeerConnection>,
    events: SessionEvents<RemoteMedia>,
}

/// [`PeerConnector`] over webrtc-rs.
///
/// Negotiation is non-trickle: each side waits for candidate gathering and
/// sends its complete session description as a single signal payload, so a
/// pair exchanges exactly one offer and one answer.
pub struct WebRtcConnector {
    api: API,
    ice_servers: RwLock<Vec<IceServerConfig>>,
    gathering_timeout: Duration,
}

impl WebRtcConnector {
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let mut settings = SettingEngine::default();
        settings.set_include_loopback_candidate(config.include_loopback);

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .with_setting_engine(settings)
            .build();

        Ok(Self {
            api,
            ice_servers: RwLock::new(config.ice_servers),
            gathering_timeout: config.gathering_timeout,
        })
    }

    fn rtc_configuration(&self) -> RTCConfiguration {
        let servers = self
            .ice_servers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        RTCConfiguration {
            ice_servers: servers
                .iter()
                .map(|s| RTCIceServer {
                    urls: s.urls.clone(),
                    username: s.username.clone().unwrap_or_default(),
                    credential: s.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn spawn_local_description(&self, session: &WebRtcSession, offer: bool) {
        let pc = session.peer_connection.clone();
        let events = session.events.clone();
        let timeout = self.gathering_timeout;

        tokio::spawn(async move {
            if let Err(e) = send_local_description(&pc, &events, offer, timeout).await {
                events.failed(format!("{:#}", e));
            }
        });
    }
}

/// Create our side's description, wait for gathering, then ship the result.
async fn send_local_description(
    pc: &RTCPeerConnection,
    events: &SessionEvents<RemoteMedia>,
    offer: bool,
    timeout: Duration,
) -> Result<()> {
    let description = if offer {
        pc.create_offer(None).await?
    } else {
        pc.create_answer(None).await?
    };

    let mut gathered = pc.gathering_complete_promise().await;
    pc.set_local_description(description).await?;
    if tokio::time::timeout(timeout, gathered.recv()).await.is_err() {
        warn!(remote = %events.remote(), "ICE gathering timed out, sending partial candidates");
    }

    let local = pc
        .local_description()
        .await
        .context("Local description missing after gathering")?;
    events.outbound(serde_json::to_value(&local)?);
    Ok(())
}

#[async_trait]
impl PeerConnector for WebRtcConnector {
    type LocalStream = LocalTracks;
    type RemoteStream = RemoteMedia;
    type Session = WebRtcSession;

    async fn create(
        &self,
        remote: PeerId,
        role: Role,
        local: &LocalTracks,
        events: SessionEvents<RemoteMedia>,
    ) -> Result<WebRtcSession, ConnectorError> {
        let peer_connection = Arc::new(self.api.new_peer_connection(self.rtc_configuration()).await?);

        for track in local.tracks() {
            peer_connection.add_track(track).await?;
        }

        let remote_media = RemoteMedia::default();

        let track_media = remote_media.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let media = track_media.clone();
                Box::pin(async move {
                    debug!(%remote, kind = %track.kind(), "Remote track received");
                    media.push(track).await;
                })
            },
        ));

        let state_events = events.clone();
        let state_media = remote_media.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let events = state_events.clone();
                let media = state_media.clone();

                Box::pin(async move {
                    info!(%remote, "Peer connection state changed: {}", s);
                    match s {
                        RTCPeerConnectionState::Connected => events.remote_stream(media),
                        RTCPeerConnectionState::Failed => {
                            events.failed("peer connection failed")
                        }
                        _ => {}
                    }
                })
            },
        ));

        let signaling_events = events.clone();
        peer_connection.on_signaling_state_change(Box::new(move |s: RTCSignalingState| {
            let events = signaling_events.clone();

            Box::pin(async move {
                debug!(%remote, "Signaling state changed: {}", s);
                match s {
                    RTCSignalingState::HaveLocalOffer | RTCSignalingState::HaveRemoteOffer => {
                        events.ready_for_signal(true)
                    }
                    RTCSignalingState::Stable => events.ready_for_signal(false),
                    _ => {}
                }
            })
        }));

        let session = WebRtcSession {
            peer_connection,
            events,
        };
        if role == Role::Initiator {
            self.spawn_local_description(&session, true);
        }
        Ok(session)
    }

    async fn feed(&self, session: &mut WebRtcSession, payload: Value) -> Result<(), ConnectorError> {
        let description: RTCSessionDescription = serde_json::from_value(payload)?;
        let is_offer = match description.sdp_type {
            RTCSdpType::Offer => true,
            RTCSdpType::Answer => false,
            other => {
                return Err(ConnectorError::Rejected(format!(
                    "unsupported description type {}",
                    other
                )));
            }
        };

        session
            .peer_connection
            .set_remote_description(description)
            .await?;
        if is_offer {
            self.spawn_local_description(session, false);
        }
        Ok(())
    }

    async fn destroy(&self, session: WebRtcSession) {
        if let Err(e) = session.peer_connection.close().await {
            warn!(remote = %session.events.remote(), "Failed to close peer connection: {}", e);
        }
    }

    fn set_ice_servers(&self, servers: &[IceServerConfig]) {
        if servers.is_empty() {
            return;
        }
        let mut current = self
            .ice_servers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = servers.to_vec();
    }
}
