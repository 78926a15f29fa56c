use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};
use tracing::{debug, error, info};

use crate::application::{feed_store::FeedStateStore, ports::SignalingPort, supervisor::StatusIndicator};
use crate::domain::{
    errors::{DomainError, DomainResult},
    status::{FeedKind, LinkEvent, TransportState},
};

/// Signals the display surface relays about its media session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VideoEvent {
    Transport(TransportState),
    /// First decodable frames are on screen.
    MediaPlaying,
}

/// Owns the video indicator for one offer/answer session.
pub struct VideoSupervisor {
    indicator: StatusIndicator,
}

impl VideoSupervisor {
    pub fn new(store: Arc<FeedStateStore>) -> Self {
        Self { indicator: StatusIndicator::claim(FeedKind::Video, store) }
    }

    /// Any negotiation failure is terminal for the video feed only.
    pub fn negotiation_failed(&self, err: &DomainError) {
        error!("Video negotiation failed: {}", err);
        self.indicator.apply(LinkEvent::Failed);
    }

    pub fn handle(&self, event: VideoEvent) {
        let link = match event {
            // Optimistic: playback proves the path works even before the transport says so.
            VideoEvent::MediaPlaying => Some(LinkEvent::Up),
            VideoEvent::Transport(state) => {
                info!("Video transport state: {:?}", state);
                state.link_event()
            }
        };
        if let Some(link) = link {
            self.indicator.apply(link);
        }
    }

    /// The display surface carrying this session went away.
    pub fn close(&self) {
        self.indicator.apply(LinkEvent::Down);
    }
}

/// Token for one offer; every later event from that display surface carries it.
pub type SessionId = u64;

struct Session {
    id: SessionId,
    supervisor: VideoSupervisor,
}

/// Single owner of the video indicator across all display surfaces.
///
/// The most recent offer holds the live session. Events tagged with an older
/// session id are stale and never reach the indicator.
pub struct VideoSessions {
    store: Arc<FeedStateStore>,
    signaling: Arc<dyn SignalingPort>,
    next_id: AtomicU64,
    current: Mutex<Option<Session>>,
}

impl VideoSessions {
    pub fn new(store: Arc<FeedStateStore>, signaling: Arc<dyn SignalingPort>) -> Self {
        Self { store, signaling, next_id: AtomicU64::new(0), current: Mutex::new(None) }
    }

    fn current(&self) -> MutexGuard<'_, Option<Session>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `f` to the live session's supervisor if `id` is still live.
    fn with_live(&self, id: SessionId, f: impl FnOnce(&VideoSupervisor)) -> bool {
        match &*self.current() {
            Some(session) if session.id == id => {
                f(&session.supervisor);
                true
            }
            _ => false,
        }
    }

    /// Opens a session for `offer_sdp`, superseding the previous one, and
    /// returns its id together with the remote answer.
    pub async fn offer(&self, offer_sdp: &str) -> (SessionId, DomainResult<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let session = Session { id, supervisor: VideoSupervisor::new(self.store.clone()) };
        if let Some(old) = self.current().replace(session) {
            info!("Video session {} superseded by {}", old.id, id);
        }

        let result = self.signaling.exchange(offer_sdp).await;
        match &result {
            Ok(answer) => info!("📡 Video answer received for session {} ({} bytes)", id, answer.len()),
            Err(e) => {
                if !self.with_live(id, |sup| sup.negotiation_failed(e)) {
                    debug!("Negotiation of superseded session {} failed: {}", id, e);
                }
            }
        }
        (id, result)
    }

    pub fn is_live(&self, id: SessionId) -> bool {
        self.current().as_ref().is_some_and(|s| s.id == id)
    }

    pub fn handle(&self, id: SessionId, event: VideoEvent) {
        if !self.with_live(id, |sup| sup.handle(event)) {
            debug!("{:?} from superseded video session {} ignored", event, id);
        }
    }

    /// Ends session `id` if it is still live. Older sessions are already gone.
    pub fn release(&self, id: SessionId) {
        let mut current = self.current();
        match current.take() {
            Some(session) if session.id == id => {
                info!("Video session {} ended with its display surface", id);
                session.supervisor.close();
            }
            other => *current = other,
        }
    }
}
