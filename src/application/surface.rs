use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::application::{
    dto::SurfaceInbound,
    feed_store::FeedStateStore,
    mapper::CoordinateMapper,
    video::{SessionId, VideoEvent, VideoSessions},
};
use crate::domain::errors::DomainResult;

/// Shared by every display surface connection.
#[derive(Clone)]
pub struct SurfaceContext {
    pub store: Arc<FeedStateStore>,
    pub mapper: Arc<CoordinateMapper>,
    /// Sole writer of the video indicator; the latest offer owns it.
    pub video: Arc<VideoSessions>,
    /// Flipped once when the video first shows frames; starts the render loop.
    pub playing: Arc<watch::Sender<bool>>,
}

/// Turns one display surface's messages into video supervision and geometry updates.
/// Only the surface holding the live video session may move the overlay geometry.
pub struct SurfaceController {
    ctx: SurfaceContext,
    session: Option<SessionId>,
}

impl SurfaceController {
    pub fn new(ctx: SurfaceContext) -> Self {
        Self { ctx, session: None }
    }

    fn live_session(&self) -> Option<SessionId> {
        match self.session {
            Some(id) if self.ctx.video.is_live(id) => Some(id),
            Some(id) => {
                debug!("Surface of superseded video session {} ignored", id);
                None
            }
            None => {
                debug!("Surface without a video session ignored");
                None
            }
        }
    }

    /// Returns the negotiation outcome when the message was an offer.
    pub async fn handle(&mut self, msg: SurfaceInbound) -> Option<DomainResult<String>> {
        match msg {
            SurfaceInbound::Offer { sdp } => {
                let (id, answer) = self.ctx.video.offer(&sdp).await;
                self.session = Some(id);
                return Some(answer);
            }
            SurfaceInbound::Ice { state } => match self.session {
                Some(id) => self.ctx.video.handle(id, VideoEvent::Transport(state)),
                None => debug!("Transport state {:?} before any offer, ignored", state),
            },
            SurfaceInbound::Playing { width, height } => {
                let Some(id) = self.live_session() else { return None };
                self.ctx.mapper.recompute(width, height);
                self.ctx.video.handle(id, VideoEvent::MediaPlaying);
                let started = self.ctx.playing.send_if_modified(|p| !std::mem::replace(p, true));
                if started {
                    info!("▶️ First video frames on screen ({}x{})", width, height);
                }
            }
            SurfaceInbound::Metadata { width, height } | SurfaceInbound::Resize { width, height } => {
                if self.live_session().is_some() {
                    self.ctx.mapper.recompute(width, height);
                }
            }
        }
        None
    }
}

impl Drop for SurfaceController {
    fn drop(&mut self) {
        if let Some(id) = self.session.take() {
            self.ctx.video.release(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SignalingPort;
    use crate::domain::errors::DomainError;
    use crate::domain::geometry::RenderScale;
    use crate::domain::status::{ConnectionStatus, FeedKind, TransportState};
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl SignalingPort for Echo {
        async fn exchange(&self, offer_sdp: &str) -> DomainResult<String> {
            Ok(offer_sdp.replace("offer", "answer"))
        }
    }

    struct Down;

    #[async_trait]
    impl SignalingPort for Down {
        async fn exchange(&self, _offer_sdp: &str) -> DomainResult<String> {
            Err(DomainError::Transport("connection refused".into()))
        }
    }

    fn context(signaling: Arc<dyn SignalingPort>) -> SurfaceContext {
        let store = Arc::new(FeedStateStore::new());
        SurfaceContext {
            video: Arc::new(VideoSessions::new(store.clone(), signaling)),
            store,
            mapper: Arc::new(CoordinateMapper::new()),
            playing: Arc::new(watch::Sender::new(false)),
        }
    }

    fn video(ctx: &SurfaceContext) -> ConnectionStatus {
        ctx.store.status(FeedKind::Video)
    }

    #[tokio::test]
    async fn full_session() {
        let ctx = context(Arc::new(Echo));
        let mut playing = ctx.playing.subscribe();
        let mut surface = SurfaceController::new(ctx.clone());

        let answer = surface.handle(SurfaceInbound::Offer { sdp: "offer-sdp".into() }).await;
        assert_eq!(answer.unwrap().unwrap(), "answer-sdp");

        surface.handle(SurfaceInbound::Metadata { width: 1280.0, height: 1080.0 }).await;
        assert!(!*playing.borrow_and_update());
        assert_eq!(ctx.mapper.current().scale, Some(RenderScale { scale_x: 1.0, scale_y: 1.0 }));

        surface.handle(SurfaceInbound::Playing { width: 1280.0, height: 1080.0 }).await;
        assert!(*playing.borrow_and_update());
        assert_eq!(video(&ctx), ConnectionStatus::Connected);

        surface.handle(SurfaceInbound::Ice { state: TransportState::Checking }).await;
        surface.handle(SurfaceInbound::Ice { state: TransportState::Connected }).await;
        assert_eq!(video(&ctx), ConnectionStatus::Connected);

        surface.handle(SurfaceInbound::Resize { width: 640.0, height: 540.0 }).await;
        assert_eq!(ctx.mapper.current().scale, Some(RenderScale { scale_x: 0.5, scale_y: 0.5 }));
    }

    #[tokio::test]
    async fn failed_offer_marks_video_failed() {
        let ctx = context(Arc::new(Down));
        let mut surface = SurfaceController::new(ctx.clone());
        let answer = surface.handle(SurfaceInbound::Offer { sdp: "offer".into() }).await;
        assert!(matches!(answer, Some(Err(DomainError::Transport(_)))));
        assert_eq!(video(&ctx), ConnectionStatus::Failed);
        assert_eq!(ctx.store.status(FeedKind::Detections), ConnectionStatus::Connecting);

        drop(surface);
        assert_eq!(video(&ctx), ConnectionStatus::Failed);
    }

    #[tokio::test]
    async fn messages_without_offer_are_ignored() {
        let ctx = context(Arc::new(Echo));
        let mut surface = SurfaceController::new(ctx.clone());
        surface.handle(SurfaceInbound::Ice { state: TransportState::Connected }).await;
        surface.handle(SurfaceInbound::Playing { width: 640.0, height: 540.0 }).await;
        assert_eq!(video(&ctx), ConnectionStatus::Connecting);
        assert!(!*ctx.playing.borrow());
        assert!(ctx.mapper.current().scale.is_none());
    }

    #[tokio::test]
    async fn closing_the_surface_disconnects_video() {
        let ctx = context(Arc::new(Echo));
        let mut surface = SurfaceController::new(ctx.clone());
        surface.handle(SurfaceInbound::Offer { sdp: "offer".into() }).await;
        surface.handle(SurfaceInbound::Playing { width: 1280.0, height: 1080.0 }).await;
        assert_eq!(video(&ctx), ConnectionStatus::Connected);

        drop(surface);
        assert_eq!(video(&ctx), ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn newest_surface_owns_video_and_geometry() {
        let ctx = context(Arc::new(Echo));
        let mut first = SurfaceController::new(ctx.clone());
        let mut second = SurfaceController::new(ctx.clone());

        first.handle(SurfaceInbound::Offer { sdp: "offer".into() }).await;
        first.handle(SurfaceInbound::Playing { width: 1280.0, height: 1080.0 }).await;
        assert_eq!(video(&ctx), ConnectionStatus::Connected);

        second.handle(SurfaceInbound::Offer { sdp: "offer".into() }).await;
        assert_eq!(video(&ctx), ConnectionStatus::Connecting);
        second.handle(SurfaceInbound::Playing { width: 640.0, height: 540.0 }).await;
        assert_eq!(video(&ctx), ConnectionStatus::Connected);

        // The superseded surface can neither move the indicator nor the overlay.
        first.handle(SurfaceInbound::Ice { state: TransportState::Disconnected }).await;
        first.handle(SurfaceInbound::Resize { width: 320.0, height: 270.0 }).await;
        assert_eq!(video(&ctx), ConnectionStatus::Connected);
        assert_eq!(ctx.mapper.current().scale, Some(RenderScale { scale_x: 0.5, scale_y: 0.5 }));

        drop(first);
        assert_eq!(video(&ctx), ConnectionStatus::Connected);

        drop(second);
        assert_eq!(video(&ctx), ConnectionStatus::Disconnected);
    }
}
