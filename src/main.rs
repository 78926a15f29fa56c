mod adapters;
mod application;
mod domain;

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

use crate::adapters::{
    feeds::ws_channel::WsMessageChannel,
    http::{router, state::HttpState},
    remote::{config_client::HttpConfigSource, whep::WhepSignaling},
};
use crate::application::{
    feed_store::FeedStateStore,
    mapper::CoordinateMapper,
    render::RenderLoop,
    services::{load_config, FeedLauncher},
    supervisor::{DetectionPayload, SensorPayload},
    surface::SurfaceContext,
    video::VideoSessions,
};

/// Observer daemon: keeps the overlay in register with the video for every display surface.
#[derive(Debug, Parser)]
#[command(name = "observer", version, about)]
struct Args {
    /// Address the display surface and status API listen on.
    #[arg(long, env = "OBSERVER_LISTEN", default_value = "0.0.0.0:8090")]
    listen: String,

    /// Where the feed locations are fetched from.
    #[arg(long, env = "OBSERVER_CONFIG_URL", default_value = "http://localhost:8000/config")]
    config_url: String,

    /// Port of the media server's WHEP endpoint.
    #[arg(long, default_value_t = 8889)]
    video_port: u16,

    /// Overlay repaint rate.
    #[arg(long, default_value_t = 60)]
    refresh_hz: u32,

    /// Reopen a feed this many seconds after it ends. Off by default.
    #[arg(long)]
    reconnect_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logs (RUST_LOG=info by default)
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    tracing::info!("🔧 Starting observer with {:?}", args);

    // 2. Feed locations; never fatal
    let config = load_config(&HttpConfigSource::new(&args.config_url)).await;
    let endpoints = config.endpoints(args.video_port);
    tracing::info!("📍 Feeds: {:?}", endpoints);

    // 3. Shared core: store, mapper, render loop
    let store = Arc::new(FeedStateStore::new());
    let mapper = Arc::new(CoordinateMapper::new());
    let playing = Arc::new(watch::Sender::new(false));
    let (frames, _) = broadcast::channel(8);

    tokio::spawn(
        RenderLoop::new(store.clone(), mapper.subscribe(), playing.subscribe(), frames.clone(), args.refresh_hz)
            .run(),
    );

    // 4. Message feeds, each under its own supervisor
    let launcher = FeedLauncher::new(
        Arc::new(WsMessageChannel::new()),
        store.clone(),
        args.reconnect_secs.map(Duration::from_secs),
    );
    launcher.spawn(endpoints.detections_ws.clone(), DetectionPayload);
    launcher.spawn(endpoints.sensors_ws.clone(), SensorPayload);

    // 5. Display surfaces and status API
    let state = HttpState {
        surface: SurfaceContext {
            video: Arc::new(VideoSessions::new(
                store.clone(),
                Arc::new(WhepSignaling::new(endpoints.video_whep.clone())),
            )),
            store,
            mapper,
            playing,
        },
        frames,
        config,
        endpoints,
    };
    let app = router(state);

    tracing::info!("🚀 Observer listening on http://{}", args.listen);
    tracing::info!("🖥️ Display surfaces connect to ws://{}/ws/surface", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown requested");
        })
        .await?;

    Ok(())
}
