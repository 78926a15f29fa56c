use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    application::{
        feed_store::FeedStateStore,
        ports::{ConfigSourcePort, MessageChannelPort},
        supervisor::{ChannelSupervisor, PayloadHandler},
    },
    domain::{config::ObserverConfig, status::ConnectionStatus},
};

/// Asks the config collaborator once. Startup never fails on config: any error
/// falls back to the documented localhost defaults.
pub async fn load_config(source: &dyn ConfigSourcePort) -> ObserverConfig {
    match source.fetch().await {
        Ok(cfg) => {
            info!("⚙️ Config loaded: {:?}", cfg);
            cfg
        }
        Err(e) => {
            let fallback = ObserverConfig::fallback();
            warn!("Could not fetch config ({}), using fallback {:?}", e, fallback);
            fallback
        }
    }
}

/// Opens message channels and hands each one to a fresh supervisor.
#[derive(Clone)]
pub struct FeedLauncher {
    channel: Arc<dyn MessageChannelPort>,
    store: Arc<FeedStateStore>,
    /// Delay before reopening a channel whose supervisor ended. `None` keeps
    /// the terminal status on screen forever.
    retry: Option<Duration>,
}

impl FeedLauncher {
    pub fn new(channel: Arc<dyn MessageChannelPort>, store: Arc<FeedStateStore>, retry: Option<Duration>) -> Self {
        Self { channel, store, retry }
    }

    /// Supervises `url` until its channel ends, reopening it when a retry delay is set.
    pub async fn supervise<H>(&self, url: String, handler: H) -> ConnectionStatus
    where
        H: PayloadHandler + Clone,
    {
        loop {
            let feed = handler.feed();
            info!("🔌 Opening {} feed at {}", feed.indicator_prefix(), url);
            let supervisor = ChannelSupervisor::new(handler.clone(), self.store.clone());
            let events = self.channel.open(&url).await;
            let end = supervisor.run(events).await;

            let Some(delay) = self.retry else { return end };
            info!("{} feed ended as {}, reopening in {:?}", feed.indicator_prefix(), end, delay);
            tokio::time::sleep(delay).await;
        }
    }

    pub fn spawn<H>(&self, url: String, handler: H) -> JoinHandle<ConnectionStatus>
    where
        H: PayloadHandler + Clone + 'static,
    {
        let launcher = self.clone();
        tokio::spawn(async move { launcher.supervise(url, handler).await })
    }
}
