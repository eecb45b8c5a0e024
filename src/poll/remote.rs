use super::ticker;
use crate::config::FailurePolicy;
use crate::peer::{self, PeerSource};
use crate::snapshot::PeerPublisher;
use repetitious_api::data::ResourceSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct Settings {
    pub delay: Duration,
    pub timeout: Duration,
    pub failure_policy: FailurePolicy,
}

/// Poll a single peer, until cancelled.
///
/// Fetches never overlap: the next tick is only awaited once the previous fetch finished or
/// ran into the timeout.
pub async fn run<P>(
    source: Arc<P>,
    publisher: PeerPublisher,
    settings: Settings,
    cancel: CancellationToken,
) where
    P: PeerSource,
{
    info!(peer = publisher.peer(), "Starting remote poll loop");

    let mut ticker = ticker(settings.delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {},
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            result = fetch(source.as_ref(), publisher.peer(), settings.timeout) => {
                apply(&publisher, settings.failure_policy, result);
            }
        }
    }

    info!(peer = publisher.peer(), "Remote poll loop stopped");
}

async fn fetch<P>(source: &P, peer: &str, timeout: Duration) -> Result<ResourceSet, peer::Error>
where
    P: PeerSource,
{
    tokio::time::timeout(timeout, source.fetch(peer))
        .await
        .unwrap_or(Err(peer::Error::Timeout))
}

fn apply(
    publisher: &PeerPublisher,
    policy: FailurePolicy,
    result: Result<ResourceSet, peer::Error>,
) {
    match result {
        Ok(resources) => {
            debug!(
                peer = publisher.peer(),
                deployments = resources.deployments.len(),
                pods = resources.pods.len(),
                "Polled peer"
            );
            publisher.publish(resources);
        }
        Err(err) => {
            warn!(peer = publisher.peer(), ?policy, "Failed to poll peer: {err}");
            match policy {
                FailurePolicy::Reset => publisher.publish(ResourceSet::default()),
                // an entry shows up once the peer was polled, even if that failed
                FailurePolicy::Keep if !publisher.is_published() => {
                    publisher.publish(ResourceSet::default())
                }
                FailurePolicy::Keep => {}
            }
        }
    }
}
