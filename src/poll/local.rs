use super::ticker;
use crate::cluster::{self, ClusterApi};
use crate::ownership;
use crate::snapshot::LocalPublisher;
use repetitious_api::data::ResourceSet;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct Settings {
    pub namespace: String,
    pub delay: Duration,
    pub timeout: Duration,
}

pub async fn run<C>(
    cluster: C,
    publisher: LocalPublisher,
    settings: Settings,
    cancel: CancellationToken,
) where
    C: ClusterApi,
{
    info!(namespace = %settings.namespace, "Starting local poll loop");

    let mut ticker = ticker(settings.delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {},
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            resources = poll(&cluster, &settings) => publisher.publish(resources),
        }
    }

    info!("Local poll loop stopped");
}

/// Fetch the local resources once.
///
/// A failed request yields an empty list for its kind, so a broken cluster API degrades the
/// snapshot rather than freezing it.
pub async fn poll<C>(cluster: &C, settings: &Settings) -> ResourceSet
where
    C: ClusterApi,
{
    let namespace = settings.namespace.as_str();

    let (deployments, pods) = tokio::join!(
        bounded(settings.timeout, cluster.list_deployments(namespace)),
        bounded(settings.timeout, cluster.list_pods(namespace)),
    );

    let deployments = deployments.unwrap_or_else(|err| {
        warn!(namespace, "Failed to list deployments: {err}");
        Vec::new()
    });
    let pods = pods.unwrap_or_else(|err| {
        warn!(namespace, "Failed to list pods: {err}");
        Vec::new()
    });

    let total = pods.len();
    let pods = ownership::filter(pods, &deployments);

    debug!(
        deployments = deployments.len(),
        pods = pods.len(),
        owned = total - pods.len(),
        "Polled local cluster"
    );

    ResourceSet::new(deployments, pods)
}

async fn bounded<T, F>(timeout: Duration, f: F) -> Result<T, cluster::Error>
where
    F: Future<Output = Result<T, cluster::Error>>,
{
    tokio::time::timeout(timeout, f)
        .await
        .unwrap_or(Err(cluster::Error::Timeout))
}
