mod local;
mod remote;

use crate::cluster::ClusterApi;
use crate::config::PollConfig;
use crate::peer::PeerSource;
use crate::snapshot::{LocalPublisher, Snapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// The running poll loops.
///
/// Dropping this stops the loops, [`Pollers::shutdown`] also waits for them to end.
pub struct Pollers {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

/// Spawn the local poll loop, and one loop for every configured peer.
pub fn start<C, P>(
    config: &PollConfig,
    cluster: C,
    peers: P,
    snapshot: &Snapshot,
    local: LocalPublisher,
) -> Pollers
where
    C: ClusterApi,
    P: PeerSource,
{
    let cancel = CancellationToken::new();
    let mut tasks = Vec::with_capacity(config.remotes.len() + 1);

    tasks.push(tokio::spawn(local::run(
        cluster,
        local,
        local::Settings {
            namespace: config.namespace.clone(),
            delay: config.local_delay,
            timeout: config.local_timeout,
        },
        cancel.child_token(),
    )));

    let peers = Arc::new(peers);
    for remote in &config.remotes {
        tasks.push(tokio::spawn(remote::run(
            peers.clone(),
            snapshot.peer_publisher(remote.clone()),
            remote::Settings {
                delay: config.remote_delay,
                timeout: config.remote_timeout,
                failure_policy: config.failure_policy,
            },
            cancel.child_token(),
        )));
    }

    info!("Started {} poll loop(s)", tasks.len());

    Pollers { cancel, tasks }
}

impl Pollers {
    /// Stop all loops, and wait for them to finish.
    ///
    /// Nothing gets published once this returns.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            if let Err(err) = task.await {
                warn!("Poll loop failed: {err}");
            }
        }
        info!("Poll loops stopped");
    }
}

impl Drop for Pollers {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// A ticker firing right away, and then every `delay`, counted from the end of the last poll.
fn ticker(delay: Duration) -> Interval {
    let mut interval = tokio::time::interval(delay);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
