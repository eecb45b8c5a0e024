mod cluster;
mod config;
mod ownership;
mod peer;
mod poll;
mod query;
mod server;
mod snapshot;

use crate::cluster::obtain_cluster_access;
use crate::config::Config;
use crate::peer::PeerClient;
use crate::query::QueryService;
use crate::server::ServerConfig;
use crate::snapshot::Snapshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    // without the local cluster there is nothing to serve
    let cluster = obtain_cluster_access().await?;
    let peers = PeerClient::new(config.poll.remote_timeout)?;

    info!(remotes = ?config.poll.remotes, "Polling peers");

    let (snapshot, local) = Snapshot::new();
    let pollers = poll::start(&config.poll, cluster, peers, &snapshot, local);

    // server

    info!("Binding to {}", config.bind_addr);

    let server_config = ServerConfig {
        bind_addr: config.bind_addr,
    };

    let result = server::run(server_config, QueryService::new(snapshot)).await;

    pollers.shutdown().await;

    result
}
