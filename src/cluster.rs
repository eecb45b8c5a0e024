use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::NamespaceResourceScope;
use kube::api::ListParams;
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
    #[error("Request to the Kubernetes API timed out")]
    Timeout,
}

/// Read access to the workloads of a cluster.
///
/// An empty namespace means all namespaces.
#[async_trait]
pub trait ClusterApi: Send + Sync + 'static {
    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>, Error>;

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, Error>;
}

#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
}

/// Connect to the cluster we are running in, or the one of the local kubeconfig.
pub async fn obtain_cluster_access() -> Result<KubeCluster, Error> {
    let client = Client::try_default().await?;
    info!(
        "Using cluster, default namespace: {}",
        client.default_namespace()
    );
    Ok(KubeCluster::new(client))
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn list<K>(&self, namespace: &str) -> Result<Vec<K>, Error>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug,
    {
        let api: Api<K> = match namespace {
            "" => Api::all(self.client.clone()),
            namespace => Api::namespaced(self.client.clone(), namespace),
        };

        let list = api.list(&ListParams::default()).await?;
        debug!(
            kind = %K::kind(&()),
            namespace,
            "Listed {} object(s)",
            list.items.len()
        );

        Ok(list.items)
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>, Error> {
        self.list(namespace).await
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, Error> {
        self.list(namespace).await
    }
}
