use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use repetitious_api::data::{ItemList, ResourceSet};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::ParseError;

const USER_AGENT: &str = "repetitious-k8s-dashboard";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to build URL: {0}")]
    Url(#[from] ParseError),
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Request timed out")]
    Timeout,
}

/// Fetch the local resources published by another dashboard.
#[async_trait]
pub trait PeerSource: Send + Sync + 'static {
    async fn fetch(&self, peer: &str) -> Result<ResourceSet, Error>;
}

#[derive(Clone, Debug)]
pub struct PeerClient {
    client: reqwest::Client,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn get<T>(&self, url: Url) -> Result<Vec<T>, Error>
    where
        T: DeserializeOwned,
    {
        let list: ItemList<T> = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(list.items)
    }
}

#[async_trait]
impl PeerSource for PeerClient {
    async fn fetch(&self, peer: &str) -> Result<ResourceSet, Error> {
        let base = base_url(peer)?;

        let (deployments, pods) = futures::try_join!(
            self.get::<Deployment>(base.join("api/deployments")?),
            self.get::<Pod>(base.join("api/pods")?),
        )?;

        Ok(ResourceSet::new(deployments, pods))
    }
}

/// Turn a peer endpoint into a base URL, plain `host:port` endpoints use `http`.
///
/// The path of the result always ends with a slash, so API paths can be joined onto it.
pub fn base_url(peer: &str) -> Result<Url, ParseError> {
    let mut url = if peer.starts_with("http://") || peer.starts_with("https://") {
        Url::parse(peer)?
    } else {
        Url::parse(&format!("http://{peer}"))?
    };

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
