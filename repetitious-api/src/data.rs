use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use std::collections::BTreeMap;

/// A list of objects, in the `{ "items": [...] }` shape of a cluster list response.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> From<Vec<T>> for ItemList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

/// The deployments and pods produced by one poll of one source.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSet {
    #[serde(default)]
    pub deployments: Vec<Deployment>,
    #[serde(default)]
    pub pods: Vec<Pod>,
}

impl ResourceSet {
    pub fn new(deployments: Vec<Deployment>, pods: Vec<Pod>) -> Self {
        Self { deployments, pods }
    }

    pub fn is_empty(&self) -> bool {
        self.deployments.is_empty() && self.pods.is_empty()
    }
}

/// The local resources, plus the last result of every polled peer, keyed by endpoint.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub local: ResourceSet,
    pub remotes: BTreeMap<String, ResourceSet>,
}

/// Peer results, split by kind.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResources {
    pub deployments: BTreeMap<String, ItemList<Deployment>>,
    pub pods: BTreeMap<String, ItemList<Pod>>,
}

impl From<Aggregate> for AggregatedResources {
    fn from(aggregate: Aggregate) -> Self {
        let mut result = Self::default();
        for (peer, set) in aggregate.remotes {
            result
                .deployments
                .insert(peer.clone(), ItemList::from(set.deployments));
            result.pods.insert(peer, ItemList::from(set.pods));
        }
        result
    }
}
