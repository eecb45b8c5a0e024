use crate::snapshot::Snapshot;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use repetitious_api::data::{Aggregate, AggregatedResources, ItemList, ResourceSet};

/// Read-only access to the snapshot.
///
/// Nothing in here fails: a source which wasn't polled yet is an empty set, or a missing
/// peer entry.
#[derive(Clone)]
pub struct QueryService {
    snapshot: Snapshot,
}

impl QueryService {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn get_local(&self) -> ResourceSet {
        self.snapshot.local().as_ref().clone()
    }

    pub fn get_local_deployments(&self) -> ItemList<Deployment> {
        self.snapshot.local().deployments.clone().into()
    }

    pub fn get_local_pods(&self) -> ItemList<Pod> {
        self.snapshot.local().pods.clone().into()
    }

    pub fn get_aggregate(&self) -> Aggregate {
        // grab both entries first, the copies below don't hold any lock
        let local = self.snapshot.local();
        let remotes = self.snapshot.remotes();

        Aggregate {
            local: local.as_ref().clone(),
            remotes: remotes
                .into_iter()
                .map(|(peer, set)| (peer, set.as_ref().clone()))
                .collect(),
        }
    }

    pub fn get_aggregated_resources(&self) -> AggregatedResources {
        self.get_aggregate().into()
    }
}
