use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Pod;
use std::collections::HashSet;

const SEPARATOR: &str = "-";

/// Drop pods which are represented by one of the deployments.
///
/// A pod created by a deployment carries the `generateName` of its replica set, which is the
/// deployment name plus two generated segments (`<deployment>-<hash>-`). Stripping those
/// segments gives the name prefix of the owning deployment. Pods without a `generateName` are
/// always kept, and so is everything which doesn't map onto a listed deployment.
///
/// This doesn't look at owner references, so a pod of some other controller which happens to
/// follow the same naming scheme is dropped too.
pub fn filter(pods: Vec<Pod>, deployments: &[Deployment]) -> Vec<Pod> {
    let owners = owner_prefixes(deployments);

    pods.into_iter()
        .filter(|pod| !is_owned(pod, &owners))
        .collect()
}

fn owner_prefixes(deployments: &[Deployment]) -> HashSet<String> {
    deployments
        .iter()
        .filter_map(|deployment| deployment.metadata.name.as_deref())
        .map(|name| format!("{name}{SEPARATOR}"))
        .collect()
}

fn is_owned(pod: &Pod, owners: &HashSet<String>) -> bool {
    match pod.metadata.generate_name.as_deref() {
        None | Some("") => false,
        Some(generated_from) => match controller_prefix(generated_from) {
            Some(prefix) => owners.contains(&prefix),
            None => false,
        },
    }
}

/// Strip the two trailing segments of a generated name, keeping the trailing separator.
///
/// Returns `None` if nothing is left.
fn controller_prefix(generated_from: &str) -> Option<String> {
    let segments: Vec<&str> = generated_from.split(SEPARATOR).collect();
    if segments.len() <= 2 {
        return None;
    }

    let remainder = segments[..segments.len() - 2].join(SEPARATOR);
    if remainder.is_empty() {
        return None;
    }

    Some(format!("{remainder}{SEPARATOR}"))
}
