use parking_lot::RwLock;
use repetitious_api::data::ResourceSet;
use std::collections::HashMap;
use std::sync::Arc;

/// The most recent local and peer resource sets.
///
/// Every entry is held as an `Arc<ResourceSet>` and replaced as a whole, so a reader either
/// sees the previous or the new set of an entry, never a mix of both. Writing is only possible
/// through a [`LocalPublisher`] or a [`PeerPublisher`].
#[derive(Clone, Default)]
pub struct Snapshot {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    /// the local cluster
    local: RwLock<Arc<ResourceSet>>,

    /// peers, by their configured endpoint
    ///
    /// A peer only shows up once it was polled.
    remotes: RwLock<HashMap<String, Arc<ResourceSet>>>,
}

impl Snapshot {
    /// Create an empty snapshot, and the only handle which can write the local entry.
    pub fn new() -> (Self, LocalPublisher) {
        let snapshot = Self::default();
        let publisher = LocalPublisher {
            inner: snapshot.inner.clone(),
        };
        (snapshot, publisher)
    }

    /// Create the handle writing the entry of a peer.
    pub fn peer_publisher(&self, peer: impl Into<String>) -> PeerPublisher {
        PeerPublisher {
            peer: peer.into(),
            inner: self.inner.clone(),
        }
    }

    pub fn local(&self) -> Arc<ResourceSet> {
        self.inner.local.read().clone()
    }

    pub fn remote(&self, peer: &str) -> Option<Arc<ResourceSet>> {
        self.inner.remotes.read().get(peer).cloned()
    }

    /// A shallow copy of all peer entries.
    pub fn remotes(&self) -> HashMap<String, Arc<ResourceSet>> {
        self.inner.remotes.read().clone()
    }
}

pub struct LocalPublisher {
    inner: Arc<Inner>,
}

impl LocalPublisher {
    pub fn publish(&self, resources: ResourceSet) {
        let resources = Arc::new(resources);
        *self.inner.local.write() = resources;
    }
}

pub struct PeerPublisher {
    peer: String,
    inner: Arc<Inner>,
}

impl PeerPublisher {
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// If this peer has an entry yet.
    pub fn is_published(&self) -> bool {
        self.inner.remotes.read().contains_key(&self.peer)
    }

    pub fn publish(&self, resources: ResourceSet) {
        let resources = Arc::new(resources);
        self.inner
            .remotes
            .write()
            .insert(self.peer.clone(), resources);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::Deployment;
    use k8s_openapi::api::core::v1::Pod;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn meta(name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// A set where every object carries the same generation name.
    fn generation(name: &str, size: usize) -> ResourceSet {
        ResourceSet::new(
            (0..size)
                .map(|_| Deployment {
                    metadata: meta(name),
                    ..Default::default()
                })
                .collect(),
            (0..size)
                .map(|_| Pod {
                    metadata: meta(name),
                    ..Default::default()
                })
                .collect(),
        )
    }

    fn generation_of(set: &ResourceSet) -> Option<&str> {
        let mut names = set
            .deployments
            .iter()
            .map(|d| d.metadata.name.as_deref())
            .chain(set.pods.iter().map(|p| p.metadata.name.as_deref()));
        let first = names.next()?;
        assert!(names.all(|n| n == first), "torn resource set");
        first
    }

    #[test]
    fn starts_empty() {
        let (snapshot, _local) = Snapshot::new();
        assert!(snapshot.local().is_empty());
        assert!(snapshot.remotes().is_empty());
        assert!(snapshot.remote("a:3000").is_none());
    }

    #[test]
    fn publish_replaces_entries() {
        let (snapshot, local) = Snapshot::new();
        let a = snapshot.peer_publisher("a:3000");
        let b = snapshot.peer_publisher("b:3000");

        local.publish(generation("local", 1));
        a.publish(generation("a1", 2));
        b.publish(generation("b1", 1));
        a.publish(generation("a2", 1));

        assert_eq!(generation_of(&snapshot.local()), Some("local"));
        assert_eq!(generation_of(&snapshot.remote("a:3000").unwrap()), Some("a2"));
        assert_eq!(snapshot.remote("a:3000").unwrap().deployments.len(), 1);
        assert_eq!(generation_of(&snapshot.remote("b:3000").unwrap()), Some("b1"));
        assert_eq!(snapshot.remotes().len(), 2);
        assert!(a.is_published());
        assert!(!snapshot.peer_publisher("c:3000").is_published());
    }

    #[test]
    fn readers_keep_their_copy() {
        let (snapshot, _local) = Snapshot::new();
        let peer = snapshot.peer_publisher("a:3000");

        peer.publish(generation("old", 1));
        let remotes = snapshot.remotes();
        peer.publish(generation("new", 1));

        assert_eq!(generation_of(&remotes["a:3000"]), Some("old"));
        assert_eq!(generation_of(&snapshot.remote("a:3000").unwrap()), Some("new"));
    }

    #[test]
    fn concurrent_readers_never_see_torn_sets() {
        let (snapshot, local) = Snapshot::new();
        let peer = snapshot.peer_publisher("a:3000");
        let sets = [generation("even", 50), generation("odd", 50)];

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..2_000 {
                    peer.publish(sets[i % 2].clone());
                    local.publish(sets[(i + 1) % 2].clone());
                }
            });

            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..2_000 {
                        if let Some(set) = snapshot.remote("a:3000") {
                            generation_of(&set);
                        }
                        for set in snapshot.remotes().values() {
                            generation_of(set);
                        }
                        generation_of(&snapshot.local());
                    }
                });
            }
        });
    }
}
