use indexmap::IndexMap;
use rand::Rng;

use crate::gs_interface::{Edge, GossipError, GossipResult, NodeId, DEFAULT_VIEW_SIZE};
use crate::gs_mst;

// ============================================================================
// Configuration
// ============================================================================

/// How a service finds its own entry inside the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfAddressing {
    /// Whatever entry comes first in the view. After an exchange that is the
    /// youngest entry, which is not necessarily the local node.
    #[default]
    FirstEntry,

    /// The entry keyed by the id given at construction; once it is evicted
    /// the service has no self entry.
    Pinned,
}

/// Configuration for a peer sampling service
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct PeerSamplingConfig {
    /// Maximum number of entries kept after an exchange (default: 30)
    pub max_size: usize,

    /// Self lookup rule (default: FirstEntry)
    pub self_addressing: SelfAddressing,
}

impl Default for PeerSamplingConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_VIEW_SIZE,
            self_addressing: SelfAddressing::FirstEntry,
        }
    }
}

// ============================================================================
// Partial View
// ============================================================================

/// One known peer as seen from a partial view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerNode {
    pub id: NodeId,
    pub informed: bool,
    /// Exchanges since this entry was received
    pub age: u32,
}

/// Bounded set of known peers, in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct PartialView {
    peers: IndexMap<NodeId, PeerNode>,
    max_size: usize,
}

impl PartialView {
    pub fn peers(&self) -> impl Iterator<Item = &PeerNode> {
        self.peers.values()
    }

    pub fn get(&self, id: &str) -> Option<&PeerNode> {
        self.peers.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.peers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

// ============================================================================
// Peer Sampling Service
// ============================================================================

/// One node's gossip-maintained partial view of the network.
///
/// Views only change through [`exchange_views`](Self::exchange_views) and
/// [`update_informed`](Self::update_informed). Entries received from another
/// view are copied, so services never share state.
#[derive(Debug, Clone)]
pub struct PeerSamplingService {
    local_id: NodeId,
    view: PartialView,
    self_addressing: SelfAddressing,
}

impl PeerSamplingService {
    /// Create a service with the default view size
    pub fn new(id: impl Into<NodeId>, informed: bool) -> GossipResult<Self> {
        Self::with_config(id, informed, PeerSamplingConfig::default())
    }

    pub fn with_max_size(id: impl Into<NodeId>, informed: bool, max_size: usize) -> GossipResult<Self> {
        Self::with_config(
            id,
            informed,
            PeerSamplingConfig {
                max_size,
                ..Default::default()
            },
        )
    }

    /// Create a service whose view holds just the local node, at age 0
    pub fn with_config(
        id: impl Into<NodeId>,
        informed: bool,
        config: PeerSamplingConfig,
    ) -> GossipResult<Self> {
        if config.max_size == 0 {
            return Err(GossipError::invalid("max_size", "must be greater than zero"));
        }

        let id = id.into();
        let mut peers = IndexMap::new();
        peers.insert(
            id.clone(),
            PeerNode {
                id: id.clone(),
                informed,
                age: 0,
            },
        );

        Ok(Self {
            local_id: id,
            view: PartialView {
                peers,
                max_size: config.max_size,
            },
            self_addressing: config.self_addressing,
        })
    }

    pub fn local_id(&self) -> &NodeId {
        &self.local_id
    }

    /// Borrow the current view, e.g. to hand it to another service's exchange
    pub fn partial_view(&self) -> &PartialView {
        &self.view
    }

    /// Uniformly random entry of the current view, or `None` if nothing but a
    /// single entry is known. The local node's own entry can be returned.
    pub fn select_peer<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PeerNode> {
        if self.view.peers.len() <= 1 {
            return None;
        }
        let index = rng.gen_range(0..self.view.peers.len());
        self.view.peers.get_index(index).map(|(_, peer)| peer.clone())
    }

    /// Merge another view into ours.
    ///
    /// Ages our entries, adds unknown remote entries at their reported age
    /// (known ids keep the local copy), then keeps the `max_size` youngest.
    pub fn exchange_views(&mut self, other: &PartialView) {
        for peer in self.view.peers.values_mut() {
            peer.age = peer.age.saturating_add(1);
        }

        let mut combined = std::mem::take(&mut self.view.peers);
        for (id, peer) in &other.peers {
            if !combined.contains_key(id) {
                combined.insert(id.clone(), peer.clone());
            }
        }

        // stable sort, equal ages keep local-then-remote order
        combined.sort_by(|_, a, _, b| a.age.cmp(&b.age));
        combined.truncate(self.view.max_size);

        if !combined.contains_key(&self.local_id) {
            log::debug!("{}: own entry evicted from view", self.local_id);
        }

        self.view.peers = combined;
    }

    /// Set the informed flag on the self entry; no-op without one
    pub fn update_informed(&mut self, informed: bool) {
        if let Some(node) = self.self_entry_mut() {
            node.informed = informed;
        }
    }

    /// Informed flag of the self entry, `false` without one
    pub fn is_informed(&self) -> bool {
        self.self_entry().map(|node| node.informed).unwrap_or(false)
    }

    /// Snapshot of the view in its current order
    pub fn get_view(&self) -> Vec<PeerNode> {
        self.view.peers.values().cloned().collect()
    }

    /// Random spanning tree over `node_ids`, see [`gs_mst::generate_mst`]
    pub fn generate_mst<R: Rng + ?Sized>(node_ids: &[NodeId], rng: &mut R) -> Vec<Edge> {
        gs_mst::generate_mst(node_ids, rng)
    }

    fn self_entry(&self) -> Option<&PeerNode> {
        match self.self_addressing {
            SelfAddressing::FirstEntry => self.view.peers.first().map(|(_, p)| p),
            SelfAddressing::Pinned => self.view.peers.get(&self.local_id),
        }
    }

    fn self_entry_mut(&mut self) -> Option<&mut PeerNode> {
        match self.self_addressing {
            SelfAddressing::FirstEntry => self.view.peers.first_mut().map(|(_, p)| p),
            SelfAddressing::Pinned => self.view.peers.get_mut(&self.local_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn service(id: &str, informed: bool, max_size: usize) -> PeerSamplingService {
        PeerSamplingService::with_max_size(id, informed, max_size).unwrap()
    }

    fn pinned(id: &str, informed: bool, max_size: usize) -> PeerSamplingService {
        PeerSamplingService::with_config(
            id,
            informed,
            PeerSamplingConfig {
                max_size,
                self_addressing: SelfAddressing::Pinned,
            },
        )
        .unwrap()
    }

    fn ids(view: &[PeerNode]) -> Vec<&str> {
        view.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_new_view_holds_only_self() {
        let pss = PeerSamplingService::new("A", true).unwrap();
        let view = pss.get_view();

        assert_eq!(view, vec![PeerNode { id: "A".into(), informed: true, age: 0 }]);
        assert_eq!(pss.partial_view().max_size(), DEFAULT_VIEW_SIZE);
        assert!(pss.is_informed());
    }

    #[test]
    fn test_zero_max_size_rejected() {
        let result = PeerSamplingService::with_max_size("A", false, 0);
        assert!(matches!(
            result,
            Err(GossipError::InvalidConfiguration { parameter: "max_size", .. })
        ));
    }

    #[test]
    fn test_select_peer_needs_two_entries() {
        let mut rng = StdRng::from_seed([1u8; 32]);
        let pss = service("A", false, 5);
        assert!(pss.select_peer(&mut rng).is_none());
    }

    #[test]
    fn test_select_peer_draws_from_view() {
        let mut rng = StdRng::from_seed([2u8; 32]);
        let mut a = service("A", false, 5);
        let b = service("B", false, 5);
        a.exchange_views(b.partial_view());

        let mut seen_self = false;
        let mut seen_other = false;
        for _ in 0..200 {
            let peer = a.select_peer(&mut rng).unwrap();
            match peer.id.as_str() {
                "A" => seen_self = true,
                "B" => seen_other = true,
                other => panic!("Unexpected peer {}", other),
            }
        }
        assert!(seen_self, "Own entry is a valid pick");
        assert!(seen_other);
    }

    #[test]
    fn test_select_peer_has_no_side_effects() {
        let mut rng = StdRng::from_seed([3u8; 32]);
        let mut a = service("A", false, 5);
        a.exchange_views(service("B", true, 5).partial_view());

        let before = a.get_view();
        for _ in 0..10 {
            a.select_peer(&mut rng);
        }
        assert_eq!(a.get_view(), before);
    }

    #[test]
    fn test_exchange_ages_and_merges() {
        let mut a = service("A", false, 10);
        let b = service("B", true, 10);

        a.exchange_views(b.partial_view());
        let view = a.get_view();

        // B arrives at its reported age 0 and sorts ahead of the aged A
        assert_eq!(ids(&view), vec!["B", "A"]);
        assert_eq!(view[0].age, 0);
        assert!(view[0].informed);
        assert_eq!(view[1].age, 1);
    }

    #[test]
    fn test_received_age_preserved() {
        let mut b = service("B", false, 10);
        b.exchange_views(service("C", false, 10).partial_view());
        b.exchange_views(service("D", false, 10).partial_view());
        // B's view: D:0, C:1, B:2

        let mut a = service("A", false, 10);
        a.exchange_views(b.partial_view());

        let view = a.get_view();
        let age_of = |id: &str| view.iter().find(|p| p.id == id).unwrap().age;
        assert_eq!(age_of("A"), 1);
        assert_eq!(age_of("B"), 2);
        assert_eq!(age_of("C"), 1);
        assert_eq!(age_of("D"), 0);
    }

    #[test]
    fn test_local_entry_wins_conflict() {
        let mut a = service("A", false, 10);
        a.exchange_views(service("X", false, 10).partial_view());

        // remote claims X is informed
        let remote = service("X", true, 10);
        a.exchange_views(remote.partial_view());

        let x = a.partial_view().get("X").unwrap();
        assert!(!x.informed, "Remote copy must not overwrite a known peer");
        assert_eq!(x.age, 1, "Known peer keeps aging, no refresh");
    }

    #[test]
    fn test_view_bounded_by_max_size() {
        let mut rng = StdRng::from_seed([4u8; 32]);
        let max_size = 4;
        let mut services: Vec<PeerSamplingService> = (0..12)
            .map(|i| service(&format!("n{}", i), i == 0, max_size))
            .collect();

        for _ in 0..50 {
            let i = rng.gen_range(0..services.len());
            let j = rng.gen_range(0..services.len());
            let remote = services[j].partial_view().clone();
            services[i].exchange_views(&remote);
            assert!(services[i].partial_view().len() <= max_size);
        }
    }

    #[test]
    fn test_retained_entries_age_by_one() {
        let mut rng = StdRng::from_seed([5u8; 32]);
        let mut services: Vec<PeerSamplingService> = (0..8)
            .map(|i| service(&format!("n{}", i), false, 5))
            .collect();

        for _ in 0..40 {
            let i = rng.gen_range(0..services.len());
            let j = rng.gen_range(0..services.len());
            if i == j {
                continue;
            }
            let before = services[i].get_view();
            let remote = services[j].partial_view().clone();
            services[i].exchange_views(&remote);

            for old in &before {
                if let Some(now) = services[i].partial_view().get(&old.id) {
                    assert_eq!(now.age, old.age + 1, "Entry {} aged wrongly", old.id);
                }
            }
        }
    }

    #[test]
    fn test_age_saturates() {
        let mut a = service("A", false, 10);
        if let Some(own) = a.view.peers.get_mut("A") {
            own.age = u32::MAX;
        }

        a.exchange_views(service("B", false, 10).partial_view());

        assert_eq!(a.partial_view().get("A").unwrap().age, u32::MAX);
        assert_eq!(ids(&a.get_view()), vec!["B", "A"]);
    }

    #[test]
    fn test_oldest_entries_evicted() {
        let mut a = service("A", false, 2);
        a.exchange_views(service("B", false, 2).partial_view());
        // A's view: B:0, A:1
        a.exchange_views(service("C", false, 2).partial_view());
        // combined: B:1, A:2, C:0 -> C, B

        assert_eq!(ids(&a.get_view()), vec!["C", "B"]);
        assert!(!a.partial_view().contains("A"));
    }

    #[test]
    fn test_first_entry_addressing_follows_youngest() {
        let mut a = service("A", false, 10);
        a.exchange_views(service("B", true, 10).partial_view());

        // the first entry is now B, so "self" reads B's flag
        assert!(a.is_informed());
        a.update_informed(false);
        assert!(!a.partial_view().get("B").unwrap().informed);
    }

    #[test]
    fn test_pinned_addressing_keeps_own_entry() {
        let mut a = pinned("A", false, 10);
        a.exchange_views(service("B", true, 10).partial_view());

        assert!(!a.is_informed());
        a.update_informed(true);
        assert!(a.partial_view().get("A").unwrap().informed);
        assert!(a.partial_view().get("B").unwrap().informed);
    }

    #[test]
    fn test_pinned_after_eviction() {
        let mut a = pinned("A", true, 1);
        a.exchange_views(service("B", false, 1).partial_view());
        assert!(!a.partial_view().contains("A"));

        assert!(!a.is_informed(), "No self entry reads as uninformed");
        a.update_informed(true);
        assert!(!a.partial_view().get("B").unwrap().informed, "Update is a no-op");
    }

    #[test]
    fn test_update_informed_before_exchange() {
        let mut a = service("A", false, 3);
        a.update_informed(true);
        assert!(a.is_informed());
        assert!(a.get_view()[0].informed);
    }

    #[test]
    fn test_get_view_idempotent() {
        let mut a = service("A", false, 5);
        a.exchange_views(service("B", false, 5).partial_view());
        a.exchange_views(service("C", true, 5).partial_view());
        assert_eq!(a.get_view(), a.get_view());
    }

    #[test]
    fn test_exchange_copies_values() {
        let mut a = service("A", false, 5);
        let mut b = service("B", false, 5);
        a.exchange_views(b.partial_view());

        b.update_informed(true);
        assert!(!a.partial_view().get("B").unwrap().informed);
    }

    #[test]
    fn test_generate_mst_delegates() {
        let mut rng = StepRng::new(0, 0);
        let node_ids = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let edges = PeerSamplingService::generate_mst(&node_ids, &mut rng);
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_config_from_yaml() {
        let config: PeerSamplingConfig =
            serde_yaml::from_str("max_size: 8\nself_addressing: pinned").unwrap();
        assert_eq!(config.max_size, 8);
        assert_eq!(config.self_addressing, SelfAddressing::Pinned);

        let config: PeerSamplingConfig = serde_yaml::from_str("max_size: 8").unwrap();
        assert_eq!(config.self_addressing, SelfAddressing::FirstEntry);
    }
}
