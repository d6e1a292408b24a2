/*!
Peering model built from the policy of one autonomous system.

Entities are owned by their parent and addressed by identity keys: a [PeerAs] by its subject
string inside the [PeeringDirectory], a [PeeringPoint] by its address pair inside its
[PeerAs]. Inserting an entity whose key already exists merges into the existing one.
*/
use crate::models::{Direction, FilterRef, Fingerprint, PolicyActionList};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;

/// Local and remote router addresses of a peering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PeeringIpPair {
    pub local: IpAddr,
    pub remote: IpAddr,
}

impl PeeringIpPair {
    pub fn new(local: IpAddr, remote: IpAddr) -> PeeringIpPair {
        PeeringIpPair { local, remote }
    }
}

impl Display for PeeringIpPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <-> {}", self.local, self.remote)
    }
}

/// Identity of a peering point: its address pair, or `None` for the implicit point that
/// collects rules without extractable addresses.
pub type PeeringKey = Option<PeeringIpPair>;

/// Concrete session over which two systems exchange routes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PeeringPoint {
    pub multiprotocol: bool,
    pub addresses: Option<PeeringIpPair>,
    pub import_actions: Option<PolicyActionList>,
    pub export_actions: Option<PolicyActionList>,
}

impl PeeringPoint {
    pub fn new(multiprotocol: bool) -> PeeringPoint {
        PeeringPoint {
            multiprotocol,
            addresses: None,
            import_actions: None,
            export_actions: None,
        }
    }

    pub fn with_addresses(mut self, addresses: PeeringIpPair) -> PeeringPoint {
        self.addresses = Some(addresses);
        self
    }

    pub fn key(&self) -> PeeringKey {
        self.addresses
    }

    /// Attaches `actions` to the slot matching their direction, keeping actions already
    /// present in that slot.
    pub fn add_actions(&mut self, actions: PolicyActionList) {
        let slot = match actions.direction {
            Direction::Import => &mut self.import_actions,
            Direction::Export => &mut self.export_actions,
        };
        match slot {
            Some(existing) => existing.merge(actions),
            None => *slot = Some(actions),
        }
    }

    pub fn actions(&self, direction: Direction) -> Option<&PolicyActionList> {
        match direction {
            Direction::Import => self.import_actions.as_ref(),
            Direction::Export => self.export_actions.as_ref(),
        }
    }

    /// Merges another point with the same key into this one. The merged point is multiprotocol
    /// if either side is.
    pub fn merge(&mut self, other: PeeringPoint) {
        self.multiprotocol |= other.multiprotocol;
        if let Some(actions) = other.import_actions {
            self.add_actions(actions);
        }
        if let Some(actions) = other.export_actions {
            self.add_actions(actions);
        }
    }
}

/// A neighbouring AS (or AS-SET) named as subject in the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerAs {
    identifier: String,
    peering_points: BTreeMap<PeeringKey, PeeringPoint>,
    filters: BTreeSet<FilterRef>,
}

impl PeerAs {
    pub fn new(identifier: impl Into<String>) -> PeerAs {
        PeerAs {
            identifier: identifier.into(),
            peering_points: BTreeMap::new(),
            filters: BTreeSet::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Records a filter used towards this peer. Returns `false` if it was already recorded.
    pub fn add_filter(&mut self, fingerprint: Fingerprint, multiprotocol: bool) -> bool {
        self.filters.insert(FilterRef {
            fingerprint,
            multiprotocol,
        })
    }

    pub fn filters(&self) -> impl Iterator<Item = &FilterRef> {
        self.filters.iter()
    }

    pub fn has_filter(&self, fingerprint: &Fingerprint) -> bool {
        self.filters.iter().any(|f| &f.fingerprint == fingerprint)
    }

    pub fn contains_peering_point(&self, key: &PeeringKey) -> bool {
        self.peering_points.contains_key(key)
    }

    pub fn peering_point(&self, key: &PeeringKey) -> Option<&PeeringPoint> {
        self.peering_points.get(key)
    }

    /// Attaches a point, merging it into an existing point with the same key.
    pub fn attach_peering_point(&mut self, point: PeeringPoint) {
        match self.peering_points.get_mut(&point.key()) {
            Some(existing) => existing.merge(point),
            None => {
                self.peering_points.insert(point.key(), point);
            }
        }
    }

    pub fn peering_points(&self) -> impl Iterator<Item = &PeeringPoint> {
        self.peering_points.values()
    }

    pub fn peering_point_count(&self) -> usize {
        self.peering_points.len()
    }

    /// Merges another record of the same peer into this one.
    pub fn merge(&mut self, other: PeerAs) {
        debug_assert_eq!(self.identifier, other.identifier);
        self.filters.extend(other.filters);
        for (_, point) in other.peering_points {
            self.attach_peering_point(point);
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PeerAs {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let points: Vec<&PeeringPoint> = self.peering_points.values().collect();
        let mut state = serializer.serialize_struct("PeerAs", 3)?;
        state.serialize_field("identifier", &self.identifier)?;
        state.serialize_field("peering_points", &points)?;
        state.serialize_field("filters", &self.filters)?;
        state.end()
    }
}

/// All peers found in one policy, keyed by subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PeeringDirectory {
    peers: BTreeMap<String, PeerAs>,
}

impl PeeringDirectory {
    pub fn new() -> PeeringDirectory {
        PeeringDirectory::default()
    }

    /// Inserts a peer, merging it with an existing peer of the same identifier.
    pub fn insert(&mut self, peer: PeerAs) {
        match self.peers.get_mut(peer.identifier()) {
            Some(existing) => existing.merge(peer),
            None => {
                self.peers.insert(peer.identifier.clone(), peer);
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&PeerAs> {
        self.peers.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.peers.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerAs> {
        self.peers.values()
    }
}
