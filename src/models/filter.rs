use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use xxhash_rust::xxh64::xxh64;

/// Stable 64-bit fingerprint of a filter expression (xxHash64, seed 0).
///
/// Displayed as 16 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub fn of(filter: &str) -> Fingerprint {
        Fingerprint(xxh64(filter.as_bytes(), 0))
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u64::from_str_radix(s, 16).map(Fingerprint)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Filter reference held by a peer: the filter fingerprint and whether it came from a
/// multiprotocol rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilterRef {
    pub fingerprint: Fingerprint,
    pub multiprotocol: bool,
}

/// Content-addressed store of filter expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FilterCatalog {
    filters: BTreeMap<Fingerprint, String>,
}

impl FilterCatalog {
    pub fn new() -> FilterCatalog {
        FilterCatalog::default()
    }

    /// Stores `filter` and returns its fingerprint. Inserting the same text twice is a no-op.
    pub fn insert(&mut self, filter: &str) -> Fingerprint {
        let fingerprint = Fingerprint::of(filter);
        self.filters
            .entry(fingerprint)
            .or_insert_with(|| filter.to_string());
        fingerprint
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&str> {
        self.filters.get(fingerprint).map(|s| s.as_str())
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.filters.contains_key(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &str)> {
        self.filters.iter().map(|(k, v)| (k, v.as_str()))
    }
}
