use ipnet::IpNet;
use std::fmt::{Display, Formatter};

/// A `route` or `route6` registry object: one prefix and the AS allowed to originate it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteObject {
    pub prefix: IpNet,
    pub origin: String,
}

impl RouteObject {
    pub fn new(prefix: IpNet, origin: impl Into<String>) -> RouteObject {
        RouteObject {
            prefix,
            origin: origin.into(),
        }
    }

    /// `true` for `route6` objects.
    pub fn is_ipv6(&self) -> bool {
        matches!(self.prefix, IpNet::V6(_))
    }
}

impl Display for RouteObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} origin {}", self.prefix, self.origin)
    }
}
