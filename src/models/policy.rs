use std::fmt::{Display, Formatter};

/// Address family named by the `AFI` prefix of an RPSL rule.
///
/// Plain `import`/`export` rules are always [AddressFamily::Ipv4Unicast]. Multiprotocol rules
/// carry their family in an optional `AFI <token>` prefix, and default to [AddressFamily::Any]
/// when the prefix is missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AddressFamily {
    Ipv4Unicast,
    Ipv6Unicast,
    Any,
    AnyUnicast,
    /// Any other token, kept verbatim (e.g. `IPV4.MULTICAST` or comma separated lists).
    Other(String),
}

impl AddressFamily {
    /// Map an AFI token to an address family. Matching is ASCII case-insensitive.
    pub fn from_token(token: &str) -> AddressFamily {
        match token.to_ascii_uppercase().as_str() {
            "IPV4.UNICAST" => AddressFamily::Ipv4Unicast,
            "IPV6.UNICAST" => AddressFamily::Ipv6Unicast,
            "ANY" => AddressFamily::Any,
            "ANY.UNICAST" => AddressFamily::AnyUnicast,
            _ => AddressFamily::Other(token.to_string()),
        }
    }

    /// `ANY` and `ANY.UNICAST` are compatible with every requested family.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, AddressFamily::Any | AddressFamily::AnyUnicast)
    }

    /// Checks whether a rule of this family applies to the requested IP version.
    pub fn accepts(&self, requested: IpVersion) -> bool {
        if self.is_wildcard() {
            return true;
        }
        match requested {
            IpVersion::Ipv4 => self == &AddressFamily::Ipv4Unicast,
            IpVersion::Ipv6 => self == &AddressFamily::Ipv6Unicast,
        }
    }

    /// Checks whether a rule of this family applies to any of the requested IP versions.
    pub fn accepted_by(&self, requested: IpVersions) -> bool {
        requested.iter().any(|version| self.accepts(version))
    }
}

impl Display for AddressFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::Ipv4Unicast => write!(f, "IPV4.UNICAST"),
            AddressFamily::Ipv6Unicast => write!(f, "IPV6.UNICAST"),
            AddressFamily::Any => write!(f, "ANY"),
            AddressFamily::AnyUnicast => write!(f, "ANY.UNICAST"),
            AddressFamily::Other(token) => write!(f, "{}", token),
        }
    }
}

/// IP version a caller asks the analyser for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IpVersion {
    Ipv4,
    Ipv6,
}

/// Set of IP versions a caller asks the analyser for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IpVersions {
    pub ipv4: bool,
    pub ipv6: bool,
}

impl IpVersions {
    pub const BOTH: IpVersions = IpVersions {
        ipv4: true,
        ipv6: true,
    };

    pub const fn only(version: IpVersion) -> IpVersions {
        match version {
            IpVersion::Ipv4 => IpVersions {
                ipv4: true,
                ipv6: false,
            },
            IpVersion::Ipv6 => IpVersions {
                ipv4: false,
                ipv6: true,
            },
        }
    }

    pub fn contains(&self, version: IpVersion) -> bool {
        match version {
            IpVersion::Ipv4 => self.ipv4,
            IpVersion::Ipv6 => self.ipv6,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = IpVersion> {
        let versions = *self;
        [IpVersion::Ipv4, IpVersion::Ipv6]
            .into_iter()
            .filter(move |v| versions.contains(*v))
    }
}

impl From<IpVersion> for IpVersions {
    fn from(version: IpVersion) -> Self {
        IpVersions::only(version)
    }
}

/// Direction of a policy rule, as seen from the AS that owns the aut-num object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Import,
    Export,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Import => write!(f, "import"),
            Direction::Export => write!(f, "export"),
        }
    }
}

/// The filter value that matches every route. It is never fingerprinted.
pub const FILTER_ANY: &str = "ANY";

/// One subject/filter pair of a policy rule.
///
/// For `from AS1234 accept AS-SECRETNET` the subject is `AS1234` and the filter is
/// `AS-SECRETNET`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PolicyFactor {
    /// ASN or set name the rule talks about.
    pub subject: String,
    pub filter: String,
}

impl PolicyFactor {
    pub fn new(subject: impl Into<String>, filter: impl Into<String>) -> PolicyFactor {
        PolicyFactor {
            subject: subject.into(),
            filter: filter.into(),
        }
    }

    /// Creates a factor accepting everything from (or announcing everything to) `subject`.
    pub fn any(subject: impl Into<String>) -> PolicyFactor {
        PolicyFactor::new(subject, FILTER_ANY)
    }

    pub fn is_any(&self) -> bool {
        self.filter == FILTER_ANY
    }
}

/// Result of parsing one policy attribute. Created per attribute and not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub address_family: AddressFamily,
    pub direction: Direction,
    pub multiprotocol: bool,
    /// Never empty.
    pub factors: Vec<PolicyFactor>,
}

impl ParsedRule {
    /// The factor the peering model is built from.
    pub fn primary_factor(&self) -> Option<&PolicyFactor> {
        self.factors.first()
    }
}

/// Assignment operator of an RPSL action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ActionOperator {
    /// `=`
    Assign,
    /// `.=`
    AppendAssign,
}

impl ActionOperator {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActionOperator::Assign => "=",
            ActionOperator::AppendAssign => ".=",
        }
    }
}

impl Display for ActionOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `attribute <op> value` assignment of an `action` clause, e.g. `pref = 100`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PolicyAction {
    /// Position of the statement in the original `;` separated clause.
    pub sequence: usize,
    pub attribute: String,
    pub operator: ActionOperator,
    pub value: String,
}

impl PolicyAction {
    pub fn new(
        sequence: usize,
        attribute: impl Into<String>,
        operator: ActionOperator,
        value: impl Into<String>,
    ) -> PolicyAction {
        PolicyAction {
            sequence,
            attribute: attribute.into(),
            operator,
            value: value.into(),
        }
    }
}

impl Display for PolicyAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.attribute, self.operator, self.value)
    }
}

/// Ordered actions of one rule direction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PolicyActionList {
    pub direction: Direction,
    pub actions: Vec<PolicyAction>,
}

impl PolicyActionList {
    pub fn new(direction: Direction) -> PolicyActionList {
        PolicyActionList {
            direction,
            actions: vec![],
        }
    }

    pub fn push(&mut self, action: PolicyAction) {
        self.actions.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Appends the actions of `other` that are not already present.
    pub fn merge(&mut self, other: PolicyActionList) {
        for action in other.actions {
            if !self.actions.contains(&action) {
                self.actions.push(action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_family_tokens() {
        assert_eq!(
            AddressFamily::from_token("IPV4.UNICAST"),
            AddressFamily::Ipv4Unicast
        );
        assert_eq!(
            AddressFamily::from_token("ipv6.unicast"),
            AddressFamily::Ipv6Unicast
        );
        assert_eq!(AddressFamily::from_token("ANY"), AddressFamily::Any);
        assert_eq!(
            AddressFamily::from_token("ANY.UNICAST"),
            AddressFamily::AnyUnicast
        );
        assert_eq!(
            AddressFamily::from_token("IPV4.MULTICAST"),
            AddressFamily::Other("IPV4.MULTICAST".to_string())
        );
    }

    #[test]
    fn test_address_family_accepts() {
        assert!(AddressFamily::Any.accepts(IpVersion::Ipv4));
        assert!(AddressFamily::AnyUnicast.accepts(IpVersion::Ipv6));
        assert!(AddressFamily::Ipv6Unicast.accepts(IpVersion::Ipv6));
        assert!(!AddressFamily::Ipv6Unicast.accepts(IpVersion::Ipv4));
        assert!(!AddressFamily::Ipv4Unicast.accepts(IpVersion::Ipv6));
        assert!(!AddressFamily::Other("IPV4.MULTICAST".to_string()).accepts(IpVersion::Ipv4));
    }

    #[test]
    fn test_address_family_accepted_by_versions() {
        assert!(AddressFamily::Ipv4Unicast.accepted_by(IpVersions::BOTH));
        assert!(AddressFamily::Ipv6Unicast.accepted_by(IpVersions::BOTH));
        assert!(AddressFamily::Ipv4Unicast.accepted_by(IpVersion::Ipv4.into()));
        assert!(!AddressFamily::Ipv4Unicast.accepted_by(IpVersions::only(IpVersion::Ipv6)));
        assert!(AddressFamily::Any.accepted_by(IpVersions::only(IpVersion::Ipv6)));

        let none = IpVersions {
            ipv4: false,
            ipv6: false,
        };
        assert!(!AddressFamily::Any.accepted_by(none));
        assert_eq!(IpVersions::BOTH.iter().count(), 2);
    }

    #[test]
    fn test_action_list_merge() {
        let mut first = PolicyActionList::new(Direction::Import);
        first.push(PolicyAction::new(0, "PREF", ActionOperator::Assign, "100"));

        let mut second = PolicyActionList::new(Direction::Import);
        second.push(PolicyAction::new(0, "PREF", ActionOperator::Assign, "100"));
        second.push(PolicyAction::new(
            1,
            "COMMUNITY",
            ActionOperator::AppendAssign,
            "(65000:1)",
        ));

        first.merge(second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.actions[1].to_string(), "COMMUNITY.=(65000:1)");
    }
}
