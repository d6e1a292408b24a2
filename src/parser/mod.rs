/*!
RPSL policy parsing and analysis.

[PolicyParser] is one analysis session: it reads the aut-num object of a single autonomous
system and builds the [PeeringDirectory] and [FilterCatalog] of that policy. Each policy
attribute runs through the same pipeline:

1. resolve the address family of multiprotocol rules ([resolve_address_family]),
2. decompose the expression into factor and filter clause ([decompose_expression]),
3. match the factor grammar to get subject and filter ([match_factor]),
4. merge the result into the peering model, extracting peering addresses
   ([extract_peering_ips]) and actions ([parse_actions]) on the way.
*/
pub mod action;
pub mod afi;
pub mod decompose;
pub mod document;
pub mod factor;
pub mod lexer;
pub mod peering_ip;

pub use action::parse_actions;
pub use afi::resolve_address_family;
pub use decompose::{decompose_expression, Decomposition};
pub use document::{autnum_attributes, extract_routes, RegistryAttribute};
pub use factor::match_factor;
pub use peering_ip::extract_peering_ips;

use crate::error::PolicyError;
use crate::models::*;
use crate::parser::lexer::{contains_keyword, Keyword};
use log::{debug, warn};
use roxmltree::Document;

/// Toggles of an analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Analyse `import`/`export` attributes.
    pub ipv4: bool,
    /// Analyse `mp-import`/`mp-export` attributes.
    pub ipv6: bool,
    /// Also analyse `default`/`mp-default` attributes.
    pub defaults: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            ipv4: true,
            ipv6: true,
            defaults: false,
        }
    }
}

impl ParserConfig {
    pub fn disable_ipv4(self) -> ParserConfig {
        ParserConfig {
            ipv4: false,
            ..self
        }
    }

    pub fn disable_ipv6(self) -> ParserConfig {
        ParserConfig {
            ipv6: false,
            ..self
        }
    }

    pub fn enable_defaults(self) -> ParserConfig {
        ParserConfig {
            defaults: true,
            ..self
        }
    }

    /// IP versions enabled in this configuration.
    pub fn versions(&self) -> IpVersions {
        IpVersions {
            ipv4: self.ipv4,
            ipv6: self.ipv6,
        }
    }

    /// How the attribute named `name` is analysed, or `None` if it is skipped.
    ///
    /// Multiprotocol rules are dispatched when IPv6 is enabled and accept every enabled
    /// family, so `afi ipv4.unicast` rules are kept unless IPv4 is disabled.
    pub fn context_for(&self, name: &str) -> Option<RuleContext> {
        let context = match name {
            "import" if self.ipv4 => RuleContext::import(false),
            "export" if self.ipv4 => RuleContext::export(false),
            "default" if self.ipv4 && self.defaults => RuleContext::default_rule(false),
            "mp-import" if self.ipv6 => RuleContext::import(true),
            "mp-export" if self.ipv6 => RuleContext::export(true),
            "mp-default" if self.ipv6 && self.defaults => RuleContext::default_rule(true),
            _ => return None,
        };
        match context.multiprotocol {
            true => Some(context.requesting(self.versions())),
            false => Some(context),
        }
    }
}

/// How a single rule is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleContext {
    pub direction: Direction,
    pub multiprotocol: bool,
    /// `default:` rules need no filter keyword and end their action clause at `NETWORKS`.
    pub default_rule: bool,
    /// IP versions the caller is interested in; rules of another family are skipped.
    pub requested: IpVersions,
}

impl RuleContext {
    fn new(direction: Direction, multiprotocol: bool) -> RuleContext {
        RuleContext {
            direction,
            multiprotocol,
            default_rule: false,
            requested: match multiprotocol {
                true => IpVersions::BOTH,
                false => IpVersions::only(IpVersion::Ipv4),
            },
        }
    }

    pub fn import(multiprotocol: bool) -> RuleContext {
        RuleContext::new(Direction::Import, multiprotocol)
    }

    pub fn export(multiprotocol: bool) -> RuleContext {
        RuleContext::new(Direction::Export, multiprotocol)
    }

    pub fn default_rule(multiprotocol: bool) -> RuleContext {
        RuleContext {
            default_rule: true,
            ..RuleContext::new(Direction::Import, multiprotocol)
        }
    }

    pub fn requesting(self, requested: impl Into<IpVersions>) -> RuleContext {
        RuleContext {
            requested: requested.into(),
            ..self
        }
    }

    fn action_boundary(&self) -> Keyword {
        match (self.default_rule, self.direction) {
            (true, _) => Keyword::Networks,
            (false, Direction::Import) => Keyword::Accept,
            (false, Direction::Export) => Keyword::Announce,
        }
    }
}

/// Parses one rule into its address family and factors.
pub fn parse_rule(text: &str, context: &RuleContext) -> Result<ParsedRule, PolicyError> {
    let (address_family, remainder) = match context.multiprotocol {
        true => resolve_address_family(text),
        false => (AddressFamily::Ipv4Unicast, text),
    };

    let decomposition = decompose_expression(remainder, context.default_rule)?;
    let factors = decomposition
        .factors
        .iter()
        .map(|factor| match_factor(factor, &decomposition.filter_clause))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedRule {
        address_family,
        direction: context.direction,
        multiprotocol: context.multiprotocol,
        factors,
    })
}

/// Outcome of analysing a rule that parsed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule was merged into the peering model under `subject`.
    Accepted { subject: String },
    /// The rule is for another address family and was skipped.
    FamilyMismatch { family: AddressFamily },
}

/// Counters of one [PolicyParser::read_policy] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PolicySummary {
    pub accepted: usize,
    pub mismatched: usize,
    pub failed: usize,
}

/// Analysis session for the policy of one autonomous system.
#[derive(Debug, Clone)]
pub struct PolicyParser {
    autnum: String,
    config: ParserConfig,
    peerings: PeeringDirectory,
    filters: FilterCatalog,
}

impl PolicyParser {
    pub fn new(autnum: impl Into<String>) -> PolicyParser {
        PolicyParser::with_config(autnum, ParserConfig::default())
    }

    pub fn with_config(autnum: impl Into<String>, config: ParserConfig) -> PolicyParser {
        PolicyParser {
            autnum: autnum.into(),
            config,
            peerings: PeeringDirectory::new(),
            filters: FilterCatalog::new(),
        }
    }

    pub fn autnum(&self) -> &str {
        self.autnum.as_str()
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn peerings(&self) -> &PeeringDirectory {
        &self.peerings
    }

    pub fn filters(&self) -> &FilterCatalog {
        &self.filters
    }

    pub fn into_parts(self) -> (PeeringDirectory, FilterCatalog) {
        (self.peerings, self.filters)
    }

    /// Analyses every policy attribute of the aut-num objects in a registry XML export.
    ///
    /// Attributes that fail to parse are logged and skipped; only a malformed document is an
    /// error.
    pub fn read_policy(&mut self, xml: &str) -> Result<PolicySummary, PolicyError> {
        let doc = Document::parse(xml)?;
        let mut summary = PolicySummary::default();

        debug!("will parse policy for {}", self.autnum);
        for attribute in autnum_attributes(&doc) {
            let context = match self.config.context_for(attribute.name) {
                Some(c) => c,
                None => continue,
            };
            match self.analyse(&attribute.value.to_uppercase(), context) {
                Ok(RuleOutcome::Accepted { .. }) => summary.accepted += 1,
                Ok(RuleOutcome::FamilyMismatch { .. }) => summary.mismatched += 1,
                Err(e) => {
                    warn!("failed to parse {} {{{}}}: {}", attribute.name, attribute.value, e);
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }

    /// Analyses one rule and merges it into the peering model.
    ///
    /// Parse errors leave the model untouched. Rules for another address family than
    /// requested are skipped with [RuleOutcome::FamilyMismatch].
    pub fn analyse(
        &mut self,
        text: &str,
        context: RuleContext,
    ) -> Result<RuleOutcome, PolicyError> {
        let rule = parse_rule(text, &context)?;
        let factor = match rule.factors.into_iter().next() {
            Some(f) => f,
            None => return Err(PolicyError::UnmatchedFactor(text.to_string())),
        };

        if !rule.address_family.accepted_by(context.requested) {
            debug!(
                "skipping {} rule for {} (requested {:?}): {}",
                rule.address_family, factor.subject, context.requested, text
            );
            return Ok(RuleOutcome::FamilyMismatch {
                family: rule.address_family,
            });
        }

        if !self.peerings.contains(&factor.subject) {
            debug!("new peering found ({})", factor.subject);
        }
        let mut peer = PeerAs::new(factor.subject.as_str());

        if !factor.is_any() {
            let fingerprint = self.filters.insert(&factor.filter);
            peer.add_filter(fingerprint, context.multiprotocol);
        }

        let mut point = PeeringPoint::new(context.multiprotocol);
        if contains_keyword(text, Keyword::At) {
            if let Some(addresses) = extract_peering_ips(text, context.multiprotocol) {
                point = point.with_addresses(addresses);
            }
        }
        if let Some(actions) = parse_actions(text, context.direction, context.action_boundary()) {
            point.add_actions(actions);
        }

        // merges into an existing peer and point with the same identity
        peer.attach_peering_point(point);
        self.peerings.insert(peer);

        Ok(RuleOutcome::Accepted {
            subject: factor.subject,
        })
    }

    /// Reads route objects from a registry search result using this session's families.
    pub fn extract_routes(&self, xml: &str) -> Result<Vec<RouteObject>, PolicyError> {
        extract_routes(xml, self.config.ipv4, self.config.ipv6)
    }
}
